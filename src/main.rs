use aniext_tools::{init_with_config, report, HttpFetcher, SiteAnalyzer};
use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{debug, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let matches = Command::new("Anime Site Analyzer")
        .version("0.1.0")
        .author("TigreRoll")
        .about("Guesses the CSS selectors needed to write an Aniyomi extension for a site")
        .arg(
            Arg::new("url")
                .value_name("URL")
                .help("Base URL of the site to analyze")
                .required(true)
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("QUERY")
                .help("Search query used for the search page")
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Directory for the text report and JSON data")
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-request timeout in seconds")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    let mut config = init_with_config(verbose)?;

    if let Some(query) = matches.get_one::<String>("query") {
        config.analyzer.search_query = query.clone();
    }
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.output.output_dir = PathBuf::from(dir);
    }
    if let Some(timeout) = matches.get_one::<String>("timeout") {
        config.analyzer.timeout_seconds = timeout.parse()?;
    }
    config.validate_analyzer()?;
    debug!("{}", config.summary());

    let base_url = matches
        .get_one::<String>("url")
        .ok_or_else(|| anyhow::anyhow!("URL is required"))?;

    info!("🚀 Anime Site Analyzer starting...");
    info!("⏱️ Timeout: {}s", config.analyzer.timeout_seconds);
    info!("📂 Output directory: {}", config.output.output_dir.display());

    let fetcher = HttpFetcher::from_config(&config.analyzer);
    let mut analyzer = SiteAnalyzer::new(base_url, &config.analyzer.search_query, fetcher);

    let start_time = std::time::Instant::now();
    analyzer.run_analysis().await;
    let duration = start_time.elapsed();
    let results = analyzer.into_results();

    let files = report::write_outputs(&results, &config.output.output_dir, config.output.write_json)?;
    println!("{}", files.report);

    info!("🎉 Analysis completed in {:.2}s", duration.as_secs_f64());
    info!("📊 Video hosts detected: {}", results.video_hosts.len());

    Ok(())
}
