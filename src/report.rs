//! Text and JSON reports for an analysis run

use crate::analyzer::AnalysisResult;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

/// Placeholder for anything the analysis could not find
pub const NOT_FOUND: &str = "NOT FOUND";

const RULE_WIDTH: usize = 70;

/// Short site name: host without `www.`, cut at the first dot
pub fn site_domain(base_url: &str) -> String {
    Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .map(|host| host.replace("www.", ""))
        .and_then(|host| host.split('.').next().map(str::to_string))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "site".to_string())
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest
pub fn title_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                output.extend(c.to_lowercase());
            } else {
                output.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            output.push(c);
            previous_is_letter = false;
        }
    }

    output
}

/// Gradle dependency line for hosts that have an extractor library
pub fn extractor_dependency(label: &str) -> Option<&'static str> {
    match label {
        "StreamSB" => Some(r#"implementation(project(":lib:streamsb-extractor"))"#),
        "Doodstream" => Some(r#"implementation(project(":lib:doodstream-extractor"))"#),
        _ => None,
    }
}

/// Output file paths for a site, derived from its domain
pub fn report_paths(output_dir: &Path, base_url: &str) -> (PathBuf, PathBuf) {
    let domain = site_domain(base_url);
    (
        output_dir.join(format!("{}_analysis.txt", domain)),
        output_dir.join(format!("{}_analysis.json", domain)),
    )
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value.unwrap_or(placeholder)
}

/// Render the human readable report, including a Kotlin starter snippet
pub fn generate_report(results: &AnalysisResult, generated_at: &str) -> String {
    let domain = site_domain(&results.base_url);
    let homepage = results.homepage.clone().unwrap_or_default();
    let search = results.search.clone().unwrap_or_default();
    let detail = results.detail.clone().unwrap_or_default();
    let episode = results.episode.clone().unwrap_or_default();
    let base_url = &results.base_url;

    let mut report = String::new();

    let _ = write!(
        report,
        "\n{rule}\nANIME WEBSITE ANALYSIS REPORT\n{rule}\n\
         Website: {base_url}\n\
         Domain: {domain}\n\
         Analysis Date: {generated_at}\n\n",
        rule = rule(),
    );

    let _ = write!(
        report,
        "{rule}\n[1] HOMEPAGE ANALYSIS\n{rule}\n\
         URL: {base_url}\n\n\
         Anime List Container: {}\n\
         Card Link Selector: {}\n\
         Card Image Selector: {}\n\
         Card Title Element: {}\n\n\
         Sample Anime URL: {}\n\n",
        or_placeholder(homepage.container_selector.as_deref(), NOT_FOUND),
        or_placeholder(homepage.card_link_selector.as_deref(), NOT_FOUND),
        or_placeholder(homepage.card_image_selector.as_deref(), NOT_FOUND),
        or_placeholder(homepage.card_title_tag.as_deref(), NOT_FOUND),
        or_placeholder(homepage.sample_item_url.as_deref(), NOT_FOUND),
        rule = rule(),
    );

    let _ = write!(
        report,
        "{rule}\n[2] SEARCH PAGE ANALYSIS\n{rule}\n\
         Search URL Pattern: {base_url}/?s=QUERY\n\n\
         Result Link Selector: {}\n\
         Sample Result URL: {}\n\n",
        or_placeholder(search.result_link_selector.as_deref(), NOT_FOUND),
        or_placeholder(search.sample_result_url.as_deref(), NOT_FOUND),
        rule = rule(),
    );

    let _ = write!(
        report,
        "{rule}\n[3] DETAIL PAGE ANALYSIS\n{rule}\n\
         Episode List Selector: {}\n\
         Synopsis Selector: {}\n\n\
         Sample Episode URL: {}\n\n",
        or_placeholder(detail.episode_list_selector.as_deref(), NOT_FOUND),
        or_placeholder(detail.synopsis_selector.as_deref(), NOT_FOUND),
        or_placeholder(detail.sample_subitem_url.as_deref(), NOT_FOUND),
        rule = rule(),
    );

    let _ = write!(
        report,
        "{rule}\n[4] EPISODE/VIDEO PAGE ANALYSIS\n{rule}\n\
         Video Element Selector: {}\n\n\
         Video Hosts Detected:\n",
        or_placeholder(episode.video_selector.as_deref(), NOT_FOUND),
        rule = rule(),
    );

    if results.video_hosts.is_empty() {
        report.push_str("  - NO VIDEO HOSTS DETECTED\n");
    } else {
        for (host, count) in results.video_hosts.most_common() {
            let _ = writeln!(report, "  - {}: {} occurrence(s)", host, count);
        }
    }

    let _ = write!(
        report,
        "\n{rule}\n[5] SUGGESTED KOTLIN CODE SNIPPETS\n{rule}\n\n{}\n",
        kotlin_snippet(results),
        rule = rule(),
    );

    let _ = write!(report, "{rule}\nVIDEO EXTRACTORS NEEDED:\n{rule}\n", rule = rule());

    if !results.video_hosts.is_empty() {
        report.push_str("\nAdd these dependencies to build.gradle.kts:\n");
        for dependency in results.video_hosts.labels().filter_map(extractor_dependency) {
            let _ = writeln!(report, "  {}", dependency);
        }
    }

    let _ = write!(report, "\n{rule}\nEND OF ANALYSIS\n{rule}\n", rule = rule());

    report
}

/// Kotlin source skeleton with the discovered selectors filled in
pub fn kotlin_snippet(results: &AnalysisResult) -> String {
    let homepage = results.homepage.clone().unwrap_or_default();
    let detail = results.detail.clone().unwrap_or_default();
    let episode = results.episode.clone().unwrap_or_default();
    let name = title_case(&site_domain(&results.base_url));

    format!(
        r#"```kotlin
// Base configuration
override val name = "{name}"
override val baseUrl = "{base_url}"
override val lang = "id"  // Change to "en" if needed

// Popular anime selectors
override fun popularAnimeSelector() = "{container}"
override fun popularAnimeFromElement(element: Element): SAnime {{
    return SAnime.create().apply {{
        setUrlWithoutDomain(element.select("{link}").attr("href"))
        title = element.select("{title}").text()
        thumbnail_url = element.select("{image}").attr("src")
    }}
}}

// Search
override fun searchAnimeRequest(page: Int, query: String, filters: AnimeFilterList): Request {{
    return GET("$baseUrl/?s=$query", headers)
}}

// Episode list
override fun episodeListSelector() = "{episodes}"

// Video extraction
override fun videoListSelector() = "{video}"
```"#,
        base_url = results.base_url,
        container = or_placeholder(homepage.container_selector.as_deref(), "UPDATE_ME"),
        link = or_placeholder(homepage.card_link_selector.as_deref(), "a"),
        title = or_placeholder(homepage.card_title_tag.as_deref(), "h2"),
        image = or_placeholder(homepage.card_image_selector.as_deref(), "img"),
        episodes = or_placeholder(detail.episode_list_selector.as_deref(), "a[href*=episode]"),
        video = or_placeholder(episode.video_selector.as_deref(), "iframe[src]"),
    )
}

/// Files written for one analysis run
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub report_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub report: String,
}

/// Write the text report and, optionally, the JSON data next to it
pub fn write_outputs(results: &AnalysisResult, output_dir: &Path, write_json: bool) -> Result<ReportFiles> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;

    let (report_path, json_path) = report_paths(output_dir, &results.base_url);
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let report = generate_report(results, &generated_at);

    std::fs::write(&report_path, &report)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    info!("✅ Report saved to: {}", report_path.display());

    let json_path = if write_json {
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&json_path, json)
            .with_context(|| format!("Failed to write JSON {}", json_path.display()))?;
        info!("✅ JSON data saved to: {}", json_path.display());
        Some(json_path)
    } else {
        None
    };

    Ok(ReportFiles {
        report_path,
        json_path,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{DetailInfo, EpisodeInfo, HomepageInfo};

    #[test]
    fn test_site_domain() {
        assert_eq!(site_domain("https://www.otakudesu.cloud"), "otakudesu");
        assert_eq!(site_domain("https://anime-indo.lol/path"), "anime-indo");
        assert_eq!(site_domain("not a url"), "site");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("otakudesu"), "Otakudesu");
        assert_eq!(title_case("anime-indo"), "Anime-Indo");
        assert_eq!(title_case("nONton21"), "Nonton21");
    }

    #[test]
    fn test_empty_report_uses_placeholders() {
        let results = AnalysisResult::new("https://example.com");
        let report = generate_report(&results, "2024-01-01 00:00:00");

        assert!(report.contains("Anime List Container: NOT FOUND"));
        assert!(report.contains("Sample Anime URL: NOT FOUND"));
        assert!(report.contains("Result Link Selector: NOT FOUND"));
        assert!(report.contains("Episode List Selector: NOT FOUND"));
        assert!(report.contains("Video Element Selector: NOT FOUND"));
        assert!(report.contains("  - NO VIDEO HOSTS DETECTED"));
        assert!(report.contains(r#"override fun popularAnimeSelector() = "UPDATE_ME""#));
        assert!(report.contains(r#"override val name = "Example""#));
        assert!(!report.contains("build.gradle.kts"));
        assert!(report.trim_end().ends_with(&rule()));
    }

    #[test]
    fn test_report_embeds_findings() {
        let mut results = AnalysisResult::new("https://example.com");
        results.homepage = Some(HomepageInfo {
            container_selector: Some("div.list grid".to_string()),
            card_link_selector: Some("a.card".to_string()),
            card_image_selector: Some("img".to_string()),
            card_title_tag: Some("h3".to_string()),
            sample_item_url: Some("https://example.com/anime/one".to_string()),
        });
        results.detail = Some(DetailInfo {
            episode_list_selector: Some(r#"a[href*="episode"]"#.to_string()),
            sample_subitem_url: Some("https://example.com/one-episode-1".to_string()),
            synopsis_selector: None,
        });
        results.episode = Some(EpisodeInfo {
            video_selector: Some("iframe[src]".to_string()),
        });
        results.video_hosts.record("player.example.net");
        results.video_hosts.record("Doodstream");
        results.video_hosts.record("Doodstream");

        let report = generate_report(&results, "2024-01-01 00:00:00");

        assert!(report.contains("Anime List Container: div.list grid"));
        assert!(report.contains(r#"title = element.select("h3").text()"#));
        assert!(report.contains(r#"override fun episodeListSelector() = "a[href*="episode"]""#));
        assert!(report.contains("Synopsis Selector: NOT FOUND"));

        let doodstream = report.find("  - Doodstream: 2 occurrence(s)").unwrap();
        let other = report.find("  - player.example.net: 1 occurrence(s)").unwrap();
        assert!(doodstream < other);

        assert!(report.contains(r#"  implementation(project(":lib:doodstream-extractor"))"#));
        assert!(!report.contains("streamsb-extractor"));
    }

    #[test]
    fn test_write_outputs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut results = AnalysisResult::new("https://www.nimegami.id");
        results.video_hosts.record("Mp4Upload");

        let files = write_outputs(&results, temp_dir.path(), true).unwrap();

        assert_eq!(files.report_path, temp_dir.path().join("nimegami_analysis.txt"));
        let json_path = files.json_path.unwrap();
        assert_eq!(json_path, temp_dir.path().join("nimegami_analysis.json"));

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json["base_url"], "https://www.nimegami.id");
        assert!(json["homepage"].is_null());
        assert_eq!(json["video_hosts"]["Mp4Upload"], 1);

        let written = std::fs::read_to_string(files.report_path).unwrap();
        assert_eq!(written, files.report);
    }
}
