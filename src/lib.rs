/// Aniyomi extension toolkit - Rust Implementation
///
/// Site structure analysis for writing new anime extensions, plus the
/// maintenance tools used to publish an extension repository.

pub mod analyzer;
pub mod config;
pub mod errors;
pub mod repo;
pub mod report;

// Re-export main types for easy access
pub use crate::analyzer::{
    AnalysisResult, DetailInfo, EpisodeInfo, HomepageInfo, HttpFetcher, PageFetcher, SearchInfo,
    SiteAnalyzer, StaticFetcher,
};
pub use crate::config::{Config, ConfigBuilder, ConfigSource};
pub use crate::errors::{FetchError, FetchResult};
pub use crate::report::{generate_report, write_outputs};

/// Install the fmt subscriber; `RUST_LOG` takes precedence over `level`
pub fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("aniext_tools={},warn", level)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load configuration, then install logging at its level (or `debug` when
/// `verbose`) and report where the configuration came from.
///
/// Loading happens first so the configured level applies; its outcome is
/// only logged once the subscriber exists.
pub fn init_with_config(verbose: bool) -> anyhow::Result<Config> {
    let loaded = Config::load_from(config::CONFIG_PATHS);

    let level = match (&loaded, verbose) {
        (_, true) => "debug".to_string(),
        (Ok((config, _)), false) => config.output.log_level.clone(),
        (Err(_), false) => "info".to_string(),
    };
    init_tracing(&level);

    match loaded {
        Ok((config, source)) => {
            tracing::info!("📄 Loaded configuration from: {}", source);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            Err(e)
        }
    }
}
