//! Sequential four-stage analysis of a single site

use super::discovery::{discover_detail, discover_episode, discover_homepage, discover_search};
use super::fetcher::PageFetcher;
use super::AnalysisResult;
use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

/// Trim the input, drop trailing slashes and default a bare domain to https
fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    }
}

/// Walks a site from its homepage down to an episode page.
///
/// Each stage feeds the next: the homepage (or search) yields a sample item
/// URL for the detail stage, which yields a sample episode URL for the
/// episode stage. A stage whose input is missing, or whose fetch fails,
/// leaves its part of the result empty and the run carries on.
pub struct SiteAnalyzer<F: PageFetcher> {
    fetcher: F,
    base_url: String,
    base: Option<Url>,
    search_query: String,
    results: AnalysisResult,
}

impl<F: PageFetcher> SiteAnalyzer<F> {
    /// Create an analyzer for `base_url`.
    ///
    /// A trailing slash is dropped and a bare domain gets `https://`. A base
    /// URL that still does not parse is kept as given; every stage then finds
    /// nothing, the same as an unreachable site.
    pub fn new(base_url: &str, search_query: &str, fetcher: F) -> Self {
        let base_url = normalize_base_url(base_url);
        let base = match Url::parse(&base_url) {
            Ok(url) if url.host_str().is_some() => Some(url),
            Ok(_) => {
                warn!("❌ Base URL has no host: {}", base_url);
                None
            }
            Err(e) => {
                warn!("❌ Invalid base URL {}: {}", base_url, e);
                None
            }
        };

        Self {
            fetcher,
            results: AnalysisResult::new(base_url.clone()),
            base_url,
            base,
            search_query: search_query.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the search page for the configured query
    pub fn search_url(&self) -> String {
        format!("{}/?s={}", self.base_url, urlencoding::encode(&self.search_query))
    }

    pub fn results(&self) -> &AnalysisResult {
        &self.results
    }

    pub fn into_results(self) -> AnalysisResult {
        self.results
    }

    /// Run all four stages in order
    pub async fn run_analysis(&mut self) -> &AnalysisResult {
        info!("{}", "=".repeat(60));
        info!("🔍 ANALYZING: {}", self.base_url);
        info!("{}", "=".repeat(60));

        self.analyze_homepage().await;
        self.analyze_search().await;
        self.analyze_detail_page().await;
        self.analyze_episode_page().await;

        &self.results
    }

    /// Fetch a page, logging and swallowing any failure
    async fn fetch_page(&self, url: &str) -> Option<String> {
        if self.base.is_none() {
            warn!("❌ Error fetching {}: base URL is not usable", url);
            return None;
        }

        match self.fetcher.fetch(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!("❌ Error fetching {}: {}", url, e);
                None
            }
        }
    }

    pub async fn analyze_homepage(&mut self) {
        info!("🏠 [1/4] Analyzing Homepage...");
        if self.results.homepage.is_some() {
            debug!("Homepage already analyzed");
            return;
        }

        let Some(html) = self.fetch_page(&self.base_url).await else {
            return;
        };
        let Some(base) = self.base.as_ref() else {
            return;
        };
        let document = Html::parse_document(&html);

        match discover_homepage(&document, base) {
            Some(homepage) => {
                info!(
                    "✅ Found card container: {}",
                    homepage.container_selector.as_deref().unwrap_or_default()
                );
                self.results.homepage = Some(homepage);
            }
            None => info!("📭 No card container found on homepage"),
        }
    }

    pub async fn analyze_search(&mut self) {
        info!("🔎 [2/4] Analyzing Search (query: {})...", self.search_query);
        if self.results.search.is_some() {
            debug!("Search already analyzed");
            return;
        }

        let search_url = self.search_url();
        let Some(html) = self.fetch_page(&search_url).await else {
            return;
        };
        let Some(base) = self.base.as_ref() else {
            return;
        };
        let document = Html::parse_document(&html);

        match discover_search(&document, base, &self.search_query) {
            Some(search) => {
                info!(
                    "✅ Found search result link: {}",
                    search.result_link_selector.as_deref().unwrap_or_default()
                );
                self.results.search = Some(search);
            }
            None => info!("📭 No search result links found"),
        }
    }

    pub async fn analyze_detail_page(&mut self) {
        info!("📄 [3/4] Analyzing Detail Page...");
        if self.results.detail.is_some() {
            debug!("Detail page already analyzed");
            return;
        }

        let Some(detail_url) = self.results.detail_source_url().map(str::to_string) else {
            info!("⏭️ No sample anime URL found. Skipping detail analysis.");
            return;
        };

        let Some(html) = self.fetch_page(&detail_url).await else {
            return;
        };
        let Some(base) = self.base.as_ref() else {
            return;
        };
        let document = Html::parse_document(&html);

        match discover_detail(&document, base) {
            Some(detail) => {
                info!(
                    "✅ Episode list: {} | Synopsis: {}",
                    detail.episode_list_selector.as_deref().unwrap_or("none"),
                    detail.synopsis_selector.as_deref().unwrap_or("none")
                );
                self.results.detail = Some(detail);
            }
            None => info!("📭 No episode links or synopsis found on {}", detail_url),
        }
    }

    pub async fn analyze_episode_page(&mut self) {
        info!("🎬 [4/4] Analyzing Episode Page...");
        if self.results.episode.is_some() {
            debug!("Episode page already analyzed");
            return;
        }

        let Some(episode_url) = self.results.episode_source_url().map(str::to_string) else {
            info!("⏭️ No sample episode URL found. Skipping episode analysis.");
            return;
        };

        let Some(html) = self.fetch_page(&episode_url).await else {
            return;
        };
        let document = Html::parse_document(&html);

        let (episode, labels) = discover_episode(&document);
        for label in &labels {
            debug!("Video host detected: {}", label);
            self.results.video_hosts.record(label);
        }

        match episode {
            Some(episode) => {
                info!("✅ Found video elements, {} host(s) labelled", labels.len());
                self.results.episode = Some(episode);
            }
            None => info!("📭 No video elements found on {}", episode_url),
        }
    }
}
