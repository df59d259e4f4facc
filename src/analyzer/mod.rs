//! Site structure analysis
//!
//! Fetches a handful of pages from an anime streaming site and guesses the
//! selectors an extension author needs: the card container on the homepage,
//! search results, the episode list of a detail page and the embedded player
//! of an episode page.

pub mod discovery;
pub mod fetcher;
pub mod hosts;
pub mod selector;
pub mod site;

// Re-export main types
pub use fetcher::{HttpFetcher, PageFetcher, StaticFetcher};
pub use hosts::{classify_host, HostTally};
pub use selector::selector_path;
pub use site::SiteAnalyzer;

use serde::{Deserialize, Serialize};

/// Selector recorded for the detail page episode list
pub const EPISODE_LIST_SELECTOR: &str = r#"a[href*="episode"]"#;

/// Selector recorded for the episode page video element
pub const VIDEO_SELECTOR: &str = "iframe[src]";

/// Everything learned about a site during one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    /// Base URL the analysis started from
    pub base_url: String,
    /// Homepage card container findings
    pub homepage: Option<HomepageInfo>,
    /// Search result findings
    pub search: Option<SearchInfo>,
    /// Detail page findings
    pub detail: Option<DetailInfo>,
    /// Episode page findings
    pub episode: Option<EpisodeInfo>,
    /// Embedded video hosts seen on the episode page
    pub video_hosts: HostTally,
}

impl AnalysisResult {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sample item URL for the detail stage, homepage first
    pub fn detail_source_url(&self) -> Option<&str> {
        self.homepage
            .as_ref()
            .and_then(|h| h.sample_item_url.as_deref())
            .or_else(|| self.search.as_ref().and_then(|s| s.sample_result_url.as_deref()))
    }

    /// Sample episode URL for the episode stage
    pub fn episode_source_url(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.sample_subitem_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HomepageInfo {
    /// Tag plus space-joined classes of the chosen container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_link_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_image_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_title_tag: Option<String>,
    /// Absolute URL of the first card link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_item_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_link_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_result_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailInfo {
    /// Always [`EPISODE_LIST_SELECTOR`] when episode links were found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_list_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_subitem_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis_selector: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EpisodeInfo {
    /// Always [`VIDEO_SELECTOR`] when a video element was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_selector: Option<String>,
}
