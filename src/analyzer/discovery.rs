//! Heuristics run against a parsed page
//!
//! Every function here is pure: it only queries the document it is given and
//! returns `None` when nothing qualifies. A miss is never an error.

use super::hosts::classify_host;
use super::selector::{container_query, container_selector, selector_path};
use super::{DetailInfo, EpisodeInfo, HomepageInfo, SearchInfo, EPISODE_LIST_SELECTOR, VIDEO_SELECTOR};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Minimum links and images a card container must hold
pub const MIN_CARD_COUNT: usize = 3;

/// Minimum stripped text length of a synopsis block
pub const MIN_SYNOPSIS_LENGTH: usize = 100;

const CONTAINER_TAGS: &str = "div[class], section[class], ul[class], article[class]";
const TITLE_TAGS: &str = "h1, h2, h3, h4, span, div";
const EPISODE_HREF_MARKERS: &[&str] = &["episode", "eps", "ep-", "/e/"];
const SEARCH_TEXT_KEYWORDS: &[&str] = &["episode", "eps"];
const SYNOPSIS_KEYWORDS: &[&str] = &["story", "sinopsis", "synopsis", "cerita"];

/// An element holding enough links and images to look like a card grid
#[derive(Debug, Clone)]
pub struct ContainerCandidate<'a> {
    pub element: ElementRef<'a>,
    pub links: usize,
    pub images: usize,
}

impl ContainerCandidate<'_> {
    pub fn score(&self) -> usize {
        self.links + self.images
    }

    pub fn selector(&self) -> String {
        container_selector(&self.element)
    }
}

/// Resolve an href against the site base URL
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    base.join(href).ok().map(|url| url.to_string())
}

/// Text of an element with every text node trimmed and glued together
pub fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// All qualifying card containers, in document order
pub fn container_candidates(document: &Html) -> Vec<ContainerCandidate<'_>> {
    let (Ok(containers), Ok(links), Ok(images)) = (
        Selector::parse(CONTAINER_TAGS),
        Selector::parse("a[href]"),
        Selector::parse("img[src]"),
    ) else {
        return Vec::new();
    };

    document
        .select(&containers)
        .filter(|element| {
            element
                .value()
                .attr("class")
                .is_some_and(|classes| !classes.trim().is_empty())
        })
        .map(|element| ContainerCandidate {
            element,
            links: element.select(&links).count(),
            images: element.select(&images).count(),
        })
        .filter(|candidate| candidate.links >= MIN_CARD_COUNT && candidate.images >= MIN_CARD_COUNT)
        .collect()
}

/// The highest scoring container; the earliest one wins a tie
pub fn best_container(document: &Html) -> Option<ContainerCandidate<'_>> {
    let mut best: Option<ContainerCandidate> = None;

    for candidate in container_candidates(document) {
        debug!(
            "Container {} | links: {} images: {}",
            candidate.selector(),
            candidate.links,
            candidate.images
        );
        if best.as_ref().map_or(true, |b| candidate.score() > b.score()) {
            best = Some(candidate);
        }
    }

    best
}

/// Find the card container of a homepage and describe its first card
pub fn discover_homepage(document: &Html, base: &Url) -> Option<HomepageInfo> {
    let best = best_container(document)?;
    let mut info = HomepageInfo {
        container_selector: Some(best.selector()),
        ..Default::default()
    };

    // The container is looked up again by its selector, which may land on an
    // earlier element sharing the same classes.
    let query = container_query(&best.selector());
    let Ok(requery) = Selector::parse(&query) else {
        debug!("Container selector '{}' does not parse, skipping card details", query);
        return Some(info);
    };
    let Some(container) = document.select(&requery).next() else {
        return Some(info);
    };

    let (Ok(links), Ok(images), Ok(titles)) = (
        Selector::parse("a[href]"),
        Selector::parse("img[src]"),
        Selector::parse(TITLE_TAGS),
    ) else {
        return Some(info);
    };

    if let Some(link) = container.select(&links).next() {
        info.card_link_selector = Some(selector_path(&link));
        info.sample_item_url = link.value().attr("href").and_then(|href| resolve_url(base, href));
        info.card_title_tag = link
            .select(&titles)
            .next()
            .map(|title| title.value().name().to_string());
    }

    if let Some(image) = container.select(&images).next() {
        info.card_image_selector = Some(selector_path(&image));
    }

    Some(info)
}

/// Pick the first link of a search result page that looks like a result
pub fn discover_search(document: &Html, base: &Url, query: &str) -> Option<SearchInfo> {
    let links = Selector::parse("a[href]").ok()?;
    let query = query.to_lowercase();

    let first = document.select(&links).find(|link| {
        let href = link.value().attr("href").unwrap_or_default().to_lowercase();
        if href.contains("anime") {
            return true;
        }
        let text = link.text().collect::<String>().to_lowercase();
        SEARCH_TEXT_KEYWORDS
            .iter()
            .any(|keyword| text.contains(keyword))
            || text.contains(&query)
    })?;

    Some(SearchInfo {
        result_link_selector: Some(selector_path(&first)),
        sample_result_url: first.value().attr("href").and_then(|href| resolve_url(base, href)),
    })
}

/// Look for episode links and a synopsis block on a detail page
pub fn discover_detail(document: &Html, base: &Url) -> Option<DetailInfo> {
    let mut info = DetailInfo::default();

    if let Ok(links) = Selector::parse("a[href]") {
        let first_episode = document.select(&links).find(|link| {
            let href = link.value().attr("href").unwrap_or_default().to_lowercase();
            EPISODE_HREF_MARKERS.iter().any(|marker| href.contains(marker))
        });

        if let Some(link) = first_episode {
            info.episode_list_selector = Some(EPISODE_LIST_SELECTOR.to_string());
            info.sample_subitem_url = link.value().attr("href").and_then(|href| resolve_url(base, href));
        }
    }

    if let Ok(blocks) = Selector::parse("p[class], div[class]") {
        let synopsis = document
            .select(&blocks)
            .filter(|block| {
                block
                    .value()
                    .attr("class")
                    .is_some_and(|classes| !classes.trim().is_empty())
            })
            .find(|block| {
                let text = stripped_text(block);
                if text.chars().count() <= MIN_SYNOPSIS_LENGTH {
                    return false;
                }
                let lowered = text.to_lowercase();
                SYNOPSIS_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
            });

        if let Some(block) = synopsis {
            info.synopsis_selector = Some(selector_path(&block));
        }
    }

    if info == DetailInfo::default() {
        None
    } else {
        Some(info)
    }
}

/// Sources of embedded players: iframes first, then embed and video elements
pub fn video_sources(document: &Html) -> Vec<String> {
    let mut sources = Vec::new();

    for css in ["iframe[src]", "embed[src], video[src]"] {
        if let Ok(selector) = Selector::parse(css) {
            sources.extend(
                document
                    .select(&selector)
                    .filter_map(|element| element.value().attr("src"))
                    .map(str::to_string),
            );
        }
    }

    sources
}

/// Find embedded players and label their hosts.
///
/// Returns the episode info (present when any player element exists) and one
/// host label per source that could be classified.
pub fn discover_episode(document: &Html) -> (Option<EpisodeInfo>, Vec<String>) {
    let sources = video_sources(document);
    if sources.is_empty() {
        return (None, Vec::new());
    }

    let labels = sources.iter().filter_map(|src| classify_host(src)).collect();
    let info = EpisodeInfo {
        video_selector: Some(VIDEO_SELECTOR.to_string()),
    };

    (Some(info), labels)
}
