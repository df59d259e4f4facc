//! Video host detection for embedded players

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Known hosts, checked in order; the first rule with a matching marker wins
const HOST_RULES: &[(&str, &[&str])] = &[
    ("StreamSB", &["streamsb", "sbembed"]),
    ("Doodstream", &["dood"]),
    ("GoogleDrive", &["drive.google", "googleapis"]),
    ("Fembed", &["fembed", "femax"]),
    ("Mp4Upload", &["mp4upload"]),
];

/// Label the hosting service behind an embed `src`.
///
/// Known services get their name; anything else is labelled with the URL's
/// network location. Returns `None` when the source has no host at all.
pub fn classify_host(src: &str) -> Option<String> {
    let lowered = src.to_lowercase();

    for (label, markers) in HOST_RULES {
        if markers.iter().any(|marker| lowered.contains(marker)) {
            return Some((*label).to_string());
        }
    }

    network_location(src.trim())
}

/// Authority of an absolute or protocol-relative URL, exactly as written
fn network_location(src: &str) -> Option<String> {
    let rest = match src.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let (scheme, rest) = src.split_once("://")?;
            let valid_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !valid_scheme {
                return None;
            }
            rest
        }
    };

    let end = rest.find(|c: char| matches!(c, '/' | '?' | '#')).unwrap_or(rest.len());
    let authority = &rest[..end];

    if authority.is_empty() {
        None
    } else {
        Some(authority.to_string())
    }
}

/// Occurrence counts per host label, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostTally {
    entries: Vec<(String, u32)>,
}

impl HostTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `label`
    pub fn record(&mut self, label: &str) {
        match self.entries.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((label.to_string(), 1)),
        }
    }

    pub fn get(&self, label: &str) -> u32 {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Labels in first-seen order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Entries by descending count; equal counts keep first-seen order
    pub fn most_common(&self) -> Vec<(&str, u32)> {
        let mut sorted: Vec<(&str, u32)> = self
            .entries
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

impl Serialize for HostTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HostTally {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TallyVisitor;

        impl<'de> Visitor<'de> for TallyVisitor {
            type Value = HostTally;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of host labels to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((label, count)) = access.next_entry::<String, u32>()? {
                    entries.push((label, count));
                }
                Ok(HostTally { entries })
            }
        }

        deserializer.deserialize_map(TallyVisitor)
    }
}
