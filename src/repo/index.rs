//! Extension index generation from built APKs

use crate::report::title_case;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Package prefix shared by every anime extension
pub const PACKAGE_PREFIX: &str = "eu.kanade.tachiyomi.animeextension";

/// Entry every APK must contain to be considered valid
const MANIFEST_ENTRY: &str = "AndroidManifest.xml";

/// One extension as listed in `index.min.json`; field order is the output order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtensionEntry {
    pub name: String,
    pub pkg: String,
    pub apk: String,
    pub lang: String,
    pub code: u64,
    pub version: String,
    pub nsfw: bool,
}

/// Outcome of an index run
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub extensions: Vec<ExtensionEntry>,
    pub failed: Vec<String>,
    pub index_path: PathBuf,
    pub pretty_path: PathBuf,
}

impl IndexReport {
    /// Extension counts per language, keyed by language code
    pub fn by_language(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for extension in &self.extensions {
            *counts.entry(extension.lang.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Printable summary with one line per language
    pub fn summary(&self) -> String {
        let mut lines = vec!["=".repeat(50), "SUMMARY".to_string(), "=".repeat(50)];
        for (lang, count) in self.by_language() {
            lines.push(format!("{}: {} extension(s)", lang.to_uppercase(), count));
        }
        lines.push("=".repeat(50));
        lines.join("\n")
    }
}

/// Naming scheme of release APKs: `lang.name-vX.Y.Z.apk`
const FILE_NAME_PATTERN: &str = r"^(\w+)\.(\w+)-v?([\d.]+)\.apk";

/// Build an index entry from an APK file name like `id.anichin-v1.0.0.apk`
pub fn parse_apk_file_name(file_name: &str) -> Option<ExtensionEntry> {
    let re = Regex::new(FILE_NAME_PATTERN).ok()?;
    let captures = re.captures(file_name)?;
    let lang = captures.get(1)?.as_str();
    let name = captures.get(2)?.as_str();
    let version = captures.get(3)?.as_str();

    let code = version.replace('.', "").parse::<u64>().ok()?;

    Some(ExtensionEntry {
        name: title_case(&name.replace('_', " ")),
        pkg: format!("{}.{}.{}", PACKAGE_PREFIX, lang, name),
        apk: file_name.to_string(),
        lang: lang.to_string(),
        code,
        version: version.to_string(),
        nsfw: false,
    })
}

/// Read one APK, checking that it is an archive with a manifest
fn extract_apk_info(path: &Path) -> Result<ExtensionEntry> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| anyhow!("zip open failed: {}", e))?;
    archive
        .by_name(MANIFEST_ENTRY)
        .map_err(|e| anyhow!("{} missing: {}", MANIFEST_ENTRY, e))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Non UTF-8 file name: {}", path.display()))?;

    parse_apk_file_name(file_name).ok_or_else(|| anyhow!("Unrecognized APK file name: {}", file_name))
}

/// APK files directly inside `apk_dir`, in file name order
fn list_apk_files(apk_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut apk_files = Vec::new();

    for entry in WalkDir::new(apk_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Cannot read {}", apk_dir.display()))?;
        let is_apk = entry.file_type().is_file()
            && entry.file_name().to_str().is_some_and(|name| name.ends_with(".apk"));

        if is_apk {
            apk_files.push(entry.into_path());
        }
    }

    Ok(apk_files)
}

/// Generate `index.min.json` and `index.json` for every APK in `apk_dir`.
///
/// Files that are not valid archives, lack a manifest or do not follow the
/// `lang.name-vX.Y.Z.apk` naming scheme are reported and left out.
pub fn generate_index(apk_dir: &Path, output_dir: &Path) -> Result<IndexReport> {
    if !apk_dir.is_dir() {
        return Err(anyhow!("APK directory not found: {}", apk_dir.display()));
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;

    let apk_files = list_apk_files(apk_dir)?;
    info!("📦 Found {} APK files", apk_files.len());

    let mut report = IndexReport {
        index_path: output_dir.join("index.min.json"),
        pretty_path: output_dir.join("index.json"),
        ..Default::default()
    };

    for apk_path in &apk_files {
        let display_name = apk_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Processing: {}", display_name);

        match extract_apk_info(apk_path) {
            Ok(entry) => {
                info!("  ✓ {} v{}", entry.name, entry.version);
                report.extensions.push(entry);
            }
            Err(e) => {
                warn!("  ✗ Failed to parse {}: {}", display_name, e);
                report.failed.push(display_name);
            }
        }
    }

    report.extensions.sort_by(|a, b| a.name.cmp(&b.name));

    std::fs::write(&report.index_path, serde_json::to_string(&report.extensions)?)
        .with_context(|| format!("Failed to write {}", report.index_path.display()))?;
    info!("✅ Generated {}", report.index_path.display());
    info!("   Total extensions: {}", report.extensions.len());

    std::fs::write(&report.pretty_path, serde_json::to_string_pretty(&report.extensions)?)
        .with_context(|| format!("Failed to write {}", report.pretty_path.display()))?;
    info!("✅ Generated {} (pretty)", report.pretty_path.display());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_apk(dir: &Path, file_name: &str, with_manifest: bool) {
        let file = File::create(dir.join(file_name)).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        let entry = if with_manifest { MANIFEST_ENTRY } else { "classes.dex" };
        writer.start_file(entry, options).unwrap();
        writer.write_all(b"binary").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_parse_apk_file_name() {
        let entry = parse_apk_file_name("id.anime_indo-v1.4.12.apk").unwrap();

        assert_eq!(entry.name, "Anime Indo");
        assert_eq!(entry.pkg, "eu.kanade.tachiyomi.animeextension.id.anime_indo");
        assert_eq!(entry.apk, "id.anime_indo-v1.4.12.apk");
        assert_eq!(entry.lang, "id");
        assert_eq!(entry.code, 1412);
        assert_eq!(entry.version, "1.4.12");
        assert!(!entry.nsfw);

        let without_v = parse_apk_file_name("en.gogo-2.0.apk").unwrap();
        assert_eq!(without_v.version, "2.0");
        assert_eq!(without_v.code, 20);

        assert!(parse_apk_file_name("anichin.apk").is_none());
        assert!(parse_apk_file_name("id.anichin-debug.apk").is_none());
    }

    #[test]
    fn test_entry_field_order() {
        let entry = parse_apk_file_name("id.anichin-v1.0.0.apk").unwrap();
        let json = serde_json::to_string(&entry).unwrap();

        assert_eq!(
            json,
            r#"{"name":"Anichin","pkg":"eu.kanade.tachiyomi.animeextension.id.anichin","apk":"id.anichin-v1.0.0.apk","lang":"id","code":100,"version":"1.0.0","nsfw":false}"#
        );
    }

    #[test]
    fn test_generate_index() {
        let apk_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let output = output_dir.path().join("repo");

        write_apk(apk_dir.path(), "id.zoronime-v1.0.3.apk", true);
        write_apk(apk_dir.path(), "en.allanime-v2.1.apk", true);
        write_apk(apk_dir.path(), "id.broken-v1.0.0.apk", false);
        write_apk(apk_dir.path(), "notes.apk", true);
        std::fs::write(apk_dir.path().join("id.fake-v1.0.0.apk"), b"not a zip").unwrap();
        std::fs::write(apk_dir.path().join("README.md"), b"ignored").unwrap();

        let report = generate_index(apk_dir.path(), &output).unwrap();

        let names: Vec<&str> = report.extensions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Allanime", "Zoronime"]);
        assert_eq!(
            report.failed,
            vec!["id.broken-v1.0.0.apk", "id.fake-v1.0.0.apk", "notes.apk"]
        );

        let compact = std::fs::read_to_string(output.join("index.min.json")).unwrap();
        assert!(!compact.contains('\n'));
        let parsed: Vec<ExtensionEntry> = serde_json::from_str(&compact).unwrap();
        assert_eq!(parsed, report.extensions);

        let pretty = std::fs::read_to_string(output.join("index.json")).unwrap();
        assert!(pretty.starts_with("[\n  {\n    \"name\": \"Allanime\""));

        let summary = report.summary();
        assert!(summary.contains("EN: 1 extension(s)"));
        assert!(summary.contains("ID: 1 extension(s)"));
        assert!(summary.find("EN:").unwrap() < summary.find("ID:").unwrap());
    }

    #[test]
    fn test_missing_apk_dir_is_an_error() {
        let output_dir = TempDir::new().unwrap();
        let missing = output_dir.path().join("nope");

        assert!(generate_index(&missing, output_dir.path()).is_err());
    }
}
