//! Collects release APKs from the build tree into one flat directory

use super::BYTES_PER_MB;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// An APK copied into the output directory
#[derive(Debug, Clone, PartialEq)]
pub struct CopiedApk {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub size_bytes: u64,
}

impl CopiedApk {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    /// `name (X.XX MB)` line for the organizer summary
    pub fn summary_line(&self) -> String {
        let name = self
            .destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{} ({:.2} MB)", name, self.size_mb())
    }
}

/// Whether a directory between `source_dir` and the file is named `release_marker`
fn is_release_build(path: &Path, source_dir: &Path, release_marker: &str) -> bool {
    let Ok(relative) = path.strip_prefix(source_dir) else {
        return false;
    };

    relative
        .parent()
        .is_some_and(|dirs| dirs.components().any(|component| component.as_os_str() == release_marker))
}

/// Every `*.apk` below `source_dir` built into a `release_marker` directory
pub fn find_release_apks(source_dir: &Path, release_marker: &str) -> Vec<PathBuf> {
    if !source_dir.exists() {
        warn!("⚠️ Source directory not found: {}", source_dir.display());
        return Vec::new();
    }

    WalkDir::new(source_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "apk"))
        .filter(|entry| is_release_build(entry.path(), source_dir, release_marker))
        .map(|entry| entry.into_path())
        .collect()
}

/// Copy each APK into `output_dir` under its own file name.
///
/// Files sharing a name overwrite each other, the last one wins. The output
/// directory is only created when there is something to copy.
pub fn organize_apks(apks: &[PathBuf], output_dir: &Path) -> Result<Vec<CopiedApk>> {
    if apks.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;

    let mut copied = Vec::with_capacity(apks.len());

    for apk in apks {
        let Some(file_name) = apk.file_name() else {
            continue;
        };
        let destination = output_dir.join(file_name);

        info!("📋 Copying: {}", file_name.to_string_lossy());
        std::fs::copy(apk, &destination)
            .with_context(|| format!("Failed to copy {} to {}", apk.display(), destination.display()))?;

        let size_bytes = std::fs::metadata(&destination)
            .with_context(|| format!("Cannot stat {}", destination.display()))?
            .len();

        copied.push(CopiedApk {
            source: apk.clone(),
            destination,
            size_bytes,
        });
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, size: usize) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, vec![0u8; size]).unwrap();
    }

    #[test]
    fn test_only_release_apks_are_found() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");

        touch(&src, "id/anichin/build/outputs/apk/release/id.anichin-v1.0.0.apk", 10);
        touch(&src, "id/anichin/build/outputs/apk/debug/id.anichin-v1.0.0.apk", 10);
        touch(&src, "en/gogo/build/outputs/apk/release/output-metadata.json", 10);
        touch(&src, "en/gogo/build/outputs/apk/release/en.gogo-v2.0.apk", 10);

        let apks = find_release_apks(&src, "release");
        let names: Vec<String> = apks
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["en.gogo-v2.0.apk", "id.anichin-v1.0.0.apk"]);
        assert!(apks.iter().all(|p| p.to_string_lossy().contains("/release/")));
    }

    #[test]
    fn test_marker_in_checkout_path_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("release-checkout/src");

        touch(&src, "id/anichin/build/outputs/apk/debug/id.anichin-v1.0.0-debug.apk", 10);
        touch(&src, "id/anichin/build/outputs/apk/debug/id.anichin-release.apk", 10);
        assert!(find_release_apks(&src, "release").is_empty());

        touch(&src, "id/anichin/build/outputs/apk/release/id.anichin-v1.0.0.apk", 10);
        assert_eq!(find_release_apks(&src, "release").len(), 1);
    }

    #[test]
    fn test_missing_source_dir_finds_nothing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_release_apks(&temp_dir.path().join("src"), "release").is_empty());
    }

    #[test]
    fn test_organize_copies_flat() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let output = temp_dir.path().join("apk-files");

        touch(&src, "id/a/release/id.a-v1.0.apk", 1024 * 1024);
        touch(&src, "id/b/release/id.b-v1.0.apk", 512 * 1024);

        let apks = find_release_apks(&src, "release");
        let copied = organize_apks(&apks, &output).unwrap();

        assert_eq!(copied.len(), 2);
        assert!(output.join("id.a-v1.0.apk").is_file());
        assert!(output.join("id.b-v1.0.apk").is_file());
        assert_eq!(copied[0].summary_line(), "id.a-v1.0.apk (1.00 MB)");
        assert_eq!(copied[1].summary_line(), "id.b-v1.0.apk (0.50 MB)");
    }

    #[test]
    fn test_nothing_to_organize_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("apk-files");

        let copied = organize_apks(&[], &output).unwrap();

        assert!(copied.is_empty());
        assert!(!output.exists());
    }
}
