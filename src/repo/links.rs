//! Raw GitHub download links for every file under a folder

use crate::config::RepoConfig;
use anyhow::{anyhow, Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Rendered link list
#[derive(Debug, Clone, Default)]
pub struct RawLinkList {
    pub text: String,
    pub paths: Vec<String>,
}

impl RawLinkList {
    pub fn total_files(&self) -> usize {
        self.paths.len()
    }
}

/// `raw.githubusercontent.com` URL of `path` in the configured repository
pub fn raw_url(config: &RepoConfig, path: &str) -> String {
    format!(
        "https://raw.githubusercontent.com/{}/{}/{}/{}",
        config.github_username, config.github_repo, config.branch, path
    )
}

/// List every file under `root`, a directory's own files before its
/// subdirectories, each group in name order.
pub fn render_links(root: &Path, config: &RepoConfig) -> Result<RawLinkList> {
    if !root.is_dir() {
        return Err(anyhow!("Folder not found: {}", root.display()));
    }

    let rule = "=".repeat(50);
    let mut list = RawLinkList::default();
    let _ = write!(list.text, "{rule}\nFOLDER: {}\n{rule}\n\n", root.display());

    let walker = WalkDir::new(root).sort_by(|a, b| {
        let a_is_dir = a.file_type().is_dir();
        let b_is_dir = b.file_type().is_dir();
        a_is_dir.cmp(&b_is_dir).then_with(|| a.file_name().cmp(b.file_name()))
    });

    for entry in walker {
        let entry = entry.with_context(|| format!("Cannot read {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let path = entry.path().to_string_lossy().replace('\\', "/");
        let url = raw_url(config, &path);

        let _ = write!(
            list.text,
            "{}. {}\n   Path: {}\n   URL: {}\n\n",
            list.paths.len() + 1,
            file_name,
            path,
            url
        );
        debug!("   ✓ {}", path);
        list.paths.push(path);
    }

    Ok(list)
}

/// Write the link list for `root` to `output`
pub fn generate_links(root: &Path, output: &Path, config: &RepoConfig) -> Result<RawLinkList> {
    info!("📁 Scanning {} folder...", root.display());
    let list = render_links(root, config)?;

    std::fs::write(output, &list.text).with_context(|| format!("Failed to write {}", output.display()))?;
    info!("✅ Wrote {} link(s) to {}", list.total_files(), output.display());

    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_raw_url() {
        let config = RepoConfig::default();
        assert_eq!(
            raw_url(&config, ".github/workflows/build.yml"),
            "https://raw.githubusercontent.com/cemmekx096-cmd/project69/main/.github/workflows/build.yml"
        );
    }

    #[test]
    fn test_files_come_before_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".github");
        std::fs::create_dir_all(root.join("workflows")).unwrap();
        std::fs::create_dir_all(root.join("scripts")).unwrap();
        std::fs::write(root.join("workflows/build.yml"), "").unwrap();
        std::fs::write(root.join("scripts/move-apks.py"), "").unwrap();
        std::fs::write(root.join("scripts/generate-index.py"), "").unwrap();
        std::fs::write(root.join("dependabot.yml"), "").unwrap();

        let config = RepoConfig::default();
        let list = render_links(&root, &config).unwrap();

        let relative: Vec<String> = list
            .paths
            .iter()
            .map(|p| p.rsplit(".github/").next().unwrap().to_string())
            .collect();
        assert_eq!(
            relative,
            vec![
                "dependabot.yml",
                "scripts/generate-index.py",
                "scripts/move-apks.py",
                "workflows/build.yml"
            ]
        );

        let header = format!("{rule}\nFOLDER: {}\n{rule}\n\n", root.display(), rule = "=".repeat(50));
        assert!(list.text.starts_with(&header));
        assert!(list.text.contains("1. dependabot.yml\n   Path: "));
        assert!(list.text.contains("4. build.yml\n"));
        assert!(list.text.ends_with("/.github/workflows/build.yml\n\n"));
    }

    #[test]
    fn test_generate_links_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".github");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("FUNDING.yml"), "").unwrap();
        let output = temp_dir.path().join("links_github.txt");

        let list = generate_links(&root, &output, &RepoConfig::default()).unwrap();

        assert_eq!(list.total_files(), 1);
        assert_eq!(std::fs::read_to_string(output).unwrap(), list.text);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(render_links(&temp_dir.path().join(".github"), &RepoConfig::default()).is_err());
    }
}
