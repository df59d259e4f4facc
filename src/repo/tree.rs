//! Directory tree printer for inspecting a checkout

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// What to include in a tree listing
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Include entries whose name starts with `.`
    pub show_hidden: bool,
    /// Deepest level to descend to; `1` lists only the root's children
    pub max_depth: Option<usize>,
    /// Names skipped at every level
    pub ignore: Vec<String>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            max_depth: None,
            ignore: vec![
                ".git".to_string(),
                "build".to_string(),
                "target".to_string(),
                ".gradle".to_string(),
            ],
        }
    }
}

impl TreeOptions {
    fn includes(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if self.ignore.iter().any(|ignored| *ignored == name) {
            return false;
        }
        self.show_hidden || !name.starts_with('.')
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreeSummary {
    pub text: String,
    pub directories: usize,
    pub files: usize,
}

/// Immediate children of `dir`, directories first, each group by name
fn sorted_children(dir: &Path, options: &TreeOptions) -> Result<Vec<DirEntry>> {
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by(|a, b| {
        let a_is_dir = a.file_type().is_dir();
        let b_is_dir = b.file_type().is_dir();
        b_is_dir.cmp(&a_is_dir).then_with(|| a.file_name().cmp(b.file_name()))
    });

    let mut children = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Cannot read {}", dir.display()))?;
        if options.includes(&entry) {
            children.push(entry);
        }
    }
    Ok(children)
}

fn render_level(
    dir: &Path,
    prefix: &str,
    depth: usize,
    options: &TreeOptions,
    summary: &mut TreeSummary,
) -> Result<()> {
    if options.max_depth.is_some_and(|max| depth > max) {
        return Ok(());
    }

    let children = sorted_children(dir, options)?;
    let last_index = children.len().saturating_sub(1);

    for (index, child) in children.iter().enumerate() {
        let is_last = index == last_index;
        let connector = if is_last { "└── " } else { "├── " };
        let name = child.file_name().to_string_lossy();

        if child.file_type().is_dir() {
            summary.directories += 1;
            summary.text.push_str(&format!("{}{}{}/\n", prefix, connector, name));

            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            render_level(child.path(), &child_prefix, depth + 1, options, summary)?;
        } else {
            summary.files += 1;
            summary.text.push_str(&format!("{}{}{}\n", prefix, connector, name));
        }
    }

    Ok(())
}

/// Render the tree under `root`, ending with a directory and file count
pub fn render_tree(root: &Path, options: &TreeOptions) -> Result<TreeSummary> {
    if !root.is_dir() {
        return Err(anyhow!("Not a directory: {}", root.display()));
    }

    let mut summary = TreeSummary {
        text: format!("{}\n", root.display()),
        ..Default::default()
    };

    render_level(root, "", 1, options, &mut summary)?;

    summary.text.push_str(&format!(
        "\n{} directories, {} files\n",
        summary.directories, summary.files
    ));

    Ok(summary)
}
