use anyhow::Result;
use aniext_tools::init_with_config;
use aniext_tools::repo::{self, TreeOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "repo-tools")]
#[command(about = "Extension repository maintenance utility")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate index.min.json and index.json from a folder of APKs
    Index {
        /// Folder containing the release APKs
        apk_dir: PathBuf,
        /// Folder the index files are written to
        output_dir: PathBuf,
    },
    /// Copy release APKs from the build tree into one folder
    MoveApks {
        /// Build tree to search (defaults to the configured source dir)
        #[arg(long)]
        source: Option<PathBuf>,
        /// Destination folder (defaults to the configured APK dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write raw GitHub links for every file under a folder
    Links {
        /// Folder to scan (defaults to the configured links root)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Output file (defaults to the configured links output)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the directory tree
    Tree {
        /// Directory to print
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Include hidden entries
        #[arg(short, long)]
        all: bool,
        /// Maximum depth to descend to
        #[arg(long)]
        max_depth: Option<usize>,
        /// Also write the tree to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = init_with_config(cli.verbose)?;

    match cli.command {
        Commands::Index { apk_dir, output_dir } => {
            let report = repo::generate_index(&apk_dir, &output_dir)?;

            if !report.failed.is_empty() {
                warn!("⚠️ {} APK(s) could not be parsed", report.failed.len());
            }
            println!("\n{}", report.summary());
        }
        Commands::MoveApks { source, output } => {
            let source = source.unwrap_or_else(|| config.repo.apk_source_dir.clone());
            let output = output.unwrap_or_else(|| config.repo.apk_output_dir.clone());

            info!("🔍 Finding APK files in {}...", source.display());
            let apks = repo::find_release_apks(&source, &config.repo.release_marker);
            info!("Found {} APK file(s)", apks.len());

            if apks.is_empty() {
                warn!("⚠️ No APKs found! Make sure you've built the extensions first.");
                return Ok(());
            }

            let copied = repo::organize_apks(&apks, &output)?;
            info!("✅ Successfully organized {} APK(s)", copied.len());
            info!("📂 Output directory: {}", output.display());

            println!("{}", "=".repeat(60));
            println!("ORGANIZED FILES");
            println!("{}", "=".repeat(60));
            for apk in &copied {
                println!("{}", apk.summary_line());
            }
            println!("{}", "=".repeat(60));
        }
        Commands::Links { root, output } => {
            let root = root.unwrap_or_else(|| config.repo.links_root.clone());
            let output = output.unwrap_or_else(|| config.repo.links_output.clone());

            config.validate_repo()?;
            let list = repo::generate_links(&root, &output, &config.repo)?;

            println!("{}", "=".repeat(50));
            println!("📊 Total files: {}", list.total_files());
            println!("📄 Output file: {}", output.display());
        }
        Commands::Tree {
            dir,
            all,
            max_depth,
            output,
        } => {
            let options = TreeOptions {
                show_hidden: all,
                max_depth,
                ignore: config.repo.tree_ignore.clone(),
            };

            let tree = repo::render_tree(&dir, &options)?;
            print!("{}", tree.text);

            if let Some(path) = output {
                std::fs::write(&path, &tree.text)?;
                info!("💾 Tree saved to: {}", path.display());
            }
        }
    }

    Ok(())
}
