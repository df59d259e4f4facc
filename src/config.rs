use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Config files tried in order
pub const CONFIG_PATHS: &[&str] = &["aniext.toml", "config/aniext.toml"];

/// Where a configuration was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Environment => write!(f, "defaults and ANIEXT_* environment"),
        }
    }
}

/// Configuration for the site analyzer and repository tools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site analysis settings
    pub analyzer: AnalyzerConfig,

    /// Output and logging settings
    pub output: OutputConfig,

    /// Extension repository settings
    pub repo: RepoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// User agent sent with every page request
    pub user_agent: String,

    /// Timeout for a single page fetch (seconds)
    pub timeout_seconds: u64,

    /// Query term used for the search page analysis
    pub search_query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the analysis report and JSON
    pub output_dir: PathBuf,

    /// Write the JSON companion next to the text report
    pub write_json: bool,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// GitHub account owning the extension repository
    pub github_username: String,

    /// Repository name
    pub github_repo: String,

    /// Branch used for raw content links
    pub branch: String,

    /// Folder walked by the link list generator
    pub links_root: PathBuf,

    /// Output file of the link list generator
    pub links_output: PathBuf,

    /// Root searched for built APKs
    pub apk_source_dir: PathBuf,

    /// Flat directory receiving copied APKs
    pub apk_output_dir: PathBuf,

    /// Path fragment identifying release builds
    pub release_marker: String,

    /// Entry names never shown by the tree printer
    pub tree_ignore: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_seconds: 10,
            search_query: "naruto".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            write_json: true,
            log_level: "info".to_string(),
        }
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            github_username: "cemmekx096-cmd".to_string(),
            github_repo: "project69".to_string(),
            branch: "main".to_string(),
            links_root: PathBuf::from(".github"),
            links_output: PathBuf::from("links_github.txt"),
            apk_source_dir: PathBuf::from("src"),
            apk_output_dir: PathBuf::from("apk-files"),
            release_marker: "release".to_string(),
            tree_ignore: vec![
                ".git".to_string(),
                "build".to_string(),
                "target".to_string(),
                ".gradle".to_string(),
            ],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            output: OutputConfig::default(),
            repo: RepoConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, else from the
    /// environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_PATHS).map(|(config, _)| config)
    }

    /// Load from the first readable file in `paths`.
    ///
    /// A file that exists but does not parse is an error rather than a reason
    /// to fall back to defaults.
    pub fn load_from<P: AsRef<Path>>(paths: &[P]) -> Result<(Self, ConfigSource)> {
        for path in paths {
            let path = path.as_ref();
            if let Ok(config_str) = std::fs::read_to_string(path) {
                let config = toml::from_str(&config_str)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?;
                return Ok((config, ConfigSource::File(path.to_path_buf())));
            }
        }

        Ok((Self::from_env()?, ConfigSource::Environment))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("ANIEXT_TIMEOUT") {
            config.analyzer.timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("ANIEXT_TIMEOUT must be a number of seconds, got '{}'", timeout))?;
        }

        if let Ok(query) = std::env::var("ANIEXT_SEARCH_QUERY") {
            config.analyzer.search_query = query;
        }

        if let Ok(user_agent) = std::env::var("ANIEXT_USER_AGENT") {
            config.analyzer.user_agent = user_agent;
        }

        if let Ok(output_dir) = std::env::var("ANIEXT_OUTPUT_DIR") {
            config.output.output_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("ANIEXT_LOG_LEVEL") {
            config.output.log_level = log_level;
        }

        if let Ok(username) = std::env::var("ANIEXT_GITHUB_USER") {
            config.repo.github_username = username;
        }

        if let Ok(repo) = std::env::var("ANIEXT_GITHUB_REPO") {
            config.repo.github_repo = repo;
        }

        if let Ok(branch) = std::env::var("ANIEXT_BRANCH") {
            config.repo.branch = branch;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_analyzer()?;
        self.validate_repo()
    }

    /// Validate only the settings a site analysis uses
    pub fn validate_analyzer(&self) -> Result<()> {
        if self.analyzer.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        if self.analyzer.search_query.trim().is_empty() {
            return Err(anyhow!("search_query must not be empty"));
        }

        Ok(())
    }

    /// Validate the repository coordinates used for raw links
    pub fn validate_repo(&self) -> Result<()> {
        if self.repo.github_username.is_empty() || self.repo.github_repo.is_empty() {
            return Err(anyhow!("github_username and github_repo are required"));
        }

        if self.repo.branch.is_empty() {
            return Err(anyhow!("branch must not be empty"));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Analyzer Configuration:\n\
            - Timeout: {}s\n\
            - Search Query: {}\n\
            - Output Directory: {}\n\
            - Repository: {}/{}@{}",
            self.analyzer.timeout_seconds,
            self.analyzer.search_query,
            self.output.output_dir.display(),
            self.repo.github_username,
            self.repo.github_repo,
            self.repo.branch,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.analyzer.timeout_seconds = seconds;
        self
    }

    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.config.analyzer.search_query = query.into();
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.output_dir = dir;
        self
    }

    pub fn with_repository(mut self, username: impl Into<String>, repo: impl Into<String>) -> Self {
        self.config.repo.github_username = username.into();
        self.config.repo.github_repo = repo.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.config.repo.branch = branch.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
