use anyhow::{bail, Context, Result};
use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_BRANCH, DEFAULT_FILE_EXTENSION, DEFAULT_ON_FILE_ERROR,
    DEFAULT_OS_LABELS, DEFAULT_REPOSITORY, DEFAULT_REQUEST_TIMEOUT_SECONDS,
};

use bench_viewer_cli_types::CliSource;

/// Name of the per-project configuration file, searched upward from the
/// working directory.
pub const LOCAL_CONFIG_FILE_NAME: &str = ".benchviewerconfig";

/// What to do when a single result file cannot be downloaded or parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFailurePolicy {
    /// The failure ends the whole run
    Abort,
    /// The file is skipped with a warning
    Skip,
}

impl FileFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFailurePolicy::Abort => "abort",
            FileFailurePolicy::Skip => "skip",
        }
    }
}

impl From<bench_viewer_cli_types::FileFailurePolicy> for FileFailurePolicy {
    fn from(policy: bench_viewer_cli_types::FileFailurePolicy) -> Self {
        match policy {
            bench_viewer_cli_types::FileFailurePolicy::Abort => FileFailurePolicy::Abort,
            bench_viewer_cli_types::FileFailurePolicy::Skip => FileFailurePolicy::Skip,
        }
    }
}

/// Where and how benchmark result files are fetched
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewerConfig {
    /// Repository as `owner/name`
    pub repository: String,
    pub branch: String,
    /// One remote directory per label, listed in this order
    pub os_labels: Vec<String>,
    pub api_base_url: String,
    pub file_extension: String,
    pub on_file_error: FileFailurePolicy,
    pub request_timeout_seconds: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            repository: DEFAULT_REPOSITORY.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            os_labels: DEFAULT_OS_LABELS.iter().map(|l| l.to_string()).collect(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            on_file_error: FileFailurePolicy::Abort,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl ViewerConfig {
    /// Owner and name parts of the repository
    pub fn repository_parts(&self) -> Result<(&str, &str)> {
        match self.repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok((owner, name))
            }
            _ => bail!(
                "Invalid repository '{}', expected 'owner/name'",
                self.repository
            ),
        }
    }

    fn validate(&self) -> Result<()> {
        self.repository_parts()?;
        if self.os_labels.is_empty() {
            bail!("At least one os label must be configured");
        }
        if self.os_labels.iter().any(|l| l.trim().is_empty()) {
            bail!("Os labels must not be empty");
        }
        if self.file_extension.is_empty() {
            bail!("The file extension must not be empty");
        }
        Ok(())
    }
}

/// Values given on the command line, taking precedence over all files
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub os_labels: Vec<String>,
    pub api_base_url: Option<String>,
    pub file_extension: Option<String>,
    pub on_file_error: Option<FileFailurePolicy>,
}

impl From<CliSource> for ConfigOverrides {
    fn from(source: CliSource) -> Self {
        ConfigOverrides {
            repository: source.repository,
            branch: source.branch,
            os_labels: source.os_labels,
            api_base_url: source.api_url,
            file_extension: source.extension,
            on_file_error: source.on_file_error.map(FileFailurePolicy::from),
        }
    }
}

/// Path of the user-wide config (XDG_CONFIG_HOME or ~/.config/bench-viewer/config.toml)
pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
        return Some(
            Path::new(&xdg_config_home)
                .join("bench-viewer")
                .join("config.toml"),
        );
    }
    dirs_next::home_dir().map(|home| home.join(".config").join("bench-viewer").join("config.toml"))
}

/// Nearest local config file, searched upward from `start`
pub fn find_local_config_path(start: &Path) -> Option<PathBuf> {
    let mut current_dir = start.to_path_buf();
    loop {
        let candidate = current_dir.join(LOCAL_CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current_dir.pop() {
            return None;
        }
    }
}

/// Config files in increasing precedence. Files need not exist.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(user_path) = user_config_path() {
        paths.push(user_path);
    }
    if let Some(local_path) = env::current_dir()
        .ok()
        .and_then(|dir| find_local_config_path(&dir))
    {
        paths.push(local_path);
    }
    paths
}

/// Read hierarchical configuration (defaults -> files -> overrides)
pub fn read_hierarchical_config(
    files: &[PathBuf],
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    let mut builder = Config::builder()
        .set_default("repository", DEFAULT_REPOSITORY)?
        .set_default("branch", DEFAULT_BRANCH)?
        .set_default("os_labels", DEFAULT_OS_LABELS.to_vec())?
        .set_default("api_base_url", DEFAULT_API_BASE_URL)?
        .set_default("file_extension", DEFAULT_FILE_EXTENSION)?
        .set_default("on_file_error", DEFAULT_ON_FILE_ERROR)?
        .set_default(
            "request_timeout_seconds",
            DEFAULT_REQUEST_TIMEOUT_SECONDS as i64,
        )?;

    for file in files {
        builder = builder.add_source(
            File::from(file.as_path())
                .format(FileFormat::Toml)
                .required(false),
        );
    }

    builder = builder
        .set_override_option("repository", overrides.repository.clone())?
        .set_override_option("branch", overrides.branch.clone())?
        .set_override_option("api_base_url", overrides.api_base_url.clone())?
        .set_override_option("file_extension", overrides.file_extension.clone())?
        .set_override_option(
            "on_file_error",
            overrides.on_file_error.map(|p| p.as_str()),
        )?;

    if !overrides.os_labels.is_empty() {
        builder = builder.set_override("os_labels", overrides.os_labels.clone())?;
    }

    builder.build()
}

/// Build and validate the configuration from the given files and overrides
pub fn build_viewer_config(files: &[PathBuf], overrides: &ConfigOverrides) -> Result<ViewerConfig> {
    let config = read_hierarchical_config(files, overrides)
        .context("Failed to read bench-viewer configuration")?;
    let viewer_config: ViewerConfig = config
        .try_deserialize()
        .context("Invalid bench-viewer configuration")?;
    viewer_config.validate()?;
    Ok(viewer_config)
}

/// Load the configuration from the standard config file locations
pub fn load_config(overrides: &ConfigOverrides) -> Result<ViewerConfig> {
    let files = config_file_paths();
    log::debug!("Reading configuration from {:?}", files);
    build_viewer_config(&files, overrides)
}
