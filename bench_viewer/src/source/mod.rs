//! Remote locations benchmark result files are fetched from
//!
//! A [`BenchmarkSource`] lists the result files of one os label and downloads
//! single files. [`github::GitHubSource`] talks to the GitHub contents API.

pub mod github;

use serde::Deserialize;

pub use github::GitHubSource;

/// Entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    /// Raw content location; absent for sub-directories
    #[serde(default)]
    pub download_url: Option<String>,
}

impl RemoteFile {
    pub fn new(name: impl Into<String>, download_url: impl Into<String>) -> Self {
        RemoteFile {
            name: name.into(),
            download_url: Some(download_url.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Listing of directory '{label}' failed: {status}")]
    ListingUnavailable { label: String, status: String },

    #[error("Download of {url} failed: {status}")]
    DownloadFailed { url: String, status: String },

    #[error("Cannot build request URL from API base URL '{url}'")]
    InvalidBaseUrl { url: String },

    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),
}

pub trait BenchmarkSource {
    /// List the directory belonging to `os_label`.
    ///
    /// A non-success response yields [`SourceError::ListingUnavailable`].
    fn list_directory(&self, os_label: &str) -> Result<Vec<RemoteFile>, SourceError>;

    /// Download the raw content of a result file.
    fn download(&self, url: &str) -> Result<String, SourceError>;
}
