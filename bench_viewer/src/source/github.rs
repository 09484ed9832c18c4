use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::Url;

use crate::config::ViewerConfig;
use crate::source::{BenchmarkSource, RemoteFile, SourceError};

const USER_AGENT: &str = concat!("bench-viewer/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Lists and downloads result files through the GitHub contents API.
///
/// Each os label is a top-level directory on the configured branch; the
/// listing is requested from `{api}/repos/{owner}/{name}/contents/{label}?ref={branch}`.
pub struct GitHubSource {
    client: Client,
    base_url: Url,
    owner: String,
    name: String,
    branch: String,
}

impl GitHubSource {
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        let (owner, name) = config.repository_parts()?;
        let base_url = Url::parse(&config.api_base_url)
            .with_context(|| format!("Invalid API base URL '{}'", config.api_base_url))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(GitHubSource {
            client,
            base_url,
            owner: owner.to_string(),
            name: name.to_string(),
            branch: config.branch.clone(),
        })
    }

    fn listing_url(&self, os_label: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend([
                "repos",
                self.owner.as_str(),
                self.name.as_str(),
                "contents",
                os_label,
            ]);
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }
}

impl BenchmarkSource for GitHubSource {
    fn list_directory(&self, os_label: &str) -> Result<Vec<RemoteFile>, SourceError> {
        let url = self.listing_url(os_label)?;
        log::debug!("Listing {}", url);

        let response = self.client.get(url).header(ACCEPT, GITHUB_JSON).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::ListingUnavailable {
                label: os_label.to_string(),
                status: status.to_string(),
            });
        }

        Ok(response.json()?)
    }

    fn download(&self, url: &str) -> Result<String, SourceError> {
        log::debug!("Downloading {}", url);

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::DownloadFailed {
                url: url.to_string(),
                status: status.to_string(),
            });
        }

        Ok(response.text()?)
    }
}
