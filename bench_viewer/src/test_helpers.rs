//! Centralized test helpers for bench-viewer
//!
//! Provides an in-memory [`BenchmarkSource`] and builders for Catch2 XML
//! reports so fetching and reshaping can be tested without network access.

use std::cell::Cell;
use std::collections::HashMap;

use crate::source::{BenchmarkSource, RemoteFile, SourceError};

/// Build a Catch2 XML report. Each entry is a test case name and its mean
/// value; `None` produces a test case without benchmark results.
pub fn catch2_report(test_cases: &[(&str, Option<&str>)]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Catch2TestRun name=\"benchmarks\">\n",
    );
    for (name, mean) in test_cases {
        xml.push_str(&format!("  <TestCase name=\"{}\">\n", name));
        if let Some(mean) = mean {
            xml.push_str(&format!(
                "    <BenchmarkResults name=\"{}\" samples=\"100\">\n      <mean value=\"{}\" lowerBound=\"0\" upperBound=\"0\" ci=\"0.95\"/>\n    </BenchmarkResults>\n",
                name, mean
            ));
        }
        xml.push_str("    <OverallResult success=\"true\"/>\n  </TestCase>\n");
    }
    xml.push_str("</Catch2TestRun>\n");
    xml
}

/// In-memory source. Labels without any registered entry behave like a
/// missing directory.
#[derive(Default)]
pub struct FakeSource {
    listings: HashMap<String, Vec<RemoteFile>>,
    unavailable: Vec<String>,
    contents: HashMap<String, String>,
    downloads: Cell<usize>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, os_label: &str, name: &str, content: &str) -> Self {
        let url = fake_url(os_label, name);
        self.contents.insert(url.clone(), content.to_string());
        self.with_entry(os_label, RemoteFile::new(name, url))
    }

    /// Listed file whose download fails
    pub fn with_failing_download(self, os_label: &str, name: &str) -> Self {
        let url = fake_url(os_label, name);
        self.with_entry(os_label, RemoteFile::new(name, url))
    }

    pub fn with_entry(mut self, os_label: &str, file: RemoteFile) -> Self {
        self.listings
            .entry(os_label.to_string())
            .or_default()
            .push(file);
        self
    }

    pub fn with_unavailable_listing(mut self, os_label: &str) -> Self {
        self.unavailable.push(os_label.to_string());
        self
    }

    /// Number of download requests served so far
    pub fn downloads(&self) -> usize {
        self.downloads.get()
    }
}

fn fake_url(os_label: &str, name: &str) -> String {
    format!("fake://{}/{}", os_label, name)
}

impl BenchmarkSource for FakeSource {
    fn list_directory(&self, os_label: &str) -> Result<Vec<RemoteFile>, SourceError> {
        match self.listings.get(os_label) {
            Some(files) if !self.unavailable.iter().any(|l| l == os_label) => Ok(files.clone()),
            _ => Err(SourceError::ListingUnavailable {
                label: os_label.to_string(),
                status: "404 Not Found".to_string(),
            }),
        }
    }

    fn download(&self, url: &str) -> Result<String, SourceError> {
        self.downloads.set(self.downloads.get() + 1);
        self.contents
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::DownloadFailed {
                url: url.to_string(),
                status: "500 Internal Server Error".to_string(),
            })
    }
}
