use anyhow::{Context, Result};

use crate::{
    config::{FileFailurePolicy, ViewerConfig},
    data::RawBenchmarkSet,
    parsers::RawDocument,
    source::{BenchmarkSource, RemoteFile, SourceError},
};

/// Fetch and parse all result files, one os label after the other.
///
/// A label whose directory listing is unavailable is reported and skipped.
/// A result file that fails to download or parse ends the whole fetch unless
/// the configuration asks to skip such files.
pub fn fetch_benchmark_files(
    source: &dyn BenchmarkSource,
    config: &ViewerConfig,
) -> Result<RawBenchmarkSet> {
    let mut all_benchmarks = RawBenchmarkSet::new();

    for os_label in &config.os_labels {
        let files = match source.list_directory(os_label) {
            Ok(files) => files,
            Err(SourceError::ListingUnavailable { label, status }) => {
                log::error!(
                    "Failed to fetch {} directory from {}: {}",
                    label,
                    config.repository,
                    status
                );
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to list {} directory of {}", os_label, config.repository)
                })
            }
        };

        log::info!("Found {} entries for {}", files.len(), os_label);

        for file in &files {
            let Some(commit) = file.name.strip_suffix(&config.file_extension) else {
                log::debug!("Ignoring {}/{}", os_label, file.name);
                continue;
            };
            let Some(download_url) = file.download_url.as_deref() else {
                log::debug!("Ignoring {}/{} without download URL", os_label, file.name);
                continue;
            };

            let document = match fetch_document(source, download_url) {
                Ok(document) => document,
                Err(e) => match config.on_file_error {
                    FileFailurePolicy::Abort => {
                        return Err(e).with_context(|| failed_file_message(os_label, file))
                    }
                    FileFailurePolicy::Skip => {
                        log::warn!("{}, skipping: {:#}", failed_file_message(os_label, file), e);
                        continue;
                    }
                },
            };

            all_benchmarks
                .entry(commit.to_string())
                .or_default()
                .insert(os_label.clone(), document);
        }
    }

    Ok(all_benchmarks)
}

fn fetch_document(source: &dyn BenchmarkSource, download_url: &str) -> Result<RawDocument> {
    let content = source.download(download_url)?;
    let document = content
        .parse::<RawDocument>()
        .with_context(|| format!("Failed to parse {}", download_url))?;
    Ok(document)
}

fn failed_file_message(os_label: &str, file: &RemoteFile) -> String {
    format!("Failed to fetch result file {}/{}", os_label, file.name)
}
