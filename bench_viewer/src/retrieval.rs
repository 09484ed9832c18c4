use anyhow::Result;
use regex::Regex;

use crate::{
    config::ViewerConfig,
    data::ReshapedResultSet,
    extract::parse_benchmarks_filtered,
    fetcher::fetch_benchmark_files,
    source::BenchmarkSource,
};

/// Fetch all result files from `source` and reshape them by test name.
pub fn retrieve_results(
    source: &dyn BenchmarkSource,
    config: &ViewerConfig,
    filters: &[Regex],
) -> Result<ReshapedResultSet> {
    let all_benchmarks = fetch_benchmark_files(source, config)?;
    log::info!(
        "Fetched result files for {} commits from {}",
        all_benchmarks.len(),
        config.repository
    );

    let results = parse_benchmarks_filtered(&all_benchmarks, filters);
    log::info!("Extracted measurements for {} tests", results.len());
    Ok(results)
}
