use std::sync::OnceLock;

use regex::Regex;

use crate::{
    data::{RawBenchmarkSet, ReshapedResultSet},
    filter::matches_any_filter,
};

/// Cached regex matching the numeric prefix of a mean value (compiled once)
static FLOAT_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn float_prefix_regex() -> &'static Regex {
    FLOAT_PREFIX_REGEX.get_or_init(|| {
        Regex::new(r"^[+-]?(Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)")
            .expect("Invalid float prefix regex pattern")
    })
}

/// Reshape parsed result files into test name -> commit -> os label -> mean.
///
/// Test cases without a mean record, or whose mean has no `value`, are left
/// out. A value without a numeric prefix is stored as `NaN`.
pub fn parse_benchmarks(all_benchmarks: &RawBenchmarkSet) -> ReshapedResultSet {
    parse_benchmarks_filtered(all_benchmarks, &[])
}

/// Like [`parse_benchmarks`], keeping only tests whose name matches one of
/// `filters`. No filters keep every test.
pub fn parse_benchmarks_filtered(
    all_benchmarks: &RawBenchmarkSet,
    filters: &[Regex],
) -> ReshapedResultSet {
    let mut results_by_test_name = ReshapedResultSet::new();

    for (commit, os_data) in all_benchmarks {
        for (os_label, document) in os_data {
            for test_case in document.test_cases() {
                if !matches_any_filter(test_case.name, filters) {
                    continue;
                }
                let Some(value) = test_case.mean.and_then(|mean| mean.value) else {
                    log::debug!(
                        "No mean for '{}' in {} ({})",
                        test_case.name,
                        commit,
                        os_label
                    );
                    continue;
                };

                results_by_test_name
                    .entry(test_case.name.to_string())
                    .or_default()
                    .entry(commit.clone())
                    .or_default()
                    .insert(os_label.clone(), parse_mean_value(value));
            }
        }
    }

    results_by_test_name
}

/// Parse the leading decimal number of `value`, ignoring leading whitespace
/// and any trailing characters. Returns `NaN` when there is no such number.
pub fn parse_mean_value(value: &str) -> f64 {
    let trimmed = value.trim_start();
    float_prefix_regex()
        .find(trimmed)
        .and_then(|m| {
            let number = m.as_str();
            match number.trim_start_matches(['+', '-']) {
                "Infinity" if number.starts_with('-') => Some(f64::NEG_INFINITY),
                "Infinity" => Some(f64::INFINITY),
                _ => number.parse::<f64>().ok(),
            }
        })
        .unwrap_or(f64::NAN)
}
