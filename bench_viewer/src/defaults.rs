//! Centralized default values for bench-viewer configuration.
//!
//! These defaults are used as fallback values when neither a configuration
//! file nor a CLI option provides a value.

// ============================================================================
// Source Defaults
// ============================================================================

/// Repository holding the benchmark result files, as `owner/name`.
pub const DEFAULT_REPOSITORY: &str = "GRIS-UdeM/AlgoGRIS";

/// Branch of [`DEFAULT_REPOSITORY`] the result files are committed to.
pub const DEFAULT_BRANCH: &str = "benchmarks";

/// Operating system labels. Each label names one directory on the branch and
/// one line per chart.
pub const DEFAULT_OS_LABELS: &[&str] = &["Linux", "macOS", "Windows"];

/// Base URL of the GitHub REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Result files are named `<commit><extension>`.
pub const DEFAULT_FILE_EXTENSION: &str = ".xml";

/// Default behavior when a single result file fails to download or parse.
pub const DEFAULT_ON_FILE_ERROR: &str = "abort";

/// Timeout applied to every HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

// ============================================================================
// Reporting Defaults
// ============================================================================

/// Title of the HTML report when none is configured.
pub const DEFAULT_REPORT_TITLE: &str = "Benchmark Results";

/// Y-axis label of every chart. Catch2 reports mean durations in nanoseconds.
pub const DEFAULT_Y_AXIS_TITLE: &str = "Mean Time (ns)";
