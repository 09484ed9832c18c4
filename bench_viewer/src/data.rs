use std::collections::BTreeMap;

use serde::Serialize;

use crate::parsers::RawDocument;

/// Identifies one benchmark run; derived from the result file name.
pub type CommitId = String;

/// Platform name; one remote directory per label.
pub type OsLabel = String;

/// Parsed result files of all runs: commit -> os label -> document.
pub type RawBenchmarkSet = BTreeMap<CommitId, BTreeMap<OsLabel, RawDocument>>;

/// Mean values of all runs: test name -> commit -> os label -> mean.
///
/// A malformed mean value is kept as `NaN`.
pub type ReshapedResultSet = BTreeMap<String, BTreeMap<CommitId, BTreeMap<OsLabel, f64>>>;

/// Dataset of one chart: the commits a test was measured on and one series
/// per os label, aligned by position with `commits`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub test_name: String,
    pub commits: Vec<CommitId>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: OsLabel,
    /// One slot per commit; `None` where no valid measurement exists.
    pub values: Vec<Option<f64>>,
}
