//! Statistics over timing series and the human-readable run report.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::runner::{RunReport, ScenarioResult};
use crate::timing::{OutcomeBucket, TimingSeries};

/// Summary of one duration series, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub count: usize,
    pub min: u64,
    pub mean: f64,
    pub max: u64,
    pub median: f64,
    /// Population standard deviation (divides by `count`).
    pub std_dev: f64,
}

/// Reduce a series to min/mean/max/median/std-dev. `None` for an empty series.
pub fn summarize(samples: &[u64]) -> Option<TimingSummary> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let count = sorted.len();
    let n = count as f64;
    let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = sorted
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    Some(TimingSummary {
        count,
        min: sorted[0],
        mean,
        max: sorted[count - 1],
        median: median_sorted(&sorted),
        std_dev: variance.sqrt(),
    })
}

fn median_sorted(sorted: &[u64]) -> f64 {
    debug_assert!(!sorted.is_empty());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    }
}

/// Summaries for every non-empty series in one bucket, keyed by scenario name.
pub fn summarize_bucket(
    series: &TimingSeries,
    bucket: OutcomeBucket,
) -> BTreeMap<String, TimingSummary> {
    let mut summaries = BTreeMap::new();
    for (name, samples) in series.bucket(bucket) {
        match summarize(samples) {
            Some(summary) => {
                summaries.insert(name.clone(), summary);
            }
            None => tracing::debug!(scenario = %name, ?bucket, "Skipping empty timing series"),
        }
    }
    summaries
}

/// Per-scenario summaries of both buckets, as reported by `--json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSummaries {
    pub success: BTreeMap<String, TimingSummary>,
    pub failure: BTreeMap<String, TimingSummary>,
}

impl TimingSummaries {
    pub fn from_series(series: &TimingSeries) -> Self {
        Self {
            success: summarize_bucket(series, OutcomeBucket::Success),
            failure: summarize_bucket(series, OutcomeBucket::Failure),
        }
    }
}

/// Render one line group per summarized scenario.
pub fn render_series(summaries: &BTreeMap<String, TimingSummary>) -> Vec<String> {
    let mut lines = Vec::with_capacity(summaries.len() * 6);
    for (name, summary) in summaries {
        lines.push(format!("{name} :: (us)"));
        lines.push(format!("\tMin :    {}", summary.min));
        lines.push(format!("\tMean:    {}", summary.mean));
        lines.push(format!("\tMax:     {}", summary.max));
        lines.push(format!("\tMedian:  {}", summary.median));
        lines.push(format!("\tStd dev: {}", summary.std_dev));
    }
    lines
}

/// Full text report: both timing buckets and the completeness verdict.
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str("\nTiming information for successful planning attempts:\n");
    for line in render_series(&report.summaries.success) {
        let _ = writeln!(out, "{line}");
    }

    out.push_str("\nTiming information for failed planning attempts:\n");
    for line in render_series(&report.summaries.failure) {
        let _ = writeln!(out, "{line}");
    }

    let total = report.scenarios.len();
    let passed = report.passed_count();
    if report.is_complete() {
        let _ = writeln!(out, "\n\nCOMPLETE! All {total} were passed! Good job!");
    } else {
        let _ = writeln!(
            out,
            "\n\nINCOMPLETE: Passed {passed} of {total} tests. Keep debugging and testing!"
        );
    }

    out
}

/// Emit diagnostics for every case that did not pass.
pub fn log_case_diagnostics(result: &ScenarioResult) {
    for case in result.cases.iter().filter(|c| !c.outcome.is_correct()) {
        tracing::warn!(
            scenario = %result.name,
            case = case.index,
            expected_to_exist = case.expected_to_exist,
            found_path = case.found_path,
            outcome = %case.outcome,
            "{}",
            case.describe()
        );

        if let Some(collision) = case.collision {
            tracing::debug!(
                scenario = %result.name,
                case = case.index,
                waypoint = ?case.unsafe_waypoint,
                cell = %collision.cell,
                hit = %collision.hit,
                occupancy = collision.occupancy,
                "Waypoint too close to obstacle"
            );
        }
    }
}
