//! Test-case lists.
//!
//! Format: a count `N`, then `N` records of `startX startY goalX goalY expectedExists`
//! where `expectedExists` is `0` or `1`. Tokens are whitespace separated and may span
//! lines freely. Headings are always zero.

use std::path::Path;

use gridcheck_map::Pose;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// A start/goal pair with the declared ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub start: Pose,
    pub goal: Pose,
    pub expected_to_exist: bool,
}

impl TestCase {
    pub fn new(start: Pose, goal: Pose, expected_to_exist: bool) -> Self {
        Self {
            start,
            goal,
            expected_to_exist,
        }
    }
}

/// Read and parse a case file.
pub fn load_cases(path: &Path) -> Result<Vec<TestCase>, HarnessError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| HarnessError::ResourceMissing {
            path: path.to_path_buf(),
            source,
        })?;
    parse_cases(&content, path)
}

/// Parse case-file text. `path` is only used in error messages.
pub fn parse_cases(content: &str, path: &Path) -> Result<Vec<TestCase>, HarnessError> {
    let malformed = |reason: String| HarnessError::MalformedCases {
        path: path.to_path_buf(),
        reason,
    };

    let mut tokens = content.split_whitespace();
    let count_token = tokens
        .next()
        .ok_or_else(|| malformed("missing case count".to_string()))?;
    let count: usize = count_token
        .parse()
        .map_err(|_| malformed(format!("invalid case count `{count_token}`")))?;

    let mut next_number = |record: usize, field: &str| -> Result<f64, HarnessError> {
        let token = tokens
            .next()
            .ok_or_else(|| malformed(format!("record {record}: missing {field}")))?;
        token
            .parse::<f64>()
            .map_err(|_| malformed(format!("record {record}: invalid {field} `{token}`")))
    };

    // The declared count is untrusted; grow as records actually parse.
    let mut cases = Vec::new();
    for record in 0..count {
        let start_x = next_number(record, "startX")?;
        let start_y = next_number(record, "startY")?;
        let goal_x = next_number(record, "goalX")?;
        let goal_y = next_number(record, "goalY")?;
        let expected = next_number(record, "expectedExists")?;

        let expected_to_exist = if expected == 0.0 {
            false
        } else if expected == 1.0 {
            true
        } else {
            return Err(malformed(format!(
                "record {record}: expectedExists must be 0 or 1, got {expected}"
            )));
        };

        cases.push(TestCase::new(
            Pose::at(start_x, start_y),
            Pose::at(goal_x, goal_y),
            expected_to_exist,
        ));
    }

    Ok(cases)
}
