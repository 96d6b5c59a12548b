//! gridcheck core - verification oracle and timing harness for grid motion planners.
//!
//! This crate judges a planner's answers against pre-authored test cases
//! (clearance check, goal-cell match, expectation), times repeated planner
//! calls, and summarizes the timings per scenario.

pub mod cases;
pub mod config;
pub mod error;
pub mod observability;
pub mod oracle;
pub mod registry;
pub mod runner;
pub mod stats;
pub mod timing;

pub use cases::TestCase;
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use oracle::{classify, found_path, is_safe, is_valid_path, CaseOutcome, PathVerdict};
pub use registry::{Scenario, ScenarioRegistry};
pub use runner::{CaseRecord, PlannerFactory, RunReport, Runner, ScenarioResult};
pub use stats::{render_report, summarize, TimingSummaries, TimingSummary};
pub use timing::{OutcomeBucket, TimingCollector, TimingSeries};
