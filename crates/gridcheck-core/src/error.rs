//! Errors that abort a run.
//!
//! Planner misbehaviour is never an error: it is classified into a
//! [`CaseOutcome`](crate::CaseOutcome) and reported.

use std::path::PathBuf;

use gridcheck_map::MapError;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("resource missing or unreadable: {path}")]
    ResourceMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load map: {0}")]
    Map(#[from] MapError),

    #[error("malformed test cases in {path}: {reason}")]
    MalformedCases { path: PathBuf, reason: String },
}

impl HarnessError {
    /// True for the missing/unreadable-file class of errors.
    pub fn is_resource_missing(&self) -> bool {
        matches!(
            self,
            Self::ResourceMissing { .. } | Self::Map(MapError::Io { .. })
        )
    }
}
