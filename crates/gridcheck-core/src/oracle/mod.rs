//! Oracle - judges a planner's answer against the map and the declared expectation.

mod classify;
mod safety;
mod validator;

pub use classify::{classify, found_path, CaseOutcome};
pub use safety::{find_collision, is_safe, scan_radius, Collision};
pub use validator::{is_valid_path, validate_path, PathVerdict};
