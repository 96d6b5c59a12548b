//! Harness configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "gridcheck.yaml";

/// Main harness configuration, loaded from gridcheck.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Planner calls per test case
    #[serde(default = "default_repeats")]
    pub repeats: usize,

    /// Clearance radius used by the planner and the validator, in meters
    #[serde(default = "default_robot_radius")]
    pub robot_radius: f64,

    /// Directory that scenario map and case paths are relative to
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Scenarios to run, in order
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<ScenarioSpec>,

    /// Optional JSONL event log
    #[serde(default)]
    pub events_path: Option<PathBuf>,
}

/// One named map with its case list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    pub map: PathBuf,
    pub cases: PathBuf,
}

impl ScenarioSpec {
    pub fn new(name: &str, map: &str, cases: &str) -> Self {
        Self {
            name: name.to_string(),
            map: PathBuf::from(map),
            cases: PathBuf::from(cases),
        }
    }
}

fn default_repeats() -> usize {
    1
}
fn default_robot_radius() -> f64 {
    0.075
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// The stock scenario set: empty, filled, narrow, wide, convex and maze maps.
pub fn default_scenarios() -> Vec<ScenarioSpec> {
    vec![
        ScenarioSpec::new("test_empty_grid", "empty.map", "empty_poses.txt"),
        ScenarioSpec::new("test_filled_grid", "filled.map", "filled_poses.txt"),
        ScenarioSpec::new(
            "test_narrow_constriction_grid",
            "narrow.map",
            "narrow_poses.txt",
        ),
        ScenarioSpec::new("test_wide_constriction_grid", "wide.map", "wide_poses.txt"),
        ScenarioSpec::new("test_convex_grid", "convex.map", "convex_poses.txt"),
        ScenarioSpec::new("test_maze_grid", "maze.map", "maze_poses.txt"),
    ]
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            repeats: default_repeats(),
            robot_radius: default_robot_radius(),
            data_dir: default_data_dir(),
            scenarios: default_scenarios(),
            events_path: None,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise the defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve relative paths against `root`
    pub fn resolve_paths(&mut self, root: &Path) {
        self.data_dir = root.join(&self.data_dir);
        if let Some(events) = &self.events_path {
            self.events_path = Some(root.join(events));
        }
    }

    /// Set the repeat count from a raw command-line value; absent or non-positive means 1
    pub fn set_repeats_from_arg(&mut self, raw: Option<i64>) {
        self.repeats = match raw {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => 1,
        };
    }

    fn validate(&self) -> Result<()> {
        if !self.robot_radius.is_finite() || self.robot_radius < 0.0 {
            anyhow::bail!("robot_radius must be a non-negative number, got {}", self.robot_radius);
        }
        let mut seen = std::collections::HashSet::new();
        for spec in &self.scenarios {
            if !seen.insert(spec.name.as_str()) {
                anyhow::bail!("duplicate scenario name `{}`", spec.name);
            }
        }
        Ok(())
    }

    /// YAML for a freshly initialised project
    pub fn default_yaml() -> Result<String> {
        let body = serde_yaml::to_string(&Self::default())
            .context("Failed to render default config")?;
        Ok(format!("# gridcheck harness configuration\n\n{body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_harness() {
        let config = HarnessConfig::default();
        assert_eq!(config.repeats, 1);
        assert_eq!(config.robot_radius, 0.075);
        assert_eq!(config.scenarios.len(), 6);
        assert_eq!(config.scenarios[0].name, "test_empty_grid");
        assert_eq!(config.scenarios[5].cases, PathBuf::from("maze_poses.txt"));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: HarnessConfig = serde_yaml::from_str("repeats: 5\n").expect("parse");
        assert_eq!(config.repeats, 5);
        assert_eq!(config.robot_radius, 0.075);
        assert_eq!(config.scenarios, default_scenarios());
    }

    #[test]
    fn repeats_argument_clamps_to_one() {
        let mut config = HarnessConfig::default();
        config.set_repeats_from_arg(Some(10));
        assert_eq!(config.repeats, 10);
        config.set_repeats_from_arg(Some(0));
        assert_eq!(config.repeats, 1);
        config.set_repeats_from_arg(Some(-4));
        assert_eq!(config.repeats, 1);
        config.set_repeats_from_arg(None);
        assert_eq!(config.repeats, 1);
    }

    #[test]
    fn load_rejects_duplicate_names_and_negative_radius() {
        let dir = tempfile::tempdir().expect("tempdir");

        let dup = dir.path().join("dup.yaml");
        std::fs::write(
            &dup,
            "scenarios:\n  - {name: a, map: a.map, cases: a.txt}\n  - {name: a, map: b.map, cases: b.txt}\n",
        )
        .expect("write");
        assert!(HarnessConfig::load(&dup).is_err());

        let neg = dir.path().join("neg.yaml");
        std::fs::write(&neg, "robot_radius: -1.0\n").expect("write");
        assert!(HarnessConfig::load(&neg).is_err());
    }

    #[test]
    fn default_yaml_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, HarnessConfig::default_yaml().expect("render")).expect("write");

        let loaded = HarnessConfig::load_or_default(&path).expect("load");
        assert_eq!(loaded, HarnessConfig::default());
    }

    #[test]
    fn resolve_paths_joins_root() {
        let mut config = HarnessConfig {
            events_path: Some(PathBuf::from("events.jsonl")),
            ..HarnessConfig::default()
        };
        config.resolve_paths(Path::new("/tmp/project"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/project/data"));
        assert_eq!(
            config.events_path,
            Some(PathBuf::from("/tmp/project/events.jsonl"))
        );
    }
}
