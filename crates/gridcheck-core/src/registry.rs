//! Scenario registry - the ordered list of maps and case lists a run iterates.

use std::path::{Path, PathBuf};

use crate::config::{HarnessConfig, ScenarioSpec};

/// One named map with its case list, resolved to concrete file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub map_path: PathBuf,
    pub cases_path: PathBuf,
}

impl Scenario {
    pub fn new(name: impl Into<String>, map_path: impl Into<PathBuf>, cases_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            map_path: map_path.into(),
            cases_path: cases_path.into(),
        }
    }

    fn from_spec(spec: &ScenarioSpec, data_dir: &Path) -> Self {
        Self::new(
            spec.name.clone(),
            data_dir.join(&spec.map),
            data_dir.join(&spec.cases),
        )
    }

    /// Whether both resources are present on disk.
    pub fn resources_exist(&self) -> bool {
        self.map_path.is_file() && self.cases_path.is_file()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioRegistry {
    scenarios: Vec<Scenario>,
}

impl ScenarioRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from config, resolving resources against `config.data_dir`.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            scenarios: config
                .scenarios
                .iter()
                .map(|spec| Scenario::from_spec(spec, &config.data_dir))
                .collect(),
        }
    }

    pub fn register(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Keep only the named scenarios (original order). An empty filter keeps everything.
    /// Returns the names that matched nothing.
    pub fn retain_named(&mut self, names: &[String]) -> Vec<String> {
        if names.is_empty() {
            return Vec::new();
        }
        let unknown = names
            .iter()
            .filter(|n| !self.scenarios.iter().any(|s| &s.name == *n))
            .cloned()
            .collect();
        self.scenarios.retain(|s| names.contains(&s.name));
        unknown
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
