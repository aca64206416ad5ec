use crate::error::{Result, TrackingError};
use crate::hypotheses::BuilderOptions;
use crate::model::ModelOptions;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weights every run reads.
pub const REQUIRED_WEIGHTS: [&str; 12] = [
    "app",
    "dis",
    "det",
    "mis",
    "div",
    "count",
    "forbidden",
    "opportunity",
    "max_div",
    "neighbors",
    "distance",
    "gap",
];

/// Named weights and feature switches of a tracking run.
///
/// Weight names:
///
/// | name          | meaning                                         |
/// |---------------|-------------------------------------------------|
/// | `app`, `dis`  | appearance / disappearance cost                 |
/// | `det`, `mis`  | detection / misdetection cost                   |
/// | `div`         | division cost                                   |
/// | `mov`         | move scale for classifier costs                 |
/// | `count`       | cost per active hypothesis                      |
/// | `forbidden`   | penalty per violated constraint                 |
/// | `opportunity` | cost of an unused hypothesis                    |
/// | `max_div`     | hypotheses at this level or deeper never divide |
/// | `neighbors`   | candidate links per hypothesis                  |
/// | `distance`    | maximum link distance                           |
/// | `timeout`     | solver time limit in seconds, `0` for none      |
/// | `gap`         | relative optimality gap                         |
/// | `const_prob`  | probability of the constant classifiers         |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingOptions {
    pub weights: BTreeMap<String, f64>,
    pub with_constraints: bool,
    pub with_divisions: bool,
    pub with_detection_vars: bool,
    pub with_classifiers: bool,
    pub with_constant_classifiers: bool,
    pub with_maximal_conflict_cliques: bool,
    pub verbosity: LevelFilter,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        let weights = [
            ("app", 1000.0),
            ("dis", 1000.0),
            ("det", 10.0),
            ("mis", 10.0),
            ("div", 100.0),
            ("mov", 1.0),
            ("count", 0.0),
            ("forbidden", 1_000_000.0),
            ("opportunity", 0.0),
            ("max_div", 50.0),
            ("neighbors", 2.0),
            ("distance", 50.0),
            ("timeout", 0.0),
            ("gap", 0.01),
            ("const_prob", 0.5),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
        Self {
            weights,
            with_constraints: true,
            with_divisions: false,
            with_detection_vars: false,
            with_classifiers: false,
            with_constant_classifiers: false,
            with_maximal_conflict_cliques: false,
            verbosity: LevelFilter::Info,
        }
    }
}

impl TrackingOptions {
    pub fn get_weight(&self, name: &str) -> Result<f64> {
        self.weights
            .get(name)
            .copied()
            .ok_or_else(|| TrackingError::MissingWeight(name.to_string()))
    }

    pub fn with_weight(mut self, name: &str, value: f64) -> Self {
        self.weights.insert(name.to_string(), value);
        self
    }

    fn uses_classifier_costs(&self) -> bool {
        self.with_classifiers || self.with_constant_classifiers
    }

    /// Fail on the first weight the run would need but cannot find.
    pub fn validate(&self) -> Result<()> {
        for name in REQUIRED_WEIGHTS {
            self.get_weight(name)?;
        }
        if self.uses_classifier_costs() {
            self.get_weight("mov")?;
        }
        if self.with_constant_classifiers {
            self.get_weight("const_prob")?;
        }
        Ok(())
    }

    /// Candidate linking, always single-direction.
    pub fn builder_options(&self) -> Result<BuilderOptions> {
        let neighbors = self.get_weight("neighbors")?;
        let distance = self.get_weight("distance")?;
        Ok(BuilderOptions::new(
            neighbors.max(0.0) as usize,
            distance as f32,
            false,
        ))
    }

    pub fn model_options(&self) -> Result<ModelOptions> {
        let timeout = self.weights.get("timeout").copied().filter(|&t| t > 0.0);
        let move_weight = if self.uses_classifier_costs() {
            self.get_weight("mov")?
        } else {
            1.0
        };
        let mut options = ModelOptions {
            appearance: self.get_weight("app")?,
            disappearance: self.get_weight("dis")?,
            move_weight,
            count: self.get_weight("count")?,
            forbidden: self.get_weight("forbidden")?,
            opportunity: self.get_weight("opportunity")?,
            max_division_level: self.get_weight("max_div")?.max(0.0) as u32,
            detection: None,
            division: None,
            with_constraints: self.with_constraints,
            with_maximal_conflict_cliques: self.with_maximal_conflict_cliques,
            with_classifier_costs: self.uses_classifier_costs(),
            ep_gap: self.get_weight("gap")?,
            timeout,
        };
        if self.with_detection_vars {
            options = options.with_detection_vars(self.get_weight("det")?, self.get_weight("mis")?);
        }
        if self.with_divisions {
            options = options.with_divisions(self.get_weight("div")?);
        }
        Ok(options)
    }

    /// One line per parameter, in the order they are logged at the start of a run.
    pub fn describe(&self) -> Vec<String> {
        let weight = |name: &str| match self.weights.get(name) {
            Some(v) => v.to_string(),
            None => "-".to_string(),
        };
        vec![
            format!("appearance: {}", weight("app")),
            format!("disappearance: {}", weight("dis")),
            format!("detection: {}", weight("det")),
            format!("misdetection: {}", weight("mis")),
            format!("division: {}", weight("div")),
            format!("forbidden cost: {}", weight("forbidden")),
            format!("with constraints: {}", self.with_constraints),
            format!("with divisions: {}", self.with_divisions),
            format!("with detection variables: {}", self.with_detection_vars),
            format!("number of neighbors: {}", weight("neighbors")),
            format!("maximum neighbor distance: {}", weight("distance")),
            format!("solver timeout: {}", weight("timeout")),
            format!("ep gap: {}", weight("gap")),
            format!("maximum division level: {}", weight("max_div")),
            format!("with constant classifiers: {}", self.with_constant_classifiers),
        ]
    }
}
