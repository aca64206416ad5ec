//! Immutable cost/structure configuration of the assignment model.

use serde::Serialize;

/// Detection/misdetection pair used when explicit detection variables are modelled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DetectionCosts {
    pub detection: f64,
    pub misdetection: f64,
}

/// Everything the formulation needs, assembled once before the run.
///
/// Weights are opaque inputs: constants unless classifier costs are enabled,
/// in which case the matching weight scales a negative log-probability.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelOptions {
    pub appearance: f64,
    pub disappearance: f64,
    /// Scale of classifier-based move costs.
    pub move_weight: f64,
    /// Cost of keeping a hypothesis active (per hypothesis).
    pub count: f64,
    /// Penalty per violated constraint when scoring an assignment.
    pub forbidden: f64,
    /// Cost of leaving a hypothesis inactive when detections are not modelled.
    pub opportunity: f64,
    /// Hypotheses at this level or deeper cannot divide.
    pub max_division_level: u32,
    pub detection: Option<DetectionCosts>,
    pub division: Option<f64>,
    pub with_constraints: bool,
    pub with_maximal_conflict_cliques: bool,
    /// Read `detProb`/`divProb`/`count_prob`/`move_prob` features when present.
    pub with_classifier_costs: bool,
    /// Relative optimality gap, passed through to the solver.
    pub ep_gap: f64,
    /// Solver time limit in seconds, passed through to the solver.
    pub timeout: Option<f64>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            appearance: 1000.0,
            disappearance: 1000.0,
            move_weight: 1.0,
            count: 0.0,
            forbidden: 1_000_000.0,
            opportunity: 0.0,
            max_division_level: 50,
            detection: None,
            division: None,
            with_constraints: true,
            with_maximal_conflict_cliques: false,
            with_classifier_costs: false,
            ep_gap: 0.01,
            timeout: None,
        }
    }
}

impl ModelOptions {
    pub fn with_detection_vars(mut self, detection: f64, misdetection: f64) -> Self {
        self.detection = Some(DetectionCosts {
            detection,
            misdetection,
        });
        self
    }

    pub fn with_divisions(mut self, division: f64) -> Self {
        self.division = Some(division);
        self
    }

    pub fn with_maximal_conflict_cliques(mut self, enabled: bool) -> Self {
        self.with_maximal_conflict_cliques = enabled;
        self
    }
}
