use super::timing::TimingBreakdown;
use crate::events::EventSummary;
use crate::hypotheses::{MultiHypothesesGraph, TraxelStore};
use crate::model::AssignmentModel;
use crate::types::{Timestep, TimestepRange};
use serde::Serialize;

/// Report returned alongside the events of a run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingReport {
    pub input: InputDescriptor,
    pub graph: GraphStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelStage>,
    pub objective: f64,
    pub summary: EventSummary,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub traxels: usize,
    pub frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_timestep: Option<Timestep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_timestep: Option<Timestep>,
}

impl InputDescriptor {
    pub fn from_store(store: &TraxelStore) -> Self {
        Self {
            traxels: store.len(),
            frames: store.timesteps().count(),
            earliest_timestep: store.earliest_timestep(),
            latest_timestep: store.latest_timestep(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStage {
    pub nodes: usize,
    pub arcs: usize,
    pub traxels: usize,
    /// Timesteps spanned by the nodes, absent for an empty graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timesteps: Option<TimestepRange>,
}

impl GraphStage {
    pub fn from_graph(graph: &MultiHypothesesGraph) -> Self {
        Self {
            nodes: graph.node_count(),
            arcs: graph.arc_count(),
            traxels: graph.traxel_count(),
            timesteps: graph.timestep_range(),
        }
    }
}

/// Size of the formulated model, when the solver exposes one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStage {
    pub variables: usize,
    pub constraints: usize,
}

impl From<&AssignmentModel> for ModelStage {
    fn from(model: &AssignmentModel) -> Self {
        Self {
            variables: model.number_of_variables(),
            constraints: model.number_of_constraints(),
        }
    }
}
