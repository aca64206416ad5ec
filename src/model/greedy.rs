use super::formulation::{Assignment, AssignmentModel};
use super::options::ModelOptions;
use crate::diagnostics::ModelStage;
use crate::error::Result;
use crate::hypotheses::MultiHypothesesGraph;
use crate::reasoner::Solver;

/// Reference solver: greedy, conflict-respecting assignment.
///
/// Transitions are visited in ascending cost (ties by arc order). A first
/// link out of a hypothesis is taken when it is cheaper than ending one
/// track and starting another (`disappearance + appearance`); a second link
/// is taken when the division plus the move is cheaper than the appearance it
/// replaces. Endpoints that would conflict with an already active hypothesis
/// are skipped, and every target keeps at most one parent. Hypotheses left
/// unlinked are activated on their own when that beats leaving them out.
///
/// The result is feasible but not necessarily optimal; the model energy of
/// the assignment is reported as the objective.
#[derive(Clone, Debug, Default)]
pub struct GreedySolver {
    options: ModelOptions,
}

impl GreedySolver {
    pub fn new(options: ModelOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }
}

impl Solver for GreedySolver {
    type Model = AssignmentModel;

    fn formulate(&mut self, graph: &MultiHypothesesGraph) -> Result<AssignmentModel> {
        AssignmentModel::formulate(graph, &self.options)
    }

    fn infer(&mut self, model: &mut AssignmentModel) -> Result<f64> {
        let assignment = greedy_assignment(model);
        let objective = model.energy(&assignment);
        model.solution = Some(assignment);
        Ok(objective)
    }

    fn conclude(&mut self, graph: &mut MultiHypothesesGraph, model: &AssignmentModel) -> Result<()> {
        model.conclude(graph)
    }

    fn model_stage(&self, model: &AssignmentModel) -> Option<ModelStage> {
        Some(ModelStage::from(model))
    }
}

pub fn greedy_assignment(model: &AssignmentModel) -> Assignment {
    let hyps = &model.hypotheses;
    let transitions = &model.transitions;
    let mut assignment = Assignment::empty(model);
    let mut out_count = vec![0usize; hyps.len()];
    let mut has_parent = vec![false; hyps.len()];

    let blocked = |active: &[bool], h: usize| -> bool {
        !active[h] && hyps[h].conflicts.iter().any(|&c| active[c])
    };

    let mut order: Vec<usize> = (0..transitions.len()).collect();
    order.sort_by(|&a, &b| {
        transitions[a]
            .cost
            .total_cmp(&transitions[b].cost)
            .then(a.cmp(&b))
    });

    for k in order {
        let tr = &transitions[k];
        let (s, t) = (tr.source, tr.target);
        if has_parent[t] || blocked(&assignment.active, s) || blocked(&assignment.active, t) {
            continue;
        }
        let appearance = hyps[t].appearance_cost.unwrap_or(0.0);
        let worthwhile = match out_count[s] {
            0 => tr.cost < appearance + hyps[s].disappearance_cost.unwrap_or(0.0),
            1 => hyps[s]
                .division_cost
                .is_some_and(|division| tr.cost + division < appearance),
            _ => false,
        };
        if !worthwhile {
            continue;
        }
        assignment.transitions[k] = true;
        assignment.active[s] = true;
        assignment.active[t] = true;
        out_count[s] += 1;
        has_parent[t] = true;
    }

    for h in 0..hyps.len() {
        if assignment.active[h] || blocked(&assignment.active, h) {
            continue;
        }
        let hyp = &hyps[h];
        let standalone = hyp.active_cost
            + hyp.appearance_cost.unwrap_or(0.0)
            + hyp.disappearance_cost.unwrap_or(0.0);
        if standalone < hyp.inactive_cost {
            assignment.active[h] = true;
        }
    }
    assignment
}
