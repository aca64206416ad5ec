//! Assignment model built from a hypotheses graph.
//!
//! Variables
//! - `Detection`: one per hypothesis, only with explicit detection costs.
//! - `Appearance` / `Disappearance`: one per hypothesis that is not at the
//!   first / last timestep.
//! - `Division`: one per hypothesis with at least two outgoing arcs whose
//!   level is below the maximum division level, only with divisions enabled.
//! - `Transition`: one per arc.
//!
//! Constraints
//! - `Conflict`: at most one hypothesis of the set is active. One constraint
//!   per conflicting pair, or per maximal conflict clique.
//! - `Outgoing` / `Incoming`: flow limits per hypothesis (only with
//!   constraints enabled).

use super::cliques::maximal_cliques;
use super::options::ModelOptions;
use crate::error::{Result, TrackingError};
use crate::hypotheses::{ArcId, MultiHypothesesGraph, NodeId};
use crate::traxel::Traxel;
use crate::types::{feature, FeatureMap, Timestep, TraxelId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const MIN_PROB: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VariableKind {
    Detection,
    Appearance,
    Disappearance,
    Division,
    Transition,
}

/// Binary model variable. `owner` indexes the hypotheses, or the transitions
/// for [`VariableKind::Transition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub kind: VariableKind,
    pub owner: usize,
}

/// One traxel of the graph as seen by the model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hypothesis {
    pub node: NodeId,
    pub id: TraxelId,
    pub timestep: Timestep,
    pub level: u32,
    pub active_cost: f64,
    pub inactive_cost: f64,
    pub appearance_cost: Option<f64>,
    pub disappearance_cost: Option<f64>,
    pub division_cost: Option<f64>,
    /// Transition indices leaving this hypothesis, in arc order.
    pub outgoing: Vec<usize>,
    /// Transition indices entering this hypothesis, in arc order.
    pub incoming: Vec<usize>,
    /// Hypothesis indices this one excludes.
    pub conflicts: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transition {
    pub arc: ArcId,
    pub source: usize,
    pub target: usize,
    pub cost: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Constraint {
    Conflict(Vec<usize>),
    Outgoing(usize),
    Incoming(usize),
}

/// Activity of every hypothesis and transition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub active: Vec<bool>,
    pub transitions: Vec<bool>,
}

impl Assignment {
    pub fn empty(model: &AssignmentModel) -> Self {
        Self {
            active: vec![false; model.hypotheses.len()],
            transitions: vec![false; model.transitions.len()],
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AssignmentModel {
    pub(crate) hypotheses: Vec<Hypothesis>,
    pub(crate) transitions: Vec<Transition>,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    forbidden: f64,
    pub(crate) solution: Option<Assignment>,
}

fn neg_ln(p: f64) -> f64 {
    -p.clamp(MIN_PROB, 1.0).ln()
}

/// Probability of `class` from a classifier feature, when enabled and present.
fn class_prob(features: &FeatureMap, name: &str, class: usize, enabled: bool) -> Option<f64> {
    if !enabled {
        return None;
    }
    features
        .get(name)
        .and_then(|p| p.get(class))
        .map(|&p| p as f64)
}

impl AssignmentModel {
    pub fn formulate(graph: &MultiHypothesesGraph, options: &ModelOptions) -> Result<Self> {
        let (Some(earliest), Some(latest)) = (graph.earliest_timestep(), graph.latest_timestep())
        else {
            return Ok(Self::empty(options.forbidden));
        };
        let classify = options.with_classifier_costs;

        let mut hypotheses = Vec::with_capacity(graph.traxel_count());
        let mut by_node: BTreeMap<(NodeId, TraxelId), usize> = BTreeMap::new();
        let mut by_time: BTreeMap<(Timestep, TraxelId), usize> = BTreeMap::new();
        let mut traxels: Vec<&Traxel> = Vec::with_capacity(graph.traxel_count());
        for node in graph.nodes() {
            for traxel in graph.regions(node) {
                let idx = hypotheses.len();
                by_node.insert((node, traxel.id), idx);
                by_time.entry((traxel.timestep, traxel.id)).or_insert(idx);
                hypotheses.push(Self::hypothesis(node, traxel, earliest, latest, options));
                traxels.push(traxel);
            }
        }

        let mut transitions = Vec::with_capacity(graph.arc_count());
        for (arc_id, arc) in graph.arcs() {
            let lookup = |node: NodeId, id: TraxelId| {
                by_node
                    .get(&(node, id))
                    .copied()
                    .ok_or(TrackingError::UnknownTraxel {
                        node: node.0 as usize,
                        id,
                    })
            };
            let source = lookup(arc.source, arc.from)?;
            let target = lookup(arc.target, arc.to)?;
            let cost = match class_prob(&arc.features, feature::MOVE_PROB, 1, classify) {
                Some(p) => options.move_weight * neg_ln(p),
                None => traxels[source]
                    .squared_distance(traxels[target])
                    .map(f64::from)
                    .unwrap_or(0.0),
            };
            let k = transitions.len();
            hypotheses[source].outgoing.push(k);
            hypotheses[target].incoming.push(k);
            transitions.push(Transition {
                arc: arc_id,
                source,
                target,
                cost,
            });
        }

        if let Some(division) = options.division {
            for (h, traxel) in hypotheses.iter_mut().zip(&traxels) {
                if h.outgoing.len() >= 2 && h.level < options.max_division_level {
                    h.division_cost = Some(
                        match class_prob(&traxel.features, feature::DIV_PROB, 1, classify) {
                            Some(p) => division * neg_ln(p),
                            None => division,
                        },
                    );
                }
            }
        }

        let mut adjacency = vec![BTreeSet::new(); hypotheses.len()];
        for (i, traxel) in traxels.iter().enumerate() {
            for id in traxel.conflicts()? {
                let j = by_time.get(&(traxel.timestep, id)).copied().ok_or_else(|| {
                    TrackingError::Store(format!("{traxel} conflicts with unknown traxel {id}"))
                })?;
                if i != j {
                    adjacency[i].insert(j);
                    adjacency[j].insert(i);
                }
            }
        }
        for (h, conflicts) in hypotheses.iter_mut().zip(&adjacency) {
            h.conflicts = conflicts.iter().copied().collect();
        }

        let mut model = Self {
            hypotheses,
            transitions,
            variables: Vec::new(),
            constraints: Vec::new(),
            forbidden: options.forbidden,
            solution: None,
        };
        model.add_variables(options);
        model.add_constraints(&adjacency, options);
        Ok(model)
    }

    fn empty(forbidden: f64) -> Self {
        Self {
            hypotheses: Vec::new(),
            transitions: Vec::new(),
            variables: Vec::new(),
            constraints: Vec::new(),
            forbidden,
            solution: None,
        }
    }

    fn hypothesis(
        node: NodeId,
        traxel: &Traxel,
        earliest: Timestep,
        latest: Timestep,
        options: &ModelOptions,
    ) -> Hypothesis {
        let classify = options.with_classifier_costs;
        let features = &traxel.features;
        let mut active_cost = match class_prob(features, feature::COUNT_PROB, 1, classify) {
            Some(p) => options.count * neg_ln(p),
            None => options.count,
        };
        let inactive_cost = match options.detection {
            Some(costs) => {
                active_cost += match class_prob(features, feature::DET_PROB, 1, classify) {
                    Some(p) => costs.detection * neg_ln(p),
                    None => costs.detection,
                };
                match class_prob(features, feature::DET_PROB, 0, classify) {
                    Some(p) => costs.detection * neg_ln(p),
                    None => costs.misdetection,
                }
            }
            None => options.opportunity,
        };
        Hypothesis {
            node,
            id: traxel.id,
            timestep: traxel.timestep,
            level: traxel.level(),
            active_cost,
            inactive_cost,
            appearance_cost: (traxel.timestep > earliest).then_some(options.appearance),
            disappearance_cost: (traxel.timestep < latest).then_some(options.disappearance),
            division_cost: None,
            outgoing: Vec::new(),
            incoming: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    fn add_variables(&mut self, options: &ModelOptions) {
        for (i, h) in self.hypotheses.iter().enumerate() {
            let kinds = [
                (options.detection.is_some(), VariableKind::Detection),
                (h.appearance_cost.is_some(), VariableKind::Appearance),
                (h.disappearance_cost.is_some(), VariableKind::Disappearance),
                (h.division_cost.is_some(), VariableKind::Division),
            ];
            for (present, kind) in kinds {
                if present {
                    self.variables.push(Variable { kind, owner: i });
                }
            }
        }
        for k in 0..self.transitions.len() {
            self.variables.push(Variable {
                kind: VariableKind::Transition,
                owner: k,
            });
        }
    }

    fn add_constraints(&mut self, adjacency: &[BTreeSet<usize>], options: &ModelOptions) {
        if options.with_maximal_conflict_cliques {
            for clique in maximal_cliques(adjacency) {
                if clique.len() >= 2 {
                    self.constraints.push(Constraint::Conflict(clique));
                }
            }
        } else {
            for (i, conflicts) in adjacency.iter().enumerate() {
                for &j in conflicts.range(i + 1..) {
                    self.constraints.push(Constraint::Conflict(vec![i, j]));
                }
            }
        }
        if options.with_constraints {
            for (i, h) in self.hypotheses.iter().enumerate() {
                if !h.outgoing.is_empty() {
                    self.constraints.push(Constraint::Outgoing(i));
                }
                if !h.incoming.is_empty() {
                    self.constraints.push(Constraint::Incoming(i));
                }
            }
        }
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Assignment found by the last inference, if any.
    pub fn solution(&self) -> Option<&Assignment> {
        self.solution.as_ref()
    }

    fn flow(&self, assignment: &Assignment, ids: &[usize]) -> usize {
        ids.iter().filter(|&&k| assignment.transitions[k]).count()
    }

    /// Number of constraints the assignment breaks.
    pub fn violations(&self, assignment: &Assignment) -> usize {
        self.constraints
            .iter()
            .filter(|c| match c {
                Constraint::Conflict(set) => {
                    set.iter().filter(|&&i| assignment.active[i]).count() > 1
                }
                Constraint::Outgoing(i) => {
                    let h = &self.hypotheses[*i];
                    let limit = match (assignment.active[*i], h.division_cost.is_some()) {
                        (false, _) => 0,
                        (true, false) => 1,
                        (true, true) => 2,
                    };
                    self.flow(assignment, &h.outgoing) > limit
                }
                Constraint::Incoming(i) => {
                    let limit = usize::from(assignment.active[*i]);
                    self.flow(assignment, &self.hypotheses[*i].incoming) > limit
                }
            })
            .count()
    }

    /// Total cost of an assignment, charging `forbidden` per broken constraint.
    pub fn energy(&self, assignment: &Assignment) -> f64 {
        let mut energy = 0.0;
        for (i, h) in self.hypotheses.iter().enumerate() {
            if !assignment.active[i] {
                energy += h.inactive_cost;
                continue;
            }
            energy += h.active_cost;
            let outgoing = self.flow(assignment, &h.outgoing);
            if self.flow(assignment, &h.incoming) == 0 {
                energy += h.appearance_cost.unwrap_or(0.0);
            }
            match outgoing {
                0 => energy += h.disappearance_cost.unwrap_or(0.0),
                2 => energy += h.division_cost.unwrap_or(0.0),
                _ => {}
            }
        }
        for (k, t) in self.transitions.iter().enumerate() {
            if assignment.transitions[k] {
                energy += t.cost;
            }
        }
        energy + self.forbidden * self.violations(assignment) as f64
    }

    /// Write `active`, `outgoing` and `parent` onto the graph's traxels.
    pub fn conclude(&self, graph: &mut MultiHypothesesGraph) -> Result<()> {
        let assignment = self.solution.as_ref().ok_or(TrackingError::NotFormulated)?;
        for (i, h) in self.hypotheses.iter().enumerate() {
            let ids = |transitions: &[usize], end: fn(&Transition) -> usize| -> Vec<f32> {
                transitions
                    .iter()
                    .filter(|&&k| assignment.transitions[k])
                    .map(|&k| self.hypotheses[end(&self.transitions[k])].id as f32)
                    .collect()
            };
            let outgoing = ids(&h.outgoing, |t| t.target);
            let parent = ids(&h.incoming, |t| t.source);
            let active = if assignment.active[i] { 1.0 } else { 0.0 };

            let traxel = graph
                .traxel_mut(h.node, h.id)
                .ok_or(TrackingError::UnknownTraxel {
                    node: h.node.0 as usize,
                    id: h.id,
                })?;
            traxel.set_feature(feature::ACTIVE, vec![active]);
            traxel.set_feature(feature::OUTGOING, outgoing);
            traxel.set_feature(feature::PARENT, parent);
        }
        Ok(())
    }
}
