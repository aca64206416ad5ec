//! Formulate → infer → conclude sequencing around a [`Solver`].
//!
//! The solver owns the optimization: it turns the graph into a model, finds
//! an assignment, and writes `active`, `outgoing` and `parent` back onto the
//! graph's traxels. The [`Reasoner`] only keeps the model between the steps
//! and enforces their order.

use crate::diagnostics::ModelStage;
use crate::error::{Result, TrackingError};
use crate::hypotheses::MultiHypothesesGraph;

/// Model builder/solver capability.
///
/// Failures (infeasible model, timeout, internal fault) are reported as
/// [`TrackingError::Solver`] and abort the run.
pub trait Solver {
    type Model;

    fn formulate(&mut self, graph: &MultiHypothesesGraph) -> Result<Self::Model>;

    /// Solve the model and return the objective value.
    fn infer(&mut self, model: &mut Self::Model) -> Result<f64>;

    fn conclude(&mut self, graph: &mut MultiHypothesesGraph, model: &Self::Model) -> Result<()>;

    /// Size of a formulated model, for reporting.
    fn model_stage(&self, _model: &Self::Model) -> Option<ModelStage> {
        None
    }
}

impl<S: Solver + ?Sized> Solver for &mut S {
    type Model = S::Model;

    fn formulate(&mut self, graph: &MultiHypothesesGraph) -> Result<Self::Model> {
        (**self).formulate(graph)
    }

    fn infer(&mut self, model: &mut Self::Model) -> Result<f64> {
        (**self).infer(model)
    }

    fn conclude(&mut self, graph: &mut MultiHypothesesGraph, model: &Self::Model) -> Result<()> {
        (**self).conclude(graph, model)
    }

    fn model_stage(&self, model: &Self::Model) -> Option<ModelStage> {
        (**self).model_stage(model)
    }
}

pub struct Reasoner<S: Solver> {
    solver: S,
    model: Option<S::Model>,
    objective: Option<f64>,
}

impl<S: Solver> Reasoner<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            model: None,
            objective: None,
        }
    }

    /// Build a fresh model, discarding any previous one.
    pub fn formulate(&mut self, graph: &MultiHypothesesGraph) -> Result<()> {
        self.objective = None;
        self.model = None;
        let model = self.solver.formulate(graph)?;
        self.model = Some(model);
        Ok(())
    }

    pub fn infer(&mut self) -> Result<f64> {
        let model = self.model.as_mut().ok_or(TrackingError::NotFormulated)?;
        let objective = self.solver.infer(model)?;
        self.objective = Some(objective);
        Ok(objective)
    }

    pub fn conclude(&mut self, graph: &mut MultiHypothesesGraph) -> Result<()> {
        if self.objective.is_none() {
            return Err(TrackingError::Solver(
                "conclude called before a successful inference".to_string(),
            ));
        }
        let model = self.model.as_ref().ok_or(TrackingError::NotFormulated)?;
        self.solver.conclude(graph, model)
    }

    pub fn model(&self) -> Option<&S::Model> {
        self.model.as_ref()
    }

    pub fn objective(&self) -> Option<f64> {
        self.objective
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{extract_events, EventKind};
    use crate::traxel::Traxel;
    use crate::types::feature;

    /// Programs a fixed solution: every traxel active, given outgoing lists.
    struct Scripted {
        outgoing: Vec<(u32, Vec<f32>)>,
        fail: bool,
    }

    impl Solver for Scripted {
        type Model = usize;

        fn formulate(&mut self, graph: &MultiHypothesesGraph) -> Result<usize> {
            Ok(graph.traxel_count())
        }

        fn infer(&mut self, model: &mut usize) -> Result<f64> {
            if self.fail {
                return Err(TrackingError::Solver("infeasible".to_string()));
            }
            Ok(*model as f64)
        }

        fn conclude(&mut self, graph: &mut MultiHypothesesGraph, _model: &usize) -> Result<()> {
            let nodes: Vec<_> = graph.nodes().collect();
            for node in nodes {
                for traxel in graph.regions_mut(node) {
                    let outgoing = self
                        .outgoing
                        .iter()
                        .find(|(id, _)| *id == traxel.id && traxel.timestep == 0)
                        .map(|(_, o)| o.clone())
                        .unwrap_or_default();
                    let parent = if traxel.timestep == 0 { vec![] } else { vec![1.0] };
                    traxel.set_feature(feature::ACTIVE, vec![1.0]);
                    traxel.set_feature(feature::OUTGOING, outgoing);
                    traxel.set_feature(feature::PARENT, parent);
                }
            }
            Ok(())
        }
    }

    fn two_frames() -> MultiHypothesesGraph {
        let mut g = MultiHypothesesGraph::new();
        let n0 = g.add_node(0);
        let n1 = g.add_node(1);
        g.add_traxel(n0, Traxel::new(1, 0)).unwrap();
        g.add_traxel(n1, Traxel::new(2, 1)).unwrap();
        g.add_traxel(n1, Traxel::new(3, 1)).unwrap();
        g
    }

    #[test]
    fn steps_run_in_order_with_a_scripted_solver() {
        let mut g = two_frames();
        let mut reasoner = Reasoner::new(Scripted {
            outgoing: vec![(1, vec![2.0, 3.0])],
            fail: false,
        });
        assert!(matches!(reasoner.infer(), Err(TrackingError::NotFormulated)));
        reasoner.formulate(&g).unwrap();
        assert_eq!(reasoner.model(), Some(&3));
        assert_eq!(reasoner.infer().unwrap(), 3.0);
        reasoner.conclude(&mut g).unwrap();

        let events = extract_events(&g).unwrap();
        assert_eq!(events[0].len(), 1);
        assert_eq!(events[0][0].kind, EventKind::Division);
        assert_eq!(events[0][0].traxel_ids, vec![1, 2, 3]);
        assert!(events[1].is_empty());
    }

    #[test]
    fn solver_failure_aborts_before_conclude() {
        let mut g = two_frames();
        let mut reasoner = Reasoner::new(Scripted {
            outgoing: Vec::new(),
            fail: true,
        });
        reasoner.formulate(&g).unwrap();
        assert!(matches!(reasoner.infer(), Err(TrackingError::Solver(_))));
        assert!(reasoner.conclude(&mut g).is_err());
        assert!(g.regions(g.nodes_at(0)[0])[0].features.is_empty());
    }

    #[test]
    fn failed_formulation_discards_the_previous_model() {
        use crate::model::{GreedySolver, ModelOptions};

        let mut good = MultiHypothesesGraph::new();
        let n = good.add_node(0);
        good.add_traxel(n, Traxel::new(1, 0)).unwrap();

        let mut bad = MultiHypothesesGraph::new();
        let n = bad.add_node(0);
        bad.add_traxel(n, Traxel::new(1, 0).with_feature(feature::CONFLICTS, vec![99.0]))
            .unwrap();

        let mut reasoner = Reasoner::new(GreedySolver::new(ModelOptions::default()));
        reasoner.formulate(&good).unwrap();
        reasoner.infer().unwrap();
        assert!(reasoner.formulate(&bad).is_err());
        assert!(reasoner.model().is_none());
        assert!(reasoner.objective().is_none());
        assert!(matches!(reasoner.infer(), Err(TrackingError::NotFormulated)));
        assert!(reasoner.conclude(&mut bad).is_err());
        assert!(bad.regions(bad.nodes_at(0)[0])[0].features.get(feature::ACTIVE).is_none());
    }
}
