//! Reference assignment model and greedy solver.
//!
//! The model enumerates the binary decisions of a tracking run (detections,
//! appearances, disappearances, divisions, transitions) with their costs and
//! the constraints between them. [`GreedySolver`] implements the
//! [`Solver`](crate::reasoner::Solver) capability on top of it so the pipeline
//! runs end to end without an external optimizer.

mod cliques;
mod formulation;
mod greedy;
mod options;

pub use cliques::maximal_cliques;
pub use formulation::{
    Assignment, AssignmentModel, Constraint, Hypothesis, Transition, Variable, VariableKind,
};
pub use greedy::{greedy_assignment, GreedySolver};
pub use options::{DetectionCosts, ModelOptions};
