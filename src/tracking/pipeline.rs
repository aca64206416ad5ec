use super::options::TrackingOptions;
use crate::diagnostics::{elapsed_ms, GraphStage, InputDescriptor, TimingBreakdown, TrackingReport};
use crate::error::Result;
use crate::events::{extract_events, Event, EventSummary};
use crate::hypotheses::{ConstantClassifier, MultiHypothesesGraphBuilder, TraxelStore};
use crate::logging::{LogFacade, Logger};
use crate::model::GreedySolver;
use crate::reasoner::{Reasoner, Solver};
use serde::Serialize;
use std::time::Instant;

/// Events of a run together with its report.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingOutcome {
    pub events: Vec<Vec<Event>>,
    pub report: TrackingReport,
}

/// End-to-end tracking: build → classify → formulate → infer → conclude → extract.
pub struct MultiHypothesesTracking<S: Solver = GreedySolver> {
    options: TrackingOptions,
    solver: S,
    logger: Box<dyn Logger>,
}

impl MultiHypothesesTracking<GreedySolver> {
    /// Tracking with the built-in greedy solver configured from `options`.
    pub fn new(options: TrackingOptions) -> Result<Self> {
        options.validate()?;
        let solver = GreedySolver::new(options.model_options()?);
        Self::with_solver(options, solver)
    }
}

impl<S: Solver> MultiHypothesesTracking<S> {
    pub fn with_solver(options: TrackingOptions, solver: S) -> Result<Self> {
        options.validate()?;
        let logger = Box::new(LogFacade::new(options.verbosity));
        Ok(Self {
            options,
            solver,
            logger,
        })
    }

    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    pub fn options(&self) -> &TrackingOptions {
        &self.options
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn run(&mut self, store: &TraxelStore) -> Result<TrackingOutcome> {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let options = &self.options;
        let logger = self.logger.as_ref();
        options.validate()?;

        logger.info(format_args!(
            "Calling multi-hypotheses tracking with the following parameters:"
        ));
        for line in options.describe() {
            logger.info(format_args!("\t{line}"));
        }

        let builder = MultiHypothesesGraphBuilder::new(options.builder_options()?);
        logger.debug(format_args!(
            "building graph from {} traxels in {} frames",
            store.len(),
            store.timesteps().count()
        ));
        let mut graph = timings.time("build", || builder.build(store))?;

        if options.with_constant_classifiers {
            logger.info(format_args!("using constant classifiers"));
            let constant = ConstantClassifier::new(options.get_weight("const_prob")? as f32);
            timings.time("classifiers", || {
                graph.add_classifier_features(&constant, &constant, &constant, &constant)
            })?;
        } else if options.with_classifiers {
            logger.info(format_args!("using classifiers"));
        }

        let mut reasoner = Reasoner::new(&mut self.solver);
        timings.time("formulate", || reasoner.formulate(&graph))?;
        let model = reasoner
            .model()
            .and_then(|model| reasoner.solver().model_stage(model));
        if let Some(stage) = &model {
            logger.debug(format_args!(
                "model: {} variables, {} constraints",
                stage.variables, stage.constraints
            ));
        }

        let objective = timings.time("infer", || reasoner.infer())?;
        logger.debug(format_args!("solution objective: {objective}"));

        timings.time("conclude", || reasoner.conclude(&mut graph))?;
        let events = timings.time("events", || extract_events(&graph))?;

        let summary = EventSummary::from_events(&events);
        timings.total_ms = elapsed_ms(total_start);
        logger.info(format_args!(
            "tracking done: moves={} divisions={} appearances={} disappearances={} total_ms={:.3}",
            summary.moves,
            summary.divisions,
            summary.appearances,
            summary.disappearances,
            timings.total_ms
        ));

        let report = TrackingReport {
            input: InputDescriptor::from_store(store),
            graph: GraphStage::from_graph(&graph),
            model,
            objective,
            summary,
            timings,
        };
        Ok(TrackingOutcome { events, report })
    }
}
