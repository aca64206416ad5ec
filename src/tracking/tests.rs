use super::*;
use crate::error::TrackingError;
use crate::events::{Event, EventKind};
use crate::hypotheses::TraxelStore;
use crate::logging::MemoryLogger;
use crate::traxel::Traxel;
use crate::types::feature;
use log::{Level, LevelFilter};
use std::sync::Arc;

fn cell(id: u32, t: i32, x: f32) -> Traxel {
    Traxel::new(id, t)
        .with_feature(feature::COM, vec![x, 0.0, 0.0])
        .with_feature(feature::LEVEL, vec![0.0])
        .with_feature(feature::CONFLICTS, vec![])
}

fn dividing_store() -> TraxelStore {
    TraxelStore::from_traxels([
        cell(1, 0, 10.0),
        cell(1, 1, 11.0),
        cell(2, 2, 8.0),
        cell(3, 2, 14.0),
    ])
    .unwrap()
}

#[test]
fn missing_weight_is_reported_by_name() {
    let mut options = TrackingOptions::default();
    options.weights.remove("neighbors");
    match MultiHypothesesTracking::new(options) {
        Err(TrackingError::MissingWeight(name)) => assert_eq!(name, "neighbors"),
        other => panic!("expected missing weight, got {:?}", other.err()),
    }
}

#[test]
fn classifier_runs_require_the_move_weight() {
    let mut options = TrackingOptions {
        with_constant_classifiers: true,
        ..TrackingOptions::default()
    };
    options.weights.remove("mov");
    assert!(matches!(
        options.validate(),
        Err(TrackingError::MissingWeight(name)) if name == "mov"
    ));
    options.with_constant_classifiers = false;
    assert!(options.validate().is_ok());
}

#[test]
fn model_options_follow_the_flags() {
    let options = TrackingOptions {
        with_detection_vars: true,
        with_divisions: true,
        ..TrackingOptions::default()
    }
    .with_weight("det", 3.0)
    .with_weight("mis", 4.0)
    .with_weight("div", 7.0)
    .with_weight("timeout", 0.0);
    let model = options.model_options().unwrap();
    let det = model.detection.unwrap();
    assert_eq!((det.detection, det.misdetection), (3.0, 4.0));
    assert_eq!(model.division, Some(7.0));
    assert_eq!(model.timeout, None);
    assert!(!model.with_classifier_costs);

    let builder = options.builder_options().unwrap();
    assert_eq!(builder.max_neighbors, 2);
    assert!(!builder.forward_backward);
}

#[test]
fn options_deserialize_with_defaults() {
    let options: TrackingOptions = serde_json::from_str(
        r#"{ "with_divisions": true, "verbosity": "DEBUG" }"#,
    )
    .unwrap();
    assert!(options.with_divisions);
    assert_eq!(options.verbosity, LevelFilter::Debug);
    assert_eq!(options.get_weight("app").unwrap(), 1000.0);
}

#[test]
fn run_tracks_a_dividing_cell() {
    let options = TrackingOptions {
        with_divisions: true,
        ..TrackingOptions::default()
    }
    .with_weight("div", 10.0);
    let mut tracking = MultiHypothesesTracking::new(options).unwrap();
    let outcome = tracking.run(&dividing_store()).unwrap();

    assert_eq!(
        outcome.events,
        vec![
            vec![Event::new(EventKind::Move, vec![1, 1])],
            vec![Event::new(EventKind::Division, vec![1, 2, 3])],
            vec![],
        ]
    );
    let report = &outcome.report;
    assert_eq!(report.summary.moves, 1);
    assert_eq!(report.summary.divisions, 1);
    assert_eq!(report.graph.nodes, 3);
    assert_eq!(report.graph.arcs, 3);
    assert_eq!(
        report.graph.timesteps.map(|r| (r.earliest, r.latest)),
        Some((0, 2))
    );
    assert_eq!(report.input.frames, 3);
    assert!(report.model.is_some());
    let labels: Vec<_> = report.timings.stages.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["build", "formulate", "infer", "conclude", "events"]);
}

#[test]
fn parameters_are_logged_before_the_run() {
    let logger = Arc::new(MemoryLogger::new(LevelFilter::Info));
    let options = TrackingOptions {
        with_constant_classifiers: true,
        ..TrackingOptions::default()
    };
    let mut tracking = MultiHypothesesTracking::new(options)
        .unwrap()
        .with_logger(Arc::clone(&logger));
    let outcome = tracking.run(&dividing_store()).unwrap();
    assert!(outcome.report.timings.stage("classifiers").is_some());

    let lines = logger.lines();
    assert!(lines[0].1.starts_with("Calling multi-hypotheses tracking"));
    assert!(lines.iter().any(|(_, l)| l == "\tappearance: 1000"));
    assert!(lines.iter().any(|(_, l)| l == "using constant classifiers"));
    assert!(lines.iter().all(|(level, _)| *level == Level::Info));
}

#[test]
fn empty_store_yields_no_events() {
    let mut tracking = MultiHypothesesTracking::new(TrackingOptions::default()).unwrap();
    let outcome = tracking.run(&TraxelStore::new()).unwrap();
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.report.objective, 0.0);
}
