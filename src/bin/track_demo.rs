use hypotheses_tracking::config::tracking::{load_config, RuntimeConfig};
use hypotheses_tracking::io::{load_traxel_store, write_json_file};
use hypotheses_tracking::tracking::TrackingOutcome;
use hypotheses_tracking::MultiHypothesesTracking;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "track_demo".to_string());
    let config_path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let store = load_traxel_store(&config.input).map_err(|e| e.to_string())?;
    let mut tracking =
        MultiHypothesesTracking::new(config.tracking.clone()).map_err(|e| e.to_string())?;
    let outcome = tracking.run(&store).map_err(|e| e.to_string())?;

    print_text_summary(&outcome);
    write_outputs(&config, &outcome)
}

fn write_outputs(config: &RuntimeConfig, outcome: &TrackingOutcome) -> Result<(), String> {
    if let Some(path) = &config.output.events_json {
        write_json_file(path, &outcome.events).map_err(|e| e.to_string())?;
        println!("Events written to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &outcome.report).map_err(|e| e.to_string())?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn print_text_summary(outcome: &TrackingOutcome) {
    let report = &outcome.report;
    println!("Tracking summary");
    println!(
        "  input: traxels={} frames={}",
        report.input.traxels, report.input.frames
    );
    println!(
        "  graph: nodes={} arcs={} traxels={}",
        report.graph.nodes, report.graph.arcs, report.graph.traxels
    );
    if let Some(model) = &report.model {
        println!(
            "  model: variables={} constraints={}",
            model.variables, model.constraints
        );
    }
    println!("  objective: {:.3}", report.objective);

    let summary = &report.summary;
    println!(
        "\nEvents: moves={} divisions={} appearances={} disappearances={}",
        summary.moves, summary.divisions, summary.appearances, summary.disappearances
    );
    let first = report.graph.timesteps.map(|range| range.earliest).unwrap_or(0);
    for (offset, events) in outcome.events.iter().enumerate() {
        if events.is_empty() {
            continue;
        }
        let line: Vec<String> = events.iter().map(|e| e.to_string()).collect();
        println!("  t={} {}", first + offset as i32, line.join(", "));
    }

    let timings: Vec<String> = report
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "\nTimings (ms): {} total={:.3}",
        timings.join(" "),
        report.timings.total_ms
    );
}
