use super::event::{Event, EventKind};
use crate::error::{Result, TrackingError};
use crate::hypotheses::MultiHypothesesGraph;
use crate::types::feature;

/// Decode a solved graph into one event list per timestep.
///
/// Every traxel must carry `active`; active traxels must also carry
/// `outgoing` and `parent`. An empty `outgoing` at the last timestep and an
/// empty `parent` at the first timestep mark the ends of the sequence and
/// produce no event.
pub fn extract_events(graph: &MultiHypothesesGraph) -> Result<Vec<Vec<Event>>> {
    let (Some(earliest), Some(latest)) = (graph.earliest_timestep(), graph.latest_timestep())
    else {
        return Ok(Vec::new());
    };

    let mut events = Vec::new();
    for timestep in graph.timesteps() {
        let mut events_at = Vec::new();
        for &node in graph.nodes_at(timestep) {
            for traxel in graph.regions(node) {
                if traxel.timestep != timestep {
                    return Err(TrackingError::Decoding(format!(
                        "{traxel} stored in a node at timestep {timestep}"
                    )));
                }
                let active = traxel.feature(feature::ACTIVE)?;
                let selected = active.first().copied().ok_or_else(|| {
                    TrackingError::Decoding(format!("{traxel} has an empty active feature"))
                })?;
                if selected <= 0.0 {
                    continue;
                }

                let outgoing = traxel.id_list(feature::OUTGOING)?;
                match outgoing.as_slice() {
                    [a, b] => events_at.push(Event::new(
                        EventKind::Division,
                        vec![traxel.id, *a, *b],
                    )),
                    [a] => events_at.push(Event::new(EventKind::Move, vec![traxel.id, *a])),
                    [] if timestep < latest => {
                        events_at.push(Event::new(EventKind::Disappearance, vec![traxel.id]))
                    }
                    [] => {}
                    more => {
                        return Err(TrackingError::Decoding(format!(
                            "{traxel} has {} outgoing links",
                            more.len()
                        )))
                    }
                }
                if traxel.feature(feature::PARENT)?.is_empty() && timestep > earliest {
                    events_at.push(Event::new(EventKind::Appearance, vec![traxel.id]));
                }
            }
        }
        events.push(events_at);
    }
    Ok(events)
}
