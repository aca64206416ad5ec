use crate::types::TraxelId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Move,
    Division,
    Appearance,
    Disappearance,
    Void,
}

/// A decoded tracking outcome.
///
/// Participants by kind:
/// - `Move`: `[source, target]`
/// - `Division`: `[parent, child, child]`
/// - `Appearance` / `Disappearance`: `[traxel]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub kind: EventKind,
    pub traxel_ids: Vec<TraxelId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub energy: Option<f64>,
}

impl Event {
    pub fn new(kind: EventKind, traxel_ids: Vec<TraxelId>) -> Self {
        Self {
            kind,
            traxel_ids,
            energy: None,
        }
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.kind, self.traxel_ids)?;
        if let Some(e) = self.energy {
            write!(f, " energy={e:.3}")?;
        }
        Ok(())
    }
}

/// Event counts over a whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub moves: usize,
    pub divisions: usize,
    pub appearances: usize,
    pub disappearances: usize,
}

impl EventSummary {
    pub fn from_events(events: &[Vec<Event>]) -> Self {
        let mut summary = Self::default();
        for e in events.iter().flatten() {
            match e.kind {
                EventKind::Move => summary.moves += 1,
                EventKind::Division => summary.divisions += 1,
                EventKind::Appearance => summary.appearances += 1,
                EventKind::Disappearance => summary.disappearances += 1,
                EventKind::Void => {}
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.moves + self.divisions + self.appearances + self.disappearances
    }
}
