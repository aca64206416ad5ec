use crate::error::{Result, TrackingError};
use crate::traxel::Traxel;
use crate::types::{Timestep, TraxelId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-timestep collection of region hypotheses consumed by the graph builder.
///
/// Within a timestep traxels keep their insertion order and ids must be unique.
/// On disk the store is a flat JSON array of traxels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Traxel>", try_from = "Vec<Traxel>")]
pub struct TraxelStore {
    frames: BTreeMap<Timestep, Vec<Traxel>>,
}

impl TraxelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, traxel: Traxel) -> Result<()> {
        let frame = self.frames.entry(traxel.timestep).or_default();
        if frame.iter().any(|t| t.id == traxel.id) {
            return Err(TrackingError::Store(format!(
                "duplicate traxel id {} at timestep {}",
                traxel.id, traxel.timestep
            )));
        }
        frame.push(traxel);
        Ok(())
    }

    pub fn from_traxels<I: IntoIterator<Item = Traxel>>(traxels: I) -> Result<Self> {
        let mut store = Self::new();
        for t in traxels {
            store.add(t)?;
        }
        Ok(store)
    }

    /// Traxels at `t` in insertion order (empty when the frame is absent).
    pub fn frame(&self, t: Timestep) -> &[Traxel] {
        self.frames.get(&t).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, t: Timestep, id: TraxelId) -> Option<&Traxel> {
        self.frame(t).iter().find(|tr| tr.id == id)
    }

    pub fn earliest_timestep(&self) -> Option<Timestep> {
        self.frames.keys().next().copied()
    }

    pub fn latest_timestep(&self) -> Option<Timestep> {
        self.frames.keys().next_back().copied()
    }

    /// Timesteps that hold at least one traxel, ascending.
    pub fn timesteps(&self) -> impl Iterator<Item = Timestep> + '_ {
        self.frames.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All traxels, by timestep then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Traxel> + '_ {
        self.frames.values().flatten()
    }
}

impl From<TraxelStore> for Vec<Traxel> {
    fn from(store: TraxelStore) -> Self {
        store.frames.into_values().flatten().collect()
    }
}

impl TryFrom<Vec<Traxel>> for TraxelStore {
    type Error = TrackingError;

    fn try_from(traxels: Vec<Traxel>) -> Result<Self> {
        Self::from_traxels(traxels)
    }
}
