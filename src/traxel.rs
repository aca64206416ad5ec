//! Feature-bearing region hypotheses ("traxels").
//!
//! A traxel is one segmentation hypothesis at one timestep. Everything the
//! pipeline knows about it lives in named float lists: `conflicts` and `level`
//! come from the upstream segmentation, `com` positions it in space, and the
//! solver writes `active`, `outgoing` and `parent` back after inference.

use crate::error::{Result, TrackingError};
use crate::types::{feature, feature_to_id, FeatureArray, FeatureMap, Timestep, TraxelId};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Traxel {
    pub id: TraxelId,
    pub timestep: Timestep,
    #[serde(default)]
    pub features: FeatureMap,
}

impl Traxel {
    pub fn new(id: TraxelId, timestep: Timestep) -> Self {
        Self {
            id,
            timestep,
            features: FeatureMap::new(),
        }
    }

    pub fn with_feature(mut self, name: &str, values: FeatureArray) -> Self {
        self.features.insert(name.to_string(), values);
        self
    }

    pub fn set_feature(&mut self, name: &str, values: FeatureArray) {
        self.features.insert(name.to_string(), values);
    }

    /// Feature list by name, failing with [`TrackingError::MissingFeature`].
    pub fn feature(&self, name: &str) -> Result<&FeatureArray> {
        self.features
            .get(name)
            .ok_or_else(|| TrackingError::MissingFeature {
                id: self.id,
                timestep: self.timestep,
                name: name.to_string(),
            })
    }

    /// Center of mass, padded with zeros when fewer than three coordinates are stored.
    pub fn com(&self) -> Option<Vector3<f32>> {
        let com = self.features.get(feature::COM)?;
        if com.is_empty() {
            return None;
        }
        let at = |i: usize| com.get(i).copied().unwrap_or(0.0);
        Some(Vector3::new(at(0), at(1), at(2)))
    }

    /// Merge level; traxels without a `level` feature are leaves.
    pub fn level(&self) -> u32 {
        self.features
            .get(feature::LEVEL)
            .and_then(|l| l.first())
            .map(|&l| l.max(0.0) as u32)
            .unwrap_or(0)
    }

    /// Ids of the traxels this one conflicts with (same timestep).
    pub fn conflicts(&self) -> Result<Vec<TraxelId>> {
        match self.features.get(feature::CONFLICTS) {
            Some(values) => self.ids_from(feature::CONFLICTS, values),
            None => Ok(Vec::new()),
        }
    }

    /// Interpret a feature list as traxel ids. The feature must exist.
    pub fn id_list(&self, name: &str) -> Result<Vec<TraxelId>> {
        let values = self.feature(name)?;
        self.ids_from(name, values)
    }

    fn ids_from(&self, name: &str, values: &FeatureArray) -> Result<Vec<TraxelId>> {
        values
            .iter()
            .map(|&v| {
                feature_to_id(v).ok_or_else(|| {
                    TrackingError::Decoding(format!(
                        "feature {name:?} of traxel {} at timestep {} holds non-id value {v}",
                        self.id, self.timestep
                    ))
                })
            })
            .collect()
    }

    /// Squared center-of-mass distance to another traxel.
    pub fn squared_distance(&self, other: &Traxel) -> Option<f32> {
        Some((self.com()? - other.com()?).norm_squared())
    }
}

impl fmt::Display for Traxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Traxel(id: {}, timestep: {})", self.id, self.timestep)
    }
}
