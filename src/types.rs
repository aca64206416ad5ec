use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar type stored in feature lists.
pub type FeatureType = f32;

/// Ordered list of feature values.
pub type FeatureArray = Vec<FeatureType>;

/// Named feature lists attached to a traxel or arc. Ordered for reproducible output.
pub type FeatureMap = BTreeMap<String, FeatureArray>;

/// Identifier of a traxel; unique within a timestep.
pub type TraxelId = u32;

/// Frame index of a traxel or node.
pub type Timestep = i32;

/// Names of the features the pipeline reads or writes.
pub mod feature {
    pub const CONFLICTS: &str = "conflicts";
    pub const LEVEL: &str = "level";
    pub const COM: &str = "com";
    pub const ACTIVE: &str = "active";
    pub const OUTGOING: &str = "outgoing";
    pub const PARENT: &str = "parent";
    pub const DET_PROB: &str = "detProb";
    pub const DIV_PROB: &str = "divProb";
    pub const COUNT_PROB: &str = "count_prob";
    pub const MOVE_PROB: &str = "move_prob";
}

/// Convert a feature value holding an id back into an integer id.
///
/// Feature lists are float-valued; ids are exact up to 2^24.
pub fn feature_to_id(value: FeatureType) -> Option<TraxelId> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= 16_777_216.0 {
        Some(value as TraxelId)
    } else {
        None
    }
}

/// Inclusive timestep interval covered by a graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestepRange {
    pub earliest: Timestep,
    pub latest: Timestep,
}

impl TimestepRange {
    pub fn len(&self) -> usize {
        if self.latest < self.earliest {
            0
        } else {
            (i64::from(self.latest) - i64::from(self.earliest)) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, t: Timestep) -> bool {
        t >= self.earliest && t <= self.latest
    }
}
