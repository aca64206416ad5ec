use super::graph::RegionGraph;
use crate::traxel::Traxel;
use crate::types::{feature, FeatureType, Timestep};

impl RegionGraph {
    /// Export every hypothesis of the frame as a traxel for the temporal builder.
    ///
    /// Traxel ids are region labels. `conflicts` lists the labels of the
    /// conflicting regions, `level` the merge level and `com` the center of
    /// mass when known. Named region features are copied as-is.
    pub fn to_traxels(&self, timestep: Timestep) -> Vec<Traxel> {
        self.regions()
            .filter_map(|r| {
                let label = self.label(r)?;
                let mut traxel = Traxel::new(label, timestep);
                if let Some(features) = self.features(r) {
                    traxel.features.extend(features.clone());
                }
                let conflicts = self
                    .conflicts(r)?
                    .iter()
                    .filter_map(|&c| self.label(c))
                    .map(|l| l as FeatureType)
                    .collect();
                traxel.set_feature(feature::CONFLICTS, conflicts);
                traxel.set_feature(feature::LEVEL, vec![self.level(r)? as FeatureType]);
                if let Some(com) = self.com(r) {
                    traxel.set_feature(feature::COM, com.iter().copied().collect());
                }
                Some(traxel)
            })
            .collect()
    }
}
