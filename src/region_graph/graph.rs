use super::region::Region;
use crate::error::RegionError;
use crate::types::{FeatureArray, FeatureMap};
use nalgebra::Vector3;
use std::collections::BTreeSet;

/// Segmentation hypotheses of one frame with their conflict/neighbor closure.
///
/// Every per-region attribute is stored in a side table indexed by the
/// region handle. Leaves are added with [`add_region`](Self::add_region);
/// coarser hypotheses only appear through [`merge_regions`](Self::merge_regions).
#[derive(Clone, Debug, Default)]
pub struct RegionGraph {
    maximum_label: u32,
    labels: Vec<u32>,
    levels: Vec<u32>,
    neighbors: Vec<BTreeSet<Region>>,
    conflicts: Vec<BTreeSet<Region>>,
    contains: Vec<BTreeSet<Region>>,
    com: Vec<Option<Vector3<f32>>>,
    features: Vec<FeatureMap>,
}

impl RegionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of regions across all levels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether `r` was issued by this graph.
    pub fn valid(&self, r: Region) -> bool {
        r.index() < self.labels.len()
    }

    /// All regions in creation order.
    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        (0..self.labels.len() as u32).map(Region)
    }

    /// Largest label handed out so far (`0` for an empty graph).
    pub fn maximum_label(&self) -> u32 {
        self.maximum_label
    }

    /// Add a level-0 region produced by the upstream segmentation.
    pub fn add_region(&mut self, com: Option<Vector3<f32>>) -> Region {
        self.allocate(0, com)
    }

    fn allocate(&mut self, level: u32, com: Option<Vector3<f32>>) -> Region {
        let region = Region(self.labels.len() as u32);
        self.maximum_label += 1;
        self.labels.push(self.maximum_label);
        self.levels.push(level);
        self.neighbors.push(BTreeSet::new());
        self.conflicts.push(BTreeSet::new());
        self.contains.push(BTreeSet::new());
        self.com.push(com);
        self.features.push(FeatureMap::new());
        region
    }

    fn check_pair(&self, r1: Region, r2: Region) -> Result<(), RegionError> {
        if !self.valid(r1) {
            return Err(RegionError::InvalidFirst);
        }
        if !self.valid(r2) {
            return Err(RegionError::InvalidSecond);
        }
        Ok(())
    }

    /// Mark two regions as spatial neighbors.
    ///
    /// Returns `Ok(false)` without changing anything when the regions are the
    /// same or already conflict.
    pub fn add_neighbors(&mut self, r1: Region, r2: Region) -> Result<bool, RegionError> {
        self.check_pair(r1, r2)?;
        if r1 == r2 || self.conflicts[r1.index()].contains(&r2) {
            return Ok(false);
        }
        self.neighbors[r1.index()].insert(r2);
        self.neighbors[r2.index()].insert(r1);
        Ok(true)
    }

    /// Mark two regions as mutually exclusive. A conflict replaces any
    /// neighbor relation between the pair.
    pub fn add_conflict(&mut self, r1: Region, r2: Region) -> Result<(), RegionError> {
        self.check_pair(r1, r2)?;
        if r1 == r2 {
            return Ok(());
        }
        self.neighbors[r1.index()].remove(&r2);
        self.neighbors[r2.index()].remove(&r1);
        self.conflicts[r1.index()].insert(r2);
        self.conflicts[r2.index()].insert(r1);
        Ok(())
    }

    /// Merge two regions into a new, coarser hypothesis.
    ///
    /// Nothing is modified when either handle is invalid; the error's
    /// [`code`](RegionError::code) is the merge status (`1` or `2`).
    pub fn merge_regions(&mut self, r1: Region, r2: Region) -> Result<Region, RegionError> {
        self.check_pair(r1, r2)?;

        let level = self.levels[r1.index()].min(self.levels[r2.index()]);
        let com = match (self.com[r1.index()], self.com[r2.index()]) {
            (Some(a), Some(b)) => Some((a + b) * 0.5),
            _ => None,
        };
        let merged = self.allocate(level, com);

        self.union_conflicts(r1, r2, merged);
        self.union_neighbors(r1, r2, merged);

        let contains = &mut self.contains[merged.index()];
        contains.insert(r1);
        contains.insert(r2);
        Ok(merged)
    }

    /// Integer form of [`merge_regions`](Self::merge_regions): `0` on success.
    pub fn merge_status(&mut self, r1: Region, r2: Region) -> i32 {
        match self.merge_regions(r1, r2) {
            Ok(_) => 0,
            Err(e) => e.code(),
        }
    }

    fn union_conflicts(&mut self, r1: Region, r2: Region, merged: Region) {
        let mut conflicts: BTreeSet<Region> = self.conflicts[r1.index()]
            .union(&self.conflicts[r2.index()])
            .copied()
            .collect();
        conflicts.insert(r1);
        conflicts.insert(r2);
        for r in &conflicts {
            self.conflicts[r.index()].insert(merged);
        }
        self.conflicts[merged.index()] = conflicts;
    }

    // Must run after union_conflicts: the filter reads the merged conflict set.
    fn union_neighbors(&mut self, r1: Region, r2: Region, merged: Region) {
        let excluded = &self.conflicts[merged.index()];
        let neighbors: BTreeSet<Region> = self.neighbors[r1.index()]
            .union(&self.neighbors[r2.index()])
            .filter(|r| !excluded.contains(r))
            .copied()
            .collect();
        for r in &neighbors {
            self.neighbors[r.index()].insert(merged);
        }
        self.neighbors[merged.index()] = neighbors;
    }

    pub fn label(&self, r: Region) -> Option<u32> {
        self.labels.get(r.index()).copied()
    }

    /// Region carrying `label`, if any.
    pub fn region_by_label(&self, label: u32) -> Option<Region> {
        // labels are strictly increasing, so the table is sorted
        self.labels
            .binary_search(&label)
            .ok()
            .map(|i| Region(i as u32))
    }

    pub fn level(&self, r: Region) -> Option<u32> {
        self.levels.get(r.index()).copied()
    }

    pub fn neighbors(&self, r: Region) -> Option<&BTreeSet<Region>> {
        self.neighbors.get(r.index())
    }

    pub fn conflicts(&self, r: Region) -> Option<&BTreeSet<Region>> {
        self.conflicts.get(r.index())
    }

    /// Direct children of a merged region; empty for leaves.
    pub fn contains(&self, r: Region) -> Option<&BTreeSet<Region>> {
        self.contains.get(r.index())
    }

    /// Level-0 regions reachable through containment (the region itself for a leaf).
    pub fn leaves(&self, r: Region) -> Vec<Region> {
        let mut out = BTreeSet::new();
        let mut stack = vec![r];
        while let Some(current) = stack.pop() {
            match self.contains.get(current.index()) {
                Some(children) if !children.is_empty() => stack.extend(children.iter().copied()),
                Some(_) => {
                    out.insert(current);
                }
                None => {}
            }
        }
        out.into_iter().collect()
    }

    pub fn com(&self, r: Region) -> Option<Vector3<f32>> {
        self.com.get(r.index()).copied().flatten()
    }

    pub fn features(&self, r: Region) -> Option<&FeatureMap> {
        self.features.get(r.index())
    }

    /// Attach a named feature list. Returns `false` for an invalid handle.
    pub fn set_feature(&mut self, r: Region, name: &str, values: FeatureArray) -> bool {
        match self.features.get_mut(r.index()) {
            Some(map) => {
                map.insert(name.to_string(), values);
                true
            }
            None => false,
        }
    }
}
