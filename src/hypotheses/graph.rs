use crate::error::{Result, TrackingError};
use crate::traxel::Traxel;
use crate::types::{FeatureMap, Timestep, TimestepRange, TraxelId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle of a node (one timestep's group of hypotheses).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Handle of a candidate correspondence between two hypotheses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArcId(pub u32);

/// Candidate correspondence from traxel `from` in `source` (timestep t) to
/// traxel `to` in `target` (timestep t+1).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArcData {
    pub source: NodeId,
    pub target: NodeId,
    pub from: TraxelId,
    pub to: TraxelId,
    pub features: FeatureMap,
}

/// Temporal graph of segmentation hypotheses.
///
/// Nodes and arcs live in arenas indexed by their handles; the contained
/// regions, timesteps and adjacency lists are side tables over those
/// indices. Nothing is ever removed.
#[derive(Clone, Debug, Default)]
pub struct MultiHypothesesGraph {
    timesteps: Vec<Timestep>,
    regions: Vec<Vec<Traxel>>,
    out_arcs: Vec<Vec<ArcId>>,
    in_arcs: Vec<Vec<ArcId>>,
    arcs: Vec<ArcData>,
    by_timestep: BTreeMap<Timestep, Vec<NodeId>>,
}

impl MultiHypothesesGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, timestep: Timestep) -> NodeId {
        let node = NodeId(self.timesteps.len() as u32);
        self.timesteps.push(timestep);
        self.regions.push(Vec::new());
        self.out_arcs.push(Vec::new());
        self.in_arcs.push(Vec::new());
        self.by_timestep.entry(timestep).or_default().push(node);
        node
    }

    fn check_node(&self, node: NodeId) -> Result<usize> {
        let idx = node.0 as usize;
        if idx < self.timesteps.len() {
            Ok(idx)
        } else {
            Err(TrackingError::InvalidNode(idx))
        }
    }

    /// Append a hypothesis to a node; its timestep must match the node's.
    pub fn add_traxel(&mut self, node: NodeId, traxel: Traxel) -> Result<()> {
        let idx = self.check_node(node)?;
        if traxel.timestep != self.timesteps[idx] {
            return Err(TrackingError::Store(format!(
                "{traxel} does not belong to node {idx} at timestep {}",
                self.timesteps[idx]
            )));
        }
        if self.regions[idx].iter().any(|t| t.id == traxel.id) {
            return Err(TrackingError::Store(format!(
                "duplicate traxel id {} in node {idx}",
                traxel.id
            )));
        }
        self.regions[idx].push(traxel);
        Ok(())
    }

    /// Link traxel `from` of `source` to traxel `to` of `target`.
    ///
    /// The target node must sit exactly one timestep after the source node.
    pub fn add_arc(
        &mut self,
        source: NodeId,
        from: TraxelId,
        target: NodeId,
        to: TraxelId,
    ) -> Result<ArcId> {
        let s = self.check_node(source)?;
        let t = self.check_node(target)?;
        if self.timesteps[t] != self.timesteps[s] + 1 {
            return Err(TrackingError::Store(format!(
                "arc from timestep {} to {} does not connect consecutive timesteps",
                self.timesteps[s], self.timesteps[t]
            )));
        }
        if self.traxel(source, from).is_none() {
            return Err(TrackingError::UnknownTraxel { node: s, id: from });
        }
        if self.traxel(target, to).is_none() {
            return Err(TrackingError::UnknownTraxel { node: t, id: to });
        }
        let arc = ArcId(self.arcs.len() as u32);
        self.arcs.push(ArcData {
            source,
            target,
            from,
            to,
            features: FeatureMap::new(),
        });
        self.out_arcs[s].push(arc);
        self.in_arcs[t].push(arc);
        Ok(arc)
    }

    pub fn node_count(&self) -> usize {
        self.timesteps.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Total number of hypotheses over all nodes.
    pub fn traxel_count(&self) -> usize {
        self.regions.iter().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.timesteps.len() as u32).map(NodeId)
    }

    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, &ArcData)> + '_ {
        self.arcs
            .iter()
            .enumerate()
            .map(|(i, a)| (ArcId(i as u32), a))
    }

    pub fn arc(&self, arc: ArcId) -> Option<&ArcData> {
        self.arcs.get(arc.0 as usize)
    }

    pub(crate) fn arc_features_mut(&mut self, arc: ArcId) -> Option<&mut FeatureMap> {
        self.arcs.get_mut(arc.0 as usize).map(|a| &mut a.features)
    }

    pub fn timestep(&self, node: NodeId) -> Option<Timestep> {
        self.timesteps.get(node.0 as usize).copied()
    }

    /// Contained regions of a node, in insertion order.
    pub fn regions(&self, node: NodeId) -> &[Traxel] {
        self.regions
            .get(node.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable access to a node's regions; the set itself cannot grow or shrink.
    pub fn regions_mut(&mut self, node: NodeId) -> &mut [Traxel] {
        self.regions
            .get_mut(node.0 as usize)
            .map(Vec::as_mut_slice)
            .unwrap_or(&mut [])
    }

    pub fn traxel(&self, node: NodeId, id: TraxelId) -> Option<&Traxel> {
        self.regions(node).iter().find(|t| t.id == id)
    }

    pub fn traxel_mut(&mut self, node: NodeId, id: TraxelId) -> Option<&mut Traxel> {
        self.regions_mut(node).iter_mut().find(|t| t.id == id)
    }

    pub fn out_arcs(&self, node: NodeId) -> &[ArcId] {
        self.out_arcs
            .get(node.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn in_arcs(&self, node: NodeId) -> &[ArcId] {
        self.in_arcs
            .get(node.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nodes at timestep `t`, in insertion order.
    pub fn nodes_at(&self, t: Timestep) -> &[NodeId] {
        self.by_timestep
            .get(&t)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct timesteps that own at least one node, ascending.
    pub fn timesteps(&self) -> impl Iterator<Item = Timestep> + '_ {
        self.by_timestep.keys().copied()
    }

    pub fn earliest_timestep(&self) -> Option<Timestep> {
        self.by_timestep.keys().next().copied()
    }

    pub fn latest_timestep(&self) -> Option<Timestep> {
        self.by_timestep.keys().next_back().copied()
    }

    pub fn timestep_range(&self) -> Option<TimestepRange> {
        Some(TimestepRange {
            earliest: self.earliest_timestep()?,
            latest: self.latest_timestep()?,
        })
    }
}
