//! Temporal graph construction from a traxel store.
//!
//! One node is created per timestep of `[earliest, latest]`, holding every
//! hypothesis of that frame. Arcs connect each hypothesis to its nearest
//! hypotheses in the next frame (by center of mass) within a distance gate.
//! Candidate search per frame pair is independent and runs in parallel;
//! arcs are inserted sequentially afterwards so the graph is reproducible.

use super::graph::{MultiHypothesesGraph, NodeId};
use super::store::TraxelStore;
use crate::error::{Result, TrackingError};
use crate::traxel::Traxel;
use crate::types::Timestep;
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Linking configuration of the builder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuilderOptions {
    /// Maximum number of candidates per hypothesis.
    pub max_neighbors: usize,
    /// Maximum center-of-mass distance of a candidate pair.
    pub max_distance: f32,
    /// Also search backwards from t+1 to t and take the union.
    pub forward_backward: bool,
}

impl BuilderOptions {
    pub fn new(max_neighbors: usize, max_distance: f32, forward_backward: bool) -> Self {
        Self {
            max_neighbors,
            max_distance,
            forward_backward,
        }
    }
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            max_neighbors: 2,
            max_distance: 50.0,
            forward_backward: false,
        }
    }
}

/// Builds a [`MultiHypothesesGraph`] from a [`TraxelStore`].
#[derive(Clone, Debug, Default)]
pub struct MultiHypothesesGraphBuilder {
    options: BuilderOptions,
}

impl MultiHypothesesGraphBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn build(&self, store: &TraxelStore) -> Result<MultiHypothesesGraph> {
        let mut graph = MultiHypothesesGraph::new();
        let (Some(earliest), Some(latest)) = (store.earliest_timestep(), store.latest_timestep())
        else {
            return Ok(graph);
        };

        let mut nodes: Vec<NodeId> = Vec::new();
        for t in earliest..=latest {
            let node = graph.add_node(t);
            for traxel in store.frame(t) {
                graph.add_traxel(node, traxel.clone())?;
            }
            nodes.push(node);
        }

        let candidates: Vec<Vec<(usize, usize)>> = (earliest..latest)
            .into_par_iter()
            .map(|t| self.link_candidates(store.frame(t), store.frame(t + 1)))
            .collect::<Result<_>>()?;

        for (offset, pairs) in candidates.into_iter().enumerate() {
            let t = earliest + offset as Timestep;
            let (source, target) = (nodes[offset], nodes[offset + 1]);
            let (src, dst) = (store.frame(t), store.frame(t + 1));
            for (i, j) in pairs {
                graph.add_arc(source, src[i].id, target, dst[j].id)?;
            }
        }
        Ok(graph)
    }

    /// Compatible `(source index, target index)` pairs, ordered by source then target.
    fn link_candidates(&self, src: &[Traxel], dst: &[Traxel]) -> Result<Vec<(usize, usize)>> {
        if src.is_empty() || dst.is_empty() || self.options.max_neighbors == 0 {
            return Ok(Vec::new());
        }
        let src_com = coms(src)?;
        let dst_com = coms(dst)?;

        let mut pairs = BTreeSet::new();
        for (i, c) in src_com.iter().enumerate() {
            for j in self.nearest(c, &dst_com) {
                pairs.insert((i, j));
            }
        }
        if self.options.forward_backward {
            for (j, c) in dst_com.iter().enumerate() {
                for i in self.nearest(c, &src_com) {
                    pairs.insert((i, j));
                }
            }
        }
        Ok(pairs.into_iter().collect())
    }

    fn nearest(&self, from: &Vector3<f32>, pool: &[Vector3<f32>]) -> Vec<usize> {
        let mut within: Vec<(f32, usize)> = pool
            .iter()
            .enumerate()
            .map(|(k, p)| ((p - from).norm(), k))
            .filter(|(d, _)| *d <= self.options.max_distance)
            .collect();
        within.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        within
            .into_iter()
            .take(self.options.max_neighbors)
            .map(|(_, k)| k)
            .collect()
    }
}

fn coms(traxels: &[Traxel]) -> Result<Vec<Vector3<f32>>> {
    traxels
        .iter()
        .map(|t| {
            t.com().ok_or_else(|| {
                TrackingError::Store(format!("{t} has no center of mass; it cannot be linked"))
            })
        })
        .collect()
}
