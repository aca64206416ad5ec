//! Probability features attached to hypotheses and arcs before formulation.

use super::graph::MultiHypothesesGraph;
use crate::error::{Result, TrackingError};
use crate::traxel::Traxel;
use crate::types::{feature, FeatureArray, FeatureType};

/// Predicts class probabilities for one hypothesis, or for a pair when
/// scoring an arc (`[source, target]`).
pub trait Classifier {
    fn predict(&self, traxels: &[&Traxel]) -> FeatureArray;
}

/// Classifier returning `[1 - prob, prob]` for every input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantClassifier {
    prob: FeatureType,
}

impl ConstantClassifier {
    pub fn new(prob: FeatureType) -> Self {
        Self {
            prob: prob.clamp(0.0, 1.0),
        }
    }
}

impl Classifier for ConstantClassifier {
    fn predict(&self, _traxels: &[&Traxel]) -> FeatureArray {
        vec![1.0 - self.prob, self.prob]
    }
}

impl MultiHypothesesGraph {
    /// Write classifier predictions onto the graph.
    ///
    /// Every traxel receives `detProb`, `divProb` and `count_prob`; every arc
    /// receives `move_prob`. Existing values are overwritten.
    pub fn add_classifier_features(
        &mut self,
        mov: &dyn Classifier,
        division: &dyn Classifier,
        count: &dyn Classifier,
        detection: &dyn Classifier,
    ) -> Result<()> {
        let nodes: Vec<_> = self.nodes().collect();
        for node in nodes {
            for traxel in self.regions_mut(node) {
                let (det, div, cnt) = {
                    let this = [&*traxel];
                    (
                        detection.predict(&this),
                        division.predict(&this),
                        count.predict(&this),
                    )
                };
                traxel.set_feature(feature::DET_PROB, det);
                traxel.set_feature(feature::DIV_PROB, div);
                traxel.set_feature(feature::COUNT_PROB, cnt);
            }
        }

        let mut move_probs = Vec::with_capacity(self.arc_count());
        for (id, arc) in self.arcs() {
            let from = self
                .traxel(arc.source, arc.from)
                .ok_or(TrackingError::UnknownTraxel {
                    node: arc.source.0 as usize,
                    id: arc.from,
                })?;
            let to = self
                .traxel(arc.target, arc.to)
                .ok_or(TrackingError::UnknownTraxel {
                    node: arc.target.0 as usize,
                    id: arc.to,
                })?;
            move_probs.push((id, mov.predict(&[from, to])));
        }
        for (id, probs) in move_probs {
            if let Some(features) = self.arc_features_mut(id) {
                features.insert(feature::MOVE_PROB.to_string(), probs);
            }
        }
        Ok(())
    }
}
