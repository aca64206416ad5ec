use super::*;
use crate::error::TrackingError;
use crate::traxel::Traxel;
use crate::types::{feature, Timestep};

fn traxel(id: u32, t: Timestep, x: f32) -> Traxel {
    Traxel::new(id, t).with_feature(feature::COM, vec![x, 0.0, 0.0])
}

fn store(traxels: Vec<Traxel>) -> TraxelStore {
    TraxelStore::from_traxels(traxels).unwrap()
}

fn arc_pairs(g: &MultiHypothesesGraph) -> Vec<(u32, u32)> {
    g.arcs().map(|(_, a)| (a.from, a.to)).collect()
}

#[test]
fn builder_creates_one_node_per_timestep_including_gaps() {
    let s = store(vec![traxel(1, 2, 0.0), traxel(1, 5, 0.0)]);
    let g = MultiHypothesesGraphBuilder::new(BuilderOptions::default())
        .build(&s)
        .unwrap();
    assert_eq!(g.node_count(), 4);
    assert_eq!(g.timesteps().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    assert_eq!(g.earliest_timestep(), Some(2));
    assert_eq!(g.latest_timestep(), Some(5));
    assert!(g.regions(g.nodes_at(3)[0]).is_empty());
    assert_eq!(g.arc_count(), 0);
}

#[test]
fn builder_accepts_negative_timesteps() {
    let s = store(vec![traxel(1, -3, 0.0), traxel(1, -2, 1.0)]);
    let g = MultiHypothesesGraphBuilder::new(BuilderOptions::default())
        .build(&s)
        .unwrap();
    let range = g.timestep_range().unwrap();
    assert_eq!((range.earliest, range.latest), (-3, -2));
    assert_eq!(range.len(), g.node_count());
    assert_eq!(arc_pairs(&g), vec![(1, 1)]);
}

#[test]
fn builder_respects_neighbor_limit_and_distance() {
    let s = store(vec![
        traxel(1, 0, 0.0),
        traxel(1, 1, 1.0),
        traxel(2, 1, 2.0),
        traxel(3, 1, 3.0),
        traxel(4, 1, 100.0),
    ]);
    let g = MultiHypothesesGraphBuilder::new(BuilderOptions::new(2, 10.0, false))
        .build(&s)
        .unwrap();
    assert_eq!(arc_pairs(&g), vec![(1, 1), (1, 2)]);

    let g = MultiHypothesesGraphBuilder::new(BuilderOptions::new(5, 10.0, false))
        .build(&s)
        .unwrap();
    assert_eq!(arc_pairs(&g), vec![(1, 1), (1, 2), (1, 3)]);
}

#[test]
fn forward_backward_adds_reverse_nearest_pairs() {
    // mutual nearest pairs: the backward pass adds nothing new
    let s = store(vec![
        traxel(1, 0, 0.0),
        traxel(2, 0, 10.0),
        traxel(3, 1, 9.0),
        traxel(4, 1, -1.0),
    ]);
    let forward = MultiHypothesesGraphBuilder::new(BuilderOptions::new(1, 20.0, false))
        .build(&s)
        .unwrap();
    assert_eq!(arc_pairs(&forward), vec![(1, 4), (2, 3)]);

    let both = MultiHypothesesGraphBuilder::new(BuilderOptions::new(1, 20.0, true))
        .build(&s)
        .unwrap();
    assert_eq!(arc_pairs(&both), vec![(1, 4), (2, 3)]);

    let s = store(vec![traxel(1, 0, 0.0), traxel(2, 0, 10.0), traxel(3, 1, 1.0)]);
    let both = MultiHypothesesGraphBuilder::new(BuilderOptions::new(1, 20.0, true))
        .build(&s)
        .unwrap();
    // forward: 1->3, 2->3; backward: 3->1 (already present)
    assert_eq!(arc_pairs(&both), vec![(1, 3), (2, 3)]);
    let forward = MultiHypothesesGraphBuilder::new(BuilderOptions::new(1, 5.0, false))
        .build(&s)
        .unwrap();
    assert_eq!(arc_pairs(&forward), vec![(1, 3)]);
}

#[test]
fn backward_search_links_targets_missed_forward() {
    // both sources prefer target 3; target 4 is only reached backwards
    let s = store(vec![
        traxel(1, 0, 0.0),
        traxel(2, 0, 1.0),
        traxel(3, 1, 0.5),
        traxel(4, 1, 3.0),
    ]);
    let forward = MultiHypothesesGraphBuilder::new(BuilderOptions::new(1, 10.0, false))
        .build(&s)
        .unwrap();
    assert_eq!(arc_pairs(&forward), vec![(1, 3), (2, 3)]);
    let both = MultiHypothesesGraphBuilder::new(BuilderOptions::new(1, 10.0, true))
        .build(&s)
        .unwrap();
    assert_eq!(arc_pairs(&both), vec![(1, 3), (2, 3), (2, 4)]);
}

#[test]
fn build_is_reproducible() {
    let traxels: Vec<Traxel> = (0..4)
        .flat_map(|t| (1..6).map(move |id| traxel(id, t, (id * 3 + t as u32) as f32)))
        .collect();
    let s = store(traxels);
    let builder = MultiHypothesesGraphBuilder::new(BuilderOptions::new(2, 8.0, true));
    let a = builder.build(&s).unwrap();
    let b = builder.build(&s).unwrap();
    assert_eq!(arc_pairs(&a), arc_pairs(&b));
    assert!(a.arc_count() > 0);
}

#[test]
fn linking_requires_center_of_mass() {
    let s = store(vec![traxel(1, 0, 0.0), Traxel::new(2, 1)]);
    let err = MultiHypothesesGraphBuilder::default().build(&s).unwrap_err();
    assert!(matches!(err, TrackingError::Store(_)), "{err}");
}

#[test]
fn arcs_must_connect_consecutive_timesteps() {
    let mut g = MultiHypothesesGraph::new();
    let n0 = g.add_node(0);
    let n2 = g.add_node(2);
    g.add_traxel(n0, Traxel::new(1, 0)).unwrap();
    g.add_traxel(n2, Traxel::new(1, 2)).unwrap();
    assert!(g.add_arc(n0, 1, n2, 1).is_err());
    assert!(matches!(
        g.add_traxel(n0, Traxel::new(2, 1)),
        Err(TrackingError::Store(_))
    ));
    let n1 = g.add_node(1);
    g.add_traxel(n1, Traxel::new(5, 1)).unwrap();
    assert!(matches!(
        g.add_arc(n0, 9, n1, 5),
        Err(TrackingError::UnknownTraxel { id: 9, .. })
    ));
    let arc = g.add_arc(n0, 1, n1, 5).unwrap();
    assert_eq!(g.out_arcs(n0), &[arc]);
    assert_eq!(g.in_arcs(n1), &[arc]);
}

#[test]
fn constant_classifier_features_reach_traxels_and_arcs() {
    let s = store(vec![traxel(1, 0, 0.0), traxel(1, 1, 1.0)]);
    let mut g = MultiHypothesesGraphBuilder::default().build(&s).unwrap();
    let c = ConstantClassifier::new(0.75);
    g.add_classifier_features(&c, &c, &c, &c).unwrap();
    let node = g.nodes_at(0)[0];
    assert_eq!(
        g.regions(node)[0].feature(feature::DET_PROB).unwrap(),
        &vec![0.25, 0.75]
    );
    let (_, arc) = g.arcs().next().unwrap();
    assert_eq!(arc.features[feature::MOVE_PROB], vec![0.25, 0.75]);
}

#[test]
fn store_rejects_duplicate_ids_within_a_timestep() {
    let mut s = TraxelStore::new();
    s.add(Traxel::new(1, 0)).unwrap();
    s.add(Traxel::new(1, 1)).unwrap();
    assert!(s.add(Traxel::new(1, 0)).is_err());
    assert_eq!(s.len(), 2);
}

#[test]
fn store_round_trips_through_json_as_a_flat_list() {
    let s = store(vec![traxel(2, 1, 3.0), traxel(1, 0, 0.0)]);
    let json = serde_json::to_string(&s).unwrap();
    assert!(json.starts_with('['), "{json}");
    let back: TraxelStore = serde_json::from_str(&json).unwrap();
    assert_eq!(back.timesteps().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(back.get(1, 2), s.get(1, 2));
}
