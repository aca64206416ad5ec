use super::*;
use crate::error::RegionError;
use crate::types::feature;
use nalgebra::Vector3;

/// Four leaves in a row: a - b - c - d, each neighboring the next.
fn chain() -> (RegionGraph, [Region; 4]) {
    let mut g = RegionGraph::new();
    let rs = [
        g.add_region(Some(Vector3::new(0.0, 0.0, 0.0))),
        g.add_region(Some(Vector3::new(2.0, 0.0, 0.0))),
        g.add_region(Some(Vector3::new(4.0, 0.0, 0.0))),
        g.add_region(Some(Vector3::new(6.0, 0.0, 0.0))),
    ];
    for w in rs.windows(2) {
        assert_eq!(g.add_neighbors(w[0], w[1]), Ok(true));
    }
    (g, rs)
}

fn assert_closure(g: &RegionGraph) {
    for r in g.regions() {
        let conflicts = g.conflicts(r).unwrap();
        let neighbors = g.neighbors(r).unwrap();
        for c in conflicts {
            assert!(
                g.conflicts(*c).unwrap().contains(&r),
                "conflict {r} -> {c} is not symmetric"
            );
            assert!(!neighbors.contains(c), "{r} both neighbors and conflicts {c}");
        }
        for n in neighbors {
            assert!(
                g.neighbors(*n).unwrap().contains(&r),
                "neighbor {r} -> {n} is not symmetric"
            );
        }
    }
}

#[test]
fn merge_with_invalid_first_returns_one_and_leaves_graph_untouched() {
    let (mut g, [a, ..]) = chain();
    let before = g.clone();
    assert_eq!(g.merge_regions(Region(99), a), Err(RegionError::InvalidFirst));
    assert_eq!(g.merge_status(Region(99), a), 1);
    assert_eq!(g.len(), before.len());
    assert_eq!(g.maximum_label(), before.maximum_label());
    assert_eq!(g.neighbors(a), before.neighbors(a));
}

#[test]
fn merge_with_invalid_second_returns_two() {
    let (mut g, [a, ..]) = chain();
    assert_eq!(g.merge_status(a, Region(4)), 2);
    assert_eq!(g.len(), 4);
    // both invalid reports the first argument
    assert_eq!(g.merge_status(Region(40), Region(41)), 1);
}

#[test]
fn merge_creates_exactly_one_region_containing_its_inputs() {
    let (mut g, [a, b, ..]) = chain();
    let ab = g.merge_regions(a, b).unwrap();
    assert_eq!(g.len(), 5);
    let contains: Vec<_> = g.contains(ab).unwrap().iter().copied().collect();
    assert_eq!(contains, vec![a, b]);
    assert!(g.contains(a).unwrap().is_empty());
    assert_eq!(g.level(ab), Some(0));
    assert_eq!(g.com(ab), Some(Vector3::new(1.0, 0.0, 0.0)));
}

#[test]
fn merged_region_conflicts_with_parents_and_inherits_their_conflicts() {
    let (mut g, [a, b, c, d]) = chain();
    g.add_conflict(c, d).unwrap();
    let bc = g.merge_regions(b, c).unwrap();
    let conflicts: Vec<_> = g.conflicts(bc).unwrap().iter().copied().collect();
    assert_eq!(conflicts, vec![b, c, d]);
    for r in [b, c, d] {
        assert!(g.conflicts(r).unwrap().contains(&bc));
    }
    assert!(!g.conflicts(a).unwrap().contains(&bc));
    assert_closure(&g);
}

#[test]
fn merged_region_neighbors_exclude_its_conflicts() {
    let (mut g, [a, b, c, d]) = chain();
    let bc = g.merge_regions(b, c).unwrap();
    // b's neighbors {a, c} and c's neighbors {b, d}; b and c are now conflicts
    let neighbors: Vec<_> = g.neighbors(bc).unwrap().iter().copied().collect();
    assert_eq!(neighbors, vec![a, d]);
    assert!(g.neighbors(a).unwrap().contains(&bc));
    assert!(g.neighbors(d).unwrap().contains(&bc));
    assert_closure(&g);
}

#[test]
fn labels_increase_strictly_with_creation() {
    let (mut g, [a, b, c, d]) = chain();
    let ab = g.merge_regions(a, b).unwrap();
    let cd = g.merge_regions(c, d).unwrap();
    let abcd = g.merge_regions(ab, cd).unwrap();
    let labels: Vec<_> = g.regions().map(|r| g.label(r).unwrap()).collect();
    assert_eq!(labels, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(g.region_by_label(7), Some(abcd));
    assert_eq!(g.leaves(abcd), vec![a, b, c, d]);
}

#[test]
fn closure_holds_after_a_sequence_of_merges() {
    let mut g = RegionGraph::new();
    let leaves: Vec<Region> = (0..8).map(|_| g.add_region(None)).collect();
    for w in leaves.windows(2) {
        g.add_neighbors(w[0], w[1]).unwrap();
    }
    g.add_conflict(leaves[2], leaves[5]).unwrap();
    // deterministic pseudo-random pairs over a growing pool
    let mut state = 17u32;
    for _ in 0..20 {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let n = g.len() as u32;
        let r1 = Region((state >> 8) % n);
        let r2 = Region((state >> 16) % n);
        g.merge_regions(r1, r2).unwrap();
        assert_closure(&g);
    }
    assert_eq!(g.len(), 28);
}

#[test]
fn conflict_replaces_neighbor_relation() {
    let (mut g, [a, b, ..]) = chain();
    g.add_conflict(a, b).unwrap();
    assert!(!g.neighbors(a).unwrap().contains(&b));
    assert_eq!(g.add_neighbors(a, b), Ok(false));
    assert_closure(&g);
}

#[test]
fn exported_traxels_carry_conflict_labels_and_levels() {
    let (mut g, [a, b, ..]) = chain();
    g.set_feature(a, "size", vec![12.0]);
    let ab = g.merge_regions(a, b).unwrap();
    let traxels = g.to_traxels(3);
    assert_eq!(traxels.len(), 5);
    let merged = &traxels[ab.0 as usize];
    assert_eq!(merged.id, 5);
    assert_eq!(merged.timestep, 3);
    assert_eq!(merged.conflicts().unwrap(), vec![1, 2]);
    assert_eq!(merged.level(), 0);
    assert_eq!(traxels[0].feature("size").unwrap(), &vec![12.0]);
    assert_eq!(traxels[0].feature(feature::CONFLICTS).unwrap(), &vec![5.0]);
}
