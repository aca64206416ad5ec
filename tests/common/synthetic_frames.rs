use hypotheses_tracking::{RegionGraph, TraxelStore};
use nalgebra::Vector3;

/// Two cells drifting right by one unit per frame, A starting at x=0 and B at
/// x=30. Every frame is over-segmented into the two cells plus the merged
/// hypothesis covering both (labels 1, 2 and 3).
pub fn two_cells_with_merge(frames: i32) -> TraxelStore {
    let mut traxels = Vec::new();
    for t in 0..frames {
        let x = t as f32;
        let mut graph = RegionGraph::new();
        let a = graph.add_region(Some(Vector3::new(x, 0.0, 0.0)));
        let b = graph.add_region(Some(Vector3::new(x + 30.0, 0.0, 0.0)));
        graph.add_neighbors(a, b).expect("fresh regions are valid");
        graph.merge_regions(a, b).expect("fresh regions are valid");
        traxels.extend(graph.to_traxels(t));
    }
    TraxelStore::from_traxels(traxels).expect("labels are unique per frame")
}
