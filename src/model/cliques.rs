use std::collections::BTreeSet;

/// Maximal cliques of an undirected graph (Bron–Kerbosch with pivoting).
///
/// `adjacency[v]` lists the neighbors of `v`; it must be symmetric and free
/// of self loops. Isolated vertices form singleton cliques. Each clique is
/// sorted and the cliques are returned in lexicographic order.
pub fn maximal_cliques(adjacency: &[BTreeSet<usize>]) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if adjacency.is_empty() {
        return out;
    }
    let candidates: BTreeSet<usize> = (0..adjacency.len()).collect();
    expand(
        adjacency,
        &mut Vec::new(),
        candidates,
        BTreeSet::new(),
        &mut out,
    );
    for clique in &mut out {
        clique.sort_unstable();
    }
    out.sort();
    out
}

fn expand(
    adjacency: &[BTreeSet<usize>],
    clique: &mut Vec<usize>,
    mut candidates: BTreeSet<usize>,
    mut excluded: BTreeSet<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() {
            out.push(clique.clone());
        }
        return;
    }
    // pivot with the most neighbors among the candidates
    let pivot = candidates
        .union(&excluded)
        .copied()
        .max_by_key(|&u| (adjacency[u].intersection(&candidates).count(), usize::MAX - u))
        .unwrap_or_default();
    let branch: Vec<usize> = candidates
        .difference(&adjacency[pivot])
        .copied()
        .collect();
    for v in branch {
        clique.push(v);
        expand(
            adjacency,
            clique,
            candidates.intersection(&adjacency[v]).copied().collect(),
            excluded.intersection(&adjacency[v]).copied().collect(),
            out,
        );
        clique.pop();
        candidates.remove(&v);
        excluded.insert(v);
    }
}
