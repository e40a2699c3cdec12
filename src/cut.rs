use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::amount::Amount;
use crate::residual::ResidualGraph;

/// A source/sink partition of the nodes together with the edges crossing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinCut<A> {
    /// Nodes on the source's side of the cut.
    pub source_side: BTreeSet<usize>,
    /// Edges of the original graph leading from the source side to the sink side.
    pub edges: Vec<(usize, usize)>,
    /// Sum of the original capacities of `edges`.
    pub capacity: A,
}

impl<A> MinCut<A> {
    pub fn separates(&self, sink: usize) -> bool {
        !self.source_side.contains(&sink)
    }
}

/// Extracts a minimum cut from a solved residual graph.
///
/// The source side is the set of nodes still reachable from `source` over positive residual
/// capacity. Once no augmenting path is left, `capacity` equals the value of the maximum flow.
pub fn min_cut<A: Amount>(
    original: &ResidualGraph<A>,
    residual: &ResidualGraph<A>,
    source: usize,
) -> MinCut<A> {
    let source_side = residual.reachable_from(source);
    let edges: Vec<_> = original
        .edges()
        .filter(|(u, v, _)| source_side.contains(u) && !source_side.contains(v))
        .map(|(u, v, _)| (u, v))
        .collect();
    let capacity = edges
        .iter()
        .map(|&(u, v)| original.residual_capacity(u, v))
        .sum();

    MinCut {
        source_side,
        edges,
        capacity,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::algo::edmonds_karp::EdmondsKarp;

    #[test]
    fn diamond_cut_is_the_sink_edges() {
        let mut g = ResidualGraph::new(4);
        g.add_edge(0, 1, 10);
        g.add_edge(1, 3, 4);
        g.add_edge(0, 2, 10);
        g.add_edge(2, 3, 6);
        let original = g.clone();

        let flow = EdmondsKarp::new().run(&mut g, 0, 3);
        let cut = min_cut(&original, &g, 0);

        assert_eq!(cut.source_side, BTreeSet::from([0, 1, 2]));
        assert_eq!(cut.edges, vec![(1, 3), (2, 3)]);
        assert_eq!(cut.capacity, flow);
        assert!(cut.separates(3));
    }

    #[test]
    fn disconnected_cut_is_empty() {
        let mut g = ResidualGraph::new(3);
        g.add_edge(0, 1, 2);
        let original = g.clone();
        EdmondsKarp::new().run(&mut g, 0, 2);

        let cut = min_cut(&original, &g, 0);
        assert!(cut.edges.is_empty());
        assert_eq!(cut.capacity, 0);
        assert!(cut.separates(2));
    }
}
