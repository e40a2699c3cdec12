use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::residual::ResidualGraph;

/// Shortest-augmenting-path max flow (Edmonds-Karp) over a dense [`ResidualGraph`].
///
/// Each phase runs a breadth-first search from the source over strictly positive residual
/// edges, so the augmenting path found always has the fewest possible edges. Neighbors are
/// visited in ascending index order, which makes the per-edge split of the flow deterministic.
#[derive(Clone, Debug, Default)]
pub struct EdmondsKarp {
    parent: Vec<Option<usize>>,
    queue: VecDeque<usize>,
    augmentations: usize,
}

impl EdmondsKarp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of augmenting paths used by the latest run.
    pub fn augmentations(&self) -> usize {
        self.augmentations
    }

    /// Predecessor of `v` on the latest augmenting path search, `None` for the source and for
    /// unreached nodes.
    pub fn parent(&self, v: usize) -> Option<usize> {
        self.parent.get(v).copied().flatten()
    }

    /// Runs the algorithm and returns the value of the maximum flow.
    ///
    /// # Panics
    ///
    /// Panics if `source == sink` or if either is not a node of `graph`.
    pub fn run<A: Amount>(
        &mut self,
        graph: &mut ResidualGraph<A>,
        source: usize,
        sink: usize,
    ) -> A {
        let n = graph.node_count();
        assert!(
            source < n && sink < n,
            "source {source} or sink {sink} out of range for a graph with {n} nodes"
        );
        assert_ne!(source, sink, "source and sink must be different nodes");

        self.augmentations = 0;
        let mut flow = A::zero();
        while self.bfs(graph, source, sink) {
            let path_flow = self.bottleneck(graph, source, sink);
            self.augment(graph, source, sink, path_flow);
            flow += path_flow;
            self.augmentations += 1;
        }

        log::debug!(
            "max flow {source} -> {sink}: {flow} over {} augmenting paths",
            self.augmentations
        );
        flow
    }

    /// Breadth-first search for an augmenting path. Returns whether `sink` was reached.
    fn bfs<A: Amount>(&mut self, graph: &ResidualGraph<A>, source: usize, sink: usize) -> bool {
        self.parent.clear();
        self.parent.resize(graph.node_count(), None);
        self.queue.clear();

        let mut visited = vec![false; graph.node_count()];
        visited[source] = true;
        self.queue.push_back(source);

        while let Some(u) = self.queue.pop_front() {
            for v in graph.neighbors(u) {
                if visited[v] {
                    continue;
                }
                visited[v] = true;
                self.parent[v] = Some(u);
                if v == sink {
                    return true;
                }
                self.queue.push_back(v);
            }
        }
        false
    }

    /// Walks the path from `sink` back to `source`, calling `f` for every edge `(u, v)`.
    fn walk_path(&self, source: usize, sink: usize, mut f: impl FnMut(usize, usize)) {
        let mut v = sink;
        while v != source {
            let u = self.parent[v].unwrap_or_else(|| unreachable!("node {v} has no parent"));
            f(u, v);
            v = u;
        }
    }

    fn bottleneck<A: Amount>(&self, graph: &ResidualGraph<A>, source: usize, sink: usize) -> A {
        let mut path_flow: Option<A> = None;
        self.walk_path(source, sink, |u, v| {
            let c = graph.residual_capacity(u, v);
            path_flow = Some(path_flow.map_or(c, |f| f.min(c)));
        });
        path_flow.unwrap_or_else(A::zero)
    }

    fn augment<A: Amount>(
        &self,
        graph: &mut ResidualGraph<A>,
        source: usize,
        sink: usize,
        path_flow: A,
    ) {
        log::trace!("augmenting {path_flow} units along a path ending at {sink}");
        self.walk_path(source, sink, |u, v| {
            log::trace!("  {u} --> {v}");
            graph.push(u, v, path_flow);
        });
    }
}

impl<A: Amount> MaxFlow<A> for EdmondsKarp {
    type Error = Infallible;

    fn max_flow(
        &mut self,
        graph: &mut ResidualGraph<A>,
        source: usize,
        sink: usize,
    ) -> Result<A, Self::Error> {
        Ok(self.run(graph, source, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: usize = 0;
    const A: usize = 1;
    const B: usize = 2;
    const T: usize = 3;

    fn diamond() -> ResidualGraph<i32> {
        let mut g = ResidualGraph::new(4);
        g.add_edge(S, A, 10);
        g.add_edge(A, T, 4);
        g.add_edge(S, B, 10);
        g.add_edge(B, T, 6);
        g
    }

    #[test]
    fn diamond_network() {
        let mut g = diamond();
        let mut ek = EdmondsKarp::new();
        assert_eq!(ek.run(&mut g, S, T), 10);
        assert_eq!(ek.augmentations(), 2);
        assert_eq!(g.residual_capacity(S, A), 6);
        assert_eq!(g.residual_capacity(A, T), 0);
        assert_eq!(g.residual_capacity(S, B), 4);
        assert_eq!(g.residual_capacity(B, T), 0);
        assert_eq!(g.residual_capacity(T, B), 6);
    }

    #[test]
    fn single_edge() {
        let mut g = ResidualGraph::new(2);
        g.add_edge(0, 1, 7);
        assert_eq!(EdmondsKarp::new().run(&mut g, 0, 1), 7);
    }

    #[test]
    fn disconnected_yields_zero() {
        let mut g = ResidualGraph::new(4);
        g.add_edge(0, 1, 5);
        g.add_edge(2, 3, 5);
        let mut ek = EdmondsKarp::new();
        assert_eq!(ek.run(&mut g, 0, 3), 0);
        assert_eq!(ek.augmentations(), 0);
        assert_eq!(ek.parent(3), None);
    }

    #[test]
    fn re_solve_is_idempotent() {
        let mut g = diamond();
        let mut ek = EdmondsKarp::new();
        assert_eq!(ek.run(&mut g, S, T), 10);
        let saturated = g.clone();
        assert_eq!(ek.run(&mut g, S, T), 0);
        assert_eq!(g, saturated);
    }

    #[test]
    fn cancels_flow_through_reverse_edges() {
        // The first shortest path s -> a -> b -> t has to be partially undone so that
        // s -> c -> b -> a -> d -> t can be used.
        let (s, a, b, c, d, t) = (0, 1, 2, 3, 4, 5);
        let mut g = ResidualGraph::new(6);
        g.add_edge(s, a, 1);
        g.add_edge(s, c, 1);
        g.add_edge(a, b, 1);
        g.add_edge(a, d, 1);
        g.add_edge(c, b, 1);
        g.add_edge(b, t, 1);
        g.add_edge(d, t, 1);
        let mut ek = EdmondsKarp::new();
        assert_eq!(ek.run(&mut g, s, t), 2);
        assert_eq!(ek.augmentations(), 2);
        assert_eq!(g.residual_capacity(a, b), 1);
        assert_eq!(g.residual_capacity(b, a), 0);
    }

    #[test]
    fn classic_clrs_network() {
        let mut g = ResidualGraph::new(6);
        for (u, v, c) in [
            (0, 1, 16),
            (0, 2, 13),
            (1, 2, 10),
            (2, 1, 4),
            (1, 3, 12),
            (3, 2, 9),
            (2, 4, 14),
            (4, 3, 7),
            (3, 5, 20),
            (4, 5, 4),
        ] {
            g.add_edge(u, v, c);
        }
        assert_eq!(EdmondsKarp::new().run(&mut g, 0, 5), 23);
    }

    #[test]
    fn large_bound_is_never_binding() {
        let bound = 1 + 3 + 5;
        let mut g = ResidualGraph::<i64>::new(4);
        g.add_edge(0, 1, bound);
        g.add_edge(1, 3, 3);
        g.add_edge(0, 2, 5);
        g.add_edge(2, 3, bound);
        let flow = EdmondsKarp::new().run(&mut g, 0, 3);
        assert_eq!(flow, 8);
        assert!(flow < bound);
    }

    #[test]
    #[should_panic(expected = "source and sink must be different")]
    fn source_equals_sink_panics() {
        let mut g = diamond();
        EdmondsKarp::new().run(&mut g, S, S);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn sink_out_of_range_panics() {
        let mut g = diamond();
        EdmondsKarp::new().run(&mut g, S, 9);
    }

    #[test]
    fn solves_through_max_flow_trait() {
        fn solve<M: MaxFlow<i32>>(m: &mut M, g: &mut ResidualGraph<i32>) -> i32 {
            m.max_flow(g, S, T).unwrap_or_default()
        }
        let mut g = diamond();
        assert_eq!(solve(&mut EdmondsKarp::new(), &mut g), 10);
    }
}
