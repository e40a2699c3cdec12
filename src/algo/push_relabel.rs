use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;
use core::cmp::{max, min};

use displaydoc::Display;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::residual::ResidualGraph;

#[derive(Debug, Display, Clone, Copy, Eq, PartialEq)]
pub enum MaxFlowError {
    /// Arithmetic overflow while accumulating excess flow
    ArithmeticOverflow,
}

#[derive(Clone, Copy, Debug, Default)]
struct Vertex<A> {
    height: usize,
    excess: A,
}

/// An arc of the preflow network. Arcs come in pairs with `flow(v, u) == -flow(u, v)`.
#[derive(Clone, Copy, Debug, Default)]
struct Arc<A> {
    capacity: A,
    flow: A,
}

impl<A: Amount> Arc<A> {
    fn residual(&self) -> A {
        self.capacity - self.flow
    }
}

/// A preflow being discharged in FIFO order.
///
/// Neither the source nor the sink ever becomes active: the sink swallows whatever reaches it and
/// the excess of the source is never looked at, so neither is tracked.
struct Preflow<A> {
    vertices: DiGraph<Vertex<A>, ()>,
    arcs: BTreeMap<(NodeIndex, NodeIndex), Arc<A>>,
    source: NodeIndex,
    sink: NodeIndex,
    active: VecDeque<NodeIndex>,
}

impl<A: Amount> Preflow<A> {
    fn new<N>(
        g: &DiGraph<N, A>,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Result<Self, MaxFlowError> {
        let mut preflow = Self {
            vertices: DiGraph::with_capacity(g.node_count(), 2 * g.edge_count()),
            arcs: BTreeMap::new(),
            source,
            sink,
            active: VecDeque::new(),
        };
        for _ in g.node_indices() {
            preflow.vertices.add_node(Vertex::default());
        }
        for e in g.edge_references().filter(|e| e.source() != e.target()) {
            let (u, v) = (e.source(), e.target());
            preflow.arc(u, v).capacity += max(*e.weight(), A::zero());
            preflow.arc(v, u);
        }

        preflow.vertices[source].height = g.node_count();
        let saturated: Vec<_> = preflow.vertices.neighbors(source).collect();
        for v in saturated {
            let capacity = preflow.arcs[&(source, v)].capacity;
            if capacity > A::zero() {
                preflow.shift(source, v, capacity);
                preflow.add_excess(v, capacity)?;
            }
        }
        Ok(preflow)
    }

    /// The arc `u -> v`, created with zero capacity if missing.
    fn arc(&mut self, u: NodeIndex, v: NodeIndex) -> &mut Arc<A> {
        let vertices = &mut self.vertices;
        self.arcs.entry((u, v)).or_insert_with(|| {
            vertices.add_edge(u, v, ());
            Arc::default()
        })
    }

    fn shift(&mut self, u: NodeIndex, v: NodeIndex, amount: A) {
        self.arc(u, v).flow += amount;
        self.arc(v, u).flow -= amount;
    }

    fn add_excess(&mut self, u: NodeIndex, amount: A) -> Result<(), MaxFlowError> {
        if u == self.source || u == self.sink {
            return Ok(());
        }
        let vertex = &mut self.vertices[u];
        if vertex.excess.is_zero() && amount > A::zero() {
            self.active.push_back(u);
        }
        vertex.excess = vertex
            .excess
            .checked_add(&amount)
            .ok_or(MaxFlowError::ArithmeticOverflow)?;
        Ok(())
    }

    fn admissible(&self, u: NodeIndex, v: NodeIndex) -> bool {
        self.arcs[&(u, v)].residual() > A::zero()
            && self.vertices[u].height == self.vertices[v].height + 1
    }

    fn push(&mut self, u: NodeIndex, v: NodeIndex) -> Result<(), MaxFlowError> {
        let amount = min(self.vertices[u].excess, self.arcs[&(u, v)].residual());
        self.shift(u, v, amount);
        self.add_excess(u, -amount)?;
        self.add_excess(v, amount)
    }

    fn relabel(&mut self, u: NodeIndex) {
        let lowest = self
            .vertices
            .neighbors(u)
            .filter(|&v| self.arcs[&(u, v)].residual() > A::zero())
            .map(|v| self.vertices[v].height)
            .min()
            // excess arrived over some arc, whose reverse still has room
            .unwrap_or_else(|| {
                unreachable!("vertex {} has excess but no residual arc", u.index())
            });
        self.vertices[u].height = lowest + 1;
    }

    fn discharge(&mut self, u: NodeIndex) -> Result<(), MaxFlowError> {
        while self.vertices[u].excess > A::zero() {
            let next = self.vertices.neighbors(u).find(|&v| self.admissible(u, v));
            match next {
                Some(v) => self.push(u, v)?,
                None => self.relabel(u),
            }
        }
        Ok(())
    }
}

/// Computes a max flow from `source` to `sink` in `g` with the FIFO push-relabel algorithm.
///
/// Edge weights are capacities; negative weights count as zero, parallel edges are merged and
/// self-loops ignored. Returns the net flow of every vertex pair carrying a strictly positive
/// amount, or an error if the excess of a vertex overflows.
///
/// # Panics
///
/// Panics if `source` or `sink` is not a node of `g`.
pub fn push_relabel_max_flow<N, A: Amount>(
    g: &DiGraph<N, A>,
    source: NodeIndex,
    sink: NodeIndex,
) -> Result<BTreeMap<(NodeIndex, NodeIndex), A>, MaxFlowError> {
    assert!(
        source.index() < g.node_count() && sink.index() < g.node_count(),
        "source {} or sink {} is not a node of the graph",
        source.index(),
        sink.index()
    );

    let mut preflow = Preflow::new(g, source, sink)?;
    while let Some(u) = preflow.active.pop_front() {
        preflow.discharge(u)?;
    }

    Ok(preflow
        .arcs
        .into_iter()
        .filter(|(_, arc)| arc.flow > A::zero())
        .map(|(pair, arc)| (pair, arc.flow))
        .collect())
}

/// Push-relabel as a [`MaxFlow`] solver for a [`ResidualGraph`].
///
/// The residual matrix is converted into a sparse `petgraph` graph, solved, and the resulting net
/// flows are pushed back into the matrix, leaving it in the same shape Edmonds-Karp would.
#[derive(Clone, Copy, Debug, Default)]
pub struct PushRelabel;

impl<A: Amount> MaxFlow<A> for PushRelabel {
    type Error = MaxFlowError;

    fn max_flow(
        &mut self,
        graph: &mut ResidualGraph<A>,
        source: usize,
        sink: usize,
    ) -> Result<A, Self::Error> {
        let n = graph.node_count();
        assert!(
            source < n && sink < n,
            "source {source} or sink {sink} out of range for a graph with {n} nodes"
        );
        assert_ne!(source, sink, "source and sink must be different nodes");

        let mut network = DiGraph::<(), A>::with_capacity(n, 0);
        for _ in 0..n {
            network.add_node(());
        }
        for (u, v, c) in graph.edges() {
            network.add_edge(NodeIndex::new(u), NodeIndex::new(v), c);
        }

        let flows = push_relabel_max_flow(&network, NodeIndex::new(source), NodeIndex::new(sink))?;

        let mut value = A::zero();
        for ((u, v), f) in flows {
            let (u, v) = (u.index(), v.index());
            log::trace!("{u} --> {v}: {f}");
            graph
                .residual_capacity(v, u)
                .checked_add(&f)
                .ok_or(MaxFlowError::ArithmeticOverflow)?;
            graph.push(u, v, f);
            if u == source {
                value += f;
            } else if v == source {
                value -= f;
            }
        }

        log::debug!("max flow {source} -> {sink}: {value} (push-relabel)");
        Ok(value)
    }
}
