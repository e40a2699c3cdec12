use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;

use crate::amount::Amount;
use crate::capacity::Capacity;
use crate::error::Error;

/// A dense `V x V` capacity matrix that doubles as the residual graph of a flow network.
///
/// Before solving, `cap[u][v]` holds the capacity of the edge `u -> v` (zero for non-edges).
/// Every augmentation of `f` units along `u -> v` decrements `cap[u][v]` and increments the
/// paired reverse entry `cap[v][u]` by the same amount, so at any point
/// `cap[u][v] == original[u][v] - net_flow(u, v)`.
///
/// Solvers mutate the matrix in place. Keep a clone of the freshly built graph around if the
/// original capacities are needed afterwards (e.g. for [`used_flows`](crate::used_flows)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResidualGraph<A> {
    cap: Vec<Vec<A>>,
}

impl<A: Amount> ResidualGraph<A> {
    /// Creates a graph with `node_count` nodes and no edges.
    pub fn new(node_count: usize) -> Self {
        Self {
            cap: vec![vec![A::zero(); node_count]; node_count],
        }
    }

    /// Builds a graph from an edge list, resolving [`Capacity::Unbounded`] to a finite bound.
    ///
    /// The bound is the sum of all finite capacities plus one, so it can never be the binding
    /// constraint of a path that also crosses a finite edge. Returns the graph together with the
    /// bound used. Parallel edges overwrite each other, merge them beforehand.
    ///
    /// An unbounded edge whose reverse edge carries flow ends up with a residual of `bound` plus
    /// that flow, so `bound` plus the sum of the finite capacities has to fit in `A` too.
    /// Otherwise [`Error::CapacityOverflow`] is returned.
    ///
    /// # Panics
    ///
    /// Panics if an edge refers to a node outside `[0, node_count)` or has a negative capacity.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<(Self, A), Error>
    where
        I: IntoIterator<Item = (usize, usize, Capacity<A>)>,
        I::IntoIter: Clone,
    {
        let edges = edges.into_iter();
        let finite = edges
            .clone()
            .filter_map(|(_, _, c)| c.finite())
            .try_fold(A::zero(), |acc, c| acc.checked_add(&c))
            .ok_or(Error::CapacityOverflow)?;
        let bound = finite
            .checked_add(&A::one())
            .filter(|b| b.checked_add(&finite).is_some())
            .ok_or(Error::CapacityOverflow)?;

        let graph = edges.fold(Self::new(node_count), |mut acc, (u, v, c)| {
            acc.add_edge(u, v, c.resolve(bound));
            acc
        });
        Ok((graph, bound))
    }

    pub fn node_count(&self) -> usize {
        self.cap.len()
    }

    /// Sets the capacity of `u -> v`, overwriting any previous value.
    ///
    /// # Panics
    ///
    /// Panics if `u` or `v` is out of range or if `capacity` is negative.
    pub fn add_edge(&mut self, u: usize, v: usize, capacity: A) {
        self.check_node(u);
        self.check_node(v);
        assert!(
            capacity >= A::zero(),
            "negative capacity {capacity} on edge {u} -> {v}"
        );
        self.cap[u][v] = capacity;
    }

    /// Current residual capacity of `u -> v`. Zero means there is no usable residual edge.
    pub fn residual_capacity(&self, u: usize, v: usize) -> A {
        self.check_node(u);
        self.check_node(v);
        self.cap[u][v]
    }

    /// Iterates over all entries with strictly positive capacity as `(u, v, capacity)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, A)> + '_ {
        self.cap.iter().enumerate().flat_map(|(u, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| **c > A::zero())
                .map(move |(v, c)| (u, v, *c))
        })
    }

    /// Successors of `u` over strictly positive residual edges, in ascending index order.
    pub fn neighbors(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.check_node(u);
        self.cap[u]
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > A::zero())
            .map(|(v, _)| v)
    }

    /// The set of nodes reachable from `source` over strictly positive residual edges.
    ///
    /// After a max flow has been extracted this is the source side of a minimum cut.
    pub fn reachable_from(&self, source: usize) -> BTreeSet<usize> {
        self.check_node(source);
        let mut visited = BTreeSet::from([source]);
        let mut queue = VecDeque::from([source]);
        while let Some(u) = queue.pop_front() {
            for v in self.neighbors(u) {
                if visited.insert(v) {
                    queue.push_back(v);
                }
            }
        }
        visited
    }

    /// Pushes `amount` units of flow along `u -> v`.
    pub(crate) fn push(&mut self, u: usize, v: usize, amount: A) {
        debug_assert!(self.cap[u][v] >= amount);
        self.cap[u][v] -= amount;
        self.cap[v][u] += amount;
    }

    /// Overwrites the residual entry of `u -> v` without any checks.
    #[cfg(test)]
    pub(crate) fn set_residual(&mut self, u: usize, v: usize, residual: A) {
        self.cap[u][v] = residual;
    }

    fn check_node(&self, n: usize) {
        assert!(
            n < self.node_count(),
            "node {n} out of range for a graph with {} nodes",
            self.node_count()
        );
    }
}
