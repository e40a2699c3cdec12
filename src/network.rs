use alloc::collections::btree_map::Entry;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::assignment::RouteAssignment;
use crate::attribution::{
    check_flow, decompose, exact_pair_flows, tiered_pair_flows, used_flows,
};
use crate::capacity::Capacity;
use crate::cut::min_cut;
use crate::error::Error;
use crate::label::Label;
use crate::node::Node;
use crate::residual::ResidualGraph;
use crate::route::Route;

/// The tier of a node in a two-tier logistics network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Terminal,
    Warehouse,
    Shop,
}

/// A labelled node declaration, as found in a CSV row.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeRecord<L> {
    pub label: L,
    pub tier: Tier,
}

impl<L> NodeRecord<L> {
    pub fn new(label: L, tier: Tier) -> Self {
        Self { label, tier }
    }
}

/// How the terminal x shop flow table is derived from the per-route flows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Attribution {
    /// Sum over warehouses of `min(terminal -> warehouse, warehouse -> shop)`. May overcount
    /// when a warehouse is shared by several terminals and shops.
    #[default]
    Heuristic,
    /// Exact split obtained by decomposing the flow into source-to-sink paths.
    Exact,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveOptions {
    pub attribution: Attribution,
    /// Verify capacity respect and flow conservation of the solved network.
    pub check: bool,
}

/// The outcome of solving a [`Network`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowReport<L, A> {
    pub max_flow: A,
    /// Every declared route with the flow it carries, in `(from, to)` order.
    pub assignments: Vec<RouteAssignment<L, A>>,
    /// Flow from every terminal to every shop.
    pub pair_flows: BTreeMap<(L, L), A>,
    /// Routes crossing the minimum cut, i.e. the ones limiting the total flow.
    pub bottlenecks: Vec<(L, L)>,
    pub attribution: Attribution,
}

impl<L: Label, A: Amount> FlowReport<L, A> {
    /// Total flow shipped out of `label` over its routes.
    pub fn shipped(&self, label: &L) -> A {
        self.assignments
            .iter()
            .filter(|a| a.from() == label)
            .map(|a| a.flow())
            .sum()
    }

    /// Total flow delivered into `label` over its routes.
    pub fn received(&self, label: &L) -> A {
        self.assignments
            .iter()
            .filter(|a| a.to() == label)
            .map(|a| a.flow())
            .sum()
    }
}

/// A tiered logistics network: terminals feed warehouses, warehouses feed shops.
///
/// Labels are mapped to graph indices in declaration order starting at 1. Index 0 is a super
/// source with an unbounded edge to every terminal and the last index is a super sink with an
/// unbounded edge from every shop.
#[derive(Clone, Debug)]
pub struct Network<L, A> {
    nodes: Vec<NodeRecord<L>>,
    index: BTreeMap<L, usize>,
    routes: BTreeMap<(usize, usize), Capacity<A>>,
}

impl<L: Label, A: Amount> Network<L, A> {
    pub fn new<I>(nodes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = NodeRecord<L>>,
    {
        let mut network = Self {
            nodes: Vec::new(),
            index: BTreeMap::new(),
            routes: BTreeMap::new(),
        };
        for node in nodes {
            match network.index.entry(node.label.clone()) {
                Entry::Occupied(_) => return Err(Error::DuplicateLabel(node.label.to_string())),
                Entry::Vacant(e) => {
                    e.insert(network.nodes.len() + 1);
                }
            }
            network.nodes.push(node);
        }
        Ok(network)
    }

    /// Builds a network from node declarations and routes.
    pub fn from_records<I, R>(nodes: I, routes: R) -> Result<Self, Error>
    where
        I: IntoIterator<Item = NodeRecord<L>>,
        R: IntoIterator,
        R::Item: Route<Label = L, Amount = A>,
    {
        let mut network = Self::new(nodes)?;
        for route in routes {
            network.add_route(&route)?;
        }
        Ok(network)
    }

    /// Adds a route between two declared nodes. Parallel routes are merged into one.
    pub fn add_route<R>(&mut self, route: &R) -> Result<(), Error>
    where
        R: Route<Label = L, Amount = A>,
    {
        let u = self.require(route.origin())?;
        let v = self.require(route.destination())?;
        match self.routes.entry((u, v)) {
            Entry::Vacant(e) => {
                e.insert(route.capacity());
            }
            Entry::Occupied(mut e) => {
                log::debug!(
                    "merging parallel route {} -> {}",
                    route.origin(),
                    route.destination()
                );
                let merged = e.get().merge(route.capacity())?;
                e.insert(merged);
            }
        }
        Ok(())
    }

    fn require(&self, label: &L) -> Result<usize, Error> {
        self.index_of(label)
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// The node behind a graph index.
    pub fn node(&self, index: usize) -> Option<Node<&L>> {
        match index {
            0 => Some(Node::Source),
            i if i == self.sink() => Some(Node::Sink),
            i => self.nodes.get(i - 1).map(|n| Node::WithId(&n.label)),
        }
    }

    fn label(&self, index: usize) -> Option<&L> {
        self.node(index)?.label().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len() + 2
    }

    pub fn source(&self) -> usize {
        0
    }

    pub fn sink(&self) -> usize {
        self.nodes.len() + 1
    }

    /// Graph indices of all nodes of `tier`, in declaration order.
    pub fn tier_indices(&self, tier: Tier) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.tier == tier)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// All edges of the flow network: the routes plus the super source and sink aggregation
    /// edges.
    pub fn edges(&self) -> Vec<(usize, usize, Capacity<A>)> {
        let sink = self.sink();
        let feeds = self
            .tier_indices(Tier::Terminal)
            .into_iter()
            .map(|t| (self.source(), t, Capacity::Unbounded));
        let drains = self
            .tier_indices(Tier::Shop)
            .into_iter()
            .map(move |s| (s, sink, Capacity::Unbounded));
        let routes = self.routes.iter().map(|(&(u, v), &c)| (u, v, c));

        feeds.chain(routes).chain(drains).collect()
    }

    /// Builds the residual graph of the network, returning it with the bound that unbounded
    /// edges were resolved to.
    pub fn graph(&self) -> Result<(ResidualGraph<A>, A), Error> {
        ResidualGraph::from_edges(self.node_count(), self.edges())
    }

    /// Fails if the sink can be reached from the source over unbounded edges only, in which case
    /// no finite bound could stand in for them.
    fn check_bounded(&self) -> Result<(), Error> {
        let unbounded = self
            .edges()
            .into_iter()
            .filter(|(_, _, c)| c.is_unbounded())
            .fold(BTreeMap::<_, Vec<_>>::new(), |mut acc, (u, v, _)| {
                acc.entry(u).or_default().push(v);
                acc
            });

        let mut visited = BTreeSet::from([self.source()]);
        let mut queue = VecDeque::from([self.source()]);
        while let Some(u) = queue.pop_front() {
            for &v in unbounded.get(&u).into_iter().flatten() {
                if v == self.sink() {
                    return Err(Error::UnboundedFlow);
                }
                if visited.insert(v) {
                    queue.push_back(v);
                }
            }
        }
        Ok(())
    }

    /// Computes the maximum flow from the terminals to the shops and attributes it to routes
    /// and terminal x shop pairs.
    pub fn solve<M>(&self, algo: &mut M, options: SolveOptions) -> Result<FlowReport<L, A>, Error>
    where
        M: MaxFlow<A>,
    {
        self.check_bounded()?;
        let (mut residual, bound) = self.graph()?;
        let original = residual.clone();
        let (source, sink) = (self.source(), self.sink());

        let max_flow = algo
            .max_flow(&mut residual, source, sink)
            .map_err(|e| Error::AlgoSpecific(format!("{e:?}")))?;
        assert!(
            max_flow < bound,
            "max flow {max_flow} reached the unbounded capacity bound {bound}"
        );

        if options.check {
            check_flow(&original, &residual, source, sink, max_flow)?;
        }

        let used = used_flows(&original, &residual);
        let terminals = self.tier_indices(Tier::Terminal);
        let shops = self.tier_indices(Tier::Shop);
        let pairs = match options.attribution {
            Attribution::Heuristic => {
                let warehouses = self.tier_indices(Tier::Warehouse);
                tiered_pair_flows(&used, &terminals, &warehouses, &shops)
            }
            Attribution::Exact => {
                let paths = decompose(&used, self.node_count(), source, sink);
                exact_pair_flows(paths, &terminals, &shops)
            }
        };
        let pair_flows = pairs
            .into_iter()
            .filter_map(|((t, s), f)| Some(((self.label(t)?.clone(), self.label(s)?.clone()), f)))
            .collect();

        let assignments: Vec<_> = self
            .routes
            .iter()
            .filter_map(|(&(u, v), &c)| {
                let flow = used.get(&(u, v)).copied().unwrap_or_else(A::zero);
                Some(RouteAssignment::new(
                    self.label(u)?.clone(),
                    self.label(v)?.clone(),
                    c,
                    flow,
                ))
            })
            .collect();

        let cut = min_cut(&original, &residual, source);
        debug_assert_eq!(cut.capacity, max_flow);
        let bottlenecks = cut
            .edges
            .iter()
            .filter_map(|&(u, v)| Some((self.label(u)?.clone(), self.label(v)?.clone())))
            .collect();

        log::info!("----------------------------------");
        log::info!("      Terminals = {}", terminals.len());
        log::info!("          Shops = {}", shops.len());
        log::info!("         Routes = {}", self.routes.len());
        log::info!("       Max flow = {max_flow}");
        log::info!("Min cut (edges) = {}", cut.edges.len());

        Ok(FlowReport {
            max_flow,
            assignments,
            pair_flows,
            bottlenecks,
            attribution: options.attribution,
        })
    }
}
