//! Reconstruction of per-edge and per-route flow from a solved residual graph.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::min;
use core::iter::once;

use itertools::Itertools;

use crate::algo::FlowPath;
use crate::amount::Amount;
use crate::error::Error;
use crate::residual::ResidualGraph;

pub type EdgeFlows<A> = BTreeMap<(usize, usize), A>;

/// Net flow carried by every edge of the original graph.
///
/// `used(u, v) = original[u][v] - residual[u][v]`. Only strictly positive values are kept, a
/// non-positive result means no net forward flow remains on the edge once flow cancelled through
/// the paired reverse edge is accounted for.
pub fn used_flows<A: Amount>(
    original: &ResidualGraph<A>,
    residual: &ResidualGraph<A>,
) -> EdgeFlows<A> {
    original
        .edges()
        .filter_map(|(u, v, c)| {
            let used = c - residual.residual_capacity(u, v);
            (used > A::zero()).then_some(((u, v), used))
        })
        .collect()
}

/// Flow between every `(source, sink)` pair of a two-tier network, routed through
/// `intermediates`.
///
/// For each intermediate `m` the pair is credited `min(used(s, m), used(m, d))` and the credits
/// are summed. This is a heuristic: an intermediate feeding several sinks from several sources
/// can be credited more than it actually forwarded. Use [`decompose`] and [`exact_pair_flows`]
/// for an exact split. Every pair is present in the result, including those with zero flow.
pub fn tiered_pair_flows<A: Amount>(
    used: &EdgeFlows<A>,
    sources: &[usize],
    intermediates: &[usize],
    sinks: &[usize],
) -> EdgeFlows<A> {
    let get = |u: usize, v: usize| used.get(&(u, v)).copied().unwrap_or_else(A::zero);

    sources
        .iter()
        .cartesian_product(sinks.iter())
        .map(|(&s, &d)| {
            let flow = intermediates
                .iter()
                .map(|&m| min(get(s, m), get(m, d)))
                .sum();
            ((s, d), flow)
        })
        .collect()
}

/// A source-to-sink path of a flow decomposition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecomposedPath<A> {
    pub nodes: Vec<usize>,
    pub flow: A,
}

impl<A: Copy> FlowPath for DecomposedPath<A> {
    type Node = usize;
    type Flow = A;
    type Iter = Vec<usize>;

    fn nodes(&self) -> Self::Iter {
        self.nodes.clone()
    }

    fn flow(&self) -> Self::Flow {
        self.flow
    }
}

fn next_hop<A: Amount>(flow: &[Vec<A>], u: usize) -> Option<usize> {
    flow[u].iter().position(|f| *f > A::zero())
}

/// Decomposes an edge flow into source-to-sink paths.
///
/// Walks from `source` along the lowest-indexed edge still carrying flow. Cycles met on the way
/// carry no source-to-sink flow and are cancelled. The flows of the returned paths sum up to the
/// value of the flow, and summing them per edge gives back `used` minus the cancelled cycles.
pub fn decompose<A: Amount>(
    used: &EdgeFlows<A>,
    node_count: usize,
    source: usize,
    sink: usize,
) -> Vec<DecomposedPath<A>> {
    let mut flow = vec![vec![A::zero(); node_count]; node_count];
    for (&(u, v), &f) in used.iter().filter(|((u, v), _)| u != v) {
        flow[u][v] = f;
    }

    let mut paths = Vec::new();
    let mut pos: Vec<Option<usize>> = vec![None; node_count];
    'paths: while next_hop(&flow, source).is_some() {
        let mut path = vec![source];
        pos.fill(None);
        pos[source] = Some(0);

        let mut u = source;
        while u != sink {
            let Some(v) = next_hop(&flow, u) else {
                log::warn!("flow is not conserved at node {u}, decomposition stopped");
                break 'paths;
            };

            if let Some(i) = pos[v] {
                let cycle: Vec<_> = path[i..].iter().copied().chain(once(v)).collect();
                let amount = cycle
                    .windows(2)
                    .map(|w| flow[w[0]][w[1]])
                    .min()
                    .unwrap_or_else(A::zero);
                log::trace!("cancelling cycle {cycle:?} carrying {amount}");
                for w in cycle.windows(2) {
                    flow[w[0]][w[1]] -= amount;
                }
                for &w in &path[i + 1..] {
                    pos[w] = None;
                }
                path.truncate(i + 1);
            } else {
                pos[v] = Some(path.len());
                path.push(v);
            }
            u = v;
        }

        let amount = path
            .windows(2)
            .map(|w| flow[w[0]][w[1]])
            .min()
            .unwrap_or_else(A::zero);
        for w in path.windows(2) {
            flow[w[0]][w[1]] -= amount;
        }
        log::trace!("path {path:?} carries {amount}");
        paths.push(DecomposedPath {
            nodes: path,
            flow: amount,
        });
    }

    paths
}

/// Flow between every `(source, sink)` pair, aggregated from decomposed paths.
///
/// A path is credited to the first node on it that belongs to `sources` and the last node on it
/// that belongs to `sinks`. Paths touching neither tier are ignored. Every pair is present in the
/// result, including those with zero flow.
pub fn exact_pair_flows<A, P, I>(paths: I, sources: &[usize], sinks: &[usize]) -> EdgeFlows<A>
where
    A: Amount,
    P: FlowPath<Node = usize, Flow = A>,
    I: IntoIterator<Item = P>,
{
    let mut pairs: EdgeFlows<A> = sources
        .iter()
        .cartesian_product(sinks.iter())
        .map(|(&s, &d)| ((s, d), A::zero()))
        .collect();

    for p in paths {
        let nodes: Vec<usize> = p.nodes().into_iter().collect();
        let from = nodes.iter().find(|n| sources.contains(n));
        let to = nodes.iter().rev().find(|n| sinks.contains(n));
        if let (Some(&s), Some(&d)) = (from, to) {
            if let Some(f) = pairs.get_mut(&(s, d)) {
                *f += p.flow();
            }
        }
    }

    pairs
}

/// Verifies that the flow encoded in `residual` is a feasible flow of value `value`.
///
/// Checks that no edge carries more than its original capacity, that flow is conserved at every
/// node other than `source` and `sink`, and that the net outflow of `source` equals `value`.
pub fn check_flow<A: Amount>(
    original: &ResidualGraph<A>,
    residual: &ResidualGraph<A>,
    source: usize,
    sink: usize,
    value: A,
) -> Result<(), Error> {
    let n = original.node_count();
    if let Some((from, to)) = (0..n)
        .cartesian_product(0..n)
        .find(|&(u, v)| residual.residual_capacity(u, v) < A::zero())
    {
        return Err(Error::CapacityExceeded { from, to });
    }

    let used = used_flows(original, residual);
    if let Some((&(from, to), _)) = used
        .iter()
        .find(|(&(u, v), f)| **f > original.residual_capacity(u, v))
    {
        return Err(Error::CapacityExceeded { from, to });
    }

    // net outflow per node
    let balance = used.iter().fold(vec![A::zero(); n], |mut acc, (&(u, v), &f)| {
        acc[u] += f;
        acc[v] -= f;
        acc
    });

    if let Some(node) = (0..n).find(|&v| v != source && v != sink && balance[v] != A::zero()) {
        return Err(Error::ConservationViolated { node });
    }
    if balance[source] != value {
        return Err(Error::FlowMismatch);
    }

    log::debug!("      edges used: {}", used.len());
    log::debug!("  source outflow: {}", balance[source]);
    log::debug!("    sink inflow: {}", -balance[sink]);
    Ok(())
}
