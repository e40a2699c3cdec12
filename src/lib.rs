//! Maximum flow over capacitated directed graphs, applied to tiered logistics networks
//! (terminals -> warehouses -> shops).
//!
//! The core is a dense [`ResidualGraph`] solved in place by [`EdmondsKarp`]. Comparing the solved
//! residual graph against a copy of the original capacities yields the flow carried by every
//! edge ([`used_flows`]), which is then attributed to terminal x shop pairs either by the
//! two-hop heuristic ([`tiered_pair_flows`]) or by exact path decomposition ([`decompose`]).
//!
//! ```
//! use logiflow::{EdmondsKarp, ResidualGraph};
//!
//! let (s, a, b, t) = (0, 1, 2, 3);
//! let mut g = ResidualGraph::new(4);
//! g.add_edge(s, a, 10);
//! g.add_edge(a, t, 4);
//! g.add_edge(s, b, 10);
//! g.add_edge(b, t, 6);
//!
//! assert_eq!(EdmondsKarp::new().run(&mut g, s, t), 10);
//! ```
#![no_std]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod algo;
mod amount;
mod assignment;
pub mod attribution;
mod capacity;
mod cut;
mod error;
mod label;
mod network;
mod node;
mod residual;
mod route;

pub use crate::algo::edmonds_karp::EdmondsKarp;
pub use crate::algo::push_relabel::{push_relabel_max_flow, MaxFlowError, PushRelabel};
pub use crate::algo::{FlowPath, MaxFlow};
pub use crate::amount::Amount;
pub use crate::assignment::RouteAssignment;
pub use crate::attribution::{
    check_flow, decompose, exact_pair_flows, tiered_pair_flows, used_flows, DecomposedPath,
    EdgeFlows,
};
pub use crate::capacity::Capacity;
pub use crate::cut::{min_cut, MinCut};
pub use crate::error::Error;
pub use crate::label::Label;
pub use crate::network::{Attribution, FlowReport, Network, NodeRecord, SolveOptions, Tier};
pub use crate::node::Node;
pub use crate::residual::ResidualGraph;
pub use crate::route::{RawRoute, Route, SimpleRoute};
