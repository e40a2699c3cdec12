use core::fmt::Debug;

use crate::residual::ResidualGraph;

pub mod edmonds_karp;
pub mod push_relabel;

/// A path carrying a fixed amount of flow from the source to the sink.
pub trait FlowPath {
    type Node;
    type Flow;
    type Iter: IntoIterator<Item = Self::Node>;

    fn nodes(&self) -> Self::Iter;
    fn flow(&self) -> Self::Flow;
}

/// A maximum flow algorithm operating in place on a [`ResidualGraph`].
pub trait MaxFlow<A> {
    type Error: Debug;

    /// Pushes as much flow as possible from `source` to `sink` and returns the amount pushed.
    ///
    /// On return `graph` holds the final residual capacities. Running the algorithm again on
    /// the same graph returns zero.
    fn max_flow(
        &mut self,
        graph: &mut ResidualGraph<A>,
        source: usize,
        sink: usize,
    ) -> Result<A, Self::Error>;
}
