use alloc::string::String;

use displaydoc::Display;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Invalid route where origin and destination are the same
    RouteToSelf,
    /// Invalid route capacity, expected a non-negative value
    NegativeCapacity,
    /// Unparsable capacity `{0}`, expected a number or `inf`
    InvalidCapacity(String),
    /// Unknown node label `{0}`
    UnknownLabel(String),
    /// Node label `{0}` declared more than once
    DuplicateLabel(String),
    /// Sum of finite capacities overflows the amount type
    CapacityOverflow,
    /// Sink is reachable from the source over unbounded routes only
    UnboundedFlow,
    /// Flow on edge {from} -> {to} exceeds its capacity
    CapacityExceeded { from: usize, to: usize },
    /// Flow is not conserved at node {node}
    ConservationViolated { node: usize },
    /// Net outflow of the source does not match the reported flow value
    FlowMismatch,
    /// Max flow algorithm specific error
    AlgoSpecific(String),
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_uses_doc_comments() {
        assert_eq!(
            Error::UnknownLabel("W9".to_string()).to_string(),
            "Unknown node label `W9`"
        );
        assert_eq!(
            Error::CapacityExceeded { from: 1, to: 3 }.to_string(),
            "Flow on edge 1 -> 3 exceeds its capacity"
        );
    }
}
