use alloc::string::{String, ToString};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::Error;

/// Capacity of a route: either a finite amount or unbounded.
///
/// Unbounded capacities are used for the aggregation edges of the super source and super sink.
/// They are never stored as such in a [`ResidualGraph`](crate::ResidualGraph); graph construction
/// resolves them to a finite bound that no sum of finite capacities in the network can reach.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(
    try_from = "String",
    into = "String",
    bound(serialize = "A: Amount", deserialize = "A: Amount + FromStr")
)]
pub enum Capacity<A> {
    Finite(A),
    Unbounded,
}

impl<A: Amount> Capacity<A> {
    pub fn finite(&self) -> Option<A> {
        match self {
            Capacity::Finite(a) => Some(*a),
            Capacity::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Capacity::Unbounded)
    }

    /// Resolves the capacity against the bound used for unbounded edges.
    pub fn resolve(&self, bound: A) -> A {
        self.finite().unwrap_or(bound)
    }

    /// Merges a parallel route into this one.
    pub fn merge(self, other: Self) -> Result<Self, Error> {
        match (self, other) {
            (Capacity::Finite(a), Capacity::Finite(b)) => a
                .checked_add(&b)
                .map(Capacity::Finite)
                .ok_or(Error::CapacityOverflow),
            _ => Ok(Capacity::Unbounded),
        }
    }
}

impl<A> From<A> for Capacity<A> {
    fn from(a: A) -> Self {
        Capacity::Finite(a)
    }
}

impl<A> FromStr for Capacity<A>
where
    A: Amount + FromStr,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if ["inf", "infinity", "unbounded", "∞"]
            .iter()
            .any(|u| s.eq_ignore_ascii_case(u))
        {
            return Ok(Capacity::Unbounded);
        }

        let amount: A = s
            .parse()
            .map_err(|_| Error::InvalidCapacity(s.to_string()))?;
        if amount < A::zero() {
            Err(Error::NegativeCapacity)
        } else {
            Ok(Capacity::Finite(amount))
        }
    }
}

impl<A> TryFrom<String> for Capacity<A>
where
    A: Amount + FromStr,
{
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl<A: Amount> From<Capacity<A>> for String {
    fn from(c: Capacity<A>) -> Self {
        match c {
            Capacity::Finite(a) => a.to_string(),
            Capacity::Unbounded => "inf".to_string(),
        }
    }
}
