use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::capacity::Capacity;
use crate::error::Error;

/// A route entry of a logistics network: a directed link with a capacity.
pub trait Route {
    type Label;
    type Amount;

    fn origin(&self) -> &Self::Label;
    fn destination(&self) -> &Self::Label;
    fn capacity(&self) -> Capacity<Self::Amount>;
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(
    try_from = "RawRoute<L, A>",
    into = "RawRoute<L, A>",
    bound(
        serialize = "L: Clone + Serialize, A: Amount",
        deserialize = "L: PartialEq + Deserialize<'de>, A: Amount + FromStr"
    )
)]
pub struct SimpleRoute<L, A> {
    from: L,
    to: L,
    capacity: Capacity<A>,
}

impl<L, A> SimpleRoute<L, A>
where
    L: PartialEq,
    A: Amount,
{
    pub fn new(from: L, to: L, capacity: impl Into<Capacity<A>>) -> Result<Self, Error> {
        let capacity = capacity.into();
        if from == to {
            Err(Error::RouteToSelf)
        } else if capacity.finite().is_some_and(|c| c < A::zero()) {
            Err(Error::NegativeCapacity)
        } else {
            Ok(Self { from, to, capacity })
        }
    }
}

impl<L, A> Route for SimpleRoute<L, A>
where
    A: Copy,
{
    type Label = L;
    type Amount = A;

    fn origin(&self) -> &Self::Label {
        &self.from
    }

    fn destination(&self) -> &Self::Label {
        &self.to
    }

    fn capacity(&self) -> Capacity<Self::Amount> {
        self.capacity
    }
}

/// The unvalidated shape of a route, as found in a CSV row.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(bound(
    serialize = "L: Serialize, A: Amount",
    deserialize = "L: Deserialize<'de>, A: Amount + FromStr"
))]
pub struct RawRoute<L, A> {
    pub from: L,
    pub to: L,
    pub capacity: Capacity<A>,
}

impl<L, A> TryFrom<RawRoute<L, A>> for SimpleRoute<L, A>
where
    L: PartialEq,
    A: Amount,
{
    type Error = Error;

    fn try_from(r: RawRoute<L, A>) -> Result<Self, Self::Error> {
        Self::new(r.from, r.to, r.capacity)
    }
}

impl<L, A> From<SimpleRoute<L, A>> for RawRoute<L, A> {
    fn from(r: SimpleRoute<L, A>) -> Self {
        Self {
            from: r.from,
            to: r.to,
            capacity: r.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_route_to_self() {
        assert_eq!(
            SimpleRoute::<_, i32>::new("W1", "W1", 5),
            Err(Error::RouteToSelf)
        );
    }

    #[test]
    fn rejects_negative_capacity() {
        assert_eq!(
            SimpleRoute::<_, i32>::new("T1", "W1", -5),
            Err(Error::NegativeCapacity)
        );
    }

    #[test]
    fn accepts_unbounded_routes() {
        let r = SimpleRoute::<_, i32>::new("T1", "W1", Capacity::Unbounded).unwrap();
        assert_eq!(r.origin(), &"T1");
        assert_eq!(r.destination(), &"W1");
        assert!(r.capacity().is_unbounded());
    }

    #[test]
    fn raw_route_conversion() {
        let raw = RawRoute {
            from: 1,
            to: 2,
            capacity: Capacity::Finite(25i64),
        };
        let route = SimpleRoute::<i32, i64>::try_from(raw.clone()).unwrap();
        assert_eq!(RawRoute::from(route), raw);
    }
}
