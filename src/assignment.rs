use serde::Serialize;

use crate::amount::Amount;
use crate::capacity::Capacity;

/// A route augmented with the flow assigned to it by the solver.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(bound(serialize = "L: Serialize, A: Amount + Serialize"))]
pub struct RouteAssignment<L, A> {
    from: L,
    to: L,
    capacity: Capacity<A>,
    flow: A,
    spare: Option<A>,
}

impl<L, A> RouteAssignment<L, A>
where
    A: Amount,
{
    pub fn new(from: L, to: L, capacity: Capacity<A>, flow: A) -> Self {
        let spare = capacity.finite().map(|c| c - flow);
        Self {
            from,
            to,
            capacity,
            flow,
            spare,
        }
    }

    pub fn from(&self) -> &L {
        &self.from
    }

    pub fn to(&self) -> &L {
        &self.to
    }

    pub fn capacity(&self) -> Capacity<A> {
        self.capacity
    }

    pub fn flow(&self) -> A {
        self.flow
    }

    /// Capacity left unused on the route, `None` for unbounded routes.
    pub fn spare(&self) -> Option<A> {
        self.spare
    }

    /// Whether the route runs at full capacity.
    pub fn is_saturated(&self) -> bool {
        self.spare.is_some_and(|s| s.is_zero())
    }
}
