use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use num_traits::{CheckedAdd, One, Zero};

/// A trait representing a capacity or flow amount, which is typically a signed integer.
///
/// Capacities are never negative, but net flows are skew-symmetric (`f(v, u) == -f(u, v)`), so
/// the type has to be able to represent both signs.
pub trait Amount:
    Copy
    + Sum<Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + Zero
    + One
    + CheckedAdd
    + Debug
    + Display
    + Default
{
}

impl Amount for i32 {}

impl Amount for i64 {}
