use alloc::string::String;
use core::fmt::{Debug, Display};

/// A trait representing a node label of a logistics network (a terminal, warehouse or shop
/// identifier).
pub trait Label: Clone + Ord + Debug + Display {}

impl Label for String {}

impl Label for &'static str {}

impl Label for i32 {}

impl Label for u64 {}
