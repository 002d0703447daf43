// crates/slidewin-core/src/lib.rs

//! The monoid catalogue and segment tree at the core of the sliding-window
//! aggregation engine. Drivers (positional, index-anchored) live upstack in
//! `slidewin-scheduler`; this crate knows nothing about windows, only about
//! ranges and monoids.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod interrupt;
pub mod monoid;
pub mod segment_tree;

pub use interrupt::{AtomicInterrupt, Interrupt, NeverInterrupt, CHECK_PERIOD};
pub use monoid::{KahanSum, Max, Mean, MeanAcc, Min, Monoid, Prod, Sum};
pub use segment_tree::SegmentTree;
