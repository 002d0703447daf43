// crates/slidewin-scheduler/src/lib.rs

//! Window drivers over [`slidewin_core`]'s segment tree: positional
//! (`before`/`after`/`step`/`complete`) and index-anchored
//! (`i`/`starts`/`stops`/`peer_sizes`/`complete`), plus the dispatcher that
//! binds a monoid to a driver and runs its loop.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

pub mod dispatch;
pub mod index;
pub mod peer;
pub mod positional;

pub use dispatch::{
    summary_slide, summary_slide_index, summary_slide_index_with_interrupt, summary_slide_with_interrupt,
    MonoidKind,
};
pub use index::{drive_index, IndexParams};
pub use peer::{build_peer_info, locate_peer_starts_pos, locate_peer_stops_pos, PeerInfo};
pub use positional::{drive_positional, PositionalParams};
