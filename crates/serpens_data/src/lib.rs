//! Plain data types shared by the serpens simulation crates.
//!
//! Behavior lives in `serpens_core`, which implements its logic traits over
//! these structures.

pub mod data;

pub use data::*;
