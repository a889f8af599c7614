//! Core types, metric catalog and index calculations for Zephyr
//!
//! Everything in this crate is synchronous and free of shared state: the
//! aggregators take a `ReadingSet` by reference and return fresh values.

pub mod aqi;
pub mod breakpoints;
pub mod catalog;
pub mod pollen;
pub mod report;
pub mod risk;
pub mod types;
pub mod units;

pub use aqi::*;
pub use breakpoints::*;
pub use catalog::*;
pub use pollen::*;
pub use report::*;
pub use risk::*;
pub use types::*;
pub use units::*;
