//! Virtualized flow layout for Weft.
//!
//! This module lays a large, ordered item collection out into wrapping
//! rows while realizing only the cells that are visible, so layout cost
//! stays proportional to the viewport instead of the collection.
//!
//! # Architecture
//!
//! - [`FlowEngine`] - per-layout-pass driver and public operations
//! - [`CellPool`] / [`CellWindow`] - cell recycling and the live window
//! - [`RowPacker`] - row-packing position/size model
//! - [`SizeCache`] / [`SizeEstimator`] - measured sizes and total-extent
//!   estimation under partial information
//! - [`ViewportController`] - scroll position ↔ pixel offset sync
//!
//! The engine consumes its environment through the capability traits in
//! `weft-ui-layout` (`FlowCell`, `CellFactory`, `ScrollbarSink`); it never
//! owns item data or renders anything itself.

mod config;
mod engine;
mod estimator;
mod packer;
mod pool;
mod size_cache;
mod viewport;
mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::*;
pub use engine::*;
pub use estimator::*;
pub use packer::*;
pub use pool::*;
pub use size_cache::*;
pub use viewport::*;
pub use window::*;
