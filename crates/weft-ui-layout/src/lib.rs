//! Geometry primitives & layout contracts for Weft
//!
//! This crate defines the types a virtualized flow layout engine shares with
//! its host toolkit: plain geometry (`Point`, `Size`, `Rect`), the scroll
//! [`Axis`], and the capability traits the engine consumes but never
//! implements ([`FlowCell`], [`CellFactory`], [`ScrollbarSink`]). The host
//! owns the item collection, the visual cells, and the scrollbar widget;
//! the engine only sees them through these contracts.

mod axis;
mod cell;
mod error;
mod geometry;
mod item_change;
mod scrollbar;

pub use axis::*;
pub use cell::*;
pub use error::*;
pub use geometry::*;
pub use item_change::*;
pub use scrollbar::*;

pub mod prelude {
    pub use crate::axis::Axis;
    pub use crate::cell::{CellFactory, FlowCell};
    pub use crate::error::FlowError;
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::item_change::ItemChange;
    pub use crate::scrollbar::{ScrollbarSink, ScrollbarState};
}
