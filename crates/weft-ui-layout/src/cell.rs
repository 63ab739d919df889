//! Cell and cell-factory capability traits.
//!
//! A cell is the recyclable visual representation of one item. The engine
//! never creates or renders cells itself; it binds, measures, and places
//! them through [`FlowCell`], and asks the host's [`CellFactory`] for fresh
//! ones when the recycle pile runs dry.

use crate::geometry::{Point, Size};

/// A recyclable visual cell, bound to at most one item index at a time.
///
/// Implementations are owned by the host toolkit (a scene-graph node, a
/// retained widget, ...). The engine guarantees:
/// - `bind` is only called on an unbound cell, `unbind` only on a bound one;
/// - at most one live cell is bound to any given index;
/// - `measure` and `place` are only called while the cell is bound.
///
/// Cells hold no reference back to the engine; they receive everything they
/// need (index, geometry) through these calls and answer read-only queries
/// during layout.
pub trait FlowCell {
    /// Binds this cell to the item at `index`, replacing any previous
    /// content. The host updates the cell's visuals from its item source.
    fn bind(&mut self, index: usize);

    /// Clears the binding. An unbound cell holds no item reference and is
    /// excluded from layout until rebound.
    fn unbind(&mut self);

    /// The index this cell is currently bound to, or `None` when unbound.
    fn bound_index(&self) -> Option<usize>;

    /// Returns the cell's preferred screen-space size after forcing
    /// style/layout resolution, given the available breadth.
    fn measure(&mut self, breadth_limit: f32) -> Size;

    /// Positions the cell at `origin`, in viewport-relative screen
    /// coordinates.
    fn place(&mut self, origin: Point);
}

/// Produces fresh, unbound cells on request.
///
/// The engine calls this exactly once per constructed cell and never while
/// a pooled cell is available for rebinding. Errors propagate out of the
/// layout pass that triggered the construction.
pub trait CellFactory {
    type Cell: FlowCell;

    fn create_cell(&mut self) -> Result<Self::Cell, Box<dyn std::error::Error + Send + Sync>>;
}
