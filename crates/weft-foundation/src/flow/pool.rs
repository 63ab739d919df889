//! Cell recycling.
//!
//! The pool owns the pile of unbound cells and the factory that produces
//! new ones. Live cells belong to the [`CellWindow`]; the engine asks the
//! pool only for indices the window does not already cover, so a live cell
//! bound to the right index is always preferred over a rebind.

use weft_ui_layout::{CellFactory, FlowCell, FlowError};

use super::window::CellWindow;

/// Statistics about cell lifecycle.
///
/// Used for testing and debugging virtualization behavior: under steady
/// scrolling, `total_created` stays bounded by the largest live window ever
/// observed while `reuse_count` keeps growing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowStats {
    /// Cells currently bound and part of the live window.
    pub cells_live: usize,

    /// Cells on the recycle pile, available for rebinding.
    pub cells_pooled: usize,

    /// Total cells ever constructed through the factory.
    pub total_created: usize,

    /// Binds satisfied from the pile instead of the factory.
    pub reuse_count: usize,
}

/// Recycles visual cells, constructing new ones only when the pile is empty.
pub struct CellPool<F: CellFactory> {
    factory: F,
    pile: Vec<F::Cell>,
    total_created: usize,
    reuse_count: usize,
}

impl<F: CellFactory> CellPool<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            pile: Vec::new(),
            total_created: 0,
            reuse_count: 0,
        }
    }

    /// Replaces the factory. Piled cells came from the old factory and can
    /// no longer be rebound, so the pile is dropped.
    pub fn set_factory(&mut self, factory: F) {
        self.factory = factory;
        self.pile.clear();
    }

    /// Returns a cell bound to `index`: rebinds one from the pile, or
    /// constructs a new one through the factory.
    ///
    /// On factory failure nothing has been mutated; the pool is in its
    /// pre-call state and the error propagates to the layout pass.
    pub fn obtain(&mut self, index: usize) -> Result<F::Cell, FlowError> {
        if let Some(mut cell) = self.pile.pop() {
            self.reuse_count += 1;
            cell.bind(index);
            return Ok(cell);
        }
        let mut cell = self.factory.create_cell().map_err(FlowError::CellFactory)?;
        self.total_created += 1;
        cell.bind(index);
        Ok(cell)
    }

    /// Unbinds a cell and moves it to the pile for reuse.
    pub fn release(&mut self, mut cell: F::Cell) {
        cell.unbind();
        self.pile.push(cell);
    }

    /// Moves every live cell from the window to the pile (full rebuild).
    pub fn release_all(&mut self, window: &mut CellWindow<F::Cell>) {
        while let Some(cell) = window.pop_trailing() {
            self.release(cell);
        }
    }

    /// Drops every cell, live and piled (cell factory changed).
    pub fn discard_all(&mut self, window: &mut CellWindow<F::Cell>) {
        while window.pop_trailing().is_some() {}
        self.pile.clear();
    }

    /// Drops pile entries beyond `max`, returning how many were dropped.
    pub fn trim(&mut self, max: usize) -> usize {
        let excess = self.pile.len().saturating_sub(max);
        if excess > 0 {
            self.pile.truncate(max);
            log::trace!("dropped {excess} excess cells from the pile");
        }
        excess
    }

    pub fn pooled(&self) -> usize {
        self.pile.len()
    }

    pub fn stats(&self, cells_live: usize) -> FlowStats {
        FlowStats {
            cells_live,
            cells_pooled: self.pile.len(),
            total_created: self.total_created,
            reuse_count: self.reuse_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::test_support::TestFactory;
    use weft_ui_layout::Size;

    #[test]
    fn test_obtain_constructs_when_pile_empty() {
        let mut pool = CellPool::new(TestFactory::uniform(Size::new(10.0, 10.0)));

        let cell = pool.obtain(3).unwrap();
        assert_eq!(cell.bound_index(), Some(3));
        assert_eq!(pool.stats(0).total_created, 1);
        assert_eq!(pool.stats(0).reuse_count, 0);
    }

    #[test]
    fn test_obtain_prefers_pile() {
        let mut pool = CellPool::new(TestFactory::uniform(Size::new(10.0, 10.0)));

        let cell = pool.obtain(0).unwrap();
        pool.release(cell);
        let cell = pool.obtain(7).unwrap();

        assert_eq!(cell.bound_index(), Some(7));
        assert_eq!(pool.stats(0).total_created, 1, "factory must not be hit");
        assert_eq!(pool.stats(0).reuse_count, 1);
    }

    #[test]
    fn test_release_unbinds() {
        let mut pool = CellPool::new(TestFactory::uniform(Size::new(10.0, 10.0)));

        let cell = pool.obtain(0).unwrap();
        pool.release(cell);

        assert_eq!(pool.pooled(), 1);
        let cell = pool.obtain(1).unwrap();
        assert_eq!(cell.bound_index(), Some(1));
    }

    #[test]
    fn test_factory_failure_leaves_pool_consistent() {
        let mut pool = CellPool::new(TestFactory::failing());

        assert!(pool.obtain(0).is_err());
        assert_eq!(pool.stats(0).total_created, 0);
        assert_eq!(pool.pooled(), 0);
    }

    #[test]
    fn test_trim_bounds_pile() {
        let mut pool = CellPool::new(TestFactory::uniform(Size::new(10.0, 10.0)));
        let cells: Vec<_> = (0..6).map(|i| pool.obtain(i).unwrap()).collect();
        for cell in cells {
            pool.release(cell);
        }
        assert_eq!(pool.pooled(), 6);

        assert_eq!(pool.trim(4), 2);
        assert_eq!(pool.pooled(), 4);
    }

    #[test]
    fn test_set_factory_drops_pile() {
        let mut pool = CellPool::new(TestFactory::uniform(Size::new(10.0, 10.0)));
        let cell = pool.obtain(0).unwrap();
        pool.release(cell);

        pool.set_factory(TestFactory::uniform(Size::new(20.0, 20.0)));
        assert_eq!(pool.pooled(), 0);
    }
}
