//! Shared helpers for flow tests: a size-programmable cell, a counting
//! factory, and a recording scrollbar sink.

use std::rc::Rc;

use weft_ui_layout::{CellFactory, FlowCell, Point, ScrollbarSink, ScrollbarState, Size};

type SizeFn = Rc<dyn Fn(usize) -> Size>;

/// A test cell whose preferred size is a function of its bound index.
pub struct TestCell {
    sizes: SizeFn,
    bound: Option<usize>,
    pub origin: Option<Point>,
    pub measure_count: usize,
}

impl TestCell {
    pub fn uniform(size: Size) -> Self {
        Self::with_sizes(Rc::new(move |_| size))
    }

    pub fn with_sizes(sizes: SizeFn) -> Self {
        Self {
            sizes,
            bound: None,
            origin: None,
            measure_count: 0,
        }
    }
}

impl FlowCell for TestCell {
    fn bind(&mut self, index: usize) {
        assert!(self.bound.is_none(), "bind on an already-bound cell");
        self.bound = Some(index);
    }

    fn unbind(&mut self) {
        assert!(self.bound.is_some(), "unbind on an unbound cell");
        self.bound = None;
        self.origin = None;
    }

    fn bound_index(&self) -> Option<usize> {
        self.bound
    }

    fn measure(&mut self, _breadth_limit: f32) -> Size {
        self.measure_count += 1;
        let index = self.bound.expect("measure on an unbound cell");
        (self.sizes)(index)
    }

    fn place(&mut self, origin: Point) {
        assert!(self.bound.is_some(), "place on an unbound cell");
        self.origin = Some(origin);
    }
}

/// Factory producing [`TestCell`]s; can be switched into a failing mode.
pub struct TestFactory {
    sizes: SizeFn,
    pub fail: bool,
}

impl TestFactory {
    pub fn uniform(size: Size) -> Self {
        Self {
            sizes: Rc::new(move |_| size),
            fail: false,
        }
    }

    pub fn with_sizes(sizes: impl Fn(usize) -> Size + 'static) -> Self {
        Self {
            sizes: Rc::new(sizes),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sizes: Rc::new(|_| Size::ZERO),
            fail: true,
        }
    }
}

impl CellFactory for TestFactory {
    type Cell = TestCell;

    fn create_cell(&mut self) -> Result<TestCell, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail {
            return Err("factory told to fail".into());
        }
        Ok(TestCell::with_sizes(Rc::clone(&self.sizes)))
    }
}

/// Records every scrollbar update pushed by the engine.
#[derive(Default)]
pub struct RecordingSink {
    pub updates: Vec<ScrollbarState>,
}

impl RecordingSink {
    pub fn last(&self) -> ScrollbarState {
        self.updates.last().copied().unwrap_or_default()
    }
}

impl ScrollbarSink for RecordingSink {
    fn update(&mut self, state: ScrollbarState) {
        self.updates.push(state);
    }
}
