//! Foundation elements for Weft: the virtualized flow layout engine

pub mod flow;

pub use flow::*;

pub mod prelude {
    pub use crate::flow::{
        CellPool, CellWindow, DirtyState, FlowConfig, FlowEngine, FlowLayoutInfo, FlowStats,
        RowPacker, SizeCache, SizeEstimator, ViewportController,
    };
    pub use weft_ui_layout::prelude::*;
}
