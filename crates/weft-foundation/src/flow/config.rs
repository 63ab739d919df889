//! Configuration for the flow engine.

use web_time::Duration;
use weft_ui_layout::Axis;

/// Default estimated cell extent (both axes) used before any cell has been
/// measured. 48.0 is a common list row height (Material list tile).
pub const DEFAULT_CELL_EXTENT_ESTIMATE: f32 = 48.0;

/// Tunables for a [`FlowEngine`](super::FlowEngine).
///
/// The damping and end-precision fields preserve empirically tuned behavior
/// from the system this engine descends from; they are configuration, not
/// invariants.
#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// Scroll axis. `Vertical` wraps rows along the width and scrolls along
    /// the height.
    pub axis: Axis,

    /// Additional leading rows the size estimator samples on each pass.
    /// The sample grows by this much per pass, so the total-extent estimate
    /// converges as more measurements arrive.
    pub sample_increment: usize,

    /// Maximum number of unbound cells kept on the recycle pile. Excess
    /// cells are dropped at the end of each pass so memory stays bounded.
    pub max_pile_size: usize,

    /// Maximum number of measured sizes retained; older entries are evicted
    /// LRU and fall back to the running-average estimate.
    pub size_cache_capacity: usize,

    /// Fraction of the estimated scroll range past which the engine measures
    /// all remaining items, replacing the estimate with the exact total.
    /// Precision near the end of the list matters more for scrolling feel.
    pub end_precision_fraction: f32,

    /// Position nudge applied when a concurrent estimate change would make a
    /// pixel scroll move the position opposite to the requested direction.
    pub scroll_damping: f32,

    /// Time budget for a single cell-fill or exact-measurement loop.
    ///
    /// A safety mechanism against degenerate zero-extent rows and very slow
    /// cell measurement; when exceeded, the loop logs a warning and stops,
    /// and the next pass continues where it left off.
    pub fill_time_budget: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            sample_increment: 10,
            max_pile_size: 32,
            size_cache_capacity: 1024,
            end_precision_fraction: 0.95,
            scroll_damping: 0.01,
            fill_time_budget: Duration::from_millis(50),
        }
    }
}
