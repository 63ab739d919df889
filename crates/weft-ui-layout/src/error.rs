//! Error type for flow layout passes.

use thiserror::Error;

/// Errors surfaced by a flow layout pass.
///
/// Everything else the engine tolerates by design: out-of-range cell
/// requests, zero-sized viewports, and overflowing fill loops degrade to
/// empty layouts or logged diagnostics instead of failing the pass.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The host cell factory failed to produce a cell. The pass that needed
    /// the cell fails; the engine stays usable on the next pass.
    #[error("cell factory failed: {0}")]
    CellFactory(#[source] Box<dyn std::error::Error + Send + Sync>),
}
