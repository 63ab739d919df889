//! Scrollbar sink capability.
//!
//! The engine computes scrollbar geometry each layout pass and pushes it to
//! the host; the host renders and handles interaction for the actual
//! scrollbar widget, feeding user scrolls back in through the engine's
//! scroll operations.

/// Scrollbar geometry for one axis, pushed to the host after each pass.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollbarState {
    /// Current scroll position, in `[0, max]`.
    pub value: f32,

    /// Upper bound of `value`.
    pub max: f32,

    /// Fraction of the content currently visible, in `[0, 1]`.
    pub visible_amount: f32,

    /// Whether the scrollbar should be shown at all (content overflows
    /// the viewport).
    pub visible: bool,
}

/// Receives scrollbar updates from the engine.
pub trait ScrollbarSink {
    fn update(&mut self, state: ScrollbarState);
}

/// Hosts without a scrollbar can pass `()`.
impl ScrollbarSink for () {
    fn update(&mut self, _state: ScrollbarState) {}
}
