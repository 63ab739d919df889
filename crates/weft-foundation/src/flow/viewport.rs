//! Scroll position / pixel offset synchronization.
//!
//! The controller owns the fractional scroll position (`0..=1`), the
//! absolute pixel offset from the start of content, and the geometry both
//! are measured against. The two representations drift whenever the
//! estimated total changes, so every operation declares one of them the
//! source of truth and recomputes the other; the engine picks the
//! authority per pass (item count changed ⇒ offset wins, otherwise
//! position wins).

/// Scroll state for one axis of a flow view.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportController {
    position: f32,
    absolute_offset: f32,
    estimated_total: f32,
    viewport_length: f32,
    viewport_breadth: f32,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fractional scroll position in `[0, 1]`.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Pixel distance from the start of content to the viewport top.
    pub fn absolute_offset(&self) -> f32 {
        self.absolute_offset
    }

    pub fn estimated_total(&self) -> f32 {
        self.estimated_total
    }

    pub fn viewport_length(&self) -> f32 {
        self.viewport_length
    }

    pub fn viewport_breadth(&self) -> f32 {
        self.viewport_breadth
    }

    /// Pixels of content hidden beyond the viewport; zero when everything
    /// fits.
    pub fn scroll_range(&self) -> f32 {
        (self.estimated_total - self.viewport_length).max(0.0)
    }

    /// Stores new viewport geometry without resynchronizing.
    pub fn set_viewport(&mut self, breadth: f32, length: f32) {
        self.viewport_breadth = breadth.max(0.0);
        self.viewport_length = length.max(0.0);
    }

    /// Stores a new estimated total without resynchronizing; the caller
    /// decides which of position/offset is authoritative afterwards.
    pub fn set_estimated_total(&mut self, total: f32) {
        self.estimated_total = total.max(0.0);
    }

    /// Makes `p` the position (clamped to `[0, 1]`) and derives the offset.
    pub fn set_position(&mut self, p: f32) {
        self.position = p.clamp(0.0, 1.0);
        self.absolute_offset = self.position * self.scroll_range();
    }

    /// Makes `offset` the offset (clamped into range) and derives the
    /// position.
    pub fn set_absolute_offset(&mut self, offset: f32) {
        let range = self.scroll_range();
        self.absolute_offset = offset.clamp(0.0, range);
        self.position = if range > 0.0 {
            self.absolute_offset / range
        } else {
            0.0
        };
    }

    /// Re-derives the offset from the current position (position is
    /// authoritative).
    pub fn sync_from_position(&mut self) {
        self.set_position(self.position);
    }

    /// Re-derives the position from the current offset (offset is
    /// authoritative).
    pub fn sync_from_offset(&mut self) {
        self.set_absolute_offset(self.absolute_offset);
    }

    /// Scrolls by `delta` pixels and returns the pixels actually moved
    /// (less than requested at the extremities, zero at the very ends).
    ///
    /// The offset is authoritative here. The derived position normally
    /// follows it, except when a concurrent estimate change has skewed the
    /// pair so far that the conversion would move the position *against*
    /// the requested direction. In that case the position is nudged by
    /// `damping` in the requested direction instead, so the scrollbar
    /// never visibly jumps backwards mid-scroll.
    pub fn scroll_by_pixels(&mut self, delta: f32, damping: f32) -> f32 {
        let range = self.scroll_range();
        if range <= 0.0 || delta == 0.0 {
            return 0.0;
        }

        let old_offset = self.absolute_offset.clamp(0.0, range);
        let new_offset = (old_offset + delta).clamp(0.0, range);
        let moved = new_offset - old_offset;
        if moved == 0.0 {
            self.absolute_offset = old_offset;
            return 0.0;
        }

        let mut new_position = new_offset / range;
        if delta > 0.0 && new_position < self.position {
            new_position = (self.position + damping).min(1.0);
        } else if delta < 0.0 && new_position > self.position {
            new_position = (self.position - damping).max(0.0);
        }

        self.position = new_position.clamp(0.0, 1.0);
        self.absolute_offset = new_offset;
        moved
    }

    /// True once the position is past `fraction` of a non-empty scroll
    /// range; the engine responds by measuring the rest of the collection
    /// exactly.
    pub fn needs_end_precision(&self, fraction: f32) -> bool {
        self.scroll_range() > 0.0 && self.position > fraction
    }

    /// Resets scrolling to the very start (collection emptied).
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.absolute_offset = 0.0;
        self.estimated_total = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(total: f32, viewport: f32) -> ViewportController {
        let mut vc = ViewportController::new();
        vc.set_viewport(100.0, viewport);
        vc.set_estimated_total(total);
        vc
    }

    #[test]
    fn test_set_position_clamps_and_derives_offset() {
        let mut vc = controller(1000.0, 100.0);

        vc.set_position(0.5);
        assert_eq!(vc.position(), 0.5);
        assert_eq!(vc.absolute_offset(), 450.0);

        vc.set_position(7.0);
        assert_eq!(vc.position(), 1.0);
        assert_eq!(vc.absolute_offset(), 900.0);

        vc.set_position(-3.0);
        assert_eq!(vc.position(), 0.0);
        assert_eq!(vc.absolute_offset(), 0.0);
    }

    #[test]
    fn test_scroll_by_pixels_moves_and_reports() {
        let mut vc = controller(1000.0, 100.0);

        let moved = vc.scroll_by_pixels(90.0, 0.01);
        assert_eq!(moved, 90.0);
        assert_eq!(vc.absolute_offset(), 90.0);
        assert_eq!(vc.position(), 0.1);
    }

    #[test]
    fn test_scroll_clamps_at_top() {
        let mut vc = controller(1000.0, 100.0);

        assert_eq!(vc.scroll_by_pixels(-50.0, 0.01), 0.0);
        assert_eq!(vc.position(), 0.0);
        assert_eq!(vc.absolute_offset(), 0.0);
    }

    #[test]
    fn test_scroll_clamps_at_bottom() {
        let mut vc = controller(1000.0, 100.0);
        vc.set_position(1.0);

        assert_eq!(vc.scroll_by_pixels(25.0, 0.01), 0.0);
        // Partial move when less than requested remains.
        vc.set_absolute_offset(880.0);
        assert_eq!(vc.scroll_by_pixels(100.0, 0.01), 20.0);
        assert_eq!(vc.position(), 1.0);
    }

    #[test]
    fn test_scroll_without_overflow_is_noop() {
        // Content fits in the viewport: nothing to scroll.
        let mut vc = controller(50.0, 100.0);
        assert_eq!(vc.scroll_by_pixels(10.0, 0.01), 0.0);
        assert_eq!(vc.position(), 0.0);
    }

    #[test]
    fn test_damping_on_estimate_growth() {
        // Position says halfway, but the estimate grew under us so the
        // offset now converts to well under half. A forward scroll must not
        // yank the position backwards; it nudges forward by the damping.
        let mut vc = controller(1000.0, 100.0);
        vc.set_position(0.5); // offset 450
        vc.set_estimated_total(2000.0); // offset 450 now converts to ~0.24

        let moved = vc.scroll_by_pixels(10.0, 0.01);
        assert_eq!(moved, 10.0);
        assert!(
            (vc.position() - 0.51).abs() < 1.0e-6,
            "expected damped nudge to 0.51, got {}",
            vc.position()
        );
    }

    #[test]
    fn test_damping_on_estimate_shrink() {
        // The mirror case: estimate shrank, a backward scroll would compute
        // a *larger* position; it nudges backward instead.
        let mut vc = controller(2000.0, 100.0);
        vc.set_position(0.25); // offset 475
        vc.set_estimated_total(700.0); // range 600, offset 475 ~ 0.79

        let moved = vc.scroll_by_pixels(-10.0, 0.01);
        assert_eq!(moved, -10.0);
        assert!(
            (vc.position() - 0.24).abs() < 1.0e-6,
            "expected damped nudge to 0.24, got {}",
            vc.position()
        );
    }

    #[test]
    fn test_sync_authorities() {
        let mut vc = controller(1000.0, 100.0);
        vc.set_position(0.5);

        // Estimate doubles; position authoritative keeps 0.5 and moves the
        // offset.
        vc.set_estimated_total(2000.0);
        vc.sync_from_position();
        assert_eq!(vc.absolute_offset(), 950.0);

        // Offset authoritative keeps the offset and re-derives position.
        vc.set_estimated_total(1000.0);
        vc.sync_from_offset();
        assert_eq!(vc.absolute_offset(), 900.0);
        assert_eq!(vc.position(), 1.0);
    }

    #[test]
    fn test_needs_end_precision() {
        let mut vc = controller(1000.0, 100.0);
        vc.set_position(0.9);
        assert!(!vc.needs_end_precision(0.95));
        vc.set_position(0.96);
        assert!(vc.needs_end_precision(0.95));

        // Never triggers when everything fits.
        let mut fits = controller(50.0, 100.0);
        fits.set_position(1.0);
        assert!(!fits.needs_end_precision(0.95));
    }

    #[test]
    fn test_reset() {
        let mut vc = controller(1000.0, 100.0);
        vc.set_position(0.7);
        vc.reset();
        assert_eq!(vc.position(), 0.0);
        assert_eq!(vc.absolute_offset(), 0.0);
    }
}
