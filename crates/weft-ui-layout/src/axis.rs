//! Scroll axis and breadth/length coordinate mapping.
//!
//! A flow view packs items into rows along the cross axis ("breadth") and
//! scrolls along the main axis ("length"). All packing math works in
//! (breadth, length) coordinates so it stays independent of orientation;
//! [`Axis`] converts between that space and screen-space `Size`/`Point`.

use crate::geometry::{Point, Size};

/// The scroll axis of a flow view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Content scrolls horizontally; rows wrap along the height.
    Horizontal,

    /// Content scrolls vertically; rows wrap along the width.
    Vertical,
}

impl Axis {
    /// Returns the opposite axis.
    #[inline]
    pub fn cross_axis(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Returns true if this is the horizontal axis.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::Horizontal)
    }

    /// Returns true if this is the vertical axis.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Axis::Vertical)
    }

    /// The cross-axis extent of `size` (the breadth rows wrap against).
    #[inline]
    pub fn breadth_of(self, size: Size) -> f32 {
        match self {
            Axis::Vertical => size.width,
            Axis::Horizontal => size.height,
        }
    }

    /// The main-axis extent of `size` (the length content scrolls along).
    #[inline]
    pub fn length_of(self, size: Size) -> f32 {
        match self {
            Axis::Vertical => size.height,
            Axis::Horizontal => size.width,
        }
    }

    /// Converts a screen-space size into flow space, where `width` is the
    /// breadth extent and `height` is the length extent.
    #[inline]
    pub fn flow_size(self, size: Size) -> Size {
        match self {
            Axis::Vertical => size,
            Axis::Horizontal => Size::new(size.height, size.width),
        }
    }

    /// Converts a flow-space size back into screen space. Its own inverse.
    #[inline]
    pub fn screen_size(self, size: Size) -> Size {
        self.flow_size(size)
    }

    /// Builds a screen-space point from flow-space coordinates.
    #[inline]
    pub fn screen_point(self, breadth_pos: f32, length_pos: f32) -> Point {
        match self {
            Axis::Vertical => Point::new(breadth_pos, length_pos),
            Axis::Horizontal => Point::new(length_pos, breadth_pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_mapping_is_identity() {
        let size = Size::new(10.0, 20.0);
        assert_eq!(Axis::Vertical.breadth_of(size), 10.0);
        assert_eq!(Axis::Vertical.length_of(size), 20.0);
        assert_eq!(Axis::Vertical.flow_size(size), size);
        assert_eq!(Axis::Vertical.screen_point(3.0, 7.0), Point::new(3.0, 7.0));
    }

    #[test]
    fn test_horizontal_mapping_swaps() {
        let size = Size::new(10.0, 20.0);
        assert_eq!(Axis::Horizontal.breadth_of(size), 20.0);
        assert_eq!(Axis::Horizontal.length_of(size), 10.0);
        assert_eq!(Axis::Horizontal.flow_size(size), Size::new(20.0, 10.0));
        assert_eq!(
            Axis::Horizontal.screen_point(3.0, 7.0),
            Point::new(7.0, 3.0)
        );
    }

    #[test]
    fn test_flow_size_round_trips() {
        let size = Size::new(85.0, 43.0);
        for axis in [Axis::Vertical, Axis::Horizontal] {
            assert_eq!(axis.screen_size(axis.flow_size(size)), size);
        }
    }
}
