//! Row packing.
//!
//! Pure position/size model for a wrapping flow: given per-item sizes and a
//! viewport breadth, items pack into rows left to right, each row as tall
//! as its tallest member. All math is in flow space (`width` = breadth
//! extent, `height` = length extent) and sizes come from a lookup closure,
//! so the packer never touches cells or caches directly.

use weft_ui_layout::{Point, Size};

/// Start of a packed row: the first item index and the row's top edge
/// along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowStart {
    pub index: usize,
    pub offset: f32,
}

impl RowStart {
    pub const ORIGIN: RowStart = RowStart {
        index: 0,
        offset: 0.0,
    };
}

/// One packed row: its member index range and its extent along the scroll
/// axis (the max member extent).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackedRow {
    pub start: usize,

    /// One past the last member index.
    pub end: usize,

    /// Row extent along the scroll axis.
    pub extent: f32,
}

/// Packs items into rows against a viewport breadth.
///
/// Positions are computed by replaying the packing from the origin, or
/// from a cached row-start checkpoint when the query lies at or past it.
/// Given identical sizes and breadth the replay is deterministic, so
/// repeated queries return identical coordinates. The checkpoint must be
/// [`invalidated`](Self::invalidate) whenever any size it was derived from
/// changes.
#[derive(Debug)]
pub struct RowPacker {
    breadth: f32,
    checkpoint: Option<RowStart>,
}

impl RowPacker {
    pub fn new(breadth: f32) -> Self {
        Self {
            breadth,
            checkpoint: None,
        }
    }

    pub fn breadth(&self) -> f32 {
        self.breadth
    }

    /// Updates the packing breadth, dropping the checkpoint if it changed.
    pub fn set_breadth(&mut self, breadth: f32) {
        if self.breadth != breadth {
            self.breadth = breadth;
            self.checkpoint = None;
        }
    }

    /// Drops the row-start checkpoint (sizes changed).
    pub fn invalidate(&mut self) {
        self.checkpoint = None;
    }

    /// Packs the single row starting at `start`.
    ///
    /// An item joins the row while `row_x + item_width <= breadth`; the
    /// first item always joins, so an item wider than the breadth still
    /// occupies its own row (no infinite loop) at x = 0.
    pub fn pack_row(
        &self,
        start: usize,
        item_count: usize,
        sizes: &mut impl FnMut(usize) -> Size,
    ) -> PackedRow {
        debug_assert!(start < item_count, "row start past item count");
        let mut x = 0.0f32;
        let mut extent = 0.0f32;
        let mut end = start;
        while end < item_count {
            let size = sizes(end);
            if end > start && x + size.width > self.breadth {
                break;
            }
            x += size.width;
            extent = extent.max(size.height);
            end += 1;
        }
        PackedRow { start, end, extent }
    }

    /// Walks forward row by row, accumulating row extents, and returns the
    /// start of the row containing `offset`. Past the packed extent this
    /// clamps to the last row's start; an empty collection yields the
    /// origin.
    pub fn row_at_offset(
        &mut self,
        offset: f32,
        item_count: usize,
        sizes: &mut impl FnMut(usize) -> Size,
    ) -> RowStart {
        if item_count == 0 {
            return RowStart::ORIGIN;
        }
        let mut cursor = self.resume_for_offset(offset);
        loop {
            let row = self.pack_row(cursor.index, item_count, sizes);
            if cursor.offset + row.extent > offset || row.end >= item_count {
                self.checkpoint = Some(cursor);
                return cursor;
            }
            cursor = RowStart {
                index: row.end,
                offset: cursor.offset + row.extent,
            };
        }
    }

    /// Absolute top-left of `index` in flow-space coordinates, replaying
    /// the packing from the origin or the checkpoint.
    pub fn position_of(
        &mut self,
        index: usize,
        item_count: usize,
        sizes: &mut impl FnMut(usize) -> Size,
    ) -> Point {
        if item_count == 0 {
            return Point::ZERO;
        }
        let index = index.min(item_count - 1);
        let mut cursor = self.resume_for_index(index);
        loop {
            let row = self.pack_row(cursor.index, item_count, sizes);
            if index < row.end {
                let mut x = 0.0;
                for i in row.start..index {
                    x += sizes(i).width;
                }
                self.checkpoint = Some(cursor);
                return Point::new(x, cursor.offset);
            }
            debug_assert!(row.end < item_count, "packed row lost the target index");
            cursor = RowStart {
                index: row.end,
                offset: cursor.offset + row.extent,
            };
        }
    }

    /// Total packed extent along the scroll axis. Walks every row; only
    /// used when exact totals are worth O(item count).
    pub fn total_extent(&self, item_count: usize, sizes: &mut impl FnMut(usize) -> Size) -> f32 {
        let mut offset = 0.0;
        let mut index = 0;
        while index < item_count {
            let row = self.pack_row(index, item_count, sizes);
            offset += row.extent;
            index = row.end;
        }
        offset
    }

    /// Replay start for an offset query: the checkpoint when it lies at or
    /// before the offset, the origin otherwise.
    fn resume_for_offset(&self, offset: f32) -> RowStart {
        match self.checkpoint {
            Some(cp) if cp.offset <= offset => cp,
            _ => RowStart::ORIGIN,
        }
    }

    /// Replay start for an index query.
    fn resume_for_index(&self, index: usize) -> RowStart {
        match self.checkpoint {
            Some(cp) if cp.index <= index => cp,
            _ => RowStart::ORIGIN,
        }
    }
}
