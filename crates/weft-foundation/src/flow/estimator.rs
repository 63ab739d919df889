//! Total-extent estimation.
//!
//! Most item sizes are unknown until their cells are measured, so the
//! total content length backing the scrollbar is an estimate: the average
//! extent of a growing sample of leading rows, extrapolated to the whole
//! collection. The estimate converges as more cells get measured and is
//! pinned once the collection has been measured exactly.

use smallvec::SmallVec;

use super::packer::RowPacker;
use super::size_cache::SizeSample;

/// Estimates total content extent from a partial sample of packed rows.
///
/// The estimate never drops below the extent of the leading rows whose
/// members have all actually been measured (monotonic lower bound). It is
/// expected to fluctuate, including non-monotonically, when the item count
/// or the packing breadth changes abruptly; callers should treat it as a
/// scrollbar-quality number, not a layout coordinate.
#[derive(Debug)]
pub struct SizeEstimator {
    sample_size: usize,
    sample_increment: usize,
    exact: Option<f32>,
    last_estimate: f32,
    last_average_row_extent: f32,
}

impl SizeEstimator {
    pub fn new(sample_increment: usize) -> Self {
        Self {
            sample_size: 0,
            sample_increment: sample_increment.max(1),
            exact: None,
            last_estimate: 0.0,
            last_average_row_extent: 0.0,
        }
    }

    /// Drops the exact pin and the cached estimate (item count, breadth,
    /// or content changed).
    pub fn invalidate(&mut self) {
        self.exact = None;
        self.last_estimate = 0.0;
        self.last_average_row_extent = 0.0;
    }

    /// Pins the estimate to an exactly measured total.
    pub fn mark_exact(&mut self, total: f32) {
        self.exact = Some(total);
        self.last_estimate = total;
    }

    pub fn is_exact(&self) -> bool {
        self.exact.is_some()
    }

    /// The estimate produced by the most recent [`estimate`](Self::estimate).
    pub fn last_estimate(&self) -> f32 {
        self.last_estimate
    }

    /// Average row extent observed in the most recent sampling walk.
    pub fn last_average_row_extent(&self) -> f32 {
        self.last_average_row_extent
    }

    /// Recomputes the estimate, sampling `sample_increment` more leading
    /// rows than the previous pass.
    ///
    /// `lookup` supplies flow-space sizes tagged with whether they are real
    /// measurements; unmeasured indices contribute their fallback size to
    /// the sample but disqualify their row from the measured lower bound.
    /// `floor` is extent the caller knows to be concretely reached (the
    /// bottom edge of rows already laid out); the estimate never drops
    /// below it, nor below the measured leading rows in the sample.
    pub fn estimate(
        &mut self,
        item_count: usize,
        packer: &mut RowPacker,
        floor: f32,
        lookup: &mut impl FnMut(usize) -> SizeSample,
    ) -> f32 {
        if let Some(exact) = self.exact {
            return exact;
        }
        if item_count == 0 {
            self.last_estimate = 0.0;
            return 0.0;
        }

        self.sample_size += self.sample_increment;
        let mut row_extents: SmallVec<[f32; 32]> = SmallVec::new();
        let mut sampled_items = 0usize;
        let mut measured_extent = 0.0f32;
        let mut measured_prefix = true;
        let mut cursor = 0usize;

        while row_extents.len() < self.sample_size && cursor < item_count {
            let row = packer.pack_row(cursor, item_count, &mut |i| lookup(i).size);
            row_extents.push(row.extent);
            sampled_items += row.end - row.start;
            if measured_prefix && (row.start..row.end).all(|i| lookup(i).measured) {
                measured_extent += row.extent;
            } else {
                measured_prefix = false;
            }
            cursor = row.end;
        }

        let sampled_rows = row_extents.len();
        debug_assert!(sampled_rows > 0, "non-empty collection packs at least one row");
        let sampled_extent: f32 = row_extents.iter().sum();
        let average_row_extent = sampled_extent / sampled_rows as f32;
        self.last_average_row_extent = average_row_extent;

        let estimate = if cursor >= item_count {
            // Sampled every row: the estimate is the packed extent itself.
            sampled_extent
        } else {
            let average_items_per_row = sampled_items as f32 / sampled_rows as f32;
            let estimated_row_count = (item_count as f32 / average_items_per_row).ceil();
            average_row_extent * estimated_row_count
        };

        let estimate = estimate.max(measured_extent).max(floor);
        self.last_estimate = estimate;
        estimate
    }
}
