//! Measured-size memoization.
//!
//! Caches the `(width, height)` a cell reported for each item index, in
//! flow space (width = breadth extent, height = length extent). Entries
//! are LRU-bounded; indices that fall out of the cache degrade to the
//! running-average estimate, so packing far from the viewport stays an
//! approximation that refines as cells get measured.

use std::num::NonZeroUsize;

use lru::LruCache;
use weft_ui_layout::Size;

/// A size lookup result: the size to pack with, and whether it comes from
/// an actual measurement or the running-average fallback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeSample {
    pub size: Size,
    pub measured: bool,
}

/// LRU-bounded memo of measured item sizes with a running-average fallback.
#[derive(Debug)]
pub struct SizeCache {
    entries: LruCache<usize, Size>,
    total_width: f32,
    total_height: f32,
    measured: usize,
    default_extent: f32,
}

impl SizeCache {
    /// `capacity` bounds retained entries; `default_extent` seeds both axes
    /// of the fallback size until the first measurement lands.
    pub fn new(capacity: usize, default_extent: f32) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            total_width: 0.0,
            total_height: 0.0,
            measured: 0,
            default_extent,
        }
    }

    pub fn get(&mut self, index: usize) -> Option<Size> {
        self.entries.get(&index).copied()
    }

    /// Returns the cached size, or measures and caches it.
    pub fn get_or_measure(&mut self, index: usize, measure: impl FnOnce() -> Size) -> Size {
        if let Some(size) = self.entries.get(&index) {
            return *size;
        }
        let size = measure();
        self.insert(index, size);
        size
    }

    /// Records a measurement and folds it into the running average.
    pub fn insert(&mut self, index: usize, size: Size) {
        if self.entries.put(index, size).is_none() {
            self.total_width += size.width;
            self.total_height += size.height;
            self.measured += 1;
        }
    }

    /// Drops the entry for one index (item content changed).
    pub fn invalidate(&mut self, index: usize) {
        self.entries.pop(&index);
    }

    /// Drops every entry and the running average (item count or breadth
    /// changed; nothing measured so far can be trusted).
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.total_width = 0.0;
        self.total_height = 0.0;
        self.measured = 0;
    }

    /// Running average of every measurement recorded since the last full
    /// invalidation, or the default square before the first one.
    pub fn average_size(&self) -> Size {
        if self.measured == 0 {
            return Size::new(self.default_extent, self.default_extent);
        }
        let n = self.measured as f32;
        Size::new(self.total_width / n, self.total_height / n)
    }

    /// Cached size, or the running-average fallback for unmeasured indices.
    pub fn size_or_default(&mut self, index: usize) -> Size {
        self.get(index).unwrap_or_else(|| self.average_size())
    }

    /// Like [`size_or_default`](Self::size_or_default), tagged with whether
    /// the value is a real measurement.
    pub fn sample(&mut self, index: usize) -> SizeSample {
        match self.get(index) {
            Some(size) => SizeSample {
                size,
                measured: true,
            },
            None => SizeSample {
                size: self.average_size(),
                measured: false,
            },
        }
    }

    /// Number of measurements recorded since the last full invalidation.
    /// Monotonic within a pass; the engine uses deltas to detect that
    /// packing inputs changed.
    pub fn measured_count(&self) -> usize {
        self.measured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_measure_caches() {
        let mut cache = SizeCache::new(16, 48.0);
        let mut calls = 0;

        let first = cache.get_or_measure(0, || {
            calls += 1;
            Size::new(10.0, 20.0)
        });
        let second = cache.get_or_measure(0, || {
            calls += 1;
            Size::new(99.0, 99.0)
        });

        assert_eq!(first, Size::new(10.0, 20.0));
        assert_eq!(second, first);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_default_before_any_measurement() {
        let mut cache = SizeCache::new(16, 48.0);
        assert_eq!(cache.size_or_default(5), Size::new(48.0, 48.0));
        assert!(!cache.sample(5).measured);
    }

    #[test]
    fn test_average_tracks_measurements() {
        let mut cache = SizeCache::new(16, 48.0);
        cache.insert(0, Size::new(10.0, 20.0));
        cache.insert(1, Size::new(30.0, 40.0));

        assert_eq!(cache.average_size(), Size::new(20.0, 30.0));
        assert_eq!(cache.size_or_default(9), Size::new(20.0, 30.0));
    }

    #[test]
    fn test_eviction_degrades_to_average() {
        let mut cache = SizeCache::new(2, 48.0);
        cache.insert(0, Size::new(10.0, 10.0));
        cache.insert(1, Size::new(10.0, 10.0));
        cache.insert(2, Size::new(10.0, 10.0));

        // Index 0 is the LRU victim; it now resolves to the average.
        assert_eq!(cache.get(0), None);
        assert_eq!(cache.size_or_default(0), Size::new(10.0, 10.0));
        assert!(cache.sample(1).measured);
    }

    #[test]
    fn test_invalidate_all_resets_average() {
        let mut cache = SizeCache::new(16, 48.0);
        cache.insert(0, Size::new(10.0, 10.0));

        cache.invalidate_all();

        assert_eq!(cache.measured_count(), 0);
        assert_eq!(cache.average_size(), Size::new(48.0, 48.0));
    }

    #[test]
    fn test_invalidate_single_keeps_average() {
        let mut cache = SizeCache::new(16, 48.0);
        cache.insert(0, Size::new(10.0, 10.0));
        cache.invalidate(0);

        assert_eq!(cache.get(0), None);
        assert_eq!(cache.average_size(), Size::new(10.0, 10.0));
    }
}
