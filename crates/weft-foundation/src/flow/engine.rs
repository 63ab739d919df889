//! The per-layout-pass driver.
//!
//! `FlowEngine` ties the flow components together: setters from the host
//! only mark dirty state, and one `layout_pass` call per UI frame performs
//! the actual work: estimate, reconcile scroll state, recycle or keep
//! cells, fill the live window leading-edge first, position everything,
//! and push scrollbar geometry. Passes are atomic and synchronous; a state
//! change after a pass simply makes the next pass do more.

use web_time::Instant;
use weft_ui_layout::{
    CellFactory, FlowCell, FlowError, ItemChange, Point, ScrollbarSink, ScrollbarState, Size,
};

use super::config::{FlowConfig, DEFAULT_CELL_EXTENT_ESTIMATE};
use super::estimator::SizeEstimator;
use super::packer::{RowPacker, RowStart};
use super::pool::{CellPool, FlowStats};
use super::size_cache::SizeCache;
use super::viewport::ViewportController;
use super::window::CellWindow;

/// Pending work for the next layout pass, in increasing severity. Requests
/// merge by taking the maximum, so a recreate subsumes a rebuild subsumes
/// a reconfigure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DirtyState {
    Clean,

    /// Viewport or scroll position changed: keep cells, re-measure where
    /// sizes were invalidated, reposition.
    NeedsReconfigure,

    /// Item contents or count changed: recycle every cell and re-layout.
    NeedsRebuild,

    /// The cell factory changed: discard every cell, pile included, and
    /// construct everything afresh.
    NeedsRecreate,
}

/// One realized cell in the last layout pass.
#[derive(Clone, Copy, Debug)]
pub struct FlowCellInfo {
    pub index: usize,

    /// Viewport-relative screen-space origin the cell was placed at.
    pub origin: Point,

    /// Screen-space measured size.
    pub size: Size,
}

/// Snapshot of the last layout pass.
#[derive(Clone, Debug, Default)]
pub struct FlowLayoutInfo {
    /// Realized cells in index order. Cells at the fill boundary may sit
    /// just outside the viewport.
    pub visible_cells: Vec<FlowCellInfo>,

    pub total_item_count: usize,

    /// Screen-space viewport size the pass ran against.
    pub viewport: Size,

    pub estimated_total_length: f32,
}

/// The virtualized flow layout engine.
///
/// Owns the cell pool, live window, size cache, estimator, and scroll
/// state for one flow view. Single-threaded: every operation is a plain
/// synchronous call from the hosting UI thread, and all heavy work happens
/// inside [`layout_pass`](Self::layout_pass).
pub struct FlowEngine<F: CellFactory> {
    config: FlowConfig,
    pool: CellPool<F>,
    window: CellWindow<F::Cell>,
    packer: RowPacker,
    size_cache: SizeCache,
    estimator: SizeEstimator,
    viewport: ViewportController,
    dirty: DirtyState,
    item_count: usize,
    count_changed: bool,
    pending_scroll_to: Option<usize>,
    /// Absolute bottom edge of the deepest row laid out so far; feeds the
    /// estimator's lower bound.
    laid_out_extent: f32,
    layout_info: FlowLayoutInfo,
}

impl<F: CellFactory> FlowEngine<F> {
    pub fn new(factory: F, config: FlowConfig) -> Self {
        let size_cache = SizeCache::new(config.size_cache_capacity, DEFAULT_CELL_EXTENT_ESTIMATE);
        let estimator = SizeEstimator::new(config.sample_increment);
        Self {
            pool: CellPool::new(factory),
            window: CellWindow::new(),
            packer: RowPacker::new(0.0),
            size_cache,
            estimator,
            viewport: ViewportController::new(),
            dirty: DirtyState::Clean,
            item_count: 0,
            count_changed: false,
            pending_scroll_to: None,
            laid_out_extent: 0.0,
            layout_info: FlowLayoutInfo::default(),
            config,
        }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn position(&self) -> f32 {
        self.viewport.position()
    }

    pub fn absolute_offset(&self) -> f32 {
        self.viewport.absolute_offset()
    }

    pub fn dirty_state(&self) -> DirtyState {
        self.dirty
    }

    pub fn stats(&self) -> FlowStats {
        self.pool.stats(self.window.len())
    }

    /// Snapshot of the last pass.
    pub fn layout_info(&self) -> &FlowLayoutInfo {
        &self.layout_info
    }

    /// Updates the item count directly. Prefer [`items_changed`](Self::items_changed)
    /// when the granularity of the mutation is known.
    pub fn set_item_count(&mut self, count: usize) {
        if count == self.item_count {
            return;
        }
        self.item_count = count;
        self.count_changed = true;
        self.size_cache.invalidate_all();
        self.estimator.invalidate();
        self.packer.invalidate();
        self.laid_out_extent = 0.0;
        self.request(DirtyState::NeedsRebuild);
    }

    /// Applies a mutation report from the host's item collection.
    pub fn items_changed(&mut self, change: ItemChange) {
        match change {
            ItemChange::Inserted { count, .. } => {
                self.set_item_count(self.item_count + count);
            }
            ItemChange::Removed { count, .. } => {
                self.set_item_count(self.item_count.saturating_sub(count));
            }
            ItemChange::Replaced { range } | ItemChange::Permuted { range } => {
                for index in range {
                    self.size_cache.invalidate(index);
                }
                self.packer.invalidate();
                self.estimator.invalidate();
                self.laid_out_extent = 0.0;
                self.request(DirtyState::NeedsRebuild);
            }
        }
    }

    /// Updates the viewport geometry from the host layout. A breadth
    /// change re-wraps every row, so all cached sizes are invalidated.
    pub fn set_viewport(&mut self, size: Size) {
        let breadth = self.config.axis.breadth_of(size);
        let length = self.config.axis.length_of(size);
        let breadth_changed = breadth != self.viewport.viewport_breadth();
        self.viewport.set_viewport(breadth, length);
        self.packer.set_breadth(breadth);
        if breadth_changed {
            self.size_cache.invalidate_all();
            self.estimator.invalidate();
            self.laid_out_extent = 0.0;
        }
        self.request(DirtyState::NeedsReconfigure);
    }

    /// Sets the fractional scroll position (clamped to `[0, 1]`).
    pub fn set_position(&mut self, position: f32) {
        self.viewport.set_position(position);
        self.request(DirtyState::NeedsReconfigure);
    }

    /// Scrolls so the row containing `index` sits at the viewport top on
    /// the next pass. Out-of-range indices clamp to the last item.
    pub fn scroll_to(&mut self, index: usize) {
        self.pending_scroll_to = Some(index);
        self.request(DirtyState::NeedsReconfigure);
    }

    /// Scrolls by `delta` pixels and returns the pixels actually applied
    /// (zero at the extremities).
    pub fn scroll_by_pixels(&mut self, delta: f32) -> f32 {
        let moved = self
            .viewport
            .scroll_by_pixels(delta, self.config.scroll_damping);
        if moved != 0.0 {
            self.request(DirtyState::NeedsReconfigure);
        }
        moved
    }

    /// Requests that cells be kept but re-measured and repositioned.
    pub fn reconfigure_cells(&mut self) {
        self.request(DirtyState::NeedsReconfigure);
    }

    /// Requests that cells be recycled and the layout rebuilt.
    pub fn rebuild_cells(&mut self) {
        self.request(DirtyState::NeedsRebuild);
    }

    /// Requests that every cell be discarded and constructed afresh.
    pub fn recreate_cells(&mut self) {
        self.request(DirtyState::NeedsRecreate);
    }

    /// Replaces the cell factory; existing cells cannot be rebound to the
    /// new factory's output, so this forces a recreate.
    pub fn set_cell_factory(&mut self, factory: F) {
        self.pool.set_factory(factory);
        self.request(DirtyState::NeedsRecreate);
    }

    fn request(&mut self, state: DirtyState) {
        self.dirty = self.dirty.max(state);
    }

    /// Runs one layout pass and returns the resulting snapshot.
    ///
    /// Factory failures abort the pass and propagate; the engine stays
    /// consistent and usable on the next pass.
    pub fn layout_pass(
        &mut self,
        scrollbar: &mut impl ScrollbarSink,
    ) -> Result<&FlowLayoutInfo, FlowError> {
        if self.item_count == 0 {
            return Ok(self.layout_empty(scrollbar, true));
        }
        if self.viewport.viewport_length() <= 0.0 || self.viewport.viewport_breadth() <= 0.0 {
            return Ok(self.layout_empty(scrollbar, false));
        }

        let axis = self.config.axis;
        let breadth = self.viewport.viewport_breadth();

        // 1. Recompute the estimated total.
        let estimate = {
            let cache = &mut self.size_cache;
            self.estimator.estimate(
                self.item_count,
                &mut self.packer,
                self.laid_out_extent,
                &mut |i| cache.sample(i),
            )
        };
        self.viewport.set_estimated_total(estimate);

        // 2. Reconcile position ↔ offset. After a count change the offset
        // is authoritative; otherwise the position is.
        if self.count_changed {
            self.viewport.sync_from_offset();
        } else {
            self.viewport.sync_from_position();
        }
        self.count_changed = false;

        // Pending programmatic scroll: the target row's top becomes the
        // offset, which is then authoritative.
        if let Some(target) = self.pending_scroll_to.take() {
            let target = target.min(self.item_count - 1);
            let row_top = {
                let cache = &mut self.size_cache;
                self.packer
                    .position_of(target, self.item_count, &mut |i| cache.size_or_default(i))
                    .y
            };
            self.viewport.set_absolute_offset(row_top);
        }

        // Near the end of the list the estimate is replaced with the exact
        // total; precision there matters more for scrolling feel.
        if self
            .viewport
            .needs_end_precision(self.config.end_precision_fraction)
            && !self.estimator.is_exact()
        {
            self.measure_remaining_exact()?;
            if self.estimator.is_exact() {
                self.viewport
                    .set_estimated_total(self.estimator.last_estimate());
                self.viewport.sync_from_position();
            }
        }

        // 3. Apply the pending state transition.
        match self.dirty {
            DirtyState::NeedsRecreate => {
                self.pool.discard_all(&mut self.window);
                self.size_cache.invalidate_all();
                self.estimator.invalidate();
                self.packer.invalidate();
            }
            DirtyState::NeedsRebuild => {
                self.pool.release_all(&mut self.window);
                self.packer.invalidate();
            }
            DirtyState::NeedsReconfigure | DirtyState::Clean => {}
        }

        // Kept cells re-measure first (cache hits make this free unless
        // their sizes were invalidated) so the start row sees fresh sizes.
        {
            let cache = &mut self.size_cache;
            for (index, cell) in self.window.iter_mut() {
                cache.get_or_measure(index, || axis.flow_size(cell.measure(breadth)));
            }
        }

        // 4. Current start row.
        let offset = self.viewport.absolute_offset();
        let start = {
            let cache = &mut self.size_cache;
            self.packer
                .row_at_offset(offset, self.item_count, &mut |i| cache.size_or_default(i))
        };
        let viewport_end = offset + self.viewport.viewport_length();
        let measured_before = self.size_cache.measured_count();

        // 5. Adjust the window to the new range: shed cells before the
        // start row and past the item count, then extend leading-edge
        // first (index-0 alignment is reconciled before the trailing fill
        // can move the far edge).
        while let Some(first) = self.window.first_index() {
            if first >= start.index {
                break;
            }
            if let Some(cell) = self.window.pop_leading() {
                self.pool.release(cell);
            }
        }
        while let Some(last) = self.window.last_index() {
            if last < self.item_count {
                break;
            }
            if let Some(cell) = self.window.pop_trailing() {
                self.pool.release(cell);
            }
        }
        if self.window.is_empty() {
            let mut cell = self.pool.obtain(start.index)?;
            self.size_cache
                .get_or_measure(start.index, || axis.flow_size(cell.measure(breadth)));
            self.window.push_trailing(cell);
        }
        self.add_leading_cells(start.index)?;
        let fill_end = self.add_trailing_cells(start, viewport_end)?;
        while let Some(last) = self.window.last_index() {
            if last < fill_end {
                break;
            }
            if let Some(cell) = self.window.pop_trailing() {
                self.pool.release(cell);
            }
        }

        // Fresh measurements invalidate the packer's replay checkpoint.
        if self.size_cache.measured_count() != measured_before {
            self.packer.invalidate();
        }

        // 6. Position all live cells, packing rows with the measured sizes.
        let mut visible_cells = Vec::with_capacity(self.window.len());
        {
            let cache = &mut self.size_cache;
            let mut row_top = start.offset;
            let mut x = 0.0f32;
            let mut row_extent = 0.0f32;
            let mut row_first = start.index;
            for (index, cell) in self.window.iter_mut() {
                let size = cache.size_or_default(index);
                if index > row_first && x + size.width > breadth {
                    row_top += row_extent;
                    x = 0.0;
                    row_extent = 0.0;
                    row_first = index;
                }
                let origin = axis.screen_point(x, row_top - offset);
                cell.place(origin);
                visible_cells.push(FlowCellInfo {
                    index,
                    origin,
                    size: axis.screen_size(size),
                });
                x += size.width;
                row_extent = row_extent.max(size.height);
            }
            self.laid_out_extent = row_top + row_extent;
        }

        // 7. Scrollbar geometry.
        self.push_scrollbar(scrollbar);

        // 8. Bound the pile.
        self.pool.trim(self.config.max_pile_size);

        self.dirty = DirtyState::Clean;
        self.layout_info = FlowLayoutInfo {
            visible_cells,
            total_item_count: self.item_count,
            viewport: self.viewport_size(),
            estimated_total_length: self.viewport.estimated_total(),
        };
        Ok(&self.layout_info)
    }

    /// Extends the window backward until it reaches the start row.
    fn add_leading_cells(&mut self, start_index: usize) -> Result<(), FlowError> {
        let axis = self.config.axis;
        let breadth = self.viewport.viewport_breadth();
        while let Some(first) = self.window.first_index() {
            if first <= start_index {
                break;
            }
            let index = first - 1;
            let mut cell = self.pool.obtain(index)?;
            self.size_cache
                .get_or_measure(index, || axis.flow_size(cell.measure(breadth)));
            self.window.push_leading(cell);
        }
        Ok(())
    }

    /// Extends the window forward, row by row, until the next row would
    /// start beyond `viewport_end`. Cells are measured as they are
    /// realized, so row membership follows real sizes. Returns the first
    /// index *not* needed (the next row's start), or `usize::MAX` when the
    /// fill stopped early and the window should be left alone.
    fn add_trailing_cells(
        &mut self,
        start: RowStart,
        viewport_end: f32,
    ) -> Result<usize, FlowError> {
        let started = Instant::now();
        let axis = self.config.axis;
        let breadth = self.viewport.viewport_breadth();
        let mut row = start;
        while row.offset < viewport_end && row.index < self.item_count {
            let mut x = 0.0f32;
            let mut extent = 0.0f32;
            let mut index = row.index;
            while index < self.item_count {
                if !self.window.contains(index) {
                    if self.window.last_index().is_some_and(|last| index != last + 1) {
                        log::warn!(
                            "trailing fill reached index {index} but the live window ends at \
                             {:?}; halting the fill",
                            self.window.last_index()
                        );
                        return Ok(usize::MAX);
                    }
                    let mut cell = self.pool.obtain(index)?;
                    self.size_cache
                        .get_or_measure(index, || axis.flow_size(cell.measure(breadth)));
                    self.window.push_trailing(cell);
                }
                let size = self.size_cache.size_or_default(index);
                if index > row.index && x + size.width > breadth {
                    break;
                }
                x += size.width;
                extent = extent.max(size.height);
                index += 1;
            }
            if started.elapsed() > self.config.fill_time_budget {
                log::warn!(
                    "trailing fill ran past its time budget at index {index}; leaving a \
                     partial window for the next pass"
                );
                return Ok(usize::MAX);
            }
            row = RowStart {
                index,
                offset: row.offset + extent,
            };
        }
        Ok(row.index)
    }

    /// Measures every remaining unmeasured item through a scratch cell and
    /// pins the estimator to the exact packed total. Interrupted by the
    /// fill time budget; later passes resume where it stopped.
    fn measure_remaining_exact(&mut self) -> Result<(), FlowError> {
        let started = Instant::now();
        let axis = self.config.axis;
        let breadth = self.viewport.viewport_breadth();
        let mut sizes: Vec<Size> = Vec::with_capacity(self.item_count);
        let mut scratch: Option<F::Cell> = None;

        for index in 0..self.item_count {
            if let Some(size) = self.size_cache.get(index) {
                sizes.push(size);
                continue;
            }
            if let Some(cell) = self.window.get_mut(index) {
                let size = axis.flow_size(cell.measure(breadth));
                self.size_cache.insert(index, size);
                sizes.push(size);
                continue;
            }
            if started.elapsed() > self.config.fill_time_budget {
                log::warn!(
                    "exact measurement paused by its time budget at index {index} of {}; \
                     resuming next pass",
                    self.item_count
                );
                if let Some(cell) = scratch.take() {
                    self.pool.release(cell);
                }
                return Ok(());
            }
            let mut cell = match scratch.take() {
                Some(mut cell) => {
                    cell.unbind();
                    cell.bind(index);
                    cell
                }
                None => self.pool.obtain(index)?,
            };
            let size = axis.flow_size(cell.measure(breadth));
            self.size_cache.insert(index, size);
            sizes.push(size);
            scratch = Some(cell);
        }
        if let Some(cell) = scratch.take() {
            self.pool.release(cell);
        }

        let total = self
            .packer
            .total_extent(self.item_count, &mut |i| sizes[i]);
        self.estimator.mark_exact(total);
        Ok(())
    }

    /// Empty layout: no items, or a zero-sized viewport. Cells go back to
    /// the pile; scroll state resets only when the collection is empty.
    fn layout_empty(
        &mut self,
        scrollbar: &mut impl ScrollbarSink,
        reset_scroll: bool,
    ) -> &FlowLayoutInfo {
        self.pool.release_all(&mut self.window);
        if reset_scroll {
            self.viewport.reset();
            self.estimator.invalidate();
            self.pending_scroll_to = None;
            self.laid_out_extent = 0.0;
        }
        self.count_changed = false;
        self.dirty = DirtyState::Clean;
        self.layout_info = FlowLayoutInfo {
            visible_cells: Vec::new(),
            total_item_count: self.item_count,
            viewport: self.viewport_size(),
            estimated_total_length: self.viewport.estimated_total(),
        };
        self.push_scrollbar(scrollbar);
        self.pool.trim(self.config.max_pile_size);
        &self.layout_info
    }

    fn push_scrollbar(&self, sink: &mut impl ScrollbarSink) {
        let total = self.viewport.estimated_total();
        let length = self.viewport.viewport_length();
        let visible = total > length && length > 0.0;
        let visible_amount = if total > 0.0 {
            (length / total).clamp(0.0, 1.0)
        } else {
            1.0
        };
        sink.update(ScrollbarState {
            value: self.viewport.position(),
            max: 1.0,
            visible_amount,
            visible,
        });
    }

    fn viewport_size(&self) -> Size {
        self.config.axis.screen_size(Size::new(
            self.viewport.viewport_breadth(),
            self.viewport.viewport_length(),
        ))
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
