#![forbid(unsafe_code)]

//! Scrolling layout: fits tabs into a viewport by clipping and scrolling.
//!
//! Geometry is recomputed lazily and memoized on a [`LayoutCacheKey`]. Scalar
//! inputs enter the key directly; natural widths are read from the base model
//! once per generation, which [`ScrollingTabLayoutModel::base_mut`] and
//! [`ScrollingTabLayoutModel::clear_cached_data`] advance.
//!
//! # Example
//!
//! ```
//! use tabstrip_layout::{DefaultTabLayoutModel, ScrollingTabLayoutModel, TabLayoutModel};
//!
//! let base = DefaultTabLayoutModel::from_widths(vec![100; 5], 24);
//! let mut layout = ScrollingTabLayoutModel::new(base);
//! layout.set_width(250);
//! assert_eq!(layout.first_visible_tab(250), Some(0));
//! assert!(layout.make_visible(4, 250));
//! assert_eq!(layout.last_visible_tab(250), Some(4));
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::TabLayoutModel;
use crate::compute::{
    ClipThresholds, LayoutCacheKey, LayoutInput, LayoutResult, effective_offset, recompute,
};

#[derive(Debug, Default)]
struct LayoutCache {
    generation: u64,
    /// Natural widths of the current generation, read on first use.
    natural: Option<Rc<[i32]>>,
    entry: Option<(LayoutCacheKey, Rc<LayoutResult>)>,
}

/// Wraps a base layout and clips it to a viewport.
#[derive(Debug)]
pub struct ScrollingTabLayoutModel<L> {
    base: L,
    offset: Option<usize>,
    /// Viewport width; zero or negative until the owner is sized.
    width: i32,
    selected: Option<usize>,
    pixels_to_add_to_selection: i32,
    thresholds: ClipThresholds,
    /// Tab to scroll into view once a valid width arrives.
    pending_make_visible: Option<usize>,
    cache: RefCell<LayoutCache>,
    recomputes: Cell<u64>,
}

impl<L: TabLayoutModel> ScrollingTabLayoutModel<L> {
    /// Wrap `base`. The viewport starts unsized.
    pub fn new(base: L) -> Self {
        Self {
            base,
            offset: None,
            width: -1,
            selected: None,
            pixels_to_add_to_selection: 0,
            thresholds: ClipThresholds::default(),
            pending_make_visible: None,
            cache: RefCell::new(LayoutCache::default()),
            recomputes: Cell::new(0),
        }
    }

    /// Builder: clip thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ClipThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Builder: extra pixels for the selected tab.
    #[must_use]
    pub fn with_pixels_to_add_to_selection(mut self, pixels: i32) -> Self {
        self.pixels_to_add_to_selection = pixels;
        self
    }

    pub fn base(&self) -> &L {
        &self.base
    }

    /// Mutable access to the wrapped model. Drops cached geometry.
    pub fn base_mut(&mut self) -> &mut L {
        self.clear_cached_data();
        &mut self.base
    }

    /// Forget cached geometry and natural widths; the next query recomputes.
    pub fn clear_cached_data(&self) {
        let mut cache = self.cache.borrow_mut();
        cache.generation = cache.generation.wrapping_add(1);
        cache.natural = None;
        cache.entry = None;
    }

    /// How many times geometry was actually recomputed.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes.get()
    }

    /// Left-clipped tab; always `None` with fewer than two tabs.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        effective_offset(self.offset, self.base.tab_count())
    }

    /// [`offset`](Self::offset) with `-1` for none.
    #[must_use]
    pub fn offset_raw(&self) -> i32 {
        self.offset()
            .map_or(-1, |o| i32::try_from(o).unwrap_or(i32::MAX))
    }

    /// Set the scroll offset. Returns whether it changed.
    pub fn set_offset(&mut self, offset: Option<usize>) -> bool {
        let next = effective_offset(offset, self.base.tab_count());
        let previous = self.offset();
        self.offset = next;
        if previous == next {
            return false;
        }
        tracing::debug!(
            message = "tabstrip.layout.offset",
            from = ?previous,
            to = ?next
        );
        true
    }

    /// Current viewport width; zero or negative while unsized.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Set the viewport width. Returns whether it changed.
    ///
    /// The first positive width replays a `make_visible` that arrived while the
    /// viewport was unsized.
    pub fn set_width(&mut self, width: i32) -> bool {
        let changed = self.width != width;
        self.width = width;
        if width > 0
            && let Some(index) = self.pending_make_visible.take()
        {
            self.make_visible(index, width);
        }
        changed
    }

    /// Mirror the selection, which affects narrow viewports and the bias.
    pub fn set_selected(&mut self, selected: Option<usize>) {
        self.selected = selected;
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_pixels_to_add_to_selection(&mut self, pixels: i32) {
        self.pixels_to_add_to_selection = pixels;
    }

    #[must_use]
    pub const fn pixels_to_add_to_selection(&self) -> i32 {
        self.pixels_to_add_to_selection
    }

    pub fn set_thresholds(&mut self, thresholds: ClipThresholds) {
        self.thresholds = thresholds;
    }

    #[must_use]
    pub const fn thresholds(&self) -> ClipThresholds {
        self.thresholds
    }

    /// A tab scrolled into view once the viewport gets a valid width.
    #[must_use]
    pub const fn pending_make_visible(&self) -> Option<usize> {
        self.pending_make_visible
    }

    /// Geometry for the current inputs, recomputed only when an input changed.
    pub fn layout(&self) -> Rc<LayoutResult> {
        let mut cache = self.cache.borrow_mut();
        let base = &self.base;
        let natural = Rc::clone(
            cache
                .natural
                .get_or_insert_with(|| (0..base.tab_count()).map(|i| base.w(i)).collect()),
        );
        let input = LayoutInput {
            natural: &natural,
            viewport_width: self.width,
            offset: self.offset(),
            selected: self.selected,
            pixels_to_add_to_selection: self.pixels_to_add_to_selection,
            thresholds: self.thresholds,
        };
        let key = LayoutCacheKey::new(&input, cache.generation);
        if let Some((cached_key, result)) = &cache.entry
            && *cached_key == key
        {
            return Rc::clone(result);
        }

        let span = tracing::trace_span!(
            "tabstrip.layout.recompute",
            tab_count = natural.len(),
            viewport_width = self.width,
            offset = self.offset_raw()
        );
        let _guard = span.enter();
        let result = Rc::new(recompute(&input));
        self.recomputes.set(self.recomputes.get() + 1);
        cache.entry = Some((key, Rc::clone(&result)));
        result
    }

    /// First visible tab for `width`.
    pub fn first_visible_tab(&mut self, width: i32) -> Option<usize> {
        self.set_width(width);
        self.layout().first_visible
    }

    /// Last visible tab for `width`.
    pub fn last_visible_tab(&mut self, width: i32) -> Option<usize> {
        self.set_width(width);
        self.layout().last_visible
    }

    /// Whether the last visible tab is truncated at the right edge.
    #[must_use]
    pub fn is_last_tab_clipped(&self) -> bool {
        self.layout().last_tab_clipped
    }

    #[must_use]
    pub fn can_scroll_forward(&self) -> bool {
        self.layout().forward_enabled
    }

    #[must_use]
    pub fn can_scroll_backward(&self) -> bool {
        self.layout().backward_enabled
    }

    /// Scroll one tab towards the end. Returns whether the offset moved.
    pub fn scroll_forward(&mut self) -> bool {
        if !self.can_scroll_forward() {
            return false;
        }
        let next = self.offset().map_or(0, |o| o + 1);
        self.set_offset(Some(next))
    }

    /// Scroll one tab towards the start. Returns whether the offset moved.
    pub fn scroll_backward(&mut self) -> bool {
        match self.offset() {
            None => false,
            Some(0) => self.set_offset(None),
            Some(o) => self.set_offset(Some(o - 1)),
        }
    }

    /// Scroll so that `index` is fully visible in a viewport of `width`.
    ///
    /// Returns whether anything changed that needs a repaint. An unsized
    /// (zero or negative) width defers the request until
    /// [`set_width`](Self::set_width) receives a positive one.
    pub fn make_visible(&mut self, index: usize, width: i32) -> bool {
        if width <= 0 {
            self.width = width;
            self.pending_make_visible = Some(index);
            return false;
        }
        self.pending_make_visible = None;
        let resized = self.width != width;
        self.width = width;

        let count = self.base.tab_count();
        if index >= count {
            return resized;
        }
        let changed = match count {
            1 => self.set_offset(None),
            2 => {
                let fits = self.base.w(0) + self.base.w(1) <= width;
                let target = if fits || index == 0 { None } else { Some(1) };
                self.set_offset(target)
            }
            _ => {
                if !resized && self.layout().is_fully_visible(index, self.offset()) {
                    return false;
                }
                let target = self.offset_revealing(index, width);
                let moved = self.set_offset(target);
                let filled = self.ensure_available_space_used(false);
                moved || filled
            }
        };
        let repaint = resized || changed;
        tracing::debug!(
            message = "tabstrip.layout.make_visible",
            index,
            offset = self.offset_raw(),
            repaint
        );
        repaint
    }

    /// Offset that shows `index` whole with a left stub before it.
    fn offset_revealing(&self, index: usize, width: i32) -> Option<usize> {
        let prefix: i32 = (0..=index).map(|i| self.base.w(i)).sum();
        if prefix <= width || index == 0 {
            return None;
        }
        let stub = self.thresholds.min_left;
        let mut total = self.base.w(index);
        if stub + total > width {
            return Some(index);
        }
        let mut first_full = index;
        while first_full > 1 && stub + total + self.base.w(first_full - 1) <= width {
            total += self.base.w(first_full - 1);
            first_full -= 1;
        }
        Some(first_full - 1)
    }

    /// Pull earlier tabs into view while trailing space is left unused.
    ///
    /// Applies when the true last tab is visible and unclipped but does not
    /// reach the right edge, typically after tabs were closed. Stops before
    /// a step would clip the last tab. Returns whether the offset changed.
    pub fn ensure_available_space_used(&mut self, use_cached: bool) -> bool {
        if !use_cached {
            self.clear_cached_data();
        }
        let count = self.base.tab_count();
        let start = self.offset();
        while let Some(offset) = self.offset() {
            let current = self.layout();
            let at_end = current.last_visible == Some(count - 1) && !current.last_tab_clipped;
            if !at_end || current.used_width() >= self.width {
                break;
            }
            self.offset = offset.checked_sub(1);
            let next = self.layout();
            if next.last_tab_clipped || next.last_visible != Some(count - 1) {
                self.offset = Some(offset);
                break;
            }
        }
        let end = self.offset();
        if start == end {
            return false;
        }
        tracing::debug!(
            message = "tabstrip.layout.offset",
            from = ?start,
            to = ?end
        );
        true
    }
}

impl<L: TabLayoutModel> TabLayoutModel for ScrollingTabLayoutModel<L> {
    fn tab_count(&self) -> usize {
        self.base.tab_count()
    }

    fn x(&self, index: usize) -> i32 {
        self.layout().x(index)
    }

    fn y(&self, index: usize) -> i32 {
        self.base.y(index)
    }

    fn w(&self, index: usize) -> i32 {
        self.layout().w(index)
    }

    fn h(&self, index: usize) -> i32 {
        self.base.h(index)
    }

    fn index_of_point(&self, x: i32, y: i32) -> Option<usize> {
        let layout = self.layout();
        let (first, last) = (layout.first_visible?, layout.last_visible?);
        (first..=last).find(|&i| {
            let w = layout.w(i);
            let left = layout.x(i);
            let top = self.base.y(i);
            w > 0 && x >= left && x < left + w && y >= top && y < top + self.base.h(i)
        })
    }
}
