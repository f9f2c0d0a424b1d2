#![forbid(unsafe_code)]

//! Tab geometry.
//!
//! A [`TabLayoutModel`] answers "where is tab *i*" for painting and hit
//! testing. [`DefaultTabLayoutModel`] lays every tab out at its natural
//! (measured) width; [`ScrollingTabLayoutModel`] wraps any model and fits the
//! tabs into a viewport by clipping at the left and right edges and
//! scrolling.

pub mod base;
pub mod compute;
pub mod scrolling;

pub use base::{CellTextMeasurer, DefaultTabLayoutModel, TabMetricsConfig, TextMeasurer};
pub use compute::{
    ClipThresholds, LayoutCacheKey, LayoutInput, LayoutResult, MIN_LEFT_CLIPPED_WIDTH,
    MIN_RIGHT_CLIPPED_WIDTH, recompute,
};
pub use scrolling::ScrollingTabLayoutModel;
pub use tabstrip_core::geometry::Rect;

/// Geometry contract consumed by painters and hit testing.
///
/// Every accessor tolerates stale indices: an index at or past
/// [`tab_count`](Self::tab_count) yields zero geometry rather than panicking,
/// since repaint requests may be queued against tabs that have since been
/// removed.
pub trait TabLayoutModel {
    /// Number of tabs laid out.
    fn tab_count(&self) -> usize;

    /// Left edge of the tab.
    fn x(&self, index: usize) -> i32;

    /// Top edge of the tab.
    fn y(&self, index: usize) -> i32;

    /// Width of the tab.
    fn w(&self, index: usize) -> i32;

    /// Height of the tab.
    fn h(&self, index: usize) -> i32;

    /// Bounds of the tab.
    fn bounds(&self, index: usize) -> Rect {
        Rect::new(self.x(index), self.y(index), self.w(index), self.h(index))
    }

    /// Tab under the point, if any.
    fn index_of_point(&self, x: i32, y: i32) -> Option<usize> {
        (0..self.tab_count()).find(|&i| self.bounds(i).contains(x, y))
    }

    /// Insertion index for a tab dropped at the point.
    ///
    /// A point over the left half of a tab inserts before it, over the right
    /// half after it. Returns `None` when the point is above or below the
    /// strip.
    fn drop_index_of_point(&self, x: i32, y: i32) -> Option<usize> {
        let count = self.tab_count();
        if count == 0 {
            return Some(0);
        }
        let top = self.y(0);
        if y < top || y >= top + self.h(0) {
            return None;
        }
        let mut after_last = 0;
        for i in 0..count {
            let b = self.bounds(i);
            if b.width <= 0 {
                continue;
            }
            if x < b.x + b.width / 2 {
                return Some(i);
            }
            after_last = i + 1;
        }
        Some(after_last)
    }
}
