#![forbid(unsafe_code)]

//! Natural tab widths.
//!
//! The base model lays tabs edge to edge at the width their content asks
//! for: text, optional icon, padding and the close button. It never clips;
//! [`ScrollingTabLayoutModel`](crate::ScrollingTabLayoutModel) does that.

use tabstrip_core::geometry::Rect;
use tabstrip_core::model::DefaultTabDataModel;
use tabstrip_core::tab::TabData;
use unicode_width::UnicodeWidthStr;

use crate::TabLayoutModel;

/// Measures rendered text.
pub trait TextMeasurer {
    /// Width of `text` in pixels.
    fn text_width(&self, text: &str) -> i32;
}

/// Fixed-pitch measurer: display columns times a per-column pixel width.
///
/// Wide (CJK) characters count as two columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellTextMeasurer {
    char_width: i32,
}

impl CellTextMeasurer {
    #[must_use]
    pub const fn new(char_width: i32) -> Self {
        Self { char_width }
    }
}

impl Default for CellTextMeasurer {
    fn default() -> Self {
        Self::new(7)
    }
}

impl TextMeasurer for CellTextMeasurer {
    fn text_width(&self, text: &str) -> i32 {
        let cols = i32::try_from(UnicodeWidthStr::width(text)).unwrap_or(i32::MAX);
        cols.saturating_mul(self.char_width)
    }
}

impl<F: Fn(&str) -> i32> TextMeasurer for F {
    fn text_width(&self, text: &str) -> i32 {
        self(text)
    }
}

/// Per-skin tab metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabMetricsConfig {
    /// Height of every tab.
    pub tab_height: i32,
    /// Padding on each side of the tab content.
    pub horizontal_padding: i32,
    /// Gap between icon and text.
    pub icon_gap: i32,
    /// Width (and height) of the close button.
    pub close_button_width: i32,
    /// Gap between text and close button.
    pub close_button_gap: i32,
    /// Whether tabs carry a close button.
    pub show_close_buttons: bool,
}

impl Default for TabMetricsConfig {
    fn default() -> Self {
        Self {
            tab_height: 24,
            horizontal_padding: 10,
            icon_gap: 4,
            close_button_width: 12,
            close_button_gap: 4,
            show_close_buttons: true,
        }
    }
}

impl TabMetricsConfig {
    /// Natural width of one tab.
    #[must_use]
    pub fn natural_width(&self, tab: &TabData, measurer: &dyn TextMeasurer) -> i32 {
        let mut width = self.horizontal_padding * 2 + measurer.text_width(tab.text());
        if let Some(icon) = tab.icon_size() {
            width += icon.width + self.icon_gap;
        }
        if self.show_close_buttons {
            width += self.close_button_gap + self.close_button_width;
        }
        width.max(0)
    }

    /// Close button bounds inside a tab's bounds.
    ///
    /// Returns an empty rectangle when close buttons are off or the tab is
    /// too narrow to hold one.
    #[must_use]
    pub fn close_button_rect(&self, tab: Rect) -> Rect {
        let size = self.close_button_width;
        if !self.show_close_buttons || tab.width < size + self.horizontal_padding {
            return Rect::default();
        }
        let x = tab.right() - self.horizontal_padding - size;
        let y = tab.y + (tab.height - size) / 2;
        Rect::new(x, y, size, size)
    }
}

/// Lays tabs out edge to edge at their natural widths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultTabLayoutModel {
    widths: Vec<i32>,
    height: i32,
}

impl DefaultTabLayoutModel {
    /// Layout with explicit widths, mainly for tests and custom skins.
    #[must_use]
    pub fn from_widths(widths: Vec<i32>, height: i32) -> Self {
        Self { widths, height }
    }

    /// Measure every tab in `model`.
    #[must_use]
    pub fn measure(
        model: &DefaultTabDataModel,
        measurer: &dyn TextMeasurer,
        metrics: &TabMetricsConfig,
    ) -> Self {
        let mut layout = Self::default();
        layout.remeasure(model, measurer, metrics);
        layout
    }

    /// Re-measure after the model changed.
    pub fn remeasure(
        &mut self,
        model: &DefaultTabDataModel,
        measurer: &dyn TextMeasurer,
        metrics: &TabMetricsConfig,
    ) {
        self.widths.clear();
        self.widths.extend(
            model
                .tabs()
                .iter()
                .map(|tab| metrics.natural_width(tab, measurer)),
        );
        self.height = metrics.tab_height;
    }

    /// Natural widths in model order.
    #[must_use]
    pub fn widths(&self) -> &[i32] {
        &self.widths
    }
}

impl TabLayoutModel for DefaultTabLayoutModel {
    fn tab_count(&self) -> usize {
        self.widths.len()
    }

    fn x(&self, index: usize) -> i32 {
        if index >= self.widths.len() {
            return 0;
        }
        self.widths[..index].iter().sum()
    }

    fn y(&self, _index: usize) -> i32 {
        0
    }

    fn w(&self, index: usize) -> i32 {
        self.widths.get(index).copied().unwrap_or(0)
    }

    fn h(&self, index: usize) -> i32 {
        if index < self.widths.len() {
            self.height
        } else {
            0
        }
    }
}
