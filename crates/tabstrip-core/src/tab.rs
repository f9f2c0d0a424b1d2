#![forbid(unsafe_code)]

//! Tab records.

use std::fmt;

/// Identity of the content a tab stands for.
///
/// Two records with the same id refer to the same content even when their
/// text or icon differ; [`ArrayDiff`](crate::ArrayDiff) uses this to tell a
/// retitled tab from a replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// Pixel size of a tab icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct IconSize {
    pub width: i32,
    pub height: i32,
}

impl IconSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A single tab entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabData {
    id: TabId,
    text: String,
    icon: Option<IconSize>,
    tooltip: Option<String>,
    busy: bool,
}

impl TabData {
    /// Create a new tab with an id and display text.
    #[must_use]
    pub fn new(id: TabId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            icon: None,
            tooltip: None,
            busy: false,
        }
    }

    /// Set the icon size.
    #[must_use]
    pub fn icon(mut self, icon: IconSize) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the tooltip.
    #[must_use]
    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Mark the tab busy.
    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    #[must_use]
    pub const fn id(&self) -> TabId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn icon_size(&self) -> Option<IconSize> {
        self.icon
    }

    #[must_use]
    pub fn tooltip_text(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn set_icon(&mut self, icon: Option<IconSize>) {
        self.icon = icon;
    }

    pub(crate) fn set_tooltip(&mut self, tooltip: Option<String>) {
        self.tooltip = tooltip;
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}
