#![forbid(unsafe_code)]

//! The tab data model and its change events.
//!
//! [`DefaultTabDataModel`] never notifies listeners by itself: every mutating
//! call returns the [`TabModelEvent`] it caused and the owner hands that value
//! to whatever caches indices (selection, layout, interaction state). This
//! keeps the event and the mutation in one synchronous step on the UI thread.

use std::collections::BTreeSet;
use std::fmt;

use ahash::AHashSet;

use crate::diff::ArrayDiff;
use crate::tab::{IconSize, TabData, TabId};

/// Payload of a non-structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentsChanged {
    /// First affected index (inclusive).
    pub index0: usize,
    /// Last affected index (inclusive).
    pub index1: usize,
    /// The display text changed; natural widths must be remeasured.
    pub text_changed: bool,
    /// The tab now stands for different content.
    pub user_object_changed: bool,
}

impl ContentsChanged {
    /// Whether exactly one tab was affected.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.index0 == self.index1
    }
}

/// A change to a [`DefaultTabDataModel`].
///
/// Interval variants describe a contiguous inclusive range; index-set variants
/// list positions in ascending order (in the new array for additions, in the
/// old array for removals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabModelEvent {
    /// Tab contents changed in place; no index moved.
    ContentsChanged(ContentsChanged),
    /// Tabs inserted at `start..=end`.
    IntervalAdded { start: usize, end: usize },
    /// Tabs formerly at `start..=end` were removed.
    IntervalRemoved {
        start: usize,
        end: usize,
        removed: Vec<TabData>,
    },
    /// Tabs inserted at the listed new positions.
    IndicesAdded { indices: Vec<usize> },
    /// Tabs formerly at the listed positions were removed.
    IndicesRemoved {
        indices: Vec<usize>,
        removed: Vec<TabData>,
    },
    /// The whole list was replaced.
    IndicesChanged { diff: ArrayDiff },
}

impl TabModelEvent {
    /// Whether indices may have shifted.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::ContentsChanged(_))
    }

    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ContentsChanged(_) => "contents_changed",
            Self::IntervalAdded { .. } => "interval_added",
            Self::IntervalRemoved { .. } => "interval_removed",
            Self::IndicesAdded { .. } => "indices_added",
            Self::IndicesRemoved { .. } => "indices_removed",
            Self::IndicesChanged { .. } => "indices_changed",
        }
    }

    /// Map an index valid before this event to its position after it.
    ///
    /// Returns `None` when the tab at `old_index` was removed.
    #[must_use]
    pub fn remap(&self, old_index: usize) -> Option<usize> {
        match self {
            Self::ContentsChanged(_) => Some(old_index),
            Self::IntervalAdded { start, end } => {
                if old_index >= *start {
                    Some(old_index + (end - start + 1))
                } else {
                    Some(old_index)
                }
            }
            Self::IntervalRemoved { start, end, .. } => {
                if old_index < *start {
                    Some(old_index)
                } else if old_index <= *end {
                    None
                } else {
                    Some(old_index - (end - start + 1))
                }
            }
            Self::IndicesAdded { indices } => {
                let mut idx = old_index;
                for &added in indices {
                    if added <= idx {
                        idx += 1;
                    }
                }
                Some(idx)
            }
            Self::IndicesRemoved { indices, .. } => {
                if indices.binary_search(&old_index).is_ok() {
                    None
                } else {
                    Some(old_index - indices.partition_point(|&r| r < old_index))
                }
            }
            Self::IndicesChanged { diff } => diff.new_index_of(old_index),
        }
    }

    /// Remap every index in `set`, dropping removed ones and anything that
    /// would land at or beyond `new_len`.
    #[must_use]
    pub fn remap_set(&self, set: &BTreeSet<usize>, new_len: usize) -> BTreeSet<usize> {
        set.iter()
            .filter_map(|&idx| self.remap(idx))
            .filter(|&idx| idx < new_len)
            .collect()
    }

    /// How many removed positions lie strictly below `old_index`.
    #[must_use]
    pub fn removed_before(&self, old_index: usize) -> usize {
        match self {
            Self::IntervalRemoved { start, end, .. } => {
                if old_index <= *start {
                    0
                } else {
                    (old_index - start).min(end - start + 1)
                }
            }
            Self::IndicesRemoved { indices, .. } => indices.partition_point(|&r| r < old_index),
            Self::IndicesChanged { diff } => diff.deleted_before(old_index),
            _ => 0,
        }
    }

    /// Tabs removed by this event, in ascending old-index order.
    #[must_use]
    pub fn affected_items(&self) -> &[TabData] {
        match self {
            Self::IntervalRemoved { removed, .. } | Self::IndicesRemoved { removed, .. } => removed,
            _ => &[],
        }
    }
}

/// Errors raised by model mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// An index was past the end of the model.
    IndexOutOfBounds { index: usize, len: usize },
    /// A range or index set was empty, unordered, or out of bounds.
    InvalidRange { start: usize, end: usize, len: usize },
    /// The tab id is already present.
    DuplicateTab(TabId),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "tab index {index} out of bounds (len {len})")
            }
            Self::InvalidRange { start, end, len } => {
                write!(f, "invalid tab range {start}..={end} (len {len})")
            }
            Self::DuplicateTab(id) => write!(f, "{id} is already in the model"),
        }
    }
}

impl std::error::Error for ModelError {}

/// Ordered list of tabs.
#[derive(Debug, Clone, Default)]
pub struct DefaultTabDataModel {
    tabs: Vec<TabData>,
    revision: u64,
}

impl DefaultTabDataModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model holding `tabs`.
    pub fn with_tabs(tabs: Vec<TabData>) -> Result<Self, ModelError> {
        check_unique(&tabs, None)?;
        Ok(Self { tabs, revision: 0 })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Tab at `index`, if any.
    #[must_use]
    pub fn tab(&self, index: usize) -> Option<&TabData> {
        self.tabs.get(index)
    }

    #[must_use]
    pub fn tabs(&self) -> &[TabData] {
        &self.tabs
    }

    /// Position of the tab with `id`.
    #[must_use]
    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == id)
    }

    /// Bumped on every successful mutation.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Insert one tab at `index`.
    pub fn add_tab(&mut self, index: usize, tab: TabData) -> Result<TabModelEvent, ModelError> {
        self.add_tabs(index, vec![tab])
    }

    /// Insert a contiguous run of tabs starting at `start`.
    pub fn add_tabs(
        &mut self,
        start: usize,
        tabs: Vec<TabData>,
    ) -> Result<TabModelEvent, ModelError> {
        let len = self.tabs.len();
        if start > len {
            return Err(ModelError::IndexOutOfBounds { index: start, len });
        }
        if tabs.is_empty() {
            return Err(ModelError::InvalidRange {
                start,
                end: start,
                len,
            });
        }
        check_unique(&tabs, Some(&self.tabs))?;
        let end = start + tabs.len() - 1;
        self.tabs.splice(start..start, tabs);
        Ok(self.committed(TabModelEvent::IntervalAdded { start, end }))
    }

    /// Insert tabs at the given ascending positions of the resulting array.
    pub fn add_tabs_at(
        &mut self,
        indices: &[usize],
        tabs: Vec<TabData>,
    ) -> Result<TabModelEvent, ModelError> {
        let len = self.tabs.len();
        let ascending = indices.windows(2).all(|w| w[0] < w[1]);
        if indices.is_empty() || indices.len() != tabs.len() || !ascending {
            return Err(ModelError::InvalidRange {
                start: indices.first().copied().unwrap_or(0),
                end: indices.last().copied().unwrap_or(0),
                len,
            });
        }
        let new_len = len + tabs.len();
        if let Some(&last) = indices.last()
            && last >= new_len
        {
            return Err(ModelError::IndexOutOfBounds {
                index: last,
                len: new_len,
            });
        }
        check_unique(&tabs, Some(&self.tabs))?;
        for (&idx, tab) in indices.iter().zip(tabs) {
            self.tabs.insert(idx, tab);
        }
        Ok(self.committed(TabModelEvent::IndicesAdded {
            indices: indices.to_vec(),
        }))
    }

    /// Remove the tab at `index`.
    pub fn remove_tab(&mut self, index: usize) -> Result<TabModelEvent, ModelError> {
        self.remove_tabs(index, index)
    }

    /// Remove tabs `start..=end`.
    pub fn remove_tabs(&mut self, start: usize, end: usize) -> Result<TabModelEvent, ModelError> {
        let len = self.tabs.len();
        if start > end || end >= len {
            return Err(ModelError::InvalidRange { start, end, len });
        }
        let removed: Vec<TabData> = self.tabs.drain(start..=end).collect();
        Ok(self.committed(TabModelEvent::IntervalRemoved {
            start,
            end,
            removed,
        }))
    }

    /// Remove the tabs at the given positions (any order, duplicates ignored).
    pub fn remove_indices(&mut self, indices: &[usize]) -> Result<TabModelEvent, ModelError> {
        let len = self.tabs.len();
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        match sorted.last() {
            None => {
                return Err(ModelError::InvalidRange {
                    start: 0,
                    end: 0,
                    len,
                });
            }
            Some(&last) if last >= len => {
                return Err(ModelError::IndexOutOfBounds { index: last, len });
            }
            Some(_) => {}
        }
        let mut removed = Vec::with_capacity(sorted.len());
        for &idx in sorted.iter().rev() {
            removed.push(self.tabs.remove(idx));
        }
        removed.reverse();
        Ok(self.committed(TabModelEvent::IndicesRemoved {
            indices: sorted,
            removed,
        }))
    }

    /// Replace the whole list. Returns `None` when nothing changed.
    pub fn set_tabs(&mut self, tabs: Vec<TabData>) -> Result<Option<TabModelEvent>, ModelError> {
        check_unique(&tabs, None)?;
        let Some(diff) = ArrayDiff::compute(&self.tabs, &tabs) else {
            return Ok(None);
        };
        self.tabs = tabs;
        Ok(Some(self.committed(TabModelEvent::IndicesChanged { diff })))
    }

    /// Replace the tab at `index`.
    pub fn set_tab(
        &mut self,
        index: usize,
        tab: TabData,
    ) -> Result<Option<TabModelEvent>, ModelError> {
        let current = self.get(index)?;
        if *current == tab {
            return Ok(None);
        }
        let user_object_changed = current.id() != tab.id();
        let text_changed = current.text() != tab.text();
        if user_object_changed && self.index_of(tab.id()).is_some() {
            return Err(ModelError::DuplicateTab(tab.id()));
        }
        self.tabs[index] = tab;
        Ok(Some(self.contents_changed(index, text_changed, user_object_changed)))
    }

    /// Change the display text of the tab at `index`.
    pub fn set_text(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<Option<TabModelEvent>, ModelError> {
        let text = text.into();
        if self.get(index)?.text() == text {
            return Ok(None);
        }
        self.tabs[index].set_text(text);
        Ok(Some(self.contents_changed(index, true, false)))
    }

    /// Change the icon of the tab at `index`.
    pub fn set_icon(
        &mut self,
        index: usize,
        icon: Option<IconSize>,
    ) -> Result<Option<TabModelEvent>, ModelError> {
        if self.get(index)?.icon_size() == icon {
            return Ok(None);
        }
        self.tabs[index].set_icon(icon);
        Ok(Some(self.contents_changed(index, false, false)))
    }

    /// Change the tooltip of the tab at `index`.
    pub fn set_tooltip(
        &mut self,
        index: usize,
        tooltip: Option<String>,
    ) -> Result<Option<TabModelEvent>, ModelError> {
        if self.get(index)?.tooltip_text() == tooltip.as_deref() {
            return Ok(None);
        }
        self.tabs[index].set_tooltip(tooltip);
        Ok(Some(self.contents_changed(index, false, false)))
    }

    /// Change the busy flag of the tab at `index`.
    pub fn set_busy(
        &mut self,
        index: usize,
        busy: bool,
    ) -> Result<Option<TabModelEvent>, ModelError> {
        if self.get(index)?.is_busy() == busy {
            return Ok(None);
        }
        self.tabs[index].set_busy(busy);
        Ok(Some(self.contents_changed(index, false, false)))
    }

    fn get(&self, index: usize) -> Result<&TabData, ModelError> {
        self.tabs.get(index).ok_or(ModelError::IndexOutOfBounds {
            index,
            len: self.tabs.len(),
        })
    }

    fn contents_changed(
        &mut self,
        index: usize,
        text_changed: bool,
        user_object_changed: bool,
    ) -> TabModelEvent {
        self.committed(TabModelEvent::ContentsChanged(ContentsChanged {
            index0: index,
            index1: index,
            text_changed,
            user_object_changed,
        }))
    }

    fn committed(&mut self, event: TabModelEvent) -> TabModelEvent {
        self.revision = self.revision.wrapping_add(1);
        tracing::trace!(
            message = "tabstrip.model.change",
            kind = event.kind(),
            len = self.tabs.len(),
            revision = self.revision
        );
        event
    }
}

fn check_unique(tabs: &[TabData], existing: Option<&[TabData]>) -> Result<(), ModelError> {
    let mut seen: AHashSet<TabId> = existing
        .unwrap_or_default()
        .iter()
        .map(TabData::id)
        .collect();
    for tab in tabs {
        if !seen.insert(tab.id()) {
            return Err(ModelError::DuplicateTab(tab.id()));
        }
    }
    Ok(())
}
