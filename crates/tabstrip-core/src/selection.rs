#![forbid(unsafe_code)]

//! Single-selection model.

use crate::model::TabModelEvent;

/// The selected tab index, or none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleSelectionModel {
    selected: Option<usize>,
}

impl SingleSelectionModel {
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    /// Select `index` (or clear with `None`). Returns whether it changed.
    pub fn set_selected_index(&mut self, index: Option<usize>) -> bool {
        if self.selected == index {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn clear(&mut self) -> bool {
        self.set_selected_index(None)
    }

    /// Keep the selection pointing at the same tab after `event`.
    ///
    /// When the selected tab itself was removed, the tab that slid into its
    /// position is selected instead (or the new last tab, or none when the
    /// model is now empty). Returns whether the selected index changed.
    pub fn apply_model_event(&mut self, event: &TabModelEvent, new_len: usize) -> bool {
        let Some(old) = self.selected else {
            return false;
        };
        let next = match event.remap(old) {
            Some(idx) if idx < new_len => Some(idx),
            _ if new_len == 0 => None,
            _ => Some((old - event.removed_before(old)).min(new_len - 1)),
        };
        self.set_selected_index(next)
    }
}
