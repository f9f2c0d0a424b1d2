#![forbid(unsafe_code)]

//! Sidebar displayer: one toggle button per tab.
//!
//! Used for minimized ("slid in") views. Pressing a button slides its tab
//! out (selects it); pressing the selected button again slides it back in.
//! The button list mirrors the data model and must only be touched from
//! the thread that created the displayer.

use std::thread::{self, ThreadId};

use tabstrip_core::model::{DefaultTabDataModel, ModelError, TabModelEvent};
use tabstrip_core::selection::SingleSelectionModel;
use tabstrip_core::tab::{TabData, TabId};

/// Button shown for one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidingButton {
    pub id: TabId,
    pub text: String,
    pub tooltip: Option<String>,
    pub busy: bool,
    pub selected: bool,
}

impl SlidingButton {
    fn for_tab(tab: &TabData, selected: bool) -> Self {
        Self {
            id: tab.id(),
            text: tab.text().to_owned(),
            tooltip: tab.tooltip_text().map(str::to_owned),
            busy: tab.is_busy(),
            selected,
        }
    }
}

/// Button-per-tab displayer bound to its creating thread.
#[derive(Debug)]
pub struct SlidingTabDisplayer {
    owner: ThreadId,
    model: DefaultTabDataModel,
    selection: SingleSelectionModel,
    buttons: Vec<SlidingButton>,
}

impl SlidingTabDisplayer {
    /// Displayer owned by the calling thread.
    pub fn new(model: DefaultTabDataModel) -> Self {
        let mut displayer = Self {
            owner: thread::current().id(),
            model,
            selection: SingleSelectionModel::new(),
            buttons: Vec::new(),
        };
        displayer.sync_buttons_with_model();
        displayer
    }

    #[must_use]
    pub fn model(&self) -> &DefaultTabDataModel {
        &self.model
    }

    #[must_use]
    pub fn buttons(&self) -> &[SlidingButton] {
        &self.buttons
    }

    #[must_use]
    pub fn button_for(&self, id: TabId) -> Option<&SlidingButton> {
        self.buttons.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected_index()
    }

    /// Select (slide out) a tab. Returns whether the selection changed.
    pub fn set_selected(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.model.len());
        if !self.selection.set_selected_index(index) {
            return false;
        }
        self.sync_buttons_with_model();
        true
    }

    /// Toggle the button at `index`.
    pub fn press(&mut self, index: usize) -> bool {
        if self.selection.selected_index() == Some(index) {
            self.set_selected(None)
        } else {
            self.set_selected(Some(index))
        }
    }

    pub fn add_tab(&mut self, index: usize, tab: TabData) -> Result<(), ModelError> {
        let event = self.model.add_tab(index, tab)?;
        self.model_changed(&event);
        Ok(())
    }

    pub fn remove_tab(&mut self, index: usize) -> Result<(), ModelError> {
        let event = self.model.remove_tab(index)?;
        self.model_changed(&event);
        Ok(())
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), ModelError> {
        if let Some(event) = self.model.set_text(index, text)? {
            self.model_changed(&event);
        }
        Ok(())
    }

    /// Follow a model change.
    pub fn model_changed(&mut self, event: &TabModelEvent) {
        self.selection.apply_model_event(event, self.model.len());
        self.sync_buttons_with_model();
    }

    /// Bring the buttons in line with the model and the selection.
    ///
    /// Buttons whose tab survived are updated in place; the rest are
    /// created or dropped. Must run on the owning thread.
    pub fn sync_buttons_with_model(&mut self) {
        debug_assert!(
            thread::current().id() == self.owner,
            "sliding tab buttons touched off the owning thread"
        );
        let selected = self.selection.selected_index();
        let mut old = std::mem::take(&mut self.buttons);
        self.buttons = self
            .model
            .tabs()
            .iter()
            .enumerate()
            .map(|(i, tab)| {
                let is_selected = selected == Some(i);
                match old.iter().position(|b| b.id == tab.id()) {
                    Some(pos) => {
                        let mut button = old.swap_remove(pos);
                        button.text.clear();
                        button.text.push_str(tab.text());
                        button.tooltip = tab.tooltip_text().map(str::to_owned);
                        button.busy = tab.is_busy();
                        button.selected = is_selected;
                        button
                    }
                    None => SlidingButton::for_tab(tab, is_selected),
                }
            })
            .collect();
        tracing::trace!(
            message = "tabstrip.sliding.sync",
            buttons = self.buttons.len(),
            selected = ?selected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displayer() -> SlidingTabDisplayer {
        let tabs = ["Output", "Files", "Navigator"]
            .iter()
            .enumerate()
            .map(|(i, t)| TabData::new(TabId::new(i as u64), *t))
            .collect();
        SlidingTabDisplayer::new(DefaultTabDataModel::with_tabs(tabs).expect("unique ids"))
    }

    #[test]
    fn one_button_per_tab() {
        let d = displayer();
        let texts: Vec<&str> = d.buttons().iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, ["Output", "Files", "Navigator"]);
        assert!(d.buttons().iter().all(|b| !b.selected));
    }

    #[test]
    fn press_toggles_selection() {
        let mut d = displayer();
        assert!(d.press(1));
        assert!(d.buttons()[1].selected);
        assert!(d.press(1));
        assert_eq!(d.selected_index(), None);
        assert!(!d.buttons()[1].selected);
    }

    #[test]
    fn removal_keeps_buttons_in_step() {
        let mut d = displayer();
        d.press(2);
        d.remove_tab(0).expect("in range");
        assert_eq!(d.buttons().len(), 2);
        assert_eq!(d.selected_index(), Some(1));
        let nav = d.button_for(TabId::new(2)).expect("navigator button");
        assert!(nav.selected);
    }

    #[test]
    fn text_change_updates_button() {
        let mut d = displayer();
        d.set_text(0, "Output - build").expect("in range");
        assert_eq!(d.buttons()[0].text, "Output - build");
    }

    #[test]
    fn sync_from_other_thread_is_caught() {
        let d = displayer();
        let result = std::thread::spawn(move || {
            let mut d = d;
            d.sync_buttons_with_model();
        })
        .join();
        assert_eq!(result.is_err(), cfg!(debug_assertions));
    }
}
