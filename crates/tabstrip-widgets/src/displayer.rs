#![forbid(unsafe_code)]

//! The scrolling tab displayer.
//!
//! [`ScrollingTabDisplayer`] owns the data model, the selection, the
//! scrolling layout and the interaction state, and keeps them consistent:
//! pointer events go in, repaint requests and tab actions come out. A skin
//! paints each tab from [`tab_bounds`](ScrollingTabDisplayer::tab_bounds)
//! and [`tab_flags`](ScrollingTabDisplayer::tab_flags) whenever
//! [`take_repaints`](ScrollingTabDisplayer::take_repaints) asks for it.
//!
//! Everything runs on the UI thread. The two timers (attention blink and
//! drag autoscroll) are driven by [`tick`](ScrollingTabDisplayer::tick).

use std::fmt;

use tabstrip_core::event::{Modifiers, MouseButton, MouseEvent, MouseEventKind};
use tabstrip_core::geometry::Rect;
use tabstrip_core::model::{DefaultTabDataModel, ModelError, TabModelEvent};
use tabstrip_core::selection::SingleSelectionModel;
use tabstrip_core::tab::TabData;
use tabstrip_layout::{
    CellTextMeasurer, DefaultTabLayoutModel, ScrollingTabLayoutModel, TabLayoutModel,
    TabMetricsConfig, TextMeasurer,
};
use web_time::Instant;

use crate::action::{ActionVeto, TabActionEvent, TabCommand};
use crate::autoscroll::{Autoscroller, ScrollDirection};
use crate::config::DisplayerConfig;
use crate::state::{Repaint, RepaintQueue, TabRepainter, TabState, TabStateFlags};

/// Narrowest width at which a retitled selected tab is scrolled into view.
const MIN_WIDTH_FOR_MAKE_VISIBLE: i32 = 10;

/// A horizontal strip of tabs that scrolls when they do not fit.
pub struct ScrollingTabDisplayer {
    model: DefaultTabDataModel,
    selection: SingleSelectionModel,
    layout: ScrollingTabLayoutModel<DefaultTabLayoutModel>,
    state: TabState<RepaintQueue>,
    measurer: Box<dyn TextMeasurer>,
    metrics: TabMetricsConfig,
    autoscroll: Autoscroller,
    veto: Option<Box<dyn ActionVeto>>,
    installed: bool,
}

impl fmt::Debug for ScrollingTabDisplayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollingTabDisplayer")
            .field("tab_count", &self.model.len())
            .field("selected", &self.selection.selected_index())
            .field("offset", &self.layout.offset())
            .field("width", &self.layout.width())
            .field("installed", &self.installed)
            .finish_non_exhaustive()
    }
}

impl ScrollingTabDisplayer {
    /// Displayer over `model` with default configuration.
    pub fn new(model: DefaultTabDataModel) -> Self {
        Self::with_config(model, &DisplayerConfig::default())
    }

    /// Displayer over `model` configured by `config`.
    pub fn with_config(model: DefaultTabDataModel, config: &DisplayerConfig) -> Self {
        let metrics = config.to_tab_metrics();
        let measurer: Box<dyn TextMeasurer> =
            Box::new(CellTextMeasurer::new(config.metrics.char_width));
        let base = DefaultTabLayoutModel::measure(&model, measurer.as_ref(), &metrics);
        let layout = ScrollingTabLayoutModel::new(base)
            .with_thresholds(config.to_clip_thresholds())
            .with_pixels_to_add_to_selection(config.layout.pixels_to_add_to_selection);
        let state = TabState::new(RepaintQueue::new(), model.len())
            .with_policy(config.to_repaint_policy())
            .with_attention_period(config.attention_period());
        Self {
            model,
            selection: SingleSelectionModel::new(),
            layout,
            state,
            measurer,
            metrics,
            autoscroll: Autoscroller::new(config.autoscroll_period()),
            veto: None,
            installed: true,
        }
    }

    /// Replace the text measurer and remeasure.
    #[must_use]
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self.remeasure();
        self
    }

    /// Install a veto that sees every action first.
    pub fn set_action_veto(&mut self, veto: impl ActionVeto + 'static) {
        self.veto = Some(Box::new(veto));
    }

    pub fn clear_action_veto(&mut self) {
        self.veto = None;
    }

    #[must_use]
    pub fn model(&self) -> &DefaultTabDataModel {
        &self.model
    }

    #[must_use]
    pub fn layout(&self) -> &ScrollingTabLayoutModel<DefaultTabLayoutModel> {
        &self.layout
    }

    #[must_use]
    pub fn state(&self) -> &TabState<RepaintQueue> {
        &self.state
    }

    #[must_use]
    pub fn metrics(&self) -> &TabMetricsConfig {
        &self.metrics
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected_index()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Drain pending repaint requests.
    pub fn take_repaints(&mut self) -> Vec<Repaint> {
        self.state.repainter_mut().drain()
    }

    // ── Geometry ────────────────────────────────────────────────────────

    /// Resize the strip. Returns whether the width changed.
    pub fn set_width(&mut self, width: i32) -> bool {
        let changed = self.layout.set_width(width);
        if changed {
            self.repaint_all();
        }
        changed
    }

    /// On-screen bounds of a tab; empty for hidden or stale tabs.
    #[must_use]
    pub fn tab_bounds(&self, index: usize) -> Rect {
        self.layout.bounds(index)
    }

    /// Close button bounds of a tab, if it shows one.
    #[must_use]
    pub fn close_button_bounds(&self, index: usize) -> Option<Rect> {
        let rect = self.metrics.close_button_rect(self.tab_bounds(index));
        (!rect.is_empty()).then_some(rect)
    }

    /// Everything a painter needs to pick a tab's look.
    #[must_use]
    pub fn tab_flags(&self, index: usize) -> TabStateFlags {
        let Some(tab) = self.model.tab(index) else {
            return TabStateFlags::empty();
        };
        let mut flags = self.state.state(index);
        flags.set(TabStateFlags::BUSY, tab.is_busy());

        let layout = self.layout.layout();
        if !layout.is_visible(index) {
            return flags | TabStateFlags::NOT_ONSCREEN;
        }
        if layout.first_visible == Some(index) {
            flags |= TabStateFlags::LEFTMOST;
            if self.layout.offset().is_some() {
                flags |= TabStateFlags::CLIP_LEFT;
            }
        }
        if layout.last_visible == Some(index) {
            flags |= TabStateFlags::RIGHTMOST;
            if layout.last_tab_clipped {
                flags |= TabStateFlags::CLIP_RIGHT;
            }
        }
        flags
    }

    /// Tab under the point.
    #[must_use]
    pub fn tab_at(&self, x: i32, y: i32) -> Option<usize> {
        self.layout.index_of_point(x, y)
    }

    /// Insertion index for a tab dropped at the point.
    #[must_use]
    pub fn drop_index_at(&self, x: i32, y: i32) -> Option<usize> {
        self.layout.drop_index_of_point(x, y)
    }

    pub fn scroll_forward(&mut self) -> bool {
        let moved = self.layout.scroll_forward();
        if moved {
            self.repaint_all();
        }
        moved
    }

    pub fn scroll_backward(&mut self) -> bool {
        let moved = self.layout.scroll_backward();
        if moved {
            self.repaint_all();
        }
        moved
    }

    // ── Selection and state ─────────────────────────────────────────────

    /// Select a tab and scroll it into view. Returns whether it changed.
    pub fn set_selected(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.model.len());
        if !self.selection.set_selected_index(index) {
            return false;
        }
        self.sync_selection();
        if let Some(index) = index {
            self.make_visible(index);
        }
        true
    }

    pub fn set_active(&mut self, active: bool) {
        self.state.set_active(active);
    }

    pub fn add_alarm_tab(&mut self, index: usize) -> bool {
        self.state.add_alarm_tab(index)
    }

    pub fn remove_alarm_tab(&mut self, index: usize) -> bool {
        self.state.remove_alarm_tab(index)
    }

    pub fn add_highlight_tab(&mut self, index: usize) -> bool {
        self.state.add_highlight_tab(index)
    }

    pub fn remove_highlight_tab(&mut self, index: usize) -> bool {
        self.state.remove_highlight_tab(index)
    }

    /// Scroll `index` into view. Returns whether the strip was repainted.
    pub fn make_visible(&mut self, index: usize) -> bool {
        let width = self.layout.width();
        let changed = self.layout.make_visible(index, width);
        if changed {
            self.repaint_all();
        }
        changed
    }

    // ── Model ───────────────────────────────────────────────────────────

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

    pub fn set_tabs(&mut self, tabs: Vec<TabData>) -> Result<(), ModelError> {
        if let Some(event) = self.model.set_tabs(tabs)? {
            self.model_changed(&event);
        }
        Ok(())
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), ModelError> {
        if let Some(event) = self.model.set_text(index, text)? {
            self.model_changed(&event);
        }
        Ok(())
    }

    pub fn set_busy(&mut self, index: usize, busy: bool) -> Result<(), ModelError> {
        if let Some(event) = self.model.set_busy(index, busy)? {
            self.model_changed(&event);
        }
        Ok(())
    }

    /// Apply a change made to the model behind the displayer's back, or
    /// follow up on one made through the mutators above.
    pub fn model_changed(&mut self, event: &TabModelEvent) {
        let count = self.model.len();
        tracing::trace!(message = "tabstrip.model.changed", kind = event.kind(), count);
        self.remeasure();
        if let TabModelEvent::ContentsChanged(change) = event {
            let selected = self.selection.selected_index();
            self.repaint_all();
            if change.is_single()
                && change.text_changed
                && selected == Some(change.index0)
                && self.layout.width() >= MIN_WIDTH_FOR_MAKE_VISIBLE
            {
                self.make_visible(change.index0);
            }
            return;
        }

        self.selection.apply_model_event(event, count);
        self.state.apply_model_event(event, count);
        self.sync_selection();
        self.layout.ensure_available_space_used(false);
        self.repaint_all();
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// Feed a pointer event; returns the action it triggered, if any.
    ///
    /// Coordinates are relative to the strip.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> Option<TabActionEvent> {
        if !self.installed {
            return None;
        }
        let (x, y) = event.position();
        let tab = self.tab_at(x, y);
        let in_close = tab.is_some_and(|t| self.in_close_button(t, x, y));
        match event.kind {
            MouseEventKind::Entered | MouseEventKind::Moved => {
                self.state.set_mouse_in_tabs_area(self.in_strip(y));
                self.hover(tab, in_close);
                None
            }
            MouseEventKind::Exited => {
                self.state.set_mouse_in_tabs_area(false);
                self.hover(None, false);
                self.autoscroll.stop();
                None
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if in_close {
                    self.state.set_mouse_pressed_in_close_button(tab);
                } else {
                    self.state.set_pressed(tab);
                }
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.autoscroll.stop();
                let pressed = self.state.pressed();
                let pressed_close = self.state.mouse_pressed_in_close_button();
                self.state.set_pressed(None);
                self.state.set_mouse_pressed_in_close_button(None);
                if in_close && pressed_close.is_some() && pressed_close == tab {
                    let command = if event.modifiers.contains(Modifiers::SHIFT) {
                        TabCommand::CloseAll
                    } else if event.modifiers.contains(Modifiers::ALT) {
                        TabCommand::CloseAllButThis
                    } else {
                        TabCommand::Close
                    };
                    return Some(self.fire(command, tab, Some(*event)));
                }
                if pressed.is_some() && pressed == tab {
                    return Some(self.fire(TabCommand::Select, tab, Some(*event)));
                }
                None
            }
            MouseEventKind::Down(MouseButton::Right) => {
                Some(self.fire(TabCommand::PopupRequest, tab, Some(*event)))
            }
            MouseEventKind::Down(MouseButton::Middle) => {
                tab?;
                let command = if event.modifiers.contains(Modifiers::SHIFT) {
                    TabCommand::CloseAllButThis
                } else {
                    TabCommand::Close
                };
                Some(self.fire(command, tab, Some(*event)))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.hover(None, false);
                match ScrollDirection::for_drag(x, self.layout.width()) {
                    Some(direction) => {
                        self.autoscroll.start(direction, Instant::now());
                    }
                    None => {
                        self.autoscroll.stop();
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Double click on a tab.
    pub fn maximize(&mut self, index: usize) -> Option<TabActionEvent> {
        if index >= self.model.len() {
            return None;
        }
        Some(self.fire(TabCommand::Maximize, Some(index), None))
    }

    /// Run an action through the veto and, unless consumed, perform its
    /// default behaviour.
    pub fn fire(
        &mut self,
        command: TabCommand,
        index: Option<usize>,
        mouse: Option<MouseEvent>,
    ) -> TabActionEvent {
        let mut action = TabActionEvent::new(command, index);
        if let Some(mouse) = mouse {
            action = action.with_mouse(mouse);
        }
        if let Some(veto) = self.veto.as_mut() {
            veto.on_action(&mut action);
        }
        let vetoed = action.is_consumed();
        tracing::debug!(
            message = "tabstrip.action",
            command = command.as_str(),
            index = ?index,
            vetoed
        );
        if !vetoed {
            self.perform(command, index);
        }
        action
    }

    fn perform(&mut self, command: TabCommand, index: Option<usize>) {
        let result = match (command, index) {
            (TabCommand::Select, Some(i)) => {
                self.set_selected(Some(i));
                Ok(())
            }
            (TabCommand::Close, Some(i)) => self.remove_tab(i),
            (TabCommand::CloseAll, _) if !self.model.is_empty() => {
                let last = self.model.len() - 1;
                self.model
                    .remove_tabs(0, last)
                    .map(|event| self.model_changed(&event))
            }
            (TabCommand::CloseAllButThis, Some(keep)) if self.model.len() > 1 => {
                let others: Vec<usize> = (0..self.model.len()).filter(|&i| i != keep).collect();
                self.model
                    .remove_indices(&others)
                    .map(|event| self.model_changed(&event))
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            tracing::debug!(message = "tabstrip.action.failed", error = %err);
        }
    }

    // ── Timers and lifecycle ────────────────────────────────────────────

    /// Drive both timers. Returns whether anything needs repainting.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.installed {
            return false;
        }
        let blinked = self.state.tick(now);
        let scrolled = self.autoscroll.tick(now, &mut self.layout);
        if scrolled {
            self.repaint_all();
        }
        blinked || scrolled
    }

    /// Earliest time [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.state.next_deadline(), self.autoscroll.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[must_use]
    pub fn is_autoscrolling(&self) -> bool {
        self.autoscroll.is_running()
    }

    /// Detach from the strip: timers stop and transient state is dropped.
    pub fn uninstall(&mut self) {
        if !self.installed {
            return;
        }
        self.autoscroll.stop();
        self.state.clear();
        self.state.repainter_mut().drain();
        self.installed = false;
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn remeasure(&mut self) {
        self.layout
            .base_mut()
            .remeasure(&self.model, self.measurer.as_ref(), &self.metrics);
    }

    fn sync_selection(&mut self) {
        let selected = self.selection.selected_index();
        self.state.set_selected(selected);
        self.layout.set_selected(selected);
    }

    fn hover(&mut self, tab: Option<usize>, in_close: bool) {
        self.state.set_contains_mouse(tab);
        self.state
            .set_close_button_contains_mouse(if in_close { tab } else { None });
    }

    fn in_strip(&self, y: i32) -> bool {
        y >= 0 && y < self.metrics.tab_height
    }

    fn in_close_button(&self, tab: usize, x: i32, y: i32) -> bool {
        self.close_button_bounds(tab)
            .is_some_and(|r| r.contains(x, y))
    }

    fn repaint_all(&mut self) {
        self.state.repainter_mut().repaint_all_tabs();
    }
}
