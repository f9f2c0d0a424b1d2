#![forbid(unsafe_code)]

//! Transient tab interaction state and repaint dispatch.
//!
//! [`TabState`] tracks which tab is pressed, hovered, selected and so on.
//! Every setter classifies the change ([`ChangeType`]) and consults the
//! [`RepaintPolicy`] to decide whether to repaint nothing, the affected tabs,
//! or the whole strip. Painting itself is delegated to a [`TabRepainter`].
//!
//! # Dispatch
//!
//! | Field | Policy bit | Repaint |
//! |-------|------------|---------|
//! | pressed | `ON_MOUSE_PRESSED` | old and new tab |
//! | contains mouse | `ON_MOUSE_ENTER_TAB` | old and new tab |
//! | close button contains mouse | `ON_MOUSE_ENTER_CLOSE_BUTTON` | old and new tab |
//! | mouse pressed in close button | `ON_CLOSE_BUTTON_PRESSED` | old and new tab |
//! | selected | `ON_SELECTION_CHANGE` | new tab (old tab when cleared) |
//! | selected | `ALL_TABS_ON_SELECTION_CHANGE` | all tabs |
//! | active | `ALL_TABS_ON_ACTIVATION_CHANGE` | all tabs |
//! | active | `SELECTION_ON_ACTIVATION_CHANGE` | selected tab |
//! | mouse in tabs area | `ALL_ON_MOUSE_ENTER_TABS_AREA` | all tabs |

use std::collections::BTreeSet;

use bitflags::bitflags;
use tabstrip_core::model::TabModelEvent;
use web_time::{Duration, Instant};

use crate::timer::RepeatingTimer;

/// Blink period of attention tabs.
pub const ATTENTION_PERIOD: Duration = Duration::from_millis(700);

bitflags! {
    /// Rendering-relevant condition of one tab.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TabStateFlags: u32 {
        /// Scrolled out of the viewport.
        const NOT_ONSCREEN = 1 << 0;
        /// Truncated at the right edge.
        const CLIP_RIGHT = 1 << 1;
        /// Truncated at the left edge.
        const CLIP_LEFT = 1 << 2;
        /// Under the mouse.
        const ARMED = 1 << 3;
        const PRESSED = 1 << 4;
        const SELECTED = 1 << 5;
        /// The owning container has focus.
        const ACTIVE = 1 << 6;
        /// First visible tab.
        const LEFTMOST = 1 << 7;
        /// Last visible tab.
        const RIGHTMOST = 1 << 8;
        const CLOSE_BUTTON_ARMED = 1 << 9;
        /// The next tab is selected.
        const BEFORE_SELECTED = 1 << 10;
        /// The previous tab is selected.
        const AFTER_SELECTED = 1 << 11;
        const MOUSE_IN_TABS_AREA = 1 << 12;
        const MOUSE_PRESSED_IN_CLOSE_BUTTON = 1 << 13;
        /// Blink phase of an attention tab.
        const ATTENTION = 1 << 14;
        /// The next tab is under the mouse.
        const BEFORE_ARMED = 1 << 15;
        const HIGHLIGHT = 1 << 16;
        /// The tab's content is working.
        const BUSY = 1 << 17;
    }
}

bitflags! {
    /// Which state transitions trigger which repaints.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RepaintPolicy: u16 {
        const ON_MOUSE_ENTER_TAB = 1 << 0;
        const ALL_ON_MOUSE_ENTER_TABS_AREA = 1 << 1;
        const ON_MOUSE_ENTER_CLOSE_BUTTON = 1 << 2;
        const ON_MOUSE_PRESSED = 1 << 3;
        const SELECTION_ON_ACTIVATION_CHANGE = 1 << 4;
        const ALL_TABS_ON_ACTIVATION_CHANGE = 1 << 5;
        const ON_SELECTION_CHANGE = 1 << 6;
        const ALL_TABS_ON_SELECTION_CHANGE = 1 << 7;
        const ON_CLOSE_BUTTON_PRESSED = 1 << 8;
    }
}

impl RepaintPolicy {
    /// Policy used when a skin does not supply its own.
    pub const DEFAULT: Self = Self::ON_MOUSE_ENTER_TAB
        .union(Self::ON_MOUSE_ENTER_CLOSE_BUTTON)
        .union(Self::ON_MOUSE_PRESSED)
        .union(Self::SELECTION_ON_ACTIVATION_CHANGE)
        .union(Self::ON_SELECTION_CHANGE)
        .union(Self::ON_CLOSE_BUTTON_PRESSED);
}

impl Default for RepaintPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How a setter changed its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChangeType {
    #[default]
    NoChange,
    TabToNone,
    NoneToTab,
    TabToTab,
    /// A strip-wide flag changed; every tab may look different.
    AllTabs,
}

impl ChangeType {
    /// Classify an index field transition.
    #[must_use]
    pub fn classify(previous: Option<usize>, current: Option<usize>) -> Self {
        match (previous, current) {
            (a, b) if a == b => Self::NoChange,
            (Some(_), None) => Self::TabToNone,
            (None, Some(_)) => Self::NoneToTab,
            _ => Self::TabToTab,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoChange => "no_change",
            Self::TabToNone => "tab_to_none",
            Self::NoneToTab => "none_to_tab",
            Self::TabToTab => "tab_to_tab",
            Self::AllTabs => "all_tabs",
        }
    }
}

/// A field tracked by [`TabState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    Pressed,
    ContainsMouse,
    CloseButtonContainsMouse,
    MousePressedInCloseButton,
    Selected,
    MouseInTabsArea,
    Active,
}

impl StateField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pressed => "pressed",
            Self::ContainsMouse => "contains_mouse",
            Self::CloseButtonContainsMouse => "close_button_contains_mouse",
            Self::MousePressedInCloseButton => "mouse_pressed_in_close_button",
            Self::Selected => "selected",
            Self::MouseInTabsArea => "mouse_in_tabs_area",
            Self::Active => "active",
        }
    }
}

/// Receives repaint requests from [`TabState`].
pub trait TabRepainter {
    /// Schedule a repaint of one tab.
    fn repaint_tab(&mut self, index: usize);

    /// Schedule a repaint of the whole strip.
    fn repaint_all_tabs(&mut self);

    /// Policy for `tab` (`None` for strip-wide changes).
    ///
    /// Skins override this to tune individual tabs; the default returns the
    /// displayer-wide policy unchanged.
    fn repaint_policy(&self, tab: Option<usize>, policy: RepaintPolicy) -> RepaintPolicy {
        let _ = tab;
        policy
    }
}

/// A recorded repaint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repaint {
    Tab(usize),
    All,
}

/// Repainter that queues requests for the owner to drain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepaintQueue {
    requests: Vec<Repaint>,
}

impl RepaintQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending requests in arrival order.
    #[must_use]
    pub fn requests(&self) -> &[Repaint] {
        &self.requests
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Take all pending requests.
    pub fn drain(&mut self) -> Vec<Repaint> {
        std::mem::take(&mut self.requests)
    }
}

impl TabRepainter for RepaintQueue {
    fn repaint_tab(&mut self, index: usize) {
        self.requests.push(Repaint::Tab(index));
    }

    fn repaint_all_tabs(&mut self) {
        self.requests.push(Repaint::All);
    }
}

/// Interaction state of one tab strip.
#[derive(Debug)]
pub struct TabState<R> {
    repainter: R,
    policy: RepaintPolicy,
    tab_count: usize,
    pressed: Option<usize>,
    contains_mouse: Option<usize>,
    close_button_contains_mouse: Option<usize>,
    mouse_pressed_in_close_button: Option<usize>,
    selected: Option<usize>,
    mouse_in_tabs_area: bool,
    active: bool,
    alarm_tabs: BTreeSet<usize>,
    highlight_tabs: BTreeSet<usize>,
    attention_toggle: bool,
    attention_timer: RepeatingTimer,
    last_change: ChangeType,
}

impl<R: TabRepainter> TabState<R> {
    /// State for a strip of `tab_count` tabs with the default policy.
    pub fn new(repainter: R, tab_count: usize) -> Self {
        Self {
            repainter,
            policy: RepaintPolicy::DEFAULT,
            tab_count,
            pressed: None,
            contains_mouse: None,
            close_button_contains_mouse: None,
            mouse_pressed_in_close_button: None,
            selected: None,
            mouse_in_tabs_area: false,
            active: false,
            alarm_tabs: BTreeSet::new(),
            highlight_tabs: BTreeSet::new(),
            attention_toggle: false,
            attention_timer: RepeatingTimer::new(ATTENTION_PERIOD),
            last_change: ChangeType::NoChange,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RepaintPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_attention_period(mut self, period: Duration) -> Self {
        self.attention_timer.set_period(period);
        self
    }

    pub fn repainter(&self) -> &R {
        &self.repainter
    }

    pub fn repainter_mut(&mut self) -> &mut R {
        &mut self.repainter
    }

    #[must_use]
    pub const fn policy(&self) -> RepaintPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RepaintPolicy) {
        self.policy = policy;
    }

    #[must_use]
    pub const fn tab_count(&self) -> usize {
        self.tab_count
    }

    /// Change type of the most recent setter call that changed something.
    #[must_use]
    pub const fn last_change(&self) -> ChangeType {
        self.last_change
    }

    #[must_use]
    pub const fn pressed(&self) -> Option<usize> {
        self.pressed
    }

    #[must_use]
    pub const fn contains_mouse(&self) -> Option<usize> {
        self.contains_mouse
    }

    #[must_use]
    pub const fn close_button_contains_mouse(&self) -> Option<usize> {
        self.close_button_contains_mouse
    }

    #[must_use]
    pub const fn mouse_pressed_in_close_button(&self) -> Option<usize> {
        self.mouse_pressed_in_close_button
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub const fn is_mouse_in_tabs_area(&self) -> bool {
        self.mouse_in_tabs_area
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_pressed(&mut self, tab: Option<usize>) -> ChangeType {
        self.set_index(StateField::Pressed, tab)
    }

    pub fn set_contains_mouse(&mut self, tab: Option<usize>) -> ChangeType {
        self.set_index(StateField::ContainsMouse, tab)
    }

    pub fn set_close_button_contains_mouse(&mut self, tab: Option<usize>) -> ChangeType {
        self.set_index(StateField::CloseButtonContainsMouse, tab)
    }

    pub fn set_mouse_pressed_in_close_button(&mut self, tab: Option<usize>) -> ChangeType {
        self.set_index(StateField::MousePressedInCloseButton, tab)
    }

    pub fn set_selected(&mut self, tab: Option<usize>) -> ChangeType {
        self.set_index(StateField::Selected, tab)
    }

    pub fn set_mouse_in_tabs_area(&mut self, inside: bool) -> ChangeType {
        if self.mouse_in_tabs_area == inside {
            return ChangeType::NoChange;
        }
        self.mouse_in_tabs_area = inside;
        self.log_flag(StateField::MouseInTabsArea, inside);
        let policy = self.policy_for(None);
        if policy.contains(RepaintPolicy::ALL_ON_MOUSE_ENTER_TABS_AREA) {
            self.repainter.repaint_all_tabs();
        }
        ChangeType::AllTabs
    }

    pub fn set_active(&mut self, active: bool) -> ChangeType {
        if self.active == active {
            return ChangeType::NoChange;
        }
        self.active = active;
        self.log_flag(StateField::Active, active);
        let policy = self.policy_for(self.selected);
        if policy.contains(RepaintPolicy::ALL_TABS_ON_ACTIVATION_CHANGE) {
            self.repainter.repaint_all_tabs();
        } else if policy.contains(RepaintPolicy::SELECTION_ON_ACTIVATION_CHANGE)
            && let Some(selected) = self.selected
        {
            self.repaint_tab(selected);
        }
        ChangeType::AllTabs
    }

    /// Rendering flags of `tab`. Stale indices yield no flags.
    #[must_use]
    pub fn state(&self, tab: usize) -> TabStateFlags {
        let mut flags = TabStateFlags::empty();
        if tab >= self.tab_count {
            return flags;
        }
        let is = |slot: Option<usize>| slot == Some(tab);
        flags.set(TabStateFlags::PRESSED, is(self.pressed));
        flags.set(TabStateFlags::ARMED, is(self.contains_mouse));
        flags.set(
            TabStateFlags::CLOSE_BUTTON_ARMED,
            is(self.close_button_contains_mouse),
        );
        flags.set(
            TabStateFlags::MOUSE_PRESSED_IN_CLOSE_BUTTON,
            is(self.mouse_pressed_in_close_button),
        );
        flags.set(TabStateFlags::SELECTED, is(self.selected));
        flags.set(TabStateFlags::ACTIVE, self.active);
        flags.set(TabStateFlags::MOUSE_IN_TABS_AREA, self.mouse_in_tabs_area);
        flags.set(
            TabStateFlags::BEFORE_SELECTED,
            self.selected == Some(tab + 1),
        );
        flags.set(
            TabStateFlags::AFTER_SELECTED,
            tab > 0 && self.selected == Some(tab - 1),
        );
        flags.set(
            TabStateFlags::BEFORE_ARMED,
            self.contains_mouse == Some(tab + 1),
        );
        let alarming = self.alarm_tabs.contains(&tab);
        flags.set(TabStateFlags::ATTENTION, alarming && self.attention_toggle);
        flags.set(
            TabStateFlags::HIGHLIGHT,
            !alarming && self.highlight_tabs.contains(&tab),
        );
        flags
    }

    /// Start blinking `tab`. Returns whether it was newly added.
    pub fn add_alarm_tab(&mut self, tab: usize) -> bool {
        if tab >= self.tab_count || !self.alarm_tabs.insert(tab) {
            return false;
        }
        if !self.attention_timer.is_running() {
            self.attention_toggle = true;
            self.attention_timer.start(Instant::now());
            tracing::debug!(
                message = "tabstrip.attention.start",
                period_ms = self.attention_timer.period().as_millis() as u64
            );
        }
        self.repaint_tab(tab);
        true
    }

    /// Stop blinking `tab`. Returns whether it was alarming.
    pub fn remove_alarm_tab(&mut self, tab: usize) -> bool {
        if !self.alarm_tabs.remove(&tab) {
            return false;
        }
        self.repaint_tab(tab);
        if self.alarm_tabs.is_empty() {
            self.stop_attention();
        }
        true
    }

    #[must_use]
    pub fn is_alarm_tab(&self, tab: usize) -> bool {
        self.alarm_tabs.contains(&tab)
    }

    #[must_use]
    pub fn alarm_tabs(&self) -> &BTreeSet<usize> {
        &self.alarm_tabs
    }

    /// Highlight `tab` steadily. Returns whether it was newly added.
    pub fn add_highlight_tab(&mut self, tab: usize) -> bool {
        if tab >= self.tab_count || !self.highlight_tabs.insert(tab) {
            return false;
        }
        self.repaint_tab(tab);
        true
    }

    /// Returns whether `tab` was highlighted.
    pub fn remove_highlight_tab(&mut self, tab: usize) -> bool {
        if !self.highlight_tabs.remove(&tab) {
            return false;
        }
        self.repaint_tab(tab);
        true
    }

    #[must_use]
    pub fn highlight_tabs(&self) -> &BTreeSet<usize> {
        &self.highlight_tabs
    }

    /// Current blink phase.
    #[must_use]
    pub const fn attention_toggle(&self) -> bool {
        self.attention_toggle
    }

    #[must_use]
    pub const fn is_attention_running(&self) -> bool {
        self.attention_timer.is_running()
    }

    /// When [`tick`](Self::tick) next has work to do.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.attention_timer.next_deadline()
    }

    /// Advance the blink timer. Returns whether the phase flipped.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.attention_timer.poll(now) {
            return false;
        }
        self.attention_toggle = !self.attention_toggle;
        let alarming: Vec<usize> = self.alarm_tabs.iter().copied().collect();
        for tab in alarming {
            self.repaint_tab(tab);
        }
        true
    }

    /// Follow a data model change.
    ///
    /// Every held index is remapped through `event`; indices of removed tabs
    /// are dropped. Nothing is repainted: the owner repaints the strip after
    /// a structural change anyway.
    pub fn apply_model_event(&mut self, event: &TabModelEvent, tab_count: usize) {
        self.tab_count = tab_count;
        let remap = |slot: Option<usize>| {
            slot.and_then(|i| event.remap(i))
                .filter(|&i| i < tab_count)
        };
        self.pressed = remap(self.pressed);
        self.contains_mouse = remap(self.contains_mouse);
        self.close_button_contains_mouse = remap(self.close_button_contains_mouse);
        self.mouse_pressed_in_close_button = remap(self.mouse_pressed_in_close_button);
        self.selected = remap(self.selected);
        self.alarm_tabs = event.remap_set(&self.alarm_tabs, tab_count);
        self.highlight_tabs = event.remap_set(&self.highlight_tabs, tab_count);
        if self.alarm_tabs.is_empty() && self.attention_timer.is_running() {
            self.stop_attention();
        }
    }

    /// Resize without event information: out-of-range indices are dropped.
    pub fn set_tab_count(&mut self, tab_count: usize) {
        self.tab_count = tab_count;
        let keep = |slot: Option<usize>| slot.filter(|&i| i < tab_count);
        self.pressed = keep(self.pressed);
        self.contains_mouse = keep(self.contains_mouse);
        self.close_button_contains_mouse = keep(self.close_button_contains_mouse);
        self.mouse_pressed_in_close_button = keep(self.mouse_pressed_in_close_button);
        self.selected = keep(self.selected);
        self.alarm_tabs.retain(|&i| i < tab_count);
        self.highlight_tabs.retain(|&i| i < tab_count);
        if self.alarm_tabs.is_empty() && self.attention_timer.is_running() {
            self.stop_attention();
        }
    }

    /// Drop all transient state and stop the timer.
    pub fn clear(&mut self) {
        self.pressed = None;
        self.contains_mouse = None;
        self.close_button_contains_mouse = None;
        self.mouse_pressed_in_close_button = None;
        self.mouse_in_tabs_area = false;
        self.alarm_tabs.clear();
        self.highlight_tabs.clear();
        if self.attention_timer.is_running() {
            self.stop_attention();
        }
    }

    fn stop_attention(&mut self) {
        self.attention_timer.stop();
        self.attention_toggle = false;
        tracing::debug!(message = "tabstrip.attention.stop");
    }

    fn slot_mut(&mut self, field: StateField) -> Option<&mut Option<usize>> {
        match field {
            StateField::Pressed => Some(&mut self.pressed),
            StateField::ContainsMouse => Some(&mut self.contains_mouse),
            StateField::CloseButtonContainsMouse => Some(&mut self.close_button_contains_mouse),
            StateField::MousePressedInCloseButton => Some(&mut self.mouse_pressed_in_close_button),
            StateField::Selected => Some(&mut self.selected),
            StateField::MouseInTabsArea | StateField::Active => None,
        }
    }

    fn set_index(&mut self, field: StateField, tab: Option<usize>) -> ChangeType {
        let tab_count = self.tab_count;
        let current = tab.filter(|&i| i < tab_count);
        let Some(slot) = self.slot_mut(field) else {
            return ChangeType::NoChange;
        };
        let previous = std::mem::replace(slot, current);
        let change = ChangeType::classify(previous, current);
        if change == ChangeType::NoChange {
            return change;
        }
        self.last_change = change;
        tracing::trace!(
            message = "tabstrip.state.change",
            field = field.as_str(),
            change = change.as_str(),
            previous = ?previous,
            current = ?current
        );
        self.dispatch(field, change, previous, current);
        change
    }

    fn dispatch(
        &mut self,
        field: StateField,
        change: ChangeType,
        previous: Option<usize>,
        current: Option<usize>,
    ) {
        let policy = self.policy_for(current.or(previous));
        let bit = match field {
            StateField::Pressed => RepaintPolicy::ON_MOUSE_PRESSED,
            StateField::ContainsMouse => RepaintPolicy::ON_MOUSE_ENTER_TAB,
            StateField::CloseButtonContainsMouse => RepaintPolicy::ON_MOUSE_ENTER_CLOSE_BUTTON,
            StateField::MousePressedInCloseButton => RepaintPolicy::ON_CLOSE_BUTTON_PRESSED,
            StateField::Selected => {
                if policy.contains(RepaintPolicy::ALL_TABS_ON_SELECTION_CHANGE) {
                    self.repainter.repaint_all_tabs();
                    return;
                }
                RepaintPolicy::ON_SELECTION_CHANGE
            }
            StateField::MouseInTabsArea | StateField::Active => return,
        };
        if !policy.contains(bit) {
            return;
        }
        match change {
            ChangeType::TabToNone => self.repaint_opt(previous),
            ChangeType::NoneToTab => self.repaint_opt(current),
            ChangeType::TabToTab => {
                // Selection repaints only the newly selected tab.
                if field != StateField::Selected {
                    self.repaint_opt(previous);
                }
                self.repaint_opt(current);
            }
            ChangeType::NoChange | ChangeType::AllTabs => {}
        }
    }

    fn policy_for(&self, tab: Option<usize>) -> RepaintPolicy {
        self.repainter.repaint_policy(tab, self.policy)
    }

    fn repaint_opt(&mut self, tab: Option<usize>) {
        if let Some(tab) = tab {
            self.repaint_tab(tab);
        }
    }

    fn repaint_tab(&mut self, tab: usize) {
        if tab < self.tab_count {
            self.repainter.repaint_tab(tab);
        }
    }

    fn log_flag(&mut self, field: StateField, value: bool) {
        self.last_change = ChangeType::AllTabs;
        tracing::trace!(
            message = "tabstrip.state.change",
            field = field.as_str(),
            change = ChangeType::AllTabs.as_str(),
            previous = !value,
            current = value
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstrip_core::model::ContentsChanged;

    fn state(n: usize) -> TabState<RepaintQueue> {
        TabState::new(RepaintQueue::new(), n)
    }

    fn drained(s: &mut TabState<RepaintQueue>) -> Vec<Repaint> {
        s.repainter_mut().drain()
    }

    #[test]
    fn classify_covers_all_transitions() {
        assert_eq!(ChangeType::classify(None, None), ChangeType::NoChange);
        assert_eq!(ChangeType::classify(Some(1), Some(1)), ChangeType::NoChange);
        assert_eq!(ChangeType::classify(Some(1), None), ChangeType::TabToNone);
        assert_eq!(ChangeType::classify(None, Some(1)), ChangeType::NoneToTab);
        assert_eq!(ChangeType::classify(Some(1), Some(2)), ChangeType::TabToTab);
    }

    #[test]
    fn default_policy_bits() {
        let p = RepaintPolicy::default();
        assert!(p.contains(RepaintPolicy::ON_SELECTION_CHANGE));
        assert!(!p.contains(RepaintPolicy::ALL_TABS_ON_SELECTION_CHANGE));
        assert!(!p.contains(RepaintPolicy::ALL_ON_MOUSE_ENTER_TABS_AREA));
        assert!(!p.contains(RepaintPolicy::ALL_TABS_ON_ACTIVATION_CHANGE));
    }

    #[test]
    fn selection_change_repaints_new_tab_only() {
        let mut s = state(5);
        s.set_selected(Some(1));
        drained(&mut s);
        assert_eq!(s.set_selected(Some(3)), ChangeType::TabToTab);
        assert_eq!(drained(&mut s), [Repaint::Tab(3)]);
    }

    #[test]
    fn selection_escalates_to_all_tabs() {
        let mut s = state(5).with_policy(
            RepaintPolicy::DEFAULT | RepaintPolicy::ALL_TABS_ON_SELECTION_CHANGE,
        );
        s.set_selected(Some(2));
        assert_eq!(drained(&mut s), [Repaint::All]);
    }

    #[test]
    fn hover_repaints_old_and_new_tab() {
        let mut s = state(5);
        assert_eq!(s.set_contains_mouse(Some(1)), ChangeType::NoneToTab);
        assert_eq!(s.set_contains_mouse(Some(2)), ChangeType::TabToTab);
        assert_eq!(s.set_contains_mouse(None), ChangeType::TabToNone);
        assert_eq!(
            drained(&mut s),
            [
                Repaint::Tab(1),
                Repaint::Tab(1),
                Repaint::Tab(2),
                Repaint::Tab(2)
            ]
        );
    }

    #[test]
    fn unchanged_values_repaint_nothing() {
        let mut s = state(5);
        s.set_pressed(Some(2));
        s.set_active(true);
        drained(&mut s);
        assert_eq!(s.set_pressed(Some(2)), ChangeType::NoChange);
        assert_eq!(s.set_active(true), ChangeType::NoChange);
        assert_eq!(s.set_mouse_in_tabs_area(false), ChangeType::NoChange);
        assert!(s.repainter().is_empty());
    }

    #[test]
    fn masked_policy_bit_suppresses_repaint() {
        let mut s = state(5).with_policy(RepaintPolicy::empty());
        assert_eq!(s.set_pressed(Some(1)), ChangeType::NoneToTab);
        assert!(s.repainter().is_empty());
        assert_eq!(s.pressed(), Some(1));
    }

    #[test]
    fn activation_repaints_selection() {
        let mut s = state(5);
        s.set_selected(Some(4));
        drained(&mut s);
        assert_eq!(s.set_active(true), ChangeType::AllTabs);
        assert_eq!(drained(&mut s), [Repaint::Tab(4)]);
        s.set_policy(RepaintPolicy::ALL_TABS_ON_ACTIVATION_CHANGE);
        s.set_active(false);
        assert_eq!(drained(&mut s), [Repaint::All]);
    }

    #[test]
    fn mouse_in_area_repaints_only_when_asked() {
        let mut s = state(3);
        assert_eq!(s.set_mouse_in_tabs_area(true), ChangeType::AllTabs);
        assert!(s.repainter().is_empty());
        s.set_policy(RepaintPolicy::ALL_ON_MOUSE_ENTER_TABS_AREA);
        s.set_mouse_in_tabs_area(false);
        assert_eq!(drained(&mut s), [Repaint::All]);
    }

    #[test]
    fn out_of_range_index_is_treated_as_none() {
        let mut s = state(3);
        assert_eq!(s.set_contains_mouse(Some(7)), ChangeType::NoChange);
        assert_eq!(s.contains_mouse(), None);
        assert!(s.state(7).is_empty());
    }

    #[test]
    fn neighbour_flags() {
        let mut s = state(5);
        s.set_selected(Some(2));
        s.set_contains_mouse(Some(4));
        assert!(s.state(1).contains(TabStateFlags::BEFORE_SELECTED));
        assert!(s.state(3).contains(TabStateFlags::AFTER_SELECTED));
        assert!(s.state(2).contains(TabStateFlags::SELECTED));
        assert!(s.state(3).contains(TabStateFlags::BEFORE_ARMED));
        assert!(s.state(4).contains(TabStateFlags::ARMED));
        assert!(!s.state(0).intersects(
            TabStateFlags::BEFORE_SELECTED | TabStateFlags::AFTER_SELECTED
        ));
    }

    #[test]
    fn alarm_hides_highlight() {
        let mut s = state(5);
        s.add_highlight_tab(1);
        s.add_alarm_tab(1);
        let flags = s.state(1);
        assert!(flags.contains(TabStateFlags::ATTENTION));
        assert!(!flags.contains(TabStateFlags::HIGHLIGHT));
        s.remove_alarm_tab(1);
        assert!(s.state(1).contains(TabStateFlags::HIGHLIGHT));
    }

    #[test]
    fn attention_blinks_and_stops() {
        let mut s = state(6).with_attention_period(Duration::from_millis(10));
        assert!(s.add_alarm_tab(4));
        assert!(s.is_attention_running());
        assert_eq!(drained(&mut s), [Repaint::Tab(4)]);

        let deadline = s.next_deadline().expect("timer running");
        assert!(s.tick(deadline));
        assert!(!s.attention_toggle());
        assert!(!s.state(4).contains(TabStateFlags::ATTENTION));
        assert_eq!(drained(&mut s), [Repaint::Tab(4)]);

        assert!(s.remove_alarm_tab(4));
        assert!(!s.is_attention_running());
        drained(&mut s);
        assert!(!s.tick(deadline + Duration::from_secs(5)));
        assert!(s.repainter().is_empty());
    }

    #[test]
    fn alarm_set_follows_removal() {
        let mut s = state(6);
        s.add_alarm_tab(2);
        s.add_alarm_tab(5);
        let event = TabModelEvent::IntervalRemoved {
            start: 3,
            end: 3,
            removed: Vec::new(),
        };
        s.apply_model_event(&event, 5);
        assert_eq!(s.alarm_tabs().iter().copied().collect::<Vec<_>>(), [2, 4]);
        assert!(s.is_attention_running());
    }

    #[test]
    fn removing_last_alarm_by_model_event_stops_timer() {
        let mut s = state(3);
        s.add_alarm_tab(1);
        s.set_pressed(Some(1));
        let event = TabModelEvent::IntervalRemoved {
            start: 1,
            end: 1,
            removed: Vec::new(),
        };
        s.apply_model_event(&event, 2);
        assert!(s.alarm_tabs().is_empty());
        assert!(!s.is_attention_running());
        assert_eq!(s.pressed(), None);
    }

    #[test]
    fn contents_change_keeps_indices() {
        let mut s = state(3);
        s.set_selected(Some(2));
        let event = TabModelEvent::ContentsChanged(ContentsChanged {
            index0: 2,
            index1: 2,
            text_changed: true,
            user_object_changed: false,
        });
        s.apply_model_event(&event, 3);
        assert_eq!(s.selected(), Some(2));
    }

    #[test]
    fn shrinking_tab_count_drops_stale_indices() {
        let mut s = state(5);
        s.set_contains_mouse(Some(4));
        s.add_highlight_tab(3);
        s.set_tab_count(3);
        assert_eq!(s.contains_mouse(), None);
        assert!(s.highlight_tabs().is_empty());
    }

    #[test]
    fn per_tab_policy_override() {
        struct Quiet(Vec<usize>);
        impl TabRepainter for Quiet {
            fn repaint_tab(&mut self, index: usize) {
                self.0.push(index);
            }
            fn repaint_all_tabs(&mut self) {}
            fn repaint_policy(&self, tab: Option<usize>, policy: RepaintPolicy) -> RepaintPolicy {
                if tab == Some(0) {
                    RepaintPolicy::empty()
                } else {
                    policy
                }
            }
        }
        let mut s = TabState::new(Quiet(Vec::new()), 3);
        s.set_contains_mouse(Some(0));
        s.set_contains_mouse(None);
        s.set_contains_mouse(Some(1));
        assert_eq!(s.repainter().0, [1]);
    }
}
