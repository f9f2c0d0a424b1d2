#![forbid(unsafe_code)]

//! User actions on tabs.
//!
//! A displayer turns clicks into [`TabActionEvent`]s and offers each one to
//! the installed [`ActionVeto`] before performing the default behaviour.

use std::fmt;

use tabstrip_core::event::MouseEvent;

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabCommand {
    /// Select the tab.
    Select,
    /// Close the tab.
    Close,
    /// Close every tab.
    CloseAll,
    /// Close every tab except this one.
    CloseAllButThis,
    /// Maximize the tab's content (double click).
    Maximize,
    /// Show the context menu.
    PopupRequest,
}

impl TabCommand {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Close => "close",
            Self::CloseAll => "close_all",
            Self::CloseAllButThis => "close_all_but_this",
            Self::Maximize => "maximize",
            Self::PopupRequest => "popup_request",
        }
    }
}

impl fmt::Display for TabCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action about to be performed on a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabActionEvent {
    command: TabCommand,
    index: Option<usize>,
    mouse: Option<MouseEvent>,
    consumed: bool,
}

impl TabActionEvent {
    #[must_use]
    pub const fn new(command: TabCommand, index: Option<usize>) -> Self {
        Self {
            command,
            index,
            mouse: None,
            consumed: false,
        }
    }

    /// Attach the pointer event that caused the action.
    #[must_use]
    pub fn with_mouse(mut self, mouse: MouseEvent) -> Self {
        self.mouse = Some(mouse);
        self
    }

    #[must_use]
    pub const fn command(&self) -> TabCommand {
        self.command
    }

    /// Target tab; `None` for strip-wide commands.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    #[must_use]
    pub const fn mouse(&self) -> Option<&MouseEvent> {
        self.mouse.as_ref()
    }

    /// Prevent the default behaviour.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Gets the first look at every action.
pub trait ActionVeto {
    /// Inspect `event`; call [`TabActionEvent::consume`] to veto it.
    fn on_action(&mut self, event: &mut TabActionEvent);
}

impl<F: FnMut(&mut TabActionEvent)> ActionVeto for F {
    fn on_action(&mut self, event: &mut TabActionEvent) {
        self(event);
    }
}
