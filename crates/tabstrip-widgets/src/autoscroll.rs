#![forbid(unsafe_code)]

//! Drag autoscroll.
//!
//! While a drag hovers near either edge of the strip the layout scrolls one
//! tab per period in that direction until the pointer leaves the edge zone
//! or there is nothing left to reveal.

use tabstrip_layout::{ScrollingTabLayoutModel, TabLayoutModel};
use web_time::{Duration, Instant};

use crate::timer::RepeatingTimer;

/// Default autoscroll period.
pub const AUTOSCROLL_PERIOD: Duration = Duration::from_millis(150);

/// Width of the edge zones that trigger autoscroll.
pub const AUTOSCROLL_EDGE_WIDTH: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Towards the first tab.
    Backward,
    /// Towards the last tab.
    Forward,
}

impl ScrollDirection {
    /// Direction for a drag at `x` in a strip `width` pixels wide.
    #[must_use]
    pub fn for_drag(x: i32, width: i32) -> Option<Self> {
        if width <= AUTOSCROLL_EDGE_WIDTH * 2 {
            return None;
        }
        if x < AUTOSCROLL_EDGE_WIDTH {
            Some(Self::Backward)
        } else if x >= width - AUTOSCROLL_EDGE_WIDTH {
            Some(Self::Forward)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backward => "backward",
            Self::Forward => "forward",
        }
    }
}

/// Scrolls a layout periodically while running.
#[derive(Debug, Clone)]
pub struct Autoscroller {
    timer: RepeatingTimer,
    direction: Option<ScrollDirection>,
}

impl Default for Autoscroller {
    fn default() -> Self {
        Self::new(AUTOSCROLL_PERIOD)
    }
}

impl Autoscroller {
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            timer: RepeatingTimer::new(period),
            direction: None,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    #[must_use]
    pub const fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.timer.next_deadline()
    }

    /// Start scrolling in `direction`.
    ///
    /// Already running in the same direction: no-op, returns `false`.
    pub fn start(&mut self, direction: ScrollDirection, now: Instant) -> bool {
        if self.is_running() && self.direction == Some(direction) {
            return false;
        }
        self.direction = Some(direction);
        self.timer.start(now);
        tracing::debug!(
            message = "tabstrip.autoscroll.start",
            direction = direction.as_str()
        );
        true
    }

    /// Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.timer.stop();
        let direction = self.direction.take();
        tracing::debug!(
            message = "tabstrip.autoscroll.stop",
            direction = direction.map_or("none", ScrollDirection::as_str)
        );
        true
    }

    /// Scroll `layout` if a period elapsed. Returns whether it scrolled.
    ///
    /// Stops itself once the layout cannot scroll further that way.
    pub fn tick<L: TabLayoutModel>(
        &mut self,
        now: Instant,
        layout: &mut ScrollingTabLayoutModel<L>,
    ) -> bool {
        let Some(direction) = self.direction else {
            return false;
        };
        if !self.timer.poll(now) {
            return false;
        }
        let (moved, more) = match direction {
            ScrollDirection::Forward => (layout.scroll_forward(), layout.can_scroll_forward()),
            ScrollDirection::Backward => (layout.scroll_backward(), layout.can_scroll_backward()),
        };
        if !moved || !more {
            self.stop();
        }
        moved
    }
}
