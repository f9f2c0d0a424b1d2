#![forbid(unsafe_code)]

//! Tab interaction state and displayers.
//!
//! # Role in tabstrip
//! `tabstrip-widgets` sits between a skin and the model/layout layers. It
//! turns pointer events into state changes, state changes into repaint
//! requests, and clicks into vetoable tab actions.
//!
//! # Primary responsibilities
//! - **TabState**: pressed/hovered/selected indices, attention and
//!   highlight sets, table-driven repaint dispatch.
//! - **ScrollingTabDisplayer**: the horizontal strip, wiring model,
//!   selection, scrolling layout, state and drag autoscroll together.
//! - **SlidingTabDisplayer**: a button-per-tab sidebar.
//! - **DisplayerConfig**: skin tunables, loadable from TOML or JSON.
//!
//! # Timers
//! Both timers (attention blink and autoscroll) are polled. The host loop
//! sleeps until [`ScrollingTabDisplayer::next_deadline`] and then calls
//! [`ScrollingTabDisplayer::tick`]; dropping or uninstalling the displayer
//! cancels them.

pub mod action;
pub mod autoscroll;
pub mod config;
pub mod displayer;
pub mod sliding;
pub mod state;
pub mod timer;

pub use action::{ActionVeto, TabActionEvent, TabCommand};
pub use autoscroll::{AUTOSCROLL_EDGE_WIDTH, AUTOSCROLL_PERIOD, Autoscroller, ScrollDirection};
pub use config::{ConfigError, DisplayerConfig, LayoutConfig, MetricsConfig};
pub use displayer::ScrollingTabDisplayer;
pub use sliding::{SlidingButton, SlidingTabDisplayer};
pub use state::{
    ATTENTION_PERIOD, ChangeType, Repaint, RepaintPolicy, RepaintQueue, StateField, TabRepainter,
    TabState, TabStateFlags,
};
pub use timer::RepeatingTimer;
