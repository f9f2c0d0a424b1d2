#![forbid(unsafe_code)]

//! Core: tab records, the tab data model, change events, and selection.
//!
//! # Role in tabstrip
//! `tabstrip-core` is the data layer. It owns the ordered list of tabs a
//! displayer shows, the single selected index, and the structured change
//! events every other layer uses to keep cached indices in step with the
//! model.
//!
//! # Primary responsibilities
//! - **TabData**: one tab record (text, icon size, tooltip, busy flag).
//! - **DefaultTabDataModel**: ordered tabs; every mutation returns a
//!   [`TabModelEvent`] describing what moved.
//! - **ArrayDiff**: old/new correspondence for wholesale replacement.
//! - **SingleSelectionModel**: the selected index, kept valid across
//!   structural changes.
//!
//! # How it fits in the system
//! `tabstrip-layout` measures tabs from the model and `tabstrip-widgets`
//! remaps its transient interaction state through the same events, so a
//! single event value drives every cache invalidation.

pub mod diff;
pub mod event;
pub mod geometry;
pub mod model;
pub mod selection;
pub mod tab;

pub use diff::ArrayDiff;
pub use event::{Modifiers, MouseButton, MouseEvent, MouseEventKind};
pub use geometry::Rect;
pub use model::{ContentsChanged, DefaultTabDataModel, ModelError, TabModelEvent};
pub use selection::SingleSelectionModel;
pub use tab::{IconSize, TabData, TabId};
