#![forbid(unsafe_code)]

//! tabstrip public facade crate.
//!
//! Re-exports the types a skin needs from the internal crates and offers a
//! prelude for day-to-day use.
//!
//! ```
//! use tabstrip::prelude::*;
//!
//! let model = DefaultTabDataModel::with_tabs(vec![
//!     TabData::new(TabId::new(1), "main.rs"),
//!     TabData::new(TabId::new(2), "lib.rs"),
//! ])?;
//! let mut strip = ScrollingTabDisplayer::new(model);
//! strip.set_width(400);
//! strip.set_selected(Some(1));
//! assert!(strip.tab_flags(1).contains(TabStateFlags::SELECTED));
//! # Ok::<(), tabstrip::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tabstrip_core::{
    ArrayDiff, ContentsChanged, DefaultTabDataModel, IconSize, ModelError, Modifiers, MouseButton,
    MouseEvent, MouseEventKind, Rect, SingleSelectionModel, TabData, TabId, TabModelEvent,
};

// --- Layout re-exports -----------------------------------------------------

pub use tabstrip_layout::{
    CellTextMeasurer, ClipThresholds, DefaultTabLayoutModel, LayoutResult, ScrollingTabLayoutModel,
    TabLayoutModel, TabMetricsConfig, TextMeasurer,
};

// --- Widget re-exports -----------------------------------------------------

pub use tabstrip_widgets::{
    ActionVeto, ChangeType, ConfigError, DisplayerConfig, Repaint, RepaintPolicy, RepaintQueue,
    ScrollingTabDisplayer, SlidingTabDisplayer, TabActionEvent, TabCommand, TabRepainter,
    TabState, TabStateFlags,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// A data model mutation was rejected.
    Model(ModelError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for tabstrip APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionVeto, DefaultTabDataModel, DisplayerConfig, Error, MouseButton, MouseEvent,
        MouseEventKind, Rect, Repaint, Result, ScrollingTabDisplayer, TabActionEvent, TabCommand,
        TabData, TabId, TabLayoutModel, TabStateFlags,
    };

    pub use crate::{core, layout, widgets};
}

pub use tabstrip_core as core;
pub use tabstrip_layout as layout;
pub use tabstrip_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_convert() {
        let mut model = DefaultTabDataModel::new();
        let err: Error = model.remove_tab(3).expect_err("empty model").into();
        assert!(matches!(err, Error::Model(ModelError::InvalidRange { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn validation_errors_convert() {
        let err: Error = ConfigError::Validation(vec!["bad".into()]).into();
        assert_eq!(err.to_string(), "validation errors: bad");
    }
}
