// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. toggle::ToggleError)
    clippy::module_name_repetitions
)]

//! # Marktoggle
//!
//! Toggle lightweight inline markup such as `==highlight==` or `**bold**`
//! around a selection or the line under the cursor.
//!
//! Toggling is stateless: each call looks at the text, decides whether it
//! is already wrapped by the marker pair, and produces the opposite state.
//!
//! ## Modules
//!
//! - [`toggle`]: Wrap/unwrap engine and edit target handling
//! - [`editor`]: Host buffer contract and a rope-backed buffer
//! - [`markers`]: Built-in marker styles
//! - [`config`]: Persisted settings and custom tags
//! - [`commands`]: Command table and dispatch

pub mod commands;
pub mod config;
pub mod editor;
pub mod markers;
pub mod toggle;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commands::{CommandOutcome, CommandTable, Notice};
    pub use crate::config::Settings;
    pub use crate::editor::{Cursor, EditorAccess, EditorBuffer};
    pub use crate::markers::MarkerType;
    pub use crate::toggle::{EditResult, MarkerPair, ToggleError, is_wrapped, toggle};
}
