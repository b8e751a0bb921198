//! Input: keyboard and touch events mapped onto a fixed driving action table.
//!
//! # Invariants
//! - One boolean per [`Action`]; no dynamic keys.
//! - Last write wins across sources. Keyboard and touch share one entry per
//!   action, so releasing on one source releases the action even if another
//!   source still holds it.
//! - Nothing clears the table automatically; state persists until a release.

mod action;
mod aggregator;
mod bindings;

pub use action::{Action, InputSource, InputState};
pub use aggregator::{InputAggregator, InputEvent};
pub use bindings::{KeyBindings, TouchControl, TouchSurface};

/// Errors from input configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("unknown action binding: {0}")]
    UnknownBinding(String),
}
