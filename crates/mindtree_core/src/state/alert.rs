//! Transient user-facing alert slot.
//!
//! # Responsibility
//! - Carry recovered policy violations to the UI layer.
//!
//! # Invariants
//! - There is exactly one alert slot; a new alert replaces the old one.
//! - Alerts never escape the engine as errors.

use serde::{Deserialize, Serialize};

/// Category of a recovered policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Manual reorder inside a sorted context removed its sort.
    SortDisabled,
    /// The target thought is read-only.
    ReadOnly,
    /// The target thought does not accept new children.
    Unextendable,
    /// The operation is not available inside an active context view.
    ContextViewActive,
    /// A multi-selection operation spanned different parents.
    MixedParents,
    /// The value occurs in fewer than two contexts.
    NoContexts,
}

/// One transient, user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
