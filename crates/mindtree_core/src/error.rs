//! Engine-wide error types.
//!
//! # Responsibility
//! - Define the fatal error surface of the mutation engine.
//! - Keep recoverable policy failures out of this type; those are
//!   surfaced through the transient alert slot on `ThoughtSpace`.
//!
//! # Invariants
//! - An `EngineError` means caller error or corrupted state, never a
//!   user-recoverable condition.
//! - Data-integrity mismatches are logged and do not become errors.

use crate::model::thought::ThoughtId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by all mutation engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal errors from mutation engine operations.
#[derive(Debug)]
pub enum EngineError {
    /// A path failed to resolve to an existing thought. Paths handed to
    /// the engine must always resolve; this is an invariant violation.
    PathUnresolved(String),
    /// A thought id is missing from the store.
    ThoughtNotFound(ThoughtId),
    /// The root thought cannot be moved, edited, or deleted.
    RootImmutable,
    /// A move would make a thought an ancestor of itself.
    CycleDetected {
        thought_id: ThoughtId,
        parent_id: ThoughtId,
    },
    /// Split offset is outside the value's character range.
    InvalidSplitOffset { len: usize, offset: usize },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathUnresolved(path) => write!(f, "path does not resolve: {path}"),
            Self::ThoughtNotFound(id) => write!(f, "thought not found: {id}"),
            Self::RootImmutable => write!(f, "the root thought cannot be mutated"),
            Self::CycleDetected {
                thought_id,
                parent_id,
            } => write!(
                f,
                "move would create cycle: thought {thought_id} under parent {parent_id}"
            ),
            Self::InvalidSplitOffset { len, offset } => write!(
                f,
                "split offset {offset} is outside value of length {len}"
            ),
        }
    }
}

impl Error for EngineError {}
