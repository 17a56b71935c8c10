//! Mutation engine operations.
//!
//! # Responsibility
//! - Implement every state-transition step as an independently testable
//!   `(state, ctx, payload) -> Result` function.
//! - Compose multi-step behavior through the ordered pipeline fold in
//!   `pipeline`, never through ad-hoc nested dispatch.
//!
//! # Invariants
//! - Operations either complete or leave an alert plus unchanged
//!   semantics; no partial state is ever published mid-pipeline.
//! - Duplicate-value siblings are never produced; the merge path runs
//!   instead.

pub mod archive;
pub mod attributes;
pub mod create;
pub mod delete;
pub mod edit;
pub mod merge;
pub mod move_thought;
pub mod pipeline;
pub mod rerank;
pub mod split;
