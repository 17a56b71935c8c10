//! Domain model for the thought tree.
//!
//! # Responsibility
//! - Define the canonical data structures held in the state arena.
//! - Keep identity, ordering, and indexing semantics in one place.
//!
//! # Invariants
//! - Every thought is identified by a stable `ThoughtId`.
//! - Relationship fields hold ids, never embedded references; all
//!   traversal goes through the `ThoughtSpace` arena.

pub mod lexeme;
pub mod path;
pub mod thought;
