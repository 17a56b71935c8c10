//! Engine state arena and ambient context.
//!
//! # Responsibility
//! - Hold the flat thought/lexeme tables and view state in one arena.
//! - Provide the explicit per-call context object (ids, clock, client)
//!   so operations never read process-wide globals.
//!
//! # Invariants
//! - Every relationship is an id lookup into the arena; there are no
//!   embedded back-references.

pub mod alert;
pub mod context;
pub mod space;
