//! Context views and view-level restructuring.
//!
//! # Responsibility
//! - Toggle context views (every context of a Lexeme shown under one
//!   virtual parent) and translate view paths back to real ones.
//! - Collapse, subcategorize, and uncategorize selections.
//!
//! # Invariants
//! - View paths never leak into the store; every mutation goes through
//!   `simplify_path` first.

pub mod collapse;
pub mod context_view;
pub mod subcategorize;
