//! Core engine for MindTree's hierarchical thought store.
//! This crate is the single source of truth for tree invariants.

pub mod error;
pub mod import;
pub mod logging;
pub mod model;
pub mod ops;
pub mod rank;
pub mod sort;
pub mod state;
pub mod view;

pub use error::{EngineError, EngineResult};
pub use import::{import_tree, ImportNode};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::lexeme::{normalize, Lexeme};
pub use model::path::{Path, SimplePath};
pub use model::thought::{ChildKey, Thought, ThoughtId, Timestamp, ROOT_ID};
pub use ops::archive::{archive_thought, ArchiveThought};
pub use ops::attributes::{
    delete_attribute, set_descendant, toggle_attribute, AttributeChain,
};
pub use ops::create::{create_thought, CreateThought};
pub use ops::delete::{delete_thought, DeleteThought};
pub use ops::edit::{edit_thought, EditThought};
pub use ops::merge::{merge_adjacent, merge_thoughts};
pub use ops::move_thought::{move_thought, MoveThought};
pub use ops::pipeline::{run_pipeline, Step};
pub use ops::rerank::rerank;
pub use ops::split::{split_thought, SplitThought};
pub use rank::{rank_after, rank_before, RANK_EPSILON};
pub use sort::preference::{SortDirection, SortPreference, SortType};
pub use sort::{resolve_sort_preference, toggle_sort};
pub use state::alert::{Alert, AlertKind};
pub use state::context::EngineContext;
pub use state::space::ThoughtSpace;
pub use view::collapse::{collapse_context, uncategorize};
pub use view::context_view::{simplify_path, toggle_context_view};
pub use view::subcategorize::{subcategorize_all, subcategorize_one};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
