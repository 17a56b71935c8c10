//! Thought deletion.
//!
//! # Responsibility
//! - Remove a thought and its descendants from the store and from
//!   every lexeme context list.
//! - Repair cursor, expanded, and context-view state that referenced
//!   the deleted subtree.
//!
//! # Invariants
//! - Emptied lexemes are dropped.
//! - Manual-rank memory of deleted contexts is discarded.
//! - A recorded parent pointer that mismatches the path-implied parent
//!   logs a data-integrity warning and deletion continues best-effort.

use crate::error::{EngineError, EngineResult};
use crate::model::path::Path;
use crate::model::thought::{ThoughtId, ROOT_ID};
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::{debug, warn};

/// Payload for [`delete_thought`].
#[derive(Debug, Clone)]
pub struct DeleteThought {
    /// Path of the thought to delete, in view coordinates.
    pub path: Path,
}

/// Deletes a thought and its whole subtree.
pub fn delete_thought(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: DeleteThought,
) -> EngineResult<()> {
    let simple = simplify_path(space, &payload.path)?;
    let id = simple.head();
    if id == ROOT_ID {
        return Err(EngineError::RootImmutable);
    }
    let recorded_parent = space
        .thought(id)
        .ok_or_else(|| EngineError::PathUnresolved(payload.path.to_string()))?
        .parent_id;
    let implied_parent = simple.parent_id();
    if recorded_parent != Some(implied_parent) {
        warn!(
            "event=parent_mismatch module=ops status=warn thought={id} recorded={recorded_parent:?} implied={implied_parent}"
        );
    }

    let removed = delete_subtree(space, id);
    let parent = recorded_parent.unwrap_or(implied_parent);
    space.remove_child_link(parent, id);

    // Repair view state that referenced the deleted subtree.
    let touches = |path: &Path| path.ids().iter().any(|pid| removed.contains(pid));
    if space.cursor.as_ref().map(&touches).unwrap_or(false) {
        space.cursor = payload.path.parent().filter(|p| !p.is_root());
    }
    space.expanded.retain(|path| !touches(path));
    space.context_views.retain(|path| !touches(path));
    space.recompute_expanded();

    let now = ctx.now();
    let updated_by = ctx.updated_by.clone();
    if let Some(parent_thought) = space.thought_mut(parent) {
        parent_thought.touch(now, &updated_by);
    }
    debug!(
        "event=delete_thought module=ops status=ok id={id} removed={}",
        removed.len()
    );
    Ok(())
}

/// Removes a subtree's records, lexeme memberships, and manual-rank
/// memory. Links from the parent are the caller's responsibility.
pub(crate) fn delete_subtree(space: &mut ThoughtSpace, id: ThoughtId) -> Vec<ThoughtId> {
    let ids = space.subtree_ids(id);
    for sub in &ids {
        if let Some(thought) = space.remove_thought(*sub) {
            space.lexeme_remove(&thought.value, *sub);
        }
        space.manual_ranks.remove(sub);
    }
    ids
}
