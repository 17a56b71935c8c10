//! Reparenting and sibling reordering.
//!
//! # Responsibility
//! - Move a thought to a new parent and rank in one step, including the
//!   same-parent reorder case.
//! - Route duplicate-value collisions at the destination through merge.
//! - Enforce the destination's sort preference and extendability.
//!
//! # Invariants
//! - A thought is never moved under itself or any of its descendants.
//! - A move into a sorted parent either lands at the sorted position or
//!   disables the sort, never both.
//! - The cursor and expansion state follow the moved subtree.

use crate::error::{EngineError, EngineResult};
use crate::model::path::Path;
use crate::model::thought::{is_attribute_value, ROOT_ID};
use crate::ops::attributes::{delete_attribute, AttributeChain};
use crate::ops::merge::{merge_thoughts, reparent};
use crate::ops::rerank::rerank;
use crate::rank::needs_rerank;
use crate::sort::{resolve_sort_preference, sorted_rank, violates_sort};
use crate::state::alert::AlertKind;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::{debug, warn};

/// Payload for [`move_thought`].
#[derive(Debug, Clone)]
pub struct MoveThought {
    pub old_path: Path,
    pub new_path: Path,
    pub new_rank: f64,
    /// Skip the post-move epsilon scan and sorted-rank override. Used
    /// by callers that manage ranks themselves: [`rerank`]'s in-place
    /// re-moves, and batch promotions that re-apply the comparator over
    /// the destination afterwards.
    pub skip_rerank: bool,
}

/// Moves a thought from `old_path` to `new_path` at `new_rank`.
pub fn move_thought(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: MoveThought,
) -> EngineResult<()> {
    let old_simple = simplify_path(space, &payload.old_path)?;
    let id = old_simple.head();
    if id == ROOT_ID {
        return Err(EngineError::RootImmutable);
    }
    let dest_parent_path = payload.new_path.parent().unwrap_or_else(Path::root);
    let dest_simple = simplify_path(space, &dest_parent_path)?;
    let new_parent = dest_simple.head();

    if new_parent == id || space.is_ancestor(id, new_parent) {
        return Err(EngineError::CycleDetected {
            thought_id: id,
            parent_id: new_parent,
        });
    }
    if space.has_attribute(new_parent, "=unextendable") && new_parent != ROOT_ID {
        let old_parent = space
            .thought(id)
            .and_then(|t| t.parent_id)
            .unwrap_or(ROOT_ID);
        if old_parent != new_parent {
            space.set_alert(AlertKind::Unextendable, "Cannot extend this context");
            return Ok(());
        }
    }

    let thought = space
        .thought(id)
        .ok_or(EngineError::ThoughtNotFound(id))?;
    let value = thought.value.clone();
    let old_parent = thought.parent_id.unwrap_or(ROOT_ID);
    let old_rank = thought.rank;

    // A visible sibling at the destination with the same value absorbs
    // the moved thought instead of producing a duplicate.
    if !value.trim().is_empty() && !is_attribute_value(&value) {
        if let Some(duplicate) = space.child_by_value(new_parent, &value) {
            if duplicate.id != id {
                let target = duplicate.id;
                let either_pending = space.thought(id).map(|t| t.pending).unwrap_or(false)
                    || space.thought(target).map(|t| t.pending).unwrap_or(false);
                if either_pending {
                    warn!(
                        "event=merge_deferred module=ops status=warn source={id} target={target} reason=pending"
                    );
                } else {
                    merge_thoughts(space, ctx, id, target)?;
                    return Ok(());
                }
            }
        }
    }

    let mut rank = payload.new_rank;
    if !payload.skip_rerank {
        let pref = resolve_sort_preference(space, new_parent);
        if pref.is_sorted() && !is_attribute_value(&value) {
            if violates_sort(space, new_parent, id, rank, pref) {
                // The explicit drop position wins; the ordering contract
                // is gone, so the preference is removed.
                delete_attribute(
                    space,
                    ctx,
                    AttributeChain {
                        path: Some(dest_simple.as_path()),
                        values: vec!["=sort".to_string()],
                    },
                )?;
                space.manual_ranks.remove(&new_parent);
                space.set_alert(AlertKind::SortDisabled, "Sort preference turned off");
            } else {
                rank = sorted_rank(space, new_parent, Some(id), &value, Some(rank), pref);
            }
        }
    }

    reparent(space, id, new_parent);

    let now = ctx.now();
    let updated_by = ctx.updated_by.clone();
    let archived = if space.is_inside_archive(new_parent) {
        Some(now)
    } else {
        None
    };
    if let Some(thought) = space.thought_mut(id) {
        thought.rank = rank;
        thought.archived = archived;
        thought.touch(now, &updated_by);
    }
    if let Some(parent) = space.thought_mut(new_parent) {
        parent.touch(now, &updated_by);
    }
    if old_parent != new_parent {
        if let Some(parent) = space.thought_mut(old_parent) {
            parent.touch(now, &updated_by);
        }
    }

    // State addressed through the old location follows the move.
    let mut new_location = payload.new_path.clone();
    if new_location.head() != id {
        new_location = new_location.append(id);
    }
    let from = payload.old_path.ids();
    let to = new_location.ids();
    if let Some(cursor) = space.cursor.take() {
        space.cursor = Some(cursor.rebase(from, to).unwrap_or(cursor));
    }
    let views = std::mem::take(&mut space.context_views);
    space.context_views = views
        .into_iter()
        .map(|p| p.rebase(from, to).unwrap_or(p))
        .collect();
    space.recompute_expanded();

    if !payload.skip_rerank && needs_rerank(space, new_parent) {
        rerank(space, ctx, &dest_simple.as_path())?;
    }

    if ctx.debug {
        debug!(
            "event=move_thought module=ops status=ok id={id} from={old_parent} to={new_parent} old_rank={old_rank} rank={rank}"
        );
    }
    Ok(())
}
