//! Collapse: dissolve a thought into its parent.
//!
//! # Responsibility
//! - Move a thought's children one level up, preserving their order,
//!   then delete the emptied thought.
//!
//! # Invariants
//! - Promoted children land in the collapsed thought's rank slot, in
//!   their existing order; a sorted destination re-applies its
//!   comparator over the merged sibling set.
//! - Collapsing under an active context view is refused with a policy
//!   alert; the mutation would write through display coordinates.

use crate::error::{EngineError, EngineResult};
use crate::model::path::Path;
use crate::model::thought::ROOT_ID;
use crate::ops::delete::{delete_thought, DeleteThought};
use crate::ops::move_thought::{move_thought, MoveThought};
use crate::ops::rerank::rerank;
use crate::rank::needs_rerank;
use crate::sort::{resolve_sort_preference, sort};
use crate::state::alert::AlertKind;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::{inside_context_view, simplify_path};
use log::debug;

/// Dissolves the thought at `path`, promoting its children.
pub fn collapse_context(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    path: &Path,
) -> EngineResult<()> {
    if inside_context_view(space, path) {
        space.set_alert(
            AlertKind::ContextViewActive,
            "Cannot restructure inside a context view",
        );
        return Ok(());
    }
    let simple = simplify_path(space, path)?;
    let id = simple.head();
    if id == ROOT_ID {
        return Err(EngineError::RootImmutable);
    }
    let thought = space
        .thought(id)
        .ok_or(EngineError::ThoughtNotFound(id))?;
    let parent = thought.parent_id.unwrap_or(ROOT_ID);
    let left = thought.rank;
    let parent_path = simple.as_path().parent().unwrap_or_else(Path::root);

    // Promoted children spread through the collapsed thought's slot,
    // before its next sibling.
    let right = space
        .children(parent)
        .into_iter()
        .map(|sibling| sibling.rank)
        .filter(|rank| *rank > left)
        .fold(None::<f64>, |best, rank| match best {
            Some(current) if current <= rank => Some(current),
            _ => Some(rank),
        })
        .unwrap_or(left + 1.0);

    let children = space.children_ids(id);
    let count = children.len() as f64;
    for (index, child) in children.into_iter().enumerate() {
        if space.thought(child).is_none() {
            continue;
        }
        let rank = left + (index as f64 + 1.0) * (right - left) / (count + 1.0);
        move_thought(
            space,
            ctx,
            MoveThought {
                old_path: simple.as_path().append(child),
                new_path: parent_path.append(child),
                new_rank: rank,
                skip_rerank: true,
            },
        )?;
    }

    delete_thought(
        space,
        ctx,
        DeleteThought {
            path: simple.as_path(),
        },
    )?;
    // Promotion moves bypass the per-move sort placement; an active
    // comparator on the destination must be re-applied over the merged
    // sibling set.
    if resolve_sort_preference(space, parent).is_sorted() {
        sort(space, parent);
    }
    space.cursor = Some(parent_path.clone()).filter(|p| !p.is_root());
    space.recompute_expanded();
    if needs_rerank(space, parent) {
        rerank(space, ctx, &parent_path)?;
    }

    debug!("event=collapse_context module=view status=ok id={id} parent={parent}");
    Ok(())
}

/// Collapse applied through context-view translation; kept as its own
/// surface for callers that uncategorize a selection.
pub fn uncategorize(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    path: &Path,
) -> EngineResult<()> {
    collapse_context(space, ctx, path)
}
