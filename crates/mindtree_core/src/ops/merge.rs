//! Thought merging.
//!
//! # Responsibility
//! - Union two same-value thoughts into one survivor, recursively
//!   merging same-value descendants.
//! - Join two adjacent siblings' values back into one thought (the
//!   inverse of split).
//!
//! # Invariants
//! - The duplicate's id is dropped from its lexeme; the survivor keeps
//!   its own id and lexeme membership.
//! - The survivor's children are the union of both originals'.
//! - The cursor never points at a merged-away id afterwards.

use crate::error::{EngineError, EngineResult};
use crate::model::path::Path;
use crate::model::thought::{ChildKey, ThoughtId, ROOT_ID};
use crate::ops::delete::DeleteThought;
use crate::ops::edit::EditThought;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::{debug, warn};

/// Merges `source` into `target`: children are unioned (recursively
/// merging same-value pairs), the source id leaves its lexeme, and the
/// source record is removed.
pub fn merge_thoughts(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    source: ThoughtId,
    target: ThoughtId,
) -> EngineResult<()> {
    if source == target {
        return Ok(());
    }
    if source == ROOT_ID || target == ROOT_ID {
        return Err(EngineError::RootImmutable);
    }
    let source_value = space
        .thought(source)
        .ok_or(EngineError::ThoughtNotFound(source))?
        .value
        .clone();
    space
        .thought(target)
        .ok_or(EngineError::ThoughtNotFound(target))?;

    absorb_children(space, ctx, source, target)?;

    let parent = space.thought(source).and_then(|thought| thought.parent_id);
    if let Some(parent_id) = parent {
        space.remove_child_link(parent_id, source);
    }
    space.lexeme_remove(&source_value, source);
    space.remove_thought(source);

    // The survivor absorbs the duplicate's identity in the view state.
    if let Some(cursor) = space.cursor.clone() {
        if cursor.contains(source) {
            let ids: Vec<ThoughtId> = cursor
                .ids()
                .iter()
                .map(|id| if *id == source { target } else { *id })
                .collect();
            space.cursor = Some(Path::new(ids));
            space.recompute_expanded();
        }
    }
    space.context_views.retain(|path| !path.contains(source));

    let now = ctx.now();
    let updated_by = ctx.updated_by.clone();
    if let Some(thought) = space.thought_mut(target) {
        thought.touch(now, &updated_by);
    }
    debug!("event=merge_thoughts module=ops status=ok source={source} target={target}");
    Ok(())
}

/// Joins two adjacent siblings: the left survives with both values
/// concatenated with exactly one interior space; the right's children
/// fold into the left and the right is deleted.
pub fn merge_adjacent(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    left_path: &Path,
    right_path: &Path,
) -> EngineResult<()> {
    let left_simple = simplify_path(space, left_path)?;
    let right_simple = simplify_path(space, right_path)?;
    let left = left_simple.head();
    let right = right_simple.head();
    if left == ROOT_ID || right == ROOT_ID {
        return Err(EngineError::RootImmutable);
    }
    if left_simple.parent_id() != right_simple.parent_id() {
        warn!(
            "event=merge_adjacent module=ops status=skipped reason=different_parents left={left} right={right}"
        );
        return Ok(());
    }

    let left_value = space
        .thought(left)
        .ok_or(EngineError::ThoughtNotFound(left))?
        .value
        .clone();
    let right_value = space
        .thought(right)
        .ok_or(EngineError::ThoughtNotFound(right))?
        .value
        .clone();
    let joined = join_values(&left_value, &right_value);

    absorb_children(space, ctx, right, left)?;
    crate::ops::delete::delete_thought(
        space,
        ctx,
        DeleteThought {
            path: right_path.clone(),
        },
    )?;
    crate::ops::edit::edit_thought(
        space,
        ctx,
        EditThought {
            path: left_path.clone(),
            new_value: joined,
        },
    )?;
    space.cursor = Some(left_path.clone());
    space.recompute_expanded();
    Ok(())
}

/// Moves every child of `from` under `into`, recursively merging pairs
/// with the same normalized value.
pub(crate) fn absorb_children(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    from: ThoughtId,
    into: ThoughtId,
) -> EngineResult<()> {
    for child in space.children_ids(from) {
        let Some(child_value) = space.thought(child).map(|t| t.value.clone()) else {
            continue;
        };
        let existing = if crate::model::thought::is_attribute_value(&child_value) {
            space.attribute_child_id(into, &child_value)
        } else if child_value.trim().is_empty() {
            None
        } else {
            space.child_by_value(into, &child_value).map(|t| t.id)
        };
        match existing {
            Some(existing_id) if existing_id != child => {
                merge_thoughts(space, ctx, child, existing_id)?;
            }
            _ => reparent(space, child, into),
        }
    }
    Ok(())
}

/// Relinks a thought under a new parent, keeping its rank.
pub(crate) fn reparent(space: &mut ThoughtSpace, child: ThoughtId, new_parent: ThoughtId) {
    let Some((old_parent, key)) = space
        .thought(child)
        .map(|t| (t.parent_id, ChildKey::for_value(&t.value, child)))
    else {
        return;
    };
    if let Some(old_parent_id) = old_parent {
        space.remove_child_link(old_parent_id, child);
    }
    space.add_child_link(new_parent, key, child);
    if let Some(thought) = space.thought_mut(child) {
        thought.parent_id = Some(new_parent);
    }
}

fn join_values(left: &str, right: &str) -> String {
    let left = left.trim_end();
    let right = right.trim_start();
    if left.is_empty() {
        return right.to_string();
    }
    if right.is_empty() {
        return left.to_string();
    }
    format!("{left} {right}")
}

#[cfg(test)]
mod tests {
    use super::join_values;

    #[test]
    fn join_values_keeps_exactly_one_interior_space() {
        assert_eq!(join_values("hello", "world"), "hello world");
        assert_eq!(join_values("hello ", " world"), "hello world");
        assert_eq!(join_values("", "world"), "world");
        assert_eq!(join_values("hello", ""), "hello");
    }
}
