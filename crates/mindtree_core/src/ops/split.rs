//! Thought splitting.
//!
//! # Responsibility
//! - Break a thought's value at a caret offset into two sibling
//!   thoughts, the right one inheriting the original children.

use crate::error::{EngineError, EngineResult};
use crate::model::path::Path;
use crate::model::thought::{ChildKey, ThoughtId, ROOT_ID};
use crate::ops::edit::{edit_thought, EditThought};
use crate::rank::mid;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::debug;

/// Payload for [`split_thought`].
#[derive(Debug, Clone)]
pub struct SplitThought {
    pub path: Path,
    /// Char offset into the value; everything before it stays.
    pub offset: usize,
}

/// Splits the thought at `path` into two siblings.
///
/// The left keeps the trimmed prefix and its id; the right receives the
/// trimmed suffix and the original children, ranked immediately after
/// the left.
pub fn split_thought(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: SplitThought,
) -> EngineResult<ThoughtId> {
    let simple = simplify_path(space, &payload.path)?;
    let id = simple.head();
    if id == ROOT_ID {
        return Err(EngineError::RootImmutable);
    }
    let thought = space.resolve(&payload.path)?;
    let value = thought.value.clone();
    let parent = thought.parent_id.unwrap_or(ROOT_ID);
    let left_rank = thought.rank;

    let char_count = value.chars().count();
    if payload.offset > char_count {
        return Err(EngineError::InvalidSplitOffset {
            len: char_count,
            offset: payload.offset,
        });
    }
    let boundary = value
        .char_indices()
        .nth(payload.offset)
        .map(|(byte, _)| byte)
        .unwrap_or(value.len());
    let left_value = value[..boundary].trim_end().to_string();
    let right_value = value[boundary..].trim_start().to_string();

    // The right sibling slots between the left and its next neighbor.
    let next = space
        .children(parent)
        .into_iter()
        .map(|child| child.rank)
        .filter(|rank| *rank > left_rank)
        .fold(None::<f64>, |best, rank| match best {
            Some(current) if current <= rank => Some(current),
            _ => Some(rank),
        });
    let right_rank = match next {
        Some(next_rank) => mid(left_rank, next_rank),
        None => left_rank + 1.0,
    };

    let now = ctx.now();
    let right_id = ctx.next_id();
    let updated_by = ctx.updated_by.clone();
    let mut right = crate::model::thought::Thought::new(
        right_id,
        right_value.clone(),
        right_rank,
        Some(parent),
        now,
        &updated_by,
    );

    // The original children follow the suffix.
    let moved: Vec<(ChildKey, ThoughtId)> = space
        .thought(id)
        .map(|t| t.children.iter().map(|(k, v)| (k.clone(), *v)).collect())
        .unwrap_or_default();
    for (key, child_id) in moved {
        right.children.insert(key, child_id);
        if let Some(child) = space.thought_mut(child_id) {
            child.parent_id = Some(right_id);
        }
    }
    if let Some(left) = space.thought_mut(id) {
        left.children.clear();
    }

    space.add_thought(right);

    edit_thought(
        space,
        ctx,
        EditThought {
            path: payload.path.clone(),
            new_value: left_value,
        },
    )?;

    debug!("event=split_thought module=ops status=ok left={id} right={right_id}");
    Ok(right_id)
}
