//! Thought value editing.
//!
//! # Responsibility
//! - Change a thought's display value, moving its id between the old
//!   and new lexemes atomically.
//! - Keep the parent's membership key in step when the value crosses
//!   the attribute boundary.
//!
//! # Invariants
//! - The old lexeme loses this id (and is dropped when emptied) in the
//!   same step the new lexeme gains it.
//! - An edit that produces a duplicate visible sibling delegates to the
//!   merge path; the existing sibling survives.

use crate::error::{EngineError, EngineResult};
use crate::model::path::Path;
use crate::model::thought::{is_attribute_value, ChildKey, ThoughtId, ROOT_ID};
use crate::ops::merge::merge_thoughts;
use crate::state::alert::AlertKind;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::{debug, warn};

/// Payload for [`edit_thought`].
#[derive(Debug, Clone)]
pub struct EditThought {
    pub path: Path,
    pub new_value: String,
}

/// Rewrites a thought's value.
pub fn edit_thought(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: EditThought,
) -> EngineResult<()> {
    let simple = simplify_path(space, &payload.path)?;
    let id = simple.head();
    if id == ROOT_ID {
        return Err(EngineError::RootImmutable);
    }
    let thought = space.resolve(&payload.path)?;
    let old_value = thought.value.clone();
    let parent = thought.parent_id.unwrap_or(ROOT_ID);
    if space.has_attribute(id, "=readonly") {
        space.set_alert(AlertKind::ReadOnly, "This thought cannot be edited");
        return Ok(());
    }
    if old_value == payload.new_value {
        return Ok(());
    }

    let now = ctx.now();
    space.lexeme_remove(&old_value, id);
    space.lexeme_add(&payload.new_value, id, now);

    // Crossing the attribute boundary changes the membership key.
    let old_key = ChildKey::for_value(&old_value, id);
    let new_key = ChildKey::for_value(&payload.new_value, id);
    let mut merge_into: Option<ThoughtId> = None;
    if old_key != new_key {
        space.remove_child_link(parent, id);
        if let ChildKey::Attribute(_) = &new_key {
            if let Some(existing) = space.attribute_child_id(parent, &payload.new_value) {
                if existing != id {
                    merge_into = Some(existing);
                }
            }
        }
        if merge_into.is_none() {
            space.add_child_link(parent, new_key, id);
        }
    }

    let updated_by = ctx.updated_by.clone();
    let new_value = payload.new_value.clone();
    if let Some(thought) = space.thought_mut(id) {
        thought.value = new_value;
        thought.touch(now, &updated_by);
    }

    if merge_into.is_none()
        && !payload.new_value.trim().is_empty()
        && !is_attribute_value(&payload.new_value)
    {
        if let Some(duplicate) = space.child_by_value(parent, &payload.new_value) {
            if duplicate.id != id {
                merge_into = Some(duplicate.id);
            }
        }
    }

    if let Some(target) = merge_into {
        let either_pending = space.thought(id).map(|t| t.pending).unwrap_or(false)
            || space.thought(target).map(|t| t.pending).unwrap_or(false);
        if either_pending {
            // A partially hydrated side could lose unloaded children;
            // leave both and let the sync collaborator settle it.
            warn!(
                "event=merge_deferred module=ops status=warn source={id} target={target} reason=pending"
            );
            if ChildKey::for_value(&payload.new_value, id)
                != ChildKey::for_value(&old_value, id)
            {
                space.add_child_link(parent, ChildKey::for_value(&payload.new_value, id), id);
            }
        } else {
            merge_thoughts(space, ctx, id, target)?;
        }
    }

    debug!("event=edit_thought module=ops status=ok id={id}");
    Ok(())
}
