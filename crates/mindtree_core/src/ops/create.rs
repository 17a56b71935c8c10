//! Thought creation.
//!
//! # Responsibility
//! - Insert a new thought under a parent path, index its value, and
//!   assign its rank under the parent's active sort preference.
//!
//! # Invariants
//! - A create that would produce a second visible sibling with the same
//!   normalized value reuses the existing sibling instead.
//! - An attribute create under a parent that already carries the name
//!   reuses the existing attribute child.

use crate::error::EngineResult;
use crate::model::path::Path;
use crate::model::thought::{is_attribute_value, Thought, ThoughtId, Timestamp};
use crate::rank::{next_rank, prev_rank};
use crate::sort::preference::SortType;
use crate::sort::{resolve_sort_preference, sorted_rank};
use crate::state::alert::AlertKind;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::debug;

/// Payload for [`create_thought`].
#[derive(Debug, Clone)]
pub struct CreateThought {
    /// Parent path in view coordinates.
    pub parent: Path,
    /// Literal display value.
    pub value: String,
    /// Requested rank; ignored when the parent context sorts.
    pub rank: Option<f64>,
    /// Caller-provided id for import/sync; generated when absent.
    pub id: Option<ThoughtId>,
    /// Creation timestamp override for import/sync.
    pub created: Option<Timestamp>,
}

/// Creates a thought under the given parent.
///
/// Returns the created (or reused) id, or `None` when a policy
/// violation turned the operation into a no-op with an alert.
pub fn create_thought(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: CreateThought,
) -> EngineResult<Option<ThoughtId>> {
    let parent_simple = simplify_path(space, &payload.parent)?;
    let parent_id = parent_simple.head();

    if space.has_attribute(parent_id, "=readonly") {
        space.set_alert(AlertKind::ReadOnly, "This thought is read-only");
        return Ok(None);
    }
    if space.has_attribute(parent_id, "=unextendable") {
        space.set_alert(
            AlertKind::Unextendable,
            "New thoughts may not be added here",
        );
        return Ok(None);
    }

    // At most one child per reserved attribute name per parent.
    if is_attribute_value(&payload.value) {
        if let Some(existing) = space.attribute_child_id(parent_id, &payload.value) {
            let now = ctx.now();
            let updated_by = ctx.updated_by.clone();
            if let Some(thought) = space.thought_mut(existing) {
                thought.touch(now, &updated_by);
            }
            return Ok(Some(existing));
        }
    } else if !payload.value.trim().is_empty() {
        // Duplicate-value siblings are prevented; for a childless new
        // node the merge path degenerates to reusing the survivor.
        if let Some(existing) = space.child_by_value(parent_id, &payload.value) {
            let existing_id = existing.id;
            let now = ctx.now();
            let updated_by = ctx.updated_by.clone();
            if let Some(thought) = space.thought_mut(existing_id) {
                thought.touch(now, &updated_by);
            }
            return Ok(Some(existing_id));
        }
    }

    let pref = resolve_sort_preference(space, parent_id);
    let rank = if is_attribute_value(&payload.value) {
        if pref.kind == SortType::Alphabetical {
            sorted_rank(space, parent_id, None, &payload.value, None, pref)
        } else {
            payload
                .rank
                .unwrap_or_else(|| prev_rank(space, parent_id))
        }
    } else if pref.is_sorted() {
        sorted_rank(space, parent_id, None, &payload.value, payload.rank, pref)
    } else {
        payload
            .rank
            .unwrap_or_else(|| next_rank(space, parent_id))
    };

    let id = payload.id.unwrap_or_else(|| ctx.next_id());
    let created = payload.created.unwrap_or_else(|| ctx.now());
    let thought = Thought::new(
        id,
        payload.value,
        rank,
        Some(parent_id),
        created,
        ctx.updated_by.clone(),
    );
    space.add_thought(thought);

    if ctx.debug {
        debug!("event=create_thought module=ops status=ok id={id} parent={parent_id} rank={rank}");
    }
    Ok(Some(id))
}
