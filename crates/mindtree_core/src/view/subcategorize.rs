//! Subcategorization: insert a parent above a selection.
//!
//! # Responsibility
//! - Wrap one or more sibling thoughts in a new empty parent, inserted
//!   at the selection's position.
//!
//! # Invariants
//! - All selected thoughts must share a parent; a mixed selection is
//!   refused with a policy alert.
//! - The selection keeps its relative order under the new parent.

use crate::error::{EngineError, EngineResult};
use crate::model::path::Path;
use crate::model::thought::{ThoughtId, ROOT_ID};
use crate::ops::create::{create_thought, CreateThought};
use crate::ops::move_thought::{move_thought, MoveThought};
use crate::state::alert::AlertKind;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::debug;

/// Inserts a new empty parent above the single thought at `path`.
pub fn subcategorize_one(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    path: &Path,
) -> EngineResult<Option<ThoughtId>> {
    subcategorize_all(space, ctx, std::slice::from_ref(path))
}

/// Inserts a new empty parent above every thought in `paths`.
///
/// Returns the new parent's id, or `None` when the selection was
/// refused.
pub fn subcategorize_all(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    paths: &[Path],
) -> EngineResult<Option<ThoughtId>> {
    if paths.is_empty() {
        return Ok(None);
    }
    let mut selection = Vec::with_capacity(paths.len());
    for path in paths {
        let simple = simplify_path(space, path)?;
        let id = simple.head();
        if id == ROOT_ID {
            return Err(EngineError::RootImmutable);
        }
        selection.push(simple);
    }

    let parent = space
        .thought(selection[0].head())
        .and_then(|t| t.parent_id)
        .unwrap_or(ROOT_ID);
    let mixed = selection.iter().any(|simple| {
        space
            .thought(simple.head())
            .and_then(|t| t.parent_id)
            .unwrap_or(ROOT_ID)
            != parent
    });
    if mixed {
        space.set_alert(
            AlertKind::MixedParents,
            "Selection spans more than one context",
        );
        return Ok(None);
    }

    // The new parent takes the selection's topmost rank slot.
    let mut ordered: Vec<(ThoughtId, f64)> = selection
        .iter()
        .filter_map(|simple| {
            let id = simple.head();
            space.thought(id).map(|t| (id, t.rank))
        })
        .collect();
    ordered.sort_by(|(a_id, a_rank), (b_id, b_rank)| {
        a_rank
            .partial_cmp(b_rank)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a_id.cmp(b_id))
    });
    let slot_rank = ordered.first().map(|(_, rank)| *rank).unwrap_or(0.0);

    let parent_path: Path = match space.path_to(parent) {
        Some(simple) => simple.into(),
        None => Path::root(),
    };
    let Some(category) = create_thought(
        space,
        ctx,
        CreateThought {
            parent: parent_path.clone(),
            value: String::new(),
            rank: Some(slot_rank),
            id: None,
            created: None,
        },
    )?
    else {
        return Ok(None);
    };

    let category_path = parent_path.append(category);
    for (position, (id, _)) in ordered.into_iter().enumerate() {
        if space.thought(id).is_none() {
            continue;
        }
        move_thought(
            space,
            ctx,
            MoveThought {
                old_path: parent_path.append(id),
                new_path: category_path.append(id),
                new_rank: position as f64,
                skip_rerank: true,
            },
        )?;
    }

    space.cursor = Some(category_path.clone());
    space.recompute_expanded();
    debug!("event=subcategorize module=view status=ok category={category} parent={parent}");
    Ok(Some(category))
}
