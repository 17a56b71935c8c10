//! Archiving.
//!
//! # Responsibility
//! - Tuck a thought into its parent's `=archive` container, creating
//!   the container on first use.
//!
//! # Invariants
//! - Archived thoughts keep their subtree; only the location and the
//!   `archived` stamp change.
//! - A context owns at most one `=archive` container.

use crate::error::{EngineError, EngineResult};
use crate::model::path::Path;
use crate::model::thought::ROOT_ID;
use crate::ops::create::{create_thought, CreateThought};
use crate::ops::move_thought::{move_thought, MoveThought};
use crate::rank::next_rank;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::debug;

/// Payload for [`archive_thought`].
#[derive(Debug, Clone)]
pub struct ArchiveThought {
    pub path: Path,
}

/// Moves the thought at `path` under its parent's `=archive` container.
pub fn archive_thought(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: ArchiveThought,
) -> EngineResult<()> {
    let simple = simplify_path(space, &payload.path)?;
    let id = simple.head();
    if id == ROOT_ID {
        return Err(EngineError::RootImmutable);
    }
    let parent = space
        .thought(id)
        .and_then(|t| t.parent_id)
        .unwrap_or(ROOT_ID);
    let parent_path: Path = match space.path_to(parent) {
        Some(parent_simple) => parent_simple.into(),
        None => Path::root(),
    };

    let container = match space.attribute_child_id(parent, "=archive") {
        Some(existing) => existing,
        None => {
            let created = create_thought(
                space,
                ctx,
                CreateThought {
                    parent: parent_path.clone(),
                    value: "=archive".to_string(),
                    rank: None,
                    id: None,
                    created: None,
                },
            )?;
            match created {
                Some(container) => container,
                // The parent rejected the container; the alert slot
                // already says why.
                None => return Ok(()),
            }
        }
    };

    let rank = next_rank(space, container);
    move_thought(
        space,
        ctx,
        MoveThought {
            old_path: payload.path.clone(),
            new_path: parent_path.append(container).append(id),
            new_rank: rank,
            skip_rerank: false,
        },
    )?;

    debug!("event=archive_thought module=ops status=ok id={id} container={container}");
    Ok(())
}
