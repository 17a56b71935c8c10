//! Neutral tree import.
//!
//! # Responsibility
//! - Load an externally parsed tree of `ImportNode`s under an existing
//!   context through the ordinary create pipeline, so every import
//!   observes the same duplicate and policy rules as manual entry.

use crate::error::EngineResult;
use crate::model::path::Path;
use crate::model::thought::Timestamp;
use crate::ops::create::{create_thought, CreateThought};
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::{debug, info};
use serde::Deserialize;

/// One node of an import payload. Produced by external format parsers;
/// the engine only consumes the neutral shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportNode {
    pub value: String,
    #[serde(default)]
    pub children: Vec<ImportNode>,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

/// Imports `nodes` as children of the context at `parent_path`.
///
/// Sibling ranks are sequential in payload order; given timestamps are
/// preserved. Returns the number of thoughts created.
pub fn import_tree(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    parent_path: &Path,
    nodes: &[ImportNode],
) -> EngineResult<usize> {
    let simple = simplify_path(space, parent_path)?;
    let count = import_level(space, ctx, &simple.as_path(), nodes)?;
    info!(
        "event=import_tree module=import status=ok parent={} thoughts={count}",
        simple.head()
    );
    Ok(count)
}

fn import_level(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    parent_path: &Path,
    nodes: &[ImportNode],
) -> EngineResult<usize> {
    let mut count = 0;
    for node in nodes {
        let created = create_thought(
            space,
            ctx,
            CreateThought {
                parent: parent_path.clone(),
                value: node.value.clone(),
                rank: None,
                id: None,
                created: node.created,
            },
        )?;
        // A duplicate sibling absorbs the node through the create path;
        // `None` means the context refused the insertion outright.
        let Some(id) = created else {
            debug!(
                "event=import_skip module=import status=warn parent={}",
                parent_path
            );
            continue;
        };
        count += 1;
        if let Some(stamp) = node.last_updated {
            if let Some(thought) = space.thought_mut(id) {
                thought.last_updated = stamp;
            }
        }
        count += import_level(space, ctx, &parent_path.append(id), &node.children)?;
    }
    Ok(count)
}
