//! Attribute chain toggling.
//!
//! # Responsibility
//! - Walk a value chain (for example `["=style", "color", "blue"]`) one
//!   level per step, creating, overwriting, or deleting the designated
//!   node at each level.
//!
//! # Invariants
//! - A context never holds two direct children with the same attribute
//!   name; the attribute-keyed child map enforces this.
//! - Deleting the tail of a chain prunes intermediates emptied by the
//!   deletion on the way back up.
//! - A missing path is a silent no-op, never an error.

use crate::error::EngineResult;
use crate::model::lexeme::normalize;
use crate::model::path::Path;
use crate::model::thought::{is_attribute_value, ThoughtId};
use crate::ops::create::{create_thought, CreateThought};
use crate::ops::delete::{delete_thought, DeleteThought};
use crate::ops::edit::{edit_thought, EditThought};
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::debug;

/// A chain of values to walk from the context at `path`.
#[derive(Debug, Clone)]
pub struct AttributeChain {
    /// `None` means no selection; the op silently does nothing.
    pub path: Option<Path>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainMode {
    Set,
    Delete,
    Toggle,
}

/// Flips the tail of the chain: deletes the designated node when it
/// already holds the final value, creates or overwrites it otherwise.
pub fn toggle_attribute(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: AttributeChain,
) -> EngineResult<()> {
    run_chain(space, ctx, payload, ChainMode::Toggle)
}

/// Walks the chain and deletes its tail, pruning emptied intermediates.
pub fn delete_attribute(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: AttributeChain,
) -> EngineResult<()> {
    run_chain(space, ctx, payload, ChainMode::Delete)
}

/// Walks the chain creating or overwriting every level, never deleting.
pub fn set_descendant(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: AttributeChain,
) -> EngineResult<()> {
    run_chain(space, ctx, payload, ChainMode::Set)
}

fn run_chain(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    payload: AttributeChain,
    mode: ChainMode,
) -> EngineResult<()> {
    let Some(path) = payload.path else {
        return Ok(());
    };
    if payload.values.is_empty() {
        return Ok(());
    }
    let simple = simplify_path(space, &path)?;
    walk(space, ctx, &simple.as_path(), &payload.values, mode)?;
    if ctx.debug {
        debug!(
            "event=attribute_chain module=ops status=ok mode={mode:?} chain={}",
            payload.values.join("/")
        );
    }
    Ok(())
}

/// One level of the chain. Returns `true` when this level still has a
/// node after the step, so callers can prune emptied intermediates.
fn walk(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    context_path: &Path,
    values: &[String],
    mode: ChainMode,
) -> EngineResult<bool> {
    let Some((value, rest)) = values.split_first() else {
        return Ok(true);
    };
    let context_id = context_path.head();
    let existing = designated_child(space, context_id, value);

    if rest.is_empty() {
        let matches = existing
            .and_then(|id| space.thought(id))
            .map(|t| normalize(&t.value) == normalize(value))
            .unwrap_or(false);
        return match mode {
            ChainMode::Delete => {
                if let Some(id) = existing.filter(|_| matches) {
                    delete_thought(
                        space,
                        ctx,
                        DeleteThought {
                            path: context_path.append(id),
                        },
                    )?;
                }
                Ok(false)
            }
            ChainMode::Toggle if matches => {
                if let Some(id) = existing {
                    delete_thought(
                        space,
                        ctx,
                        DeleteThought {
                            path: context_path.append(id),
                        },
                    )?;
                }
                Ok(false)
            }
            ChainMode::Set | ChainMode::Toggle => {
                Ok(ensure(space, ctx, context_path, existing, value)?.is_some())
            }
        };
    }

    match mode {
        ChainMode::Set | ChainMode::Toggle => {
            let Some(id) = ensure(space, ctx, context_path, existing, value)? else {
                return Ok(true);
            };
            walk(space, ctx, &context_path.append(id), rest, mode)?;
            // The tail toggle may have emptied this intermediate.
            let id_alive = space.thought(id).is_some();
            let emptied = id_alive && space.children_ids(id).is_empty();
            if mode == ChainMode::Toggle && emptied {
                delete_thought(
                    space,
                    ctx,
                    DeleteThought {
                        path: context_path.append(id),
                    },
                )?;
                return Ok(false);
            }
            Ok(true)
        }
        ChainMode::Delete => {
            let matched = existing.filter(|id| {
                space
                    .thought(*id)
                    .map(|t| normalize(&t.value) == normalize(value))
                    .unwrap_or(false)
            });
            let Some(id) = matched else {
                return Ok(true);
            };
            walk(space, ctx, &context_path.append(id), rest, mode)?;
            if space.thought(id).is_some() && space.children_ids(id).is_empty() {
                delete_thought(
                    space,
                    ctx,
                    DeleteThought {
                        path: context_path.append(id),
                    },
                )?;
                return Ok(false);
            }
            Ok(true)
        }
    }
}

/// The node a chain value addresses under `context_id`: the uniquely
/// keyed attribute child for `=` names, the designated first child
/// otherwise.
fn designated_child(
    space: &ThoughtSpace,
    context_id: ThoughtId,
    value: &str,
) -> Option<ThoughtId> {
    if is_attribute_value(value) {
        space.attribute_child_id(context_id, value)
    } else {
        space.first_child_id(context_id)
    }
}

/// Makes the designated node hold `value`, editing the slot in place or
/// creating it. Returns the node id, or `None` when the context
/// rejected the creation.
fn ensure(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    context_path: &Path,
    existing: Option<ThoughtId>,
    value: &str,
) -> EngineResult<Option<ThoughtId>> {
    if let Some(id) = existing {
        let holds = space
            .thought(id)
            .map(|t| t.value == value)
            .unwrap_or(false);
        if !holds {
            edit_thought(
                space,
                ctx,
                EditThought {
                    path: context_path.append(id),
                    new_value: value.to_string(),
                },
            )?;
            // The edit can merge the slot into a same-name sibling.
            if space.thought(id).is_none() {
                return Ok(designated_child(space, context_path.head(), value));
            }
        }
        return Ok(Some(id));
    }
    create_thought(
        space,
        ctx,
        CreateThought {
            parent: context_path.clone(),
            value: value.to_string(),
            rank: None,
            id: None,
            created: None,
        },
    )
}
