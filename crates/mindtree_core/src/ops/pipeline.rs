//! Composite mutation pipelines.
//!
//! # Responsibility
//! - Fold an ordered list of tagged mutation steps over the space, so
//!   composite behaviors are data instead of bespoke call sequences.
//!
//! # Invariants
//! - Steps run strictly in order; each observes every prior step's
//!   state.
//! - The first fatal error aborts the fold; policy alerts do not.

use crate::error::EngineResult;
use crate::model::path::Path;
use crate::ops::archive::{archive_thought, ArchiveThought};
use crate::ops::attributes::{
    delete_attribute, set_descendant, toggle_attribute, AttributeChain,
};
use crate::ops::create::{create_thought, CreateThought};
use crate::ops::delete::{delete_thought, DeleteThought};
use crate::ops::edit::{edit_thought, EditThought};
use crate::ops::merge::merge_adjacent;
use crate::ops::move_thought::{move_thought, MoveThought};
use crate::ops::rerank::rerank;
use crate::ops::split::{split_thought, SplitThought};
use crate::sort::toggle_sort;
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use log::debug;

/// One tagged mutation step.
#[derive(Debug, Clone)]
pub enum Step {
    Create(CreateThought),
    Edit(EditThought),
    Move(MoveThought),
    Delete(DeleteThought),
    Archive(ArchiveThought),
    Split(SplitThought),
    MergeAdjacent { left: Path, right: Path },
    Rerank { parent: Path },
    ToggleSort { path: Path },
    ToggleAttribute(AttributeChain),
    DeleteAttribute(AttributeChain),
    SetDescendant(AttributeChain),
}

impl Step {
    fn tag(&self) -> &'static str {
        match self {
            Step::Create(_) => "create",
            Step::Edit(_) => "edit",
            Step::Move(_) => "move",
            Step::Delete(_) => "delete",
            Step::Archive(_) => "archive",
            Step::Split(_) => "split",
            Step::MergeAdjacent { .. } => "merge_adjacent",
            Step::Rerank { .. } => "rerank",
            Step::ToggleSort { .. } => "toggle_sort",
            Step::ToggleAttribute(_) => "toggle_attribute",
            Step::DeleteAttribute(_) => "delete_attribute",
            Step::SetDescendant(_) => "set_descendant",
        }
    }
}

/// Runs `steps` in order, stopping at the first fatal error.
pub fn run_pipeline(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    steps: Vec<Step>,
) -> EngineResult<()> {
    let count = steps.len();
    for (index, step) in steps.into_iter().enumerate() {
        if ctx.debug {
            debug!(
                "event=pipeline_step module=ops status=run step={} index={index} total={count}",
                step.tag()
            );
        }
        match step {
            Step::Create(payload) => {
                create_thought(space, ctx, payload)?;
            }
            Step::Edit(payload) => edit_thought(space, ctx, payload)?,
            Step::Move(payload) => move_thought(space, ctx, payload)?,
            Step::Delete(payload) => delete_thought(space, ctx, payload)?,
            Step::Archive(payload) => archive_thought(space, ctx, payload)?,
            Step::Split(payload) => {
                split_thought(space, ctx, payload)?;
            }
            Step::MergeAdjacent { left, right } => merge_adjacent(space, ctx, &left, &right)?,
            Step::Rerank { parent } => rerank(space, ctx, &parent)?,
            Step::ToggleSort { path } => toggle_sort(space, ctx, &path)?,
            Step::ToggleAttribute(payload) => toggle_attribute(space, ctx, payload)?,
            Step::DeleteAttribute(payload) => delete_attribute(space, ctx, payload)?,
            Step::SetDescendant(payload) => set_descendant(space, ctx, payload)?,
        }
    }
    Ok(())
}
