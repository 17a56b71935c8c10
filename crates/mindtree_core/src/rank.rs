//! Fractional rank allocator.
//!
//! # Responsibility
//! - Compute insertion ranks by midpoint between adjacent siblings, or
//!   by ±1 extrapolation at a boundary.
//! - Detect when repeated midpoint insertion has exhausted float
//!   precision so the mutation engine can trigger a rerank.
//!
//! # Invariants
//! - Rank values only establish a strict order among siblings; their
//!   absolute value is never meaningful.
//! - `needs_rerank` fires whenever two adjacent sibling ranks sit
//!   closer than `RANK_EPSILON`.

use crate::error::{EngineError, EngineResult};
use crate::model::path::SimplePath;
use crate::model::thought::ThoughtId;
use crate::state::space::ThoughtSpace;

/// Adjacent ranks closer than this have exhausted usable precision.
pub const RANK_EPSILON: f64 = 1e-7;

/// Midpoint of two ranks.
pub(crate) fn mid(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

/// Rank that places a new thought immediately before the target.
///
/// Midpoint with the preceding sibling, or one below the first sibling
/// at the front boundary.
pub fn rank_before(space: &ThoughtSpace, target: &SimplePath) -> EngineResult<f64> {
    let (siblings, index) = locate(space, target)?;
    let target_rank = siblings[index].1;
    Ok(if index == 0 {
        target_rank - 1.0
    } else {
        mid(siblings[index - 1].1, target_rank)
    })
}

/// Rank that places a new thought immediately after the target.
pub fn rank_after(space: &ThoughtSpace, target: &SimplePath) -> EngineResult<f64> {
    let (siblings, index) = locate(space, target)?;
    let target_rank = siblings[index].1;
    Ok(if index == siblings.len() - 1 {
        target_rank + 1.0
    } else {
        mid(target_rank, siblings[index + 1].1)
    })
}

/// Rank strictly before every existing child of `parent`.
///
/// Used for new attribute intermediates, which sit ahead of the first
/// real sibling.
pub fn prev_rank(space: &ThoughtSpace, parent: ThoughtId) -> f64 {
    space
        .children(parent)
        .first()
        .map(|first| first.rank - 1.0)
        .unwrap_or(0.0)
}

/// Rank after every existing child of `parent`.
pub fn next_rank(space: &ThoughtSpace, parent: ThoughtId) -> f64 {
    space
        .children(parent)
        .last()
        .map(|last| last.rank + 1.0)
        .unwrap_or(0.0)
}

/// Whether any adjacent sibling pair under `parent` has converged
/// below the precision epsilon.
pub fn needs_rerank(space: &ThoughtSpace, parent: ThoughtId) -> bool {
    let children = space.children(parent);
    children
        .windows(2)
        .any(|pair| (pair[1].rank - pair[0].rank).abs() < RANK_EPSILON)
}

fn locate(
    space: &ThoughtSpace,
    target: &SimplePath,
) -> EngineResult<(Vec<(ThoughtId, f64)>, usize)> {
    let id = target.head();
    let parent = target.parent_id();
    let siblings: Vec<(ThoughtId, f64)> = space
        .children(parent)
        .into_iter()
        .map(|child| (child.id, child.rank))
        .collect();
    let index = siblings
        .iter()
        .position(|(sibling, _)| *sibling == id)
        .ok_or(EngineError::ThoughtNotFound(id))?;
    Ok((siblings, index))
}
