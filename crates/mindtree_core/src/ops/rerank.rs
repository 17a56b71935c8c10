//! Rank renormalization.
//!
//! # Responsibility
//! - Rewrite a context's sibling ranks to consecutive integers once
//!   fractional midpoints converge below the precision epsilon.
//!
//! # Invariants
//! - Relative sibling order is preserved exactly; only the numeric
//!   values change.
//! - Each child is re-moved in place with `skip_rerank` so the epsilon
//!   scan cannot re-enter this op.

use crate::error::EngineResult;
use crate::model::path::Path;
use crate::ops::move_thought::{move_thought, MoveThought};
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::debug;

/// Rewrites every child rank under the context at `parent_path` to its
/// 0-based position in the current order.
pub fn rerank(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    parent_path: &Path,
) -> EngineResult<()> {
    let simple = simplify_path(space, parent_path)?;
    let parent = simple.head();
    let base = simple.as_path();
    let children = space.children_ids(parent);
    let count = children.len();
    let mut position = 0.0;
    for id in children {
        // A duplicate-value merge earlier in the loop can retire an id.
        if space.thought(id).is_none() {
            continue;
        }
        let location = base.append(id);
        move_thought(
            space,
            ctx,
            MoveThought {
                old_path: location.clone(),
                new_path: location,
                new_rank: position,
                skip_rerank: true,
            },
        )?;
        // The move itself can merge the thought away; a slot consumed
        // by a retired id would leave a gap in the sequence.
        if space.thought(id).is_some() {
            position += 1.0;
        }
    }

    if ctx.debug {
        debug!("event=rerank module=ops status=ok parent={parent} children={count}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::rerank;
    use crate::model::path::Path;
    use crate::model::thought::{Thought, ROOT_ID};
    use crate::state::context::EngineContext;
    use crate::state::space::ThoughtSpace;
    use uuid::Uuid;

    fn seed(space: &mut ThoughtSpace, n: u128, value: &str, rank: f64) -> Uuid {
        let id = Uuid::from_u128(n);
        space.add_thought(Thought::new(id, value, rank, Some(ROOT_ID), 100, "test"));
        id
    }

    #[test]
    fn mid_loop_merge_leaves_no_rank_gap() {
        let mut space = ThoughtSpace::new();
        let mut ctx = EngineContext::deterministic("test", 1_000);
        let keeper = seed(&mut space, 11, "same", 0.25);
        let duplicate = seed(&mut space, 12, "same", 0.5);
        let tail = seed(&mut space, 13, "z", 0.75);

        rerank(&mut space, &mut ctx, &Path::root()).unwrap();

        // The later duplicate merges into the earlier sibling during
        // its own re-move; the survivors still end up consecutive.
        assert!(space.thought(duplicate).is_none());
        assert_eq!(space.thought(keeper).unwrap().rank, 0.0);
        assert_eq!(space.thought(tail).unwrap().rank, 1.0);
    }
}
