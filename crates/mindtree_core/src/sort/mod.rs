//! Sort engine: preference resolution, comparators, and permasort.
//!
//! # Responsibility
//! - Resolve per-context sort preferences from the `=sort` attribute
//!   chain.
//! - Compute comparator-dictated insertion ranks.
//! - Apply permasort (rank rewriting) and drive the toggle state
//!   machine, including manual-rank memory.
//!
//! # Invariants
//! - Applying a sort rewrites rank fields; it is never display-only.
//! - Turning sort off restores the manual ranks recorded when it was
//!   turned on, for every still-existing child.
//! - Empty-value thoughts are never pinned to an edge by the
//!   alphabetical comparator.

pub mod preference;

use crate::error::EngineResult;
use crate::model::lexeme::normalize;
use crate::model::path::Path;
use crate::model::thought::{Thought, ThoughtId};
use crate::ops::attributes::{delete_attribute, set_descendant, AttributeChain};
use crate::ops::rerank::rerank;
use crate::rank::{self, needs_rerank};
use crate::state::context::EngineContext;
use crate::state::space::ThoughtSpace;
use crate::view::context_view::simplify_path;
use log::debug;
use preference::{SortDirection, SortPreference, SortType};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Resolves the active sort preference of a context from its `=sort`
/// attribute chain, falling back to the space default.
pub fn resolve_sort_preference(space: &ThoughtSpace, id: ThoughtId) -> SortPreference {
    let Some(type_label) = space.attribute(id, "=sort") else {
        return space.sort_default;
    };
    let kind = SortType::parse(&type_label).unwrap_or(SortType::None);
    if kind == SortType::None {
        return SortPreference::default();
    }
    let direction = space
        .attribute_child_id(id, "=sort")
        .and_then(|sort_id| space.first_child_id(sort_id))
        .and_then(|type_id| space.first_child_id(type_id))
        .and_then(|direction_id| space.thought(direction_id))
        .and_then(|thought| SortDirection::parse(&thought.value))
        .unwrap_or(SortDirection::Asc);
    SortPreference::new(kind, Some(direction))
}

/// Insertion rank dictated by the active comparator.
///
/// `exclude` is the moving thought (absent for creation); for the
/// temporal types the touched thought always lands at the correct
/// temporal extreme. An empty value under alphabetical sort keeps its
/// current rank so an actively-typed thought does not jump.
pub fn sorted_rank(
    space: &ThoughtSpace,
    parent: ThoughtId,
    exclude: Option<ThoughtId>,
    value: &str,
    current_rank: Option<f64>,
    pref: SortPreference,
) -> f64 {
    let siblings: Vec<&Thought> = space
        .visible_children(parent)
        .into_iter()
        .filter(|sibling| Some(sibling.id) != exclude)
        .collect();
    let Some(last) = siblings.last() else {
        return 0.0;
    };
    let after_last = last.rank + 1.0;
    let descending = pref.direction == Some(SortDirection::Desc);

    match pref.kind {
        SortType::None => after_last,
        SortType::Created | SortType::Updated => {
            if descending {
                siblings[0].rank - 1.0
            } else {
                after_last
            }
        }
        SortType::Alphabetical if value.trim().is_empty() => {
            current_rank.unwrap_or(after_last)
        }
        SortType::Alphabetical | SortType::Note => {
            let note = exclude.and_then(|id| space.attribute(id, "=note"));
            for (index, sibling) in siblings.iter().enumerate() {
                let ordering =
                    subject_cmp(space, pref, value, note.as_deref(), sibling);
                if ordering == Ordering::Less {
                    let previous = if index == 0 {
                        sibling.rank - 1.0
                    } else {
                        siblings[index - 1].rank
                    };
                    return rank::mid(previous, sibling.rank);
                }
            }
            after_last
        }
    }
}

/// Whether placing `moving` at `requested` would break the active
/// comparator order relative to its would-be neighbors.
pub(crate) fn violates_sort(
    space: &ThoughtSpace,
    parent: ThoughtId,
    moving: ThoughtId,
    requested: f64,
    pref: SortPreference,
) -> bool {
    let Some(subject) = space.thought(moving) else {
        return false;
    };
    if pref.kind == SortType::Alphabetical && subject.value.trim().is_empty() {
        return false;
    }
    let siblings: Vec<&Thought> = space
        .visible_children(parent)
        .into_iter()
        .filter(|sibling| sibling.id != moving)
        .collect();
    let previous = siblings.iter().rev().find(|s| s.rank < requested);
    let next = siblings.iter().find(|s| s.rank > requested);
    if let Some(previous) = previous {
        if thought_cmp(space, pref, subject, previous) == Ordering::Less {
            return true;
        }
    }
    if let Some(next) = next {
        if thought_cmp(space, pref, subject, next) == Ordering::Greater {
            return true;
        }
    }
    false
}

/// Applies the active preference destructively: every non-attribute
/// child's rank becomes its 0-based position in comparator order
/// (permasort). Attribute children compact into negative ranks ahead of
/// the list, preserving their relative order.
pub fn sort(space: &mut ThoughtSpace, parent: ThoughtId) {
    let pref = resolve_sort_preference(space, parent);
    if !pref.is_sorted() {
        return;
    }

    let children = space.children_ids(parent);
    let mut attribute_ids = Vec::new();
    let mut filled = Vec::new();
    let mut empties: Vec<(ThoughtId, f64)> = Vec::new();
    for id in children {
        let Some(thought) = space.thought(id) else {
            continue;
        };
        if thought.is_attribute() {
            attribute_ids.push(id);
        } else if thought.value.trim().is_empty() {
            empties.push((id, thought.rank));
        } else {
            filled.push((id, thought.rank));
        }
    }

    filled.sort_by(|(a, _), (b, _)| {
        match (space.thought(*a), space.thought(*b)) {
            (Some(left), Some(right)) => thought_cmp(space, pref, left, right)
                .then_with(|| left.id.cmp(&right.id)),
            _ => Ordering::Equal,
        }
    });

    // Empty-value thoughts re-enter near their pre-sort rank position
    // instead of pinning to an edge.
    let mut ordered = filled;
    for (id, old_rank) in empties {
        let position = ordered
            .iter()
            .filter(|(_, other_rank)| *other_rank < old_rank)
            .count();
        ordered.insert(position.min(ordered.len()), (id, old_rank));
    }

    let attribute_count = attribute_ids.len() as f64;
    for (offset, id) in attribute_ids.into_iter().enumerate() {
        if let Some(thought) = space.thought_mut(id) {
            thought.rank = offset as f64 - attribute_count;
        }
    }
    for (position, (id, _)) in ordered.into_iter().enumerate() {
        if let Some(thought) = space.thought_mut(id) {
            thought.rank = position as f64;
        }
    }
}

/// One step of the sort toggle state machine for the context at `path`.
///
/// Entering a sorted state snapshots the context's manual ranks;
/// returning to manual order restores them for still-existing children
/// and reranks only when restored ranks collide with ranks assigned
/// while sorted.
pub fn toggle_sort(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    path: &Path,
) -> EngineResult<()> {
    let simple = simplify_path(space, path)?;
    let parent = simple.head();
    let current = resolve_sort_preference(space, parent);
    let next = current.cycled();

    if !current.is_sorted() && next.is_sorted() {
        let snapshot: HashMap<ThoughtId, f64> = space
            .children(parent)
            .into_iter()
            .filter(|child| !child.is_attribute())
            .map(|child| (child.id, child.rank))
            .collect();
        space.manual_ranks.insert(parent, snapshot);
    }

    if next.is_sorted() {
        let mut values = vec!["=sort".to_string(), next.kind.label().to_string()];
        if let Some(direction) = next.direction {
            values.push(direction.label().to_string());
        }
        set_descendant(
            space,
            ctx,
            AttributeChain {
                path: Some(simple.as_path()),
                values,
            },
        )?;
        sort(space, parent);
    } else {
        delete_attribute(
            space,
            ctx,
            AttributeChain {
                path: Some(simple.as_path()),
                values: vec!["=sort".to_string()],
            },
        )?;
        if let Some(snapshot) = space.manual_ranks.remove(&parent) {
            for (id, manual_rank) in snapshot {
                let restorable = space
                    .thought(id)
                    .map(|thought| thought.parent_id == Some(parent))
                    .unwrap_or(false);
                if restorable {
                    if let Some(thought) = space.thought_mut(id) {
                        thought.rank = manual_rank;
                    }
                }
            }
        }
        if needs_rerank(space, parent) {
            rerank(space, ctx, &simple.as_path())?;
        }
    }

    debug!(
        "event=toggle_sort module=sort status=ok context={parent} type={} direction={:?}",
        next.kind.label(),
        next.direction
    );
    Ok(())
}

/// Direction-adjusted comparator over two existing thoughts.
pub(crate) fn thought_cmp(
    space: &ThoughtSpace,
    pref: SortPreference,
    a: &Thought,
    b: &Thought,
) -> Ordering {
    let ordering = match pref.kind {
        SortType::None => Ordering::Equal,
        SortType::Alphabetical => normalize(&a.value).cmp(&normalize(&b.value)),
        SortType::Created => a.created.cmp(&b.created),
        SortType::Updated => a.last_updated.cmp(&b.last_updated),
        SortType::Note => note_cmp(
            space.attribute(a.id, "=note").as_deref(),
            space.attribute(b.id, "=note").as_deref(),
        ),
    };
    adjust(ordering, pref)
}

fn subject_cmp(
    space: &ThoughtSpace,
    pref: SortPreference,
    value: &str,
    note: Option<&str>,
    other: &Thought,
) -> Ordering {
    let ordering = match pref.kind {
        SortType::Alphabetical => normalize(value).cmp(&normalize(&other.value)),
        SortType::Note => note_cmp(note, space.attribute(other.id, "=note").as_deref()),
        _ => Ordering::Greater,
    };
    adjust(ordering, pref)
}

fn note_cmp(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => normalize(left).cmp(&normalize(right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn adjust(ordering: Ordering, pref: SortPreference) -> Ordering {
    if pref.direction == Some(SortDirection::Desc) {
        ordering.reverse()
    } else {
        ordering
    }
}

#[cfg(test)]
mod tests {
    use super::preference::{SortDirection, SortPreference, SortType};
    use super::{resolve_sort_preference, sort, sorted_rank};
    use crate::model::thought::{Thought, ROOT_ID};
    use crate::state::space::ThoughtSpace;
    use uuid::Uuid;

    fn seed(space: &mut ThoughtSpace, n: u128, value: &str, rank: f64) -> Uuid {
        let id = Uuid::from_u128(n);
        space.add_thought(Thought::new(id, value, rank, Some(ROOT_ID), 100, "test"));
        id
    }

    fn seed_at(space: &mut ThoughtSpace, n: u128, value: &str, rank: f64, created: i64) -> Uuid {
        let id = Uuid::from_u128(n);
        space.add_thought(Thought::new(id, value, rank, Some(ROOT_ID), created, "test"));
        id
    }

    fn seed_under(space: &mut ThoughtSpace, n: u128, value: &str, rank: f64, parent: Uuid) -> Uuid {
        let id = Uuid::from_u128(n);
        space.add_thought(Thought::new(id, value, rank, Some(parent), 100, "test"));
        id
    }

    /// Writes the `=sort` attribute chain the way the toggler lays it
    /// out: `=sort` -> type -> optional direction.
    fn seed_sort(space: &mut ThoughtSpace, n: u128, kind: &str, direction: Option<&str>) {
        seed(space, n, "=sort", -1.0);
        let sort_id = space.attribute_child_id(ROOT_ID, "=sort").expect("=sort");
        let type_id = seed_under(space, n + 1, kind, 0.0, sort_id);
        if let Some(direction) = direction {
            seed_under(space, n + 2, direction, 0.0, type_id);
        }
    }

    #[test]
    fn preference_defaults_to_manual_without_sort_attribute() {
        let space = ThoughtSpace::new();
        let pref = resolve_sort_preference(&space, ROOT_ID);
        assert_eq!(pref.kind, SortType::None);
    }

    #[test]
    fn sorted_rank_places_alphabetically_between_neighbors() {
        let mut space = ThoughtSpace::new();
        seed(&mut space, 1, "apple", 0.0);
        seed(&mut space, 2, "cherry", 1.0);
        let pref = SortPreference::new(SortType::Alphabetical, Some(SortDirection::Asc));
        let rank = sorted_rank(&space, ROOT_ID, None, "banana", None, pref);
        assert!(rank > 0.0 && rank < 1.0);
        let last = sorted_rank(&space, ROOT_ID, None, "zebra", None, pref);
        assert!(last > 1.0);
    }

    #[test]
    fn sorted_rank_keeps_empty_values_in_place() {
        let mut space = ThoughtSpace::new();
        let empty = seed(&mut space, 1, "", 0.5);
        seed(&mut space, 2, "alpha", 0.0);
        seed(&mut space, 3, "beta", 1.0);
        let pref = SortPreference::new(SortType::Alphabetical, Some(SortDirection::Asc));
        let rank = sorted_rank(&space, ROOT_ID, Some(empty), "", Some(0.5), pref);
        assert_eq!(rank, 0.5);
    }

    #[test]
    fn permasort_rewrites_ranks_to_positions() {
        let mut space = ThoughtSpace::new();
        let c = seed(&mut space, 1, "c", 0.0);
        let a = seed(&mut space, 2, "a", 1.0);
        let b = seed(&mut space, 3, "b", 2.0);
        seed(&mut space, 4, "=sort", -1.0);
        let sort_id = space.attribute_child_id(ROOT_ID, "=sort").expect("=sort");
        let type_id = Uuid::from_u128(5);
        space.add_thought(Thought::new(
            type_id,
            "Alphabetical",
            0.0,
            Some(sort_id),
            100,
            "test",
        ));

        sort(&mut space, ROOT_ID);

        assert_eq!(space.thought(a).expect("a").rank, 0.0);
        assert_eq!(space.thought(b).expect("b").rank, 1.0);
        assert_eq!(space.thought(c).expect("c").rank, 2.0);
        assert_eq!(space.visible_children_ids(ROOT_ID), vec![a, b, c]);
    }

    #[test]
    fn permasort_created_descending_orders_newest_first() {
        let mut space = ThoughtSpace::new();
        let old = seed_at(&mut space, 1, "old", 0.0, 50);
        let new = seed_at(&mut space, 2, "new", 1.0, 200);
        let mid = seed_at(&mut space, 3, "mid", 2.0, 120);
        seed_sort(&mut space, 10, "Created", Some("Desc"));

        sort(&mut space, ROOT_ID);

        assert_eq!(space.visible_children_ids(ROOT_ID), vec![new, mid, old]);
    }

    #[test]
    fn sorted_rank_places_touched_thoughts_at_the_temporal_extreme() {
        let mut space = ThoughtSpace::new();
        seed(&mut space, 1, "first", 0.0);
        seed(&mut space, 2, "second", 1.0);
        let touched = seed(&mut space, 3, "touched", 0.5);

        // Newest-first: ahead of the whole sibling list.
        let desc = SortPreference::new(SortType::Updated, Some(SortDirection::Desc));
        let front = sorted_rank(&space, ROOT_ID, Some(touched), "touched", None, desc);
        assert!(front < 0.0);

        // Oldest-first: the just-touched thought goes to the end.
        let asc = SortPreference::new(SortType::Created, Some(SortDirection::Asc));
        let back = sorted_rank(&space, ROOT_ID, Some(touched), "touched", None, asc);
        assert!(back > 1.0);
    }

    #[test]
    fn permasort_note_orders_by_note_text_with_noteless_last() {
        let mut space = ThoughtSpace::new();
        let by_beta = seed(&mut space, 1, "x", 0.0);
        let note = seed_under(&mut space, 2, "=note", -1.0, by_beta);
        seed_under(&mut space, 3, "beta", 0.0, note);
        let by_alpha = seed(&mut space, 4, "y", 1.0);
        let note = seed_under(&mut space, 5, "=note", -1.0, by_alpha);
        seed_under(&mut space, 6, "alpha", 0.0, note);
        let noteless = seed(&mut space, 7, "plain", 2.0);
        seed_sort(&mut space, 10, "Note", None);

        sort(&mut space, ROOT_ID);

        assert_eq!(
            space.visible_children_ids(ROOT_ID),
            vec![by_alpha, by_beta, noteless]
        );
    }
}
