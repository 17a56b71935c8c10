use mindtree_core::{
    create_thought, move_thought, resolve_sort_preference, set_descendant, toggle_sort, AlertKind,
    AttributeChain, CreateThought, EngineContext, MoveThought, Path, SortDirection, SortType,
    ThoughtId, ThoughtSpace, ROOT_ID,
};

fn setup() -> (ThoughtSpace, EngineContext) {
    (
        ThoughtSpace::new(),
        EngineContext::deterministic("tester", 0),
    )
}

fn add(
    space: &mut ThoughtSpace,
    ctx: &mut EngineContext,
    parent: &Path,
    value: &str,
    rank: Option<f64>,
) -> ThoughtId {
    create_thought(
        space,
        ctx,
        CreateThought {
            parent: parent.clone(),
            value: value.to_string(),
            rank,
            id: None,
            created: None,
        },
    )
    .unwrap()
    .unwrap()
}

fn visible_values(space: &ThoughtSpace, parent: ThoughtId) -> Vec<String> {
    space
        .visible_children(parent)
        .into_iter()
        .map(|t| t.value.clone())
        .collect()
}

#[test]
fn toggle_cycle_sorts_then_restores_manual_order() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    let c = add(&mut space, &mut ctx, &root, "c", Some(0.0));
    let a = add(&mut space, &mut ctx, &root, "a", Some(1.0));
    let b = add(&mut space, &mut ctx, &root, "b", Some(2.0));

    // First toggle: alphabetical ascending, ranks rewritten.
    toggle_sort(&mut space, &mut ctx, &root).unwrap();
    let pref = resolve_sort_preference(&space, ROOT_ID);
    assert_eq!(pref.kind, SortType::Alphabetical);
    assert_eq!(pref.direction, Some(SortDirection::Asc));
    assert_eq!(visible_values(&space, ROOT_ID), ["a", "b", "c"]);

    // Second toggle: same comparator, descending.
    toggle_sort(&mut space, &mut ctx, &root).unwrap();
    let pref = resolve_sort_preference(&space, ROOT_ID);
    assert_eq!(pref.direction, Some(SortDirection::Desc));
    assert_eq!(visible_values(&space, ROOT_ID), ["c", "b", "a"]);

    // Third toggle: back to manual order, original ranks restored.
    toggle_sort(&mut space, &mut ctx, &root).unwrap();
    let pref = resolve_sort_preference(&space, ROOT_ID);
    assert_eq!(pref.kind, SortType::None);
    assert_eq!(visible_values(&space, ROOT_ID), ["c", "a", "b"]);
    assert_eq!(space.thought(c).unwrap().rank, 0.0);
    assert_eq!(space.thought(a).unwrap().rank, 1.0);
    assert_eq!(space.thought(b).unwrap().rank, 2.0);
    assert!(!space.has_attribute(ROOT_ID, "=sort"));
}

#[test]
fn sorted_insert_lands_at_comparator_position() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    add(&mut space, &mut ctx, &root, "apple", Some(0.0));
    add(&mut space, &mut ctx, &root, "cherry", Some(1.0));
    toggle_sort(&mut space, &mut ctx, &root).unwrap();

    add(&mut space, &mut ctx, &root, "banana", None);
    assert_eq!(
        visible_values(&space, ROOT_ID),
        ["apple", "banana", "cherry"]
    );
}

#[test]
fn manual_move_violating_sort_disables_the_preference() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    add(&mut space, &mut ctx, &root, "a", Some(0.0));
    add(&mut space, &mut ctx, &root, "b", Some(1.0));
    let z = add(&mut space, &mut ctx, &root, "z", Some(2.0));
    toggle_sort(&mut space, &mut ctx, &root).unwrap();
    assert_eq!(visible_values(&space, ROOT_ID), ["a", "b", "z"]);

    // Dragging z above a contradicts the alphabetical order.
    move_thought(
        &mut space,
        &mut ctx,
        MoveThought {
            old_path: root.append(z),
            new_path: root.append(z),
            new_rank: -1.0,
            skip_rerank: false,
        },
    )
    .unwrap();

    assert!(!space.has_attribute(ROOT_ID, "=sort"));
    let alert = space.take_alert().unwrap();
    assert_eq!(alert.kind, AlertKind::SortDisabled);
    assert_eq!(visible_values(&space, ROOT_ID), ["z", "a", "b"]);
    assert!(!resolve_sort_preference(&space, ROOT_ID).is_sorted());
}

#[test]
fn temporal_sort_set_directly_places_new_thoughts_first() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    add(&mut space, &mut ctx, &root, "earliest", Some(0.0));
    add(&mut space, &mut ctx, &root, "earlier", Some(1.0));

    // The temporal types are not on the toggle cycle; they are set by
    // writing the attribute chain directly.
    set_descendant(
        &mut space,
        &mut ctx,
        AttributeChain {
            path: Some(root.clone()),
            values: vec![
                "=sort".to_string(),
                "Created".to_string(),
                "Desc".to_string(),
            ],
        },
    )
    .unwrap();
    let pref = resolve_sort_preference(&space, ROOT_ID);
    assert_eq!(pref.kind, SortType::Created);
    assert_eq!(pref.direction, Some(SortDirection::Desc));

    // Newest-first: a fresh thought lands ahead of every sibling.
    add(&mut space, &mut ctx, &root, "newest", None);
    assert_eq!(
        visible_values(&space, ROOT_ID),
        ["newest", "earliest", "earlier"]
    );
}

#[test]
fn empty_value_keeps_its_rank_under_alphabetical_sort() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    let alpha = add(&mut space, &mut ctx, &root, "alpha", Some(0.0));
    let beta = add(&mut space, &mut ctx, &root, "beta", Some(1.0));
    toggle_sort(&mut space, &mut ctx, &root).unwrap();

    // An actively typed empty thought must not jump to an edge.
    let blank = add(&mut space, &mut ctx, &root, "", Some(0.5));
    let rank = space.thought(blank).unwrap().rank;
    assert!(rank > space.thought(alpha).unwrap().rank);
    assert!(rank < space.thought(beta).unwrap().rank);
}
