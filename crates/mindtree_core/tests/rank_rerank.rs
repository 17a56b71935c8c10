use mindtree_core::{
    create_thought, move_thought, rerank, CreateThought, EngineContext, MoveThought, Path,
    ThoughtId, ThoughtSpace, RANK_EPSILON, ROOT_ID,
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

fn values_in_order(space: &ThoughtSpace, parent: ThoughtId) -> Vec<String> {
    space
        .children(parent)
        .into_iter()
        .map(|t| t.value.clone())
        .collect()
}

#[test]
fn fractional_insertions_rerank_to_consecutive_integers() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();

    // a and e first, then d, c, b by repeated halving toward a.
    add(&mut space, &mut ctx, &root, "a", Some(0.0));
    add(&mut space, &mut ctx, &root, "e", Some(1.0));
    add(&mut space, &mut ctx, &root, "d", Some(0.5));
    add(&mut space, &mut ctx, &root, "c", Some(0.25));
    add(&mut space, &mut ctx, &root, "b", Some(0.125));

    assert_eq!(values_in_order(&space, ROOT_ID), ["a", "b", "c", "d", "e"]);

    rerank(&mut space, &mut ctx, &root).unwrap();

    assert_eq!(values_in_order(&space, ROOT_ID), ["a", "b", "c", "d", "e"]);
    let ranks: Vec<f64> = space.children(ROOT_ID).iter().map(|t| t.rank).collect();
    assert_eq!(ranks, [0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn rerank_is_idempotent() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    for (value, rank) in [("x", 0.0), ("y", 0.75), ("z", 0.875)] {
        add(&mut space, &mut ctx, &root, value, Some(rank));
    }

    rerank(&mut space, &mut ctx, &root).unwrap();
    let first: Vec<f64> = space.children(ROOT_ID).iter().map(|t| t.rank).collect();
    rerank(&mut space, &mut ctx, &root).unwrap();
    let second: Vec<f64> = space.children(ROOT_ID).iter().map(|t| t.rank).collect();

    assert_eq!(first, [0.0, 1.0, 2.0]);
    assert_eq!(first, second);
}

#[test]
fn epsilon_convergence_triggers_automatic_rerank_on_move() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    let a = add(&mut space, &mut ctx, &root, "a", Some(0.0));
    add(&mut space, &mut ctx, &root, "b", Some(1.0));
    let c = add(&mut space, &mut ctx, &root, "c", Some(2.0));

    // Drop c just above a, closer than the precision epsilon.
    move_thought(
        &mut space,
        &mut ctx,
        MoveThought {
            old_path: root.append(c),
            new_path: root.append(c),
            new_rank: RANK_EPSILON / 2.0,
            skip_rerank: false,
        },
    )
    .unwrap();

    assert_eq!(values_in_order(&space, ROOT_ID), ["a", "c", "b"]);
    let ranks: Vec<f64> = space.children(ROOT_ID).iter().map(|t| t.rank).collect();
    assert_eq!(ranks, [0.0, 1.0, 2.0]);
    assert_eq!(space.thought(a).unwrap().rank, 0.0);
}
