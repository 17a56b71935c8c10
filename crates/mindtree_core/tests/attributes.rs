use mindtree_core::{
    create_thought, delete_attribute, set_descendant, toggle_attribute, AttributeChain,
    CreateThought, EngineContext, Path, ThoughtId, ThoughtSpace,
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
) -> ThoughtId {
    create_thought(
        space,
        ctx,
        CreateThought {
            parent: parent.clone(),
            value: value.to_string(),
            rank: None,
            id: None,
            created: None,
        },
    )
    .unwrap()
    .unwrap()
}

fn chain(path: &Path, values: &[&str]) -> AttributeChain {
    AttributeChain {
        path: Some(path.clone()),
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

#[test]
fn set_then_delete_attribute_chain() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    let subject = add(&mut space, &mut ctx, &root, "subject");
    let subject_path = root.append(subject);

    set_descendant(&mut space, &mut ctx, chain(&subject_path, &["=test", "hello"])).unwrap();
    assert!(space.has_attribute(subject, "=test"));
    assert_eq!(space.attribute(subject, "=test").as_deref(), Some("hello"));

    let before = space.len();
    delete_attribute(&mut space, &mut ctx, chain(&subject_path, &["=test"])).unwrap();
    assert!(!space.has_attribute(subject, "=test"));
    assert_eq!(space.attribute(subject, "=test"), None);
    // Both the attribute node and its value child are gone.
    assert_eq!(space.len(), before - 2);
}

#[test]
fn at_most_one_child_per_attribute_name() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    let subject = add(&mut space, &mut ctx, &root, "subject");
    let subject_path = root.append(subject);

    let first = add(&mut space, &mut ctx, &subject_path, "=pin");
    let second = add(&mut space, &mut ctx, &subject_path, "=pin");
    assert_eq!(first, second);
    assert_eq!(
        space
            .children(subject)
            .iter()
            .filter(|t| t.value == "=pin")
            .count(),
        1
    );
}

#[test]
fn toggle_sets_then_clears_and_prunes_intermediates() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    let subject = add(&mut space, &mut ctx, &root, "subject");
    let subject_path = root.append(subject);

    toggle_attribute(&mut space, &mut ctx, chain(&subject_path, &["=flag", "on"])).unwrap();
    assert_eq!(space.attribute(subject, "=flag").as_deref(), Some("on"));

    // Toggling the same tail again clears it and prunes the emptied
    // `=flag` intermediate.
    toggle_attribute(&mut space, &mut ctx, chain(&subject_path, &["=flag", "on"])).unwrap();
    assert!(!space.has_attribute(subject, "=flag"));
}

#[test]
fn set_overwrites_the_designated_slot_in_place() {
    let (mut space, mut ctx) = setup();
    let root = Path::root();
    let subject = add(&mut space, &mut ctx, &root, "subject");
    let subject_path = root.append(subject);

    set_descendant(
        &mut space,
        &mut ctx,
        chain(&subject_path, &["=style", "color", "blue"]),
    )
    .unwrap();
    set_descendant(
        &mut space,
        &mut ctx,
        chain(&subject_path, &["=style", "color", "red"]),
    )
    .unwrap();

    // Still one `=style` chain, with the tail rewritten in place.
    let styles: Vec<_> = space
        .children(subject)
        .into_iter()
        .filter(|t| t.value == "=style")
        .map(|t| t.id)
        .collect();
    assert_eq!(styles.len(), 1);
    let color = space.children(styles[0]);
    assert_eq!(color.len(), 1);
    assert_eq!(color[0].value, "color");
    let shades = space.children(color[0].id);
    assert_eq!(shades.len(), 1);
    assert_eq!(shades[0].value, "red");
}

#[test]
fn missing_path_is_a_silent_noop() {
    let (mut space, mut ctx) = setup();
    let before = space.len();
    set_descendant(
        &mut space,
        &mut ctx,
        AttributeChain {
            path: None,
            values: vec!["=test".to_string(), "hello".to_string()],
        },
    )
    .unwrap();
    assert_eq!(space.len(), before);
}
