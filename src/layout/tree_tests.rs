use std::cell::{Cell, RefCell};
use std::rc::Rc;

use egui::Vec2;

use super::{
    EventName, ItemConfig, ItemId, ItemType, LayoutConfig, LayoutError, LayoutTree, LeafUpdate,
    TreeOp,
};

fn laid_out(root: ItemConfig) -> LayoutTree {
    LayoutTree::with_size(LayoutConfig::new(root), Vec2::new(800.0, 600.0)).unwrap()
}

fn top(tree: &LayoutTree) -> ItemId {
    tree.get(tree.root()).unwrap().children()[0]
}

fn children(tree: &LayoutTree, id: ItemId) -> Vec<ItemId> {
    tree.get(id).unwrap().children().to_vec()
}

fn widths(tree: &LayoutTree, id: ItemId) -> Vec<f32> {
    children(tree, id)
        .iter()
        .map(|&c| tree.get(c).unwrap().width().unwrap())
        .collect()
}

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 0.01, "{actual:?} vs {expected:?}");
    }
}

fn first_component(tree: &LayoutTree, stack: ItemId) -> ItemId {
    children(tree, stack)[0]
}

#[test]
fn components_in_rows_are_wrapped_in_stacks() {
    let tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a").with_width(30.0),
        ItemConfig::component("b").with_width(70.0),
    ]));
    let row = top(&tree);
    assert_eq!(tree.get(row).unwrap().item_type(), ItemType::Row);

    for (stack, width) in children(&tree, row).into_iter().zip([30.0, 70.0]) {
        let item = tree.get(stack).unwrap();
        assert_eq!(item.item_type(), ItemType::Stack);
        assert_eq!(item.width(), Some(width));
        let component = tree.get(first_component(&tree, stack)).unwrap();
        assert!(component.is_component());
        assert_eq!(component.width(), None);
    }
    assert!(tree.integrity_issues().is_empty(), "{:?}", tree.integrity_issues());
}

#[test]
fn a_new_child_gets_an_equal_share() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
    ]));
    let row = top(&tree);
    let added = tree.add_item(row, ItemConfig::component("c"), None).unwrap();

    assert!(tree.get(added).unwrap().is_stack());
    assert_eq!(children(&tree, row)[2], added);
    let third = 100.0 / 3.0;
    assert_close(&widths(&tree, row), &[third, third, third]);
}

#[test]
fn a_declared_size_is_kept_and_the_others_make_room() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
    ]));
    let row = top(&tree);
    tree.add_item(row, ItemConfig::component("c").with_width(20.0), Some(0))
        .unwrap();
    assert_close(&widths(&tree, row), &[20.0, 40.0, 40.0]);
}

#[test]
fn removal_hands_the_share_back_proportionally() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a").with_width(20.0),
        ItemConfig::component("b").with_width(30.0),
        ItemConfig::component("c").with_width(50.0),
    ]));
    let row = top(&tree);
    let last = children(&tree, row)[2];
    tree.remove(last).unwrap();

    assert!(!tree.contains(last));
    assert_close(&widths(&tree, row), &[40.0, 60.0]);
}

#[test]
fn an_emptied_stack_closes_itself() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
        ItemConfig::component("c"),
    ]));
    let row = top(&tree);
    let middle = children(&tree, row)[1];
    let component = first_component(&tree, middle);

    tree.remove(component).unwrap();

    assert!(!tree.contains(component));
    assert!(!tree.contains(middle));
    assert_eq!(children(&tree, row).len(), 2);
    assert_close(&widths(&tree, row), &[50.0, 50.0]);
}

#[test]
fn a_row_left_with_one_child_is_replaced_by_it() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
    ]));
    let row = top(&tree);
    let [keep, gone] = children(&tree, row)[..] else {
        panic!("expected two children");
    };

    tree.remove(gone).unwrap();

    assert!(!tree.contains(row));
    assert_eq!(top(&tree), keep);
    assert_eq!(tree.get(keep).unwrap().parent(), Some(tree.root()));
    assert!(tree.integrity_issues().is_empty(), "{:?}", tree.integrity_issues());
}

#[test]
fn an_unclosable_row_survives_with_one_child() {
    let mut tree = laid_out(
        ItemConfig::row(vec![ItemConfig::component("a"), ItemConfig::component("b")])
            .closable(false),
    );
    let row = top(&tree);
    let gone = children(&tree, row)[1];
    tree.remove(gone).unwrap();

    assert_eq!(top(&tree), row);
    assert_eq!(children(&tree, row).len(), 1);
}

#[test]
fn removing_the_active_tab_activates_its_predecessor() {
    let mut tree = laid_out(
        ItemConfig::stack(vec![
            ItemConfig::component("a"),
            ItemConfig::component("b"),
            ItemConfig::component("c"),
        ])
        .with_active_item_index(2),
    );
    let stack = top(&tree);
    let [a, b, c] = children(&tree, stack)[..] else {
        panic!("expected three tabs");
    };
    assert_eq!(tree.active_content_item(stack), Ok(Some(c)));
    assert!(!tree.get(b).unwrap().is_visible());
    tree.take_leaf_updates();

    tree.remove(c).unwrap();
    assert_eq!(tree.active_content_item(stack), Ok(Some(b)));
    let updates = tree.take_leaf_updates();
    assert!(updates.contains(&LeafUpdate::Destroyed(c)), "{updates:?}");
    assert!(updates.contains(&LeafUpdate::Shown(b)), "{updates:?}");

    tree.set_active_content_item(stack, a).unwrap();
    tree.remove(a).unwrap();
    assert_eq!(tree.active_content_item(stack), Ok(Some(b)));
}

#[test]
fn switching_tabs_hides_the_previous_one() {
    let mut tree = laid_out(ItemConfig::stack(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
    ]));
    let stack = top(&tree);
    let [a, b] = children(&tree, stack)[..] else {
        panic!("expected two tabs");
    };
    tree.take_leaf_updates();

    tree.set_active_content_item(stack, b).unwrap();
    let updates = tree.take_leaf_updates();
    assert!(updates.contains(&LeafUpdate::Hidden(a)), "{updates:?}");
    assert!(updates.contains(&LeafUpdate::Shown(b)), "{updates:?}");
    assert!(!tree.get(a).unwrap().is_visible());

    let outsider = tree.create_item(ItemConfig::component("x")).unwrap();
    assert_eq!(
        tree.set_active_content_item(stack, outsider),
        Err(LayoutError::NotAChild {
            parent: stack,
            child: outsider
        })
    );
}

#[test]
fn replace_child_takes_over_the_sizes() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a").with_width(25.0),
        ItemConfig::component("b").with_width(75.0),
    ]));
    let row = top(&tree);
    let old = children(&tree, row)[0];
    let new = tree
        .create_item(ItemConfig::column(vec![ItemConfig::component("c")]))
        .unwrap();

    tree.replace_child(row, old, new, true).unwrap();

    assert!(!tree.contains(old));
    assert_eq!(children(&tree, row)[0], new);
    assert_eq!(tree.get(new).unwrap().width(), Some(25.0));
    assert_eq!(tree.get(new).unwrap().parent(), Some(row));
}

#[test]
fn invalid_insertions_are_rejected() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
    ]));
    let row = top(&tree);
    let stack = children(&tree, row)[0];
    let component = first_component(&tree, stack);
    let len = tree.len();

    let leaf = tree.create_item(ItemConfig::component("x")).unwrap();
    assert_eq!(
        tree.add_child(component, leaf, None),
        Err(LayoutError::LeafCannotHaveChildren(component))
    );

    let nested = tree.create_item(ItemConfig::stack(vec![])).unwrap();
    assert_eq!(
        tree.add_child(stack, nested, None),
        Err(LayoutError::InvalidInsertion {
            parent: stack,
            child: nested
        })
    );

    // Attached items must be removed first.
    assert!(tree.add_child(row, stack, None).is_err());

    tree.destroy(leaf);
    tree.destroy(nested);
    assert_eq!(tree.len(), len);

    assert_eq!(
        tree.add_item(tree.root(), ItemConfig::component("y"), None),
        Err(LayoutError::RootAlreadyHasChild)
    );
    assert_eq!(tree.len(), len);
}

#[test]
fn the_root_cannot_be_destroyed() {
    let mut tree = laid_out(ItemConfig::component("a"));
    let root = tree.root();
    assert!(tree.call_downwards(root, TreeOp::Destroy, true, false).is_err());
    assert!(tree.remove(root).is_err());

    tree.call_downwards(root, TreeOp::Destroy, true, true).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 1);
}

#[test]
fn ids_and_queries() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a").with_id("editor"),
        ItemConfig::component("b"),
    ]));
    let editor = tree.items_by_id("editor");
    assert_eq!(editor.len(), 1);
    assert!(tree.get(editor[0]).unwrap().is_component());

    let other = first_component(&tree, children(&tree, top(&tree))[1]);
    tree.add_id(other, "editor").unwrap();
    tree.add_id(other, "editor").unwrap();
    assert_eq!(tree.get(other).unwrap().ids(), ["editor"]);
    assert_eq!(tree.items_by_id("editor"), vec![editor[0], other]);

    tree.remove_id(other, "editor").unwrap();
    assert!(!tree.has_id(other, "editor"));
    assert_eq!(
        tree.remove_id(other, "editor"),
        Err(LayoutError::IdNotFound {
            item: other,
            id: "editor".to_owned()
        })
    );

    assert_eq!(tree.items_by_type(ItemType::Stack).len(), 2);
    assert_eq!(tree.items_by_type(ItemType::Root), vec![tree.root()]);
}

#[test]
fn ids_are_never_reused() {
    let mut tree = laid_out(ItemConfig::stack(vec![ItemConfig::component("a")]));
    let stack = top(&tree);
    let a = first_component(&tree, stack);
    tree.remove(a).unwrap();
    let b = tree
        .add_item(tree.root(), ItemConfig::component("b"), None)
        .unwrap();
    assert!(b > a);
    assert!(b > stack);
    assert!(tree.get(a).is_none());
}

#[test]
fn state_changes_reach_global_listeners_once_per_frame() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
    ]));
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    tree.on(EventName::StateChanged, move |_| sink.set(sink.get() + 1));

    let row = top(&tree);
    tree.add_item(row, ItemConfig::component("c"), None).unwrap();
    tree.add_item(row, ItemConfig::component("d"), None).unwrap();
    assert_eq!(count.get(), 0);
    assert!(tree.has_pending_frame_tasks());

    tree.on_animation_frame();
    assert_eq!(count.get(), 1);
    assert!(!tree.has_pending_frame_tasks());

    tree.on_animation_frame();
    assert_eq!(count.get(), 1);
}

#[test]
fn item_listeners_can_stop_propagation() {
    let mut tree = laid_out(ItemConfig::stack(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
    ]));
    let stack = top(&tree);
    let b = children(&tree, stack)[1];

    let global = Rc::new(Cell::new(0));
    let sink = Rc::clone(&global);
    tree.on(EventName::ActiveContentItemChanged, move |_| {
        sink.set(sink.get() + 1);
    });

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    tree.on_item(stack, EventName::ActiveContentItemChanged, move |event| {
        log.borrow_mut().push(event.origin);
        event.stop_propagation();
    })
    .unwrap();

    tree.set_active_content_item(stack, b).unwrap();
    assert_eq!(*seen.borrow(), vec![stack]);
    assert_eq!(global.get(), 0);
}

#[test]
fn events_bubble_through_ancestors() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::stack(vec![ItemConfig::component("a"), ItemConfig::component("b")]),
        ItemConfig::component("c"),
    ]));
    let row = top(&tree);
    let stack = children(&tree, row)[0];
    let b = children(&tree, stack)[1];

    let at_row = Rc::new(Cell::new(0));
    let sink = Rc::clone(&at_row);
    tree.on_item(row, EventName::ActiveContentItemChanged, move |event| {
        assert!(!event.is_propagation_stopped());
        sink.set(sink.get() + 1);
    })
    .unwrap();
    let global = Rc::new(Cell::new(0));
    let sink = Rc::clone(&global);
    tree.on(EventName::ActiveContentItemChanged, move |_| sink.set(sink.get() + 1));

    tree.set_active_content_item(stack, b).unwrap();
    assert_eq!(at_row.get(), 1);
    assert_eq!(global.get(), 1);
}

#[test]
fn destruction_is_announced() {
    let mut tree = laid_out(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
        ItemConfig::component("c"),
    ]));
    let destroyed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&destroyed);
    tree.on(EventName::ItemDestroyed, move |event| {
        sink.borrow_mut().push(event.origin);
    });

    let row = top(&tree);
    let stack = children(&tree, row)[2];
    let component = first_component(&tree, stack);
    tree.remove(stack).unwrap();

    assert_eq!(*destroyed.borrow(), vec![component, stack]);
    assert!(
        tree.take_leaf_updates()
            .contains(&LeafUpdate::Destroyed(component))
    );
}

#[test]
fn init_announces_every_item() {
    let mut tree = LayoutTree::new(LayoutConfig::new(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::component("b"),
    ])))
    .unwrap();
    let created = Rc::new(Cell::new(0));
    let sink = Rc::clone(&created);
    tree.on(EventName::ItemCreated, move |_| sink.set(sink.get() + 1));
    let initialised = Rc::new(Cell::new(false));
    let flag = Rc::clone(&initialised);
    tree.on(EventName::Initialised, move |_| flag.set(true));

    tree.init();
    assert_eq!(created.get(), tree.len());
    assert!(initialised.get());

    // A second call is a no-op.
    tree.init();
    assert_eq!(created.get(), tree.len());
}

#[test]
fn nothing_is_laid_out_before_init() {
    let mut tree = LayoutTree::new(LayoutConfig::new(ItemConfig::component("a"))).unwrap();
    tree.update_size(Vec2::new(100.0, 100.0));
    let stack = top(&tree);
    assert!(!tree.get(stack).unwrap().rect().is_finite());
    assert!(tree.take_leaf_updates().is_empty());
}
