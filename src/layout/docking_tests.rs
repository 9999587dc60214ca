use std::cell::RefCell;
use std::rc::Rc;

use egui::Vec2;

use super::{EventName, ItemConfig, ItemId, LayoutConfig, LayoutError, LayoutTree, Side};

fn three_columns() -> (LayoutTree, ItemId, [ItemId; 3]) {
    let tree = LayoutTree::with_size(
        LayoutConfig::new(ItemConfig::row(vec![
            ItemConfig::component("a").with_width(20.0),
            ItemConfig::component("b").with_width(30.0),
            ItemConfig::component("c").with_width(50.0),
        ])),
        Vec2::new(1000.0, 500.0),
    )
    .unwrap();
    let row = tree.get(tree.root()).unwrap().children()[0];
    let stacks: [ItemId; 3] = tree.get(row).unwrap().children().try_into().unwrap();
    (tree, row, stacks)
}

fn widths(tree: &LayoutTree, stacks: &[ItemId]) -> Vec<f32> {
    stacks
        .iter()
        .map(|&s| tree.get(s).unwrap().width().unwrap())
        .collect()
}

fn pixel_widths(tree: &LayoutTree, stacks: &[ItemId]) -> Vec<f32> {
    stacks
        .iter()
        .map(|&s| tree.get(s).unwrap().rect().width())
        .collect()
}

fn assert_close(actual: &[f32], expected: &[f32]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 0.01, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn docking_collapses_to_the_header_and_scales_the_others() {
    let (mut tree, row, [a, b, c]) = three_columns();
    assert_eq!(pixel_widths(&tree, &[a, b, c]), vec![198.0, 297.0, 495.0]);

    tree.dock(a, None, false).unwrap();

    let stack = tree.get(a).unwrap().stack().unwrap();
    let docker = stack.docker().unwrap();
    assert_eq!(docker.size, 20.0);
    assert_eq!(docker.real_size, 178.0);
    assert_eq!(stack.header().side(), Side::Left);

    assert_close(&widths(&tree, &[b, c]), &[37.5, 62.5]);
    assert_eq!(pixel_widths(&tree, &[a, b, c]), vec![20.0, 366.0, 609.0]);

    let splitters = tree.get(row).unwrap().row_or_column().unwrap().splitters();
    assert!(!splitters[0].visible);
    assert!(splitters[1].visible);

    let component = tree.get(a).unwrap().children()[0];
    assert!(!tree.get(component).unwrap().is_visible());
    assert!(tree.integrity_issues().is_empty(), "{:?}", tree.integrity_issues());
}

#[test]
fn undocking_gives_back_the_original_shares() {
    let (mut tree, _, [a, b, c]) = three_columns();
    tree.dock(a, Some(true), false).unwrap();
    tree.dock(a, Some(false), false).unwrap();

    assert!(!tree.get(a).unwrap().is_docked());
    assert_close(&widths(&tree, &[a, b, c]), &[20.0, 30.0, 50.0]);
    assert_eq!(pixel_widths(&tree, &[a, b, c]), vec![198.0, 297.0, 495.0]);

    let component = tree.get(a).unwrap().children()[0];
    assert!(tree.get(component).unwrap().is_visible());
}

#[test]
fn asking_for_the_current_state_is_a_no_op() {
    let (mut tree, _, [a, b, c]) = three_columns();
    tree.dock(a, Some(false), false).unwrap();
    assert_close(&widths(&tree, &[a, b, c]), &[20.0, 30.0, 50.0]);
}

#[test]
fn the_last_undocked_child_stays_undocked() {
    let (mut tree, row, [a, b, c]) = three_columns();
    tree.dock(a, None, false).unwrap();
    tree.dock(b, None, false).unwrap();
    assert_eq!(
        tree.get(b).unwrap().stack().unwrap().header().side(),
        Side::Right
    );
    assert_close(&widths(&tree, &[c]), &[100.0]);

    assert_eq!(
        tree.dock(c, None, false),
        Err(LayoutError::CannotDockLast { container: row })
    );

    let header = tree.get(c).unwrap().stack().unwrap().header().clone();
    assert!(!header.is_dockable());
    assert!(!header.is_closable());
    assert!(tree.get(a).unwrap().stack().unwrap().header().is_dockable());
}

#[test]
fn only_stacks_in_rows_or_columns_dock() {
    let (mut tree, _, [a, ..]) = three_columns();
    let component = tree.get(a).unwrap().children()[0];
    assert_eq!(
        tree.dock(component, None, false),
        Err(LayoutError::NotAStack(component))
    );

    let mut tree = LayoutTree::with_size(
        LayoutConfig::new(ItemConfig::stack(vec![ItemConfig::component("a")])),
        Vec2::new(100.0, 100.0),
    )
    .unwrap();
    let stack = tree.get(tree.root()).unwrap().children()[0];
    assert_eq!(tree.dock(stack, None, false), Err(LayoutError::NotDockable(stack)));
    assert!(!tree.get(stack).unwrap().stack().unwrap().header().is_dockable());

    let mut tree = LayoutTree::with_size(
        LayoutConfig::new(ItemConfig::column(vec![ItemConfig::component("a")])),
        Vec2::new(100.0, 100.0),
    )
    .unwrap();
    let column = tree.get(tree.root()).unwrap().children()[0];
    let stack = tree.get(column).unwrap().children()[0];
    assert_eq!(
        tree.dock(stack, None, false),
        Err(LayoutError::CannotDockSingleChild { container: column })
    );
}

#[test]
fn columns_dock_to_the_top_or_bottom() {
    let mut tree = LayoutTree::with_size(
        LayoutConfig::new(ItemConfig::column(vec![
            ItemConfig::component("a"),
            ItemConfig::component("b"),
        ])),
        Vec2::new(300.0, 605.0),
    )
    .unwrap();
    let column = tree.get(tree.root()).unwrap().children()[0];
    let [top, bottom]: [ItemId; 2] = tree.get(column).unwrap().children().try_into().unwrap();

    tree.dock(bottom, None, false).unwrap();
    assert_eq!(
        tree.get(bottom).unwrap().stack().unwrap().header().side(),
        Side::Bottom
    );
    assert_eq!(tree.get(bottom).unwrap().rect().height(), 20.0);
    // The splitter next to the docked stack is hidden, so the rest goes to the top stack.
    assert_eq!(tree.get(top).unwrap().rect().height(), 585.0);
}

#[test]
fn removing_a_docked_stack_leaves_the_shares_alone() {
    let (mut tree, _, [a, b, c]) = three_columns();
    tree.dock(a, None, false).unwrap();
    tree.remove(a).unwrap();
    assert_close(&widths(&tree, &[b, c]), &[37.5, 62.5]);
}

#[test]
fn removing_the_last_undocked_child_undocks_the_rest() {
    let (mut tree, row, [a, b, c]) = three_columns();
    tree.dock(a, None, false).unwrap();
    tree.dock(b, None, false).unwrap();
    tree.remove(c).unwrap();

    assert_eq!(tree.get(row).unwrap().children(), [a, b]);
    assert!(!tree.get(a).unwrap().is_docked());
    assert!(!tree.get(b).unwrap().is_docked());
    assert_close(&widths(&tree, &[a, b]), &[50.0, 50.0]);
    assert!(tree.integrity_issues().is_empty(), "{:?}", tree.integrity_issues());
}

#[test]
fn docking_is_announced() {
    let (mut tree, _, [a, ..]) = three_columns();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for name in [EventName::Docked, EventName::Undocked] {
        let sink = Rc::clone(&seen);
        tree.on(name, move |event| sink.borrow_mut().push((event.name, event.origin)));
    }

    tree.dock(a, None, false).unwrap();
    tree.dock(a, None, false).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![(EventName::Docked, a), (EventName::Undocked, a)]
    );
}

#[test]
fn docked_state_survives_a_config_round_trip() {
    let (mut tree, _, [a, ..]) = three_columns();
    tree.dock(a, None, false).unwrap();

    let config = tree.to_config();
    let restored = LayoutTree::with_size(config.clone(), Vec2::new(1000.0, 500.0)).unwrap();
    let row = restored.get(restored.root()).unwrap().children()[0];
    let first = restored.get(row).unwrap().children()[0];
    let docker = restored.get(first).unwrap().stack().unwrap().docker().copied();
    assert_eq!(docker.map(|d| d.size), Some(20.0));
    assert_eq!(restored.get(first).unwrap().rect().width(), 20.0);
    assert_eq!(restored.to_config(), config);
}
