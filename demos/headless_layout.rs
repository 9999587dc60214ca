//! Drives a docking layout without any renderer: builds a Unity-like default layout, resizes it,
//! drags a tab around, docks a panel and prints what a host would read back.
//!
//! Run with `RUST_LOG=debug cargo run --example headless_layout` to see the engine's own logging.

use std::cell::Cell;
use std::rc::Rc;

use egui::{Pos2, Vec2};
use egui_dock_engine::{
    DockBuilder, DragEvent, DragSource, EventName, ItemId, ItemType, LayoutTree, LeafUpdate,
    SplitDirection,
};

fn unity_like_layout() -> egui_dock_engine::LayoutConfig {
    let mut b = DockBuilder::new();

    // +-------------+---------------------+-------------+
    // |             |  Scene View / Game  |             |
    // |  Hierarchy  |---------------------|  Inspector  |
    // |             |       Console       |             |
    // +-------------+---------------------+-------------+
    let dockspace = b.add_node();
    let (inspector, after_right) = b.split_node(dockspace, SplitDirection::Right, 0.25);
    let (hierarchy, center) = b.split_node(after_right, SplitDirection::Left, 0.3);
    let (console, scene) = b.split_node(center, SplitDirection::Down, 0.3);

    b.dock_component("hierarchy", hierarchy);
    b.dock_components(["scene_view", "game_view"], scene);
    b.dock_component("console", console);
    b.dock_component("inspector", inspector);

    b.finish(dockspace)
}

fn component(tree: &LayoutTree, component_type: &str) -> Option<ItemId> {
    tree.items_by_filter(|item| {
        item.component()
            .is_some_and(|state| state.component_type == component_type)
    })
    .into_iter()
    .next()
}

fn print_leaf_updates(tree: &mut LayoutTree) {
    for update in tree.take_leaf_updates() {
        match update {
            LeafUpdate::Resized { item, rect } => println!("  resized {item:?} -> {rect:?}"),
            LeafUpdate::Shown(item) => println!("  shown {item:?}"),
            LeafUpdate::Hidden(item) => println!("  hidden {item:?}"),
            LeafUpdate::Destroyed(item) => println!("  destroyed {item:?}"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut tree = LayoutTree::new(unity_like_layout())?;

    let state_changes = Rc::new(Cell::new(0));
    {
        let state_changes = Rc::clone(&state_changes);
        tree.on(EventName::StateChanged, move |_| {
            state_changes.set(state_changes.get() + 1);
        });
    }

    tree.init();
    tree.update_size(Vec2::new(1280.0, 720.0));
    tree.on_animation_frame();
    println!("initial layout:");
    print_leaf_updates(&mut tree);
    println!("{}", tree.debug_summary(64));

    // Drag the console tab onto the right edge of the inspector stack.
    if let (Some(console), Some(inspector)) =
        (component(&tree, "console"), component(&tree, "inspector"))
    {
        let start = tree
            .get(console)
            .map(|item| item.rect().center())
            .unwrap_or(Pos2::ZERO);
        let target = tree
            .get(inspector)
            .map(|item| item.rect().right_center() - Vec2::new(10.0, 0.0))
            .unwrap_or(Pos2::ZERO);

        let source = DragSource::Item(console);
        tree.handle_drag_event(&source, DragEvent::Start { pos: start })?;
        tree.handle_drag_event(&source, DragEvent::Drag { delta: target - start })?;
        if let Some(highlight) = tree.drop_highlight() {
            println!("drop highlight: {highlight:?}");
        }
        let outcome = tree.handle_drag_event(&source, DragEvent::Stop)?;
        println!("console drop: {outcome:?}");
    }

    // Drag the first splitter of the top-level row 100px to the right.
    let row = tree
        .get(tree.root())
        .and_then(|root| root.children().first().copied())
        .filter(|&top| tree.get(top).is_some_and(|item| item.item_type() == ItemType::Row));
    if let Some(row) = row {
        let source = DragSource::Splitter { container: row, index: 0 };
        tree.handle_drag_event(&source, DragEvent::Start { pos: Pos2::ZERO })?;
        tree.handle_drag_event(
            &source,
            DragEvent::Drag {
                delta: Vec2::new(100.0, 0.0),
            },
        )?;
        tree.handle_drag_event(&source, DragEvent::Stop)?;
    }

    // Collapse the hierarchy panel to its header.
    if let Some(stack) = component(&tree, "hierarchy").and_then(|item| tree.get(item)?.parent()) {
        tree.dock(stack, Some(true), false)?;
    }

    tree.on_animation_frame();
    println!("after drop, splitter drag and docking:");
    print_leaf_updates(&mut tree);
    println!("{}", tree.debug_summary(64));
    println!("state changes delivered: {}", state_changes.get());

    let integrity = tree.integrity_issues();
    if !integrity.is_empty() {
        log::warn!("layout integrity issues:\n{}", integrity.join("\n"));
    }

    println!("{}", serde_json::to_string_pretty(&tree.to_config())?);
    Ok(())
}
