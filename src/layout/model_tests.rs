use egui::{Pos2, Vec2};

use super::{
    DragEvent, DragSource, ItemConfig, ItemId, ItemType, LayoutConfig, LayoutTree, Traversal,
};

fn assert_tree_ok(tree: &LayoutTree, context: &str) {
    let issues = tree.integrity_issues();
    assert!(
        issues.is_empty(),
        "tree integrity failed ({context}):\n{}\n{}",
        issues.join("\n"),
        tree.debug_summary(64)
    );
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    fn next_u64(&mut self) -> u64 {
        // Simple LCG: deterministic, fast, no dependency.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        ((self.next_u64() >> 33) as usize) % upper
    }

    fn next_bool(&mut self) -> bool {
        (self.next_u64() >> 40) & 1 != 0
    }

    fn next_f32(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        lo + (hi - lo) * unit
    }

    fn pick(&mut self, ids: &[ItemId]) -> Option<ItemId> {
        if ids.is_empty() {
            None
        } else {
            Some(ids[self.next_usize(ids.len())])
        }
    }
}

fn random_config(rng: &mut Rng, counter: &mut usize) -> ItemConfig {
    let mut leaf = || {
        *counter += 1;
        ItemConfig::component(format!("c{counter}"))
    };
    match rng.next_usize(5) {
        0 | 1 => leaf(),
        2 => ItemConfig::stack(vec![leaf(), leaf()]),
        3 => ItemConfig::row(vec![leaf(), leaf()]),
        _ => ItemConfig::column(vec![leaf(), leaf(), leaf()]),
    }
}

fn attached(tree: &LayoutTree, filter: impl Fn(ItemType) -> bool) -> Vec<ItemId> {
    tree.subtree(tree.root(), Traversal::PreOrder)
        .into_iter()
        .filter(|&id| tree.get(id).is_some_and(|item| filter(item.item_type())))
        .collect()
}

fn random_pos(rng: &mut Rng, tree: &LayoutTree) -> Pos2 {
    let rect = tree.root_rect();
    Pos2::new(
        rng.next_f32(rect.min.x - 20.0, rect.max.x + 20.0),
        rng.next_f32(rect.min.y - 20.0, rect.max.y + 20.0),
    )
}

fn random_step(rng: &mut Rng, tree: &mut LayoutTree, counter: &mut usize) -> &'static str {
    match rng.next_usize(9) {
        0 | 1 => {
            let parents = attached(tree, |t| t != ItemType::Component);
            let Some(parent) = rng.pick(&parents) else {
                return "add (no parent)";
            };
            let config = random_config(rng, counter);
            let index = rng.next_bool().then(|| rng.next_usize(4));
            // Rejections (full root, stack into stack) leave the tree unchanged.
            let _ = tree.add_item(parent, config, index);
            "add"
        }
        2 => {
            let items = attached(tree, |t| t != ItemType::Root);
            if let Some(item) = rng.pick(&items) {
                tree.remove(item).unwrap();
            }
            "remove"
        }
        3 => {
            let stacks = attached(tree, |t| t == ItemType::Stack);
            if let Some(stack) = rng.pick(&stacks) {
                let _ = tree.dock(stack, None, rng.next_bool());
            }
            "dock"
        }
        4 => {
            let stacks = attached(tree, |t| t == ItemType::Stack);
            if let Some(stack) = rng.pick(&stacks) {
                let tabs = tree.get(stack).unwrap().children().to_vec();
                if let Some(tab) = rng.pick(&tabs) {
                    tree.set_active_content_item(stack, tab).unwrap();
                }
            }
            "activate"
        }
        5 => {
            let items = attached(tree, |t| t != ItemType::Root);
            let source = if rng.next_usize(4) == 0 {
                DragSource::External(random_config(rng, counter))
            } else if let Some(item) = rng.pick(&items) {
                DragSource::Item(item)
            } else {
                return "drag (nothing)";
            };
            let from = random_pos(rng, tree);
            tree.handle_drag_event(&source, DragEvent::Start { pos: from })
                .unwrap();
            for _ in 0..rng.next_usize(3) {
                let to = random_pos(rng, tree);
                tree.handle_drag_event(&source, DragEvent::Drag { delta: to - from })
                    .unwrap();
            }
            let _ = tree.handle_drag_event(&source, DragEvent::Stop);
            assert!(!tree.is_dragging());
            "drag item"
        }
        6 => {
            let containers = attached(tree, |t| matches!(t, ItemType::Row | ItemType::Column));
            let Some(container) = rng.pick(&containers) else {
                return "splitter (none)";
            };
            let count = tree.get(container).unwrap().children().len();
            let index = rng.next_usize(count.max(1));
            let source = DragSource::Splitter { container, index };
            if tree
                .handle_drag_event(&source, DragEvent::Start { pos: Pos2::ZERO })
                .is_ok()
            {
                let delta = Vec2::new(rng.next_f32(-400.0, 400.0), rng.next_f32(-400.0, 400.0));
                tree.handle_drag_event(&source, DragEvent::Drag { delta })
                    .unwrap();
                tree.handle_drag_event(&source, DragEvent::Stop).unwrap();
            }
            "drag splitter"
        }
        7 => {
            let items = attached(tree, |t| t != ItemType::Root);
            if let Some(item) = rng.pick(&items) {
                tree.toggle_maximise(item).unwrap();
            }
            "maximise"
        }
        _ => {
            let size = Vec2::new(rng.next_f32(50.0, 1400.0), rng.next_f32(50.0, 900.0));
            tree.update_size(size);
            "resize"
        }
    }
}

fn initial_layout() -> LayoutConfig {
    LayoutConfig::new(ItemConfig::row(vec![
        ItemConfig::component("a"),
        ItemConfig::column(vec![
            ItemConfig::component("b"),
            ItemConfig::stack(vec![ItemConfig::component("c"), ItemConfig::component("d")]),
        ]),
    ]))
}

#[test]
fn random_operations_keep_the_tree_consistent() {
    for seed in 0..48 {
        let mut rng = Rng::new(seed);
        let mut counter = 0;
        let mut tree = LayoutTree::with_size(initial_layout(), Vec2::new(1000.0, 700.0)).unwrap();
        assert_tree_ok(&tree, "initial");

        for step in 0..150 {
            let op = random_step(&mut rng, &mut tree, &mut counter);
            tree.on_animation_frame();
            assert_tree_ok(&tree, &format!("seed {seed} step {step} after {op}"));
        }
    }
}

#[test]
fn random_layouts_survive_a_config_round_trip() {
    for seed in 0..24 {
        let mut rng = Rng::new(1000 + seed);
        let mut counter = 0;
        let mut tree = LayoutTree::with_size(initial_layout(), Vec2::new(1000.0, 700.0)).unwrap();
        for _ in 0..60 {
            random_step(&mut rng, &mut tree, &mut counter);
            tree.on_animation_frame();
        }

        let config = tree.to_config();
        let rebuilt = LayoutTree::new(config.clone()).unwrap();
        assert_eq!(rebuilt.to_config(), config, "seed {seed}");
        assert_eq!(rebuilt.maximised().is_some(), tree.maximised().is_some());
        assert_eq!(rebuilt.len(), tree.len(), "seed {seed}");

        let laid_out = LayoutTree::with_size(config, tree.root_rect().size()).unwrap();
        assert_tree_ok(&laid_out, &format!("seed {seed} rebuilt"));
    }
}

#[cfg(feature = "serde")]
#[test]
fn configs_serialize_to_json_and_ron() {
    let mut tree = LayoutTree::with_size(initial_layout(), Vec2::new(1000.0, 700.0)).unwrap();
    let column = tree.get(tree.get(tree.root()).unwrap().children()[0]).unwrap().children()[1];
    let bottom = tree.get(column).unwrap().children()[1];
    tree.dock(bottom, None, false).unwrap();
    let tab = tree.get(bottom).unwrap().children()[1];
    tree.set_active_content_item(bottom, tab).unwrap();

    let config = tree.to_config();

    let json = serde_json::to_string_pretty(&config).unwrap();
    assert!(json.contains(r#""type": "column""#), "{json}");
    assert!(json.contains(r#""docked": true"#), "{json}");
    assert!(json.contains(r#""active_item_index": 1"#), "{json}");
    let from_json: LayoutConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(from_json, config);

    let ron = ron::to_string(&config).unwrap();
    let from_ron: LayoutConfig = ron::from_str(&ron).unwrap();
    assert_eq!(from_ron, config);

    let rebuilt = LayoutTree::new(from_json).unwrap();
    assert!(rebuilt.get(bottom).is_some_and(|item| item.is_docked()));
}

#[cfg(feature = "serde")]
#[test]
fn minimal_json_fills_in_defaults() {
    let json = r#"{
        "content": [{
            "type": "row",
            "content": [
                { "type": "component", "component_type": "editor", "width": 70 },
                { "type": "component", "component_type": "console" }
            ]
        }]
    }"#;
    let config: LayoutConfig = serde_json::from_str(json).unwrap();
    assert!(config.settings.has_headers);
    let tree = LayoutTree::with_size(config, Vec2::new(1005.0, 400.0)).unwrap();

    let row = tree.get(tree.root()).unwrap().children()[0];
    let widths: Vec<f32> = tree
        .get(row)
        .unwrap()
        .children()
        .iter()
        .map(|&s| tree.get(s).unwrap().rect().width())
        .collect();
    assert_eq!(widths, vec![700.0, 300.0]);
}
