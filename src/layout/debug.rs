use ahash::HashSet;

use super::{ItemId, ItemKind, LayoutTree};

fn debug_tree_summary(tree: &LayoutTree, max_nodes: usize) -> String {
    let root = tree.root;
    let total_items = tree.items.len();
    let mut seen: HashSet<ItemId> = HashSet::default();
    let mut stack: Vec<(ItemId, usize)> = vec![(root, 0)];
    let mut lines: Vec<String> = Vec::new();

    while let Some((id, depth)) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let indent = "  ".repeat(depth);
        let Some(item) = tree.items.get(&id) else {
            lines.push(format!("{indent}{id:?} MISSING"));
            continue;
        };

        let visible = item.visible;
        let rect = item.rect;
        match &item.kind {
            ItemKind::Root => {
                lines.push(format!("{indent}{id:?} Root rect={rect:?}"));
            }
            ItemKind::RowOrColumn(linear) => {
                let shares: Vec<Option<f32>> = item
                    .children
                    .iter()
                    .filter_map(|c| tree.items.get(c))
                    .map(|c| c.size_on(linear.axis))
                    .collect();
                lines.push(format!(
                    "{indent}{id:?} {:?} visible={visible} shares={shares:?}",
                    item.item_type()
                ));
            }
            ItemKind::Stack(state) => {
                lines.push(format!(
                    "{indent}{id:?} Stack visible={visible} active={:?} docked={}",
                    state.active,
                    state.is_docked()
                ));
            }
            ItemKind::Component(component) => {
                lines.push(format!(
                    "{indent}{id:?} Component({}) visible={visible} rect={rect:?}",
                    component.component_type
                ));
            }
        }
        // Reversed so children print in order.
        stack.extend(item.children.iter().rev().map(|&c| (c, depth + 1)));

        if lines.len() >= max_nodes {
            break;
        }
    }

    format!(
        "root={root:?} reachable={} total={total_items}\n{}",
        seen.len(),
        lines.join("\n")
    )
}

impl LayoutTree {
    /// A human-readable dump of at most `max_nodes` items, for logs and bug reports.
    pub fn debug_summary(&self, max_nodes: usize) -> String {
        debug_tree_summary(self, max_nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ItemConfig, LayoutConfig, LayoutTree};

    #[test]
    fn summary_lists_items_in_order() {
        let config = LayoutConfig::new(ItemConfig::row(vec![
            ItemConfig::component("a"),
            ItemConfig::component("b"),
        ]));
        let tree = LayoutTree::new(config).unwrap();
        let summary = tree.debug_summary(64);
        let a = summary.find("Component(a)").unwrap();
        let b = summary.find("Component(b)").unwrap();
        assert!(a < b, "{summary}");
        assert!(summary.starts_with("root="), "{summary}");
        assert!(summary.contains("total=6"), "{summary}");
    }
}
