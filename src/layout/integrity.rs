use std::hash::{Hash as _, Hasher as _};

use ahash::{HashMap, HashSet};
use itertools::Itertools as _;

use super::{ContentItem, ItemId, ItemKind, LayoutTree, RowOrColumnState};

/// Largest tolerated drift of a row's or column's percentages from 100.
///
/// The layout pass keeps a loaded total that rounds to 100 as it is, so such a container may sit
/// off 100 until something rewrites its shares.
const SHARE_EPSILON: f32 = 0.01;

pub(super) fn tree_integrity_issues(tree: &LayoutTree) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    let Some(root) = tree.items.get(&tree.root) else {
        issues.push(format!("integrity: root {:?} missing", tree.root));
        return issues;
    };
    if !root.is_root() || root.parent.is_some() {
        issues.push(format!("integrity: root {:?} is {:?} with parent {:?}", tree.root, root.item_type(), root.parent));
    }
    if root.children.len() > 1 {
        issues.push(format!("integrity: root holds {} children", root.children.len()));
    }

    let mut visited: HashSet<ItemId> = HashSet::default();
    let mut parent_of: HashMap<ItemId, ItemId> = HashMap::default();
    let mut stack: Vec<ItemId> = vec![tree.root];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            issues.push(format!("integrity: {id:?} reached twice"));
            continue;
        }
        let Some(item) = tree.items.get(&id) else {
            issues.push(format!("integrity: missing item {id:?} (reachable)"));
            continue;
        };

        let duplicates: Vec<&ItemId> = item.children.iter().duplicates().collect();
        if !duplicates.is_empty() {
            issues.push(format!("integrity: {id:?} contains duplicate children {duplicates:?}"));
        }

        for &child in &item.children {
            let Some(child_item) = tree.items.get(&child) else {
                issues.push(format!("integrity: {id:?} references missing child {child:?}"));
                continue;
            };
            if child_item.parent != Some(id) {
                issues.push(format!(
                    "integrity: child {child:?} of {id:?} points back at {:?}",
                    child_item.parent
                ));
            }
            if let Some(prev_parent) = parent_of.insert(child, id) {
                issues.push(format!(
                    "integrity: child {child:?} has multiple parents {prev_parent:?} and {id:?}"
                ));
            }
            stack.push(child);
        }

        check_kind(tree, id, item, &mut issues);
    }

    // Detached subtrees are fine, as long as their links are consistent.
    for (&id, item) in tree.items.iter().sorted_by_key(|(id, _)| **id) {
        if visited.contains(&id) {
            continue;
        }
        if let Some(parent) = item.parent {
            let linked = tree
                .items
                .get(&parent)
                .is_some_and(|p| p.children.contains(&id));
            if !linked {
                issues.push(format!(
                    "integrity: detached {id:?} points at parent {parent:?} which doesn't list it"
                ));
            }
        }
    }

    issues
}

fn check_kind(tree: &LayoutTree, id: ItemId, item: &ContentItem, issues: &mut Vec<String>) {
    match &item.kind {
        ItemKind::Root => {
            if id != tree.root {
                issues.push(format!("integrity: second root {id:?}"));
            }
        }
        ItemKind::Component(_) => {
            if !item.children.is_empty() {
                issues.push(format!("integrity: component {id:?} has children"));
            }
        }
        ItemKind::Stack(stack) => {
            match stack.active {
                Some(active) if !item.children.contains(&active) => issues.push(format!(
                    "integrity: stack {id:?} active {active:?} not in children={:?}",
                    item.children
                )),
                None if !item.children.is_empty() => {
                    issues.push(format!("integrity: stack {id:?} has tabs but none active"));
                }
                _ => {}
            }
            let nested = item
                .children
                .iter()
                .filter_map(|c| tree.items.get(c))
                .any(|c| c.is_stack() || c.is_root());
            if nested {
                issues.push(format!("integrity: stack {id:?} holds a stack"));
            }
            if stack.docker.is_some()
                && !item
                    .parent
                    .and_then(|p| tree.items.get(&p))
                    .is_some_and(ContentItem::is_row_or_column)
            {
                issues.push(format!("integrity: docked stack {id:?} outside a row or column"));
            }
        }
        ItemKind::RowOrColumn(linear) => {
            let shares: Vec<Option<f32>> = item
                .children
                .iter()
                .filter_map(|c| tree.items.get(c))
                .filter(|c| !c.is_docked())
                .map(|c| c.size_on(linear.axis))
                .collect();
            if shares.is_empty() {
                if !item.children.is_empty() {
                    issues.push(format!("integrity: {id:?} has only docked children"));
                }
                return;
            }
            // Shares are settled by the layout pass.
            if tree.is_initialised && item.rect.is_finite() {
                let sum: f32 = shares.iter().map(|s| s.unwrap_or(0.0)).sum();
                let as_loaded = linear.configured_total.is_some_and(|total| {
                    total.round() == 100.0 && (sum - total).abs() <= SHARE_EPSILON
                });
                if (sum - 100.0).abs() > SHARE_EPSILON && !as_loaded {
                    issues.push(format!("integrity: {id:?} shares sum to {sum} ({shares:?})"));
                }
                check_coverage(tree, id, item, linear, issues);
            }
        }
    }
}

/// Children plus splitters must tile the container exactly along its axis.
fn check_coverage(
    tree: &LayoutTree,
    id: ItemId,
    item: &ContentItem,
    linear: &RowOrColumnState,
    issues: &mut Vec<String>,
) {
    if tree.maximised.is_some() || linear.splitters.len() + 1 != item.children.len() {
        return;
    }
    let axis = linear.axis;
    let children: f32 = item
        .children
        .iter()
        .filter_map(|c| tree.items.get(c))
        .map(|c| axis.extent(c.rect.size()))
        .sum();
    let splitters: f32 = linear
        .splitters
        .iter()
        .map(|s| axis.extent(s.rect.size()))
        .sum();
    let extent = axis.extent(item.rect.size());
    if (children + splitters - extent).abs() > 0.5 {
        issues.push(format!(
            "integrity: {id:?} covers {children}+{splitters}px of {extent}px"
        ));
    }
}

pub(super) fn hash_issues(lines: &[String]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for line in lines {
        line.hash(&mut hasher);
    }
    hasher.finish()
}

impl LayoutTree {
    /// Structural problems in the tree, one line each. Empty when everything is consistent.
    pub fn integrity_issues(&self) -> Vec<String> {
        tree_integrity_issues(self)
    }

    /// Log the integrity issues at `warn` level, once per distinct set.
    pub fn log_integrity(&self, last_hash: &mut u64) {
        let issues = tree_integrity_issues(self);
        let hash = hash_issues(&issues);
        if hash == *last_hash {
            return;
        }
        *last_hash = hash;
        for issue in issues {
            log::warn!("{issue}");
        }
    }
}
