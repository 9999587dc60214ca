use std::collections::BTreeMap;

use crate::layout::{ItemConfig, LayoutConfig};

/// Split direction with Dear ImGui `DockBuilder::SplitNode`-like semantics.
///
/// The direction indicates where the *side* node is placed relative to the *main* node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SplitDirection {
    fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    fn side_first(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}

/// A logical node id used by [`DockBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockNodeId(u64);

#[derive(Clone, Debug)]
enum Node {
    Tabs {
        components: Vec<ItemConfig>,
    },
    Split {
        dir: SplitDirection,
        side_fraction: f32,
        main: DockNodeId,
        side: DockNodeId,
    },
}

/// Builds an [`ItemConfig`] tree from code, the way Dear ImGui's `DockBuilder` builds a dock
/// space: create an empty node, split it, dock components into the leaves, then `finish()`.
///
/// Leaves become stacks and splits become rows or columns whose children carry percentage sizes.
/// Leaves may stay empty; they turn into empty stacks that accept drops.
///
/// ```
/// use egui_dock_engine::{DockBuilder, SplitDirection};
///
/// let mut builder = DockBuilder::new();
/// let dockspace = builder.add_node();
/// let (left, main) = builder.split_node(dockspace, SplitDirection::Left, 0.25);
/// builder.dock_component("outline", left);
/// builder.dock_component("editor", main);
/// let config = builder.finish(dockspace);
/// assert_eq!(config.content[0].content[0].width, Some(25.0));
/// ```
#[derive(Debug)]
pub struct DockBuilder {
    next_node_id: u64,
    nodes: BTreeMap<DockNodeId, Node>,
}

impl Default for DockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DockBuilder {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            nodes: BTreeMap::new(),
        }
    }

    fn alloc_node_id(&mut self) -> DockNodeId {
        let id = DockNodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        id
    }

    /// Create an empty leaf node (a stack without tabs).
    #[must_use]
    pub fn add_node(&mut self) -> DockNodeId {
        let id = self.alloc_node_id();
        self.nodes.insert(
            id,
            Node::Tabs {
                components: Vec::new(),
            },
        );
        id
    }

    /// Split an existing node and return `(side, main)` (Dear ImGui semantics).
    ///
    /// The `node` itself becomes the row or column, and its previous content moves into the
    /// returned `main` child. `side_fraction` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn split_node(
        &mut self,
        node: DockNodeId,
        dir: SplitDirection,
        side_fraction: f32,
    ) -> (DockNodeId, DockNodeId) {
        let old = self.nodes.remove(&node).unwrap_or(Node::Tabs {
            components: Vec::new(),
        });
        let main = self.alloc_node_id();
        self.nodes.insert(main, old);

        let side = self.add_node();

        self.nodes.insert(
            node,
            Node::Split {
                dir,
                side_fraction: side_fraction.clamp(0.0, 1.0),
                main,
                side,
            },
        );

        (side, main)
    }

    /// Dock a component into a leaf node, as a new tab.
    ///
    /// Accepts a bare component type or a full [`ItemConfig`]. Docking into a split or an
    /// unknown node is ignored with a warning.
    pub fn dock_component(&mut self, component: impl Into<ItemConfig>, node: DockNodeId) {
        match self.nodes.get_mut(&node) {
            Some(Node::Tabs { components }) => components.push(component.into()),
            Some(Node::Split { .. }) => {
                log::warn!("dock_component: {node:?} has been split and can't hold tabs");
            }
            None => log::warn!("dock_component: {node:?} does not exist"),
        }
    }

    /// Dock several components into a leaf node, tabbed together.
    pub fn dock_components<C: Into<ItemConfig>>(
        &mut self,
        components: impl IntoIterator<Item = C>,
        node: DockNodeId,
    ) {
        for component in components {
            self.dock_component(component, node);
        }
    }

    /// Finish building and wrap the tree into a [`LayoutConfig`] with default settings.
    ///
    /// `root` is typically the id returned by the first `add_node()` and then mutated by splits.
    pub fn finish(self, root: DockNodeId) -> LayoutConfig {
        LayoutConfig::new(self.finish_item(root))
    }

    /// Finish building and return the bare item tree, e.g. to add it to a live layout.
    pub fn finish_item(mut self, root: DockNodeId) -> ItemConfig {
        build_item(root, &mut self.nodes)
    }
}

fn build_item(node_id: DockNodeId, nodes: &mut BTreeMap<DockNodeId, Node>) -> ItemConfig {
    match nodes.remove(&node_id) {
        Some(Node::Tabs { components }) => ItemConfig::stack(components),
        Some(Node::Split {
            dir,
            side_fraction,
            main,
            side,
        }) => {
            let side_share = side_fraction * 100.0;
            let main_share = 100.0 - side_share;
            let (side_item, main_item) = if dir.is_horizontal() {
                (
                    build_item(side, nodes).with_width(side_share),
                    build_item(main, nodes).with_width(main_share),
                )
            } else {
                (
                    build_item(side, nodes).with_height(side_share),
                    build_item(main, nodes).with_height(main_share),
                )
            };

            let content = if dir.side_first() {
                vec![side_item, main_item]
            } else {
                vec![main_item, side_item]
            };
            if dir.is_horizontal() {
                ItemConfig::row(content)
            } else {
                ItemConfig::column(content)
            }
        }
        None => ItemConfig::stack(Vec::new()),
    }
}
