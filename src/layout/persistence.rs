use egui::Rect;

use super::{
    ComponentState, ContentItem, Docker, HeaderConfig, IdConfig, ItemConfig, ItemId, ItemKind,
    ItemType, LayoutConfig, LayoutError, LayoutTree, RowOrColumnState, StackHeader, StackState,
};

impl LayoutTree {
    /// Build the detached subtree described by `config` for a parent of `parent_type`.
    ///
    /// A component bound for a row, column or the root is wrapped in a stack that takes over its
    /// sizes. The config must already be validated.
    pub(crate) fn build_item(
        &mut self,
        config: ItemConfig,
        parent_type: Option<ItemType>,
    ) -> Result<ItemId, LayoutError> {
        let needs_stack = config.item_type == ItemType::Component
            && matches!(
                parent_type,
                Some(ItemType::Root | ItemType::Row | ItemType::Column)
            );
        if needs_stack {
            let mut component = config;
            let mut stack = ItemConfig::new(ItemType::Stack);
            stack.width = component.width.take();
            stack.height = component.height.take();
            stack.content = vec![component];
            return self.build_item(stack, parent_type);
        }

        let ItemConfig {
            item_type,
            content,
            width,
            height,
            min_width,
            min_height,
            id,
            is_closable,
            is_maximised,
            active_item_index,
            header,
            docked,
            component_type,
            title,
        } = config;

        let kind = match item_type {
            ItemType::Root => {
                return Err(LayoutError::InvalidContent {
                    item_type,
                    reason: "root can't appear inside content",
                });
            }
            ItemType::Row | ItemType::Column => ItemKind::RowOrColumn(RowOrColumnState {
                axis: item_type.axis().unwrap_or(super::Axis::Horizontal),
                splitters: Vec::new(),
                configured_total: None,
            }),
            ItemType::Stack => ItemKind::Stack(StackState {
                active: None,
                header: self.header_from_config(header.as_ref()),
                docker: None,
                header_rect: Rect::NOTHING,
                content_rect: Rect::NOTHING,
            }),
            ItemType::Component => {
                let component_type = component_type.unwrap_or_default();
                let title = title.unwrap_or_else(|| component_type.clone());
                ItemKind::Component(ComponentState {
                    component_type,
                    title,
                })
            }
        };

        let mut item = ContentItem::new(kind);
        item.width = width;
        item.height = height;
        item.min_width = min_width;
        item.min_height = min_height;
        item.ids = id.map(IdConfig::into_vec).unwrap_or_default();
        item.is_closable = is_closable;
        item.is_maximised = is_maximised;
        let id = self.insert_item(item);

        let mut children = Vec::with_capacity(content.len());
        for child in content {
            children.push(self.build_item(child, Some(item_type))?);
        }
        for (index, &child) in children.iter().enumerate() {
            self.attach_raw(id, child, index);
        }
        if let Some(axis) = item_type.axis() {
            let shares: Option<Vec<f32>> = self
                .undocked_children(id)
                .iter()
                .map(|c| self.items.get(c).and_then(|c| c.size_on(axis)))
                .collect();
            let total = shares.map(|shares| shares.iter().sum::<f32>());
            if let Some(linear) = self.items.get_mut(&id).and_then(ContentItem::row_or_column_mut) {
                linear.configured_total = total;
            }
        }

        let dock_axis = parent_type.and_then(ItemType::axis);
        if let Some(item) = self.items.get_mut(&id) {
            let size_on_dock_axis = dock_axis.and_then(|axis| item.size_on(axis));
            if let Some(stack) = item.stack_mut() {
                stack.active = active_item_index
                    .and_then(|i| children.get(i))
                    .or(children.first())
                    .copied();
                if docked {
                    match dock_axis {
                        Some(axis) => {
                            stack.docker = Some(Docker {
                                axis,
                                size: size_on_dock_axis.unwrap_or(50.0),
                                real_size: 0.0,
                                collapsed: false,
                            });
                        }
                        None => log::warn!("ignoring docked flag of {id:?}: not inside a row or column"),
                    }
                }
            }
        }

        Ok(id)
    }

    fn header_from_config(&self, header: Option<&HeaderConfig>) -> StackHeader {
        let mut out = self.default_header();
        if let Some(header) = header {
            out.show = header.show.unwrap_or(self.settings.has_headers);
            out.side = header.side;
            out.closable_config = header.closable;
            out.closable = header.closable;
        }
        out
    }

    /// The current state as a config, in the construction grammar.
    ///
    /// Feeding the result back into [`LayoutTree::new`] rebuilds an equivalent tree, and doing so
    /// twice gives identical configs.
    pub fn to_config(&self) -> LayoutConfig {
        let content = self
            .items
            .get(&self.root)
            .map(|root| root.children.iter().map(|&c| self.item_config(c)).collect())
            .unwrap_or_default();
        LayoutConfig {
            settings: self.settings.clone(),
            dimensions: self.dimensions.clone(),
            content,
        }
    }

    /// The config of one attached or detached item.
    pub fn item_config(&self, id: ItemId) -> ItemConfig {
        let Some(item) = self.items.get(&id) else {
            return ItemConfig::new(ItemType::Component);
        };
        let mut config = ItemConfig::new(item.item_type());
        config.content = item.children.iter().map(|&c| self.item_config(c)).collect();
        config.width = item.width;
        config.height = item.height;
        config.min_width = item.min_width;
        config.min_height = item.min_height;
        config.id = IdConfig::from_slice(&item.ids);
        config.is_closable = item.is_closable;
        config.is_maximised = item.is_maximised;

        match &item.kind {
            ItemKind::Root | ItemKind::RowOrColumn(_) => {}
            ItemKind::Stack(stack) => {
                config.active_item_index = stack
                    .active
                    .and_then(|a| item.children.iter().position(|&c| c == a))
                    .filter(|&index| index > 0);
                let header = &stack.header;
                let is_default = header.show == self.settings.has_headers
                    && header.side == super::Side::Top
                    && header.closable_config;
                if !is_default {
                    config.header = Some(HeaderConfig {
                        show: (header.show != self.settings.has_headers).then_some(header.show),
                        side: header.side,
                        closable: header.closable_config,
                    });
                }
                config.docked = stack.docker.is_some();
            }
            ItemKind::Component(component) => {
                config.component_type = Some(component.component_type.clone());
                config.title = Some(component.title.clone());
            }
        }
        config
    }
}
