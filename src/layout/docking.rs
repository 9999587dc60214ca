use super::{
    Axis, ContentItem, Docker, EventName, ItemId, LayoutError, LayoutTree, Side,
};

/// Where the header of a stack docked at `index` goes, so it faces the rest of the container.
fn docked_header_side(axis: Axis, index: usize) -> Side {
    Side::along(axis, index == 0)
}

impl LayoutTree {
    /// Collapse `stack` to its header inside its row or column, or restore it.
    ///
    /// `mode` forces a state (`Some(true)` docks, `Some(false)` undocks); `None` toggles. Asking
    /// for the current state is a no-op. The stack keeps its percentage while docked and the
    /// siblings scale by the inverse factors, so docking and undocking again gives back the
    /// original shares.
    pub fn dock(
        &mut self,
        stack: ItemId,
        mode: Option<bool>,
        collapsed: bool,
    ) -> Result<(), LayoutError> {
        let item = self.item(stack)?;
        let is_docked = item
            .stack()
            .map(|s| s.is_docked())
            .ok_or(LayoutError::NotAStack(stack))?;
        let container = item.parent.ok_or(LayoutError::NotDockable(stack))?;
        let container_item = self.item(container)?;
        let axis = container_item
            .axis()
            .ok_or(LayoutError::NotDockable(stack))?;
        if container_item.children.len() == 1 {
            return Err(LayoutError::CannotDockSingleChild { container });
        }

        let dock = mode.unwrap_or(!is_docked);
        if dock == is_docked {
            return Ok(());
        }

        if dock {
            self.dock_stack(container, stack, axis, collapsed)?;
            log::debug!("docked {stack:?} in {container:?}");
        } else {
            self.undock_stack(container, stack, axis);
            log::debug!("undocked {stack:?} in {container:?}");
        }

        self.validate_docking(container);
        self.set_size_downwards(container);
        self.emit_bubbling(
            stack,
            if dock {
                EventName::Docked
            } else {
                EventName::Undocked
            },
        );
        self.emit_bubbling(container, EventName::StateChanged);
        Ok(())
    }

    fn dock_stack(
        &mut self,
        container: ItemId,
        stack: ItemId,
        axis: Axis,
        collapsed: bool,
    ) -> Result<(), LayoutError> {
        let undocked = self.undocked_children(container);
        if undocked.len() < 2 {
            return Err(LayoutError::CannotDockLast { container });
        }
        let index = self.child_index(container, stack)?;
        let header_height = self.dimensions.header_height;

        let item = self.item_mut(stack)?;
        let size = item.size_on(axis).unwrap_or(0.0);
        let real_size = (axis.extent(item.rect.size()) - header_height).max(0.0);
        if let Some(state) = item.stack_mut() {
            state.header.side = docked_header_side(axis, index);
            state.docker = Some(Docker {
                axis,
                size,
                real_size: if real_size.is_finite() { real_size } else { 0.0 },
                collapsed,
            });
        }

        let others: Vec<ItemId> = undocked.into_iter().filter(|&c| c != stack).collect();
        let rest = self.share_total(&others, axis);
        for &other in &others {
            let Some(item) = self.items.get_mut(&other) else {
                continue;
            };
            let scaled = if rest > 0.01 {
                item.size_on(axis).map(|s| s * 100.0 / rest)
            } else {
                Some(100.0 / others.len() as f32)
            };
            item.set_size_on(axis, scaled);
        }
        Ok(())
    }

    fn undock_stack(&mut self, container: ItemId, stack: ItemId, axis: Axis) {
        let Some(item) = self.items.get_mut(&stack) else {
            return;
        };
        let Some(docker) = item.stack_mut().and_then(|s| s.docker.take()) else {
            return;
        };
        item.set_size_on(axis, Some(docker.size));

        let others: Vec<ItemId> = self
            .undocked_children(container)
            .into_iter()
            .filter(|&c| c != stack)
            .collect();
        let current = self.share_total(&others, axis);
        let factor = (100.0 - docker.size) / if current > 0.01 { current } else { 100.0 };
        for other in others {
            if let Some(item) = self.items.get_mut(&other) {
                let scaled = item.size_on(axis).map(|s| s * factor);
                item.set_size_on(axis, scaled);
            }
        }
    }

    /// Docking is only offered while more than one child of `container` is undocked; a docked
    /// stack can always be undocked.
    pub(crate) fn validate_docking(&mut self, container: ItemId) {
        let Some(item) = self.items.get(&container) else {
            return;
        };
        if !item.is_row_or_column() {
            return;
        }
        let children = item.children.clone();
        for child in children {
            self.refresh_stack_flags(child);
        }
    }

    /// Recompute the docking and closing flags of `stack` from its position.
    pub(crate) fn refresh_stack_flags(&mut self, stack: ItemId) {
        let Some(item) = self.items.get(&stack) else {
            return;
        };
        if !item.is_stack() {
            return;
        }
        let is_docked = item.is_docked();
        let can_dock = item
            .parent
            .and_then(|p| self.items.get(&p))
            .filter(|p| p.is_row_or_column())
            .map(|p| {
                let docked = p
                    .children
                    .iter()
                    .filter(|c| self.items.get(c).is_some_and(ContentItem::is_docked))
                    .count();
                p.children.len() - docked > 1
            });

        if let Some(state) = self.items.get_mut(&stack).and_then(ContentItem::stack_mut) {
            match can_dock {
                Some(can_dock) => {
                    state.header.dockable = is_docked || can_dock;
                    state.header.position_closable = can_dock;
                }
                None => {
                    state.header.dockable = false;
                    state.header.position_closable = true;
                }
            }
        }
        self.validate_closability(stack);
    }
}
