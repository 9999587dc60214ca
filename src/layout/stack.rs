use egui::{Pos2, Rect};

use super::{ContentItem, EventName, ItemId, LayoutError, LayoutTree, Side, TreeOp};

/// Where a tab dropped at `pos` goes in a header holding `count` tabs.
///
/// Tabs take equal slots along the header; the first half of a slot inserts before that tab, the
/// second half after it.
pub(crate) fn tab_insert_index(header: Rect, side: Side, count: usize, pos: Pos2) -> usize {
    if count == 0 || !header.is_finite() {
        return 0;
    }
    let (start, len, at) = if side.is_sided() {
        (header.min.y, header.height(), pos.y)
    } else {
        (header.min.x, header.width(), pos.x)
    };
    if len <= 0.0 {
        return count;
    }
    let offset = at - start;
    if offset <= 0.0 {
        return 0;
    }
    if offset >= len {
        return count;
    }
    let slot = len / count as f32;
    let tab = ((offset / slot).floor() as usize).min(count - 1);
    let center = slot * (tab as f32 + 0.5);
    if offset < center { tab } else { tab + 1 }
}

impl LayoutTree {
    pub fn active_content_item(&self, stack: ItemId) -> Result<Option<ItemId>, LayoutError> {
        self.item(stack)?
            .stack()
            .map(|state| state.active)
            .ok_or(LayoutError::NotAStack(stack))
    }

    /// Bring `item` to the front of `stack`.
    pub fn set_active_content_item(&mut self, stack: ItemId, item: ItemId) -> Result<(), LayoutError> {
        if self.item(stack)?.stack().is_none() {
            return Err(LayoutError::NotAStack(stack));
        }
        self.child_index(stack, item)?;
        self.activate(stack, Some(item));
        Ok(())
    }

    /// Switch the active tab without validation. No-op if `item` already is the active one.
    pub(crate) fn activate(&mut self, stack: ItemId, item: Option<ItemId>) {
        let Some(state) = self.items.get_mut(&stack).and_then(ContentItem::stack_mut) else {
            return;
        };
        if state.active == item {
            return;
        }
        let previous = std::mem::replace(&mut state.active, item);

        if let Some(previous) = previous {
            self.run_downwards(previous, TreeOp::Hide, false, false);
        }
        self.set_size_downwards(stack);
        log::trace!("{stack:?}: active tab {previous:?} -> {item:?}");
        self.emit_bubbling(stack, EventName::ActiveContentItemChanged);
        self.emit_bubbling(stack, EventName::StateChanged);
    }

    /// The header's close button is offered only if the config allows it, the stack isn't the
    /// last undocked child of its row or column, and every tab can be closed.
    pub(crate) fn validate_closability(&mut self, stack: ItemId) {
        let Some(item) = self.items.get(&stack) else {
            return;
        };
        let tabs_closable = item
            .children
            .iter()
            .all(|c| self.items.get(c).is_none_or(ContentItem::is_closable));
        if let Some(state) = self.items.get_mut(&stack).and_then(ContentItem::stack_mut) {
            let header = &mut state.header;
            header.closable = header.closable_config && header.position_closable && tabs_closable;
        }
    }

    /// Where a tab dropped at `pos` would be inserted into `stack`.
    pub fn header_drop_index(&self, stack: ItemId, pos: Pos2) -> Result<usize, LayoutError> {
        let item = self.item(stack)?;
        let state = item.stack().ok_or(LayoutError::NotAStack(stack))?;
        Ok(tab_insert_index(
            state.header_rect,
            state.header.side,
            item.children.len(),
            pos,
        ))
    }
}
