use egui::Rect;

use super::{
    Axis, ContentItem, EventName, ItemId, ItemKind, ItemType, LayoutError, LayoutTree,
    StackHeader, StackState,
};

/// Operations [`LayoutTree::call_downwards`] applies to each item of a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeOp {
    /// Mark as initialised and announce [`EventName::ItemCreated`].
    Init,
    /// Lay out the item's direct children inside its rectangle.
    SetSize,
    Show,
    Hide,
    /// Drop the item from the tree.
    Destroy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Parents before children.
    PreOrder,
    /// Children before parents.
    PostOrder,
}

/// A notification for the host about one of its component leaves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LeafUpdate {
    Resized { item: ItemId, rect: Rect },
    Shown(ItemId),
    Hidden(ItemId),
    Destroyed(ItemId),
}

impl LayoutTree {
    /// All items of the subtree under `id`, `id` included. Empty if `id` is unknown.
    pub fn subtree(&self, id: ItemId, order: Traversal) -> Vec<ItemId> {
        if !self.items.contains_key(&id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let Some(item) = self.items.get(&current) else {
                continue;
            };
            match order {
                Traversal::PreOrder => stack.extend(item.children.iter().rev()),
                Traversal::PostOrder => stack.extend(item.children.iter()),
            }
        }
        if order == Traversal::PostOrder {
            out.reverse();
        }
        out
    }

    /// Apply `op` to every item of the subtree rooted at `id`.
    ///
    /// The visit order is fixed before the first item is touched, so an operation that removes
    /// items never skips or revisits one.
    pub fn call_downwards(
        &mut self,
        id: ItemId,
        op: TreeOp,
        bottom_up: bool,
        skip_self: bool,
    ) -> Result<(), LayoutError> {
        let item = self.item(id)?;
        if op == TreeOp::Destroy {
            if id == self.root && !skip_self {
                return Err(LayoutError::InvalidInsertion {
                    parent: id,
                    child: id,
                });
            }
            if !skip_self {
                if let Some(parent) = item.parent {
                    return self.remove_child(parent, id, false);
                }
            }
        }
        self.run_downwards(id, op, bottom_up, skip_self);
        if op == TreeOp::Destroy && skip_self {
            if let Some(item) = self.items.get_mut(&id) {
                item.children.clear();
                if let Some(stack) = item.stack_mut() {
                    stack.active = None;
                }
            }
            self.refresh_flags(id);
        }
        Ok(())
    }

    pub(crate) fn run_downwards(&mut self, id: ItemId, op: TreeOp, bottom_up: bool, skip_self: bool) {
        let order = if bottom_up {
            Traversal::PostOrder
        } else {
            Traversal::PreOrder
        };
        for item in self.subtree(id, order) {
            if skip_self && item == id {
                continue;
            }
            match op {
                TreeOp::Init => self.init_item(item),
                TreeOp::SetSize => self.layout_item(item),
                TreeOp::Show => self.set_visible(item, true),
                TreeOp::Hide => self.set_visible(item, false),
                TreeOp::Destroy => self.destroy_item(item),
            }
        }
    }

    /// Re-run the layout under `id`.
    pub(crate) fn set_size_downwards(&mut self, id: ItemId) {
        if !self.is_initialised {
            return;
        }
        self.run_downwards(id, TreeOp::SetSize, false, false);
    }

    fn init_item(&mut self, id: ItemId) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        if item.is_initialised {
            return;
        }
        item.is_initialised = true;
        self.emit_bubbling(id, EventName::ItemCreated);
    }

    pub(crate) fn set_visible(&mut self, id: ItemId, visible: bool) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        if item.visible == visible {
            return;
        }
        item.visible = visible;
        if item.is_component() {
            self.leaf_updates.push(if visible {
                LeafUpdate::Shown(id)
            } else {
                LeafUpdate::Hidden(id)
            });
        }
    }

    fn destroy_item(&mut self, id: ItemId) {
        if !self.items.contains_key(&id) {
            return;
        }
        self.emit_bubbling(id, EventName::ItemDestroyed);
        let Some(item) = self.items.remove(&id) else {
            return;
        };
        if item.is_component() {
            self.leaf_updates.push(LeafUpdate::Destroyed(id));
        }
        if self.maximised == Some(id) {
            self.maximised = None;
        }
        self.events.forget(id);
        log::trace!("destroyed {:?} {:?}", id, item.item_type());
    }

    /// Destroy a detached subtree.
    pub(crate) fn destroy(&mut self, id: ItemId) {
        self.run_downwards(id, TreeOp::Destroy, true, false);
    }

    /// Whether `ancestor` is `item` or one of its parents.
    pub fn is_ancestor(&self, ancestor: ItemId, item: ItemId) -> bool {
        let mut current = Some(item);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.items.get(&id).and_then(|item| item.parent);
        }
        false
    }

    /// Position of `child` among the children of `parent`.
    pub fn child_index(&self, parent: ItemId, child: ItemId) -> Result<usize, LayoutError> {
        self.item(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(LayoutError::NotAChild { parent, child })
    }

    pub(crate) fn attach_raw(&mut self, parent: ItemId, child: ItemId, index: usize) {
        if let Some(item) = self.items.get_mut(&parent) {
            let index = index.min(item.children.len());
            item.children.insert(index, child);
        }
        if let Some(item) = self.items.get_mut(&child) {
            item.parent = Some(parent);
        }
    }

    /// Check that `child` may be placed under `parent`; a component bound for a row, column or
    /// the root comes back wrapped in a new stack.
    fn prepare_child(
        &mut self,
        parent: ItemId,
        child: ItemId,
        replacing: bool,
    ) -> Result<ItemId, LayoutError> {
        let parent_item = self.item(parent)?;
        let parent_type = parent_item.item_type();
        let root_is_full = parent_item.is_root() && !parent_item.children.is_empty();
        let child_item = self.item(child)?;
        let child_type = child_item.item_type();

        if child_item.parent.is_some()
            || child == self.root
            || child_type == ItemType::Root
            || self.is_ancestor(child, parent)
        {
            return Err(LayoutError::InvalidInsertion { parent, child });
        }
        match parent_type {
            ItemType::Component => return Err(LayoutError::LeafCannotHaveChildren(parent)),
            ItemType::Root if root_is_full && !replacing => return Err(LayoutError::RootAlreadyHasChild),
            ItemType::Stack if child_type == ItemType::Stack => {
                return Err(LayoutError::InvalidInsertion { parent, child });
            }
            _ => {}
        }

        if child_type == ItemType::Component && parent_type != ItemType::Stack {
            Ok(self.wrap_in_stack(child))
        } else {
            Ok(child)
        }
    }

    /// A new stack holding `component`, which hands its sizes over to the stack.
    pub(crate) fn wrap_in_stack(&mut self, component: ItemId) -> ItemId {
        let (width, height) = match self.items.get_mut(&component) {
            Some(item) => (item.width.take(), item.height.take()),
            None => (None, None),
        };
        let mut stack = ContentItem::new(ItemKind::Stack(StackState {
            active: Some(component),
            header: self.default_header(),
            docker: None,
            header_rect: Rect::NOTHING,
            content_rect: Rect::NOTHING,
        }));
        stack.width = width;
        stack.height = height;
        let stack = self.insert_item(stack);
        self.attach_raw(stack, component, 0);
        self.refresh_flags(stack);
        stack
    }

    pub(crate) fn default_header(&self) -> StackHeader {
        StackHeader {
            show: self.settings.has_headers,
            side: super::Side::Top,
            closable_config: true,
            position_closable: true,
            dockable: false,
            closable: true,
        }
    }

    /// Attach the detached `child` under `parent` at `index` (the end if `None`).
    ///
    /// In a row or column the new child takes its declared size, or an equal share, and the
    /// others shrink proportionally to make room. Returns the item actually inserted, which is a
    /// new stack when a component lands in a row, column or the root.
    pub fn add_child(
        &mut self,
        parent: ItemId,
        child: ItemId,
        index: Option<usize>,
    ) -> Result<ItemId, LayoutError> {
        self.insert_child(parent, child, index, false)
    }

    /// `suspend_resize` skips the size redistribution and the layout pass; the caller sets sizes
    /// itself and lays out afterwards.
    pub(crate) fn insert_child(
        &mut self,
        parent: ItemId,
        child: ItemId,
        index: Option<usize>,
        suspend_resize: bool,
    ) -> Result<ItemId, LayoutError> {
        let child = self.prepare_child(parent, child, false)?;
        let len = self.item(parent)?.children.len();
        let index = index.unwrap_or(len).min(len);

        if let Some(axis) = self.item(parent)?.axis() {
            if !suspend_resize {
                self.make_room_for(parent, child, axis);
            }
        }
        self.attach_raw(parent, child, index);

        let is_stack = self.item(parent)?.is_stack();
        if is_stack {
            let needs_active = self.item(parent)?.stack().is_some_and(|s| s.active.is_none());
            if needs_active {
                self.activate(parent, Some(child));
            }
        }

        if self.is_initialised {
            self.run_downwards(child, TreeOp::Init, false, false);
        }
        self.refresh_flags(child);
        self.refresh_flags(parent);
        if !suspend_resize {
            self.set_size_downwards(parent);
        }
        log::trace!("added {child:?} to {parent:?} at {index}");
        self.emit_bubbling(parent, EventName::StateChanged);
        Ok(child)
    }

    fn make_room_for(&mut self, parent: ItemId, child: ItemId, axis: Axis) {
        let siblings = self.undocked_children(parent);
        let count = siblings.len() + 1;
        let declared = self
            .items
            .get(&child)
            .and_then(|item| item.size_on(axis))
            .filter(|size| *size > 0.0 && *size < 100.0);
        let new_size = declared.unwrap_or(100.0 / count as f32);
        let current = self.share_total(&siblings, axis);
        let factor = (100.0 - new_size) / if current > 0.01 { current } else { 100.0 };
        for sibling in siblings {
            if let Some(item) = self.items.get_mut(&sibling) {
                let scaled = item.size_on(axis).map(|size| size * factor);
                item.set_size_on(axis, scaled);
            }
        }
        if let Some(item) = self.items.get_mut(&child) {
            item.set_size_on(axis, Some(new_size));
        }
    }

    /// Sum of the declared shares of `items` along `axis`.
    pub(crate) fn share_total(&self, items: &[ItemId], axis: Axis) -> f32 {
        items
            .iter()
            .filter_map(|id| self.items.get(id)?.size_on(axis))
            .sum()
    }

    /// Children of a row or column that are not docked.
    pub(crate) fn undocked_children(&self, container: ItemId) -> Vec<ItemId> {
        self.items.get(&container).map_or_else(Vec::new, |item| {
            item.children
                .iter()
                .copied()
                .filter(|c| self.items.get(c).is_some_and(|c| !c.is_docked()))
                .collect()
        })
    }

    /// Detach `child` from `parent`, destroying it unless `keep_alive`.
    ///
    /// The parent reacts to the loss: a row or column hands the freed share to its remaining
    /// children, a stack activates a neighbour, an empty closable container closes itself and a
    /// closable row or column left with one child is replaced by that child.
    pub fn remove_child(
        &mut self,
        parent: ItemId,
        child: ItemId,
        keep_alive: bool,
    ) -> Result<(), LayoutError> {
        let index = self.child_index(parent, child)?;
        let parent_item = self.item(parent)?;
        let axis = parent_item.axis();
        let was_active = parent_item.stack().and_then(|s| s.active) == Some(child);

        if let Some(axis) = axis {
            self.release_share(parent, child, axis);
        }

        if keep_alive {
            if self.maximised.is_some_and(|m| self.is_ancestor(child, m)) {
                self.clear_maximised();
            }
        } else {
            self.destroy(child);
        }

        if let Some(item) = self.items.get_mut(&parent) {
            item.children.remove(index);
        }
        if let Some(item) = self.items.get_mut(&child) {
            item.parent = None;
        }
        log::trace!("removed {child:?} from {parent:?} (keep_alive={keep_alive})");

        if was_active {
            let next = self.items.get(&parent).and_then(|item| {
                let neighbour = index.saturating_sub(1);
                item.children.get(neighbour).copied()
            });
            if let Some(stack) = self.items.get_mut(&parent).and_then(ContentItem::stack_mut) {
                stack.active = None;
            }
            self.activate(parent, next);
        }

        let parent_item = self.item(parent)?;
        let remaining = parent_item.children.len();
        let closable = parent_item.is_closable;
        let grand = parent_item.parent;
        let is_row_or_column = parent_item.is_row_or_column();

        if remaining == 0 && closable && !parent_item.is_root() {
            if let Some(grand) = grand {
                return self.remove_child(grand, parent, false);
            }
        }

        if is_row_or_column && remaining == 1 && closable {
            if let Some(grand) = grand.filter(|&grand| self.can_elide(grand, parent)) {
                return self.elide(grand, parent);
            }
        }

        self.refresh_flags(parent);
        self.set_size_downwards(parent);
        self.emit_bubbling(parent, EventName::StateChanged);
        Ok(())
    }

    /// Give the share of `child` back to its undocked siblings, proportionally.
    fn release_share(&mut self, container: ItemId, child: ItemId, axis: Axis) {
        let Some(item) = self.items.get_mut(&child) else {
            return;
        };
        if let Some(docker) = item.stack_mut().and_then(|s| s.docker.take()) {
            // Leaving the row or column undocks the stack.
            item.set_size_on(axis, Some(docker.size));
            return;
        }
        let others: Vec<ItemId> = self
            .undocked_children(container)
            .into_iter()
            .filter(|&c| c != child)
            .collect();

        if others.is_empty() {
            self.undock_all_but(container, child);
            return;
        }

        let rest = self.share_total(&others, axis);
        for &other in &others {
            let Some(item) = self.items.get_mut(&other) else {
                continue;
            };
            let size = if rest > 0.01 {
                item.size_on(axis).map(|size| size * 100.0 / rest)
            } else {
                Some(100.0 / others.len() as f32)
            };
            item.set_size_on(axis, size);
        }
    }

    /// Undock every remaining child of `container` when none would be left undocked.
    fn undock_all_but(&mut self, container: ItemId, leaving: ItemId) {
        let Some(axis) = self.items.get(&container).and_then(ContentItem::axis) else {
            return;
        };
        let remaining: Vec<ItemId> = self
            .items
            .get(&container)
            .map(|item| item.children.iter().copied().filter(|&c| c != leaving).collect())
            .unwrap_or_default();
        let share = 100.0 / remaining.len().max(1) as f32;
        for id in remaining {
            if let Some(item) = self.items.get_mut(&id) {
                if let Some(stack) = item.stack_mut() {
                    stack.docker = None;
                }
                item.set_size_on(axis, Some(share));
            }
        }
    }

    /// A stack can't take the place of a row or column that sits inside another stack.
    fn can_elide(&self, grand: ItemId, container: ItemId) -> bool {
        let only_is_stack = self
            .items
            .get(&container)
            .and_then(|item| item.children.first())
            .and_then(|c| self.items.get(c))
            .is_some_and(ContentItem::is_stack);
        !(only_is_stack && self.items.get(&grand).is_some_and(ContentItem::is_stack))
    }

    /// Replace a row or column that is down to one child by that child.
    fn elide(&mut self, grand: ItemId, container: ItemId) -> Result<(), LayoutError> {
        let Some(only) = self.items.get(&container).and_then(|item| item.children.first().copied())
        else {
            return Ok(());
        };
        if let Some(item) = self.items.get_mut(&container) {
            item.children.clear();
        }
        if let Some(item) = self.items.get_mut(&only) {
            item.parent = None;
        }
        log::debug!("{container:?} is down to one child, replacing it by {only:?}");
        self.replace_child(grand, container, only, true)?;
        if self.item(grand)?.is_row_or_column() {
            self.validate_docking(grand);
        }
        Ok(())
    }

    /// Put the detached `new` where `old` is, with `old`'s sizes.
    pub fn replace_child(
        &mut self,
        parent: ItemId,
        old: ItemId,
        new: ItemId,
        destroy_old: bool,
    ) -> Result<(), LayoutError> {
        let index = self.child_index(parent, old)?;
        let new = self.prepare_child(parent, new, true)?;

        let (width, height, docker) = {
            let old_item = self.item_mut(old)?;
            let docker = old_item.stack_mut().and_then(|s| s.docker.take());
            (old_item.width, old_item.height, docker)
        };
        if let Some(item) = self.items.get_mut(&new) {
            item.width = width;
            item.height = height;
            if let Some(docker) = docker {
                item.set_size_on(docker.axis, Some(docker.size));
            }
        }

        if let Some(item) = self.items.get_mut(&parent) {
            item.children[index] = new;
            if let Some(stack) = item.stack_mut() {
                if stack.active == Some(old) {
                    stack.active = Some(new);
                }
            }
        }
        if let Some(item) = self.items.get_mut(&new) {
            item.parent = Some(parent);
        }

        if destroy_old {
            self.destroy(old);
        } else {
            if self.maximised.is_some_and(|m| self.is_ancestor(old, m)) {
                self.clear_maximised();
            }
            if let Some(item) = self.items.get_mut(&old) {
                item.parent = None;
            }
        }

        if self.is_initialised {
            self.run_downwards(new, TreeOp::Init, false, false);
        }
        self.refresh_flags(new);
        self.refresh_flags(parent);
        self.set_size_downwards(parent);
        self.emit_bubbling(parent, EventName::StateChanged);
        Ok(())
    }

    /// Remove `item` from its parent and destroy it.
    pub fn remove(&mut self, item: ItemId) -> Result<(), LayoutError> {
        match self.item(item)?.parent {
            Some(parent) => self.remove_child(parent, item, false),
            None if item == self.root => Err(LayoutError::InvalidInsertion {
                parent: item,
                child: item,
            }),
            None => {
                self.destroy(item);
                Ok(())
            }
        }
    }

    /// Build a detached item from `config`. Components stay bare until they are added somewhere.
    pub fn create_item(&mut self, config: super::ItemConfig) -> Result<ItemId, LayoutError> {
        config.validate()?;
        let id = self.build_item(config, None)?;
        for node in self.subtree(id, Traversal::PreOrder) {
            if let Some(item) = self.items.get_mut(&node) {
                item.is_maximised = false;
            }
            self.refresh_flags(node);
        }
        if self.is_initialised {
            self.run_downwards(id, TreeOp::Init, false, false);
        }
        Ok(id)
    }

    /// [`Self::create_item`] then [`Self::add_child`].
    pub fn add_item(
        &mut self,
        parent: ItemId,
        config: super::ItemConfig,
        index: Option<usize>,
    ) -> Result<ItemId, LayoutError> {
        self.item(parent)?;
        let id = self.create_item(config)?;
        match self.add_child(parent, id, index) {
            Ok(inserted) => Ok(inserted),
            Err(err) => {
                self.destroy(id);
                Err(err)
            }
        }
    }

    pub fn has_id(&self, item: ItemId, id: &str) -> bool {
        self.items.get(&item).is_some_and(|item| item.has_id(id))
    }

    pub fn add_id(&mut self, item: ItemId, id: impl Into<String>) -> Result<(), LayoutError> {
        let id = id.into();
        let entry = self.item_mut(item)?;
        if entry.has_id(&id) {
            return Ok(());
        }
        entry.ids.push(id);
        self.emit_bubbling(item, EventName::StateChanged);
        Ok(())
    }

    pub fn remove_id(&mut self, item: ItemId, id: &str) -> Result<(), LayoutError> {
        let entry = self.item_mut(item)?;
        let Some(index) = entry.ids.iter().position(|x| x == id) else {
            return Err(LayoutError::IdNotFound {
                item,
                id: id.to_owned(),
            });
        };
        entry.ids.remove(index);
        self.emit_bubbling(item, EventName::StateChanged);
        Ok(())
    }

    /// Items of the attached tree matching `filter`, parents before children.
    pub fn items_by_filter(&self, mut filter: impl FnMut(&ContentItem) -> bool) -> Vec<ItemId> {
        self.subtree(self.root, Traversal::PreOrder)
            .into_iter()
            .filter(|id| self.items.get(id).is_some_and(&mut filter))
            .collect()
    }

    pub fn items_by_id(&self, id: &str) -> Vec<ItemId> {
        self.items_by_filter(|item| item.has_id(id))
    }

    pub fn items_by_type(&self, item_type: ItemType) -> Vec<ItemId> {
        self.items_by_filter(|item| item.item_type() == item_type)
    }

    /// Recompute the derived flags of `item` and its direct children.
    pub(crate) fn refresh_flags(&mut self, item: ItemId) {
        let Some(entry) = self.items.get(&item) else {
            return;
        };
        match entry.item_type() {
            ItemType::Row | ItemType::Column => self.validate_docking(item),
            ItemType::Stack => self.refresh_stack_flags(item),
            ItemType::Root => {
                let children = entry.children.clone();
                for child in children {
                    self.refresh_stack_flags(child);
                }
            }
            ItemType::Component => {}
        }
    }
}
