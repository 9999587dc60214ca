use egui::{Pos2, Rect, Vec2};

use super::geometry::{content_quadrants, edge_band, surface};
use super::splitter::SplitterDrag;
use super::{
    Area, Axis, ContentItem, DropZone, EventName, ItemConfig, ItemId, ItemKind, ItemType,
    LayoutError, LayoutTree, RowOrColumnState, Side, Traversal, side_highlight,
    smallest_area_at,
};

/// One step of a pointer drag as the host reports it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    Start { pos: Pos2 },
    /// Pointer offset from the start position.
    Drag { delta: Vec2 },
    Stop,
}

/// The thing a drag listener is attached to.
#[derive(Clone, Debug, PartialEq)]
pub enum DragSource {
    /// An item already in the tree, usually a tab.
    Item(ItemId),
    /// A new item created from a config when the drag starts.
    External(ItemConfig),
    /// Splitter `index` of a row or column.
    Splitter { container: ItemId, index: usize },
}

/// How a drag ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// `item` landed on `target`. `item` may be a new stack wrapping the dragged component, or the
    /// first tab added when a container was merged into a header.
    Dropped {
        item: ItemId,
        target: ItemId,
        zone: DropZone,
    },
    /// No drop zone was ever hit; the item went back where it came from.
    Returned { item: ItemId, parent: ItemId },
    /// No drop zone was ever hit and there was nowhere to go back to.
    Destroyed { item: ItemId },
    SplitterMoved { container: ItemId, index: usize },
}

/// One step on the way from a dragged item up to the root, taken before the item left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Origin {
    pub ancestor: ItemId,
    /// Position of the branch that held the item.
    pub index: usize,
    pub axis: Option<Axis>,
}

/// An item on the move. It is detached from the tree for the whole drag.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ItemDrag {
    pub item: ItemId,
    /// Parent first, root last. Empty for items dragged in from outside.
    pub origin: Vec<Origin>,
    pub start: Pos2,
    pub pointer: Pos2,
    /// Drop areas computed once, right after the item was detached.
    pub areas: Vec<Area>,
    /// The last area the pointer was over, and where. Survives moving off all areas.
    pub last_valid: Option<(Area, Pos2)>,
}

impl ItemDrag {
    fn track(&mut self, pos: Pos2) {
        self.pointer = pos;
        if let Some(area) = smallest_area_at(&self.areas, pos) {
            self.last_valid = Some((*area, pos));
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DragSession {
    Item(ItemDrag),
    Splitter(SplitterDrag),
}

/// Where on a stack a drop goes, once `DropZone::StackWhole` is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StackSegment {
    Header,
    Body,
    Side(Side),
}

impl StackSegment {
    fn zone(self) -> DropZone {
        match self {
            Self::Header => DropZone::StackHeader,
            Self::Body => DropZone::StackBody,
            Self::Side(side) => DropZone::StackSide(side),
        }
    }
}

impl LayoutTree {
    /// Every place something could be dropped right now.
    ///
    /// An empty layout offers its whole root plus the four edge bands; otherwise each visible
    /// stack offers its header and either its body (when empty) or the four side quadrants of its
    /// content. While an item is maximised, only its subtree takes part.
    pub fn drop_areas(&self) -> Vec<Area> {
        let mut areas = Vec::new();
        let Some(root) = self.items.get(&self.root) else {
            return areas;
        };
        let root_rect = root.rect;
        if !root_rect.is_finite() || surface(root_rect) <= 0.0 {
            return areas;
        }

        let maximised = self.maximised.filter(|m| self.items.contains_key(m));
        if maximised.is_none() {
            let empty = root.children.is_empty();
            if empty {
                areas.push(Area::new(root_rect, self.root, DropZone::Root));
            }
            if empty || self.settings.outer_drop_zones {
                for side in [Side::Left, Side::Right, Side::Top, Side::Bottom] {
                    let band = edge_band(root_rect, side, self.dimensions.root_edge_size);
                    areas.push(Area::new(band, self.root, DropZone::RootEdge(side)));
                }
            }
        }

        for id in self.subtree(maximised.unwrap_or(self.root), Traversal::PreOrder) {
            if let Some(item) = self.items.get(&id) {
                if item.is_stack() && item.visible {
                    self.push_stack_areas(id, item, &mut areas);
                }
            }
        }
        areas
    }

    fn push_stack_areas(&self, id: ItemId, item: &ContentItem, areas: &mut Vec<Area>) {
        let Some(state) = item.stack() else {
            return;
        };
        let rect = item.rect;
        if !rect.is_finite() || surface(rect) <= 0.0 {
            return;
        }
        let mut push = |rect: Rect, zone| {
            if rect.is_finite() && surface(rect) > 0.0 {
                areas.push(Area::new(rect, id, zone));
            }
        };

        if state.header.show {
            push(state.header_rect, DropZone::StackHeader);
        }
        let active_is_leaf = state
            .active
            .and_then(|a| self.items.get(&a))
            .is_none_or(ContentItem::is_component);
        if !active_is_leaf {
            return;
        }
        if item.children.is_empty() {
            push(rect, DropZone::StackBody);
            return;
        }
        push(rect, DropZone::StackWhole);
        for (side, quadrant) in content_quadrants(state.content_rect) {
            push(quadrant, DropZone::StackSide(side));
        }
    }

    /// Resolve a drop on a stack's whole element from the pointer position.
    fn classify_stack_drop(&self, stack: ItemId, pos: Pos2) -> StackSegment {
        let Some(item) = self.items.get(&stack) else {
            return StackSegment::Body;
        };
        let Some(state) = item.stack() else {
            return StackSegment::Body;
        };
        if state.header.show && state.header_rect.contains(pos) {
            return StackSegment::Header;
        }
        if item.children.is_empty() {
            return StackSegment::Body;
        }
        content_quadrants(state.content_rect)
            .into_iter()
            .find(|(_, quadrant)| quadrant.contains(pos))
            .map_or(StackSegment::Header, |(side, _)| StackSegment::Side(side))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The item being dragged, if any.
    pub fn dragged_item(&self) -> Option<ItemId> {
        match &self.drag {
            Some(DragSession::Item(drag)) => Some(drag.item),
            _ => None,
        }
    }

    /// The area the dragged item would land on if released now.
    pub fn drop_target(&self) -> Option<&Area> {
        match &self.drag {
            Some(DragSession::Item(drag)) => drag.last_valid.as_ref().map(|(area, _)| area),
            _ => None,
        }
    }

    /// What a renderer should highlight for the current drop target.
    pub fn drop_highlight(&self) -> Option<Rect> {
        let Some(DragSession::Item(drag)) = &self.drag else {
            return None;
        };
        let (area, pos) = drag.last_valid?;
        let root_rect = self.root_rect();
        match area.zone {
            DropZone::Root => Some(root_rect),
            DropZone::RootEdge(side) => Some(side_highlight(root_rect, side)),
            DropZone::StackWhole | DropZone::StackHeader | DropZone::StackBody | DropZone::StackSide(_) => {
                let state = self.items.get(&area.content_item)?.stack()?;
                let segment = match area.zone {
                    DropZone::StackHeader => StackSegment::Header,
                    DropZone::StackBody => StackSegment::Body,
                    DropZone::StackSide(side) => StackSegment::Side(side),
                    _ => self.classify_stack_drop(area.content_item, pos),
                };
                Some(match segment {
                    StackSegment::Header => state.header_rect,
                    StackSegment::Body => self.items.get(&area.content_item)?.rect,
                    StackSegment::Side(side) => side_highlight(state.content_rect, side),
                })
            }
        }
    }

    /// Detach `item` and start dragging it.
    pub fn begin_item_drag(&mut self, item: ItemId, pos: Pos2) -> Result<(), LayoutError> {
        if self.drag.is_some() {
            return Err(LayoutError::DragInProgress);
        }
        if !self.settings.reorder_enabled {
            return Err(LayoutError::ReorderDisabled);
        }
        if item == self.root {
            return Err(LayoutError::InvalidInsertion {
                parent: item,
                child: item,
            });
        }

        let origin = self.origin_of(item)?;
        if let Some(home) = origin.first() {
            log::debug!("drag {item:?} out of {:?} at index {}", home.ancestor, home.index);
            self.remove_child(home.ancestor, item, true)?;
        }
        self.start_item_drag(item, origin, pos);
        Ok(())
    }

    fn origin_of(&self, item: ItemId) -> Result<Vec<Origin>, LayoutError> {
        let mut origin = Vec::new();
        let mut child = item;
        while let Some(parent) = self.item(child)?.parent {
            origin.push(Origin {
                ancestor: parent,
                index: self.child_index(parent, child)?,
                axis: self.item(parent)?.axis(),
            });
            child = parent;
        }
        Ok(origin)
    }

    /// Create an item from `config` and start dragging it in from outside the layout.
    pub fn begin_external_drag(&mut self, config: ItemConfig, pos: Pos2) -> Result<ItemId, LayoutError> {
        if self.drag.is_some() {
            return Err(LayoutError::DragInProgress);
        }
        let item = self.create_item(config)?;
        log::debug!("external drag of new {item:?}");
        self.start_item_drag(item, Vec::new(), pos);
        Ok(item)
    }

    fn start_item_drag(
        &mut self,
        item: ItemId,
        origin: Vec<Origin>,
        pos: Pos2,
    ) {
        let mut drag = ItemDrag {
            item,
            origin,
            start: pos,
            pointer: pos,
            areas: self.drop_areas(),
            last_valid: None,
        };
        drag.track(pos);
        self.drag = Some(DragSession::Item(drag));
    }

    /// Move the pointer to `start + delta`.
    pub fn drag(&mut self, delta: Vec2) -> Result<(), LayoutError> {
        match &mut self.drag {
            Some(DragSession::Item(drag)) => {
                let pos = drag.start + delta;
                drag.track(pos);
                Ok(())
            }
            Some(DragSession::Splitter(drag)) => {
                drag.drag(delta);
                Ok(())
            }
            None => Err(LayoutError::NoActiveDrag),
        }
    }

    /// Release the drag.
    pub fn end_drag(&mut self) -> Result<DropOutcome, LayoutError> {
        match self.drag.take().ok_or(LayoutError::NoActiveDrag)? {
            DragSession::Splitter(drag) => {
                self.finish_splitter_drag(&drag)?;
                Ok(DropOutcome::SplitterMoved {
                    container: drag.container,
                    index: drag.index,
                })
            }
            DragSession::Item(drag) => {
                let outcome = self.finish_item_drag(drag);
                self.check_after_drop();
                outcome
            }
        }
    }

    fn check_after_drop(&mut self) {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("layout after drop:\n{}", self.debug_summary(64));
        }
        if cfg!(debug_assertions) {
            let mut last_hash = self.integrity_hash;
            self.log_integrity(&mut last_hash);
            self.integrity_hash = last_hash;
        }
    }

    /// Feed one pointer event of `source`.
    pub fn handle_drag_event(
        &mut self,
        source: &DragSource,
        event: DragEvent,
    ) -> Result<Option<DropOutcome>, LayoutError> {
        match event {
            DragEvent::Start { pos } => {
                match source {
                    DragSource::Item(item) => self.begin_item_drag(*item, pos)?,
                    DragSource::External(config) => {
                        self.begin_external_drag(config.clone(), pos)?;
                    }
                    DragSource::Splitter { container, index } => {
                        self.begin_splitter_drag(*container, *index)?;
                    }
                }
                Ok(None)
            }
            DragEvent::Drag { delta } => self.drag(delta).map(|()| None),
            DragEvent::Stop => self.end_drag().map(Some),
        }
    }

    fn finish_item_drag(&mut self, drag: ItemDrag) -> Result<DropOutcome, LayoutError> {
        let item = drag.item;
        self.item(item)?;

        if let Some((area, pos)) = drag.last_valid {
            if self.items.contains_key(&area.content_item) {
                return match self.apply_drop(item, &area, pos) {
                    Ok((inserted, zone)) => {
                        log::debug!("dropped {item:?} on {:?} {zone:?}", area.content_item);
                        self.emit_global(EventName::ItemDropped, inserted);
                        Ok(DropOutcome::Dropped {
                            item: inserted,
                            target: area.content_item,
                            zone,
                        })
                    }
                    Err(err) => {
                        if self.items.get(&item).is_some_and(|i| i.parent.is_none()) {
                            self.destroy(item);
                        }
                        Err(err)
                    }
                };
            }
        }

        // Leaving may have closed the parent and elided rows or columns above it.
        let attached = drag
            .origin
            .iter()
            .position(|o| self.is_ancestor(self.root, o.ancestor));
        let Some(step) = attached else {
            if !drag.origin.is_empty() {
                log::warn!("nothing {item:?} came from is left; destroying it");
            }
            self.destroy(item);
            return Ok(DropOutcome::Destroyed { item });
        };
        let home = drag.origin[step];
        let returned = match step.checked_sub(1).map(|below| drag.origin[below]) {
            None => self.add_child(home.ancestor, item, Some(home.index)),
            Some(below) => self.return_near(item, home, below),
        };
        match returned {
            Ok(inserted) => {
                let parent = self
                    .items
                    .get(&inserted)
                    .and_then(|i| i.parent)
                    .unwrap_or(home.ancestor);
                Ok(DropOutcome::Returned {
                    item: inserted,
                    parent,
                })
            }
            Err(err) => {
                let detached = self.detached_top(item);
                if detached == self.root {
                    log::warn!("returning {item:?} failed halfway ({err}); keeping it where it is");
                    let parent = self.items.get(&item).and_then(|i| i.parent).unwrap_or(detached);
                    return Ok(DropOutcome::Returned { item, parent });
                }
                log::warn!("can't put {item:?} back into {:?} ({err}); destroying it", home.ancestor);
                self.destroy(detached);
                Ok(DropOutcome::Destroyed { item })
            }
        }
    }

    /// Put `item` back into `home`, whose child `below` closed while the item was away.
    ///
    /// A row or column of two that lost a branch was replaced by the other branch, so the item
    /// goes next to that one on the same side it used to be.
    fn return_near(&mut self, item: ItemId, home: Origin, below: Origin) -> Result<ItemId, LayoutError> {
        let occupant = self.item(home.ancestor)?.children.get(home.index).copied();
        let (Some(occupant), Some(axis)) = (occupant, below.axis) else {
            return self.add_child(home.ancestor, item, Some(home.index));
        };
        let side = Side::along(axis, below.index == 0);
        log::debug!("{:?} is gone; returning {item:?} to the {side:?} of {occupant:?}", below.ancestor);
        if self.item(home.ancestor)?.is_root() {
            self.drop_on_root_edge(item, side)
        } else if self.item(occupant)?.is_stack() {
            self.drop_on_stack_side(occupant, item, side)
        } else {
            self.add_child(home.ancestor, item, Some(home.index))
        }
    }

    fn detached_top(&self, item: ItemId) -> ItemId {
        let mut top = item;
        while let Some(parent) = self.items.get(&top).and_then(|i| i.parent) {
            top = parent;
        }
        top
    }

    /// Insert the detached `item` as `area` dictates. Returns the inserted item and the zone
    /// actually used.
    pub(crate) fn apply_drop(
        &mut self,
        item: ItemId,
        area: &Area,
        pos: Pos2,
    ) -> Result<(ItemId, DropZone), LayoutError> {
        let target = area.content_item;
        match area.zone {
            DropZone::Root => {
                let inserted = self.add_child(self.root, item, None)?;
                Ok((inserted, DropZone::Root))
            }
            DropZone::RootEdge(side) => {
                let inserted = self.drop_on_root_edge(item, side)?;
                Ok((inserted, DropZone::RootEdge(side)))
            }
            DropZone::StackWhole => {
                let segment = self.classify_stack_drop(target, pos);
                self.drop_on_stack(target, item, segment, pos)
            }
            DropZone::StackHeader => self.drop_on_stack(target, item, StackSegment::Header, pos),
            DropZone::StackBody => self.drop_on_stack(target, item, StackSegment::Body, pos),
            DropZone::StackSide(side) => {
                self.drop_on_stack(target, item, StackSegment::Side(side), pos)
            }
        }
    }

    fn drop_on_stack(
        &mut self,
        stack: ItemId,
        item: ItemId,
        segment: StackSegment,
        pos: Pos2,
    ) -> Result<(ItemId, DropZone), LayoutError> {
        let inserted = match segment {
            StackSegment::Header => {
                let index = self.header_drop_index(stack, pos)?;
                let first = self.add_tabs(stack, item, index)?;
                if first != stack {
                    self.set_active_content_item(stack, first)?;
                }
                first
            }
            StackSegment::Body => {
                let index = self.item(stack)?.children.len();
                self.add_tabs(stack, item, index)?
            }
            StackSegment::Side(side) => self.drop_on_stack_side(stack, item, side)?,
        };
        Ok((inserted, segment.zone()))
    }

    /// Add `item` to `stack` at `index` as tabs: a component as itself, a container as its
    /// component leaves. Returns the first tab added, or `stack` if there was none.
    fn add_tabs(&mut self, stack: ItemId, item: ItemId, index: usize) -> Result<ItemId, LayoutError> {
        if self.item(item)?.is_component() {
            return self.insert_child(stack, item, Some(index), false);
        }
        let leaves = self.take_leaves(item);
        self.destroy(item);
        for (offset, &leaf) in leaves.iter().enumerate() {
            self.insert_child(stack, leaf, Some(index + offset), false)?;
        }
        Ok(leaves.first().copied().unwrap_or(stack))
    }

    /// Detach every component under `item`, leaving the containers behind.
    fn take_leaves(&mut self, item: ItemId) -> Vec<ItemId> {
        let leaves: Vec<ItemId> = self
            .subtree(item, Traversal::PreOrder)
            .into_iter()
            .filter(|id| self.items.get(id).is_some_and(ContentItem::is_component))
            .collect();
        for &leaf in &leaves {
            let Some(parent) = self.items.get(&leaf).and_then(|l| l.parent) else {
                continue;
            };
            if let Some(parent) = self.items.get_mut(&parent) {
                parent.children.retain(|&c| c != leaf);
                if let Some(stack) = parent.stack_mut() {
                    if stack.active == Some(leaf) {
                        stack.active = None;
                    }
                }
            }
            if let Some(leaf) = self.items.get_mut(&leaf) {
                leaf.parent = None;
            }
        }
        leaves
    }

    fn new_row_or_column(&mut self, axis: Axis) -> ItemId {
        let id = self.insert_item(ContentItem::new(ItemKind::RowOrColumn(RowOrColumnState {
            axis,
            splitters: Vec::new(),
            configured_total: None,
        })));
        if self.is_initialised {
            self.run_downwards(id, super::TreeOp::Init, false, false);
        }
        id
    }

    /// Give `first` and `second` equal halves along `axis`, dropping their share on the other
    /// axis, which their new container doesn't use.
    fn split_evenly(&mut self, axis: Axis, first: ItemId, second: ItemId) {
        for id in [first, second] {
            if let Some(item) = self.items.get_mut(&id) {
                item.set_size_on(axis, Some(50.0));
                item.set_size_on(axis.cross(), None);
            }
        }
    }

    /// Split `stack` on `side` and put `item` in the new half.
    fn drop_on_stack_side(&mut self, stack: ItemId, item: ItemId, side: Side) -> Result<ItemId, LayoutError> {
        let parent = self.item(stack)?.parent.ok_or(LayoutError::InvalidInsertion {
            parent: stack,
            child: item,
        })?;
        let incoming = match self.item(item)?.item_type() {
            ItemType::Component | ItemType::Row | ItemType::Column => self.wrap_in_stack(item),
            ItemType::Stack => item,
            ItemType::Root => {
                return Err(LayoutError::InvalidInsertion {
                    parent: stack,
                    child: item,
                });
            }
        };
        let axis = side.axis();
        let before = side.inserts_before();

        if self.item(parent)?.axis() == Some(axis) {
            let index = self.child_index(parent, stack)?;
            let siblings = self.undocked_children(parent).len().max(1);
            let position = if before { index } else { index + 1 };
            self.insert_child(parent, incoming, Some(position), true)?;
            let half = self
                .item(stack)?
                .size_on(axis)
                .unwrap_or(100.0 / siblings as f32)
                * 0.5;
            self.item_mut(stack)?.set_size_on(axis, Some(half));
            let incoming_item = self.item_mut(incoming)?;
            incoming_item.set_size_on(axis, Some(half));
            incoming_item.set_size_on(axis.cross(), None);
            self.set_size_downwards(parent);
        } else {
            let container = self.new_row_or_column(axis);
            self.replace_child(parent, stack, container, false)?;
            let (first, second) = if before { (incoming, stack) } else { (stack, incoming) };
            self.insert_child(container, first, None, true)?;
            self.insert_child(container, second, None, true)?;
            self.split_evenly(axis, first, second);
            self.set_size_downwards(parent);
        }
        Ok(incoming)
    }

    /// Add `item` along one outer edge of the layout.
    fn drop_on_root_edge(&mut self, item: ItemId, side: Side) -> Result<ItemId, LayoutError> {
        let root = self.root;
        let Some(&child) = self.item(root)?.children.first() else {
            return self.add_child(root, item, None);
        };
        let incoming = if self.item(item)?.is_component() {
            self.wrap_in_stack(item)
        } else {
            item
        };
        let axis = side.axis();
        let before = side.inserts_before();

        if self.item(child)?.axis() == Some(axis) {
            let children = self.item(child)?.children.clone();
            let (position, neighbour) = if before {
                (0, children.first().copied())
            } else {
                (children.len(), children.last().copied())
            };
            self.insert_child(child, incoming, Some(position), true)?;
            if let Some(neighbour) = neighbour {
                let half = self.item(neighbour)?.size_on(axis).unwrap_or(50.0) * 0.5;
                self.item_mut(neighbour)?.set_size_on(axis, Some(half));
                self.item_mut(incoming)?.set_size_on(axis, Some(half));
            }
        } else {
            let container = self.new_row_or_column(axis);
            self.replace_child(root, child, container, false)?;
            let (first, second) = if before { (incoming, child) } else { (child, incoming) };
            self.insert_child(container, first, None, true)?;
            self.insert_child(container, second, None, true)?;
            self.split_evenly(axis, first, second);
        }
        self.set_size_downwards(root);
        Ok(incoming)
    }
}
