use egui::{Rect, Vec2};

use super::drop::DragSession;
use super::{Axis, ContentItem, EventName, ItemId, LayoutError, LayoutTree};

/// An in-progress drag of the splitter between two children of a row or column.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SplitterDrag {
    pub container: ItemId,
    pub index: usize,
    pub axis: Axis,
    /// Most negative allowed offset: the item before shrinks to its minimum.
    pub min_offset: f32,
    /// Most positive allowed offset: the item after shrinks to its minimum.
    pub max_offset: f32,
    pub offset: f32,
}

impl SplitterDrag {
    /// Clamp a pointer delta into the allowed range and remember it.
    pub(crate) fn drag(&mut self, delta: Vec2) -> f32 {
        let along = self.axis.extent(delta);
        self.offset = along.clamp(self.min_offset, self.max_offset);
        self.offset
    }
}

/// Translate `rect` by `offset` along `axis`.
fn shifted(rect: Rect, axis: Axis, offset: f32) -> Rect {
    match axis {
        Axis::Horizontal => rect.translate(Vec2::new(offset, 0.0)),
        Axis::Vertical => rect.translate(Vec2::new(0.0, offset)),
    }
}

impl LayoutTree {
    /// The pixel minimum of `item` along `axis`: the largest declared minimum among the item and
    /// its direct children, and never less than the container minimum.
    fn min_extent(&self, item: ItemId, axis: Axis) -> f32 {
        let floor = match axis {
            Axis::Horizontal => self.dimensions.min_item_width,
            Axis::Vertical => self.dimensions.min_item_height,
        };
        let Some(entry) = self.items.get(&item) else {
            return floor;
        };
        entry
            .children
            .iter()
            .filter_map(|c| self.items.get(c))
            .chain(std::iter::once(entry))
            .filter_map(|c| c.min_on(axis))
            .fold(floor, f32::max)
    }

    /// Start dragging splitter `index` of `container`, the one between child `index` and child
    /// `index + 1`.
    pub fn begin_splitter_drag(&mut self, container: ItemId, index: usize) -> Result<(), LayoutError> {
        if self.drag.is_some() {
            return Err(LayoutError::DragInProgress);
        }
        let item = self.item(container)?;
        let invalid = LayoutError::InvalidSplitter { container, index };
        let Some(state) = item.row_or_column() else {
            return Err(invalid);
        };
        let axis = state.axis;
        if !state.splitters.get(index).is_some_and(|s| s.visible) {
            return Err(invalid);
        }
        let (Some(&before), Some(&after)) = (item.children.get(index), item.children.get(index + 1))
        else {
            return Err(invalid);
        };

        let docked = |id: ItemId| self.items.get(&id).is_some_and(ContentItem::is_docked);
        if docked(before) || docked(after) {
            return Err(invalid);
        }

        let before_extent = axis.extent(self.item(before)?.rect.size());
        let after_extent = axis.extent(self.item(after)?.rect.size());
        let min_offset = (-(before_extent - self.min_extent(before, axis))).min(0.0);
        let max_offset = (after_extent - self.min_extent(after, axis)).max(0.0);

        log::trace!("splitter drag {container:?}#{index}: range [{min_offset}, {max_offset}]");
        self.drag = Some(DragSession::Splitter(SplitterDrag {
            container,
            index,
            axis,
            min_offset,
            max_offset,
            offset: 0.0,
        }));
        Ok(())
    }

    /// Where the dragged splitter is drawn right now.
    pub fn splitter_drag_rect(&self) -> Option<Rect> {
        let Some(DragSession::Splitter(drag)) = &self.drag else {
            return None;
        };
        let splitter = self
            .items
            .get(&drag.container)?
            .row_or_column()?
            .splitters
            .get(drag.index)?;
        Some(shifted(splitter.rect, drag.axis, drag.offset))
    }

    /// Split the pair's combined share at the released splitter position.
    ///
    /// The layout pass runs on the next animation frame.
    pub(crate) fn finish_splitter_drag(&mut self, drag: &SplitterDrag) -> Result<(), LayoutError> {
        let item = self.item(drag.container)?;
        let invalid = LayoutError::InvalidSplitter {
            container: drag.container,
            index: drag.index,
        };
        let (Some(&before), Some(&after)) = (
            item.children.get(drag.index),
            item.children.get(drag.index + 1),
        ) else {
            return Err(invalid);
        };

        let axis = drag.axis;
        let before_item = self.item(before)?;
        let after_item = self.item(after)?;
        let size_before = axis.extent(before_item.rect.size());
        let size_after = axis.extent(after_item.rect.size());
        let total = before_item.size_on(axis).unwrap_or(0.0) + after_item.size_on(axis).unwrap_or(0.0);

        let pixels = size_before + size_after;
        let ratio = if pixels > 0.0 {
            ((drag.offset + size_before) / pixels).clamp(0.0, 1.0)
        } else {
            0.5
        };

        self.item_mut(before)?.set_size_on(axis, Some(ratio * total));
        self.item_mut(after)?.set_size_on(axis, Some((1.0 - ratio) * total));

        log::debug!(
            "splitter {:?}#{} released at {:+}px, ratio {ratio:.3}",
            drag.container,
            drag.index,
            drag.offset
        );
        self.schedule_update_size(drag.container);
        self.emit_bubbling(drag.container, EventName::StateChanged);
        Ok(())
    }
}
