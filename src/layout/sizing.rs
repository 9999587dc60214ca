//! Turning percentages into pixels.
//!
//! A row or column lays out its children in two passes. The relative pass brings the declared
//! percentages of the undocked children to a sum of 100; the absolute pass hands out whole pixels
//! after the splitters and docked headers have taken theirs.

use egui::{Pos2, Rect};

use super::geometry::split_header;
use super::{Axis, ContentItem, ItemId, ItemKind, LayoutTree, LeafUpdate, Splitter};

/// Pixel extents of one row or column layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct AbsoluteSizes {
    /// Extent of each child along the axis.
    pub items: Vec<f32>,
    /// Thickness of a visible splitter, possibly scaled down.
    pub splitter: f32,
    /// `hidden_splitters[i]` is set when splitter `i` sits next to a docked child.
    pub hidden_splitters: Vec<bool>,
}

/// Bring the shares of the undocked entries to a sum of 100. Docked entries are left alone.
pub(crate) fn normalize_relative_sizes(sizes: &mut [Option<f32>], docked: &[bool]) {
    let entries: Vec<usize> = (0..sizes.len()).filter(|&i| !docked[i]).collect();
    if entries.is_empty() {
        return;
    }

    let mut total: f32 = entries.iter().filter_map(|&i| sizes[i]).sum();
    let undefined: Vec<usize> = entries.iter().copied().filter(|&i| sizes[i].is_none()).collect();

    if total.round() == 100.0 && undefined.is_empty() {
        return;
    }

    if total.round() < 100.0 && !undefined.is_empty() {
        let share = (100.0 - total) / undefined.len() as f32;
        for i in undefined {
            sizes[i] = Some(share);
        }
        return;
    }

    // Over-full, or exactly full with undefined entries left: give those a share and rescale.
    for &i in &undefined {
        sizes[i] = Some(50.0);
        total += 50.0;
    }

    if total <= 0.0 {
        let share = 100.0 / entries.len() as f32;
        for &i in &entries {
            sizes[i] = Some(share);
        }
        return;
    }

    let factor = 100.0 / total;
    for &i in &entries {
        sizes[i] = sizes[i].map(|size| size * factor);
    }
}

/// Lift undocked entries narrower than `min` up to it, taking the pixels from the wider ones.
///
/// Nothing changes when there is not enough surplus to pay for the shortfall. Returns whether the
/// shares were rewritten.
pub(crate) fn respect_min_item_width(
    sizes: &mut [Option<f32>],
    pixels: &[f32],
    docked: &[bool],
    min: f32,
) -> bool {
    if min <= 0.0 {
        return false;
    }
    let entries: Vec<usize> = (0..sizes.len()).filter(|&i| !docked[i]).collect();
    let total: f32 = entries.iter().map(|&i| pixels[i]).sum();
    if total <= 0.0 {
        return false;
    }

    let mut under = 0.0;
    let mut over = 0.0;
    let mut widths: Vec<(usize, f32, bool)> = Vec::with_capacity(entries.len());
    for &i in &entries {
        let width = pixels[i];
        if width < min {
            under += min - width;
            widths.push((i, min, false));
        } else {
            over += width - min;
            widths.push((i, width, true));
        }
    }

    if under == 0.0 || under > over {
        return false;
    }

    let reduce = under / over;
    let mut remaining = under;
    for (_, width, is_over) in &mut widths {
        if *is_over {
            let cut = ((*width - min) * reduce).round();
            *width -= cut;
            remaining -= cut;
        }
    }
    if remaining != 0.0 {
        if let Some((_, width, _)) = widths.last_mut() {
            *width -= remaining;
        }
    }

    for (i, width, _) in widths {
        sizes[i] = Some(width / total * 100.0);
    }
    true
}

/// Split `extent` pixels between children with the given shares.
///
/// Visible splitters and docked headers are paid first, scaled down together if they don't fit.
/// Undocked children then get the floor of their share of the rest, and the leftover pixels go
/// one by one to the undocked children from the first on, so the extents always add up exactly.
pub(crate) fn absolute_sizes(
    extent: f32,
    shares: &[Option<f32>],
    docked: &[bool],
    splitter: f32,
    header: f32,
) -> AbsoluteSizes {
    let count = shares.len();
    if count == 0 {
        return AbsoluteSizes::default();
    }
    let extent = extent.max(0.0).floor();

    let mut hidden_splitters = vec![false; count - 1];
    for (i, _) in docked.iter().enumerate().filter(|(_, d)| **d) {
        if let Some(hidden) = hidden_splitters.get_mut(i.max(1) - 1) {
            *hidden = true;
        }
    }
    let visible_splitters = hidden_splitters.iter().filter(|h| !**h).count() as f32;
    let docked_count = docked.iter().filter(|d| **d).count() as f32;

    let fixed = visible_splitters * splitter + docked_count * header;
    let (splitter, header) = if fixed > extent && fixed > 0.0 {
        let scale = extent / fixed;
        ((splitter * scale).floor(), (header * scale).floor())
    } else {
        (splitter, header)
    };
    let available = (extent - visible_splitters * splitter - docked_count * header).max(0.0);

    let undocked: Vec<usize> = (0..count).filter(|&i| !docked[i]).collect();
    let sum: f32 = undocked.iter().filter_map(|&i| shares[i]).sum();

    let mut items: Vec<f32> = (0..count)
        .map(|i| {
            if docked[i] {
                header
            } else if sum > 0.0 {
                let share = f64::from(shares[i].unwrap_or(0.0));
                (f64::from(available) * share / f64::from(sum)).floor() as f32
            } else {
                (available / undocked.len() as f32).floor()
            }
        })
        .collect();

    let assigned: f32 = undocked.iter().map(|&i| items[i]).sum();
    let remainder = (available - assigned).round() as i64;
    if undocked.is_empty() {
        if let Some(last) = items.last_mut() {
            *last += remainder.max(0) as f32;
        }
    } else if remainder > 0 {
        for k in 0..remainder as usize {
            items[undocked[k % undocked.len()]] += 1.0;
        }
    } else {
        for k in 0..remainder.unsigned_abs() as usize {
            let i = undocked[undocked.len() - 1 - k % undocked.len()];
            items[i] = (items[i] - 1.0).max(0.0);
        }
    }

    AbsoluteSizes {
        items,
        splitter,
        hidden_splitters,
    }
}

/// The slice of `rect` from `start` to `start + len` along `axis`.
pub(crate) fn span(rect: Rect, axis: Axis, start: f32, len: f32) -> Rect {
    match axis {
        Axis::Horizontal => Rect::from_min_max(
            Pos2::new(start, rect.min.y),
            Pos2::new(start + len, rect.max.y),
        ),
        Axis::Vertical => Rect::from_min_max(
            Pos2::new(rect.min.x, start),
            Pos2::new(rect.max.x, start + len),
        ),
    }
}

fn axis_start(rect: Rect, axis: Axis) -> f32 {
    match axis {
        Axis::Horizontal => rect.min.x,
        Axis::Vertical => rect.min.y,
    }
}

impl LayoutTree {
    /// Lay out the direct children of `id` inside its rectangle.
    pub(crate) fn layout_item(&mut self, id: ItemId) {
        let Some(item) = self.items.get(&id) else {
            return;
        };
        match &item.kind {
            ItemKind::Root => {
                let rect = item.rect;
                let visible = item.visible;
                let children = item.children.clone();
                for child in children {
                    self.place_child(child, rect, visible);
                }
            }
            ItemKind::RowOrColumn(_) => self.layout_row_or_column(id),
            ItemKind::Stack(_) => self.layout_stack(id),
            ItemKind::Component(_) => {}
        }
    }

    /// Give `child` its rectangle and visibility, telling the host about leaf changes.
    ///
    /// A maximised child covers the whole root instead.
    fn place_child(&mut self, child: ItemId, rect: Rect, visible: bool) {
        let rect = if self.maximised == Some(child) {
            self.root_rect()
        } else {
            rect
        };
        let Some(item) = self.items.get_mut(&child) else {
            return;
        };
        let resized = item.rect != rect;
        item.rect = rect;
        let is_component = item.is_component();
        if is_component && resized && rect.is_finite() {
            self.leaf_updates.push(LeafUpdate::Resized { item: child, rect });
        }
        self.set_visible(child, visible);
    }

    fn layout_row_or_column(&mut self, id: ItemId) {
        let Some(item) = self.items.get(&id) else {
            return;
        };
        let Some(axis) = item.axis() else {
            return;
        };
        let rect = item.rect;
        let visible = item.visible;
        let children = item.children.clone();

        let docked: Vec<bool> = children
            .iter()
            .map(|c| self.items.get(c).is_some_and(ContentItem::is_docked))
            .collect();
        let mut shares: Vec<Option<f32>> = children
            .iter()
            .map(|c| self.items.get(c).and_then(|c| c.size_on(axis)))
            .collect();
        normalize_relative_sizes(&mut shares, &docked);

        let extent = if rect.is_finite() {
            axis.extent(rect.size())
        } else {
            0.0
        };
        let splitter = self.dimensions.border_width;
        let header = self.dimensions.header_height;
        let mut sizes = absolute_sizes(extent, &shares, &docked, splitter, header);
        if axis == Axis::Horizontal
            && children.len() > 1
            && respect_min_item_width(
                &mut shares,
                &sizes.items,
                &docked,
                self.dimensions.min_item_width,
            )
        {
            sizes = absolute_sizes(extent, &shares, &docked, splitter, header);
        }

        for (i, &child) in children.iter().enumerate() {
            if docked[i] {
                continue;
            }
            if let Some(item) = self.items.get_mut(&child) {
                item.set_size_on(axis, shares[i]);
            }
        }

        if !rect.is_finite() {
            return;
        }

        let mut cursor = axis_start(rect, axis);
        let mut splitters = Vec::with_capacity(children.len().saturating_sub(1));
        for (i, &child) in children.iter().enumerate() {
            let len = sizes.items[i];
            self.place_child(child, span(rect, axis, cursor, len), visible);
            cursor += len;
            if let Some(&hidden) = sizes.hidden_splitters.get(i) {
                let thickness = if hidden { 0.0 } else { sizes.splitter };
                splitters.push(Splitter {
                    rect: span(rect, axis, cursor, thickness),
                    visible: !hidden,
                });
                cursor += thickness;
            }
        }

        if let Some(ItemKind::RowOrColumn(state)) = self.items.get_mut(&id).map(|item| &mut item.kind) {
            state.splitters = splitters;
        }
    }

    fn layout_stack(&mut self, id: ItemId) {
        let Some(item) = self.items.get(&id) else {
            return;
        };
        let Some(stack) = item.stack() else {
            return;
        };
        let rect = item.rect;
        let visible = item.visible;
        let children = item.children.clone();
        let active = stack.active;
        let docked = stack.is_docked();
        let thickness = if stack.header.show {
            self.dimensions.header_height
        } else {
            0.0
        };

        let (header_rect, content_rect) = if rect.is_finite() {
            split_header(rect, stack.header.side, thickness)
        } else {
            (Rect::NOTHING, Rect::NOTHING)
        };
        if let Some(stack) = self.items.get_mut(&id).and_then(ContentItem::stack_mut) {
            stack.header_rect = header_rect;
            stack.content_rect = content_rect;
        }

        for child in children {
            let shown = visible && !docked && active == Some(child);
            self.place_child(child, content_rect, shown);
        }
    }
}
