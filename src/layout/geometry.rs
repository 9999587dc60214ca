use std::cmp::Ordering;

use egui::{Pos2, Rect, Vec2};

use super::{ItemId, Side};

/// What happens when something is dropped on an [`Area`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropZone {
    /// The whole root of an empty layout.
    Root,
    /// A band along one outer edge of the layout.
    RootEdge(Side),
    /// A stack's full element. The segment is re-classified from the pointer at drop time.
    StackWhole,
    /// Insert as a tab.
    StackHeader,
    /// The body of an empty stack.
    StackBody,
    /// Split next to the stack.
    StackSide(Side),
}

/// A closed rectangle in host-surface pixels with its cached surface.
///
/// `surface` is recomputed on every change of the rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Area {
    rect: Rect,
    surface: f32,
    pub content_item: ItemId,
    pub zone: DropZone,
}

impl Area {
    pub fn new(rect: Rect, content_item: ItemId, zone: DropZone) -> Self {
        Self {
            rect,
            surface: surface(rect),
            content_item,
            zone,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn surface(&self) -> f32 {
        self.surface
    }

    pub fn x1(&self) -> f32 {
        self.rect.min.x
    }

    pub fn y1(&self) -> f32 {
        self.rect.min.y
    }

    pub fn x2(&self) -> f32 {
        self.rect.max.x
    }

    pub fn y2(&self) -> f32 {
        self.rect.max.y
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        self.surface = surface(rect);
    }

    /// Copy `rect` over this area, keeping its owner and zone.
    #[must_use]
    pub fn merged_with(mut self, rect: Rect) -> Self {
        self.set_rect(rect);
        self
    }

    /// Strict containment: points on the border belong to no area.
    pub fn contains(&self, pos: Pos2) -> bool {
        contains_strict(self.rect, pos)
    }
}

pub fn surface(rect: Rect) -> f32 {
    (rect.max.x - rect.min.x) * (rect.max.y - rect.min.y)
}

pub fn contains_strict(rect: Rect, pos: Pos2) -> bool {
    rect.min.x < pos.x && pos.x < rect.max.x && rect.min.y < pos.y && pos.y < rect.max.y
}

/// Orders areas so that smaller (more specific) zones come first.
pub fn compare_surface(a: &Area, b: &Area) -> Ordering {
    a.surface.total_cmp(&b.surface)
}

/// The smallest-surface area containing `pos`. The earliest candidate wins ties.
pub fn smallest_area_at(areas: &[Area], pos: Pos2) -> Option<&Area> {
    areas
        .iter()
        .filter(|area| area.contains(pos))
        .min_by(|a, b| compare_surface(a, b))
}

/// Split `rect` into `(header, content)` with the header of `thickness` on `side`.
pub(crate) fn split_header(rect: Rect, side: Side, thickness: f32) -> (Rect, Rect) {
    match side {
        Side::Top => {
            let t = thickness.min(rect.height()).max(0.0);
            (
                Rect::from_min_max(rect.min, Pos2::new(rect.max.x, rect.min.y + t)),
                Rect::from_min_max(Pos2::new(rect.min.x, rect.min.y + t), rect.max),
            )
        }
        Side::Bottom => {
            let t = thickness.min(rect.height()).max(0.0);
            (
                Rect::from_min_max(Pos2::new(rect.min.x, rect.max.y - t), rect.max),
                Rect::from_min_max(rect.min, Pos2::new(rect.max.x, rect.max.y - t)),
            )
        }
        Side::Left => {
            let t = thickness.min(rect.width()).max(0.0);
            (
                Rect::from_min_max(rect.min, Pos2::new(rect.min.x + t, rect.max.y)),
                Rect::from_min_max(Pos2::new(rect.min.x + t, rect.min.y), rect.max),
            )
        }
        Side::Right => {
            let t = thickness.min(rect.width()).max(0.0);
            (
                Rect::from_min_max(Pos2::new(rect.max.x - t, rect.min.y), rect.max),
                Rect::from_min_max(rect.min, Pos2::new(rect.max.x - t, rect.max.y)),
            )
        }
    }
}

/// A band of `size` pixels along `side` of `rect`.
pub(crate) fn edge_band(rect: Rect, side: Side, size: f32) -> Rect {
    split_header(rect, side, size).0
}

/// The four drop quadrants of a stack's content area.
///
/// Left and right take the outer quarters at full height; top and bottom split the middle half.
pub(crate) fn content_quadrants(content: Rect) -> [(Side, Rect); 4] {
    let w = content.width();
    let h = content.height();
    let x = |f: f32| content.min.x + w * f;
    let y = |f: f32| content.min.y + h * f;
    [
        (
            Side::Left,
            Rect::from_min_max(content.min, Pos2::new(x(0.25), content.max.y)),
        ),
        (
            Side::Top,
            Rect::from_min_max(Pos2::new(x(0.25), content.min.y), Pos2::new(x(0.75), y(0.5))),
        ),
        (
            Side::Right,
            Rect::from_min_max(Pos2::new(x(0.75), content.min.y), content.max),
        ),
        (
            Side::Bottom,
            Rect::from_min_max(Pos2::new(x(0.25), y(0.5)), Pos2::new(x(0.75), content.max.y)),
        ),
    ]
}

/// The preview rectangle a renderer should highlight for a stack side drop.
pub fn side_highlight(content: Rect, side: Side) -> Rect {
    let half = Vec2::new(content.width() * 0.5, content.height() * 0.5);
    match side {
        Side::Left => Rect::from_min_size(content.min, Vec2::new(half.x, content.height())),
        Side::Right => Rect::from_min_max(Pos2::new(content.min.x + half.x, content.min.y), content.max),
        Side::Top => Rect::from_min_size(content.min, Vec2::new(content.width(), half.y)),
        Side::Bottom => Rect::from_min_max(Pos2::new(content.min.x, content.min.y + half.y), content.max),
    }
}
