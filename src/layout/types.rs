use egui::{Rect, Vec2};

/// Identifies a [`ContentItem`] inside a [`super::LayoutTree`].
///
/// Ids are never reused within one tree, so a stale id simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(u64);

impl ItemId {
    pub const fn from_u64(n: u64) -> Self {
        Self(n)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// The dimension a row or column distributes along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// A row: children share the width.
    Horizontal,
    /// A column: children share the height.
    Vertical,
}

impl Axis {
    /// The extent of `size` along this axis.
    pub fn extent(self, size: Vec2) -> f32 {
        match self {
            Self::Horizontal => size.x,
            Self::Vertical => size.y,
        }
    }

    /// The extent of `size` across this axis.
    pub fn cross_extent(self, size: Vec2) -> f32 {
        match self {
            Self::Horizontal => size.y,
            Self::Vertical => size.x,
        }
    }

    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    pub fn container_type(self) -> ItemType {
        match self {
            Self::Horizontal => ItemType::Row,
            Self::Vertical => ItemType::Column,
        }
    }
}

/// One side of a rectangle. Used for header placement, stack drop quadrants and root edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Left/right splits happen in a row, top/bottom splits in a column.
    pub fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// The leading (`before`) or trailing side along `axis`.
    pub(crate) fn along(axis: Axis, before: bool) -> Self {
        match (axis, before) {
            (Axis::Horizontal, true) => Self::Left,
            (Axis::Horizontal, false) => Self::Right,
            (Axis::Vertical, true) => Self::Top,
            (Axis::Vertical, false) => Self::Bottom,
        }
    }

    /// Whether an item dropped on this side goes before its neighbour.
    pub fn inserts_before(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }

    /// Headers on the left or right run vertically.
    pub fn is_sided(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// The closed set of node variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum ItemType {
    Root,
    Row,
    Column,
    Stack,
    Component,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Row => "row",
            Self::Column => "column",
            Self::Stack => "stack",
            Self::Component => "component",
        }
    }

    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::Row => Some(Axis::Horizontal),
            Self::Column => Some(Axis::Vertical),
            Self::Root | Self::Stack | Self::Component => None,
        }
    }
}

impl std::str::FromStr for ItemType {
    type Err = super::LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(Self::Root),
            "row" => Ok(Self::Row),
            "column" => Ok(Self::Column),
            "stack" => Ok(Self::Stack),
            "component" => Ok(Self::Component),
            other => Err(super::LayoutError::UnknownItemType(other.to_owned())),
        }
    }
}

impl TryFrom<String> for ItemType {
    type Error = super::LayoutError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ItemType> for String {
    fn from(item_type: ItemType) -> Self {
        item_type.as_str().to_owned()
    }
}

/// The gap between two adjacent children of a row or column.
///
/// Splitter `i` sits between child `i` and child `i + 1`. Splitters are rebuilt on every layout
/// pass and only exist while the container has at least two children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splitter {
    pub rect: Rect,
    /// Hidden next to a docked stack.
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RowOrColumnState {
    pub(crate) axis: Axis,
    pub(crate) splitters: Vec<Splitter>,
    /// Sum of the undocked children's percentages as loaded, when all of them were given.
    pub(crate) configured_total: Option<f32>,
}

impl RowOrColumnState {
    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn splitters(&self) -> &[Splitter] {
        &self.splitters
    }
}

/// The tab strip of a stack.
#[derive(Clone, Debug, PartialEq)]
pub struct StackHeader {
    pub(crate) show: bool,
    pub(crate) side: Side,
    /// What the config asked for.
    pub(crate) closable_config: bool,
    /// Whether the stack's position allows closing it (not the last undocked child).
    pub(crate) position_closable: bool,
    pub(crate) dockable: bool,
    /// Derived: config, position, and every tab closable.
    pub(crate) closable: bool,
}

impl StackHeader {
    pub fn show(&self) -> bool {
        self.show
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }

    pub fn is_dockable(&self) -> bool {
        self.dockable
    }
}

/// Present on a stack only while it is docked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Docker {
    pub axis: Axis,
    /// The percentage the stack held before docking.
    pub size: f32,
    /// The pixel extent of its content before docking.
    pub real_size: f32,
    pub collapsed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StackState {
    pub(crate) active: Option<ItemId>,
    pub(crate) header: StackHeader,
    pub(crate) docker: Option<Docker>,
    pub(crate) header_rect: Rect,
    pub(crate) content_rect: Rect,
}

impl StackState {
    pub fn active(&self) -> Option<ItemId> {
        self.active
    }

    pub fn header(&self) -> &StackHeader {
        &self.header
    }

    pub fn docker(&self) -> Option<&Docker> {
        self.docker.as_ref()
    }

    pub fn is_docked(&self) -> bool {
        self.docker.is_some()
    }

    pub fn header_rect(&self) -> Rect {
        self.header_rect
    }

    pub fn content_rect(&self) -> Rect {
        self.content_rect
    }
}

/// The opaque leaf: the core only knows what to call it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentState {
    pub component_type: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    Root,
    RowOrColumn(RowOrColumnState),
    Stack(StackState),
    Component(ComponentState),
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Root => ItemType::Root,
            Self::RowOrColumn(linear) => linear.axis.container_type(),
            Self::Stack(_) => ItemType::Stack,
            Self::Component(_) => ItemType::Component,
        }
    }
}

/// A node of the layout tree.
///
/// The tree owns every node; `parent` is a plain back-reference by id.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentItem {
    pub(crate) kind: ItemKind,
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
    pub(crate) ids: Vec<String>,
    pub(crate) width: Option<f32>,
    pub(crate) height: Option<f32>,
    pub(crate) min_width: Option<f32>,
    pub(crate) min_height: Option<f32>,
    pub(crate) is_closable: bool,
    pub(crate) is_maximised: bool,
    pub(crate) is_initialised: bool,
    pub(crate) rect: Rect,
    pub(crate) visible: bool,
}

impl ContentItem {
    pub(crate) fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            ids: Vec::new(),
            width: None,
            height: None,
            min_width: None,
            min_height: None,
            is_closable: true,
            is_maximised: false,
            is_initialised: false,
            rect: Rect::NOTHING,
            visible: true,
        }
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn height(&self) -> Option<f32> {
        self.height
    }

    /// The declared percentage along `axis`, relative to the parent.
    pub fn size_on(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub(crate) fn set_size_on(&mut self, axis: Axis, size: Option<f32>) {
        match axis {
            Axis::Horizontal => self.width = size,
            Axis::Vertical => self.height = size,
        }
    }

    pub fn min_width(&self) -> Option<f32> {
        self.min_width
    }

    pub fn min_height(&self) -> Option<f32> {
        self.min_height
    }

    pub fn min_on(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }

    /// The item's own closability flag (see [`StackHeader::is_closable`] for stacks).
    pub fn is_closable(&self) -> bool {
        self.is_closable
    }

    pub fn is_maximised(&self) -> bool {
        self.is_maximised
    }

    pub fn is_initialised(&self) -> bool {
        self.is_initialised
    }

    /// The last laid-out box, in host-surface pixels.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_stack(&self) -> bool {
        matches!(self.kind, ItemKind::Stack(_))
    }

    pub fn is_component(&self) -> bool {
        matches!(self.kind, ItemKind::Component(_))
    }

    pub fn is_row_or_column(&self) -> bool {
        matches!(self.kind, ItemKind::RowOrColumn(_))
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, ItemKind::Root)
    }

    pub fn axis(&self) -> Option<Axis> {
        match &self.kind {
            ItemKind::RowOrColumn(linear) => Some(linear.axis),
            _ => None,
        }
    }

    pub fn row_or_column(&self) -> Option<&RowOrColumnState> {
        match &self.kind {
            ItemKind::RowOrColumn(linear) => Some(linear),
            _ => None,
        }
    }

    pub(crate) fn row_or_column_mut(&mut self) -> Option<&mut RowOrColumnState> {
        match &mut self.kind {
            ItemKind::RowOrColumn(linear) => Some(linear),
            _ => None,
        }
    }

    pub fn stack(&self) -> Option<&StackState> {
        match &self.kind {
            ItemKind::Stack(stack) => Some(stack),
            _ => None,
        }
    }

    pub(crate) fn stack_mut(&mut self) -> Option<&mut StackState> {
        match &mut self.kind {
            ItemKind::Stack(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn component(&self) -> Option<&ComponentState> {
        match &self.kind {
            ItemKind::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_docked(&self) -> bool {
        self.stack().is_some_and(StackState::is_docked)
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }
}
