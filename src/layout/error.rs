use super::{ItemId, ItemType};

/// Everything that can go wrong when building or mutating a [`super::LayoutTree`].
///
/// All of these are programmer or configuration errors. Operations validate before they mutate,
/// so a returned error leaves the tree exactly as it was.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutError {
    /// The item does not exist in the tree (destroyed, or never created).
    UnknownItem(ItemId),
    /// `child` is not a direct child of `parent`.
    NotAChild { parent: ItemId, child: ItemId },
    /// `remove_id` was asked to remove an id the item doesn't carry.
    IdNotFound { item: ItemId, id: String },
    /// The root can only hold a single child.
    RootAlreadyHasChild,
    /// Components are leaves.
    LeafCannotHaveChildren(ItemId),
    /// The item can't be inserted there (e.g. a stack into a stack, or an item into its own subtree).
    InvalidInsertion { parent: ItemId, child: ItemId },
    /// The operation requires a stack.
    NotAStack(ItemId),
    /// Only stacks directly inside a row or column can be docked.
    NotDockable(ItemId),
    /// Docking would leave the row/column without a single undocked child.
    CannotDockLast { container: ItemId },
    /// Docking and undocking need at least two children in the container.
    CannotDockSingleChild { container: ItemId },
    /// More than one top-level content item in a [`super::LayoutConfig`].
    TooManyRootItems(usize),
    /// An item `type` string we don't know.
    UnknownItemType(String),
    /// A structurally invalid `content` array.
    InvalidContent {
        item_type: ItemType,
        reason: &'static str,
    },
    /// The container has no splitter with that index.
    InvalidSplitter { container: ItemId, index: usize },
    /// A drag is already running.
    DragInProgress,
    /// Tabs can't be dragged while [`super::Settings::reorder_enabled`] is off.
    ReorderDisabled,
    /// `drag`/`drag_stop` without a drag in progress.
    NoActiveDrag,
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownItem(item) => write!(f, "unknown content item {item:?}"),
            Self::NotAChild { parent, child } => {
                write!(f, "{child:?} is not a child of {parent:?}")
            }
            Self::IdNotFound { item, id } => write!(f, "{item:?} has no id {id:?}"),
            Self::RootAlreadyHasChild => write!(f, "root node can only have a single child"),
            Self::LeafCannotHaveChildren(item) => {
                write!(f, "component {item:?} cannot have children")
            }
            Self::InvalidInsertion { parent, child } => {
                write!(f, "can't insert {child:?} into {parent:?}")
            }
            Self::NotAStack(item) => write!(f, "{item:?} is not a stack"),
            Self::NotDockable(item) => {
                write!(f, "{item:?} can't be docked: it is not a stack inside a row or column")
            }
            Self::CannotDockLast { container } => {
                write!(f, "can't dock child when it is last in {container:?}")
            }
            Self::CannotDockSingleChild { container } => {
                write!(f, "can't dock child when it is the only child of {container:?}")
            }
            Self::TooManyRootItems(count) => write!(
                f,
                "a layout config may hold at most one top-level content item, got {count}"
            ),
            Self::UnknownItemType(found) => write!(f, "unknown content item type {found:?}"),
            Self::InvalidContent { item_type, reason } => {
                write!(f, "invalid content for {item_type:?}: {reason}")
            }
            Self::InvalidSplitter { container, index } => {
                write!(f, "{container:?} has no splitter {index}")
            }
            Self::DragInProgress => write!(f, "a drag is already in progress"),
            Self::ReorderDisabled => write!(f, "dragging items is disabled"),
            Self::NoActiveDrag => write!(f, "no drag in progress"),
        }
    }
}

impl std::error::Error for LayoutError {}
