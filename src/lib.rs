//! A headless docking layout engine.
//!
//! The engine keeps a tree of rows, columns, tab stacks and component leaves, computes pixel
//! geometry for every node, runs splitter drags and docking, and resolves where a dragged item
//! lands. Rendering stays with the host: it feeds the host surface size and pointer stream in, and
//! reads rectangles and [`LeafUpdate`]s back out.

#![forbid(unsafe_code)]

pub mod dock_builder;
pub mod layout;

pub use dock_builder::{DockBuilder, DockNodeId, SplitDirection};
pub use layout::{
    Area, Axis, BubblingEvent, ComponentState, ContentItem, Dimensions, Docker, DragEvent,
    DragSource, DropOutcome, DropZone, EventName, HeaderConfig, IdConfig, ItemConfig, ItemId,
    ItemKind, ItemType, LayoutConfig, LayoutError, LayoutTree, LeafUpdate, ResponsiveMode,
    RowOrColumnState, Settings, Side, Splitter, StackHeader, StackState, Traversal, TreeOp,
};
