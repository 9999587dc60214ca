use ahash::HashMap;
use egui::{Pos2, Rect, Vec2};

mod config;
mod debug;
mod docking;
mod drop;
mod error;
mod events;
mod geometry;
mod integrity;
mod maximise;
mod options;
mod persistence;
mod responsive;
mod sizing;
mod splitter;
mod stack;
mod tree;
mod types;

#[cfg(test)]
mod docking_tests;
#[cfg(test)]
mod model_tests;
#[cfg(test)]
mod tree_tests;

pub use config::{HeaderConfig, IdConfig, ItemConfig, LayoutConfig};
pub use drop::{DragEvent, DragSource, DropOutcome};
pub use error::LayoutError;
pub use events::{BubblingEvent, EventName};
pub use geometry::{Area, DropZone, side_highlight, smallest_area_at};
pub use options::{Dimensions, ResponsiveMode, Settings};
pub use tree::{LeafUpdate, Traversal, TreeOp};
pub use types::{
    Axis, ComponentState, ContentItem, Docker, ItemId, ItemKind, ItemType, RowOrColumnState,
    Side, Splitter, StackHeader, StackState,
};

use drop::DragSession;
use events::{EventHub, FrameScheduler, FrameTask};

/// A docking layout: the item tree plus everything needed to size it, drag it and report on it.
///
/// The host drives it with three inputs:
/// - [`Self::update_size`] whenever the host surface changes size,
/// - [`Self::handle_drag_event`] for the pointer stream of a tab, splitter or external drag source,
/// - [`Self::on_animation_frame`] once per frame, to flush deferred work and throttled events.
///
/// Everything the renderer needs comes back out as item rectangles, splitter rectangles, drop
/// areas and the [`LeafUpdate`]s drained by [`Self::take_leaf_updates`].
#[derive(Debug)]
pub struct LayoutTree {
    items: HashMap<ItemId, ContentItem>,
    root: ItemId,
    next_id: u64,

    settings: Settings,
    dimensions: Dimensions,

    is_initialised: bool,
    first_load: bool,
    updating_columns_responsive: bool,
    maximised: Option<ItemId>,

    events: EventHub,
    scheduler: FrameScheduler,
    leaf_updates: Vec<LeafUpdate>,
    drag: Option<DragSession>,
    integrity_hash: u64,
}

impl LayoutTree {
    /// Build the tree described by `config`. Nothing is laid out until [`Self::init`] and
    /// [`Self::update_size`].
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        let LayoutConfig {
            settings,
            dimensions,
            content,
        } = config;

        let mut tree = Self {
            items: HashMap::default(),
            root: ItemId::from_u64(0),
            next_id: 0,
            settings,
            dimensions,
            is_initialised: false,
            first_load: false,
            updating_columns_responsive: false,
            maximised: None,
            events: EventHub::default(),
            scheduler: FrameScheduler::default(),
            leaf_updates: Vec::new(),
            drag: None,
            integrity_hash: 0,
        };

        let root = tree.insert_item(ContentItem::new(ItemKind::Root));
        tree.root = root;
        for item_config in content {
            let child = tree.build_item(item_config, Some(ItemType::Root))?;
            tree.attach_raw(root, child, 0);
        }

        for id in tree.subtree(root, Traversal::PreOrder) {
            tree.refresh_flags(id);
        }
        tree.restore_maximised();

        Ok(tree)
    }

    /// [`Self::new`], [`Self::init`] and a first [`Self::update_size`] in one go.
    pub fn with_size(config: LayoutConfig, size: Vec2) -> Result<Self, LayoutError> {
        let mut tree = Self::new(config)?;
        tree.init();
        tree.update_size(size);
        Ok(tree)
    }

    /// Initialise every item. Items attached later are initialised as they are added.
    pub fn init(&mut self) {
        if self.is_initialised {
            return;
        }
        self.is_initialised = true;
        self.first_load = true;
        self.run_downwards(self.root, TreeOp::Init, false, false);
        log::debug!("layout initialised with {} items", self.items.len());
        self.emit_global(EventName::Initialised, self.root);
    }

    /// Resize the root to the host surface and re-run the layout.
    pub fn update_size(&mut self, size: Vec2) {
        let size = Vec2::new(size.x.max(0.0).floor(), size.y.max(0.0).floor());
        if let Some(root) = self.items.get_mut(&self.root) {
            root.rect = Rect::from_min_size(Pos2::ZERO, size);
        }
        if !self.is_initialised {
            return;
        }
        self.set_size_downwards(self.root);
        self.adjust_columns_responsive();
    }

    pub fn is_initialised(&self) -> bool {
        self.is_initialised
    }

    pub fn root(&self) -> ItemId {
        self.root
    }

    pub fn root_rect(&self) -> Rect {
        self.items.get(&self.root).map_or(Rect::NOTHING, |root| root.rect)
    }

    pub fn get(&self, id: ItemId) -> Option<&ContentItem> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Number of live items, detached ones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the root has no child.
    pub fn is_empty(&self) -> bool {
        self.items
            .get(&self.root)
            .is_none_or(|root| root.children.is_empty())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Change pixel dimensions and re-run the layout.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
        if self.is_initialised {
            self.set_size_downwards(self.root);
        }
    }

    /// Drain the pending notifications for the host's component leaves.
    pub fn take_leaf_updates(&mut self) -> Vec<LeafUpdate> {
        std::mem::take(&mut self.leaf_updates)
    }

    /// Register a listener for events that bubbled all the way up.
    ///
    /// Throttled events ([`EventName::is_throttled`]) arrive on the next
    /// [`Self::on_animation_frame`], once per frame.
    pub fn on(&mut self, name: EventName, listener: impl FnMut(&BubblingEvent) + 'static) {
        self.events.add_global_listener(name, Box::new(listener));
    }

    /// Register a listener on one item. It sees events from the item and its descendants and
    /// may stop their propagation.
    pub fn on_item(
        &mut self,
        item: ItemId,
        name: EventName,
        listener: impl FnMut(&mut BubblingEvent) + 'static,
    ) -> Result<(), LayoutError> {
        self.item(item)?;
        self.events.add_item_listener(item, name, Box::new(listener));
        Ok(())
    }

    /// Run the work deferred to this frame: pending subtree layouts, then throttled events.
    pub fn on_animation_frame(&mut self) {
        for task in self.scheduler.take_due() {
            match task {
                FrameTask::UpdateSize(item) => {
                    if self.items.contains_key(&item) {
                        self.set_size_downwards(item);
                    }
                }
                FrameTask::Propagate(event) => {
                    log::trace!("frame: propagating {:?} from {:?}", event.name, event.origin);
                    self.events.notify_global(&event);
                }
            }
        }
    }

    pub fn has_pending_frame_tasks(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub(crate) fn item(&self, id: ItemId) -> Result<&ContentItem, LayoutError> {
        self.items.get(&id).ok_or(LayoutError::UnknownItem(id))
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Result<&mut ContentItem, LayoutError> {
        self.items.get_mut(&id).ok_or(LayoutError::UnknownItem(id))
    }

    pub(crate) fn insert_item(&mut self, item: ContentItem) -> ItemId {
        let id = ItemId::from_u64(self.next_id);
        self.next_id += 1;
        self.items.insert(id, item);
        id
    }

    /// Send `name` from `origin` up the parent chain. Reaching the root hands it to the global
    /// listeners, right away or on the next frame for throttled events.
    pub(crate) fn emit_bubbling(&mut self, origin: ItemId, name: EventName) {
        let mut event = BubblingEvent::new(name, origin);
        let mut current = Some(origin);
        let mut top = origin;
        while let Some(id) = current {
            self.events.notify_item(id, &mut event);
            if event.is_propagation_stopped() {
                return;
            }
            top = id;
            current = self.items.get(&id).and_then(|item| item.parent);
        }
        if top != self.root {
            // Detached subtree.
            return;
        }
        if name.is_throttled() {
            self.scheduler.schedule(FrameTask::Propagate(event));
        } else {
            self.events.notify_global(&event);
        }
    }

    pub(crate) fn emit_global(&mut self, name: EventName, origin: ItemId) {
        let event = BubblingEvent::new(name, origin);
        self.events.notify_global(&event);
    }

    pub(crate) fn schedule_update_size(&mut self, item: ItemId) {
        self.scheduler.schedule(FrameTask::UpdateSize(item));
    }
}
