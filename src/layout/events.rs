use ahash::{HashMap, HashSet};

use super::ItemId;

/// Names of the events a [`super::LayoutTree`] emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    StateChanged,
    ItemCreated,
    ItemDestroyed,
    ActiveContentItemChanged,
    ItemDropped,
    Initialised,
    Docked,
    Undocked,
    Maximised,
    Minimised,
}

impl EventName {
    /// Throttled events reach global listeners at most once per animation frame.
    pub fn is_throttled(self) -> bool {
        matches!(self, Self::StateChanged)
    }
}

/// An event travelling from its origin up the parent chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BubblingEvent {
    pub name: EventName,
    pub origin: ItemId,
    propagation_stopped: bool,
}

impl BubblingEvent {
    pub fn new(name: EventName, origin: ItemId) -> Self {
        Self {
            name,
            origin,
            propagation_stopped: false,
        }
    }

    /// Ancestors above the current listener, and the global listeners, won't see this event.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

pub(crate) type ItemListener = Box<dyn FnMut(&mut BubblingEvent)>;
pub(crate) type GlobalListener = Box<dyn FnMut(&BubblingEvent)>;

#[derive(Default)]
pub(crate) struct EventHub {
    item_listeners: HashMap<ItemId, Vec<(EventName, ItemListener)>>,
    global_listeners: Vec<(EventName, GlobalListener)>,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("item_listeners", &self.item_listeners.len())
            .field("global_listeners", &self.global_listeners.len())
            .finish()
    }
}

impl EventHub {
    pub(crate) fn add_item_listener(&mut self, item: ItemId, name: EventName, listener: ItemListener) {
        self.item_listeners
            .entry(item)
            .or_default()
            .push((name, listener));
    }

    pub(crate) fn add_global_listener(&mut self, name: EventName, listener: GlobalListener) {
        self.global_listeners.push((name, listener));
    }

    pub(crate) fn notify_item(&mut self, item: ItemId, event: &mut BubblingEvent) {
        let Some(listeners) = self.item_listeners.get_mut(&item) else {
            return;
        };
        for (name, listener) in listeners.iter_mut() {
            if *name == event.name {
                listener(event);
            }
        }
    }

    pub(crate) fn notify_global(&mut self, event: &BubblingEvent) {
        for (name, listener) in &mut self.global_listeners {
            if *name == event.name {
                listener(event);
            }
        }
    }

    pub(crate) fn forget(&mut self, item: ItemId) {
        self.item_listeners.remove(&item);
    }
}

/// Work deferred to the next animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameTask {
    /// Re-run the layout of a subtree.
    UpdateSize(ItemId),
    /// Hand a throttled event to the global listeners.
    Propagate(BubblingEvent),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TaskKey {
    UpdateSize(ItemId),
    Propagate(EventName),
}

impl FrameTask {
    fn key(&self) -> TaskKey {
        match self {
            Self::UpdateSize(item) => TaskKey::UpdateSize(*item),
            Self::Propagate(event) => TaskKey::Propagate(event.name),
        }
    }
}

/// A one-shot "run on next animation tick" queue.
///
/// Requests with the same key coalesce until the queue is drained; the first request wins.
#[derive(Debug, Default)]
pub(crate) struct FrameScheduler {
    tasks: Vec<FrameTask>,
    scheduled: HashSet<TaskKey>,
}

impl FrameScheduler {
    /// Returns `false` if an equivalent task was already pending.
    pub(crate) fn schedule(&mut self, task: FrameTask) -> bool {
        if !self.scheduled.insert(task.key()) {
            return false;
        }
        self.tasks.push(task);
        true
    }

    pub(crate) fn take_due(&mut self) -> Vec<FrameTask> {
        self.scheduled.clear();
        std::mem::take(&mut self.tasks)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
