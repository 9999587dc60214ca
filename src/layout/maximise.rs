use super::{EventName, ItemId, LayoutError, LayoutTree};

impl LayoutTree {
    /// The maximised item, if any.
    pub fn maximised(&self) -> Option<ItemId> {
        self.maximised
    }

    /// Lay `item` out over the whole root, or put it back if it already is.
    ///
    /// A component maximises its stack. Only one item is maximised at a time.
    pub fn toggle_maximise(&mut self, item: ItemId) -> Result<(), LayoutError> {
        let entry = self.item(item)?;
        let item = match entry.parent {
            Some(parent) if entry.is_component() && self.item(parent)?.is_stack() => parent,
            _ => item,
        };
        if item == self.root {
            return Err(LayoutError::InvalidInsertion {
                parent: item,
                child: item,
            });
        }

        if self.maximised == Some(item) {
            self.clear_maximised();
            self.set_size_downwards(self.root);
            return Ok(());
        }

        self.clear_maximised();
        self.item_mut(item)?.is_maximised = true;
        self.maximised = Some(item);
        log::debug!("maximised {item:?}");
        self.set_size_downwards(self.root);
        self.emit_bubbling(item, EventName::Maximised);
        self.emit_bubbling(item, EventName::StateChanged);
        Ok(())
    }

    /// Forget the maximised item without re-running the layout.
    pub(crate) fn clear_maximised(&mut self) {
        let Some(item) = self.maximised.take() else {
            return;
        };
        if let Some(entry) = self.items.get_mut(&item) {
            entry.is_maximised = false;
        }
        log::debug!("minimised {item:?}");
        self.emit_bubbling(item, EventName::Minimised);
        self.emit_bubbling(item, EventName::StateChanged);
    }

    /// Pick up an `is_maximised` flag from a restored config. The first one wins.
    pub(crate) fn restore_maximised(&mut self) {
        let flagged = self.items_by_filter(|item| item.is_maximised);
        let mut flagged = flagged.into_iter();
        self.maximised = flagged.next();
        for other in flagged {
            if let Some(entry) = self.items.get_mut(&other) {
                entry.is_maximised = false;
            }
        }
    }
}
