use super::{ItemId, ItemType, LayoutTree, ResponsiveMode};

impl LayoutTree {
    /// Fold the rightmost columns of a too-narrow top-level row into its first stack.
    ///
    /// Runs after a host resize, on the first one only with [`ResponsiveMode::OnLoad`]. Applies
    /// when the root holds a row whose children can't all get `min_item_width` pixels.
    pub(crate) fn adjust_columns_responsive(&mut self) {
        if self.updating_columns_responsive {
            return;
        }
        let first_load = std::mem::take(&mut self.first_load);
        let enabled = match self.settings.responsive_mode {
            ResponsiveMode::None => false,
            ResponsiveMode::OnLoad => first_load,
            ResponsiveMode::Always => true,
        };
        let min = self.dimensions.min_item_width;
        if !enabled || min <= 0.0 {
            return;
        }

        let Some(row) = self
            .items
            .get(&self.root)
            .and_then(|root| root.children.first().copied())
            .filter(|&c| self.items.get(&c).is_some_and(|c| c.item_type() == ItemType::Row))
        else {
            return;
        };
        let column_count = self.items.get(&row).map_or(0, |r| r.children.len());
        let width = self.root_rect().width();
        if column_count <= 1 || column_count as f32 * min <= width {
            return;
        }

        let Some(&target) = self.items_by_type(ItemType::Stack).first() else {
            return;
        };

        self.updating_columns_responsive = true;
        let final_count = ((width / min).floor() as usize).max(1);
        log::debug!("responsive: folding {column_count} columns into {final_count}");

        for _ in final_count..column_count {
            let Some(last) = self
                .items
                .get(&row)
                .and_then(|r| r.children.last().copied())
            else {
                break;
            };
            if last == target || self.is_ancestor(last, target) {
                break;
            }
            self.move_leaves_into(target, last);
            if self.items.get(&row).and_then(|r| r.children.last().copied()) == Some(last) {
                // An unclosable column stays put; stop rather than loop on it.
                break;
            }
        }
        self.updating_columns_responsive = false;
    }

    /// Move every tab found under `node` into the stack `target`.
    fn move_leaves_into(&mut self, target: ItemId, node: ItemId) {
        let Some(item) = self.items.get(&node) else {
            return;
        };
        let children = item.children.clone();
        if item.is_stack() {
            for child in children {
                if self.remove_child(node, child, true).is_err() {
                    continue;
                }
                if let Err(err) = self.add_child(target, child, None) {
                    log::warn!("responsive: can't move {child:?} into {target:?}: {err}");
                    self.destroy(child);
                }
            }
        } else {
            for child in children {
                if self.items.contains_key(&child) {
                    self.move_leaves_into(target, child);
                }
            }
        }
    }
}
