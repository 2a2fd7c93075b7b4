//! Insertion-ordered table of open menus.
//!
//! Dispatch scans menus oldest-first, so registration order is part of the
//! observable contract: when two menus could claim the same event, the
//! first-registered one wins.

use std::collections::HashMap;

use super::{MenuId, MenuState};

#[derive(Default)]
pub(crate) struct MenuTable {
    entries: HashMap<MenuId, MenuState>,
    order: Vec<MenuId>,
}

impl MenuTable {
    /// Adds a menu. Re-adding an existing id keeps the original entry and
    /// its position.
    pub fn insert(&mut self, id: MenuId, state: MenuState) {
        if self.entries.contains_key(&id) {
            return;
        }
        self.entries.insert(id, state);
        self.order.push(id);
    }

    /// Removes a menu. Absent ids are a no-op.
    pub fn remove(&mut self, id: MenuId) -> Option<MenuState> {
        let state = self.entries.remove(&id)?;
        self.order.retain(|entry| *entry != id);
        Some(state)
    }

    pub fn get(&self, id: MenuId) -> Option<&MenuState> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: MenuId) -> Option<&mut MenuState> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: MenuId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Menus in registration order.
    pub fn in_order(&self) -> impl Iterator<Item = (MenuId, &MenuState)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|state| (*id, state)))
    }

    pub fn ids_in_order(&self) -> Vec<MenuId> {
        self.order.clone()
    }
}
