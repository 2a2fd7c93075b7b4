use std::collections::HashMap;

use super::{HotbarId, HotbarState};

/// Registered hotbar items in registration order.
///
/// Interactions are matched against items oldest-first, so the order the
/// author registered them in decides ties.
#[derive(Default)]
pub(crate) struct HotbarTable {
    entries: HashMap<HotbarId, HotbarState>,
    order: Vec<HotbarId>,
}

impl HotbarTable {
    /// Registers an item. Re-registering an id keeps the original entry
    /// and position.
    pub fn insert(&mut self, id: HotbarId, state: HotbarState) {
        if self.entries.contains_key(&id) {
            return;
        }
        self.entries.insert(id, state);
        self.order.push(id);
    }

    pub fn remove(&mut self, id: HotbarId) -> Option<HotbarState> {
        let state = self.entries.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(state)
    }

    pub fn get(&self, id: HotbarId) -> Option<&HotbarState> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: HotbarId) -> Option<&mut HotbarState> {
        self.entries.get_mut(&id)
    }

    pub fn in_order(&self) -> impl Iterator<Item = (HotbarId, &HotbarState)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|state| (*id, state)))
    }

    pub fn ids_in_order(&self) -> Vec<HotbarId> {
        self.order.clone()
    }
}
