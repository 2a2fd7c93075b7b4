//! Listener bookkeeping for item events.
//!
//! Subscriptions are keyed by [`ListenerKey`], a structural identity rather
//! than a reference: subscribing the same listener twice is one
//! subscription, and unsubscribing an absent one is a no-op. The table only
//! records who listens to what; resolving a key to a menu, hotbar item, or
//! external observer and invoking it is the service's job.

use std::collections::{BTreeSet, HashMap};

use itemkit_core::ItemId;

use crate::hotbar::HotbarId;
use crate::menu::MenuId;

/// Handle for an externally subscribed [`ItemObserver`](itemkit_core::ItemObserver).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Structural identity of one subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKey {
    Menu(MenuId),
    Hotbar(HotbarId),
    External(ObserverId),
}

/// Who listens to which item.
#[derive(Default)]
pub(crate) struct ObserverTable {
    by_item: HashMap<ItemId, BTreeSet<ListenerKey>>,
}

impl ObserverTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest. Returns false when the key was already present.
    pub fn subscribe(&mut self, item: ItemId, key: ListenerKey) -> bool {
        self.by_item.entry(item).or_default().insert(key)
    }

    /// Removes interest. Returns false when the key was not subscribed.
    pub fn unsubscribe(&mut self, item: ItemId, key: ListenerKey) -> bool {
        match self.by_item.get_mut(&item) {
            Some(keys) => {
                let removed = keys.remove(&key);
                if keys.is_empty() {
                    self.by_item.remove(&item);
                }
                removed
            }
            None => false,
        }
    }

    /// Snapshot of the keys subscribed to `item`, in key order.
    ///
    /// Callers iterate the snapshot with no lock held, so subscribers may
    /// re-enter and edit the table mid-notification.
    pub fn keys_for(&self, item: ItemId) -> Vec<ListenerKey> {
        self.by_item
            .get(&item)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drops `key` from every item it is subscribed to.
    pub fn remove_listener(&mut self, key: ListenerKey) {
        self.by_item.retain(|_, keys| {
            keys.remove(&key);
            !keys.is_empty()
        });
    }

    /// Forgets an item entirely, returning whoever was still subscribed.
    pub fn drop_item(&mut self, item: ItemId) -> Vec<ListenerKey> {
        self.by_item
            .remove(&item)
            .map(|keys| keys.into_iter().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn subscriber_count(&self, item: ItemId) -> usize {
        self.by_item.get(&item).map_or(0, BTreeSet::len)
    }
}
