//! Item change notifications.

use crate::id::ItemId;
use crate::stack::UniqueStack;

/// Notification about one logical item, delivered to every subscriber.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEvent {
    /// The item's visuals changed; the carried stack is the new state.
    /// Subscribers repaint every slot holding this identity.
    Updated(UniqueStack),
    /// The item is being retired. Subscribers drop it from their own
    /// bookkeeping and empty the slots that held it.
    Cleared(ItemId),
}

impl ItemEvent {
    /// Identity of the item this event is about.
    pub fn item_id(&self) -> ItemId {
        match self {
            ItemEvent::Updated(stack) => stack.id(),
            ItemEvent::Cleared(id) => *id,
        }
    }
}

/// External subscriber to item events.
///
/// Implementations run synchronously on the host's main thread while the
/// notifying registry holds no locks, so they may call back into the
/// service.
pub trait ItemObserver: Send + Sync {
    fn on_item_event(&self, event: &ItemEvent);
}

#[cfg(test)]
mod tests {
    use crate::id::IdAllocator;
    use crate::material::Material;
    use crate::stack::StackBuilder;

    use super::*;

    #[test]
    fn events_expose_their_item() {
        let ids = IdAllocator::new();
        let stack = StackBuilder::new(Material::Stone, "Rock").build(&ids);

        let updated = ItemEvent::Updated(stack.clone());
        assert_eq!(updated.item_id(), stack.id());

        let cleared = ItemEvent::Cleared(stack.id());
        assert_eq!(cleared.item_id(), stack.id());
    }
}
