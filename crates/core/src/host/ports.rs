//! Traits the host adapter implements.
//!
//! The library never talks to a concrete server; everything it needs from
//! the host goes through these four object-safe ports. Implementations use
//! interior mutability behind `&self` so one adapter instance can be shared
//! as `Arc<dyn …>` facets.

use crate::stack::StackSnapshot;

use super::types::{ContainerId, HotbarSlot, PlayerId, TaskId, Ticks};

/// Who is connected right now.
pub trait PlayerRoster: Send + Sync {
    fn online_players(&self) -> Vec<PlayerId>;
    fn is_online(&self, player: PlayerId) -> bool;
}

/// Per-player hotbar slots.
///
/// Writing a zero-count stack stores an empty slot, as the host's own
/// inventory does.
pub trait Inventories: Send + Sync {
    fn hotbar_stack(&self, player: PlayerId, slot: HotbarSlot) -> Option<StackSnapshot>;
    fn set_hotbar_stack(&self, player: PlayerId, slot: HotbarSlot, stack: Option<StackSnapshot>);
}

/// Host-managed containers and the screens showing them.
///
/// Slot writes follow the same zero-count rule as [`Inventories`].
pub trait Containers: Send + Sync {
    /// Creates an empty container of `size` slots.
    fn create_container(&self, title: &str, size: usize) -> ContainerId;
    /// Releases a container. Viewers should be closed out first.
    fn destroy_container(&self, container: ContainerId);
    fn stack_at(&self, container: ContainerId, slot: usize) -> Option<StackSnapshot>;
    fn set_stack_at(&self, container: ContainerId, slot: usize, stack: Option<StackSnapshot>);
    /// Shows the container to the player as their top screen.
    fn open_container(&self, player: PlayerId, container: ContainerId);
    /// Closes whatever screen the player has open.
    fn close_screen(&self, player: PlayerId);
    fn viewers(&self, container: ContainerId) -> Vec<PlayerId>;
    /// The container currently on top of the player's screen, if any.
    fn open_container_of(&self, player: PlayerId) -> Option<ContainerId>;
}

/// The host's main-thread tick scheduler.
///
/// Callbacks run serialized on the host's simulation thread; re-entrant
/// `cancel` and `schedule_repeating` calls from inside a callback must be
/// accepted.
pub trait TickScheduler: Send + Sync {
    /// Schedules `task` to run after `delay`, then every `interval`.
    fn schedule_repeating(
        &self,
        delay: Ticks,
        interval: Ticks,
        task: Box<dyn FnMut() + Send>,
    ) -> TaskId;

    /// Cancels a pending task. Unknown ids are ignored.
    fn cancel(&self, task: TaskId);
}
