//! The host boundary: ports the adapter implements, value types, UI events.
//!
//! The [`Host`] aggregate bundles the four port facets so the service can
//! reach everything it needs without coupling to one concrete adapter.
mod ports;
mod types;
mod ui;

use std::sync::Arc;

pub use ports::{Containers, Inventories, PlayerRoster, TickScheduler};
pub use types::{ContainerId, HotbarSlot, InvalidHotbarSlot, PlayerId, TaskId, Ticks};
pub use ui::{
    ClickEvent, CloseEvent, Disposition, DragEvent, DropEvent, InteractEvent, MouseButton,
    SwapHandsEvent,
};

/// Aggregates the four host facets behind shared handles.
#[derive(Clone)]
pub struct Host {
    players: Arc<dyn PlayerRoster>,
    inventories: Arc<dyn Inventories>,
    containers: Arc<dyn Containers>,
    scheduler: Arc<dyn TickScheduler>,
}

impl Host {
    pub fn from_parts(
        players: Arc<dyn PlayerRoster>,
        inventories: Arc<dyn Inventories>,
        containers: Arc<dyn Containers>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Self {
        Self {
            players,
            inventories,
            containers,
            scheduler,
        }
    }

    /// Builds a host from one adapter implementing all four ports.
    pub fn from_impl<T>(adapter: Arc<T>) -> Self
    where
        T: PlayerRoster + Inventories + Containers + TickScheduler + 'static,
    {
        Self {
            players: adapter.clone(),
            inventories: adapter.clone(),
            containers: adapter.clone(),
            scheduler: adapter,
        }
    }

    #[inline]
    pub fn players(&self) -> &dyn PlayerRoster {
        self.players.as_ref()
    }

    #[inline]
    pub fn inventories(&self) -> &dyn Inventories {
        self.inventories.as_ref()
    }

    #[inline]
    pub fn containers(&self) -> &dyn Containers {
        self.containers.as_ref()
    }

    #[inline]
    pub fn scheduler(&self) -> &dyn TickScheduler {
        self.scheduler.as_ref()
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
