//! Item identity, stack payloads, and the host boundary shared across the
//! toolkit.
//!
//! `itemkit-core` defines the pure data model: minted item identities, the
//! visual payloads drawn in slots, the material vocabulary, the item-event
//! type, and the port traits a host adapter implements. The runtime crate
//! builds menus, hotbar items, and dispatch on top of the types re-exported
//! here.
pub mod event;
pub mod host;
pub mod id;
pub mod material;
pub mod model;
pub mod stack;

pub use event::{ItemEvent, ItemObserver};
pub use host::{
    ClickEvent, CloseEvent, ContainerId, Containers, Disposition, DragEvent, DropEvent, Host,
    HotbarSlot, InteractEvent, InvalidHotbarSlot, Inventories, MouseButton, PlayerId, PlayerRoster,
    SwapHandsEvent, TaskId, TickScheduler, Ticks,
};
pub use id::{IdAllocator, ItemId};
pub use material::{Cargo, Disc, DyeColor, Material, Template, TextColor};
pub use model::{ModelData, Rgb};
pub use stack::{StackBuilder, StackFlags, StackMeta, StackPayload, StackSnapshot, UniqueStack};
