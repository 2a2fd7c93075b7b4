//! Menus, shared hotbar items, and item-event routing over a host boundary.
//!
//! This crate wires the identity and stack model of `itemkit-core` into a
//! running service. Consumers embed [`ItemService`], forward host UI events
//! to its `handle_*` methods, and build interactive surfaces through
//! [`MenuBuilder`] and [`HotbarItemBuilder`].
//!
//! Modules are organized by responsibility:
//! - [`service`] hosts the service facade and event dispatch
//! - [`menu`] provides clickable container menus with locked items
//! - [`hotbar`] provides per-player mirrored hotbar items
//! - `observers` tracks who listens to which item
//! - [`host`] ships an in-memory host adapter for tests and demos
pub mod config;
pub mod error;
pub mod hotbar;
pub mod host;
pub mod menu;
pub mod service;

mod observers;

pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use hotbar::{
    HotbarId, HotbarItem, HotbarItemBuilder, RefreshFn, RefreshingHotbarItem, UseFn, UsagePolicy,
};
pub use host::InMemoryHost;
pub use menu::{
    ClickBinding, ClickFn, ClickHookFn, CloseHookFn, DragHookFn, Menu, MenuBuilder, MenuHooks,
    MenuId,
};
pub use observers::ObserverId;
pub use service::ItemService;
