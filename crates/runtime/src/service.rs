//! The item service: identity minting, observer fan-out, menu and hotbar
//! registries, and the host event dispatchers.
//!
//! [`ItemService`] is a cheaply cloneable facade over shared state. Every
//! registry sits behind its own lock; dispatch snapshots the callbacks it
//! needs under a read lock and invokes them with no lock held, so
//! callbacks may freely re-enter the service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use itemkit_core::{
    ClickEvent, CloseEvent, ContainerId, Disposition, DragEvent, DropEvent, Host, HotbarSlot,
    IdAllocator, InteractEvent, ItemEvent, ItemId, ItemObserver, Material, MouseButton, PlayerId,
    StackBuilder, StackMeta, StackSnapshot, SwapHandsEvent, Ticks, UniqueStack,
};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::hotbar::{
    HotbarCallbacks, HotbarId, HotbarItem, HotbarItemBuilder, HotbarState, HotbarTable, RefreshFn,
    RefreshingHotbarItem, UseFn, UsagePolicy,
};
use crate::menu::{
    ClickBinding, ClickFn, ClickHookFn, Menu, MenuBuilder, MenuId, MenuState, MenuTable,
};
use crate::observers::{ListenerKey, ObserverId, ObserverTable};

/// Entry point to the library.
///
/// One service owns the identity allocator, the shared separator, the
/// observer table, and the menu and hotbar registries. The embedding
/// plugin forwards host UI events to the `handle_*` methods and applies
/// the returned [`Disposition`] to the host's default interaction.
///
/// Clones share the same state. [`Menu`] and [`HotbarItem`] handles hold
/// weak references, so dropping every `ItemService` clone (or calling
/// [`shutdown`](Self::shutdown)) leaves all outstanding handles inert
/// rather than dangling.
#[derive(Clone)]
pub struct ItemService {
    inner: Arc<ServiceInner>,
}

impl ItemService {
    /// Builds a service over `host`. Mints the shared separator from the
    /// configured appearance; touches no host resource (containers are
    /// created per menu).
    pub fn initialize(host: Host, config: ServiceConfig) -> ItemService {
        let ids = IdAllocator::new();
        let separator =
            StackBuilder::new(config.separator_material, config.separator_title.clone())
                .build(&ids);
        let inner = Arc::new_cyclic(|self_ref| ServiceInner {
            self_ref: self_ref.clone(),
            host,
            config,
            ids,
            separator,
            observers: RwLock::new(ObserverTable::new()),
            external: RwLock::new(HashMap::new()),
            menus: RwLock::new(MenuTable::default()),
            hotbar: RwLock::new(HotbarTable::default()),
            next_menu: AtomicU64::new(0),
            next_hotbar: AtomicU64::new(0),
            next_observer: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
        });
        tracing::info!("item service \"{}\" initialized", inner.config.title);
        ItemService { inner }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Mints a new logical item from the service's allocator.
    pub fn create_item(&self, builder: StackBuilder) -> UniqueStack {
        builder.build(&self.inner.ids)
    }

    /// Clone of the shared separator stack.
    pub fn separator(&self) -> UniqueStack {
        self.inner.separator.clone()
    }

    /// Registers a new menu and creates its host container.
    pub fn menu(&self, builder: MenuBuilder) -> Result<Menu> {
        self.inner.register_menu(builder)
    }

    /// Registers a hotbar item.
    pub fn hotbar_item(&self, builder: HotbarItemBuilder) -> HotbarItem {
        self.inner.register_hotbar(builder, false)
    }

    /// Registers a hotbar item with refresh support. Effect and interval
    /// are configured on the returned handle.
    pub fn refreshing_hotbar_item(&self, builder: HotbarItemBuilder) -> RefreshingHotbarItem {
        RefreshingHotbarItem {
            item: self.inner.register_hotbar(builder, true),
        }
    }

    /// Subscribes an external observer to one item's events. The returned
    /// id identifies this one registration.
    pub fn subscribe(&self, item: &UniqueStack, observer: Arc<dyn ItemObserver>) -> ObserverId {
        self.inner.subscribe(item.id(), observer)
    }

    /// Removes one external registration. False when it was not present.
    pub fn unsubscribe(&self, observer: ObserverId) -> bool {
        self.inner.unsubscribe(observer)
    }

    /// Broadcasts the item's current payload to every listener: menus
    /// repaint matching slots, hotbar items re-render every holder's
    /// slot, external observers get [`ItemEvent::Updated`].
    pub fn push_updates(&self, item: &UniqueStack) {
        self.inner.push_updates(item);
    }

    /// Retires a logical item everywhere: menus drop it, hotbar items
    /// holding its identity clear themselves, external observers get
    /// [`ItemEvent::Cleared`], and all of its subscriptions are dropped.
    pub fn clear_item(&self, item: &UniqueStack) {
        self.inner.clear_item(item);
    }

    /// Human-readable list of active menus and their viewer counts.
    pub fn status_report(&self) -> String {
        self.inner.status_report()
    }

    pub fn handle_click(&self, event: &ClickEvent) -> Disposition {
        self.inner.handle_click(event)
    }

    pub fn handle_drag(&self, event: &DragEvent) -> Disposition {
        self.inner.handle_drag(event)
    }

    pub fn handle_close(&self, event: &CloseEvent) -> Disposition {
        self.inner.handle_close(event)
    }

    pub fn handle_interact(&self, event: &InteractEvent) -> Disposition {
        self.inner.handle_interact(event)
    }

    pub fn handle_drop(&self, event: &DropEvent) -> Disposition {
        self.inner.handle_drop(event)
    }

    pub fn handle_swap(&self, event: &SwapHandsEvent) -> Disposition {
        self.inner.handle_swap(event)
    }

    /// Tears everything down: closes every menu's viewers and destroys
    /// their containers, cancels scheduled refreshes, removes every
    /// hotbar item from every player, and clears the registries. All
    /// outstanding handles become inert. Idempotent.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.is_shut_down()
    }
}

impl std::fmt::Debug for ItemService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemService")
            .field("title", &self.inner.config.title)
            .finish_non_exhaustive()
    }
}

/// Dispatch plan for one click, snapshotted under the registry read lock.
enum ClickPlan {
    Hook(ClickHookFn, MenuId),
    Default(Option<ClickFn>, Disposition),
}

pub(crate) struct ServiceInner {
    self_ref: Weak<ServiceInner>,
    host: Host,
    config: ServiceConfig,
    ids: IdAllocator,
    separator: UniqueStack,
    observers: RwLock<ObserverTable>,
    external: RwLock<HashMap<ObserverId, Arc<dyn ItemObserver>>>,
    menus: RwLock<MenuTable>,
    hotbar: RwLock<HotbarTable>,
    next_menu: AtomicU64,
    next_hotbar: AtomicU64,
    next_observer: AtomicU64,
    shut_down: AtomicBool,
}

// ============================================================================
// Observers and Item Events
// ============================================================================

impl ServiceInner {
    pub(crate) fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn subscribe(&self, item: ItemId, observer: Arc<dyn ItemObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        if self.is_shut_down() {
            return id;
        }
        self.write_external().insert(id, observer);
        self.write_observers()
            .subscribe(item, ListenerKey::External(id));
        tracing::trace!("observer {:?} subscribed to {}", id, item);
        id
    }

    fn unsubscribe(&self, observer: ObserverId) -> bool {
        let present = self.write_external().remove(&observer).is_some();
        if present {
            self.write_observers()
                .remove_listener(ListenerKey::External(observer));
        }
        present
    }

    fn push_updates(&self, item: &UniqueStack) {
        self.deliver(&ItemEvent::Updated(item.clone()));
    }

    fn clear_item(&self, item: &UniqueStack) {
        self.deliver(&ItemEvent::Cleared(item.id()));
        // menus and hotbar items unsubscribed themselves above; whatever
        // is left (external registrations) dies with the item
        let leftovers = self.write_observers().drop_item(item.id());
        if leftovers.is_empty() {
            return;
        }
        let mut external = self.write_external();
        for key in leftovers {
            if let ListenerKey::External(id) = key {
                external.remove(&id);
            }
        }
    }

    /// Fans one event out to the item's listeners. The key set is
    /// snapshotted first, so listeners may (un)subscribe while handling.
    fn deliver(&self, event: &ItemEvent) {
        let item = event.item_id();
        let keys = self.read_observers().keys_for(item);
        if keys.is_empty() {
            return;
        }
        tracing::trace!("notifying {} listeners of {}", keys.len(), item);
        for key in keys {
            match (key, event) {
                (ListenerKey::Menu(menu), ItemEvent::Updated(stack)) => {
                    self.menu_render_update(menu, stack);
                }
                (ListenerKey::Menu(menu), ItemEvent::Cleared(_)) => {
                    self.menu_remove_item(menu, item);
                }
                (ListenerKey::Hotbar(hotbar), ItemEvent::Updated(stack)) => {
                    self.hotbar_sync(hotbar, stack);
                }
                (ListenerKey::Hotbar(hotbar), ItemEvent::Cleared(_)) => {
                    self.hotbar_clear(hotbar);
                }
                (ListenerKey::External(observer), _) => {
                    let observer = self.read_external().get(&observer).cloned();
                    if let Some(observer) = observer {
                        observer.on_item_event(event);
                    }
                }
            }
        }
    }
}

// ============================================================================
// Menus
// ============================================================================

impl ServiceInner {
    fn register_menu(&self, builder: MenuBuilder) -> Result<Menu> {
        if self.is_shut_down() {
            return Err(ServiceError::ShutDown);
        }
        if builder.rows == 0 || builder.rows > ServiceConfig::MENU_MAX_ROWS {
            return Err(ServiceError::InvalidMenuSize { rows: builder.rows });
        }
        let size = builder.rows * ServiceConfig::MENU_COLUMNS;
        let container = self.host.containers().create_container(&builder.title, size);
        let id = MenuId(self.next_menu.fetch_add(1, Ordering::Relaxed));
        let mut state = MenuState::new(container, builder.title, size, self.separator.id());
        state.hooks = builder.hooks;
        tracing::debug!("menu {} (\"{}\") registered, {} slots", id, state.title, size);
        self.write_menus().insert(id, state);
        self.write_observers()
            .subscribe(self.separator.id(), ListenerKey::Menu(id));
        Ok(self.menu_handle(id))
    }

    fn menu_handle(&self, id: MenuId) -> Menu {
        Menu {
            service: self.self_ref.clone(),
            id,
        }
    }

    pub(crate) fn menu_exists(&self, id: MenuId) -> bool {
        self.read_menus().contains(id)
    }

    pub(crate) fn menu_container(&self, id: MenuId) -> Option<ContainerId> {
        self.read_menus().get(id).map(|state| state.container)
    }

    pub(crate) fn menu_viewer_count(&self, id: MenuId) -> usize {
        match self.menu_container(id) {
            Some(container) => self.host.containers().viewers(container).len(),
            None => 0,
        }
    }

    pub(crate) fn menu_is_locked(&self, id: MenuId, stack: &StackSnapshot) -> bool {
        self.read_menus()
            .get(id)
            .is_some_and(|state| state.is_locked(stack))
    }

    pub(crate) fn menu_has_left_click(&self, id: MenuId, stack: &StackSnapshot) -> bool {
        self.read_menus()
            .get(id)
            .is_some_and(|state| state.has_left_click(stack))
    }

    pub(crate) fn menu_has_right_click(&self, id: MenuId, stack: &StackSnapshot) -> bool {
        self.read_menus()
            .get(id)
            .is_some_and(|state| state.has_right_click(stack))
    }

    pub(crate) fn menu_stack_at(&self, id: MenuId, slot: usize) -> Option<StackSnapshot> {
        let container = self.menu_container(id)?;
        self.host.containers().stack_at(container, slot)
    }

    /// Container and slot bound checks shared by all placement paths.
    fn menu_slot_target(&self, id: MenuId, slot: usize) -> Result<ContainerId> {
        if self.is_shut_down() {
            return Err(ServiceError::ShutDown);
        }
        let (container, size) = self
            .read_menus()
            .get(id)
            .map(|state| (state.container, state.size))
            .ok_or(ServiceError::MenuClosed)?;
        if slot >= size {
            return Err(ServiceError::SlotOutOfRange { slot, size });
        }
        Ok(container)
    }

    pub(crate) fn menu_add_item(
        &self,
        id: MenuId,
        slot: usize,
        stack: StackSnapshot,
    ) -> Result<()> {
        let container = self.menu_slot_target(id, slot)?;
        self.host
            .containers()
            .set_stack_at(container, slot, Some(stack));
        Ok(())
    }

    pub(crate) fn menu_add_locked_item(
        &self,
        id: MenuId,
        slot: usize,
        item: &UniqueStack,
        binding: ClickBinding,
    ) -> Result<()> {
        let container = self.menu_slot_target(id, slot)?;
        {
            let mut menus = self.write_menus();
            let Some(state) = menus.get_mut(id) else {
                return Err(ServiceError::MenuClosed);
            };
            state.locked.insert(item.id());
            state.bind(item.id(), binding);
        }
        self.write_observers()
            .subscribe(item.id(), ListenerKey::Menu(id));
        self.host
            .containers()
            .set_stack_at(container, slot, Some(StackSnapshot::from(item)));
        tracing::trace!("menu {} locked {} into slot {}", id, item.id(), slot);
        Ok(())
    }

    pub(crate) fn menu_add_separator(&self, id: MenuId, slot: usize) -> Result<()> {
        let container = self.menu_slot_target(id, slot)?;
        self.host
            .containers()
            .set_stack_at(container, slot, Some(StackSnapshot::from(&self.separator)));
        Ok(())
    }

    pub(crate) fn menu_fill_gaps(&self, id: MenuId) -> Result<()> {
        if self.is_shut_down() {
            return Err(ServiceError::ShutDown);
        }
        let (container, size) = self
            .read_menus()
            .get(id)
            .map(|state| (state.container, state.size))
            .ok_or(ServiceError::MenuClosed)?;
        let snapshot = StackSnapshot::from(&self.separator);
        let containers = self.host.containers();
        for slot in 0..size {
            if containers.stack_at(container, slot).is_none() {
                containers.set_stack_at(container, slot, Some(snapshot.clone()));
            }
        }
        Ok(())
    }

    pub(crate) fn menu_swap_item(&self, id: MenuId, old: &UniqueStack, new: &UniqueStack) {
        if self.is_shut_down() {
            return;
        }
        let (container, size) = {
            let mut menus = self.write_menus();
            let Some(state) = menus.get_mut(id) else {
                return;
            };
            state.transfer_bindings(old.id(), new.id());
            (state.container, state.size)
        };
        {
            // the old item is dropped even when it is the shared
            // separator; only the locked-set entry survives for it
            let mut observers = self.write_observers();
            observers.unsubscribe(old.id(), ListenerKey::Menu(id));
            observers.subscribe(new.id(), ListenerKey::Menu(id));
        }
        let snapshot = StackSnapshot::from(new);
        let containers = self.host.containers();
        for slot in 0..size {
            let holds = containers
                .stack_at(container, slot)
                .is_some_and(|stack| stack.carries(old.id()));
            if holds {
                containers.set_stack_at(container, slot, Some(snapshot.clone()));
            }
        }
        tracing::trace!("menu {} swapped {} for {}", id, old.id(), new.id());
    }

    pub(crate) fn menu_remove_item(&self, id: MenuId, item: ItemId) {
        if self.is_shut_down() {
            return;
        }
        let (container, size, unsubscribe) = {
            let mut menus = self.write_menus();
            let Some(state) = menus.get_mut(id) else {
                return;
            };
            let unsubscribe = state.detach(item);
            (state.container, state.size, unsubscribe)
        };
        if unsubscribe {
            self.write_observers()
                .unsubscribe(item, ListenerKey::Menu(id));
        }
        let containers = self.host.containers();
        for slot in 0..size {
            let holds = containers
                .stack_at(container, slot)
                .is_some_and(|stack| stack.carries(item));
            if holds {
                containers.set_stack_at(container, slot, None);
            }
        }
    }

    pub(crate) fn menu_open(&self, id: MenuId, player: PlayerId) {
        if self.is_shut_down() {
            return;
        }
        let Some(container) = self.menu_container(id) else {
            return;
        };
        self.host.containers().open_container(player, container);
        tracing::trace!("menu {} opened for {}", id, player);
    }

    pub(crate) fn menu_close_viewers(&self, id: MenuId) {
        let Some(container) = self.menu_container(id) else {
            return;
        };
        self.close_container_viewers(container);
    }

    pub(crate) fn menu_clear(&self, id: MenuId) {
        let Some(state) = self.write_menus().remove(id) else {
            return;
        };
        self.write_observers().remove_listener(ListenerKey::Menu(id));
        self.close_container_viewers(state.container);
        self.host.containers().destroy_container(state.container);
        tracing::debug!("menu {} (\"{}\") cleared", id, state.title);
    }

    fn close_container_viewers(&self, container: ContainerId) {
        let containers = self.host.containers();
        for viewer in containers.viewers(container) {
            containers.close_screen(viewer);
        }
    }

    /// Repaints every slot currently showing `stack`'s identity.
    fn menu_render_update(&self, id: MenuId, stack: &UniqueStack) {
        let Some((container, size)) = self
            .read_menus()
            .get(id)
            .map(|state| (state.container, state.size))
        else {
            return;
        };
        let snapshot = StackSnapshot::from(stack);
        let containers = self.host.containers();
        for slot in 0..size {
            let holds = containers
                .stack_at(container, slot)
                .is_some_and(|current| current.carries(stack.id()));
            if holds {
                containers.set_stack_at(container, slot, Some(snapshot.clone()));
            }
        }
    }
}

// ============================================================================
// Hotbar Items
// ============================================================================

impl ServiceInner {
    fn register_hotbar(&self, builder: HotbarItemBuilder, refreshing: bool) -> HotbarItem {
        let id = HotbarId(self.next_hotbar.fetch_add(1, Ordering::Relaxed));
        if self.is_shut_down() {
            // never registered; the handle is born inert
            return self.hotbar_handle(id);
        }
        let item = builder.stack.id();
        let slot = builder.slot;
        self.write_hotbar().insert(id, builder.into_state(refreshing));
        self.write_observers()
            .subscribe(item, ListenerKey::Hotbar(id));
        tracing::debug!("hotbar item {} registered for {} in slot {}", id, item, slot);
        self.hotbar_handle(id)
    }

    fn hotbar_handle(&self, id: HotbarId) -> HotbarItem {
        HotbarItem {
            service: self.self_ref.clone(),
            id,
        }
    }

    pub(crate) fn hotbar_stack(&self, id: HotbarId) -> Option<UniqueStack> {
        self.read_hotbar().get(id).map(|state| state.stack.clone())
    }

    pub(crate) fn hotbar_slot(&self, id: HotbarId) -> Option<HotbarSlot> {
        self.read_hotbar().get(id).map(|state| state.slot)
    }

    pub(crate) fn hotbar_matches(&self, id: HotbarId, stack: &StackSnapshot) -> bool {
        self.read_hotbar()
            .get(id)
            .is_some_and(|state| stack.carries(state.stack.id()))
    }

    pub(crate) fn hotbar_give_to(&self, id: HotbarId, player: PlayerId) {
        let Some((slot, snapshot)) = self
            .read_hotbar()
            .get(id)
            .map(|state| (state.slot, StackSnapshot::from(&state.stack)))
        else {
            return;
        };
        self.host
            .inventories()
            .set_hotbar_stack(player, slot, Some(snapshot));
    }

    pub(crate) fn hotbar_give_to_everyone(&self, id: HotbarId) {
        for player in self.host.players().online_players() {
            self.hotbar_give_to(id, player);
        }
    }

    /// Sets the canonical count (after the count-up wrap) and broadcasts.
    pub(crate) fn hotbar_update_count(&self, id: HotbarId, count: u32) {
        let stack = {
            let mut table = self.write_hotbar();
            let Some(state) = table.get_mut(id) else {
                return;
            };
            let count = state.wrapped_count(count);
            state.stack.update_count(count);
            state.stack.clone()
        };
        self.deliver(&ItemEvent::Updated(stack));
    }

    pub(crate) fn hotbar_increase_count(&self, id: HotbarId) {
        let Some(target) = self
            .read_hotbar()
            .get(id)
            .map(|state| state.stack.payload().count.saturating_add(state.step))
        else {
            return;
        };
        self.hotbar_update_count(id, target);
    }

    pub(crate) fn hotbar_decrease_count(&self, id: HotbarId) {
        let Some(target) = self
            .read_hotbar()
            .get(id)
            .map(|state| state.stack.payload().count.saturating_sub(state.step))
        else {
            return;
        };
        self.hotbar_update_count(id, target);
    }

    /// Mutates the canonical stack and broadcasts the result.
    fn hotbar_mutate(&self, id: HotbarId, mutate: impl FnOnce(&mut UniqueStack)) {
        let stack = {
            let mut table = self.write_hotbar();
            let Some(state) = table.get_mut(id) else {
                return;
            };
            mutate(&mut state.stack);
            state.stack.clone()
        };
        self.deliver(&ItemEvent::Updated(stack));
    }

    pub(crate) fn hotbar_update_title(&self, id: HotbarId, title: String) {
        self.hotbar_mutate(id, |stack| {
            stack.update_title(title);
        });
    }

    pub(crate) fn hotbar_update_lore(&self, id: HotbarId, lore: Vec<String>) {
        self.hotbar_mutate(id, |stack| {
            stack.update_lore(lore);
        });
    }

    pub(crate) fn hotbar_update_material(&self, id: HotbarId, material: Material) {
        self.hotbar_mutate(id, |stack| {
            stack.update_material(material);
        });
    }

    pub(crate) fn hotbar_update_glint(&self, id: HotbarId, glint: bool) {
        self.hotbar_mutate(id, |stack| {
            stack.update_glint(glint);
        });
    }

    pub(crate) fn hotbar_update_meta(&self, id: HotbarId, meta: StackMeta) {
        self.hotbar_mutate(id, |stack| {
            stack.update_meta(meta);
        });
    }

    /// Delivery target for [`ItemEvent::Updated`]: adopt the payload and
    /// repaint every holder's slot.
    fn hotbar_sync(&self, id: HotbarId, stack: &UniqueStack) {
        let slot = {
            let mut table = self.write_hotbar();
            let Some(state) = table.get_mut(id) else {
                return;
            };
            state.stack = stack.clone();
            state.slot
        };
        let snapshot = StackSnapshot::from(stack);
        let inventories = self.host.inventories();
        for player in self.host.players().online_players() {
            let holds = inventories
                .hotbar_stack(player, slot)
                .is_some_and(|current| current.carries(stack.id()));
            if holds {
                inventories.set_hotbar_stack(player, slot, Some(snapshot.clone()));
            }
        }
    }

    pub(crate) fn hotbar_remove_from_everyone(&self, id: HotbarId) {
        let Some((slot, item)) = self
            .read_hotbar()
            .get(id)
            .map(|state| (state.slot, state.stack.id()))
        else {
            return;
        };
        self.remove_item_from_slots(slot, item);
    }

    pub(crate) fn hotbar_usage_count(&self, id: HotbarId) -> usize {
        let Some((slot, item)) = self
            .read_hotbar()
            .get(id)
            .map(|state| (state.slot, state.stack.id()))
        else {
            return 0;
        };
        let inventories = self.host.inventories();
        self.host
            .players()
            .online_players()
            .into_iter()
            .filter(|player| {
                inventories
                    .hotbar_stack(*player, slot)
                    .is_some_and(|stack| stack.carries(item))
            })
            .count()
    }

    pub(crate) fn hotbar_clear(&self, id: HotbarId) {
        let Some(state) = self.write_hotbar().remove(id) else {
            return;
        };
        if let Some(task) = state.refresh.as_ref().and_then(|refresh| refresh.task) {
            self.host.scheduler().cancel(task);
        }
        self.write_observers()
            .unsubscribe(state.stack.id(), ListenerKey::Hotbar(id));
        self.remove_item_from_slots(state.slot, state.stack.id());
        tracing::debug!("hotbar item {} cleared", id);
    }

    fn remove_item_from_slots(&self, slot: HotbarSlot, item: ItemId) {
        let inventories = self.host.inventories();
        for player in self.host.players().online_players() {
            let holds = inventories
                .hotbar_stack(player, slot)
                .is_some_and(|stack| stack.carries(item));
            if holds {
                inventories.set_hotbar_stack(player, slot, None);
            }
        }
    }
}

// ============================================================================
// Refresh Scheduling
// ============================================================================

impl ServiceInner {
    pub(crate) fn refresh_set_effect(&self, id: HotbarId, effect: RefreshFn) {
        let mut table = self.write_hotbar();
        if let Some(refresh) = table.get_mut(id).and_then(|state| state.refresh.as_mut()) {
            refresh.effect = Some(effect);
        }
    }

    pub(crate) fn refresh_set_interval(&self, id: HotbarId, interval: Ticks) {
        let mut table = self.write_hotbar();
        if let Some(refresh) = table.get_mut(id).and_then(|state| state.refresh.as_mut()) {
            refresh.interval = Some(interval);
        }
    }

    pub(crate) fn refresh_start(&self, id: HotbarId) -> bool {
        if self.is_shut_down() {
            return false;
        }
        let mut table = self.write_hotbar();
        let Some(refresh) = table.get_mut(id).and_then(|state| state.refresh.as_mut()) else {
            return false;
        };
        if refresh.task.is_some() {
            return false;
        }
        let Some(interval) = refresh.interval else {
            return false;
        };
        let service = self.self_ref.clone();
        let task = self.host.scheduler().schedule_repeating(
            Ticks::ZERO,
            interval,
            Box::new(move || {
                if let Some(inner) = service.upgrade() {
                    inner.refresh_now(id);
                }
            }),
        );
        refresh.task = Some(task);
        tracing::debug!("hotbar item {} refreshing every {} ticks", id, interval.0);
        true
    }

    pub(crate) fn refresh_stop(&self, id: HotbarId) -> bool {
        let task = {
            let mut table = self.write_hotbar();
            let Some(refresh) = table.get_mut(id).and_then(|state| state.refresh.as_mut()) else {
                return false;
            };
            refresh.task.take()
        };
        match task {
            Some(task) => {
                self.host.scheduler().cancel(task);
                tracing::debug!("hotbar item {} stopped refreshing", id);
                true
            }
            None => false,
        }
    }

    pub(crate) fn refresh_now(&self, id: HotbarId) {
        let effect = self
            .read_hotbar()
            .get(id)
            .and_then(|state| state.refresh.as_ref())
            .and_then(|refresh| refresh.effect.clone());
        if let Some(effect) = effect {
            effect(&self.hotbar_handle(id));
        }
    }
}

// ============================================================================
// Host Event Dispatch
// ============================================================================

impl ServiceInner {
    pub(crate) fn handle_click(&self, event: &ClickEvent) -> Disposition {
        if self.is_shut_down() {
            return Disposition::Pass;
        }
        let plan = {
            let menus = self.read_menus();
            let mut plan = None;
            for (id, state) in menus.in_order() {
                if event.clicked == Some(state.container) {
                    plan = Some(match &state.hooks.on_click {
                        Some(hook) => ClickPlan::Hook(hook.clone(), id),
                        None => {
                            let (handler, verdict) = state.click_verdict(event);
                            ClickPlan::Default(handler, verdict)
                        }
                    });
                    break;
                }
                if event.top == Some(state.container) {
                    plan = Some(match &state.hooks.on_bottom_click {
                        Some(hook) => ClickPlan::Hook(hook.clone(), id),
                        None => ClickPlan::Default(None, state.bottom_click_verdict(event)),
                    });
                    break;
                }
            }
            plan
        };
        match plan {
            None => Disposition::Pass,
            Some(ClickPlan::Hook(hook, id)) => hook(&self.menu_handle(id), event),
            Some(ClickPlan::Default(handler, verdict)) => {
                if let Some(handler) = handler {
                    handler(event.player);
                }
                verdict
            }
        }
    }

    pub(crate) fn handle_drag(&self, event: &DragEvent) -> Disposition {
        if self.is_shut_down() {
            return Disposition::Pass;
        }
        let hook = {
            let menus = self.read_menus();
            let mut hook = None;
            for (id, state) in menus.in_order() {
                if event.container == Some(state.container) {
                    hook = state.hooks.on_drag.clone().map(|hook| (hook, id));
                    break;
                }
                if event.top == Some(state.container) {
                    hook = state.hooks.on_bottom_drag.clone().map(|hook| (hook, id));
                    break;
                }
            }
            hook
        };
        match hook {
            Some((hook, id)) => hook(&self.menu_handle(id), event),
            None => Disposition::Pass,
        }
    }

    pub(crate) fn handle_close(&self, event: &CloseEvent) -> Disposition {
        if self.is_shut_down() {
            return Disposition::Pass;
        }
        let hook = {
            let menus = self.read_menus();
            menus
                .in_order()
                .find(|(_, state)| state.container == event.container)
                .map(|(id, state)| (state.hooks.on_close.clone(), id))
        };
        if let Some((hook, id)) = hook {
            tracing::trace!("menu {} closed by {}", id, event.player);
            if let Some(hook) = hook {
                hook(&self.menu_handle(id), event);
            }
        }
        Disposition::Pass
    }

    pub(crate) fn handle_interact(&self, event: &InteractEvent) -> Disposition {
        if self.is_shut_down() {
            return Disposition::Pass;
        }
        let Some(identity) = event.stack.as_ref().and_then(|stack| stack.identity) else {
            return Disposition::Pass;
        };
        let matched = {
            let table = self.read_hotbar();
            let mut matched = None;
            for (id, state) in table.in_order() {
                if state.stack.id() == identity {
                    let callback = match event.button {
                        MouseButton::Left => state.callbacks.left.clone(),
                        MouseButton::Right => state.callbacks.right.clone(),
                        MouseButton::Middle => None,
                    };
                    matched = Some((id, callback, state.policy, state.stack.clone()));
                    break;
                }
            }
            matched
        };
        let Some((id, callback, policy, stack)) = matched else {
            return Disposition::Pass;
        };
        tracing::trace!("hotbar item {} used by {}", id, event.player);
        if let Some(callback) = callback {
            callback(event.player, &stack);
            match policy {
                UsagePolicy::Consume => self.hotbar_decrease_count(id),
                UsagePolicy::CountUp { .. } => self.hotbar_increase_count(id),
                UsagePolicy::Inert => {}
            }
        }
        Disposition::Cancel
    }

    pub(crate) fn handle_drop(&self, event: &DropEvent) -> Disposition {
        if self.is_shut_down() {
            return Disposition::Pass;
        }
        let Some(identity) = event.stack.identity else {
            return Disposition::Pass;
        };
        match self.hotbar_aux_callback(identity, |callbacks| callbacks.drop.clone()) {
            Some((callback, stack)) => {
                if let Some(callback) = callback {
                    callback(event.player, &stack);
                }
                Disposition::Cancel
            }
            None => Disposition::Pass,
        }
    }

    pub(crate) fn handle_swap(&self, event: &SwapHandsEvent) -> Disposition {
        if self.is_shut_down() {
            return Disposition::Pass;
        }
        let Some(identity) = event.stack.as_ref().and_then(|stack| stack.identity) else {
            return Disposition::Pass;
        };
        match self.hotbar_aux_callback(identity, |callbacks| callbacks.swap.clone()) {
            Some((callback, stack)) => {
                if let Some(callback) = callback {
                    callback(event.player, &stack);
                }
                Disposition::Cancel
            }
            None => Disposition::Pass,
        }
    }

    /// First registered item matching `identity`, with one of its
    /// drop/swap callbacks picked out. These paths carry no usage policy.
    fn hotbar_aux_callback(
        &self,
        identity: ItemId,
        pick: impl Fn(&HotbarCallbacks) -> Option<UseFn>,
    ) -> Option<(Option<UseFn>, UniqueStack)> {
        let table = self.read_hotbar();
        table
            .in_order()
            .find(|(_, state)| state.stack.id() == identity)
            .map(|(_, state)| (pick(&state.callbacks), state.stack.clone()))
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

impl ServiceInner {
    fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let menus: Vec<MenuState> = {
            let mut table = self.write_menus();
            let ids = table.ids_in_order();
            ids.into_iter().filter_map(|id| table.remove(id)).collect()
        };
        for state in &menus {
            self.close_container_viewers(state.container);
            self.host.containers().destroy_container(state.container);
        }
        let items: Vec<HotbarState> = {
            let mut table = self.write_hotbar();
            let ids = table.ids_in_order();
            ids.into_iter().filter_map(|id| table.remove(id)).collect()
        };
        for state in &items {
            if let Some(task) = state.refresh.as_ref().and_then(|refresh| refresh.task) {
                self.host.scheduler().cancel(task);
            }
            self.remove_item_from_slots(state.slot, state.stack.id());
        }
        *self.write_observers() = ObserverTable::new();
        self.write_external().clear();
        tracing::info!(
            "item service \"{}\" shut down ({} menus, {} hotbar items retired)",
            self.config.title,
            menus.len(),
            items.len()
        );
    }

    fn status_report(&self) -> String {
        let menus: Vec<(String, ContainerId)> = {
            let table = self.read_menus();
            table
                .in_order()
                .map(|(_, state)| (state.title.clone(), state.container))
                .collect()
        };
        let mut lines = vec![self.config.title.clone()];
        if menus.is_empty() {
            lines.push("there are no menus active".to_string());
        } else {
            lines.push("active menus:".to_string());
            for (title, container) in menus {
                let viewers = self.host.containers().viewers(container).len();
                lines.push(format!("- {} ({} open)", title, viewers));
            }
        }
        lines.join("\n")
    }
}

// ============================================================================
// Lock Plumbing
// ============================================================================

impl ServiceInner {
    fn read_observers(&self) -> RwLockReadGuard<'_, ObserverTable> {
        self.observers.read().expect("observer table lock poisoned")
    }

    fn write_observers(&self) -> RwLockWriteGuard<'_, ObserverTable> {
        self.observers.write().expect("observer table lock poisoned")
    }

    fn read_external(
        &self,
    ) -> RwLockReadGuard<'_, HashMap<ObserverId, Arc<dyn ItemObserver>>> {
        self.external.read().expect("observer map lock poisoned")
    }

    fn write_external(
        &self,
    ) -> RwLockWriteGuard<'_, HashMap<ObserverId, Arc<dyn ItemObserver>>> {
        self.external.write().expect("observer map lock poisoned")
    }

    fn read_menus(&self) -> RwLockReadGuard<'_, MenuTable> {
        self.menus.read().expect("menu registry lock poisoned")
    }

    fn write_menus(&self) -> RwLockWriteGuard<'_, MenuTable> {
        self.menus.write().expect("menu registry lock poisoned")
    }

    fn read_hotbar(&self) -> RwLockReadGuard<'_, HotbarTable> {
        self.hotbar.read().expect("hotbar registry lock poisoned")
    }

    fn write_hotbar(&self) -> RwLockWriteGuard<'_, HotbarTable> {
        self.hotbar.write().expect("hotbar registry lock poisoned")
    }
}
