//! Clickable container menus.
//!
//! A menu is a host container whose slots mix free-form stacks with locked,
//! identity-bearing ones. Locked stacks cannot be picked up; clicking them
//! runs the callback bound to their identity. A shared separator item fills
//! gaps. The menu observes every locked item it shows: item updates repaint
//! the matching slots, item clears remove them.
//!
//! [`Menu`] is a cheap cloneable handle; the state lives in the owning
//! service so callbacks may capture handles freely without keeping the
//! service alive.
mod registry;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Weak};

use itemkit_core::{
    ClickEvent, CloseEvent, ContainerId, Disposition, DragEvent, ItemId, MouseButton, PlayerId,
    StackSnapshot, UniqueStack,
};

pub(crate) use registry::MenuTable;

use crate::error::Result;
use crate::service::ServiceInner;

/// Identity of one menu within its service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuId(pub(crate) u64);

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu:{}", self.0)
    }
}

/// Callback bound to a locked item's identity.
pub type ClickFn = Arc<dyn Fn(PlayerId) + Send + Sync>;

/// Behavior override run instead of a menu's default event handling.
pub type ClickHookFn = Arc<dyn Fn(&Menu, &ClickEvent) -> Disposition + Send + Sync>;
/// Behavior override for drags.
pub type DragHookFn = Arc<dyn Fn(&Menu, &DragEvent) -> Disposition + Send + Sync>;
/// Runs when the menu's container is closed by a viewer.
pub type CloseHookFn = Arc<dyn Fn(&Menu, &CloseEvent) + Send + Sync>;

/// How a locked item reacts to clicks.
pub enum ClickBinding {
    /// No callback; the item is still locked in place.
    None,
    /// One callback for both buttons.
    Both(ClickFn),
    /// Separate callbacks per button; `None` sides keep whatever was
    /// already bound.
    Split {
        left: Option<ClickFn>,
        right: Option<ClickFn>,
    },
}

impl ClickBinding {
    pub fn both(f: impl Fn(PlayerId) + Send + Sync + 'static) -> Self {
        ClickBinding::Both(Arc::new(f))
    }

    pub fn left(f: impl Fn(PlayerId) + Send + Sync + 'static) -> Self {
        ClickBinding::Split {
            left: Some(Arc::new(f)),
            right: None,
        }
    }

    pub fn right(f: impl Fn(PlayerId) + Send + Sync + 'static) -> Self {
        ClickBinding::Split {
            left: None,
            right: Some(Arc::new(f)),
        }
    }
}

/// Per-event behavior overrides, supplied at construction.
///
/// Any field left `None` falls back to the default behavior described on
/// [`Menu`]. Overrides replace the default entirely for that event.
#[derive(Clone, Default)]
pub struct MenuHooks {
    pub on_click: Option<ClickHookFn>,
    pub on_bottom_click: Option<ClickHookFn>,
    pub on_drag: Option<DragHookFn>,
    pub on_bottom_drag: Option<DragHookFn>,
    pub on_close: Option<CloseHookFn>,
}

/// Construction recipe for a menu.
pub struct MenuBuilder {
    pub(crate) title: String,
    pub(crate) rows: usize,
    pub(crate) hooks: MenuHooks,
}

impl MenuBuilder {
    /// A menu of `rows` rows of nine slots. Rows are validated when the
    /// service builds the menu.
    pub fn new(title: impl Into<String>, rows: usize) -> Self {
        Self {
            title: title.into(),
            rows,
            hooks: MenuHooks::default(),
        }
    }

    pub fn hooks(mut self, hooks: MenuHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn on_click(
        mut self,
        f: impl Fn(&Menu, &ClickEvent) -> Disposition + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_click = Some(Arc::new(f));
        self
    }

    pub fn on_bottom_click(
        mut self,
        f: impl Fn(&Menu, &ClickEvent) -> Disposition + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_bottom_click = Some(Arc::new(f));
        self
    }

    pub fn on_drag(
        mut self,
        f: impl Fn(&Menu, &DragEvent) -> Disposition + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_drag = Some(Arc::new(f));
        self
    }

    pub fn on_bottom_drag(
        mut self,
        f: impl Fn(&Menu, &DragEvent) -> Disposition + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_bottom_drag = Some(Arc::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn(&Menu, &CloseEvent) + Send + Sync + 'static) -> Self {
        self.hooks.on_close = Some(Arc::new(f));
        self
    }
}

/// Bookkeeping for one open menu.
pub(crate) struct MenuState {
    pub container: ContainerId,
    pub title: String,
    pub size: usize,
    /// Identity of the service's shared separator; locked from the start
    /// and exempt from the usual detach rules.
    pub separator: ItemId,
    pub locked: HashSet<ItemId>,
    pub left_click: HashMap<ItemId, ClickFn>,
    pub right_click: HashMap<ItemId, ClickFn>,
    pub hooks: MenuHooks,
}

impl MenuState {
    pub fn new(container: ContainerId, title: String, size: usize, separator: ItemId) -> Self {
        let mut locked = HashSet::new();
        locked.insert(separator);
        Self {
            container,
            title,
            size,
            separator,
            locked,
            left_click: HashMap::new(),
            right_click: HashMap::new(),
            hooks: MenuHooks::default(),
        }
    }

    pub fn is_locked(&self, stack: &StackSnapshot) -> bool {
        stack.identity.is_some_and(|id| self.locked.contains(&id))
    }

    pub fn has_left_click(&self, stack: &StackSnapshot) -> bool {
        stack
            .identity
            .is_some_and(|id| self.left_click.contains_key(&id))
    }

    pub fn has_right_click(&self, stack: &StackSnapshot) -> bool {
        stack
            .identity
            .is_some_and(|id| self.right_click.contains_key(&id))
    }

    /// Installs callbacks for an identity. `None` sides never erase an
    /// existing binding; re-binding a side overwrites it.
    pub fn bind(&mut self, item: ItemId, binding: ClickBinding) {
        match binding {
            ClickBinding::None => {}
            ClickBinding::Both(f) => {
                self.left_click.insert(item, f.clone());
                self.right_click.insert(item, f);
            }
            ClickBinding::Split { left, right } => {
                if let Some(f) = left {
                    self.left_click.insert(item, f);
                }
                if let Some(f) = right {
                    self.right_click.insert(item, f);
                }
            }
        }
    }

    /// Default verdict for a click inside the menu: locked stacks swallow
    /// the interaction and may run a handler; everything else passes.
    pub fn click_verdict(&self, event: &ClickEvent) -> (Option<ClickFn>, Disposition) {
        let Some(stack) = &event.stack else {
            return (None, Disposition::Pass);
        };
        if !self.is_locked(stack) {
            return (None, Disposition::Pass);
        }
        let handler = stack.identity.and_then(|id| match event.button {
            MouseButton::Left => self.left_click.get(&id).cloned(),
            MouseButton::Right => self.right_click.get(&id).cloned(),
            MouseButton::Middle => None,
        });
        (handler, Disposition::Cancel)
    }

    /// Default verdict for a click in the viewer's own rows while this menu
    /// is on top: shift-clicks and left-clicks on locked stacks are
    /// cancelled so locked items cannot be pushed into the menu from below.
    pub fn bottom_click_verdict(&self, event: &ClickEvent) -> Disposition {
        let Some(stack) = &event.stack else {
            return Disposition::Pass;
        };
        if self.is_locked(stack) && (event.shift || event.button == MouseButton::Left) {
            Disposition::Cancel
        } else {
            Disposition::Pass
        }
    }

    /// Moves lock state and both callbacks from `old` onto `new`.
    ///
    /// The separator counts as locked without ever leaving the locked set,
    /// so swapping it out locks the replacement while other menus keep
    /// their separator intact.
    pub fn transfer_bindings(&mut self, old: ItemId, new: ItemId) {
        let was_locked = if old == self.separator {
            true
        } else {
            self.locked.remove(&old)
        };
        let left = self.left_click.remove(&old);
        let right = self.right_click.remove(&old);

        if was_locked {
            self.locked.insert(new);
        }
        if let Some(f) = left {
            self.left_click.insert(new, f);
        }
        if let Some(f) = right {
            self.right_click.insert(new, f);
        }
    }

    /// Drops an identity's lock and callbacks. Returns whether the menu
    /// should also unsubscribe from the item; the separator stays locked
    /// and subscribed.
    pub fn detach(&mut self, item: ItemId) -> bool {
        let is_separator = item == self.separator;
        if !is_separator {
            self.locked.remove(&item);
        }
        self.left_click.remove(&item);
        self.right_click.remove(&item);
        !is_separator
    }
}

/// Handle to one menu.
///
/// Clones are cheap and all refer to the same menu. Once the menu is
/// cleared or the service shuts down, mutating operations become silent
/// no-ops; placement reports [`ServiceError::MenuClosed`] or
/// [`ServiceError::ShutDown`].
///
/// [`ServiceError::MenuClosed`]: crate::ServiceError::MenuClosed
/// [`ServiceError::ShutDown`]: crate::ServiceError::ShutDown
#[derive(Clone)]
pub struct Menu {
    pub(crate) service: Weak<ServiceInner>,
    pub(crate) id: MenuId,
}

impl Menu {
    pub fn id(&self) -> MenuId {
        self.id
    }

    /// False once the menu was cleared or the service went away.
    pub fn is_open(&self) -> bool {
        self.with_service(|inner| inner.menu_exists(self.id))
            .unwrap_or(false)
    }

    pub fn container(&self) -> Option<ContainerId> {
        self.with_service(|inner| inner.menu_container(self.id))
            .flatten()
    }

    pub fn is_this_container(&self, container: ContainerId) -> bool {
        self.container() == Some(container)
    }

    pub fn viewer_count(&self) -> usize {
        self.with_service(|inner| inner.menu_viewer_count(self.id))
            .unwrap_or(0)
    }

    pub fn is_locked(&self, stack: &StackSnapshot) -> bool {
        self.with_service(|inner| inner.menu_is_locked(self.id, stack))
            .unwrap_or(false)
    }

    pub fn has_left_click(&self, stack: &StackSnapshot) -> bool {
        self.with_service(|inner| inner.menu_has_left_click(self.id, stack))
            .unwrap_or(false)
    }

    pub fn has_right_click(&self, stack: &StackSnapshot) -> bool {
        self.with_service(|inner| inner.menu_has_right_click(self.id, stack))
            .unwrap_or(false)
    }

    /// Contents of a slot, straight from the host container.
    pub fn stack_at(&self, slot: usize) -> Option<StackSnapshot> {
        self.with_service(|inner| inner.menu_stack_at(self.id, slot))
            .flatten()
    }

    /// Places a plain stack: no lock, no callbacks, freely movable.
    pub fn add_item(&self, slot: usize, stack: impl Into<StackSnapshot>) -> Result<()> {
        self.require_service()?.menu_add_item(self.id, slot, stack.into())
    }

    /// Places a locked item and subscribes the menu to it.
    pub fn add_locked_item(
        &self,
        slot: usize,
        item: &UniqueStack,
        binding: ClickBinding,
    ) -> Result<()> {
        self.require_service()?
            .menu_add_locked_item(self.id, slot, item, binding)
    }

    /// Fills the slot with the shared separator.
    pub fn add_separator(&self, slot: usize) -> Result<()> {
        self.require_service()?.menu_add_separator(self.id, slot)
    }

    /// Fills every currently empty slot with the shared separator.
    pub fn fill_gaps_with_separator(&self) -> Result<()> {
        self.require_service()?.menu_fill_gaps(self.id)
    }

    /// Replaces every occurrence of `old` with `new`, carrying lock state
    /// and callbacks over.
    pub fn swap_item(&self, old: &UniqueStack, new: &UniqueStack) {
        if let Some(inner) = self.service.upgrade() {
            inner.menu_swap_item(self.id, old, new);
        }
    }

    /// Clears every occurrence of `item` and detaches its lock and
    /// callbacks.
    pub fn remove_item(&self, item: &UniqueStack) {
        if let Some(inner) = self.service.upgrade() {
            inner.menu_remove_item(self.id, item.id());
        }
    }

    /// Shows the menu to a player.
    pub fn open(&self, player: PlayerId) {
        if let Some(inner) = self.service.upgrade() {
            inner.menu_open(self.id, player);
        }
    }

    /// Forces every current viewer out without clearing the menu.
    pub fn close_viewers(&self) {
        if let Some(inner) = self.service.upgrade() {
            inner.menu_close_viewers(self.id);
        }
    }

    /// Retires the menu: forces viewers out, unsubscribes it everywhere,
    /// deregisters it, and destroys the host container. Idempotent; the
    /// menu cannot be reopened.
    pub fn clear(&self) {
        if let Some(inner) = self.service.upgrade() {
            inner.menu_clear(self.id);
        }
    }

    fn with_service<R>(&self, f: impl FnOnce(&ServiceInner) -> R) -> Option<R> {
        self.service.upgrade().map(|inner| f(&inner))
    }

    fn require_service(&self) -> Result<Arc<ServiceInner>> {
        self.service
            .upgrade()
            .ok_or(crate::error::ServiceError::ShutDown)
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use itemkit_core::{Material, StackPayload};

    use super::*;

    const SEPARATOR: ItemId = ItemId(0);

    fn state() -> MenuState {
        MenuState::new(ContainerId(1), "test".into(), 27, SEPARATOR)
    }

    fn managed(id: u64) -> StackSnapshot {
        StackSnapshot {
            identity: Some(ItemId(id)),
            payload: StackPayload::new(Material::Stone, "s"),
        }
    }

    fn click(stack: Option<StackSnapshot>, button: MouseButton, shift: bool) -> ClickEvent {
        ClickEvent {
            player: PlayerId(1),
            clicked: Some(ContainerId(1)),
            top: Some(ContainerId(1)),
            slot: 0,
            button,
            shift,
            stack,
        }
    }

    #[test]
    fn separator_is_locked_from_the_start() {
        let state = state();
        assert!(state.is_locked(&StackSnapshot {
            identity: Some(SEPARATOR),
            payload: StackPayload::default(),
        }));
    }

    #[test]
    fn clicks_on_unlocked_or_empty_slots_pass() {
        let state = state();
        let (handler, verdict) = state.click_verdict(&click(None, MouseButton::Left, false));
        assert!(handler.is_none());
        assert_eq!(verdict, Disposition::Pass);

        let (handler, verdict) =
            state.click_verdict(&click(Some(managed(9)), MouseButton::Left, false));
        assert!(handler.is_none());
        assert_eq!(verdict, Disposition::Pass);
    }

    #[test]
    fn locked_clicks_cancel_and_pick_the_matching_handler() {
        let mut state = state();
        let item = ItemId(5);
        state.locked.insert(item);
        state.bind(
            item,
            ClickBinding::Split {
                left: Some(Arc::new(|_| {})),
                right: None,
            },
        );

        let (handler, verdict) =
            state.click_verdict(&click(Some(managed(5)), MouseButton::Left, false));
        assert!(handler.is_some());
        assert_eq!(verdict, Disposition::Cancel);

        // no right-side binding: still cancelled, nothing to run
        let (handler, verdict) =
            state.click_verdict(&click(Some(managed(5)), MouseButton::Right, false));
        assert!(handler.is_none());
        assert_eq!(verdict, Disposition::Cancel);

        let (handler, verdict) =
            state.click_verdict(&click(Some(managed(5)), MouseButton::Middle, false));
        assert!(handler.is_none());
        assert_eq!(verdict, Disposition::Cancel);
    }

    #[test]
    fn bottom_clicks_guard_shift_and_left_only() {
        let mut state = state();
        state.locked.insert(ItemId(5));

        let locked = managed(5);
        assert_eq!(
            state.bottom_click_verdict(&click(Some(locked.clone()), MouseButton::Left, false)),
            Disposition::Cancel
        );
        assert_eq!(
            state.bottom_click_verdict(&click(Some(locked.clone()), MouseButton::Right, true)),
            Disposition::Cancel
        );
        assert_eq!(
            state.bottom_click_verdict(&click(Some(locked), MouseButton::Right, false)),
            Disposition::Pass
        );
        assert_eq!(
            state.bottom_click_verdict(&click(Some(managed(6)), MouseButton::Left, false)),
            Disposition::Pass
        );
    }

    #[test]
    fn binding_none_sides_keep_existing_callbacks() {
        let mut state = state();
        let item = ItemId(3);
        state.bind(item, ClickBinding::both(|_| {}));
        state.bind(
            item,
            ClickBinding::Split {
                left: None,
                right: Some(Arc::new(|_| {})),
            },
        );
        assert!(state.left_click.contains_key(&item));
        assert!(state.right_click.contains_key(&item));
    }

    #[test]
    fn transfer_carries_lock_and_handlers() {
        let mut state = state();
        let old = ItemId(3);
        let new = ItemId(4);
        state.locked.insert(old);
        state.bind(old, ClickBinding::both(|_| {}));

        state.transfer_bindings(old, new);

        assert!(!state.locked.contains(&old));
        assert!(state.locked.contains(&new));
        assert!(state.left_click.contains_key(&new));
        assert!(state.right_click.contains_key(&new));
        assert!(!state.left_click.contains_key(&old));
    }

    #[test]
    fn swapping_the_separator_locks_the_replacement_and_keeps_the_separator_locked() {
        let mut state = state();
        let new = ItemId(8);

        state.transfer_bindings(SEPARATOR, new);

        assert!(state.locked.contains(&SEPARATOR));
        assert!(state.locked.contains(&new));
    }

    #[test]
    fn detach_spares_the_separator() {
        let mut state = state();
        let item = ItemId(6);
        state.locked.insert(item);
        state.bind(item, ClickBinding::both(|_| {}));

        assert!(state.detach(item));
        assert!(!state.locked.contains(&item));
        assert!(!state.left_click.contains_key(&item));

        assert!(!state.detach(SEPARATOR));
        assert!(state.locked.contains(&SEPARATOR));
    }
}
