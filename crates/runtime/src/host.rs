//! In-memory host adapter for tests and demos.
//!
//! [`InMemoryHost`] implements all four host ports over plain maps plus a
//! manually advanced tick clock, and offers event-builder helpers that
//! snapshot slot contents the way a real adapter feeding
//! [`ItemService`](crate::ItemService) would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use itemkit_core::{
    ClickEvent, CloseEvent, ContainerId, Containers, DropEvent, HotbarSlot, InteractEvent,
    Inventories, MouseButton, PlayerId, PlayerRoster, StackSnapshot, SwapHandsEvent, TaskId,
    TickScheduler, Ticks,
};

struct ContainerState {
    title: String,
    slots: Vec<Option<StackSnapshot>>,
}

#[derive(Default)]
struct HostState {
    online: Vec<PlayerId>,
    hotbars: HashMap<PlayerId, HashMap<HotbarSlot, StackSnapshot>>,
    held: HashMap<PlayerId, HotbarSlot>,
    containers: HashMap<ContainerId, ContainerState>,
    screens: HashMap<PlayerId, ContainerId>,
}

struct ScheduledTask {
    next_due: u64,
    interval: u32,
    callback: Box<dyn FnMut() + Send>,
}

#[derive(Default)]
struct TaskTable {
    now: u64,
    tasks: HashMap<TaskId, ScheduledTask>,
    running: Option<TaskId>,
    running_cancelled: bool,
}

/// Reference host: roster, hotbars, containers with open screens, and a
/// tick scheduler driven by [`advance`](Self::advance).
///
/// Task callbacks run without any host lock held, so they may freely call
/// back into the host (including `cancel` on themselves).
#[derive(Default)]
pub struct InMemoryHost {
    state: Mutex<HostState>,
    tasks: Mutex<TaskTable>,
    next_container: AtomicU64,
    next_task: AtomicU64,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a player online. Reconnecting keeps their hotbar contents.
    pub fn connect(&self, player: PlayerId) {
        let mut state = self.lock_state();
        if !state.online.contains(&player) {
            state.online.push(player);
        }
    }

    /// Marks a player offline and drops their open screen.
    pub fn disconnect(&self, player: PlayerId) {
        let mut state = self.lock_state();
        state.online.retain(|other| *other != player);
        state.screens.remove(&player);
    }

    /// Changes which hotbar slot the player is holding.
    pub fn select_slot(&self, player: PlayerId, slot: HotbarSlot) {
        self.lock_state().held.insert(player, slot);
    }

    fn held_slot(&self, player: PlayerId) -> HotbarSlot {
        self.lock_state()
            .held
            .get(&player)
            .copied()
            .unwrap_or(HotbarSlot::FIRST)
    }

    /// Runs the clock forward, invoking every due repeating task once per
    /// elapsed tick. Tasks scheduled from inside a callback first run on
    /// a later tick.
    pub fn advance(&self, ticks: Ticks) {
        for _ in 0..ticks.0 {
            let due: Vec<TaskId> = {
                let mut table = self.lock_tasks();
                table.now += 1;
                let now = table.now;
                let mut due: Vec<_> = table
                    .tasks
                    .iter()
                    .filter(|(_, task)| task.next_due <= now)
                    .map(|(id, _)| *id)
                    .collect();
                due.sort();
                due
            };
            for id in due {
                self.run_task(id);
            }
        }
    }

    /// Number of repeating tasks still scheduled.
    pub fn pending_tasks(&self) -> usize {
        self.lock_tasks().tasks.len()
    }

    /// Title a container was created with.
    pub fn container_title(&self, container: ContainerId) -> Option<String> {
        self.lock_state()
            .containers
            .get(&container)
            .map(|state| state.title.clone())
    }

    fn run_task(&self, id: TaskId) {
        let popped = {
            let mut table = self.lock_tasks();
            let now = table.now;
            match table.tasks.remove(&id) {
                // no longer due
                Some(task) if task.next_due > now => {
                    table.tasks.insert(id, task);
                    None
                }
                Some(task) => {
                    table.running = Some(id);
                    table.running_cancelled = false;
                    Some(task)
                }
                None => None,
            }
        };
        let Some(mut task) = popped else {
            return;
        };
        (task.callback)();
        let mut table = self.lock_tasks();
        table.running = None;
        if !table.running_cancelled {
            task.next_due = table.now + u64::from(task.interval);
            table.tasks.insert(id, task);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().expect("host state lock poisoned")
    }

    fn lock_tasks(&self) -> MutexGuard<'_, TaskTable> {
        self.tasks.lock().expect("task table lock poisoned")
    }
}

/// Event builders. Each snapshots current slot contents so the produced
/// event looks exactly like what a live adapter would hand the service.
impl InMemoryHost {
    /// A click inside a container's own slots.
    pub fn click_in(
        &self,
        player: PlayerId,
        container: ContainerId,
        slot: usize,
        button: MouseButton,
        shift: bool,
    ) -> ClickEvent {
        ClickEvent {
            player,
            clicked: Some(container),
            top: self.open_container_of(player),
            slot,
            button,
            shift,
            stack: self.stack_at(container, slot),
        }
    }

    /// A click in the player's own inventory rows while a screen is open.
    /// Slots under [`HotbarSlot::WIDTH`] snapshot the player's hotbar.
    pub fn click_own_inventory(
        &self,
        player: PlayerId,
        slot: usize,
        button: MouseButton,
        shift: bool,
    ) -> ClickEvent {
        let stack = u8::try_from(slot)
            .ok()
            .and_then(HotbarSlot::new)
            .and_then(|slot| self.hotbar_stack(player, slot));
        ClickEvent {
            player,
            clicked: None,
            top: self.open_container_of(player),
            slot,
            button,
            shift,
            stack,
        }
    }

    /// A use of the held item outside any screen.
    pub fn interact(&self, player: PlayerId, button: MouseButton) -> InteractEvent {
        InteractEvent {
            player,
            button,
            stack: self.hotbar_stack(player, self.held_slot(player)),
        }
    }

    /// Dropping the held stack; `None` when the held slot is empty.
    pub fn drop_held(&self, player: PlayerId) -> Option<DropEvent> {
        let stack = self.hotbar_stack(player, self.held_slot(player))?;
        Some(DropEvent { player, stack })
    }

    /// Swapping the held stack to the off hand.
    pub fn swap_hands(&self, player: PlayerId) -> SwapHandsEvent {
        SwapHandsEvent {
            player,
            stack: self.hotbar_stack(player, self.held_slot(player)),
        }
    }

    /// The player closes their open screen. Clears the screen and returns
    /// the event to feed to the service; `None` when nothing was open.
    pub fn player_closes(&self, player: PlayerId) -> Option<CloseEvent> {
        let container = self.lock_state().screens.remove(&player)?;
        Some(CloseEvent { player, container })
    }
}

impl PlayerRoster for InMemoryHost {
    fn online_players(&self) -> Vec<PlayerId> {
        self.lock_state().online.clone()
    }

    fn is_online(&self, player: PlayerId) -> bool {
        self.lock_state().online.contains(&player)
    }
}

impl Inventories for InMemoryHost {
    fn hotbar_stack(&self, player: PlayerId, slot: HotbarSlot) -> Option<StackSnapshot> {
        self.lock_state()
            .hotbars
            .get(&player)
            .and_then(|bar| bar.get(&slot))
            .cloned()
    }

    fn set_hotbar_stack(&self, player: PlayerId, slot: HotbarSlot, stack: Option<StackSnapshot>) {
        let mut state = self.lock_state();
        let bar = state.hotbars.entry(player).or_default();
        match stack.filter(|stack| stack.payload.count > 0) {
            Some(stack) => {
                bar.insert(slot, stack);
            }
            None => {
                bar.remove(&slot);
            }
        }
    }
}

impl Containers for InMemoryHost {
    fn create_container(&self, title: &str, size: usize) -> ContainerId {
        let id = ContainerId(self.next_container.fetch_add(1, Ordering::Relaxed) + 1);
        self.lock_state().containers.insert(
            id,
            ContainerState {
                title: title.to_string(),
                slots: vec![None; size],
            },
        );
        id
    }

    fn destroy_container(&self, container: ContainerId) {
        let mut state = self.lock_state();
        state.containers.remove(&container);
        state.screens.retain(|_, open| *open != container);
    }

    fn stack_at(&self, container: ContainerId, slot: usize) -> Option<StackSnapshot> {
        self.lock_state()
            .containers
            .get(&container)
            .and_then(|state| state.slots.get(slot))
            .and_then(|stack| stack.clone())
    }

    fn set_stack_at(&self, container: ContainerId, slot: usize, stack: Option<StackSnapshot>) {
        let mut state = self.lock_state();
        let Some(container) = state.containers.get_mut(&container) else {
            return;
        };
        let Some(cell) = container.slots.get_mut(slot) else {
            return;
        };
        *cell = stack.filter(|stack| stack.payload.count > 0);
    }

    fn open_container(&self, player: PlayerId, container: ContainerId) {
        let mut state = self.lock_state();
        if state.online.contains(&player) && state.containers.contains_key(&container) {
            state.screens.insert(player, container);
        }
    }

    fn close_screen(&self, player: PlayerId) {
        self.lock_state().screens.remove(&player);
    }

    fn viewers(&self, container: ContainerId) -> Vec<PlayerId> {
        self.lock_state()
            .screens
            .iter()
            .filter(|(_, open)| **open == container)
            .map(|(player, _)| *player)
            .collect()
    }

    fn open_container_of(&self, player: PlayerId) -> Option<ContainerId> {
        self.lock_state().screens.get(&player).copied()
    }
}

impl TickScheduler for InMemoryHost {
    fn schedule_repeating(
        &self,
        delay: Ticks,
        interval: Ticks,
        task: Box<dyn FnMut() + Send>,
    ) -> TaskId {
        let id = TaskId(self.next_task.fetch_add(1, Ordering::Relaxed) + 1);
        let mut table = self.lock_tasks();
        let next_due = table.now + u64::from(delay.0);
        table.tasks.insert(
            id,
            ScheduledTask {
                next_due,
                interval: interval.0.max(1),
                callback: task,
            },
        );
        id
    }

    fn cancel(&self, task: TaskId) {
        let mut table = self.lock_tasks();
        if table.running == Some(task) {
            table.running_cancelled = true;
        } else {
            table.tasks.remove(&task);
        }
    }
}
