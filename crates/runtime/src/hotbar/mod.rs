//! Shared hotbar items.
//!
//! A hotbar item is one logical [`UniqueStack`] mirrored into a fixed
//! hotbar slot of every player that receives it. Interactions anywhere are
//! matched back to the item by identity and routed to its callbacks; an
//! optional usage policy then consumes the stack or counts uses up. The
//! refreshing variant adds a repeating host task that runs an effect
//! against the item.
mod registry;

use std::fmt;
use std::sync::{Arc, Weak};

use itemkit_core::{
    HotbarSlot, Material, PlayerId, StackMeta, StackSnapshot, TaskId, Ticks, UniqueStack,
};

pub(crate) use registry::HotbarTable;

use crate::config::ServiceConfig;
use crate::service::ServiceInner;

/// Identity of one registered hotbar item within its service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HotbarId(pub(crate) u64);

impl fmt::Display for HotbarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hotbar:{}", self.0)
    }
}

/// Callback run when a player uses, drops, or offhand-swaps the item.
pub type UseFn = Arc<dyn Fn(PlayerId, &UniqueStack) + Send + Sync>;

/// Periodic effect run against a refreshing item.
pub type RefreshFn = Arc<dyn Fn(&HotbarItem) + Send + Sync>;

/// What happens to the stack after a use callback ran.
///
/// Policies are mutually exclusive; configuring one replaces the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UsagePolicy {
    /// The stack count never changes on use.
    #[default]
    Inert,
    /// Each use shrinks the count by the step; at zero the slot renders
    /// empty.
    Consume,
    /// Each use grows the count by the step; past `cap` the count wraps
    /// back to one step.
    CountUp { cap: u32 },
}

#[derive(Clone, Default)]
pub(crate) struct HotbarCallbacks {
    pub left: Option<UseFn>,
    pub right: Option<UseFn>,
    pub drop: Option<UseFn>,
    pub swap: Option<UseFn>,
}

/// Refresh bookkeeping, present only on items built as refreshing.
pub(crate) struct RefreshState {
    pub effect: Option<RefreshFn>,
    pub interval: Option<Ticks>,
    pub task: Option<TaskId>,
}

/// Bookkeeping for one registered hotbar item.
pub(crate) struct HotbarState {
    pub stack: UniqueStack,
    pub slot: HotbarSlot,
    pub callbacks: HotbarCallbacks,
    pub policy: UsagePolicy,
    pub step: u32,
    pub refresh: Option<RefreshState>,
}

impl HotbarState {
    /// Count-up wrap: a count past the cap restarts at one step.
    pub fn wrapped_count(&self, count: u32) -> u32 {
        match self.policy {
            UsagePolicy::CountUp { cap } if cap > 0 && count > cap => self.step,
            _ => count,
        }
    }
}

/// Construction recipe for a hotbar item.
pub struct HotbarItemBuilder {
    pub(crate) stack: UniqueStack,
    pub(crate) slot: HotbarSlot,
    pub(crate) callbacks: HotbarCallbacks,
    pub(crate) policy: UsagePolicy,
    pub(crate) step: u32,
}

impl HotbarItemBuilder {
    /// A hotbar item showing `stack`, placed in the first slot unless
    /// [`slot`](Self::slot) says otherwise.
    pub fn new(stack: UniqueStack) -> Self {
        Self {
            stack,
            slot: HotbarSlot::FIRST,
            callbacks: HotbarCallbacks::default(),
            policy: UsagePolicy::Inert,
            step: ServiceConfig::DEFAULT_COUNT_STEP,
        }
    }

    pub fn slot(mut self, slot: HotbarSlot) -> Self {
        self.slot = slot;
        self
    }

    pub fn on_left_click(
        mut self,
        f: impl Fn(PlayerId, &UniqueStack) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.left = Some(Arc::new(f));
        self
    }

    pub fn on_right_click(
        mut self,
        f: impl Fn(PlayerId, &UniqueStack) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.right = Some(Arc::new(f));
        self
    }

    pub fn on_drop(mut self, f: impl Fn(PlayerId, &UniqueStack) + Send + Sync + 'static) -> Self {
        self.callbacks.drop = Some(Arc::new(f));
        self
    }

    pub fn on_swap(mut self, f: impl Fn(PlayerId, &UniqueStack) + Send + Sync + 'static) -> Self {
        self.callbacks.swap = Some(Arc::new(f));
        self
    }

    /// Uses shrink the stack. Replaces any count-up policy.
    pub fn consume_on_use(mut self) -> Self {
        self.policy = UsagePolicy::Consume;
        self
    }

    /// Uses grow the stack, wrapping past `cap`. The cap is clamped to
    /// 127; a zero cap disables the policy. Replaces any consume policy.
    pub fn count_up_on_use(mut self, cap: u32) -> Self {
        let cap = cap.min(ServiceConfig::COUNT_UP_CAP_LIMIT);
        self.policy = if cap == 0 {
            UsagePolicy::Inert
        } else {
            UsagePolicy::CountUp { cap }
        };
        self
    }

    /// How much one use changes the count.
    pub fn count_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub(crate) fn into_state(self, refreshing: bool) -> HotbarState {
        HotbarState {
            stack: self.stack,
            slot: self.slot,
            callbacks: self.callbacks,
            policy: self.policy,
            step: self.step,
            refresh: refreshing.then(|| RefreshState {
                effect: None,
                interval: None,
                task: None,
            }),
        }
    }
}

/// Handle to one registered hotbar item.
///
/// Clones are cheap and all refer to the same item. Every operation is a
/// silent no-op once the item was cleared or the service shut down.
#[derive(Clone)]
pub struct HotbarItem {
    pub(crate) service: Weak<ServiceInner>,
    pub(crate) id: HotbarId,
}

impl HotbarItem {
    pub fn id(&self) -> HotbarId {
        self.id
    }

    /// Clone of the canonical stack, `None` once cleared.
    pub fn stack(&self) -> Option<UniqueStack> {
        self.with_service(|inner| inner.hotbar_stack(self.id)).flatten()
    }

    pub fn slot(&self) -> Option<HotbarSlot> {
        self.with_service(|inner| inner.hotbar_slot(self.id)).flatten()
    }

    /// Whether `stack` carries this item's identity.
    pub fn matches(&self, stack: &StackSnapshot) -> bool {
        self.with_service(|inner| inner.hotbar_matches(self.id, stack))
            .unwrap_or(false)
    }

    /// Writes the stack into the player's configured hotbar slot.
    pub fn give_to(&self, player: PlayerId) {
        self.touch(|inner| inner.hotbar_give_to(self.id, player));
    }

    /// Gives the item to every online player.
    pub fn give_to_everyone(&self) {
        self.touch(|inner| inner.hotbar_give_to_everyone(self.id));
    }

    /// Sets the count, applying the count-up wrap, and repaints every
    /// player slot holding the item. Count 0 renders as an empty slot.
    pub fn update_count(&self, count: u32) {
        self.touch(|inner| inner.hotbar_update_count(self.id, count));
    }

    /// Grows the count by one step.
    pub fn increase_count(&self) {
        self.touch(|inner| inner.hotbar_increase_count(self.id));
    }

    /// Shrinks the count by one step, saturating at zero.
    pub fn decrease_count(&self) {
        self.touch(|inner| inner.hotbar_decrease_count(self.id));
    }

    pub fn update_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.touch(|inner| inner.hotbar_update_title(self.id, title));
    }

    pub fn update_lore(&self, lore: Vec<String>) {
        self.touch(|inner| inner.hotbar_update_lore(self.id, lore));
    }

    pub fn update_material(&self, material: Material) {
        self.touch(|inner| inner.hotbar_update_material(self.id, material));
    }

    pub fn update_glint(&self, glint: bool) {
        self.touch(|inner| inner.hotbar_update_glint(self.id, glint));
    }

    /// Applies a whole metadata block; ignored unless the identity
    /// matches.
    pub fn update_meta(&self, meta: StackMeta) {
        self.touch(|inner| inner.hotbar_update_meta(self.id, meta));
    }

    /// Empties the matching slot of every online player. The item stays
    /// registered and can be given out again.
    pub fn remove_from_everyone(&self) {
        self.touch(|inner| inner.hotbar_remove_from_everyone(self.id));
    }

    /// Number of online players whose configured slot currently holds
    /// this item.
    pub fn usage_count(&self) -> usize {
        self.with_service(|inner| inner.hotbar_usage_count(self.id))
            .unwrap_or(0)
    }

    /// Retires the item: unsubscribes it, deregisters it, and empties
    /// every player slot holding it. Idempotent.
    pub fn clear(&self) {
        self.touch(|inner| inner.hotbar_clear(self.id));
    }

    fn with_service<R>(&self, f: impl FnOnce(&ServiceInner) -> R) -> Option<R> {
        self.service.upgrade().map(|inner| f(&inner))
    }

    fn touch(&self, f: impl FnOnce(&ServiceInner)) {
        if let Some(inner) = self.service.upgrade() {
            f(&inner);
        }
    }
}

impl fmt::Debug for HotbarItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotbarItem").field("id", &self.id).finish()
    }
}

/// A hotbar item with a periodic refresh effect.
///
/// The effect and interval start unconfigured and are set on the handle;
/// refreshing only runs between [`start_refreshing`] and
/// [`stop_refreshing`].
///
/// [`start_refreshing`]: Self::start_refreshing
/// [`stop_refreshing`]: Self::stop_refreshing
#[derive(Clone, Debug)]
pub struct RefreshingHotbarItem {
    pub(crate) item: HotbarItem,
}

impl RefreshingHotbarItem {
    /// The underlying hotbar item.
    pub fn item(&self) -> &HotbarItem {
        &self.item
    }

    pub fn set_refresh_effect(&self, f: impl Fn(&HotbarItem) + Send + Sync + 'static) -> &Self {
        self.item
            .touch(|inner| inner.refresh_set_effect(self.item.id, Arc::new(f)));
        self
    }

    pub fn set_refresh_interval(&self, interval: Ticks) -> &Self {
        self.item
            .touch(|inner| inner.refresh_set_interval(self.item.id, interval));
        self
    }

    /// Schedules the repeating refresh. Returns false when already
    /// running or when no interval is configured; the first run happens
    /// on the next tick.
    pub fn start_refreshing(&self) -> bool {
        self.item
            .with_service(|inner| inner.refresh_start(self.item.id))
            .unwrap_or(false)
    }

    /// Cancels the pending recurrence. Returns false when not running.
    /// A later [`start_refreshing`](Self::start_refreshing) may schedule
    /// again.
    pub fn stop_refreshing(&self) -> bool {
        self.item
            .with_service(|inner| inner.refresh_stop(self.item.id))
            .unwrap_or(false)
    }

    /// Runs the effect once, immediately, if one is configured.
    pub fn refresh_now(&self) {
        self.item.touch(|inner| inner.refresh_now(self.item.id));
    }

    /// Stops refreshing and retires the underlying item.
    pub fn clear(&self) {
        self.item.clear();
    }
}

#[cfg(test)]
mod tests {
    use itemkit_core::{IdAllocator, StackBuilder};

    use super::*;

    fn stack(ids: &IdAllocator) -> UniqueStack {
        StackBuilder::new(Material::Clock, "timer").build(ids)
    }

    #[test]
    fn count_up_wraps_past_the_cap() {
        let ids = IdAllocator::new();
        let mut state = HotbarItemBuilder::new(stack(&ids)).into_state(false);
        state.policy = UsagePolicy::CountUp { cap: 6 };
        state.step = 2;

        assert_eq!(state.wrapped_count(6), 6);
        assert_eq!(state.wrapped_count(7), 2);
        assert_eq!(state.wrapped_count(8), 2);
    }

    #[test]
    fn inert_and_consume_policies_never_wrap() {
        let ids = IdAllocator::new();
        let mut state = HotbarItemBuilder::new(stack(&ids)).into_state(false);
        assert_eq!(state.wrapped_count(500), 500);

        state.policy = UsagePolicy::Consume;
        assert_eq!(state.wrapped_count(500), 500);
    }

    #[test]
    fn builder_clamps_the_cap_and_disables_on_zero() {
        let ids = IdAllocator::new();
        let built = HotbarItemBuilder::new(stack(&ids)).count_up_on_use(1000);
        assert_eq!(built.policy, UsagePolicy::CountUp { cap: 127 });

        let built = HotbarItemBuilder::new(stack(&ids)).count_up_on_use(0);
        assert_eq!(built.policy, UsagePolicy::Inert);
    }

    #[test]
    fn policies_replace_each_other() {
        let ids = IdAllocator::new();
        let built = HotbarItemBuilder::new(stack(&ids))
            .consume_on_use()
            .count_up_on_use(10);
        assert_eq!(built.policy, UsagePolicy::CountUp { cap: 10 });

        let built = HotbarItemBuilder::new(stack(&ids))
            .count_up_on_use(10)
            .consume_on_use();
        assert_eq!(built.policy, UsagePolicy::Consume);
    }

    #[test]
    fn refreshing_state_starts_unconfigured() {
        let ids = IdAllocator::new();
        let state = HotbarItemBuilder::new(stack(&ids)).into_state(true);
        let refresh = state.refresh.as_ref().unwrap();
        assert!(refresh.effect.is_none());
        assert!(refresh.interval.is_none());
        assert!(refresh.task.is_none());

        let state = HotbarItemBuilder::new(stack(&ids)).into_state(false);
        assert!(state.refresh.is_none());
    }
}
