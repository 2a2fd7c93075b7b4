//! Host-side value types.

use std::fmt;

/// A connected player, as the host identifies them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player:{}", self.0)
    }
}

/// A host-managed container (the top inventory of an open screen).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerId(pub u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container:{}", self.0)
    }
}

/// Handle for a scheduled repeating task, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskId(pub u64);

/// A duration in host ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticks(pub u32);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);
}

/// Raised when a hotbar slot index falls outside the bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("hotbar slot {0} is out of range (the bar has 9 slots)")]
pub struct InvalidHotbarSlot(pub u8);

/// A validated hotbar slot index.
///
/// The bar is [`HotbarSlot::WIDTH`] slots wide; values outside `0..WIDTH`
/// never construct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HotbarSlot(u8);

impl HotbarSlot {
    /// Slots per hotbar.
    pub const WIDTH: u8 = 9;

    /// The leftmost slot.
    pub const FIRST: HotbarSlot = HotbarSlot(0);

    pub fn new(index: u8) -> Option<Self> {
        (index < Self::WIDTH).then_some(Self(index))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HotbarSlot {
    type Error = InvalidHotbarSlot;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or(InvalidHotbarSlot(index))
    }
}

impl fmt::Display for HotbarSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
