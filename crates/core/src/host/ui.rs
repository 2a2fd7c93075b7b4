//! Host-delivered UI interaction events and the library's verdict on them.

use crate::stack::StackSnapshot;

use super::types::{ContainerId, PlayerId};

/// Which mouse button an interaction used.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What the host should do with the default interaction after the library
/// has seen the event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Disposition {
    /// Let the host's default handling proceed.
    #[default]
    Pass,
    /// Suppress the default handling (the stack stays where it is).
    Cancel,
}

impl Disposition {
    #[inline]
    pub fn is_cancelled(self) -> bool {
        self == Disposition::Cancel
    }
}

/// A click in an open screen.
///
/// `clicked` is the container half the click landed in (`None` for the
/// player's own inventory rows); `top` is whatever container is open on
/// top of the screen. `stack` snapshots the clicked slot's contents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClickEvent {
    pub player: PlayerId,
    pub clicked: Option<ContainerId>,
    pub top: Option<ContainerId>,
    pub slot: usize,
    pub button: MouseButton,
    pub shift: bool,
    pub stack: Option<StackSnapshot>,
}

/// A drag spread across one or more slots of an open screen.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragEvent {
    pub player: PlayerId,
    pub container: Option<ContainerId>,
    pub top: Option<ContainerId>,
    pub slots: Vec<usize>,
}

/// A screen showing `container` was closed by `player`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CloseEvent {
    pub player: PlayerId,
    pub container: ContainerId,
}

/// A player used the item in their hand (outside any menu).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractEvent {
    pub player: PlayerId,
    pub button: MouseButton,
    pub stack: Option<StackSnapshot>,
}

/// A player dropped the held stack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropEvent {
    pub player: PlayerId,
    pub stack: StackSnapshot,
}

/// A player swapped the held stack to their off hand.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapHandsEvent {
    pub player: PlayerId,
    pub stack: Option<StackSnapshot>,
}
