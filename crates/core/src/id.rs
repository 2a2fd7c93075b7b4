//! Item identity types.
//!
//! Every logical item is stamped with an [`ItemId`] at construction. Identity
//! equality is the only notion of "sameness" between stacks: two stacks with
//! equal ids are the same logical item no matter how their visuals differ.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a logical item.
///
/// Multiple physical stacks (menu slots, player hotbars) may carry the same
/// id; they are all views of one logical item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u64);

impl ItemId {
    /// Returns the raw id value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allocator handing out item identities.
///
/// Owned by the service that mints stacks rather than being process-wide,
/// so construction stays deterministic under test. Ids are strictly
/// increasing and never reused; the u64 range outlives any plugin session.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Creates an allocator starting at id 0.
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Returns the next unused id.
    ///
    /// Every logical item construction consumes exactly one identity.
    #[inline]
    pub fn allocate(&self) -> ItemId {
        ItemId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
