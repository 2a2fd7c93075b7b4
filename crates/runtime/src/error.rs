//! Error types surfaced by the service API.
//!
//! Only author-facing construction and placement calls are fallible. Event
//! dispatch never errors: missing handlers, empty slots, and stacks without
//! an identity tag are silent no-ops.
use thiserror::Error;

use crate::config::ServiceConfig;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(
        "menu size must be between 1 and {max} rows, got {rows}",
        max = ServiceConfig::MENU_MAX_ROWS
    )]
    InvalidMenuSize { rows: usize },

    #[error("slot {slot} is out of range for a menu of {size} slots")]
    SlotOutOfRange { slot: usize, size: usize },

    #[error("menu has been cleared and cannot hold items")]
    MenuClosed,

    #[error("item service has been shut down")]
    ShutDown,
}
