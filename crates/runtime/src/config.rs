//! Service configuration.
use itemkit_core::{DyeColor, Material};

/// Tunable parameters and fixed bounds for an [`ItemService`](crate::ItemService).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Display title, used as the prefix of status reports.
    pub title: String,
    /// Material the shared separator renders as.
    pub separator_material: Material,
    /// Title of the shared separator (a blank-looking name by default).
    pub separator_title: String,
}

impl ServiceConfig {
    /// Slots per menu row.
    pub const MENU_COLUMNS: usize = 9;
    /// Tallest menu the host can show.
    pub const MENU_MAX_ROWS: usize = 6;
    /// Hard ceiling for a count-up cap; larger requests are clamped down.
    pub const COUNT_UP_CAP_LIMIT: u32 = 127;
    /// Step applied per use when no step is configured.
    pub const DEFAULT_COUNT_STEP: u32 = 1;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            separator_material: Material::StainedGlassPane(DyeColor::Black),
            separator_title: " ".to_owned(),
        }
    }

    pub fn with_separator(mut self, material: Material, title: impl Into<String>) -> Self {
        self.separator_material = material;
        self.separator_title = title.into();
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new("itemkit")
    }
}
