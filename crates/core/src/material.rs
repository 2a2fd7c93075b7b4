//! Host material vocabulary.
//!
//! A compact model of the host's item materials: the colorable block
//! families, the special families with per-variant display quirks
//! (minecarts, music discs, smithing templates), and a handful of flat
//! materials that menus and hotbar items commonly use. Display helpers
//! reproduce the host's default English naming.

use std::fmt;

/// The 16-color chat palette.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TextColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    #[default]
    White,
}

impl TextColor {
    /// Nearest block color for this chat color.
    ///
    /// The palettes do not line up one-to-one, so several chat colors share
    /// a block color. `White` maps to `None`: recoloring with white keeps
    /// the base material.
    pub fn block_color(self) -> Option<DyeColor> {
        match self {
            TextColor::DarkBlue | TextColor::Blue => Some(DyeColor::Blue),
            TextColor::DarkAqua => Some(DyeColor::Cyan),
            TextColor::Aqua => Some(DyeColor::LightBlue),
            TextColor::DarkGreen => Some(DyeColor::Green),
            TextColor::Green => Some(DyeColor::Lime),
            TextColor::Yellow => Some(DyeColor::Yellow),
            TextColor::Gold => Some(DyeColor::Orange),
            TextColor::Red => Some(DyeColor::Red),
            TextColor::DarkRed => Some(DyeColor::Brown),
            TextColor::LightPurple => Some(DyeColor::Magenta),
            TextColor::DarkPurple => Some(DyeColor::Purple),
            TextColor::Black => Some(DyeColor::Black),
            TextColor::DarkGray => Some(DyeColor::Gray),
            TextColor::Gray => Some(DyeColor::LightGray),
            TextColor::White => None,
        }
    }
}

/// The 16 block colors shared by wool, concrete, glass and terracotta.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DyeColor {
    #[default]
    White,
    LightGray,
    Gray,
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Lime,
    Green,
    Cyan,
    LightBlue,
    Blue,
    Purple,
    Magenta,
    Pink,
}

/// What a minecart carries.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Cargo {
    Chest,
    Furnace,
    Hopper,
    Tnt,
}

/// Named music discs.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Disc {
    Cat,
    Blocks,
    Chirp,
    Far,
    Mall,
    Mellohi,
    Stal,
    Strad,
    Ward,
    Pigstep,
    Otherside,
    Relic,
}

/// Smithing template variants: one upgrade plus the armor trim patterns.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Template {
    NetheriteUpgrade,
    Sentry,
    Dune,
    Coast,
    Wild,
    Ward,
    Eye,
    Vex,
    Tide,
    Snout,
    Rib,
    Spire,
    Silence,
    Wayfinder,
}

/// A host material.
///
/// Colorable families carry their [`DyeColor`]; the flat variants cover the
/// materials this library reaches for in menus and hotbar items. `Air`
/// renders as an empty slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Material {
    #[default]
    Air,
    StainedGlassPane(DyeColor),
    Wool(DyeColor),
    Concrete(DyeColor),
    Terracotta(DyeColor),
    Minecart(Option<Cargo>),
    MusicDisc(Disc),
    SmithingTemplate(Template),
    Stone,
    Arrow,
    Book,
    Clock,
    Compass,
    Paper,
    Emerald,
    Diamond,
    Stick,
    Barrier,
    Torch,
    Tnt,
    HeartOfTheSea,
}

impl Material {
    /// Canonical snake_case identifier, matching the host's material names.
    pub fn id(&self) -> String {
        match self {
            Material::Air => "air".to_owned(),
            Material::StainedGlassPane(color) => format!("{color}_stained_glass_pane"),
            Material::Wool(color) => format!("{color}_wool"),
            Material::Concrete(color) => format!("{color}_concrete"),
            Material::Terracotta(color) => format!("{color}_terracotta"),
            Material::Minecart(None) => "minecart".to_owned(),
            Material::Minecart(Some(cargo)) => format!("{cargo}_minecart"),
            Material::MusicDisc(disc) => format!("music_disc_{disc}"),
            Material::SmithingTemplate(Template::NetheriteUpgrade) => {
                "netherite_upgrade_smithing_template".to_owned()
            }
            Material::SmithingTemplate(pattern) => {
                format!("{pattern}_armor_trim_smithing_template")
            }
            Material::Stone => "stone".to_owned(),
            Material::Arrow => "arrow".to_owned(),
            Material::Book => "book".to_owned(),
            Material::Clock => "clock".to_owned(),
            Material::Compass => "compass".to_owned(),
            Material::Paper => "paper".to_owned(),
            Material::Emerald => "emerald".to_owned(),
            Material::Diamond => "diamond".to_owned(),
            Material::Stick => "stick".to_owned(),
            Material::Barrier => "barrier".to_owned(),
            Material::Torch => "torch".to_owned(),
            Material::Tnt => "tnt".to_owned(),
            Material::HeartOfTheSea => "heart_of_the_sea".to_owned(),
        }
    }

    /// Recolors a colorable family to the block color nearest `color`.
    ///
    /// White and non-colorable materials return `self` unchanged.
    #[must_use]
    pub fn colored(self, color: TextColor) -> Material {
        let Some(dye) = color.block_color() else {
            return self;
        };
        match self {
            Material::StainedGlassPane(_) => Material::StainedGlassPane(dye),
            Material::Wool(_) => Material::Wool(dye),
            Material::Concrete(_) => Material::Concrete(dye),
            Material::Terracotta(_) => Material::Terracotta(dye),
            other => other,
        }
    }

    /// Default English display name.
    ///
    /// Snake segments are title-cased with the small words `of`, `on`, `a`
    /// and `with` kept lowercase and `tnt` upper-cased. Minecarts with cargo
    /// render as "Minecart with X"; every music disc renders as "Music Disc"
    /// and every template as "Smithing Template", with the variant detail
    /// moved to [`Material::subtitle`].
    pub fn display_name(&self) -> String {
        let id = self.id();
        let mut words: Vec<&str> = id.split('_').collect();

        if words.len() == 2 && words[1] == "minecart" {
            words = vec!["minecart", "with", words[0]];
        } else if words.contains(&"template") {
            return "Smithing Template".to_owned();
        } else if words.contains(&"music") {
            return "Music Disc".to_owned();
        }

        let formatted: Vec<String> = words
            .iter()
            .map(|word| match *word {
                "of" | "on" | "a" | "with" => (*word).to_owned(),
                "tnt" => word.to_uppercase(),
                other => capitalize(other),
            })
            .collect();
        formatted.join(" ")
    }

    /// Variant detail for materials whose display name collapses the family.
    ///
    /// `Some` only for music discs and smithing templates.
    pub fn subtitle(&self) -> Option<String> {
        let id = self.id();
        let words: Vec<&str> = id.split('_').collect();

        if words.contains(&"template") {
            if words.contains(&"trim") {
                return Some(format!("Template: {} Armor Trim", capitalize(words[0])));
            }
            return Some("Template: Netherite Upgrade".to_owned());
        }
        if words.contains(&"music") {
            return words.last().map(|disc| format!("disc: {disc}"));
        }
        None
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
