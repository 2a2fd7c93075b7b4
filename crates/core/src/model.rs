//! Custom-model hints attached to a stack payload.
//!
//! The host lets item models key off four parallel lists (strings, floats,
//! flags, colors). This mirrors that component: whole-list replacement plus
//! indexed setters that pad the target list with defaults up to the index.

/// An RGB color as the host's model component understands it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

/// Model-selection hints carried by a payload.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelData {
    pub strings: Vec<String>,
    pub floats: Vec<f32>,
    pub flags: Vec<bool>,
    pub colors: Vec<Rgb>,
}

impl ModelData {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no list carries any hint.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
            && self.floats.is_empty()
            && self.flags.is_empty()
            && self.colors.is_empty()
    }

    /// Sets `strings[index]`, growing the list with empty strings as needed.
    pub fn set_string(&mut self, index: usize, value: impl Into<String>) {
        pad_to(&mut self.strings, index);
        self.strings[index] = value.into();
    }

    /// Sets `floats[index]`, growing the list with zeroes as needed.
    pub fn set_float(&mut self, index: usize, value: f32) {
        pad_to(&mut self.floats, index);
        self.floats[index] = value;
    }

    /// Sets `flags[index]`, growing the list with `false` as needed.
    pub fn set_flag(&mut self, index: usize, value: bool) {
        pad_to(&mut self.flags, index);
        self.flags[index] = value;
    }

    /// Sets `colors[index]`, growing the list with white as needed.
    pub fn set_color(&mut self, index: usize, value: Rgb) {
        pad_to(&mut self.colors, index);
        self.colors[index] = value;
    }
}

fn pad_to<T: Default>(list: &mut Vec<T>, index: usize) {
    while list.len() <= index {
        list.push(T::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_setters_pad_with_defaults() {
        let mut data = ModelData::new();
        data.set_string(2, "gilded");
        assert_eq!(data.strings, vec!["".to_string(), "".to_string(), "gilded".to_string()]);

        data.set_float(1, 0.5);
        assert_eq!(data.floats, vec![0.0, 0.5]);

        data.set_flag(0, true);
        assert_eq!(data.flags, vec![true]);

        data.set_color(1, Rgb(10, 20, 30));
        assert_eq!(data.colors, vec![Rgb::WHITE, Rgb(10, 20, 30)]);
    }

    #[test]
    fn setting_an_existing_index_does_not_grow() {
        let mut data = ModelData::new();
        data.set_flag(1, true);
        data.set_flag(0, true);
        assert_eq!(data.flags, vec![true, true]);
    }

    #[test]
    fn empty_tracks_all_four_lists() {
        let mut data = ModelData::new();
        assert!(data.is_empty());
        data.set_float(0, 1.0);
        assert!(!data.is_empty());
    }
}
