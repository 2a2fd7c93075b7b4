//! Unique stacks: logical items with identity plus a visual payload.
//!
//! A [`UniqueStack`] pairs one minted [`ItemId`] with the visuals drawn in
//! slots. Identity is immutable after mint and is the only notion of
//! sameness: two stone stacks with different ids are different items, two
//! payload-divergent stacks with the same id are the same item.

use crate::id::{IdAllocator, ItemId};
use crate::material::Material;
use crate::model::{ModelData, Rgb};

bitflags::bitflags! {
    /// Display toggles on a payload.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StackFlags: u8 {
        /// Renders the enchant shimmer.
        const GLINT = 1 << 0;
        /// Suppresses real enchant lines in the tooltip.
        const HIDE_ENCHANTS = 1 << 1;
    }
}

// Flags travel as their raw bits; unknown bits are dropped on the way in.
#[cfg(feature = "serde")]
impl serde::Serialize for StackFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StackFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits: u8 = serde::Deserialize::deserialize(deserializer)?;
        Ok(StackFlags::from_bits_truncate(bits))
    }
}

/// Visual attributes of a stack, with no identity attached.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackPayload {
    pub material: Material,
    pub title: String,
    pub lore: Vec<String>,
    pub count: u32,
    pub flags: StackFlags,
    pub model: ModelData,
}

impl Default for StackPayload {
    fn default() -> Self {
        Self {
            material: Material::Air,
            title: String::new(),
            lore: Vec::new(),
            count: 1,
            flags: StackFlags::empty(),
            model: ModelData::new(),
        }
    }
}

impl StackPayload {
    pub fn new(material: Material, title: impl Into<String>) -> Self {
        Self {
            material,
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Detachable visual snapshot carrying the identity tag.
///
/// The host hands metadata around by value (anvil edits, copies between
/// slots); the embedded id lets [`UniqueStack::update_meta`] refuse metadata
/// that belongs to a different item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackMeta {
    pub identity: ItemId,
    pub title: String,
    pub lore: Vec<String>,
    pub flags: StackFlags,
    pub model: ModelData,
}

/// What a physical slot holds, from the library's point of view.
///
/// Stacks minted by this library carry their identity; anything else the
/// player dropped in has `identity: None`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackSnapshot {
    pub identity: Option<ItemId>,
    pub payload: StackPayload,
}

impl StackSnapshot {
    /// A stack the library did not mint.
    pub fn unmanaged(payload: StackPayload) -> Self {
        Self {
            identity: None,
            payload,
        }
    }

    /// True when this slot holds the item with the given identity.
    #[inline]
    pub fn carries(&self, id: ItemId) -> bool {
        self.identity == Some(id)
    }
}

impl From<&UniqueStack> for StackSnapshot {
    fn from(stack: &UniqueStack) -> Self {
        Self {
            identity: Some(stack.id()),
            payload: stack.payload().clone(),
        }
    }
}

impl From<StackPayload> for StackSnapshot {
    fn from(payload: StackPayload) -> Self {
        Self::unmanaged(payload)
    }
}

/// A logical item: one minted identity plus its current visuals.
///
/// Payload mutators return `&mut Self` so visual edits chain; none of them
/// touch the identity. Mutation alone does not repaint slots; the owning
/// service broadcasts on `push_updates`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniqueStack {
    id: ItemId,
    payload: StackPayload,
}

impl UniqueStack {
    /// Mints a new logical item, consuming one identity from `ids`.
    pub fn mint(ids: &IdAllocator, payload: StackPayload) -> Self {
        Self {
            id: ids.allocate(),
            payload,
        }
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[inline]
    pub fn payload(&self) -> &StackPayload {
        &self.payload
    }

    /// True when `other` is the same logical item, payloads aside.
    #[inline]
    pub fn same_identity(&self, other: &UniqueStack) -> bool {
        self.id == other.id
    }

    /// Extracts the detachable visual snapshot, identity tag included.
    pub fn meta(&self) -> StackMeta {
        StackMeta {
            identity: self.id,
            title: self.payload.title.clone(),
            lore: self.payload.lore.clone(),
            flags: self.payload.flags,
            model: self.payload.model.clone(),
        }
    }

    /// Applies a detached snapshot back onto this item.
    ///
    /// Silently refuses metadata whose embedded id differs from this item's:
    /// applying one item's meta to another would split their identities.
    pub fn update_meta(&mut self, meta: StackMeta) -> &mut Self {
        if meta.identity != self.id {
            return self;
        }
        self.payload.title = meta.title;
        self.payload.lore = meta.lore;
        self.payload.flags = meta.flags;
        self.payload.model = meta.model;
        self
    }

    pub fn update_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.payload.title = title.into();
        self
    }

    pub fn update_lore(&mut self, lore: Vec<String>) -> &mut Self {
        self.payload.lore = lore;
        self
    }

    pub fn update_material(&mut self, material: Material) -> &mut Self {
        self.payload.material = material;
        self
    }

    pub fn update_count(&mut self, count: u32) -> &mut Self {
        self.payload.count = count;
        self
    }

    pub fn increase_count(&mut self, steps: u32) -> &mut Self {
        let count = self.payload.count.saturating_add(steps);
        self.update_count(count)
    }

    /// Decrements, saturating at zero. A zero count renders as an empty slot.
    pub fn decrease_count(&mut self, steps: u32) -> &mut Self {
        let count = self.payload.count.saturating_sub(steps);
        self.update_count(count)
    }

    /// Toggles the shimmer. Enabling also hides real enchant lines;
    /// disabling reveals them again.
    pub fn update_glint(&mut self, glint: bool) -> &mut Self {
        if glint {
            self.payload.flags |= StackFlags::GLINT | StackFlags::HIDE_ENCHANTS;
        } else {
            self.payload.flags &= !(StackFlags::GLINT | StackFlags::HIDE_ENCHANTS);
        }
        self
    }

    pub fn update_model(&mut self, model: ModelData) -> &mut Self {
        self.payload.model = model;
        self
    }

    pub fn set_model_string(&mut self, index: usize, value: impl Into<String>) -> &mut Self {
        self.payload.model.set_string(index, value);
        self
    }

    pub fn set_model_float(&mut self, index: usize, value: f32) -> &mut Self {
        self.payload.model.set_float(index, value);
        self
    }

    pub fn set_model_flag(&mut self, index: usize, value: bool) -> &mut Self {
        self.payload.model.set_flag(index, value);
        self
    }

    pub fn set_model_color(&mut self, index: usize, value: Rgb) -> &mut Self {
        self.payload.model.set_color(index, value);
        self
    }
}

/// Mint-path builder for [`UniqueStack`].
pub struct StackBuilder {
    payload: StackPayload,
}

impl StackBuilder {
    pub fn new(material: Material, title: impl Into<String>) -> Self {
        Self {
            payload: StackPayload::new(material, title),
        }
    }

    /// Appends one lore line.
    pub fn lore_line(mut self, line: impl Into<String>) -> Self {
        self.payload.lore.push(line.into());
        self
    }

    /// Replaces the whole lore.
    pub fn lore(mut self, lore: Vec<String>) -> Self {
        self.payload.lore = lore;
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.payload.count = count;
        self
    }

    /// Shimmer with real enchant lines hidden.
    pub fn glint(mut self, glint: bool) -> Self {
        if glint {
            self.payload.flags |= StackFlags::GLINT | StackFlags::HIDE_ENCHANTS;
        }
        self
    }

    pub fn model(mut self, model: ModelData) -> Self {
        self.payload.model = model;
        self
    }

    /// Mints the stack, consuming one identity from `ids`.
    pub fn build(self, ids: &IdAllocator) -> UniqueStack {
        UniqueStack::mint(ids, self.payload)
    }
}
