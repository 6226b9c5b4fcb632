use super::effects::{LayerEffect, LayerEffectType, LayerEffects};
use super::style::{Fill, Stroke, Text};
use crate::bounds::Bounds;
use crate::consts::*;
use crate::descriptor::{DocumentDescriptor, LayerDescriptor};
use crate::error::Result;
use crate::radii::Radii;
use crate::{DocumentId, LayerId, LayerStructureError};

use core::fmt;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

// =========
// LayerKind
// =========

/// The kind of a layer, as reported by the editor's numeric `layerKind` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TryFromPrimitive, IntoPrimitive)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum LayerKind {
	Pixel = LAYER_KIND_PIXEL,
	Adjustment = LAYER_KIND_ADJUSTMENT,
	Text = LAYER_KIND_TEXT,
	Vector = LAYER_KIND_VECTOR,
	SmartObject = LAYER_KIND_SMART_OBJECT,
	/// The head of a group. Its members follow it in reading order, up to the matching [`LayerKind::GroupEnd`].
	Group = LAYER_KIND_GROUP,
	Background = LAYER_KIND_BACKGROUND,
	/// The invisible sentinel that closes a group.
	GroupEnd = LAYER_KIND_GROUP_END,
}

impl fmt::Display for LayerKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			LayerKind::Pixel => "Pixel",
			LayerKind::Adjustment => "Adjustment",
			LayerKind::Text => "Text",
			LayerKind::Vector => "Vector",
			LayerKind::SmartObject => "Smart Object",
			LayerKind::Group => "Group",
			LayerKind::Background => "Background",
			LayerKind::GroupEnd => "Group End",
		};
		write!(f, "{name}")
	}
}

// ===============
// LayerProperties
// ===============

/// Basic layer attributes to overwrite. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerProperties {
	pub name: Option<String>,
	pub visible: Option<bool>,
	pub locked: Option<bool>,
	pub selected: Option<bool>,
	pub expanded: Option<bool>,
	pub opacity: Option<f64>,
	pub proportional_scaling: Option<bool>,
}

// =====
// Layer
// =====

/// The flat attributes of one layer. Values are immutable once placed in a [`LayerStructure`](crate::LayerStructure): edits build a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
	pub id: LayerId,
	pub document_id: DocumentId,
	pub name: String,
	pub kind: LayerKind,
	pub visible: bool,
	pub locked: bool,
	pub selected: bool,
	pub expanded: bool,
	pub bounds: Option<Bounds>,
	pub radii: Option<Radii>,
	pub fill: Option<Fill>,
	pub stroke: Option<Stroke>,
	pub text: Option<Text>,
	pub layer_effects: LayerEffects,
	pub used_to_have_layer_effect: bool,
	pub proportional_scaling: bool,
	/// False for layers whose full descriptor has not been read yet.
	pub initialized: bool,
	pub is_artboard: bool,
	pub is_linked: bool,
	pub vector_mask_enabled: bool,
	pub opacity: f64,
}

impl Layer {
	/// Build a layer from the editor's descriptor of it.
	pub fn from_descriptor(document: &DocumentDescriptor, descriptor: &LayerDescriptor, selected: bool, initialized: bool) -> Result<Self> {
		let kind = descriptor.layer_kind;
		let is_artboard = kind == LayerKind::Group && descriptor.artboard_enabled;

		Ok(Self {
			id: descriptor.layer_id,
			document_id: document.document_id,
			name: descriptor.name.clone(),
			kind,
			visible: descriptor.visible,
			locked: descriptor.layer_locking.protect_all,
			selected,
			expanded: descriptor.layer_section_expanded,
			bounds: Bounds::from_layer_descriptor(kind, is_artboard, descriptor),
			radii: Radii::from_layer_descriptor(descriptor),
			fill: descriptor.fill,
			stroke: descriptor.stroke.clone(),
			text: descriptor.text.clone(),
			layer_effects: Self::effects_from_descriptor(descriptor)?,
			used_to_have_layer_effect: false,
			proportional_scaling: descriptor.proportional_scaling,
			initialized,
			is_artboard,
			is_linked: kind == LayerKind::SmartObject && descriptor.smart_object.as_ref().is_some_and(|smart_object| smart_object.link.is_some()),
			vector_mask_enabled: descriptor.vector_mask_enabled,
			opacity: descriptor.opacity.unwrap_or(DEFAULT_OPACITY),
		})
	}

	/// A freshly created group head, or artboard when `bounds` is given.
	pub fn new_group(document_id: DocumentId, id: LayerId, name: impl Into<String>, bounds: Option<Bounds>) -> Self {
		let is_artboard = bounds.is_some();
		Self {
			expanded: true,
			is_artboard,
			bounds,
			..Self::blank(document_id, id, name.into(), LayerKind::Group)
		}
	}

	/// The group end sentinel closing a freshly created group.
	pub fn new_group_end(document_id: DocumentId, id: LayerId) -> Self {
		Self {
			visible: false,
			..Self::blank(document_id, id, "</Layer group>".into(), LayerKind::GroupEnd)
		}
	}

	fn blank(document_id: DocumentId, id: LayerId, name: String, kind: LayerKind) -> Self {
		Self {
			id,
			document_id,
			name,
			kind,
			visible: true,
			locked: false,
			selected: false,
			expanded: false,
			bounds: None,
			radii: None,
			fill: None,
			stroke: None,
			text: None,
			layer_effects: LayerEffects::new(),
			used_to_have_layer_effect: false,
			proportional_scaling: false,
			initialized: true,
			is_artboard: false,
			is_linked: false,
			vector_mask_enabled: false,
			opacity: DEFAULT_OPACITY,
		}
	}

	/// Rebuild this layer from a fresh descriptor, keeping its selection state.
	///
	/// With `lazy`, an unselected layer stays uninitialized.
	pub fn reset_from_descriptor(&self, descriptor: &LayerDescriptor, previous_document: &DocumentDescriptor, lazy: bool) -> Result<Self> {
		if descriptor.layer_id != self.id {
			return Err(LayerStructureError::InvalidDescriptor(format!("descriptor for layer {} used to reset layer {}", descriptor.layer_id, self.id)));
		}

		let initialized = !lazy || self.selected;
		let mut layer = Self::from_descriptor(previous_document, descriptor, self.selected, initialized)?;
		layer.used_to_have_layer_effect = self.used_to_have_layer_effect;
		Ok(layer)
	}

	fn effects_from_descriptor(descriptor: &LayerDescriptor) -> Result<LayerEffects> {
		let mut effects = LayerEffects::new();
		for effect in &descriptor.layer_effects {
			let effect_type: LayerEffectType = effect.effect_type.parse()?;
			effects.entry(effect_type).or_default().push(LayerEffect::new_by_type(effect_type).merge(&effect.properties));
		}
		Ok(effects)
	}

	#[must_use]
	pub fn set_properties(&self, properties: &LayerProperties) -> Self {
		Self {
			name: properties.name.clone().unwrap_or_else(|| self.name.clone()),
			visible: properties.visible.unwrap_or(self.visible),
			locked: properties.locked.unwrap_or(self.locked),
			selected: properties.selected.unwrap_or(self.selected),
			expanded: properties.expanded.unwrap_or(self.expanded),
			opacity: properties.opacity.unwrap_or(self.opacity).clamp(0., 100.),
			proportional_scaling: properties.proportional_scaling.unwrap_or(self.proportional_scaling),
			..self.clone()
		}
	}

	pub fn is_group(&self) -> bool {
		self.kind == LayerKind::Group
	}

	pub fn is_group_end(&self) -> bool {
		self.kind == LayerKind::GroupEnd
	}

	pub fn is_background(&self) -> bool {
		self.kind == LayerKind::Background
	}

	pub fn is_adjustment(&self) -> bool {
		self.kind == LayerKind::Adjustment
	}

	pub fn is_vector(&self) -> bool {
		self.kind == LayerKind::Vector
	}

	pub fn is_text(&self) -> bool {
		self.kind == LayerKind::Text
	}

	pub fn is_pixel(&self) -> bool {
		self.kind == LayerKind::Pixel
	}

	/// Whether the layer can be picked on its own, without promotion to a parent.
	pub fn is_super_selectable(&self) -> bool {
		!self.is_group_end() && !self.is_background()
	}

	/// Whether the layer can be deleted by the user.
	pub fn is_deletable(&self) -> bool {
		!self.is_background() && !self.locked
	}

	/// Whether the layer has bounds that cover no area.
	pub fn has_empty_bounds(&self) -> bool {
		self.bounds.is_some_and(|bounds| bounds.is_empty())
	}

	pub fn has_layer_effect(&self) -> bool {
		self.layer_effects.values().any(|effects| !effects.is_empty())
	}

	pub fn layer_effects_by_type(&self, effect_type: LayerEffectType) -> &[LayerEffect] {
		self.layer_effects.get(&effect_type).map(Vec::as_slice).unwrap_or_default()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::descriptor::{ArtboardDescriptor, BoundsDescriptor, LayerEffectDescriptor, SmartObjectDescriptor};
	use crate::layers::effects::LayerEffectPatch;

	use pretty_assertions::assert_eq;

	fn document() -> DocumentDescriptor {
		DocumentDescriptor { document_id: 3, target_layers: Vec::new() }
	}

	#[test]
	fn layer_kind_codes() {
		assert_eq!(LayerKind::try_from(13u8), Ok(LayerKind::GroupEnd));
		assert_eq!(u8::from(LayerKind::Background), 12);
		assert!(LayerKind::try_from(6u8).is_err());
	}

	#[test]
	fn artboard_takes_its_rect() {
		let mut descriptor = LayerDescriptor::new(5, 2, "Artboard 1", LayerKind::Group);
		descriptor.artboard_enabled = true;
		descriptor.artboard = Some(ArtboardDescriptor {
			artboard_rect: BoundsDescriptor::from_size(0., 0., 640., 480.),
		});

		let layer = Layer::from_descriptor(&document(), &descriptor, false, true).unwrap();

		assert!(layer.is_artboard);
		assert_eq!(layer.document_id, 3);
		assert_eq!(layer.bounds, Some(Bounds::from_size(0., 0., 640., 480.)));
	}

	#[test]
	fn plain_group_has_no_bounds() {
		let descriptor = LayerDescriptor::new(5, 2, "Group 1", LayerKind::Group).with_bounds(BoundsDescriptor::from_size(0., 0., 10., 10.));
		let layer = Layer::from_descriptor(&document(), &descriptor, false, true).unwrap();

		assert!(!layer.is_artboard);
		assert_eq!(layer.bounds, None);
	}

	#[test]
	fn kind_and_locking_predicates() {
		let text = Layer::from_descriptor(&document(), &LayerDescriptor::new(1, 1, "Title", LayerKind::Text), false, true).unwrap();
		let background = Layer::from_descriptor(&document(), &LayerDescriptor::new(2, 2, "Background", LayerKind::Background), false, true).unwrap();

		assert!(text.is_text());
		assert!(!background.is_text());
		assert!(text.is_deletable());
		assert!(!background.is_deletable());
		assert!(!Layer { locked: true, ..text }.is_deletable());
	}

	#[test]
	fn empty_effect_lists_do_not_count() {
		let mut layer = Layer::from_descriptor(&document(), &LayerDescriptor::new(4, 1, "Layer 1", LayerKind::Pixel), false, true).unwrap();
		assert!(!layer.has_layer_effect());

		layer.layer_effects.insert(LayerEffectType::DropShadow, Vec::new());
		assert!(!layer.has_layer_effect());

		layer.layer_effects.insert(LayerEffectType::DropShadow, vec![LayerEffect::new_by_type(LayerEffectType::DropShadow)]);
		assert!(layer.has_layer_effect());
	}

	#[test]
	fn linked_smart_object() {
		let mut descriptor = LayerDescriptor::new(9, 1, "Linked", LayerKind::SmartObject);
		descriptor.smart_object = Some(SmartObjectDescriptor { link: Some("logo.psd".into()) });

		assert!(Layer::from_descriptor(&document(), &descriptor, false, true).unwrap().is_linked);
	}

	#[test]
	fn unknown_effect_in_descriptor_fails() {
		let mut descriptor = LayerDescriptor::new(9, 1, "Layer", LayerKind::Pixel);
		descriptor.layer_effects.push(LayerEffectDescriptor {
			effect_type: "gradientFill".into(),
			properties: LayerEffectPatch::default(),
		});

		assert_eq!(
			Layer::from_descriptor(&document(), &descriptor, false, true),
			Err(LayerStructureError::UnknownEffectType("gradientFill".into()))
		);
	}

	#[test]
	fn lazy_reset_keeps_selection() {
		let descriptor = LayerDescriptor::new(4, 1, "Layer 1", LayerKind::Pixel);
		let selected = Layer::from_descriptor(&document(), &descriptor, true, false).unwrap();
		let unselected = Layer::from_descriptor(&document(), &descriptor, false, false).unwrap();

		let renamed = LayerDescriptor { name: "Renamed".into(), ..descriptor.clone() };

		let selected = selected.reset_from_descriptor(&renamed, &document(), true).unwrap();
		assert!(selected.selected);
		assert!(selected.initialized);
		assert_eq!(selected.name, "Renamed");

		assert!(!unselected.reset_from_descriptor(&renamed, &document(), true).unwrap().initialized);
		assert!(unselected.reset_from_descriptor(&renamed, &document(), false).unwrap().initialized);
	}

	#[test]
	fn set_properties_leaves_unset_fields() {
		let layer = Layer::from_descriptor(&document(), &LayerDescriptor::new(4, 1, "Layer 1", LayerKind::Pixel), false, true).unwrap();
		let layer = layer.set_properties(&LayerProperties {
			locked: Some(true),
			opacity: Some(140.),
			..Default::default()
		});

		assert!(layer.locked);
		assert!(layer.visible);
		assert_eq!(layer.name, "Layer 1");
		assert_eq!(layer.opacity, 100.);
	}
}
