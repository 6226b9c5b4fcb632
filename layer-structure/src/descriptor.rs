//! # Descriptors
//! The shapes in which the editor application reports a document and its layers.
//!
//! These are the interchange format: a flat, bottom-to-top list of layer descriptors in which groups are delimited by a group head and a group end.
//! Field names follow the editor's camel-cased keys so a descriptor can be deserialized straight from its JSON payload.

use crate::layers::layer_info::LayerKind;
use crate::layers::style::{Fill, Stroke, Text};
use crate::radii::Radii;
use crate::{DocumentId, LayerId};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
	true
}

/// The document level descriptor, which carries the current layer selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
	#[serde(rename = "documentID")]
	pub document_id: DocumentId,
	#[serde(default)]
	pub target_layers: Vec<TargetLayer>,
}

/// A reference to a selected layer by its 0-based position in the bottom-to-top layer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLayer {
	#[serde(rename = "_index")]
	pub index: usize,
}

impl DocumentDescriptor {
	/// The 1-based item indices of the selected layers.
	pub fn selected_item_indices(&self) -> FxHashSet<usize> {
		self.target_layers.iter().map(|target| target.index + 1).collect()
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundsDescriptor {
	pub top: f64,
	pub left: f64,
	pub bottom: f64,
	pub right: f64,
}

impl BoundsDescriptor {
	pub fn from_size(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			top: y,
			left: x,
			bottom: y + height,
			right: x + width,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardDescriptor {
	pub artboard_rect: BoundsDescriptor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerLockingDescriptor {
	#[serde(default)]
	pub protect_all: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartObjectDescriptor {
	/// Present only for smart objects linked to an external file.
	#[serde(default)]
	pub link: Option<String>,
}

/// One entry of a layer's effect list, tagged with the editor's effect type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerEffectDescriptor {
	#[serde(rename = "type")]
	pub effect_type: String,
	#[serde(flatten)]
	pub properties: crate::layers::effects::LayerEffectPatch,
}

/// Everything the editor reports about a single layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
	#[serde(rename = "layerID")]
	pub layer_id: LayerId,
	/// 1-based position in the bottom-to-top layer list.
	pub item_index: usize,
	#[serde(default)]
	pub name: String,
	pub layer_kind: LayerKind,
	#[serde(default = "default_true")]
	pub visible: bool,
	#[serde(default)]
	pub layer_locking: LayerLockingDescriptor,
	#[serde(default = "default_true")]
	pub layer_section_expanded: bool,
	#[serde(default)]
	pub bounds: Option<BoundsDescriptor>,
	#[serde(default)]
	pub bounds_no_effects: Option<BoundsDescriptor>,
	#[serde(default)]
	pub path_bounds: Option<BoundsDescriptor>,
	#[serde(default)]
	pub artboard: Option<ArtboardDescriptor>,
	#[serde(default)]
	pub artboard_enabled: bool,
	#[serde(default)]
	pub vector_mask_enabled: bool,
	#[serde(default)]
	pub smart_object: Option<SmartObjectDescriptor>,
	#[serde(default)]
	pub fill: Option<Fill>,
	#[serde(default)]
	pub stroke: Option<Stroke>,
	#[serde(default)]
	pub text: Option<Text>,
	#[serde(default)]
	pub layer_effects: Vec<LayerEffectDescriptor>,
	#[serde(default)]
	pub opacity: Option<f64>,
	#[serde(default)]
	pub proportional_scaling: bool,
	#[serde(default)]
	pub key_origin_type: Option<u32>,
	#[serde(default)]
	pub key_origin_radii: Option<Radii>,
}

impl LayerDescriptor {
	/// A minimal descriptor with no geometry or styles.
	pub fn new(layer_id: LayerId, item_index: usize, name: impl Into<String>, layer_kind: LayerKind) -> Self {
		Self {
			layer_id,
			item_index,
			name: name.into(),
			layer_kind,
			visible: true,
			layer_locking: LayerLockingDescriptor::default(),
			layer_section_expanded: true,
			bounds: None,
			bounds_no_effects: None,
			path_bounds: None,
			artboard: None,
			artboard_enabled: false,
			vector_mask_enabled: false,
			smart_object: None,
			fill: None,
			stroke: None,
			text: None,
			layer_effects: Vec::new(),
			opacity: None,
			proportional_scaling: false,
			key_origin_type: None,
			key_origin_radii: None,
		}
	}

	pub fn with_bounds(mut self, bounds: BoundsDescriptor) -> Self {
		self.bounds = Some(bounds);
		self
	}
}

/// A fresh descriptor for a layer that already exists in the structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptorUpdate {
	#[serde(rename = "layerID")]
	pub layer_id: LayerId,
	pub descriptor: LayerDescriptor,
}
