use super::LayerStructure;
use crate::bounds::Bounds;
use crate::descriptor::{BoundsDescriptor, DocumentDescriptor, LayerDescriptor, LayerDescriptorUpdate};
use crate::error::Result;
use crate::layers::effects::{LayerEffect, LayerEffectPatch, LayerEffectType};
use crate::layers::layer_info::{Layer, LayerProperties};
use crate::layers::style::{CharacterStyle, FillPatch, ParagraphStyle, Stroke, StrokePatch};
use crate::radii::Radii;
use crate::{DocumentId, LayerId, LayerStructureError};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A value given either once for every layer of an edit, or separately for each layer in the same order as the layer IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerLayer<T> {
	Shared(T),
	Each(Vec<T>),
}

impl<T> PerLayer<T> {
	/// The value for the layer at `position` in the edit's ID list.
	pub fn get(&self, position: usize) -> Option<&T> {
		match self {
			PerLayer::Shared(value) => Some(value),
			PerLayer::Each(values) => values.get(position),
		}
	}
}

/// Whether adding a single layer replaces an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Replace {
	/// Replace the sole selected layer if it is an empty, unlocked pixel layer without a vector mask.
	#[default]
	Auto,
	Never,
	/// Replace the sole selected layer, whatever it is.
	Always,
	/// Replace this layer.
	Layer(LayerId),
}

/// New position and size of a layer. Unset components are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerSize {
	pub layer: LayerId,
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub width: Option<f64>,
	pub height: Option<f64>,
}

/// New top left corner of a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerPosition {
	pub layer: LayerId,
	pub x: f64,
	pub y: f64,
}

// ===== Helpers =====

impl LayerStructure {
	/// Rebuild each listed layer with `edit`, which is given the layer's position in the list and returns `None` to leave the layer as it is.
	///
	/// The order is untouched, so the result keeps this snapshot's tree.
	fn edit_layers(&self, ids: impl IntoIterator<Item = LayerId>, mut edit: impl FnMut(usize, &Layer) -> Result<Option<Layer>>) -> Result<Self> {
		let mut layers = self.layers.clone();
		let map = Arc::make_mut(&mut layers);

		for (position, id) in ids.into_iter().enumerate() {
			let Some(layer) = self.by_id(id) else {
				return Err(LayerStructureError::LayerNotFound(id));
			};
			if let Some(next_layer) = edit(position, layer)? {
				map.insert(id, Arc::new(next_layer));
			}
		}

		Ok(self.with_layers(layers))
	}

	/// The layer a single added layer should replace, and its 0-based position in the index.
	fn layer_to_replace(&self, replace: Replace) -> Option<(LayerId, usize)> {
		let candidate = match replace {
			Replace::Never => return None,
			Replace::Layer(id) => self.by_id(id)?,
			Replace::Auto | Replace::Always => match *self.selected() {
				[id] => self.by_id(id)?,
				_ => return None,
			},
		};

		let should_replace = match replace {
			Replace::Auto => candidate.is_pixel() && !candidate.is_background() && !candidate.locked && candidate.has_empty_bounds() && !candidate.vector_mask_enabled,
			_ => true,
		};
		if !should_replace {
			return None;
		}

		Some((candidate.id, self.index_of(candidate.id)? - 1))
	}
}

// ===== Membership and order =====

impl LayerStructure {
	/// Add layers from their descriptors, each at the position its item index names.
	///
	/// When a single layer is added, it may take the place of an existing layer (see [`Replace`]).
	/// With `selected`, the new layers replace the current selection.
	pub fn add_layers(&self, ids: &[LayerId], descriptors: &[LayerDescriptor], selected: bool, replace: Replace, document: &DocumentDescriptor) -> Result<Self> {
		if ids.len() != descriptors.len() {
			return Err(LayerStructureError::InvalidDescriptor(format!("{} layer IDs given for {} descriptors", ids.len(), descriptors.len())));
		}

		// Decided against the selection before it is cleared
		let replaced = if ids.len() == 1 { self.layer_to_replace(replace) } else { None };
		let base = if selected { self.update_selection(&FxHashSet::default(), None) } else { self.clone() };

		let mut layers = (*base.layers).clone();
		let mut index = (*base.index).clone();

		for (position, (&id, descriptor)) in ids.iter().zip(descriptors).enumerate() {
			let Some(layer_index) = descriptor.item_index.checked_sub(1) else {
				return Err(LayerStructureError::InvalidDescriptor(format!("layer {id} has item index 0")));
			};

			match replaced.filter(|_| position == 0) {
				Some((replaced_id, replace_index)) => {
					log::debug!("Layer {id} replaces layer {replaced_id}");
					layers.remove(&replaced_id);

					if layer_index == replace_index {
						index[layer_index] = id;
					} else if layer_index < index.len() {
						index.remove(replace_index);
						index.insert(layer_index, id);
					} else {
						log::warn!("Replacing layer {replaced_id} with layer {id}, but its index {layer_index} is out of bounds");
						return Err(LayerStructureError::IndexOutOfBounds { index: layer_index, len: index.len() });
					}
				}
				None => {
					if layer_index > index.len() {
						log::warn!("Adding layer {id} at index {layer_index}, which is out of bounds");
						return Err(LayerStructureError::IndexOutOfBounds { index: layer_index, len: index.len() });
					}
					index.insert(layer_index, id);
				}
			}

			layers.insert(id, Arc::new(Layer::from_descriptor(document, descriptor, selected, true)?));
		}

		log::debug!("Added {} layers, {} layers in total", ids.len(), index.len());
		Self::validated(Arc::new(layers), Arc::new(index), base.pivot_id)
	}

	/// Rebuild the given layers from fresh descriptors, keeping their selection state.
	///
	/// With `lazy`, only selected layers are marked initialized.
	pub fn reset_layers(&self, updates: &[LayerDescriptorUpdate], previous_document: &DocumentDescriptor, lazy: bool) -> Result<Self> {
		let edited = self.edit_layers(updates.iter().map(|update| update.layer_id), |position, layer| {
			layer.reset_from_descriptor(&updates[position].descriptor, previous_document, lazy).map(Some)
		})?;

		log::debug!("Reset {} layers from fresh descriptors", updates.len());
		// A reset may turn a layer into or out of a group
		Self::validated(edited.layers, edited.index, edited.pivot_id)
	}

	/// Swap the layer at each descriptor's item index for a layer built from the descriptor, keeping the selection state of the slot.
	pub fn replace_layers_by_index(&self, document: &DocumentDescriptor, descriptors: &[LayerDescriptor]) -> Result<Self> {
		let mut layers = (*self.layers).clone();
		let mut index = (*self.index).clone();

		for descriptor in descriptors {
			let Some(previous) = self.by_index(descriptor.item_index) else {
				log::warn!("No layer at item index {} to replace", descriptor.item_index);
				return Err(LayerStructureError::IndexOutOfBounds { index: descriptor.item_index, len: index.len() });
			};

			layers.remove(&previous.id);
			layers.insert(descriptor.layer_id, Arc::new(Layer::from_descriptor(document, descriptor, previous.selected, true)?));
			index[descriptor.item_index - 1] = descriptor.layer_id;
		}

		log::debug!("Replaced {} layers by item index", descriptors.len());
		Self::validated(Arc::new(layers), Arc::new(index), self.pivot_id)
	}

	/// Reorder the layers. `ids` lists them in reading order, top-most first.
	///
	/// Layers left out of `ids` are deleted.
	pub fn update_order(&self, ids: &[LayerId]) -> Result<Self> {
		if ids.len() > self.layers.len() {
			log::warn!("Too many layers in layer index: {} given, {} exist", ids.len(), self.layers.len());
			return Err(LayerStructureError::TooManyLayers { given: ids.len(), len: self.layers.len() });
		}

		let index = ids.iter().rev().copied().collect::<Vec<_>>();
		let mut layers = self.layers.clone();
		if index.len() < self.index.len() {
			let kept = index.iter().copied().collect::<FxHashSet<_>>();
			Arc::make_mut(&mut layers).retain(|id, _| kept.contains(id));
			log::debug!("Reordering drops {} layers", self.index.len() - index.len());
		}

		Self::validated(layers, Arc::new(index), self.pivot_id)
	}

	/// Remove the given layers, keeping the rest in order.
	pub fn delete_layers(&self, ids: &[LayerId]) -> Result<Self> {
		if let Some(&unknown) = ids.iter().find(|id| !self.layers.contains_key(id)) {
			return Err(LayerStructureError::LayerNotFound(unknown));
		}

		let deleted = ids.iter().copied().collect::<FxHashSet<_>>();
		let remaining = self.index.iter().rev().copied().filter(|id| !deleted.contains(id)).collect::<Vec<_>>();

		log::debug!("Deleting {} layers", deleted.len());
		self.update_order(&remaining)
	}

	/// Create a group from a new group head and group end, and select it.
	///
	/// A plain group takes in the selected layers and everything inside them, placed where the top-most selected layer was.
	/// An artboard is placed at the top, empty; moving layers into it is up to the caller.
	pub fn create_group(&self, document_id: DocumentId, group_id: LayerId, group_end_id: LayerId, name: &str, is_artboard: bool, bounds_descriptor: Option<&BoundsDescriptor>) -> Result<Self> {
		if let Some(existing) = [group_id, group_end_id].into_iter().find(|id| self.layers.contains_key(id)) {
			return Err(LayerStructureError::DuplicateLayer(existing));
		}

		let bounds = match (is_artboard, bounds_descriptor) {
			(true, Some(descriptor)) => Some(Bounds::from_descriptor(descriptor)),
			(true, None) => return Err(LayerStructureError::InvalidDescriptor(format!("artboard {group_id} needs bounds"))),
			(false, _) => None,
		};

		let mut layers = (*self.layers).clone();
		layers.insert(group_id, Arc::new(Layer::new_group(document_id, group_id, name, bounds)));
		layers.insert(group_end_id, Arc::new(Layer::new_group_end(document_id, group_end_id)));

		let index = if is_artboard {
			let mut index = (*self.index).clone();
			index.extend([group_end_id, group_id]);
			index
		} else {
			let mut moved_set = FxHashSet::default();
			let moved = self
				.selected_normalized()
				.iter()
				.flat_map(|&id| self.descendants(id).to_vec())
				.filter(|&id| moved_set.insert(id))
				.collect::<Vec<_>>();

			// Reading order of what stays, split where the top-most moved layer was
			let remaining = self.index.iter().rev().copied().filter(|id| !moved_set.contains(id)).collect::<Vec<_>>();
			let head_position = moved.last().and_then(|&top| self.index_of(top)).map_or(0, |item_index| self.len() - item_index);
			let (above, below) = remaining.split_at(head_position.min(remaining.len()));

			let reading_order = above
				.iter()
				.copied()
				.chain([group_id])
				.chain(moved.iter().rev().copied())
				.chain([group_end_id])
				.chain(below.iter().copied())
				.collect::<Vec<_>>();
			reading_order.into_iter().rev().collect()
		};

		log::debug!("Created {} {group_id} with group end {group_end_id}", if is_artboard { "artboard" } else { "group" });
		let selection = [group_id].into_iter().collect::<FxHashSet<_>>();
		Ok(Self::validated(Arc::new(layers), Arc::new(index), None)?.update_selection(&selection, None))
	}
}

// ===== Selection and visibility =====

impl LayerStructure {
	/// Select exactly the given layers, and set the range selection anchor.
	pub fn update_selection(&self, selected_ids: &FxHashSet<LayerId>, pivot_id: Option<LayerId>) -> Self {
		let mut layers = self.layers.clone();
		for (&id, layer) in self.layers.iter() {
			let selected = selected_ids.contains(&id);
			if layer.selected != selected {
				let next_layer = Layer { selected, ..Layer::clone(layer) };
				Arc::make_mut(&mut layers).insert(id, Arc::new(next_layer));
			}
		}

		Self::from_parts(layers, self.index.clone(), pivot_id, self.tree.clone())
	}

	pub fn set_visibility(&self, visibility: &[(LayerId, bool)]) -> Result<Self> {
		self.edit_layers(visibility.iter().map(|&(id, _)| id), |position, layer| {
			let visible = visibility[position].1;
			Ok(Some(Layer { visible, ..layer.clone() }))
		})
	}

	/// Copy the visibility of every layer that also exists in `other`.
	pub fn overlay_visibility(&self, other: &LayerStructure) -> Self {
		let mut layers = self.layers.clone();
		for (&id, other_layer) in other.layers.iter() {
			match self.by_id(id) {
				Some(layer) if layer.visible != other_layer.visible => {
					let next_layer = Layer { visible: other_layer.visible, ..layer.clone() };
					Arc::make_mut(&mut layers).insert(id, Arc::new(next_layer));
				}
				Some(_) => {}
				None => log::trace!("Layer {id} is not in this structure, its visibility is not overlaid"),
			}
		}

		self.with_layers(layers)
	}
}

// ===== Attributes =====

impl LayerStructure {
	pub fn set_properties(&self, ids: &[LayerId], properties: &LayerProperties) -> Result<Self> {
		self.edit_layers(ids.iter().copied(), |_, layer| Ok(Some(layer.set_properties(properties))))
	}

	pub fn set_layers_proportional(&self, ids: &[LayerId], proportional: bool) -> Result<Self> {
		self.edit_layers(ids.iter().copied(), |_, layer| {
			Ok(Some(Layer {
				proportional_scaling: proportional,
				..layer.clone()
			}))
		})
	}

	pub fn set_border_radii(&self, ids: &[LayerId], radii: Radii) -> Result<Self> {
		self.edit_layers(ids.iter().copied(), |_, layer| Ok(Some(Layer { radii: Some(radii), ..layer.clone() })))
	}

	/// Patch the fill of each layer. Fails on a layer without a fill.
	pub fn set_fill_properties(&self, ids: &[LayerId], patch: &FillPatch) -> Result<Self> {
		self.edit_layers(ids.iter().copied(), |_, layer| {
			let Some(fill) = &layer.fill else {
				return Err(LayerStructureError::NoFill(layer.id));
			};
			Ok(Some(Layer {
				fill: Some(fill.set_fill_properties(patch)),
				..layer.clone()
			}))
		})
	}

	/// Give each layer a new stroke.
	pub fn add_stroke(&self, ids: &[LayerId], strokes: &PerLayer<Stroke>) -> Result<Self> {
		self.edit_layers(ids.iter().copied(), |position, layer| {
			let Some(stroke) = strokes.get(position) else {
				return Err(LayerStructureError::InvalidDescriptor(format!("no stroke given for layer {}", layer.id)));
			};
			Ok(Some(Layer {
				stroke: Some(stroke.clone()),
				..layer.clone()
			}))
		})
	}

	/// Patch the stroke of each layer, starting from the default stroke on layers without one.
	pub fn set_stroke_properties(&self, ids: &[LayerId], patch: &StrokePatch) -> Result<Self> {
		self.edit_layers(ids.iter().copied(), |_, layer| {
			let stroke = layer.stroke.clone().unwrap_or_default();
			Ok(Some(Layer {
				stroke: Some(stroke.set_stroke_properties(patch)),
				..layer.clone()
			}))
		})
	}

	/// Patch the effect of the given type at `effect_index` in each layer.
	///
	/// A missing index (or one past the end) adds a new effect. A `None` patch deletes the effect at that index instead.
	pub fn set_layer_effect_properties(&self, ids: &[LayerId], effect_index: &PerLayer<Option<usize>>, effect_type: &str, properties: &PerLayer<Option<LayerEffectPatch>>) -> Result<Self> {
		let effect_type: LayerEffectType = effect_type.parse()?;

		self.edit_layers(ids.iter().copied(), |position, layer| {
			let Some(patch) = properties.get(position) else {
				return Err(LayerStructureError::InvalidDescriptor(format!("no {effect_type} properties given for layer {}", layer.id)));
			};

			let mut effects = layer.layer_effects_by_type(effect_type).to_vec();
			let effect_index = effect_index.get(position).copied().flatten().unwrap_or(effects.len());

			match patch {
				None if effect_index < effects.len() => {
					effects.remove(effect_index);
				}
				None => return Ok(None),
				Some(patch) => {
					let effect = effects.get(effect_index).copied().unwrap_or_else(|| LayerEffect::new_by_type(effect_type)).merge(patch);
					match effects.get_mut(effect_index) {
						Some(existing) => *existing = effect,
						None => effects.push(effect),
					}
				}
			}

			let mut next_layer = layer.clone();
			next_layer.layer_effects.insert(effect_type, effects);
			next_layer.used_to_have_layer_effect = true;
			Ok(Some(next_layer))
		})
	}

	/// Remove the effect of the given type at `deleted_index` from each layer that has effects of that type.
	pub fn delete_layer_effect_properties(&self, ids: &[LayerId], deleted_index: usize, effect_type: &str) -> Result<Self> {
		let effect_type: LayerEffectType = effect_type.parse()?;

		self.edit_layers(ids.iter().copied(), |_, layer| {
			let Some(effects) = layer.layer_effects.get(&effect_type) else { return Ok(None) };

			let effects = effects.iter().enumerate().filter(|&(index, _)| index != deleted_index).map(|(_, effect)| *effect).collect();
			let mut next_layer = layer.clone();
			next_layer.layer_effects.insert(effect_type, effects);
			Ok(Some(next_layer))
		})
	}

	/// Remove every effect of the given type from each layer.
	pub fn delete_all_layer_effects(&self, ids: &[LayerId], effect_type: &str) -> Result<Self> {
		let effect_type: LayerEffectType = effect_type.parse()?;

		self.edit_layers(ids.iter().copied(), |_, layer| {
			if !layer.layer_effects.contains_key(&effect_type) {
				return Ok(None);
			}

			let mut next_layer = layer.clone();
			next_layer.layer_effects.insert(effect_type, Vec::new());
			Ok(Some(next_layer))
		})
	}

	/// Patch the character style of each text layer, and its first character's style alike.
	pub fn set_character_style_properties(&self, ids: &[LayerId], patch: &CharacterStyle) -> Result<Self> {
		self.edit_layers(ids.iter().copied(), |_, layer| {
			let Some(text) = &layer.text else {
				return Err(LayerStructureError::NotText(layer.id));
			};

			let mut text = text.clone();
			text.character_style = text.character_style.merge(patch);
			text.first_character_style = text.first_character_style.merge(patch);
			Ok(Some(Layer { text: Some(text), ..layer.clone() }))
		})
	}

	pub fn set_paragraph_style_properties(&self, ids: &[LayerId], patch: &ParagraphStyle) -> Result<Self> {
		self.edit_layers(ids.iter().copied(), |_, layer| {
			let Some(text) = &layer.text else {
				return Err(LayerStructureError::NotText(layer.id));
			};

			let mut text = text.clone();
			text.paragraph_style = text.paragraph_style.merge(patch);
			Ok(Some(Layer { text: Some(text), ..layer.clone() }))
		})
	}
}

// ===== Bounds =====

impl LayerStructure {
	/// Overwrite the bounds of the given layers.
	pub fn update_bounds_map(&self, bounds: impl IntoIterator<Item = (LayerId, Bounds)>) -> Result<Self> {
		let bounds = bounds.into_iter().collect::<Vec<_>>();
		self.edit_layers(bounds.iter().map(|&(id, _)| id), |position, layer| {
			Ok(Some(Layer {
				bounds: Some(bounds[position].1),
				..layer.clone()
			}))
		})
	}

	/// New bounds for each layer that has bounds, computed from its current ones. Groups and group ends are skipped.
	fn bounds_of(&self, ids: impl IntoIterator<Item = LayerId>, mut update: impl FnMut(usize, Bounds) -> Bounds) -> Result<Vec<(LayerId, Bounds)>> {
		let mut updated = Vec::new();
		for (position, id) in ids.into_iter().enumerate() {
			let layer = self.by_id(id).ok_or(LayerStructureError::LayerNotFound(id))?;
			match layer.bounds {
				Some(bounds) => updated.push((id, update(position, bounds))),
				None => log::trace!("Layer {id} has no bounds to update"),
			}
		}
		Ok(updated)
	}

	/// Re-read the bounds (and corner radii) of the given layers from fresh descriptors.
	pub fn reset_bounds(&self, updates: &[LayerDescriptorUpdate]) -> Result<Self> {
		self.edit_layers(updates.iter().map(|update| update.layer_id), |position, layer| {
			let Some(bounds) = layer.bounds else {
				log::trace!("Layer {} has no bounds to reset", layer.id);
				return Ok(None);
			};

			let descriptor = &updates[position].descriptor;
			Ok(Some(Layer {
				bounds: Some(bounds.reset_from_descriptor(layer.kind, layer.is_artboard, descriptor)),
				radii: Radii::from_layer_descriptor(descriptor),
				..layer.clone()
			}))
		})
	}

	pub fn resize_layers(&self, sizes: &[LayerSize]) -> Result<Self> {
		let bounds = self.bounds_of(sizes.iter().map(|size| size.layer), |position, bounds| {
			let size = &sizes[position];
			bounds.update_size_and_position(size.x, size.y, size.width, size.height)
		})?;
		self.update_bounds_map(bounds)
	}

	/// Move the given layers. Unknown layers are skipped.
	pub fn reposition_layers(&self, positions: &[LayerPosition]) -> Result<Self> {
		let known = positions
			.iter()
			.filter(|position| {
				let exists = self.by_id(position.layer).is_some();
				if !exists {
					log::trace!("Layer {} no longer exists, its position is not updated", position.layer);
				}
				exists
			})
			.collect::<Vec<_>>();

		let bounds = self.bounds_of(known.iter().map(|position| position.layer), |position, bounds| bounds.update_position(known[position].x, known[position].y))?;
		self.update_bounds_map(bounds)
	}

	/// Move and resize the given layers to the same values. Unset components are kept per layer.
	pub fn update_bounds(&self, ids: &[LayerId], x: Option<f64>, y: Option<f64>, width: Option<f64>, height: Option<f64>) -> Result<Self> {
		let bounds = self.bounds_of(ids.iter().copied(), |_, bounds| bounds.update_size_and_position(x, y, width, height))?;
		self.update_bounds_map(bounds)
	}

	pub fn translate_layers(&self, ids: &[LayerId], dx: f64, dy: f64) -> Result<Self> {
		let bounds = self.bounds_of(ids.iter().copied(), |_, bounds| bounds.translate(dx, dy))?;
		self.update_bounds_map(bounds)
	}
}
