use crate::descriptor::{ArtboardDescriptor, BoundsDescriptor, DocumentDescriptor, LayerDescriptor, TargetLayer};
use crate::layers::layer_info::{Layer, LayerKind};
use crate::structure::LayerMap;
use crate::{DocumentId, LayerId, LayerStructure};

use std::sync::Arc;

pub const TEST_DOCUMENT_ID: DocumentId = 1;

pub fn document() -> DocumentDescriptor {
	DocumentDescriptor {
		document_id: TEST_DOCUMENT_ID,
		..Default::default()
	}
}

/// A bare layer record of the given kind.
pub fn layer(id: LayerId, kind: LayerKind) -> Layer {
	Layer::from_descriptor(&document(), &LayerDescriptor::new(id, 1, format!("Layer {id}"), kind), false, true).unwrap()
}

pub fn layer_map(layers: impl IntoIterator<Item = Layer>) -> LayerMap {
	layers.into_iter().map(|layer| (layer.id, Arc::new(layer))).collect()
}

fn rect([x, y, width, height]: [f64; 4]) -> BoundsDescriptor {
	BoundsDescriptor::from_size(x, y, width, height)
}

/// Builds a document top-most layer first, the way a layers panel reads, and assigns the item indices on [`TestDocument::build`].
#[derive(Default)]
pub struct TestDocument {
	descriptors: Vec<LayerDescriptor>,
	selected: Vec<usize>,
}

impl TestDocument {
	pub fn new() -> Self {
		let _ = env_logger::builder().is_test(true).try_init();
		Self::default()
	}

	fn push(mut self, descriptor: LayerDescriptor) -> Self {
		self.descriptors.push(descriptor);
		self
	}

	pub fn pixel(self, id: LayerId, bounds: [f64; 4]) -> Self {
		self.push(LayerDescriptor::new(id, 0, format!("Layer {id}"), LayerKind::Pixel).with_bounds(rect(bounds)))
	}

	pub fn vector(self, id: LayerId, bounds: [f64; 4]) -> Self {
		let mut descriptor = LayerDescriptor::new(id, 0, format!("Shape {id}"), LayerKind::Vector);
		descriptor.path_bounds = Some(rect(bounds));
		self.push(descriptor)
	}

	pub fn background(self, id: LayerId, bounds: [f64; 4]) -> Self {
		self.push(LayerDescriptor::new(id, 0, "Background", LayerKind::Background).with_bounds(rect(bounds)))
	}

	pub fn adjustment(self, id: LayerId) -> Self {
		self.push(LayerDescriptor::new(id, 0, format!("Adjustment {id}"), LayerKind::Adjustment))
	}

	pub fn group(self, id: LayerId) -> Self {
		self.push(LayerDescriptor::new(id, 0, format!("Group {id}"), LayerKind::Group))
	}

	pub fn artboard(self, id: LayerId, bounds: [f64; 4]) -> Self {
		let mut descriptor = LayerDescriptor::new(id, 0, format!("Artboard {id}"), LayerKind::Group);
		descriptor.artboard_enabled = true;
		descriptor.artboard = Some(ArtboardDescriptor { artboard_rect: rect(bounds) });
		self.push(descriptor)
	}

	pub fn group_end(self, id: LayerId) -> Self {
		self.push(LayerDescriptor::new(id, 0, "</Layer group>", LayerKind::GroupEnd))
	}

	/// Select the last added layer.
	pub fn selected(mut self) -> Self {
		self.selected.push(self.descriptors.len() - 1);
		self
	}

	/// Edit the last added layer's descriptor.
	pub fn with(mut self, edit: impl FnOnce(&mut LayerDescriptor)) -> Self {
		edit(self.descriptors.last_mut().unwrap());
		self
	}

	pub fn build(mut self) -> LayerStructure {
		let len = self.descriptors.len();
		for (position, descriptor) in self.descriptors.iter_mut().enumerate() {
			descriptor.item_index = len - position;
		}

		let document = DocumentDescriptor {
			target_layers: self.selected.iter().map(|&position| TargetLayer { index: len - position - 1 }).collect(),
			..document()
		};
		LayerStructure::from_descriptors(&document, &self.descriptors).unwrap()
	}
}
