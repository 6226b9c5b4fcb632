use crate::LayerId;

use thiserror::Error;

/// A set of different errors that can occur when building or editing a [`LayerStructure`](crate::LayerStructure).
///
/// The first group are structural invariant violations: the snapshot that would have been produced is discarded.
/// The second group are validation failures of a single call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerStructureError {
	#[error("Group end {0} has no open group to close")]
	UnmatchedGroupEnd(LayerId),

	#[error("Group {0} is never closed by a group end")]
	UnclosedGroup(LayerId),

	#[error("Layer {0} appears more than once in the layer index")]
	DuplicateLayer(LayerId),

	#[error("Layer {0} is in the layer index but has no layer record")]
	MissingLayer(LayerId),

	#[error("Layer {0} has a layer record but is not in the layer index")]
	OrphanedLayer(LayerId),

	#[error("Index {index} is out of bounds for a layer index of length {len}")]
	IndexOutOfBounds { index: usize, len: usize },

	#[error("Too many layers in layer index: {given} given, but only {len} layers exist")]
	TooManyLayers { given: usize, len: usize },

	#[error("Layer {0} does not exist")]
	LayerNotFound(LayerId),

	#[error("Invalid layer effect type {0:?}")]
	UnknownEffectType(String),

	#[error("Unable to set fill properties: no fill for layer {0}")]
	NoFill(LayerId),

	#[error("Layer {0} is not a text layer")]
	NotText(LayerId),

	#[error("Invalid layer descriptor: {0}")]
	InvalidDescriptor(String),
}

impl LayerStructureError {
	/// Whether this error is a violation of the order/record bijection or of group pairing, as opposed to a rejected request.
	pub fn is_structural(&self) -> bool {
		use LayerStructureError::*;

		matches!(
			self,
			UnmatchedGroupEnd(_) | UnclosedGroup(_) | DuplicateLayer(_) | MissingLayer(_) | OrphanedLayer(_) | IndexOutOfBounds { .. } | TooManyLayers { .. }
		)
	}
}

pub type Result<T> = std::result::Result<T, LayerStructureError>;
