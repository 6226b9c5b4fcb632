use crate::consts::KEY_ORIGIN_ROUNDED_RECT;
use crate::descriptor::LayerDescriptor;

use serde::{Deserialize, Serialize};

/// Corner radii of a rounded rectangle vector layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct Radii {
	pub top_left: f64,
	pub top_right: f64,
	pub bottom_right: f64,
	pub bottom_left: f64,
}

impl Radii {
	pub fn uniform(radius: f64) -> Self {
		Self {
			top_left: radius,
			top_right: radius,
			bottom_right: radius,
			bottom_left: radius,
		}
	}

	/// Read the radii of a layer descriptor. Only rounded rectangle shapes carry radii.
	pub fn from_layer_descriptor(descriptor: &LayerDescriptor) -> Option<Self> {
		if descriptor.key_origin_type != Some(KEY_ORIGIN_ROUNDED_RECT) {
			return None;
		}
		descriptor.key_origin_radii
	}

	pub fn is_uniform(&self) -> bool {
		self.top_left == self.top_right && self.top_right == self.bottom_right && self.bottom_right == self.bottom_left
	}

	/// The single radius shared by all corners, if there is one.
	pub fn scalar(&self) -> Option<f64> {
		self.is_uniform().then_some(self.top_left)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn scalar_only_for_uniform_corners() {
		assert_eq!(Radii::uniform(4.).scalar(), Some(4.));

		let uneven = Radii { top_left: 1., ..Radii::uniform(4.) };
		assert!(!uneven.is_uniform());
		assert_eq!(uneven.scalar(), None);
	}
}
