use crate::consts::ZERO_AREA_EPSILON;
use crate::descriptor::{BoundsDescriptor, LayerDescriptor};
use crate::layers::layer_info::LayerKind;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis aligned rectangle in document space, stored as its four edges.
///
/// Edges are kept ordered: a rectangle built with a negative width or height collapses to zero area instead of flipping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Bounds {
	pub top: f64,
	pub left: f64,
	pub bottom: f64,
	pub right: f64,
}

impl Bounds {
	/// Create bounds from its edges, clamping an inverted rectangle to zero width or height.
	#[must_use]
	pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
		Self {
			top,
			left,
			bottom: bottom.max(top),
			right: right.max(left),
		}
	}

	/// Create bounds from the top left corner and a size.
	#[must_use]
	pub fn from_size(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self::new(y, x, y + height.max(0.), x + width.max(0.))
	}

	/// Convert a box defined by two corner points, in any order.
	#[must_use]
	pub fn from_box(bbox: [DVec2; 2]) -> Self {
		let [min, max] = [bbox[0].min(bbox[1]), bbox[0].max(bbox[1])];
		Self::new(min.y, min.x, max.y, max.x)
	}

	#[must_use]
	pub fn from_descriptor(descriptor: &BoundsDescriptor) -> Self {
		Self::new(descriptor.top, descriptor.left, descriptor.bottom, descriptor.right)
	}

	/// Read the bounds of a layer from its descriptor, picking the rectangle that matters for the layer's kind.
	///
	/// Artboards report their canvas rectangle, vector layers their path bounds, and everything else its bounds excluding layer effects.
	/// Group ends have no bounds, and plain groups only have bounds of their own when they carry a vector mask.
	pub fn from_layer_descriptor(kind: LayerKind, is_artboard: bool, descriptor: &LayerDescriptor) -> Option<Self> {
		let rect = match kind {
			LayerKind::GroupEnd => None,
			LayerKind::Group if is_artboard => descriptor.artboard.as_ref().map(|artboard| &artboard.artboard_rect),
			LayerKind::Group if descriptor.vector_mask_enabled => descriptor.bounds_no_effects.as_ref().or(descriptor.bounds.as_ref()),
			LayerKind::Group => None,
			LayerKind::Vector => descriptor.path_bounds.as_ref().or(descriptor.bounds_no_effects.as_ref()).or(descriptor.bounds.as_ref()),
			_ => descriptor.bounds_no_effects.as_ref().or(descriptor.bounds.as_ref()),
		};

		rect.map(Self::from_descriptor)
	}

	/// Re-read these bounds from a fresh descriptor, keeping the current value when the descriptor has none.
	#[must_use]
	pub fn reset_from_descriptor(&self, kind: LayerKind, is_artboard: bool, descriptor: &LayerDescriptor) -> Self {
		Self::from_layer_descriptor(kind, is_artboard, descriptor).unwrap_or(*self)
	}

	/// The union of all the given bounds, or `None` if there were none.
	///
	/// `None` is distinct from a zero sized rectangle at the origin.
	pub fn union(bounds: impl IntoIterator<Item = Bounds>) -> Option<Self> {
		bounds.into_iter().reduce(Self::combine_bounds)
	}

	/// Take the outside bounds of two rectangles.
	#[must_use]
	pub fn combine_bounds(a: Self, b: Self) -> Self {
		Self::new(a.top.min(b.top), a.left.min(b.left), a.bottom.max(b.bottom), a.right.max(b.right))
	}

	/// The overlapping region of two rectangles, or `None` if they are disjoint.
	pub fn intersection(a: &Self, b: &Self) -> Option<Self> {
		let top = a.top.max(b.top);
		let left = a.left.max(b.left);
		let bottom = a.bottom.min(b.bottom);
		let right = a.right.min(b.right);

		(bottom >= top && right >= left).then(|| Self::new(top, left, bottom, right))
	}

	#[must_use]
	pub fn width(&self) -> f64 {
		(self.right - self.left).max(0.)
	}

	#[must_use]
	pub fn height(&self) -> f64 {
		(self.bottom - self.top).max(0.)
	}

	#[must_use]
	pub fn area(&self) -> f64 {
		self.width() * self.height()
	}

	/// Whether the rectangle covers no area.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.area() <= ZERO_AREA_EPSILON
	}

	#[must_use]
	pub fn center(&self) -> DVec2 {
		DVec2::new(self.left + self.width() / 2., self.top + self.height() / 2.)
	}

	#[must_use]
	pub fn to_box(&self) -> [DVec2; 2] {
		[DVec2::new(self.left, self.top), DVec2::new(self.right, self.bottom)]
	}

	#[must_use]
	pub fn translate(&self, dx: f64, dy: f64) -> Self {
		let offset = DVec2::new(dx, dy);
		let [min, max] = self.to_box();
		Self::from_box([min + offset, max + offset])
	}

	/// Express these bounds in the coordinate space whose origin is the top left corner of `origin`.
	#[must_use]
	pub fn relative_to(&self, origin: &Self) -> Self {
		self.translate(-origin.left, -origin.top)
	}

	/// Move the top left corner to `(x, y)`, keeping the size.
	#[must_use]
	pub fn update_position(&self, x: f64, y: f64) -> Self {
		Self::from_size(x, y, self.width(), self.height())
	}

	/// Move and resize, keeping any component that is not given.
	#[must_use]
	pub fn update_size_and_position(&self, x: Option<f64>, y: Option<f64>, width: Option<f64>, height: Option<f64>) -> Self {
		Self::from_size(
			x.unwrap_or(self.left),
			y.unwrap_or(self.top),
			width.unwrap_or_else(|| self.width()),
			height.unwrap_or_else(|| self.height()),
		)
	}
}
