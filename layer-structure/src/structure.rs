//! # Layer structure
//! A snapshot of a document's layers: the records, their bottom-to-top order, and the tree derived from that order.
//!
//! Snapshots never change once built. Every edit in [`mutation`] returns a new snapshot that shares the untouched layer
//! records (and, when the order is unchanged, the derived tree) with its predecessor. Queries are memoized per snapshot.

mod derived;
mod mutation;

use derived::DerivedView;
pub use mutation::{LayerPosition, LayerSize, PerLayer, Replace};

use crate::bounds::Bounds;
use crate::descriptor::{DocumentDescriptor, LayerDescriptor};
use crate::error::Result;
use crate::layer_node::NodeInfo;
use crate::layers::layer_info::{Layer, LayerKind};
use crate::memo::Memo;
use crate::LayerId;

use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use std::sync::Arc;

pub(crate) type LayerMap = FxHashMap<LayerId, Arc<Layer>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ListQuery {
	Ancestors,
	Descendants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FlagQuery {
	LockedAncestor,
	LockedDescendant,
	InvisibleAncestor,
	VisibleDescendant,
	CollapsedAncestor,
	SelectedAncestor,
	EmptyGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum BoundsQuery {
	Child,
	RelativeChild,
}

/// Memo tables of one snapshot. Never shared between snapshots.
#[derive(Debug, Default)]
struct QueryCache {
	lists: Memo<(ListQuery, LayerId), Arc<[LayerId]>>,
	flags: Memo<(FlagQuery, LayerId), bool>,
	bounds: Memo<(BoundsQuery, LayerId), Option<Bounds>>,
	views: Memo<DerivedView, Arc<[LayerId]>>,
}

/// An immutable snapshot of a document's layers.
#[derive(Debug)]
pub struct LayerStructure {
	layers: Arc<LayerMap>,
	/// Layer IDs in item-index order: position `i` holds the layer with item index `i + 1`, so the top-most layer is last.
	index: Arc<Vec<LayerId>>,
	/// Anchor of range selections.
	pivot_id: Option<LayerId>,
	tree: Arc<NodeInfo>,
	reverse_index: OnceCell<FxHashMap<LayerId, usize>>,
	cache: QueryCache,
}

impl Clone for LayerStructure {
	fn clone(&self) -> Self {
		Self::from_parts(self.layers.clone(), self.index.clone(), self.pivot_id, self.tree.clone())
	}
}

impl PartialEq for LayerStructure {
	fn eq(&self, other: &Self) -> bool {
		self.index == other.index && self.pivot_id == other.pivot_id && self.layers == other.layers
	}
}

impl Default for LayerStructure {
	fn default() -> Self {
		Self::from_parts(Default::default(), Default::default(), None, Default::default())
	}
}

// ===== Construction =====

impl LayerStructure {
	/// Build a snapshot from layer records and their order, bottom-most first.
	pub fn new(layers: impl IntoIterator<Item = Layer>, index: Vec<LayerId>) -> Result<Self> {
		let layers = layers.into_iter().map(|layer| (layer.id, Arc::new(layer))).collect::<LayerMap>();
		Self::validated(Arc::new(layers), Arc::new(index), None)
	}

	/// Build a snapshot from the editor's descriptors of a document and all its layers.
	///
	/// The layer order follows the descriptors' item indices; the document's target layers become the selection.
	pub fn from_descriptors(document: &DocumentDescriptor, descriptors: &[LayerDescriptor]) -> Result<Self> {
		let selected_indices = document.selected_item_indices();

		let mut ordered = descriptors.iter().collect::<Vec<_>>();
		ordered.sort_by_key(|descriptor| descriptor.item_index);

		let layers = ordered
			.iter()
			.map(|descriptor| Layer::from_descriptor(document, descriptor, selected_indices.contains(&descriptor.item_index), true))
			.collect::<Result<Vec<_>>>()?;
		let index = ordered.iter().map(|descriptor| descriptor.layer_id).collect();

		log::debug!("Building layer structure for document {} with {} layers", document.document_id, layers.len());
		Self::new(layers, index)
	}

	fn from_parts(layers: Arc<LayerMap>, index: Arc<Vec<LayerId>>, pivot_id: Option<LayerId>, tree: Arc<NodeInfo>) -> Self {
		Self {
			layers,
			index,
			pivot_id,
			tree,
			reverse_index: OnceCell::new(),
			cache: QueryCache::default(),
		}
	}

	/// A snapshot whose order or membership may differ from this one, so its tree is derived afresh.
	fn validated(layers: Arc<LayerMap>, index: Arc<Vec<LayerId>>, pivot_id: Option<LayerId>) -> Result<Self> {
		let tree = NodeInfo::derive(&index, &layers)?;
		Ok(Self::from_parts(layers, index, pivot_id, Arc::new(tree)))
	}

	/// A snapshot with edited records but the same order, which keeps this snapshot's tree.
	fn with_layers(&self, layers: Arc<LayerMap>) -> Self {
		Self::from_parts(layers, self.index.clone(), self.pivot_id, self.tree.clone())
	}
}

// ===== Lookups =====

impl LayerStructure {
	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Layer IDs bottom-most first.
	pub fn index(&self) -> &[LayerId] {
		&self.index
	}

	/// All layers, bottom-most first.
	pub fn layers(&self) -> impl DoubleEndedIterator<Item = &Layer> + '_ {
		self.index.iter().filter_map(|&id| self.by_id(id))
	}

	pub fn node_info(&self) -> &NodeInfo {
		&self.tree
	}

	pub fn pivot_id(&self) -> Option<LayerId> {
		self.pivot_id
	}

	/// The anchor layer of range selections, if it still exists.
	pub fn pivot(&self) -> Option<&Layer> {
		self.pivot_id.and_then(|id| self.by_id(id))
	}

	pub fn by_id(&self, id: LayerId) -> Option<&Layer> {
		self.layers.get(&id).map(Arc::as_ref)
	}

	/// The layers with the given IDs, skipping unknown IDs.
	pub fn by_ids(&self, ids: impl IntoIterator<Item = LayerId>) -> Vec<&Layer> {
		ids.into_iter().filter_map(|id| self.by_id(id)).collect()
	}

	/// The layer at a 1-based item index.
	pub fn by_index(&self, item_index: usize) -> Option<&Layer> {
		let id = *self.index.get(item_index.checked_sub(1)?)?;
		self.by_id(id)
	}

	/// The 1-based item index of a layer.
	pub fn index_of(&self, id: LayerId) -> Option<usize> {
		let reverse_index = self.reverse_index.get_or_init(|| self.index.iter().enumerate().map(|(position, &id)| (id, position + 1)).collect());
		reverse_index.get(&id).copied()
	}

	fn is(&self, id: LayerId, predicate: impl FnOnce(&Layer) -> bool) -> bool {
		self.by_id(id).is_some_and(predicate)
	}
}

// ===== Tree queries =====

impl LayerStructure {
	pub fn parent(&self, id: LayerId) -> Option<LayerId> {
		self.tree.parent(id)
	}

	/// Children in reading order, top-most first; a group's group end is its last child.
	pub fn children(&self, id: LayerId) -> &[LayerId] {
		self.tree.children(id)
	}

	/// The layer and its siblings: its parent's children, or the top level layers for a root.
	pub fn siblings(&self, id: LayerId) -> Arc<[LayerId]> {
		match self.parent(id) {
			Some(parent) => Arc::from(self.children(parent)),
			None => self.top(),
		}
	}

	/// The chain from the layer's root down to the layer itself.
	pub fn ancestors(&self, id: LayerId) -> Arc<[LayerId]> {
		self.cache.lists.get_or_insert_with((ListQuery::Ancestors, id), || {
			let mut ancestors = self.tree.ancestors(id).collect::<Vec<_>>();
			ancestors.reverse();
			ancestors.into()
		})
	}

	/// The chain from the layer's root down to its parent.
	pub fn strict_ancestors(&self, id: LayerId) -> Arc<[LayerId]> {
		let ancestors = self.ancestors(id);
		Arc::from(&ancestors[..ancestors.len().saturating_sub(1)])
	}

	pub fn top_ancestor(&self, id: LayerId) -> Option<LayerId> {
		self.tree.ancestors(id).last()
	}

	/// The layer's subtree in item-index order, ending with the layer itself.
	pub fn descendants(&self, id: LayerId) -> Arc<[LayerId]> {
		self.cache.lists.get_or_insert_with((ListQuery::Descendants, id), || self.tree.descendants(id).collect())
	}

	pub fn strict_descendants(&self, id: LayerId) -> Arc<[LayerId]> {
		let descendants = self.descendants(id);
		Arc::from(&descendants[..descendants.len().saturating_sub(1)])
	}

	pub fn depth(&self, id: LayerId) -> Option<usize> {
		self.tree.depth(id)
	}

	/// The depth of the deepest layer in this layer's subtree.
	pub fn max_descendant_depth(&self, id: LayerId) -> Option<usize> {
		self.descendants(id).iter().filter_map(|&descendant| self.depth(descendant)).max()
	}

	/// Locked layers among the layer and its ancestors, root first.
	pub fn locked_ancestors(&self, id: LayerId) -> Vec<LayerId> {
		self.ancestors(id).iter().copied().filter(|&ancestor| self.is(ancestor, |layer| layer.locked)).collect()
	}

	/// Locked layers in the layer's subtree, itself included.
	pub fn locked_descendants(&self, id: LayerId) -> Vec<LayerId> {
		self.descendants(id).iter().copied().filter(|&descendant| self.is(descendant, |layer| layer.locked)).collect()
	}
}

// ===== Predicates =====

impl LayerStructure {
	fn flag(&self, query: FlagQuery, id: LayerId, compute: impl FnOnce() -> bool) -> bool {
		self.cache.flags.get_or_insert_with((query, id), compute)
	}

	/// Whether the layer or any of its ancestors is locked.
	pub fn has_locked_ancestor(&self, id: LayerId) -> bool {
		self.flag(FlagQuery::LockedAncestor, id, || self.ancestors(id).iter().any(|&ancestor| self.is(ancestor, |layer| layer.locked)))
	}

	/// Whether the layer or any layer in its subtree is locked.
	pub fn has_locked_descendant(&self, id: LayerId) -> bool {
		self.flag(FlagQuery::LockedDescendant, id, || self.descendants(id).iter().any(|&descendant| self.is(descendant, |layer| layer.locked)))
	}

	/// Whether the layer or any of its ancestors is hidden.
	pub fn has_invisible_ancestor(&self, id: LayerId) -> bool {
		self.flag(FlagQuery::InvisibleAncestor, id, || self.ancestors(id).iter().any(|&ancestor| self.is(ancestor, |layer| !layer.visible)))
	}

	/// Whether anything that draws in the layer's subtree is visible. Plain groups and group ends do not count, artboards do.
	pub fn has_visible_descendant(&self, id: LayerId) -> bool {
		self.flag(FlagQuery::VisibleDescendant, id, || {
			self.descendants(id)
				.iter()
				.filter_map(|&descendant| self.by_id(descendant))
				.filter(|layer| !((layer.is_group() || layer.is_group_end()) && !layer.is_artboard))
				.any(|layer| layer.visible)
		})
	}

	/// Whether any strict ancestor of the layer is collapsed, which hides the layer in the layers panel.
	pub fn has_collapsed_ancestor(&self, id: LayerId) -> bool {
		self.flag(FlagQuery::CollapsedAncestor, id, || self.strict_ancestors(id).iter().any(|&ancestor| self.is(ancestor, |layer| !layer.expanded)))
	}

	/// Whether the layer or any of its ancestors is selected.
	pub fn has_selected_ancestor(&self, id: LayerId) -> bool {
		self.flag(FlagQuery::SelectedAncestor, id, || self.ancestors(id).iter().any(|&ancestor| self.is(ancestor, |layer| layer.selected)))
	}

	pub fn has_strict_selected_ancestor(&self, id: LayerId) -> bool {
		self.parent(id).is_some_and(|parent| self.has_selected_ancestor(parent))
	}

	/// Whether the layer is a group holding nothing but its group end, adjustment layers, and other empty groups.
	pub fn is_empty_group(&self, id: LayerId) -> bool {
		if let Some(empty) = self.cache.flags.get(&(FlagQuery::EmptyGroup, id)) {
			return empty;
		}

		// Children are answered before their parents, so no lookup below recurses more than one level
		for &descendant in self.descendants(id).iter() {
			self.flag(FlagQuery::EmptyGroup, descendant, || self.is_empty_group_step(descendant));
		}
		self.flag(FlagQuery::EmptyGroup, id, || self.is_empty_group_step(id))
	}

	fn is_empty_group_step(&self, id: LayerId) -> bool {
		self.is(id, Layer::is_group)
			&& self
				.children(id)
				.iter()
				.filter(|&&child| !(self.is(child, Layer::is_adjustment) || self.flag(FlagQuery::EmptyGroup, child, || self.is_empty_group_step(child))))
				.count() == 1
	}

	/// Whether a vector mask can be added to the layer.
	pub fn can_support_vector_mask(&self, id: LayerId) -> bool {
		self.is(id, |layer| !layer.is_group_end() && !layer.is_vector() && !layer.is_background() && !layer.locked)
	}
}

// ===== Bounds =====

impl LayerStructure {
	fn bounds_query(&self, query: BoundsQuery, id: LayerId) -> Option<Bounds> {
		if let Some(bounds) = self.cache.bounds.get(&(query, id)) {
			return bounds;
		}

		for &descendant in self.descendants(id).iter() {
			self.cache.bounds.get_or_insert_with((query, descendant), || self.bounds_step(query, descendant));
		}
		self.cache.bounds.get_or_insert_with((query, id), || self.bounds_step(query, id))
	}

	/// One layer's bounds. Its children's are expected to be memoized already.
	fn bounds_step(&self, query: BoundsQuery, id: LayerId) -> Option<Bounds> {
		let layer = self.by_id(id)?;

		match layer.kind {
			LayerKind::GroupEnd => None,
			LayerKind::Group if layer.is_artboard => layer.bounds,
			LayerKind::Group => {
				let children = self
					.children(id)
					.iter()
					.filter_map(|&child| self.cache.bounds.get_or_insert_with((query, child), || self.bounds_step(query, child)))
					.filter(|bounds| !bounds.is_empty());
				let mask = (query == BoundsQuery::Child && layer.vector_mask_enabled).then_some(layer.bounds).flatten();

				Bounds::union(children.chain(mask))
			}
			_ if query == BoundsQuery::RelativeChild => {
				let artboard = self.top_ancestor(id).and_then(|top| self.by_id(top)).filter(|top| top.is_artboard).and_then(|top| top.bounds);
				match artboard {
					Some(artboard) => layer.bounds.map(|bounds| bounds.relative_to(&artboard)),
					None => layer.bounds,
				}
			}
			_ => layer.bounds,
		}
	}

	/// The bounds enclosing everything the layer draws.
	///
	/// A plain group encloses its children with positive area (and its own bounds when it has a vector mask), an artboard is its own rectangle, and a group end has none.
	pub fn child_bounds(&self, id: LayerId) -> Option<Bounds> {
		self.bounds_query(BoundsQuery::Child, id)
	}

	/// Like [`Self::child_bounds`], but with layers inside an artboard measured from the artboard's top left corner.
	pub fn relative_child_bounds(&self, id: LayerId) -> Option<Bounds> {
		self.bounds_query(BoundsQuery::RelativeChild, id)
	}

	/// The part of the layer's bounds visible within its artboard, or all of them outside an artboard.
	pub fn bounds_within_artboard(&self, id: LayerId) -> Option<Bounds> {
		let bounds = self.child_bounds(id)?;

		match self.top_ancestor(id).filter(|&top| self.is(top, |layer| layer.is_artboard)) {
			Some(artboard) => match self.child_bounds(artboard) {
				Some(artboard_bounds) => Bounds::intersection(&artboard_bounds, &bounds),
				None => Some(bounds),
			},
			None => Some(bounds),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::descriptor::BoundsDescriptor;
	use crate::test_utils::TestDocument;
	use crate::LayerStructureError;

	use pretty_assertions::assert_eq;

	/// Reading order: 1, 2 [3, 4], with 2 a group and 4 its group end.
	fn nested() -> LayerStructure {
		TestDocument::new()
			.pixel(1, [0., 0., 10., 10.])
			.group(2)
			.pixel(3, [5., 5., 10., 10.])
			.selected()
			.group_end(4)
			.build()
	}

	#[test]
	fn snapshots_can_be_shared_between_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<LayerStructure>();
	}

	#[test]
	fn index_is_bottom_to_top() {
		let structure = nested();

		assert_eq!(structure.index(), &[4, 3, 2, 1]);
		assert_eq!(structure.by_index(1).map(|layer| layer.id), Some(4));
		assert_eq!(structure.by_index(4).map(|layer| layer.id), Some(1));
		assert_eq!(structure.by_index(0), None);
		assert_eq!(structure.by_index(5), None);
		assert_eq!(structure.index_of(1), Some(4));
		assert_eq!(structure.index_of(42), None);
	}

	#[test]
	fn tree_queries() {
		let structure = nested();

		assert_eq!(structure.parent(3), Some(2));
		assert_eq!(structure.children(2), &[3, 4]);
		assert_eq!(&*structure.siblings(3), &[3, 4]);
		assert_eq!(&*structure.siblings(1), &[1, 2]);
		assert_eq!(&*structure.ancestors(3), &[2, 3]);
		assert_eq!(&*structure.strict_ancestors(3), &[2]);
		assert_eq!(&*structure.strict_ancestors(1), &[] as &[LayerId]);
		assert_eq!(structure.top_ancestor(3), Some(2));
		assert_eq!(&*structure.descendants(2), &[4, 3, 2]);
		assert_eq!(&*structure.strict_descendants(2), &[4, 3]);
		assert_eq!(structure.depth(3), Some(1));
		assert_eq!(structure.max_descendant_depth(2), Some(1));
		assert_eq!(structure.max_descendant_depth(1), Some(0));
	}

	#[test]
	fn child_bounds_of_group() {
		let structure = nested();

		assert_eq!(structure.child_bounds(2), structure.by_id(3).unwrap().bounds);
		assert_eq!(structure.child_bounds(4), None);
		assert_eq!(structure.child_bounds(1), Some(Bounds::from_size(0., 0., 10., 10.)));
	}

	#[test]
	fn child_bounds_skip_empty_children_and_include_mask() {
		let structure = TestDocument::new()
			.group(1)
			.with(|descriptor| {
				descriptor.vector_mask_enabled = true;
				descriptor.bounds = Some(BoundsDescriptor::from_size(0., 0., 12., 12.));
			})
			.pixel(2, [0., 0., 0., 0.])
			.pixel(3, [10., 10., 5., 5.])
			.group_end(4)
			.build();

		assert_eq!(structure.by_id(1).unwrap().bounds, Some(Bounds::from_size(0., 0., 12., 12.)));
		assert_eq!(structure.child_bounds(1), Some(Bounds::from_size(0., 0., 15., 15.)));
		// The mask does not count towards artboard relative bounds
		assert_eq!(structure.relative_child_bounds(1), Some(Bounds::from_size(10., 10., 5., 5.)));
	}

	#[test]
	fn masked_group_encloses_its_children() {
		let structure = TestDocument::new()
			.pixel(1, [0., 0., 1., 1.])
			.group(2)
			.with(|descriptor| {
				descriptor.vector_mask_enabled = true;
				descriptor.bounds = Some(BoundsDescriptor::from_size(0., 0., 100., 100.));
			})
			.pixel(3, [10., 10., 5., 5.])
			.group_end(4)
			.build();

		assert_eq!(structure.child_bounds(2), Some(Bounds::from_size(0., 0., 100., 100.)));
		assert_eq!(structure.overall_bounds(), Some(Bounds::from_size(0., 0., 100., 100.)));
	}

	#[test]
	fn repeated_queries_are_answered_from_the_memo() {
		let structure = TestDocument::new().group(1).group(2).pixel(3, [0., 0., 4., 4.]).group_end(4).group_end(5).pixel(6, [8., 8., 2., 2.]).build();

		assert_eq!(structure.child_bounds(1), Some(Bounds::from_size(0., 0., 4., 4.)));
		assert!(!structure.is_empty_group(1));
		let bounds_entries = structure.cache.bounds.len();
		let flag_entries = structure.cache.flags.len();
		assert!(bounds_entries >= 4);

		assert_eq!(structure.child_bounds(1), Some(Bounds::from_size(0., 0., 4., 4.)));
		assert_eq!(structure.child_bounds(2), Some(Bounds::from_size(0., 0., 4., 4.)));
		assert!(!structure.is_empty_group(1));
		assert!(!structure.is_empty_group(2));
		assert_eq!(structure.cache.bounds.len(), bounds_entries);
		assert_eq!(structure.cache.flags.len(), flag_entries);
	}

	#[test]
	fn unmasked_group_has_no_bounds_of_its_own() {
		let structure = TestDocument::new()
			.group(1)
			.with(|descriptor| descriptor.bounds = Some(BoundsDescriptor::from_size(0., 0., 100., 100.)))
			.pixel(2, [10., 10., 5., 5.])
			.group_end(3)
			.build();

		assert_eq!(structure.by_id(1).unwrap().bounds, None);
		assert_eq!(structure.child_bounds(1), Some(Bounds::from_size(10., 10., 5., 5.)));
	}

	#[test]
	fn empty_group_has_no_bounds() {
		let structure = TestDocument::new().group(1).group_end(2).pixel(3, [0., 0., 1., 1.]).build();

		assert_eq!(structure.child_bounds(1), None);
		assert!(structure.is_empty_group(1));
		assert!(!structure.is_empty_group(3));
	}

	#[test]
	fn nested_empty_groups() {
		let structure = TestDocument::new().group(1).group(2).adjustment(3).group_end(4).group_end(5).build();
		assert!(structure.is_empty_group(1));
		assert!(structure.is_empty_group(2));

		let structure = TestDocument::new().group(1).group(2).pixel(3, [0., 0., 1., 1.]).group_end(4).group_end(5).build();
		assert!(!structure.is_empty_group(1));
	}

	#[test]
	fn artboard_relative_bounds() {
		let structure = TestDocument::new()
			.artboard(1, [100., 100., 500., 400.])
			.pixel(2, [120., 150., 10., 20.])
			.group_end(3)
			.pixel(4, [0., 0., 50., 50.])
			.build();

		assert_eq!(structure.child_bounds(1), Some(Bounds::from_size(100., 100., 500., 400.)));
		assert_eq!(structure.relative_child_bounds(2), Some(Bounds::from_size(20., 50., 10., 20.)));
		assert_eq!(structure.relative_child_bounds(4), Some(Bounds::from_size(0., 0., 50., 50.)));
		assert_eq!(structure.relative_child_bounds(1), structure.child_bounds(1));
	}

	#[test]
	fn bounds_clipped_to_artboard() {
		let structure = TestDocument::new()
			.artboard(1, [0., 0., 100., 100.])
			.pixel(2, [90., 90., 20., 20.])
			.group_end(3)
			.pixel(4, [90., 90., 20., 20.])
			.build();

		assert_eq!(structure.bounds_within_artboard(2), Some(Bounds::from_size(90., 90., 10., 10.)));
		assert_eq!(structure.bounds_within_artboard(4), Some(Bounds::from_size(90., 90., 20., 20.)));
	}

	#[test]
	fn ancestor_predicates() {
		let structure = TestDocument::new()
			.group(1)
			.with(|descriptor| {
				descriptor.layer_locking.protect_all = true;
				descriptor.layer_section_expanded = false;
			})
			.pixel(2, [0., 0., 1., 1.])
			.with(|descriptor| descriptor.visible = false)
			.selected()
			.group_end(3)
			.pixel(4, [0., 0., 1., 1.])
			.build();

		assert!(structure.has_locked_ancestor(2));
		assert!(structure.has_locked_ancestor(1));
		assert!(!structure.has_locked_ancestor(4));
		assert!(structure.has_locked_descendant(1));
		assert_eq!(structure.locked_ancestors(2), vec![1]);
		assert_eq!(structure.locked_descendants(1), vec![1]);
		assert!(structure.has_collapsed_ancestor(2));
		assert!(!structure.has_collapsed_ancestor(1));
		assert!(structure.has_invisible_ancestor(2));
		assert!(!structure.has_visible_descendant(1));
		assert!(structure.has_visible_descendant(4));
		assert!(structure.has_selected_ancestor(2));
		assert!(!structure.has_strict_selected_ancestor(2));
		assert!(!structure.can_support_vector_mask(1));
		assert!(structure.can_support_vector_mask(4));
	}

	#[test]
	fn from_descriptors_rejects_unclosed_group() {
		let document = DocumentDescriptor::default();
		let descriptors = [
			LayerDescriptor::new(3, 3, "Layer 3", LayerKind::Pixel),
			LayerDescriptor::new(2, 2, "Group", LayerKind::Group),
			LayerDescriptor::new(1, 1, "Layer 1", LayerKind::Pixel),
		];

		let result = LayerStructure::from_descriptors(&document, &descriptors);
		assert_eq!(result.map(|structure| structure.index().to_vec()), Err(LayerStructureError::UnclosedGroup(2)));
	}

	#[test]
	fn from_descriptors_selects_targets() {
		let document = DocumentDescriptor {
			document_id: 1,
			target_layers: vec![crate::descriptor::TargetLayer { index: 0 }],
		};
		let descriptors = [LayerDescriptor::new(7, 2, "Top", LayerKind::Pixel), LayerDescriptor::new(8, 1, "Bottom", LayerKind::Pixel)];
		let structure = LayerStructure::from_descriptors(&document, &descriptors).unwrap();

		assert_eq!(structure.index(), &[8, 7]);
		assert!(structure.by_id(8).unwrap().selected);
		assert!(!structure.by_id(7).unwrap().selected);
	}
}
