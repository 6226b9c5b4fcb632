use super::LayerStructure;
use crate::bounds::Bounds;
use crate::layers::layer_info::Layer;
use crate::LayerId;

use rustc_hash::FxHashSet;
use std::sync::Arc;

/// The whole-snapshot layer lists that are memoized alongside the per-layer queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum DerivedView {
	AllVisible,
	Exposed,
	Top,
	TopBelowArtboards,
	Selected,
	SelectedNormalized,
	SelectedTopAncestors,
	AllSelected,
	Uninitialized,
	Artboards,
	Leaves,
	Selectable,
	SelectableLeaves,
}

// ===== Layer lists =====

impl LayerStructure {
	fn view(&self, view: DerivedView, compute: impl FnOnce() -> Vec<LayerId>) -> Arc<[LayerId]> {
		self.cache.views.get_or_insert_with(view, || compute().into())
	}

	fn filter_index(&self, mut predicate: impl FnMut(&Layer) -> bool) -> Vec<LayerId> {
		self.layers().filter(|layer| predicate(layer)).map(|layer| layer.id).collect()
	}

	/// All layer IDs, bottom-most first.
	pub fn all(&self) -> &[LayerId] {
		self.index()
	}

	/// Every layer except group ends, bottom-most first.
	pub fn all_visible(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::AllVisible, || self.filter_index(|layer| !layer.is_group_end()))
	}

	pub fn all_visible_reversed(&self) -> Vec<LayerId> {
		self.all_visible().iter().rev().copied().collect()
	}

	/// The layers not hidden in the layers panel by a collapsed ancestor.
	pub fn exposed(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::Exposed, || self.all_visible().iter().copied().filter(|&id| !self.has_collapsed_ancestor(id)).collect())
	}

	/// The roots of the layer tree, top-most first.
	pub fn top(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::Top, || {
			let roots = self.node_info().roots().iter().copied();
			roots.filter(|&id| self.is(id, |layer| !layer.is_group_end())).collect()
		})
	}

	/// The roots, with every artboard preceded by its direct children. Artboards are moved after everything else.
	pub fn top_below_artboards(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::TopBelowArtboards, || {
			let mut layers = Vec::new();
			for &id in self.top().iter() {
				if self.is(id, |layer| layer.is_artboard) {
					layers.extend(self.children(id).iter().copied().filter(|&child| self.is(child, |layer| !layer.is_group_end())));
				}
				layers.push(id);
			}
			// Stable, so the relative order inside each partition survives
			layers.sort_by_key(|&id| self.is(id, |layer| layer.is_artboard));
			layers
		})
	}

	/// Selected layers, bottom-most first.
	pub fn selected(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::Selected, || self.filter_index(|layer| layer.selected))
	}

	/// Selected layers that have no selected ancestor.
	pub fn selected_normalized(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::SelectedNormalized, || self.selected().iter().copied().filter(|&id| !self.has_strict_selected_ancestor(id)).collect())
	}

	/// The distinct roots of the selected layers, in selection order.
	pub fn selected_top_ancestors(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::SelectedTopAncestors, || {
			let mut seen = FxHashSet::default();
			self.selected().iter().filter_map(|&id| self.top_ancestor(id)).filter(|&top| seen.insert(top)).collect()
		})
	}

	/// The selected layers and everything inside them, without repeats.
	pub fn all_selected(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::AllSelected, || {
			let mut seen = FxHashSet::default();
			let descendants = self.selected().iter().flat_map(|&id| self.descendants(id).to_vec()).collect::<Vec<_>>();
			descendants.into_iter().filter(|&id| seen.insert(id)).collect()
		})
	}

	/// Layers whose full descriptor has not been read yet.
	pub fn uninitialized(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::Uninitialized, || self.filter_index(|layer| !layer.initialized))
	}

	/// The top level artboards, top-most first.
	pub fn artboards(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::Artboards, || self.top().iter().copied().filter(|&id| self.is(id, |layer| layer.is_artboard)).collect())
	}

	/// Visible, non-group layers without a locked ancestor.
	pub fn leaves(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::Leaves, || {
			let candidates = self.filter_index(|layer| !layer.is_group_end() && !layer.is_group() && layer.visible);
			candidates.into_iter().filter(|&id| !self.has_locked_ancestor(id)).collect()
		})
	}

	/// Leaves that can be picked on their own, bottom-most first.
	pub fn selectable_leaves(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::SelectableLeaves, || {
			let leaves = self.leaves();
			leaves.iter().copied().filter(|&id| !self.has_invisible_ancestor(id) && self.is(id, Layer::is_super_selectable)).collect()
		})
	}

	/// The layers that a click on the canvas can select directly.
	///
	/// Starting from the top level (with artboard contents lifted up a level), each selected layer opens up its ancestors:
	/// an opened group is replaced by its children, which move to the end of the list to keep their stacking order.
	/// Opened artboards stay selectable themselves. Hidden, locked, and empty layers are dropped.
	pub fn selectable(&self) -> Arc<[LayerId]> {
		self.view(DerivedView::Selectable, || {
			let mut candidates = self.top_below_artboards().to_vec();
			let mut opened = FxHashSet::default();

			for &id in self.selected().iter() {
				let mut ancestor = self.parent(id);
				while let Some(group) = ancestor.filter(|group| !opened.contains(group)) {
					if !self.is(group, |layer| layer.is_artboard) {
						candidates.retain(|&candidate| candidate != group);
					}
					opened.insert(group);

					for &child in self.children(group) {
						candidates.retain(|&candidate| candidate != child);
						candidates.push(child);
					}

					ancestor = self.parent(group);
				}
			}

			candidates
				.into_iter()
				.filter(|&id| {
					let Some(layer) = self.by_id(id) else { return false };
					layer.is_super_selectable()
						&& self.has_visible_descendant(id)
						&& !self.has_invisible_ancestor(id)
						&& !self.has_locked_ancestor(id)
						&& (layer.is_artboard || !opened.contains(&id))
				})
				.collect()
		})
	}
}

// ===== Bounds of several layers =====

impl LayerStructure {
	fn positive_child_bounds(&self, ids: impl IntoIterator<Item = LayerId>, child_bounds: impl Fn(LayerId) -> Option<Bounds>) -> Vec<Bounds> {
		ids.into_iter().filter_map(child_bounds).filter(|bounds| bounds.area() > 0.).collect()
	}

	/// The child bounds with positive area of each selected layer.
	pub fn selected_child_bounds(&self) -> Vec<Bounds> {
		self.positive_child_bounds(self.selected().iter().copied(), |id| self.child_bounds(id))
	}

	/// The artboard relative child bounds with positive area of each selected layer.
	pub fn selected_relative_child_bounds(&self) -> Vec<Bounds> {
		self.positive_child_bounds(self.selected().iter().copied(), |id| self.relative_child_bounds(id))
	}

	/// The bounds around the whole selection.
	pub fn selected_area_bounds(&self) -> Option<Bounds> {
		Bounds::union(self.selected_child_bounds())
	}

	/// The bounds around the unlocked part of the selection.
	pub fn selected_unlocked_area_bounds(&self) -> Option<Bounds> {
		let unlocked = self.selected().iter().copied().filter(|&id| self.is(id, |layer| !layer.locked)).collect::<Vec<_>>();
		Bounds::union(self.positive_child_bounds(unlocked, |id| self.child_bounds(id)))
	}

	/// The child bounds with positive area of each top level layer.
	pub fn top_bounds(&self) -> Vec<Bounds> {
		self.positive_child_bounds(self.top().iter().copied(), |id| self.child_bounds(id))
	}

	/// The bounds around everything in the document.
	pub fn overall_bounds(&self) -> Option<Bounds> {
		Bounds::union(self.top_bounds())
	}
}

// ===== Whole snapshot predicates =====

impl LayerStructure {
	pub fn all_selected_layers(&self) -> Vec<&Layer> {
		self.by_ids(self.all_selected().iter().copied())
	}

	pub fn has_artboard(&self) -> bool {
		self.top().iter().any(|&id| self.is(id, |layer| layer.is_artboard))
	}

	/// Whether the bottom-most layer is a selected background layer.
	pub fn background_selected(&self) -> bool {
		self.by_index(1).is_some_and(|layer| layer.is_background() && layer.selected)
	}

	pub fn has_linked_smart_objects(&self) -> bool {
		self.layers().any(|layer| layer.is_linked)
	}

	/// Whether a selected layer sits inside another selected layer.
	pub fn selected_has_nesting(&self) -> bool {
		self.selected().iter().any(|&id| self.has_strict_selected_ancestor(id))
	}

	/// Whether a selected layer sits inside another selected layer that is not an artboard.
	pub fn selected_has_nesting_except_artboards(&self) -> bool {
		let selected = self.selected();
		selected
			.iter()
			.any(|&id| self.strict_ancestors(id).iter().any(|&ancestor| selected.contains(&ancestor) && self.is(ancestor, |layer| !layer.is_artboard)))
	}

	/// Whether the selection can't be edited: nothing is selected, or the background or a locked layer is.
	pub fn selected_locked(&self) -> bool {
		let selected = self.selected();
		selected.is_empty() || selected.iter().any(|&id| self.is(id, |layer| layer.is_background() || layer.locked))
	}

	/// Whether deleting the selection would leave at least one layer that draws something.
	pub fn selected_layers_deletable(&self) -> bool {
		let all_selected = self.all_selected();
		if all_selected.is_empty() {
			return false;
		}

		let all_selected = all_selected.iter().copied().collect::<FxHashSet<_>>();
		self.layers().filter(|layer| !all_selected.contains(&layer.id)).any(|layer| !layer.is_group_end() && !layer.is_group())
	}

	/// Whether a vector mask can be added to the selection: a single layer that supports one.
	pub fn selected_layers_can_have_vector_mask(&self) -> bool {
		match *self.selected() {
			[id] => self.can_support_vector_mask(id),
			_ => false,
		}
	}

	/// Whether the selection is a vector layer and one layer that can be masked by it.
	pub fn selected_layers_can_make_vector_mask_from_shape(&self) -> bool {
		let selected = self.selected();
		selected.len() == 2 && selected.iter().any(|&id| self.is(id, Layer::is_vector)) && selected.iter().any(|&id| self.can_support_vector_mask(id))
	}

	/// Whether every selected layer is a vector layer. True for an empty selection.
	pub fn selected_layers_contain_only_shape_layers(&self) -> bool {
		self.selected().iter().all(|&id| self.is(id, Layer::is_vector))
	}

	/// The given layers, keeping only the ones that export to an image of their own.
	///
	/// Excludes background and adjustment layers, empty groups, and anything whose child bounds cover no area.
	pub fn filter_exportable(&self, ids: impl IntoIterator<Item = LayerId>) -> Vec<LayerId> {
		ids.into_iter()
			.filter(|&id| {
				let Some(layer) = self.by_id(id) else { return false };
				let has_area = self.child_bounds(id).is_some_and(|bounds| !bounds.is_empty());

				has_area && !layer.is_background() && !layer.is_adjustment() && !self.is_empty_group(id)
			})
			.collect()
	}
}

#[cfg(test)]
mod test {
	use crate::bounds::Bounds;
	use crate::test_utils::TestDocument;
	use crate::LayerId;

	use pretty_assertions::assert_eq;

	#[test]
	fn selectable_promotes_into_selected_group() {
		let structure = TestDocument::new()
			.pixel(1, [0., 0., 10., 10.])
			.group(2)
			.pixel(3, [5., 5., 10., 10.])
			.selected()
			.group_end(4)
			.build();

		let selectable = structure.selectable();
		assert!(selectable.contains(&3));
		assert!(selectable.contains(&1));
		assert!(!selectable.contains(&2));
		assert!(!selectable.contains(&4));
		assert_eq!(&*selectable, &[1, 3]);
	}

	#[test]
	fn selectable_without_selection_is_top_level() {
		let structure = TestDocument::new()
			.pixel(1, [0., 0., 10., 10.])
			.group(2)
			.pixel(3, [5., 5., 10., 10.])
			.group_end(4)
			.background(5, [0., 0., 100., 100.])
			.build();

		assert_eq!(&*structure.selectable(), &[1, 2]);
	}

	#[test]
	fn selectable_lifts_artboard_contents() {
		let structure = TestDocument::new()
			.artboard(1, [0., 0., 100., 100.])
			.pixel(2, [0., 0., 10., 10.])
			.group(3)
			.pixel(4, [0., 0., 10., 10.])
			.selected()
			.group_end(5)
			.group_end(6)
			.pixel(7, [200., 0., 10., 10.])
			.build();

		assert_eq!(&*structure.top_below_artboards(), &[2, 3, 7, 1]);
		// Group 3 and artboard 1 are opened up and their children moved to the end. The artboard stays selectable.
		assert_eq!(&*structure.selectable(), &[7, 1, 4, 2]);
	}

	#[test]
	fn selectable_skips_hidden_and_locked() {
		let structure = TestDocument::new()
			.pixel(1, [0., 0., 10., 10.])
			.with(|descriptor| descriptor.visible = false)
			.pixel(2, [0., 0., 10., 10.])
			.with(|descriptor| descriptor.layer_locking.protect_all = true)
			.pixel(3, [0., 0., 10., 10.])
			.build();

		assert_eq!(&*structure.selectable(), &[3]);
	}

	#[test]
	fn selectable_leaves_skip_hidden_groups_and_background() {
		let structure = TestDocument::new()
			.pixel(1, [0., 0., 10., 10.])
			.group(2)
			.with(|descriptor| descriptor.visible = false)
			.pixel(3, [0., 0., 10., 10.])
			.group_end(4)
			.background(5, [0., 0., 100., 100.])
			.build();

		assert_eq!(&*structure.selectable_leaves(), &[1]);
		assert!(std::sync::Arc::ptr_eq(&structure.selectable_leaves(), &structure.selectable_leaves()));
	}

	#[test]
	fn selected_views() {
		let structure = TestDocument::new()
			.group(1)
			.selected()
			.pixel(2, [0., 0., 10., 10.])
			.selected()
			.group_end(3)
			.pixel(4, [20., 20., 10., 10.])
			.selected()
			.build();

		assert_eq!(&*structure.selected(), &[4, 2, 1]);
		assert_eq!(&*structure.selected_normalized(), &[4, 1]);
		assert_eq!(&*structure.all_selected(), &[4, 2, 3, 1]);
		assert_eq!(&*structure.selected_top_ancestors(), &[4, 1]);
		assert_eq!(structure.all_selected_layers().iter().map(|layer| layer.id).collect::<Vec<_>>(), [4, 2, 3, 1]);
		assert!(structure.selected_has_nesting());
		assert!(structure.selected_has_nesting_except_artboards());
		assert!(!structure.selected_layers_deletable());
		assert_eq!(structure.selected_area_bounds(), Some(Bounds::from_size(0., 0., 30., 30.)));
	}

	#[test]
	fn overall_bounds_ignore_empty_layers() {
		let structure = TestDocument::new().pixel(1, [0., 0., 10., 10.]).pixel(2, [50., 50., 0., 0.]).pixel(3, [-5., 0., 1., 1.]).build();

		assert_eq!(structure.top_bounds().len(), 2);
		assert_eq!(structure.overall_bounds(), Some(Bounds::from_size(-5., 0., 15., 10.)));
		assert_eq!(TestDocument::new().build().overall_bounds(), None);
	}

	#[test]
	fn exposed_hides_collapsed_contents() {
		let structure = TestDocument::new()
			.group(1)
			.with(|descriptor| descriptor.layer_section_expanded = false)
			.pixel(2, [0., 0., 1., 1.])
			.group_end(3)
			.pixel(4, [0., 0., 1., 1.])
			.build();

		assert_eq!(&*structure.all_visible(), &[4, 2, 1]);
		assert_eq!(structure.all_visible_reversed(), vec![1, 2, 4]);
		assert_eq!(&*structure.exposed(), &[4, 1]);
	}

	#[test]
	fn filter_exportable() {
		let structure = TestDocument::new()
			.pixel(1, [0., 0., 10., 10.])
			.pixel(2, [0., 0., 0., 0.])
			.adjustment(3)
			.group(4)
			.adjustment(5)
			.group_end(6)
			.background(7, [0., 0., 100., 100.])
			.build();

		let ids: Vec<LayerId> = structure.all().to_vec();
		assert_eq!(structure.filter_exportable(ids), vec![1]);
	}

	#[test]
	fn selection_predicates() {
		let structure = TestDocument::new()
			.vector(1, [0., 0., 10., 10.])
			.selected()
			.pixel(2, [0., 0., 10., 10.])
			.selected()
			.background(3, [0., 0., 100., 100.])
			.build();

		assert!(structure.selected_layers_can_make_vector_mask_from_shape());
		assert!(!structure.selected_layers_can_have_vector_mask());
		assert!(!structure.selected_layers_contain_only_shape_layers());
		assert!(!structure.selected_locked());
		assert!(!structure.background_selected());
		assert!(structure.selected_layers_deletable());
	}

	#[test]
	fn background_selection() {
		let structure = TestDocument::new().pixel(1, [0., 0., 1., 1.]).background(2, [0., 0., 10., 10.]).selected().build();

		assert!(structure.background_selected());
		assert!(structure.selected_locked());
		assert!(!structure.selected_layers_can_have_vector_mask());
	}
}
