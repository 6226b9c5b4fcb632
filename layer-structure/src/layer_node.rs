use crate::error::Result;
use crate::layers::layer_info::{Layer, LayerKind};
use crate::{LayerId, LayerStructureError};

use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A layer's place in the tree derived from the flat layer index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayerNode {
	pub id: LayerId,
	/// The group enclosing this layer, `None` for a root.
	pub parent: Option<LayerId>,
	/// In reading order, top-most first. A group's last child is its group end.
	pub children: Vec<LayerId>,
	/// Zero for roots.
	pub depth: usize,
}

/// The tree derived from a layer index: a node for every layer, and the roots in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeInfo {
	nodes: FxHashMap<LayerId, LayerNode>,
	roots: Vec<LayerId>,
}

impl NodeInfo {
	/// Derive the tree from an index in item-index order (bottom-most layer first).
	///
	/// The index is scanned from the top-most layer down: a group opens a level, its group end closes it.
	/// Fails if the group pairs do not match up, or if the index and the layer map are not a bijection.
	pub fn derive(index: &[LayerId], layers: &FxHashMap<LayerId, Arc<Layer>>) -> Result<Self> {
		let mut nodes = FxHashMap::with_capacity_and_hasher(index.len(), Default::default());
		let mut roots = Vec::new();
		let mut open_groups: Vec<LayerId> = Vec::new();

		for &id in index.iter().rev() {
			let Some(layer) = layers.get(&id) else {
				log::warn!("Layer {id} is in the layer index but has no record");
				return Err(LayerStructureError::MissingLayer(id));
			};
			if nodes.contains_key(&id) {
				log::warn!("Layer {id} appears in the layer index more than once");
				return Err(LayerStructureError::DuplicateLayer(id));
			}

			let parent = open_groups.last().copied();
			if layer.kind == LayerKind::GroupEnd && parent.is_none() {
				log::warn!("Group end {id} closes no group");
				return Err(LayerStructureError::UnmatchedGroupEnd(id));
			}

			nodes.insert(
				id,
				LayerNode {
					id,
					parent,
					children: Vec::new(),
					depth: open_groups.len(),
				},
			);
			match parent.and_then(|parent| nodes.get_mut(&parent)) {
				Some(parent) => parent.children.push(id),
				None => roots.push(id),
			}

			match layer.kind {
				LayerKind::Group => open_groups.push(id),
				LayerKind::GroupEnd => {
					open_groups.pop();
				}
				_ => {}
			}
		}

		if let Some(&group) = open_groups.last() {
			log::warn!("Group {group} is never closed");
			return Err(LayerStructureError::UnclosedGroup(group));
		}
		if let Some(&orphan) = layers.keys().find(|id| !nodes.contains_key(*id)) {
			log::warn!("Layer {orphan} has a record but is not in the layer index");
			return Err(LayerStructureError::OrphanedLayer(orphan));
		}

		Ok(Self { nodes, roots })
	}

	pub fn get(&self, id: LayerId) -> Option<&LayerNode> {
		self.nodes.get(&id)
	}

	pub fn contains(&self, id: LayerId) -> bool {
		self.nodes.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Layers with no enclosing group, top-most first.
	pub fn roots(&self) -> &[LayerId] {
		&self.roots
	}

	pub fn parent(&self, id: LayerId) -> Option<LayerId> {
		self.get(id).and_then(|node| node.parent)
	}

	pub fn children(&self, id: LayerId) -> &[LayerId] {
		self.get(id).map(|node| node.children.as_slice()).unwrap_or_default()
	}

	pub fn depth(&self, id: LayerId) -> Option<usize> {
		self.get(id).map(|node| node.depth)
	}

	/// Iterate from the layer itself up to its root.
	pub fn ancestors(&self, id: LayerId) -> AncestorsIter<'_> {
		AncestorsIter {
			layer: self.contains(id).then_some(id),
			node_info: self,
		}
	}

	/// Iterate over the layer's subtree in item-index order: each child's subtree comes before the next child up, and the layer itself comes last.
	pub fn descendants(&self, id: LayerId) -> DescendantsIter<'_> {
		DescendantsIter {
			stack: if self.contains(id) { vec![(id, false)] } else { Vec::new() },
			node_info: self,
		}
	}
}

/// Iterator over a layer and its ancestors, nearest first.
#[derive(Clone)]
pub struct AncestorsIter<'a> {
	layer: Option<LayerId>,
	node_info: &'a NodeInfo,
}

impl<'a> Iterator for AncestorsIter<'a> {
	type Item = LayerId;

	fn next(&mut self) -> Option<Self::Item> {
		let layer = self.layer.take();
		self.layer = layer.and_then(|layer| self.node_info.parent(layer));
		layer
	}
}

/// Post-order walk of a subtree. The stack holds each layer alongside whether its children have already been pushed.
#[derive(Clone)]
pub struct DescendantsIter<'a> {
	stack: Vec<(LayerId, bool)>,
	node_info: &'a NodeInfo,
}

impl<'a> Iterator for DescendantsIter<'a> {
	type Item = LayerId;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let (layer, expanded) = self.stack.pop()?;
			if expanded {
				return Some(layer);
			}

			self.stack.push((layer, true));
			// Pushed top-most first so the bottom-most child is popped first
			self.stack.extend(self.node_info.children(layer).iter().map(|&child| (child, false)));
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test_utils::{layer, layer_map};

	use pretty_assertions::assert_eq;

	fn derive(index: &[LayerId], layers: &[(LayerId, LayerKind)]) -> Result<NodeInfo> {
		let _ = env_logger::builder().is_test(true).try_init();
		NodeInfo::derive(index, &layer_map(layers.iter().map(|&(id, kind)| layer(id, kind))))
	}

	#[test]
	fn test_tree() {
		use LayerKind::*;

		// Reading order: 1, 2 [3, 4 [5, 6], 7], 8
		let layers = [(1, Pixel), (2, Group), (3, Text), (4, Group), (5, Vector), (6, GroupEnd), (7, GroupEnd), (8, Background)];
		let index = [8, 7, 6, 5, 4, 3, 2, 1];
		let node_info = derive(&index, &layers).unwrap();

		assert_eq!(node_info.roots(), &[1, 2, 8]);
		assert_eq!(node_info.children(2), &[3, 4, 7]);
		assert_eq!(node_info.children(4), &[5, 6]);
		assert_eq!(node_info.children(5), &[] as &[LayerId]);
		assert_eq!(node_info.parent(5), Some(4));
		assert_eq!(node_info.parent(2), None);
		assert_eq!(node_info.depth(5), Some(2));
		assert_eq!(node_info.depth(7), Some(1));

		assert_eq!(node_info.ancestors(5).collect::<Vec<_>>(), vec![5, 4, 2]);
		assert_eq!(node_info.descendants(2).collect::<Vec<_>>(), vec![7, 6, 5, 4, 3, 2]);
		assert_eq!(node_info.descendants(1).collect::<Vec<_>>(), vec![1]);
		assert_eq!(node_info.descendants(42).count(), 0);
		assert!(node_info.roots().iter().all(|&root| node_info.parent(root).is_none()));
	}

	#[test]
	fn descendants_are_contiguous_in_the_index() {
		use LayerKind::*;

		let layers = [(1, Group), (2, Group), (3, Pixel), (4, GroupEnd), (5, Pixel), (6, GroupEnd), (7, Pixel)];
		let index = [7, 6, 5, 4, 3, 2, 1];
		let node_info = derive(&index, &layers).unwrap();

		let descendants = node_info.descendants(1).collect::<Vec<_>>();
		let position = index.iter().position(|&id| id == 1).unwrap();
		assert_eq!(descendants, index[position + 1 - descendants.len()..=position].to_vec());
	}

	#[test]
	fn unclosed_group() {
		use LayerKind::*;

		assert_eq!(derive(&[3, 2, 1], &[(1, Pixel), (2, Group), (3, Pixel)]), Err(LayerStructureError::UnclosedGroup(2)));
	}

	#[test]
	fn unmatched_group_end() {
		use LayerKind::*;

		assert_eq!(derive(&[2, 1], &[(1, Pixel), (2, GroupEnd)]), Err(LayerStructureError::UnmatchedGroupEnd(2)));
	}

	#[test]
	fn index_and_records_must_match() {
		use LayerKind::*;

		assert_eq!(derive(&[1, 2], &[(1, Pixel)]), Err(LayerStructureError::MissingLayer(2)));
		assert_eq!(derive(&[1, 1], &[(1, Pixel)]), Err(LayerStructureError::DuplicateLayer(1)));
		assert_eq!(derive(&[1], &[(1, Pixel), (2, Pixel)]), Err(LayerStructureError::OrphanedLayer(2)));
	}

	#[test]
	fn empty_index() {
		let node_info = derive(&[], &[]).unwrap();
		assert!(node_info.is_empty());
		assert!(node_info.roots().is_empty());
	}
}
