//! # Layers
//! A document consists of a flat list of [Layers](layer_info::Layer), each an immutable record of one layer's attributes.
//! Groups are not nested records: a [group head](layer_info::LayerKind::Group) and its [group end](layer_info::LayerKind::GroupEnd)
//! bracket their members in the list, and the nesting is derived from that list by [`LayerStructure`](crate::LayerStructure).
//!
//! Vector and text layers additionally carry [styles](style), and any layer may carry [layer effects](effects).

/// Contains the [LayerEffect](effects::LayerEffect) type and the closed set of effect types.
pub mod effects;
/// Contains the base [Layer](layer_info::Layer) type and the [LayerKind](layer_info::LayerKind) codes.
pub mod layer_info;
/// Fill, stroke and text styles of vector and text layers.
pub mod style;
