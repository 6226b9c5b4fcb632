use super::style::Color;
use crate::LayerStructureError;
use crate::consts::DEFAULT_OPACITY;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of layer effects the structure knows how to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub enum LayerEffectType {
	#[serde(rename = "dropShadow")]
	DropShadow,
	#[serde(rename = "innerShadow")]
	InnerShadow,
	#[serde(rename = "solidFill")]
	ColorOverlay,
	#[serde(rename = "frameFX")]
	Stroke,
}

impl LayerEffectType {
	pub const ALL: [Self; 4] = [Self::DropShadow, Self::InnerShadow, Self::ColorOverlay, Self::Stroke];

	/// The editor's name for this effect type.
	pub fn name(&self) -> &'static str {
		match self {
			Self::DropShadow => "dropShadow",
			Self::InnerShadow => "innerShadow",
			Self::ColorOverlay => "solidFill",
			Self::Stroke => "frameFX",
		}
	}
}

impl fmt::Display for LayerEffectType {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.name())
	}
}

impl FromStr for LayerEffectType {
	type Err = LayerStructureError;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|effect_type| effect_type.name() == name)
			.ok_or_else(|| LayerStructureError::UnknownEffectType(name.to_string()))
	}
}

/// A single layer effect. Which fields matter depends on the effect type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct LayerEffect {
	pub enabled: bool,
	pub color: Color,
	pub opacity: f64,
	pub distance: f64,
	pub angle: f64,
	pub blur: f64,
	pub spread: f64,
	/// Stroke width, for the stroke effect.
	pub size: f64,
}

impl LayerEffect {
	/// The effect the editor creates when one of this type is first added.
	pub fn new_by_type(effect_type: LayerEffectType) -> Self {
		let base = Self {
			enabled: true,
			color: Color::BLACK,
			opacity: DEFAULT_OPACITY,
			distance: 0.,
			angle: 90.,
			blur: 0.,
			spread: 0.,
			size: 0.,
		};

		match effect_type {
			LayerEffectType::DropShadow | LayerEffectType::InnerShadow => Self {
				opacity: 35.,
				distance: 5.,
				blur: 5.,
				..base
			},
			LayerEffectType::ColorOverlay => base,
			LayerEffectType::Stroke => Self { size: 3., ..base },
		}
	}

	#[must_use]
	pub fn merge(&self, patch: &LayerEffectPatch) -> Self {
		Self {
			enabled: patch.enabled.unwrap_or(self.enabled),
			color: patch.color.unwrap_or(self.color),
			opacity: patch.opacity.unwrap_or(self.opacity),
			distance: patch.distance.unwrap_or(self.distance),
			angle: patch.angle.unwrap_or(self.angle),
			blur: patch.blur.unwrap_or(self.blur),
			spread: patch.spread.unwrap_or(self.spread),
			size: patch.size.unwrap_or(self.size),
		}
	}
}

/// Fields to overwrite on a [`LayerEffect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerEffectPatch {
	pub enabled: Option<bool>,
	pub color: Option<Color>,
	pub opacity: Option<f64>,
	pub distance: Option<f64>,
	pub angle: Option<f64>,
	pub blur: Option<f64>,
	pub spread: Option<f64>,
	pub size: Option<f64>,
}

/// A layer's effects, each type holding an ordered list.
pub type LayerEffects = BTreeMap<LayerEffectType, Vec<LayerEffect>>;

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn effect_type_names_round_trip() {
		for effect_type in LayerEffectType::ALL {
			assert_eq!(effect_type.name().parse::<LayerEffectType>(), Ok(effect_type));
		}
	}

	#[test]
	fn unknown_effect_type_is_rejected() {
		assert_eq!("bevelEmboss".parse::<LayerEffectType>(), Err(LayerStructureError::UnknownEffectType("bevelEmboss".into())));
	}
}
