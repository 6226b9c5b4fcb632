use crate::consts::{DEFAULT_OPACITY, DEFAULT_STROKE_WIDTH};

use serde::{Deserialize, Serialize};

/// An RGBA color with channels in `0..=255` and alpha in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Color {
	pub red: f64,
	pub green: f64,
	pub blue: f64,
	#[serde(default = "Color::opaque")]
	pub alpha: f64,
}

impl Color {
	pub const BLACK: Self = Self::from_rgb(0., 0., 0.);
	pub const WHITE: Self = Self::from_rgb(255., 255., 255.);

	pub const fn from_rgb(red: f64, green: f64, blue: f64) -> Self {
		Self { red, green, blue, alpha: 1. }
	}

	fn opaque() -> f64 {
		1.
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::BLACK
	}
}

// ====
// Fill
// ====

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(default)]
pub struct Fill {
	pub enabled: bool,
	pub color: Color,
	pub opacity: f64,
}

impl Default for Fill {
	fn default() -> Self {
		Self {
			enabled: true,
			color: Color::default(),
			opacity: DEFAULT_OPACITY,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillPatch {
	pub enabled: Option<bool>,
	pub color: Option<Color>,
	pub opacity: Option<f64>,
}

impl Fill {
	#[must_use]
	pub fn set_fill_properties(&self, patch: &FillPatch) -> Self {
		Self {
			enabled: patch.enabled.unwrap_or(self.enabled),
			color: patch.color.unwrap_or(self.color),
			opacity: patch.opacity.unwrap_or(self.opacity),
		}
	}
}

// ======
// Stroke
// ======

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub enum StrokeAlignment {
	#[default]
	Inside,
	Center,
	Outside,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(default, rename_all = "camelCase")]
pub struct Stroke {
	pub enabled: bool,
	pub color: Color,
	pub width: f64,
	pub opacity: f64,
	pub alignment: StrokeAlignment,
	pub dash_array: Vec<f64>,
}

impl Default for Stroke {
	/// A disabled, one pixel wide, black stroke: what a layer without a stroke is assumed to have.
	fn default() -> Self {
		Self {
			enabled: false,
			color: Color::default(),
			width: DEFAULT_STROKE_WIDTH,
			opacity: DEFAULT_OPACITY,
			alignment: StrokeAlignment::default(),
			dash_array: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrokePatch {
	pub enabled: Option<bool>,
	pub color: Option<Color>,
	pub width: Option<f64>,
	pub opacity: Option<f64>,
	pub alignment: Option<StrokeAlignment>,
	pub dash_array: Option<Vec<f64>>,
}

impl Stroke {
	#[must_use]
	pub fn set_stroke_properties(&self, patch: &StrokePatch) -> Self {
		Self {
			enabled: patch.enabled.unwrap_or(self.enabled),
			color: patch.color.unwrap_or(self.color),
			width: patch.width.unwrap_or(self.width).max(0.),
			opacity: patch.opacity.unwrap_or(self.opacity),
			alignment: patch.alignment.unwrap_or(self.alignment),
			dash_array: patch.dash_array.clone().unwrap_or_else(|| self.dash_array.clone()),
		}
	}
}

// ====
// Text
// ====

/// Character level text styling. A `None` field is unset or mixed across the text run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterStyle {
	pub post_script_name: Option<String>,
	pub text_size: Option<f64>,
	pub color: Option<Color>,
	pub tracking: Option<f64>,
	pub leading: Option<f64>,
}

impl CharacterStyle {
	/// Overwrite every field the patch sets.
	#[must_use]
	pub fn merge(&self, patch: &CharacterStyle) -> Self {
		Self {
			post_script_name: patch.post_script_name.clone().or_else(|| self.post_script_name.clone()),
			text_size: patch.text_size.or(self.text_size),
			color: patch.color.or(self.color),
			tracking: patch.tracking.or(self.tracking),
			leading: patch.leading.or(self.leading),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub enum TextAlignment {
	Left,
	Center,
	Right,
	Justify,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(default, rename_all = "camelCase")]
pub struct ParagraphStyle {
	pub alignment: Option<TextAlignment>,
	pub space_before: Option<f64>,
	pub space_after: Option<f64>,
}

impl ParagraphStyle {
	#[must_use]
	pub fn merge(&self, patch: &ParagraphStyle) -> Self {
		Self {
			alignment: patch.alignment.or(self.alignment),
			space_before: patch.space_before.or(self.space_before),
			space_after: patch.space_after.or(self.space_after),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(default, rename_all = "camelCase")]
pub struct Text {
	pub character_style: CharacterStyle,
	/// Style of the first character, which the editor shows when the run is mixed.
	pub first_character_style: CharacterStyle,
	pub paragraph_style: ParagraphStyle,
}
