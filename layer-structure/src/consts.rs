// LAYER KIND CODES (as reported by the editor's `layerKind` descriptor key)
pub const LAYER_KIND_PIXEL: u8 = 1;
pub const LAYER_KIND_ADJUSTMENT: u8 = 2;
pub const LAYER_KIND_TEXT: u8 = 3;
pub const LAYER_KIND_VECTOR: u8 = 4;
pub const LAYER_KIND_SMART_OBJECT: u8 = 5;
pub const LAYER_KIND_GROUP: u8 = 7;
pub const LAYER_KIND_BACKGROUND: u8 = 12;
pub const LAYER_KIND_GROUP_END: u8 = 13;

// LAYER DEFAULTS
/// Opacity is stored as a percentage.
pub const DEFAULT_OPACITY: f64 = 100.;
pub const DEFAULT_STROKE_WIDTH: f64 = 1.;
/// The key origin type the editor reports for rounded rectangles; only those carry corner radii.
pub const KEY_ORIGIN_ROUNDED_RECT: u32 = 2;

// GEOMETRY
/// Areas at or below this are treated as empty.
pub const ZERO_AREA_EPSILON: f64 = 1e-10;
