//! Shared numeric constants and defaults for the engine crate.

// ── History ─────────────────────────────────────────────────────

/// Number of snapshots each store keeps before the oldest is dropped.
pub const MAX_HISTORY_SIZE: usize = 50;

// ── Placement ───────────────────────────────────────────────────

/// Number of square rings the nearest-unoccupied-tile search walks.
pub const DEFAULT_SEARCH_DISTANCE: i32 = 10;

// ── Connectors ──────────────────────────────────────────────────

/// Longest connector path that is routed. Longer spans give an empty path.
pub const MAX_CONNECTOR_PATH_TILES: u64 = 100_000;

// ── Lasso ───────────────────────────────────────────────────────

/// Minimum screen-space distance (pixels, per axis) between freehand lasso points.
pub const FREEHAND_THROTTLE_PX: f64 = 5.0;

// ── Text boxes ──────────────────────────────────────────────────

/// Default font size of a text box, in tile units.
pub const DEFAULT_FONT_SIZE: f64 = 0.6;

/// Default content of a text box created from the keyboard.
pub const DEFAULT_TEXT_BOX_CONTENT: &str = "Text";

/// Padding around text box content on every side, in tile units.
pub const TEXT_BOX_PADDING: f64 = 0.2;

/// Average glyph advance as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

// ── Model defaults ──────────────────────────────────────────────

/// Id of the color every model starts with.
pub const DEFAULT_COLOR_ID: &str = "__DEFAULT__";

/// Value of the default color.
pub const DEFAULT_COLOR_VALUE: &str = "#a5b8f3";

/// Name given to model items placed from the icon palette.
pub const DEFAULT_ITEM_NAME: &str = "Untitled";

/// Name given to a view created because a loaded model had none.
pub const DEFAULT_VIEW_NAME: &str = "Untitled view";

/// Title of an empty model.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Stroke width of a connector when the model does not set one.
pub const DEFAULT_CONNECTOR_WIDTH: f64 = 10.0;
