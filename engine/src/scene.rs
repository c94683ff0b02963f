//! Derived geometry for the current view.
//!
//! The scene is never persisted. It is rebuilt from the model whenever a
//! connector's anchors or a text box's content change, and wholesale on load
//! or view switch.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FONT_SIZE, GLYPH_WIDTH_RATIO, TEXT_BOX_PADDING};
use crate::coords::{Coords, Size, TileRect};
use crate::model::{Id, TextBox, TextOrientation};

/// Tile path of a connector plus its bounding rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectorPath {
    pub tiles: Vec<Coords>,
    pub rectangle: TileRect,
}

impl ConnectorPath {
    /// The path of a connector whose anchors could not be resolved.
    #[must_use]
    pub fn empty() -> Self {
        Self { tiles: Vec::new(), rectangle: TileRect::new(Coords::zero(), Coords::zero()) }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneConnector {
    pub path: ConnectorPath,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneTextBox {
    pub size: Size,
}

/// Scene state keyed by entity id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub connectors: HashMap<Id, SceneConnector>,
    pub text_boxes: HashMap<Id, SceneTextBox>,
}

impl Scene {
    #[must_use]
    pub fn connector_path(&self, id: &str) -> Option<&ConnectorPath> {
        self.connectors.get(id).map(|c| &c.path)
    }

    #[must_use]
    pub fn text_box_size(&self, id: &str) -> Option<Size> {
        self.text_boxes.get(id).map(|t| t.size)
    }
}

/// Measure a text box in tile units.
///
/// Width scales with the character count, height with the font size. Both
/// include padding on each side.
#[must_use]
pub fn text_box_size(content: &str, font_size: Option<f64>) -> Size {
    let font_size = font_size.unwrap_or(DEFAULT_FONT_SIZE);
    #[allow(clippy::cast_precision_loss)]
    let chars = content.chars().count() as f64;
    Size {
        width: chars * font_size * GLYPH_WIDTH_RATIO + TEXT_BOX_PADDING * 2.0,
        height: font_size + TEXT_BOX_PADDING * 2.0,
    }
}

/// Last tile a text box covers along its orientation axis.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn text_box_end_tile(text_box: &TextBox, size: Size) -> Coords {
    let span = size.width.ceil() as i32;
    match text_box.orientation.unwrap_or_default() {
        TextOrientation::X => text_box.tile + Coords::new(span, 0),
        TextOrientation::Y => text_box.tile + Coords::new(0, -span),
    }
}
