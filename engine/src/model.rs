//! Persisted diagram model: items, views, and everything placed in a view.
//!
//! This module defines the data that survives a save/load cycle (`Model` and
//! its children), sparse-update types for incremental edits (`Partial*`), and
//! the load-time sanitation pass that drops connectors whose anchors no longer
//! resolve.
//!
//! Everything here is plain data. Scene-derived geometry lives in
//! [`crate::scene`], and all mutation goes through [`crate::reducers`].

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_COLOR_ID, DEFAULT_COLOR_VALUE, DEFAULT_CONNECTOR_WIDTH, DEFAULT_TITLE};
use crate::coords::Coords;
use crate::geometry;

/// Identifier of any model entity.
pub type Id = String;

/// Produce a fresh random identifier.
#[must_use]
pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// The persisted diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default)]
    pub version: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub icons: Vec<Icon>,
    #[serde(default)]
    pub items: Vec<ModelItem>,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            version: String::new(),
            title: DEFAULT_TITLE.to_string(),
            description: None,
            colors: vec![Color { id: DEFAULT_COLOR_ID.to_string(), value: DEFAULT_COLOR_VALUE.to_string() }],
            icons: Vec::new(),
            items: Vec::new(),
            views: Vec::new(),
        }
    }
}

impl Model {
    #[must_use]
    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&ModelItem> {
        self.items.iter().find(|i| i.id == id)
    }

    #[must_use]
    pub fn color(&self, id: &str) -> Option<&Color> {
        self.colors.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn icon(&self, id: &str) -> Option<&Icon> {
        self.icons.iter().find(|i| i.id == id)
    }

    /// Drop every connector whose anchors do not resolve within its view.
    ///
    /// Removal repeats until nothing changes, since dropping one connector can
    /// orphan anchors that chained onto it. Returns the `(view_id, connector_id)`
    /// pairs that were removed.
    pub fn remove_invalid_connectors(&mut self) -> Vec<(Id, Id)> {
        let mut removed = Vec::new();
        for view in &mut self.views {
            loop {
                let invalid: Vec<Id> = view
                    .connectors
                    .iter()
                    .filter(|c| !geometry::connector_is_valid(c, view))
                    .map(|c| c.id.clone())
                    .collect();
                if invalid.is_empty() {
                    break;
                }
                for id in invalid {
                    tracing::warn!(view_id = %view.id, connector_id = %id, "removing connector with unresolved anchors");
                    view.connectors.retain(|c| c.id != id);
                    removed.push((view.id.clone(), id));
                }
            }
        }
        removed
    }
}

/// A named color in the model palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: Id,
    pub value: String,
}

/// An icon that model items can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub id: Id,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_isometric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// An abstract entity, independent of where (or whether) it is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelItem {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Id>,
}

/// A named visual arrangement of model items and annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub items: Vec<ViewItem>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default)]
    pub rectangles: Vec<Rectangle>,
    #[serde(default)]
    pub text_boxes: Vec<TextBox>,
}

impl View {
    /// An empty view with the given id and name.
    #[must_use]
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            last_updated: None,
            items: Vec::new(),
            connectors: Vec::new(),
            rectangles: Vec::new(),
            text_boxes: Vec::new(),
        }
    }

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&ViewItem> {
        self.items.iter().find(|i| i.id == id)
    }

    #[must_use]
    pub fn connector(&self, id: &str) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn rectangle(&self, id: &str) -> Option<&Rectangle> {
        self.rectangles.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn text_box(&self, id: &str) -> Option<&TextBox> {
        self.text_boxes.iter().find(|t| t.id == id)
    }

    /// The connector owning the anchor with `anchor_id`, if any.
    #[must_use]
    pub fn anchor_parent(&self, anchor_id: &str) -> Option<&Connector> {
        self.connectors
            .iter()
            .find(|c| c.anchors.iter().any(|a| a.id == anchor_id))
    }

    /// Connectors with at least one anchor referencing the view item `item_id`.
    pub fn connectors_for_item<'a>(&'a self, item_id: &'a str) -> impl Iterator<Item = &'a Connector> + 'a {
        self.connectors.iter().filter(move |c| c.references_item(item_id))
    }

    /// Ids of every connector whose route depends on the view item `item_id`:
    /// those anchored to it directly plus everything chained onto them.
    #[must_use]
    pub fn connectors_reaching_item(&self, item_id: &str) -> Vec<Id> {
        self.chain_closure(self.connectors_for_item(item_id).collect())
    }

    /// Ids of `connector_id` and every connector chained, directly or through
    /// other connectors, onto one of its anchors. Empty if it is absent.
    #[must_use]
    pub fn connectors_chained_to(&self, connector_id: &str) -> Vec<Id> {
        self.chain_closure(self.connector(connector_id).into_iter().collect())
    }

    /// Grow `reached` with connectors holding an anchor ref into it until
    /// nothing new is added.
    fn chain_closure<'a>(&'a self, mut reached: Vec<&'a Connector>) -> Vec<Id> {
        let mut anchor_ids: HashSet<&str> = reached
            .iter()
            .flat_map(|c| c.anchors.iter().map(|a| a.id.as_str()))
            .collect();
        loop {
            let chained: Vec<&Connector> = self
                .connectors
                .iter()
                .filter(|c| !reached.iter().any(|r| r.id == c.id))
                .filter(|c| {
                    c.anchors
                        .iter()
                        .any(|a| matches!(&a.reference, AnchorRef::Anchor(t) if anchor_ids.contains(t.as_str())))
                })
                .collect();
            if chained.is_empty() {
                break;
            }
            anchor_ids.extend(chained.iter().flat_map(|c| c.anchors.iter().map(|a| a.id.as_str())));
            reached.extend(chained);
        }
        reached.into_iter().map(|c| c.id.clone()).collect()
    }
}

/// Placement of a model item on a tile within one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItem {
    /// Id of the model item this placement draws.
    pub id: Id,
    pub tile: Coords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_height: Option<f64>,
}

/// Dash pattern of a connector line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
}

/// Number of parallel strokes a connector is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorLineType {
    #[default]
    Single,
    Double,
    DoubleWithCircle,
}

/// What a connector anchor is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorRef {
    /// A view item, by model item id.
    Item(Id),
    /// A bare tile.
    Tile(Coords),
    /// Another connector's anchor, by anchor id.
    Anchor(Id),
}

/// One endpoint (or waypoint) of a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorAnchor {
    pub id: Id,
    #[serde(rename = "ref")]
    pub reference: AnchorRef,
}

impl ConnectorAnchor {
    /// A new anchor with a fresh id.
    #[must_use]
    pub fn new(reference: AnchorRef) -> Self {
        Self { id: generate_id(), reference }
    }
}

/// A text label placed along a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorLabel {
    pub id: Id,
    pub text: String,
    /// Percentage along the path, `0..=100`.
    pub position: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_line: Option<bool>,
}

/// A routed line between two or more anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ConnectorStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_type: Option<ConnectorLineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_arrow: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ConnectorLabel>,
    pub anchors: Vec<ConnectorAnchor>,
}

impl Connector {
    /// A connector with default styling and the given anchors.
    #[must_use]
    pub fn new(id: impl Into<Id>, anchors: Vec<ConnectorAnchor>) -> Self {
        Self {
            id: id.into(),
            color: None,
            custom_color: None,
            width: None,
            style: None,
            line_type: None,
            show_arrow: None,
            labels: Vec::new(),
            anchors,
        }
    }

    /// Stroke width, falling back to [`DEFAULT_CONNECTOR_WIDTH`].
    #[must_use]
    pub fn width_or_default(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_CONNECTOR_WIDTH)
    }

    /// Whether any anchor is attached to the view item `item_id`.
    #[must_use]
    pub fn references_item(&self, item_id: &str) -> bool {
        self.anchors
            .iter()
            .any(|a| matches!(&a.reference, AnchorRef::Item(id) if id == item_id))
    }
}

/// A tile-aligned rectangle annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    pub from: Coords,
    pub to: Coords,
}

/// Axis a text box's baseline runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextOrientation {
    #[default]
    X,
    Y,
}

/// A free-standing text annotation anchored at a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub id: Id,
    pub tile: Coords,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<TextOrientation>,
}

/// Kind of entity an [`ItemReference`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Item,
    Connector,
    ConnectorAnchor,
    Rectangle,
    #[serde(rename = "TEXTBOX")]
    TextBox,
}

/// A typed pointer at one entity in the current view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemReference {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub id: Id,
}

impl ItemReference {
    #[must_use]
    pub fn new(kind: ItemKind, id: impl Into<Id>) -> Self {
        Self { kind, id: id.into() }
    }

    #[must_use]
    pub fn item(id: impl Into<Id>) -> Self {
        Self::new(ItemKind::Item, id)
    }

    #[must_use]
    pub fn connector(id: impl Into<Id>) -> Self {
        Self::new(ItemKind::Connector, id)
    }

    #[must_use]
    pub fn rectangle(id: impl Into<Id>) -> Self {
        Self::new(ItemKind::Rectangle, id)
    }

    #[must_use]
    pub fn text_box(id: impl Into<Id>) -> Self {
        Self::new(ItemKind::TextBox, id)
    }

    #[must_use]
    pub fn connector_anchor(id: impl Into<Id>) -> Self {
        Self::new(ItemKind::ConnectorAnchor, id)
    }
}

// =============================================================================
// PARTIAL UPDATES
// =============================================================================

/// Sparse update for a model item. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialModelItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Id>,
}

impl PartialModelItem {
    pub fn apply(&self, item: &mut ModelItem) {
        if let Some(name) = &self.name {
            item.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        if let Some(icon) = &self.icon {
            item.icon = Some(icon.clone());
        }
    }
}

/// Sparse update for a view's own fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl PartialView {
    pub fn apply(&self, view: &mut View) {
        if let Some(name) = &self.name {
            view.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            view.description = Some(description.clone());
        }
        if let Some(last_updated) = &self.last_updated {
            view.last_updated = Some(last_updated.clone());
        }
    }
}

/// Sparse update for a view item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialViewItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<Coords>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_height: Option<f64>,
}

impl PartialViewItem {
    /// An update that only moves the item.
    #[must_use]
    pub fn tile(tile: Coords) -> Self {
        Self { tile: Some(tile), ..Default::default() }
    }

    pub fn apply(&self, item: &mut ViewItem) {
        if let Some(tile) = self.tile {
            item.tile = tile;
        }
        if let Some(h) = self.label_height {
            item.label_height = Some(h);
        }
    }
}

/// Sparse update for a connector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConnector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ConnectorStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_type: Option<ConnectorLineType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_arrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<ConnectorLabel>>,
    /// New anchor list. Its presence is what triggers a path resync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchors: Option<Vec<ConnectorAnchor>>,
}

impl PartialConnector {
    /// An update that only replaces the anchors.
    #[must_use]
    pub fn anchors(anchors: Vec<ConnectorAnchor>) -> Self {
        Self { anchors: Some(anchors), ..Default::default() }
    }

    pub fn apply(&self, connector: &mut Connector) {
        if let Some(color) = &self.color {
            connector.color = Some(color.clone());
        }
        if let Some(custom) = &self.custom_color {
            connector.custom_color = Some(custom.clone());
        }
        if let Some(width) = self.width {
            connector.width = Some(width);
        }
        if let Some(style) = self.style {
            connector.style = Some(style);
        }
        if let Some(line_type) = self.line_type {
            connector.line_type = Some(line_type);
        }
        if let Some(show_arrow) = self.show_arrow {
            connector.show_arrow = Some(show_arrow);
        }
        if let Some(labels) = &self.labels {
            connector.labels.clone_from(labels);
        }
        if let Some(anchors) = &self.anchors {
            connector.anchors.clone_from(anchors);
        }
    }
}

/// Sparse update for a rectangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialRectangle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Coords>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Coords>,
}

impl PartialRectangle {
    /// An update that replaces both corners.
    #[must_use]
    pub fn bounds(from: Coords, to: Coords) -> Self {
        Self { from: Some(from), to: Some(to), ..Default::default() }
    }

    pub fn apply(&self, rectangle: &mut Rectangle) {
        if let Some(color) = &self.color {
            rectangle.color = Some(color.clone());
        }
        if let Some(custom) = &self.custom_color {
            rectangle.custom_color = Some(custom.clone());
        }
        if let Some(from) = self.from {
            rectangle.from = from;
        }
        if let Some(to) = self.to {
            rectangle.to = to;
        }
    }
}

/// Sparse update for a text box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialTextBox {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<Coords>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<TextOrientation>,
}

impl PartialTextBox {
    /// An update that only moves the text box.
    #[must_use]
    pub fn tile(tile: Coords) -> Self {
        Self { tile: Some(tile), ..Default::default() }
    }

    /// Whether this update changes anything the scene size depends on.
    #[must_use]
    pub fn affects_size(&self) -> bool {
        self.content.is_some() || self.font_size.is_some()
    }

    pub fn apply(&self, text_box: &mut TextBox) {
        if let Some(tile) = self.tile {
            text_box.tile = tile;
        }
        if let Some(content) = &self.content {
            text_box.content.clone_from(content);
        }
        if let Some(size) = self.font_size {
            text_box.font_size = Some(size);
        }
        if let Some(orientation) = self.orientation {
            text_box.orientation = Some(orientation);
        }
    }
}
