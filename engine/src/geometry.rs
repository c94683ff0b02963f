//! Tile-grid geometry: placement search, containment, connector routing, and
//! hit-testing against a view.
//!
//! All functions are pure. Exhausted searches and unresolvable anchors come
//! back as `None` or an empty path rather than an error.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::collections::HashSet;

use crate::consts::MAX_CONNECTOR_PATH_TILES;
use crate::coords::{Coords, TileRect};
use crate::model::{AnchorRef, Connector, ConnectorAnchor, Id, ItemReference, View, ViewItem};
use crate::scene::{ConnectorPath, Scene, text_box_end_tile};

const RING_DIRECTIONS: [Coords; 4] = [
    Coords::new(1, 0),  // right
    Coords::new(0, 1),  // down
    Coords::new(-1, 0), // left
    Coords::new(0, -1), // up
];

// =============================================================================
// PLACEMENT
// =============================================================================

/// Candidate tiles in search order: `target` first, then each square ring out
/// to `max_distance`.
///
/// A ring of radius `d` starts at `(target.x - d, target.y - d)` and walks
/// right, down, left and up, `2d` steps per side, yielding each tile after
/// the step. The ring's starting corner is therefore yielded last.
pub fn spiral(target: Coords, max_distance: i32) -> impl Iterator<Item = Coords> {
    let rings = (1..=max_distance.max(0)).flat_map(move |d| {
        let start = target - Coords::new(d, d);
        let side = usize::try_from(d).unwrap_or(0).saturating_mul(2);
        RING_DIRECTIONS
            .iter()
            .flat_map(move |&dir| std::iter::repeat_n(dir, side))
            .scan(start, |cur, dir| {
                *cur = *cur + dir;
                Some(*cur)
            })
    });
    std::iter::once(target).chain(rings)
}

/// Nearest tile to `target` for which `is_occupied` is false.
///
/// Returns `None` when every tile within `max_distance` rings is occupied.
pub fn find_nearest_unoccupied_tile(
    target: Coords,
    is_occupied: impl Fn(Coords) -> bool,
    max_distance: i32,
) -> Option<Coords> {
    spiral(target, max_distance).find(|&tile| !is_occupied(tile))
}

/// One member of a grouped placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTarget {
    pub id: Id,
    pub target: Coords,
}

/// Place a batch of items so none overlap each other or existing occupants.
///
/// Items are resolved greedily in input order. Tiles claimed earlier in the
/// batch count as occupied; tiles held only by an id in `exclude_ids` count as
/// free. Returns `None` if any item cannot be placed.
pub fn find_nearest_unoccupied_tiles_for_group<'a>(
    items: &[GroupTarget],
    occupant_at: impl Fn(Coords) -> Option<&'a str>,
    exclude_ids: &[&str],
    max_distance: i32,
) -> Option<Vec<Coords>> {
    let mut claimed: HashSet<Coords> = HashSet::new();
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        let tile = find_nearest_unoccupied_tile(
            item.target,
            |tile| claimed.contains(&tile) || occupant_at(tile).is_some_and(|id| !exclude_ids.contains(&id)),
            max_distance,
        )?;
        claimed.insert(tile);
        result.push(tile);
    }
    Some(result)
}

/// The view item standing on `tile`, if any.
#[must_use]
pub fn view_item_at(view: &View, tile: Coords) -> Option<&ViewItem> {
    view.items.iter().find(|i| i.tile == tile)
}

// =============================================================================
// CONTAINMENT
// =============================================================================

/// Ray-casting containment test. Polygons with fewer than three vertices
/// contain nothing.
#[must_use]
pub fn is_point_in_polygon(point: Coords, polygon: &[Coords]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let (x, y) = (f64::from(point.x), f64::from(point.y));
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (f64::from(polygon[i].x), f64::from(polygon[i].y));
        let (xj, yj) = (f64::from(polygon[j].x), f64::from(polygon[j].y));
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inclusive axis-aligned containment; the corner order does not matter.
#[must_use]
pub fn is_within_bounds(tile: Coords, a: Coords, b: Coords) -> bool {
    TileRect::new(a, b).contains(tile)
}

// =============================================================================
// CONNECTORS
// =============================================================================

/// Resolve an anchor to the tile it sits on.
///
/// Item refs resolve to the view item's tile, anchor refs are followed
/// transitively. Returns `None` for missing targets and reference cycles.
#[must_use]
pub fn resolve_anchor_tile(anchor: &ConnectorAnchor, view: &View) -> Option<Coords> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = anchor;
    loop {
        match &current.reference {
            AnchorRef::Tile(tile) => return Some(*tile),
            AnchorRef::Item(id) => return view.item(id).map(|i| i.tile),
            AnchorRef::Anchor(target) => {
                if !visited.insert(current.id.as_str()) {
                    return None;
                }
                current = find_anchor(view, target)?;
            }
        }
    }
}

/// Any anchor in the view with the given id.
#[must_use]
pub fn find_anchor<'a>(view: &'a View, anchor_id: &str) -> Option<&'a ConnectorAnchor> {
    view.connectors
        .iter()
        .flat_map(|c| c.anchors.iter())
        .find(|a| a.id == anchor_id)
}

/// Whether every anchor of `connector` resolves within `view`.
#[must_use]
pub fn connector_is_valid(connector: &Connector, view: &View) -> bool {
    connector
        .anchors
        .iter()
        .all(|a| resolve_anchor_tile(a, view).is_some())
}

/// Route a connector through its anchors.
///
/// Consecutive anchor tiles are joined by an L-shaped run, x first then y.
/// Tiles are global grid coordinates. Any unresolvable anchor, fewer than
/// two anchors, or a route longer than [`MAX_CONNECTOR_PATH_TILES`] yields
/// [`ConnectorPath::empty`].
#[must_use]
pub fn connector_path(connector: &Connector, view: &View) -> ConnectorPath {
    let tiles: Option<Vec<Coords>> = connector
        .anchors
        .iter()
        .map(|a| resolve_anchor_tile(a, view))
        .collect();
    match tiles {
        Some(tiles) if tiles.len() >= 2 => route(&tiles).unwrap_or_else(|| {
            tracing::warn!(connector_id = %connector.id, "connector span too long to route");
            ConnectorPath::empty()
        }),
        _ => ConnectorPath::empty(),
    }
}

/// L-route through a list of at least two waypoints. `None` when the route
/// would exceed [`MAX_CONNECTOR_PATH_TILES`].
fn route(waypoints: &[Coords]) -> Option<ConnectorPath> {
    let length = waypoints
        .windows(2)
        .fold(1_u64, |acc, pair| acc.saturating_add(u64::from(pair[0].manhattan(pair[1]))));
    if length > MAX_CONNECTOR_PATH_TILES {
        return None;
    }
    let mut tiles = Vec::with_capacity(usize::try_from(length).unwrap_or(0));
    tiles.push(waypoints[0]);
    let mut cur = waypoints[0];
    for &next in &waypoints[1..] {
        while cur.x != next.x {
            cur.x += if next.x > cur.x { 1 } else { -1 };
            tiles.push(cur);
        }
        while cur.y != next.y {
            cur.y += if next.y > cur.y { 1 } else { -1 };
            tiles.push(cur);
        }
    }
    let (from, to) = tiles
        .iter()
        .fold((waypoints[0], waypoints[0]), |(lo, hi), &t| (lo.min(t), hi.max(t)));
    Some(ConnectorPath { tiles, rectangle: TileRect::new(from, to) })
}

/// Index of the path tile nearest `tile` by Manhattan distance. Ties go to the
/// earliest index; an empty path gives 0.
#[must_use]
pub fn nearest_path_index(path: &ConnectorPath, tile: Coords) -> usize {
    path.tiles
        .iter()
        .enumerate()
        .min_by_key(|(i, t)| (t.manhattan(tile), *i))
        .map_or(0, |(i, _)| i)
}

/// Where a new anchor on `tile` belongs in `connector.anchors` so that anchors
/// stay sorted by their position along `path`.
#[must_use]
pub fn anchor_insert_position(connector: &Connector, view: &View, path: &ConnectorPath, tile: Coords) -> usize {
    let target = nearest_path_index(path, tile);
    connector
        .anchors
        .iter()
        .position(|a| resolve_anchor_tile(a, view).is_some_and(|t| nearest_path_index(path, t) > target))
        .unwrap_or(connector.anchors.len())
}

/// Path index a label at `position` percent sits on, clamped to the path.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn label_tile_index(path_len: usize, position: f64) -> usize {
    if path_len == 0 {
        return 0;
    }
    let last = path_len - 1;
    let index = ((position / 100.0) * last as f64).round();
    if index <= 0.0 { 0 } else { (index as usize).min(last) }
}

// =============================================================================
// HIT-TESTING
// =============================================================================

/// What occupies `tile` in the view, in priority order: view item, text box,
/// connector path, rectangle.
#[must_use]
pub fn item_at_tile(view: &View, scene: &Scene, tile: Coords) -> Option<ItemReference> {
    if let Some(item) = view_item_at(view, tile) {
        return Some(ItemReference::item(item.id.clone()));
    }
    if let Some(text_box) = view.text_boxes.iter().find(|t| {
        scene
            .text_box_size(&t.id)
            .is_some_and(|size| is_within_bounds(tile, t.tile, text_box_end_tile(t, size)))
    }) {
        return Some(ItemReference::text_box(text_box.id.clone()));
    }
    if let Some(connector) = view
        .connectors
        .iter()
        .find(|c| scene.connector_path(&c.id).is_some_and(|p| p.tiles.contains(&tile)))
    {
        return Some(ItemReference::connector(connector.id.clone()));
    }
    view.rectangles
        .iter()
        .find(|r| is_within_bounds(tile, r.from, r.to))
        .map(|r| ItemReference::rectangle(r.id.clone()))
}

/// A connector anchor resolving to `tile`, skipping the connector `exclude`.
#[must_use]
pub fn anchor_at_tile<'a>(view: &'a View, tile: Coords, exclude: Option<&str>) -> Option<&'a ConnectorAnchor> {
    view.connectors
        .iter()
        .filter(|c| exclude != Some(c.id.as_str()))
        .flat_map(|c| c.anchors.iter())
        .find(|a| resolve_anchor_tile(a, view) == Some(tile))
}
