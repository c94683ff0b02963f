use serde::Serialize;

use super::{HandlerResult, Mode};
use crate::coords::{Coords, TileRect};
use crate::engine::Engine;
use crate::geometry;
use crate::model::{ItemReference, View};

/// A finished or in-progress rectangular selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LassoSelection {
    pub start_tile: Coords,
    pub end_tile: Coords,
    pub items: Vec<ItemReference>,
}

pub(super) fn mousedown(engine: &mut Engine) -> HandlerResult {
    let tile = engine.ui().mouse.position.tile;
    let Mode::Lasso { selection, is_dragging } = &mut engine.ui_mut().mode else {
        return Ok(());
    };
    let inside = selection
        .as_ref()
        .is_some_and(|s| geometry::is_within_bounds(tile, s.start_tile, s.end_tile));
    if inside {
        *is_dragging = true;
    } else {
        *selection = None;
        *is_dragging = false;
    }
    Ok(())
}

pub(super) fn mousemove(engine: &mut Engine) -> HandlerResult {
    let Mode::Lasso { selection, is_dragging } = &engine.ui().mode else {
        return Ok(());
    };
    let mouse = engine.ui().mouse;
    let Some(press) = mouse.mousedown else {
        return Ok(());
    };
    if !mouse.has_moved_tile() {
        return Ok(());
    }
    if let (true, Some(selection)) = (*is_dragging, selection) {
        let items = selection.items.clone();
        engine.ui_mut().mode = Mode::drag_items(items);
        return Ok(());
    }

    let (start_tile, end_tile) = (press.tile, mouse.position.tile);
    let items = items_in_bounds(engine.current_view()?, start_tile, end_tile);
    if let Mode::Lasso { selection, .. } = &mut engine.ui_mut().mode {
        *selection = Some(LassoSelection { start_tile, end_tile, items });
    }
    Ok(())
}

/// Releasing keeps the selection and disarms the drag.
pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    if let Mode::Lasso { is_dragging, .. } = &mut engine.ui_mut().mode {
        *is_dragging = false;
    }
    Ok(())
}

/// Items, text boxes by their anchor tile, and rectangles with all four
/// corners inside the bounds spanned by `a` and `b`.
pub(crate) fn items_in_bounds(view: &View, a: Coords, b: Coords) -> Vec<ItemReference> {
    let inside = |tile| geometry::is_within_bounds(tile, a, b);
    select(view, inside)
}

/// Entities of `view` accepted by `inside`. Rectangles need every corner
/// accepted.
pub(super) fn select(view: &View, inside: impl Fn(Coords) -> bool) -> Vec<ItemReference> {
    let items = view
        .items
        .iter()
        .filter(|i| inside(i.tile))
        .map(|i| ItemReference::item(i.id.clone()));
    let rectangles = view
        .rectangles
        .iter()
        .filter(|r| TileRect::new(r.from, r.to).corners().into_iter().all(&inside))
        .map(|r| ItemReference::rectangle(r.id.clone()));
    let text_boxes = view
        .text_boxes
        .iter()
        .filter(|t| inside(t.tile))
        .map(|t| ItemReference::text_box(t.id.clone()));
    items.chain(rectangles).chain(text_boxes).collect()
}
