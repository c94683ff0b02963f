use serde::Serialize;

use super::{HandlerResult, Mode, lasso};
use crate::coords::Coords;
use crate::engine::Engine;
use crate::geometry;
use crate::input::MousePosition;
use crate::model::{ItemReference, View};

/// A closed freehand selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreehandSelection {
    pub path_tiles: Vec<Coords>,
    pub items: Vec<ItemReference>,
}

pub(super) fn mousedown(engine: &mut Engine) -> HandlerResult {
    let position = engine.ui().mouse.position;
    let Mode::FreehandLasso { path, selection, is_dragging } = &mut engine.ui_mut().mode else {
        return Ok(());
    };
    let inside = selection
        .as_ref()
        .is_some_and(|s| geometry::is_point_in_polygon(position.tile, &s.path_tiles));
    if inside {
        *is_dragging = true;
    } else {
        *path = vec![position];
        *selection = None;
        *is_dragging = false;
    }
    Ok(())
}

pub(super) fn mousemove(engine: &mut Engine) -> HandlerResult {
    let throttle = engine.config().lasso_throttle_px;
    let mouse = engine.ui().mouse;
    let Mode::FreehandLasso { path, selection, is_dragging } = &mut engine.ui_mut().mode else {
        return Ok(());
    };
    if mouse.mousedown.is_none() {
        return Ok(());
    }
    if let (true, Some(selection)) = (*is_dragging, selection.as_ref()) {
        let items = selection.items.clone();
        engine.ui_mut().mode = Mode::drag_items(items);
        return Ok(());
    }

    let next = mouse.position;
    let far_enough = path.last().is_none_or(|last| {
        (next.screen.x - last.screen.x).abs() > throttle || (next.screen.y - last.screen.y).abs() > throttle
    });
    if far_enough {
        path.push(next);
    }
    Ok(())
}

/// Closing a path of at least three points selects what it encloses.
pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    let Mode::FreehandLasso { path, selection, .. } = &engine.ui().mode else {
        return Ok(());
    };
    let closed = if path.len() >= 3 && selection.is_none() {
        let path_tiles: Vec<Coords> = path.iter().map(|p| p.tile).collect();
        let items = items_in_polygon(engine.current_view()?, &path_tiles);
        Some(FreehandSelection { path_tiles, items })
    } else {
        None
    };
    if let Mode::FreehandLasso { selection, is_dragging, .. } = &mut engine.ui_mut().mode {
        if closed.is_some() {
            *selection = closed;
        }
        *is_dragging = false;
    }
    Ok(())
}

/// Entities enclosed by the polygon `path_tiles`.
pub(crate) fn items_in_polygon(view: &View, path_tiles: &[Coords]) -> Vec<ItemReference> {
    if path_tiles.len() < 3 {
        return Vec::new();
    }
    lasso::select(view, |tile| geometry::is_point_in_polygon(tile, path_tiles))
}
