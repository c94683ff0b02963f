use super::{HandlerResult, Mode, RectangleCorner};
use crate::coords::{Coords, TileRect};
use crate::engine::{Commit, Engine};
use crate::geometry;
use crate::input::ContextMenu;
use crate::model::{AnchorRef, ConnectorAnchor, Id, ItemKind, ItemReference, PartialConnector};
use crate::reducers::{EntityKind, NotFoundError, connector};

/// Entering with a candidate already recorded (e.g. from `PlaceIcon`)
/// replays the press so corner and context-menu handling still apply.
pub(super) fn entry(engine: &mut Engine) -> HandlerResult {
    match &engine.ui().mode {
        Mode::Cursor { mousedown_item: Some(_) } => mousedown(engine),
        _ => Ok(()),
    }
}

pub(super) fn mousedown(engine: &mut Engine) -> HandlerResult {
    if !matches!(engine.ui().mode, Mode::Cursor { .. }) {
        return Ok(());
    }
    let tile = engine.ui().mouse.position.tile;

    if let Some((id, corner)) = selected_rectangle_corner(engine, tile) {
        engine.ui_mut().mode = Mode::RectangleTransform { id, selected_anchor: Some(corner), moved: false };
        return Ok(());
    }

    let item = engine.item_at(tile);
    let ui = engine.ui_mut();
    if item.is_none() {
        ui.close_item_controls();
        ui.context_menu = Some(ContextMenu::Empty { tile });
    }
    ui.mode = Mode::Cursor { mousedown_item: item };
    Ok(())
}

pub(super) fn mousemove(engine: &mut Engine) -> HandlerResult {
    let Mode::Cursor { mousedown_item } = &engine.ui().mode else {
        return Ok(());
    };
    let Some(press) = engine.ui().mouse.mousedown else {
        return Ok(());
    };
    if !engine.ui().mouse.has_moved_tile() {
        return Ok(());
    }

    let next = match mousedown_item.clone() {
        Some(item) if item.kind == ItemKind::Connector => {
            let (anchor_id, created) = anchor_for_drag(engine, &item.id, press.tile)?;
            Mode::DragItems {
                items: vec![ItemReference::connector_anchor(anchor_id)],
                is_initial_movement: true,
                step_open: created,
            }
        }
        Some(item) => Mode::drag_items(vec![item]),
        None => Mode::Pan { return_to_cursor: true },
    };
    engine.ui_mut().mode = next;
    Ok(())
}

pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    let has_moved = engine.ui().mouse.mousedown.is_some_and(|press| press.tile != engine.ui().mouse.position.tile);
    let Mode::Cursor { mousedown_item } = &mut engine.ui_mut().mode else {
        return Ok(());
    };
    let candidate = mousedown_item.take();
    let ui = engine.ui_mut();
    match candidate {
        Some(item) if !has_moved && item.kind != ItemKind::ConnectorAnchor => ui.open_item_controls(item),
        _ => ui.close_item_controls(),
    }
    Ok(())
}

/// Corner of the rectangle whose controls are open, if the press hit one.
fn selected_rectangle_corner(engine: &Engine, tile: Coords) -> Option<(Id, RectangleCorner)> {
    let selected = engine.ui().item_controls.as_ref()?.item()?;
    if selected.kind != ItemKind::Rectangle {
        return None;
    }
    let rectangle = engine.model().view(&engine.ui().view)?.rectangle(&selected.id)?;
    let corners = TileRect::new(rectangle.from, rectangle.to).corners();
    let index = corners.iter().position(|c| *c == tile)?;
    Some((rectangle.id.clone(), RectangleCorner::from_index(index)))
}

/// The anchor of `connector_id` on the press tile, inserting a new tile
/// anchor in path order when there is none. Returns the anchor id and
/// whether it was created.
fn anchor_for_drag(engine: &mut Engine, connector_id: &str, tile: Coords) -> Result<(Id, bool), NotFoundError> {
    let view = engine.current_view()?;
    let connector = view
        .connector(connector_id)
        .ok_or_else(|| NotFoundError::new(EntityKind::Connector, connector_id))?;
    if let Some(existing) = connector
        .anchors
        .iter()
        .find(|a| geometry::resolve_anchor_tile(a, view) == Some(tile))
    {
        return Ok((existing.id.clone(), false));
    }

    let path = engine
        .scene()
        .connector_path(connector_id)
        .cloned()
        .unwrap_or_else(|| geometry::connector_path(connector, view));
    let index = geometry::anchor_insert_position(connector, view, &path, tile);
    let anchor = ConnectorAnchor::new(AnchorRef::Tile(tile));
    let anchor_id = anchor.id.clone();
    let mut anchors = connector.anchors.clone();
    anchors.insert(index, anchor);

    let update = PartialConnector::anchors(anchors);
    engine.commit(Commit::Step, |state, view_id| {
        connector::update_connector(state, view_id, connector_id, &update)
    })?;
    Ok((anchor_id, true))
}
