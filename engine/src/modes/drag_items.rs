use super::{HandlerResult, Mode};
use crate::coords::Coords;
use crate::engine::{Commit, Engine};
use crate::geometry::{self, GroupTarget};
use crate::model::{
    AnchorRef, ConnectorAnchor, Id, ItemKind, ItemReference, PartialConnector, PartialRectangle, PartialTextBox,
    PartialViewItem, View,
};
use crate::reducers::{EntityKind, NotFoundError, connector, rectangle, text_box, view_item};

pub(super) fn mousemove(engine: &mut Engine) -> HandlerResult {
    let Mode::DragItems { items, is_initial_movement, step_open } = &engine.ui().mode else {
        return Ok(());
    };
    let mouse = engine.ui().mouse;
    let Some(press) = mouse.mousedown else {
        return Ok(());
    };
    let tile = mouse.position.tile;
    let delta = if *is_initial_movement {
        tile - press.tile
    } else if let Some(delta) = mouse.delta {
        delta.tile
    } else {
        return Ok(());
    };
    if delta.is_zero() {
        return Ok(());
    }

    let items = items.clone();
    let commit = if *step_open { Commit::Amend } else { Commit::Step };
    let committed = drag(engine, &items, tile, delta, commit)?;
    if let Mode::DragItems { is_initial_movement, step_open, .. } = &mut engine.ui_mut().mode {
        *is_initial_movement = false;
        *step_open |= committed;
    }
    Ok(())
}

pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    if !matches!(engine.ui().mode, Mode::DragItems { .. }) {
        return Ok(());
    }
    let ui = engine.ui_mut();
    ui.close_item_controls();
    ui.mode = Mode::cursor();
    Ok(())
}

/// Apply one step of movement. The first write uses `commit` and the rest
/// fold into it. Returns whether anything was written.
fn drag(
    engine: &mut Engine,
    items: &[ItemReference],
    tile: Coords,
    delta: Coords,
    mut commit: Commit,
) -> Result<bool, NotFoundError> {
    let mut committed = false;
    let nodes: Vec<&ItemReference> = items.iter().filter(|i| i.kind == ItemKind::Item).collect();
    if !nodes.is_empty() && move_view_items(engine, &nodes, delta, commit)? {
        commit = Commit::Amend;
        committed = true;
    }

    for item in items {
        match item.kind {
            ItemKind::Rectangle if nodes.is_empty() => {
                let (from, to) = {
                    let view = engine.current_view()?;
                    let r = view
                        .rectangle(&item.id)
                        .ok_or_else(|| NotFoundError::new(EntityKind::Rectangle, &item.id))?;
                    (r.from + delta, r.to + delta)
                };
                let update = PartialRectangle::bounds(from, to);
                engine.commit(commit, |s, v| rectangle::update_rectangle(s, v, &item.id, &update))?;
            }
            ItemKind::TextBox => {
                let moved = {
                    let view = engine.current_view()?;
                    let t = view
                        .text_box(&item.id)
                        .ok_or_else(|| NotFoundError::new(EntityKind::TextBox, &item.id))?;
                    t.tile + delta
                };
                let update = PartialTextBox::tile(moved);
                engine.commit(commit, |s, v| text_box::update_text_box(s, v, &item.id, &update))?;
            }
            ItemKind::ConnectorAnchor => {
                let (connector_id, update) = reattach_anchor(engine.current_view()?, &item.id, tile)?;
                engine.commit(commit, |s, v| connector::update_connector(s, v, &connector_id, &update))?;
            }
            _ => continue,
        }
        commit = Commit::Amend;
        committed = true;
    }
    Ok(committed)
}

/// Move every dragged view item by `delta`, resolving collisions as a group.
/// Nothing moves if any item has no free tile within the search distance.
/// Returns whether the items moved.
fn move_view_items(
    engine: &mut Engine,
    nodes: &[&ItemReference],
    delta: Coords,
    commit: Commit,
) -> Result<bool, NotFoundError> {
    let search_distance = engine.config().search_distance;
    let moves: Vec<(Id, Coords)> = {
        let view = engine.current_view()?;
        let targets = nodes
            .iter()
            .map(|node| {
                view.item(&node.id)
                    .map(|i| GroupTarget { id: i.id.clone(), target: i.tile + delta })
                    .ok_or_else(|| NotFoundError::new(EntityKind::ViewItem, &node.id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let exclude: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let Some(tiles) = geometry::find_nearest_unoccupied_tiles_for_group(
            &targets,
            |t| geometry::view_item_at(view, t).map(|i| i.id.as_str()),
            &exclude,
            search_distance,
        ) else {
            tracing::debug!(count = nodes.len(), "no free tiles for dragged items");
            return Ok(false);
        };
        targets.into_iter().map(|t| t.id).zip(tiles).collect()
    };

    engine.commit(commit, |mut state, view_id| {
        for (id, tile) in &moves {
            state = view_item::update_view_item(state, view_id, id, &PartialViewItem::tile(*tile))?;
        }
        Ok(state)
    })?;
    Ok(true)
}

/// Point the anchor `anchor_id` at whatever sits under `tile`: a view item,
/// another connector's anchor, or the bare tile.
fn reattach_anchor(view: &View, anchor_id: &str, tile: Coords) -> Result<(Id, PartialConnector), NotFoundError> {
    let parent = view
        .anchor_parent(anchor_id)
        .ok_or_else(|| NotFoundError::new(EntityKind::ConnectorAnchor, anchor_id))?;

    let reference = if let Some(item) = geometry::view_item_at(view, tile) {
        AnchorRef::Item(item.id.clone())
    } else if let Some(other) = geometry::anchor_at_tile(view, tile, Some(&parent.id)) {
        AnchorRef::Anchor(other.id.clone())
    } else {
        AnchorRef::Tile(tile)
    };

    let anchors = parent
        .anchors
        .iter()
        .map(|a| {
            if a.id == anchor_id {
                ConnectorAnchor { id: a.id.clone(), reference: reference.clone() }
            } else {
                a.clone()
            }
        })
        .collect();
    Ok((parent.id.clone(), PartialConnector::anchors(anchors)))
}
