//! Connector tool.
//!
//! In `click` mode the first press creates a connector with both anchors on
//! the pressed spot and starts connecting; moves drag the free end and the
//! second press pins it. In `drag` mode the press creates the connector, moves
//! drag the free end and the release finishes it. Either way the whole
//! connector is one undo step. Connectors ending on empty tiles are kept.

use super::{HandlerResult, Mode};
use crate::config::ConnectorInteractionMode;
use crate::consts::DEFAULT_CONNECTOR_WIDTH;
use crate::engine::{Commit, Engine};
use crate::model::{AnchorRef, Connector, ConnectorAnchor, ItemKind, PartialConnector, generate_id};
use crate::reducers::connector;

pub(super) fn mousedown(engine: &mut Engine) -> HandlerResult {
    let Mode::Connector { id, start_anchor, .. } = &engine.ui().mode else {
        return Ok(());
    };
    let finishing = engine.config().connector_mode == ConnectorInteractionMode::Click && start_anchor.is_some();
    if !finishing {
        return start(engine);
    }
    let Some(id) = id.clone() else {
        return Ok(());
    };
    if engine.current_view()?.connector(&id).is_none() {
        tracing::debug!(connector_id = %id, "connector vanished before second click");
        engine.ui_mut().mode = Mode::connector();
        return Ok(());
    }
    move_free_end(engine, &id)?;
    engine.ui_mut().mode = Mode::connector();
    Ok(())
}

pub(super) fn mousemove(engine: &mut Engine) -> HandlerResult {
    let Mode::Connector { id: Some(id), is_connecting, .. } = &engine.ui().mode else {
        return Ok(());
    };
    if !engine.ui().mouse.has_moved_tile() {
        return Ok(());
    }
    let live = engine.config().connector_mode == ConnectorInteractionMode::Drag || *is_connecting;
    if !live {
        return Ok(());
    }
    let id = id.clone();
    if engine.current_view()?.connector(&id).is_none() {
        tracing::debug!(connector_id = %id, "connector vanished mid-gesture");
        engine.ui_mut().mode = Mode::connector();
        return Ok(());
    }
    move_free_end(engine, &id)
}

pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    let Mode::Connector { id: Some(_), .. } = &engine.ui().mode else {
        return Ok(());
    };
    if engine.config().connector_mode == ConnectorInteractionMode::Drag {
        engine.ui_mut().mode = Mode::connector();
    }
    Ok(())
}

/// Create a two-anchor connector on the pointer and begin connecting.
fn start(engine: &mut Engine) -> HandlerResult {
    let reference = anchor_under_pointer(engine);
    let color = engine.model().colors.first().map(|c| c.id.clone());
    let mut created = Connector::new(
        generate_id(),
        vec![ConnectorAnchor::new(reference.clone()), ConnectorAnchor::new(reference.clone())],
    );
    created.color = color;
    created.width = Some(DEFAULT_CONNECTOR_WIDTH);
    let id = created.id.clone();

    engine.commit(Commit::Step, |s, v| connector::create_connector(s, v, created))?;
    tracing::debug!(connector_id = %id, "connector started");

    engine.ui_mut().mode = match engine.config().connector_mode {
        ConnectorInteractionMode::Click => Mode::Connector {
            id: Some(id),
            start_anchor: Some(reference),
            is_connecting: true,
        },
        ConnectorInteractionMode::Drag => Mode::Connector { id: Some(id), start_anchor: None, is_connecting: false },
    };
    Ok(())
}

/// Re-point the connector's second anchor at whatever is under the pointer.
fn move_free_end(engine: &mut Engine, id: &str) -> HandlerResult {
    let reference = anchor_under_pointer(engine);
    engine.commit(Commit::Amend, |s, v| {
        let anchors = s.model.view(v).and_then(|view| view.connector(id)).map(|current| {
            let mut anchors = current.anchors.clone();
            let end = ConnectorAnchor::new(reference);
            if anchors.len() > 1 {
                anchors[1] = end;
            } else {
                anchors.push(end);
            }
            anchors
        });
        let update = anchors.map(PartialConnector::anchors).unwrap_or_default();
        connector::update_connector(s, v, id, &update)
    })
}

/// Anchor target for the pointer tile: the view item there, else the tile.
fn anchor_under_pointer(engine: &Engine) -> AnchorRef {
    let tile = engine.ui().mouse.position.tile;
    match engine.item_at(tile) {
        Some(item) if item.kind == ItemKind::Item => AnchorRef::Item(item.id),
        _ => AnchorRef::Tile(tile),
    }
}
