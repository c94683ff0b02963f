#[cfg(test)]
#[path = "view_item_test.rs"]
mod view_item_test;

use super::{EntityKind, ReducerResult, State, connector, position_of, view_mut};
use crate::model::{PartialViewItem, ViewItem};

/// Place a model item in a view, at the front of the view's item list.
///
/// # Errors
///
/// Returns not-found if `view_id` is absent.
pub fn create_view_item(mut state: State, view_id: &str, item: ViewItem) -> ReducerResult {
    view_mut(&mut state.model, view_id)?.items.insert(0, item);
    Ok(state)
}

/// Apply a sparse update. A tile change resyncs every connector routed
/// through the item, chained connectors included.
///
/// # Errors
///
/// Returns not-found if the view or view item is absent.
pub fn update_view_item(mut state: State, view_id: &str, id: &str, update: &PartialViewItem) -> ReducerResult {
    let view = view_mut(&mut state.model, view_id)?;
    let index = position_of(&view.items, id, EntityKind::ViewItem, |i| i.id.as_str())?;
    update.apply(&mut view.items[index]);
    if update.tile.is_none() {
        return Ok(state);
    }
    let reached = view.connectors_reaching_item(id);
    for connector_id in &reached {
        state = connector::sync_connector(state, view_id, connector_id)?;
    }
    Ok(state)
}

/// Remove a view item together with every connector anchored to it, and every
/// connector chained onto one of those.
///
/// # Errors
///
/// Returns not-found if the view or view item is absent.
pub fn delete_view_item(mut state: State, view_id: &str, id: &str) -> ReducerResult {
    let view = view_mut(&mut state.model, view_id)?;
    let index = position_of(&view.items, id, EntityKind::ViewItem, |i| i.id.as_str())?;
    let removed = view.connectors_reaching_item(id);
    view.items.remove(index);
    view.connectors.retain(|c| !removed.contains(&c.id));
    for connector_id in &removed {
        tracing::debug!(%connector_id, view_item_id = %id, "removing connector with deleted view item");
        state.scene.connectors.remove(connector_id);
    }
    Ok(state)
}
