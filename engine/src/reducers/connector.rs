#[cfg(test)]
#[path = "connector_test.rs"]
mod connector_test;

use super::{EntityKind, NotFoundError, ReducerResult, State, position_of, view_mut};
use crate::geometry;
use crate::model::{Connector, PartialConnector};
use crate::scene::SceneConnector;

/// Recompute a connector's path. Unresolvable anchors give an empty path.
///
/// # Errors
///
/// Returns not-found if the view or connector is absent.
pub fn sync_connector(mut state: State, view_id: &str, id: &str) -> ReducerResult {
    let view = state
        .model
        .view(view_id)
        .ok_or_else(|| NotFoundError::new(EntityKind::View, view_id))?;
    let connector = view
        .connector(id)
        .ok_or_else(|| NotFoundError::new(EntityKind::Connector, id))?;
    let path = geometry::connector_path(connector, view);
    if path.is_empty() {
        tracing::debug!(connector_id = %id, "connector path unresolved");
    }
    state.scene.connectors.insert(id.to_string(), SceneConnector { path });
    Ok(state)
}

/// Insert a connector at the front of the view's list and compute its path.
///
/// # Errors
///
/// Returns not-found if `view_id` is absent.
pub fn create_connector(mut state: State, view_id: &str, connector: Connector) -> ReducerResult {
    let id = connector.id.clone();
    view_mut(&mut state.model, view_id)?.connectors.insert(0, connector);
    sync_connector(state, view_id, &id)
}

/// Apply a sparse update. Paths are recomputed only when the update carries
/// anchors, for this connector and every connector chained onto it.
///
/// # Errors
///
/// Returns not-found if the view or connector is absent.
pub fn update_connector(mut state: State, view_id: &str, id: &str, update: &PartialConnector) -> ReducerResult {
    let view = view_mut(&mut state.model, view_id)?;
    let index = position_of(&view.connectors, id, EntityKind::Connector, |c| c.id.as_str())?;
    update.apply(&mut view.connectors[index]);
    if update.anchors.is_none() {
        return Ok(state);
    }
    let reached = view.connectors_chained_to(id);
    for connector_id in &reached {
        state = sync_connector(state, view_id, connector_id)?;
    }
    Ok(state)
}

/// Remove a connector and its scene entry, along with every connector chained
/// onto one of its anchors.
///
/// # Errors
///
/// Returns not-found if the view or connector is absent.
pub fn delete_connector(mut state: State, view_id: &str, id: &str) -> ReducerResult {
    let view = view_mut(&mut state.model, view_id)?;
    position_of(&view.connectors, id, EntityKind::Connector, |c| c.id.as_str())?;
    let removed = view.connectors_chained_to(id);
    view.connectors.retain(|c| !removed.contains(&c.id));
    for connector_id in &removed {
        if connector_id != id {
            tracing::debug!(%connector_id, upstream_id = %id, "removing connector chained to deleted connector");
        }
        state.scene.connectors.remove(connector_id);
    }
    Ok(state)
}
