#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use super::{EntityKind, ReducerResult, State, position_of, view_mut};
use crate::model::{PartialView, View};

/// Append a view. The scene is left alone; it tracks the current view only.
pub fn create_view(mut state: State, view: View) -> State {
    state.model.views.push(view);
    state
}

/// # Errors
///
/// Returns not-found if `view_id` is absent.
pub fn update_view(mut state: State, view_id: &str, update: &PartialView) -> ReducerResult {
    update.apply(view_mut(&mut state.model, view_id)?);
    Ok(state)
}

/// Remove a view and any scene entries derived from it.
///
/// # Errors
///
/// Returns not-found if `view_id` is absent.
pub fn delete_view(mut state: State, view_id: &str) -> ReducerResult {
    let index = position_of(&state.model.views, view_id, EntityKind::View, |v| v.id.as_str())?;
    let view = state.model.views.remove(index);
    for connector in &view.connectors {
        state.scene.connectors.remove(&connector.id);
    }
    for text_box in &view.text_boxes {
        state.scene.text_boxes.remove(&text_box.id);
    }
    Ok(state)
}
