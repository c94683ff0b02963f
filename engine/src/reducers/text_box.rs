#[cfg(test)]
#[path = "text_box_test.rs"]
mod text_box_test;

use super::{EntityKind, NotFoundError, ReducerResult, State, position_of, view_mut};
use crate::model::{PartialTextBox, TextBox};
use crate::scene::{SceneTextBox, text_box_size};

/// Recompute a text box's measured size.
///
/// # Errors
///
/// Returns not-found if the view or text box is absent.
pub fn sync_text_box(mut state: State, view_id: &str, id: &str) -> ReducerResult {
    let view = state
        .model
        .view(view_id)
        .ok_or_else(|| NotFoundError::new(EntityKind::View, view_id))?;
    let text_box = view
        .text_box(id)
        .ok_or_else(|| NotFoundError::new(EntityKind::TextBox, id))?;
    let size = text_box_size(&text_box.content, text_box.font_size);
    state.scene.text_boxes.insert(id.to_string(), SceneTextBox { size });
    Ok(state)
}

/// # Errors
///
/// Returns not-found if `view_id` is absent.
pub fn create_text_box(mut state: State, view_id: &str, text_box: TextBox) -> ReducerResult {
    let id = text_box.id.clone();
    view_mut(&mut state.model, view_id)?.text_boxes.insert(0, text_box);
    sync_text_box(state, view_id, &id)
}

/// Apply a sparse update, remeasuring only when content or font size change.
///
/// # Errors
///
/// Returns not-found if the view or text box is absent.
pub fn update_text_box(mut state: State, view_id: &str, id: &str, update: &PartialTextBox) -> ReducerResult {
    let view = view_mut(&mut state.model, view_id)?;
    let index = position_of(&view.text_boxes, id, EntityKind::TextBox, |t| t.id.as_str())?;
    update.apply(&mut view.text_boxes[index]);
    if update.affects_size() {
        return sync_text_box(state, view_id, id);
    }
    Ok(state)
}

/// Remove a text box and its scene entry.
///
/// # Errors
///
/// Returns not-found if the view or text box is absent.
pub fn delete_text_box(mut state: State, view_id: &str, id: &str) -> ReducerResult {
    let view = view_mut(&mut state.model, view_id)?;
    let index = position_of(&view.text_boxes, id, EntityKind::TextBox, |t| t.id.as_str())?;
    view.text_boxes.remove(index);
    state.scene.text_boxes.remove(id);
    Ok(state)
}
