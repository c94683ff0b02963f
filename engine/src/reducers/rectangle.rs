//! Rectangles carry no scene-derived data.

#[cfg(test)]
#[path = "rectangle_test.rs"]
mod rectangle_test;

use super::{EntityKind, ReducerResult, State, position_of, view_mut};
use crate::model::{PartialRectangle, Rectangle};

/// # Errors
///
/// Returns not-found if `view_id` is absent.
pub fn create_rectangle(mut state: State, view_id: &str, rectangle: Rectangle) -> ReducerResult {
    view_mut(&mut state.model, view_id)?.rectangles.insert(0, rectangle);
    Ok(state)
}

/// # Errors
///
/// Returns not-found if the view or rectangle is absent.
pub fn update_rectangle(mut state: State, view_id: &str, id: &str, update: &PartialRectangle) -> ReducerResult {
    let view = view_mut(&mut state.model, view_id)?;
    let index = position_of(&view.rectangles, id, EntityKind::Rectangle, |r| r.id.as_str())?;
    update.apply(&mut view.rectangles[index]);
    Ok(state)
}

/// # Errors
///
/// Returns not-found if the view or rectangle is absent.
pub fn delete_rectangle(mut state: State, view_id: &str, id: &str) -> ReducerResult {
    let view = view_mut(&mut state.model, view_id)?;
    let index = position_of(&view.rectangles, id, EntityKind::Rectangle, |r| r.id.as_str())?;
    view.rectangles.remove(index);
    Ok(state)
}
