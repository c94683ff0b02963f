//! Model items live outside any view. Deleting one leaves view items that
//! reference it in place.

#[cfg(test)]
#[path = "model_item_test.rs"]
mod model_item_test;

use super::{EntityKind, ReducerResult, State, position_of};
use crate::model::{ModelItem, PartialModelItem};

pub fn create_model_item(mut state: State, item: ModelItem) -> State {
    state.model.items.push(item);
    state
}

/// # Errors
///
/// Returns not-found if no model item has `id`.
pub fn update_model_item(mut state: State, id: &str, update: &PartialModelItem) -> ReducerResult {
    let index = position_of(&state.model.items, id, EntityKind::ModelItem, |i| i.id.as_str())?;
    update.apply(&mut state.model.items[index]);
    Ok(state)
}

/// # Errors
///
/// Returns not-found if no model item has `id`.
pub fn delete_model_item(mut state: State, id: &str) -> ReducerResult {
    let index = position_of(&state.model.items, id, EntityKind::ModelItem, |i| i.id.as_str())?;
    state.model.items.remove(index);
    Ok(state)
}

