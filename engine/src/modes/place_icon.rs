use super::{HandlerResult, Mode};
use crate::consts::DEFAULT_ITEM_NAME;
use crate::engine::Engine;
use crate::geometry;
use crate::model::{ModelItem, ViewItem, generate_id};

/// A press with no icon chosen hands over to the cursor, carrying the item
/// under the pointer as its candidate.
pub(super) fn mousedown(engine: &mut Engine) -> HandlerResult {
    let Mode::PlaceIcon { id: None } = engine.ui().mode else {
        return Ok(());
    };
    let item = engine.item_at(engine.ui().mouse.position.tile);
    let ui = engine.ui_mut();
    ui.mode = Mode::Cursor { mousedown_item: item };
    ui.close_item_controls();
    Ok(())
}

pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    let Mode::PlaceIcon { id } = &engine.ui().mode else {
        return Ok(());
    };
    if let Some(icon) = id.clone() {
        let drop = engine.ui().mouse.position.tile;
        let search_distance = engine.config().search_distance;
        let target = {
            let view = engine.current_view()?;
            geometry::find_nearest_unoccupied_tile(drop, |t| geometry::view_item_at(view, t).is_some(), search_distance)
        };
        match target {
            Some(tile) => {
                let id = generate_id();
                let model_item = ModelItem {
                    id: id.clone(),
                    name: DEFAULT_ITEM_NAME.to_string(),
                    description: None,
                    icon: Some(icon),
                };
                engine.place_icon(model_item, ViewItem { id, tile, label_height: None })?;
            }
            None => tracing::debug!(tile = ?drop, "no free tile to place icon"),
        }
    }
    if let Mode::PlaceIcon { id } = &mut engine.ui_mut().mode {
        *id = None;
    }
    Ok(())
}
