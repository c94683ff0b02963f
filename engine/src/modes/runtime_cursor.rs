use super::{HandlerResult, Mode};
use crate::engine::Engine;

pub(super) fn mousedown(engine: &mut Engine) -> HandlerResult {
    if !matches!(engine.ui().mode, Mode::RuntimeCursor { .. }) {
        return Ok(());
    }
    let item = engine.item_at(engine.ui().mouse.position.tile);
    let ui = engine.ui_mut();
    if item.is_none() {
        ui.close_item_controls();
    }
    ui.mode = Mode::RuntimeCursor { mousedown_item: item };
    Ok(())
}

/// Releasing over a recorded item reports it to the host. Nothing is written
/// to the model or scene.
pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    let Mode::RuntimeCursor { mousedown_item } = &mut engine.ui_mut().mode else {
        return Ok(());
    };
    if let Some(item) = mousedown_item.take() {
        let tile = engine.ui().mouse.position.tile;
        engine.emit_runtime_action(&item, tile);
    }
    Ok(())
}
