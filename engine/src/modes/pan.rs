use super::{HandlerResult, Mode};
use crate::engine::Engine;

pub(super) fn mousemove(engine: &mut Engine) -> HandlerResult {
    if !matches!(engine.ui().mode, Mode::Pan { .. }) {
        return Ok(());
    }
    let mouse = engine.ui().mouse;
    if mouse.mousedown.is_none() {
        return Ok(());
    }
    if let Some(delta) = mouse.delta {
        let scroll = &mut engine.ui_mut().scroll;
        scroll.position = scroll.position + delta.screen;
    }
    Ok(())
}

pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    if let Mode::Pan { return_to_cursor: true } = engine.ui().mode {
        engine.ui_mut().mode = engine.neutral_mode();
    }
    Ok(())
}
