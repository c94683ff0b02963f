use super::{HandlerResult, Mode};
use crate::engine::{Commit, Engine};
use crate::model::{ItemReference, PartialTextBox};
use crate::reducers::text_box;

/// The provisional text box follows the pointer until released.
pub(super) fn mousemove(engine: &mut Engine) -> HandlerResult {
    let Mode::TextBox { id } = &engine.ui().mode else {
        return Ok(());
    };
    if !engine.ui().mouse.has_moved_tile() {
        return Ok(());
    }
    let id = id.clone();
    let update = PartialTextBox::tile(engine.ui().mouse.position.tile);
    engine.commit(Commit::Amend, |s, v| text_box::update_text_box(s, v, &id, &update))
}

pub(super) fn mouseup(engine: &mut Engine) -> HandlerResult {
    let Mode::TextBox { id } = &engine.ui().mode else {
        return Ok(());
    };
    let item = ItemReference::text_box(id.clone());
    let ui = engine.ui_mut();
    ui.mode = Mode::cursor();
    ui.open_item_controls(item);
    Ok(())
}
