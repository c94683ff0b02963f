//! Keyboard shortcuts: Escape cancellation, undo/redo chords, and tool
//! hotkeys.

use super::{HandlerResult, Mode};
use crate::config::{ConnectorInteractionMode, HotkeyProfile};
use crate::consts::{DEFAULT_FONT_SIZE, DEFAULT_TEXT_BOX_CONTENT};
use crate::engine::{Commit, Engine};
use crate::input::{ItemControls, Key, Modifiers, Tool};
use crate::model::{TextBox, TextOrientation, generate_id};
use crate::reducers::{connector, rectangle, text_box};

/// Tool bound to `key` under `profile`, if any. Matching ignores case.
#[must_use]
pub fn hotkey_tool(profile: HotkeyProfile, key: &str) -> Option<Tool> {
    let bindings: &[(&str, Tool)] = match profile {
        HotkeyProfile::Qwerty => &[
            ("q", Tool::Select),
            ("w", Tool::Pan),
            ("e", Tool::AddItem),
            ("r", Tool::Rectangle),
            ("t", Tool::Connector),
            ("y", Tool::Text),
            ("l", Tool::Lasso),
            ("f", Tool::FreehandLasso),
        ],
        HotkeyProfile::Smnrct => &[
            ("s", Tool::Select),
            ("m", Tool::Pan),
            ("n", Tool::AddItem),
            ("r", Tool::Rectangle),
            ("c", Tool::Connector),
            ("t", Tool::Text),
            ("l", Tool::Lasso),
            ("f", Tool::FreehandLasso),
        ],
        HotkeyProfile::None => &[],
    };
    let key = key.to_lowercase();
    bindings.iter().find(|(k, _)| *k == key).map(|(_, tool)| *tool)
}

pub(crate) fn key_down(engine: &mut Engine, key: &Key, modifiers: Modifiers) -> HandlerResult {
    if key.is("Escape") {
        return escape(engine);
    }

    if modifiers.command() {
        match key.normalized().as_str() {
            "z" if modifiers.shift => {
                engine.redo();
            }
            "z" => {
                engine.undo();
            }
            "y" => {
                engine.redo();
            }
            _ => {}
        }
        return Ok(());
    }

    match hotkey_tool(engine.config().hotkeys, &key.0) {
        Some(tool) => activate(engine, tool),
        None => Ok(()),
    }
}

/// Close item controls, or else cancel the connector or rectangle being
/// drawn by deleting it.
fn escape(engine: &mut Engine) -> HandlerResult {
    if engine.ui().item_controls.is_some() {
        engine.ui_mut().close_item_controls();
        return Ok(());
    }

    match engine.ui().mode.clone() {
        Mode::Connector { id: Some(id), is_connecting, .. } => {
            let in_progress = match engine.config().connector_mode {
                ConnectorInteractionMode::Click => is_connecting,
                ConnectorInteractionMode::Drag => true,
            };
            if in_progress {
                tracing::debug!(connector_id = %id, "connector cancelled");
                engine.ui_mut().mode = Mode::connector();
                engine.commit(Commit::Amend, |s, v| connector::delete_connector(s, v, &id))?;
            }
        }
        Mode::RectangleDraw { id: Some(id) } => {
            tracing::debug!(rectangle_id = %id, "rectangle cancelled");
            engine.ui_mut().mode = Mode::RectangleDraw { id: None };
            engine.commit(Commit::Amend, |s, v| rectangle::delete_rectangle(s, v, &id))?;
        }
        _ => {}
    }
    Ok(())
}

/// Switch to `tool`. In runtime mode only `Select` is honoured.
pub(crate) fn activate(engine: &mut Engine, tool: Tool) -> HandlerResult {
    if engine.ui().is_runtime {
        if tool == Tool::Select {
            engine.ui_mut().mode = Mode::runtime_cursor();
        }
        return Ok(());
    }

    match tool {
        Tool::Select => engine.ui_mut().mode = Mode::cursor(),
        Tool::Pan => {
            let ui = engine.ui_mut();
            ui.mode = Mode::Pan { return_to_cursor: false };
            ui.close_item_controls();
        }
        Tool::AddItem => {
            let ui = engine.ui_mut();
            ui.item_controls = Some(ItemControls::AddItem);
            ui.mode = Mode::PlaceIcon { id: None };
        }
        Tool::Rectangle => engine.ui_mut().mode = Mode::RectangleDraw { id: None },
        Tool::Connector => engine.ui_mut().mode = Mode::connector(),
        Tool::Text => {
            let created = TextBox {
                id: generate_id(),
                tile: engine.ui().mouse.position.tile,
                content: DEFAULT_TEXT_BOX_CONTENT.to_string(),
                font_size: Some(DEFAULT_FONT_SIZE),
                orientation: Some(TextOrientation::X),
            };
            let id = created.id.clone();
            engine.commit(Commit::Step, |s, v| text_box::create_text_box(s, v, created))?;
            engine.ui_mut().mode = Mode::TextBox { id };
        }
        Tool::Lasso => engine.ui_mut().mode = Mode::lasso(),
        Tool::FreehandLasso => engine.ui_mut().mode = Mode::freehand_lasso(),
    }
    Ok(())
}
