//! Input model: raw events, modifier keys, mouse tracking, and UI state.
//!
//! `InputEvent` is what hosts feed the engine. Every event carries both its
//! screen position and the tile under it, so the engine never needs to know
//! about projection or zoom. `Mouse` is the dispatcher's running record of
//! pointer position, press location and per-event delta. `UiState` is the
//! non-persisted editor state the modes read and write.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::coords::{Coords, Point};
use crate::model::{Id, ItemReference};
use crate::modes::Mode;

/// Kind of raw input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    MouseMove,
    MouseDown,
    MouseUp,
    KeyDown,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keyboard key as reported by the host (e.g. `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }

    /// Lowercased key name for hotkey matching.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

/// One raw pointer or keyboard event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub tile: Coords,
    #[serde(default)]
    pub screen: Point,
    #[serde(default)]
    pub button: Button,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
}

impl InputEvent {
    fn pointer(kind: EventKind, tile: Coords) -> Self {
        Self {
            kind,
            tile,
            screen: Point::default(),
            button: Button::Primary,
            modifiers: Modifiers::default(),
            key: None,
        }
    }

    #[must_use]
    pub fn mouse_move(tile: Coords) -> Self {
        Self::pointer(EventKind::MouseMove, tile)
    }

    #[must_use]
    pub fn mouse_down(tile: Coords) -> Self {
        Self::pointer(EventKind::MouseDown, tile)
    }

    #[must_use]
    pub fn mouse_up(tile: Coords) -> Self {
        Self::pointer(EventKind::MouseUp, tile)
    }

    #[must_use]
    pub fn key_down(key: &str, modifiers: Modifiers) -> Self {
        Self {
            kind: EventKind::KeyDown,
            tile: Coords::zero(),
            screen: Point::default(),
            button: Button::Primary,
            modifiers,
            key: Some(Key(key.to_string())),
        }
    }

    /// Same event at a different screen position.
    #[must_use]
    pub fn at_screen(mut self, x: f64, y: f64) -> Self {
        self.screen = Point::new(x, y);
        self
    }

    #[must_use]
    pub fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }

    /// Mouse events go to the mode dispatcher; everything else is keyboard.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        !matches!(self.kind, EventKind::KeyDown)
    }
}

/// A pointer location in both coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MousePosition {
    pub screen: Point,
    pub tile: Coords,
}

/// Running pointer state maintained by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Mouse {
    pub position: MousePosition,
    /// Where the button went down. Set on press, kept through moves, cleared
    /// once the release has been handled.
    pub mousedown: Option<MousePosition>,
    /// Change since the previous pointer event.
    pub delta: Option<MousePosition>,
}

impl Mouse {
    /// Fold a pointer event into the running state.
    pub fn track(&mut self, event: &InputEvent) {
        let next = MousePosition { screen: event.screen, tile: event.tile };
        self.delta = Some(MousePosition {
            screen: next.screen - self.position.screen,
            tile: next.tile - self.position.tile,
        });
        self.position = next;
        if event.kind == EventKind::MouseDown {
            self.mousedown = Some(next);
        }
    }

    /// Whether the last event crossed a tile boundary.
    #[must_use]
    pub fn has_moved_tile(&self) -> bool {
        self.delta.is_some_and(|d| !d.tile.is_zero())
    }
}

/// Panel currently open for an entity, or the add-item palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemControls {
    Item { item: ItemReference },
    AddItem,
}

impl ItemControls {
    #[must_use]
    pub fn item(&self) -> Option<&ItemReference> {
        match self {
            Self::Item { item } => Some(item),
            Self::AddItem => None,
        }
    }
}

/// Context menu anchored at a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextMenu {
    Empty { tile: Coords },
    Item { item: ItemReference, tile: Coords },
}

/// Viewport scroll in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Scroll {
    pub position: Point,
    pub offset: Point,
}

/// Tools reachable from hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Pan,
    AddItem,
    Rectangle,
    Connector,
    Text,
    Lasso,
    FreehandLasso,
}

/// Non-persisted editor state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub mode: Mode,
    /// Id of the view being edited.
    pub view: Id,
    pub mouse: Mouse,
    pub item_controls: Option<ItemControls>,
    pub context_menu: Option<ContextMenu>,
    pub scroll: Scroll,
    /// Read-only presentation mode.
    pub is_runtime: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::cursor(),
            view: Id::new(),
            mouse: Mouse::default(),
            item_controls: None,
            context_menu: None,
            scroll: Scroll::default(),
            is_runtime: false,
        }
    }
}

impl UiState {
    pub fn open_item_controls(&mut self, item: ItemReference) {
        self.item_controls = Some(ItemControls::Item { item });
    }

    pub fn close_item_controls(&mut self) {
        self.item_controls = None;
    }
}

/// A queue of pending input, drained by [`crate::Engine::pump`].
pub trait EventSource {
    fn next_event(&mut self) -> Option<InputEvent>;
}

impl EventSource for VecDeque<InputEvent> {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}
