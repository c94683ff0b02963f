//! Interaction modes and the pointer-event dispatcher.
//!
//! Exactly one [`Mode`] is active at a time and lives in
//! [`crate::input::UiState::mode`]. Each pointer event is routed to the
//! active mode's hook for that event kind. When the mode *kind* differs from
//! the one that handled the previous event, the outgoing mode's `exit` hook
//! and the incoming mode's `entry` hook run first, so every handler observes
//! post-transition state.
//!
//! Handlers re-check the mode variant they expect and return quietly when it
//! does not match. A handler that fails with [`NotFoundError`] (an entity
//! vanished mid-gesture) resets the mode to the engine's neutral mode.

#[cfg(test)]
#[path = "modes_test.rs"]
mod modes_test;

mod connector;
mod cursor;
mod drag_items;
mod freehand_lasso;
pub(crate) mod keyboard;
mod lasso;
mod pan;
mod place_icon;
mod rectangle;
mod runtime_cursor;
mod text_box;

use serde::Serialize;

pub use freehand_lasso::FreehandSelection;
pub use lasso::LassoSelection;
pub use rectangle::RectangleCorner;

use crate::engine::Engine;
use crate::input::{EventKind, MousePosition};
use crate::model::{AnchorRef, Id, ItemReference};
use crate::reducers::NotFoundError;

/// Outcome of a single mode hook.
pub(crate) type HandlerResult = Result<(), NotFoundError>;

/// The active interaction mode and its per-gesture state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Selection and the starting point of most gestures.
    Cursor {
        /// Item under the last press, promoted to a drag on movement.
        mousedown_item: Option<ItemReference>,
    },
    /// Moving a set of entities with the pointer.
    DragItems {
        items: Vec<ItemReference>,
        is_initial_movement: bool,
        /// The undo step for this drag was already opened by the mode that
        /// started it.
        step_open: bool,
    },
    /// Scrolling the viewport.
    Pan {
        /// Return to `Cursor` on release.
        return_to_cursor: bool,
    },
    /// Dropping a new item using the icon `id`.
    PlaceIcon { id: Option<Id> },
    /// Building a connector.
    Connector {
        /// Connector under construction.
        id: Option<Id>,
        /// What the first click attached to, in click mode.
        start_anchor: Option<AnchorRef>,
        is_connecting: bool,
    },
    #[serde(rename = "RECTANGLE.DRAW")]
    RectangleDraw { id: Option<Id> },
    #[serde(rename = "RECTANGLE.TRANSFORM")]
    RectangleTransform {
        id: Id,
        selected_anchor: Option<RectangleCorner>,
        /// Whether the current corner drag has committed a change yet.
        moved: bool,
    },
    #[serde(rename = "TEXTBOX")]
    TextBox { id: Id },
    Lasso { selection: Option<LassoSelection>, is_dragging: bool },
    FreehandLasso {
        /// Accumulated pointer samples, throttled by screen distance.
        path: Vec<MousePosition>,
        selection: Option<FreehandSelection>,
        is_dragging: bool,
    },
    /// Read-only clicking in a presented diagram.
    RuntimeCursor { mousedown_item: Option<ItemReference> },
    InteractionsDisabled,
}

/// Discriminant of [`Mode`], used to detect mode changes between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Cursor,
    DragItems,
    Pan,
    PlaceIcon,
    Connector,
    RectangleDraw,
    RectangleTransform,
    TextBox,
    Lasso,
    FreehandLasso,
    RuntimeCursor,
    InteractionsDisabled,
}

impl Mode {
    #[must_use]
    pub fn cursor() -> Self {
        Self::Cursor { mousedown_item: None }
    }

    #[must_use]
    pub fn runtime_cursor() -> Self {
        Self::RuntimeCursor { mousedown_item: None }
    }

    /// Connector tool with nothing in progress.
    #[must_use]
    pub fn connector() -> Self {
        Self::Connector { id: None, start_anchor: None, is_connecting: false }
    }

    #[must_use]
    pub fn lasso() -> Self {
        Self::Lasso { selection: None, is_dragging: false }
    }

    #[must_use]
    pub fn freehand_lasso() -> Self {
        Self::FreehandLasso { path: Vec::new(), selection: None, is_dragging: false }
    }

    /// Drag `items`, measuring the first step from the press tile.
    #[must_use]
    pub fn drag_items(items: Vec<ItemReference>) -> Self {
        Self::DragItems { items, is_initial_movement: true, step_open: false }
    }

    #[must_use]
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Cursor { .. } => ModeKind::Cursor,
            Self::DragItems { .. } => ModeKind::DragItems,
            Self::Pan { .. } => ModeKind::Pan,
            Self::PlaceIcon { .. } => ModeKind::PlaceIcon,
            Self::Connector { .. } => ModeKind::Connector,
            Self::RectangleDraw { .. } => ModeKind::RectangleDraw,
            Self::RectangleTransform { .. } => ModeKind::RectangleTransform,
            Self::TextBox { .. } => ModeKind::TextBox,
            Self::Lasso { .. } => ModeKind::Lasso,
            Self::FreehandLasso { .. } => ModeKind::FreehandLasso,
            Self::RuntimeCursor { .. } => ModeKind::RuntimeCursor,
            Self::InteractionsDisabled => ModeKind::InteractionsDisabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Entry,
    Exit,
    MouseMove,
    MouseDown,
    MouseUp,
}

/// Route one pointer event through the active mode.
///
/// `previous` is the kind of mode that handled the last event. Returns the
/// kind of mode that handled this one.
pub(crate) fn dispatch(engine: &mut Engine, kind: EventKind, previous: Option<ModeKind>) -> ModeKind {
    let hook = match kind {
        EventKind::MouseMove => Hook::MouseMove,
        EventKind::MouseDown => Hook::MouseDown,
        EventKind::MouseUp => Hook::MouseUp,
        EventKind::KeyDown => return engine.ui().mode.kind(),
    };
    let current = engine.ui().mode.kind();
    if previous != Some(current) {
        if let Some(previous) = previous {
            run(engine, previous, Hook::Exit);
        }
        run(engine, current, Hook::Entry);
    }
    let current = engine.ui().mode.kind();
    run(engine, current, hook);
    current
}

fn run(engine: &mut Engine, kind: ModeKind, hook: Hook) {
    if let Err(err) = call(engine, kind, hook) {
        let neutral = engine.neutral_mode();
        tracing::warn!(mode = ?kind, hook = ?hook, error = %err, "interaction failed; resetting mode");
        engine.ui_mut().mode = neutral;
    }
}

fn call(engine: &mut Engine, kind: ModeKind, hook: Hook) -> HandlerResult {
    match (kind, hook) {
        (ModeKind::Cursor, Hook::Entry) => cursor::entry(engine),
        (ModeKind::Cursor, Hook::MouseMove) => cursor::mousemove(engine),
        (ModeKind::Cursor, Hook::MouseDown) => cursor::mousedown(engine),
        (ModeKind::Cursor, Hook::MouseUp) => cursor::mouseup(engine),
        (ModeKind::DragItems, Hook::MouseMove) => drag_items::mousemove(engine),
        (ModeKind::DragItems, Hook::MouseUp) => drag_items::mouseup(engine),
        (ModeKind::Pan, Hook::MouseMove) => pan::mousemove(engine),
        (ModeKind::Pan, Hook::MouseUp) => pan::mouseup(engine),
        (ModeKind::PlaceIcon, Hook::MouseDown) => place_icon::mousedown(engine),
        (ModeKind::PlaceIcon, Hook::MouseUp) => place_icon::mouseup(engine),
        (ModeKind::Connector, Hook::MouseMove) => connector::mousemove(engine),
        (ModeKind::Connector, Hook::MouseDown) => connector::mousedown(engine),
        (ModeKind::Connector, Hook::MouseUp) => connector::mouseup(engine),
        (ModeKind::RectangleDraw, Hook::MouseMove) => rectangle::draw_mousemove(engine),
        (ModeKind::RectangleDraw, Hook::MouseDown) => rectangle::draw_mousedown(engine),
        (ModeKind::RectangleDraw, Hook::MouseUp) => rectangle::draw_mouseup(engine),
        (ModeKind::RectangleTransform, Hook::MouseMove) => rectangle::transform_mousemove(engine),
        (ModeKind::RectangleTransform, Hook::MouseDown) => rectangle::transform_mousedown(engine),
        (ModeKind::RectangleTransform, Hook::MouseUp) => rectangle::transform_mouseup(engine),
        (ModeKind::TextBox, Hook::MouseMove) => text_box::mousemove(engine),
        (ModeKind::TextBox, Hook::MouseUp) => text_box::mouseup(engine),
        (ModeKind::Lasso, Hook::MouseMove) => lasso::mousemove(engine),
        (ModeKind::Lasso, Hook::MouseDown) => lasso::mousedown(engine),
        (ModeKind::Lasso, Hook::MouseUp) => lasso::mouseup(engine),
        (ModeKind::FreehandLasso, Hook::MouseMove) => freehand_lasso::mousemove(engine),
        (ModeKind::FreehandLasso, Hook::MouseDown) => freehand_lasso::mousedown(engine),
        (ModeKind::FreehandLasso, Hook::MouseUp) => freehand_lasso::mouseup(engine),
        (ModeKind::RuntimeCursor, Hook::MouseDown) => runtime_cursor::mousedown(engine),
        (ModeKind::RuntimeCursor, Hook::MouseUp) => runtime_cursor::mouseup(engine),
        _ => Ok(()),
    }
}
