use serde::Serialize;

use super::{HandlerResult, Mode};
use crate::coords::{Coords, TileRect};
use crate::engine::{Commit, Engine};
use crate::model::{PartialRectangle, Rectangle, generate_id};
use crate::reducers::{EntityKind, NotFoundError, rectangle};

/// A corner of a rectangle, in [`TileRect::corners`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RectangleCorner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl RectangleCorner {
    /// Corner at `index` of [`TileRect::corners`]. Indices past 3 wrap.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Self::TopLeft,
            1 => Self::TopRight,
            2 => Self::BottomRight,
            _ => Self::BottomLeft,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }
}

// =============================================================================
// DRAW
// =============================================================================

pub(super) fn draw_mousedown(engine: &mut Engine) -> HandlerResult {
    if !matches!(engine.ui().mode, Mode::RectangleDraw { .. }) {
        return Ok(());
    }
    let tile = engine.ui().mouse.position.tile;
    let created = Rectangle {
        id: generate_id(),
        color: engine.model().colors.first().map(|c| c.id.clone()),
        custom_color: None,
        from: tile,
        to: tile,
    };
    let id = created.id.clone();
    engine.commit(Commit::Step, |s, v| rectangle::create_rectangle(s, v, created))?;
    engine.ui_mut().mode = Mode::RectangleDraw { id: Some(id) };
    Ok(())
}

pub(super) fn draw_mousemove(engine: &mut Engine) -> HandlerResult {
    let Mode::RectangleDraw { id: Some(id) } = &engine.ui().mode else {
        return Ok(());
    };
    let mouse = engine.ui().mouse;
    if mouse.mousedown.is_none() || !mouse.has_moved_tile() {
        return Ok(());
    }
    let id = id.clone();
    let update = PartialRectangle { to: Some(mouse.position.tile), ..Default::default() };
    engine.commit(Commit::Amend, |s, v| rectangle::update_rectangle(s, v, &id, &update))
}

pub(super) fn draw_mouseup(engine: &mut Engine) -> HandlerResult {
    if let Mode::RectangleDraw { id: Some(_) } = engine.ui().mode {
        engine.ui_mut().mode = Mode::cursor();
    }
    Ok(())
}

// =============================================================================
// TRANSFORM
// =============================================================================

pub(super) fn transform_mousedown(engine: &mut Engine) -> HandlerResult {
    let Mode::RectangleTransform { id, .. } = &engine.ui().mode else {
        return Ok(());
    };
    let id = id.clone();
    let tile = engine.ui().mouse.position.tile;
    let corner = corners(engine, &id)?
        .iter()
        .position(|c| *c == tile)
        .map(RectangleCorner::from_index);
    engine.ui_mut().mode = match corner {
        Some(corner) => Mode::RectangleTransform { id, selected_anchor: Some(corner), moved: false },
        None => Mode::cursor(),
    };
    Ok(())
}

/// Drag the selected corner, keeping the opposite corner fixed. The first
/// change of a corner drag opens an undo step and later ones fold into it.
pub(super) fn transform_mousemove(engine: &mut Engine) -> HandlerResult {
    let Mode::RectangleTransform { id, selected_anchor: Some(corner), moved } = &engine.ui().mode else {
        return Ok(());
    };
    let mouse = engine.ui().mouse;
    if mouse.mousedown.is_none() || !mouse.has_moved_tile() {
        return Ok(());
    }
    let (id, corner, commit) = (id.clone(), *corner, if *moved { Commit::Amend } else { Commit::Step });
    let fixed = corners(engine, &id)?[corner.opposite().index()];
    let tile = mouse.position.tile;
    let update = PartialRectangle::bounds(fixed, tile);
    engine.commit(commit, |s, v| rectangle::update_rectangle(s, v, &id, &update))?;

    let selected = TileRect::new(fixed, tile)
        .corners()
        .iter()
        .position(|c| *c == tile)
        .map_or(corner, RectangleCorner::from_index);
    engine.ui_mut().mode = Mode::RectangleTransform { id, selected_anchor: Some(selected), moved: true };
    Ok(())
}

pub(super) fn transform_mouseup(engine: &mut Engine) -> HandlerResult {
    if let Mode::RectangleTransform { selected_anchor, moved, .. } = &mut engine.ui_mut().mode {
        *selected_anchor = None;
        *moved = false;
    }
    Ok(())
}

fn corners(engine: &Engine, id: &str) -> Result<[Coords; 4], NotFoundError> {
    let rect = engine
        .current_view()?
        .rectangle(id)
        .ok_or_else(|| NotFoundError::new(EntityKind::Rectangle, id))?;
    Ok(TileRect::new(rect.from, rect.to).corners())
}
