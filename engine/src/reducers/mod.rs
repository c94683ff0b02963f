//! Pure state transitions over `{model, scene}`.
//!
//! Every reducer takes an owned [`State`] and returns the next one, or a
//! [`NotFoundError`] naming the missing entity. Callers hand in a clone of the
//! live state, so a failed reducer leaves nothing half-applied.
//!
//! Creates and geometry-affecting updates cascade into a sync step that
//! recomputes the entity's scene entry.


pub mod connector;
pub mod model_item;
pub mod rectangle;
pub mod text_box;
pub mod view;
pub mod view_item;

use std::fmt;

use crate::model::{Id, Model, View};
use crate::scene::Scene;

/// The pair of trees every reducer operates on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    pub model: Model,
    pub scene: Scene,
}

impl State {
    #[must_use]
    pub fn new(model: Model, scene: Scene) -> Self {
        Self { model, scene }
    }
}

/// Entity kinds a lookup can fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    View,
    ModelItem,
    ViewItem,
    Connector,
    ConnectorAnchor,
    Rectangle,
    TextBox,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::View => "view",
            Self::ModelItem => "model item",
            Self::ViewItem => "view item",
            Self::Connector => "connector",
            Self::ConnectorAnchor => "connector anchor",
            Self::Rectangle => "rectangle",
            Self::TextBox => "text box",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} not found: {id}")]
pub struct NotFoundError {
    pub kind: EntityKind,
    pub id: Id,
}

impl NotFoundError {
    #[must_use]
    pub fn new(kind: EntityKind, id: impl Into<Id>) -> Self {
        Self { kind, id: id.into() }
    }
}

pub type ReducerResult = Result<State, NotFoundError>;

/// Index of the element with `id`, or a not-found error of `kind`.
pub(crate) fn position_of<T>(
    list: &[T],
    id: &str,
    kind: EntityKind,
    id_of: impl Fn(&T) -> &str,
) -> Result<usize, NotFoundError> {
    list.iter()
        .position(|x| id_of(x) == id)
        .ok_or_else(|| NotFoundError::new(kind, id))
}

pub(crate) fn view_mut<'a>(model: &'a mut Model, view_id: &str) -> Result<&'a mut View, NotFoundError> {
    model
        .views
        .iter_mut()
        .find(|v| v.id == view_id)
        .ok_or_else(|| NotFoundError::new(EntityKind::View, view_id))
}

/// Rebuild the scene for one view from scratch.
///
/// # Errors
///
/// Returns not-found if `view_id` is absent.
pub fn sync_scene(mut state: State, view_id: &str) -> ReducerResult {
    let view = state
        .model
        .view(view_id)
        .ok_or_else(|| NotFoundError::new(EntityKind::View, view_id))?;
    let connector_ids: Vec<Id> = view.connectors.iter().map(|c| c.id.clone()).collect();
    let text_box_ids: Vec<Id> = view.text_boxes.iter().map(|t| t.id.clone()).collect();
    state.scene = Scene::default();
    for id in &connector_ids {
        state = connector::sync_connector(state, view_id, id)?;
    }
    for id in &text_box_ids {
        state = text_box::sync_text_box(state, view_id, id)?;
    }
    Ok(state)
}
