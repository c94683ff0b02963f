//! The engine facade: stores, UI state, configuration and input dispatch in
//! one place.
//!
//! Hosts query the current view through the read methods, mutate through the
//! entity methods (each one undo step), and feed raw input through
//! [`Engine::handle_event`] or [`Engine::pump`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::convert::Infallible;

use crate::config::{ConnectorInteractionMode, EngineConfig};
use crate::consts::{DEFAULT_COLOR_VALUE, DEFAULT_VIEW_NAME};
use crate::coords::{Coords, Size};
use crate::geometry;
use crate::history::{self, History, Transactional};
use crate::input::{Button, ContextMenu, EventKind, EventSource, InputEvent, ItemControls, Mouse, Scroll, Tool, UiState};
use crate::model::{
    Color, Connector, Icon, Id, ItemReference, Model, ModelItem, PartialConnector, PartialModelItem, PartialRectangle,
    PartialTextBox, PartialView, PartialViewItem, Rectangle, TextBox, View, ViewItem, generate_id,
};
use crate::modes::{self, Mode, ModeKind, keyboard};
use crate::reducers::{
    self, EntityKind, NotFoundError, ReducerResult, State, connector, model_item, rectangle, text_box, view, view_item,
};
use crate::scene::{ConnectorPath, Scene};

/// How a reducer result joins the undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Snapshot first, making the change its own undo step.
    Step,
    /// Fold the change into the most recent step.
    Amend,
}

/// Callback for clicks on items in runtime (read-only) mode.
pub type RuntimeActionHandler = Box<dyn FnMut(&ItemReference, Coords)>;

/// Outcome of [`Engine::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// `(view_id, connector_id)` of every connector dropped for unresolved
    /// anchors.
    pub dropped_connectors: Vec<(Id, Id)>,
    /// The model had no views and an empty one was added.
    pub created_default_view: bool,
}

/// A connector with its routed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorWithPath<'a> {
    pub connector: &'a Connector,
    pub path: Option<&'a ConnectorPath>,
}

/// A text box with its measured size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBoxWithSize<'a> {
    pub text_box: &'a TextBox,
    pub size: Option<Size>,
}

pub struct Engine {
    history: History,
    ui: UiState,
    config: EngineConfig,
    runtime_handler: Option<RuntimeActionHandler>,
    /// Kind of the mode that handled the previous pointer event.
    last_mode: Option<ModeKind>,
}

impl Transactional for Engine {
    fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// An engine holding an empty model with one default view.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut engine = Self {
            history: History::new(Model::default(), Scene::default(), config.max_history_size),
            ui: UiState::default(),
            config,
            runtime_handler: None,
            last_mode: None,
        };
        engine.load(Model::default());
        engine
    }

    /// An engine with `model` already loaded.
    #[must_use]
    pub fn with_model(model: Model, config: EngineConfig) -> (Self, LoadReport) {
        let mut engine = Self::new(config);
        let report = engine.load(model);
        (engine, report)
    }

    // --- Loading / views ---

    /// Replace the whole model.
    ///
    /// Connectors with unresolvable anchors are dropped, a default view is
    /// added when there is none, the first view becomes current and its scene
    /// is rebuilt. History is cleared and the UI returns to its neutral mode.
    pub fn load(&mut self, mut model: Model) -> LoadReport {
        let dropped_connectors = model.remove_invalid_connectors();
        let created_default_view = model.views.is_empty();
        if created_default_view {
            model.views.push(View::new(generate_id(), DEFAULT_VIEW_NAME));
        }
        let view_id = model.views.first().map(|v| v.id.clone()).unwrap_or_default();

        let scene = match reducers::sync_scene(State::new(model.clone(), Scene::default()), &view_id) {
            Ok(state) => state.scene,
            Err(err) => {
                tracing::warn!(error = %err, "scene rebuild failed on load");
                Scene::default()
            }
        };
        self.history = History::new(model, scene, self.config.max_history_size);
        self.ui.view = view_id;
        self.reset_ui();
        tracing::info!(
            dropped = dropped_connectors.len(),
            created_default_view,
            view_id = %self.ui.view,
            "model loaded"
        );
        LoadReport { dropped_connectors, created_default_view }
    }

    /// Make `view_id` the current view and rebuild the scene for it.
    /// History is cleared, since scene snapshots belong to the old view.
    ///
    /// # Errors
    ///
    /// Returns not-found if no view has `view_id`.
    pub fn change_view(&mut self, view_id: &str) -> Result<(), NotFoundError> {
        let state = reducers::sync_scene(self.history.state(), view_id)?;
        self.history.replace(state.model, state.scene);
        self.history.clear_history();
        self.ui.view = view_id.to_string();
        self.reset_ui();
        tracing::debug!(view_id, "view changed");
        Ok(())
    }

    fn reset_ui(&mut self) {
        self.ui.mode = self.neutral_mode();
        self.ui.mouse = Mouse::default();
        self.ui.item_controls = None;
        self.ui.context_menu = None;
        self.last_mode = None;
    }

    // --- Queries ---

    #[must_use]
    pub fn model(&self) -> &Model {
        self.history.model()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.history.scene()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub(crate) fn ui_mut(&mut self) -> &mut UiState {
        &mut self.ui
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.ui.mode
    }

    #[must_use]
    pub fn mouse(&self) -> &Mouse {
        &self.ui.mouse
    }

    #[must_use]
    pub fn item_controls(&self) -> Option<&ItemControls> {
        self.ui.item_controls.as_ref()
    }

    #[must_use]
    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.ui.context_menu.as_ref()
    }

    #[must_use]
    pub fn scroll(&self) -> &Scroll {
        &self.ui.scroll
    }

    /// The view being edited.
    ///
    /// # Errors
    ///
    /// Returns not-found if the current view id no longer resolves.
    pub fn current_view(&self) -> Result<&View, NotFoundError> {
        self.model()
            .view(&self.ui.view)
            .ok_or_else(|| NotFoundError::new(EntityKind::View, &self.ui.view))
    }

    /// # Errors
    ///
    /// Same as [`Engine::current_view`].
    pub fn view_items(&self) -> Result<&[ViewItem], NotFoundError> {
        Ok(&self.current_view()?.items)
    }

    /// Connectors of the current view with their scene paths.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::current_view`].
    pub fn connectors(&self) -> Result<Vec<ConnectorWithPath<'_>>, NotFoundError> {
        let scene = self.scene();
        Ok(self
            .current_view()?
            .connectors
            .iter()
            .map(|c| ConnectorWithPath { connector: c, path: scene.connector_path(&c.id) })
            .collect())
    }

    /// # Errors
    ///
    /// Same as [`Engine::current_view`].
    pub fn rectangles(&self) -> Result<&[Rectangle], NotFoundError> {
        Ok(&self.current_view()?.rectangles)
    }

    /// Text boxes of the current view with their measured sizes.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::current_view`].
    pub fn text_boxes(&self) -> Result<Vec<TextBoxWithSize<'_>>, NotFoundError> {
        let scene = self.scene();
        Ok(self
            .current_view()?
            .text_boxes
            .iter()
            .map(|t| TextBoxWithSize { text_box: t, size: scene.text_box_size(&t.id) })
            .collect())
    }

    #[must_use]
    pub fn color(&self, id: &str) -> Option<&Color> {
        self.model().color(id)
    }

    #[must_use]
    pub fn icon(&self, id: &str) -> Option<&Icon> {
        self.model().icon(id)
    }

    #[must_use]
    pub fn model_item(&self, id: &str) -> Option<&ModelItem> {
        self.model().item(id)
    }

    /// Display color of a connector: its custom color, else its palette
    /// color, else the default.
    #[must_use]
    pub fn connector_color<'a>(&'a self, connector: &'a Connector) -> &'a str {
        self.resolve_color(connector.custom_color.as_deref(), connector.color.as_deref())
    }

    /// Display color of a rectangle, resolved like [`Engine::connector_color`].
    #[must_use]
    pub fn rectangle_color<'a>(&'a self, rectangle: &'a Rectangle) -> &'a str {
        self.resolve_color(rectangle.custom_color.as_deref(), rectangle.color.as_deref())
    }

    fn resolve_color<'a>(&'a self, custom: Option<&'a str>, palette: Option<&str>) -> &'a str {
        if let Some(custom) = custom {
            return custom;
        }
        palette
            .and_then(|id| self.color(id))
            .or_else(|| self.model().colors.first())
            .map_or(DEFAULT_COLOR_VALUE, |c| c.value.as_str())
    }

    /// What occupies `tile` in the current view.
    #[must_use]
    pub fn item_at(&self, tile: Coords) -> Option<ItemReference> {
        let view = self.model().view(&self.ui.view)?;
        geometry::item_at_tile(view, self.scene(), tile)
    }

    // --- Mutations ---

    /// Run `reducer` against the current state and commit it. The reducer
    /// receives the current view id.
    pub(crate) fn commit(
        &mut self,
        commit: Commit,
        reducer: impl FnOnce(State, &str) -> ReducerResult,
    ) -> Result<(), NotFoundError> {
        let view_id = self.ui.view.clone();
        let reducer = move |state| reducer(state, &view_id);
        match commit {
            Commit::Step => self.history.apply(reducer),
            Commit::Amend => self.history.amend(reducer),
        }
    }

    pub fn create_model_item(&mut self, item: ModelItem) {
        let Ok(()) = self.history.apply(|s| Ok::<_, Infallible>(model_item::create_model_item(s, item)));
    }

    /// # Errors
    ///
    /// Returns not-found if no model item has `id`.
    pub fn update_model_item(&mut self, id: &str, update: &PartialModelItem) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, _| model_item::update_model_item(s, id, update))
    }

    /// # Errors
    ///
    /// Returns not-found if no model item has `id`.
    pub fn delete_model_item(&mut self, id: &str) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, _| model_item::delete_model_item(s, id))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view is missing.
    pub fn create_view_item(&mut self, item: ViewItem) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| view_item::create_view_item(s, v, item))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view or the view item is missing.
    pub fn update_view_item(&mut self, id: &str, update: &PartialViewItem) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| view_item::update_view_item(s, v, id, update))
    }

    /// Remove a view item and every connector anchored to it.
    ///
    /// # Errors
    ///
    /// Returns not-found if the current view or the view item is missing.
    pub fn delete_view_item(&mut self, id: &str) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| view_item::delete_view_item(s, v, id))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view is missing.
    pub fn create_connector(&mut self, created: Connector) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| connector::create_connector(s, v, created))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view or the connector is missing.
    pub fn update_connector(&mut self, id: &str, update: &PartialConnector) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| connector::update_connector(s, v, id, update))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view or the connector is missing.
    pub fn delete_connector(&mut self, id: &str) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| connector::delete_connector(s, v, id))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view is missing.
    pub fn create_rectangle(&mut self, created: Rectangle) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| rectangle::create_rectangle(s, v, created))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view or the rectangle is missing.
    pub fn update_rectangle(&mut self, id: &str, update: &PartialRectangle) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| rectangle::update_rectangle(s, v, id, update))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view or the rectangle is missing.
    pub fn delete_rectangle(&mut self, id: &str) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| rectangle::delete_rectangle(s, v, id))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view is missing.
    pub fn create_text_box(&mut self, created: TextBox) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| text_box::create_text_box(s, v, created))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view or the text box is missing.
    pub fn update_text_box(&mut self, id: &str, update: &PartialTextBox) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| text_box::update_text_box(s, v, id, update))
    }

    /// # Errors
    ///
    /// Returns not-found if the current view or the text box is missing.
    pub fn delete_text_box(&mut self, id: &str) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, v| text_box::delete_text_box(s, v, id))
    }

    pub fn create_view(&mut self, created: View) {
        let Ok(()) = self.history.apply(|s| Ok::<_, Infallible>(view::create_view(s, created)));
    }

    /// # Errors
    ///
    /// Returns not-found if no view has `view_id`.
    pub fn update_view(&mut self, view_id: &str, update: &PartialView) -> Result<(), NotFoundError> {
        self.commit(Commit::Step, |s, _| view::update_view(s, view_id, update))
    }

    /// Delete a view. Deleting the current view moves to the first remaining
    /// one, adding an empty view when none is left, in the same undo step.
    ///
    /// # Errors
    ///
    /// Returns not-found if no view has `view_id`.
    pub fn delete_view(&mut self, view_id: &str) -> Result<(), NotFoundError> {
        if self.model().view(view_id).is_none() {
            return Err(NotFoundError::new(EntityKind::View, view_id));
        }
        let was_current = self.ui.view == view_id;
        self.transaction(|engine| -> Result<(), NotFoundError> {
            engine.commit(Commit::Step, |s, _| view::delete_view(s, view_id))?;
            if !was_current {
                return Ok(());
            }
            let next = match engine.model().views.first() {
                Some(next) => next.id.clone(),
                None => {
                    let created = View::new(generate_id(), DEFAULT_VIEW_NAME);
                    let id = created.id.clone();
                    engine.commit(Commit::Amend, |s, _| Ok(view::create_view(s, created)))?;
                    id
                }
            };
            engine.commit(Commit::Amend, |s, _| reducers::sync_scene(s, &next))?;
            engine.ui.view = next;
            engine.reset_ui();
            Ok(())
        })
    }

    /// Create a model item and place it in the current view as one undo step.
    ///
    /// # Errors
    ///
    /// Returns not-found if the current view is missing. Nothing is created
    /// in that case.
    pub fn place_icon(&mut self, item: ModelItem, placement: ViewItem) -> Result<(), NotFoundError> {
        self.current_view()?;
        self.transaction(|engine| {
            engine.create_model_item(item);
            engine.create_view_item(placement)
        })
    }

    /// Remove a node from the current view and delete its model item, as one
    /// undo step.
    ///
    /// # Errors
    ///
    /// Returns not-found if the view item or model item is missing. Nothing
    /// is removed in that case.
    pub fn delete_node(&mut self, id: &str) -> Result<(), NotFoundError> {
        if self.current_view()?.item(id).is_none() {
            return Err(NotFoundError::new(EntityKind::ViewItem, id));
        }
        if self.model_item(id).is_none() {
            return Err(NotFoundError::new(EntityKind::ModelItem, id));
        }
        self.transaction(|engine| -> Result<(), NotFoundError> {
            engine.delete_view_item(id)?;
            engine.delete_model_item(id)
        })
    }

    /// Run `f` so that every change it makes is a single undo step.
    ///
    /// Nested calls run inline. The in-progress flag is cleared even if `f`
    /// panics; the panic is then resumed.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        history::run_transaction(self, f)
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn save_to_history(&mut self) {
        self.history.save_to_history();
    }

    pub fn clear_history(&mut self) {
        self.history.clear_history();
    }

    // --- Modes / settings ---

    /// Mode the UI falls back to: the runtime cursor in runtime mode, else
    /// the editing cursor.
    #[must_use]
    pub fn neutral_mode(&self) -> Mode {
        if self.ui.is_runtime { Mode::runtime_cursor() } else { Mode::cursor() }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.ui.mode = mode;
    }

    /// Switch to `tool` as its hotkey would.
    ///
    /// # Errors
    ///
    /// Returns not-found if the current view is missing when the tool needs
    /// to create something (the text tool).
    pub fn set_tool(&mut self, tool: Tool) -> Result<(), NotFoundError> {
        keyboard::activate(self, tool)
    }

    /// Enter or leave runtime (read-only) mode.
    pub fn set_runtime(&mut self, is_runtime: bool) {
        self.ui.is_runtime = is_runtime;
        self.ui.item_controls = None;
        self.ui.mode = self.neutral_mode();
    }

    pub fn set_runtime_action_handler(&mut self, handler: impl FnMut(&ItemReference, Coords) + 'static) {
        self.runtime_handler = Some(Box::new(handler));
    }

    pub fn set_connector_mode(&mut self, mode: ConnectorInteractionMode) {
        self.config.connector_mode = mode;
    }

    pub(crate) fn emit_runtime_action(&mut self, item: &ItemReference, tile: Coords) {
        match self.runtime_handler.as_mut() {
            Some(handler) => handler(item, tile),
            None => tracing::debug!(item_id = %item.id, "runtime click with no handler"),
        }
    }

    // --- Input ---

    /// Process one raw input event.
    ///
    /// Key presses go to the keyboard shortcuts. Secondary-button presses
    /// open the context menu and middle-button presses start a pan; neither
    /// reaches the active mode. Everything else is dispatched to the active
    /// mode. Pointer events are ignored while interactions are disabled.
    pub fn handle_event(&mut self, event: &InputEvent) {
        if !event.is_pointer() {
            let Some(key) = &event.key else {
                return;
            };
            if let Err(err) = keyboard::key_down(self, key, event.modifiers) {
                tracing::warn!(key = %key.0, error = %err, "shortcut failed; resetting mode");
                self.ui.mode = self.neutral_mode();
            }
            return;
        }
        if matches!(self.ui.mode, Mode::InteractionsDisabled) {
            return;
        }

        self.ui.mouse.track(event);
        match (event.button, event.kind) {
            (Button::Secondary, EventKind::MouseDown | EventKind::MouseUp) => {
                self.ui.mouse.mousedown = None;
                if event.kind == EventKind::MouseDown {
                    self.open_context_menu(event.tile);
                }
                return;
            }
            (Button::Middle, EventKind::MouseDown) => {
                self.ui.mode = Mode::Pan { return_to_cursor: true };
                return;
            }
            _ => {}
        }

        let previous = self.last_mode;
        self.last_mode = Some(modes::dispatch(self, event.kind, previous));
        if event.kind == EventKind::MouseUp {
            self.ui.mouse.mousedown = None;
        }
    }

    /// Drain `source`, handling each event in order. Returns how many were
    /// handled.
    pub fn pump(&mut self, source: &mut impl EventSource) -> usize {
        let mut handled = 0;
        while let Some(event) = source.next_event() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }

    fn open_context_menu(&mut self, tile: Coords) {
        self.ui.context_menu = Some(match self.item_at(tile) {
            Some(item) => ContextMenu::Item { item, tile },
            None => ContextMenu::Empty { tile },
        });
    }
}
