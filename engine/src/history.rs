//! Coordinated undo/redo over the model and scene stores.
//!
//! The two stores keep independent stacks that may drift in length; undo and
//! redo step whichever store has something to give. Reducer results are
//! committed through [`History::apply`] (new undo step) or
//! [`History::amend`] (folded into the current step).

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::panic::{self, AssertUnwindSafe};

use crate::model::Model;
use crate::reducers::State;
use crate::scene::Scene;
use crate::store::{ModelStore, SceneStore, Store};

pub struct History {
    model: ModelStore,
    scene: SceneStore,
    in_transaction: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Model::default(), Scene::default(), crate::consts::MAX_HISTORY_SIZE)
    }
}

impl History {
    #[must_use]
    pub fn new(model: Model, scene: Scene, max_history_size: usize) -> Self {
        Self {
            model: Store::with_capacity(model, max_history_size),
            scene: Store::with_capacity(scene, max_history_size),
            in_transaction: false,
        }
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        self.model.get()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.scene.get()
    }

    #[must_use]
    pub fn model_store(&self) -> &ModelStore {
        &self.model
    }

    #[must_use]
    pub fn scene_store(&self) -> &SceneStore {
        &self.scene
    }

    /// Owned copy of both presents, for handing to a reducer.
    #[must_use]
    pub fn state(&self) -> State {
        State { model: self.model.get().clone(), scene: self.scene.get().clone() }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.model.can_undo() || self.scene.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.model.can_redo() || self.scene.can_redo()
    }

    /// Undo on every store that can. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        let model = self.model.can_undo() && self.model.undo();
        let scene = self.scene.can_undo() && self.scene.undo();
        tracing::debug!(model, scene, "undo");
        model || scene
    }

    /// Redo on every store that can. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        let model = self.model.can_redo() && self.model.redo();
        let scene = self.scene.can_redo() && self.scene.redo();
        tracing::debug!(model, scene, "redo");
        model || scene
    }

    /// Snapshot both stores. No-op inside a transaction.
    pub fn save_to_history(&mut self) {
        if self.in_transaction {
            return;
        }
        self.model.save_to_history();
        self.scene.save_to_history();
    }

    pub fn clear_history(&mut self) {
        self.model.clear_history();
        self.scene.clear_history();
    }

    pub fn set_max_history_size(&mut self, max: usize) {
        self.model.set_max_history_size(max);
        self.scene.set_max_history_size(max);
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Run `f` as a single undo step.
    ///
    /// Both stores are snapshotted once up front and every commit inside `f`
    /// folds into that step. A nested call runs `f` inline. The in-progress
    /// flag is cleared even if `f` panics; the panic is then resumed.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        run_transaction(self, f)
    }

    /// Snapshot both stores and raise the in-progress flag. Returns `false`,
    /// doing nothing, when a transaction is already open.
    pub(crate) fn begin_transaction(&mut self) -> bool {
        if self.in_transaction {
            return false;
        }
        self.save_to_history();
        self.in_transaction = true;
        tracing::debug!("transaction started");
        true
    }

    pub(crate) fn end_transaction(&mut self) {
        self.in_transaction = false;
        tracing::debug!("transaction finished");
    }

    /// Run a reducer against the current state and commit its result as a new
    /// undo step (or into the open transaction).
    ///
    /// Nothing is snapshotted or changed when the reducer fails.
    ///
    /// # Errors
    ///
    /// Returns the reducer's error unchanged.
    pub fn apply<E>(&mut self, reducer: impl FnOnce(State) -> Result<State, E>) -> Result<(), E> {
        let next = reducer(self.state())?;
        self.save_to_history();
        self.commit(next);
        Ok(())
    }

    /// Like [`History::apply`] but folds the result into the most recent step.
    ///
    /// # Errors
    ///
    /// Returns the reducer's error unchanged.
    pub fn amend<E>(&mut self, reducer: impl FnOnce(State) -> Result<State, E>) -> Result<(), E> {
        let next = reducer(self.state())?;
        self.commit(next);
        Ok(())
    }

    /// Replace both presents without touching history.
    pub fn replace(&mut self, model: Model, scene: Scene) {
        self.model.set(model, true);
        self.scene.set(scene, true);
    }

    fn commit(&mut self, next: State) {
        self.model.set(next.model, true);
        self.scene.set(next.scene, true);
    }
}

/// Anything that owns a [`History`] and can run a transaction over itself.
pub(crate) trait Transactional {
    fn history_mut(&mut self) -> &mut History;
}

impl Transactional for History {
    fn history_mut(&mut self) -> &mut History {
        self
    }
}

/// Open a transaction on `host`'s history, run `f`, then close it, resuming
/// any panic from `f` after the flag is cleared. Runs `f` inline when a
/// transaction is already open.
pub(crate) fn run_transaction<H: Transactional, R>(host: &mut H, f: impl FnOnce(&mut H) -> R) -> R {
    if !host.history_mut().begin_transaction() {
        return f(host);
    }
    let result = panic::catch_unwind(AssertUnwindSafe(|| f(host)));
    host.history_mut().end_transaction();
    match result {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}
