//! Versioned value container with a bounded undo/redo history.
//!
//! The model and the scene each live in their own [`Store`]. Every mutation
//! either snapshots the current value first or, with `skip_history`, replaces
//! it in place so the change folds into the most recent step.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::VecDeque;

use crate::consts::MAX_HISTORY_SIZE;
use crate::model::Model;
use crate::scene::Scene;

/// Past, present and future of one value.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState<T> {
    /// Oldest snapshot first.
    pub past: VecDeque<T>,
    pub present: T,
    /// Next redo target first.
    pub future: VecDeque<T>,
    pub max_history_size: usize,
}

/// A value plus its history.
#[derive(Debug, Clone)]
pub struct Store<T> {
    history: HistoryState<T>,
}

pub type ModelStore = Store<Model>;
pub type SceneStore = Store<Scene>;

impl<T: Default + Clone> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> Store<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, MAX_HISTORY_SIZE)
    }

    /// A store keeping at most `max_history_size` past snapshots.
    #[must_use]
    pub fn with_capacity(initial: T, max_history_size: usize) -> Self {
        Self {
            history: HistoryState {
                past: VecDeque::new(),
                present: initial,
                future: VecDeque::new(),
                max_history_size,
            },
        }
    }

    /// The live value.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.history.present
    }

    #[must_use]
    pub fn history(&self) -> &HistoryState<T> {
        &self.history
    }

    /// Replace the value, snapshotting first unless `skip_history`.
    pub fn set(&mut self, value: T, skip_history: bool) {
        if !skip_history {
            self.save_to_history();
        }
        self.history.present = value;
    }

    /// Mutate the value in place, snapshotting first unless `skip_history`.
    pub fn update(&mut self, f: impl FnOnce(&mut T), skip_history: bool) {
        if !skip_history {
            self.save_to_history();
        }
        f(&mut self.history.present);
    }

    /// Push a copy of the present onto the past and clear the future.
    pub fn save_to_history(&mut self) {
        let h = &mut self.history;
        h.past.push_back(h.present.clone());
        while h.past.len() > h.max_history_size {
            h.past.pop_front();
        }
        h.future.clear();
    }

    /// Step back one snapshot. Returns `false` with no change when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let h = &mut self.history;
        let Some(previous) = h.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut h.present, previous);
        h.future.push_front(current);
        true
    }

    /// Step forward one snapshot. Returns `false` with no change when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let h = &mut self.history;
        let Some(next) = h.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut h.present, next);
        h.past.push_back(current);
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.history.future.is_empty()
    }

    /// Drop past and future, keeping the present.
    pub fn clear_history(&mut self) {
        self.history.past.clear();
        self.history.future.clear();
    }

    /// Change the snapshot cap, trimming the oldest entries if needed.
    pub fn set_max_history_size(&mut self, max: usize) {
        let h = &mut self.history;
        h.max_history_size = max;
        while h.past.len() > max {
            h.past.pop_front();
        }
    }
}
