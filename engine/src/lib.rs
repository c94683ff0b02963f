//! Interaction and state engine for isometric diagram editing.
//!
//! The engine owns a persisted diagram [`model::Model`] and a derived
//! [`scene::Scene`] (connector paths and text box sizes), each in its own
//! undoable store. Every edit is a pure reducer over an owned
//! [`reducers::State`] committed through [`history::History`]. Raw pointer and
//! keyboard events are routed through an interaction mode state machine
//! ([`modes::Mode`]) that turns gestures into reducer calls. Rendering and
//! projection are the host's business: events arrive already resolved to
//! tiles.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`Engine`] facade: queries, mutations, input dispatch |
//! | [`model`] | Persisted entities, partial updates, load-time sanitation |
//! | [`scene`] | Derived connector paths and text box sizes |
//! | [`reducers`] | Pure state transitions per entity |
//! | [`store`] | Single value with bounded undo/redo stacks |
//! | [`history`] | Coordinated undo/redo and transactions over both stores |
//! | [`geometry`] | Placement search, containment, routing, hit-testing |
//! | [`modes`] | Interaction modes, dispatcher and keyboard shortcuts |
//! | [`input`] | Input events, mouse tracking and UI state |
//! | [`coords`] | Tile and screen coordinate types |
//! | [`config`] | Environment-driven configuration |
//! | [`consts`] | Shared defaults and limits |

pub mod config;
pub mod consts;
pub mod coords;
pub mod engine;
pub mod geometry;
pub mod history;
pub mod input;
pub mod model;
pub mod modes;
pub mod reducers;
pub mod scene;
pub mod store;

pub use config::{ConfigError, ConnectorInteractionMode, EngineConfig, HotkeyProfile};
pub use engine::{Engine, LoadReport};
pub use input::{EventSource, InputEvent};
pub use model::Model;
pub use reducers::NotFoundError;
