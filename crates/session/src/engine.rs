//! Shared handle to one strongest-move oracle instance.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chess_core::{Engine, EngineError, Move, Position, SearchLimits, SearchResult};

/// Cloneable reference to one running engine.
///
/// The mutex allows one query in flight per engine instance; a second
/// caller blocks until the first answer arrives. Handles are owned by the
/// [`EngineRegistry`](crate::EngineRegistry) and outlive every session.
#[derive(Clone)]
pub struct EngineHandle {
    name: Arc<str>,
    engine: Arc<Mutex<Box<dyn Engine>>>,
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle").field("name", &self.name).finish()
    }
}

impl EngineHandle {
    /// Wraps an engine under the name it reports for itself.
    pub fn new(engine: impl Engine + 'static) -> Self {
        let name = engine.name().to_string();
        Self::named(name, Box::new(engine))
    }

    pub fn named(name: impl Into<String>, engine: Box<dyn Engine>) -> Self {
        let name: String = name.into();
        Self {
            name: Arc::from(name),
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn Engine>>, EngineError> {
        self.engine.lock().map_err(|_| EngineError::Unavailable {
            name: self.name.to_string(),
            reason: "a previous query panicked".to_string(),
        })
    }

    pub fn search(&self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, EngineError> {
        self.lock()?.search(pos, limits)
    }

    pub fn play(&self, pos: &Position, limits: SearchLimits) -> Result<Option<Move>, EngineError> {
        self.lock()?.play(pos, limits)
    }

    pub fn analyse(&self, pos: &Position, limits: SearchLimits) -> Result<Vec<Move>, EngineError> {
        self.lock()?.analyse(pos, limits)
    }

    pub fn new_game(&self) -> Result<(), EngineError> {
        self.lock()?.new_game()
    }

    pub fn set_option(&self, name: &str, value: &str) -> Result<bool, EngineError> {
        self.lock()?.set_option(name, value)
    }

    /// Shuts the engine down. Runs even if an earlier query panicked.
    pub fn quit(&self) {
        self.engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .quit();
    }

    /// Whether both handles refer to the same engine instance.
    pub fn same_engine(&self, other: &EngineHandle) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }
}
