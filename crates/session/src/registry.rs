//! Process-wide owner of the configured engines.

use std::collections::HashSet;

use chess_core::Engine;
use classical_engine::ClassicalEngine;
use random_engine::RandomEngine;
use uci_engine::UciEngine;

use crate::config::{EngineConfig, EngineKind};
use crate::engine::EngineHandle;
use crate::error::RegistryError;

/// Named engine handles, created at startup and shut down at exit.
#[derive(Debug, Clone)]
pub struct EngineRegistry {
    engines: Vec<EngineHandle>,
}

impl EngineRegistry {
    /// Starts every configured engine. Engines that fail to launch are
    /// logged and skipped; configuration mistakes are errors.
    pub fn from_config(configs: &[EngineConfig]) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for config in configs {
            if !seen.insert(config.name.to_lowercase()) {
                return Err(RegistryError::DuplicateName {
                    name: config.name.clone(),
                });
            }
            if config.kind == EngineKind::Uci && config.path.is_none() {
                return Err(RegistryError::MissingPath {
                    name: config.name.clone(),
                });
            }
        }

        let mut engines = Vec::with_capacity(configs.len());
        for config in configs {
            match launch(config) {
                Ok(engine) => {
                    tracing::info!(name = %config.name, kind = ?config.kind, "engine ready");
                    engines.push(EngineHandle::named(config.name.clone(), engine));
                }
                Err(e) => tracing::warn!(name = %config.name, error = %e, "engine skipped"),
            }
        }
        Self::with_engines(engines)
    }

    pub fn with_engines(engines: Vec<EngineHandle>) -> Result<Self, RegistryError> {
        if engines.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { engines })
    }

    /// Looks an engine up by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<EngineHandle> {
        self.engines
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.engines.iter().map(EngineHandle::name).collect()
    }

    /// First configured engine that started.
    pub fn default_engine(&self) -> EngineHandle {
        self.engines[0].clone()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Sends `quit` to every engine.
    pub fn shutdown(&self) {
        for engine in &self.engines {
            tracing::debug!(name = engine.name(), "shutting engine down");
            engine.quit();
        }
    }
}

fn launch(config: &EngineConfig) -> Result<Box<dyn Engine>, chess_core::EngineError> {
    let engine: Box<dyn Engine> = match config.kind {
        EngineKind::Classical => Box::new(
            config
                .max_depth
                .map_or_else(ClassicalEngine::new, ClassicalEngine::with_max_depth),
        ),
        EngineKind::Random => Box::new(
            config
                .seed
                .map_or_else(RandomEngine::new, RandomEngine::seeded),
        ),
        EngineKind::Uci => {
            let path = config.path.as_deref().ok_or_else(|| chess_core::EngineError::Unavailable {
                name: config.name.clone(),
                reason: "no path configured".to_string(),
            })?;
            let options: Vec<(String, String)> = config
                .options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            Box::new(UciEngine::launch(config.name.clone(), path, &config.args, &options)?)
        }
    };
    Ok(engine)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
