use super::*;

use crate::config::AppConfig;

#[test]
fn test_default_config_starts_builtins() {
    let registry = EngineRegistry::from_config(&AppConfig::default().engines).unwrap();
    assert_eq!(registry.names(), vec!["Classical", "Random"]);
    assert_eq!(registry.default_engine().name(), "Classical");
    assert!(registry.get("random").is_some());
    assert!(registry.get("stockfish").is_none());
    registry.shutdown();
}

#[test]
fn test_unlaunchable_engine_is_skipped() {
    let configs = vec![
        EngineConfig::uci("Ghost", "/nonexistent/engine/binary"),
        EngineConfig::builtin("Random", EngineKind::Random),
    ];
    let registry = EngineRegistry::from_config(&configs).unwrap();
    assert_eq!(registry.names(), vec!["Random"]);
}

#[test]
fn test_nothing_started_is_an_error() {
    let configs = vec![EngineConfig::uci("Ghost", "/nonexistent/engine/binary")];
    assert_eq!(
        EngineRegistry::from_config(&configs).unwrap_err(),
        RegistryError::Empty
    );
}

#[test]
fn test_configuration_mistakes() {
    let twice = vec![
        EngineConfig::builtin("Random", EngineKind::Random),
        EngineConfig::builtin("random", EngineKind::Classical),
    ];
    assert!(matches!(
        EngineRegistry::from_config(&twice),
        Err(RegistryError::DuplicateName { .. })
    ));

    let no_path = vec![EngineConfig::builtin("Uci", EngineKind::Uci)];
    assert!(matches!(
        EngineRegistry::from_config(&no_path),
        Err(RegistryError::MissingPath { .. })
    ));
}

#[test]
fn test_handles_share_the_instance() {
    let registry = EngineRegistry::from_config(&AppConfig::default().engines).unwrap();
    let a = registry.get("Classical").unwrap();
    let b = registry.get("classical").unwrap();
    assert!(a.same_engine(&b));
}
