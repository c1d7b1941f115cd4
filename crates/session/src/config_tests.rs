use super::*;

#[test]
fn test_empty_file_gives_defaults() {
    let config = AppConfig::from_toml("").unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.engines.len(), 2);
    assert_eq!(config.engines[0].kind, EngineKind::Classical);
    assert_eq!(config.defaults.hint_time(), Duration::from_millis(100));
}

#[test]
fn test_full_file() {
    let text = r#"
[defaults]
difficulty = "Impossible"
autoplay_speed = 8

[save]
analysis = "out/analysis"

[[engines]]
name = "Stockfish"
kind = "uci"
path = "engines/stockfish/stockfish"
args = ["--quiet"]
[engines.options]
Threads = "2"

[[engines]]
name = "Shallow"
kind = "classical"
max_depth = 2
"#;
    let config = AppConfig::from_toml(text).unwrap();
    assert_eq!(config.defaults.difficulty, DifficultyLevel::Maximum);
    assert_eq!(config.defaults.autoplay_speed, 8);
    assert_eq!(config.defaults.hint_time_ms, 100);
    assert_eq!(config.save.analysis, PathBuf::from("out/analysis"));
    assert_eq!(config.save.human_vs_engine, SaveDirs::default().human_vs_engine);

    assert_eq!(config.engines.len(), 2);
    let sf = &config.engines[0];
    assert_eq!(sf.kind, EngineKind::Uci);
    assert_eq!(sf.path.as_deref(), Some(Path::new("engines/stockfish/stockfish")));
    assert_eq!(sf.args, vec!["--quiet".to_string()]);
    assert_eq!(sf.options.get("Threads").map(String::as_str), Some("2"));
    assert_eq!(config.engines[1].max_depth, Some(2));
}

#[test]
fn test_unknown_kind_is_rejected() {
    let text = "[[engines]]\nname = \"X\"\nkind = \"neural\"\n";
    assert!(AppConfig::from_toml(text).is_err());
}

#[test]
fn test_round_trip_through_toml() {
    let mut config = AppConfig::default();
    config.engines.push(EngineConfig::uci("Lc0", "/usr/bin/lc0"));
    let text = config.to_toml().unwrap();
    assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let path = std::env::temp_dir().join("session-config-that-does-not-exist.toml");
    assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let path = std::env::temp_dir().join(format!("session-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[defaults\n").unwrap();
    let err = AppConfig::load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
