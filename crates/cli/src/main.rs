//! Chess session CLI
//!
//! Play against an engine, analyse a position or watch two engines play.

mod args;
mod input;
mod interactive;
mod render;
mod watch;

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chess_core::{Color, Position};
use session::{
    AnalysisStart, AppConfig, DifficultyLevel, DifficultyPolicy, DualEngineOrchestrator, EngineHandle,
    EngineRegistry, MatchConfig, Mode, SessionController,
};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::interactive::Terminal;

const DEFAULT_CONFIG: &str = "chess.toml";

fn print_usage() {
    println!("Chess session");
    println!();
    println!("Usage:");
    println!("  chess-session play [--color white|black] [--engine NAME] [--level L] [--fen FEN]");
    println!("  chess-session analyze [--from FEN|PGN-FILE|PGN] [--random] [--clear] [--engine NAME]");
    println!("  chess-session match <engineA> <engineB> [--level-a L] [--level-b L]");
    println!("                      [--max-plies N] [--delay MS] [--fen FEN]");
    println!("  chess-session engines");
    println!();
    println!("Every command takes --config PATH (default {DEFAULT_CONFIG}).");
    println!("Levels: trivial, easy, medium, hard, maximum");
    println!();
    println!("Examples:");
    println!("  chess-session play --color black --level easy");
    println!("  chess-session match Classical Random --max-plies 200 --delay 250");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = Args::parse(&raw)?;
    if args.command.is_empty() || args.has("--help") {
        print_usage();
        return Ok(());
    }

    let config_path = args.value("--config").unwrap_or(DEFAULT_CONFIG);
    let config = AppConfig::load(Path::new(config_path))?;
    let registry = EngineRegistry::from_config(&config.engines).context("no usable engines")?;
    tracing::info!(config = config_path, engines = registry.len(), "ready");

    let outcome = match args.command.as_str() {
        "play" => run_play(&args, &config, &registry),
        "analyze" | "analyse" => run_analysis(&args, &config, &registry),
        "match" => run_match(&args, &config, &registry),
        "engines" => {
            for name in registry.names() {
                println!("{name}");
            }
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            Ok(())
        }
    };
    registry.shutdown();
    outcome
}

fn pick_engine(registry: &EngineRegistry, name: Option<&str>) -> Result<EngineHandle> {
    match name {
        None => Ok(registry.default_engine()),
        Some(name) => match registry.get(name) {
            Some(engine) => Ok(engine),
            None => bail!("no engine named '{name}' (have: {})", registry.names().join(", ")),
        },
    }
}

fn level(args: &Args, flag: &str, config: &AppConfig) -> Result<DifficultyLevel> {
    Ok(args.parsed(flag)?.unwrap_or(config.defaults.difficulty))
}

fn tuned(session: SessionController, config: &AppConfig) -> SessionController {
    session
        .with_hint_time(config.defaults.hint_time())
        .with_autoplay_speed(config.defaults.autoplay_speed)
}

fn run_play(args: &Args, config: &AppConfig, registry: &EngineRegistry) -> Result<()> {
    let human = match args.value("--color").map(str::to_lowercase).as_deref() {
        None | Some("white") | Some("w") => Color::White,
        Some("black") | Some("b") => Color::Black,
        Some(other) => bail!("--color must be white or black, got '{other}'"),
    };
    let engine = pick_engine(registry, args.value("--engine"))?;
    let policy = DifficultyPolicy::new(engine, level(args, "--level", config)?);
    let mut session = tuned(SessionController::new(Mode::Play { human }, policy), config);
    if let Some(fen) = args.value("--fen") {
        session.load_fen(fen)?;
    }

    let session = Terminal::new(session, registry.clone(), config.save.human_vs_engine.clone()).run()?;
    offer_save(&session, &config.save.human_vs_engine);
    Ok(())
}

fn run_analysis(args: &Args, config: &AppConfig, registry: &EngineRegistry) -> Result<()> {
    let start = if args.has("--random") {
        AnalysisStart::Random
    } else if args.has("--clear") {
        AnalysisStart::Clear
    } else {
        AnalysisStart::from_input(args.value("--from").unwrap_or(""))?
    };
    let record = start.into_record(&mut rand::thread_rng())?;
    let engine = pick_engine(registry, args.value("--engine"))?;
    let policy = DifficultyPolicy::new(engine, level(args, "--level", config)?);
    let session = tuned(SessionController::from_record(Mode::Analysis, policy, record)?, config);

    let session = Terminal::new(session, registry.clone(), config.save.analysis.clone()).run()?;
    offer_save(&session, &config.save.analysis);
    Ok(())
}

fn run_match(args: &Args, config: &AppConfig, registry: &EngineRegistry) -> Result<()> {
    let [a, b] = args.positional.as_slice() else {
        bail!("match needs exactly two engine names");
    };
    let engine_a = pick_engine(registry, Some(a.as_str()))?;
    let engine_b = pick_engine(registry, Some(b.as_str()))?;
    if engine_a.same_engine(&engine_b) {
        bail!("both sides would use the same engine instance; configure a second entry");
    }
    let policy_a = DifficultyPolicy::new(engine_a, level(args, "--level-a", config)?);
    let policy_b = DifficultyPolicy::new(engine_b, level(args, "--level-b", config)?);

    let start = match args.value("--fen") {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("invalid FEN '{fen}'"))?,
        None => Position::startpos(),
    };
    let match_config = MatchConfig {
        max_plies: args.parsed("--max-plies")?.unwrap_or(config.defaults.max_plies),
        move_delay: args
            .parsed::<u64>("--delay")?
            .map(std::time::Duration::from_millis)
            .unwrap_or_else(|| config.defaults.move_delay()),
    };

    println!("=== Match: {a} vs {b} ===");
    let orch = DualEngineOrchestrator::start(policy_a, policy_b, start, match_config)?;
    watch::run(orch, &config.save.engine_vs_engine)
}

/// Saves games that have at least one move.
fn offer_save(session: &SessionController, dir: &Path) {
    if session.tree().main_line().is_empty() {
        return;
    }
    match session::pgn::save_game(&session.record(), dir) {
        Ok(path) => println!("game saved to {}", path.display()),
        Err(e) => eprintln!("Warning: {e}"),
    }
}
