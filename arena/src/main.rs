use std::env;
use std::fs;
use std::str::FromStr;

use anyhow::{Context, Result};
use cuatro::{GameConfig, Line, MoveRecord, Seat, Session, Status};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let settings = Settings::load(|key| env::var(key).ok())?;
    info!(
        seed = settings.seed,
        games = settings.games,
        "starting arena"
    );

    let mut session = Session::new(settings.config, StdRng::seed_from_u64(settings.seed))?;
    for game in 1..=settings.games {
        if game > 1 {
            session.reset();
        }
        let summary = play_out(&mut session, game)?;
        info!("final board\n{}", session.state().board());
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,cuatro=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug)]
struct Settings {
    config: GameConfig,
    seed: u64,
    games: usize,
}

impl Settings {
    /// Reads `CUATRO_CONFIG` (a JSON file), `CUATRO_SEED` and `CUATRO_GAMES`.
    /// Both seats are always played by the engine.
    fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup("CUATRO_CONFIG") {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {path}"))?;
                parse_config(&text).with_context(|| format!("invalid config file {path}"))?
            }
            None => GameConfig::default(),
        };
        config.seats = [Seat::Engine, Seat::Engine];
        config.validate()?;

        let seed = match lookup("CUATRO_SEED") {
            Some(raw) => parse_value("CUATRO_SEED", &raw)?,
            None => rand::rng().random(),
        };
        let games = match lookup("CUATRO_GAMES") {
            Some(raw) => parse_value("CUATRO_GAMES", &raw)?,
            None => 1,
        };
        Ok(Self {
            config,
            seed,
            games,
        })
    }
}

fn parse_config(text: &str) -> Result<GameConfig> {
    let config: GameConfig = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{key} must be a number, got {raw:?}"))
}

#[derive(Debug, Serialize)]
struct Summary {
    game: usize,
    status: Status,
    winner: Option<String>,
    moves: usize,
    winning_line: Option<Line>,
    history: Vec<MoveRecord>,
}

fn play_out<R: Rng>(session: &mut Session<R>, game: usize) -> Result<Summary> {
    while session.step()?.is_some() {}
    let state = session.state();
    anyhow::ensure!(state.is_over(), "game {game} stopped before it was decided");
    info!(
        game,
        status = ?state.status(),
        winner = session.winner_name().unwrap_or("-"),
        moves = state.history().len(),
        "game finished"
    );
    Ok(Summary {
        game,
        status: state.status(),
        winner: session.winner_name().map(str::to_string),
        moves: state.history().len(),
        winning_line: state.winning_line().cloned(),
        history: state.history().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn settings_from_variables() {
        let vars = [("CUATRO_SEED", "7"), ("CUATRO_GAMES", " 3 ")];
        let settings = Settings::load(lookup(&vars)).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.games, 3);
        assert_eq!(settings.config.size, 5);
        assert_eq!(settings.config.seats, [Seat::Engine, Seat::Engine]);
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = Settings::load(lookup(&[("CUATRO_GAMES", "many")])).unwrap_err();
        assert!(err.to_string().contains("CUATRO_GAMES"));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let vars = [("CUATRO_CONFIG", "/nonexistent/cuatro.json")];
        let err = Settings::load(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn config_text_is_validated() {
        let config = parse_config(r#"{"size": 4, "win_length": 3}"#).unwrap();
        assert_eq!((config.size, config.win_length), (4, 3));
        assert!(parse_config(r#"{"size": 2, "win_length": 3}"#).is_err());
        assert!(parse_config("not json").is_err());
    }

    #[test]
    fn engine_game_is_summarised() {
        let settings = Settings::load(lookup(&[("CUATRO_SEED", "1")])).unwrap();
        let rng = StdRng::seed_from_u64(settings.seed);
        let mut session = Session::new(settings.config, rng).unwrap();
        let summary = play_out(&mut session, 1).unwrap();
        assert_ne!(summary.status, Status::InProgress);
        assert_eq!(summary.moves, summary.history.len());
        assert_eq!(summary.winner.is_some(), summary.winning_line.is_some());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["game"], 1);
    }
}
