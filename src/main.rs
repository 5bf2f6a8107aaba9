mod config;
mod error;
mod game;
mod snake;
mod state;
mod term;
mod window;

use std::io;

use anyhow::bail;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Difficulty, GameConfig};

pub type TermInt = u16;
pub type Coords = (u16, u16);

const USAGE: &str = "usage: snake [terminal [1|2|3] | window]";

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logging stays off unless SNAKE_LOG asks for it, raw mode owns the terminal
    let filter = EnvFilter::try_from_env("SNAKE_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("terminal") | None => run_terminal(args.next()),
        Some("window") => run_window(),
        Some(other) => bail!("unknown mode '{}'\n{}", other, USAGE),
    }
}

fn run_terminal(level: Option<String>) -> anyhow::Result<()> {
    let difficulty = match level {
        Some(level) => level.parse::<Difficulty>()?,
        None => game::prompt_difficulty(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let config = GameConfig::terminal(difficulty).with_env_overrides();
    info!(%difficulty, ?config, "Starting terminal game");

    let mut game = game::SnakeGame::new(config, difficulty)?;
    game.run()?;
    Ok(())
}

fn run_window() -> anyhow::Result<()> {
    let config = GameConfig::window().with_env_overrides();
    config.validate()?;
    info!(?config, "Starting windowed game");

    macroquad::Window::from_config(window::window_conf(&config), window::run(config));
    Ok(())
}
