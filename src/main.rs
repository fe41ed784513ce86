use clap::Parser;

use crate::config::Config;
use crate::game::Game;

mod config;
mod game;
mod input;
mod manager;
mod player;
mod position;
mod screen;
mod sound;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();
    config.validate()?;

    let mut game = Game::new(&config)?;
    game.play()
}
