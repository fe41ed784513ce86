// rounds are played back to back; escape is only looked at on the prompts
// between rounds and between games, never while moving around
use std::io::{Stdout, Write};

use anyhow::Context;
use log::{debug, info, warn};

use crate::config::Config;
use crate::input::{Key, KeyReader, KeySource};
use crate::manager::{GameEvent, GameManager};
use crate::player::PlayerController;
use crate::position::Position;
use crate::screen::{Screen, PLAYER_COLOR, WALL};
use crate::sound::{Clip, SoundManager};

const NEXT_ROUND_PROMPT: &str =
    "Press any key to continue into the next round, or \"ESC\" to exit...";
const NEW_GAME_PROMPT: &str = "Press any key to start a new game, or \"ESC\" to exit...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Game<K: KeySource = KeyReader, W: Write = Stdout> {
    manager: GameManager,
    player: PlayerController,
    screen: Screen<W>,
    keys: K,
    sound: SoundManager,
}

impl Game {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let keys = KeyReader::new()?;
        Ok(Game::with_parts(
            config,
            keys,
            Screen::new(config.width, config.height),
        ))
    }
}

impl<K: KeySource, W: Write> Game<K, W> {
    pub fn with_parts(config: &Config, keys: K, screen: Screen<W>) -> Self {
        Game {
            manager: GameManager::new(config.rounds, config.seed),
            player: PlayerController::new(config.player, config.seed),
            screen,
            keys,
            sound: SoundManager::new(config.mute),
        }
    }

    /// Play until escape is pressed on a prompt.
    pub fn play(&mut self) -> anyhow::Result<()> {
        self.screen.set_title("Maze")?;
        self.screen.hide_cursor()?;
        let result = self.run();
        // leave a usable terminal behind, whatever happened
        if let Err(e) = self.screen.clear() {
            warn!("Could not clear the screen: {e}");
        }
        if let Err(e) = self.screen.show_cursor() {
            warn!("Could not show the cursor again: {e}");
        }
        result
    }

    fn run(&mut self) -> anyhow::Result<()> {
        self.screen
            .show_intro(self.player.glyph(), self.manager.max_rounds())?;
        self.keys.read_key()?;

        loop {
            for _ in 0..self.manager.max_rounds() {
                self.play_round()?;
                if self.prompt(NEXT_ROUND_PROMPT)? == Flow::Quit {
                    return Ok(());
                }
                self.screen.clear()?;
                self.manager.resume();
            }

            self.sound.play(Clip::GameOver);
            let result = self.manager.display_score();
            self.screen.show_final_score(&result)?;
            if self.prompt(NEW_GAME_PROMPT)? == Flow::Quit {
                return Ok(());
            }
            self.screen.clear()?;
            self.manager.new_game();
            info!("New game");
        }
    }

    /// Generate, draw and play one round until the exit is reached.
    fn play_round(&mut self) -> anyhow::Result<()> {
        // the display may have been resized since the last round
        let (width, height) = self.screen.size();
        let layout = self.manager.generate_round(width, height)?;
        self.screen
            .render_round(&layout)
            .context("Could not draw the round")?;
        self.sound.play(Clip::RoundStart);

        let spawn = self.player.spawn(width, height);
        self.draw_player(spawn)?;

        while self.manager.is_running() {
            let key = self.keys.read_key()?;
            self.step(key)?;
        }

        self.screen
            .show_round_results(self.manager.round(), self.manager.score())?;
        Ok(())
    }

    /// Move the player for one key press and react to whatever it ran into.
    ///
    /// Returns `true` if the player had to respawn.
    fn step(&mut self, key: Key) -> anyhow::Result<bool> {
        let pos = self.player.apply_input(key);
        self.draw_player(pos)?;

        let mut walls_hit = Vec::new();
        for event in self.manager.check_collisions(pos) {
            match event {
                GameEvent::BonusCollected(bonus) => {
                    debug!("Bonus point at {:?}, score {}", bonus, self.manager.score());
                    self.sound.play(Clip::Bonus);
                }
                GameEvent::ExitReached => self.sound.play(Clip::Exit),
                GameEvent::WallHit(wall) => {
                    self.sound.play(Clip::Wall);
                    walls_hit.push(wall);
                }
            }
        }

        if !self.manager.take_collision() {
            return Ok(false);
        }
        let vacated = self.player.respawn();
        self.screen.erase(vacated)?;
        // the player was drawn over the wall, put it back
        let wall_color = self.manager.wall_color();
        for wall in walls_hit {
            self.screen.draw(wall, WALL, wall_color)?;
        }
        self.draw_player(self.player.position())?;
        Ok(true)
    }

    fn draw_player(&mut self, pos: Position) -> anyhow::Result<()> {
        self.screen
            .draw(pos, self.player.glyph(), PLAYER_COLOR)
            .context("Could not draw the player")
    }

    fn prompt(&mut self, text: &str) -> anyhow::Result<Flow> {
        self.screen.show_prompt(text)?;
        Ok(match self.keys.read_key()? {
            Key::Escape => Flow::Quit,
            _ => Flow::Continue,
        })
    }
}
