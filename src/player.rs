use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::input::Key;
use crate::position::Position;

pub struct PlayerController {
    random: StdRng,
    glyph: char,
    spawn_point: Position,
    position: Position,
}

impl PlayerController {
    pub fn new(glyph: char, seed: Option<u64>) -> Self {
        PlayerController {
            random: if let Some(state) = seed {
                // keep the player's draws apart from the layout's
                StdRng::seed_from_u64(state.wrapping_add(1))
            } else {
                StdRng::from_os_rng()
            },
            glyph,
            spawn_point: Position::default(),
            position: Position::default(),
        }
    }

    /// Pick this round's spawn point and put the player on it.
    pub fn spawn(&mut self, width: i32, height: i32) -> Position {
        let x = self.random.random_range(width - 70..width - 11);
        let y = self.random.random_range(height - 20..height - 6);
        self.spawn_point = Position::new(x, y);
        debug!("Spawn point {:?}", self.spawn_point);
        self.spawn_player()
    }

    /// Send the player back to the round's spawn point.
    ///
    /// Returns the position the player was taken off.
    pub fn respawn(&mut self) -> Position {
        let vacated = self.position;
        self.spawn_player();
        vacated
    }

    fn spawn_player(&mut self) -> Position {
        self.position = self.spawn_point;
        self.position
    }

    /// Move one cell for an arrow key, stay put for anything else.
    ///
    /// There is no bounds checking, the border walls keep the player in.
    pub fn apply_input(&mut self, key: Key) -> Position {
        match key {
            Key::Up => self.position.move_up(),
            Key::Down => self.position.move_down(),
            Key::Left => self.position.move_left(),
            Key::Right => self.position.move_right(),
            Key::Escape | Key::Other => {}
        }
        self.position
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }
}
