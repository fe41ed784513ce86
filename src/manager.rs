//! Round generation, collision detection and scoring
//!
//! A round is a field of walls scattered at random around a full border,
//! with a single exit point and up to three bonus points. Nothing in here
//! touches the terminal: generation hands back coordinates and collisions
//! hand back [GameEvent]s for the caller to draw and play.

use colored::Color;
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::{validate_display_size, BONUS_SCORE, COLLISION_PENALTY, WINNING_SCORE};
use crate::position::Position;

/// Colors a round's walls are drawn in, one is picked per round.
pub const WALL_COLORS: [Color; 7] = [
    Color::Green,
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::White,
    Color::BrightBlack,
    Color::BrightCyan,
];

/// Something that happened when the player stepped on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Bonus point at the position was picked up
    BonusCollected(Position),
    /// Player reached the exit, the round is over
    ExitReached,
    /// Player walked into a wall, one event per wall entry at the position
    WallHit(Position),
}

/// Coordinates of a freshly generated round, for drawing
#[derive(Debug, Clone, Copy)]
pub struct RoundLayout<'a> {
    pub walls: &'a [Position],
    pub exit: Position,
    pub bonus_points: &'a [Position],
    pub wall_color: Color,
}

/// Result of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: i32,
    pub top_score: i32,
}

pub struct GameManager {
    random: StdRng,

    /// Every wall cell, border included. May contain duplicates.
    walls: Vec<Position>,
    /// Exactly one entry once a round has been generated
    exits: Vec<Position>,
    bonus_points: Vec<Position>,

    score: i32,
    /// Best final score of this process, `None` until a game is finished
    top_score: Option<i32>,
    round: u8,
    max_rounds: u8,
    is_running: bool,
    has_collided: bool,
    wall_color: Color,
}

impl GameManager {
    pub fn new(max_rounds: u8, seed: Option<u64>) -> Self {
        GameManager {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_os_rng()
            },
            walls: Vec::new(),
            exits: Vec::new(),
            bonus_points: Vec::new(),
            score: 0,
            top_score: None,
            round: 0,
            max_rounds,
            is_running: true,
            has_collided: false,
            wall_color: WALL_COLORS[0],
        }
    }

    /// Lay out a new round for a `width` x `height` display.
    ///
    /// Returns error, if the display is too small for the generation ranges.
    pub fn generate_round(&mut self, width: i32, height: i32) -> anyhow::Result<RoundLayout<'_>> {
        validate_display_size(width, height)?;

        // clear the old coordinates for a new round
        self.walls.clear();
        self.exits.clear();
        self.bonus_points.clear();
        self.wall_color = WALL_COLORS[self.random.random_range(0..WALL_COLORS.len())];

        self.generate_borders(width, height);
        self.generate_walls(width, height);
        self.generate_exit_point(width, height);
        self.generate_bonus_points(width, height);

        self.is_running = true;
        self.has_collided = false;
        debug!(
            "Round {} generated on {}x{}: {} walls, exit at {:?}, {} bonus points",
            self.round + 1,
            width,
            height,
            self.walls.len(),
            self.exits[0],
            self.bonus_points.len()
        );
        Ok(self.layout())
    }

    fn generate_borders(&mut self, width: i32, height: i32) {
        // vertical borders
        for y in 0..height {
            self.walls.push(Position::new(0, y));
            self.walls.push(Position::new(width - 1, y));
        }
        // horizontal borders, corners are already in
        for x in 1..width - 1 {
            self.walls.push(Position::new(x, 0));
            self.walls.push(Position::new(x, height - 1));
        }
    }

    fn generate_walls(&mut self, width: i32, height: i32) {
        let num_walls = self.random.random_range(width * 6..width * 8);
        for _ in 0..num_walls {
            let x = self.random.random_range(1..width - 1);
            let y = self.random.random_range(1..height - 1);
            self.walls.push(Position::new(x, y));
        }
    }

    fn generate_exit_point(&mut self, width: i32, height: i32) {
        let x = self.random.random_range(2..width - 2);
        let y = self.random.random_range(2..height - 2);
        self.exits.push(Position::new(x, y));
    }

    fn generate_bonus_points(&mut self, width: i32, height: i32) {
        // 0-3 bonus points per round
        let num_points = self.random.random_range(0..4);
        for _ in 0..num_points {
            let x = self.random.random_range(width - 78..width - 2);
            let y = self.random.random_range(height - 23..height - 2);
            self.place_bonus_point(Position::new(x, y));
        }
    }

    fn place_bonus_point(&mut self, bonus: Position) {
        self.bonus_points.push(bonus);
        // bonus points win over walls, every entry on the cell goes
        self.walls.retain(|wall| *wall != bonus);
    }

    /// Check the player's position against the bonus points, the exit and
    /// the walls, in that order.
    ///
    /// Walls are only checked if the round is still running after the exit
    /// check.
    pub fn check_collisions(&mut self, player: Position) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if let Some(idx) = self.bonus_points.iter().position(|p| *p == player) {
            // remove the bonus point to prevent score farming
            self.bonus_points.remove(idx);
            self.score += BONUS_SCORE;
            events.push(GameEvent::BonusCollected(player));
        }

        if self.exits.first() == Some(&player) {
            events.push(GameEvent::ExitReached);
            self.end_round();
        }

        if self.is_running {
            let hits = self.walls.iter().filter(|wall| **wall == player).count();
            for _ in 0..hits {
                self.score -= COLLISION_PENALTY;
                self.has_collided = true;
                events.push(GameEvent::WallHit(player));
            }
        }

        events
    }

    /// Finish the current round successfully.
    pub fn end_round(&mut self) {
        self.round += 1;
        self.score += WINNING_SCORE;
        self.is_running = false;
        info!("Round {} finished, score {}", self.round, self.score);
    }

    /// Consume the collision signal, `true` if the player has to respawn.
    pub fn take_collision(&mut self) -> bool {
        std::mem::take(&mut self.has_collided)
    }

    /// Allow the next round to run
    pub fn resume(&mut self) {
        self.is_running = true;
    }

    /// Settle the final score of the game, updating the top score.
    pub fn display_score(&mut self) -> FinalScore {
        let top_score = match self.top_score {
            Some(top) if top >= self.score => top,
            _ => self.score,
        };
        self.top_score = Some(top_score);
        info!("Game over, score {}, top score {}", self.score, top_score);
        FinalScore {
            score: self.score,
            top_score,
        }
    }

    /// Reset score and round counters for a new game
    pub fn new_game(&mut self) {
        self.score = 0;
        self.round = 0;
        self.is_running = true;
        self.has_collided = false;
    }

    pub fn layout(&self) -> RoundLayout<'_> {
        RoundLayout {
            walls: &self.walls,
            exit: self.exit(),
            bonus_points: &self.bonus_points,
            wall_color: self.wall_color,
        }
    }

    pub fn exit(&self) -> Position {
        self.exits.first().copied().unwrap_or_default()
    }

    pub fn wall_color(&self) -> Color {
        self.wall_color
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn max_rounds(&self) -> u8 {
        self.max_rounds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const WIDTH: i32 = 80;
    const HEIGHT: i32 = 25;

    fn generated(seed: u64) -> GameManager {
        let mut manager = GameManager::new(10, Some(seed));
        manager.generate_round(WIDTH, HEIGHT).unwrap();
        manager
    }

    /// Manager with a hand-made layout
    fn with_layout(walls: Vec<Position>, exit: Position, bonus_points: Vec<Position>) -> GameManager {
        let mut manager = GameManager::new(10, Some(0));
        manager.walls = walls;
        manager.exits = vec![exit];
        manager.bonus_points = bonus_points;
        manager
    }

    #[test]
    fn border_is_complete() {
        for seed in 0..50 {
            let manager = generated(seed);
            let walls: HashSet<_> = manager.walls.iter().copied().collect();
            for x in 0..WIDTH {
                assert!(walls.contains(&Position::new(x, 0)));
                assert!(walls.contains(&Position::new(x, HEIGHT - 1)));
            }
            for y in 0..HEIGHT {
                assert!(walls.contains(&Position::new(0, y)));
                assert!(walls.contains(&Position::new(WIDTH - 1, y)));
            }
        }
    }

    #[test]
    fn border_cells_are_added_once() {
        let mut manager = GameManager::new(10, Some(1));
        manager.generate_borders(WIDTH, HEIGHT);
        let unique: HashSet<_> = manager.walls.iter().collect();
        assert_eq!(manager.walls.len(), unique.len());
        assert_eq!(manager.walls.len() as i32, 2 * WIDTH + 2 * (HEIGHT - 2));
    }

    #[test]
    fn interior_walls_within_range() {
        for seed in 0..50 {
            let mut manager = GameManager::new(10, Some(seed));
            manager.generate_walls(WIDTH, HEIGHT);
            let count = manager.walls.len() as i32;
            assert!((WIDTH * 6..WIDTH * 8).contains(&count), "{} walls", count);
            for wall in &manager.walls {
                assert!((1..WIDTH - 1).contains(&wall.x));
                assert!((1..HEIGHT - 1).contains(&wall.y));
            }
        }
    }

    #[test]
    fn exit_inside_margin() {
        for seed in 0..200 {
            let manager = generated(seed);
            let exit = manager.exit();
            assert_eq!(manager.exits.len(), 1);
            assert!((2..WIDTH - 2).contains(&exit.x), "{:?}", exit);
            assert!((2..HEIGHT - 2).contains(&exit.y), "{:?}", exit);
        }
    }

    #[test]
    fn bonus_points_replace_walls() {
        for seed in 0..200 {
            let manager = generated(seed);
            assert!(manager.bonus_points.len() <= 3);
            for bonus in &manager.bonus_points {
                assert!((WIDTH - 78..WIDTH - 2).contains(&bonus.x));
                assert!((HEIGHT - 23..HEIGHT - 2).contains(&bonus.y));
                assert!(!manager.walls.contains(bonus));
            }
        }
    }

    #[test]
    fn duplicate_walls_under_bonus_are_all_removed() {
        let mut manager = GameManager::new(10, Some(3));
        let cell = Position::new(10, 10);
        manager.walls = vec![cell, Position::new(11, 10), cell, cell];
        manager.place_bonus_point(cell);
        assert_eq!(manager.walls, vec![Position::new(11, 10)]);
        assert_eq!(manager.bonus_points, &[cell]);
        assert!(manager.check_collisions(cell).iter().all(|e| !matches!(e, GameEvent::WallHit(_))));
    }

    #[test]
    fn every_palette_color_is_reachable() {
        let mut manager = GameManager::new(10, Some(7));
        let mut seen = HashSet::new();
        for _ in 0..200 {
            manager.generate_round(WIDTH, HEIGHT).unwrap();
            seen.insert(format!("{:?}", manager.wall_color()));
        }
        assert_eq!(seen.len(), WALL_COLORS.len());
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generated(42);
        let b = generated(42);
        assert_eq!(a.walls, b.walls);
        assert_eq!(a.exit(), b.exit());
        assert_eq!(a.bonus_points, b.bonus_points);
    }

    #[test]
    fn new_round_clears_previous_layout() {
        let mut manager = generated(5);
        manager.bonus_points.push(Position::new(3, 3));
        manager.generate_round(WIDTH, HEIGHT).unwrap();
        assert_eq!(manager.exits.len(), 1);
        assert!(manager.bonus_points.len() <= 3);
        let max_walls = (2 * WIDTH + 2 * (HEIGHT - 2) + WIDTH * 8) as usize;
        assert!(manager.walls.len() < max_walls);
    }

    #[test]
    fn small_display_is_rejected() {
        let mut manager = GameManager::new(10, Some(0));
        assert!(manager.generate_round(79, 25).is_err());
        assert!(manager.generate_round(80, 24).is_err());
    }

    #[test]
    fn collect_bonus() {
        let bonus = Position::new(20, 10);
        let mut manager = with_layout(vec![], Position::new(40, 10), vec![bonus, Position::new(21, 10)]);

        let events = manager.check_collisions(bonus);
        assert_eq!(events, vec![GameEvent::BonusCollected(bonus)]);
        assert_eq!(manager.score(), 5);
        assert_eq!(manager.bonus_points, &[Position::new(21, 10)]);

        // already collected
        assert!(manager.check_collisions(bonus).is_empty());
        assert_eq!(manager.score(), 5);
    }

    #[test]
    fn stacked_bonus_points_are_collected_one_at_a_time() {
        let bonus = Position::new(20, 10);
        let mut manager = with_layout(vec![], Position::new(40, 10), vec![bonus, bonus]);

        manager.check_collisions(bonus);
        assert_eq!(manager.bonus_points.len(), 1);
        assert_eq!(manager.score(), 5);
    }

    #[test]
    fn reach_exit() {
        let exit = Position::new(40, 10);
        let mut manager = with_layout(vec![], exit, vec![]);
        manager.score = 5;

        let events = manager.check_collisions(exit);
        assert_eq!(events, vec![GameEvent::ExitReached]);
        assert_eq!(manager.score(), 15);
        assert!(!manager.is_running());
        assert_eq!(manager.round(), 1);
    }

    #[test]
    fn exit_wins_over_wall() {
        let exit = Position::new(40, 10);
        let mut manager = with_layout(vec![exit], exit, vec![]);

        let events = manager.check_collisions(exit);
        assert_eq!(events, vec![GameEvent::ExitReached]);
        assert_eq!(manager.score(), 10);
        assert!(!manager.take_collision());
    }

    #[test]
    fn hit_wall() {
        let wall = Position::new(30, 12);
        let mut manager = with_layout(vec![wall], Position::new(40, 10), vec![]);
        manager.score = 15;

        let events = manager.check_collisions(wall);
        assert_eq!(events, vec![GameEvent::WallHit(wall)]);
        assert_eq!(manager.score(), 10);
        assert!(manager.is_running());
        assert!(manager.take_collision());
        // the signal is consumed
        assert!(!manager.take_collision());
    }

    #[test]
    fn duplicate_walls_penalize_each() {
        let wall = Position::new(30, 12);
        let mut manager = with_layout(vec![wall, wall, Position::new(1, 1)], Position::new(40, 10), vec![]);

        let events = manager.check_collisions(wall);
        assert_eq!(events.len(), 2);
        assert_eq!(manager.score(), -10);
    }

    #[test]
    fn free_cell_changes_nothing() {
        let mut manager = with_layout(vec![Position::new(1, 1)], Position::new(40, 10), vec![]);
        assert!(manager.check_collisions(Position::new(5, 5)).is_empty());
        assert_eq!(manager.score(), 0);
        assert!(manager.is_running());
        assert!(!manager.take_collision());
    }

    #[test]
    fn top_score_never_decreases() {
        let mut manager = GameManager::new(10, Some(0));
        assert_eq!(manager.top_score, None);

        manager.score = -20;
        assert_eq!(
            manager.display_score(),
            FinalScore {
                score: -20,
                top_score: -20
            }
        );

        manager.new_game();
        manager.score = 35;
        assert_eq!(manager.display_score().top_score, 35);

        manager.new_game();
        manager.score = 12;
        assert_eq!(
            manager.display_score(),
            FinalScore {
                score: 12,
                top_score: 35
            }
        );
        assert_eq!(manager.top_score, Some(35));
    }

    #[test]
    fn new_game_resets_counters() {
        let exit = Position::new(40, 10);
        let mut manager = with_layout(vec![], exit, vec![]);
        manager.check_collisions(exit);
        manager.display_score();

        manager.new_game();
        assert_eq!(manager.score(), 0);
        assert_eq!(manager.round(), 0);
        assert!(manager.is_running());
        assert_eq!(manager.top_score, Some(10));
    }
}
