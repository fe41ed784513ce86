//! Drawing on the terminal with ANSI escape sequences

use std::io::{self, Stdout, Write};

use colored::{Color, Colorize};

use crate::config::{BONUS_SCORE, COLLISION_PENALTY, MIN_HEIGHT, MIN_WIDTH, WINNING_SCORE};
use crate::manager::{FinalScore, RoundLayout};
use crate::position::Position;

pub const WALL: char = '█';
pub const POINT: char = '■';

pub const PLAYER_COLOR: Color = Color::Green;
pub const EXIT_COLOR: Color = Color::Red;
pub const BONUS_COLOR: Color = Color::Yellow;

pub struct Screen<W: Write = Stdout> {
    out: W,
    /// Size given on the command line, wins over the terminal's
    size_override: (Option<u16>, Option<u16>),
}

impl Screen<Stdout> {
    pub fn new(width: Option<u16>, height: Option<u16>) -> Self {
        Screen::with_writer(io::stdout(), width, height)
    }
}

impl<W: Write> Screen<W> {
    pub fn with_writer(out: W, width: Option<u16>, height: Option<u16>) -> Self {
        Screen {
            out,
            size_override: (width, height),
        }
    }

    /// Width and height of the display in cells.
    pub fn size(&self) -> (i32, i32) {
        let (width, height) = terminal_size().unwrap_or((MIN_WIDTH, MIN_HEIGHT));
        (
            self.size_override.0.map_or(width, i32::from),
            self.size_override.1.map_or(height, i32::from),
        )
    }

    pub fn set_title(&mut self, title: &str) -> io::Result<()> {
        write!(self.out, "\x1B]0;{}\x07", title)?;
        self.out.flush()
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        write!(self.out, "\x1B[?25l")?;
        self.out.flush()
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        write!(self.out, "\x1B[?25h")?;
        self.out.flush()
    }

    pub fn clear(&mut self) -> io::Result<()> {
        write!(self.out, "\x1B[2J\x1B[1;1H")?;
        self.out.flush()
    }

    fn move_to(&mut self, pos: Position) -> io::Result<()> {
        // ANSI rows and columns start at 1
        write!(self.out, "\x1B[{};{}H", pos.y + 1, pos.x + 1)
    }

    fn put(&mut self, pos: Position, glyph: char, color: Color) -> io::Result<()> {
        if pos.x < 0 || pos.y < 0 {
            return Ok(());
        }
        self.move_to(pos)?;
        write!(self.out, "{}", glyph.to_string().as_str().color(color))
    }

    pub fn draw(&mut self, pos: Position, glyph: char, color: Color) -> io::Result<()> {
        self.put(pos, glyph, color)?;
        self.out.flush()
    }

    pub fn erase(&mut self, pos: Position) -> io::Result<()> {
        if pos.x < 0 || pos.y < 0 {
            return Ok(());
        }
        self.move_to(pos)?;
        write!(self.out, " ")?;
        self.out.flush()
    }

    /// Draw walls, exit and bonus points of a round on a cleared screen.
    pub fn render_round(&mut self, layout: &RoundLayout) -> io::Result<()> {
        self.clear()?;
        for wall in layout.walls {
            self.put(*wall, WALL, layout.wall_color)?;
        }
        self.put(layout.exit, POINT, EXIT_COLOR)?;
        for bonus in layout.bonus_points {
            self.put(*bonus, POINT, BONUS_COLOR)?;
        }
        self.out.flush()
    }

    /// Controls and legend, shown once before the first game.
    pub fn show_intro(&mut self, player: char, rounds: u8) -> io::Result<()> {
        self.clear()?;
        writeln!(self.out, "--- Controls ---\n")?;
        self.legend_line("Arrow keys", "Move around", Color::Cyan)?;

        writeln!(self.out, "\n\n--- Legend ---\n")?;
        self.legend_line(&player.to_string(), "Player", PLAYER_COLOR)?;
        self.legend_line(
            &POINT.to_string(),
            &format!("Exit point  (+{} points)", WINNING_SCORE),
            EXIT_COLOR,
        )?;
        self.legend_line(
            &POINT.to_string(),
            &format!("Bonus point  (+{} points)", BONUS_SCORE),
            BONUS_COLOR,
        )?;
        self.legend_line(
            &WALL.to_string(),
            &format!("Wall  (-{} points)", COLLISION_PENALTY),
            Color::BrightBlack,
        )?;

        writeln!(
            self.out,
            "\n\nThe main goal of the game is to reach the exit point (red square),\n\
             while avoiding the walls as much as possible.\n\n\
             Your score also gets determined in {} rounds.\n\n\n\
             Press any key to start the game...",
            rounds
        )?;
        self.out.flush()
    }

    fn legend_line(&mut self, symbol: &str, text: &str, color: Color) -> io::Result<()> {
        writeln!(self.out, "{} - {}", symbol.color(color), text)
    }

    pub fn show_round_results(&mut self, round: u8, score: i32) -> io::Result<()> {
        self.clear()?;
        writeln!(self.out, "--- Game Results (Round {}) ---\n", round)?;
        writeln!(self.out, "Score: {}", score)?;
        self.out.flush()
    }

    pub fn show_final_score(&mut self, result: &FinalScore) -> io::Result<()> {
        writeln!(self.out, "Your final score: {}", result.score)?;
        writeln!(self.out, "Top score: {}", result.top_score)?;
        self.out.flush()
    }

    pub fn show_prompt(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "\n\n{}", text)?;
        self.out.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

/// Size of the terminal, `None` if there is no terminal to ask.
fn terminal_size() -> Option<(i32, i32)> {
    let (cols, rows) = crossterm::terminal::size().ok()?;
    if cols == 0 || rows == 0 {
        return None;
    }
    Some((i32::from(cols), i32::from(rows)))
}
