use anyhow::bail;
use clap::Parser;

pub const WINNING_SCORE: i32 = 10;
pub const BONUS_SCORE: i32 = 5;
pub const COLLISION_PENALTY: i32 = 5;
pub const MAX_ROUNDS: u8 = 10;

// generation ranges below are laid out for at least this much room
pub const MIN_WIDTH: i32 = 80;
pub const MIN_HEIGHT: i32 = 25;

/// Find the exit, grab the bonus points, stay off the walls
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Rounds played before the final score is shown
    #[arg(short, long, default_value_t = MAX_ROUNDS)]
    pub rounds: u8,

    /// Disable sound effects
    #[arg(short, long)]
    pub mute: bool,

    /// Random seed, for reproducible layouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Display width, instead of the detected terminal width
    #[arg(long)]
    pub width: Option<u16>,

    /// Display height, instead of the detected terminal height
    #[arg(long)]
    pub height: Option<u16>,

    /// Character drawn for the player
    #[arg(short, long, default_value_t = 'O')]
    pub player: char,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rounds: MAX_ROUNDS,
            mute: false,
            seed: None,
            width: None,
            height: None,
            player: 'O',
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rounds == 0 {
            bail!("At least one round must be played");
        }
        if self.player.is_control() || self.player.is_whitespace() {
            bail!("Player character must be visible, got {:?}", self.player);
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            validate_display_size(width as i32, height as i32)?;
        }
        Ok(())
    }
}

/// Fail when the display cannot hold the generation ranges.
pub fn validate_display_size(width: i32, height: i32) -> anyhow::Result<()> {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        bail!(
            "Display is {}x{}, but at least {}x{} is required",
            width,
            height,
            MIN_WIDTH,
            MIN_HEIGHT
        );
    }
    Ok(())
}
