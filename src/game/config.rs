use serde::{Deserialize, Serialize};

use super::state::Position;

/// Configuration for the grid game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square grid, in cells.
    pub rows: usize,
    /// Milliseconds between movement ticks.
    pub tick_ms: u64,
    /// Whether to draw the header/footer chrome and the game-over screen.
    /// With menus off, a finished game resets immediately.
    pub show_menus: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            tick_ms: 250,
            show_menus: true,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Small grid for tests.
    pub fn small() -> Self {
        Self::new(10)
    }

    /// The fixed spawn cell for the snake's head: the grid centre.
    pub fn spawn(&self) -> Position {
        Position::new((self.rows / 2) as i32, (self.rows / 2) as i32)
    }
}
