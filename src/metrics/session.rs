use std::time::{Duration, Instant};

use crate::game::Direction;

/// Session-level stats for the header: survival time of the current round,
/// best score so far, and how the command stream is behaving.
pub struct SessionMetrics {
    round_started: Instant,
    elapsed: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Commands the engine actually turned on, across the whole session.
    pub turns_applied: u32,
    pub last_command: Option<Direction>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            elapsed: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            turns_applied: 0,
            last_command: None,
        }
    }

    /// Refresh the elapsed-time reading; called from the render timer.
    pub fn update(&mut self) {
        self.elapsed = self.round_started.elapsed();
    }

    pub fn on_round_start(&mut self) {
        self.round_started = Instant::now();
        self.elapsed = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    /// Record a command delivered to the engine and whether it turned the
    /// snake.
    pub fn on_command(&mut self, command: Direction, applied: bool) {
        self.last_command = Some(command);
        if applied {
            self.turns_applied += 1;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }

    pub fn format_last_command(&self) -> String {
        match self.last_command {
            Some(command) => command.to_string(),
            None => "-".to_string(),
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
