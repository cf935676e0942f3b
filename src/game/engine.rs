use rand::Rng;

use super::{
    action::Direction,
    config::GameConfig,
    state::{GameState, Phase, Position, Snake},
};

/// Terminal condition that ended a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Head left the grid.
    Wall,
    /// Head ran into the body.
    Body,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The command was accepted as a turn this tick.
    pub turned: bool,
    /// The head landed on the snack.
    pub ate_snack: bool,
    /// The round ended, and how.
    pub collision: Option<Collision>,
}

/// The grid engine: applies at most one command per tick, advances the body
/// with turn propagation, and runs the wall, snack and self-collision checks
/// in that order.
pub struct GridEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GridEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    /// Fresh state: a single head segment at the spawn cell and a snack on a
    /// free cell. Also the restart transition out of `GameOver`.
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::spawn_at(self.config.spawn());
        let snack = self.spawn_snack(&snake);
        GameState::new(snake, snack, self.config.rows)
    }

    /// Advance the game by one tick. A tick during `GameOver` is a no-op;
    /// the restart decision belongs to whoever is driving the loop.
    pub fn tick(&mut self, state: &mut GameState, command: Option<Direction>) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if state.phase == Phase::GameOver {
            return outcome;
        }

        if let Some(cmd) = command {
            outcome.turned = state.snake.steer(cmd);
        }

        state.snake.advance();

        // Wall check comes strictly first: an out-of-bounds head is not a
        // valid position for the snack or body comparisons.
        let head = state.snake.head();
        if !state.is_in_bounds(head) {
            state.phase = Phase::GameOver;
            outcome.collision = Some(Collision::Wall);
            return outcome;
        }

        if head == state.snack {
            state.snake.grow();
            state.snack = self.spawn_snack(&state.snake);
            outcome.ate_snack = true;
        }

        if state.snake.hits_body(head) {
            state.phase = Phase::GameOver;
            outcome.collision = Some(Collision::Body);
        }

        outcome
    }

    /// Uniformly random cell not occupied by the snake.
    fn spawn_snack(&mut self, snake: &Snake) -> Position {
        loop {
            let x = self.rng.gen_range(0..self.config.rows) as i32;
            let y = self.rng.gen_range(0..self.config.rows) as i32;
            let pos = Position::new(x, y);
            if !snake.occupies(pos) {
                return pos;
            }
        }
    }
}
