use std::collections::HashMap;

use super::action::Direction;

/// A cell on the game grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta.
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction.
    pub fn moved_in(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// One body cell together with the direction it is currently travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub position: Position,
    pub direction: Direction,
}

impl Segment {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// The snake: body segments head-first, plus the turn map that propagates
/// direction changes down the body.
///
/// A turn is recorded at the cell where the head changed direction. Each
/// segment adopts the turn exactly when it reaches that cell; the tail
/// consumes the entry once it has passed through.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at index 0. Never empty.
    pub segments: Vec<Segment>,
    /// Cells holding a not-yet-fully-propagated direction change.
    pub pending_turns: HashMap<Position, Direction>,
    /// Heading used to vet incoming commands; updated as soon as a turn is
    /// accepted, before the body has caught up.
    pub heading: Direction,
}

impl Snake {
    /// A single head segment at `spawn`, heading right.
    pub fn spawn_at(spawn: Position) -> Self {
        Self {
            segments: vec![Segment::new(spawn, Direction::Right)],
            pending_turns: HashMap::new(),
            heading: Direction::Right,
        }
    }

    /// Current head position.
    pub fn head(&self) -> Position {
        self.segments[0].position
    }

    /// Body length, which is also the score.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Record a turn at the head cell and update the heading. Commands
    /// parallel to the current heading are ignored, so reversal through the
    /// body is impossible. Returns whether the turn was accepted.
    pub fn steer(&mut self, command: Direction) -> bool {
        if !command.is_orthogonal_to(self.heading) {
            return false;
        }
        self.pending_turns.insert(self.head(), command);
        self.heading = command;
        true
    }

    /// Move every segment one cell. A segment sitting on a pending-turn cell
    /// adopts that turn first; the tail removes the entry, at which point the
    /// turn has propagated through the whole body.
    pub fn advance(&mut self) {
        let tail_index = self.segments.len() - 1;
        for i in 0..=tail_index {
            let at = self.segments[i].position;
            if let Some(&turn) = self.pending_turns.get(&at) {
                self.segments[i].direction = turn;
                if i == tail_index {
                    self.pending_turns.remove(&at);
                }
            }
            let direction = self.segments[i].direction;
            self.segments[i].position = at.moved_in(direction);
        }
    }

    /// Append a segment behind the tail, continuing the tail's direction.
    pub fn grow(&mut self) {
        let tail = *self.segments.last().unwrap();
        let (dx, dy) = tail.direction.delta();
        self.segments.push(Segment::new(
            tail.position.moved_by(-dx, -dy),
            tail.direction,
        ));
    }

    /// True if `pos` coincides with any non-head segment.
    pub fn hits_body(&self, pos: Position) -> bool {
        self.segments[1..].iter().any(|s| s.position == pos)
    }

    /// True if any segment (head included) occupies `pos`.
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.iter().any(|s| s.position == pos)
    }
}

/// Lifecycle of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

/// Complete game state. Owned and mutated only by the engine's tick loop;
/// everything else sees read-only snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub snack: Position,
    pub rows: usize,
    pub phase: Phase,
}

impl GameState {
    pub fn new(snake: Snake, snack: Position, rows: usize) -> Self {
        Self {
            snake,
            snack,
            rows,
            phase: Phase::Running,
        }
    }

    /// Check whether a position lies within the grid.
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.rows as i32 && pos.y >= 0 && pos.y < self.rows as i32
    }

    /// Score shown to the player: current body length.
    pub fn score(&self) -> u32 {
        self.snake.len() as u32
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}
