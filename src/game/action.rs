use std::fmt;

/// Direction of travel on the grid. Doubles as the wire command vocabulary:
/// the four lower-case tokens `left`, `right`, `up`, `down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the delta (dx, dy) for one tick of movement.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Returns true for `Left` and `Right`.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Returns true when the two directions lie on different axes. Only
    /// orthogonal turns are accepted by the snake; a parallel command would
    /// either do nothing or reverse the body through itself.
    pub fn is_orthogonal_to(&self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    /// Parse a command token. Expects the trimmed, lower-cased form; anything
    /// outside the four-word vocabulary is `None`.
    pub fn parse(token: &str) -> Option<Direction> {
        match token {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// The lower-case token used on the wire.
    pub fn token(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
