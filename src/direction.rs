#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Dir {
    pub const MOVES: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// Column delta first, row delta second.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
            Dir::Stay => (0, 0),
        }
    }

    /// Orientation a character ends up with after taking this step.
    /// `Stay` keeps whatever it had.
    pub fn facing(self) -> Option<Facing> {
        match self {
            Dir::Up => Some(Facing::Up),
            Dir::Down => Some(Facing::Down),
            Dir::Left => Some(Facing::Left),
            Dir::Right => Some(Facing::Right),
            Dir::Stay => None,
        }
    }
}

/// Which way a character is drawn. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Ghost marker used in the rendered grid and in snapshot files.
    pub fn ghost_glyph(self) -> char {
        match self {
            Facing::Up => 'U',
            Facing::Down => 'D',
            Facing::Left => 'L',
            Facing::Right => 'R',
        }
    }

    pub fn from_ghost_glyph(c: char) -> Option<Facing> {
        match c {
            'U' => Some(Facing::Up),
            'D' => Some(Facing::Down),
            'L' => Some(Facing::Left),
            'R' => Some(Facing::Right),
            _ => None,
        }
    }
}
