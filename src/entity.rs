use crate::direction::{Dir, Facing};

/// Grid cell addressed by row then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Applies `dir` and returns the new cell only when it stays inside a
    /// `size`×`size` board.
    pub fn step(self, dir: Dir, size: usize) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let col = self.col.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        if row >= size || col >= size {
            return None;
        }
        Some(Pos { row, col })
    }
}

/// Player or ghost. Plain data; movement rules live in the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub pos: Pos,
    pub facing: Facing,
}

impl Character {
    pub const fn new(row: usize, col: usize, facing: Facing) -> Self {
        Self {
            pos: Pos::new(row, col),
            facing,
        }
    }

    pub(crate) fn go(&mut self, to: Pos, dir: Dir) {
        self.pos = to;
        if let Some(facing) = dir.facing() {
            self.facing = facing;
        }
    }
}
