use std::fmt;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::direction::{Dir, Facing};
use crate::entity::{Character, Pos};

pub const DEFAULT_SIZE: usize = 10;
pub const CHERRY_INTERVAL: u32 = 3;
pub const GHOST_COUNT: usize = 4;
const DOT_SCORE: u32 = 10;
const CHERRY_SCORE: u32 = 200;

pub const UNEATEN: char = '*';
pub const EATEN: char = ' ';
pub const CHERRY: char = 'C';
pub const PLAYER: char = 'P';
pub const COLLISION: char = 'X';

/// Square Pac-Man board: one player, four ghosts, dots and cherries.
///
/// `visited`, `cherries` and the characters are the source of truth; `grid`
/// is rebuilt from them after every change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    score: u32,
    move_count: u32,
    cherry_interval: u32,
    visited: Vec<Vec<bool>>,
    cherries: Vec<Vec<bool>>,
    player: Character,
    ghosts: [Character; GHOST_COUNT],
    grid: Vec<Vec<char>>,
}

impl Board {
    /// Fresh board: player in the centre, a ghost in each corner.
    pub fn new(size: usize) -> Self {
        Self::with_interval(size, CHERRY_INTERVAL)
    }

    pub fn with_interval(size: usize, cherry_interval: u32) -> Self {
        let size = size.max(1);
        let last = size - 1;
        let centre = size / 2;
        let ghosts = [
            Character::new(0, 0, Facing::Down),
            Character::new(0, last, Facing::Left),
            Character::new(last, 0, Facing::Right),
            Character::new(last, last, Facing::Up),
        ];
        let mut board = Self {
            size,
            score: 0,
            move_count: 0,
            cherry_interval: cherry_interval.max(1),
            visited: vec![vec![false; size]; size],
            cherries: vec![vec![false; size]; size],
            player: Character::new(centre, centre, Facing::Right),
            ghosts,
            grid: vec![vec![UNEATEN; size]; size],
        };
        board.visit(board.player.pos);
        board.refresh_grid();
        board
    }

    /// Assembles a board from already validated parts. The snapshot loader is
    /// the only caller.
    pub(crate) fn from_parts(
        size: usize,
        score: u32,
        move_count: u32,
        visited: Vec<Vec<bool>>,
        cherries: Vec<Vec<bool>>,
        player: Character,
        ghosts: [Character; GHOST_COUNT],
    ) -> Self {
        let mut board = Self {
            size,
            score,
            move_count,
            cherry_interval: CHERRY_INTERVAL,
            visited,
            cherries,
            player,
            ghosts,
            grid: vec![vec![UNEATEN; size]; size],
        };
        board.visit(player.pos);
        board.refresh_grid();
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn cherry_interval(&self) -> u32 {
        self.cherry_interval
    }

    pub fn player(&self) -> Character {
        self.player
    }

    pub fn ghosts(&self) -> &[Character; GHOST_COUNT] {
        &self.ghosts
    }

    /// Rendered view, one `Vec<char>` per row.
    pub fn grid(&self) -> &[Vec<char>] {
        &self.grid
    }

    pub fn is_visited(&self, pos: Pos) -> bool {
        self.cell(&self.visited, pos)
    }

    pub fn has_cherry(&self, pos: Pos) -> bool {
        self.cell(&self.cherries, pos)
    }

    pub fn cherry_count(&self) -> usize {
        self.cherries.iter().flatten().filter(|&&c| c).count()
    }

    pub fn can_move(&self, dir: Option<Dir>) -> bool {
        match dir {
            Some(dir) => self.player.pos.step(dir, self.size).is_some(),
            None => false,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.ghosts.iter().any(|g| g.pos == self.player.pos)
    }

    /// Moves the player one cell, lets every ghost take one step after it and
    /// spawns a cherry every `cherry_interval` moves.
    ///
    /// Returns `false` without touching the board when the game is already
    /// over or `dir` would leave the grid.
    pub fn move_player(&mut self, dir: Dir, rng: &mut impl Rng) -> bool {
        if self.is_game_over() {
            debug!("move {:?} ignored, game is over", dir);
            return false;
        }
        let Some(to) = self.player.pos.step(dir, self.size) else {
            debug!("move {:?} ignored, blocked at {:?}", dir, self.player.pos);
            return false;
        };

        self.player.go(to, dir);
        self.consume_tile();
        self.update_ghosts();

        self.move_count = self.move_count.saturating_add(1);
        if self.move_count >= self.cherry_interval {
            self.spawn_cherry(rng);
            self.move_count = 0;
        }

        self.refresh_grid();
        debug!(
            "player moved {:?} to {:?}, score {}",
            dir, self.player.pos, self.score
        );
        true
    }

    fn consume_tile(&mut self) {
        let pos = self.player.pos;
        if self.visit(pos) {
            self.score = self.score.saturating_add(DOT_SCORE);
        }
        if self.cherries[pos.row][pos.col] {
            self.cherries[pos.row][pos.col] = false;
            self.score = self.score.saturating_add(CHERRY_SCORE);
        }
    }

    fn update_ghosts(&mut self) {
        let target = self.player.pos;
        for ghost in self.ghosts.iter_mut() {
            let dir = chase_dir(ghost.pos, target);
            if let Some(to) = ghost.pos.step(dir, self.size) {
                ghost.go(to, dir);
            }
        }
    }

    fn spawn_cherry(&mut self, rng: &mut impl Rng) {
        let mut candidates = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = Pos { row, col };
                if pos == self.player.pos || self.cherries[row][col] {
                    continue;
                }
                candidates.push(pos);
            }
        }
        match candidates.choose(rng) {
            Some(pos) => {
                self.cherries[pos.row][pos.col] = true;
                debug!("cherry spawned at {:?}", pos);
            }
            None => debug!("no free cell for a cherry"),
        }
    }

    /// Marks `pos` visited, returning `true` if it was not visited before.
    fn visit(&mut self, pos: Pos) -> bool {
        if pos.row >= self.size || pos.col >= self.size {
            return false;
        }
        let cell = &mut self.visited[pos.row][pos.col];
        let fresh = !*cell;
        *cell = true;
        fresh
    }

    fn cell(&self, layer: &[Vec<bool>], pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size && layer[pos.row][pos.col]
    }

    fn refresh_grid(&mut self) {
        for row in 0..self.size {
            for col in 0..self.size {
                self.grid[row][col] = if self.cherries[row][col] {
                    CHERRY
                } else if self.visited[row][col] {
                    EATEN
                } else {
                    UNEATEN
                };
            }
        }

        let player = self.player.pos;
        self.grid[player.row][player.col] = PLAYER;
        for ghost in &self.ghosts {
            self.grid[ghost.pos.row][ghost.pos.col] = if ghost.pos == player {
                COLLISION
            } else {
                ghost.facing.ghost_glyph()
            };
        }
    }
}

/// Greedy one-step pursuit. Closes the shorter gap first; on a tie it steps
/// horizontally.
pub fn chase_dir(ghost: Pos, target: Pos) -> Dir {
    let row_dist = ghost.row.abs_diff(target.row);
    let col_dist = ghost.col.abs_diff(target.col);
    let horizontal = if ghost.col > target.col {
        Dir::Left
    } else {
        Dir::Right
    };
    let vertical = if ghost.row > target.row {
        Dir::Up
    } else {
        Dir::Down
    };

    match (row_dist, col_dist) {
        (0, 0) => Dir::Stay,
        (0, _) => horizontal,
        (_, 0) => vertical,
        (r, c) if r < c => vertical,
        _ => horizontal,
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        for row in &self.grid {
            for &c in row {
                write!(f, "  {}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn glyphs(board: &Board) -> Vec<String> {
        board
            .grid()
            .iter()
            .map(|row| row.iter().collect())
            .collect()
    }

    #[test]
    fn fresh_board_layout() {
        let board = Board::new(10);

        assert_eq!(board.score(), 0);
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.player().pos, Pos::new(5, 5));
        assert!(board.is_visited(Pos::new(5, 5)));
        let ghosts: Vec<_> = board.ghosts().iter().map(|g| (g.pos, g.facing)).collect();
        assert_eq!(
            ghosts,
            vec![
                (Pos::new(0, 0), Facing::Down),
                (Pos::new(0, 9), Facing::Left),
                (Pos::new(9, 0), Facing::Right),
                (Pos::new(9, 9), Facing::Up),
            ]
        );
        let rows = glyphs(&board);
        assert_eq!(rows[0], "D********L");
        assert_eq!(rows[5], "*****P****");
        assert_eq!(rows[9], "R********U");
        assert!(!board.is_game_over());
    }

    #[test]
    fn can_move_respects_edges() {
        let mut board = Board::new(3);
        assert!(board.can_move(Some(Dir::Up)));
        assert!(!board.can_move(None));

        board.player.pos = Pos::new(0, 2);
        assert!(!board.can_move(Some(Dir::Up)));
        assert!(!board.can_move(Some(Dir::Right)));
        assert!(board.can_move(Some(Dir::Down)));
        assert!(board.can_move(Some(Dir::Left)));
        assert!(board.can_move(Some(Dir::Stay)));
    }

    #[test]
    fn one_move_right_on_fresh_board() {
        let mut board = Board::new(10);

        assert!(board.move_player(Dir::Right, &mut rng()));

        assert_eq!(board.player().pos, Pos::new(5, 6));
        assert_eq!(board.player().facing, Facing::Right);
        assert_eq!(board.score(), 10);
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.cherry_count(), 0);
        let ghosts: Vec<_> = board.ghosts().iter().map(|g| (g.pos, g.facing)).collect();
        assert_eq!(
            ghosts,
            vec![
                (Pos::new(1, 0), Facing::Down),
                (Pos::new(0, 8), Facing::Left),
                (Pos::new(8, 0), Facing::Up),
                (Pos::new(9, 8), Facing::Left),
            ]
        );
        assert!(!board.is_game_over());
    }

    #[test]
    fn chase_prefers_shorter_axis_and_column_on_tie() {
        let target = Pos::new(4, 4);
        assert_eq!(chase_dir(Pos::new(4, 1), target), Dir::Right);
        assert_eq!(chase_dir(Pos::new(4, 7), target), Dir::Left);
        assert_eq!(chase_dir(Pos::new(0, 4), target), Dir::Down);
        assert_eq!(chase_dir(Pos::new(8, 4), target), Dir::Up);
        assert_eq!(chase_dir(Pos::new(3, 0), target), Dir::Down);
        assert_eq!(chase_dir(Pos::new(0, 3), target), Dir::Right);
        assert_eq!(chase_dir(Pos::new(2, 2), target), Dir::Right);
        assert_eq!(chase_dir(Pos::new(6, 6), target), Dir::Left);
        assert_eq!(chase_dir(target, target), Dir::Stay);
    }

    #[test]
    fn revisiting_a_cell_scores_nothing() {
        let mut board = Board::new(10);
        let mut rng = rng();

        board.move_player(Dir::Left, &mut rng);
        assert_eq!(board.score(), 10);
        board.move_player(Dir::Right, &mut rng);
        assert_eq!(board.score(), 10);
    }

    #[test]
    fn eating_a_cherry_adds_bonus_and_removes_it() {
        let mut board = Board::new(10);
        board.cherries[4][5] = true;

        board.move_player(Dir::Up, &mut rng());

        assert_eq!(board.score(), 210);
        assert!(!board.has_cherry(Pos::new(4, 5)));
    }

    #[test]
    fn cherry_on_visited_cell_still_pays() {
        let mut board = Board::new(10);
        let mut rng = rng();
        board.move_player(Dir::Up, &mut rng);
        let before = board.score();
        board.cherries[5][5] = true;

        board.move_player(Dir::Down, &mut rng);

        assert_eq!(board.score(), before + 200);
    }

    #[test]
    fn third_move_spawns_exactly_one_cherry_off_player() {
        let mut board = Board::new(10);
        board.move_count = 2;

        board.move_player(Dir::Up, &mut rng());

        assert_eq!(board.move_count(), 0);
        assert_eq!(board.cherry_count(), 1);
        assert!(!board.has_cherry(board.player().pos));
        assert_eq!(
            board.grid().iter().flatten().filter(|&&c| c == CHERRY).count(),
            1
        );
    }

    #[test]
    fn cherries_follow_the_interval() {
        let mut board = Board::new(10);
        let mut rng = rng();
        let moves = [Dir::Up, Dir::Down, Dir::Left, Dir::Right, Dir::Up, Dir::Down];

        for (i, dir) in moves.into_iter().enumerate() {
            board.move_player(dir, &mut rng);
            assert_eq!(board.cherry_count() + board_cherries_eaten(&board), (i + 1) / 3);
        }
    }

    fn board_cherries_eaten(board: &Board) -> usize {
        (board.score() / CHERRY_SCORE) as usize
    }

    #[test]
    fn custom_interval_spawns_every_move() {
        let mut board = Board::with_interval(10, 1);
        board.move_player(Dir::Up, &mut rng());
        assert_eq!(board.cherry_interval(), 1);
        assert_eq!(board.cherry_count(), 1);
    }

    #[test]
    fn single_cell_board_never_spawns() {
        let mut board = Board::with_interval(1, 1);
        assert!(board.is_game_over());
        board.spawn_cherry(&mut rng());
        assert_eq!(board.cherry_count(), 0);
    }

    #[test]
    fn ghost_landing_on_player_ends_game() {
        let mut board = Board::new(10);
        board.ghosts[0].pos = Pos::new(4, 6);
        board.refresh_grid();

        board.move_player(Dir::Right, &mut rng());

        assert!(board.is_game_over());
        assert_eq!(board.ghosts()[0].pos, Pos::new(5, 6));
        assert_eq!(board.grid()[5][6], COLLISION);
    }

    #[test]
    fn moves_after_game_over_change_nothing() {
        let mut board = Board::new(10);
        board.ghosts[0].pos = Pos::new(5, 5);
        board.refresh_grid();
        let before = board.clone();

        assert!(!board.move_player(Dir::Up, &mut rng()));
        assert_eq!(board, before);
    }

    #[test]
    fn blocked_move_changes_nothing() {
        let mut board = Board::new(3);
        board.player.pos = Pos::new(0, 1);
        board.refresh_grid();
        let before = board.clone();

        assert!(!board.move_player(Dir::Up, &mut rng()));
        assert_eq!(board, before);
    }

    #[test]
    fn score_never_decreases_and_player_cell_is_visited() {
        let mut board = Board::new(8);
        let mut rng = rng();
        let mut last = board.score();

        for _ in 0..200 {
            if board.is_game_over() {
                board = Board::new(8);
                last = 0;
            }
            let dir = *Dir::MOVES.choose(&mut rng).unwrap();
            if !board.can_move(Some(dir)) {
                continue;
            }
            board.move_player(dir, &mut rng);
            assert!(board.score() >= last);
            assert!(board.is_visited(board.player().pos));
            for ghost in board.ghosts() {
                assert!(ghost.pos.row < 8 && ghost.pos.col < 8);
            }
            last = board.score();
        }
    }

    #[test]
    fn score_saturates_at_the_limit() {
        let mut board = Board::new(10);
        board.score = u32::MAX - 5;
        board.cherries[4][5] = true;

        assert!(board.move_player(Dir::Up, &mut rng()));

        assert_eq!(board.score(), u32::MAX);
        assert!(!board.has_cherry(Pos::new(4, 5)));
    }

    #[test]
    fn huge_move_counter_wraps_on_next_move() {
        let mut board = Board::new(10);
        board.move_count = u32::MAX;

        assert!(board.move_player(Dir::Up, &mut rng()));

        assert_eq!(board.move_count(), 0);
        assert_eq!(board.cherry_count(), 1);
    }

    #[test]
    fn later_ghost_overwrites_earlier_in_grid() {
        let mut board = Board::new(10);
        board.ghosts[1].pos = Pos::new(0, 0);
        board.refresh_grid();
        assert_eq!(board.grid()[0][0], 'L');
    }

    #[test]
    fn display_prefixes_cells() {
        let board = Board::new(3);
        let text = board.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Score: 0"));
        assert_eq!(lines.next(), Some("  D  *  L"));
        assert_eq!(lines.next(), Some("  *  P  *"));
        assert_eq!(lines.next(), Some("  R  *  U"));
    }
}
