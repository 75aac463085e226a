use std::fmt;

use crate::defaults::BOARD_SIZE;

use super::error::{BoardError, MoveError};
use super::types::{Cell, MoveOutcome, Player, Position, WinningLine};
use super::win_detector::find_winning_line;

/// The 15x15 grid. Every row always holds `BOARD_SIZE` cells; the grid only
/// changes through `place_stone`, `initialize`, `set_grid`, or a
/// `TrialPlacement` that undoes itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: vec![vec![Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Builds a board from a stored grid, rejecting anything not N x N.
    pub fn from_grid(grid: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let mut board = Self::new();
        board.set_grid(grid)?;
        Ok(board)
    }

    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    pub fn initialize(&mut self) {
        for row in &mut self.grid {
            row.fill(Cell::Empty);
        }
    }

    /// Replaces the whole grid. On a dimension mismatch the current contents
    /// stay as they were.
    pub fn set_grid(&mut self, grid: Vec<Vec<Cell>>) -> Result<(), BoardError> {
        let rows = grid.len();
        let columns = grid
            .iter()
            .map(Vec::len)
            .find(|&len| len != BOARD_SIZE)
            .unwrap_or(BOARD_SIZE);

        if rows != BOARD_SIZE || columns != BOARD_SIZE {
            return Err(BoardError::DimensionMismatch {
                expected: BOARD_SIZE,
                rows,
                columns,
            });
        }

        self.grid = grid;
        Ok(())
    }

    pub fn grid(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    pub fn to_grid(&self) -> Vec<Vec<Cell>> {
        self.grid.clone()
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.grid.get(x)?.get(y).copied()
    }

    /// Signed so that raw request coordinates can be checked before they
    /// are turned into indices.
    pub fn is_within_bounds(&self, x: isize, y: isize) -> bool {
        let size = self.size() as isize;
        (0..size).contains(&x) && (0..size).contains(&y)
    }

    pub fn is_move_valid(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_some_and(Cell::is_empty)
    }

    pub fn place_stone(&mut self, x: usize, y: usize, player: Player) -> Result<(), MoveError> {
        match self.cell(x, y) {
            None => Err(MoveError::OutOfBounds { x, y }),
            Some(Cell::Empty) => {
                self.grid[x][y] = Cell::from(player);
                Ok(())
            }
            Some(_) => Err(MoveError::Occupied(Position::new(x, y))),
        }
    }

    /// Undoes a trial stone. Only `TrialPlacement` calls this.
    pub(crate) fn clear_cell(&mut self, position: Position) {
        if let Some(cell) = self
            .grid
            .get_mut(position.x)
            .and_then(|row| row.get_mut(position.y))
        {
            *cell = Cell::Empty;
        }
    }

    pub fn check_win(&self, x: usize, y: usize, player: Player) -> bool {
        self.check_win_with_line(x, y, player).is_some()
    }

    pub fn check_win_with_line(&self, x: usize, y: usize, player: Player) -> Option<WinningLine> {
        find_winning_line(&self.grid, Position::new(x, y), player)
    }

    /// True once no cell is empty, whether or not someone has won. Check for
    /// a win first.
    pub fn check_draw(&self) -> bool {
        self.grid
            .iter()
            .all(|row| row.iter().all(|cell| !cell.is_empty()))
    }

    /// Classifies the position after `player` has moved at (x, y): a win
    /// takes precedence over a full board.
    pub fn evaluate_move(&self, x: usize, y: usize, player: Player) -> MoveOutcome {
        if let Some(line) = self.check_win_with_line(x, y, player) {
            return MoveOutcome::Win(line);
        }
        if self.check_draw() {
            return MoveOutcome::Draw;
        }
        MoveOutcome::Continue
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for (x, row) in self.grid.iter().enumerate() {
            for (y, &cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    cells.push(Position::new(x, y));
                }
            }
        }
        cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            let line: Vec<String> = row.iter().map(|&cell| u8::from(cell).to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_all(board: &mut Board, stones: &[(usize, usize)], player: Player) {
        for &(x, y) in stones {
            board.place_stone(x, y, player).unwrap();
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.size(), BOARD_SIZE);
        assert_eq!(board.grid().len(), BOARD_SIZE);
        assert!(board.grid().iter().all(|row| row.len() == BOARD_SIZE));
        assert_eq!(board.empty_cells().len(), BOARD_SIZE * BOARD_SIZE);
    }

    #[test]
    fn test_initialize_clears_stones() {
        let mut board = Board::new();
        place_all(&mut board, &[(0, 0), (7, 7), (14, 14)], Player::Two);
        board.initialize();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_place_stone_marks_cell() {
        let mut board = Board::new();
        assert_eq!(board.place_stone(3, 9, Player::Two), Ok(()));
        assert_eq!(board.cell(3, 9), Some(Cell::Player2));
        assert_eq!(board.cell(9, 3), Some(Cell::Empty));
    }

    #[test]
    fn test_place_stone_default_player_is_first() {
        let mut board = Board::new();
        board.place_stone(0, 0, Player::default()).unwrap();
        assert_eq!(board.cell(0, 0), Some(Cell::Player1));
    }

    #[test]
    fn test_place_stone_twice_fails_without_change() {
        let mut board = Board::new();
        board.place_stone(5, 5, Player::One).unwrap();
        let before = board.clone();
        for player in [Player::One, Player::Two] {
            assert_eq!(
                board.place_stone(5, 5, player),
                Err(MoveError::Occupied(Position::new(5, 5)))
            );
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_stone_out_of_bounds_fails() {
        let mut board = Board::new();
        assert_eq!(
            board.place_stone(15, 0, Player::One),
            Err(MoveError::OutOfBounds { x: 15, y: 0 })
        );
        assert!(board.place_stone(0, 100, Player::One).is_err());
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_bounds_and_validity() {
        let mut board = Board::new();
        assert!(board.is_within_bounds(0, 0));
        assert!(board.is_within_bounds(14, 14));
        assert!(!board.is_within_bounds(-1, 5));
        assert!(!board.is_within_bounds(5, 15));
        board.place_stone(2, 2, Player::One).unwrap();
        assert!(!board.is_move_valid(2, 2));
        assert!(board.is_move_valid(2, 3));
        assert!(!board.is_move_valid(15, 3));
    }

    #[test]
    fn test_set_grid_rejects_wrong_row_count() {
        let mut board = Board::new();
        board.place_stone(1, 1, Player::Two).unwrap();
        let before = board.clone();

        let result = board.set_grid(vec![vec![Cell::Empty; BOARD_SIZE]; 14]);
        assert_eq!(
            result,
            Err(BoardError::DimensionMismatch {
                expected: BOARD_SIZE,
                rows: 14,
                columns: BOARD_SIZE,
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_set_grid_rejects_ragged_row() {
        let mut board = Board::new();
        let mut grid = vec![vec![Cell::Player1; BOARD_SIZE]; BOARD_SIZE];
        grid[9].pop();

        let result = board.set_grid(grid);
        assert_eq!(
            result,
            Err(BoardError::DimensionMismatch {
                expected: BOARD_SIZE,
                rows: 15,
                columns: 14,
            })
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_set_grid_replaces_state() {
        let mut grid = vec![vec![Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        grid[4][11] = Cell::Player2;
        let board = Board::from_grid(grid.clone()).unwrap();
        assert_eq!(board.cell(4, 11), Some(Cell::Player2));
        assert_eq!(board.to_grid(), grid);
    }

    #[test]
    fn test_five_in_a_row_scenario() {
        let mut board = Board::new();
        place_all(&mut board, &[(7, 3), (7, 4), (7, 5), (7, 6)], Player::One);
        assert!(!board.check_win(7, 6, Player::One));

        board.place_stone(7, 7, Player::One).unwrap();
        let line = board.check_win_with_line(7, 7, Player::One).unwrap();
        let expected: Vec<Position> = (3..=7).map(|y| Position::new(7, y)).collect();
        assert_eq!(line.cells, expected);
        assert_eq!(line.player, Player::One);
    }

    #[test]
    fn test_win_along_every_axis() {
        let axes: [[(usize, usize); 5]; 4] = [
            [(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)],
            [(0, 9), (1, 9), (2, 9), (3, 9), (4, 9)],
            [(5, 5), (6, 6), (7, 7), (8, 8), (9, 9)],
            [(10, 4), (11, 3), (12, 2), (13, 1), (14, 0)],
        ];
        for stones in axes {
            let mut board = Board::new();
            place_all(&mut board, &stones, Player::Two);
            for &(x, y) in &stones {
                assert!(board.check_win(x, y, Player::Two), "({}, {})", x, y);
                assert!(!board.check_win(x, y, Player::One));
            }
        }
    }

    #[test]
    fn test_blocked_four_is_not_a_win() {
        let mut board = Board::new();
        place_all(&mut board, &[(0, 0), (1, 0), (2, 0), (3, 0)], Player::One);
        board.place_stone(4, 0, Player::Two).unwrap();
        assert!(!board.check_win(3, 0, Player::One));

        place_all(&mut board, &[(6, 6), (6, 7), (6, 8), (6, 9)], Player::One);
        place_all(&mut board, &[(6, 5), (6, 10)], Player::Two);
        for y in 6..=9 {
            assert!(!board.check_win(6, y, Player::One));
        }
    }

    #[test]
    fn test_broken_line_is_not_a_win() {
        let mut board = Board::new();
        let stones = [(9, 1), (9, 2), (9, 4), (9, 5), (9, 6)];
        place_all(&mut board, &stones, Player::One);
        assert!(!board.check_win(9, 4, Player::One));
    }

    #[test]
    fn test_overline_counts_as_win() {
        let mut board = Board::new();
        let stones = [(0, 3), (1, 3), (2, 3), (4, 3), (5, 3), (6, 3)];
        place_all(&mut board, &stones, Player::One);
        board.place_stone(3, 3, Player::One).unwrap();
        let line = board.check_win_with_line(3, 3, Player::One).unwrap();
        assert_eq!(line.len(), 7);
    }

    /// Stripes of two that shift by one cell per row, so no row, column or
    /// diagonal ever holds more than four of a kind.
    fn draw_pattern(x: usize, y: usize) -> Player {
        if ((x + 2 * y) / 2) % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    #[test]
    fn test_full_board_without_five_is_draw() {
        let mut board = Board::new();
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                assert!(!board.check_draw());
                let player = draw_pattern(x, y);
                board.place_stone(x, y, player).unwrap();
                assert!(!board.check_win(x, y, player), "({}, {})", x, y);
            }
        }
        assert!(board.check_draw());
        assert!(board.empty_cells().is_empty());
        let last = draw_pattern(14, 14);
        assert_eq!(board.evaluate_move(14, 14, last), MoveOutcome::Draw);
    }

    #[test]
    fn test_full_board_with_five_is_win_not_draw() {
        let grid = vec![vec![Cell::Player1; BOARD_SIZE]; BOARD_SIZE];
        let board = Board::from_grid(grid).unwrap();
        assert!(board.check_draw());
        assert!(board.evaluate_move(0, 0, Player::One).is_win());
    }

    #[test]
    fn test_display_renders_digits() {
        let mut board = Board::new();
        board.place_stone(0, 1, Player::Two).unwrap();
        let rendered = board.to_string();
        let first_line = rendered.lines().next().unwrap();
        assert!(first_line.starts_with("0 2 0"));
        assert_eq!(rendered.lines().count(), BOARD_SIZE);
    }
}
