use crate::defaults::WIN_LENGTH;

use super::types::{Cell, Player, Position, WinningLine};

/// Axes through a cell: along a row, along a column, and both diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Walks every axis through `origin` and returns the first run of
/// `player`'s stones at least `WIN_LENGTH` long. The stone at `origin` must
/// already be `player`'s.
pub(crate) fn find_winning_line(
    grid: &[Vec<Cell>],
    origin: Position,
    player: Player,
) -> Option<WinningLine> {
    let target = Cell::from(player);
    if cell_at(grid, origin.x as isize, origin.y as isize) != Some(target) {
        return None;
    }

    for (dx, dy) in DIRECTIONS {
        let backward = run_length(grid, origin, -dx, -dy, target);
        let forward = run_length(grid, origin, dx, dy, target);

        if backward + 1 + forward >= WIN_LENGTH {
            let cells = (-(backward as isize)..=forward as isize)
                .map(|i| {
                    Position::new(
                        origin.x.wrapping_add_signed(dx * i),
                        origin.y.wrapping_add_signed(dy * i),
                    )
                })
                .collect();
            return Some(WinningLine::new(player, cells));
        }
    }

    None
}

/// Number of consecutive `target` cells after `origin` in direction (dx, dy).
fn run_length(grid: &[Vec<Cell>], origin: Position, dx: isize, dy: isize, target: Cell) -> usize {
    let mut count = 0;
    let mut x = origin.x as isize + dx;
    let mut y = origin.y as isize + dy;

    while cell_at(grid, x, y) == Some(target) {
        count += 1;
        x += dx;
        y += dy;
    }

    count
}

fn cell_at(grid: &[Vec<Cell>], x: isize, y: isize) -> Option<Cell> {
    if x < 0 || y < 0 {
        return None;
    }
    grid.get(x as usize)?.get(y as usize).copied()
}
