use std::fmt;

use arrayvec::ArrayVec;

use crate::{Mark, PlaceError};

/// Number of cells on the board, which is also the longest possible game.
pub const CELL_COUNT: usize = 9;

/// Length of the state vector produced by [`Board::encode`]: one entry per
/// cell plus the "whose turn" marker.
pub const STATE_SIZE: usize = CELL_COUNT + 1;

const LINES: [[usize; 3]; 8] = [
    // rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // diagonals
    [0, 4, 8],
    [6, 4, 2],
];

/// A 3×3 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    pub const EMPTY: Self = Self {
        cells: [None; CELL_COUNT],
    };

    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    #[must_use]
    pub fn cell(&self, cell: usize) -> Option<Mark> {
        self.cells.get(cell).copied().flatten()
    }

    #[must_use]
    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    /// Puts `mark` on `cell`. The board is left unchanged on error.
    pub fn place(&mut self, cell: usize, mark: Mark) -> Result<(), PlaceError> {
        let slot = self
            .cells
            .get_mut(cell)
            .ok_or(PlaceError::OutOfRange { cell })?;
        if let Some(by) = *slot {
            return Err(PlaceError::Occupied { cell, by });
        }
        *slot = Some(mark);
        Ok(())
    }

    /// Returns `true` if `mark` occupies a full row, column or diagonal.
    #[must_use]
    pub fn has_line(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&cell| self.cells[cell] == Some(mark)))
    }

    #[must_use]
    pub fn winner(&self) -> Option<Mark> {
        [Mark::X, Mark::O]
            .into_iter()
            .find(|&mark| self.has_line(mark))
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn empty_cells(&self) -> ArrayVec<usize, CELL_COUNT> {
        (0..CELL_COUNT)
            .filter(|&cell| self.cells[cell].is_none())
            .collect()
    }

    /// Writes the state vector seen by the player `to_move`.
    ///
    /// Entry `i` is the encoded mark on cell `i` (`0.0` when empty); the last
    /// entry is the encoded mark of `to_move`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not exactly [`STATE_SIZE`] long.
    pub fn encode(&self, to_move: Mark, state: &mut [f64]) {
        assert_eq!(state.len(), STATE_SIZE, "state vector size mismatch");
        for (slot, cell) in state.iter_mut().zip(&self.cells) {
            *slot = cell.map_or(0.0, Mark::encode);
        }
        state[CELL_COUNT] = to_move.encode();
    }

    /// Returns the text rows of the framed board, with `error_cell` drawn as `E`.
    ///
    /// Each row is 5 characters wide:
    ///
    /// ```text
    /// -----
    /// |XO |
    /// | X |
    /// |  O|
    /// -----
    /// ```
    #[must_use]
    pub fn render_rows(&self, error_cell: Option<usize>) -> [String; 5] {
        let symbol = |cell: usize| {
            if error_cell == Some(cell) {
                'E'
            } else {
                match self.cells[cell] {
                    Some(Mark::X) => 'X',
                    Some(Mark::O) => 'O',
                    None => ' ',
                }
            }
        };
        let row = |y: usize| {
            let mut s = String::with_capacity(5);
            s.push('|');
            s.extend((0..3).map(|x| symbol(y * 3 + x)));
            s.push('|');
            s
        };
        [
            "-----".to_owned(),
            row(0),
            row(1),
            row(2),
            "-----".to_owned(),
        ]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.render_rows(None) {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(cells: &[(usize, Mark)]) -> Board {
        let mut board = Board::new();
        for &(cell, mark) in cells {
            board.place(cell, mark).unwrap();
        }
        board
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            let board = board_from(&line.map(|cell| (cell, Mark::O)));
            assert_eq!(board.winner(), Some(Mark::O), "line {line:?}");
            assert!(!board.has_line(Mark::X));
        }
    }

    #[test]
    fn test_no_winner_on_broken_line() {
        let board = board_from(&[(0, Mark::X), (1, Mark::X), (2, Mark::O), (4, Mark::X)]);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_place_errors() {
        let mut board = board_from(&[(4, Mark::X)]);
        assert_eq!(
            board.place(4, Mark::O),
            Err(PlaceError::Occupied {
                cell: 4,
                by: Mark::X
            })
        );
        assert!(board.place(9, Mark::O).unwrap_err().is_out_of_range());
        assert_eq!(board.cell(4), Some(Mark::X));
        assert_eq!(board.empty_cells().len(), 8);
    }

    #[test]
    fn test_full_board() {
        // X O X
        // X O O
        // O X X
        let board = board_from(&[
            (0, Mark::X),
            (1, Mark::O),
            (2, Mark::X),
            (3, Mark::X),
            (4, Mark::O),
            (5, Mark::O),
            (6, Mark::O),
            (7, Mark::X),
            (8, Mark::X),
        ]);
        assert!(board.is_full());
        assert_eq!(board.winner(), None);
        assert!(board.empty_cells().is_empty());
    }

    #[test]
    fn test_encode() {
        let board = board_from(&[(0, Mark::X), (8, Mark::O)]);
        let mut state = [9.0; STATE_SIZE];
        board.encode(Mark::O, &mut state);
        assert_eq!(state, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0, -1.0]);
        board.encode(Mark::X, &mut state);
        assert_eq!(state[CELL_COUNT], 1.0);
    }

    #[test]
    fn test_render() {
        let board = board_from(&[(0, Mark::X), (1, Mark::O), (4, Mark::X)]);
        assert_eq!(board.to_string(), "-----\n|XO |\n| X |\n|   |\n-----\n");
        let rows = board.render_rows(Some(1));
        assert_eq!(rows[1], "|XE |");
    }
}
