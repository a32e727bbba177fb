use std::fmt;

use arrayvec::ArrayVec;
use xoevo_engine::{Board, CELL_COUNT, Mark};

/// What happened to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveKind {
    /// The mark was put on the chosen cell.
    Placed,
    /// The chosen cell was already occupied.
    Occupied,
    /// No output exceeded the activation threshold.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub mark: Mark,
    /// Chosen cell, `None` for a skipped turn.
    pub cell: Option<usize>,
    pub kind: MoveKind,
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MatchOutcome {
    Win { winner: Mark },
    Draw,
    /// A player chose an occupied cell.
    Illegal { by: Mark, cell: usize },
    /// A player chose no cell at all.
    Forfeit { by: Mark },
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Win { winner } => write!(f, "{winner} wins"),
            MatchOutcome::Draw => write!(f, "draw"),
            MatchOutcome::Illegal { by, cell } => {
                write!(f, "{by} tried to put a piece on occupied cell {cell}")
            }
            MatchOutcome::Forfeit { by } => write!(f, "{by} tried to skip a turn"),
        }
    }
}

/// Move-by-move record of a match.
///
/// A match lasts at most [`CELL_COUNT`] turns, so the record never allocates.
/// Its [`Display`](fmt::Display) implementation draws the board after every
/// move, side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLog {
    moves: ArrayVec<Move, CELL_COUNT>,
    outcome: MatchOutcome,
}

impl MatchLog {
    #[must_use]
    pub fn new(moves: ArrayVec<Move, CELL_COUNT>, outcome: MatchOutcome) -> Self {
        Self { moves, outcome }
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    /// Returns the board after the last legal move.
    #[must_use]
    pub fn final_board(&self) -> Board {
        let mut board = Board::new();
        for mv in &self.moves {
            if let (MoveKind::Placed, Some(cell)) = (mv.kind, mv.cell) {
                // moves were validated while the match was played
                let _ = board.place(cell, mv.mark);
            }
        }
        board
    }
}

impl fmt::Display for MatchLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const COLUMN_WIDTH: usize = 7;

        let mut board = Board::new();
        let mut columns = Vec::with_capacity(self.moves.len());
        for (turn, mv) in self.moves.iter().enumerate() {
            let error_cell = match (mv.kind, mv.cell) {
                (MoveKind::Placed, Some(cell)) => {
                    let _ = board.place(cell, mv.mark);
                    None
                }
                (_, cell) => cell,
            };
            let header = format!("Turn {}", turn + 1);
            let [r0, r1, r2, r3, r4] = board.render_rows(error_cell);
            columns.push([header, r0, r1, r2, r3, r4]);
        }

        for line in 0..6 {
            let mut text = String::new();
            for column in &columns {
                text.push_str(&format!("{:<COLUMN_WIDTH$}", column[line]));
            }
            writeln!(f, "{}", text.trim_end())?;
        }
        write!(f, "{}", self.outcome)
    }
}
