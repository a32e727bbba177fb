//! Rules of noughts and crosses on a 3×3 board.
//!
//! - [`Mark`] - The two players' symbols
//! - [`Board`] - Cell occupation, placement legality and terminal detection
//!
//! Cells are numbered row by row:
//!
//! ```text
//! 0 1 2
//! 3 4 5
//! 6 7 8
//! ```
//!
//! # Example
//!
//! ```
//! use xoevo_engine::{Board, Mark};
//!
//! let mut board = Board::new();
//! for cell in [0, 4, 8] {
//!     board.place(cell, Mark::X).unwrap();
//! }
//! assert_eq!(board.winner(), Some(Mark::X));
//! assert!(board.place(4, Mark::O).is_err());
//! ```

pub use self::{board::*, mark::*};

mod board;
mod mark;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum PlaceError {
    #[display("cell {cell} is outside the board")]
    OutOfRange { cell: usize },
    #[display("cell {cell} is already occupied by {by}")]
    Occupied { cell: usize, by: Mark },
}
