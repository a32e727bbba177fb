use arrayvec::ArrayVec;
use xoevo_engine::{Board, CELL_COUNT, Mark, STATE_SIZE};
use xoevo_nn::{Network, ShapeError};

use crate::{FitnessEnvironment, MatchLog, MatchOutcome, MatchResult, Move, MoveKind};

/// Fitness shaping for noughts and crosses.
///
/// | Event                                   | Reward                                   |
/// |-----------------------------------------|------------------------------------------|
/// | legal move that does not end the match  | `+turn` to the mover                     |
/// | first move on `opening_cell`            | `+opening_bonus` to the mover            |
/// | three in a row                          | `+win` to the mover                      |
/// | full board without a line               | `+draw` to both                          |
/// | occupied cell or skipped turn           | `-foul_penalty` to the mover,            |
/// |                                         | `+forfeit_credit × remaining turns` to the opponent |
///
/// "Remaining turns" is the turn limit (the number of cells) minus the index
/// of the turn on which the foul happened.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RewardTable {
    pub turn: f64,
    pub opening_cell: usize,
    pub opening_bonus: f64,
    pub win: f64,
    pub draw: f64,
    pub foul_penalty: f64,
    pub forfeit_credit: f64,
    /// An output must be strictly above this value to count as a chosen action.
    pub activation_threshold: f64,
}

impl Default for RewardTable {
    fn default() -> Self {
        const TURN_POINTS: f64 = 0.01;
        Self {
            turn: TURN_POINTS,
            opening_cell: 4,
            opening_bonus: TURN_POINTS,
            win: 1.0,
            draw: 0.5,
            foul_penalty: TURN_POINTS,
            forfeit_credit: TURN_POINTS,
            activation_threshold: 0.5,
        }
    }
}

/// Noughts and crosses as a fitness environment.
///
/// Agents see [`STATE_SIZE`] inputs (the board plus the mark to move) and
/// answer with one output per cell. The first agent plays [`Mark::X`].
#[derive(Debug, Clone, Default)]
pub struct TicTacToe {
    rewards: RewardTable,
}

impl TicTacToe {
    #[must_use]
    pub fn new(rewards: RewardTable) -> Self {
        Self { rewards }
    }

    #[must_use]
    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    /// Returns the cell with the highest output above the activation threshold.
    ///
    /// Ties go to the lowest cell index.
    #[must_use]
    pub fn select_action(&self, output: &[f64]) -> Option<usize> {
        let mut best = None;
        let mut best_value = self.rewards.activation_threshold;
        for (cell, &value) in output.iter().enumerate() {
            if value > best_value {
                best = Some(cell);
                best_value = value;
            }
        }
        best
    }
}

impl FitnessEnvironment for TicTacToe {
    fn state_vector_size(&self) -> usize {
        STATE_SIZE
    }

    fn action_space_size(&self) -> usize {
        CELL_COUNT
    }

    #[expect(clippy::cast_precision_loss)]
    fn play_match(
        &self,
        agent_a: &mut Network,
        agent_b: &mut Network,
    ) -> Result<MatchResult, ShapeError> {
        let rewards = &self.rewards;
        let mut agents = [agent_a, agent_b];
        let mut deltas = [0.0; 2];
        let mut moves = ArrayVec::new();
        let mut board = Board::new();
        let mut state = [0.0; STATE_SIZE];
        let mut output = [0.0; CELL_COUNT];

        let mut active = 0;
        let mut mark = Mark::X;
        for turn in 0..CELL_COUNT {
            board.encode(mark, &mut state);
            agents[active].forward(&state, &mut output)?;

            let remaining_turns = (CELL_COUNT - turn) as f64;
            let foul = |deltas: &mut [f64; 2]| {
                deltas[active] -= rewards.foul_penalty;
                deltas[1 - active] += rewards.forfeit_credit * remaining_turns;
            };

            let Some(cell) = self.select_action(&output) else {
                foul(&mut deltas);
                moves.push(Move {
                    mark,
                    cell: None,
                    kind: MoveKind::Skipped,
                });
                let log = MatchLog::new(moves, MatchOutcome::Forfeit { by: mark });
                return Ok(MatchResult { deltas, log });
            };

            if board.place(cell, mark).is_err() {
                foul(&mut deltas);
                moves.push(Move {
                    mark,
                    cell: Some(cell),
                    kind: MoveKind::Occupied,
                });
                let log = MatchLog::new(moves, MatchOutcome::Illegal { by: mark, cell });
                return Ok(MatchResult { deltas, log });
            }
            moves.push(Move {
                mark,
                cell: Some(cell),
                kind: MoveKind::Placed,
            });

            if turn == 0 && cell == rewards.opening_cell {
                deltas[active] += rewards.opening_bonus;
            }
            if board.has_line(mark) {
                deltas[active] += rewards.win;
                let log = MatchLog::new(moves, MatchOutcome::Win { winner: mark });
                return Ok(MatchResult { deltas, log });
            }
            deltas[active] += rewards.turn;

            active = 1 - active;
            mark = mark.opponent();
        }

        deltas[0] += rewards.draw;
        deltas[1] += rewards.draw;
        Ok(MatchResult {
            deltas,
            log: MatchLog::new(moves, MatchOutcome::Draw),
        })
    }
}
