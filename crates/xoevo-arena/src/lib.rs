//! Fitness environments: how two networks are scored against each other.
//!
//! The training crate only needs one thing from a game: play a match between
//! two agents and report how much fitness each earned. This crate defines that
//! contract ([`FitnessEnvironment`]) and implements it for noughts and crosses
//! ([`TicTacToe`]).
//!
//! # Contract
//!
//! ```text
//! play_match(agent_a, agent_b) -> MatchResult { deltas: [a, b], log }
//! ```
//!
//! - Agent A always moves first.
//! - Each turn the environment encodes its state into a vector of
//!   [`state_vector_size`](FitnessEnvironment::state_vector_size) values, runs the
//!   active agent forward and interprets the output vector of
//!   [`action_space_size`](FitnessEnvironment::action_space_size) values as an action.
//! - All reward shaping (bonuses, penalties, terminal rewards) belongs to the
//!   environment, never to the networks.
//!
//! Playing a match does not touch the agents' fitness; call
//! [`MatchResult::apply`] to credit the deltas.

use std::fmt;

use xoevo_nn::{Network, ShapeError};

pub use self::{match_log::*, tictactoe::*};

mod match_log;
mod tictactoe;

/// A two-player game that scores networks.
pub trait FitnessEnvironment: fmt::Debug + Send + Sync {
    /// Length of the state vector fed to an agent.
    fn state_vector_size(&self) -> usize;

    /// Length of the output vector expected from an agent.
    fn action_space_size(&self) -> usize;

    /// Plays one match, `agent_a` moving first.
    ///
    /// The agents are mutably borrowed because forwarding overwrites their
    /// neuron values. Fails only if an agent's input or output size does not
    /// match the environment.
    fn play_match(
        &self,
        agent_a: &mut Network,
        agent_b: &mut Network,
    ) -> Result<MatchResult, ShapeError>;

    /// Checks that `agent` can play in this environment.
    fn check_agent(&self, agent: &Network) -> Result<(), ShapeError> {
        if agent.input_size() != self.state_vector_size() {
            return Err(ShapeError::Input {
                expected: agent.input_size(),
                actual: self.state_vector_size(),
            });
        }
        if agent.output_size() != self.action_space_size() {
            return Err(ShapeError::Output {
                expected: agent.output_size(),
                actual: self.action_space_size(),
            });
        }
        Ok(())
    }
}

/// Fitness earned by both agents in one match, with the record of the match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Fitness deltas of agent A and agent B.
    pub deltas: [f64; 2],
    pub log: MatchLog,
}

impl MatchResult {
    /// Adds the deltas to the agents' fitness accumulators.
    pub fn apply(&self, agent_a: &mut Network, agent_b: &mut Network) {
        agent_a.add_fitness(self.deltas[0]);
        agent_b.add_fitness(self.deltas[1]);
    }
}
