//! Dense feedforward networks evolved by mutation.
//!
//! This crate is the numeric kernel of the trainer. It knows nothing about
//! games or populations: it only builds networks, runs them forward and
//! perturbs their parameters.
//!
//! # Structure
//!
//! ```text
//! Network
//!     ├── Layer (input)      neurons carry weights towards the next layer
//!     ├── Layer (hidden)*
//!     └── Layer (output)     neurons carry no weights
//! ```
//!
//! Every neuron of layer `i` is connected to every neuron of layer `i + 1`.
//! The activation function is shared by the whole network and applied to
//! every non-input neuron.
//!
//! # Modules
//!
//! - [`activation`] - Activation functions ([`Tanh`](activation::Tanh), [`Sigmoid`](activation::Sigmoid), ...)
//! - [`mutation`] - Mutation policies applied to weights and biases
//! - [`network`] - [`Network`], [`Layer`], [`Neuron`] and [`Dendrite`]
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use xoevo_nn::{Activation, MutationPolicy, Network, NetworkShape};
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let shape = NetworkShape::new(10, 9, vec![36, 18]);
//! let mut network = Network::random(&mut rng, &shape, Activation::Tanh.function()).unwrap();
//!
//! let mut child = network.clone();
//! child.mutate(&mut rng, &MutationPolicy::probabilistic(0.5, 0.25));
//!
//! let output = network.forward_vec(&[0.0; 10]).unwrap();
//! assert_eq!(output.len(), 9);
//! ```

pub use self::{activation::*, mutation::*, network::*};

pub mod activation;
pub mod mutation;
pub mod network;

/// Dimension mismatch between a network and the data or parameters given to it.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("input has {actual} values but the network expects {expected}")]
    Input { expected: usize, actual: usize },
    #[display("output buffer has {actual} slots but the network produces {expected}")]
    Output { expected: usize, actual: usize },
    #[display("neuron {neuron} of layer {layer} has {actual} weights, expected {expected}")]
    Weights {
        layer: usize,
        neuron: usize,
        expected: usize,
        actual: usize,
    },
    #[display("a network needs at least 2 layers, got {count}")]
    TooFewLayers { count: usize },
    #[display("layer {layer} has no neurons")]
    EmptyLayer { layer: usize },
}
