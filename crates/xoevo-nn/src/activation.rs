//! Activation functions shared by all neurons of a network.
//!
//! Activation functions are stateless, so a network only keeps a
//! `&'static dyn ActivationFunction` pointing at one of the unit structs in this
//! module. Cloning a network copies the reference, never the function.

use std::fmt;

/// A pure scalar function applied to the weighted sum of a neuron.
pub trait ActivationFunction: fmt::Debug + Send + Sync {
    /// Applies the function to `x`.
    fn apply(&self, x: f64) -> f64;
}

/// Hyperbolic tangent, bounded to `(-1, 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh;

impl ActivationFunction for Tanh {
    fn apply(&self, x: f64) -> f64 {
        x.tanh()
    }
}

/// Logistic sigmoid, bounded to `(0, 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl ActivationFunction for Sigmoid {
    fn apply(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
}

/// Passes the weighted sum through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ActivationFunction for Identity {
    fn apply(&self, x: f64) -> f64 {
        x
    }
}

/// Selector for the built-in activation functions.
///
/// Parses from its lowercase name (`"tanh"`, `"sigmoid"`, `"identity"`), both
/// on the command line and in configuration files.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    #[display("tanh")]
    Tanh,
    #[display("sigmoid")]
    Sigmoid,
    #[display("identity")]
    Identity,
}

impl Activation {
    /// Returns the function this selector stands for.
    #[must_use]
    pub fn function(self) -> &'static dyn ActivationFunction {
        match self {
            Activation::Tanh => &Tanh,
            Activation::Sigmoid => &Sigmoid,
            Activation::Identity => &Identity,
        }
    }
}
