//! A fully connected feedforward neural network trained by plain stochastic
//! gradient descent with hand-written backpropagation.

extern crate itertools;
#[macro_use]
extern crate log;
extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate thiserror;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod activator;
pub mod cost;
pub mod error;
pub mod idx;
pub mod layout;
pub mod network;
pub mod params;
pub mod trainer;

mod utils;

pub use crate::error::{Error, Result};
pub use crate::network::Network;
