pub mod arch;
pub mod error;
pub mod initialization;
pub mod listeners;
mod rng;

pub use arch::{Layer, MultiLayerNetwork};
pub use error::{InitErr, Result};
pub use listeners::{IterationListener, ScoreIterationListener};
pub use rng::RngProvider;
