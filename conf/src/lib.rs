mod builder;
mod distribution;
pub mod error;
mod json;
mod layer;
mod network;
mod overrides;
mod properties;
mod rng;

pub use builder::ConfigurationBuilder;
pub use distribution::Distribution;
pub use error::{ConfErr, Result, SerdeErr};
pub use layer::{Activation, LayerKind, LayerSpec, LossFunction, WeightInit};
pub use network::{Defaults, LayerInit, NetworkConfiguration};
pub use overrides::{LayerPatch, OverrideSpec, PreProcessorSpec};
pub use properties::Properties;
pub use rng::RngSpec;
