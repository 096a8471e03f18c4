mod layer;
mod network;

pub use layer::{BIAS_KEY, Layer, Listeners, VISIBLE_BIAS_KEY, WEIGHT_KEY};
pub use network::MultiLayerNetwork;
