mod error;
mod non_zero;
mod resolve;
mod sampler;

pub use error::{RandErr, Result};
pub use non_zero::NonZero;
pub use resolve::weight_sampler;
pub use sampler::WeightSampler;
