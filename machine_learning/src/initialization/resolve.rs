use conf::{Distribution, LayerInit, WeightInit};

use super::{Result, WeightSampler};

/// Resolves the sampler for the weights of a `fan_in x fan_out` layer.
///
/// # Arguments
/// * `init` - The effective initialization of the layer.
/// * `fan_in` - The number of input units.
/// * `fan_out` - The number of output units.
///
/// # Returns
/// The sampler, `None` if the policy samples a distribution but none was given, or an error
/// if the policy can't be parametrized with these fans.
pub fn weight_sampler(
    init: LayerInit,
    fan_in: usize,
    fan_out: usize,
) -> Result<Option<WeightSampler>> {
    let sampler = match init.weight_init {
        WeightInit::Zero => WeightSampler::zeros(),
        WeightInit::Distribution => match init.dist {
            Some(dist) => distribution_sampler(dist)?,
            None => return Ok(None),
        },
        WeightInit::Uniform => WeightSampler::fan_in_uniform(fan_in)?,
        WeightInit::Xavier => WeightSampler::xavier(fan_in, fan_out)?,
        WeightInit::XavierUniform => WeightSampler::xavier_uniform(fan_in, fan_out)?,
        WeightInit::Relu => WeightSampler::kaiming(fan_in)?,
        WeightInit::Lecun => WeightSampler::lecun(fan_in)?,
        WeightInit::LecunUniform => WeightSampler::lecun_uniform(fan_in)?,
    };

    Ok(Some(sampler))
}

fn distribution_sampler(dist: Distribution) -> Result<WeightSampler> {
    match dist {
        Distribution::Normal { mean, std } => WeightSampler::normal(mean as f32, std as f32),
        Distribution::Uniform { lower, upper } if dist.is_continuous() => {
            WeightSampler::uniform(lower as f32, upper as f32)
        }
        Distribution::Uniform { lower, upper } => {
            WeightSampler::uniform_inclusive(lower as f32, upper as f32)
        }
        Distribution::Binomial {
            trials,
            probability,
        } => WeightSampler::binomial(trials, probability),
    }
}
