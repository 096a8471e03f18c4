use ndarray::Array2;
use rand::Rng;
use rand_distr::{Binomial, Distribution, Normal, Uniform};

use super::{NonZero, RandErr, Result};

#[derive(Debug, Clone)]
enum Law {
    Constant(f32),
    Normal(Normal<f32>),
    Uniform(Uniform<f32>),
    Binomial(Binomial),
}

impl Distribution<f32> for Law {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match self {
            Law::Constant(value) => *value,
            Law::Normal(dist) => dist.sample(rng),
            Law::Uniform(dist) => dist.sample(rng),
            Law::Binomial(dist) => dist.sample(rng) as f32,
        }
    }
}

/// Fills weight matrices following one probabilistic law.
///
/// Continuous laws never yield an exact zero, degenerate ones (a constant, a zero spread or
/// a binomial) are sampled as is.
#[derive(Debug, Clone)]
pub struct WeightSampler {
    law: Law,
    continuous: bool,
}

impl WeightSampler {
    fn new(law: Law, continuous: bool) -> Self {
        Self { law, continuous }
    }

    /// Creates a new `WeightSampler` that always yields `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(Law::Constant(value), false)
    }

    pub fn zeros() -> Self {
        Self::constant(0.)
    }

    /// Creates a new `WeightSampler` with a normal distribution.
    ///
    /// # Arguments
    /// * `mean` - The mean of the distribution.
    /// * `std_dev` - The standard deviation of the distribution.
    ///
    /// # Returns
    /// An error if `mean` or `std_dev` is not finite, or `std_dev` is negative.
    pub fn normal(mean: f32, std_dev: f32) -> Result<Self> {
        if !mean.is_finite() {
            return Err(RandErr::non_finite("mean", mean));
        }
        if !std_dev.is_finite() {
            return Err(RandErr::non_finite("standard deviation", std_dev));
        }
        if std_dev < 0. {
            return Err(RandErr::negative("standard deviation", std_dev));
        }

        let law = Law::Normal(Normal::new(mean, std_dev)?);
        Ok(Self::new(law, std_dev > 0.))
    }

    /// Creates a new `WeightSampler` with a uniform distribution over `[low, high)`.
    ///
    /// # Returns
    /// An error if the range is empty or not finite.
    pub fn uniform(low: f32, high: f32) -> Result<Self> {
        let law = Law::Uniform(Uniform::new(low, high)?);
        Ok(Self::new(law, true))
    }

    /// Creates a new `WeightSampler` with a uniform distribution over `[low, high]`.
    ///
    /// # Returns
    /// An error if the range is invalid (low > high) or not finite.
    pub fn uniform_inclusive(low: f32, high: f32) -> Result<Self> {
        let law = Law::Uniform(Uniform::new_inclusive(low, high)?);
        Ok(Self::new(law, low < high))
    }

    /// Creates a new `WeightSampler` counting the successes of `trials` coin flips.
    ///
    /// # Returns
    /// An error if `probability` is not within `[0, 1]`.
    pub fn binomial(trials: u64, probability: f64) -> Result<Self> {
        let law = Law::Binomial(Binomial::new(trials, probability)?);
        Ok(Self::new(law, false))
    }

    /// `U(-1/fan_in, 1/fan_in)`.
    ///
    /// # Returns
    /// An error if the calculated range is not finite.
    pub fn fan_in_uniform(fan_in: usize) -> Result<Self> {
        let range = 1. / fan_in as f32;
        Self::uniform(-range, range)
    }

    /// Xavier uniform initialization, `U(-a, a)` with `a = sqrt(6/(fan_in + fan_out))`.
    ///
    /// # Returns
    /// An error if the calculated range is not finite.
    pub fn xavier_uniform(fan_in: usize, fan_out: usize) -> Result<Self> {
        let range = (6. / (fan_in as f32 + fan_out as f32)).sqrt();
        Self::uniform(-range, range)
    }

    /// LeCun uniform initialization, `U(-sqrt(3/fan_in), sqrt(3/fan_in))`.
    pub fn lecun_uniform(fan_in: usize) -> Result<Self> {
        let range = (3. / fan_in as f32).sqrt();
        Self::uniform(-range, range)
    }

    /// Kaiming normal initialization, `N(0, 2/fan_in)`.
    ///
    /// # Returns
    /// An error if the calculated standard deviation is not finite.
    pub fn kaiming(fan_in: usize) -> Result<Self> {
        Self::normal(0., (2. / fan_in as f32).sqrt())
    }

    /// Xavier normal initialization, `N(0, 2/(fan_in + fan_out))`.
    pub fn xavier(fan_in: usize, fan_out: usize) -> Result<Self> {
        Self::normal(0., (2. / (fan_in as f32 + fan_out as f32)).sqrt())
    }

    /// LeCun normal initialization, `N(0, 1/fan_in)`.
    pub fn lecun(fan_in: usize) -> Result<Self> {
        Self::normal(0., (1. / fan_in as f32).sqrt())
    }

    /// Whether exact zeros are redrawn.
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Samples a whole matrix in row-major order.
    ///
    /// # Arguments
    /// * `rng` - The random number generator to draw from.
    /// * `shape` - The shape of the matrix, its size must fit in an `isize`.
    ///
    /// # Returns
    /// The sampled matrix.
    pub fn sample_matrix<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        shape: (usize, usize),
    ) -> Array2<f32> {
        if self.continuous {
            let law = NonZero::new(&self.law);
            Array2::from_shape_simple_fn(shape, || law.sample(&mut *rng))
        } else {
            Array2::from_shape_simple_fn(shape, || self.law.sample(&mut *rng))
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn shape_and_bounds() {
        let sampler = WeightSampler::uniform(-1., 1.).unwrap();
        let matrix = sampler.sample_matrix(&mut seeded_rng(), (3, 4));

        assert_eq!(matrix.dim(), (3, 4));
        assert!(matrix.iter().all(|x| (-1. ..1.).contains(x)));
    }

    #[test]
    fn empty_matrix() {
        let sampler = WeightSampler::normal(0., 1.).unwrap();
        let mut rng = seeded_rng();
        let matrix = sampler.sample_matrix(&mut rng, (0, 4));

        assert_eq!(matrix.len(), 0);
        assert_eq!(rng.random::<u64>(), seeded_rng().random::<u64>());
    }

    #[test]
    fn same_seed_same_sample() {
        let sampler = WeightSampler::xavier(4, 3).unwrap();
        let a = sampler.sample_matrix(&mut seeded_rng(), (4, 3));
        let b = sampler.sample_matrix(&mut seeded_rng(), (4, 3));
        assert_eq!(a, b);
    }

    #[test]
    fn rng_advances() {
        let sampler = WeightSampler::normal(0., 1.).unwrap();
        let mut rng = seeded_rng();

        let a = sampler.sample_matrix(&mut rng, (2, 5));
        let b = sampler.sample_matrix(&mut rng, (2, 5));
        assert_ne!(a, b);
    }

    #[test]
    fn zero_fan_in() {
        assert!(WeightSampler::kaiming(0).is_err());
        assert!(WeightSampler::lecun(0).is_err());
        assert!(WeightSampler::lecun_uniform(0).is_err());
        assert!(WeightSampler::fan_in_uniform(0).is_err());
        assert!(WeightSampler::xavier(0, 0).is_err());
        assert!(WeightSampler::xavier_uniform(0, 0).is_err());
    }

    #[test]
    fn huge_fans_stay_finite() {
        let sampler = WeightSampler::xavier(usize::MAX, usize::MAX).unwrap();
        assert!(sampler.is_continuous());
    }

    #[test]
    fn invalid_parameters() {
        assert!(WeightSampler::normal(0., -1.).is_err());
        assert!(WeightSampler::normal(f32::NAN, 1.).is_err());
        assert!(WeightSampler::normal(0., f32::INFINITY).is_err());
        assert!(WeightSampler::uniform(1., 1.).is_err());
        assert!(WeightSampler::uniform_inclusive(1., 1.).is_ok());
        assert!(WeightSampler::binomial(3, 1.5).is_err());
    }

    #[test]
    fn degenerate_laws_are_not_continuous() {
        assert!(!WeightSampler::zeros().is_continuous());
        assert!(!WeightSampler::normal(0., 0.).unwrap().is_continuous());
        assert!(!WeightSampler::uniform_inclusive(1.5, 1.5).unwrap().is_continuous());
        assert!(!WeightSampler::binomial(4, 0.5).unwrap().is_continuous());
        assert!(WeightSampler::normal(0., 1.).unwrap().is_continuous());
    }

    #[test]
    fn binomial_counts() {
        let sampler = WeightSampler::binomial(4, 0.5).unwrap();
        let matrix = sampler.sample_matrix(&mut seeded_rng(), (5, 10));

        assert!(matrix.iter().all(|x| x.fract() == 0. && (0. ..=4.).contains(x)));
    }

    #[test]
    fn continuous_laws_skip_zero() {
        let sampler = WeightSampler::uniform(-1e-3, 1e-3).unwrap();
        let matrix = sampler.sample_matrix(&mut seeded_rng(), (40, 25));

        assert!(matrix.iter().all(|&x| x != 0.));
    }
}
