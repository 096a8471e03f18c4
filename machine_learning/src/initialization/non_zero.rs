use rand::Rng;
use rand_distr::Distribution;

/// Upper bound of redraws per sample, only reachable when the wrapped distribution
/// collapses to zero once narrowed to `f32`.
const MAX_REDRAWS: usize = 64;

/// A distribution adaptor that redraws whenever the wrapped distribution yields exactly
/// zero.
///
/// Meant for continuous distributions, for which the redraw has probability zero and the
/// resulting stream only differs from the wrapped one in that case.
#[derive(Debug, Clone, Copy)]
pub struct NonZero<D>(D);

impl<D: Distribution<f32>> NonZero<D> {
    pub fn new(distribution: D) -> Self {
        Self(distribution)
    }
}

impl<D: Distribution<f32>> Distribution<f32> for NonZero<D> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let mut value = self.0.sample(rng);

        for _ in 0..MAX_REDRAWS {
            if value != 0. {
                break;
            }
            value = self.0.sample(rng);
        }

        value
    }
}
