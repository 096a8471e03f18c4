use serde::{Deserialize, Serialize};

use crate::ConfErr;

/// Describes how the random values of a parameter are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    Normal { mean: f64, std: f64 },
    Uniform { lower: f64, upper: f64 },
    Binomial { trials: u64, probability: f64 },
}

impl Distribution {
    /// Creates a new normal distribution.
    pub fn normal(mean: f64, std: f64) -> Self {
        Self::Normal { mean, std }
    }

    /// Creates a new uniform distribution over `[lower, upper)`.
    pub fn uniform(lower: f64, upper: f64) -> Self {
        Self::Uniform { lower, upper }
    }

    /// Creates a new binomial distribution.
    pub fn binomial(trials: u64, probability: f64) -> Self {
        Self::Binomial {
            trials,
            probability,
        }
    }

    /// Whether sampling this distribution yields a continuum of values, in which case
    /// hitting any single value (zero included) has probability zero.
    ///
    /// Parameters are sampled in single precision, so this is judged on the narrowed values.
    pub fn is_continuous(&self) -> bool {
        match *self {
            Distribution::Normal { std, .. } => narrow(std) > 0.,
            Distribution::Uniform { lower, upper } => narrow(lower) < narrow(upper),
            Distribution::Binomial { .. } => false,
        }
    }

    /// Checks the parameters of the distribution.
    ///
    /// Besides the usual constraints, every parameter must stay finite once narrowed to `f32`
    /// and a spread that is nonzero must stay nonzero.
    ///
    /// # Arguments
    /// * `layer` - The layer this distribution belongs to, `None` for the global default.
    ///
    /// # Returns
    /// An error describing the first invalid parameter.
    pub fn validate(&self, layer: Option<usize>) -> Result<(), ConfErr> {
        let invalid = |reason: String| ConfErr::InvalidDistribution { layer, reason };

        match *self {
            Distribution::Normal { mean, std } => {
                if !narrow(mean).is_finite() || !narrow(std).is_finite() {
                    return Err(invalid(format!("normal({mean}, {std}) is not finite in f32")));
                }
                if std < 0. {
                    return Err(invalid(format!("normal std must be >= 0, got {std}")));
                }
                if std > 0. && narrow(std) == 0. {
                    return Err(invalid(format!("normal std {std} underflows to zero in f32")));
                }
            }
            Distribution::Uniform { lower, upper } => {
                if !narrow(lower).is_finite() || !narrow(upper).is_finite() {
                    return Err(invalid(format!("uniform({lower}, {upper}) is not finite in f32")));
                }
                if lower > upper {
                    return Err(invalid(format!(
                        "uniform lower bound {lower} exceeds upper bound {upper}"
                    )));
                }
                if lower < upper && narrow(lower) == narrow(upper) {
                    return Err(invalid(format!(
                        "uniform({lower}, {upper}) collapses to a single value in f32"
                    )));
                }
                if !(narrow(upper) - narrow(lower)).is_finite() {
                    return Err(invalid(format!(
                        "the width of uniform({lower}, {upper}) overflows f32"
                    )));
                }
            }
            Distribution::Binomial { probability, .. } => {
                if !(0. ..=1.).contains(&probability) {
                    return Err(invalid(format!(
                        "binomial probability must be within [0, 1], got {probability}"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Weights are `f32`, every parameter is sampled at that precision.
fn narrow(value: f64) -> f32 {
    value as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous() {
        assert!(Distribution::normal(0., 1.).is_continuous());
        assert!(!Distribution::normal(0., 0.).is_continuous());
        assert!(Distribution::uniform(-1., 1.).is_continuous());
        assert!(!Distribution::uniform(1., 1.).is_continuous());
        assert!(!Distribution::binomial(10, 0.5).is_continuous());
    }

    #[test]
    fn invalid_parameters() {
        assert!(Distribution::normal(0., -1.).validate(None).is_err());
        assert!(Distribution::normal(f64::NAN, 1.).validate(None).is_err());
        assert!(Distribution::uniform(2., 1.).validate(Some(0)).is_err());
        assert!(Distribution::binomial(3, 1.5).validate(Some(1)).is_err());
        assert!(Distribution::normal(1., 1e-1).validate(None).is_ok());
    }

    #[test]
    fn narrowed_parameters() {
        assert!(!Distribution::normal(0., 1e-300).is_continuous());
        assert!(Distribution::normal(0., 1e-300).validate(None).is_err());
        assert!(Distribution::normal(0., 1e-30).validate(None).is_ok());
        assert!(Distribution::normal(1e300, 1.).validate(None).is_err());
        assert!(Distribution::normal(0., 1e39).validate(None).is_err());

        assert!(!Distribution::uniform(1., 1. + 1e-12).is_continuous());
        assert!(Distribution::uniform(1., 1. + 1e-12).validate(None).is_err());
        assert!(Distribution::uniform(-3e38, 3e38).validate(None).is_err());
        assert!(Distribution::uniform(-1e39, 1.).validate(None).is_err());
        assert!(Distribution::uniform(1., 1.).validate(None).is_ok());
    }

    #[test]
    fn error_names_layer() {
        let err = Distribution::uniform(2., 1.).validate(Some(3)).unwrap_err();
        assert!(matches!(err, ConfErr::InvalidDistribution { layer: Some(3), .. }));
    }
}
