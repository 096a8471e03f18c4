use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::{BinomialError, NormalError, uniform::Error as UniformError};

/// The specific result type for the `WeightSampler` constructors.
pub type Result<T> = std::result::Result<T, RandErr>;

/// Error returned by the `WeightSampler` constructors whenever the parameters of the
/// underlying distribution are unusable, each constructor has its own constraints given
/// that they use different distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct RandErr(String);

impl RandErr {
    pub(crate) fn non_finite(what: &str, value: f32) -> Self {
        Self(format!("{what} must be finite, got {value}"))
    }

    pub(crate) fn negative(what: &str, value: f32) -> Self {
        Self(format!("{what} must be >= 0, got {value}"))
    }
}

impl From<NormalError> for RandErr {
    fn from(value: NormalError) -> Self {
        Self(value.to_string())
    }
}

impl From<UniformError> for RandErr {
    fn from(value: UniformError) -> Self {
        Self(value.to_string())
    }
}

impl From<BinomialError> for RandErr {
    fn from(value: BinomialError) -> Self {
        Self(value.to_string())
    }
}

impl Display for RandErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for RandErr {}
