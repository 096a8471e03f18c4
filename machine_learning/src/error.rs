use std::{
    error::Error,
    fmt::{self, Display},
};

use conf::ConfErr;

use crate::initialization::RandErr;

/// The result type used when initializing a network.
pub type Result<T> = std::result::Result<T, InitErr>;

/// A network could not be initialized, no layer has been touched when this is returned.
#[derive(Debug)]
pub enum InitErr {
    /// The weight policy of a layer can't be parametrized with its sizes.
    Distribution { layer: usize, source: RandErr },
    /// A parameter of a layer is too large to be allocated.
    TooLarge {
        layer: usize,
        param: &'static str,
        shape: (usize, usize),
    },
    /// The configuration doesn't hold, only reachable when it was mutated by hand.
    Config(ConfErr),
}

impl Display for InitErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitErr::Distribution { layer, source } => {
                write!(f, "cannot initialize the weights of layer {layer}: {source}")
            }
            InitErr::TooLarge {
                layer,
                param,
                shape: (rows, cols),
            } => write!(
                f,
                "parameter {param} of layer {layer} is too large to allocate ({rows}x{cols})"
            ),
            InitErr::Config(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl Error for InitErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InitErr::Distribution { source, .. } => Some(source),
            InitErr::Config(e) => Some(e),
            InitErr::TooLarge { .. } => None,
        }
    }
}

impl From<ConfErr> for InitErr {
    fn from(value: ConfErr) -> Self {
        Self::Config(value)
    }
}
