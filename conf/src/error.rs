use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used by the configuration builder.
pub type Result<T> = std::result::Result<T, ConfErr>;

/// A builder invariant was violated while producing a `NetworkConfiguration`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfErr {
    NoLayers,
    LayerCountMismatch {
        declared: usize,
        got: usize,
    },
    HiddenLayerSizeMismatch {
        layers: usize,
        boundaries: usize,
    },
    OverrideOutOfRange {
        index: usize,
        layers: usize,
    },
    PreProcessorOutOfRange {
        index: usize,
        layers: usize,
    },
    MissingDistribution {
        layer: usize,
    },
    InvalidDistribution {
        layer: Option<usize>,
        reason: String,
    },
}

impl Display for ConfErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfErr::NoLayers => write!(f, "the configuration has no layers"),
            ConfErr::LayerCountMismatch { declared, got } => write!(
                f,
                "list({declared}) was requested but {got} layer specs were given"
            ),
            ConfErr::HiddenLayerSizeMismatch { layers, boundaries } => write!(
                f,
                "{layers} layers need {} layer sizes (nIn, hidden sizes and nOut), got {boundaries}",
                layers + 1
            ),
            ConfErr::OverrideOutOfRange { index, layers } => write!(
                f,
                "override targets layer {index} but there are only {layers} layers"
            ),
            ConfErr::PreProcessorOutOfRange { index, layers } => write!(
                f,
                "pre-processor targets layer {index} but there are only {layers} layers"
            ),
            ConfErr::MissingDistribution { layer } => write!(
                f,
                "layer {layer} uses distribution weight init but no distribution is set"
            ),
            ConfErr::InvalidDistribution {
                layer: Some(layer),
                reason,
            } => write!(f, "invalid distribution at layer {layer}: {reason}"),
            ConfErr::InvalidDistribution {
                layer: None,
                reason,
            } => write!(f, "invalid default distribution: {reason}"),
        }
    }
}

impl Error for ConfErr {}

/// Failure to turn text back into a `NetworkConfiguration`.
///
/// The offending text is always kept so it can be reported.
#[derive(Debug)]
pub enum SerdeErr {
    Malformed {
        text: String,
        source: serde_json::Error,
    },
    Invalid {
        text: String,
        source: ConfErr,
    },
    Io(io::Error),
}

impl SerdeErr {
    /// Returns the text that failed to deserialize, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            SerdeErr::Malformed { text, .. } | SerdeErr::Invalid { text, .. } => Some(text),
            SerdeErr::Io(_) => None,
        }
    }
}

impl Display for SerdeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerdeErr::Malformed { text, source } => {
                write!(f, "malformed configuration ({} bytes): {source}", text.len())
            }
            SerdeErr::Invalid { text, source } => {
                write!(f, "invalid configuration ({} bytes): {source}", text.len())
            }
            SerdeErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for SerdeErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SerdeErr::Malformed { source, .. } => Some(source),
            SerdeErr::Invalid { source, .. } => Some(source),
            SerdeErr::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for SerdeErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
