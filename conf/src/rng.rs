use serde::{Deserialize, Serialize};

/// Describes the random source networks are initialized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngSpec {
    /// The default generator seeded with a fixed value.
    Default { seed: u64 },
}

impl RngSpec {
    pub fn seeded(seed: u64) -> Self {
        Self::Default { seed }
    }

    pub fn seed(&self) -> u64 {
        match *self {
            RngSpec::Default { seed } => seed,
        }
    }
}
