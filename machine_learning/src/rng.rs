use std::{cell::RefCell, rc::Rc};

use conf::RngSpec;
use rand::{SeedableRng, rngs::StdRng};

/// A cloneable handle to a seedable random number generator.
///
/// Every clone draws from the same stream, so reseeding through any of them resets the
/// stream for all. The handle is neither `Send` nor `Sync`: a provider belongs to a single
/// thread and reseed-then-initialize pairs must be ordered by the caller.
#[derive(Debug, Clone)]
pub struct RngProvider {
    rng: Rc<RefCell<StdRng>>,
}

impl RngProvider {
    /// Creates a new `RngProvider` seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a new `RngProvider` seeded from the operating system's entropy source.
    pub fn from_os_rng() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates a new `RngProvider` given (or not) an `RngSpec`.
    ///
    /// # Arguments
    /// * `spec` - An optional `RngSpec`, without one the generator is seeded from the
    ///   operating system.
    ///
    /// # Returns
    /// A new provider.
    pub fn from_spec(spec: Option<RngSpec>) -> Self {
        match spec {
            Some(spec) => Self::seeded(spec.seed()),
            None => Self::from_os_rng(),
        }
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Rc::new(RefCell::new(rng)),
        }
    }

    /// Resets the stream as if this provider had just been created with `seed`.
    pub fn reseed(&self, seed: u64) {
        *self.rng.borrow_mut() = StdRng::seed_from_u64(seed);
    }

    /// Returns the underlying shared generator.
    pub fn shared(&self) -> Rc<RefCell<StdRng>> {
        self.rng.clone()
    }

    /// Whether both handles draw from the same stream.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.rng, &other.rng)
    }
}
