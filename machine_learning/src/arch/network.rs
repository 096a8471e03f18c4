use std::{collections::BTreeMap, rc::Rc};

use conf::{ConfErr, NetworkConfiguration};
use log::{debug, info};
use ndarray::Array2;

use super::{Layer, Listeners, WEIGHT_KEY};
use crate::{
    InitErr, Result, RngProvider,
    initialization,
    listeners::IterationListener,
};

/// A stack of layers described by a `NetworkConfiguration`.
///
/// Building a network only lays out its layers, `init` fills their parameters.
pub struct MultiLayerNetwork {
    conf: Rc<NetworkConfiguration>,
    layers: Vec<Layer>,
    rng: RngProvider,
    listeners: Listeners,
    initialized: bool,
}

impl MultiLayerNetwork {
    /// Creates a new `MultiLayerNetwork` seeded after its configuration.
    ///
    /// # Arguments
    /// * `conf` - The configuration, owned or shared.
    ///
    /// # Returns
    /// A new uninitialized network, drawing from a generator seeded with the configuration's
    /// seed or, without one, from the operating system.
    pub fn new(conf: impl Into<Rc<NetworkConfiguration>>) -> Self {
        let conf = conf.into();
        let rng = RngProvider::from_spec(conf.rng());
        Self::with_rng(conf, rng)
    }

    /// Creates a new `MultiLayerNetwork` drawing from the given provider.
    ///
    /// # Arguments
    /// * `conf` - The configuration, owned or shared.
    /// * `rng` - The provider `init` draws from.
    ///
    /// # Returns
    /// A new uninitialized network.
    pub fn with_rng(conf: impl Into<Rc<NetworkConfiguration>>, rng: RngProvider) -> Self {
        let conf = conf.into();
        let listeners = Listeners::default();

        let layers = conf
            .layers()
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let activation = spec.activation.unwrap_or(conf.defaults().activation);
                let pre_processor = conf.pre_processor(i).cloned();
                Layer::new(i, spec.clone(), activation, pre_processor, listeners.clone())
            })
            .collect();

        Self {
            conf,
            layers,
            rng,
            listeners,
            initialized: false,
        }
    }

    /// Initializes the parameters of every layer.
    ///
    /// Weights follow each layer's effective policy and biases start at zero. Calling it again
    /// reinitializes the network from the provider's current state. Listeners are kept.
    ///
    /// # Returns
    /// An error if any layer can't be initialized, in which case no layer is modified.
    pub fn init(&mut self) -> Result<()> {
        let params = self
            .layers
            .iter()
            .map(|layer| self.init_layer(layer))
            .collect::<Result<Vec<_>>>()?;

        for (layer, params) in self.layers.iter_mut().zip(params) {
            layer.set_params(params);
        }

        self.initialized = true;
        info!(layers = self.layers.len(), params = self.num_params(); "initialized network");
        Ok(())
    }

    fn init_layer(&self, layer: &Layer) -> Result<BTreeMap<&'static str, Array2<f32>>> {
        let index = layer.index();
        let shapes = layer.param_shapes();

        if let Some(&(param, shape)) = shapes.iter().find(|(_, shape)| !fits(*shape)) {
            return Err(InitErr::TooLarge {
                layer: index,
                param,
                shape,
            });
        }

        let init = self.conf.resolve_init(layer.spec());
        let sampler = initialization::weight_sampler(init, layer.n_in(), layer.n_out())
            .map_err(|source| InitErr::Distribution {
                layer: index,
                source,
            })?
            .ok_or(ConfErr::MissingDistribution { layer: index })?;

        let rng = self.rng.shared();
        let mut rng = rng.borrow_mut();

        let params: BTreeMap<_, _> = shapes
            .into_iter()
            .map(|(key, shape)| {
                let param = match key {
                    WEIGHT_KEY => sampler.sample_matrix(&mut *rng, shape),
                    _ => Array2::zeros(shape),
                };
                (key, param)
            })
            .collect();

        debug!(
            layer = index,
            params = params.values().map(|param| param.len()).sum::<usize>();
            "initialized {:?} layer with {:?} weights",
            layer.kind(),
            init.weight_init
        );

        Ok(params)
    }

    /// Replaces the listener set, every layer ends up sharing the new set.
    ///
    /// # Arguments
    /// * `listeners` - The listeners to notify on each completed iteration.
    pub fn set_listeners(&mut self, listeners: Vec<Box<dyn IterationListener>>) {
        self.listeners = Rc::new(listeners);

        for layer in &mut self.layers {
            layer.set_listeners(self.listeners.clone());
        }
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Notifies every listener that an iteration completed.
    pub fn iteration_done(&self, iteration: usize, score: f32) {
        for listener in self.listeners.iter() {
            listener.iteration_done(iteration, score);
        }
    }

    /// Every parameter of the network flattened in layer order, each layer in `W`, `b`, `vb`
    /// order and each matrix in row-major order.
    pub fn params(&self) -> Vec<f32> {
        self.layers
            .iter()
            .flat_map(|layer| layer.params())
            .flat_map(|(_, param)| param.iter().copied())
            .collect()
    }

    pub fn num_params(&self) -> usize {
        self.layers.iter().map(Layer::num_params).sum()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn configuration(&self) -> &NetworkConfiguration {
        &self.conf
    }

    pub fn rng(&self) -> &RngProvider {
        &self.rng
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Whether a matrix of this shape can be allocated, i.e. its size in bytes fits in an `isize`.
fn fits((rows, cols): (usize, usize)) -> bool {
    rows.checked_mul(cols)
        .and_then(|len| len.checked_mul(size_of::<f32>()))
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_bounds() {
        assert!(fits((0, usize::MAX)));
        assert!(fits((3, 5)));
        assert!(!fits((usize::MAX, 2)));
        assert!(!fits((isize::MAX as usize / 2, 1)));
    }
}
