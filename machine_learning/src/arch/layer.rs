use std::{collections::BTreeMap, rc::Rc};

use conf::{Activation, LayerKind, LayerSpec, PreProcessorSpec};
use ndarray::Array2;

use crate::listeners::IterationListener;

/// Key of the `[n_in, n_out]` weight matrix.
pub const WEIGHT_KEY: &str = "W";
/// Key of the `[1, n_out]` hidden bias.
pub const BIAS_KEY: &str = "b";
/// Key of the `[1, n_in]` visible bias, only pretrainable layers own one.
pub const VISIBLE_BIAS_KEY: &str = "vb";

/// The listener set of a network, every layer holds the same allocation.
pub type Listeners = Rc<Vec<Box<dyn IterationListener>>>;

/// A layer of a `MultiLayerNetwork`, holding the parameters described by its `LayerSpec`.
pub struct Layer {
    index: usize,
    spec: LayerSpec,
    activation: Activation,
    pre_processor: Option<PreProcessorSpec>,
    params: BTreeMap<&'static str, Array2<f32>>,
    listeners: Listeners,
}

impl Layer {
    /// Creates a new uninitialized `Layer`.
    ///
    /// # Arguments
    /// * `index` - The position of the layer in its network.
    /// * `spec` - The `LayerSpec` the layer follows.
    /// * `activation` - The effective activation of the layer.
    /// * `pre_processor` - The pre-processor applied to the layer's input, if any.
    /// * `listeners` - The listener set of the network.
    ///
    /// # Returns
    /// A new `Layer` instance without parameters.
    pub(crate) fn new(
        index: usize,
        spec: LayerSpec,
        activation: Activation,
        pre_processor: Option<PreProcessorSpec>,
        listeners: Listeners,
    ) -> Self {
        Self {
            index,
            spec,
            activation,
            pre_processor,
            params: BTreeMap::new(),
            listeners,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn spec(&self) -> &LayerSpec {
        &self.spec
    }

    pub fn kind(&self) -> LayerKind {
        self.spec.kind
    }

    pub fn n_in(&self) -> usize {
        self.spec.n_in
    }

    pub fn n_out(&self) -> usize {
        self.spec.n_out
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn pre_processor(&self) -> Option<&PreProcessorSpec> {
        self.pre_processor.as_ref()
    }

    /// The keys and shapes of the parameters this layer owns, in flattening order.
    pub fn param_shapes(&self) -> Vec<(&'static str, (usize, usize))> {
        let (n_in, n_out) = (self.n_in(), self.n_out());
        let mut shapes = vec![(WEIGHT_KEY, (n_in, n_out)), (BIAS_KEY, (1, n_out))];

        if self.kind().is_pretrainable() {
            shapes.push((VISIBLE_BIAS_KEY, (1, n_in)));
        }

        shapes
    }

    pub fn param(&self, key: &str) -> Option<&Array2<f32>> {
        self.params.get(key)
    }

    /// Iterates the parameters in flattening order (`W`, `b` then `vb`).
    pub fn params(&self) -> impl Iterator<Item = (&'static str, &Array2<f32>)> {
        self.param_shapes()
            .into_iter()
            .filter_map(|(key, _)| self.params.get(key).map(|param| (key, param)))
    }

    /// The amount of scalars held by the layer, zero until initialized.
    pub fn num_params(&self) -> usize {
        self.params.values().map(|param| param.len()).sum()
    }

    pub fn is_initialized(&self) -> bool {
        !self.params.is_empty()
    }

    /// Counts the scalars of a parameter matching a predicate.
    ///
    /// # Arguments
    /// * `key` - The key of the parameter.
    /// * `predicate` - The predicate to test each scalar against.
    ///
    /// # Returns
    /// The count, or `None` if the layer holds no such parameter.
    pub fn count_where<F>(&self, key: &str, predicate: F) -> Option<usize>
    where
        F: Fn(f32) -> bool,
    {
        self.params
            .get(key)
            .map(|param| param.iter().filter(|&&x| predicate(x)).count())
    }

    pub(crate) fn set_params(&mut self, params: BTreeMap<&'static str, Array2<f32>>) {
        self.params = params;
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub(crate) fn set_listeners(&mut self, listeners: Listeners) {
        self.listeners = listeners;
    }
}
