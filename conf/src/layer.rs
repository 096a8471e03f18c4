use serde::{Deserialize, Serialize};

use crate::Distribution;

/// The kind of a layer, which dictates the parameters it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Dense,
    Output,
    Rbm,
    AutoEncoder,
}

impl LayerKind {
    /// Whether the layer is pretrainable, pretrainable layers also own a visible bias.
    pub fn is_pretrainable(&self) -> bool {
        matches!(self, LayerKind::Rbm | LayerKind::AutoEncoder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Sigmoid,
    Tanh,
    Relu,
    Softmax,
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFunction {
    Mse,
    Mcxent,
    ReconstructionCrossEntropy,
}

/// The policy used to fill a layer's weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Sample from the configured `Distribution`.
    Distribution,
    Zero,
    /// `U(-1/n_in, 1/n_in)`.
    Uniform,
    /// `N(0, 2/(n_in + n_out))`.
    #[default]
    Xavier,
    /// `U(-sqrt(6/(n_in + n_out)), sqrt(6/(n_in + n_out)))`.
    XavierUniform,
    /// `N(0, 2/n_in)`.
    Relu,
    /// `N(0, 1/n_in)`.
    Lecun,
    /// `U(-sqrt(3/n_in), sqrt(3/n_in))`.
    LecunUniform,
}

/// Declarative description of a single layer.
///
/// The optional fields are layer-level choices; when unset the network-wide
/// defaults apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub kind: LayerKind,
    pub n_in: usize,
    pub n_out: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_init: Option<WeightInit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Distribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<LossFunction>,
}

impl LayerSpec {
    /// Creates a new `LayerSpec` of the given kind with no shape and no layer-level choices.
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            n_in: 0,
            n_out: 0,
            weight_init: None,
            dist: None,
            activation: None,
            loss: None,
        }
    }

    pub fn dense() -> Self {
        Self::new(LayerKind::Dense)
    }

    pub fn rbm() -> Self {
        Self::new(LayerKind::Rbm)
    }

    pub fn output() -> Self {
        Self::new(LayerKind::Output)
    }

    pub fn auto_encoder() -> Self {
        Self::new(LayerKind::AutoEncoder)
    }

    pub fn with_dim(mut self, n_in: usize, n_out: usize) -> Self {
        self.n_in = n_in;
        self.n_out = n_out;
        self
    }

    pub fn with_weight_init(mut self, weight_init: WeightInit) -> Self {
        self.weight_init = Some(weight_init);
        self
    }

    pub fn with_dist(mut self, dist: Distribution) -> Self {
        self.dist = Some(dist);
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }

    pub fn with_loss(mut self, loss: LossFunction) -> Self {
        self.loss = Some(loss);
        self
    }
}
