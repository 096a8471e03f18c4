use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    Activation, ConfErr, Distribution, LayerSpec, OverrideSpec, PreProcessorSpec, Result,
    RngSpec, WeightInit,
};

/// Network-wide choices every layer inherits unless it sets its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub weight_init: WeightInit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Distribution>,
    pub activation: Activation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng: Option<RngSpec>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            weight_init: WeightInit::default(),
            dist: None,
            activation: Activation::default(),
            rng: None,
        }
    }
}

/// The effective initialization of a layer once the defaults are merged in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerInit {
    pub weight_init: WeightInit,
    pub dist: Option<Distribution>,
}

/// An immutable, ordered description of a multi layer network.
///
/// Instances are produced by `ConfigurationBuilder::build` or
/// `NetworkConfiguration::from_json`, both of which validate them, and are compared
/// structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfiguration {
    defaults: Defaults,
    layers: Vec<LayerSpec>,
    #[serde(default)]
    overrides: BTreeMap<usize, OverrideSpec>,
    #[serde(default)]
    pre_processors: BTreeMap<usize, PreProcessorSpec>,
}

impl NetworkConfiguration {
    /// Creates a new validated `NetworkConfiguration`.
    ///
    /// # Arguments
    /// * `defaults` - The network-wide defaults.
    /// * `layers` - The layers, with their overrides already merged.
    /// * `overrides` - The overrides that were merged, by layer index.
    /// * `pre_processors` - The pre-processors, by layer index.
    ///
    /// # Returns
    /// The configuration or the first violated invariant.
    pub(crate) fn new(
        defaults: Defaults,
        layers: Vec<LayerSpec>,
        overrides: BTreeMap<usize, OverrideSpec>,
        pre_processors: BTreeMap<usize, PreProcessorSpec>,
    ) -> Result<Self> {
        let conf = Self {
            defaults,
            layers,
            overrides,
            pre_processors,
        };

        conf.validate()?;
        Ok(conf)
    }

    /// Checks every invariant of the configuration.
    pub fn validate(&self) -> Result<()> {
        let nlayers = self.layers.len();
        if nlayers == 0 {
            return Err(ConfErr::NoLayers);
        }

        if let Some((&index, _)) = self.overrides.range(nlayers..).next() {
            return Err(ConfErr::OverrideOutOfRange {
                index,
                layers: nlayers,
            });
        }

        if let Some((&index, _)) = self.pre_processors.range(nlayers..).next() {
            return Err(ConfErr::PreProcessorOutOfRange {
                index,
                layers: nlayers,
            });
        }

        if let Some(dist) = &self.defaults.dist {
            dist.validate(None)?;
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if let Some(dist) = &layer.dist {
                dist.validate(Some(i))?;
            }

            let init = self.resolve_init(layer);
            if init.weight_init == WeightInit::Distribution && init.dist.is_none() {
                return Err(ConfErr::MissingDistribution { layer: i });
            }
        }

        Ok(())
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&LayerSpec> {
        self.layers.get(index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn rng(&self) -> Option<RngSpec> {
        self.defaults.rng
    }

    pub fn overrides(&self) -> &BTreeMap<usize, OverrideSpec> {
        &self.overrides
    }

    pub fn pre_processors(&self) -> &BTreeMap<usize, PreProcessorSpec> {
        &self.pre_processors
    }

    pub fn pre_processor(&self, index: usize) -> Option<&PreProcessorSpec> {
        self.pre_processors.get(&index)
    }

    /// Resolves the effective weight initialization of a layer.
    ///
    /// # Arguments
    /// * `index` - The index of the layer.
    ///
    /// # Returns
    /// The layer's own choices merged onto the defaults, or `None` if there is no such layer.
    pub fn layer_init(&self, index: usize) -> Option<LayerInit> {
        self.layers.get(index).map(|layer| self.resolve_init(layer))
    }

    /// Resolves the effective activation of a layer.
    pub fn activation(&self, index: usize) -> Option<Activation> {
        self.layers
            .get(index)
            .map(|layer| layer.activation.unwrap_or(self.defaults.activation))
    }

    /// Merges a layer's own initialization choices onto the defaults.
    pub fn resolve_init(&self, layer: &LayerSpec) -> LayerInit {
        LayerInit {
            weight_init: layer.weight_init.unwrap_or(self.defaults.weight_init),
            dist: layer.dist.or(self.defaults.dist),
        }
    }
}
