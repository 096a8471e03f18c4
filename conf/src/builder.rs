use std::collections::BTreeMap;

use log::debug;

use crate::{
    Activation, ConfErr, Defaults, Distribution, LayerSpec, NetworkConfiguration, OverrideSpec,
    PreProcessorSpec, Result, RngSpec, WeightInit,
};

/// Accumulates the description of a network and builds immutable `NetworkConfiguration`s
/// from it.
///
/// A single layer spec acts as a template: `list(count)` repeats it `count` times and
/// `hidden_layer_sizes` gives each copy its own shape. Several layer specs are taken as-is,
/// in which case `list(count)` must agree with how many were given.
///
/// `build` snapshots the builder, so it can keep being modified and built again without
/// affecting previously built configurations.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    layers: Vec<LayerSpec>,
    defaults: Defaults,
    n_in: Option<usize>,
    n_out: Option<usize>,
    count: Option<usize>,
    hidden_layer_sizes: Vec<usize>,
    overrides: BTreeMap<usize, OverrideSpec>,
    pre_processors: BTreeMap<usize, PreProcessorSpec>,
}

impl ConfigurationBuilder {
    /// Creates a new empty `ConfigurationBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer spec.
    pub fn layer(mut self, spec: LayerSpec) -> Self {
        self.layers.push(spec);
        self
    }

    /// Sets the default weight initialization policy.
    pub fn weight_init(mut self, weight_init: WeightInit) -> Self {
        self.defaults.weight_init = weight_init;
        self
    }

    /// Sets the default distribution used by `WeightInit::Distribution`.
    pub fn dist(mut self, dist: Distribution) -> Self {
        self.defaults.dist = Some(dist);
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.defaults.activation = activation;
        self
    }

    /// Sets the random source networks built from this configuration start from.
    pub fn rng(mut self, rng: RngSpec) -> Self {
        self.defaults.rng = Some(rng);
        self
    }

    /// Sets the input size of the network.
    pub fn n_in(mut self, n_in: usize) -> Self {
        self.n_in = Some(n_in);
        self
    }

    /// Sets the output size of the network.
    pub fn n_out(mut self, n_out: usize) -> Self {
        self.n_out = Some(n_out);
        self
    }

    /// Sets the amount of layers of the network.
    pub fn list(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the sizes between consecutive layers.
    ///
    /// Together with `n_in` and `n_out` (when set) these must describe exactly
    /// `count + 1` layer boundaries.
    pub fn hidden_layer_sizes<I>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.hidden_layer_sizes = sizes.into_iter().collect();
        self
    }

    /// Patches the generated layer at `index`.
    pub fn override_at(mut self, index: usize, spec: OverrideSpec) -> Self {
        self.overrides.insert(index, spec);
        self
    }

    /// Attaches a pre-processor in front of the layer at `index`.
    pub fn pre_processor(mut self, index: usize, spec: PreProcessorSpec) -> Self {
        self.pre_processors.insert(index, spec);
        self
    }

    /// Builds a new `NetworkConfiguration` from the current state of the builder.
    ///
    /// # Returns
    /// The configuration or a `ConfErr` if any of its invariants doesn't hold, nothing is
    /// ever silently truncated or padded.
    pub fn build(&self) -> Result<NetworkConfiguration> {
        let (mut layers, from_template) = self.expand_layers()?;
        self.resolve_sizes(&mut layers, from_template)?;

        let nlayers = layers.len();
        for (&index, spec) in &self.overrides {
            let layer = layers.get_mut(index).ok_or(ConfErr::OverrideOutOfRange {
                index,
                layers: nlayers,
            })?;

            spec.apply(layer);
        }

        let conf = NetworkConfiguration::new(
            self.defaults.clone(),
            layers,
            self.overrides.clone(),
            self.pre_processors.clone(),
        )?;

        debug!(layers = conf.len(), overrides = self.overrides.len(); "built network configuration");
        Ok(conf)
    }

    /// Expands the accumulated layer specs into the list of layers.
    ///
    /// # Returns
    /// The layers and whether they were stamped out of a single template.
    fn expand_layers(&self) -> Result<(Vec<LayerSpec>, bool)> {
        let count = self.count.unwrap_or(self.layers.len());

        match self.layers.as_slice() {
            _ if count == 0 => Err(ConfErr::NoLayers),
            [] => Err(ConfErr::NoLayers),
            [template] => Ok((vec![template.clone(); count], true)),
            layers if layers.len() == count => Ok((layers.to_vec(), false)),
            layers => Err(ConfErr::LayerCountMismatch {
                declared: count,
                got: layers.len(),
            }),
        }
    }

    fn resolve_sizes(&self, layers: &mut [LayerSpec], from_template: bool) -> Result<()> {
        if self.hidden_layer_sizes.is_empty() {
            if from_template {
                for layer in layers.iter_mut() {
                    layer.n_in = self.n_in.unwrap_or(layer.n_in);
                    layer.n_out = self.n_out.unwrap_or(layer.n_out);
                }
            }

            return Ok(());
        }

        let boundaries: Vec<usize> = self
            .n_in
            .into_iter()
            .chain(self.hidden_layer_sizes.iter().copied())
            .chain(self.n_out)
            .collect();

        if boundaries.len() != layers.len() + 1 {
            return Err(ConfErr::HiddenLayerSizeMismatch {
                layers: layers.len(),
                boundaries: boundaries.len(),
            });
        }

        for (layer, dim) in layers.iter_mut().zip(boundaries.windows(2)) {
            layer.n_in = dim[0];
            layer.n_out = dim[1];
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LayerKind, LayerPatch, LossFunction};

    fn classifier_conf() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
            .layer(LayerSpec::rbm())
            .n_in(2)
            .n_out(1)
            .weight_init(WeightInit::Distribution)
            .dist(Distribution::normal(0., 1.))
            .rng(RngSpec::seeded(12345))
            .list(2)
            .hidden_layer_sizes([5])
            .override_at(1, OverrideSpec::Classifier)
    }

    #[test]
    fn hidden_sizes_chain_layers() {
        let conf = classifier_conf().build().unwrap();
        let dims: Vec<_> = conf.layers().iter().map(|l| (l.n_in, l.n_out)).collect();

        assert_eq!(dims, [(2, 5), (5, 1)]);
        assert_eq!(conf.layers()[0].kind, LayerKind::Rbm);
        assert_eq!(conf.layers()[1].kind, LayerKind::Output);
        assert_eq!(conf.layers()[1].loss, Some(LossFunction::Mcxent));
        assert_eq!(conf.activation(1), Some(Activation::Softmax));
        assert_eq!(conf.activation(0), Some(Activation::Sigmoid));
    }

    #[test]
    fn hidden_sizes_mismatch() {
        let res = ConfigurationBuilder::new()
            .layer(LayerSpec::rbm())
            .dist(Distribution::normal(1., 1e-1))
            .list(4)
            .hidden_layer_sizes([3, 2, 2])
            .build();

        assert_eq!(
            res.unwrap_err(),
            ConfErr::HiddenLayerSizeMismatch {
                layers: 4,
                boundaries: 3
            }
        );
    }

    #[test]
    fn hidden_sizes_with_outer_sizes() {
        let conf = ConfigurationBuilder::new()
            .layer(LayerSpec::rbm())
            .n_in(4)
            .n_out(1)
            .list(4)
            .hidden_layer_sizes([3, 2, 2])
            .build()
            .unwrap();

        let dims: Vec<_> = conf.layers().iter().map(|l| (l.n_in, l.n_out)).collect();
        assert_eq!(dims, [(4, 3), (3, 2), (2, 2), (2, 1)]);
    }

    #[test]
    fn too_many_hidden_sizes() {
        let res = classifier_conf().hidden_layer_sizes([5, 4]).build();
        assert!(matches!(res, Err(ConfErr::HiddenLayerSizeMismatch { .. })));
    }

    #[test]
    fn override_bounds() {
        assert!(classifier_conf().build().is_ok());

        let res = classifier_conf()
            .override_at(2, OverrideSpec::Classifier)
            .build();
        assert_eq!(
            res.unwrap_err(),
            ConfErr::OverrideOutOfRange {
                index: 2,
                layers: 2
            }
        );
    }

    #[test]
    fn pre_processor_bounds() {
        let res = classifier_conf()
            .pre_processor(5, PreProcessorSpec::ZeroMean)
            .build();
        assert!(matches!(res, Err(ConfErr::PreProcessorOutOfRange { index: 5, .. })));
    }

    #[test]
    fn pre_processor_keeps_shape() {
        let conf = classifier_conf()
            .pre_processor(0, PreProcessorSpec::ConvolutionPost)
            .build()
            .unwrap();

        assert_eq!(conf.pre_processor(0), Some(&PreProcessorSpec::ConvolutionPost));
        assert_eq!(conf.pre_processor(1), None);
        assert_eq!((conf.layers()[0].n_in, conf.layers()[0].n_out), (2, 5));
    }

    #[test]
    fn missing_distribution() {
        let res = ConfigurationBuilder::new()
            .layer(LayerSpec::dense())
            .weight_init(WeightInit::Distribution)
            .list(2)
            .build();
        assert_eq!(res.unwrap_err(), ConfErr::MissingDistribution { layer: 0 });
    }

    #[test]
    fn layer_dist_satisfies_distribution_policy() {
        let conf = ConfigurationBuilder::new()
            .layer(LayerSpec::dense().with_dist(Distribution::uniform(-1., 1.)))
            .weight_init(WeightInit::Distribution)
            .build()
            .unwrap();

        let init = conf.layer_init(0).unwrap();
        assert_eq!(init.weight_init, WeightInit::Distribution);
        assert_eq!(init.dist, Some(Distribution::uniform(-1., 1.)));
    }

    #[test]
    fn patch_override_takes_precedence() {
        let patch = LayerPatch {
            weight_init: Some(WeightInit::Zero),
            ..Default::default()
        };
        let conf = classifier_conf()
            .override_at(0, OverrideSpec::Patch(patch))
            .build()
            .unwrap();

        assert_eq!(conf.layer_init(0).unwrap().weight_init, WeightInit::Zero);
        assert_eq!(conf.layer_init(1).unwrap().weight_init, WeightInit::Distribution);
        assert_eq!(conf.layer_init(1).unwrap().dist, Some(Distribution::normal(0., 1.)));
    }

    #[test]
    fn explicit_layers() {
        let conf = ConfigurationBuilder::new()
            .layer(LayerSpec::dense().with_dim(3, 4))
            .layer(LayerSpec::output().with_dim(4, 2))
            .build()
            .unwrap();
        assert_eq!(conf.len(), 2);
        assert_eq!(conf.layers()[1].n_out, 2);

        let res = ConfigurationBuilder::new()
            .layer(LayerSpec::dense())
            .layer(LayerSpec::output())
            .list(3)
            .build();
        assert_eq!(
            res.unwrap_err(),
            ConfErr::LayerCountMismatch {
                declared: 3,
                got: 2
            }
        );
    }

    #[test]
    fn no_layers() {
        assert_eq!(
            ConfigurationBuilder::new().build().unwrap_err(),
            ConfErr::NoLayers
        );
        assert_eq!(
            ConfigurationBuilder::new()
                .layer(LayerSpec::dense())
                .list(0)
                .build()
                .unwrap_err(),
            ConfErr::NoLayers
        );
    }

    #[test]
    fn build_snapshots_builder() {
        let builder = classifier_conf();
        let first = builder.build().unwrap();

        let builder = builder.n_in(7).weight_init(WeightInit::Zero);
        let second = builder.build().unwrap();

        assert_eq!(first.layers()[0].n_in, 2);
        assert_eq!(first.defaults().weight_init, WeightInit::Distribution);
        assert_eq!(second.layers()[0].n_in, 7);
        assert_ne!(first, second);
        assert_eq!(first, classifier_conf().build().unwrap());
    }
}
