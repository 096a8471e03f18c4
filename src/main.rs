use std::env;

use anyhow::{Context, bail};
use conf::{
    ConfigurationBuilder, Distribution, LayerSpec, NetworkConfiguration, OverrideSpec,
    Properties, RngSpec, WeightInit,
};
use log::info;
use machine_learning::{MultiLayerNetwork, RngProvider, arch::WEIGHT_KEY};

const DEFAULT_PROPS_PATH: &str = "network.properties";
const DEFAULT_SEED: u64 = 12345;
const JSON_KEY: &str = "json";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = env::var("PROPS_PATH").unwrap_or_else(|_| DEFAULT_PROPS_PATH.to_string());
    let seed = match env::var("SEED") {
        Ok(seed) => seed.parse().with_context(|| format!("invalid SEED {seed:?}"))?,
        Err(_) => DEFAULT_SEED,
    };

    let conf = ConfigurationBuilder::new()
        .layer(LayerSpec::rbm())
        .n_in(2)
        .n_out(1)
        .weight_init(WeightInit::Distribution)
        .dist(Distribution::normal(0., 1.))
        .rng(RngSpec::seeded(seed))
        .list(2)
        .hidden_layer_sizes([5])
        .override_at(1, OverrideSpec::Classifier)
        .build()?;

    let mut props = Properties::new();
    props.set(JSON_KEY, conf.to_json());
    props
        .save(&path, "network configuration")
        .with_context(|| format!("failed to write {path}"))?;
    info!("saved configuration to {path}");

    let props = Properties::open(&path).with_context(|| format!("failed to read {path}"))?;
    let json = props
        .get(JSON_KEY)
        .with_context(|| format!("{path} has no {JSON_KEY} key"))?;
    let reloaded = NetworkConfiguration::from_json(json)?;

    if reloaded != conf {
        bail!("the configuration reloaded from {path} differs from the saved one");
    }

    let mut network = MultiLayerNetwork::with_rng(reloaded, RngProvider::seeded(seed));
    network.init()?;

    for layer in network.layers() {
        let zeros = layer.count_where(WEIGHT_KEY, |x| x == 0.).unwrap_or_default();
        info!(
            layer = layer.index(),
            n_in = layer.n_in(),
            n_out = layer.n_out(),
            params = layer.num_params(),
            zero_weights = zeros;
            "{:?} layer ready", layer.kind()
        );
    }

    info!(params = network.num_params(); "network ready");

    Ok(())
}
