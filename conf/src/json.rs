use crate::{NetworkConfiguration, SerdeErr};

impl NetworkConfiguration {
    /// Serializes the configuration into pretty printed JSON.
    pub fn to_json(&self) -> String {
        // Map keys are integers and every value is plain data, this can't fail. Floats are
        // finite as long as `validate` keeps rejecting non-finite distribution parameters.
        serde_json::to_string_pretty(self).unwrap()
    }

    /// Deserializes a configuration from JSON.
    ///
    /// # Arguments
    /// * `text` - The JSON document, any whitespace layout is accepted.
    ///
    /// # Returns
    /// The configuration or a `SerdeErr` holding the rejected text if it is malformed or
    /// describes an invalid configuration.
    pub fn from_json(text: &str) -> Result<Self, SerdeErr> {
        let conf: Self = serde_json::from_str(text).map_err(|source| SerdeErr::Malformed {
            text: text.to_string(),
            source,
        })?;

        conf.validate().map_err(|source| SerdeErr::Invalid {
            text: text.to_string(),
            source,
        })?;

        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ConfErr, ConfigurationBuilder, Distribution, LayerPatch, LayerSpec, NetworkConfiguration,
        OverrideSpec, PreProcessorSpec, RngSpec, SerdeErr, WeightInit,
    };

    fn conf() -> NetworkConfiguration {
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
            .pre_processor(
                0,
                PreProcessorSpec::Reshape {
                    shape: vec![2, 1],
                },
            )
            .build()
            .unwrap()
    }

    #[test]
    fn round_trip() {
        let conf = conf();
        let json = conf.to_json();
        assert_eq!(NetworkConfiguration::from_json(&json).unwrap(), conf);
    }

    #[test]
    fn round_trip_keeps_float_bits() {
        let conf = ConfigurationBuilder::new()
            .layer(LayerSpec::dense().with_dist(Distribution::uniform(-0.1, 1. / 3.)))
            .dist(Distribution::normal(1., 1e-1))
            .override_at(
                0,
                OverrideSpec::Patch(LayerPatch {
                    dist: Some(Distribution::normal(0.7, 0.01)),
                    ..Default::default()
                }),
            )
            .build()
            .unwrap();

        let from = NetworkConfiguration::from_json(&conf.to_json()).unwrap();
        assert_eq!(from, conf);
    }

    #[test]
    fn floats_are_written_as_numbers() {
        let conf = ConfigurationBuilder::new()
            .layer(LayerSpec::dense().with_dist(Distribution::uniform(-3e38, 3e38)))
            .build();
        assert!(conf.is_err());

        let json = self::conf().to_json();
        assert!(!json.contains("null"));
    }

    #[test]
    fn whitespace_tolerant() {
        let conf = conf();
        let value: serde_json::Value = serde_json::from_str(&conf.to_json()).unwrap();
        let compact = serde_json::to_string(&value).unwrap();

        assert!(!compact.contains('\n'));
        assert_eq!(NetworkConfiguration::from_json(&compact).unwrap(), conf);
    }

    #[test]
    fn json_is_stable() {
        let conf = conf();
        assert_eq!(conf.to_json(), conf.clone().to_json());

        let from = NetworkConfiguration::from_json(&conf.to_json()).unwrap();
        assert_eq!(from.to_json(), conf.to_json());
    }

    #[test]
    fn malformed() {
        let json = conf().to_json();
        let truncated = &json[..json.len() / 2];

        let err = NetworkConfiguration::from_json(truncated).unwrap_err();
        assert!(matches!(err, SerdeErr::Malformed { .. }));
        assert_eq!(err.text(), Some(truncated));

        let err = NetworkConfiguration::from_json("not json at all").unwrap_err();
        assert!(matches!(err, SerdeErr::Malformed { .. }));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(&conf().to_json()).unwrap();
        value["overrides"]["7"] = serde_json::json!("classifier");
        let json = value.to_string();

        let err = NetworkConfiguration::from_json(&json).unwrap_err();
        let SerdeErr::Invalid { text, source } = err else {
            panic!("expected an invalid configuration error");
        };

        assert_eq!(text, json);
        assert_eq!(
            source,
            ConfErr::OverrideOutOfRange {
                index: 7,
                layers: 2
            }
        );
    }
}
