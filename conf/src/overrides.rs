use serde::{Deserialize, Serialize};

use crate::{Activation, Distribution, LayerKind, LayerSpec, LossFunction, WeightInit};

/// A partial `LayerSpec`, every field that is set replaces the one of the patched layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LayerKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_in: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_out: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_init: Option<WeightInit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Distribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<LossFunction>,
}

impl LayerPatch {
    /// Merges this patch onto `spec` field by field.
    pub fn apply(&self, spec: &mut LayerSpec) {
        if let Some(kind) = self.kind {
            spec.kind = kind;
        }
        if let Some(n_in) = self.n_in {
            spec.n_in = n_in;
        }
        if let Some(n_out) = self.n_out {
            spec.n_out = n_out;
        }
        if let Some(weight_init) = self.weight_init {
            spec.weight_init = Some(weight_init);
        }
        if let Some(dist) = self.dist {
            spec.dist = Some(dist);
        }
        if let Some(activation) = self.activation {
            spec.activation = Some(activation);
        }
        if let Some(loss) = self.loss {
            spec.loss = Some(loss);
        }
    }
}

/// An index-scoped change applied to a generated layer during the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideSpec {
    /// Turns the layer into a softmax classifier trained with cross entropy.
    Classifier,
    Patch(LayerPatch),
}

impl OverrideSpec {
    /// Resolves this override into the patch it stands for.
    pub fn patch(&self) -> LayerPatch {
        match self {
            OverrideSpec::Classifier => LayerPatch {
                kind: Some(LayerKind::Output),
                activation: Some(Activation::Softmax),
                loss: Some(LossFunction::Mcxent),
                ..Default::default()
            },
            OverrideSpec::Patch(patch) => patch.clone(),
        }
    }

    pub fn apply(&self, spec: &mut LayerSpec) {
        self.patch().apply(spec);
    }
}

/// A pre-processing stage attached in front of a layer, it never alters the layer's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreProcessorSpec {
    ConvolutionPost,
    Reshape { shape: Vec<usize> },
    BinomialSampling,
    ZeroMean,
    UnitVariance,
}
