use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::{ReLU, Sigmoid};
use crate::error::{Error, Result};
use crate::layers::dense::Dense;
use crate::layers::init::Init;
use crate::loss::loss_type::LossType;
use crate::math::Element;
use crate::network::network::Network;

/// Describes one layer in a network specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    /// Fully connected `inputs → outputs` layer.
    Dense {
        inputs: usize,
        outputs: usize,
        #[serde(default = "default_weight_init")]
        weight_init: Init,
        #[serde(default = "default_bias_init")]
        bias_init: Init,
    },
    Relu,
    Sigmoid,
}

fn default_weight_init() -> Init {
    Init::Constant { value: 0.1 }
}

fn default_bias_init() -> Init {
    Init::Constant { value: 0.0 }
}

impl LayerSpec {
    /// Dense layer with the default constant initialization.
    pub fn dense(inputs: usize, outputs: usize) -> LayerSpec {
        LayerSpec::Dense {
            inputs,
            outputs,
            weight_init: default_weight_init(),
            bias_init: default_bias_init(),
        }
    }
}

/// A fully serializable description of a network architecture plus the
/// loss it is meant to be trained with.
///
/// Saved weights carry no shape information, so the spec is what lets a
/// weights file be loaded back into a matching network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub loss: LossType,
}

impl NetworkSpec {
    /// Checks that every Dense layer has non-zero widths and usable
    /// initializers, and that consecutive Dense layers agree on their
    /// feature counts.
    pub fn validate(&self) -> Result<()> {
        let mut width: Option<usize> = None;
        for (i, layer) in self.layers.iter().enumerate() {
            let LayerSpec::Dense { inputs, outputs, weight_init, bias_init } = layer else {
                continue;
            };
            if *inputs == 0 || *outputs == 0 {
                return Err(Error::InvalidConfig(format!(
                    "layer {i}: dense widths must be non-zero, got {inputs} -> {outputs}"
                )));
            }
            if let Some(prev) = width {
                if prev != *inputs {
                    return Err(Error::InvalidConfig(format!(
                        "layer {i} expects {inputs} inputs but the previous dense layer \
                         produces {prev}"
                    )));
                }
            }
            for init in [weight_init, bias_init] {
                init.validate().map_err(|e| match e {
                    Error::InvalidConfig(msg) => Error::InvalidConfig(format!("layer {i}: {msg}")),
                    other => other,
                })?;
            }
            width = Some(*outputs);
        }
        Ok(())
    }

    /// Instantiates the described network, drawing initial values from `rng`.
    pub fn build<T: Element, R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network<T>> {
        self.validate()?;
        let mut network = Network::new();
        for layer in &self.layers {
            match layer {
                LayerSpec::Dense { inputs, outputs, weight_init, bias_init } => {
                    let dense =
                        Dense::initialized(*inputs, *outputs, weight_init, bias_init, rng)?;
                    network.add_layer(Box::new(dense));
                }
                LayerSpec::Relu => network.add_layer(Box::new(ReLU::new())),
                LayerSpec::Sigmoid => network.add_layer(Box::new(Sigmoid::new())),
            }
        }
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
