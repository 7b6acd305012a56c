use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::network::network::Network;

/// Interval that freshly built networks draw their weights and biases from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitRange {
    pub low: f64,
    pub high: f64,
}

impl Default for InitRange {
    fn default() -> Self {
        InitRange { low: 0.0, high: 1.0 }
    }
}

/// A serializable description of a network's shape.
///
/// Only the architecture is stored; trained parameters are never written
/// out.
///
/// ```json
/// { "name": "or", "layers": [2, 2, 1], "init": { "low": 0.0, "high": 1.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    /// Human-readable name, used in progress output.
    pub name: String,
    /// Neuron counts per layer, input first.
    pub layers: Vec<usize>,
    #[serde(default)]
    pub init: InitRange,
}

impl Architecture {
    pub fn new(name: impl Into<String>, layers: Vec<usize>) -> Architecture {
        Architecture { name: name.into(), layers, init: InitRange::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.layers.len() < 2 {
            return Err(NnError::InvalidArchitecture(format!(
                "`{}` needs at least two layers",
                self.name
            )));
        }
        if self.layers.contains(&0) {
            return Err(NnError::InvalidArchitecture(format!(
                "`{}` has an empty layer",
                self.name
            )));
        }
        let InitRange { low, high } = self.init;
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(NnError::Config(format!(
                "init range [{low}, {high}) is not a finite interval"
            )));
        }
        Ok(())
    }

    /// Allocates the network and randomizes it over `init`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;
        let mut network = Network::new(&self.layers)?;
        network.randomize(self.init.low, self.init.high, rng);
        Ok(network)
    }

    /// Serializes the architecture to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates an architecture written by `save_json`.
    pub fn load_json(path: &str) -> Result<Architecture> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let arch: Architecture = serde_json::from_reader(reader)?;
        arch.validate()?;
        Ok(arch)
    }
}
