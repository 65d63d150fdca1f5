use serde::{Serialize, Deserialize};

use crate::codec::transcription::TranscriptionLayout;
use crate::error::{EvoError, Result};

/// Layer sizes of a single-hidden-layer perceptron.
///
/// Fields:
/// - `inputs`  — number of input neurons
/// - `hidden`  — number of hidden neurons
/// - `outputs` — number of output neurons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl Topology {
    pub fn new(inputs: usize, hidden: usize, outputs: usize) -> Result<Topology> {
        let topology = Topology { inputs, hidden, outputs };
        topology.validate()?;
        Ok(topology)
    }

    /// Every layer needs at least one neuron.
    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 || self.hidden == 0 || self.outputs == 0 {
            return Err(EvoError::InvalidArgument(format!(
                "every layer needs at least one neuron, got {}-{}-{}",
                self.inputs, self.hidden, self.outputs
            )));
        }
        Ok(())
    }

    /// Shape of the input-to-hidden weight matrix `[hidden, input]`.
    pub fn w_hid_shape(&self) -> (usize, usize) {
        (self.hidden, self.inputs)
    }

    /// Shape of the hidden-to-output weight matrix `[output, hidden]`.
    pub fn w_out_shape(&self) -> (usize, usize) {
        (self.outputs, self.hidden)
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.hidden + self.outputs + self.hidden * self.inputs + self.outputs * self.hidden
    }

    /// Genome length, in bits, needed to transcribe this topology.
    pub fn required_bits(&self, layout: TranscriptionLayout) -> usize {
        layout.required_bits(self)
    }
}
