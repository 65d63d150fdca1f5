use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::activation::sigmoid::Sigmoid;
use crate::codec::transcription::{transcribe, TranscriptionLayout};
use crate::error::{EvoError, Result};
use crate::genetics::genome::Genome;
use crate::loss::squared_error::SquaredError;
use crate::math::matrix::Matrix;
use crate::network::parameters::{Gradients, Parameters};
use crate::network::topology::Topology;

/// A fully connected input → hidden → output perceptron with sigmoid units.
///
/// All vectors are column matrices. `z_hid` and `z_out` hold the weighted
/// sums *before* the bias is added; the sigmoid is applied to `z + b`.
///
/// Deserialization rebuilds the network from its topology, sigmoid and
/// parameters through `with_parameters`; activations and gradients start
/// zeroed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NetworkState")]
pub struct Network {
    topology: Topology,
    sigmoid: Sigmoid,

    input: Matrix,
    hidden: Matrix,
    output: Matrix,
    z_hid: Matrix,
    z_out: Matrix,

    params: Parameters,
    grads: Gradients,

    // Set by feedforward, cleared by update.
    #[serde(skip)]
    cache_valid: bool,
}

#[derive(Deserialize)]
struct NetworkState {
    topology: Topology,
    sigmoid: Sigmoid,
    params: Parameters,
}

impl TryFrom<NetworkState> for Network {
    type Error = EvoError;

    fn try_from(state: NetworkState) -> Result<Network> {
        Ok(Network::with_parameters(state.topology, state.params)?.with_sigmoid(state.sigmoid))
    }
}

impl Network {
    /// Builds a network around explicit parameters, checking every shape.
    pub fn with_parameters(topology: Topology, params: Parameters) -> Result<Network> {
        topology.validate()?;
        params.check_shapes(&topology)?;
        Ok(Network {
            topology,
            sigmoid: Sigmoid::default(),
            input: Matrix::zeros(topology.inputs, 1),
            hidden: Matrix::zeros(topology.hidden, 1),
            output: Matrix::zeros(topology.outputs, 1),
            z_hid: Matrix::zeros(topology.hidden, 1),
            z_out: Matrix::zeros(topology.outputs, 1),
            params,
            grads: Gradients::zeros(&topology),
            cache_valid: false,
        })
    }

    /// Weights and biases drawn uniformly from `[-2.5, 2.5]` at 0.001 resolution.
    pub fn new_random<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Result<Network> {
        topology.validate()?;
        log::debug!(
            "random network {}-{}-{}",
            topology.inputs, topology.hidden, topology.outputs
        );
        Network::with_parameters(topology, Parameters::random(&topology, rng))
    }

    /// `new_random` driven by a freshly entropy-seeded generator.
    pub fn from_entropy(topology: Topology) -> Result<Network> {
        Network::new_random(topology, &mut StdRng::from_entropy())
    }

    /// Transcribes `genome` into weights and biases.
    pub fn from_genome(
        topology: Topology,
        genome: &Genome,
        layout: TranscriptionLayout,
    ) -> Result<Network> {
        let params = transcribe(genome, &topology, layout)?;
        log::debug!(
            "transcribed {}-bit genome into {}-{}-{} network ({:?} layout)",
            genome.len(), topology.inputs, topology.hidden, topology.outputs, layout
        );
        Network::with_parameters(topology, params)
    }

    /// Replaces the activation used for evaluation and gradients.
    pub fn with_sigmoid(mut self, sigmoid: Sigmoid) -> Network {
        self.sigmoid = sigmoid;
        self.cache_valid = false;
        self
    }

    /// Forward pass; stores the input, pre-activations and activations for
    /// backprop and returns the output activations.
    pub fn feedforward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        expect_len("input", input, self.topology.inputs)?;
        let input = Matrix::column(input);

        let z_hid = self.params.w_hid.multiply(&input)?;
        let hidden = z_hid.add(&self.params.b_hid)?.map(|x| self.sigmoid.function(x));

        let z_out = self.params.w_out.multiply(&hidden)?;
        let output = z_out.add(&self.params.b_out)?.map(|x| self.sigmoid.function(x));

        self.input = input;
        self.z_hid = z_hid;
        self.hidden = hidden;
        self.z_out = z_out;
        self.output = output;
        self.cache_valid = true;

        Ok(self.output.column_values())
    }

    /// Computes the gradients of `½ Σ (output - correct)²` for the most recent
    /// feedforward pass and stores them in `gradients()`.
    pub fn backpropagate(&mut self, correct: &[f64]) -> Result<()> {
        expect_len("target", correct, self.topology.outputs)?;
        if !self.cache_valid {
            return Err(EvoError::NoForwardPass);
        }
        let error = Matrix::column(&SquaredError::derivative(&self.output.column_values(), correct));

        let pre_out = self.z_out.add(&self.params.b_out)?;
        let pre_hid = self.z_hid.add(&self.params.b_hid)?;

        let delta_out = pre_out
            .deriv_sigma(&self.sigmoid)
            .hadamard(&error)?;
        let delta_hid = self.params.w_out
            .transpose()
            .multiply(&delta_out)?
            .hadamard(&pre_hid.deriv_sigma(&self.sigmoid))?;

        let dw_out = delta_out.multiply(&self.hidden.transpose())?;
        let dw_hid = delta_hid.multiply(&self.input.transpose())?;

        self.grads = Gradients { db_out: delta_out, db_hid: delta_hid, dw_out, dw_hid };
        Ok(())
    }

    /// Adds each delta elementwise into the matching parameter block.
    ///
    /// This is a plain addition: scale gradients by `-learning_rate` first to
    /// descend. Nothing is changed unless every shape matches.
    pub fn update(
        &mut self,
        delta_b_out: &Matrix,
        delta_b_hid: &Matrix,
        delta_w_out: &Matrix,
        delta_w_hid: &Matrix,
    ) -> Result<()> {
        let b_out = self.params.b_out.add(delta_b_out)?;
        let b_hid = self.params.b_hid.add(delta_b_hid)?;
        let w_out = self.params.w_out.add(delta_w_out)?;
        let w_hid = self.params.w_hid.add(delta_w_hid)?;

        self.params = Parameters { b_hid, b_out, w_hid, w_out };
        self.cache_valid = false;
        Ok(())
    }

    /// `update` with the four blocks of `deltas`.
    pub fn apply(&mut self, deltas: &Gradients) -> Result<()> {
        self.update(&deltas.db_out, &deltas.db_hid, &deltas.dw_out, &deltas.dw_hid)
    }

    /// `½ Σ (output - target)²` for the current output activations.
    pub fn cost(&self, target: &[f64]) -> Result<f64> {
        expect_len("target", target, self.topology.outputs)?;
        Ok(SquaredError::loss(&self.output.column_values(), target))
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn sigmoid(&self) -> Sigmoid {
        self.sigmoid
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn gradients(&self) -> &Gradients {
        &self.grads
    }

    pub fn input(&self) -> &Matrix {
        &self.input
    }

    pub fn hidden(&self) -> &Matrix {
        &self.hidden
    }

    pub fn output(&self) -> &Matrix {
        &self.output
    }

    pub fn z_hid(&self) -> &Matrix {
        &self.z_hid
    }

    pub fn z_out(&self) -> &Matrix {
        &self.z_out
    }
}

fn expect_len(what: &str, values: &[f64], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(EvoError::InvalidArgument(format!(
            "{what} has {} values, network expects {expected}",
            values.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_network(topology: Topology, value: f64) -> Network {
        let mut params = Parameters::zeros(&topology);
        for m in [&mut params.b_hid, &mut params.b_out, &mut params.w_hid, &mut params.w_out] {
            *m = m.map(|_| value);
        }
        Network::with_parameters(topology, params).unwrap()
    }

    #[test]
    fn regression_vector_for_constant_weights() {
        let mut net = constant_network(Topology::new(2, 2, 1).unwrap(), 0.1);
        let out = net.feedforward(&[1.0, 0.5]).unwrap();

        for &z in &net.z_hid().column_values() {
            assert!((z - 0.15).abs() < 1e-12);
        }
        let h = 1.0 / (1.0 + (-0.25f64).exp());
        for &a in &net.hidden().column_values() {
            assert!((a - h).abs() < 1e-12);
            assert!((a - 0.5622).abs() < 1e-4);
        }
        let z_out = net.z_out().get(0, 0).unwrap();
        assert!((z_out - 0.2 * h).abs() < 1e-12);
        assert!((z_out - 0.11244).abs() < 1e-5);
        assert!((out[0] - 0.5529).abs() < 1e-4);
        assert_eq!(net.input().column_values(), vec![1.0, 0.5]);
    }

    #[test]
    fn feedforward_is_deterministic() {
        let mut net = Network::new_random(
            Topology::new(3, 4, 2).unwrap(),
            &mut rand::rngs::StdRng::seed_from_u64(21),
        )
        .unwrap();
        let first = net.feedforward(&[0.3, -1.2, 0.8]).unwrap();
        for _ in 0..5 {
            assert_eq!(net.feedforward(&[0.3, -1.2, 0.8]).unwrap(), first);
        }
    }

    #[test]
    fn wrong_input_length_leaves_state_untouched() {
        let mut net = constant_network(Topology::new(2, 2, 1).unwrap(), 0.1);
        net.feedforward(&[1.0, 0.5]).unwrap();
        let before = net.output().clone();
        assert!(matches!(net.feedforward(&[1.0]), Err(EvoError::InvalidArgument(_))));
        assert_eq!(net.output(), &before);
    }

    #[test]
    fn backpropagate_requires_feedforward() {
        let mut net = constant_network(Topology::new(2, 2, 1).unwrap(), 0.1);
        assert_eq!(net.backpropagate(&[1.0]), Err(EvoError::NoForwardPass));

        net.feedforward(&[1.0, 0.5]).unwrap();
        assert!(net.backpropagate(&[1.0]).is_ok());

        let zero = Gradients::zeros(net.topology());
        net.apply(&zero).unwrap();
        assert_eq!(net.backpropagate(&[1.0]), Err(EvoError::NoForwardPass));
    }

    #[test]
    fn output_delta_is_loss_derivative_times_slope() {
        let mut net = constant_network(Topology::new(2, 2, 1).unwrap(), 0.1);
        let out = net.feedforward(&[1.0, 0.5]).unwrap();
        net.backpropagate(&[0.25]).unwrap();

        let pre = net.z_out().get(0, 0).unwrap() + 0.1;
        let expected = SquaredError::derivative(&out, &[0.25])[0] * Sigmoid::Exact.derivative(pre);
        assert!((net.gradients().db_out.get(0, 0).unwrap() - expected).abs() < 1e-15);
    }

    #[test]
    fn gradient_shapes_follow_topology() {
        let t = Topology::new(3, 5, 2).unwrap();
        let mut net = constant_network(t, 0.2);
        net.feedforward(&[1.0, 2.0, 3.0]).unwrap();
        net.backpropagate(&[0.0, 1.0]).unwrap();
        let g = net.gradients();
        assert_eq!(g.db_out.shape(), (2, 1));
        assert_eq!(g.db_hid.shape(), (5, 1));
        assert_eq!(g.dw_out.shape(), (2, 5));
        assert_eq!(g.dw_hid.shape(), (5, 3));
    }

    #[test]
    fn update_adds_to_single_bias_column() {
        let t = Topology::new(2, 2, 1).unwrap();
        let mut net = constant_network(t, 0.1);
        let mut deltas = Gradients::zeros(&t);
        deltas.db_out = Matrix::column(&[0.5]);
        deltas.db_hid = Matrix::column(&[-0.1, 0.2]);
        deltas.dw_hid.data[1][0] = 1.0;
        net.apply(&deltas).unwrap();

        let p = net.parameters();
        assert!((p.b_out.get(0, 0).unwrap() - 0.6).abs() < 1e-12);
        assert!(p.b_hid.get(0, 0).unwrap().abs() < 1e-12);
        assert!((p.b_hid.get(1, 0).unwrap() - 0.3).abs() < 1e-12);
        assert!((p.w_hid.get(1, 0).unwrap() - 1.1).abs() < 1e-12);
        assert!((p.w_hid.get(0, 0).unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn mismatched_update_changes_nothing() {
        let t = Topology::new(2, 2, 1).unwrap();
        let mut net = constant_network(t, 0.1);
        let before = net.parameters().clone();
        let mut deltas = Gradients::zeros(&t);
        deltas.dw_hid = Matrix::zeros(2, 3);
        deltas.db_out = Matrix::column(&[1.0]);
        assert!(matches!(net.apply(&deltas), Err(EvoError::DimensionMismatch { .. })));
        assert_eq!(net.parameters(), &before);
    }

    #[test]
    fn random_parameters_use_the_milli_grid() {
        let t = Topology::new(4, 6, 3).unwrap();
        let net = Network::new_random(t, &mut rand::rngs::StdRng::seed_from_u64(8)).unwrap();
        let p = net.parameters();
        for m in [&p.b_hid, &p.b_out, &p.w_hid, &p.w_out] {
            for v in m.data.iter().flatten() {
                assert!((-2.5..=2.5).contains(v));
            }
        }
    }

    #[test]
    fn cost_is_half_squared_error() {
        let mut net = constant_network(Topology::new(2, 2, 1).unwrap(), 0.1);
        let out = net.feedforward(&[1.0, 0.5]).unwrap();
        let c = net.cost(&[1.0]).unwrap();
        assert!((c - 0.5 * (out[0] - 1.0).powi(2)).abs() < 1e-15);
    }
}
