use crate::error::Result;
use crate::network::network::Network;

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one descent step using the gradients of the last backprop.
    pub fn step(&self, network: &mut Network) -> Result<()> {
        log::trace!("sgd step, learning rate {}", self.learning_rate);
        let deltas = network.gradients().scaled(-self.learning_rate);
        network.apply(&deltas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Parameters, Topology};

    #[test]
    fn step_reduces_cost() {
        let t = Topology::new(2, 3, 1).unwrap();
        let mut params = Parameters::zeros(&t);
        params.w_hid.data = vec![vec![0.3, -0.2], vec![0.1, 0.4], vec![-0.5, 0.2]];
        params.w_out.data = vec![vec![0.2, -0.3, 0.6]];
        let mut net = Network::with_parameters(t, params).unwrap();

        net.feedforward(&[1.0, 0.5]).unwrap();
        let before = net.cost(&[1.0]).unwrap();
        net.backpropagate(&[1.0]).unwrap();
        Sgd::new(0.5).step(&mut net).unwrap();

        net.feedforward(&[1.0, 0.5]).unwrap();
        assert!(net.cost(&[1.0]).unwrap() < before);
    }
}
