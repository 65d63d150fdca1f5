/// Half squared error, the cost `Network::backpropagate` differentiates.
pub struct SquaredError;

impl SquaredError {
    /// Scalar loss: ½ Σ (predicted - expected)²
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| 0.5 * (a - b).powi(2))
            .sum()
    }

    /// ∂loss/∂predicted, the output error backprop starts from.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected).map(|(p, e)| p - e).collect()
    }
}
