use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Base used by `Sigmoid::TruncatedE`.
pub const TRUNCATED_E: f64 = 2.718281828;

/// The logistic activation used by both layers of a `Network`.
///
/// - `Exact`      — `1 / (1 + e^-x)` with the platform exponential.
/// - `TruncatedE` — same formula with `e` truncated to `2.718281828`, for
///                  output parity with networks evaluated that way.
///                  Differs from `Exact` by well under 1e-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sigmoid {
    #[default]
    Exact,
    TruncatedE,
}

impl Sigmoid {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Sigmoid::Exact => 1.0 / (1.0 + E.powf(-x)),
            Sigmoid::TruncatedE => 1.0 / (1.0 + TRUNCATED_E.powf(-x)),
        }
    }

    /// `σ'(x) = σ(x)(1 - σ(x))`, evaluated at the pre-activation `x`.
    ///
    /// For `TruncatedE` the chain rule adds a factor `ln(2.718281828)`, which
    /// keeps the derivative consistent with `function`.
    pub fn derivative(&self, x: f64) -> f64 {
        let fx = self.function(x);
        match self {
            Sigmoid::Exact => fx * (1.0 - fx),
            Sigmoid::TruncatedE => fx * (1.0 - fx) * TRUNCATED_E.ln(),
        }
    }
}
