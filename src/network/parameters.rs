use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::topology::Topology;

/// Random initial values are integers in `[-INIT_GRID, INIT_GRID]` divided by
/// `INIT_SCALE`, i.e. `[-2.5, 2.5]` at 0.001 resolution.
pub const INIT_GRID: i32 = 2500;
pub const INIT_SCALE: f64 = 1000.0;

/// Weights and biases of a network. Biases are column vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// `[hidden, 1]`
    pub b_hid: Matrix,
    /// `[output, 1]`
    pub b_out: Matrix,
    /// `[hidden, input]`
    pub w_hid: Matrix,
    /// `[output, hidden]`
    pub w_out: Matrix,
}

impl Parameters {
    pub fn zeros(topology: &Topology) -> Parameters {
        let (wh_rows, wh_cols) = topology.w_hid_shape();
        let (wo_rows, wo_cols) = topology.w_out_shape();
        Parameters {
            b_hid: Matrix::zeros(topology.hidden, 1),
            b_out: Matrix::zeros(topology.outputs, 1),
            w_hid: Matrix::zeros(wh_rows, wh_cols),
            w_out: Matrix::zeros(wo_rows, wo_cols),
        }
    }

    /// Every weight and bias drawn uniformly from the `[-2.5, 2.5]` grid.
    pub fn random<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> Parameters {
        let (wh_rows, wh_cols) = topology.w_hid_shape();
        let (wo_rows, wo_cols) = topology.w_out_shape();
        let mut draw = |rows, cols| {
            Matrix::uniform_grid(rows, cols, -INIT_GRID, INIT_GRID, INIT_SCALE, rng)
        };
        Parameters {
            w_hid: draw(wh_rows, wh_cols),
            w_out: draw(wo_rows, wo_cols),
            b_hid: draw(topology.hidden, 1),
            b_out: draw(topology.outputs, 1),
        }
    }

    /// Fails with `DimensionMismatch` unless every block has the shape
    /// `topology` dictates.
    pub fn check_shapes(&self, topology: &Topology) -> Result<()> {
        let expected = Parameters::zeros(topology);
        self.b_hid.ensure_same_shape("bias_hidden", &expected.b_hid)?;
        self.b_out.ensure_same_shape("bias_output", &expected.b_out)?;
        self.w_hid.ensure_same_shape("weights_hidden", &expected.w_hid)?;
        self.w_out.ensure_same_shape("weights_output", &expected.w_out)?;
        Ok(())
    }
}

/// Derivatives of the cost with respect to each parameter block, as written
/// by `Network::backpropagate`. Same shapes as `Parameters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradients {
    pub db_out: Matrix,
    pub db_hid: Matrix,
    pub dw_out: Matrix,
    pub dw_hid: Matrix,
}

impl Gradients {
    pub fn zeros(topology: &Topology) -> Gradients {
        let p = Parameters::zeros(topology);
        Gradients { db_out: p.b_out, db_hid: p.b_hid, dw_out: p.w_out, dw_hid: p.w_hid }
    }

    /// Every block multiplied by `factor`; pass `-learning_rate` for descent.
    pub fn scaled(&self, factor: f64) -> Gradients {
        Gradients {
            db_out: self.db_out.scale(factor),
            db_hid: self.db_hid.scale(factor),
            dw_out: self.dw_out.scale(factor),
            dw_hid: self.dw_hid.scale(factor),
        }
    }
}
