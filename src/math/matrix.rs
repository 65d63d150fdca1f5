use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::sigmoid::Sigmoid;
use crate::error::{EvoError, Result};

/// Dense row-major matrix tagged with its extents.
///
/// Vectors are single-column matrices (`rows × 1`). Every binary operation
/// checks shapes and fails with `EvoError::DimensionMismatch` instead of
/// indexing past the end of a row. Deserialization checks the declared
/// extents against `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = EvoError;

    fn try_from(raw: RawMatrix) -> Result<Matrix> {
        let declared = (raw.rows, raw.cols);
        let mut m = Matrix::from_rows(raw.data)?;
        if m.rows == 0 {
            // no row to read a width from
            m.cols = raw.cols;
        }
        if m.shape() != declared {
            return Err(EvoError::DimensionMismatch {
                op: "deserialize",
                left: declared,
                right: m.shape(),
            });
        }
        Ok(m)
    }
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Column vector holding `values`.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Builds a matrix from rows, rejecting ragged input.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(EvoError::DimensionMismatch {
                op: "from_rows",
                left: (rows, cols),
                right: (1, bad.len()),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Fills a matrix with integers drawn uniformly from `[lo, hi]`, each
    /// divided by `scale`.
    pub fn uniform_grid<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        lo: i32,
        hi: i32,
        scale: f64,
        rng: &mut R,
    ) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = f64::from(rng.gen_range(lo..=hi)) / scale;
            }
        }

        res
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        if row >= self.rows || col >= self.cols {
            return Err(EvoError::OutOfRange { index: (row, col), len: self.shape() });
        }
        Ok(self.data[row][col])
    }

    /// First column as a flat vector (the values of a column vector).
    pub fn column_values(&self) -> Vec<f64> {
        self.data.iter().filter_map(|row| row.first().copied()).collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Elementwise sigmoid derivative evaluated at pre-activations `self`.
    pub fn deriv_sigma(&self, sigmoid: &Sigmoid) -> Matrix {
        self.map(|z| sigmoid.derivative(z))
    }

    /// Matrix product `self · rhs`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("multiply", rhs));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    pub fn subtract(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("subtract", rhs, |a, b| a - b)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    /// Checks that `self` and `rhs` have the same shape.
    pub fn ensure_same_shape(&self, op: &'static str, rhs: &Matrix) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch(op, rhs));
        }
        Ok(())
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.ensure_same_shape(op, rhs)?;
        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(&x, &y)| f(x, y)).collect()
            })
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> EvoError {
        EvoError::DimensionMismatch { op, left: self.shape(), right: rhs.shape() }
    }
}
