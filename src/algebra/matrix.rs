//! Dense row-major real matrix.

use std::fmt;
use std::ops::{Index, IndexMut};

use super::vector::{dot, norm_inf, Vector};
use crate::error::{Result, SolverError};

/// Rectangular array of real numbers stored row-major.
///
/// All arithmetic returns a new matrix; operands are never modified.
/// Multiplication is split into [`Matrix::mul_mat`] and [`Matrix::mul_vec`] so
/// the caller always states the shape of the right-hand operand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a `rows x cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::constant(rows, cols, 0.0)
    }

    /// Create a matrix with every element set to `value`.
    pub fn constant(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Square matrix with `value` on the principal diagonal.
    pub fn diagonal(size: usize, value: f64) -> Self {
        let mut m = Self::zeros(size, size);
        for i in 0..size {
            m[(i, i)] = value;
        }
        m
    }

    /// Square matrix with `value` on the secondary (anti-)diagonal.
    pub fn anti_diagonal(size: usize, value: f64) -> Self {
        let mut m = Self::zeros(size, size);
        for i in 0..size {
            m[(i, size - 1 - i)] = value;
        }
        m
    }

    pub fn identity(size: usize) -> Self {
        Self::diagonal(size, 1.0)
    }

    /// Build a matrix from a list of rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(SolverError::RaggedMatrix {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build a matrix from row-major data.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(SolverError::dimension_mismatch(
                "matrix construction",
                rows * cols,
                values.len(),
            ));
        }
        Ok(Self {
            rows,
            cols,
            data: values.to_vec(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Get element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Set element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Accumulate into element at (row, col).
    pub fn add_at(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] += value;
    }

    /// Largest absolute element.
    pub fn max_abs(&self) -> f64 {
        norm_inf(&self.data)
    }

    /// Borrow a row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Copy a column into a new vector.
    pub fn column(&self, col: usize) -> Vector {
        (0..self.rows).map(|i| self.get(i, col)).collect()
    }

    /// Principal diagonal of a matrix.
    pub fn diag(&self) -> Vector {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).collect()
    }

    /// Exchange two rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    /// Copy of the matrix with row `row` and column `col` removed.
    pub fn minor(&self, row: usize, col: usize) -> Matrix {
        let mut data = Vec::with_capacity(self.rows.saturating_sub(1) * self.cols.saturating_sub(1));
        for i in (0..self.rows).filter(|&i| i != row) {
            for j in (0..self.cols).filter(|&j| j != col) {
                data.push(self.get(i, j));
            }
        }
        Matrix {
            rows: self.rows.saturating_sub(1),
            cols: self.cols.saturating_sub(1),
            data,
        }
    }

    pub fn transpose(&self) -> Matrix {
        let mut t = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t[(j, i)] = self.get(i, j);
            }
        }
        t
    }

    fn check_same_shape(&self, other: &Matrix, operation: &'static str) -> Result<()> {
        if self.rows != other.rows {
            return Err(SolverError::dimension_mismatch(operation, self.rows, other.rows));
        }
        if self.cols != other.cols {
            return Err(SolverError::dimension_mismatch(operation, self.cols, other.cols));
        }
        Ok(())
    }

    /// Element-wise sum `self + other`.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix add")?;
        Ok(self.zip_map(other, |a, b| a + b))
    }

    /// Element-wise difference `self - other`.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix subtract")?;
        Ok(self.zip_map(other, |a, b| a - b))
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|a| a * factor).collect(),
        }
    }

    /// Matrix-by-matrix product using the plain triple loop.
    pub fn mul_mat(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(SolverError::dimension_mismatch(
                "matrix-matrix multiply",
                self.cols,
                other.rows,
            ));
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.get(i, k) * other.get(k, j);
                }
                out[(i, j)] = sum;
            }
        }
        Ok(out)
    }

    /// Matrix-by-vector product.
    pub fn mul_vec(&self, v: &Vector) -> Result<Vector> {
        if self.cols != v.len() {
            return Err(SolverError::dimension_mismatch(
                "matrix-vector multiply",
                self.cols,
                v.len(),
            ));
        }
        Ok((0..self.rows).map(|i| dot(self.row(i), v.as_slice())).collect())
    }

    fn zip_map(&self, other: &Matrix, op: impl Fn(f64, f64) -> f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| op(a, b))
                .collect(),
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            write!(f, "[")?;
            for value in self.row(i) {
                write!(f, " {:.2}", value)?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}
