//! Dense real vector.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{Result, SolverError};

/// An ordered sequence of real numbers.
///
/// Arithmetic never mutates its operands; every operation returns a new vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self::constant(len, 0.0)
    }

    /// Create a vector with every element set to `value`.
    pub fn constant(len: usize, value: f64) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    /// Copy a slice into a new vector.
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            data: values.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    fn check_len(&self, other: &Vector, operation: &'static str) -> Result<()> {
        if self.len() != other.len() {
            return Err(SolverError::dimension_mismatch(
                operation,
                self.len(),
                other.len(),
            ));
        }
        Ok(())
    }

    /// Element-wise sum `self + other`.
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other, "vector add")?;
        Ok(self.zip_map(other, |a, b| a + b))
    }

    /// Element-wise difference `self - other`.
    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other, "vector subtract")?;
        Ok(self.zip_map(other, |a, b| a - b))
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: f64) -> Vector {
        self.data.iter().map(|a| a * factor).collect()
    }

    /// Inner product.
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_len(other, "dot product")?;
        Ok(dot(&self.data, &other.data))
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        dot(&self.data, &self.data).sqrt()
    }

    /// Largest absolute element (0 for an empty vector, NaN if any element is NaN).
    pub fn norm_inf(&self) -> f64 {
        norm_inf(&self.data)
    }

    /// Scale to unit Euclidean norm.
    pub fn normalize(&self) -> Result<Vector> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(SolverError::ZeroVector);
        }
        Ok(self.scale(1.0 / norm))
    }

    fn zip_map(&self, other: &Vector, op: impl Fn(f64, f64) -> f64) -> Vector {
        self.data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| op(a, b))
            .collect()
    }
}

/// Inner product of two equally sized slices.
///
/// Extra elements of the longer slice are ignored; callers check lengths.
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Largest absolute element of a slice.
///
/// NaN propagates: `f64::max` would silently drop it.
pub(crate) fn norm_inf(values: &[f64]) -> f64 {
    values.iter().fold(0.0f64, |acc, v| {
        let a = v.abs();
        if a > acc || a.is_nan() {
            a
        } else {
            acc
        }
    })
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl From<&[f64]> for Vector {
    fn from(values: &[f64]) -> Self {
        Self::from_slice(values)
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:.2}", value)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_add_and_sub() {
        let a = Vector::from(vec![1.0, 2.0, 3.0]);
        let b = Vector::from(vec![0.5, -1.0, 4.0]);
        assert_eq!(a.add(&b).unwrap().as_slice(), &[1.5, 1.0, 7.0]);
        assert_eq!(a.sub(&b).unwrap().as_slice(), &[0.5, 3.0, -1.0]);
        // Operands untouched
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let a = Vector::zeros(3);
        let b = Vector::zeros(2);
        assert!(matches!(
            a.add(&b),
            Err(SolverError::DimensionMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));
        assert!(a.dot(&b).is_err());
    }

    #[test]
    fn test_norms() {
        let v = Vector::from(vec![3.0, -4.0]);
        assert_abs_diff_eq!(v.norm(), 5.0);
        assert_abs_diff_eq!(v.norm_inf(), 4.0);
        assert_abs_diff_eq!(v.dot(&v).unwrap(), 25.0);
        assert_abs_diff_eq!(Vector::zeros(0).norm_inf(), 0.0);
    }

    #[test]
    fn test_norm_inf_propagates_nan() {
        assert!(Vector::from(vec![1.0, f64::NAN, 2.0]).norm_inf().is_nan());
        assert!(Vector::from(vec![f64::NAN, 5.0]).norm_inf().is_nan());
        assert_eq!(
            Vector::from(vec![1.0, f64::NEG_INFINITY]).norm_inf(),
            f64::INFINITY
        );
    }

    #[test]
    fn test_normalize() {
        let v = Vector::from(vec![0.0, 2.0, 0.0]);
        assert_eq!(v.normalize().unwrap().as_slice(), &[0.0, 1.0, 0.0]);
        assert!(matches!(
            Vector::zeros(4).normalize(),
            Err(SolverError::ZeroVector)
        ));
    }

    #[test]
    fn test_scale_and_constant() {
        let v = Vector::constant(3, 2.0).scale(-0.5);
        assert_eq!(v.as_slice(), &[-1.0, -1.0, -1.0]);
    }
}
