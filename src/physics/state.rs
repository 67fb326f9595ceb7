//! Scalar field at one instant
//!
//! `FieldState` is the unit every scheme consumes and produces: Nx real values
//! on the periodic grid. Explicit schemes build a new state from one or two
//! predecessors, implicit schemes from the solution of a linear system.

use crate::physics::grid::periodic_neighbors;
use nalgebra::DVector;
use std::fmt;
use std::ops::Index;

/// Field values u_i at one time level
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::FieldState;
///
/// let state = FieldState::from_vec(vec![0.0, 1.0, 2.0]);
/// assert_eq!(state.len(), 3);
/// assert_eq!(state.right(2), 0.0); // periodic wrap
/// assert_eq!(state.left(0), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    values: DVector<f64>,
}

impl FieldState {
    /// Wrap an existing vector
    pub fn new(values: DVector<f64>) -> Self {
        Self { values }
    }

    /// Build from a plain `Vec`
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self::new(DVector::from_vec(values))
    }

    /// Uniform field
    pub fn uniform(points: usize, value: f64) -> Self {
        Self::new(DVector::from_element(points, value))
    }

    /// Build a field from a per-index update rule
    ///
    /// This is how every stencil is written: the closure receives the index and
    /// returns the new value at that index.
    pub fn from_fn<F>(points: usize, mut f: F) -> Self
    where
        F: FnMut(usize) -> f64,
    {
        Self::new(DVector::from_fn(points, |i, _| f(i)))
    }

    /// Number of grid points
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the state holds no point
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Underlying vector
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// Values as a slice
    pub fn as_slice(&self) -> &[f64] {
        self.values.as_slice()
    }

    /// Consume into the underlying vector
    pub fn into_inner(self) -> DVector<f64> {
        self.values
    }

    /// u_{i-1} with periodic wrap
    #[inline]
    pub fn left(&self, i: usize) -> f64 {
        self.values[periodic_neighbors(i, self.len()).0]
    }

    /// u_{i+1} with periodic wrap
    #[inline]
    pub fn right(&self, i: usize) -> f64 {
        self.values[periodic_neighbors(i, self.len()).1]
    }

    /// Plain sum of the values
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// max_i |u_i|
    pub fn max_abs(&self) -> f64 {
        self.values.iter().fold(0.0_f64, |acc, u| acc.max(u.abs()))
    }

    /// Index of the first NaN or infinite value, if any
    pub fn first_non_finite(&self) -> Option<usize> {
        self.values.iter().position(|u| !u.is_finite())
    }

    /// True when every value is finite
    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }
}

impl Index<usize> for FieldState {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl From<Vec<f64>> for FieldState {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

impl From<DVector<f64>> for FieldState {
    fn from(values: DVector<f64>) -> Self {
        Self::new(values)
    }
}

// Arithmetic used by tests and by consumers building differences between schemes

impl std::ops::Sub for &FieldState {
    type Output = FieldState;

    fn sub(self, rhs: Self) -> Self::Output {
        assert_eq!(self.len(), rhs.len(), "Field lengths must match");
        FieldState::new(&self.values - &rhs.values)
    }
}

impl std::ops::Mul<f64> for FieldState {
    type Output = Self;

    fn mul(mut self, scalar: f64) -> Self::Output {
        self.values *= scalar;
        self
    }
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldState [{}]", self.len())
    }
}
