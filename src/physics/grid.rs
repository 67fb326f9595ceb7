//! Uniform periodic 1D mesh
//!
//! The domain `[0, L)` is split into `Nx` cells of width `dx = L/Nx`. Point `Nx`
//! is identified with point `0`, so every stencil reads its neighbours through
//! [`Grid::wrap`] and no boundary special case exists anywhere in the solver.

use crate::error::{AdvectionError, Result};
use nalgebra::DVector;

/// Smallest grid a centred three-point stencil can live on
pub const MIN_POINTS: usize = 3;

/// Periodic uniform grid
///
/// Created once per run and read-only afterwards.
///
/// # Example
///
/// ```rust
/// use advect_rs::physics::build_grid;
///
/// let grid = build_grid(1.0, 4).unwrap();
/// assert_eq!(grid.len(), 4);
/// assert_eq!(grid.dx(), 0.25);
/// assert_eq!(grid.coordinates().as_slice(), &[0.0, 0.25, 0.5, 0.75]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    length: f64,
    dx: f64,
    coordinates: DVector<f64>,
}

impl Grid {
    /// Domain length L
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Cell width dx = L / Nx
    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Number of points Nx
    #[inline]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Always false for a validated grid
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Coordinates x_i = i·dx
    pub fn coordinates(&self) -> &DVector<f64> {
        &self.coordinates
    }

    /// Coordinate of point `i`
    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        self.coordinates[i]
    }

    /// Map any signed index onto `[0, Nx)`
    #[inline]
    pub fn wrap(&self, index: isize) -> usize {
        index.rem_euclid(self.len() as isize) as usize
    }

    /// Fold a position onto the periodic domain `[0, L)`
    #[inline]
    pub fn fold(&self, x: f64) -> f64 {
        x.rem_euclid(self.length)
    }
}

/// Build `nx` equally spaced points in `[0, length)`
///
/// # Errors
///
/// [`AdvectionError::InvalidConfig`] if `length` is not a positive finite number
/// or `nx < 3`.
pub fn build_grid(length: f64, nx: usize) -> Result<Grid> {
    if !length.is_finite() || length <= 0.0 {
        return Err(AdvectionError::invalid(
            "L",
            format!("must be positive and finite, got {}", length),
        ));
    }

    if nx < MIN_POINTS {
        return Err(AdvectionError::invalid(
            "Nx",
            format!("must be at least {}, got {}", MIN_POINTS, nx),
        ));
    }

    let dx = length / nx as f64;

    // x_i from the index, not by accumulating dx
    let coordinates = DVector::from_fn(nx, |i, _| i as f64 * dx);

    Ok(Grid {
        length,
        dx,
        coordinates,
    })
}

/// Indices of the left and right neighbours of `i` on a periodic grid of `n` points
#[inline]
pub fn periodic_neighbors(i: usize, n: usize) -> (usize, usize) {
    let left = if i == 0 { n - 1 } else { i - 1 };
    let right = if i + 1 == n { 0 } else { i + 1 };
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_spacing() {
        let grid = build_grid(2.0, 100).unwrap();
        assert_eq!(grid.len(), 100);
        assert_relative_eq!(grid.dx(), 0.02, epsilon = 1e-15);
        assert_eq!(grid.x(0), 0.0);
        assert_relative_eq!(grid.x(99), 1.98, epsilon = 1e-12);
    }

    #[test]
    fn test_last_point_excludes_length() {
        let grid = build_grid(1.0, 10).unwrap();
        assert!(grid.x(grid.len() - 1) < grid.length());
    }

    #[test]
    fn test_rejects_short_grid() {
        let error = build_grid(1.0, 2).unwrap_err();
        assert!(matches!(error, AdvectionError::InvalidConfig { parameter: "Nx", .. }));
    }

    #[test]
    fn test_rejects_non_positive_length() {
        assert!(build_grid(0.0, 10).is_err());
        assert!(build_grid(-1.0, 10).is_err());
        assert!(build_grid(f64::NAN, 10).is_err());
    }

    #[test]
    fn test_wrap_and_neighbors() {
        let grid = build_grid(1.0, 5).unwrap();
        assert_eq!(grid.wrap(-1), 4);
        assert_eq!(grid.wrap(5), 0);
        assert_eq!(grid.wrap(7), 2);

        assert_eq!(periodic_neighbors(0, 5), (4, 1));
        assert_eq!(periodic_neighbors(4, 5), (3, 0));
        assert_eq!(periodic_neighbors(2, 5), (1, 3));
    }

    #[test]
    fn test_fold() {
        let grid = build_grid(2.0, 10).unwrap();
        assert_relative_eq!(grid.fold(-0.5), 1.5, epsilon = 1e-15);
        assert_relative_eq!(grid.fold(4.25), 0.25, epsilon = 1e-15);
    }
}
