//! Phase unwrapping of sampled complex fields.
use nalgebra::{DMatrix, DVector};
use std::f64::consts::{PI, TAU};

/// Offset that moves `step` into `[-π, π)`, or 0 if the jump is no phase wrap.
fn wrap_correction(step: f64) -> f64 {
    let mut wrapped = (step + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI && step > 0.0 {
        wrapped = PI;
    }
    if step.abs() < PI {
        0.0
    } else {
        wrapped - step
    }
}

/// Unwrap a sequence of phases by adding multiples of 2π whenever two consecutive samples jump by more than π.
///
/// The first sample is kept as reference.
#[must_use]
pub fn unwrap(phase: &DVector<f64>) -> DVector<f64> {
    let mut unwrapped = phase.clone();
    let mut offset = 0.0;
    for i in 1..phase.len() {
        offset += wrap_correction(phase[i] - phase[i - 1]);
        unwrapped[i] = phase[i] + offset;
    }
    unwrapped
}

/// Path-following unwrap of a phase map.
///
/// The first column (varying x, rows) is unwrapped first. Every row is then unwrapped along y starting
/// from its already unwrapped first sample.
#[must_use]
pub fn unwrap_2d(phase: &DMatrix<f64>) -> DMatrix<f64> {
    let mut unwrapped = phase.clone();
    if phase.is_empty() {
        return unwrapped;
    }
    let first_column = unwrap(&phase.column(0).into_owned());
    for (row, start) in first_column.iter().enumerate() {
        unwrapped[(row, 0)] = *start;
        let mut offset = start - phase[(row, 0)];
        for col in 1..phase.ncols() {
            offset += wrap_correction(phase[(row, col)] - phase[(row, col - 1)]);
            unwrapped[(row, col)] = phase[(row, col)] + offset;
        }
    }
    unwrapped
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    #[test]
    fn unwrap_ramp() {
        let ramp = DVector::from_fn(50, |i, _| 0.5 * i as f64);
        let wrapped = ramp.map(|p| p.sin().atan2(p.cos()));
        let unwrapped = unwrap(&wrapped);
        for (u, r) in unwrapped.iter().zip(ramp.iter()) {
            assert_abs_diff_eq!(u, r, epsilon = 1e-12);
        }
    }
    #[test]
    fn unwrap_negative_ramp() {
        let ramp = DVector::from_fn(40, |i, _| 1.0 - 0.9 * i as f64);
        let wrapped = ramp.map(|p| p.sin().atan2(p.cos()));
        let unwrapped = unwrap(&wrapped);
        for (u, r) in unwrapped.iter().zip(ramp.iter()) {
            assert_abs_diff_eq!(u, r, epsilon = 1e-12);
        }
    }
    #[test]
    fn unwrap_no_jumps() {
        let phase = DVector::from_vec(vec![0.1, 0.5, -0.3, 1.0]);
        assert_eq!(unwrap(&phase), phase);
        assert!(unwrap(&DVector::<f64>::zeros(0)).is_empty());
    }
    #[test]
    fn unwrap_paraboloid() {
        let paraboloid = DMatrix::from_fn(30, 20, |i, j| {
            0.05 * ((i as f64 - 15.0).powi(2) + (j as f64 - 10.0).powi(2))
        });
        let wrapped = paraboloid.map(|p| p.sin().atan2(p.cos()));
        let unwrapped = unwrap_2d(&wrapped);
        let offset = unwrapped[(0, 0)] - paraboloid[(0, 0)];
        for (u, p) in unwrapped.iter().zip(paraboloid.iter()) {
            assert_abs_diff_eq!(u - offset, p, epsilon = 1e-9);
        }
    }
}
