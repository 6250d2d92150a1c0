//! Normalized Hermite functions.
use crate::utils::usize_to_f64;
use std::f64::consts::PI;

/// Evaluate the normalized Hermite function `ψ_n(u) = H_n(u)·exp(-u²/2) / sqrt(2ⁿ·n!·√π)`.
///
/// The three-term recurrence on the normalized functions is used, which stays finite for large orders where
/// `2ⁿ·n!` would overflow.
#[must_use]
pub fn hermite_function(order: usize, u: f64) -> f64 {
    let mut previous = 0.0;
    let mut current = PI.powf(-0.25) * (-0.5 * u * u).exp();
    for k in 0..order {
        let k = usize_to_f64(k);
        let next = (2.0 / (k + 1.0)).sqrt() * u * current - (k / (k + 1.0)).sqrt() * previous;
        previous = current;
        current = next;
    }
    current
}
