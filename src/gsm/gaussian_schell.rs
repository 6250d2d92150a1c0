//! Coherent-mode decomposition of the Gaussian Schell-model.
//!
//! The cross-spectral density of a one-dimensional GSM source
//!
//! `W(x1, x2) = A·exp(-(x1² + x2²) / (4σs²))·exp(-(x1 - x2)² / (2σg²))`
//!
//! is decomposed into Hermite-Gaussian modes `φn` with eigenvalues `βn = A·sqrt(π/(a+b+c))·qⁿ` where
//! `a = 1/(4σs²)`, `b = 1/(2σg²)`, `c = sqrt(a² + 2ab)` and `q = b/(a+b+c)`.
use super::hermite::hermite_function;
use crate::{
    error::{XwResult, XwaveError},
    utils::{f64_to_usize, usize_to_f64},
};
use itertools::Itertools;
use nalgebra::DVector;
use std::f64::consts::PI;

/// Coherent-mode ladder of a one-dimensional Gaussian Schell-model source.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianSchellModel1D {
    amplitude: f64,
    sigma_s: f64,
    sigma_g: f64,
    a: f64,
    b: f64,
    c: f64,
}
impl GaussianSchellModel1D {
    /// Creates a new [`GaussianSchellModel1D`].
    ///
    /// # Attributes
    /// - `amplitude`: spectral density on axis (`A`)
    /// - `sigma_s`: rms source size in meter
    /// - `sigma_g`: rms transverse coherence length in meter
    ///
    /// # Errors
    ///
    /// This function returns an error if one of the sigmas is not strictly positive and finite or the amplitude is
    /// negative or not finite.
    pub fn new(amplitude: f64, sigma_s: f64, sigma_g: f64) -> XwResult<Self> {
        if !amplitude.is_finite() || amplitude.is_sign_negative() {
            return Err(XwaveError::validation(
                "amplitude",
                amplitude,
                "must be positive and finite",
            ));
        }
        for (field, value) in [("sigma_source", sigma_s), ("sigma_mode", sigma_g)] {
            if !value.is_normal() || value.is_sign_negative() {
                return Err(XwaveError::validation(
                    field,
                    format!("{value} m"),
                    "must be strictly positive and finite",
                ));
            }
        }
        let a = 1.0 / (4.0 * sigma_s * sigma_s);
        let b = 1.0 / (2.0 * sigma_g * sigma_g);
        let c = a.mul_add(a, 2.0 * a * b).sqrt();
        Ok(Self {
            amplitude,
            sigma_s,
            sigma_g,
            a,
            b,
            c,
        })
    }
    /// Returns the rms source size of this [`GaussianSchellModel1D`].
    #[must_use]
    pub const fn sigma_s(&self) -> f64 {
        self.sigma_s
    }
    /// Returns the rms coherence length of this [`GaussianSchellModel1D`].
    #[must_use]
    pub const fn sigma_g(&self) -> f64 {
        self.sigma_g
    }
    /// Ratio `q = β(n+1)/β(n)` of two consecutive eigenvalues.
    ///
    /// Expressed with the coherence parameter `β = σg/σs` this is `1 / (1 + β²/2 + β·sqrt(1 + (β/2)²))`.
    #[must_use]
    pub fn decay_ratio(&self) -> f64 {
        self.b / (self.a + self.b + self.c)
    }
    /// Eigenvalue (occupation) of the mode with the given index.
    #[must_use]
    pub fn beta(&self, mode: usize) -> f64 {
        let sum = self.a + self.b + self.c;
        self.amplitude * (PI / sum).sqrt() * self.decay_ratio().powf(usize_to_f64(mode))
    }
    /// Eigenvalues of the first `count` modes.
    #[must_use]
    pub fn betas(&self, count: usize) -> DVector<f64> {
        DVector::from_fn(count, |n, _| self.beta(n))
    }
    /// Evaluate the (real, normalized) coherent mode `φn` at the given positions (in meter).
    #[must_use]
    pub fn phi(&self, mode: usize, x: &DVector<f64>) -> DVector<f64> {
        let scale = (2.0 * self.c).sqrt();
        let norm = scale.sqrt();
        x.map(|x| norm * hermite_function(mode, x * scale))
    }
    /// Number of modes needed to accumulate the fraction `threshold` of the spectral density.
    ///
    /// This is `ceil(ln(1 - threshold) / ln(q))`, but at least 1.
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///   - the threshold is not within (0, 1)
    ///   - the resulting number of modes is not finite (fully incoherent limit)
    pub fn mode_count(&self, threshold: f64) -> XwResult<usize> {
        mode_count_for_ratio(self.decay_ratio(), threshold)
    }
}

/// Number of modes of a geometric eigenvalue ladder with ratio `q` needed to reach the cumulated fraction `threshold`.
///
/// # Errors
///
/// see [`GaussianSchellModel1D::mode_count`]
pub fn mode_count_for_ratio(q: f64, threshold: f64) -> XwResult<usize> {
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(XwaveError::validation(
            "spectral_density_threshold",
            threshold,
            "must be within (0, 1)",
        ));
    }
    let count = ((1.0 - threshold).ln() / q.ln()).ceil();
    if count.is_nan() || count.is_infinite() {
        return Err(XwaveError::NumericDegeneracy(format!(
            "number of coherent modes is not finite (eigenvalue ratio q = {q})"
        )));
    }
    Ok(f64_to_usize(count).max(1))
}

/// Separable two-dimensional Gaussian Schell-model built from one model per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianSchellModel2D {
    mode_x: GaussianSchellModel1D,
    mode_y: GaussianSchellModel1D,
}
impl GaussianSchellModel2D {
    /// Creates a new [`GaussianSchellModel2D`]. The amplitude is carried by the horizontal model.
    ///
    /// # Errors
    ///
    /// see [`GaussianSchellModel1D::new`]
    pub fn new(
        amplitude: f64,
        sigma_s_x: f64,
        sigma_g_x: f64,
        sigma_s_y: f64,
        sigma_g_y: f64,
    ) -> XwResult<Self> {
        Ok(Self {
            mode_x: GaussianSchellModel1D::new(amplitude, sigma_s_x, sigma_g_x)?,
            mode_y: GaussianSchellModel1D::new(1.0, sigma_s_y, sigma_g_y)?,
        })
    }
    /// Returns the horizontal model.
    #[must_use]
    pub const fn mode_x(&self) -> &GaussianSchellModel1D {
        &self.mode_x
    }
    /// Returns the vertical model.
    #[must_use]
    pub const fn mode_y(&self) -> &GaussianSchellModel1D {
        &self.mode_y
    }
    /// Combined eigenvalue of the mode pair `(ix, iy)`.
    #[must_use]
    pub fn beta(&self, ix: usize, iy: usize) -> f64 {
        self.mode_x.beta(ix) * self.mode_y.beta(iy)
    }
    /// All mode pairs of the `n_x × n_y` Cartesian product ranked by descending combined eigenvalue.
    ///
    /// Pairs of equal eigenvalue keep their lexicographic `(ix, iy)` order.
    #[must_use]
    pub fn sorted_modes(&self, n_x: usize, n_y: usize) -> Vec<(usize, usize, f64)> {
        let betas_x = self.mode_x.betas(n_x);
        let betas_y = self.mode_y.betas(n_y);
        (0..n_x)
            .cartesian_product(0..n_y)
            .map(|(ix, iy)| (ix, iy, betas_x[ix] * betas_y[iy]))
            .sorted_by(|l, r| r.2.total_cmp(&l.2))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;

    fn model() -> GaussianSchellModel1D {
        GaussianSchellModel1D::new(1.0, 30e-6, 6e-6).unwrap()
    }
    #[test]
    fn new() {
        assert!(GaussianSchellModel1D::new(1.0, 0.0, 1e-6).is_err());
        assert_matches!(
            GaussianSchellModel1D::new(1.0, 1e-6, -1e-6),
            Err(XwaveError::Validation { field, .. }) if field == "sigma_mode"
        );
        assert!(GaussianSchellModel1D::new(f64::NAN, 1e-6, 1e-6).is_err());
        let m = model();
        assert_eq!(m.sigma_s(), 30e-6);
        assert_eq!(m.sigma_g(), 6e-6);
    }
    #[test]
    fn decay_ratio_closed_form() {
        let m = model();
        let beta: f64 = 6.0 / 30.0;
        let q = 1.0 / (1.0 + beta * beta / 2.0 + beta * (1.0 + (beta / 2.0).powi(2)).sqrt());
        assert_relative_eq!(m.decay_ratio(), q, max_relative = 1e-12);
    }
    #[test]
    fn eigenvalues_decay_and_sum_to_total_intensity() {
        let m = model();
        let betas = m.betas(2000);
        for i in 1..betas.len() {
            assert!(betas[i] <= betas[i - 1]);
        }
        // total spectral density: integral of A·exp(-x²/(2σs²))
        let total = (2.0 * PI).sqrt() * 30e-6;
        assert_relative_eq!(betas.sum(), total, max_relative = 1e-9);
    }
    #[test]
    fn modes_reconstruct_spectral_density() {
        let m = GaussianSchellModel1D::new(1.0, 10e-6, 20e-6).unwrap();
        let x = DVector::from_vec(vec![0.0, 5e-6, -12e-6, 25e-6]);
        let mut density = DVector::<f64>::zeros(x.len());
        for n in 0..60 {
            let phi = m.phi(n, &x);
            density += phi.component_mul(&phi) * m.beta(n);
        }
        for (d, x) in density.iter().zip(x.iter()) {
            assert_relative_eq!(*d, (-x * x / (2.0 * 1e-10)).exp(), max_relative = 1e-8);
        }
    }
    #[test]
    fn mode_count() {
        let m = model();
        let q = m.decay_ratio();
        let n = m.mode_count(0.99).unwrap();
        assert_eq!(n, f64_to_usize(((1.0f64 - 0.99).ln() / q.ln()).ceil()));
        assert!(1.0 - q.powf(usize_to_f64(n)) >= 0.99);
        assert!(1.0 - q.powf(usize_to_f64(n - 1)) < 0.99);
        assert!(m.mode_count(1.0).is_err());
        assert!(m.mode_count(0.0).is_err());
        assert_eq!(mode_count_for_ratio(1e-12, 0.5).unwrap(), 1);
        assert_eq!(mode_count_for_ratio(0.0, 0.5).unwrap(), 1);
        assert_matches!(
            mode_count_for_ratio(1.0, 0.5),
            Err(XwaveError::NumericDegeneracy(_))
        );
    }
    #[test]
    fn sorted_modes() {
        let gsm = GaussianSchellModel2D::new(1.0, 30e-6, 6e-6, 4e-6, 8e-6).unwrap();
        let modes = gsm.sorted_modes(5, 3);
        assert_eq!(modes.len(), 15);
        assert_eq!((modes[0].0, modes[0].1), (0, 0));
        for w in modes.windows(2) {
            assert!(w[0].2 >= w[1].2);
        }
        for (ix, iy, beta) in &modes {
            assert_abs_diff_eq!(*beta, gsm.beta(*ix, *iy));
        }
        assert_eq!(gsm.mode_x().sigma_s(), 30e-6);
        assert_eq!(gsm.mode_y().sigma_g(), 8e-6);
    }
}
