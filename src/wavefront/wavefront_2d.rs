use super::{photon_wavelength, AxisGrid, Wavefront};
use crate::{
    error::{XwResult, XwaveError},
    gsm::gaussian_schell::GaussianSchellModel1D,
    utils::phase::unwrap_2d,
};
use nalgebra::{DMatrix, DVector};
use num::Complex;
use uom::si::{
    f64::{Energy, Length},
    length::meter,
};

/// A complex scalar field sampled on a two-dimensional equidistant grid.
///
/// Rows of the amplitude matrix correspond to the horizontal (x) samples, columns to the vertical (y) samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavefront2D {
    photon_energy: Energy,
    x: DVector<f64>,
    y: DVector<f64>,
    amplitude: DMatrix<Complex<f64>>,
}

impl Wavefront2D {
    /// Creates a new [`Wavefront2D`] on the given axes, initialized to a unit plane wave.
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///   - one of the axis definitions is invalid
    ///   - the photon energy is not strictly positive
    pub fn new(grid_x: &AxisGrid, grid_y: &AxisGrid, photon_energy: Energy) -> XwResult<Self> {
        photon_wavelength(photon_energy)?;
        grid_x.validate("h")?;
        grid_y.validate("v")?;
        let x = grid_x.coordinates()?;
        let y = grid_y.coordinates()?;
        let amplitude = DMatrix::from_element(x.len(), y.len(), Complex::new(1.0, 0.0));
        Ok(Self {
            photon_energy,
            x,
            y,
            amplitude,
        })
    }
    /// Sets the photon energy of this [`Wavefront2D`].
    ///
    /// # Errors
    ///
    /// This function returns an error if the photon energy is not strictly positive.
    pub fn set_photon_energy(&mut self, photon_energy: Energy) -> XwResult<()> {
        photon_wavelength(photon_energy)?;
        self.photon_energy = photon_energy;
        Ok(())
    }
    /// Returns the horizontal sample positions in meter.
    #[must_use]
    pub const fn coordinate_x(&self) -> &DVector<f64> {
        &self.x
    }
    /// Returns the vertical sample positions in meter.
    #[must_use]
    pub const fn coordinate_y(&self) -> &DVector<f64> {
        &self.y
    }
    /// Returns the grid shape `(nx, ny)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.amplitude.shape()
    }
    /// Returns the complex amplitude.
    #[must_use]
    pub const fn complex_amplitude(&self) -> &DMatrix<Complex<f64>> {
        &self.amplitude
    }
    /// Sets a Gaussian with zero phase whose intensity has the rms widths `sigma_x` and `sigma_y`.
    ///
    /// The amplitude is `amplitude·exp(-x²/(4σx²) - y²/(4σy²))`, the fully coherent limit of a Gaussian Schell-model
    /// source.
    ///
    /// # Errors
    ///
    /// This function returns an error if one of the sigmas is not strictly positive and finite.
    pub fn set_gaussian(&mut self, sigma_x: Length, sigma_y: Length, amplitude: f64) -> XwResult<()> {
        let sx = positive_sigma("sigma_x", sigma_x)?;
        let sy = positive_sigma("sigma_y", sigma_y)?;
        let gx = self.x.map(|x| (-x * x / (4.0 * sx * sx)).exp());
        let gy = self.y.map(|y| (-y * y / (4.0 * sy * sy)).exp());
        self.set_separable(&gx, &gy, amplitude);
        Ok(())
    }
    /// Sets the Hermite-Gaussian coherent mode `(nx, ny)` of a Gaussian Schell-model source.
    ///
    /// Each axis uses the source size `sigma` and the coherence length `beta·sigma`. The field is the outer product
    /// of the two (normalized) one-dimensional modes, scaled by `amplitude`.
    ///
    /// # Errors
    ///
    /// This function returns an error if a sigma or a beta is not strictly positive and finite.
    #[allow(clippy::too_many_arguments)]
    pub fn set_gaussian_hermite_mode(
        &mut self,
        sigma_x: Length,
        sigma_y: Length,
        amplitude: f64,
        nx: usize,
        ny: usize,
        beta_x: f64,
        beta_y: f64,
    ) -> XwResult<()> {
        let sx = positive_sigma("sigma_x", sigma_x)?;
        let sy = positive_sigma("sigma_y", sigma_y)?;
        let mode_x = GaussianSchellModel1D::new(1.0, sx, beta_x * sx)?;
        let mode_y = GaussianSchellModel1D::new(1.0, sy, beta_y * sy)?;
        let phi_x = mode_x.phi(nx, &self.x);
        let phi_y = mode_y.phi(ny, &self.y);
        self.set_separable(&phi_x, &phi_y, amplitude);
        Ok(())
    }
    fn set_separable(&mut self, fx: &DVector<f64>, fy: &DVector<f64>, amplitude: f64) {
        let real = fx * fy.transpose() * amplitude;
        self.amplitude = real.map(|a| Complex::new(a, 0.0));
    }
    /// Returns the intensity `|amplitude|²`.
    #[must_use]
    pub fn intensity(&self) -> DMatrix<f64> {
        self.amplitude.map(|a| a.norm_sqr())
    }
    /// Returns the phase in rad, optionally masked below a peak-normalized intensity and unwrapped.
    ///
    /// Masked samples are set to zero before unwrapping.
    #[must_use]
    pub fn phase(&self, unwrap_phase: bool, from_minimum_intensity: Option<f64>) -> DMatrix<f64> {
        let mut phase = self.amplitude.map(|a| a.arg());
        if let Some(threshold) = from_minimum_intensity {
            let intensity = self.intensity();
            let peak = intensity.max();
            if peak > 0.0 {
                phase.zip_apply(&intensity, |p, i| {
                    if i / peak < threshold {
                        *p = 0.0;
                    }
                });
            }
        }
        if unwrap_phase {
            unwrap_2d(&phase)
        } else {
            phase
        }
    }
    /// Multiplies the amplitude sample-wise by the given factors.
    ///
    /// # Errors
    ///
    /// This function returns an error if the shape does not match the grid.
    pub fn rescale_amplitudes(&mut self, factors: &DMatrix<f64>) -> XwResult<()> {
        self.check_shape("amplitude_factors", factors.shape())?;
        self.amplitude.zip_apply(factors, |a, f| *a *= f);
        Ok(())
    }
    /// Adds the given phase shifts (in rad) sample-wise.
    ///
    /// # Errors
    ///
    /// This function returns an error if the shape does not match the grid.
    pub fn add_phase_shifts(&mut self, phase_shifts: &DMatrix<f64>) -> XwResult<()> {
        self.check_shape("phase_shifts", phase_shifts.shape())?;
        self.amplitude
            .zip_apply(phase_shifts, |a, p| *a *= Complex::from_polar(1.0, p));
        Ok(())
    }
    pub(crate) fn check_shape(&self, field: &str, shape: (usize, usize)) -> XwResult<()> {
        if shape == self.shape() {
            Ok(())
        } else {
            Err(XwaveError::validation(
                field,
                format!("{} x {} samples", shape.0, shape.1),
                &format!(
                    "must match the {} x {} samples of the wavefront",
                    self.shape().0,
                    self.shape().1
                ),
            ))
        }
    }
}

fn positive_sigma(field: &str, sigma: Length) -> XwResult<f64> {
    let sigma = sigma.get::<meter>();
    if !sigma.is_normal() || sigma.is_sign_negative() {
        return Err(XwaveError::validation(
            field,
            format!("{sigma} m"),
            "must be strictly positive and finite",
        ));
    }
    Ok(sigma)
}

impl Wavefront for Wavefront2D {
    fn photon_energy(&self) -> Energy {
        self.photon_energy
    }
}
