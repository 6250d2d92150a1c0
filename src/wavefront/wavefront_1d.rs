use super::{photon_wavelength, AxisGrid, Wavefront};
use crate::{
    error::{XwResult, XwaveError},
    utils::phase::unwrap,
};
use nalgebra::DVector;
use num::Complex;
use uom::si::{
    f64::{Energy, Length},
    length::meter,
};

/// A complex scalar field sampled on a one-dimensional equidistant grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavefront1D {
    photon_energy: Energy,
    abscissas: DVector<f64>,
    amplitude: DVector<Complex<f64>>,
}

impl Wavefront1D {
    /// Creates a new [`Wavefront1D`] on the given axis. The complex amplitude is initialized to a unit plane wave.
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///   - the axis definition is invalid
    ///   - the photon energy is not strictly positive
    pub fn new(grid: &AxisGrid, photon_energy: Energy) -> XwResult<Self> {
        photon_wavelength(photon_energy)?;
        let abscissas = grid.coordinates()?;
        let amplitude = DVector::from_element(abscissas.len(), Complex::new(1.0, 0.0));
        Ok(Self {
            photon_energy,
            abscissas,
            amplitude,
        })
    }
    /// Creates a new [`Wavefront1D`] with `points` samples from `x_min` to `x_max`.
    ///
    /// # Errors
    ///
    /// see [`Wavefront1D::new`]
    pub fn from_range(
        x_min: Length,
        x_max: Length,
        points: usize,
        photon_energy: Energy,
    ) -> XwResult<Self> {
        Self::new(&AxisGrid::from_range(x_min, x_max, points), photon_energy)
    }
    /// Creates a new [`Wavefront1D`] with `points` samples starting at `start` separated by `step`.
    ///
    /// # Errors
    ///
    /// see [`Wavefront1D::new`]
    pub fn from_steps(
        start: Length,
        step: Length,
        points: usize,
        photon_energy: Energy,
    ) -> XwResult<Self> {
        Self::new(&AxisGrid::from_steps(start, step, points), photon_energy)
    }
    /// Sets the photon energy of this [`Wavefront1D`].
    ///
    /// # Errors
    ///
    /// This function returns an error if the photon energy is not strictly positive.
    pub fn set_photon_energy(&mut self, photon_energy: Energy) -> XwResult<()> {
        photon_wavelength(photon_energy)?;
        self.photon_energy = photon_energy;
        Ok(())
    }
    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.abscissas.len()
    }
    /// Returns `true` if this [`Wavefront1D`] has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abscissas.is_empty()
    }
    /// Returns the sample positions in meter.
    #[must_use]
    pub const fn abscissas(&self) -> &DVector<f64> {
        &self.abscissas
    }
    /// Returns the complex amplitude.
    #[must_use]
    pub const fn complex_amplitude(&self) -> &DVector<Complex<f64>> {
        &self.amplitude
    }
    /// Replaces the complex amplitude.
    ///
    /// # Errors
    ///
    /// This function returns an error if the length does not match the number of grid samples.
    pub fn set_complex_amplitude(&mut self, amplitude: DVector<Complex<f64>>) -> XwResult<()> {
        self.check_len("complex_amplitude", amplitude.len())?;
        self.amplitude = amplitude;
        Ok(())
    }
    /// Sets a plane wave of constant complex amplitude.
    pub fn set_plane_wave(&mut self, complex_amplitude: Complex<f64>) {
        self.amplitude.fill(complex_amplitude);
    }
    /// Sets a (paraxial) spherical wave `A·exp(-i·k·(x-center)²/(-2·radius))`.
    ///
    /// A negative radius describes a wave converging towards a focus at distance `|radius|`.
    ///
    /// # Errors
    ///
    /// This function returns an error if the radius is zero or not finite.
    pub fn set_spherical_wave(
        &mut self,
        radius: Length,
        center: Length,
        complex_amplitude: Complex<f64>,
    ) -> XwResult<()> {
        let r = radius.get::<meter>();
        if r == 0.0 || !r.is_finite() {
            return Err(XwaveError::validation(
                "radius",
                format!("{r} m"),
                "must be non-zero and finite",
            ));
        }
        let center = center.get::<meter>();
        let k = self.wavenumber();
        self.amplitude = self.abscissas.map(|x| {
            complex_amplitude * Complex::from_polar(1.0, k * (x - center).powi(2) / (2.0 * r))
        });
        Ok(())
    }
    /// Sets a Gaussian profile with zero phase whose intensity has the rms width `sigma`.
    ///
    /// The amplitude is `amplitude·exp(-x²/(4σ²))`, i.e. the fully coherent limit of a Gaussian Schell-model source.
    ///
    /// # Errors
    ///
    /// This function returns an error if sigma is not strictly positive and finite.
    pub fn set_gaussian(&mut self, sigma: Length, amplitude: f64) -> XwResult<()> {
        let sigma = sigma.get::<meter>();
        if !sigma.is_normal() || sigma.is_sign_negative() {
            return Err(XwaveError::validation(
                "sigma",
                format!("{sigma} m"),
                "must be strictly positive and finite",
            ));
        }
        self.amplitude = self
            .abscissas
            .map(|x| Complex::new(amplitude * (-x * x / (4.0 * sigma * sigma)).exp(), 0.0));
        Ok(())
    }
    /// Returns the intensity `|amplitude|²`.
    #[must_use]
    pub fn intensity(&self) -> DVector<f64> {
        self.amplitude.map(|a| a.norm_sqr())
    }
    /// Returns the phase of the complex amplitude in rad.
    ///
    /// If `from_minimum_intensity` is given, the phase of samples whose peak-normalized intensity is below this
    /// value is set to zero. The masking is done first, so masked samples do not take part in unwrapping. If
    /// `unwrap` is set, 2π jumps between neighboring samples are removed.
    #[must_use]
    pub fn phase(&self, unwrap_phase: bool, from_minimum_intensity: Option<f64>) -> DVector<f64> {
        let mut phase = self.amplitude.map(|a| a.arg());
        if let Some(threshold) = from_minimum_intensity {
            let intensity = self.intensity();
            let peak = intensity.max();
            if peak > 0.0 {
                for (p, i) in phase.iter_mut().zip(intensity.iter()) {
                    if i / peak < threshold {
                        *p = 0.0;
                    }
                }
            }
        }
        if unwrap_phase {
            unwrap(&phase)
        } else {
            phase
        }
    }
    /// Multiplies the amplitude sample-wise by the given factors.
    ///
    /// # Errors
    ///
    /// This function returns an error if the length does not match the number of grid samples.
    pub fn rescale_amplitudes(&mut self, factors: &DVector<f64>) -> XwResult<()> {
        self.check_len("amplitude_factors", factors.len())?;
        for (a, f) in self.amplitude.iter_mut().zip(factors.iter()) {
            *a *= *f;
        }
        Ok(())
    }
    /// Adds the given phase shifts (in rad) sample-wise.
    ///
    /// # Errors
    ///
    /// This function returns an error if the length does not match the number of grid samples.
    pub fn add_phase_shifts(&mut self, phase_shifts: &DVector<f64>) -> XwResult<()> {
        self.check_len("phase_shifts", phase_shifts.len())?;
        for (a, p) in self.amplitude.iter_mut().zip(phase_shifts.iter()) {
            *a *= Complex::from_polar(1.0, *p);
        }
        Ok(())
    }
    fn check_len(&self, field: &str, len: usize) -> XwResult<()> {
        if len == self.len() {
            Ok(())
        } else {
            Err(XwaveError::validation(
                field,
                format!("{len} samples"),
                &format!("must match the {} samples of the wavefront", self.len()),
            ))
        }
    }
}

impl Wavefront for Wavefront1D {
    fn photon_energy(&self) -> Energy {
        self.photon_energy
    }
}
