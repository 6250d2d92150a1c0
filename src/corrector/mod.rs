#![warn(missing_docs)]
//! Refractive corrector profile solver.
//!
//! The [`RefractiveCorrector`] computes the thickness profile of a refractive optic which converts a given
//! [`Wavefront1D`] into a spherical wave converging towards a focus, and applies absorption and phase shift of that
//! optic to a copy of the wavefront.
mod height_profile;
mod job;

pub use height_profile::HeightProfile;
pub use job::{CorrectorJob, CorrectorJobOutput, InputShape};

use crate::{
    error::{XwResult, XwaveError},
    materials::MaterialOptics,
    wavefront::{Wavefront, Wavefront1D},
};
use log::info;
use nalgebra::DVector;
use num::Complex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::{Display, EnumIter};
use uom::si::{f64::Length, length::meter};

/// Tapering of the height profile towards the edges of the corrector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Display, EnumIter)]
pub enum Apodization {
    /// no tapering. The profile is shifted such that its center sample is zero.
    #[default]
    None,
    /// the profile is weighted with the peak-normalized intensity of the input wavefront
    IntensityWeighted,
    /// the profile is weighted with a Gaussian window of width `ratio · |x_last - x_first|`
    GaussianWindowed {
        /// window sigma relative to the full aperture
        ratio: f64,
    },
}

/// The correction applied by a [`CorrectorJob`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum CorrectionMethod {
    /// pass the wavefront through unchanged (flat zero profile)
    None,
    /// correct the wavefront towards a spherical wave focusing at the focus distance
    #[default]
    FocusToWaist,
}

/// Result of a corrector run.
#[derive(Debug, Clone)]
pub struct CorrectorOutput {
    /// the input wavefront after passing the corrector
    pub output_wavefront: Wavefront1D,
    /// the ideal wavefront the corrector aims at
    pub target_wavefront: Wavefront1D,
    /// thickness of the corrector at each sample position
    pub profile: HeightProfile,
}
impl CorrectorOutput {
    /// Output of a run without correction: independent copies of the input and a zero height profile.
    #[must_use]
    pub fn uncorrected(input: &Wavefront1D) -> Self {
        Self {
            output_wavefront: input.clone(),
            target_wavefront: input.clone(),
            profile: HeightProfile::flat(input.abscissas().clone()),
        }
    }
}

/// Solver for the thickness profile of a refractive corrector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefractiveCorrector {
    focus_distance: Length,
    apodization: Apodization,
    wall_thickness: Length,
}
impl RefractiveCorrector {
    /// Creates a new [`RefractiveCorrector`].
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Validation`] if
    ///   - the focus distance is not strictly positive and finite
    ///   - the ratio of a Gaussian apodization is not strictly positive and finite
    ///   - the wall thickness is negative or not finite
    pub fn new(
        focus_distance: Length,
        apodization: Apodization,
        wall_thickness: Length,
    ) -> XwResult<Self> {
        let focus = focus_distance.get::<meter>();
        if !focus.is_normal() || focus.is_sign_negative() {
            return Err(XwaveError::validation(
                "focus_distance",
                format!("{focus} m"),
                "must be strictly positive and finite",
            ));
        }
        if let Apodization::GaussianWindowed { ratio } = apodization {
            if !ratio.is_normal() || ratio.is_sign_negative() {
                return Err(XwaveError::validation(
                    "apodization_ratio",
                    ratio,
                    "must be strictly positive and finite",
                ));
            }
        }
        let wall = wall_thickness.get::<meter>();
        if !wall.is_finite() || wall < 0.0 {
            return Err(XwaveError::validation(
                "wall_thickness",
                format!("{wall} m"),
                "must be positive (or zero) and finite",
            ));
        }
        Ok(Self {
            focus_distance,
            apodization,
            wall_thickness,
        })
    }
    /// Returns the focus distance of this [`RefractiveCorrector`].
    #[must_use]
    pub const fn focus_distance(&self) -> Length {
        self.focus_distance
    }
    /// Returns the apodization of this [`RefractiveCorrector`].
    #[must_use]
    pub const fn apodization(&self) -> Apodization {
        self.apodization
    }
    /// Returns the wall thickness of this [`RefractiveCorrector`].
    #[must_use]
    pub const fn wall_thickness(&self) -> Length {
        self.wall_thickness
    }
    /// Compute the corrector profile for the given input wavefront and material.
    ///
    /// The height is `-(φ_target - φ_input) / (k·δ)` where the target is a spherical wave of radius
    /// `-focus_distance`. The profile is apodized, the wall thickness is added and the resulting absorption
    /// `sqrt(exp(-μ·h))` and phase shift `-k·δ·h` are applied to a copy of the input. If `profile_file` is given, the
    /// profile is written there.
    ///
    /// The input wavefront is never modified. A focus distance approaching infinity turns the target into a plane
    /// wave and is not treated specially.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the refraction index decrement of the material is zero ([`XwaveError::NumericDegeneracy`])
    ///   - the input wavefront has zero peak intensity and intensity weighting is requested
    ///     ([`XwaveError::NumericDegeneracy`])
    ///   - the profile file cannot be written
    pub fn solve(
        &self,
        input: &Wavefront1D,
        material: &MaterialOptics,
        profile_file: Option<&Path>,
    ) -> XwResult<CorrectorOutput> {
        let k = input.wavenumber();
        let delta = material.refraction_index_delta();
        let k_delta = k * delta;
        if !k_delta.is_normal() {
            return Err(XwaveError::NumericDegeneracy(format!(
                "height profile undefined for refraction index delta = {delta}"
            )));
        }
        let mut target = input.clone();
        target.set_spherical_wave(
            -self.focus_distance,
            Length::new::<meter>(0.0),
            Complex::new(1.0, 0.0),
        )?;
        let phase_correction = target.phase(true, None) - input.phase(true, None);
        let mut heights = phase_correction / -k_delta;
        self.apodize(input, &mut heights)?;
        heights.add_scalar_mut(self.wall_thickness.get::<meter>());
        if heights.iter().any(|h| !h.is_finite()) {
            return Err(XwaveError::NumericDegeneracy(
                "height profile contains non-finite values".into(),
            ));
        }
        let mut output = input.clone();
        output.rescale_amplitudes(&heights.map(|h| material.amplitude_factor(h)))?;
        output.add_phase_shifts(&heights.map(|h| material.phase_shift(h, k)))?;
        info!(
            "corrector profile: {} samples, height from {:e} m to {:e} m",
            heights.len(),
            heights.min(),
            heights.max()
        );
        let profile = HeightProfile::new(input.abscissas().clone(), heights)?;
        if let Some(path) = profile_file {
            profile.write_to_file(path)?;
        }
        Ok(CorrectorOutput {
            output_wavefront: output,
            target_wavefront: target,
            profile,
        })
    }
    fn apodize(&self, input: &Wavefront1D, heights: &mut DVector<f64>) -> XwResult<()> {
        if heights.is_empty() {
            return Ok(());
        }
        match self.apodization {
            Apodization::None => {
                let center = heights[heights.len() / 2];
                heights.add_scalar_mut(-center);
                return Ok(());
            }
            Apodization::IntensityWeighted => {
                let intensity = input.intensity();
                let peak = intensity.max();
                if !peak.is_normal() {
                    return Err(XwaveError::NumericDegeneracy(format!(
                        "intensity weighted apodization impossible for peak intensity {peak}"
                    )));
                }
                heights.component_mul_assign(&(intensity / peak));
            }
            Apodization::GaussianWindowed { ratio } => {
                let x = input.abscissas();
                let sigma = (x[x.len() - 1] - x[0]).abs() * ratio;
                if !sigma.is_normal() {
                    return Err(XwaveError::NumericDegeneracy(format!(
                        "gaussian apodization window width is {sigma} m"
                    )));
                }
                let window = x.map(|x| (-x * x / (2.0 * sigma * sigma)).exp());
                let peak = window.max();
                heights.component_mul_assign(&(window / peak));
            }
        }
        let first = heights[0];
        heights.add_scalar_mut(-first);
        Ok(())
    }
}
