//! Undulator radiation sizes and their convolution with the electron beam.
use crate::error::{XwResult, XwaveError};
use log::info;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uom::si::{
    angle::radian,
    f64::{Angle, Length},
    length::meter,
};

/// Natural (zero emittance) rms size and divergence of undulator radiation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiationSigmas {
    /// rms size in meter
    pub sigma: f64,
    /// rms divergence in rad
    pub sigma_prime: f64,
}
impl RadiationSigmas {
    /// Computes the natural radiation sigmas `σr = 2.740/(4π)·sqrt(λL)` and `σr' = 0.69·sqrt(λ/L)`.
    ///
    /// # Errors
    ///
    /// This function returns an error if the wavelength or the undulator length is not strictly positive and finite.
    pub fn natural(wavelength: Length, undulator_length: Length) -> XwResult<Self> {
        let lambda = wavelength.get::<meter>();
        let length = undulator_length.get::<meter>();
        if !lambda.is_normal() || lambda.is_sign_negative() {
            return Err(XwaveError::validation(
                "wavelength",
                format!("{lambda} m"),
                "must be strictly positive and finite",
            ));
        }
        if !length.is_normal() || length.is_sign_negative() {
            return Err(XwaveError::validation(
                "undulator_length",
                format!("{length} m"),
                "must be strictly positive and finite",
            ));
        }
        let radiation = Self {
            sigma: 2.740 / (4.0 * PI) * (lambda * length).sqrt(),
            sigma_prime: 0.69 * (lambda / length).sqrt(),
        };
        info!(
            "radiation intensity sigma: {:6.3} um, FWHM: {:6.3} um",
            radiation.sigma * 1e6,
            radiation.sigma * 2.355e6
        );
        info!(
            "radiation intensity sigma': {:6.3} urad, FWHM: {:6.3} urad",
            radiation.sigma_prime * 1e6,
            radiation.sigma_prime * 2.355e6
        );
        Ok(radiation)
    }
}

/// Rms sizes and divergences of the electron beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectronBeamSigmas {
    /// horizontal rms size
    pub sigma_h: Length,
    /// vertical rms size
    pub sigma_v: Length,
    /// horizontal rms divergence
    pub sigma_divergence_h: Angle,
    /// vertical rms divergence
    pub sigma_divergence_v: Angle,
}
impl Default for ElectronBeamSigmas {
    fn default() -> Self {
        Self {
            sigma_h: Length::new::<meter>(3.01836e-05),
            sigma_v: Length::new::<meter>(3.63641e-06),
            sigma_divergence_h: Angle::new::<radian>(4.36821e-06),
            sigma_divergence_v: Angle::new::<radian>(1.37498e-06),
        }
    }
}
impl ElectronBeamSigmas {
    /// Check that all sigmas are positive (or zero) and finite.
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Validation`] naming the first offending sigma.
    pub fn validate(&self) -> XwResult<()> {
        let values = [
            ("sigma_h", self.sigma_h.get::<meter>(), "m"),
            ("sigma_v", self.sigma_v.get::<meter>(), "m"),
            (
                "sigma_divergence_h",
                self.sigma_divergence_h.get::<radian>(),
                "rad",
            ),
            (
                "sigma_divergence_v",
                self.sigma_divergence_v.get::<radian>(),
                "rad",
            ),
        ];
        for (field, value, unit) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(XwaveError::validation(
                    field,
                    format!("{value} {unit}"),
                    "must be positive (or zero) and finite",
                ));
            }
        }
        Ok(())
    }
}

/// Photon beam of one transverse axis after convolution of radiation and electron beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCoherence {
    /// convolved rms size in meter
    pub size: f64,
    /// convolved rms divergence in rad
    pub divergence: f64,
    /// coherent fraction `σr·σr' / (Σ·Σ')`
    pub coherence_fraction: f64,
    /// GSM coherence parameter `cf / sqrt(1 - cf)` (ratio of coherence length and source size)
    pub beta: f64,
}
impl AxisCoherence {
    /// Convolve the radiation with the electron beam sigmas of one axis.
    ///
    /// `axis` ("h" or "v") is appended to the field name of a returned error.
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Validation`] if the coherent fraction is not below 1 (e.g. for a
    /// vanishing electron beam emittance), where the GSM coherence parameter is undefined.
    pub fn convolve(
        radiation: &RadiationSigmas,
        beam_size: f64,
        beam_divergence: f64,
        axis: &str,
    ) -> XwResult<Self> {
        let size = radiation.sigma.hypot(beam_size);
        let divergence = radiation.sigma_prime.hypot(beam_divergence);
        let coherence_fraction = (radiation.sigma / size) * (radiation.sigma_prime / divergence);
        if !(coherence_fraction < 1.0) {
            return Err(XwaveError::validation(
                &format!("coherence_fraction_{axis}"),
                coherence_fraction,
                "must be below 1 (electron beam emittance too small for a Gaussian Schell-model)",
            ));
        }
        Ok(Self {
            size,
            divergence,
            coherence_fraction,
            beta: coherence_fraction / (1.0 - coherence_fraction).sqrt(),
        })
    }
    /// Rms coherence length `β·Σ` in meter.
    #[must_use]
    pub fn sigma_mode(&self) -> f64 {
        self.beta * self.size
    }
}
