#![warn(missing_docs)]
//! Optical constants of the corrector (and thin object) materials in the X-ray regime.
//!
//! A [`Material`] is either given directly by its refraction index decrement δ and its linear attenuation
//! coefficient μ or is one of the supported elements whose constants are looked up in a
//! [`RefractiveIndexDatabase`] at the photon energy of the wavefront.
mod scattering_factors;

pub use scattering_factors::{ScatteringFactorDatabase, ScatteringTable};

use crate::{
    error::{XwResult, XwaveError},
    wavefront::photon_wavelength,
};
use log::info;
use num::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum::{Display, EnumIter};
use uom::si::{
    energy::kiloelectronvolt,
    f64::{Energy, Length},
    length::meter,
};

/// Density of diamond in g/cm³. Differs from the graphite-like density of carbon found in element tables.
pub const DIAMOND_DENSITY: f64 = 3.51;

/// Capability required from a material database.
pub trait RefractiveIndexDatabase {
    /// Mass density of the element with the given symbol in g/cm³.
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Collaborator`] if the element is unknown.
    fn element_density(&self, symbol: &str) -> XwResult<f64>;
    /// Complex refractive index `n = 1 - δ + iβ` of an element at the given photon energy (keV) and density (g/cm³).
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Collaborator`] if the index cannot be determined.
    fn complex_refractive_index(
        &self,
        symbol: &str,
        energy_kev: f64,
        density: f64,
    ) -> XwResult<Complex<f64>>;
}

/// Material of a refractive optic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Display, EnumIter)]
pub enum Material {
    /// user supplied optical constants
    External {
        /// refraction index decrement δ
        refraction_index_delta: f64,
        /// linear attenuation coefficient μ in 1/m
        attenuation_coefficient: f64,
    },
    /// Beryllium
    #[default]
    Be,
    /// Aluminium
    Al,
    /// Diamond
    Diamond,
}
impl Material {
    /// Resolve the optical constants of this material at the given photon energy.
    ///
    /// External constants are passed through unchanged. For elements `δ = 1 - Re(n)` and `μ = 4π·Im(n)/λ`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the photon energy is not strictly positive
    ///   - the database fails to deliver density or refractive index (passed through unmodified)
    ///   - the resolved (or given) constants are negative
    pub fn resolve(
        &self,
        photon_energy: Energy,
        database: &dyn RefractiveIndexDatabase,
    ) -> XwResult<MaterialOptics> {
        let (symbol, density) = match *self {
            Self::External {
                refraction_index_delta,
                attenuation_coefficient,
            } => return MaterialOptics::new(refraction_index_delta, attenuation_coefficient),
            Self::Be => ("Be", None),
            Self::Al => ("Al", None),
            Self::Diamond => ("C", Some(DIAMOND_DENSITY)),
        };
        let wavelength = photon_wavelength(photon_energy)?;
        let density = match density {
            Some(density) => density,
            None => database.element_density(symbol)?,
        };
        let n = database.complex_refractive_index(
            symbol,
            photon_energy.get::<kiloelectronvolt>(),
            density,
        )?;
        let optics = MaterialOptics::new(
            1.0 - n.re,
            4.0 * PI * n.im / wavelength.get::<meter>(),
        )?;
        info!(
            "{self} ({symbol}, {density} g/cm^3): refraction index delta = {:e}, attenuation coefficient = {:e} 1/m",
            optics.refraction_index_delta(),
            optics.attenuation_coefficient()
        );
        Ok(optics)
    }
}

/// Resolved optical constants of a material at one photon energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialOptics {
    refraction_index_delta: f64,
    attenuation_coefficient: f64,
}
impl MaterialOptics {
    /// Creates a new [`MaterialOptics`].
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Validation`] if one of the constants is negative or not finite.
    pub fn new(refraction_index_delta: f64, attenuation_coefficient: f64) -> XwResult<Self> {
        if !refraction_index_delta.is_finite() || refraction_index_delta < 0.0 {
            return Err(XwaveError::validation(
                "refraction_index_delta",
                refraction_index_delta,
                "must be positive (or zero) and finite",
            ));
        }
        if !attenuation_coefficient.is_finite() || attenuation_coefficient < 0.0 {
            return Err(XwaveError::validation(
                "attenuation_coefficient",
                attenuation_coefficient,
                "must be positive (or zero) and finite",
            ));
        }
        Ok(Self {
            refraction_index_delta,
            attenuation_coefficient,
        })
    }
    /// Returns the refraction index decrement δ.
    #[must_use]
    pub const fn refraction_index_delta(&self) -> f64 {
        self.refraction_index_delta
    }
    /// Returns the linear attenuation coefficient μ in 1/m.
    #[must_use]
    pub const fn attenuation_coefficient(&self) -> f64 {
        self.attenuation_coefficient
    }
    /// Amplitude transmission `sqrt(exp(-μ·t))` of a slab with thickness `t` (in meter).
    #[must_use]
    pub fn amplitude_factor(&self, thickness: f64) -> f64 {
        (-self.attenuation_coefficient * thickness).exp().sqrt()
    }
    /// Phase shift `-k·δ·t` of a slab with thickness `t` (in meter) for the wavenumber `k` (in 1/m).
    #[must_use]
    pub fn phase_shift(&self, thickness: f64, wavenumber: f64) -> f64 {
        -wavenumber * self.refraction_index_delta * thickness
    }
    /// Intensity transmission of a slab with the given thickness.
    #[must_use]
    pub fn transmission(&self, thickness: Length) -> f64 {
        (-self.attenuation_coefficient * thickness.get::<meter>()).exp()
    }
}
