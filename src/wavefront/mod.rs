#![warn(missing_docs)]
//! Sampled scalar wavefronts.
//!
//! A wavefront is a complex amplitude sampled on an equidistant 1D ([`Wavefront1D`]) or 2D ([`Wavefront2D`]) grid
//! together with the photon energy of the radiation. Duplication is done via [`Clone`], which yields a fully
//! independent copy.
pub mod grid;
mod wavefront_1d;
mod wavefront_2d;

pub use grid::{AxisGrid, GridInit};
pub use wavefront_1d::Wavefront1D;
pub use wavefront_2d::Wavefront2D;

use crate::error::{XwResult, XwaveError};
use std::f64::consts::TAU;
use uom::si::{
    energy::electronvolt,
    f64::{Energy, Length},
    length::meter,
};

/// Product of Planck's constant and the speed of light in eV·m.
pub const PLANCK_HC_EV_M: f64 = 1.239_841_984_332_003e-6;

/// Return the vacuum wavelength of photons with the given energy.
///
/// # Errors
/// This function returns a [`XwaveError::Validation`] if the photon energy is not positive and finite.
pub fn photon_wavelength(photon_energy: Energy) -> XwResult<Length> {
    let energy = photon_energy.get::<electronvolt>();
    if !energy.is_normal() || energy.is_sign_negative() {
        return Err(XwaveError::validation(
            "photon_energy",
            format!("{energy} eV"),
            "must be strictly positive and finite",
        ));
    }
    Ok(Length::new::<meter>(PLANCK_HC_EV_M / energy))
}

/// Common accessors of all wavefront containers.
pub trait Wavefront {
    /// Returns the photon energy of this wavefront.
    fn photon_energy(&self) -> Energy;
    /// Returns the wavelength (`hc / E`) of this wavefront.
    fn wavelength(&self) -> Length {
        Length::new::<meter>(PLANCK_HC_EV_M / self.photon_energy().get::<electronvolt>())
    }
    /// Returns the wavenumber `2π / λ` in rad/m.
    fn wavenumber(&self) -> f64 {
        TAU / self.wavelength().get::<meter>()
    }
}
