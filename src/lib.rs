//! This is the documentation for the **xwave** package.
//!
//! **xwave** provides two numerical building blocks for the simulation of X-ray beamlines:
//!
//!   - the [`RefractiveCorrector`](corrector::RefractiveCorrector), which computes the thickness profile of a refractive
//!     optic converting a one-dimensional wavefront into a focusing spherical wave, and
//!   - the [`GsmSourceSynthesizer`](gsm::GsmSourceSynthesizer), which represents a partially coherent undulator source
//!     as a Gaussian Schell-model and synthesizes its coherent modes on a two-dimensional grid.
#![allow(clippy::module_name_repetitions)]

pub mod console;
pub mod corrector;
pub mod error;
pub mod export;
pub mod gsm;
pub mod materials;
pub mod thin_object;
pub mod utils;
pub mod wavefront;

/// Return the version information of the currently built xwave executable.
#[must_use]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
