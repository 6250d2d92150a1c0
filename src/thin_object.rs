#![warn(missing_docs)]
//! Thin refractive object acting on a [`Wavefront2D`].
use crate::{
    error::{XwResult, XwaveError},
    materials::{Material, RefractiveIndexDatabase},
    wavefront::{Wavefront, Wavefront2D},
};
use log::{info, warn};
use nalgebra::DMatrix;

/// An object of a given material described by its thickness at each sample of a wavefront grid.
///
/// The object is thin: it only changes amplitude and phase locally, without propagation inside the object.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinObject2D {
    thickness: DMatrix<f64>,
    material: Material,
}
impl ThinObject2D {
    /// Creates a new [`ThinObject2D`] from a thickness map (in meter).
    ///
    /// # Errors
    ///
    /// This function returns an error if the thickness map contains non-finite values.
    pub fn new(thickness: DMatrix<f64>, material: Material) -> XwResult<Self> {
        if let Some(t) = thickness.iter().find(|t| !t.is_finite()) {
            return Err(XwaveError::validation(
                "thickness",
                t,
                "all thickness values must be finite",
            ));
        }
        Ok(Self {
            thickness,
            material,
        })
    }
    /// Returns the thickness map.
    #[must_use]
    pub const fn thickness(&self) -> &DMatrix<f64> {
        &self.thickness
    }
    /// Returns the material.
    #[must_use]
    pub const fn material(&self) -> Material {
        self.material
    }
    /// Transmit the wavefront through the object.
    ///
    /// A thickness map with negative values is shifted such that its minimum becomes zero.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the thickness map does not match the wavefront grid
    ///   - the material cannot be resolved at the photon energy of the wavefront
    pub fn apply(
        &self,
        wavefront: &mut Wavefront2D,
        database: &dyn RefractiveIndexDatabase,
    ) -> XwResult<()> {
        wavefront.check_shape("thickness", self.thickness.shape())?;
        let optics = self.material.resolve(wavefront.photon_energy(), database)?;
        let minimum = self.thickness.min();
        let thickness = if minimum < 0.0 {
            warn!("thickness map has negative values, shifting it by {:e} m", -minimum);
            self.thickness.add_scalar(-minimum)
        } else {
            self.thickness.clone()
        };
        let k = wavefront.wavenumber();
        wavefront.rescale_amplitudes(&thickness.map(|t| optics.amplitude_factor(t)))?;
        wavefront.add_phase_shifts(&thickness.map(|t| optics.phase_shift(t, k)))?;
        info!(
            "thin object ({}) applied, maximum thickness {:e} m",
            self.material,
            thickness.max()
        );
        Ok(())
    }
}
