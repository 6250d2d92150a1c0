//! YAML job description of a corrector run.
use super::{Apodization, CorrectionMethod, CorrectorOutput, RefractiveCorrector};
use crate::{
    error::{XwResult, XwaveError},
    materials::{Material, RefractiveIndexDatabase},
    millimeter,
    utils::uom_serde::electronvolt_value,
    wavefront::{AxisGrid, Wavefront1D},
};
use num::Complex;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use uom::si::{
    f64::{Energy, Length},
    length::meter,
};

/// Shape of the wavefront entering the corrector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum InputShape {
    /// unit plane wave
    #[default]
    Plane,
    /// unit spherical wave of the given radius centered on the axis
    Spherical {
        /// radius of curvature (negative for a converging wave)
        radius: Length,
    },
    /// Gaussian profile with flat phase
    Gaussian {
        /// rms width of the intensity
        sigma: Length,
    },
}

/// Complete description of a corrector run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorJob {
    /// sampling of the input wavefront
    pub grid: AxisGrid,
    /// photon energy (stored in eV in job files)
    #[serde(rename = "photon_energy_ev", with = "electronvolt_value")]
    pub photon_energy: Energy,
    /// shape of the input wavefront
    pub input_shape: InputShape,
    /// correction to perform
    pub correction_method: CorrectionMethod,
    /// distance to the focus of the target wave
    pub focus_distance: Length,
    /// corrector material
    pub material: Material,
    /// constant thickness added to the profile
    pub wall_thickness: Length,
    /// tapering of the profile
    pub apodization: Apodization,
    /// file receiving the height profile
    pub profile_file: Option<PathBuf>,
    /// emit the corrected wavefront instead of the input wavefront
    pub apply_correction_to_wavefront: bool,
}
impl Default for CorrectorJob {
    fn default() -> Self {
        Self {
            grid: AxisGrid::from_range(millimeter!(-1.47), millimeter!(1.47), 1000),
            photon_energy: crate::electronvolt!(1000.0),
            input_shape: InputShape::default(),
            correction_method: CorrectionMethod::FocusToWaist,
            focus_distance: Length::new::<meter>(10.0),
            material: Material::External {
                refraction_index_delta: 5.3e-7,
                attenuation_coefficient: 0.003_573_82,
            },
            wall_thickness: Length::new::<meter>(0.0),
            apodization: Apodization::None,
            profile_file: None,
            apply_correction_to_wavefront: false,
        }
    }
}

/// Result of a [`CorrectorJob`].
#[derive(Debug, Clone)]
pub struct CorrectorJobOutput {
    /// wavefront as defined by the job
    pub input_wavefront: Wavefront1D,
    /// profile, corrected and target wavefront
    pub correction: CorrectorOutput,
    /// the wavefront handed downstream (input or corrected, see
    /// [`CorrectorJob::apply_correction_to_wavefront`])
    pub emitted_wavefront: Wavefront1D,
}

impl CorrectorJob {
    /// Read a [`CorrectorJob`] from a YAML file. Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the given path is not found or readable.
    ///   - the parsing of the file failed.
    pub fn from_file(path: &Path) -> XwResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            XwaveError::Console(format!("cannot read file {} : {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }
    /// Parse a [`CorrectorJob`] from a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the string is not a valid job.
    pub fn from_yaml(yaml: &str) -> XwResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| XwaveError::Console(format!("parsing of corrector job failed: {e}")))
    }
    /// Build the input wavefront of this job.
    ///
    /// # Errors
    ///
    /// This function will return an error if grid, photon energy or shape parameters are invalid.
    pub fn input_wavefront(&self) -> XwResult<Wavefront1D> {
        self.grid.validate("grid")?;
        let mut wavefront = Wavefront1D::new(&self.grid, self.photon_energy)?;
        match self.input_shape {
            InputShape::Plane => wavefront.set_plane_wave(Complex::new(1.0, 0.0)),
            InputShape::Spherical { radius } => wavefront.set_spherical_wave(
                radius,
                Length::new::<meter>(0.0),
                Complex::new(1.0, 0.0),
            )?,
            InputShape::Gaussian { sigma } => wavefront.set_gaussian(sigma, 1.0)?,
        }
        Ok(wavefront)
    }
    /// Run the job. Element materials are resolved with the given database.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the job parameters are invalid
    ///   - the material cannot be resolved
    ///   - the corrector profile cannot be computed or written
    pub fn run(&self, database: &dyn RefractiveIndexDatabase) -> XwResult<CorrectorJobOutput> {
        let input_wavefront = self.input_wavefront()?;
        let correction = match self.correction_method {
            CorrectionMethod::None => CorrectorOutput::uncorrected(&input_wavefront),
            CorrectionMethod::FocusToWaist => {
                let corrector = RefractiveCorrector::new(
                    self.focus_distance,
                    self.apodization,
                    self.wall_thickness,
                )?;
                let optics = self.material.resolve(self.photon_energy, database)?;
                corrector.solve(&input_wavefront, &optics, self.profile_file.as_deref())?
            }
        };
        let emitted_wavefront = if self.apply_correction_to_wavefront {
            correction.output_wavefront.clone()
        } else {
            input_wavefront.clone()
        };
        Ok(CorrectorJobOutput {
            input_wavefront,
            correction,
            emitted_wavefront,
        })
    }
}
