//! Synthesis of a single coherent mode of a Gaussian Schell-model undulator source.
use super::{
    gaussian_schell::GaussianSchellModel2D,
    undulator::{AxisCoherence, ElectronBeamSigmas, RadiationSigmas},
};
use crate::{
    error::{XwResult, XwaveError},
    utils::uom_serde::electronvolt_value,
    wavefront::{photon_wavelength, AxisGrid, Wavefront2D},
};
use kahan::KahanSum;
use log::{debug, info, warn};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use uom::si::{
    angle::radian,
    f64::{Energy, Length},
    length::meter,
};

/// Input parameters of a [`GsmSourceSynthesizer`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// horizontal sampling axis
    pub grid_h: AxisGrid,
    /// vertical sampling axis
    pub grid_v: AxisGrid,
    /// photon energy (stored in eV in config files)
    #[serde(rename = "photon_energy_ev", with = "electronvolt_value")]
    pub photon_energy: Energy,
    /// length of the undulator
    pub undulator_length: Length,
    /// convolve the radiation with the electron beam. If `false`, a single fully coherent Gaussian is produced.
    pub use_emittances: bool,
    /// electron beam sizes and divergences
    pub electron_beam: ElectronBeamSigmas,
    /// fraction of the spectral density to be represented by the truncated mode ladder, in `(0, 1)`
    pub spectral_density_threshold: f64,
    /// index of the mode (in descending occupation order) to be synthesized
    pub mode_index: usize,
}
impl Default for SynthesizerConfig {
    fn default() -> Self {
        let axis = AxisGrid::from_range(Length::new::<meter>(-5e-5), Length::new::<meter>(5e-5), 100);
        Self {
            grid_h: axis,
            grid_v: axis,
            photon_energy: crate::electronvolt!(15000.0),
            undulator_length: Length::new::<meter>(4.0),
            use_emittances: true,
            electron_beam: ElectronBeamSigmas::default(),
            spectral_density_threshold: 0.99,
            mode_index: 0,
        }
    }
}
impl SynthesizerConfig {
    /// Read a [`SynthesizerConfig`] from a YAML file. Missing fields take their default values.
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
    /// Parse a [`SynthesizerConfig`] from a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the string is not a valid config.
    pub fn from_yaml(yaml: &str) -> XwResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| XwaveError::Console(format!("parsing of synthesizer config failed: {e}")))
    }
    /// Check all parameters which can be checked without running the synthesis.
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Validation`] naming the first offending parameter.
    pub fn validate(&self) -> XwResult<()> {
        self.grid_h.validate("grid_h")?;
        self.grid_v.validate("grid_v")?;
        photon_wavelength(self.photon_energy)?;
        let length = self.undulator_length.get::<meter>();
        if !length.is_normal() || length.is_sign_negative() {
            return Err(XwaveError::validation(
                "undulator_length",
                format!("{length} m"),
                "must be strictly positive and finite",
            ));
        }
        if !(self.spectral_density_threshold > 0.0 && self.spectral_density_threshold < 1.0) {
            return Err(XwaveError::validation(
                "spectral_density_threshold",
                self.spectral_density_threshold,
                "must be in the open interval (0, 1)",
            ));
        }
        if self.use_emittances {
            self.electron_beam.validate()?;
        }
        Ok(())
    }
}

/// The exact parameters the coherent-mode decomposition depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ModeCacheKey {
    sigma_size_h: f64,
    sigma_mode_h: f64,
    sigma_size_v: f64,
    sigma_mode_v: f64,
    spectral_density_threshold: f64,
}

/// Coherent-mode decomposition reused as long as its [`ModeCacheKey`] is unchanged.
#[derive(Debug, Clone)]
struct ModeCache {
    key: ModeCacheKey,
    model: GaussianSchellModel2D,
    mode_count_h: usize,
    mode_count_v: usize,
    sorted_modes: Vec<(usize, usize)>,
    sorted_eigenvalues: Vec<f64>,
    cumulated_occupation: Vec<f64>,
    eigenvalue_map: DMatrix<f64>,
}
impl ModeCache {
    fn build(key: ModeCacheKey) -> XwResult<Self> {
        let model = GaussianSchellModel2D::new(
            1.0,
            key.sigma_size_h,
            key.sigma_mode_h,
            key.sigma_size_v,
            key.sigma_mode_v,
        )?;
        let mode_count_h = model.mode_x().mode_count(key.spectral_density_threshold)?;
        let mode_count_v = model.mode_y().mode_count(key.spectral_density_threshold)?;
        info!(
            "To consider {} of spectral density in each direction we need {mode_count_h} (H) x {mode_count_v} (V) modes ({} total modes).",
            key.spectral_density_threshold,
            mode_count_h * mode_count_v
        );
        let ranked = model.sorted_modes(mode_count_h, mode_count_v);
        let sorted_modes = ranked.iter().map(|(ih, iv, _)| (*ih, *iv)).collect();
        let sorted_eigenvalues: Vec<f64> = ranked.iter().map(|(_, _, beta)| *beta).collect();

        let mut running = KahanSum::<f64>::new();
        let partial_sums: Vec<f64> = sorted_eigenvalues
            .iter()
            .map(|beta| {
                running += *beta;
                running.sum()
            })
            .collect();
        let total = running.sum();
        if !total.is_normal() {
            return Err(XwaveError::NumericDegeneracy(format!(
                "sum of mode eigenvalues is {total}, occupation cannot be normalized"
            )));
        }
        let cumulated_occupation = partial_sums.iter().map(|s| s / total).collect();

        let eigenvalue_map =
            model.mode_x().betas(mode_count_h) * model.mode_y().betas(mode_count_v).transpose();
        Ok(Self {
            key,
            model,
            mode_count_h,
            mode_count_v,
            sorted_modes,
            sorted_eigenvalues,
            cumulated_occupation,
            eigenvalue_map,
        })
    }
}

/// Diagnostics describing the mode selected by a synthesis run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSelection {
    /// number of horizontal modes retained
    pub mode_count_h: usize,
    /// number of vertical modes retained
    pub mode_count_v: usize,
    /// effectively used mode index (after clamping)
    pub mode_index: usize,
    /// horizontal and vertical order of the selected mode
    pub mode_pair: (usize, usize),
    /// eigenvalues of all retained mode pairs in descending order
    pub sorted_eigenvalues: Vec<f64>,
    /// normalized running sum of [`Self::sorted_eigenvalues`], ending at 1
    pub cumulated_occupation: Vec<f64>,
    /// combined eigenvalue of every `(ih, iv)` pair
    pub eigenvalue_map: DMatrix<f64>,
    /// horizontal and vertical coherence properties, `None` without emittances
    pub coherence: Option<(AxisCoherence, AxisCoherence)>,
}
impl ModeSelection {
    fn fully_coherent() -> Self {
        Self {
            mode_count_h: 1,
            mode_count_v: 1,
            mode_index: 0,
            mode_pair: (0, 0),
            sorted_eigenvalues: vec![1.0],
            cumulated_occupation: vec![1.0],
            eigenvalue_map: DMatrix::from_element(1, 1, 1.0),
            coherence: None,
        }
    }
    /// Total number of retained modes.
    #[must_use]
    pub fn total_modes(&self) -> usize {
        self.cumulated_occupation.len()
    }
}

/// Output of [`GsmSourceSynthesizer::synthesize`].
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// wavefront holding the selected mode
    pub wavefront: Wavefront2D,
    /// mode diagnostics
    pub selection: ModeSelection,
    /// natural radiation sigmas at the configured photon energy
    pub radiation: RadiationSigmas,
}

/// Stateful generator of Gaussian Schell-model coherent modes.
///
/// The synthesizer owns the last coherent-mode decomposition. It is rebuilt only if one of the
/// parameters it depends on (sizes and coherence lengths of both axes, spectral density threshold) changes,
/// so stepping through the modes of an unchanged source is cheap.
#[derive(Debug, Default)]
pub struct GsmSourceSynthesizer {
    cache: Option<ModeCache>,
    total_modes: Option<usize>,
    ready: bool,
    rebuilds: usize,
}
impl GsmSourceSynthesizer {
    /// Creates a new (uninitialized) [`GsmSourceSynthesizer`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns `true` after the first successful synthesis.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }
    /// Returns `true` if a coherent-mode decomposition is cached.
    #[must_use]
    pub const fn has_cached_modes(&self) -> bool {
        self.cache.is_some()
    }
    /// Number of times the coherent-mode decomposition has been (re)built.
    #[must_use]
    pub const fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
    /// Synthesize the wavefront of the configured mode.
    ///
    /// Without emittances a fully coherent Gaussian with the natural radiation size is produced. The mode cache is
    /// left untouched in this case. A mode index beyond the last retained mode is clamped (with a warning).
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the configuration is invalid (see [`SynthesizerConfig::validate`])
    ///   - the coherent fraction of an axis is not below 1
    ///   - the mode decomposition is numerically degenerate
    pub fn synthesize(&mut self, config: &SynthesizerConfig) -> XwResult<SynthesisResult> {
        config.validate()?;
        let wavelength = photon_wavelength(config.photon_energy)?;
        let radiation = RadiationSigmas::natural(wavelength, config.undulator_length)?;
        let mut wavefront = Wavefront2D::new(&config.grid_h, &config.grid_v, config.photon_energy)?;

        if !config.use_emittances {
            let sigma = Length::new::<meter>(radiation.sigma);
            wavefront.set_gaussian(sigma, sigma, 1.0)?;
            self.total_modes = None;
            self.ready = true;
            return Ok(SynthesisResult {
                wavefront,
                selection: ModeSelection::fully_coherent(),
                radiation,
            });
        }

        let beam = &config.electron_beam;
        let axis_h = AxisCoherence::convolve(
            &radiation,
            beam.sigma_h.get::<meter>(),
            beam.sigma_divergence_h.get::<radian>(),
            "h",
        )?;
        let axis_v = AxisCoherence::convolve(
            &radiation,
            beam.sigma_v.get::<meter>(),
            beam.sigma_divergence_v.get::<radian>(),
            "v",
        )?;
        info!(
            "Coherence fraction (from emittances): CF_H: {:.6} CF_V: {:.6}",
            axis_h.coherence_fraction, axis_v.coherence_fraction
        );
        info!(
            "Gaussian Schell-model (matching coherence fraction): H beta: {:.6} sigma_I: {:.6e} m sigma_mu: {:.6e} m",
            axis_h.beta,
            axis_h.size,
            axis_h.sigma_mode()
        );
        info!(
            "Gaussian Schell-model (matching coherence fraction): V beta: {:.6} sigma_I: {:.6e} m sigma_mu: {:.6e} m",
            axis_v.beta,
            axis_v.size,
            axis_v.sigma_mode()
        );

        let key = ModeCacheKey {
            sigma_size_h: axis_h.size,
            sigma_mode_h: axis_h.sigma_mode(),
            sigma_size_v: axis_v.size,
            sigma_mode_v: axis_v.sigma_mode(),
            spectral_density_threshold: config.spectral_density_threshold,
        };
        if self.cache.as_ref().is_some_and(|cache| cache.key == key) {
            debug!("reusing cached coherent-mode decomposition");
        } else {
            debug!("building coherent-mode decomposition");
            self.cache = Some(ModeCache::build(key)?);
            self.rebuilds += 1;
        }
        let Some(cache) = self.cache.as_ref() else {
            return Err(XwaveError::Other("coherent-mode decomposition missing".into()));
        };

        let total = cache.sorted_modes.len();
        let mut mode_index = config.mode_index;
        if mode_index >= total {
            warn!(
                "mode index {mode_index} exceeds the number of retained modes ({total}), using {}",
                total - 1
            );
            mode_index = total - 1;
        }
        let (ih, iv) = cache.sorted_modes[mode_index];
        info!("2D mode index {mode_index} corresponds to (H,V)=({ih},{iv}) modes.");
        wavefront.set_gaussian_hermite_mode(
            Length::new::<meter>(axis_h.size),
            Length::new::<meter>(axis_v.size),
            1.0,
            ih,
            iv,
            cache.model.mode_x().sigma_g() / axis_h.size,
            cache.model.mode_y().sigma_g() / axis_v.size,
        )?;
        let selection = ModeSelection {
            mode_count_h: cache.mode_count_h,
            mode_count_v: cache.mode_count_v,
            mode_index,
            mode_pair: (ih, iv),
            sorted_eigenvalues: cache.sorted_eigenvalues.clone(),
            cumulated_occupation: cache.cumulated_occupation.clone(),
            eigenvalue_map: cache.eigenvalue_map.clone(),
            coherence: Some((axis_h, axis_v)),
        };
        self.total_modes = Some(total);
        self.ready = true;
        Ok(SynthesisResult {
            wavefront,
            selection,
            radiation,
        })
    }
    /// Step to the next mode and synthesize it.
    ///
    /// After a successful run with emittances the index does not move beyond the last retained mode.
    ///
    /// # Errors
    ///
    /// see [`Self::synthesize`]
    pub fn increase_mode_index(
        &mut self,
        config: &mut SynthesizerConfig,
    ) -> XwResult<SynthesisResult> {
        config.mode_index += 1;
        if let Some(total) = self.total_modes {
            config.mode_index = config.mode_index.min(total.saturating_sub(1));
        }
        self.synthesize(config)
    }
    /// Step to the previous mode (stopping at 0) and synthesize it.
    ///
    /// # Errors
    ///
    /// see [`Self::synthesize`]
    pub fn decrease_mode_index(
        &mut self,
        config: &mut SynthesizerConfig,
    ) -> XwResult<SynthesisResult> {
        config.mode_index = config.mode_index.saturating_sub(1);
        self.synthesize(config)
    }
    /// Select the most occupied mode and synthesize it.
    ///
    /// # Errors
    ///
    /// see [`Self::synthesize`]
    pub fn reset_mode_index(&mut self, config: &mut SynthesizerConfig) -> XwResult<SynthesisResult> {
        config.mode_index = 0;
        self.synthesize(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        meter, micrometer,
        utils::test_helper::test_helper::{check_logs, check_warnings},
        wavefront::Wavefront,
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;
    use log::Level;
    use uom::si::{f64::Angle, length::micrometer};

    fn small_config() -> SynthesizerConfig {
        let axis = AxisGrid::from_range(micrometer!(-50.0), micrometer!(50.0), 41);
        SynthesizerConfig {
            grid_h: axis,
            grid_v: axis,
            ..Default::default()
        }
    }
    #[test]
    fn default_config() {
        let config = SynthesizerConfig::default();
        assert_eq!(config.grid_h.points, 100);
        assert_eq!(config.grid_v.points, 100);
        assert_relative_eq!(config.photon_energy.get::<uom::si::energy::electronvolt>(), 15000.0);
        assert_relative_eq!(config.undulator_length.get::<meter>(), 4.0);
        assert!(config.use_emittances);
        assert_relative_eq!(config.spectral_density_threshold, 0.99);
        assert_eq!(config.mode_index, 0);
        assert!(config.validate().is_ok());
    }
    #[test]
    fn config_from_yaml() {
        let config = SynthesizerConfig::from_yaml("photon_energy_ev: 8000.0\nmode_index: 3\n").unwrap();
        assert_relative_eq!(
            config.photon_energy.get::<uom::si::energy::electronvolt>(),
            8000.0,
            max_relative = 1e-12
        );
        assert_eq!(config.mode_index, 3);
        assert_eq!(config.grid_h, SynthesizerConfig::default().grid_h);
        assert_matches!(
            SynthesizerConfig::from_yaml("mode_index: [1]"),
            Err(XwaveError::Console(_))
        );
        assert_matches!(
            SynthesizerConfig::from_file(Path::new("./invalid_file_path/config.yaml")),
            Err(XwaveError::Console(_))
        );
    }
    #[test]
    fn config_from_file() {
        let config = SynthesizerConfig::from_file(Path::new("./demos/gsm_config.yaml")).unwrap();
        assert_eq!(config.grid_h, SynthesizerConfig::default().grid_h);
        assert_eq!(config.grid_v.points, 101);
        assert_eq!(config.electron_beam, ElectronBeamSigmas::default());
        assert!(config.validate().is_ok());
    }
    #[test]
    fn config_validation() {
        let mut config = small_config();
        config.spectral_density_threshold = 1.0;
        assert_matches!(
            config.validate(),
            Err(XwaveError::Validation { field, .. }) if field == "spectral_density_threshold"
        );
        let mut config = small_config();
        config.undulator_length = meter!(0.0);
        assert_matches!(
            config.validate(),
            Err(XwaveError::Validation { field, .. }) if field == "undulator_length"
        );
        let mut config = small_config();
        config.grid_v.points = 0;
        assert_matches!(
            config.validate(),
            Err(XwaveError::Validation { field, .. }) if field.starts_with("grid_v")
        );
        let mut config = small_config();
        config.electron_beam.sigma_h = meter!(-1.0);
        assert!(config.validate().is_err());
        config.use_emittances = false;
        assert!(config.validate().is_ok());
    }
    #[test]
    fn fully_coherent_source() {
        let mut synthesizer = GsmSourceSynthesizer::new();
        assert!(!synthesizer.is_ready());
        let mut config = small_config();
        config.use_emittances = false;
        config.mode_index = 7;
        let result = synthesizer.synthesize(&config).unwrap();
        assert!(synthesizer.is_ready());
        assert!(!synthesizer.has_cached_modes());
        assert_eq!(result.selection.cumulated_occupation, vec![1.0]);
        assert_eq!(result.selection.eigenvalue_map.shape(), (1, 1));
        assert_eq!(result.selection.eigenvalue_map[(0, 0)], 1.0);
        assert_eq!(result.selection.mode_pair, (0, 0));
        assert!(result.selection.coherence.is_none());
        let intensity = result.wavefront.intensity();
        assert_abs_diff_eq!(intensity[(20, 20)], 1.0, epsilon = 1e-12);
        // gaussian with the natural radiation size
        let x = result.wavefront.coordinate_x()[25];
        let expected = (-x * x / (2.0 * result.radiation.sigma * result.radiation.sigma)).exp();
        assert_relative_eq!(intensity[(25, 20)], expected, max_relative = 1e-9);
    }
    #[test]
    fn coherent_limit_of_mode_decomposition() {
        let config = small_config();
        let wavelength = photon_wavelength(config.photon_energy).unwrap();
        let radiation = RadiationSigmas::natural(wavelength, config.undulator_length).unwrap();
        let nearly_coherent = SynthesizerConfig {
            electron_beam: ElectronBeamSigmas {
                sigma_h: meter!(0.01 * radiation.sigma),
                sigma_v: meter!(0.01 * radiation.sigma),
                sigma_divergence_h: Angle::new::<radian>(0.01 * radiation.sigma_prime),
                sigma_divergence_v: Angle::new::<radian>(0.01 * radiation.sigma_prime),
            },
            ..config.clone()
        };
        let coherent = SynthesizerConfig {
            use_emittances: false,
            ..config
        };
        let mut synthesizer = GsmSourceSynthesizer::new();
        let gsm = synthesizer.synthesize(&nearly_coherent).unwrap();
        assert_eq!(gsm.selection.total_modes(), 1);
        let gaussian = synthesizer.synthesize(&coherent).unwrap();
        let gsm_intensity = gsm.wavefront.intensity();
        let gsm_intensity = &gsm_intensity / gsm_intensity.max();
        let gaussian_intensity = gaussian.wavefront.intensity();
        let gaussian_intensity = &gaussian_intensity / gaussian_intensity.max();
        for (g, c) in gsm_intensity.iter().zip(gaussian_intensity.iter()) {
            assert_abs_diff_eq!(*g, *c, epsilon = 1e-3);
        }
    }
    #[test]
    fn mode_navigation_after_coherent_run() {
        let mut synthesizer = GsmSourceSynthesizer::new();
        let mut config = small_config();
        config.use_emittances = false;
        synthesizer.synthesize(&config).unwrap();
        config.use_emittances = true;
        let result = synthesizer.increase_mode_index(&mut config).unwrap();
        assert_eq!(config.mode_index, 1);
        assert_eq!(result.selection.mode_index, 1);
        let result = synthesizer.increase_mode_index(&mut config).unwrap();
        assert_eq!(result.selection.mode_index, 2);
    }
    #[test]
    fn mode_decomposition() {
        let mut synthesizer = GsmSourceSynthesizer::new();
        let result = synthesizer.synthesize(&small_config()).unwrap();
        let selection = &result.selection;
        assert_eq!(selection.mode_count_h, 59);
        assert_eq!(selection.mode_count_v, 5);
        assert_eq!(selection.total_modes(), 59 * 5);
        assert_eq!(selection.mode_pair, (0, 0));
        assert_eq!(
            selection.eigenvalue_map.shape(),
            (selection.mode_count_h, selection.mode_count_v)
        );
        assert!(selection
            .cumulated_occupation
            .windows(2)
            .all(|w| w[0] <= w[1]));
        assert_eq!(selection.cumulated_occupation.last().copied(), Some(1.0));
        assert!(selection
            .sorted_eigenvalues
            .windows(2)
            .all(|w| w[0] >= w[1]));
        let (h, v) = selection.coherence.unwrap();
        assert!(h.coherence_fraction < v.coherence_fraction);
        assert_relative_eq!(
            selection.sorted_eigenvalues[0],
            selection.eigenvalue_map[(0, 0)],
            max_relative = 1e-12
        );
        assert_eq!(result.wavefront.shape(), (41, 41));
    }
    #[test]
    fn cache_reused_for_mode_navigation() {
        let mut synthesizer = GsmSourceSynthesizer::new();
        let mut config = small_config();
        let first = synthesizer.synthesize(&config).unwrap();
        assert_eq!(synthesizer.rebuild_count(), 1);
        let second = synthesizer.increase_mode_index(&mut config).unwrap();
        assert_eq!(config.mode_index, 1);
        assert_eq!(synthesizer.rebuild_count(), 1);
        assert_eq!(
            first.selection.cumulated_occupation,
            second.selection.cumulated_occupation
        );
        assert_eq!(first.selection.eigenvalue_map, second.selection.eigenvalue_map);
        assert_ne!(first.selection.mode_pair, second.selection.mode_pair);
        assert_ne!(first.wavefront, second.wavefront);
        synthesizer.decrease_mode_index(&mut config).unwrap();
        assert_eq!(config.mode_index, 0);
        synthesizer.decrease_mode_index(&mut config).unwrap();
        assert_eq!(config.mode_index, 0);
        config.mode_index = 10;
        synthesizer.reset_mode_index(&mut config).unwrap();
        assert_eq!(config.mode_index, 0);
        assert_eq!(synthesizer.rebuild_count(), 1);
        // grid or photon energy independent parameters do not invalidate the decomposition
        config.grid_h = AxisGrid::from_range(micrometer!(-20.0), micrometer!(20.0), 21);
        synthesizer.synthesize(&config).unwrap();
        assert_eq!(synthesizer.rebuild_count(), 1);
        config.spectral_density_threshold = 0.9;
        let third = synthesizer.synthesize(&config).unwrap();
        assert_eq!(synthesizer.rebuild_count(), 2);
        assert!(third.selection.total_modes() < first.selection.total_modes());
    }
    #[test]
    fn cache_hit_and_miss_are_logged() {
        testing_logger::setup();
        let mut synthesizer = GsmSourceSynthesizer::new();
        let mut config = small_config();
        synthesizer.synthesize(&config).unwrap();
        config.mode_index = 2;
        synthesizer.synthesize(&config).unwrap();
        check_logs(
            Level::Debug,
            &[
                "building coherent-mode decomposition",
                "reusing cached coherent-mode decomposition",
            ],
        );
    }
    #[test]
    fn mode_index_is_clamped() {
        testing_logger::setup();
        let mut synthesizer = GsmSourceSynthesizer::new();
        let mut config = small_config();
        config.spectral_density_threshold = 0.5;
        config.mode_index = 100_000;
        let result = synthesizer.synthesize(&config).unwrap();
        let total = result.selection.total_modes();
        assert_eq!(result.selection.mode_index, total - 1);
        check_warnings(vec![&format!(
            "mode index 100000 exceeds the number of retained modes ({total}), using {}",
            total - 1
        )]);
        config.mode_index = total - 1;
        synthesizer.increase_mode_index(&mut config).unwrap();
        assert_eq!(config.mode_index, total - 1);
    }
    #[test]
    fn vanishing_emittance_is_rejected() {
        let mut synthesizer = GsmSourceSynthesizer::new();
        let mut config = small_config();
        config.electron_beam.sigma_h = meter!(0.0);
        config.electron_beam.sigma_divergence_h = Angle::new::<radian>(0.0);
        assert_matches!(
            synthesizer.synthesize(&config),
            Err(XwaveError::Validation { field, .. }) if field == "coherence_fraction_h"
        );
        assert!(!synthesizer.has_cached_modes());
        assert!(!synthesizer.is_ready());
    }
    #[test]
    fn failed_run_keeps_cache() {
        let mut synthesizer = GsmSourceSynthesizer::new();
        let mut config = small_config();
        synthesizer.synthesize(&config).unwrap();
        config.electron_beam.sigma_v = meter!(0.0);
        config.electron_beam.sigma_divergence_v = Angle::new::<radian>(0.0);
        assert!(synthesizer.synthesize(&config).is_err());
        assert!(synthesizer.has_cached_modes());
        config.electron_beam = ElectronBeamSigmas::default();
        synthesizer.synthesize(&config).unwrap();
        assert_eq!(synthesizer.rebuild_count(), 1);
    }
    #[test]
    fn wavelength_of_result() {
        let mut synthesizer = GsmSourceSynthesizer::new();
        let result = synthesizer.synthesize(&small_config()).unwrap();
        assert_relative_eq!(
            result.wavefront.wavelength().get::<micrometer>(),
            1.239_841_984_332_003 / 15000.0,
            max_relative = 1e-9
        );
    }
}
