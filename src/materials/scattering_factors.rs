//! Refractive indices computed from atomic scattering factors.
use super::RefractiveIndexDatabase;
use crate::{
    error::{XwResult, XwaveError},
    wavefront::PLANCK_HC_EV_M,
};
use log::warn;
use num::Complex;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, f64::consts::PI, fs, path::Path};

/// Classical electron radius in m.
const ELECTRON_RADIUS: f64 = 2.817_940_326_2e-15;
/// Avogadro constant in 1/mol.
const AVOGADRO: f64 = 6.022_140_76e23;

/// symbol, atomic number, atomic mass (g/mol), density (g/cm³)
const ELEMENTS: [(&str, u32, f64, f64); 3] = [
    ("Be", 4, 9.012_182, 1.848),
    ("Al", 13, 26.981_538, 2.699),
    ("C", 6, 12.0107, 2.267),
];

/// Tabulated anomalous scattering factors `f1`, `f2` of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatteringTable {
    energy_kev: Vec<f64>,
    f1: Vec<f64>,
    f2: Vec<f64>,
}
impl ScatteringTable {
    /// Creates a new [`ScatteringTable`].
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///   - the columns differ in length or hold fewer than two rows
    ///   - the energies are not strictly positive and strictly ascending
    pub fn new(energy_kev: Vec<f64>, f1: Vec<f64>, f2: Vec<f64>) -> XwResult<Self> {
        let table = Self { energy_kev, f1, f2 };
        table.validate()?;
        Ok(table)
    }
    fn validate(&self) -> XwResult<()> {
        if self.f1.len() != self.energy_kev.len() || self.f2.len() != self.energy_kev.len() {
            return Err(XwaveError::validation(
                "scattering_table",
                format!(
                    "{} / {} / {} rows",
                    self.energy_kev.len(),
                    self.f1.len(),
                    self.f2.len()
                ),
                "energy, f1 and f2 columns must have the same length",
            ));
        }
        if self.energy_kev.len() < 2 {
            return Err(XwaveError::validation(
                "scattering_table",
                format!("{} rows", self.energy_kev.len()),
                "at least two rows needed",
            ));
        }
        if self.energy_kev.iter().any(|e| !e.is_normal() || *e < 0.0)
            || self.energy_kev.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(XwaveError::validation(
                "scattering_table.energy_kev",
                format!("{:?}", self.energy_kev),
                "energies must be strictly positive and strictly ascending",
            ));
        }
        Ok(())
    }
    /// Interpolate `(f1, f2)` linearly in `ln(energy)`.
    ///
    /// Returns `None` if the energy lies outside the tabulated range.
    #[must_use]
    pub fn interpolate(&self, energy_kev: f64) -> Option<(f64, f64)> {
        let first = *self.energy_kev.first()?;
        let last = *self.energy_kev.last()?;
        if !(energy_kev >= first && energy_kev <= last) {
            return None;
        }
        let upper = self
            .energy_kev
            .partition_point(|e| *e < energy_kev)
            .clamp(1, self.energy_kev.len() - 1);
        let lower = upper - 1;
        let (e0, e1) = (self.energy_kev[lower].ln(), self.energy_kev[upper].ln());
        let t = (energy_kev.ln() - e0) / (e1 - e0);
        let f1 = (self.f1[upper] - self.f1[lower]).mul_add(t, self.f1[lower]);
        let f2 = (self.f2[upper] - self.f2[lower]).mul_add(t, self.f2[lower]);
        Some((f1, f2))
    }
}

/// Built-in material database for Be, Al and C.
///
/// Without a loaded [`ScatteringTable`] the free electron limit `f1 = Z`, `f2 = 0` is used, which is adequate for
/// hard X-rays far from absorption edges but neglects absorption. Every such lookup is logged as a warning.
/// Tables with absorption (e.g. exported from Henke or Chantler data) are loaded with
/// [`ScatteringFactorDatabase::load_tables_from_file`].
#[derive(Debug, Clone, Default)]
pub struct ScatteringFactorDatabase {
    tables: HashMap<String, ScatteringTable>,
}
impl ScatteringFactorDatabase {
    /// Creates a new [`ScatteringFactorDatabase`] without scattering tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add (or replace) the scattering table of an element.
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Collaborator`] if the element is not part of the database.
    pub fn insert_table(&mut self, symbol: &str, table: ScatteringTable) -> XwResult<()> {
        element(symbol)?;
        self.tables.insert(symbol.to_owned(), table);
        Ok(())
    }
    /// Load scattering tables from a YAML map `symbol -> {energy_kev, f1, f2}`.
    ///
    /// # Errors
    ///
    /// This function returns an error if the document cannot be parsed, a table is malformed or an element is
    /// unknown.
    pub fn load_tables_from_yaml(&mut self, yaml: &str) -> XwResult<()> {
        let tables: HashMap<String, ScatteringTable> = serde_yaml::from_str(yaml).map_err(|e| {
            XwaveError::Collaborator(format!("parsing of scattering tables failed: {e}"))
        })?;
        for (symbol, table) in tables {
            table.validate()?;
            self.insert_table(&symbol, table)?;
        }
        Ok(())
    }
    /// Load scattering tables from a YAML file (see [`Self::load_tables_from_yaml`]).
    ///
    /// # Errors
    ///
    /// This function returns an error if the file is not readable or its content is invalid.
    pub fn load_tables_from_file(&mut self, path: &Path) -> XwResult<()> {
        let contents = fs::read_to_string(path).map_err(|e| {
            XwaveError::Collaborator(format!("cannot read file {} : {}", path.display(), e))
        })?;
        self.load_tables_from_yaml(&contents)
    }
    fn scattering_factors(&self, symbol: &str, energy_kev: f64) -> XwResult<(f64, f64)> {
        let (z, _, _) = element(symbol)?;
        self.tables.get(symbol).map_or_else(
            || {
                warn!(
                    "no scattering table for {symbol}, using the free electron limit f1 = {z}, f2 = 0 (absorption neglected)"
                );
                Ok((f64::from(z), 0.0))
            },
            |table| {
                table.interpolate(energy_kev).ok_or_else(|| {
                    XwaveError::Collaborator(format!(
                        "photon energy {energy_kev} keV outside of the scattering table of {symbol}"
                    ))
                })
            },
        )
    }
}

fn element(symbol: &str) -> XwResult<(u32, f64, f64)> {
    ELEMENTS
        .iter()
        .find(|(s, ..)| *s == symbol)
        .map(|(_, z, mass, density)| (*z, *mass, *density))
        .ok_or_else(|| XwaveError::Collaborator(format!("element {symbol} not in database")))
}

impl RefractiveIndexDatabase for ScatteringFactorDatabase {
    fn element_density(&self, symbol: &str) -> XwResult<f64> {
        element(symbol).map(|(_, _, density)| density)
    }
    fn complex_refractive_index(
        &self,
        symbol: &str,
        energy_kev: f64,
        density: f64,
    ) -> XwResult<Complex<f64>> {
        if !energy_kev.is_normal() || energy_kev < 0.0 {
            return Err(XwaveError::Collaborator(format!(
                "invalid photon energy {energy_kev} keV"
            )));
        }
        let (_, atomic_mass, _) = element(symbol)?;
        let (f1, f2) = self.scattering_factors(symbol, energy_kev)?;
        let wavelength = PLANCK_HC_EV_M / (energy_kev * 1e3);
        let atoms_per_m3 = density * 1e6 / atomic_mass * AVOGADRO;
        let k = ELECTRON_RADIUS * wavelength * wavelength * atoms_per_m3 / (2.0 * PI);
        Ok(Complex::new(1.0 - k * f1, k * f2))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::test_helper::test_helper::check_warnings;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    #[test]
    fn densities() {
        let db = ScatteringFactorDatabase::new();
        assert_eq!(db.element_density("Be").unwrap(), 1.848);
        assert_eq!(db.element_density("Al").unwrap(), 2.699);
        assert_eq!(db.element_density("C").unwrap(), 2.267);
        assert_matches!(db.element_density("Xx"), Err(XwaveError::Collaborator(_)));
    }
    #[test]
    fn free_electron_limit() {
        let db = ScatteringFactorDatabase::new();
        let n = db.complex_refractive_index("Be", 15.0, 1.848).unwrap();
        // δ(Be, 15 keV) is about 1.5e-6
        assert_relative_eq!(1.0 - n.re, 1.513e-6, max_relative = 1e-2);
        assert_eq!(n.im, 0.0);
        let n_dense = db.complex_refractive_index("Be", 15.0, 2.0 * 1.848).unwrap();
        assert_relative_eq!(1.0 - n_dense.re, 2.0 * (1.0 - n.re), max_relative = 1e-9);
        let n_soft = db.complex_refractive_index("Be", 7.5, 1.848).unwrap();
        assert_relative_eq!(1.0 - n_soft.re, 4.0 * (1.0 - n.re), max_relative = 1e-9);
        assert!(db.complex_refractive_index("Be", 0.0, 1.848).is_err());
    }
    #[test]
    fn free_electron_limit_is_logged() {
        testing_logger::setup();
        let mut db = ScatteringFactorDatabase::new();
        db.complex_refractive_index("Al", 12.0, 2.699).unwrap();
        check_warnings(vec![
            "no scattering table for Al, using the free electron limit f1 = 13, f2 = 0 (absorption neglected)",
        ]);
        testing_logger::setup();
        db.insert_table(
            "Al",
            ScatteringTable::new(vec![10.0, 20.0], vec![13.2, 13.1], vec![0.5, 0.1]).unwrap(),
        )
        .unwrap();
        db.complex_refractive_index("Al", 12.0, 2.699).unwrap();
        check_warnings(vec![]);
    }
    #[test]
    fn table_validation() {
        assert!(ScatteringTable::new(vec![1.0, 2.0], vec![4.0, 4.0], vec![0.1, 0.05]).is_ok());
        assert_matches!(
            ScatteringTable::new(vec![1.0, 2.0], vec![4.0], vec![0.1, 0.05]),
            Err(XwaveError::Validation { .. })
        );
        assert!(ScatteringTable::new(vec![1.0], vec![4.0], vec![0.1]).is_err());
        assert!(ScatteringTable::new(vec![2.0, 1.0], vec![4.0, 4.0], vec![0.1, 0.05]).is_err());
        assert!(ScatteringTable::new(vec![0.0, 1.0], vec![4.0, 4.0], vec![0.1, 0.05]).is_err());
    }
    #[test]
    fn log_interpolation() {
        let table =
            ScatteringTable::new(vec![1.0, 100.0], vec![2.0, 4.0], vec![1.0, 0.0]).unwrap();
        let (f1, f2) = table.interpolate(10.0).unwrap();
        assert_relative_eq!(f1, 3.0, max_relative = 1e-12);
        assert_relative_eq!(f2, 0.5, max_relative = 1e-12);
        assert_eq!(table.interpolate(1.0), Some((2.0, 1.0)));
        let (f1, _) = table.interpolate(100.0).unwrap();
        assert_relative_eq!(f1, 4.0, max_relative = 1e-12);
        assert_eq!(table.interpolate(0.5), None);
        assert_eq!(table.interpolate(100.5), None);
        assert_eq!(table.interpolate(f64::NAN), None);
    }
    #[test]
    fn tables_from_yaml() {
        let mut db = ScatteringFactorDatabase::new();
        db.load_tables_from_yaml("Be:\n  energy_kev: [10.0, 20.0]\n  f1: [4.0, 4.0]\n  f2: [0.001, 0.0005]\n")
            .unwrap();
        let n = db.complex_refractive_index("Be", 15.0, 1.848).unwrap();
        assert!(n.im > 0.0);
        assert_matches!(
            db.complex_refractive_index("Be", 30.0, 1.848),
            Err(XwaveError::Collaborator(_))
        );
        // elements without table keep the free electron limit
        assert_eq!(db.complex_refractive_index("Al", 30.0, 2.699).unwrap().im, 0.0);
        assert_matches!(
            db.load_tables_from_yaml("Xx:\n  energy_kev: [10.0, 20.0]\n  f1: [4.0, 4.0]\n  f2: [0.0, 0.0]\n"),
            Err(XwaveError::Collaborator(_))
        );
        assert!(db.load_tables_from_yaml("Be: [1, 2]").is_err());
        assert!(db
            .load_tables_from_file(Path::new("./invalid_file_path/tables.yaml"))
            .is_err());
    }
}
