//! Serde adapters storing `uom` quantities in the units used in job files.

/// (De)serialize a photon [`Energy`](uom::si::f64::Energy) as a plain number in electronvolt.
pub mod electronvolt_value {
    use serde::{Deserialize, Deserializer, Serializer};
    use uom::si::{energy::electronvolt, f64::Energy};

    /// Serialize the energy in eV.
    ///
    /// # Errors
    /// This function only forwards errors of the given serializer.
    pub fn serialize<S: Serializer>(energy: &Energy, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(energy.get::<electronvolt>())
    }
    /// Deserialize an energy given in eV.
    ///
    /// # Errors
    /// This function returns an error if the value is not a number.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Energy, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Energy::new::<electronvolt>(value))
    }
}
