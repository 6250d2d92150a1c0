//! Thickness profile of a refractive corrector.
use crate::{
    error::{XwResult, XwaveError},
    utils::unit_format::format_g,
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;
use nalgebra::DVector;
use std::{io::Write, path::Path};

/// Corrector thickness (in meter) at each sample position (in meter).
#[derive(Debug, Clone, PartialEq)]
pub struct HeightProfile {
    positions: DVector<f64>,
    heights: DVector<f64>,
}
impl HeightProfile {
    /// Creates a new [`HeightProfile`].
    ///
    /// # Errors
    ///
    /// This function returns an error if positions and heights differ in length.
    pub fn new(positions: DVector<f64>, heights: DVector<f64>) -> XwResult<Self> {
        if positions.len() != heights.len() {
            return Err(XwaveError::validation(
                "heights",
                format!("{} samples", heights.len()),
                &format!("must match the {} positions", positions.len()),
            ));
        }
        Ok(Self { positions, heights })
    }
    /// A flat profile of zero thickness.
    #[must_use]
    pub fn flat(positions: DVector<f64>) -> Self {
        let heights = DVector::zeros(positions.len());
        Self { positions, heights }
    }
    /// Returns the sample positions.
    #[must_use]
    pub const fn positions(&self) -> &DVector<f64> {
        &self.positions
    }
    /// Returns the heights.
    #[must_use]
    pub const fn heights(&self) -> &DVector<f64> {
        &self.heights
    }
    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }
    /// Returns `true` if the profile has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
    /// Write the profile as lines `"<position> <height>\n"` formatted like `%g`, without header.
    ///
    /// # Errors
    ///
    /// This function returns an error if writing fails.
    pub fn write<W: Write>(&self, writer: W) -> XwResult<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(b' ')
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);
        for (x, h) in self.positions.iter().zip(self.heights.iter()) {
            writer
                .write_record([format_g(*x), format_g(*h)])
                .map_err(|e| XwaveError::Console(format!("writing height profile failed: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| XwaveError::Console(format!("writing height profile failed: {e}")))
    }
    /// Write the profile to a file (see [`Self::write`]).
    ///
    /// # Errors
    ///
    /// This function returns an error if the file cannot be created or written.
    pub fn write_to_file(&self, path: &Path) -> XwResult<()> {
        let file = std::fs::File::create(path).map_err(|e| {
            XwaveError::Console(format!("cannot create file {} : {}", path.display(), e))
        })?;
        self.write(file)?;
        info!("File {} written to disk", path.display());
        Ok(())
    }
}
