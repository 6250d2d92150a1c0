//! Plain text export of sampled data.
//!
//! All files are space separated, one sample (or matrix row) per line, numbers formatted like `%g`.
use crate::{
    error::{XwResult, XwaveError},
    utils::unit_format::format_g,
};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use log::info;
use nalgebra::{DMatrix, DVector};
use std::{fs::File, path::Path};

fn text_writer(path: &Path) -> XwResult<Writer<File>> {
    WriterBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .flexible(false)
        .from_path(path)
        .map_err(|e| XwaveError::Console(format!("cannot create file {} : {}", path.display(), e)))
}

fn write_error(path: &Path, e: &csv::Error) -> XwaveError {
    XwaveError::Console(format!("writing {} failed: {e}", path.display()))
}

/// Write equally long vectors as columns.
///
/// # Errors
///
/// This function returns an error if the columns differ in length or the file cannot be written.
pub fn write_columns(path: &Path, columns: &[&DVector<f64>]) -> XwResult<()> {
    let rows = columns.first().map_or(0, |c| c.len());
    if let Some(column) = columns.iter().find(|c| c.len() != rows) {
        return Err(XwaveError::validation(
            "columns",
            format!("{} rows", column.len()),
            &format!("all columns must have {rows} rows"),
        ));
    }
    let mut writer = text_writer(path)?;
    for row in 0..rows {
        writer
            .write_record(columns.iter().map(|c| format_g(c[row])))
            .map_err(|e| write_error(path, &e))?;
    }
    writer
        .flush()
        .map_err(|e| XwaveError::Console(format!("writing {} failed: {e}", path.display())))?;
    info!("File {} written to disk", path.display());
    Ok(())
}

/// Write a matrix, one matrix row per line.
///
/// # Errors
///
/// This function returns an error if the file cannot be written.
pub fn write_matrix(path: &Path, matrix: &DMatrix<f64>) -> XwResult<()> {
    let mut writer = text_writer(path)?;
    for row in matrix.row_iter() {
        writer
            .write_record(row.iter().map(|v| format_g(*v)))
            .map_err(|e| write_error(path, &e))?;
    }
    writer
        .flush()
        .map_err(|e| XwaveError::Console(format!("writing {} failed: {e}", path.display())))?;
    info!("File {} written to disk", path.display());
    Ok(())
}
