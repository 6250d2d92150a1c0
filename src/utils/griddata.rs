//! Construction of equidistant sampling axes.
use crate::error::{XwResult, XwaveError};
use crate::utils::usize_to_f64;
use log::warn;
use nalgebra::DVector;

/// Creates a linearly spaced Vector (Matrix with 1 column and `num` rows) from `start` to `end` (both included).
/// # Attributes
/// - `start`:  Start value of the array
/// - `end`:    end value of the array
/// - `num`:    number of elements
///
/// # Errors
/// This function returns an error if `start` or `end` are not finite.
pub fn linspace(start: f64, end: f64, num: usize) -> XwResult<DVector<f64>> {
    if !start.is_finite() || !end.is_finite() {
        return Err(XwaveError::Other(
            "start and end values must be finite!".into(),
        ));
    }
    if num < 2 {
        warn!("Using linspace with less than two elements results in an empty Vector for num=0 or a Vector with one entry being num=start");
        return Ok(DVector::from_element(num, start));
    }
    let bin_size = (end - start) / usize_to_f64(num - 1);
    let mut axis = DVector::from_fn(num, |i, _| usize_to_f64(i).mul_add(bin_size, start));
    // pin the last sample against accumulated rounding
    axis[num - 1] = end;
    Ok(axis)
}

/// Creates an axis of `num` samples `start + i * step`.
///
/// # Errors
/// This function returns an error if `start` or `step` are not finite.
pub fn arange_steps(start: f64, step: f64, num: usize) -> XwResult<DVector<f64>> {
    if !start.is_finite() || !step.is_finite() {
        return Err(XwaveError::Other(
            "start and step values must be finite!".into(),
        ));
    }
    Ok(DVector::from_fn(num, |i, _| {
        usize_to_f64(i).mul_add(step, start)
    }))
}
