//! Definition of sampling axes.
use crate::error::{XwResult, XwaveError};
use crate::utils::griddata::{arange_steps, linspace};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::meter};

/// The two (mutually exclusive) ways to place the samples of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GridInit {
    /// equidistant samples from `from` to `to` (both included)
    Range {
        /// first sample
        from: Length,
        /// last sample
        to: Length,
    },
    /// samples at `start + i * step`
    Steps {
        /// first sample
        start: Length,
        /// distance between two samples
        step: Length,
    },
}

/// A sampled axis: placement policy plus number of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisGrid {
    /// placement of the samples
    pub init: GridInit,
    /// number of samples
    pub points: usize,
}
impl AxisGrid {
    /// Creates an axis with `points` samples between `from` and `to`.
    #[must_use]
    pub const fn from_range(from: Length, to: Length, points: usize) -> Self {
        Self {
            init: GridInit::Range { from, to },
            points,
        }
    }
    /// Creates an axis with `points` samples starting at `start` with distance `step`.
    #[must_use]
    pub const fn from_steps(start: Length, step: Length, points: usize) -> Self {
        Self {
            init: GridInit::Steps { start, step },
            points,
        }
    }
    /// Check the axis definition. `axis` is used as prefix of the field names in the returned error.
    ///
    /// # Errors
    ///
    /// This function returns a [`XwaveError::Validation`] if
    ///   - the number of points is zero
    ///   - a range end is not greater than its start
    ///   - a step is not strictly positive
    ///   - any of the values is not finite
    pub fn validate(&self, axis: &str) -> XwResult<()> {
        if self.points == 0 {
            return Err(XwaveError::validation(
                &format!("{axis}.points"),
                self.points,
                "number of points must be strictly positive",
            ));
        }
        match self.init {
            GridInit::Range { from, to } => {
                let (from, to) = (from.get::<meter>(), to.get::<meter>());
                if !from.is_finite() {
                    return Err(XwaveError::validation(
                        &format!("{axis}.from"),
                        format!("{from} m"),
                        "must be finite",
                    ));
                }
                if !to.is_finite() || to <= from {
                    return Err(XwaveError::validation(
                        &format!("{axis}.to"),
                        format!("{to} m"),
                        &format!("must be finite and greater than range start ({from} m)"),
                    ));
                }
            }
            GridInit::Steps { start, step } => {
                let (start, step) = (start.get::<meter>(), step.get::<meter>());
                if !start.is_finite() {
                    return Err(XwaveError::validation(
                        &format!("{axis}.start"),
                        format!("{start} m"),
                        "must be finite",
                    ));
                }
                if !step.is_normal() || step.is_sign_negative() {
                    return Err(XwaveError::validation(
                        &format!("{axis}.step"),
                        format!("{step} m"),
                        "must be strictly positive and finite",
                    ));
                }
            }
        }
        Ok(())
    }
    /// Returns the sample coordinates of this axis in meter.
    ///
    /// # Errors
    ///
    /// This function returns an error if the axis definition is invalid (see [`AxisGrid::validate`]).
    pub fn coordinates(&self) -> XwResult<DVector<f64>> {
        self.validate("grid")?;
        match self.init {
            GridInit::Range { from, to } => {
                linspace(from.get::<meter>(), to.get::<meter>(), self.points)
            }
            GridInit::Steps { start, step } => {
                arange_steps(start.get::<meter>(), step.get::<meter>(), self.points)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{meter, micrometer};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    #[test]
    fn range_coordinates() {
        let grid = AxisGrid::from_range(micrometer!(-50.0), micrometer!(50.0), 101);
        let x = grid.coordinates().unwrap();
        assert_eq!(x.len(), 101);
        assert_abs_diff_eq!(x[0], -5e-5, epsilon = 1e-18);
        assert_abs_diff_eq!(x[50], 0.0, epsilon = 1e-18);
        assert_abs_diff_eq!(x[100], 5e-5, epsilon = 1e-18);
    }
    #[test]
    fn steps_coordinates() {
        let grid = AxisGrid::from_steps(micrometer!(-500.0), micrometer!(1.0), 3);
        let x = grid.coordinates().unwrap();
        assert_abs_diff_eq!(x[2], -4.98e-4, epsilon = 1e-15);
    }
    #[test]
    fn invalid_range() {
        let grid = AxisGrid::from_range(meter!(1.0), meter!(1.0), 10);
        assert_matches!(
            grid.validate("h"),
            Err(XwaveError::Validation { field, .. }) if field == "h.to"
        );
        let grid = AxisGrid::from_range(meter!(1.0), meter!(0.5), 10);
        assert!(grid.coordinates().is_err());
        let grid = AxisGrid::from_range(meter!(f64::NAN), meter!(0.5), 10);
        assert_matches!(
            grid.validate("v"),
            Err(XwaveError::Validation { field, .. }) if field == "v.from"
        );
    }
    #[test]
    fn invalid_steps_and_points() {
        let grid = AxisGrid::from_steps(meter!(0.0), meter!(0.0), 10);
        assert_matches!(
            grid.validate("h"),
            Err(XwaveError::Validation { field, .. }) if field == "h.step"
        );
        let grid = AxisGrid::from_steps(meter!(0.0), meter!(-1e-6), 10);
        assert!(grid.validate("h").is_err());
        let grid = AxisGrid::from_range(meter!(0.0), meter!(1.0), 0);
        assert_matches!(
            grid.validate("h"),
            Err(XwaveError::Validation { field, .. }) if field == "h.points"
        );
    }
    #[test]
    fn yaml() {
        let grid: AxisGrid =
            serde_yaml::from_str("init: !Range\n  from: -5.0e-5\n  to: 5.0e-5\npoints: 100")
                .unwrap();
        assert_eq!(grid.points, 100);
        assert_matches!(grid.init, GridInit::Range { .. });
    }
}
