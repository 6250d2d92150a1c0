//! Module for additional computational capabilities
pub mod griddata;
pub mod math_utils;
pub mod phase;
pub mod test_helper;
pub mod unit_format;
pub mod uom_serde;
pub mod uom_macros;
pub use math_utils::{f64_to_usize, usize_to_f64};
