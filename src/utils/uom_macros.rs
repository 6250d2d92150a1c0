#![warn(missing_docs)]
//! Macros for the creation of single `uom` quantities (or vectors of them) in a given unit
/// helper macro to create the quantities
#[macro_export]
macro_rules! uom_quantity_creator {
    ($unit:ident, $quantity:ident, $val1:expr) => {
        $quantity::new::<$unit>($val1)
    };
    ($unit:ident, $quantity:ident, $( $x:expr ),*) => {
        {
            let mut temp_vec = std::vec::Vec::new();
            $(
                temp_vec.push($quantity::new::<$unit>($x));
            )*
            temp_vec
        }
    };
}
///macro to create a Length in meter
#[macro_export]
macro_rules! meter {
    ($( $x:expr ),*) => {{
        use uom::si::{f64::Length, length::meter};
        $crate::uom_quantity_creator![meter, Length, $( $x ),*]
    }};
}
///macro to create a Length in millimeter
#[macro_export]
macro_rules! millimeter {
    ($( $x:expr ),*) => {{
        use uom::si::{f64::Length, length::millimeter};
        $crate::uom_quantity_creator![millimeter, Length, $( $x ),*]
    }};
}
///macro to create a Length in micrometer
#[macro_export]
macro_rules! micrometer {
    ($( $x:expr ),*) => {{
        use uom::si::{f64::Length, length::micrometer};
        $crate::uom_quantity_creator![micrometer, Length, $( $x ),*]
    }};
}
///macro to create a Length in nanometer
#[macro_export]
macro_rules! nanometer {
    ($( $x:expr ),*) => {{
        use uom::si::{f64::Length, length::nanometer};
        $crate::uom_quantity_creator![nanometer, Length, $( $x ),*]
    }};
}
///macro to create a (photon) Energy in electronvolt
#[macro_export]
macro_rules! electronvolt {
    ($( $x:expr ),*) => {{
        use uom::si::{energy::electronvolt, f64::Energy};
        $crate::uom_quantity_creator![electronvolt, Energy, $( $x ),*]
    }};
}
///macro to create a (photon) Energy in kiloelectronvolt
#[macro_export]
macro_rules! kiloelectronvolt {
    ($( $x:expr ),*) => {{
        use uom::si::{energy::kiloelectronvolt, f64::Energy};
        $crate::uom_quantity_creator![kiloelectronvolt, Energy, $( $x ),*]
    }};
}
