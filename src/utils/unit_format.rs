//! Text formatting of floating point values.

fn strip_trailing_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Format a value like the C `printf` conversion `%g` (six significant digits).
///
/// Exponential notation is used if the decimal exponent is below -4 or not smaller than the precision.
/// Trailing zeros (and a trailing decimal point) are removed.
///
/// # Example
/// ```
/// use xwave::utils::unit_format::format_g;
///
/// assert_eq!(format_g(0.5), "0.5");
/// assert_eq!(format_g(1.47e-3), "0.00147");
/// assert_eq!(format_g(-2.5e-5), "-2.5e-05");
/// assert_eq!(format_g(1234567.0), "1.23457e+06");
/// ```
#[must_use]
pub fn format_g(value: f64) -> String {
    const PRECISION: i32 = 6;
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-inf" } else { "inf" }.into();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.into();
    }
    // the exponent has to be taken after rounding to the requested precision
    let scientific = format!("{:.*e}", (PRECISION - 1).unsigned_abs() as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    if (-4..PRECISION).contains(&exponent) {
        let decimals = (PRECISION - 1 - exponent).unsigned_abs() as usize;
        strip_trailing_zeros(&format!("{value:.decimals$}")).to_owned()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.unsigned_abs()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn fixed_notation() {
        assert_eq!(format_g(1.0), "1");
        assert_eq!(format_g(10.0), "10");
        assert_eq!(format_g(-0.25), "-0.25");
        assert_eq!(format_g(123456.0), "123456");
        assert_eq!(format_g(0.0001), "0.0001");
        assert_eq!(format_g(3.14159265), "3.14159");
    }
    #[test]
    fn exponential_notation() {
        assert_eq!(format_g(0.00001), "1e-05");
        assert_eq!(format_g(5.3e-7), "5.3e-07");
        assert_eq!(format_g(1e100), "1e+100");
        assert_eq!(format_g(-1.234567e-12), "-1.23457e-12");
    }
    #[test]
    fn special_values() {
        assert_eq!(format_g(0.0), "0");
        assert_eq!(format_g(-0.0), "-0");
        assert_eq!(format_g(f64::NAN), "nan");
        assert_eq!(format_g(f64::INFINITY), "inf");
        assert_eq!(format_g(f64::NEG_INFINITY), "-inf");
    }
}
