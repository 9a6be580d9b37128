//! Fixed-precision number formatting for display fields.
//!
//! Results are shown with a fixed number of decimals. Rounding follows the
//! form surface the values are displayed on: the nearest representable
//! decimal, with exact binary ties rounded away from zero (`0.125` to two
//! decimals is `0.13`). Rust's `{:.N}` rounds exact ties to even, so those
//! are handled separately.

/// Largest scaled magnitude for which an exact tie can still be resolved
/// with integer arithmetic (2^53).
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

/// Formats `value` with exactly `digits` decimals.
///
/// - Exact ties round away from zero.
/// - Negative zero prints without a sign.
/// - NaN and infinities print as `NaN`, `Infinity` and `-Infinity`.
///
/// # Examples
///
/// ```
/// use u_endotoxin::format::to_fixed;
///
/// assert_eq!(to_fixed(25.0, 4), "25.0000");
/// assert_eq!(to_fixed(2.5, 0), "3");
/// assert_eq!(to_fixed(0.125, 2), "0.13");
/// assert_eq!(to_fixed(1.005, 2), "1.00"); // 1.005 is stored as 1.00499...
/// assert_eq!(to_fixed(-0.0, 2), "0.00");
/// ```
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits, 0.0);
    }

    if let Some(n) = tie_rounded_away(value.abs(), digits) {
        let sign = if value < 0.0 { "-" } else { "" };
        if digits == 0 {
            return format!("{sign}{n}");
        }
        let div = 10u64.pow(digits as u32);
        return format!("{sign}{}.{:0width$}", n / div, n % div, width = digits);
    }

    let s = format!("{:.*}", digits, value);
    // A tiny negative value rounds to "-0.00"; drop the sign like the zero case.
    if s.starts_with('-') && s[1..].bytes().all(|b| b == b'0' || b == b'.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// Formats `fraction * 100` with `digits` decimals and a trailing `%`.
///
/// ```
/// use u_endotoxin::format::to_percent;
///
/// assert_eq!(to_percent(0.0304, 2), "3.04%");
/// ```
pub fn to_percent(fraction: f64, digits: usize) -> String {
    format!("{}%", to_fixed(fraction * 100.0, digits))
}

/// If `magnitude` lies exactly halfway between two `digits`-decimal values,
/// returns the larger one scaled by `10^digits`.
fn tie_rounded_away(magnitude: f64, digits: usize) -> Option<u64> {
    // 10^(digits + 1) must itself be exact.
    if digits > 14 {
        return None;
    }
    let scale = 10f64.powi(digits as i32 + 1);
    let scaled = magnitude * scale;
    if scaled >= MAX_EXACT {
        return None;
    }
    // fma yields the exact rounding error of the product.
    let exact = magnitude.mul_add(scale, -scaled) == 0.0;
    if exact && scaled.fract() == 0.0 && scaled % 10.0 == 5.0 {
        Some(((scaled + 5.0) / 10.0) as u64)
    } else {
        None
    }
}
