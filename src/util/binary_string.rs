//! Bit-pattern strings for Hamming queries.

/// Render each number as eight `'0'`/`'1'` characters.
///
/// Every value is truncated toward zero into the `i32` range (saturating at
/// its bounds, `NaN` becoming zero) and reduced to its low byte, so `125.0`
/// becomes `"01111101"` and `-1.0` becomes `"11111111"`.
pub fn to_binary_string(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 8);
    for &value in values {
        let byte = value as i32 as u8;
        out.push_str(&format!("{byte:08b}"));
    }
    out
}
