use ndarray::Array2;

/// significant digits that guarantee an `f64` survives a decimal round trip
const ROUND_TRIP_DIGITS: i32 = 17;

/// copy the given rows of `array` (in the order given) into a new array
pub(crate) fn take_rows<T: Clone>(array: &Array2<T>, rows: &[usize]) -> Array2<T> {
    Array2::from_shape_fn((rows.len(), array.ncols()), |(i, j)| {
        array[[rows[i], j]].clone()
    })
}

/// Format a float in plain positional notation (never an exponent) with at least
/// 17 significant digits.
pub(crate) fn fixed_point(x: f64) -> String {
    if x == 0.0 || !x.is_finite() {
        return format!("{:.*}", ROUND_TRIP_DIGITS as usize, x);
    }

    // log10 can land one off near powers of ten, one extra digit covers it
    let exponent = x.abs().log10().floor() as i32;
    let decimals = (ROUND_TRIP_DIGITS - exponent).max(1) as usize;

    format!("{:.*}", decimals, x)
}

/// shortest representation that parses back to the same `f64`
pub(crate) fn shortest(x: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    buffer.format(x).to_string()
}
