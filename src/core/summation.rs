use fsum::FSum;

/// Sum of `values` without accumulated rounding error.
///
/// NaN and infinities propagate as in a plain sum.
pub fn fsum(values: impl IntoIterator<Item = f64>) -> f64 {
    let values = values.into_iter().collect::<Vec<_>>();
    if values.iter().all(|value| value.is_finite()) {
        FSum::with_all(values.iter().copied()).value()
    } else {
        values.into_iter().sum()
    }
}
