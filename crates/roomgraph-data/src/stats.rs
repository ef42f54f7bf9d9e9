//! Order statistics used for outlier trimming.

/// Quantile of an ascending slice using linear interpolation between the
/// closest ranks, `pos = q * (n - 1)`.
///
/// Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let q = q.clamp(0.0, 1.0);

    #[allow(clippy::cast_precision_loss)]
    let pos = q * last as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(last);
    let weight = pos - pos.floor();

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Sorts a copy of the values ascending.
pub fn sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.into_iter().collect();
    values.sort_by(f64::total_cmp);
    values
}
