/// A small statistics module with the reductions used when averaging reference data over a size
/// class.
use statrs::statistics::Statistics;

/// The arithmetic mean of the values whose mask entry is set, skipping missing values.
///
/// Yields NaN when no value is selected.
pub fn masked_mean(values: &[Option<f64>], mask: &[bool]) -> f64 {
    values
        .iter()
        .zip(mask)
        .filter_map(|(value, &selected)| if selected { *value } else { None })
        .collect::<Vec<_>>()
        .mean()
}
