/// Relative volume
///
/// volume_fraction = current volume / rolling mean volume over the
/// configured window. Backfilled feeds sometimes carry zero volume, which
/// would zero the mean; a near-zero mean reads as neutral 1.0 instead of
/// dividing by zero.
use super::moving_average::rolling_mean;

const MEAN_EPSILON: f64 = 1e-12;

/// Volume relative to its trailing mean; None until the window is full
pub fn volume_fraction_series(volumes: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_mean(volumes, window)
        .into_iter()
        .zip(volumes)
        .map(|(mean, &volume)| {
            mean.map(|mean| {
                if mean.abs() <= MEAN_EPSILON {
                    1.0
                } else {
                    volume / mean
                }
            })
        })
        .collect()
}
