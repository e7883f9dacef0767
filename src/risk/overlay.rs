use crate::config::RiskConfig;
use crate::models::RiskParams;

/// Map a bar's volatility proxy and signal confidence to sizing
/// parameters
///
/// Pure function, recomputed per decision and never cached across bars:
/// - stop-loss stays the configured fixed fraction of entry price
/// - the ROI table is handed through for the caller to evaluate against
///   open-position age
/// - leverage scales up with confidence and down with volatility,
///   clamped to the configured [min, max]
///
/// `volatility` is atr/close; `confidence` is the composite score (its
/// magnitude is what matters, direction is ignored here).
pub fn assess(volatility: f64, confidence: f64, config: &RiskConfig) -> RiskParams {
    let confidence = if confidence.is_finite() {
        confidence.abs().clamp(0.0, 1.0)
    } else {
        0.0
    };

    // full scale at or below the reference volatility, backing off
    // proportionally above it
    let vol_scale = if volatility > 0.0 && volatility.is_finite() {
        (config.reference_volatility / volatility).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let span = config.max_leverage - config.min_leverage;
    let leverage = (config.min_leverage + span * confidence * vol_scale)
        .clamp(config.min_leverage, config.max_leverage);

    RiskParams {
        stop_fraction: config.stop_fraction,
        leverage,
        roi_table: config.roi_table.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_leverage_within_bounds() {
        let config = RiskConfig::default();

        for confidence in [-2.0, -1.0, 0.0, 0.3, 1.0, 5.0] {
            for volatility in [0.0, 0.0001, 0.004, 0.05, 1.0] {
                let params = assess(volatility, confidence, &config);
                assert!(params.leverage >= config.min_leverage);
                assert!(params.leverage <= config.max_leverage);
            }
        }
    }

    #[test]
    fn test_leverage_monotone_in_confidence() {
        let config = RiskConfig::default();
        let volatility = 0.004;

        let low = assess(volatility, 0.2, &config).leverage;
        let mid = assess(volatility, 0.5, &config).leverage;
        let high = assess(volatility, 0.9, &config).leverage;

        assert!(low < mid && mid < high);
    }

    #[test]
    fn test_leverage_backs_off_with_volatility() {
        let config = RiskConfig::default();

        let calm = assess(0.002, 0.8, &config).leverage;
        let rough = assess(0.02, 0.8, &config).leverage;

        assert!(rough < calm);
    }

    #[test]
    fn test_full_confidence_low_vol_hits_max() {
        let config = RiskConfig::default();
        let params = assess(0.001, 1.0, &config);

        assert_relative_eq!(params.leverage, config.max_leverage);
    }

    #[test]
    fn test_zero_confidence_is_min_leverage() {
        let config = RiskConfig::default();
        let params = assess(0.004, 0.0, &config);

        assert_relative_eq!(params.leverage, config.min_leverage);
    }

    #[test]
    fn test_stop_and_roi_passed_through() {
        let config = RiskConfig::default();
        let params = assess(0.004, 0.5, &config);

        assert_relative_eq!(params.stop_fraction, -0.05);
        assert_eq!(params.roi_table.len(), 3);
        assert_eq!(params.roi_table[0].minutes, 0);
    }

    #[test]
    fn test_negative_confidence_sizes_like_positive() {
        // shorts size on magnitude, not direction
        let config = RiskConfig::default();

        let long = assess(0.004, 0.6, &config).leverage;
        let short = assess(0.004, -0.6, &config).leverage;
        assert_relative_eq!(long, short);
    }

    #[test]
    fn test_non_finite_inputs_guarded() {
        let config = RiskConfig::default();

        let params = assess(f64::NAN, f64::INFINITY, &config);
        assert!(params.leverage.is_finite());
        assert!(params.leverage >= config.min_leverage);
    }
}
