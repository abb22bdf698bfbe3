//! Longitudinal command shaping: hysteresis around a steady anchor, then scale and clamp.

use crate::config::AccelCfg;

/// Shape a normalized acceleration request (`gas - brake`).
///
/// Returns `(accel_mps2, new_steady)`. The anchor only moves when `raw` leaves
/// the `±hyst_gap` band around it. Non-finite input is treated as 0.0.
pub fn shape(raw: f32, steady: f32, cfg: &AccelCfg) -> (f32, f32) {
    let raw = if raw.is_finite() { raw } else { 0.0 };
    let gap = cfg.hyst_gap;

    let steady = if raw > steady + gap {
        raw - gap
    } else if raw < steady - gap {
        raw + gap
    } else {
        steady
    };

    let accel = (steady * cfg.scale()).clamp(cfg.min, cfg.max);
    (accel, steady)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_anchor_to_edge_of_band() {
        let (accel, steady) = shape(1.0, 0.0, &AccelCfg::default());
        assert!((steady - 0.98).abs() < 1e-6);
        assert_eq!(accel, 1.5);
    }

    #[test]
    fn small_wiggle_keeps_anchor() {
        let cfg = AccelCfg::default();
        let (_, steady) = shape(0.515, 0.5, &cfg);
        assert_eq!(steady, 0.5);
        let (_, steady) = shape(0.485, 0.5, &cfg);
        assert_eq!(steady, 0.5);
    }

    #[test]
    fn braking_is_scaled_by_largest_limit() {
        let (accel, steady) = shape(-0.5, 0.0, &AccelCfg::default());
        assert!((steady + 0.48).abs() < 1e-6);
        assert!((accel + 1.44).abs() < 1e-4);
    }

    #[test]
    fn nan_fails_toward_zero() {
        let (accel, steady) = shape(f32::NAN, 0.0, &AccelCfg::default());
        assert_eq!((accel, steady), (0.0, 0.0));
    }
}
