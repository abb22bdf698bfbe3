use carctl_core::accel::shape;
use carctl_core::{AccelCfg, StdTorqueLimiter, SteerLimiter};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, .. ProptestConfig::default() })]

    #[test]
    fn accel_output_stays_within_limits(raw in -2.0f32..2.0, steady in -2.0f32..2.0) {
        let cfg = AccelCfg::default();
        let (accel, _) = shape(raw, steady, &cfg);
        prop_assert!(accel >= cfg.min && accel <= cfg.max, "accel {accel} out of range");
    }

    #[test]
    fn oscillation_inside_band_keeps_anchor(steady in -1.0f32..1.0, wiggle in -0.0199f32..0.0199) {
        let cfg = AccelCfg::default();
        let (_, next) = shape(steady + wiggle, steady, &cfg);
        prop_assert_eq!(next, steady);
    }

    #[test]
    fn anchor_trails_raw_by_at_most_the_gap(raw in -1.0f32..1.0, steady in -1.0f32..1.0) {
        let cfg = AccelCfg::default();
        let (_, next) = shape(raw, steady, &cfg);
        prop_assert!((raw - next).abs() <= cfg.hyst_gap + 1e-5);
    }

    #[test]
    fn torque_magnitude_grows_by_at_most_delta_up(
        last in -255i32..=255,
        requested in -400.0f32..400.0,
    ) {
        let lim = StdTorqueLimiter::default();
        let last = last as f32;
        let out = lim.limit(requested, last, 0.0);
        prop_assert!(out.abs() <= last.abs() + lim.limits().delta_up);
        prop_assert!(out.abs() <= lim.steer_max());
    }

    #[test]
    fn torque_is_integral(last in -255i32..=255, requested in -255.0f32..255.0, driver in -100.0f32..100.0) {
        let lim = StdTorqueLimiter::default();
        let out = lim.limit(requested, last as f32, driver);
        prop_assert_eq!(out, out.round());
    }
}
