//! Steering gate: decides whether torque may be applied this cycle and rate-limits it.

use carctl_traits::SteerLimiter;

use crate::config::LkasCfg;
use crate::policy::VehiclePolicy;
use crate::types::VehicleSnapshot;

/// Steering state carried across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteerState {
    pub last_applied: f32,
    pub rate_limited: bool,
    /// Cycles left before a blinker stops suppressing low-speed steering.
    pub blinker_timer: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteerOutput {
    pub applied: f32,
    pub lkas_active: bool,
}

/// Inputs that are fixed for the cycle.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    /// Normalized planner request in [-1, 1]
    pub desired: f32,
    pub enabled: bool,
    pub lkas_button_on: bool,
    pub vehicle: &'a VehicleSnapshot,
    pub policy: &'a VehiclePolicy,
}

pub fn gate<L: SteerLimiter + ?Sized>(
    input: &GateInput<'_>,
    state: SteerState,
    cfg: &LkasCfg,
    limiter: &L,
) -> (SteerOutput, SteerState) {
    let v = input.vehicle;
    let new_steer = input.desired * limiter.steer_max();
    let low_speed = v.v_ego_kph() < cfg.low_speed_kph;

    let mut lkas_active = input.enabled && input.lkas_button_on;

    if input.policy.low_speed_lkas_fault && low_speed && v.mdps_bus.is_primary() {
        lkas_active = false;
    }

    let mut blinker_timer = state.blinker_timer;
    if v.any_blinker() {
        blinker_timer = cfg.blinker_hold_cycles;
    }
    if blinker_timer > 0 && low_speed {
        lkas_active = false;
    }
    blinker_timer = blinker_timer.saturating_sub(1);

    let (applied, rate_limited) = if lkas_active {
        let applied = limiter.limit(new_steer, state.last_applied, v.steering_torque);
        (applied, new_steer != applied)
    } else {
        (0.0, false)
    };

    (
        SteerOutput {
            applied,
            lkas_active,
        },
        SteerState {
            last_applied: applied,
            rate_limited,
            blinker_timer,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use carctl_traits::StdTorqueLimiter;

    fn input<'a>(v: &'a VehicleSnapshot, p: &'a VehiclePolicy) -> GateInput<'a> {
        GateInput {
            desired: 1.0,
            enabled: true,
            lkas_button_on: true,
            vehicle: v,
            policy: p,
        }
    }

    #[test]
    fn inactive_gate_zeroes_torque_and_clears_rate_flag() {
        let v = VehicleSnapshot::default();
        let p = VehiclePolicy::default();
        let mut i = input(&v, &p);
        i.enabled = false;
        let prev = SteerState {
            last_applied: 40.0,
            rate_limited: true,
            blinker_timer: 0,
        };
        let (out, st) = gate(&i, prev, &LkasCfg::default(), &StdTorqueLimiter::default());
        assert_eq!(out.applied, 0.0);
        assert!(!st.rate_limited);
        assert_eq!(st.last_applied, 0.0);
    }

    #[test]
    fn active_gate_reports_rate_limiting() {
        let v = VehicleSnapshot {
            v_ego: 25.0,
            ..Default::default()
        };
        let p = VehiclePolicy::default();
        let (out, st) = gate(
            &input(&v, &p),
            SteerState::default(),
            &LkasCfg::default(),
            &StdTorqueLimiter::default(),
        );
        assert!(out.lkas_active);
        assert_eq!(out.applied, 3.0);
        assert!(st.rate_limited);
    }

    #[test]
    fn timer_decrements_even_at_high_speed() {
        let v = VehicleSnapshot {
            v_ego: 25.0,
            ..Default::default()
        };
        let p = VehiclePolicy::default();
        let prev = SteerState {
            blinker_timer: 10,
            ..Default::default()
        };
        let (out, st) = gate(&input(&v, &p), prev, &LkasCfg::default(), &StdTorqueLimiter::default());
        assert!(out.lkas_active);
        assert_eq!(st.blinker_timer, 9);
    }
}
