//! Conversions bridging `carctl_config` types to `carctl_core` types.

use carctl_config::trace::{TraceAlert, TraceButton, TraceFrame};
use carctl_traits::TorqueLimits;

use crate::config::{AccelCfg, ControllerCfg, LkasCfg, ResumeCfg, SpeedButtonCfg};
use crate::error::{BuildError, InputError};
use crate::policy::{LaneWarning, PolicyTable, VehiclePolicy};
use crate::types::{
    Actuators, Bus, Button, CruiseState, CycleInput, HudInput, SpeedHint, VehicleModel,
    VehicleSnapshot, VisualAlert,
};

// ── Controller config ────────────────────────────────────────────────────────

impl From<&carctl_config::AccelCfg> for AccelCfg {
    fn from(c: &carctl_config::AccelCfg) -> Self {
        Self {
            max: c.max,
            min: c.min,
            hyst_gap: c.hyst_gap,
        }
    }
}

impl From<&carctl_config::LkasCfg> for LkasCfg {
    fn from(c: &carctl_config::LkasCfg) -> Self {
        Self {
            low_speed_kph: c.low_speed_kph,
            blinker_hold_cycles: c.blinker_hold_cycles,
        }
    }
}

impl From<&carctl_config::ResumeCfg> for ResumeCfg {
    fn from(c: &carctl_config::ResumeCfg) -> Self {
        Self {
            burst_len: c.burst_len,
            min_gap_cycles: c.min_gap_cycles,
        }
    }
}

impl From<&carctl_config::SpeedButtonCfg> for SpeedButtonCfg {
    fn from(c: &carctl_config::SpeedButtonCfg) -> Self {
        Self {
            max_active_cycles: c.max_active_cycles,
            abort_wait_cycles: c.abort_wait_cycles,
            override_wait_cycles: c.override_wait_cycles,
            min_speed_kph: c.min_speed_kph,
            mode3_min_speed_kph: c.mode3_min_speed_kph,
        }
    }
}

impl From<&carctl_config::Config> for ControllerCfg {
    fn from(c: &carctl_config::Config) -> Self {
        Self {
            accel: (&c.accel).into(),
            lkas: (&c.lkas).into(),
            resume: (&c.resume).into(),
            speed_button: (&c.speed_button).into(),
            longitudinal: c.longitudinal.enabled,
            lkas_button_default: c.vehicle.lkas_button_default,
        }
    }
}

/// `TorqueLimits` lives in `carctl_traits`, so this is a function rather than a `From`.
pub fn torque_limits(c: &carctl_config::SteerCfg) -> TorqueLimits {
    TorqueLimits {
        steer_max: c.max,
        delta_up: c.delta_up,
        delta_down: c.delta_down,
        driver_allowance: c.driver_allowance,
        driver_multiplier: c.driver_multiplier,
        driver_factor: c.driver_factor,
    }
}

// ── Policy overrides ─────────────────────────────────────────────────────────

impl From<&carctl_config::PolicyRow> for VehiclePolicy {
    fn from(r: &carctl_config::PolicyRow) -> Self {
        Self {
            low_speed_lkas_fault: r.low_speed_lkas_fault,
            lane_warning: if r.low_lane_warning {
                LaneWarning::Low
            } else {
                LaneWarning::High
            },
            lfa_mfa: r.lfa_mfa,
        }
    }
}

impl TryFrom<&[carctl_config::PolicyRow]> for PolicyTable {
    type Error = BuildError;

    fn try_from(rows: &[carctl_config::PolicyRow]) -> Result<Self, Self::Error> {
        rows.iter().try_fold(PolicyTable::new(), |table, row| {
            let model = row.model.parse::<VehicleModel>()?;
            Ok(table.with_override(model, row.into()))
        })
    }
}

// ── Replay trace ─────────────────────────────────────────────────────────────

impl From<TraceButton> for Button {
    fn from(b: TraceButton) -> Self {
        match b {
            TraceButton::None => Button::None,
            TraceButton::ResAccel => Button::ResumeAccel,
            TraceButton::SetDecel => Button::SetCoast,
            TraceButton::Cancel => Button::Cancel,
        }
    }
}

impl From<TraceAlert> for VisualAlert {
    fn from(a: TraceAlert) -> Self {
        match a {
            TraceAlert::None => VisualAlert::None,
            TraceAlert::SteerRequired => VisualAlert::SteerRequired,
            TraceAlert::Other => VisualAlert::Other,
        }
    }
}

/// Map and validate one recorded frame.
impl TryFrom<&TraceFrame> for CycleInput {
    type Error = InputError;

    fn try_from(f: &TraceFrame) -> Result<Self, Self::Error> {
        let v = &f.vehicle;
        let input = CycleInput {
            cycle: f.cycle,
            enabled: f.enabled,
            cancel_requested: f.cancel,
            actuators: Actuators {
                gas: f.actuators.gas,
                brake: f.actuators.brake,
                steer: f.actuators.steer,
            },
            hud: HudInput {
                visual_alert: f.hud.visual_alert.into(),
                left_lane: f.hud.left_lane,
                right_lane: f.hud.right_lane,
                left_lane_depart: f.hud.left_lane_depart,
                right_lane_depart: f.hud.right_lane_depart,
            },
            vehicle: VehicleSnapshot {
                v_ego: v.v_ego,
                steering_torque: v.steering_torque,
                left_blinker: v.left_blinker,
                right_blinker: v.right_blinker,
                left_blinker_flash: v.left_blinker_flash,
                right_blinker_flash: v.right_blinker_flash,
                cruise: CruiseState {
                    enabled: v.cruise.enabled,
                    standstill: v.cruise.standstill,
                    driver_override: v.cruise.driver_override,
                    mode_sel: v.cruise.mode_sel,
                    lamp_set: v.cruise.lamp_set,
                    sw_state: v.cruise.sw_state,
                },
                lkas_msg_count: v.lkas_msg_count,
                scc_alive_count: v.scc_alive_count,
                clu_speed: v.clu_speed,
                set_speed_in_mph: v.set_speed_in_mph,
                lead_distance: v.lead_distance,
                mdps_bus: Bus(v.mdps_bus),
                scc_bus: Bus(v.scc_bus),
            },
            speed_hint: f.speed_hint.map(|h| SpeedHint {
                button: h.button.into(),
                target_speed: h.target_speed,
            }),
        };
        input.validate()?;
        Ok(input)
    }
}
