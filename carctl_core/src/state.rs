//! Session state owned by the controller, mutated once per cycle.

use crate::buttons::{ButtonEmulation, ButtonState, SpeedButtonPhase};
use crate::sequencer::Counters;
use crate::steer::SteerState;
use crate::types::Button;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerState {
    pub(crate) accel_steady: f32,
    pub(crate) steer: SteerState,
    pub(crate) counters: Counters,
    pub(crate) buttons: ButtonState,
    pub(crate) lkas_button_on: bool,
    pub(crate) longitudinal_enabled: bool,
    pub(crate) last_cycle: Option<u64>,
}

impl ControllerState {
    pub(crate) fn new(lkas_button_on: bool, longitudinal_enabled: bool) -> Self {
        Self {
            lkas_button_on,
            longitudinal_enabled,
            ..Self::default()
        }
    }

    pub fn accel_steady(&self) -> f32 {
        self.accel_steady
    }

    pub fn last_applied_steer(&self) -> f32 {
        self.steer.last_applied
    }

    pub fn steer_rate_limited(&self) -> bool {
        self.steer.rate_limited
    }

    pub fn blinker_suppress_timer(&self) -> u32 {
        self.steer.blinker_timer
    }

    pub fn lkas_counter(&self) -> u8 {
        self.counters.lkas
    }

    pub fn scc_counter(&self) -> u8 {
        self.counters.scc
    }

    pub fn counters_seeded(&self) -> bool {
        self.counters.seeded
    }

    /// Counter of whichever button machine is running; 0 when idle.
    pub fn resume_counter(&self) -> u32 {
        self.buttons.counter()
    }

    pub fn last_resume_cycle(&self) -> u64 {
        self.buttons.last_resume_cycle
    }

    /// Lead distance captured at standstill, if any.
    pub fn last_lead_distance(&self) -> Option<f32> {
        match self.buttons.mode {
            ButtonEmulation::Resume(t) => Some(t.captured),
            _ => None,
        }
    }

    pub fn button_emulation(&self) -> &ButtonEmulation {
        &self.buttons.mode
    }

    pub fn speed_button_state(&self) -> SpeedButtonPhase {
        self.buttons.speed_phase()
    }

    pub fn speed_button_kind(&self) -> Button {
        match self.buttons.mode {
            ButtonEmulation::Speed(r) => r.button,
            _ => Button::None,
        }
    }

    pub fn speed_button_target_speed(&self) -> Option<f32> {
        match self.buttons.mode {
            ButtonEmulation::Speed(r) => Some(r.target_speed),
            _ => None,
        }
    }

    pub fn wait_timer(&self) -> u32 {
        self.buttons.wait_timer
    }

    pub fn active_timer(&self) -> u32 {
        match self.buttons.mode {
            ButtonEmulation::Speed(r) => r.active_cycles,
            _ => 0,
        }
    }

    pub fn lkas_button_on(&self) -> bool {
        self.lkas_button_on
    }

    pub fn longitudinal_control_enabled(&self) -> bool {
        self.longitudinal_enabled
    }

    /// Last cycle index passed to `update`.
    pub fn last_cycle(&self) -> Option<u64> {
        self.last_cycle
    }
}
