//! The per-cycle controller (`ControllerCore`) and its boxed wrapper (`CarController`).
//!
//! `update` is total: every validated input yields an ordered message list and
//! a new state. Component functions take their slice of state by value and
//! hand back the successor.

use carctl_traits::SteerLimiter;

use crate::accel;
use crate::buttons::ResumeOutcome;
use crate::config::ControllerCfg;
use crate::error::{ControllerError, InputError};
use crate::hud::{self, HudOutput};
use crate::message::OutboundMessage;
use crate::policy::VehiclePolicy;
use crate::resume;
use crate::sequencer::{self, CyclePlan};
use crate::speed_button;
use crate::state::ControllerState;
use crate::steer::{self, GateInput, SteerOutput};
use crate::types::{CycleInput, VehicleModel};

/// Decisions of the most recent cycle, for telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    /// m/s^2
    pub accel: f32,
    pub steer: SteerOutput,
    pub hud: HudOutput,
    pub message_count: usize,
}

/// Unified core for both dynamic (boxed) and generic (static dispatch) limiters.
pub struct ControllerCore<L: SteerLimiter> {
    pub(crate) model: VehicleModel,
    pub(crate) policy: VehiclePolicy,
    pub(crate) cfg: ControllerCfg,
    pub(crate) limiter: L,
    pub(crate) state: ControllerState,
    pub(crate) last_report: Option<CycleReport>,
}

impl<L: SteerLimiter> core::fmt::Debug for ControllerCore<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControllerCore")
            .field("model", &self.model)
            .field("policy", &self.policy)
            .field("longitudinal", &self.cfg.longitudinal)
            .field("last_cycle", &self.state.last_cycle)
            .finish()
    }
}

impl<L: SteerLimiter> ControllerCore<L> {
    pub fn model(&self) -> VehicleModel {
        self.model
    }

    pub fn policy(&self) -> &VehiclePolicy {
        &self.policy
    }

    pub fn config(&self) -> &ControllerCfg {
        &self.cfg
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    /// Operator LKAS toggle.
    pub fn set_lkas_button(&mut self, on: bool) {
        if self.state.lkas_button_on != on {
            tracing::debug!(on, "lkas button toggled");
        }
        self.state.lkas_button_on = on;
    }

    /// Drop all session state; counters are re-seeded on the next cycle.
    pub fn reset(&mut self) {
        self.state = ControllerState::new(self.state.lkas_button_on, self.cfg.longitudinal);
        self.last_report = None;
    }

    /// One control cycle. The input must have passed `CycleInput::validate`.
    pub fn update(&mut self, input: &CycleInput) -> Vec<OutboundMessage> {
        let prev = self.state;
        let v = &input.vehicle;

        let raw_accel = input.actuators.gas - input.actuators.brake;
        let (accel, accel_steady) = accel::shape(raw_accel, prev.accel_steady, &self.cfg.accel);

        let gate_input = GateInput {
            desired: input.actuators.steer,
            enabled: input.enabled,
            lkas_button_on: prev.lkas_button_on,
            vehicle: v,
            policy: &self.policy,
        };
        let (steer_out, steer_state) =
            steer::gate(&gate_input, prev.steer, &self.cfg.lkas, &self.limiter);

        let hud = hud::derive(
            steer_out.lkas_active,
            prev.lkas_button_on,
            &input.hud,
            &self.policy,
        );

        let counters = prev.counters.advance(v);

        let (buttons, outcome) = resume::step(prev.buttons, v, input.cycle, &self.cfg.resume);
        let (buttons, press) = match outcome {
            ResumeOutcome::Handled(press) => (buttons, press),
            ResumeOutcome::FallThrough => speed_button::step(
                buttons,
                v,
                input.speed_hint.as_ref(),
                input.cycle,
                &self.cfg.speed_button,
            ),
        };

        let plan = CyclePlan {
            input,
            policy: &self.policy,
            longitudinal: prev.longitudinal_enabled,
            accel,
            steer: steer_out,
            hud,
            button: press,
        };
        let (messages, counters) = sequencer::sequence(&plan, counters);

        self.state = ControllerState {
            accel_steady,
            steer: steer_state,
            counters,
            buttons,
            lkas_button_on: prev.lkas_button_on,
            longitudinal_enabled: prev.longitudinal_enabled,
            last_cycle: Some(input.cycle),
        };
        self.last_report = Some(CycleReport {
            cycle: input.cycle,
            accel,
            steer: steer_out,
            hud,
            message_count: messages.len(),
        });
        tracing::trace!(
            cycle = input.cycle,
            accel,
            steer = steer_out.applied,
            lkas_active = steer_out.lkas_active,
            messages = messages.len(),
            "cycle"
        );
        messages
    }
}

/// Public dynamic (boxed limiter) controller.
pub struct CarController {
    pub(crate) inner: ControllerCore<Box<dyn SteerLimiter + Send>>,
}

impl core::fmt::Debug for CarController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CarController")
            .field("model", &self.inner.model)
            .field("last_cycle", &self.inner.state.last_cycle)
            .finish()
    }
}

impl CarController {
    /// Start building a controller.
    pub fn builder() -> crate::builder::ControllerBuilder<crate::builder::Missing> {
        crate::builder::ControllerBuilder::default()
    }

    pub fn update(&mut self, input: &CycleInput) -> Vec<OutboundMessage> {
        self.inner.update(input)
    }

    /// Validate `input` and check the cycle index advances, then run one cycle.
    pub fn try_update(
        &mut self,
        input: &CycleInput,
    ) -> core::result::Result<Vec<OutboundMessage>, ControllerError> {
        let cycle = input.cycle;
        if let Some(prev) = self.inner.state.last_cycle
            && cycle <= prev
        {
            return Err(ControllerError::Input {
                cycle,
                source: InputError::NonMonotonicCycle { prev, next: cycle },
            });
        }
        input
            .validate()
            .map_err(|source| ControllerError::Input { cycle, source })?;
        Ok(self.inner.update(input))
    }

    pub fn state(&self) -> &ControllerState {
        self.inner.state()
    }

    pub fn model(&self) -> VehicleModel {
        self.inner.model()
    }

    pub fn policy(&self) -> &VehiclePolicy {
        self.inner.policy()
    }

    pub fn config(&self) -> &ControllerCfg {
        self.inner.config()
    }

    pub fn last_report(&self) -> Option<&CycleReport> {
        self.inner.last_report()
    }

    pub fn set_lkas_button(&mut self, on: bool) {
        self.inner.set_lkas_button(on);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
