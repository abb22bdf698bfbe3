//! Rolling counters and per-cycle message ordering.
//!
//! Order within a cycle is fixed: LKAS11 (primary, then mirror), CLU11 for a
//! moved MDPS, CANCEL or MDPS12, SCC12, the emulated button, LFA MFA.

use crate::buttons::ButtonPress;
use crate::hud::HudOutput;
use crate::message::{OutboundMessage, Payload};
use crate::policy::VehiclePolicy;
use crate::steer::SteerOutput;
use crate::types::{Bus, Button, CycleInput, VehicleSnapshot};

const LKAS_MODULO: u8 = 0x10;
const SCC_MODULO: u8 = 0x0F;
const LFA_PERIOD: u64 = 5;
/// CLU11 speed the MDPS sees while LKAS is steering below that speed.
const ENABLED_SPEED_KPH: f32 = 60.0;
const ENABLED_SPEED_MPH: f32 = 38.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub lkas: u8,
    pub scc: u8,
    pub seeded: bool,
}

impl Counters {
    /// Seed from the car's own counters once per session, then advance for this cycle.
    pub fn advance(mut self, vehicle: &VehicleSnapshot) -> Self {
        if !self.seeded {
            self.lkas = vehicle.lkas_msg_count % LKAS_MODULO;
            self.scc = vehicle.scc_alive_count.map_or(0, |c| c.wrapping_add(1));
            self.seeded = true;
        }
        self.lkas = (self.lkas + 1) % LKAS_MODULO;
        self.scc %= SCC_MODULO;
        self
    }
}

/// Everything decided for the cycle before sequencing.
#[derive(Debug, Clone, Copy)]
pub struct CyclePlan<'a> {
    pub input: &'a CycleInput,
    pub policy: &'a VehiclePolicy,
    pub longitudinal: bool,
    pub accel: f32,
    pub steer: SteerOutput,
    pub hud: HudOutput,
    pub button: Option<ButtonPress>,
}

/// CLU11 speed for the MDPS keep-alive path.
pub fn enabled_speed(vehicle: &VehicleSnapshot, lkas_active: bool) -> f32 {
    let floor = if vehicle.set_speed_in_mph {
        ENABLED_SPEED_MPH
    } else {
        ENABLED_SPEED_KPH
    };
    if vehicle.clu_speed > floor || !lkas_active {
        vehicle.clu_speed
    } else {
        floor
    }
}

/// Build the ordered message list; returns the counters after any SCC12 increment.
pub fn sequence(plan: &CyclePlan<'_>, mut counters: Counters) -> (Vec<OutboundMessage>, Counters) {
    let input = plan.input;
    let v = &input.vehicle;
    let cycle = input.cycle;
    let clu_counter = (cycle % 16) as u8;
    let mut out = Vec::with_capacity(8);

    let lkas11 = Payload::Lkas11 {
        steer_torque: plan.steer.applied,
        steer_request: plan.steer.lkas_active,
        enabled: input.enabled,
        left_lane: input.hud.left_lane,
        right_lane: input.hud.right_lane,
        hud: plan.hud,
    };
    out.push(OutboundMessage::new(Bus::PRIMARY, counters.lkas, lkas11));
    if !v.mdps_bus.is_primary() || v.scc_bus == Bus::MIRROR {
        out.push(OutboundMessage::new(Bus::MIRROR, counters.lkas, lkas11));
    }

    if !v.mdps_bus.is_primary() {
        out.push(OutboundMessage::new(
            v.mdps_bus,
            clu_counter,
            Payload::Clu11 {
                button: Button::None,
                speed: enabled_speed(v, plan.steer.lkas_active),
            },
        ));
    }

    if input.cancel_requested && plan.longitudinal {
        out.push(OutboundMessage::new(
            v.scc_bus,
            clu_counter,
            Payload::Clu11 {
                button: Button::Cancel,
                speed: v.clu_speed,
            },
        ));
    } else if !v.mdps_bus.is_primary() {
        out.push(OutboundMessage::new(
            Bus::CAMERA,
            (cycle % 256) as u8,
            Payload::Mdps12,
        ));
    }

    if !v.scc_bus.is_primary() && plan.longitudinal && cycle % 2 == 1 {
        out.push(OutboundMessage::new(
            Bus::PRIMARY,
            counters.scc,
            Payload::Scc12 {
                accel: plan.accel,
                enabled: input.enabled,
            },
        ));
        counters.scc += 1;
    }

    if let Some(p) = plan.button {
        out.push(OutboundMessage::new(
            v.scc_bus,
            p.counter,
            Payload::Clu11 {
                button: p.button,
                speed: p.speed,
            },
        ));
    }

    if cycle % LFA_PERIOD == 0 && plan.policy.lfa_mfa {
        out.push(OutboundMessage::new(
            Bus::PRIMARY,
            clu_counter,
            Payload::LfaMfa {
                enabled: input.enabled,
            },
        ));
    }

    (out, counters)
}
