//! Speed-button emulation: nudge the stock cruise set speed with simulated presses.
//!
//! A hint from the target-speed estimator latches a button. A latch window
//! presses at most once: the sequence counter only moves on even slots.

use crate::buttons::{ButtonEmulation, ButtonPress, ButtonState, SpeedRequest};
use crate::config::SpeedButtonCfg;
use crate::types::{Button, SpeedHint, VehicleSnapshot};

pub fn step(
    state: ButtonState,
    vehicle: &VehicleSnapshot,
    hint: Option<&SpeedHint>,
    cycle: u64,
    cfg: &SpeedButtonCfg,
) -> (ButtonState, Option<ButtonPress>) {
    let cruise = &vehicle.cruise;
    let mut next = state;

    if cruise.accel_override() || !cruise.enabled || cruise.set_switch_pressed() {
        if matches!(state.mode, ButtonEmulation::Speed(_)) {
            tracing::debug!(cycle, "speed request dropped by driver or cruise state");
        }
        next.mode = ButtonEmulation::Idle;
        next.wait_timer = cfg.override_wait_cycles;
        return (next, None);
    }

    if state.wait_timer > 0 {
        next.wait_timer -= 1;
        next.mode = ButtonEmulation::Idle;
        return (next, None);
    }

    // Stock mode: the driver owns the set speed
    if cruise.mode_sel == 0 {
        return (next, None);
    }

    let kph = vehicle.v_ego_kph();
    let latched = match state.mode {
        ButtonEmulation::Speed(r) => Some(r),
        _ => None,
    };
    let request = if kph < cfg.min_speed_kph {
        None
    } else if latched.is_some() {
        latched
    } else {
        hint.filter(|h| h.button != Button::None).map(|h| {
            tracing::debug!(cycle, button = ?h.button, target = h.target_speed, "speed request latched");
            SpeedRequest::latch(h.button, h.target_speed)
        })
    };

    let Some(mut req) = request else {
        next.mode = ButtonEmulation::Idle;
        return (next, None);
    };

    req.active_cycles += 1;
    if req.active_cycles > cfg.max_active_cycles {
        tracing::debug!(cycle, button = ?req.button, "speed request expired");
        next.wait_timer = cfg.abort_wait_cycles;
        next.mode = ButtonEmulation::Idle;
        return (next, None);
    }

    let mut press = None;
    if req.sequence % 2 == 0 {
        let may_press =
            cruise.lamp_set || (cruise.mode_sel == 3 && kph > cfg.mode3_min_speed_kph);
        if may_press {
            let p = ButtonPress {
                button: req.button,
                counter: (req.sequence & 0x0F) as u8,
                speed: req.target_speed,
            };
            tracing::trace!(cycle, button = ?p.button, counter = p.counter, speed = p.speed, "speed button press");
            req.pressed = true;
            press = Some(p);
        }
        // the slot is spent even when the gate held the press back
        req.sequence += 1;
    }
    next.mode = ButtonEmulation::Speed(req);
    (next, press)
}
