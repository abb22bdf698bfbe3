//! Auto-resume from standstill: when the lead starts moving, send a burst of RES_ACCEL.

use crate::buttons::{ButtonEmulation, ButtonPress, ButtonState, ResumeOutcome, ResumeTracker};
use crate::config::ResumeCfg;
use crate::types::{Button, VehicleSnapshot};

pub fn step(
    state: ButtonState,
    vehicle: &VehicleSnapshot,
    cycle: u64,
    cfg: &ResumeCfg,
) -> (ButtonState, ResumeOutcome) {
    let mut next = state;

    if !vehicle.cruise.standstill {
        return match state.mode {
            ButtonEmulation::Resume(_) => {
                tracing::debug!(cycle, "moving again, resume tracker released");
                next.mode = ButtonEmulation::Idle;
                (next, ResumeOutcome::Handled(None))
            }
            _ => (next, ResumeOutcome::FallThrough),
        };
    }

    let mut tracker = match state.mode {
        ButtonEmulation::Resume(t) => t,
        _ => {
            // 0.0 means no lead; keep waiting for one
            next.mode = if vehicle.lead_distance > 0.0 {
                tracing::debug!(cycle, lead = vehicle.lead_distance, "lead captured at standstill");
                ButtonEmulation::Resume(ResumeTracker {
                    captured: vehicle.lead_distance,
                    presses: 0,
                })
            } else {
                ButtonEmulation::Idle
            };
            return (next, ResumeOutcome::Handled(None));
        }
    };

    let lead_moved = vehicle.lead_distance != tracker.captured;
    let gap_elapsed = cycle.saturating_sub(state.last_resume_cycle) > cfg.min_gap_cycles;
    if !(lead_moved && gap_elapsed) {
        return (next, ResumeOutcome::Handled(None));
    }

    if tracker.presses == 0 {
        tracing::debug!(cycle, from = tracker.captured, to = vehicle.lead_distance, "resume burst start");
    }
    let press = ButtonPress {
        button: Button::ResumeAccel,
        counter: tracker.presses,
        speed: vehicle.clu_speed,
    };
    tracing::trace!(cycle, counter = press.counter, "RES_ACCEL");
    tracker.presses += 1;
    if tracker.presses >= cfg.burst_len {
        tracing::debug!(cycle, "resume burst end");
        next.last_resume_cycle = cycle;
        tracker.presses = 0;
    }
    next.mode = ButtonEmulation::Resume(tracker);
    (next, ResumeOutcome::Handled(Some(press)))
}
