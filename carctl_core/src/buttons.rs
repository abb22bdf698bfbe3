//! Simulated cruise-button emulation state.
//!
//! The resume and speed-button machines share one slot, so at most one of them
//! can own the SCC bus in a given cycle.

use crate::types::Button;

/// Resume tracker armed while stopped behind a lead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumeTracker {
    /// Lead distance captured when the car came to a stop
    pub captured: f32,
    /// RES_ACCEL presses sent in the current burst
    pub presses: u8,
}

/// A latched speed-button request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRequest {
    pub button: Button,
    /// Cluster speed carried with every press
    pub target_speed: f32,
    pub active_cycles: u32,
    /// Advances only on even slots; presses go out on even values
    pub sequence: u32,
    pub pressed: bool,
}

impl SpeedRequest {
    pub fn latch(button: Button, target_speed: f32) -> Self {
        Self {
            button,
            target_speed,
            active_cycles: 0,
            sequence: 0,
            pressed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ButtonEmulation {
    #[default]
    Idle,
    Resume(ResumeTracker),
    Speed(SpeedRequest),
}

/// Coarse speed-button phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedButtonPhase {
    Idle,
    /// Latched, no press sent yet
    Requesting,
    Active,
}

/// Button-emulation state carried across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonState {
    pub mode: ButtonEmulation,
    /// Cycles the speed-button machine stays idle
    pub wait_timer: u32,
    pub last_resume_cycle: u64,
}

impl ButtonState {
    /// Counter of the running machine; 0 when idle.
    pub fn counter(&self) -> u32 {
        match self.mode {
            ButtonEmulation::Idle => 0,
            ButtonEmulation::Resume(t) => u32::from(t.presses),
            ButtonEmulation::Speed(r) => r.sequence,
        }
    }

    pub fn speed_phase(&self) -> SpeedButtonPhase {
        match self.mode {
            ButtonEmulation::Speed(r) if r.pressed => SpeedButtonPhase::Active,
            ButtonEmulation::Speed(_) => SpeedButtonPhase::Requesting,
            _ => SpeedButtonPhase::Idle,
        }
    }
}

/// One simulated press, emitted as CLU11 on the SCC bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonPress {
    pub button: Button,
    pub counter: u8,
    pub speed: f32,
}

/// Result of the resume machine for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResumeOutcome {
    /// Not stopped and nothing captured; the speed-button machine runs.
    FallThrough,
    /// The resume machine owned this cycle.
    Handled(Option<ButtonPress>),
}
