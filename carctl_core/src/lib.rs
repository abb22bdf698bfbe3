#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Per-cycle actuation-command synthesizer for Hyundai/Kia/Genesis cars.
//!
//! Each 100 Hz cycle takes planner intents, a vehicle bus snapshot and UI
//! flags, and returns the ordered list of outbound messages for that cycle.
//! No I/O happens here; the bus layer packs and sends what `update` returns.
//!
//! ## Architecture
//!
//! - **Accel**: hysteresis anchor plus scale/clamp (`accel`)
//! - **Steering**: blinker/low-speed gate in front of a `SteerLimiter` (`steer`)
//! - **HUD**: lane-assist state and departure warnings (`hud`)
//! - **Buttons**: resume burst and speed-button emulation sharing one slot
//!   (`buttons`, `resume`, `speed_button`)
//! - **Sequencing**: rolling counters and message order (`sequencer`)
//! - **Policy**: per-model quirks as data (`policy`)
//!
//! `ControllerCore<L>` is generic over the limiter; `CarController` boxes it.

pub mod accel;
pub mod builder;
pub mod buttons;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod hud;
pub mod message;
pub mod mocks;
pub mod policy;
pub mod resume;
pub mod runner;
pub mod sequencer;
pub mod speed_button;
pub mod state;
pub mod steer;
pub mod types;
pub mod util;

pub use builder::{ControllerBuilder, ControllerG, Missing, Set, build_controller};
pub use buttons::{ButtonEmulation, SpeedButtonPhase};
pub use config::{AccelCfg, ControllerCfg, LkasCfg, ResumeCfg, SpeedButtonCfg};
pub use controller::{CarController, ControllerCore, CycleReport};
pub use conversions::torque_limits;
pub use error::{BuildError, ControllerError, InputError};
pub use hud::{HudOutput, HudState};
pub use message::{MessageKind, OutboundMessage, Payload};
pub use policy::{LaneWarning, PolicyTable, VehiclePolicy};
pub use runner::{Pacing, RunOptions, RunSummary, run_trace};
pub use state::ControllerState;
pub use types::{
    Actuators, Bus, Button, CruiseState, CycleInput, HudInput, SpeedHint, VehicleModel,
    VehicleSnapshot, VisualAlert,
};

pub use carctl_traits::{StdTorqueLimiter, SteerLimiter, TorqueLimits};
