#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas, vehicle-policy CSV parsing and the replay trace schema.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Policy CSV loader enforces headers and rejects duplicate models.
//! - `TraceFrame` is one recorded control cycle (JSON lines).
use serde::Deserialize;

pub mod policy;
pub mod trace;

pub use policy::{PolicyRow, load_policy_csv};
pub use trace::{TraceFrame, parse_trace_line};

#[derive(Debug, Deserialize)]
pub struct VehicleCfg {
    /// Fingerprint name, e.g. "SONATA" or "HYUNDAI_GENESIS".
    pub model: String,
    /// Initial state of the operator LKAS toggle.
    #[serde(default = "default_true")]
    pub lkas_button_default: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LongitudinalCfg {
    /// Emit SCC12 acceleration and cancel frames. Off unless the harness moves SCC off bus 0.
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AccelCfg {
    /// m/s^2
    pub max: f32,
    /// m/s^2, negative
    pub min: f32,
    /// Normalized units; commands within this band of the anchor are ignored
    pub hyst_gap: f32,
}

impl Default for AccelCfg {
    fn default() -> Self {
        Self {
            max: 1.5,
            min: -3.0,
            hyst_gap: 0.02,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SteerCfg {
    pub max: f32,
    pub delta_up: f32,
    pub delta_down: f32,
    pub driver_allowance: f32,
    pub driver_multiplier: f32,
    pub driver_factor: f32,
}

impl Default for SteerCfg {
    fn default() -> Self {
        Self {
            max: 255.0,
            delta_up: 3.0,
            delta_down: 7.0,
            driver_allowance: 50.0,
            driver_multiplier: 2.0,
            driver_factor: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LkasCfg {
    /// Below this speed blinkers (and the low-speed fault guard) suppress steering
    pub low_speed_kph: f32,
    /// Cycles steering stays suppressed after the last blinker observation
    pub blinker_hold_cycles: u32,
}

impl Default for LkasCfg {
    fn default() -> Self {
        Self {
            low_speed_kph: 60.0,
            blinker_hold_cycles: 100,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResumeCfg {
    pub burst_len: u8,
    pub min_gap_cycles: u64,
}

impl Default for ResumeCfg {
    fn default() -> Self {
        Self {
            burst_len: 6,
            min_gap_cycles: 5,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SpeedButtonCfg {
    pub max_active_cycles: u32,
    pub abort_wait_cycles: u32,
    /// Cooldown armed when the driver overrides or cruise drops out (0 = none)
    pub override_wait_cycles: u32,
    pub min_speed_kph: f32,
    pub mode3_min_speed_kph: f32,
}

impl Default for SpeedButtonCfg {
    fn default() -> Self {
        Self {
            max_active_cycles: 10,
            abort_wait_cycles: 5,
            override_wait_cycles: 0,
            min_speed_kph: 5.0,
            mode3_min_speed_kph: 30.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PolicyCfg {
    /// Optional CSV overriding per-model policy rows.
    pub csv: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub vehicle: VehicleCfg,
    #[serde(default)]
    pub longitudinal: LongitudinalCfg,
    #[serde(default)]
    pub accel: AccelCfg,
    #[serde(default)]
    pub steer: SteerCfg,
    #[serde(default)]
    pub lkas: LkasCfg,
    #[serde(default)]
    pub resume: ResumeCfg,
    #[serde(default)]
    pub speed_button: SpeedButtonCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub policy: PolicyCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Vehicle
        if self.vehicle.model.trim().is_empty() {
            eyre::bail!("vehicle.model must not be empty");
        }

        // Accel
        if !self.accel.max.is_finite() || self.accel.max <= 0.0 {
            eyre::bail!("accel.max must be > 0");
        }
        if !self.accel.min.is_finite() || self.accel.min >= 0.0 {
            eyre::bail!("accel.min must be < 0");
        }
        if self.accel.max > 4.0 || self.accel.min < -6.0 {
            eyre::bail!("accel limits are outside the range the SCC module accepts");
        }
        if !(0.0..=0.5).contains(&self.accel.hyst_gap) {
            eyre::bail!("accel.hyst_gap must be in [0.0, 0.5]");
        }

        // Steer
        if !(self.steer.max > 0.0 && self.steer.max <= 1023.0) {
            eyre::bail!("steer.max must be in (0, 1023]");
        }
        if self.steer.delta_up <= 0.0 {
            eyre::bail!("steer.delta_up must be > 0");
        }
        if self.steer.delta_down < self.steer.delta_up {
            eyre::bail!("steer.delta_down must be >= steer.delta_up");
        }
        if self.steer.driver_allowance.is_sign_negative()
            || self.steer.driver_multiplier.is_sign_negative()
            || self.steer.driver_factor.is_sign_negative()
        {
            eyre::bail!("steer.driver_* parameters must be >= 0");
        }

        // LKAS
        if !(0.0..=200.0).contains(&self.lkas.low_speed_kph) {
            eyre::bail!("lkas.low_speed_kph must be in [0, 200]");
        }
        if self.lkas.blinker_hold_cycles > 60 * 100 {
            eyre::bail!("lkas.blinker_hold_cycles is unreasonably large (>60s)");
        }

        // Resume
        if self.resume.burst_len == 0 {
            eyre::bail!("resume.burst_len must be >= 1");
        }
        if self.resume.burst_len > 16 {
            eyre::bail!("resume.burst_len must be <= 16");
        }

        // Speed button
        if self.speed_button.max_active_cycles == 0 {
            eyre::bail!("speed_button.max_active_cycles must be >= 1");
        }
        if self.speed_button.min_speed_kph.is_sign_negative()
            || self.speed_button.mode3_min_speed_kph.is_sign_negative()
        {
            eyre::bail!("speed_button speed thresholds must be >= 0");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
