//! Recorded control cycles, one JSON object per line.
//!
//! Field names follow the bus/CarState vocabulary so traces can be exported
//! straight from a logger. Everything except `cycle` has a default.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TraceActuators {
    /// [0, 1]
    pub gas: f32,
    /// [0, 1]
    pub brake: f32,
    /// [-1, 1]
    pub steer: f32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TraceAlert {
    #[default]
    None,
    SteerRequired,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TraceHud {
    pub visual_alert: TraceAlert,
    pub left_lane: bool,
    pub right_lane: bool,
    pub left_lane_depart: bool,
    pub right_lane_depart: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TraceCruise {
    pub enabled: bool,
    pub standstill: bool,
    /// 0 none, 1 steering, 2 accelerator
    pub driver_override: u8,
    /// 0 stock, 1..=3 assisted modes
    pub mode_sel: u8,
    pub lamp_set: bool,
    /// Cruise switch state; 1 and 2 mean the set/resume switch is being pressed
    pub sw_state: u8,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TraceVehicle {
    /// m/s
    pub v_ego: f32,
    pub steering_torque: f32,
    pub left_blinker: bool,
    pub right_blinker: bool,
    pub left_blinker_flash: bool,
    pub right_blinker_flash: bool,
    pub cruise: TraceCruise,
    pub lkas_msg_count: u8,
    /// Absent when the car has no radar
    pub scc_alive_count: Option<u8>,
    pub clu_speed: f32,
    pub set_speed_in_mph: bool,
    pub lead_distance: f32,
    pub mdps_bus: u8,
    pub scc_bus: u8,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TraceButton {
    #[default]
    None,
    ResAccel,
    SetDecel,
    Cancel,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct TraceHint {
    pub button: TraceButton,
    pub target_speed: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TraceFrame {
    pub cycle: u64,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub cancel: bool,
    #[serde(default)]
    pub actuators: TraceActuators,
    #[serde(default)]
    pub hud: TraceHud,
    #[serde(default)]
    pub vehicle: TraceVehicle,
    #[serde(default)]
    pub speed_hint: Option<TraceHint>,
}

/// Parse one trace line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_trace_line(line: &str) -> eyre::Result<Option<TraceFrame>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let frame = serde_json::from_str::<TraceFrame>(line)
        .map_err(|e| eyre::eyre!("invalid trace frame: {}", e))?;
    Ok(Some(frame))
}
