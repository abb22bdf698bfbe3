//! Runtime configuration for the controller.
//!
//! Separate from the TOML schema in `carctl_config`; see `conversions` for the bridge.

/// Acceleration shaping limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelCfg {
    /// m/s^2
    pub max: f32,
    /// m/s^2, negative
    pub min: f32,
    /// Hysteresis half-width in normalized units.
    pub hyst_gap: f32,
}

impl AccelCfg {
    /// Normalized command to m/s^2.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.max.abs().max(self.min.abs())
    }
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

/// Steering gate thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LkasCfg {
    pub low_speed_kph: f32,
    /// Value the blinker timer is re-armed to (cycles).
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

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumeCfg {
    /// RES_ACCEL presses per burst.
    pub burst_len: u8,
    /// A new burst needs strictly more than this many cycles since the last one ended.
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

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedButtonCfg {
    /// A latched request aborts once its active timer exceeds this.
    pub max_active_cycles: u32,
    pub abort_wait_cycles: u32,
    pub override_wait_cycles: u32,
    /// Below this the latch is dropped.
    pub min_speed_kph: f32,
    /// Mode 3 presses without the set lamp only above this speed.
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

/// Everything the controller needs besides the model and the limiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerCfg {
    pub accel: AccelCfg,
    pub lkas: LkasCfg,
    pub resume: ResumeCfg,
    pub speed_button: SpeedButtonCfg,
    /// SCC12 and the CANCEL button may be emitted.
    pub longitudinal: bool,
    pub lkas_button_default: bool,
}

impl Default for ControllerCfg {
    fn default() -> Self {
        Self {
            accel: AccelCfg::default(),
            lkas: LkasCfg::default(),
            resume: ResumeCfg::default(),
            speed_button: SpeedButtonCfg::default(),
            longitudinal: false,
            lkas_button_default: true,
        }
    }
}
