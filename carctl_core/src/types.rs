//! Per-cycle input types: planner intents, vehicle snapshot and UI flags.

use core::fmt;
use core::str::FromStr;

use crate::error::{BuildError, InputError};
use crate::util::MS_TO_KPH;

/// CAN bus index as seen by the harness (0 = car side, 1 = moved MDPS/SCC, 2 = camera side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bus(pub u8);

impl Bus {
    pub const PRIMARY: Bus = Bus(0);
    /// Where LKAS11 is mirrored when MDPS or SCC was moved off the primary bus.
    pub const MIRROR: Bus = Bus(1);
    pub const CAMERA: Bus = Bus(2);
    pub const MAX_INDEX: u8 = 2;

    #[inline]
    pub fn is_primary(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus{}", self.0)
    }
}

macro_rules! vehicle_models {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Fingerprinted vehicle model.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum VehicleModel {
            $($variant),+
        }

        impl VehicleModel {
            pub const ALL: &'static [VehicleModel] = &[$(VehicleModel::$variant),+];

            /// Fingerprint name as used by the platform.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(VehicleModel::$variant => $name),+
                }
            }
        }
    };
}

vehicle_models! {
    Elantra => "ELANTRA",
    ElantraGtI30 => "ELANTRA_GT_I30",
    GenesisG80 => "GENESIS_G80",
    GenesisG90 => "GENESIS_G90",
    HyundaiGenesis => "HYUNDAI_GENESIS",
    Ioniq => "IONIQ",
    IoniqEvLtd => "IONIQ_EV_LTD",
    KiaForte => "KIA_FORTE",
    KiaNiroEv => "KIA_NIRO_EV",
    KiaOptima => "KIA_OPTIMA",
    KiaOptimaH => "KIA_OPTIMA_H",
    KiaSorento => "KIA_SORENTO",
    KiaStinger => "KIA_STINGER",
    Kona => "KONA",
    KonaEv => "KONA_EV",
    Palisade => "PALISADE",
    SantaFe => "SANTA_FE",
    Sonata => "SONATA",
    SonataH => "SONATA_H",
}

impl FromStr for VehicleModel {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        VehicleModel::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| BuildError::UnknownModel(name.to_string()))
    }
}

impl fmt::Display for VehicleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Steering-wheel cruise buttons, with their CLU11 `CF_Clu_CruiseSwState` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Button {
    #[default]
    None,
    ResumeAccel,
    SetCoast,
    Cancel,
}

impl Button {
    pub fn code(self) -> u8 {
        match self {
            Button::None => 0,
            Button::ResumeAccel => 1,
            Button::SetCoast => 2,
            Button::Cancel => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualAlert {
    #[default]
    None,
    SteerRequired,
    /// Any alert this controller does not render.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Actuators {
    pub gas: f32,
    pub brake: f32,
    pub steer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudInput {
    pub visual_alert: VisualAlert,
    pub left_lane: bool,
    pub right_lane: bool,
    pub left_lane_depart: bool,
    pub right_lane_depart: bool,
}

/// Cruise-control fields read back from SCC11/SCC12/CLU11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CruiseState {
    pub enabled: bool,
    pub standstill: bool,
    pub driver_override: u8,
    pub mode_sel: u8,
    pub lamp_set: bool,
    pub sw_state: u8,
}

impl CruiseState {
    /// Driver is pressing the accelerator over the cruise command.
    #[inline]
    pub fn accel_override(&self) -> bool {
        self.driver_override == 2
    }

    /// The physical set/resume switch is mid-press.
    #[inline]
    pub fn set_switch_pressed(&self) -> bool {
        matches!(self.sw_state, 1 | 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleSnapshot {
    /// m/s
    pub v_ego: f32,
    pub steering_torque: f32,
    pub left_blinker: bool,
    pub right_blinker: bool,
    pub left_blinker_flash: bool,
    pub right_blinker_flash: bool,
    pub cruise: CruiseState,
    /// LKAS11 `CF_Lkas_MsgCount` last seen from the camera
    pub lkas_msg_count: u8,
    /// SCC12 `CR_VSM_Alive`; `None` on cars without radar
    pub scc_alive_count: Option<u8>,
    /// CLU11 `CF_Clu_Vanz`, in the cluster's display unit
    pub clu_speed: f32,
    pub set_speed_in_mph: bool,
    pub lead_distance: f32,
    pub mdps_bus: Bus,
    pub scc_bus: Bus,
}

impl VehicleSnapshot {
    #[inline]
    pub fn v_ego_kph(&self) -> f32 {
        self.v_ego * MS_TO_KPH
    }

    #[inline]
    pub fn any_blinker(&self) -> bool {
        self.left_blinker || self.right_blinker || self.left_blinker_flash || self.right_blinker_flash
    }
}

/// Button/speed suggestion from the external curvature-aware speed estimator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedHint {
    pub button: Button,
    pub target_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleInput {
    /// Monotonic cycle index (100 Hz)
    pub cycle: u64,
    pub enabled: bool,
    pub cancel_requested: bool,
    pub actuators: Actuators,
    pub hud: HudInput,
    pub vehicle: VehicleSnapshot,
    pub speed_hint: Option<SpeedHint>,
}

fn finite(field: &'static str, v: f32) -> Result<(), InputError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(InputError::NonFinite(field))
    }
}

fn within(field: &'static str, v: f32, lo: f32, hi: f32) -> Result<(), InputError> {
    finite(field, v)?;
    if (lo..=hi).contains(&v) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value: f64::from(v),
        })
    }
}

fn counter4(field: &'static str, v: u8) -> Result<(), InputError> {
    if v < 16 {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value: f64::from(v),
        })
    }
}

fn bus(field: &'static str, b: Bus) -> Result<(), InputError> {
    if b.0 <= Bus::MAX_INDEX {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value: f64::from(b.0),
        })
    }
}

impl CycleInput {
    /// Boundary check; `update` assumes a validated input.
    pub fn validate(&self) -> Result<(), InputError> {
        within("actuators.gas", self.actuators.gas, 0.0, 1.0)?;
        within("actuators.brake", self.actuators.brake, 0.0, 1.0)?;
        within("actuators.steer", self.actuators.steer, -1.0, 1.0)?;

        let v = &self.vehicle;
        within("vehicle.v_ego", v.v_ego, -5.0, 100.0)?;
        finite("vehicle.steering_torque", v.steering_torque)?;
        within("vehicle.clu_speed", v.clu_speed, 0.0, 255.0)?;
        within("vehicle.lead_distance", v.lead_distance, 0.0, 255.0)?;
        counter4("vehicle.lkas_msg_count", v.lkas_msg_count)?;
        if let Some(alive) = v.scc_alive_count {
            counter4("vehicle.scc_alive_count", alive)?;
        }
        bus("vehicle.mdps_bus", v.mdps_bus)?;
        bus("vehicle.scc_bus", v.scc_bus)?;
        if v.cruise.mode_sel > 3 {
            return Err(InputError::OutOfRange {
                field: "vehicle.cruise.mode_sel",
                value: f64::from(v.cruise.mode_sel),
            });
        }

        if let Some(hint) = &self.speed_hint {
            within("speed_hint.target_speed", hint.target_speed, 0.0, 255.0)?;
        }
        Ok(())
    }
}
