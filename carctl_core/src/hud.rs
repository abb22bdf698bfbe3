//! Lane-assist HUD state carried inside LKAS11.

use crate::policy::VehiclePolicy;
use crate::types::{HudInput, VisualAlert};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HudState {
    #[default]
    NoLinesVisible,
    Active,
    Inactive,
    LeftOnly,
    RightOnly,
}

impl HudState {
    /// `CF_Lkas_SysState` code.
    pub fn code(self) -> u8 {
        match self {
            HudState::NoLinesVisible => 1,
            HudState::Active => 3,
            HudState::Inactive => 4,
            HudState::LeftOnly => 5,
            HudState::RightOnly => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudOutput {
    pub steer_warning: bool,
    pub state: HudState,
    /// 0 none, 1 low, 2 high
    pub left_warning: u8,
    pub right_warning: u8,
}

pub fn derive(
    lkas_active: bool,
    button_on: bool,
    hud: &HudInput,
    policy: &VehiclePolicy,
) -> HudOutput {
    let steer_warning = hud.visual_alert == VisualAlert::SteerRequired;

    let state = if !button_on {
        HudState::NoLinesVisible
    } else if (hud.left_lane && hud.right_lane) || steer_warning {
        if lkas_active || steer_warning {
            HudState::Active
        } else {
            HudState::Inactive
        }
    } else if hud.left_lane {
        HudState::LeftOnly
    } else if hud.right_lane {
        HudState::RightOnly
    } else {
        HudState::NoLinesVisible
    };

    let level = |depart: bool| if depart { policy.lane_warning.code() } else { 0 };

    HudOutput {
        steer_warning,
        state,
        left_warning: level(hud.left_lane_depart),
        right_warning: level(hud.right_lane_depart),
    }
}
