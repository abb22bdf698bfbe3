//! Per-model behaviour flags.
//!
//! Model-specific quirks are data, not branches: the builtin table covers the
//! known fingerprints and a CSV may override individual rows.

use std::collections::HashMap;

use crate::types::VehicleModel;

/// Severity shown in the cluster when a lane departure is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaneWarning {
    #[default]
    High,
    Low,
}

impl LaneWarning {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            LaneWarning::Low => 1,
            LaneWarning::High => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VehiclePolicy {
    /// The MDPS faults when commanded below the low-speed threshold on the primary bus.
    pub low_speed_lkas_fault: bool,
    pub lane_warning: LaneWarning,
    /// The car carries the LFA MFA display frame.
    pub lfa_mfa: bool,
}

impl VehiclePolicy {
    /// Builtin behaviour for a fingerprinted model.
    pub fn builtin(model: VehicleModel) -> Self {
        use VehicleModel::*;
        Self {
            low_speed_lkas_fault: matches!(model, HyundaiGenesis),
            lane_warning: match model {
                HyundaiGenesis | GenesisG80 | GenesisG90 => LaneWarning::Low,
                _ => LaneWarning::High,
            },
            lfa_mfa: matches!(model, Sonata | SonataH | Palisade | SantaFe),
        }
    }
}

/// Builtin policies plus any overrides loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    overrides: HashMap<VehicleModel, VehiclePolicy>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the builtin row for `model`.
    pub fn with_override(mut self, model: VehicleModel, policy: VehiclePolicy) -> Self {
        self.overrides.insert(model, policy);
        self
    }

    pub fn lookup(&self, model: VehicleModel) -> VehiclePolicy {
        self.overrides
            .get(&model)
            .copied()
            .unwrap_or_else(|| VehiclePolicy::builtin(model))
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}
