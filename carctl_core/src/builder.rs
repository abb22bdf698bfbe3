//! Type-state builder for `CarController` and generic `build_controller` constructor.
//!
//! The builder enforces at compile time that a vehicle model is provided before
//! `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;

use carctl_traits::{StdTorqueLimiter, SteerLimiter};

use crate::config::{AccelCfg, ControllerCfg, LkasCfg, ResumeCfg, SpeedButtonCfg};
use crate::controller::{CarController, ControllerCore};
use crate::error::{BuildError, Result};
use crate::policy::PolicyTable;
use crate::state::ControllerState;
use crate::types::VehicleModel;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `CarController`. All fields are validated on `build()`.
pub struct ControllerBuilder<Mo> {
    model: Option<VehicleModel>,
    limiter: Option<Box<dyn SteerLimiter + Send>>,
    accel: Option<AccelCfg>,
    lkas: Option<LkasCfg>,
    resume: Option<ResumeCfg>,
    speed_button: Option<SpeedButtonCfg>,
    longitudinal: bool,
    lkas_button_default: bool,
    policies: Option<PolicyTable>,
    _mo: PhantomData<Mo>,
}

impl Default for ControllerBuilder<Missing> {
    fn default() -> Self {
        Self {
            model: None,
            limiter: None,
            accel: None,
            lkas: None,
            resume: None,
            speed_button: None,
            longitudinal: false,
            lkas_button_default: true,
            policies: None,
            _mo: PhantomData,
        }
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Validate configuration and construct a `ControllerCore`.
///
/// Shared by `ControllerBuilder::try_build()` and `build_controller()`.
fn validate_and_build<L: SteerLimiter>(
    model: VehicleModel,
    limiter: L,
    cfg: ControllerCfg,
    policies: &PolicyTable,
) -> Result<ControllerCore<L>> {
    let a = &cfg.accel;
    if !a.max.is_finite() || a.max <= 0.0 {
        return Err(invalid("accel max must be > 0"));
    }
    if !a.min.is_finite() || a.min >= 0.0 {
        return Err(invalid("accel min must be < 0"));
    }
    if !(0.0..=0.5).contains(&a.hyst_gap) {
        return Err(invalid("accel hysteresis gap must be in [0, 0.5]"));
    }
    let steer_max = limiter.steer_max();
    if !steer_max.is_finite() || steer_max <= 0.0 {
        return Err(invalid("limiter steer_max must be > 0"));
    }
    if !cfg.lkas.low_speed_kph.is_finite() || cfg.lkas.low_speed_kph < 0.0 {
        return Err(invalid("lkas low speed threshold must be >= 0"));
    }
    if cfg.resume.burst_len == 0 {
        return Err(invalid("resume burst length must be >= 1"));
    }
    if cfg.speed_button.max_active_cycles == 0 {
        return Err(invalid("speed button active window must be >= 1 cycle"));
    }
    if !cfg.speed_button.min_speed_kph.is_finite()
        || !cfg.speed_button.mode3_min_speed_kph.is_finite()
    {
        return Err(invalid("speed button thresholds must be finite"));
    }

    let policy = policies.lookup(model);
    tracing::debug!(%model, ?policy, longitudinal = cfg.longitudinal, "controller built");

    Ok(ControllerCore {
        model,
        policy,
        cfg,
        limiter,
        state: ControllerState::new(cfg.lkas_button_default, cfg.longitudinal),
        last_report: None,
    })
}

impl<Mo> ControllerBuilder<Mo> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<CarController> {
        let model = self
            .model
            .ok_or_else(|| eyre::Report::new(BuildError::MissingModel))?;
        let limiter = self
            .limiter
            .unwrap_or_else(|| Box::new(StdTorqueLimiter::default()));
        let cfg = ControllerCfg {
            accel: self.accel.unwrap_or_default(),
            lkas: self.lkas.unwrap_or_default(),
            resume: self.resume.unwrap_or_default(),
            speed_button: self.speed_button.unwrap_or_default(),
            longitudinal: self.longitudinal,
            lkas_button_default: self.lkas_button_default,
        };
        let policies = self.policies.unwrap_or_default();
        let inner = validate_and_build(model, limiter, cfg, &policies)?;
        Ok(CarController { inner })
    }
}

/// Chainable setters that do not affect type-state.
impl<Mo> ControllerBuilder<Mo> {
    pub fn with_limiter(mut self, limiter: impl SteerLimiter + Send + 'static) -> Self {
        self.limiter = Some(Box::new(limiter));
        self
    }
    pub fn with_accel(mut self, accel: AccelCfg) -> Self {
        self.accel = Some(accel);
        self
    }
    pub fn with_lkas(mut self, lkas: LkasCfg) -> Self {
        self.lkas = Some(lkas);
        self
    }
    pub fn with_resume(mut self, resume: ResumeCfg) -> Self {
        self.resume = Some(resume);
        self
    }
    pub fn with_speed_button(mut self, speed_button: SpeedButtonCfg) -> Self {
        self.speed_button = Some(speed_button);
        self
    }
    /// Allow SCC12 and CANCEL frames.
    pub fn with_longitudinal(mut self, enabled: bool) -> Self {
        self.longitudinal = enabled;
        self
    }
    pub fn with_lkas_button(mut self, on: bool) -> Self {
        self.lkas_button_default = on;
        self
    }
    pub fn with_policies(mut self, policies: PolicyTable) -> Self {
        self.policies = Some(policies);
        self
    }
    /// Apply a whole runtime config at once.
    pub fn with_config(self, cfg: ControllerCfg) -> Self {
        self.with_accel(cfg.accel)
            .with_lkas(cfg.lkas)
            .with_resume(cfg.resume)
            .with_speed_button(cfg.speed_button)
            .with_longitudinal(cfg.longitudinal)
            .with_lkas_button(cfg.lkas_button_default)
    }
}

// Setters that advance type-state
impl ControllerBuilder<Missing> {
    pub fn with_model(self, model: VehicleModel) -> ControllerBuilder<Set> {
        ControllerBuilder {
            model: Some(model),
            limiter: self.limiter,
            accel: self.accel,
            lkas: self.lkas,
            resume: self.resume,
            speed_button: self.speed_button,
            longitudinal: self.longitudinal,
            lkas_button_default: self.lkas_button_default,
            policies: self.policies,
            _mo: PhantomData,
        }
    }

    /// Resolve a fingerprint name such as `"SONATA"`.
    pub fn with_model_name(self, name: &str) -> Result<ControllerBuilder<Set>> {
        let model = name.parse::<VehicleModel>().map_err(eyre::Report::new)?;
        Ok(self.with_model(model))
    }
}

impl ControllerBuilder<Set> {
    /// Validate and build. Only available once the model is set.
    pub fn build(self) -> Result<CarController> {
        self.try_build()
    }
}

/// Generic, statically-dispatched alias using the unified core.
pub type ControllerG<L> = ControllerCore<L>;

/// Build a generic, statically-dispatched controller around a concrete limiter.
///
/// Delegates to the shared `validate_and_build`.
pub fn build_controller<L: SteerLimiter>(
    model: VehicleModel,
    limiter: L,
    cfg: ControllerCfg,
    policies: Option<&PolicyTable>,
) -> Result<ControllerG<L>> {
    match policies {
        Some(p) => validate_and_build(model, limiter, cfg, p),
        None => validate_and_build(model, limiter, cfg, &PolicyTable::default()),
    }
}
