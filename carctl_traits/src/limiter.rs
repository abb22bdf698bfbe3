/// Steering torque rate-limiter contract.
///
/// - limit(): bound `requested` in magnitude and in per-cycle delta relative to
///   `last_applied`, optionally taking the driver's own torque into account.
///
/// Implementations must be pure: the same inputs always yield the same output.
pub trait SteerLimiter {
    fn limit(&self, requested: f32, last_applied: f32, driver_torque: f32) -> f32;

    /// Largest torque magnitude the limiter will ever return.
    fn steer_max(&self) -> f32;
}

impl<T: SteerLimiter + ?Sized> SteerLimiter for Box<T> {
    #[inline]
    fn limit(&self, requested: f32, last_applied: f32, driver_torque: f32) -> f32 {
        (**self).limit(requested, last_applied, driver_torque)
    }

    #[inline]
    fn steer_max(&self) -> f32 {
        (**self).steer_max()
    }
}

/// Torque limits in raw steering units (LKAS11 `CR_Lkas_StrToqReq` counts).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueLimits {
    pub steer_max: f32,
    pub delta_up: f32,
    pub delta_down: f32,
    pub driver_allowance: f32,
    pub driver_multiplier: f32,
    pub driver_factor: f32,
}

impl Default for TorqueLimits {
    fn default() -> Self {
        Self {
            steer_max: 255.0,
            delta_up: 3.0,
            delta_down: 7.0,
            driver_allowance: 50.0,
            driver_multiplier: 2.0,
            driver_factor: 1.0,
        }
    }
}

/// Driver-torque aware limiter used by torque-controlled steering racks.
///
/// The window shrinks in the direction the driver is already pushing, then the
/// result is rate limited: growth in magnitude by at most `delta_up` per cycle,
/// decay by at most `delta_down`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdTorqueLimiter {
    limits: TorqueLimits,
}

impl StdTorqueLimiter {
    #[inline]
    pub fn new(limits: TorqueLimits) -> Self {
        Self { limits }
    }

    #[inline]
    pub fn limits(&self) -> &TorqueLimits {
        &self.limits
    }
}

impl SteerLimiter for StdTorqueLimiter {
    fn limit(&self, requested: f32, last_applied: f32, driver_torque: f32) -> f32 {
        let l = &self.limits;
        let driver_max = l.steer_max
            + (l.driver_allowance + driver_torque * l.driver_factor) * l.driver_multiplier;
        let driver_min = -l.steer_max
            + (-l.driver_allowance + driver_torque * l.driver_factor) * l.driver_multiplier;
        let max_allowed = l.steer_max.min(driver_max).max(0.0);
        let min_allowed = (-l.steer_max).max(driver_min).min(0.0);
        let mut torque = requested.clamp(min_allowed, max_allowed);

        // clamp() panics on an inverted range, so build the bounds explicitly
        let (lo, hi) = if last_applied > 0.0 {
            (
                (last_applied - l.delta_down).max(-l.delta_up),
                last_applied + l.delta_up,
            )
        } else {
            (
                last_applied - l.delta_up,
                (last_applied + l.delta_down).min(l.delta_up),
            )
        };
        torque = torque.max(lo).min(hi);
        // half-way requests round to the even integer
        torque.round_ties_even()
    }

    #[inline]
    fn steer_max(&self) -> f32 {
        self.limits.steer_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_by_delta_up_per_cycle() {
        let lim = StdTorqueLimiter::default();
        assert_eq!(lim.limit(255.0, 0.0, 0.0), 3.0);
        assert_eq!(lim.limit(255.0, 3.0, 0.0), 6.0);
        assert_eq!(lim.limit(-255.0, 0.0, 0.0), -3.0);
    }

    #[test]
    fn decays_by_delta_down() {
        let lim = StdTorqueLimiter::default();
        assert_eq!(lim.limit(0.0, 100.0, 0.0), 93.0);
        assert_eq!(lim.limit(0.0, -100.0, 0.0), -93.0);
    }

    #[test]
    fn driver_counter_torque_shrinks_window() {
        let lim = StdTorqueLimiter::default();
        // Driver pushing hard negative: positive window is 255 + (50 - 200) * 2 = -45 -> 0
        assert_eq!(lim.limit(255.0, 0.0, -200.0), 0.0);
    }

    #[test]
    fn half_way_requests_round_to_even() {
        let lim = StdTorqueLimiter::default();
        assert_eq!(lim.limit(2.5, 0.0, 0.0), 2.0);
        assert_eq!(lim.limit(1.5, 0.0, 0.0), 2.0);
        assert_eq!(lim.limit(-2.5, 0.0, 0.0), -2.0);
        assert_eq!(lim.limit(100.5, 100.0, 0.0), 100.0);
    }

    #[test]
    fn boxed_limiter_delegates() {
        let lim: Box<dyn SteerLimiter> = Box::new(StdTorqueLimiter::default());
        assert_eq!(lim.limit(255.0, 0.0, 0.0), 3.0);
        assert_eq!(lim.steer_max(), 255.0);
    }
}
