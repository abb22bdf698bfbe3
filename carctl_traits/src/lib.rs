//! Hardware-free seams between the controller core and its surroundings.

pub mod limiter;

pub use limiter::{StdTorqueLimiter, SteerLimiter, TorqueLimits};

/// Ordered writer for outbound messages.
///
/// Implementations must hand messages to the bus in the order `send` is
/// called; some vehicle faults are sensitive to intra-cycle ordering.
pub trait FrameSink<M> {
    fn send(&mut self, msg: &M) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Called once after every message of a cycle has been sent.
    fn end_cycle(&mut self, _cycle: u64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

impl<M> FrameSink<M> for Vec<M>
where
    M: Clone,
{
    fn send(&mut self, msg: &M) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.push(msg.clone());
        Ok(())
    }
}
