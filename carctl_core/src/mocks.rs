//! Test and helper sinks for carctl_core

use carctl_traits::FrameSink;

use crate::message::OutboundMessage;

/// Records messages grouped by cycle, as the bus layer would see them.
#[derive(Debug, Default)]
pub struct CycleRecorder {
    pending: Vec<OutboundMessage>,
    pub cycles: Vec<(u64, Vec<OutboundMessage>)>,
}

impl CycleRecorder {
    pub fn messages_at(&self, cycle: u64) -> Option<&[OutboundMessage]> {
        self.cycles
            .iter()
            .find(|(c, _)| *c == cycle)
            .map(|(_, m)| m.as_slice())
    }
}

impl FrameSink<OutboundMessage> for CycleRecorder {
    fn send(&mut self, msg: &OutboundMessage) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.pending.push(*msg);
        Ok(())
    }

    fn end_cycle(&mut self, cycle: u64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.cycles.push((cycle, std::mem::take(&mut self.pending)));
        Ok(())
    }
}

/// A sink that accepts `budget` messages and then fails, like a bus that went away.
#[derive(Debug)]
pub struct FailingSink {
    budget: usize,
}

impl FailingSink {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }
}

impl FrameSink<OutboundMessage> for FailingSink {
    fn send(&mut self, _msg: &OutboundMessage) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.budget == 0 {
            return Err(Box::new(std::io::Error::other("bus offline")));
        }
        self.budget -= 1;
        Ok(())
    }
}
