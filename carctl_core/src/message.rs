//! Outbound messages at the semantic level. Bit packing belongs to the bus layer.

use crate::hud::HudOutput;
use crate::types::{Bus, Button};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Lkas11,
    Clu11,
    Mdps12,
    Scc12,
    LfaMfa,
}

impl MessageKind {
    pub fn can_id(self) -> u32 {
        match self {
            MessageKind::Lkas11 => 0x340,
            MessageKind::Clu11 => 0x4F1,
            MessageKind::Mdps12 => 0x251,
            MessageKind::Scc12 => 0x421,
            MessageKind::LfaMfa => 0x485,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Lkas11 => "LKAS11",
            MessageKind::Clu11 => "CLU11",
            MessageKind::Mdps12 => "MDPS12",
            MessageKind::Scc12 => "SCC12",
            MessageKind::LfaMfa => "LFAHDA_MFC",
        }
    }
}

/// Semantic fields per message kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Lkas11 {
        /// Rate-limited torque in raw steering units
        steer_torque: f32,
        steer_request: bool,
        /// Planner-level engagement, independent of the steering gate
        enabled: bool,
        left_lane: bool,
        right_lane: bool,
        hud: HudOutput,
    },
    Clu11 {
        button: Button,
        /// Cluster speed in the display unit
        speed: f32,
    },
    /// Keep-alive echo of the steering module's own status frame.
    Mdps12,
    Scc12 {
        /// m/s^2
        accel: f32,
        enabled: bool,
    },
    LfaMfa {
        enabled: bool,
    },
}

impl Payload {
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::Lkas11 { .. } => MessageKind::Lkas11,
            Payload::Clu11 { .. } => MessageKind::Clu11,
            Payload::Mdps12 => MessageKind::Mdps12,
            Payload::Scc12 { .. } => MessageKind::Scc12,
            Payload::LfaMfa { .. } => MessageKind::LfaMfa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutboundMessage {
    pub bus: Bus,
    /// Rolling counter value carried in the frame
    pub counter: u8,
    pub payload: Payload,
}

impl OutboundMessage {
    #[inline]
    pub fn new(bus: Bus, counter: u8, payload: Payload) -> Self {
        Self {
            bus,
            counter,
            payload,
        }
    }

    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// Button carried by a CLU11 frame, `None` for every other kind.
    pub fn button(&self) -> Option<Button> {
        match self.payload {
            Payload::Clu11 { button, .. } => Some(button),
            _ => None,
        }
    }
}
