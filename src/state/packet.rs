use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::layout::Point;
use crate::sensor::{SensorKind, SensorReading};

/// Pipeline stage of a packet. Variants are declared in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PacketStatus {
    Idle,
    SendingToApi,
    ArrivedAtApi,
    SendingToRabbit,
    ArrivedAtRabbit,
    SendingToWebsocket,
    ArrivedAtWebsocket,
    SendingToFrontend,
    Done,
    Error,
}

impl PacketStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PacketStatus::Done | PacketStatus::Error)
    }

    /// Whether `self -> next` is an edge of the pipeline. `Error` is only
    /// reachable while the API call is still pending.
    pub fn can_advance_to(self, next: PacketStatus) -> bool {
        use PacketStatus::*;
        matches!(
            (self, next),
            (Idle, SendingToApi)
                | (SendingToApi, ArrivedAtApi)
                | (SendingToApi, Error)
                | (ArrivedAtApi, SendingToRabbit)
                | (SendingToRabbit, ArrivedAtRabbit)
                | (ArrivedAtRabbit, SendingToWebsocket)
                | (SendingToWebsocket, ArrivedAtWebsocket)
                | (ArrivedAtWebsocket, SendingToFrontend)
                | (SendingToFrontend, Done)
        )
    }
}

impl fmt::Display for PacketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 8-bit RGBA colour. Reads from config as `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    pub const GREEN: Rgba = Rgba::opaque(0, 255, 0);
    pub const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// One sensor's token travelling through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub key: SensorKind,
    /// Drawn while true. Failed packets stay active so their marker remains visible.
    pub active: bool,
    pub x: f64,
    pub y: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub color: Rgba,
    pub status: PacketStatus,
    /// Set once the API has acknowledged the reading.
    pub payload: Option<SensorReading>,
}

impl Packet {
    /// A packet that has just left its sensor and is heading for the API.
    pub fn launched(key: SensorKind, start: Point, target: Point, color: Rgba) -> Self {
        Self {
            key,
            active: true,
            x: start.x,
            y: start.y,
            target_x: target.x,
            target_y: target.y,
            color,
            status: PacketStatus::SendingToApi,
            payload: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Exact comparison is sound because movement clamps onto the target.
    pub fn at_target(&self) -> bool {
        self.x == self.target_x
    }

    pub fn retarget(&mut self, target: Point) {
        self.target_x = target.x;
        self.target_y = target.y;
    }

    /// Moves one step of `speed` toward the target on x, landing exactly on
    /// it once within a step. y snaps to its target.
    pub fn step_toward_target(&mut self, speed: f64) {
        let remaining = self.target_x - self.x;
        if remaining.abs() > speed {
            self.x += speed.copysign(remaining);
        } else {
            self.x = self.target_x;
        }
        self.y = self.target_y;
    }

    /// Applies `next` if it is a pipeline edge from the current status.
    /// Returns false and leaves the packet untouched otherwise.
    pub fn advance(&mut self, next: PacketStatus) -> bool {
        if !self.status.can_advance_to(next) {
            warn!(
                "Rejected transition {} -> {} for packet {}",
                self.status, next, self.key
            );
            return false;
        }
        self.status = next;
        true
    }
}
