use log::{debug, error};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::packet::Packet;
use super::snapshot::Snapshot;
use crate::config::TiltConfig;
use crate::layout::Icon;
use crate::sensor::SensorKind;

/// Countdown timers driving the "active" animation of each pipeline icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IconTimers {
    pub api: u32,
    pub queue: u32,
    pub websocket: u32,
}

impl IconTimers {
    pub fn arm(&mut self, icon: Icon, frames: u32) {
        *self.slot(icon) = frames;
    }

    /// Decrements every running timer by one frame.
    pub fn tick(&mut self) {
        for icon in [Icon::Api, Icon::Queue, Icon::Websocket] {
            let timer = self.slot(icon);
            *timer = timer.saturating_sub(1);
        }
    }

    pub fn remaining(&self, icon: Icon) -> u32 {
        match icon {
            Icon::Api => self.api,
            Icon::Queue => self.queue,
            Icon::Websocket => self.websocket,
        }
    }

    pub fn is_active(&self, icon: Icon) -> bool {
        self.remaining(icon) > 0
    }

    fn slot(&mut self, icon: Icon) -> &mut u32 {
        match icon {
            Icon::Api => &mut self.api,
            Icon::Queue => &mut self.queue,
            Icon::Websocket => &mut self.websocket,
        }
    }
}

/// Values shown on the results dashboard. Only written when a packet
/// reaches the frontend.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dashboard {
    pub distance_m: f64,
    pub roll_deg: f64,
    pub sharpness: f64,
}

impl Dashboard {
    /// Sharpness mapped from its `[4.0, 6.0]` range onto a `[0, 1]` bar.
    pub fn sharpness_bar(&self) -> f64 {
        ((self.sharpness - 4.0) / 2.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltDirection {
    Left,
    Right,
}

#[derive(Debug, Default)]
pub struct VisualState {
    pub packets: BTreeMap<SensorKind, Packet>,
    pub timers: IconTimers,
    pub dashboard: Dashboard,
    pub current_tilt: f64,
    pub simulation_running: bool,
}

impl VisualState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets packets, dashboard and timers and marks a run as in progress.
    /// Returns false, changing nothing, when a run is already in progress.
    pub fn begin_run(&mut self) -> bool {
        if self.simulation_running {
            debug!("Run already in progress, ignoring start");
            return false;
        }
        self.packets.clear();
        self.dashboard = Dashboard::default();
        self.timers = IconTimers::default();
        self.simulation_running = true;
        true
    }

    /// Adds a freshly launched packet. Keys are unique among live packets, so
    /// a second packet for the same sensor is refused.
    pub fn insert_packet(&mut self, packet: Packet) -> bool {
        if self.packets.contains_key(&packet.key) {
            error!("Packet {} already exists in this run", packet.key);
            return false;
        }
        self.packets.insert(packet.key, packet);
        true
    }

    pub fn adjust_tilt(&mut self, direction: TiltDirection, tilt: &TiltConfig) -> f64 {
        let delta = match direction {
            TiltDirection::Left => -tilt.step,
            TiltDirection::Right => tilt.step,
        };
        self.current_tilt = (self.current_tilt + delta).clamp(-tilt.limit, tilt.limit);
        self.current_tilt
    }

    /// True when no packet still has work left, including when there are none.
    pub fn all_terminal(&self) -> bool {
        self.packets.values().all(Packet::is_terminal)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

/// Handle to the one `VisualState` shared by the frame loop and the sensor
/// workers. Every access goes through [`SharedState::lock`].
#[derive(Debug, Clone, Default)]
pub struct SharedState(Arc<Mutex<VisualState>>);

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the state lock. The guard releases it on drop, on every path.
    ///
    /// A worker panicking while holding the lock poisons it; the state is
    /// plain data that is consistent between statements, so it is recovered.
    pub fn lock(&self) -> MutexGuard<'_, VisualState> {
        self.0.lock().unwrap_or_else(|poisoned| {
            error!("Visual state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}
