//! Owned copy of the visual state, handed to the presentation layer so it can
//! draw without holding the lock.

use serde::Serialize;

use super::packet::{PacketStatus, Rgba};
use super::visual::VisualState;
use crate::layout::Icon;
use crate::sensor::SensorKind;

/// Which tripod pose to draw for the current tilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TiltPose {
    Center,
    SlightLeft,
    SlightRight,
    ExtremeLeft,
    ExtremeRight,
}

impl TiltPose {
    pub fn from_tilt(tilt_deg: f64) -> Self {
        if tilt_deg < -10.0 {
            TiltPose::ExtremeLeft
        } else if tilt_deg < -2.0 {
            TiltPose::SlightLeft
        } else if tilt_deg > 10.0 {
            TiltPose::ExtremeRight
        } else if tilt_deg > 2.0 {
            TiltPose::SlightRight
        } else {
            TiltPose::Center
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketView {
    pub key: SensorKind,
    pub x: f64,
    pub y: f64,
    pub color: Rgba,
    pub status: PacketStatus,
    /// Failed packets are drawn with an error marker.
    pub failed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IconView {
    pub icon: Icon,
    pub remaining_frames: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardView {
    pub distance_m: f64,
    pub roll_deg: f64,
    pub sharpness: f64,
    pub sharpness_bar: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Only packets that should be drawn.
    pub packets: Vec<PacketView>,
    pub icons: [IconView; 3],
    pub dashboard: DashboardView,
    pub tilt_deg: f64,
    pub tilt_pose: TiltPose,
    pub simulation_running: bool,
}

impl Snapshot {
    pub fn capture(state: &VisualState) -> Self {
        let packets = state
            .packets
            .values()
            .filter(|p| p.active)
            .map(|p| PacketView {
                key: p.key,
                x: p.x,
                y: p.y,
                color: p.color,
                status: p.status,
                failed: p.status == PacketStatus::Error,
            })
            .collect();

        let icon = |icon: Icon| IconView {
            icon,
            remaining_frames: state.timers.remaining(icon),
            active: state.timers.is_active(icon),
        };

        Self {
            packets,
            icons: [icon(Icon::Api), icon(Icon::Queue), icon(Icon::Websocket)],
            dashboard: DashboardView {
                distance_m: state.dashboard.distance_m,
                roll_deg: state.dashboard.roll_deg,
                sharpness: state.dashboard.sharpness,
                sharpness_bar: state.dashboard.sharpness_bar(),
            },
            tilt_deg: state.current_tilt,
            tilt_pose: TiltPose::from_tilt(state.current_tilt),
            simulation_running: state.simulation_running,
        }
    }
}
