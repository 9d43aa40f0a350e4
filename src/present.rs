//! Presentation seam. The renderer proper lives outside this crate; the
//! binary ships a presenter that reports state changes through the log.

use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::sensor::SensorKind;
use crate::state::{PacketStatus, Snapshot};

/// Consumes one snapshot per frame.
pub trait Presenter {
    fn present(&mut self, frame: u64, snapshot: &Snapshot);
}

/// Logs stage changes and dashboard updates as they happen, and a position
/// trace every `trace_interval` frames at debug level.
pub struct LogPresenter {
    trace_interval: u64,
    last_status: BTreeMap<SensorKind, PacketStatus>,
    last_snapshot: Option<Snapshot>,
}

impl LogPresenter {
    pub fn new(trace_interval: u64) -> Self {
        Self {
            trace_interval: trace_interval.max(1),
            last_status: BTreeMap::new(),
            last_snapshot: None,
        }
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, frame: u64, snapshot: &Snapshot) {
        let started = snapshot.simulation_running
            && !self
                .last_snapshot
                .as_ref()
                .is_some_and(|last| last.simulation_running);
        if started {
            self.last_status.clear();
            info!("Run started at frame {}", frame);
        }

        for packet in &snapshot.packets {
            if self.last_status.get(&packet.key) == Some(&packet.status) {
                continue;
            }
            if packet.failed {
                warn!(
                    "[frame {}] {} failed at x={:.1}",
                    frame, packet.key, packet.x
                );
            } else {
                info!(
                    "[frame {}] {} -> {:?} at x={:.1}",
                    frame, packet.key, packet.status, packet.x
                );
            }
            self.last_status.insert(packet.key, packet.status);
        }

        let dashboard_changed = self
            .last_snapshot
            .as_ref()
            .map_or(true, |last| last.dashboard != snapshot.dashboard);
        if dashboard_changed {
            let d = &snapshot.dashboard;
            info!(
                "Dashboard: distance {:.2} m | roll {:.1}° | sharpness {:.3} (bar {:.0}%)",
                d.distance_m,
                d.roll_deg,
                d.sharpness,
                d.sharpness_bar * 100.0
            );
        }

        let tilt_changed = self
            .last_snapshot
            .as_ref()
            .is_some_and(|last| last.tilt_deg != snapshot.tilt_deg);
        if tilt_changed {
            info!(
                "Tilt {:+.1}° ({:?})",
                snapshot.tilt_deg, snapshot.tilt_pose
            );
        }

        if frame % self.trace_interval == 0 && !snapshot.packets.is_empty() {
            let positions: Vec<String> = snapshot
                .packets
                .iter()
                .map(|p| format!("{}@{:.0}", p.key, p.x))
                .collect();
            let active_icons: Vec<String> = snapshot
                .icons
                .iter()
                .filter(|i| i.active)
                .map(|i| i.icon.to_string())
                .collect();
            debug!(
                "[frame {}] packets [{}] active icons [{}]",
                frame,
                positions.join(", "),
                active_icons.join(", ")
            );
        }

        self.last_snapshot = Some(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;
    use crate::state::{Packet, Rgba, VisualState};

    #[test]
    fn test_tracks_last_status() {
        let mut state = VisualState::new();
        state.begin_run();
        state.insert_packet(Packet::launched(
            SensorKind::Imx,
            Point::new(200.0, 200.0),
            Point::new(250.0, 200.0),
            Rgba::GREEN,
        ));

        let mut presenter = LogPresenter::new(30);
        presenter.present(1, &state.snapshot());
        assert_eq!(
            presenter.last_status.get(&SensorKind::Imx),
            Some(&PacketStatus::SendingToApi)
        );

        if let Some(p) = state.packets.get_mut(&SensorKind::Imx) {
            p.status = PacketStatus::Error;
        }
        presenter.present(2, &state.snapshot());
        assert_eq!(
            presenter.last_status.get(&SensorKind::Imx),
            Some(&PacketStatus::Error)
        );
    }
}
