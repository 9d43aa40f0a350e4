//! Per-frame driver of the packet state machine.
//!
//! Once a worker has moved its packet to `ArrivedAtApi`, the rest of the
//! journey depends only on position: each stage change happens on the frame
//! the packet lands exactly on its current target.

use log::{debug, info, warn};

use crate::config::FrameConfig;
use crate::layout::{Icon, Layout};
use crate::sensor::SensorReading;
use crate::state::{Dashboard, IconTimers, Packet, PacketStatus, SharedState, VisualState};

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Packets still short of `Done` or `Error` at the end of the frame.
    pub in_flight: usize,
    /// The run flag was cleared on this frame.
    pub run_finished: bool,
}

#[derive(Debug, Clone)]
pub struct PacketDriver {
    layout: Layout,
    packet_speed: f64,
    icon_timer_frames: u32,
}

impl PacketDriver {
    pub fn new(layout: Layout, frame: &FrameConfig) -> Self {
        Self {
            layout,
            packet_speed: frame.packet_speed,
            icon_timer_frames: frame.icon_timer_frames,
        }
    }

    /// Advances the simulation by one frame inside a single critical section.
    pub fn step(&self, state: &SharedState) -> FrameSummary {
        let mut guard = state.lock();
        self.step_locked(&mut guard)
    }

    pub fn step_locked(&self, state: &mut VisualState) -> FrameSummary {
        let VisualState {
            packets,
            timers,
            dashboard,
            simulation_running,
            ..
        } = state;

        timers.tick();

        for packet in packets.values_mut() {
            if packet.is_terminal() {
                continue;
            }

            packet.step_toward_target(self.packet_speed);
            if packet.at_target() {
                self.advance_stage(packet, timers, dashboard);
            }
        }

        // Counted after the moves so a packet retired this frame ends the run now
        let in_flight = packets.values().filter(|p| !p.is_terminal()).count();
        let was_running = *simulation_running;
        if in_flight == 0 {
            *simulation_running = false;
        }
        let run_finished = was_running && !*simulation_running;
        if run_finished {
            info!("Run finished, all packets are terminal");
        }

        FrameSummary {
            in_flight,
            run_finished,
        }
    }

    fn advance_stage(&self, packet: &mut Packet, timers: &mut IconTimers, dashboard: &mut Dashboard) {
        let from = packet.status;
        match from {
            PacketStatus::ArrivedAtApi => {
                timers.arm(Icon::Api, self.icon_timer_frames);
                packet.advance(PacketStatus::SendingToRabbit);
                packet.retarget(self.layout.queue);
            }
            PacketStatus::SendingToRabbit => {
                packet.advance(PacketStatus::ArrivedAtRabbit);
            }
            PacketStatus::ArrivedAtRabbit => {
                timers.arm(Icon::Queue, self.icon_timer_frames);
                packet.advance(PacketStatus::SendingToWebsocket);
                packet.retarget(self.layout.websocket);
            }
            PacketStatus::SendingToWebsocket => {
                packet.advance(PacketStatus::ArrivedAtWebsocket);
            }
            PacketStatus::ArrivedAtWebsocket => {
                timers.arm(Icon::Websocket, self.icon_timer_frames);
                packet.advance(PacketStatus::SendingToFrontend);
                packet.retarget(self.layout.monitor);
            }
            PacketStatus::SendingToFrontend => {
                packet.advance(PacketStatus::Done);
                packet.active = false;
                match &packet.payload {
                    Some(reading) => publish(reading, dashboard),
                    None => warn!("Packet {} reached the frontend without a payload", packet.key),
                }
            }
            // Parked at the API until the worker reports back
            PacketStatus::SendingToApi => return,
            PacketStatus::Idle | PacketStatus::Done | PacketStatus::Error => return,
        }
        debug!("Packet {}: {} -> {}", packet.key, from, packet.status);
    }
}

/// Writes the one dashboard field that belongs to `reading`'s kind.
fn publish(reading: &SensorReading, dashboard: &mut Dashboard) {
    match reading {
        SensorReading::Distance(r) => dashboard.distance_m = r.distance_m,
        SensorReading::Orientation(r) => dashboard.roll_deg = r.roll,
        SensorReading::Sharpness(r) => dashboard.sharpness = r.sharpness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SensorsConfig};
    use crate::error::SensorError;
    use crate::sensor::{
        record_completion, ImxReading, MpuReading, SensorKind, SensorWorker, TfLunaReading,
    };
    use std::collections::BTreeMap;

    const MAX_FRAMES: usize = 2_000;

    fn payload(kind: SensorKind) -> SensorReading {
        match kind {
            SensorKind::Imx => ImxReading {
                sharpness: 5.0,
                brightness: 0.5,
                contrast: 0.6,
                timestamp: 0.0,
            }
            .into(),
            SensorKind::Mpu => MpuReading {
                roll: 4.5,
                pitch: 0.0,
                yaw: 90.0,
                accel_x: 0.0,
                accel_y: 0.0,
                accel_z: 9.81,
                timestamp: 0.0,
            }
            .into(),
            SensorKind::TfLuna => TfLunaReading {
                distance_m: 1.23,
                signal_strength: 1000,
                temperature_c: 30.0,
                timestamp: 0.0,
            }
            .into(),
        }
    }

    /// Starts a run with all three packets registered and no completions yet.
    fn started_run() -> (SharedState, PacketDriver) {
        let config = Config::default();
        let sensors = SensorsConfig::default();
        let state = SharedState::new();
        {
            let mut guard = state.lock();
            assert!(guard.begin_run());
            for (kind, sensor) in sensors.iter() {
                let worker = SensorWorker::new(
                    kind,
                    config.server.url_for(&sensor.endpoint),
                    payload(kind),
                    sensor.start_x,
                    sensor.color,
                );
                assert!(worker.register(&mut guard, &config.layout));
            }
        }
        let driver = PacketDriver::new(config.layout.clone(), &config.frame);
        (state, driver)
    }

    fn succeed(state: &SharedState, kind: SensorKind) {
        record_completion(state, kind, Ok(payload(kind)));
    }

    fn fail(state: &SharedState, kind: SensorKind) {
        record_completion(state, kind, Err(SensorError::call_failed("/x", "refused")));
    }

    fn run_until_idle(state: &SharedState, driver: &PacketDriver) -> usize {
        for frame in 1..=MAX_FRAMES {
            driver.step(state);
            if !state.lock().simulation_running {
                return frame;
            }
        }
        panic!("run did not finish within {} frames", MAX_FRAMES);
    }

    #[test]
    fn test_successful_run_updates_dashboard() {
        let (state, driver) = started_run();
        for kind in SensorKind::ALL {
            succeed(&state, kind);
        }

        run_until_idle(&state, &driver);

        let guard = state.lock();
        assert_eq!(guard.dashboard.distance_m, 1.23);
        assert_eq!(guard.dashboard.roll_deg, 4.5);
        assert_eq!(guard.dashboard.sharpness_bar(), 0.5);
        assert!(!guard.simulation_running);
        for packet in guard.packets.values() {
            assert_eq!(packet.status, PacketStatus::Done);
            assert!(!packet.active);
            assert_eq!(packet.x, 600.0);
        }
    }

    #[test]
    fn test_transitions_follow_pipeline_edges() {
        let (state, driver) = started_run();
        for kind in SensorKind::ALL {
            succeed(&state, kind);
        }

        let mut previous: BTreeMap<SensorKind, (PacketStatus, f64)> = state
            .lock()
            .packets
            .values()
            .map(|p| (p.key, (p.status, p.target_x)))
            .collect();
        let mut seen = Vec::new();

        for _ in 0..MAX_FRAMES {
            driver.step(&state);
            let guard = state.lock();
            for packet in guard.packets.values() {
                let (status, target_x) = previous[&packet.key];
                if packet.status != status {
                    assert!(
                        status.can_advance_to(packet.status),
                        "{}: {} -> {}",
                        packet.key,
                        status,
                        packet.status
                    );
                    if packet.key == SensorKind::Imx {
                        seen.push(packet.status);
                    }
                } else {
                    assert_eq!(packet.target_x, target_x, "target changed without a transition");
                }
                previous.insert(packet.key, (packet.status, packet.target_x));
            }
            if !guard.simulation_running {
                break;
            }
        }

        assert_eq!(
            seen,
            vec![
                PacketStatus::SendingToRabbit,
                PacketStatus::ArrivedAtRabbit,
                PacketStatus::SendingToWebsocket,
                PacketStatus::ArrivedAtWebsocket,
                PacketStatus::SendingToFrontend,
                PacketStatus::Done,
            ]
        );
    }

    #[test]
    fn test_run_flag_tracks_in_flight_packets() {
        let (state, driver) = started_run();
        succeed(&state, SensorKind::Imx);
        succeed(&state, SensorKind::TfLuna);

        for frame in 0..MAX_FRAMES {
            if frame == 400 {
                succeed(&state, SensorKind::Mpu);
            }
            let summary = driver.step(&state);
            let guard = state.lock();
            let expected = !guard.packets.is_empty() && !guard.all_terminal();
            assert_eq!(guard.simulation_running, expected);
            assert_eq!(summary.in_flight > 0, expected);
            if !guard.simulation_running {
                assert!(frame > 400);
                assert!(summary.run_finished);
                return;
            }
        }
        panic!("run did not finish");
    }

    #[test]
    fn test_dashboard_written_on_done_frame_only() {
        let (state, driver) = started_run();
        succeed(&state, SensorKind::TfLuna);
        fail(&state, SensorKind::Imx);
        fail(&state, SensorKind::Mpu);

        let mut done_seen = false;
        for _ in 0..MAX_FRAMES {
            let before = state.lock().packets[&SensorKind::TfLuna].status;
            driver.step(&state);
            let guard = state.lock();
            let after = guard.packets[&SensorKind::TfLuna].status;
            if before == PacketStatus::SendingToFrontend && after == PacketStatus::Done {
                assert_eq!(guard.dashboard.distance_m, 1.23);
                done_seen = true;
            } else if !done_seen {
                assert_eq!(guard.dashboard.distance_m, 0.0);
            }
            // failed packets never reach the dashboard
            assert_eq!(guard.dashboard.roll_deg, 0.0);
            assert_eq!(guard.dashboard.sharpness, 0.0);
            if !guard.simulation_running {
                break;
            }
        }
        assert!(done_seen);
    }

    #[test]
    fn test_failed_packet_stays_at_initial_position() {
        let (state, driver) = started_run();
        fail(&state, SensorKind::Mpu);
        succeed(&state, SensorKind::Imx);

        // TF-Luna still pending: the run must not end
        for _ in 0..500 {
            driver.step(&state);
        }
        {
            let guard = state.lock();
            assert!(guard.simulation_running);
            assert_eq!(guard.packets[&SensorKind::Imx].status, PacketStatus::Done);
        }

        succeed(&state, SensorKind::TfLuna);
        run_until_idle(&state, &driver);

        let guard = state.lock();
        let failed = &guard.packets[&SensorKind::Mpu];
        assert_eq!(failed.status, PacketStatus::Error);
        assert!(failed.active);
        assert_eq!((failed.x, failed.y), (230.0, 200.0));
        assert_eq!(guard.packets[&SensorKind::TfLuna].status, PacketStatus::Done);
        assert_eq!(guard.dashboard.roll_deg, 0.0);
    }

    #[test]
    fn test_pending_packet_parks_at_api() {
        let (state, driver) = started_run();
        for _ in 0..100 {
            driver.step(&state);
        }
        let guard = state.lock();
        assert!(guard.simulation_running);
        for packet in guard.packets.values() {
            assert_eq!(packet.status, PacketStatus::SendingToApi);
            assert_eq!(packet.x, 250.0);
        }
        assert_eq!(guard.timers, IconTimers::default());
    }

    #[test]
    fn test_icon_timer_armed_on_arrival() {
        let (state, driver) = started_run();
        succeed(&state, SensorKind::Imx);

        // imx starts at x=200 and needs 25 frames to reach the API at x=250
        for _ in 0..25 {
            driver.step(&state);
        }
        {
            let guard = state.lock();
            let packet = &guard.packets[&SensorKind::Imx];
            assert_eq!(packet.status, PacketStatus::SendingToRabbit);
            assert_eq!(packet.target_x, 350.0);
            assert_eq!(guard.timers.api, 60);
        }

        driver.step(&state);
        assert_eq!(state.lock().timers.api, 59);
    }

    #[test]
    fn test_empty_state_clears_run_flag() {
        let state = SharedState::new();
        state.lock().simulation_running = true;
        let driver = PacketDriver::new(Layout::default(), &FrameConfig::default());
        let summary = driver.step(&state);
        assert!(summary.run_finished);
        assert_eq!(summary.in_flight, 0);
        assert!(!state.lock().simulation_running);
    }
}
