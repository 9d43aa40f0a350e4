use log::{debug, info, warn};

use super::{SensorKind, SensorReading};
use crate::error::SensorError;
use crate::layout::{Layout, Point};
use crate::state::{Packet, PacketStatus, Rgba, SharedState, VisualState};

/// One sensor's outbound call for a single run.
///
/// The worker first registers its packet (under the caller's lock), then
/// [`SensorWorker::run`] performs the POST without holding the lock and
/// records the outcome on its own packet. It never touches another key.
#[derive(Debug, Clone)]
pub struct SensorWorker {
    kind: SensorKind,
    url: String,
    reading: SensorReading,
    start_x: f64,
    color: Rgba,
}

impl SensorWorker {
    pub fn new(
        kind: SensorKind,
        url: impl Into<String>,
        reading: SensorReading,
        start_x: f64,
        color: Rgba,
    ) -> Self {
        Self {
            kind,
            url: url.into(),
            reading,
            start_x,
            color,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Inserts this worker's packet, heading for the API icon.
    pub fn register(&self, state: &mut VisualState, layout: &Layout) -> bool {
        let packet = Packet::launched(
            self.kind,
            Point::new(self.start_x, layout.origin_y),
            layout.api,
            self.color,
        );
        let inserted = state.insert_packet(packet);
        if inserted {
            debug!("Packet {} launched from x={}", self.kind, self.start_x);
        }
        inserted
    }

    /// Sends the reading and records the outcome. The lock is only taken
    /// after the response is in.
    pub async fn run(self, client: reqwest::Client, state: SharedState) {
        let outcome = send_reading(&client, &self.url, &self.reading).await;
        record_completion(&state, self.kind, outcome.map(|()| self.reading));
    }
}

/// POSTs `reading` as JSON to `url`. Any non-2xx status or transport error is
/// a failed call.
pub async fn send_reading(
    client: &reqwest::Client,
    url: &str,
    reading: &SensorReading,
) -> Result<(), SensorError> {
    let response = client
        .post(url)
        .json(reading)
        .send()
        .await
        .map_err(|e| SensorError::call_failed(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SensorError::call_failed(url, format!("status {}", status)));
    }
    Ok(())
}

/// Moves `kind`'s packet out of `SendingToApi`: to `ArrivedAtApi` with the
/// payload attached on success, to `Error` on failure. A packet that is gone
/// or already past that stage is left alone.
pub fn record_completion(
    state: &SharedState,
    kind: SensorKind,
    outcome: Result<SensorReading, SensorError>,
) {
    let mut guard = state.lock();
    let Some(packet) = guard.packets.get_mut(&kind) else {
        warn!("Completion for {} arrived but its packet no longer exists", kind);
        return;
    };
    if packet.status != PacketStatus::SendingToApi {
        warn!(
            "Completion for {} arrived in unexpected status {}",
            kind, packet.status
        );
        return;
    }

    match outcome {
        Ok(reading) => {
            packet.advance(PacketStatus::ArrivedAtApi);
            packet.payload = Some(reading);
            info!("Sensor {} delivered its reading", kind);
        }
        Err(e) => {
            packet.advance(PacketStatus::Error);
            warn!("{}", e);
        }
    }
}
