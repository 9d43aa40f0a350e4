use serde::{Deserialize, Serialize};

use crate::sensor::SensorKind;
use crate::state::Rgba;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Root URL of the mock sensor server; endpoints are appended to it.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!(
                "Server base URL must start with http:// or https://, got {}",
                self.base_url
            ));
        }
        Ok(())
    }
}

/// Launch parameters of one sensor worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub endpoint: String,
    pub start_x: f64,
    pub color: Rgba,
}

impl SensorConfig {
    pub fn new(endpoint: &str, start_x: f64, color: Rgba) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            start_x,
            color,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    pub imx: SensorConfig,
    pub mpu: SensorConfig,
    pub tfluna: SensorConfig,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            imx: SensorConfig::new("/imx477/sensor", 200.0, Rgba::GREEN),
            mpu: SensorConfig::new("/mpu/sensor", 230.0, Rgba::BLUE),
            tfluna: SensorConfig::new("/tfluna/sensor", 260.0, Rgba::RED),
        }
    }
}

impl SensorsConfig {
    pub fn get(&self, kind: SensorKind) -> &SensorConfig {
        match kind {
            SensorKind::Imx => &self.imx,
            SensorKind::Mpu => &self.mpu,
            SensorKind::TfLuna => &self.tfluna,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorKind, &SensorConfig)> {
        SensorKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    pub fn validate(&self) -> Result<(), String> {
        for (kind, sensor) in self.iter() {
            if sensor.endpoint.trim().is_empty() {
                return Err(format!("Endpoint for sensor {} cannot be empty", kind));
            }
            if !sensor.start_x.is_finite() {
                return Err(format!("Start position for sensor {} must be finite", kind));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub fps: u32,
    /// Horizontal distance a packet covers per frame, in pixels.
    pub packet_speed: f64,
    /// How many frames an icon stays animated after a packet reaches it.
    pub icon_timer_frames: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            packet_speed: 2.0,
            icon_timer_frames: 60,
        }
    }
}

impl FrameConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.fps == 0 {
            return Err("FPS must be greater than 0".to_string());
        }
        if !(self.packet_speed.is_finite() && self.packet_speed > 0.0) {
            return Err("Packet speed must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Degrees added or removed per tilt trigger.
    pub step: f64,
    /// Tilt is kept within `[-limit, limit]` degrees.
    pub limit: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            step: 0.5,
            limit: 15.0,
        }
    }
}

impl TiltConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err("Tilt step must be greater than 0".to_string());
        }
        if !(self.limit.is_finite() && self.limit >= 0.0) {
            return Err("Tilt limit must be non-negative".to_string());
        }
        Ok(())
    }
}
