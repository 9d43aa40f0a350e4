use serde::{Deserialize, Serialize};

use super::SensorKind;

/// IMX477 camera frame quality sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImxReading {
    /// Sharpness score, nominally in `[4.0, 6.0)`.
    pub sharpness: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub timestamp: f64,
}

/// MPU orientation sample, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MpuReading {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub timestamp: f64,
}

/// TF-Luna lidar distance sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TfLunaReading {
    pub distance_m: f64,
    pub signal_strength: u16,
    pub temperature_c: f64,
    pub timestamp: f64,
}

/// A generated reading of any sensor kind. Serializes as the bare inner
/// reading, which is the body POSTed to the sensor endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorReading {
    Sharpness(ImxReading),
    Orientation(MpuReading),
    Distance(TfLunaReading),
}

impl SensorReading {
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorReading::Sharpness(_) => SensorKind::Imx,
            SensorReading::Orientation(_) => SensorKind::Mpu,
            SensorReading::Distance(_) => SensorKind::TfLuna,
        }
    }
}

impl From<ImxReading> for SensorReading {
    fn from(reading: ImxReading) -> Self {
        SensorReading::Sharpness(reading)
    }
}

impl From<MpuReading> for SensorReading {
    fn from(reading: MpuReading) -> Self {
        SensorReading::Orientation(reading)
    }
}

impl From<TfLunaReading> for SensorReading {
    fn from(reading: TfLunaReading) -> Self {
        SensorReading::Distance(reading)
    }
}
