mod generator;
mod readings;
mod worker;

pub use generator::ReadingGenerator;
pub use readings::{ImxReading, MpuReading, SensorReading, TfLunaReading};
pub use worker::{record_completion, send_reading, SensorWorker};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one simulated sensor. Doubles as the packet key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// IMX477 camera module, reports image sharpness.
    Imx,
    /// MPU inertial unit, reports orientation.
    Mpu,
    /// TF-Luna lidar, reports distance.
    TfLuna,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [SensorKind::Imx, SensorKind::Mpu, SensorKind::TfLuna];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Imx => "imx",
            SensorKind::Mpu => "mpu",
            SensorKind::TfLuna => "tfluna",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let names: Vec<&str> = SensorKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["imx", "mpu", "tfluna"]);
        assert_eq!(SensorKind::TfLuna.to_string(), "tfluna");
    }

    #[test]
    fn test_kind_serde_name() {
        let json = serde_json::to_string(&SensorKind::TfLuna).unwrap();
        assert_eq!(json, "\"tfluna\"");
    }
}
