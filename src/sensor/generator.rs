use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::readings::{ImxReading, MpuReading, SensorReading, TfLunaReading};
use super::SensorKind;
use crate::helpers::{round_to, time};

pub const SHARPNESS_MIN: f64 = 4.0;
pub const SHARPNESS_MAX: f64 = 6.0;

/// Produces random readings for the simulated sensors.
pub struct ReadingGenerator {
    rng: StdRng,
}

impl Default for ReadingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates the reading for `kind`. Only the MPU uses `tilt_deg`.
    pub fn reading_for(&mut self, kind: SensorKind, tilt_deg: f64) -> SensorReading {
        match kind {
            SensorKind::Imx => self.imx().into(),
            SensorKind::Mpu => self.mpu(tilt_deg).into(),
            SensorKind::TfLuna => self.tfluna().into(),
        }
    }

    pub fn imx(&mut self) -> ImxReading {
        ImxReading {
            sharpness: round_to(self.rng.gen_range(SHARPNESS_MIN..SHARPNESS_MAX), 3),
            brightness: round_to(self.rng.gen_range(0.3..0.8), 3),
            contrast: round_to(self.rng.gen_range(0.4..0.9), 3),
            timestamp: time(),
        }
    }

    /// Roll follows the operator's tilt with a little sensor noise on top.
    pub fn mpu(&mut self, tilt_deg: f64) -> MpuReading {
        MpuReading {
            roll: round_to(tilt_deg + self.rng.gen_range(-0.5..0.5), 2),
            pitch: round_to(self.rng.gen_range(-2.0..2.0), 2),
            yaw: round_to(self.rng.gen_range(0.0..360.0), 2),
            accel_x: round_to(self.rng.gen_range(-0.1..0.1), 3),
            accel_y: round_to(self.rng.gen_range(-0.1..0.1), 3),
            accel_z: round_to(9.81 + self.rng.gen_range(-0.05..0.05), 3),
            timestamp: time(),
        }
    }

    pub fn tfluna(&mut self) -> TfLunaReading {
        TfLunaReading {
            distance_m: round_to(self.rng.gen_range(0.2..8.0), 2),
            signal_strength: self.rng.gen_range(100..=1500),
            temperature_c: round_to(self.rng.gen_range(25.0..45.0), 1),
            timestamp: time(),
        }
    }
}
