use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::sections::{FrameConfig, SensorsConfig, ServerConfig, TiltConfig};
use crate::cli::CliArgs;
use crate::error::AppError;
use crate::layout::Layout;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sensors: SensorsConfig,
    pub layout: Layout,
    pub frame: FrameConfig,
    pub tilt: TiltConfig,
}

impl Config {
    /// Loads the config file named on the command line, or the default one,
    /// then applies CLI overrides and validates the result. A missing default
    /// file falls back to built-in defaults; a missing explicit file is an error.
    pub fn load(cli_args: &CliArgs) -> Result<Self> {
        let mut config = match cli_args.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            None => {
                warn!(
                    "No config file at {}, using built-in defaults",
                    DEFAULT_CONFIG_PATH
                );
                Self::default()
            }
        };

        // Override config with CLI arguments
        config.override_with_cli_args(cli_args);

        config.validate()?;

        Ok(config)
    }

    pub fn from_file(config_path: &str) -> Result<Self> {
        info!("Loading configuration from {}", config_path);

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;

        Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", config_path))
    }

    pub fn from_toml_str(config_str: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        Ok(config)
    }

    fn override_with_cli_args(&mut self, args: &CliArgs) {
        if let Some(server_url) = &args.server_url {
            self.server.base_url = server_url.clone();
        }
        if let Some(fps) = args.fps {
            self.frame.fps = fps;
        }
        if let Some(packet_speed) = args.packet_speed {
            self.frame.packet_speed = packet_speed;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.server
            .validate()
            .map_err(AppError::config)
            .context("Invalid server configuration")?;
        self.sensors
            .validate()
            .map_err(AppError::config)
            .context("Invalid sensor configuration")?;
        self.layout
            .validate()
            .map_err(AppError::config)
            .context("Invalid layout configuration")?;
        self.frame
            .validate()
            .map_err(AppError::config)
            .context("Invalid frame configuration")?;
        self.tilt
            .validate()
            .map_err(AppError::config)
            .context("Invalid tilt configuration")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SensorKind;
    use crate::state::Rgba;
    use clap::Parser;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            base_url = "http://10.0.0.5:9000"

            [sensors.mpu]
            endpoint = "/v2/mpu"
            start_x = 210.0
            color = [255, 255, 0, 255]

            [frame]
            packet_speed = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.sensors.get(SensorKind::Mpu).endpoint, "/v2/mpu");
        assert_eq!(
            config.sensors.get(SensorKind::Mpu).color,
            Rgba::opaque(255, 255, 0)
        );
        assert_eq!(config.sensors.get(SensorKind::Imx).endpoint, "/imx477/sensor");
        assert_eq!(config.frame.packet_speed, 4.0);
        assert_eq!(config.frame.fps, 60);
        assert_eq!(config.tilt.limit, 15.0);
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let err = Config::from_toml_str("[frame]\nfps = \"fast\"").unwrap_err();
        assert!(matches!(err, AppError::ConfigParse(_)));
    }

    #[test]
    fn test_shipped_default_file_matches_defaults() {
        let config = Config::from_file(DEFAULT_CONFIG_PATH).unwrap();
        assert!(config.validate().is_ok());
        let defaults = Config::default();
        assert_eq!(config.server.base_url, defaults.server.base_url);
        assert_eq!(config.layout, defaults.layout);
        assert_eq!(config.sensors.get(SensorKind::Mpu), defaults.sensors.get(SensorKind::Mpu));
        assert_eq!(config.frame.packet_speed, defaults.frame.packet_speed);
    }

    #[test]
    fn test_invalid_section_names_the_section() {
        let mut config = Config::default();
        config.frame.fps = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid frame configuration");
        assert!(format!("{:#}", err).contains("FPS must be greater than 0"));
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::parse_from([
            "sensor_pipeline",
            "--server-url",
            "http://127.0.0.1:8123",
            "--fps",
            "30",
        ]);
        let mut config = Config::default();
        config.override_with_cli_args(&args);
        assert_eq!(config.server.base_url, "http://127.0.0.1:8123");
        assert_eq!(config.frame.fps, 30);
        assert_eq!(config.frame.packet_speed, 2.0);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let args = CliArgs::parse_from([
            "sensor_pipeline",
            "--config",
            "does/not/exist.toml",
        ]);
        assert!(Config::load(&args).is_err());
    }
}
