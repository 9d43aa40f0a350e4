mod loader;
mod sections;

pub use loader::{Config, DEFAULT_CONFIG_PATH};
pub use sections::{FrameConfig, SensorConfig, SensorsConfig, ServerConfig, TiltConfig};
