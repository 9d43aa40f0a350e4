//! Screen coordinates of the pipeline icons.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The three pipeline stages that carry an activity timer. The monitor at the
/// end of the pipeline has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Icon {
    Api,
    Queue,
    Websocket,
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Icon::Api => "api",
            Icon::Queue => "queue",
            Icon::Websocket => "websocket",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Row on which packets are spawned.
    pub origin_y: f64,
    pub api: Point,
    pub queue: Point,
    pub websocket: Point,
    pub monitor: Point,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            origin_y: 200.0,
            api: Point::new(250.0, 200.0),
            queue: Point::new(350.0, 200.0),
            websocket: Point::new(450.0, 200.0),
            monitor: Point::new(600.0, 200.0),
        }
    }
}

impl Layout {
    pub fn icon(&self, icon: Icon) -> Point {
        match icon {
            Icon::Api => self.api,
            Icon::Queue => self.queue,
            Icon::Websocket => self.websocket,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let stops = [self.api.x, self.queue.x, self.websocket.x, self.monitor.x];
        if stops.iter().any(|x| !x.is_finite()) || !self.origin_y.is_finite() {
            return Err("Layout coordinates must be finite".to_string());
        }
        if !stops.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(
                "Pipeline stops must be ordered left to right: api < queue < websocket < monitor"
                    .to_string(),
            );
        }
        Ok(())
    }
}
