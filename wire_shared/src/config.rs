//! Renderer configuration.
//!
//! Loads viewer configuration from JSON strings/files (file IO left to the
//! app).

use serde::{Deserialize, Serialize};

/// Configuration shared by rendering frontends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Output surface width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Output surface height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Camera translation step per move command, in world units.
    #[serde(default = "default_move_step")]
    pub move_step: f32,
    /// Camera rotation step per turn command, in radians.
    #[serde(default = "default_turn_step")]
    pub turn_step: f32,
    /// Frame rate used by the cooperative animation loop.
    #[serde(default = "default_frame_hz")]
    pub frame_hz: u32,
}

fn default_width() -> u32 {
    100
}

fn default_height() -> u32 {
    40
}

fn default_move_step() -> f32 {
    1.0
}

fn default_turn_step() -> f32 {
    0.1
}

fn default_frame_hz() -> u32 {
    30
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            move_step: default_move_step(),
            turn_step: default_turn_step(),
            frame_hz: default_frame_hz(),
        }
    }
}

impl RendererConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = RendererConfig::from_json_str(r#"{ "width": 80 }"#).unwrap();
        assert_eq!(cfg.width, 80);
        assert_eq!(cfg.height, default_height());
        assert_eq!(cfg.frame_hz, default_frame_hz());
    }
}
