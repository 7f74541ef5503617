use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};

pub const MIN_WIDTH: f32 = 400.0;
pub const MAX_WIDTH: f32 = 800.0;
pub const MIN_HEIGHT: f32 = 400.0;
/// Vertical space reserved for host chrome; the panel never grows taller
/// than the viewport minus this allowance.
pub const CHROME_ALLOWANCE: f32 = 48.0;
/// Width applied when the panel is maximized.
pub const MAXIMIZED_WIDTH: f32 = MAX_WIDTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameMode {
    #[default]
    Docked,
    Custom,
    Maximized,
}

/// Geometric state of the panel at a point in time.
///
/// An absent position means the default CSS-anchored spot; an absent size
/// means the default size. Position and size are each all-or-nothing pairs
/// ([`Point`]/[`Size`] are indivisible), so a consumer never observes a
/// half-updated frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelFrame {
    pub mode: FrameMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl PanelFrame {
    pub fn maximized(&self) -> bool {
        self.mode == FrameMode::Maximized
    }
}

pub fn clamp_width(width: f32) -> f32 {
    width.clamp(MIN_WIDTH, MAX_WIDTH)
}

pub fn clamp_height(height: f32, viewport: Size) -> f32 {
    let cap = (viewport.height - CHROME_ALLOWANCE).max(MIN_HEIGHT);
    height.clamp(MIN_HEIGHT, cap)
}
