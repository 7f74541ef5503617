use serde::{Deserialize, Serialize};

use crate::frame::{clamp_height, clamp_width, FrameMode, PanelFrame, CHROME_ALLOWANCE, MAXIMIZED_WIDTH, MIN_HEIGHT};
use crate::geometry::{Point, Rect, Size};

/// Which of the eight handles a resize gesture started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDirection {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeDirection {
    fn pulls_right_edge(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    fn pulls_left_edge(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    fn pulls_bottom_edge(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    fn pulls_top_edge(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }
}

/// Transient gesture state between pointer-down and pointer-up. Deltas are
/// always computed against the captured origin, never the previous frame,
/// so a gesture cannot accumulate drift.
#[derive(Debug, Clone, Copy)]
enum Gesture {
    Drag {
        pointer_start: Point,
        rect_start: Rect,
    },
    Resize {
        direction: ResizeDirection,
        pointer_start: Point,
        rect_start: Rect,
    },
}

/// Pointer-gesture state machine producing [`PanelFrame`]s.
///
/// At most one gesture is active at a time; a second gesture-start while one
/// is active is ignored. Hosts should forward global pointer-move/up events
/// only while [`WindowController::gesture_active`] is true.
#[derive(Debug, Default)]
pub struct WindowController {
    frame: PanelFrame,
    gesture: Option<Gesture>,
}

impl WindowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &PanelFrame {
        &self.frame
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Starts a drag from the header region.
    ///
    /// `pointer_over_control` must be true when the pointer went down on an
    /// interactive control inside the header; such events are ignored so the
    /// drag never hijacks a click.
    pub fn begin_drag(&mut self, pointer: Point, panel_rect: Rect, pointer_over_control: bool) {
        if self.gesture.is_some() || pointer_over_control {
            return;
        }
        self.gesture = Some(Gesture::Drag {
            pointer_start: pointer,
            rect_start: panel_rect,
        });
    }

    /// Starts a resize from one of the eight handles.
    pub fn begin_resize(&mut self, direction: ResizeDirection, pointer: Point, panel_rect: Rect) {
        if self.gesture.is_some() {
            return;
        }
        self.gesture = Some(Gesture::Resize {
            direction,
            pointer_start: pointer,
            rect_start: panel_rect,
        });
    }

    /// Feeds a pointer-move; a no-op unless a gesture is active.
    pub fn pointer_moved(&mut self, pointer: Point, viewport: Size) {
        match self.gesture {
            Some(Gesture::Drag {
                pointer_start,
                rect_start,
            }) => self.apply_drag(pointer, pointer_start, rect_start, viewport),
            Some(Gesture::Resize {
                direction,
                pointer_start,
                rect_start,
            }) => self.apply_resize(direction, pointer, pointer_start, rect_start, viewport),
            None => {}
        }
    }

    /// Ends any active gesture; the frame keeps its last value.
    pub fn pointer_released(&mut self) {
        self.gesture = None;
    }

    /// Idempotent maximize flip. On: explicit size, cleared position. Off:
    /// the exact default docked frame.
    pub fn toggle_maximize(&mut self, viewport: Size) {
        if self.frame.maximized() {
            self.frame = PanelFrame::default();
        } else {
            let height = (viewport.height - CHROME_ALLOWANCE).max(MIN_HEIGHT);
            self.frame = PanelFrame {
                mode: FrameMode::Maximized,
                position: None,
                size: Some(Size::new(MAXIMIZED_WIDTH, height)),
            };
        }
    }

    fn apply_drag(&mut self, pointer: Point, pointer_start: Point, rect_start: Rect, viewport: Size) {
        let x = (rect_start.left + pointer.x - pointer_start.x)
            .clamp(0.0, (viewport.width - rect_start.width).max(0.0));
        let y = (rect_start.top + pointer.y - pointer_start.y)
            .clamp(0.0, (viewport.height - rect_start.height).max(0.0));
        self.frame.mode = FrameMode::Custom;
        self.frame.position = Some(Point::new(x, y));
    }

    fn apply_resize(
        &mut self,
        direction: ResizeDirection,
        pointer: Point,
        pointer_start: Point,
        rect_start: Rect,
        viewport: Size,
    ) {
        let dx = pointer.x - pointer_start.x;
        let dy = pointer.y - pointer_start.y;

        let mut width = rect_start.width;
        let mut height = rect_start.height;
        let mut left = rect_start.left;
        let mut top = rect_start.top;

        if direction.pulls_right_edge() {
            width = clamp_width(rect_start.width + dx);
        } else if direction.pulls_left_edge() {
            // Clamp first, then shift by the realized change so the right
            // edge stays anchored even when the clamp bites.
            width = clamp_width(rect_start.width - dx);
            left = rect_start.left + (rect_start.width - width);
        }

        if direction.pulls_bottom_edge() {
            height = clamp_height(rect_start.height + dy, viewport);
        } else if direction.pulls_top_edge() {
            height = clamp_height(rect_start.height - dy, viewport);
            top = rect_start.top + (rect_start.height - height);
        }

        self.frame.size = Some(Size::new(width, height));
        if left != rect_start.left || top != rect_start.top {
            self.frame.mode = FrameMode::Custom;
            self.frame.position = Some(Point::new(left, top));
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
