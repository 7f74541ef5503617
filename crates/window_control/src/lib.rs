//! Pointer-driven interaction controller for the askdock panel.
//!
//! Turns raw pointer movement into a panel frame (position + size + mode):
//! dragging by the header, resizing from eight handles with the opposite
//! edge anchored, and a maximize toggle. Pure geometry, no UI or network
//! dependency; out-of-range input is clamped, never rejected.

pub mod controller;
pub mod frame;
pub mod geometry;

pub use controller::{ResizeDirection, WindowController};
pub use frame::{
    FrameMode, PanelFrame, CHROME_ALLOWANCE, MAXIMIZED_WIDTH, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH,
};
pub use geometry::{Point, Rect, Size};
