//! Controller layer: backend events and their user-visible mapping.

pub mod events;
pub mod orchestration;
