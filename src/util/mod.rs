//! Shared utilities for the rendering engine.

/// Per-frame delta time and smoothed FPS.
pub mod frame_timing;
