//! Testing utilities for shutterguard
//!
//! Synthetic frames and motion samples for offline testing, benches and the
//! CLI simulation.

pub mod synthetic_data;

pub use synthetic_data::{
    checkerboard_frame, dark_sample_frame, motion_sample, sharp_frame, uniform_frame,
};
