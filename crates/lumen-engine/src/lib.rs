//! lumen engine crate.
//!
//! Runs a fragment shader over a full-screen quad:
//! - [`program`]: compile/link/bind the two WGSL stages on the CPU
//! - [`render`]: the canvas pipeline, quad mesh and uniform set
//! - [`frame`]: the per-refresh loop and the [`frame::Scene`] contract
//! - [`window`]: the winit runtime that drives it all

pub mod core;
pub mod device;
pub mod frame;
pub mod program;
pub mod render;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod notice;
