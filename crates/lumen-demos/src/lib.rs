//! The two lumen canvases and what they share.
//!
//! - `canvas`: a Julia set animated by a time uniform
//! - `nbody`: a glow around three point masses pushed as a uniform array

pub mod scenes;
pub mod shaders;

use anyhow::Result;
use winit::dpi::LogicalSize;

use lumen_engine::device::GpuInit;
use lumen_engine::frame::{Scene, ShaderCanvas};
use lumen_engine::program::ShaderNames;
use lumen_engine::window::{Runtime, RuntimeConfig};

/// Loads the shaders for `names` and runs `scene` until the window closes.
pub fn run<S>(title: &str, names: &ShaderNames, scene: S) -> Result<()>
where
    S: Scene + 'static,
{
    let sources = shaders::load(names)?;

    let config = RuntimeConfig {
        title: title.to_string(),
        initial_size: LogicalSize::new(960.0, 640.0),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), ShaderCanvas::new(sources, scene))
}
