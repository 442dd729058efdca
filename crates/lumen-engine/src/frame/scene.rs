use crate::program::UniformDecl;
use crate::render::{UniformError, UniformSet};
use crate::time::FrameTime;

/// Per-frame state driving a shader canvas.
///
/// The scene owns its simulation state; the frame loop calls `advance` once
/// per tick and then lets the scene write its uniforms. The window-size
/// uniform is managed by the frame loop and must not be declared here.
pub trait Scene {
    /// Uniforms this scene writes, checked against the program at startup.
    fn uniforms(&self) -> Vec<UniformDecl>;

    /// Advances the scene by one tick.
    fn advance(&mut self, time: &FrameTime);

    fn write_uniforms(&self, uniforms: &mut UniformSet) -> Result<(), UniformError>;
}
