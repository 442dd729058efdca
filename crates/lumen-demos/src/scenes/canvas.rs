use lumen_engine::frame::Scene;
use lumen_engine::program::{UniformDecl, UniformKind};
use lumen_engine::render::{UniformError, UniformSet};
use lumen_engine::time::FrameTime;

pub const TIME_UNIFORM: &str = "u_t";

#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Added to the time uniform on every tick, regardless of frame time.
    pub time_step: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { time_step: 0.01 }
    }
}

/// Fixed-step time accumulator.
#[derive(Debug, Clone)]
pub struct TimeScene {
    t: f32,
    step: f32,
}

impl TimeScene {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            t: 0.0,
            step: config.time_step,
        }
    }

    pub fn time(&self) -> f32 {
        self.t
    }
}

impl Scene for TimeScene {
    fn uniforms(&self) -> Vec<UniformDecl> {
        vec![UniformDecl::new(TIME_UNIFORM, UniformKind::Float)]
    }

    fn advance(&mut self, _time: &FrameTime) {
        self.t += self.step;
    }

    fn write_uniforms(&self, uniforms: &mut UniformSet) -> Result<(), UniformError> {
        uniforms.set_f32(TIME_UNIFORM, self.t)
    }
}
