use winit::dpi::PhysicalSize;

use crate::coords::Viewport;
use crate::render::{UniformError, UniformSet};
use crate::time::{Clock, FrameClock, FrameTime, SystemClock};

use super::Scene;

/// Name of the `vec2<f32>` uniform holding the surface size in pixels.
pub const WINDOW_UNIFORM: &str = "u_window";

/// Scene state, uniforms and viewport of a running canvas.
///
/// Nothing here touches the GPU: the runtime calls [`tick`](Self::tick) on
/// every redraw and [`resize`](Self::resize) on surface changes, then draws
/// whatever [`uniforms`](Self::uniforms) and [`viewport`](Self::viewport)
/// hold.
pub struct FrameLoop<S, C: Clock = SystemClock> {
    scene: S,
    uniforms: UniformSet,
    clock: FrameClock<C>,
    surface: PhysicalSize<u32>,
    viewport: Viewport,
}

impl<S: Scene, C: Clock> FrameLoop<S, C> {
    /// Seeds the uniforms with the surface size and the scene's initial state.
    pub fn new(
        scene: S,
        uniforms: UniformSet,
        clock: FrameClock<C>,
        surface: PhysicalSize<u32>,
    ) -> Result<Self, UniformError> {
        let mut this = Self {
            scene,
            uniforms,
            clock,
            surface,
            viewport: Viewport::full(surface),
        };
        this.resize(surface)?;
        this.scene.write_uniforms(&mut this.uniforms)?;
        Ok(this)
    }

    /// Advances the scene one step and refreshes its uniforms.
    pub fn tick(&mut self) -> Result<FrameTime, UniformError> {
        let ft = self.clock.tick();
        self.scene.advance(&ft);
        self.scene.write_uniforms(&mut self.uniforms)?;
        Ok(ft)
    }

    /// Follows a new surface size: window uniform and viewport both track it.
    /// Scene state is left alone.
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<(), UniformError> {
        self.surface = size;
        self.viewport = Viewport::full(size);
        self.uniforms
            .set_vec2(WINDOW_UNIFORM, [size.width as f32, size.height as f32])
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface_size(&self) -> PhysicalSize<u32> {
        self.surface
    }

    /// Ticks taken so far.
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }
}
