use crate::core::{App, AppControl, FrameCtx};
use crate::device::Gpu;
use crate::notice::{LogNotice, Notice};
use crate::program::{BootstrapError, Program, StageSources, UniformDecl, UniformKind};
use crate::render::{CanvasRenderer, RenderCtx, UniformSet};
use crate::time::FrameClock;

use super::{FrameLoop, Scene, WINDOW_UNIFORM};

/// Compiles, links and binds the program for `scene`.
///
/// This is the CPU half of the renderer bootstrap. Every failure is reported
/// to `notice` before it is returned; a failing stage does not stop the
/// other stage from compiling or the link from being attempted.
pub fn prepare_program<S: Scene>(
    sources: &StageSources,
    scene: &S,
    notice: &mut dyn Notice,
) -> Result<(Program, UniformSet), BootstrapError> {
    let program = Program::build(sources, notice)?;

    let mut requested = vec![UniformDecl::new(WINDOW_UNIFORM, UniformKind::Vec2)];
    requested.extend(scene.uniforms());

    if let Err(err) = program.bind_uniforms(&requested) {
        notice.notify(&err);
        return Err(err);
    }

    let uniforms = UniformSet::new(program.uniforms());
    Ok((program, uniforms))
}

struct Running<S> {
    frame_loop: FrameLoop<S>,
    renderer: CanvasRenderer,
}

/// A full-screen shader canvas: one program, one quad, one [`Scene`].
pub struct ShaderCanvas<S> {
    sources: StageSources,
    notice: Box<dyn Notice>,
    /// Held until the GPU is ready, then moved into the frame loop.
    pending: Option<S>,
    running: Option<Running<S>>,
}

impl<S: Scene> ShaderCanvas<S> {
    pub fn new(sources: StageSources, scene: S) -> Self {
        Self {
            sources,
            notice: Box::new(LogNotice),
            pending: Some(scene),
            running: None,
        }
    }

    /// Replaces the sink bootstrap failures are reported to.
    pub fn with_notice(mut self, notice: impl Notice + 'static) -> Self {
        self.notice = Box::new(notice);
        self
    }

    fn repaint(&self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(Running { frame_loop, renderer }) = &self.running else {
            return AppControl::Continue;
        };

        ctx.render(|rctx, target| {
            renderer.draw(rctx, target, frame_loop.uniforms(), frame_loop.viewport());
        })
    }
}

impl<S: Scene> App for ShaderCanvas<S> {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<(), BootstrapError> {
        let Some(scene) = self.pending.take() else {
            return Ok(());
        };

        let (program, uniforms) = prepare_program(&self.sources, &scene, self.notice.as_mut())?;

        let rctx = RenderCtx::of(gpu);
        let renderer = CanvasRenderer::new(&rctx, &program, &uniforms).inspect_err(|err| {
            self.notice.notify(err);
        })?;

        let frame_loop = FrameLoop::new(scene, uniforms, FrameClock::new(), gpu.size())
            .map_err(|e| {
                let err = BootstrapError::from(e);
                self.notice.notify(&err);
                err
            })?;

        log::info!(
            "canvas ready at {}x{}",
            frame_loop.surface_size().width,
            frame_loop.surface_size().height
        );
        self.running = Some(Running {
            frame_loop,
            renderer,
        });
        Ok(())
    }

    fn on_bootstrap_error(&mut self, err: &BootstrapError) {
        self.notice.notify(err);
    }

    fn on_resize(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(running) = self.running.as_mut() else {
            return AppControl::Continue;
        };

        if let Err(e) = running.frame_loop.resize(ctx.gpu.size()) {
            log::error!("resize: {e}");
            return AppControl::Exit;
        }

        self.repaint(ctx)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(running) = self.running.as_mut() else {
            return AppControl::Continue;
        };

        if let Err(e) = running.frame_loop.tick() {
            log::error!("frame {}: {e}", running.frame_loop.frames());
            return AppControl::Exit;
        }

        self.repaint(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::ShaderStage;
    use crate::render::UniformError;
    use crate::time::FrameTime;

    const VS: &str = "
        @vertex
        fn vs_main(@location(0) a_pos: vec2<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(a_pos, 0.0, 1.0);
        }
    ";

    const FS: &str = "
        @group(0) @binding(0) var<uniform> u_window: vec2<f32>;
        @group(0) @binding(1) var<uniform> u_t: f32;

        @fragment
        fn fs_main(@builtin(position) p: vec4<f32>) -> @location(0) vec4<f32> {
            let uv = p.xy / u_window;
            return vec4<f32>(uv, fract(u_t), 1.0);
        }
    ";

    struct Clock {
        t: f32,
    }

    impl Scene for Clock {
        fn uniforms(&self) -> Vec<UniformDecl> {
            vec![UniformDecl::new("u_t", UniformKind::Float)]
        }

        fn advance(&mut self, _time: &FrameTime) {
            self.t += 0.01;
        }

        fn write_uniforms(&self, uniforms: &mut UniformSet) -> Result<(), UniformError> {
            uniforms.set_f32("u_t", self.t)
        }
    }

    fn sources(fragment: &str) -> StageSources {
        StageSources {
            vertex: VS.to_string(),
            fragment: fragment.to_string(),
        }
    }

    #[test]
    fn prepares_program_and_zeroed_uniforms() {
        let mut notices: Vec<BootstrapError> = Vec::new();
        let (program, uniforms) =
            prepare_program(&sources(FS), &Clock { t: 0.0 }, &mut notices).unwrap();
        assert!(program.is_linked());
        assert_eq!(uniforms.len(), 2);
        assert!(notices.is_empty());
    }

    #[test]
    fn missing_scene_uniform_is_reported_and_returned() {
        let fs = FS.replace("u_t", "u_time");
        let mut notices: Vec<BootstrapError> = Vec::new();
        let err = prepare_program(&sources(&fs), &Clock { t: 0.0 }, &mut notices).unwrap_err();
        assert_eq!(err, BootstrapError::UniformNotFound("u_t".to_string()));
        assert_eq!(notices, vec![err]);
    }

    #[test]
    fn missing_window_uniform_is_reported() {
        let fs = FS.replace("u_window", "u_size");
        let mut notices: Vec<BootstrapError> = Vec::new();
        let err = prepare_program(&sources(&fs), &Clock { t: 0.0 }, &mut notices).unwrap_err();
        assert_eq!(err, BootstrapError::UniformNotFound(WINDOW_UNIFORM.to_string()));
    }

    #[test]
    fn broken_fragment_reports_compile_then_link() {
        let mut notices: Vec<BootstrapError> = Vec::new();
        let err = prepare_program(&sources("fn fs_main( {"), &Clock { t: 0.0 }, &mut notices)
            .unwrap_err();
        assert!(matches!(err, BootstrapError::Link(_)));
        assert!(matches!(
            notices.as_slice(),
            [
                BootstrapError::ShaderCompile { stage: ShaderStage::Fragment, .. },
                BootstrapError::Link(_),
            ]
        ));
    }

    // ── notice sink ──

    #[derive(Clone, Default)]
    struct Shared(std::rc::Rc<std::cell::RefCell<Vec<BootstrapError>>>);

    impl Notice for Shared {
        fn notify(&mut self, err: &BootstrapError) {
            self.0.borrow_mut().push(err.clone());
        }
    }

    #[test]
    fn bootstrap_errors_reach_the_configured_sink() {
        let sink = Shared::default();
        let mut canvas = ShaderCanvas::new(sources(FS), Clock { t: 0.0 }).with_notice(sink.clone());

        let err = BootstrapError::ContextUnavailable("no adapter".into());
        canvas.on_bootstrap_error(&err);

        assert_eq!(*sink.0.borrow(), vec![err]);
    }

    #[test]
    fn device_only_shader_is_reported_before_reaching_the_gpu() {
        let fs = FS.replace(
            "let uv = p.xy / u_window;",
            "var x: f64 = 1.0lf;\n            let uv = p.xy / u_window * f32(x);",
        );
        let mut notices: Vec<BootstrapError> = Vec::new();
        let err = prepare_program(&sources(&fs), &Clock { t: 0.0 }, &mut notices).unwrap_err();

        assert!(matches!(err, BootstrapError::Link(_)));
        assert!(matches!(
            notices.as_slice(),
            [
                BootstrapError::ShaderCompile { stage: ShaderStage::Fragment, .. },
                BootstrapError::Link(_)
            ]
        ));
    }
}
