use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::program::BootstrapError;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Close the window when Escape is pressed.
    pub exit_on_escape: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            exit_on_escape: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the canvas window and drives `app` until the window closes.
    ///
    /// Redraws are requested continuously; with a FIFO present mode each one
    /// lands on a display refresh. A bootstrap failure ends the loop and is
    /// returned here after it was shown to the user.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        outcome(state.failure)
    }
}

/// What `Gpu::new` failing means to the application.
fn context_unavailable(err: &anyhow::Error) -> BootstrapError {
    BootstrapError::ContextUnavailable(format!("{err:#}"))
}

/// Result of a finished run: the bootstrap failure, if any, as an error.
fn outcome(failure: Option<BootstrapError>) -> Result<()> {
    match failure {
        Some(err) => Err(anyhow::Error::new(err).context("renderer bootstrap failed")),
        None => Ok(()),
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    failure: Option<BootstrapError>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build();

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let err = context_unavailable(&e);
                self.app.on_bootstrap_error(&err);
                self.fail(err);
                return Ok(());
            }
        };

        let app = &mut self.app;
        if let Err(err) = entry.with_gpu(|gpu| app.on_gpu_ready(gpu)) {
            self.fail(err);
            return Ok(());
        }

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    fn fail(&mut self, err: BootstrapError) {
        self.failure = Some(err);
        self.exit_requested = true;
    }

    /// Runs one app callback against the window's GPU context, optionally
    /// resizing the surface first.
    fn drive<F>(&mut self, resize_to: Option<PhysicalSize<u32>>, f: F)
    where
        F: FnOnce(&mut A, &mut FrameCtx<'_, '_>) -> AppControl,
    {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let app = &mut self.app;
        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            if let Some(size) = resize_to {
                fields.gpu.resize(size);
            }

            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
            };
            control = f(app, &mut ctx);
        });

        if control == AppControl::Exit {
            self.exit_requested = true;
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.exit_requested = true;
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // One redraw per display refresh; present mode does the pacing.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if self.config.exit_on_escape => {
                self.exit_requested = true;
            }

            WindowEvent::Resized(new_size) => {
                log::debug!("resized to {}x{}", new_size.width, new_size.height);
                self.drive(Some(*new_size), |app, ctx| app.on_resize(ctx));
            }

            // The new physical size is not applied yet; winit follows up
            // with `Resized`, which repaints.
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::debug!("scale factor now {scale_factor}");
            }

            WindowEvent::RedrawRequested => {
                self.drive(None, |app, ctx| app.on_frame(ctx));
            }

            _ => {}
        }

        if self.exit_requested {
            self.entry = None;
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_failure_becomes_context_unavailable() {
        let err = anyhow::anyhow!("no adapter").context("failed to open the canvas device");
        match context_unavailable(&err) {
            BootstrapError::ContextUnavailable(msg) => {
                assert!(msg.contains("failed to open the canvas device"));
                assert!(msg.contains("no adapter"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bootstrap_failure_is_returned_from_run() {
        let err = outcome(Some(BootstrapError::ContextUnavailable("gone".into()))).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BootstrapError>(),
            Some(&BootstrapError::ContextUnavailable("gone".into()))
        );
        assert!(format!("{err:#}").contains("renderer bootstrap failed"));
    }

    #[test]
    fn clean_exit_is_ok() {
        assert!(outcome(None).is_ok());
    }
}
