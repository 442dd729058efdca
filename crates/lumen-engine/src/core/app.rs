use winit::event::WindowEvent;

use crate::device::Gpu;
use crate::notice::{LogNotice, Notice};
use crate::program::BootstrapError;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the window runtime.
pub trait App {
    /// Called once the window and GPU context exist, before the first frame.
    /// An error aborts startup; it is expected to have been reported already.
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<(), BootstrapError>;

    /// Called when the runtime itself fails to bootstrap (no GPU context).
    fn on_bootstrap_error(&mut self, err: &BootstrapError) {
        LogNotice.notify(err);
    }

    /// Called for window events, before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called after the surface was resized. Repaint here without advancing
    /// state.
    fn on_resize(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once per display refresh.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
