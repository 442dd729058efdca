//! Contracts between the window runtime and what runs inside it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
