//! GPU rendering subsystem.
//!
//! One renderer, one draw: the canvas pipeline runs the fragment stage over
//! every pixel by drawing the static quad into the full-surface viewport.

mod canvas;
mod ctx;
pub mod quad;
mod uniforms;

pub use canvas::CanvasRenderer;
pub use ctx::{RenderCtx, RenderTarget};
pub use uniforms::{UniformError, UniformSet, UniformValue};
