//! Frame loop.
//!
//! The display-refresh callback is expressed as an explicit loop object:
//! `FrameLoop` owns the scene, its uniforms and the viewport and is stepped
//! by the runtime, or by hand in tests. `ShaderCanvas` ties it to the GPU.

mod canvas;
mod frame_loop;
mod scene;

pub use canvas::{prepare_program, ShaderCanvas};
pub use frame_loop::{FrameLoop, WINDOW_UNIFORM};
pub use scene::Scene;
