//! Shader program construction.
//!
//! A program is two WGSL stages compiled and cross-checked on the CPU with
//! `naga` before any GPU object exists:
//! - compile: parse + validate each stage independently
//! - link: check entry points, the stage interface and shared uniforms
//! - bind: resolve the uniforms the application pushes by name

mod compile;
mod error;
mod link;
mod source;
mod stage;
mod uniform;

pub use compile::{compile_stage, CompiledStage};
pub use error::BootstrapError;
pub use link::{Program, QUAD_POSITION_LOCATION};
pub use source::{EmbeddedShaders, ShaderDir, ShaderNames, ShaderProvider, StageSources};
pub use stage::ShaderStage;
pub use uniform::{UniformDecl, UniformKind, UniformLocation};
