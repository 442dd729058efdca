use std::fmt;

use super::{ShaderStage, UniformKind};

/// Startup failures of the renderer bootstrap.
///
/// All of these are reported through a [`Notice`](crate::notice::Notice)
/// sink when they happen; none is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapError {
    /// The platform could not provide a GPU context for the window.
    ContextUnavailable(String),
    /// One shader stage failed to parse or validate.
    ShaderCompile { stage: ShaderStage, log: String },
    /// The two stages could not be combined into one program.
    Link(String),
    /// A uniform was requested before the program was linked.
    NotLinked,
    /// A requested uniform is not declared by the program.
    UniformNotFound(String),
    /// A uniform is declared with a different shape than the one requested.
    UniformShape {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextUnavailable(reason) => {
                write!(f, "this machine cannot provide a GPU rendering context: {reason}")
            }
            // The diagnostic itself is logged where compilation fails.
            Self::ShaderCompile { stage, .. } => {
                write!(f, "an error occurred compiling the {stage} shader")
            }
            Self::Link(reason) => write!(f, "unable to initialize the shader program: {reason}"),
            Self::NotLinked => f.write_str("uniforms resolved before the program was linked"),
            Self::UniformNotFound(name) => {
                write!(f, "uniform `{name}` is not declared by the shader program")
            }
            Self::UniformShape { name, expected, found } => write!(
                f,
                "uniform `{name}` is declared as {found} but the demo pushes {expected}"
            ),
        }
    }
}

impl std::error::Error for BootstrapError {}
