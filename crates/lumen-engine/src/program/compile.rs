use super::{BootstrapError, ShaderStage};

/// A stage whose WGSL source parsed and validated.
#[derive(Debug)]
pub struct CompiledStage {
    pub(crate) stage: ShaderStage,
    pub(crate) source: String,
    pub(crate) module: naga::Module,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The WGSL text the GPU module is created from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// What a stage may use. The device is opened without optional features, so
/// neither may the shaders.
const STAGE_CAPABILITIES: naga::valid::Capabilities = naga::valid::Capabilities::empty();

/// Parses and validates one stage.
///
/// The error carries naga's rendered diagnostic (with source snippet) as its
/// log.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<CompiledStage, BootstrapError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| BootstrapError::ShaderCompile {
        stage,
        log: e.emit_to_string(source),
    })?;

    let mut validator =
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), STAGE_CAPABILITIES);
    validator
        .validate(&module)
        .map_err(|e| BootstrapError::ShaderCompile {
            stage,
            log: e.emit_to_string(source),
        })?;

    Ok(CompiledStage {
        stage,
        source: source.to_owned(),
        module,
    })
}
