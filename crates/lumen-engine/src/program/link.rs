use crate::notice::Notice;

use super::uniform::reflect_uniforms;
use super::{
    compile_stage, BootstrapError, CompiledStage, ShaderStage, StageSources, UniformDecl,
    UniformKind, UniformLocation,
};

/// Vertex input location the quad position is fed through.
pub const QUAD_POSITION_LOCATION: u32 = 0;

/// A vertex + fragment stage pair.
///
/// Built in two steps: [`Program::compile`] always yields a program (with
/// failed stages missing), [`Program::link`] then checks the pair and fixes
/// the uniform table. Uniform lookups on an unlinked program find nothing.
#[derive(Debug)]
pub struct Program {
    vertex: Option<CompiledStage>,
    fragment: Option<CompiledStage>,
    uniforms: Option<Vec<UniformLocation>>,
}

impl Program {
    /// Compiles both stages.
    ///
    /// A stage that fails is logged with its diagnostic and reported to
    /// `notice`; the other stage is still compiled.
    pub fn compile(sources: &StageSources, notice: &mut dyn Notice) -> Self {
        let mut compile = |stage, src: &str| match compile_stage(stage, src) {
            Ok(compiled) => Some(compiled),
            Err(err) => {
                if let BootstrapError::ShaderCompile { log, .. } = &err {
                    log::error!("{stage} shader diagnostics:\n{log}");
                }
                notice.notify(&err);
                None
            }
        };

        let vertex = compile(ShaderStage::Vertex, &sources.vertex);
        let fragment = compile(ShaderStage::Fragment, &sources.fragment);

        Self {
            vertex,
            fragment,
            uniforms: None,
        }
    }

    /// Compiles and links in one go.
    pub fn build(sources: &StageSources, notice: &mut dyn Notice) -> Result<Self, BootstrapError> {
        let mut program = Self::compile(sources, notice);
        program.link(notice)?;
        Ok(program)
    }

    /// Links the compiled stages. Failures are reported to `notice` and
    /// returned.
    pub fn link(&mut self, notice: &mut dyn Notice) -> Result<(), BootstrapError> {
        let linked = match (&self.vertex, &self.fragment) {
            (Some(vs), Some(fs)) => link_stages(vs, fs),
            (None, Some(_)) => Err("the vertex stage did not compile".to_string()),
            (Some(_), None) => Err("the fragment stage did not compile".to_string()),
            (None, None) => Err("neither stage compiled".to_string()),
        };

        match linked {
            Ok(uniforms) => {
                log::debug!("program linked with {} uniform(s)", uniforms.len());
                self.uniforms = Some(uniforms);
                Ok(())
            }
            Err(reason) => {
                let err = BootstrapError::Link(reason);
                notice.notify(&err);
                Err(err)
            }
        }
    }

    pub fn is_linked(&self) -> bool {
        self.uniforms.is_some()
    }

    pub fn stage(&self, stage: ShaderStage) -> Option<&CompiledStage> {
        match stage {
            ShaderStage::Vertex => self.vertex.as_ref(),
            ShaderStage::Fragment => self.fragment.as_ref(),
        }
    }

    /// Every uniform the linked program declares, ordered by binding.
    /// Empty before linking.
    pub fn uniforms(&self) -> &[UniformLocation] {
        self.uniforms.as_deref().unwrap_or(&[])
    }

    /// Loose lookup: `None` when the name is absent or the program is not
    /// linked yet.
    pub fn uniform_location(&self, name: &str) -> Option<&UniformLocation> {
        self.uniforms().iter().find(|u| u.name == name)
    }

    /// Validated lookup of every uniform the application pushes.
    ///
    /// Fails on the first name the program does not declare, or whose
    /// declared shape differs from the requested one.
    pub fn bind_uniforms(
        &self,
        requested: &[UniformDecl],
    ) -> Result<Vec<UniformLocation>, BootstrapError> {
        if !self.is_linked() {
            return Err(BootstrapError::NotLinked);
        }

        requested
            .iter()
            .map(|decl| {
                let loc = self
                    .uniform_location(decl.name)
                    .ok_or_else(|| BootstrapError::UniformNotFound(decl.name.to_string()))?;

                if loc.kind != decl.kind || loc.kind == UniformKind::Unsupported {
                    return Err(BootstrapError::UniformShape {
                        name: decl.name.to_string(),
                        expected: decl.kind,
                        found: loc.kind,
                    });
                }
                Ok(loc.clone())
            })
            .collect()
    }
}

#[derive(Debug)]
struct StageIo {
    location: u32,
    ty: naga::TypeInner,
}

fn link_stages(vs: &CompiledStage, fs: &CompiledStage) -> Result<Vec<UniformLocation>, String> {
    let vs_entry = entry_point(vs)?;
    let fs_entry = entry_point(fs)?;

    // Quad position attribute.
    let mut inputs = Vec::new();
    for arg in &vs_entry.function.arguments {
        collect_io(&vs.module, arg.binding.as_ref(), arg.ty, &mut inputs);
    }
    let position = naga::TypeInner::Vector {
        size: naga::VectorSize::Bi,
        scalar: naga::Scalar::F32,
    };
    match inputs.iter().find(|io| io.location == QUAD_POSITION_LOCATION) {
        Some(io) if io.ty == position => {}
        Some(io) => {
            return Err(format!(
                "vertex input @location({QUAD_POSITION_LOCATION}) must be vec2<f32>, found {:?}",
                io.ty
            ));
        }
        None => {
            return Err(format!(
                "vertex stage does not read the quad position at @location({QUAD_POSITION_LOCATION})"
            ));
        }
    }

    // Stage interface.
    let mut produced = Vec::new();
    if let Some(result) = &vs_entry.function.result {
        collect_io(&vs.module, result.binding.as_ref(), result.ty, &mut produced);
    }
    let mut consumed = Vec::new();
    for arg in &fs_entry.function.arguments {
        collect_io(&fs.module, arg.binding.as_ref(), arg.ty, &mut consumed);
    }
    for input in &consumed {
        match produced.iter().find(|out| out.location == input.location) {
            Some(out) if out.ty == input.ty => {}
            Some(out) => {
                return Err(format!(
                    "fragment input @location({}) is {:?} but the vertex stage writes {:?}",
                    input.location, input.ty, out.ty
                ));
            }
            None => {
                return Err(format!(
                    "fragment input @location({}) is not written by the vertex stage",
                    input.location
                ));
            }
        }
    }

    merge_uniforms(reflect_uniforms(vs)?, reflect_uniforms(fs)?)
}

fn entry_point(stage: &CompiledStage) -> Result<&naga::EntryPoint, String> {
    let name = stage.stage.entry_point();
    stage
        .module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage.stage.naga())
        .ok_or_else(|| format!("{} stage has no `{name}` entry point", stage.stage))
}

/// Flattens an entry point argument/result into its `@location` slots.
/// Builtins (`@builtin(position)` etc.) are not part of the interface.
fn collect_io(
    module: &naga::Module,
    binding: Option<&naga::Binding>,
    ty: naga::Handle<naga::Type>,
    out: &mut Vec<StageIo>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(StageIo {
            location: *location,
            ty: module.types[ty].inner.clone(),
        }),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_io(module, m.binding.as_ref(), m.ty, out);
                }
            }
        }
    }
}

fn merge_uniforms(
    vertex: Vec<UniformLocation>,
    fragment: Vec<UniformLocation>,
) -> Result<Vec<UniformLocation>, String> {
    let mut merged = vertex;

    for u in fragment {
        match merged.iter_mut().find(|m| m.binding == u.binding) {
            Some(m) if m.name == u.name && m.kind == u.kind && m.size == u.size => {
                m.fragment = true;
            }
            Some(m) => {
                return Err(format!(
                    "@binding({}) is `{}` in the vertex stage but `{}` in the fragment stage",
                    u.binding, m.name, u.name
                ));
            }
            None => {
                if merged.iter().any(|m| m.name == u.name) {
                    return Err(format!(
                        "uniform `{}` is bound at different slots in the two stages",
                        u.name
                    ));
                }
                merged.push(u);
            }
        }
    }

    merged.sort_by_key(|u| u.binding);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "
        struct VsOut {
            @builtin(position) clip: vec4<f32>,
            @location(0) uv: vec2<f32>,
        };

        @vertex
        fn vs_main(@location(0) a_pos: vec2<f32>) -> VsOut {
            var out: VsOut;
            out.clip = vec4<f32>(a_pos, 0.0, 1.0);
            out.uv = a_pos * 0.5 + vec2<f32>(0.5);
            return out;
        }
    ";

    const FS: &str = "
        @group(0) @binding(0) var<uniform> u_window: vec2<f32>;
        @group(0) @binding(1) var<uniform> u_t: f32;

        @fragment
        fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(uv * u_window / u_window, sin(u_t), 1.0);
        }
    ";

    fn quiet() -> Vec<BootstrapError> {
        Vec::new()
    }

    fn sources(vertex: &str, fragment: &str) -> StageSources {
        StageSources {
            vertex: vertex.to_string(),
            fragment: fragment.to_string(),
        }
    }

    // ── compile + link ────────────────────────────────────────────────────

    #[test]
    fn valid_pair_links() {
        let mut notices: Vec<BootstrapError> = Vec::new();
        let program = Program::build(&sources(VS, FS), &mut notices).unwrap();
        assert!(program.is_linked());
        assert!(notices.is_empty());
        assert_eq!(program.uniforms().len(), 2);
        assert_eq!(program.uniforms()[0].name, "u_window");
    }

    #[test]
    fn invalid_fragment_still_attempts_link() {
        let mut notices: Vec<BootstrapError> = Vec::new();
        let mut program = Program::compile(&sources(VS, "this is not wgsl"), &mut notices);

        assert!(program.stage(ShaderStage::Vertex).is_some());
        assert!(program.stage(ShaderStage::Fragment).is_none());

        let err = program.link(&mut notices).unwrap_err();
        assert!(matches!(err, BootstrapError::Link(_)));

        assert_eq!(notices.len(), 2);
        assert!(matches!(
            notices[0],
            BootstrapError::ShaderCompile { stage: ShaderStage::Fragment, .. }
        ));
        assert!(matches!(notices[1], BootstrapError::Link(_)));
    }

    #[test]
    fn both_stages_invalid_reports_each() {
        let mut notices: Vec<BootstrapError> = Vec::new();
        let result = Program::build(&sources("garbage", "garbage"), &mut notices);
        assert!(matches!(result, Err(BootstrapError::Link(_))));
        assert_eq!(notices.len(), 3);
    }

    #[test]
    fn missing_entry_point_fails_link() {
        let fs = FS.replace("fs_main", "main");
        let mut notices: Vec<BootstrapError> = Vec::new();
        let err = Program::build(&sources(VS, &fs), &mut notices).unwrap_err();
        match err {
            BootstrapError::Link(reason) => assert!(reason.contains("fs_main")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fragment_input_without_vertex_output_fails_link() {
        let fs = "
            @fragment
            fn fs_main(@location(3) k: f32) -> @location(0) vec4<f32> {
                return vec4<f32>(k);
            }
        ";
        let err = Program::build(&sources(VS, fs), &mut quiet()).unwrap_err();
        match err {
            BootstrapError::Link(reason) => assert!(reason.contains("@location(3)")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn interface_type_mismatch_fails_link() {
        let fs = "
            @fragment
            fn fs_main(@location(0) uv: vec4<f32>) -> @location(0) vec4<f32> {
                return uv;
            }
        ";
        assert!(matches!(
            Program::build(&sources(VS, fs), &mut quiet()),
            Err(BootstrapError::Link(_))
        ));
    }

    #[test]
    fn vertex_without_quad_position_fails_link() {
        let vs = "
            @vertex
            fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
                return vec4<f32>(f32(i), 0.0, 0.0, 1.0);
            }
        ";
        let fs = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        assert!(matches!(
            Program::build(&sources(vs, fs), &mut quiet()),
            Err(BootstrapError::Link(_))
        ));
    }

    #[test]
    fn conflicting_shared_binding_fails_link() {
        let vs = format!("@group(0) @binding(1) var<uniform> u_scale: f32;\n{VS}");
        assert!(matches!(
            Program::build(&sources(&vs, FS), &mut quiet()),
            Err(BootstrapError::Link(_))
        ));
    }

    #[test]
    fn shared_uniform_is_visible_in_both_stages() {
        let vs = format!("@group(0) @binding(1) var<uniform> u_t: f32;\n{VS}");
        let program = Program::build(&sources(&vs, FS), &mut quiet()).unwrap();
        let t = program.uniform_location("u_t").unwrap();
        assert!(t.vertex && t.fragment);
    }

    // ── uniform resolution ────────────────────────────────────────────────

    #[test]
    fn lookup_before_link_yields_nothing() {
        let program = Program::compile(&sources(VS, FS), &mut quiet());
        assert!(!program.is_linked());
        assert!(program.uniform_location("u_t").is_none());
        assert!(program.uniforms().is_empty());
        assert_eq!(
            program.bind_uniforms(&[UniformDecl::new("u_t", UniformKind::Float)]),
            Err(BootstrapError::NotLinked)
        );
    }

    #[test]
    fn binding_resolves_requested_names() {
        let program = Program::build(&sources(VS, FS), &mut quiet()).unwrap();
        let bound = program
            .bind_uniforms(&[
                UniformDecl::new("u_t", UniformKind::Float),
                UniformDecl::new("u_window", UniformKind::Vec2),
            ])
            .unwrap();
        assert_eq!(bound[0].binding, 1);
        assert_eq!(bound[1].binding, 0);
    }

    #[test]
    fn absent_uniform_fails_fast() {
        let program = Program::build(&sources(VS, FS), &mut quiet()).unwrap();
        assert!(program.uniform_location("u_positions").is_none());
        assert_eq!(
            program.bind_uniforms(&[UniformDecl::new("u_positions", UniformKind::VecArray(3))]),
            Err(BootstrapError::UniformNotFound("u_positions".to_string()))
        );
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let program = Program::build(&sources(VS, FS), &mut quiet()).unwrap();
        let err = program
            .bind_uniforms(&[UniformDecl::new("u_t", UniformKind::Vec2)])
            .unwrap_err();
        assert_eq!(
            err,
            BootstrapError::UniformShape {
                name: "u_t".to_string(),
                expected: UniformKind::Vec2,
                found: UniformKind::Float,
            }
        );
    }
}
