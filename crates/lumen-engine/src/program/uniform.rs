use std::fmt;

use super::CompiledStage;

/// Shape of a uniform as the shader declares it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
    /// `array<vec3<f32>, N>` or `array<vec4<f32>, N>`; 16 bytes per element.
    VecArray(u32),
    /// Any other type. The buffer is still bound (zero-filled) but no demo
    /// can push values into it.
    Unsupported,
}

impl UniformKind {
    /// Bytes a value of this shape occupies in its uniform buffer.
    pub fn byte_len(self) -> u64 {
        match self {
            Self::Float => 4,
            Self::Vec2 => 8,
            Self::Vec3 => 12,
            Self::Vec4 => 16,
            Self::VecArray(len) => 16 * len as u64,
            Self::Unsupported => 0,
        }
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => f.write_str("f32"),
            Self::Vec2 => f.write_str("vec2<f32>"),
            Self::Vec3 => f.write_str("vec3<f32>"),
            Self::Vec4 => f.write_str("vec4<f32>"),
            Self::VecArray(len) => write!(f, "array<vec, {len}>"),
            Self::Unsupported => f.write_str("an unsupported type"),
        }
    }
}

/// A uniform the application intends to push every frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformDecl {
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        Self { name, kind }
    }
}

/// Where a named uniform lives in the linked program.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformLocation {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub kind: UniformKind,
    /// Size of the declared type in bytes, as laid out by the shader.
    pub size: u64,
    pub vertex: bool,
    pub fragment: bool,
}

/// Lists the `var<uniform>` globals of one stage.
///
/// Textures, samplers and storage buffers are rejected: the canvas binds
/// nothing but uniform buffers.
pub(crate) fn reflect_uniforms(stage: &CompiledStage) -> Result<Vec<UniformLocation>, String> {
    let module = &stage.module;
    let mut out = Vec::new();

    for (_, var) in module.global_variables.iter() {
        let Some(rb) = var.binding.as_ref() else { continue };
        let name = var.name.clone().unwrap_or_default();

        if var.space != naga::AddressSpace::Uniform {
            return Err(format!(
                "{} stage binds `{name}` at @binding({}); only uniform buffers are supported",
                stage.stage, rb.binding
            ));
        }

        if rb.group != 0 {
            return Err(format!(
                "uniform `{name}` uses @group({}); only group 0 is supported",
                rb.group
            ));
        }

        let inner = &module.types[var.ty].inner;
        out.push(UniformLocation {
            name,
            group: rb.group,
            binding: rb.binding,
            kind: kind_of(module, var.ty),
            size: inner.size(module.to_ctx()) as u64,
            vertex: stage.stage == super::ShaderStage::Vertex,
            fragment: stage.stage == super::ShaderStage::Fragment,
        });
    }

    Ok(out)
}

fn kind_of(module: &naga::Module, ty: naga::Handle<naga::Type>) -> UniformKind {
    use naga::{ArraySize, Scalar, TypeInner, VectorSize};

    match module.types[ty].inner {
        TypeInner::Scalar(s) if s == Scalar::F32 => UniformKind::Float,
        TypeInner::Vector { size, scalar } if scalar == Scalar::F32 => match size {
            VectorSize::Bi => UniformKind::Vec2,
            VectorSize::Tri => UniformKind::Vec3,
            VectorSize::Quad => UniformKind::Vec4,
        },
        TypeInner::Array {
            base,
            size: ArraySize::Constant(len),
            stride: 16,
        } => match module.types[base].inner {
            TypeInner::Vector {
                size: VectorSize::Tri | VectorSize::Quad,
                scalar,
            } if scalar == Scalar::F32 => UniformKind::VecArray(len.get()),
            _ => UniformKind::Unsupported,
        },
        _ => UniformKind::Unsupported,
    }
}
