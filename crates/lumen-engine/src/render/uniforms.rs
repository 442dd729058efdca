use std::fmt;

use crate::program::{BootstrapError, UniformKind, UniformLocation};

/// Current value of one uniform, in its GPU layout.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Elements are padded to 16 bytes, matching the uniform array stride.
    VecArray(Vec<[f32; 4]>),
    /// Raw zeroed storage for a uniform no demo writes.
    Opaque(Vec<u8>),
}

impl UniformValue {
    /// Zero value of the declared shape.
    fn zeroed(location: &UniformLocation) -> Self {
        match location.kind {
            UniformKind::Float => Self::Float(0.0),
            UniformKind::Vec2 => Self::Vec2([0.0; 2]),
            UniformKind::Vec3 => Self::Vec3([0.0; 3]),
            UniformKind::Vec4 => Self::Vec4([0.0; 4]),
            UniformKind::VecArray(len) => Self::VecArray(vec![[0.0; 4]; len as usize]),
            UniformKind::Unsupported => Self::Opaque(vec![0; location.size as usize]),
        }
    }

    /// Bytes as written into the uniform buffer.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Float(v) => bytemuck::bytes_of(v),
            Self::Vec2(v) => bytemuck::cast_slice(v),
            Self::Vec3(v) => bytemuck::cast_slice(v),
            Self::Vec4(v) => bytemuck::cast_slice(v),
            Self::VecArray(v) => bytemuck::cast_slice(v),
            Self::Opaque(v) => v,
        }
    }
}

/// Error returned when a write does not match the program's declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformError {
    Unknown(String),
    Shape {
        name: String,
        declared: UniformKind,
        written: UniformKind,
    },
}

impl fmt::Display for UniformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(name) => write!(f, "no uniform named `{name}`"),
            Self::Shape { name, declared, written } => {
                write!(f, "uniform `{name}` is {declared}, cannot write {written}")
            }
        }
    }
}

impl std::error::Error for UniformError {}

impl From<UniformError> for BootstrapError {
    fn from(e: UniformError) -> Self {
        match e {
            UniformError::Unknown(name) => Self::UniformNotFound(name),
            UniformError::Shape { name, declared, written } => Self::UniformShape {
                name,
                expected: written,
                found: declared,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    location: UniformLocation,
    value: UniformValue,
}

/// Every uniform of a linked program with its current value.
///
/// Writes are checked against the declared shape, so what reaches the GPU
/// always has the size the shader expects (array lengths included).
#[derive(Debug, Clone)]
pub struct UniformSet {
    slots: Vec<Slot>,
}

impl UniformSet {
    /// Creates a zero-initialized set for `locations`.
    pub fn new(locations: &[UniformLocation]) -> Self {
        Self {
            slots: locations
                .iter()
                .map(|l| Slot {
                    location: l.clone(),
                    value: UniformValue::zeroed(l),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.slots
            .iter()
            .find(|s| s.location.name == name)
            .map(|s| &s.value)
    }

    /// Locations and values in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&UniformLocation, &UniformValue)> {
        self.slots.iter().map(|s| (&s.location, &s.value))
    }

    pub fn set_f32(&mut self, name: &str, v: f32) -> Result<(), UniformError> {
        self.write(name, UniformKind::Float, UniformValue::Float(v))
    }

    pub fn set_vec2(&mut self, name: &str, v: [f32; 2]) -> Result<(), UniformError> {
        self.write(name, UniformKind::Vec2, UniformValue::Vec2(v))
    }

    /// Writes a `vec3` array. `values.len()` must equal the declared length.
    pub fn set_vec3_array(&mut self, name: &str, values: &[[f32; 3]]) -> Result<(), UniformError> {
        let padded = values.iter().map(|&[x, y, z]| [x, y, z, 0.0]).collect();
        self.write(
            name,
            UniformKind::VecArray(values.len() as u32),
            UniformValue::VecArray(padded),
        )
    }

    fn write(
        &mut self,
        name: &str,
        kind: UniformKind,
        value: UniformValue,
    ) -> Result<(), UniformError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.location.name == name)
            .ok_or_else(|| UniformError::Unknown(name.to_string()))?;

        if slot.location.kind != kind {
            return Err(UniformError::Shape {
                name: name.to_string(),
                declared: slot.location.kind,
                written: kind,
            });
        }

        slot.value = value;
        Ok(())
    }
}
