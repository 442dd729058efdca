use ultraviolet::Vec3;

/// A point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
}

impl Body {
    /// A body with zero velocity.
    pub fn at_rest(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::zero(),
            mass,
        }
    }
}
