use std::ops::Range;

use ultraviolet::Vec3;

use crate::Body;

/// Number of bodies the n-body shader declares.
pub const BODY_COUNT: usize = 3;

/// Gravitational constant of the pairwise rule.
pub const G: f32 = 0.000_001;

/// Whether [`Bodies::step`] applies the pairwise rule.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum GravityMode {
    /// Velocities are never changed; bodies keep their spawn velocity (zero).
    #[default]
    Inert,
    /// Each body is pulled toward every other one:
    /// `v_i += G * m_j * (p_j - p_i) / |p_j - p_i|`.
    Pairwise,
}

/// How bodies are spawned and updated.
#[derive(Debug, Clone)]
pub struct NBodyConfig {
    /// Seed for spawn positions and masses; random when `None`.
    pub seed: Option<u64>,
    /// Positions are drawn from `[-extent, extent)` on each axis.
    pub extent: f32,
    pub mass: Range<f32>,
    pub gravity: GravityMode,
}

impl Default for NBodyConfig {
    fn default() -> Self {
        Self {
            seed: None,
            extent: 0.5,
            mass: 0.5..1.5,
            gravity: GravityMode::Inert,
        }
    }
}

/// Fixed-size set of bodies.
///
/// `N` is a type parameter so the array pushed to the shader can never
/// change length.
#[derive(Debug, Clone)]
pub struct Bodies<const N: usize> {
    bodies: [Body; N],
    gravity: GravityMode,
}

impl<const N: usize> Bodies<N> {
    pub fn new(bodies: [Body; N], gravity: GravityMode) -> Self {
        Self { bodies, gravity }
    }

    /// Spawns `N` bodies at rest with random positions and masses.
    pub fn random(config: &NBodyConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let extent = config.extent;
        let mass = config.mass.clone();
        let coord = move |rng: &mut fastrand::Rng| (rng.f32() * 2.0 - 1.0) * extent;

        let bodies = std::array::from_fn(|_| {
            let position = Vec3::new(coord(&mut rng), coord(&mut rng), coord(&mut rng));
            let m = mass.start + rng.f32() * (mass.end - mass.start);
            Body::at_rest(position, m)
        });

        let this = Self::new(bodies, config.gravity);
        log::debug!("spawned {N} bodies: {:?}", this.positions());
        this
    }

    pub fn bodies(&self) -> &[Body; N] {
        &self.bodies
    }

    pub fn gravity(&self) -> GravityMode {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: GravityMode) {
        self.gravity = gravity;
    }

    /// Advances one tick: optional pairwise velocity update, then
    /// `position += velocity` for every body.
    pub fn step(&mut self) {
        if self.gravity == GravityMode::Pairwise {
            self.apply_gravity();
        }

        for body in &mut self.bodies {
            body.position += body.velocity;
        }
    }

    fn apply_gravity(&mut self) {
        // Velocity updates read positions only, which do not move until the
        // integration pass.
        for i in 0..N {
            let p_i = self.bodies[i].position;
            let mut dv = Vec3::zero();

            for (j, other) in self.bodies.iter().enumerate() {
                if i == j {
                    continue;
                }
                let d = other.position - p_i;
                let dist = d.mag();
                if dist == 0.0 {
                    continue;
                }
                dv += d / dist * (G * other.mass);
            }

            self.bodies[i].velocity += dv;
        }
    }

    /// Positions in the layout the shader's position array expects.
    pub fn positions(&self) -> [[f32; 3]; N] {
        std::array::from_fn(|i| {
            let p = self.bodies[i].position;
            [p.x, p.y, p.z]
        })
    }
}
