mod canvas;
mod nbody;

pub use canvas::{CanvasConfig, TimeScene, TIME_UNIFORM};
pub use nbody::{gravity_from_env, seed_from_env, NBodyScene, POSITIONS_UNIFORM};
