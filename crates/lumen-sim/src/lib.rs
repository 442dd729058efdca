//! Point-mass state for the n-body canvas.
//!
//! Kept free of GPU and windowing code so the update rule can be exercised
//! on its own. The renderer only ever sees [`Bodies::positions`].
//!
//! By default the pairwise gravity rule is off ([`GravityMode::Inert`]) and
//! a step only integrates the (zero) velocities, so bodies stay where they
//! were spawned. [`GravityMode::Pairwise`] turns the rule on.

mod body;
mod system;

pub use body::Body;
pub use system::{Bodies, GravityMode, NBodyConfig, BODY_COUNT, G};
