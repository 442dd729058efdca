//! Surface-space geometry.
//!
//! Everything here is in physical pixels. The quad itself lives in NDC and
//! never changes; only the viewport follows the surface.

mod viewport;

pub use viewport::Viewport;
