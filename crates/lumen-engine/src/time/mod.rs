//! Time subsystem.
//!
//! Frame timing is decoupled from the window runtime: the frame loop owns a
//! `FrameClock` over any `Clock`, so tests drive it with a `ManualClock`
//! instead of the display refresh.

mod clock;
mod frame_clock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame_clock::{FrameClock, FrameTime};
