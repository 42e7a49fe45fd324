//! Time subsystem.
//!
//! Frame pacing and timing queries run against a [`Clock`] so the same code is
//! driven by the OS clock natively, by `performance.now()` in a browser, and by
//! a hand-stepped [`ManualClock`] in tests.

mod clock;
mod frame_timer;

pub use clock::{default_clock, Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use clock::PerformanceClock;
pub use frame_timer::FrameTimer;
