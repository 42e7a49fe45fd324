use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Monotonic time source.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Blocks for `d`. Clocks that cannot block (browser) return immediately.
    fn sleep(&self, d: Duration);
}

/// OS monotonic clock.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// `performance.now()`; pacing comes from `requestAnimationFrame`, so `sleep` is a no-op.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl PerformanceClock {
    pub fn new() -> Self {
        let performance = web_sys::window().and_then(|w| w.performance());
        if performance.is_none() {
            log::warn!("performance API unavailable; time will not advance");
        }
        Self { performance }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl Clock for PerformanceClock {
    fn now(&self) -> Duration {
        let ms = self.performance.as_ref().map_or(0.0, |p| p.now());
        Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }

    fn sleep(&self, _d: Duration) {}
}

/// Hand-stepped clock. Clones share the same time, and `sleep` advances it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }

    pub fn set(&self, t: Duration) {
        self.now.set(t);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

/// The platform's real clock.
pub fn default_clock() -> Box<dyn Clock> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(SystemClock::new())
    }
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        Box::new(PerformanceClock::new())
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        Box::new(ManualClock::new())
    }
}
