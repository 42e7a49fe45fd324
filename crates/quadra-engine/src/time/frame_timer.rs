use std::time::Duration;

use super::Clock;

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Frame pacing, delta time, FPS counting and elapsed time.
///
/// The schedule advances by exactly one frame interval per [`FrameTimer::wait`].
/// A late frame is absorbed by the next one's shorter sleep; once the
/// schedule falls more than a whole interval behind it restarts from now instead
/// of bursting to catch up.
pub struct FrameTimer {
    clock: Box<dyn Clock>,
    frame: Duration,
    last_frame: Duration,
    delta: Duration,

    frame_count: u32,
    fps: u32,
    fps_window_start: Duration,

    epoch: Duration,
}

impl FrameTimer {
    /// `target_fps` of 0 is treated as 1.
    pub fn new(clock: Box<dyn Clock>, target_fps: u32) -> Self {
        let now = clock.now();
        Self {
            clock,
            frame: frame_interval(target_fps),
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0,
            fps_window_start: now,
            epoch: now,
        }
    }

    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.frame = frame_interval(target_fps);
        self.last_frame = self.clock.now();
        self.delta = Duration::ZERO;
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame
    }

    /// Sleeps out the rest of the current frame interval.
    pub fn wait(&mut self) {
        let mut now = self.clock.now();
        let mut elapsed = now.saturating_sub(self.last_frame);

        if elapsed < self.frame {
            self.clock.sleep(self.frame - elapsed);
            now = self.clock.now();
            elapsed = now.saturating_sub(self.last_frame);
        }

        self.delta = elapsed;
        self.last_frame += self.frame;

        let now = self.clock.now();
        if now.saturating_sub(self.last_frame) > self.frame {
            log::trace!("frame schedule behind by {:?}; resetting", now - self.last_frame);
            self.last_frame = now;
        }
    }

    /// Marks a frame boundary without sleeping.
    ///
    /// For loops paced by someone else, such as the browser's animation frame.
    /// The delta is the time since the previous tick and the schedule is left
    /// at now.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.delta = now.saturating_sub(self.last_frame);
        self.last_frame = now;
    }

    /// Seconds the last frame took, measured by [`FrameTimer::wait`] or
    /// [`FrameTimer::tick`].
    pub fn delta_time(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Frames counted during the last completed one-second window.
    ///
    /// Each call counts as one frame; call it once per frame.
    pub fn fps(&mut self) -> u32 {
        self.frame_count += 1;
        let now = self.clock.now();
        if now.saturating_sub(self.fps_window_start) >= FPS_WINDOW {
            self.fps = self.frame_count;
            self.frame_count = 0;
            self.fps_window_start = now;
        }
        self.fps
    }

    /// Seconds since construction or the last [`FrameTimer::reset_timer`].
    pub fn time(&self) -> f64 {
        self.clock.now().saturating_sub(self.epoch).as_secs_f64()
    }

    pub fn reset_timer(&mut self) {
        self.epoch = self.clock.now();
    }
}

fn frame_interval(target_fps: u32) -> Duration {
    Duration::from_secs(1) / target_fps.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn timer(fps: u32) -> (FrameTimer, ManualClock) {
        let clock = ManualClock::new();
        (FrameTimer::new(Box::new(clock.clone()), fps), clock)
    }

    #[test]
    fn short_frame_is_padded() {
        let (mut t, clock) = timer(10);
        clock.advance(ms(30));
        t.wait();
        assert_eq!(clock.now(), ms(100));
        assert!((t.delta_time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn overrun_is_absorbed_by_next_frame() {
        let (mut t, clock) = timer(10);
        clock.advance(ms(150));
        t.wait();
        assert_eq!(clock.now(), ms(150));
        assert!((t.delta_time() - 0.15).abs() < 1e-6);

        // Schedule point is 100ms, so only 40ms of sleep remain after 10ms of work.
        clock.advance(ms(10));
        t.wait();
        assert_eq!(clock.now(), ms(200));
    }

    #[test]
    fn schedule_resets_when_more_than_a_frame_behind() {
        let (mut t, clock) = timer(10);
        clock.advance(ms(350));
        t.wait();
        // Without the reset the next frames would run unpaced to catch up.
        t.wait();
        assert_eq!(clock.now(), ms(450));
    }

    #[test]
    fn tick_measures_real_gaps_without_sleeping() {
        let (mut t, clock) = timer(60);
        clock.advance(ms(7));
        t.tick();
        assert_eq!(clock.now(), ms(7));
        assert!((t.delta_time() - 0.007).abs() < 1e-6);

        // Faster than the target rate still reports the actual gap.
        clock.advance(ms(4));
        t.tick();
        assert!((t.delta_time() - 0.004).abs() < 1e-6);

        clock.advance(ms(40));
        t.tick();
        assert!((t.delta_time() - 0.04).abs() < 1e-6);
        assert_eq!(clock.now(), ms(51));
    }

    #[test]
    fn zero_target_fps_is_one() {
        let (t, _) = timer(0);
        assert_eq!(t.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn fps_publishes_once_per_window() {
        let (mut t, clock) = timer(60);
        let step = Duration::from_nanos(16_666_667);

        for _ in 0..59 {
            clock.advance(step);
            assert_eq!(t.fps(), 0);
        }
        clock.advance(step);
        assert_eq!(t.fps(), 60);

        // Counter restarted: the published value holds until the next window closes.
        clock.advance(step);
        assert_eq!(t.fps(), 60);
        clock.advance(Duration::from_secs(1));
        assert_eq!(t.fps(), 2);
    }

    #[test]
    fn time_counts_from_resettable_epoch() {
        let (mut t, clock) = timer(60);
        clock.advance(ms(2500));
        assert!((t.time() - 2.5).abs() < 1e-9);
        t.reset_timer();
        assert_eq!(t.time(), 0.0);
        clock.advance(ms(500));
        assert!((t.time() - 0.5).abs() < 1e-9);
    }
}
