/// Frame clock: turns wall-clock instants into the `dt` fed to `step()`.
///
/// First frame (and the first frame after `reset()`) yields 0. A stall
/// longer than `max_dt` is capped so a paused terminal or debugger break
/// does not fling entities through walls on resume.

use std::time::{Duration, Instant};

pub struct FrameClock {
    last: Option<Instant>,
    max_dt: Duration,
    pub frame_count: u64,
}

impl FrameClock {
    pub fn new(max_dt: Duration) -> Self {
        FrameClock { last: None, max_dt, frame_count: 0 }
    }

    /// Seconds elapsed since the previous call.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.frame_count += 1;
        let prev = self.last.replace(now);
        let elapsed = match prev {
            Some(p) => now.saturating_duration_since(p),
            None => return 0.0,
        };
        if elapsed > self.max_dt {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                elapsed.as_secs_f64() * 1000.0,
                self.max_dt.as_millis()
            );
            return self.max_dt.as_secs_f32();
        }
        elapsed.as_secs_f32()
    }

    /// Forget the previous instant; the next tick yields 0.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Sanitize a host-supplied dt: negative, NaN or infinite becomes 0.
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_zero() {
        let mut c = FrameClock::new(Duration::from_millis(250));
        assert_eq!(c.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn measures_elapsed() {
        let mut c = FrameClock::new(Duration::from_millis(250));
        let t0 = Instant::now();
        c.tick_at(t0);
        let dt = c.tick_at(t0 + Duration::from_millis(20));
        assert!((dt - 0.020).abs() < 1e-4);
        assert_eq!(c.frame_count, 2);
    }

    #[test]
    fn caps_long_stall() {
        let mut c = FrameClock::new(Duration::from_millis(250));
        let t0 = Instant::now();
        c.tick_at(t0);
        let dt = c.tick_at(t0 + Duration::from_secs(5));
        assert!((dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn backwards_instant_is_zero() {
        let mut c = FrameClock::new(Duration::from_millis(250));
        let t0 = Instant::now() + Duration::from_secs(1);
        c.tick_at(t0);
        assert_eq!(c.tick_at(t0 - Duration::from_millis(500)), 0.0);
    }

    #[test]
    fn reset_restarts_at_zero() {
        let mut c = FrameClock::new(Duration::from_millis(250));
        let t0 = Instant::now();
        c.tick_at(t0);
        c.reset();
        assert_eq!(c.tick_at(t0 + Duration::from_millis(100)), 0.0);
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_dt(-1.0), 0.0);
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
        assert_eq!(sanitize_dt(0.016), 0.016);
    }
}
