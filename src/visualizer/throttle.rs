use std::time::Duration;

/// Limits full update passes to a target rate
///
/// The host calls in roughly once per display refresh. A call is accepted when
/// at least one frame interval has elapsed since the last accepted one; the
/// first call after construction or [`FrameThrottle::reset`] is always
/// accepted. The interval is a floor on spacing, not a promise of cadence.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last_accepted: Option<Duration>,
}

impl FrameThrottle {
    pub fn from_fps(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last_accepted: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_accepted(&self) -> Option<Duration> {
        self.last_accepted
    }

    /// Returns whether the frame at `now` should do work, recording it if so
    pub fn accept(&mut self, now: Duration) -> bool {
        let due = match self.last_accepted {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        };
        if due {
            self.last_accepted = Some(now);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn thirty_fps_skips_early_frames() {
        let mut throttle = FrameThrottle::from_fps(30);
        let accepted: Vec<u64> = [0, 5, 5, 20, 35]
            .into_iter()
            .filter(|&t| throttle.accept(ms(t)))
            .collect();
        assert_eq!(accepted, vec![0, 35]);
        assert_eq!(throttle.last_accepted(), Some(ms(35)));
    }

    #[test]
    fn spacing_is_measured_from_last_accepted_frame() {
        let mut throttle = FrameThrottle::from_fps(30);
        assert!(throttle.accept(ms(100)));
        assert!(!throttle.accept(ms(120)));
        // 34ms after the accepted frame, not after the skipped one
        assert!(throttle.accept(ms(134)));
    }

    #[test]
    fn reset_accepts_next_frame() {
        let mut throttle = FrameThrottle::from_fps(30);
        assert!(throttle.accept(ms(50)));
        throttle.reset();
        assert!(throttle.accept(ms(51)));
    }

    #[test]
    fn clock_going_backwards_does_not_accept() {
        let mut throttle = FrameThrottle::from_fps(30);
        assert!(throttle.accept(ms(500)));
        assert!(!throttle.accept(ms(10)));
    }

    #[test]
    fn zero_fps_is_treated_as_one() {
        assert_eq!(FrameThrottle::from_fps(0).interval(), Duration::from_secs(1));
    }
}
