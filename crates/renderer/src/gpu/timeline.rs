use std::time::{Duration, Instant};

/// Delay before the first paint becomes visible, so the restored color is
/// already applied when the fade starts.
const FIRST_PAINT_DELAY: Duration = Duration::from_millis(50);

/// Gates the first paint: fully dark through a short delay, then a
/// smoothstep ramp up to full visibility over the configured duration.
pub(crate) struct RevealEnvelope {
    start: Instant,
    duration: Duration,
}

impl RevealEnvelope {
    pub fn new(duration: Duration, now: Instant) -> Self {
        Self {
            start: now,
            duration,
        }
    }

    /// Visibility in [0, 1] at `now`. Monotonic.
    pub fn level(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed <= FIRST_PAINT_DELAY {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let progress =
            (elapsed - FIRST_PAINT_DELAY).as_secs_f32() / self.duration.as_secs_f32();
        smoothstep(progress.clamp(0.0, 1.0))
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_before_the_delay_elapses() {
        let start = Instant::now();
        let envelope = RevealEnvelope::new(Duration::from_millis(300), start);
        assert_eq!(envelope.level(start), 0.0);
        assert_eq!(envelope.level(start + Duration::from_millis(49)), 0.0);
    }

    #[test]
    fn fully_visible_after_delay_plus_duration() {
        let start = Instant::now();
        let envelope = RevealEnvelope::new(Duration::from_millis(300), start);
        let level = envelope.level(start + Duration::from_millis(350));
        assert!((level - 1.0).abs() < 1e-6);
        let later = envelope.level(start + Duration::from_secs(10));
        assert!((later - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ramp_is_monotonic_and_hits_midpoint() {
        let start = Instant::now();
        let envelope = RevealEnvelope::new(Duration::from_millis(200), start);
        let mut last = -1.0;
        for ms in (50..=250).step_by(10) {
            let level = envelope.level(start + Duration::from_millis(ms));
            assert!(level >= last);
            last = level;
        }
        let mid = envelope.level(start + Duration::from_millis(150));
        assert!((mid - 0.5).abs() < 0.05);
    }

    #[test]
    fn zero_duration_snaps_open_after_the_delay() {
        let start = Instant::now();
        let envelope = RevealEnvelope::new(Duration::ZERO, start);
        assert_eq!(envelope.level(start + Duration::from_millis(10)), 0.0);
        assert_eq!(envelope.level(start + Duration::from_millis(51)), 1.0);
    }
}
