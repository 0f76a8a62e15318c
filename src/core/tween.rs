//! Time-based interpolation

use super::scheduler::Millis;

/// Ease-out cubic: fast start, slow finish
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// A single eased transition between two values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start: Millis,
    pub duration: Millis,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: Millis, duration: Millis) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// A tween that is already at rest on `value`
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, 0.0, 0.0)
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: Millis) -> f64 {
        self.from + (self.to - self.from) * ease_out_cubic(self.progress(now))
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(-3.0), 0.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_tween_interpolates_and_finishes() {
        let tween = Tween::new(2000.0, 1000.0, 100.0, 1000.0);

        assert_eq!(tween.value_at(0.0), 2000.0);
        assert_eq!(tween.value_at(100.0), 2000.0);
        assert!((tween.value_at(600.0) - 1125.0).abs() < 1e-9);
        assert_eq!(tween.value_at(1100.0), 1000.0);
        assert!(!tween.is_finished(1099.0));
        assert!(tween.is_finished(1100.0));
    }

    #[test]
    fn test_settled_tween() {
        let tween = Tween::settled(42.0);
        assert_eq!(tween.value_at(-10.0), 42.0);
        assert!(tween.is_finished(0.0));
    }
}
