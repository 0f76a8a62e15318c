//! Roadmap progress line
//!
//! The stroke offset has exactly one owner. Two inputs retarget it:
//! discrete step reveals (slow, 1500ms) and continuous scrolling (fast,
//! 100ms). A running step-driven tween wins over scroll input until it
//! finishes; a step reveal always replaces whatever is running.

use super::scheduler::Millis;
use super::tween::Tween;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineDriver {
    StepReveal,
    Scroll,
}

#[derive(Clone, Debug)]
pub struct LineProgress {
    length: f64,
    tween: Tween,
    driver: Option<LineDriver>,
    step_duration: Millis,
    scroll_duration: Millis,
    /// Last offset handed out by `sample`, to skip redundant writes
    last_written: Option<f64>,
}

impl LineProgress {
    pub fn new(length: f64, step_duration: Millis, scroll_duration: Millis) -> Self {
        Self {
            length,
            tween: Tween::settled(length),
            driver: None,
            step_duration,
            scroll_duration,
            last_written: None,
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn offset_at(&self, now: Millis) -> f64 {
        self.tween.value_at(now)
    }

    pub fn target(&self) -> f64 {
        self.tween.to
    }

    /// Who is currently moving the line, if anyone
    pub fn driver(&self, now: Millis) -> Option<LineDriver> {
        self.driver.filter(|_| !self.tween.is_finished(now))
    }

    /// Retarget after a step reveal: offset `length * (1 - fraction)`
    pub fn retarget_for_steps(&mut self, visible_fraction: f64, now: Millis) {
        let target = self.length * (1.0 - visible_fraction.clamp(0.0, 1.0));
        self.retarget(target, self.step_duration, LineDriver::StepReveal, now);
    }

    /// Retarget from raw scroll. Ignored while a step tween is in flight
    /// and when nothing has been scrolled yet. Returns whether it applied.
    pub fn retarget_for_scroll(&mut self, fraction: f64, now: Millis) -> bool {
        if fraction <= 0.0 {
            return false;
        }
        if self.driver(now) == Some(LineDriver::StepReveal) {
            return false;
        }
        let target = self.length * (1.0 - fraction.min(1.0));
        self.retarget(target, self.scroll_duration, LineDriver::Scroll, now);
        true
    }

    fn retarget(&mut self, target: f64, duration: Millis, driver: LineDriver, now: Millis) {
        let from = self.offset_at(now);
        self.tween = Tween::new(from, target, now, duration);
        self.driver = Some(driver);
    }

    /// Offset to write this frame, or `None` if it has not changed
    pub fn sample(&mut self, now: Millis) -> Option<f64> {
        let value = self.offset_at(now);
        if self.last_written == Some(value) {
            return None;
        }
        self.last_written = Some(value);
        Some(value)
    }

    /// Jump back to the undrawn state
    pub fn reset(&mut self) {
        self.tween = Tween::settled(self.length);
        self.driver = None;
        self.last_written = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> LineProgress {
        LineProgress::new(2000.0, 1500.0, 100.0)
    }

    #[test]
    fn test_starts_undrawn() {
        let line = line();
        assert_eq!(line.offset_at(0.0), 2000.0);
        assert_eq!(line.driver(0.0), None);
    }

    #[test]
    fn test_step_retarget_eases_to_fraction() {
        let mut line = line();
        line.retarget_for_steps(0.4, 0.0);

        assert_eq!(line.target(), 1200.0);
        assert_eq!(line.driver(10.0), Some(LineDriver::StepReveal));
        // Half way through the tween ease-out-cubic has covered 87.5%
        assert!((line.offset_at(750.0) - 1300.0).abs() < 1e-9);
        assert_eq!(line.offset_at(1500.0), 1200.0);
        assert_eq!(line.driver(1500.0), None);
    }

    #[test]
    fn test_step_retarget_starts_from_current_value() {
        let mut line = line();
        line.retarget_for_steps(0.5, 0.0);
        let mid = line.offset_at(750.0);

        line.retarget_for_steps(1.0, 750.0);
        assert_eq!(line.offset_at(750.0), mid);
        assert_eq!(line.offset_at(2250.0), 0.0);
    }

    #[test]
    fn test_scroll_ignored_while_step_tween_runs() {
        let mut line = line();
        line.retarget_for_steps(0.2, 0.0);

        assert!(!line.retarget_for_scroll(0.9, 200.0));
        assert_eq!(line.target(), 1600.0);

        assert!(line.retarget_for_scroll(0.9, 1500.0));
        assert!((line.target() - 200.0).abs() < 1e-9);
        assert_eq!(line.driver(1550.0), Some(LineDriver::Scroll));
    }

    #[test]
    fn test_step_overrides_scroll() {
        let mut line = line();
        assert!(line.retarget_for_scroll(0.5, 0.0));
        line.retarget_for_steps(0.25, 50.0);
        assert_eq!(line.target(), 1500.0);
        assert_eq!(line.driver(60.0), Some(LineDriver::StepReveal));
    }

    #[test]
    fn test_zero_scroll_is_ignored() {
        let mut line = line();
        assert!(!line.retarget_for_scroll(0.0, 0.0));
        assert_eq!(line.driver(0.0), None);
    }

    #[test]
    fn test_sample_skips_unchanged_offsets() {
        let mut line = line();
        assert_eq!(line.sample(0.0), Some(2000.0));
        assert_eq!(line.sample(5.0), None);

        line.retarget_for_scroll(1.0, 10.0);
        assert!(line.sample(60.0).is_some());
        assert_eq!(line.sample(110.0), Some(0.0));
        assert_eq!(line.sample(500.0), None);
    }

    #[test]
    fn test_reset() {
        let mut line = line();
        line.retarget_for_steps(1.0, 0.0);
        line.sample(1500.0);
        line.reset();
        assert_eq!(line.offset_at(2000.0), 2000.0);
        assert_eq!(line.sample(2000.0), Some(2000.0));
    }
}
