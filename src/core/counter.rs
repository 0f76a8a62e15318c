//! Hero statistics that count up the first time they scroll into view

use super::patch::{Patch, Patches, Target};
use super::scheduler::{Scheduler, TimerId};
use super::settings::CounterSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterTask {
    Tick(usize),
}

/// Numeric part and decoration of a stat such as `"150+"`
#[derive(Clone, Debug, PartialEq)]
pub struct CounterText {
    pub target: u64,
    pub suffix: String,
}

impl CounterText {
    /// All digits form the target, all other characters the suffix.
    /// Text without digits, or with more digits than fit, is not a counter.
    pub fn parse(text: &str) -> Option<Self> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        let target = digits.parse().ok()?;
        // Markup indentation around the number is not part of the suffix
        let suffix = text
            .chars()
            .filter(|c| !c.is_ascii_digit())
            .collect::<String>()
            .trim()
            .to_string();
        Some(Self { target, suffix })
    }

    pub fn render(&self, value: u64) -> String {
        format!("{value}{}", self.suffix)
    }
}

#[derive(Clone, Debug)]
struct CounterState {
    text: CounterText,
    current: f64,
    animated: bool,
    timer: Option<TimerId>,
}

#[derive(Clone, Debug)]
pub struct Counters {
    /// `None` for stats whose text is not a number
    counters: Vec<Option<CounterState>>,
    settings: CounterSettings,
}

impl Counters {
    pub fn bind(texts: &[String], settings: &CounterSettings) -> Self {
        let counters = texts
            .iter()
            .map(|text| {
                CounterText::parse(text).map(|text| CounterState {
                    text,
                    current: 0.0,
                    animated: false,
                    timer: None,
                })
            })
            .collect();
        Self {
            counters,
            settings: settings.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Start counting `index` up. A stat animates at most once per binding.
    pub fn trigger<T: From<CounterTask> + Clone>(
        &mut self,
        index: usize,
        scheduler: &mut Scheduler<T>,
    ) -> bool {
        let Some(Some(state)) = self.counters.get_mut(index) else {
            return false;
        };
        if state.animated {
            return false;
        }
        state.animated = true;
        state.current = 0.0;
        state.timer = Some(scheduler.every(
            f64::from(self.settings.tick_ms),
            CounterTask::Tick(index).into(),
        ));
        true
    }

    pub fn handle<T: Clone>(
        &mut self,
        task: CounterTask,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) {
        let CounterTask::Tick(index) = task;
        let steps = f64::from(self.settings.steps.max(1));
        let Some(Some(state)) = self.counters.get_mut(index) else {
            return;
        };

        let target = state.text.target as f64;
        state.current += target / steps;
        if state.current >= target {
            state.current = target;
            if let Some(id) = state.timer.take() {
                scheduler.cancel(id);
            }
        }
        out.push(Patch::text(
            Target::Counter(index),
            state.text.render(state.current.floor() as u64),
        ));
    }

    pub fn stop<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        for state in self.counters.iter_mut().flatten() {
            if let Some(id) = state.timer.take() {
                scheduler.cancel(id);
            }
        }
    }
}
