//! Scroll-synchronised step reveal state machine
//!
//! Each roadmap step moves `Hidden → Revealing → Revealed` and back to
//! `Hidden` when it leaves the viewport. `RevealTracker` owns the states and
//! the set of revealed step ids; it decides transitions but performs no side
//! effects. The roadmap controller turns its decisions into patches.

use std::collections::BTreeSet;

use derive_more::Display;

use super::settings::RoadmapSettings;

/// Stable step identifier taken from the markup (`data-step`)
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepState {
    #[default]
    Hidden,
    /// Reveal decided, waiting for the settle delay
    Revealing,
    Revealed,
}

/// One intersection observation for a step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilitySignal {
    pub intersecting: bool,
    pub ratio: f64,
}

impl VisibilitySignal {
    pub fn new(intersecting: bool, ratio: f64) -> Self {
        Self { intersecting, ratio }
    }

    /// Signal for a step that is entirely out of view
    pub fn gone() -> Self {
        Self::new(false, 0.0)
    }
}

/// Step ids currently revealed. An id is inserted at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSet(BTreeSet<StepId>);

impl VisibleSet {
    /// Returns false when the id was already present
    pub fn insert(&mut self, id: StepId) -> bool {
        self.0.insert(id)
    }

    pub fn remove(&mut self, id: StepId) -> bool {
        self.0.remove(&id)
    }

    pub fn contains(&self, id: StepId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = StepId> + '_ {
        self.0.iter().copied()
    }
}

/// What the controller should do after feeding an observation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Start revealing step `index`, settling after `delay_ms`
    Reveal { index: usize, delay_ms: u32 },
    Hide { index: usize },
}

#[derive(Clone, Debug)]
pub struct RevealTracker {
    ids: Vec<StepId>,
    states: Vec<StepState>,
    visible: VisibleSet,
    reveal_ratio: f64,
    instant_ratio: f64,
    settle_delay_ms: u32,
    tolerance: f64,
}

impl RevealTracker {
    pub fn new(ids: Vec<StepId>, settings: &RoadmapSettings) -> Self {
        let states = vec![StepState::Hidden; ids.len()];
        Self {
            ids,
            states,
            visible: VisibleSet::default(),
            reveal_ratio: settings.reveal_ratio,
            instant_ratio: settings.instant_ratio,
            settle_delay_ms: settings.settle_delay_ms,
            tolerance: settings.scroll_tolerance,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id(&self, index: usize) -> Option<StepId> {
        self.ids.get(index).copied()
    }

    pub fn step_index(&self, id: StepId) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == id)
    }

    pub fn state(&self, index: usize) -> StepState {
        self.states.get(index).copied().unwrap_or_default()
    }

    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    /// Feed an intersection observation for step `index`
    pub fn observe(&mut self, index: usize, signal: VisibilitySignal) -> Option<Transition> {
        if signal.ratio > self.reveal_ratio {
            self.begin_reveal(index, signal.ratio)
        } else if signal.ratio == 0.0 {
            self.hide(index)
        } else {
            None
        }
    }

    /// Reveal every step whose proportional position has been reached.
    ///
    /// Step `i` of `n` qualifies once `progress >= (i + 1) / n - tolerance`.
    pub fn sync_scroll(&mut self, progress: f64) -> Vec<Transition> {
        let total = self.ids.len() as f64;
        let tolerance = self.tolerance;
        (0..self.ids.len())
            .filter(|&index| progress + 1e-9 >= (index + 1) as f64 / total - tolerance)
            .filter_map(|index| self.begin_reveal(index, 1.0))
            .collect()
    }

    /// Idempotent: returns `None` while the step is already in the visible set
    pub fn begin_reveal(&mut self, index: usize, ratio: f64) -> Option<Transition> {
        let id = self.id(index)?;
        if !self.visible.insert(id) {
            return None;
        }
        self.states[index] = StepState::Revealing;

        let delay_ms = if ratio < self.instant_ratio {
            self.settle_delay_ms
        } else {
            0
        };
        Some(Transition::Reveal { index, delay_ms })
    }

    /// Finish a pending reveal. Returns false when the step was hidden
    /// during the settle delay, in which case nothing should be shown.
    pub fn settle(&mut self, index: usize) -> bool {
        match self.states.get_mut(index) {
            Some(state @ StepState::Revealing) => {
                *state = StepState::Revealed;
                true
            }
            _ => false,
        }
    }

    pub fn hide(&mut self, index: usize) -> Option<Transition> {
        let id = self.id(index)?;
        if !self.visible.remove(id) {
            return None;
        }
        self.states[index] = StepState::Hidden;
        Some(Transition::Hide { index })
    }

    /// Fraction of steps in the visible set
    pub fn visible_fraction(&self) -> f64 {
        if self.ids.is_empty() {
            return 0.0;
        }
        self.visible.len() as f64 / self.ids.len() as f64
    }

    pub fn reset(&mut self) {
        self.visible.clear();
        self.states.fill(StepState::Hidden);
    }
}
