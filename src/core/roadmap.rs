//! Interactive roadmap controller
//!
//! Binds the reveal state machine, the per-step typewriters and the progress
//! line to the scheduler, and translates their decisions into patches.
//!
//! Markup contract: a `.roadmap-container`, a `.roadmap-line` SVG path and
//! one or more `.roadmap-step[data-step]` children, each optionally holding
//! `.step-title`, `.step-description` and `.step-pulse`.

use super::line_progress::LineProgress;
use super::patch::{Patch, Patches, Target};
use super::reveal::{RevealTracker, StepId, Transition, VisibilitySignal};
use super::scheduler::{Millis, Scheduler, TimerId};
use super::settings::RoadmapSettings;
use super::typewriter::Typewriter;
use super::viewport::{self, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextField {
    Title,
    Description,
}

impl TextField {
    fn target(self, index: usize) -> Target {
        match self {
            TextField::Title => Target::StepTitle(index),
            TextField::Description => Target::StepDescription(index),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadmapTask {
    Settle { index: usize },
    StartTyping { index: usize, field: TextField },
    Type { index: usize, field: TextField },
}

/// What the page provided for one step
#[derive(Clone, Debug, PartialEq)]
pub struct StepMarkup {
    pub id: StepId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub has_pulse: bool,
}

#[derive(Debug)]
struct TypedText {
    writer: Typewriter,
    timer: Option<TimerId>,
    /// Emptied and waiting for the next forward reveal
    ready: bool,
}

impl TypedText {
    fn new(text: String, speed_ms: u32) -> Self {
        Self {
            writer: Typewriter::new(text, speed_ms),
            timer: None,
            ready: true,
        }
    }
}

#[derive(Debug)]
struct StepSlot {
    title: Option<TypedText>,
    description: Option<TypedText>,
    has_pulse: bool,
    /// Settle and typing-start timers not yet fired
    pending: Vec<TimerId>,
}

impl StepSlot {
    fn field_mut(&mut self, field: TextField) -> Option<&mut TypedText> {
        match field {
            TextField::Title => self.title.as_mut(),
            TextField::Description => self.description.as_mut(),
        }
    }
}

#[derive(Debug)]
pub struct Roadmap {
    tracker: RevealTracker,
    slots: Vec<StepSlot>,
    line: LineProgress,
    settings: RoadmapSettings,
}

impl Roadmap {
    /// Returns `None` when the page has no steps, which disables the roadmap
    pub fn bind(steps: Vec<StepMarkup>, settings: &RoadmapSettings) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }

        let ids = steps.iter().map(|step| step.id).collect();
        let slots = steps
            .into_iter()
            .map(|step| StepSlot {
                title: step
                    .title
                    .map(|text| TypedText::new(text, settings.title_speed_ms)),
                description: step
                    .description
                    .map(|text| TypedText::new(text, settings.description_speed_ms)),
                has_pulse: step.has_pulse,
                pending: Vec::new(),
            })
            .collect();

        Some(Self {
            tracker: RevealTracker::new(ids, settings),
            slots,
            line: LineProgress::new(
                settings.line_length,
                settings.step_line_duration_ms as f64,
                settings.scroll_line_duration_ms as f64,
            ),
            settings: settings.clone(),
        })
    }

    pub fn tracker(&self) -> &RevealTracker {
        &self.tracker
    }

    pub fn line(&self) -> &LineProgress {
        &self.line
    }

    /// Index of the step carrying `data-step="number"`
    pub fn step_index(&self, number: u32) -> Option<usize> {
        self.tracker.step_index(StepId(number))
    }

    /// Stagger transitions and empty every text field ahead of its reveal
    pub fn prepare(&self, out: &mut Patches) {
        for (index, slot) in self.slots.iter().enumerate() {
            out.push(Patch::style(
                Target::Step(index),
                "transition-delay",
                format!("{:.2}s", index as f64 * self.settings.stagger_s),
            ));
            for (field, text) in [
                (TextField::Title, &slot.title),
                (TextField::Description, &slot.description),
            ] {
                if text.is_some() {
                    out.push(Patch::text(field.target(index), ""));
                    out.push(Patch::add_class(field.target(index), "typing-ready"));
                }
            }
        }
    }

    pub fn observe<T>(
        &mut self,
        index: usize,
        signal: VisibilitySignal,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<RoadmapTask> + Clone,
    {
        if let Some(transition) = self.tracker.observe(index, signal) {
            self.apply(transition, scheduler, out);
        }
    }

    /// Per-frame scroll update: line first, then step visibility
    pub fn on_scroll<T>(
        &mut self,
        container: Rect,
        viewport_height: f64,
        now: Millis,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<RoadmapTask> + Clone,
    {
        let fraction = viewport::line_fraction(container, viewport_height);
        self.line.retarget_for_scroll(fraction, now);

        let progress = viewport::container_progress(container, viewport_height);
        for transition in self.tracker.sync_scroll(progress) {
            self.apply(transition, scheduler, out);
        }
    }

    /// Reveal steps that already sit in the middle of the viewport on load
    pub fn initial_check<T>(
        &mut self,
        step_rects: &[Rect],
        viewport_height: f64,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<RoadmapTask> + Clone,
    {
        for (index, rect) in step_rects.iter().enumerate() {
            if viewport::in_reveal_band(*rect, viewport_height) {
                if let Some(transition) = self.tracker.begin_reveal(index, 1.0) {
                    self.apply(transition, scheduler, out);
                }
            }
        }
    }

    fn apply<T>(&mut self, transition: Transition, scheduler: &mut Scheduler<T>, out: &mut Patches)
    where
        T: From<RoadmapTask> + Clone,
    {
        match transition {
            Transition::Reveal { index, delay_ms } => {
                let timer = scheduler.after(delay_ms as f64, RoadmapTask::Settle { index }.into());
                self.track(index, timer, scheduler);
            }
            Transition::Hide { index } => self.hide_step(index, scheduler, out),
        }
    }

    fn track<T: Clone>(&mut self, index: usize, timer: TimerId, scheduler: &Scheduler<T>) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.pending.retain(|id| scheduler.is_scheduled(*id));
            slot.pending.push(timer);
        }
    }

    pub fn handle<T>(&mut self, task: RoadmapTask, scheduler: &mut Scheduler<T>, out: &mut Patches)
    where
        T: From<RoadmapTask> + Clone,
    {
        match task {
            RoadmapTask::Settle { index } => self.settle_step(index, scheduler, out),
            RoadmapTask::StartTyping { index, field } => {
                self.start_typing(index, field, scheduler, out)
            }
            RoadmapTask::Type { index, field } => self.type_next(index, field, scheduler, out),
        }
    }

    fn settle_step<T>(&mut self, index: usize, scheduler: &mut Scheduler<T>, out: &mut Patches)
    where
        T: From<RoadmapTask> + Clone,
    {
        if !self.tracker.settle(index) {
            return;
        }

        out.push(Patch::add_class(Target::Step(index), "visible"));

        self.line
            .retarget_for_steps(self.tracker.visible_fraction(), scheduler.now());
        out.push(Patch::add_class(Target::RoadmapLine, "animate"));

        let Some(slot) = self.slots.get(index) else {
            return;
        };
        let mut starts = Vec::new();
        if slot.title.as_ref().is_some_and(|text| text.ready) {
            starts.push((TextField::Title, self.settings.title_delay_ms));
        }
        if slot.description.as_ref().is_some_and(|text| text.ready) {
            starts.push((TextField::Description, self.settings.description_delay_ms));
        }
        let has_pulse = slot.has_pulse;

        for (field, delay) in starts {
            let timer = scheduler.after(delay as f64, RoadmapTask::StartTyping { index, field }.into());
            self.track(index, timer, scheduler);
        }

        if has_pulse {
            out.push(Patch::RestartAnimation {
                target: Target::StepPulse(index),
                animation: self.settings.pulse_animation.clone(),
            });
        }
    }

    fn start_typing<T>(
        &mut self,
        index: usize,
        field: TextField,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<RoadmapTask> + Clone,
    {
        let Some(text) = self.slots.get_mut(index).and_then(|slot| slot.field_mut(field)) else {
            return;
        };
        if !text.ready {
            return;
        }

        text.ready = false;
        text.writer.reset();
        if let Some(old) = text.timer.take() {
            scheduler.cancel(old);
        }
        let period = text.writer.speed_ms() as f64;
        text.timer = Some(scheduler.every(period, RoadmapTask::Type { index, field }.into()));

        let target = field.target(index);
        out.push(Patch::remove_class(target, "typing-ready"));
        out.push(Patch::add_class(target, "typing-text"));
    }

    fn type_next<T>(
        &mut self,
        index: usize,
        field: TextField,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<RoadmapTask> + Clone,
    {
        let Some(text) = self.slots.get_mut(index).and_then(|slot| slot.field_mut(field)) else {
            return;
        };
        let target = field.target(index);

        match text.writer.advance() {
            Some(prefix) => out.push(Patch::text(target, prefix)),
            None => {
                if let Some(timer) = text.timer.take() {
                    scheduler.cancel(timer);
                }
                out.push(Patch::remove_class(target, "typing-text"));
                out.push(Patch::text(target, text.writer.full_text()));
            }
        }
    }

    fn hide_step<T: Clone>(&mut self, index: usize, scheduler: &mut Scheduler<T>, out: &mut Patches) {
        out.push(Patch::remove_class(Target::Step(index), "visible"));
        self.restore_text(index, scheduler, out);
    }

    /// Cancel pending work for a step and show its full text instantly
    fn restore_text<T: Clone>(
        &mut self,
        index: usize,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        for timer in slot.pending.drain(..) {
            scheduler.cancel(timer);
        }

        for field in [TextField::Title, TextField::Description] {
            let Some(text) = slot.field_mut(field) else {
                continue;
            };
            if let Some(timer) = text.timer.take() {
                scheduler.cancel(timer);
            }
            text.ready = true;

            let target = field.target(index);
            out.push(Patch::text(target, text.writer.full_text()));
            out.push(Patch::remove_class(target, "typing-text"));
            out.push(Patch::add_class(target, "typing-ready"));
        }
    }

    /// Write the line offset if it moved since the last frame
    pub fn render_line(&mut self, now: f64, out: &mut Patches) {
        if let Some(offset) = self.line.sample(now) {
            out.push(Patch::style(
                Target::RoadmapLine,
                "stroke-dashoffset",
                format!("{offset:.2}"),
            ));
        }
    }

    /// Put every step back to hidden and the line back to undrawn
    pub fn reset<T: Clone>(&mut self, scheduler: &mut Scheduler<T>, out: &mut Patches) {
        self.tracker.reset();
        for index in 0..self.slots.len() {
            out.push(Patch::remove_class(Target::Step(index), "visible"));
            self.restore_text(index, scheduler, out);
        }

        self.line.reset();
        self.render_line(scheduler.now(), out);
        out.push(Patch::remove_class(Target::RoadmapLine, "animate"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patch::{last_class, last_text};

    fn markup(n: u32) -> Vec<StepMarkup> {
        (1..=n)
            .map(|id| StepMarkup {
                id: StepId(id),
                title: Some(format!("Step {id}")),
                description: Some("Ship it".to_string()),
                has_pulse: true,
            })
            .collect()
    }

    fn roadmap(n: u32) -> Roadmap {
        Roadmap::bind(markup(n), &RoadmapSettings::default()).unwrap()
    }

    fn run(
        roadmap: &mut Roadmap,
        scheduler: &mut Scheduler<RoadmapTask>,
        until: f64,
        out: &mut Patches,
    ) {
        while let Some(due) = scheduler.pop_due(until) {
            roadmap.handle(due.task, scheduler, out);
        }
        scheduler.settle(until);
        roadmap.render_line(until, out);
    }

    #[test]
    fn test_bind_without_steps_disables() {
        assert!(Roadmap::bind(Vec::new(), &RoadmapSettings::default()).is_none());
    }

    #[test]
    fn test_prepare_empties_text_and_staggers() {
        let roadmap = roadmap(3);
        let mut out = Vec::new();
        roadmap.prepare(&mut out);

        assert_eq!(last_text(&out, Target::StepTitle(0)), Some(""));
        assert_eq!(last_text(&out, Target::StepDescription(2)), Some(""));
        assert_eq!(last_class(&out, Target::StepTitle(1), "typing-ready"), Some(true));
        assert!(out.contains(&Patch::style(
            Target::Step(2),
            "transition-delay",
            "0.30s"
        )));
    }

    #[test]
    fn test_full_reveal_sequence() {
        let mut roadmap = roadmap(2);
        let mut scheduler: Scheduler<RoadmapTask> = Scheduler::new();
        let mut out = Vec::new();

        roadmap.observe(0, VisibilitySignal::new(true, 0.3), &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 299.0, &mut out);
        assert_eq!(last_class(&out, Target::Step(0), "visible"), None);

        run(&mut roadmap, &mut scheduler, 300.0, &mut out);
        assert_eq!(last_class(&out, Target::Step(0), "visible"), Some(true));
        assert_eq!(last_class(&out, Target::RoadmapLine, "animate"), Some(true));
        assert!(out.contains(&Patch::RestartAnimation {
            target: Target::StepPulse(0),
            animation: "pulse 3s infinite".to_string(),
        }));

        // Title starts at +200ms and types one char per 30ms
        out.clear();
        run(&mut roadmap, &mut scheduler, 500.0 + 30.0, &mut out);
        assert_eq!(last_text(&out, Target::StepTitle(0)), Some("S"));
        assert_eq!(last_class(&out, Target::StepTitle(0), "typing-text"), Some(true));

        // "Step 1" is 6 characters: complete after 6 ticks, timer stops on the 7th
        run(&mut roadmap, &mut scheduler, 500.0 + 30.0 * 7.0, &mut out);
        assert_eq!(last_text(&out, Target::StepTitle(0)), Some("Step 1"));
        assert_eq!(last_class(&out, Target::StepTitle(0), "typing-text"), Some(false));

        // Description starts at +800ms, 25ms per char
        out.clear();
        run(&mut roadmap, &mut scheduler, 1100.0 + 25.0 * 3.0, &mut out);
        assert_eq!(last_text(&out, Target::StepDescription(0)), Some("Shi"));

        run(&mut roadmap, &mut scheduler, 5000.0, &mut out);
        assert_eq!(last_text(&out, Target::StepDescription(0)), Some("Ship it"));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_hide_restores_full_text_instantly() {
        let mut roadmap = roadmap(1);
        let mut scheduler: Scheduler<RoadmapTask> = Scheduler::new();
        let mut out = Vec::new();

        roadmap.observe(0, VisibilitySignal::new(true, 0.9), &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 200.0 + 30.0 * 2.0, &mut out);
        assert_eq!(last_text(&out, Target::StepTitle(0)), Some("St"));

        roadmap.observe(0, VisibilitySignal::gone(), &mut scheduler, &mut out);
        assert_eq!(last_text(&out, Target::StepTitle(0)), Some("Step 1"));
        assert_eq!(last_text(&out, Target::StepDescription(0)), Some("Ship it"));
        assert_eq!(last_class(&out, Target::Step(0), "visible"), Some(false));
        assert_eq!(last_class(&out, Target::StepTitle(0), "typing-ready"), Some(true));
        assert_eq!(scheduler.pending(), 0);

        // No typing remnants fire afterwards
        out.clear();
        run(&mut roadmap, &mut scheduler, 10_000.0, &mut out);
        assert_eq!(last_text(&out, Target::StepTitle(0)), None);
    }

    #[test]
    fn test_hide_during_settle_delay_cancels_reveal() {
        let mut roadmap = roadmap(1);
        let mut scheduler: Scheduler<RoadmapTask> = Scheduler::new();
        let mut out = Vec::new();

        roadmap.observe(0, VisibilitySignal::new(true, 0.2), &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 100.0, &mut out);
        roadmap.observe(0, VisibilitySignal::gone(), &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 1000.0, &mut out);

        assert_eq!(last_class(&out, Target::Step(0), "visible"), Some(false));
        assert!(roadmap.tracker().visible().is_empty());
    }

    #[test]
    fn test_reveal_again_types_from_empty() {
        let mut roadmap = roadmap(1);
        let mut scheduler: Scheduler<RoadmapTask> = Scheduler::new();
        let mut out = Vec::new();

        roadmap.observe(0, VisibilitySignal::new(true, 1.0), &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 3000.0, &mut out);
        roadmap.observe(0, VisibilitySignal::gone(), &mut scheduler, &mut out);

        out.clear();
        roadmap.observe(0, VisibilitySignal::new(true, 1.0), &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 3000.0 + 200.0 + 30.0, &mut out);
        assert_eq!(last_text(&out, Target::StepTitle(0)), Some("S"));
    }

    #[test]
    fn test_scroll_drives_steps_and_line() {
        let mut roadmap = roadmap(5);
        let mut scheduler: Scheduler<RoadmapTask> = Scheduler::new();
        let mut out = Vec::new();

        // progress = (800 + 100) / (800 + 1000) = 0.5, reveals steps 1..=3
        roadmap.on_scroll(Rect::new(-100.0, 1000.0), 800.0, 0.0, &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 0.0, &mut out);

        let visible: Vec<_> = roadmap.tracker().visible().iter().map(|id| id.0).collect();
        assert_eq!(visible, vec![1, 2, 3]);
        assert_eq!(last_class(&out, Target::Step(2), "visible"), Some(true));
        assert_eq!(last_class(&out, Target::Step(3), "visible"), None);

        // The step-driven tween owns the line: target 2000 * (1 - 3/5)
        assert!((roadmap.line().target() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_initial_check_reveals_centered_steps() {
        let mut roadmap = roadmap(3);
        let mut scheduler: Scheduler<RoadmapTask> = Scheduler::new();
        let mut out = Vec::new();

        let rects = [
            Rect::new(-500.0, 100.0),
            Rect::new(400.0, 100.0),
            Rect::new(1200.0, 100.0),
        ];
        roadmap.initial_check(&rects, 1000.0, &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 0.0, &mut out);

        let visible: Vec<_> = roadmap.tracker().visible().iter().map(|id| id.0).collect();
        assert_eq!(visible, vec![2]);
    }

    #[test]
    fn test_reset_hides_everything() {
        let mut roadmap = roadmap(2);
        let mut scheduler: Scheduler<RoadmapTask> = Scheduler::new();
        let mut out = Vec::new();

        roadmap.on_scroll(Rect::new(-2000.0, 1000.0), 800.0, 0.0, &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 400.0, &mut out);

        out.clear();
        roadmap.reset(&mut scheduler, &mut out);

        assert!(roadmap.tracker().visible().is_empty());
        assert_eq!(last_class(&out, Target::Step(0), "visible"), Some(false));
        assert_eq!(last_class(&out, Target::Step(1), "visible"), Some(false));
        assert_eq!(last_class(&out, Target::RoadmapLine, "animate"), Some(false));
        assert!(out.contains(&Patch::style(
            Target::RoadmapLine,
            "stroke-dashoffset",
            "2000.00"
        )));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_index_of_step_number() {
        let roadmap = roadmap(4);
        assert_eq!(roadmap.step_index(3), Some(2));
        assert_eq!(roadmap.step_index(9), None);
    }

    #[test]
    fn test_steps_without_optional_children() {
        let steps = vec![StepMarkup {
            id: StepId(1),
            title: None,
            description: None,
            has_pulse: false,
        }];
        let mut roadmap = Roadmap::bind(steps, &RoadmapSettings::default()).unwrap();
        let mut scheduler: Scheduler<RoadmapTask> = Scheduler::new();
        let mut out = Vec::new();

        roadmap.observe(0, VisibilitySignal::new(true, 1.0), &mut scheduler, &mut out);
        run(&mut roadmap, &mut scheduler, 2000.0, &mut out);

        assert_eq!(last_class(&out, Target::Step(0), "visible"), Some(true));
        assert!(!out.iter().any(|p| matches!(p, Patch::RestartAnimation { .. })));
        assert_eq!(last_text(&out, Target::StepTitle(0)), None);
    }
}
