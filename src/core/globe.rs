//! Technology globe
//!
//! A slowly spinning globe of technology icons. Hovering or clicking an icon
//! stops the spin and shows that technology in the info panel; dragging
//! rotates the globe by hand.
//!
//! Pausing cancels the rotation timer outright and resuming always schedules
//! a fresh one, so the sub-tick phase is not carried over. The accumulated
//! angle is kept.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::error::{EffectError, EffectResult};
use super::patch::{Patch, Patches, Target};
use super::rotation::GlobeRotation;
use super::scheduler::{Scheduler, TimerId};
use super::settings::RotationSettings;

const CATALOG_JSON: &str = include_str!("tech_catalog.json");

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TechEntry {
    pub key: String,
    pub name: String,
    pub description: String,
}

/// Technologies the globe can describe, keyed by `data-tech`
#[derive(Clone, Debug, Default)]
pub struct TechCatalog {
    entries: BTreeMap<String, TechEntry>,
}

impl TechCatalog {
    pub fn from_json(json: &str) -> EffectResult<Self> {
        let list: Vec<TechEntry> = serde_json::from_str(json).map_err(EffectError::InvalidCatalog)?;
        let entries = list
            .into_iter()
            .map(|entry| (entry.key.clone(), entry))
            .collect();
        Ok(Self { entries })
    }

    /// The catalogue shipped with the site
    pub fn builtin() -> EffectResult<Self> {
        Self::from_json(CATALOG_JSON)
    }

    pub fn get(&self, key: &str) -> Option<&TechEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlobeTask {
    Rotate,
    /// Swap the info panel text after its fade-out
    ShowInfo(String),
}

#[derive(Debug)]
pub struct TechGlobe {
    rotation: GlobeRotation,
    catalog: TechCatalog,
    timer: Option<TimerId>,
    info_swap: Option<TimerId>,
    hovered_icon: Option<String>,
    settings: RotationSettings,
}

impl TechGlobe {
    pub fn new(catalog: TechCatalog, settings: &RotationSettings) -> Self {
        Self {
            rotation: GlobeRotation::new(settings),
            catalog,
            timer: None,
            info_swap: None,
            hovered_icon: None,
            settings: settings.clone(),
        }
    }

    pub fn rotation(&self) -> &GlobeRotation {
        &self.rotation
    }

    pub fn is_rotating(&self) -> bool {
        self.timer.is_some()
    }

    pub fn start<T>(&mut self, scheduler: &mut Scheduler<T>)
    where
        T: From<GlobeTask> + Clone,
    {
        let tick = self.settings.tick_ms as f64;
        self.timer = Some(scheduler.every(tick, GlobeTask::Rotate.into()));
    }

    /// Clear and drop the rotation timer
    pub fn stop<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
    }

    /// Restart with a fresh timer
    pub fn resume<T>(&mut self, scheduler: &mut Scheduler<T>)
    where
        T: From<GlobeTask> + Clone,
    {
        self.stop(scheduler);
        self.start(scheduler);
    }

    pub fn handle(&mut self, task: GlobeTask, out: &mut Patches) {
        match task {
            GlobeTask::Rotate => {
                if self.rotation.tick() {
                    self.push_transform(out);
                }
            }
            GlobeTask::ShowInfo(key) => {
                self.info_swap = None;
                let Some(entry) = self.catalog.get(&key) else {
                    return;
                };
                out.push(Patch::text(Target::TechName, entry.name.clone()));
                out.push(Patch::text(Target::TechDescription, entry.description.clone()));
                out.push(Patch::style(
                    Target::InfoPanel,
                    "transition",
                    "all 0.4s cubic-bezier(0.4, 0, 0.2, 1)",
                ));
                out.push(Patch::style(Target::InfoPanel, "opacity", "1"));
                out.push(Patch::style(Target::InfoPanel, "transform", "translateY(0)"));
            }
        }
    }

    fn push_transform(&self, out: &mut Patches) {
        out.push(Patch::style(Target::Globe, "transform", self.rotation.transform()));
    }

    pub fn pointer_down<T: Clone>(
        &mut self,
        x: f64,
        y: f64,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) {
        self.rotation.begin_drag(x, y);
        out.push(Patch::style(Target::Globe, "cursor", "grabbing"));
        self.stop(scheduler);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, out: &mut Patches) {
        if self.rotation.drag_to(x, y) {
            self.push_transform(out);
        }
    }

    pub fn pointer_up<T>(&mut self, scheduler: &mut Scheduler<T>, out: &mut Patches)
    where
        T: From<GlobeTask> + Clone,
    {
        if !self.rotation.is_dragging() {
            return;
        }
        self.rotation.end_drag();
        out.push(Patch::style(Target::Globe, "cursor", "grab"));
        self.resume(scheduler);
    }

    /// Icon hover or click: fade the panel out, swap text in after a beat
    pub fn show_info<T>(&mut self, key: &str, scheduler: &mut Scheduler<T>, out: &mut Patches)
    where
        T: From<GlobeTask> + Clone,
    {
        self.hovered_icon = Some(key.to_string());
        self.stop(scheduler);

        if self.catalog.get(key).is_none() {
            return;
        }
        if let Some(pending) = self.info_swap.take() {
            scheduler.cancel(pending);
        }
        out.push(Patch::style(Target::InfoPanel, "opacity", "0"));
        out.push(Patch::style(Target::InfoPanel, "transform", "translateY(10px)"));
        let delay = self.settings.info_swap_ms as f64;
        self.info_swap = Some(scheduler.after(delay, GlobeTask::ShowInfo(key.to_string()).into()));
    }

    /// Pointer left an icon: restore the idle text and spin again
    pub fn icon_leave<T>(&mut self, scheduler: &mut Scheduler<T>, out: &mut Patches)
    where
        T: From<GlobeTask> + Clone,
    {
        self.hovered_icon = None;
        if let Some(pending) = self.info_swap.take() {
            scheduler.cancel(pending);
        }
        out.push(Patch::style(Target::InfoPanel, "transition", "all 0.3s ease"));
        out.push(Patch::text(Target::TechName, self.settings.idle_name.clone()));
        out.push(Patch::text(
            Target::TechDescription,
            self.settings.idle_description.clone(),
        ));
        self.resume(scheduler);
    }

    pub fn panel_enter<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        self.stop(scheduler);
    }

    pub fn panel_leave<T>(&mut self, scheduler: &mut Scheduler<T>)
    where
        T: From<GlobeTask> + Clone,
    {
        if self.hovered_icon.is_none() {
            self.resume(scheduler);
        }
    }

    pub fn shutdown<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        self.stop(scheduler);
        if let Some(pending) = self.info_swap.take() {
            scheduler.cancel(pending);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patch::last_text;

    fn globe() -> (TechGlobe, Scheduler<GlobeTask>) {
        let catalog = TechCatalog::builtin().unwrap();
        let mut scheduler: Scheduler<GlobeTask> = Scheduler::new();
        let mut globe = TechGlobe::new(catalog, &RotationSettings::default());
        globe.start(&mut scheduler);
        (globe, scheduler)
    }

    fn run(globe: &mut TechGlobe, scheduler: &mut Scheduler<GlobeTask>, until: f64) -> Patches {
        let mut out = Vec::new();
        while let Some(due) = scheduler.pop_due(until) {
            globe.handle(due.task, &mut out);
        }
        scheduler.settle(until);
        out
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = TechCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 71);
        assert_eq!(catalog.get("rust").unwrap().name, "Rust");
        assert!(catalog.get("swift").unwrap().description.starts_with("Apple's"));
        assert!(catalog.get("cobol").is_none());
    }

    #[test]
    fn test_bad_catalog_json() {
        assert!(matches!(
            TechCatalog::from_json("[{\"key\": 1}]"),
            Err(EffectError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_auto_rotation_accumulates() {
        let (mut globe, mut scheduler) = globe();
        let out = run(&mut globe, &mut scheduler, 50.0 * 20.0);

        assert_eq!(globe.rotation().y(), 10.0);
        assert_eq!(out.len(), 20);
        assert_eq!(
            out.last(),
            Some(&Patch::style(
                Target::Globe,
                "transform",
                "rotateX(10deg) rotateY(10deg)"
            ))
        );
    }

    #[test]
    fn test_drag_pauses_and_resumes_fresh() {
        let (mut globe, mut scheduler) = globe();
        let mut out = Vec::new();
        run(&mut globe, &mut scheduler, 120.0);
        assert_eq!(globe.rotation().y(), 1.0);

        globe.pointer_down(0.0, 0.0, &mut scheduler, &mut out);
        assert!(!globe.is_rotating());
        assert_eq!(scheduler.pending(), 0);

        globe.pointer_move(10.0, 0.0, &mut out);
        assert_eq!(globe.rotation().y(), 6.0);

        run(&mut globe, &mut scheduler, 500.0);
        assert_eq!(globe.rotation().y(), 6.0);

        globe.pointer_up(&mut scheduler, &mut out);
        assert!(globe.is_rotating());
        // Fresh timer: first tick one full period after the resume
        assert!(run(&mut globe, &mut scheduler, 549.0).is_empty());
        run(&mut globe, &mut scheduler, 550.0);
        assert_eq!(globe.rotation().y(), 6.5);
    }

    #[test]
    fn test_hover_shows_info_after_fade() {
        let (mut globe, mut scheduler) = globe();
        let mut out = Vec::new();

        globe.show_info("docker", &mut scheduler, &mut out);
        assert!(!globe.is_rotating());
        assert_eq!(last_text(&out, Target::TechName), None);

        let out = run(&mut globe, &mut scheduler, 149.0);
        assert!(out.is_empty());
        let out = run(&mut globe, &mut scheduler, 150.0);
        assert_eq!(last_text(&out, Target::TechName), Some("Docker"));
        assert!(out.contains(&Patch::style(Target::InfoPanel, "opacity", "1")));
    }

    #[test]
    fn test_leave_before_swap_keeps_idle_text() {
        let (mut globe, mut scheduler) = globe();
        let mut out = Vec::new();

        globe.show_info("redis", &mut scheduler, &mut out);
        globe.icon_leave(&mut scheduler, &mut out);
        assert_eq!(
            last_text(&out, Target::TechName),
            Some("Hover over a technology")
        );
        assert!(globe.is_rotating());

        let later = run(&mut globe, &mut scheduler, 1000.0);
        assert_eq!(last_text(&later, Target::TechName), None);
    }

    #[test]
    fn test_panel_leave_respects_hovered_icon() {
        let (mut globe, mut scheduler) = globe();
        let mut out = Vec::new();

        globe.show_info("kafka", &mut scheduler, &mut out);
        globe.panel_enter(&mut scheduler);
        globe.panel_leave(&mut scheduler);
        assert!(!globe.is_rotating());

        globe.icon_leave(&mut scheduler, &mut out);
        globe.panel_enter(&mut scheduler);
        assert!(!globe.is_rotating());
        globe.panel_leave(&mut scheduler);
        assert!(globe.is_rotating());
    }

    #[test]
    fn test_unknown_tech_only_pauses() {
        let (mut globe, mut scheduler) = globe();
        let mut out = Vec::new();

        globe.show_info("cobol", &mut scheduler, &mut out);
        assert!(out.is_empty());
        assert!(!globe.is_rotating());
    }

    #[test]
    fn test_repeated_resume_keeps_single_timer() {
        let (mut globe, mut scheduler) = globe();
        globe.resume(&mut scheduler);
        globe.resume(&mut scheduler);
        assert_eq!(scheduler.pending(), 1);

        globe.shutdown(&mut scheduler);
        assert_eq!(scheduler.pending(), 0);
    }
}
