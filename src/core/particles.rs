//! Hero particle field
//!
//! Each particle lives for its own random lifetime, then is removed and
//! replaced by a fresh one. Particles are not coordinated with each other;
//! the only cap is the count spawned at start.

use rand::Rng;

use super::patch::{Patch, Patches};
use super::scheduler::{Scheduler, TimerId};
use super::settings::ParticleSettings;

/// Everything the DOM needs to render one particle
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSpec {
    pub id: u64,
    pub size_px: f64,
    pub left_pct: f64,
    pub top_pct: f64,
    pub opacity: f64,
    pub lifetime_s: f64,
    pub drift_px: f64,
}

impl ParticleSpec {
    /// Inline style for the particle element
    pub fn css(&self) -> String {
        format!(
            "position: absolute; width: {size:.2}px; height: {size:.2}px; \
             background: rgba(5, 179, 5, {opacity:.3}); border-radius: 50%; \
             pointer-events: none; left: {left:.2}%; top: {top:.2}%; \
             --drift: {drift:.1}px; animation: particleFloat {life:.2}s linear forwards;",
            size = self.size_px,
            opacity = self.opacity,
            left = self.left_pct,
            top = self.top_pct,
            drift = self.drift_px,
            life = self.lifetime_s,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleTask {
    Expire(u64),
}

#[derive(Debug)]
pub struct ParticleField {
    live: Vec<(u64, TimerId)>,
    next_id: u64,
    settings: ParticleSettings,
}

impl ParticleField {
    pub fn new(settings: &ParticleSettings) -> Self {
        Self {
            live: Vec::new(),
            next_id: 0,
            settings: settings.clone(),
        }
    }

    /// Initial particle count for a viewport width
    pub fn count_for_width(&self, viewport_width: f64) -> usize {
        if viewport_width < self.settings.mobile_breakpoint {
            self.settings.mobile_count
        } else {
            self.settings.desktop_count
        }
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn populate<T, R>(
        &mut self,
        viewport_width: f64,
        rng: &mut R,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<ParticleTask> + Clone,
        R: Rng + ?Sized,
    {
        for _ in 0..self.count_for_width(viewport_width) {
            self.spawn(rng, scheduler, out);
        }
    }

    fn spawn<T, R>(&mut self, rng: &mut R, scheduler: &mut Scheduler<T>, out: &mut Patches)
    where
        T: From<ParticleTask> + Clone,
        R: Rng + ?Sized,
    {
        let s = &self.settings;
        let spec = ParticleSpec {
            id: self.next_id,
            size_px: rng.gen_range(s.min_size..=s.max_size),
            left_pct: rng.gen_range(0.0..100.0),
            top_pct: rng.gen_range(0.0..100.0),
            opacity: rng.gen_range(s.min_opacity..=s.max_opacity),
            lifetime_s: rng.gen_range(s.min_lifetime_s..=s.max_lifetime_s),
            drift_px: rng.gen_range(-s.max_drift_px..=s.max_drift_px),
        };
        self.next_id += 1;

        let timer = scheduler.after(spec.lifetime_s * 1000.0, ParticleTask::Expire(spec.id).into());
        self.live.push((spec.id, timer));
        out.push(Patch::SpawnParticle(spec));
    }

    pub fn handle<T, R>(
        &mut self,
        task: ParticleTask,
        rng: &mut R,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<ParticleTask> + Clone,
        R: Rng + ?Sized,
    {
        let ParticleTask::Expire(id) = task;
        let before = self.live.len();
        self.live.retain(|(live_id, _)| *live_id != id);
        if self.live.len() == before {
            return;
        }
        out.push(Patch::RemoveParticle(id));
        self.spawn(rng, scheduler, out);
    }

    /// Remove every particle and cancel their lifetimes
    pub fn clear<T: Clone>(&mut self, scheduler: &mut Scheduler<T>, out: &mut Patches) {
        for (id, timer) in self.live.drain(..) {
            scheduler.cancel(timer);
            out.push(Patch::RemoveParticle(id));
        }
    }
}
