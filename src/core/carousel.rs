//! Testimonial carousel with auto-advance and dot navigation

use super::patch::{Patch, Patches, Target};
use super::scheduler::{Scheduler, TimerId};
use super::settings::CarouselSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselTask {
    Advance,
}

#[derive(Clone, Debug)]
pub struct Carousel {
    cards: usize,
    dots: usize,
    current: usize,
    timer: Option<TimerId>,
    interval_ms: u32,
}

impl Carousel {
    /// `None` when there are no cards to rotate
    pub fn bind(cards: usize, dots: usize, settings: &CarouselSettings) -> Option<Self> {
        if cards == 0 {
            return None;
        }
        Some(Self {
            cards,
            dots,
            current: 0,
            timer: None,
            interval_ms: settings.interval_ms,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn start<T: From<CarouselTask> + Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        if self.timer.is_none() {
            self.timer =
                Some(scheduler.every(f64::from(self.interval_ms), CarouselTask::Advance.into()));
        }
    }

    pub fn stop<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
    }

    pub fn handle(&mut self, task: CarouselTask, out: &mut Patches) {
        match task {
            CarouselTask::Advance => self.show((self.current + 1) % self.cards, out),
        }
    }

    /// Make `index` the only active card and dot. Out-of-range indices
    /// clear everything but still become current.
    pub fn show(&mut self, index: usize, out: &mut Patches) {
        for i in 0..self.cards {
            out.push(Patch::class(Target::Testimonial(i), "active", i == index));
        }
        for i in 0..self.dots {
            out.push(Patch::class(Target::TestimonialDot(i), "active", i == index));
        }
        self.current = index;
    }
}
