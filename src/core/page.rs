//! One page worth of effects
//!
//! `EffectsPage` is constructed once per bound document and owns every
//! piece of effect state: settings, the shared scheduler, the random source
//! and one controller per effect. A controller that is `None` was disabled
//! because its markup is missing from the page.

use derive_more::From;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::cards::{self, CardTask, RevealKind, ScrollReveal};
use super::carousel::{Carousel, CarouselTask};
use super::chrome::{MobileMenu, ScrollChrome, ScrollSpy};
use super::counter::{CounterTask, Counters};
use super::error::{EffectError, EffectResult};
use super::globe::{GlobeTask, TechCatalog, TechGlobe};
use super::matrix::{MatrixRain, MatrixTask};
use super::particles::{ParticleField, ParticleTask};
use super::patch::{Patch, Patches};
use super::reveal::VisibilitySignal;
use super::roadmap::{Roadmap, RoadmapTask, StepMarkup};
use super::scheduler::{Millis, Scheduler};
use super::settings::EffectSettings;
use super::theme::{PreferenceStore, Theme, ThemePreference, ThemeTask};
use super::viewport::{self, Rect, ScrollSample};

/// Frames further apart than this mean the page was hidden; timers resume
/// where they stopped instead of replaying the gap.
pub const MAX_FRAME_GAP_MS: Millis = 1_000.0;

/// Every kind of scheduled work on the page
#[derive(Clone, Debug, PartialEq, From)]
pub enum Task {
    Roadmap(RoadmapTask),
    Globe(GlobeTask),
    Particles(ParticleTask),
    Matrix(MatrixTask),
    Theme(ThemeTask),
    Carousel(CarouselTask),
    Counter(CounterTask),
    Cards(CardTask),
}

/// What the bound document offers. Counts are of matched elements.
#[derive(Clone, Debug, Default)]
pub struct PageMarkup {
    pub steps: Vec<StepMarkup>,
    pub has_globe: bool,
    pub has_particles: bool,
    pub has_matrix: bool,
    pub has_mobile_menu: bool,
    pub has_progress_bar: bool,
    pub floating_icons: usize,
    pub nav_items: usize,
    /// Section id each nav item links to, in nav order
    pub nav_anchors: Vec<Option<String>>,
    pub testimonials: usize,
    pub testimonial_dots: usize,
    /// Text content of each stat number
    pub counters: Vec<String>,
    /// Sections and cards watched for scroll-in, in observation order
    pub reveal: Vec<RevealKind>,
    pub service_cards: usize,
}

/// Geometry read once when the page starts
#[derive(Clone, Debug, Default)]
pub struct StartLayout {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub matrix_width: f64,
    /// Viewport boxes of the roadmap steps, in step order
    pub step_rects: Vec<Rect>,
}

pub struct EffectsPage<S: PreferenceStore> {
    settings: EffectSettings,
    scheduler: Scheduler<Task>,
    rng: SmallRng,
    roadmap: Option<Roadmap>,
    globe: Option<TechGlobe>,
    particles: Option<ParticleField>,
    matrix: Option<MatrixRain>,
    theme: ThemePreference<S>,
    chrome: ScrollChrome,
    menu: Option<MobileMenu>,
    spy: ScrollSpy,
    carousel: Option<Carousel>,
    counters: Counters,
    reveal: ScrollReveal,
    service_cards: usize,
    nav_anchors: Vec<Option<String>>,
    last_sample: Option<ScrollSample>,
}

impl<S: PreferenceStore> EffectsPage<S> {
    /// Build controllers for whatever `markup` provides. `catalog` is only
    /// used when the page has a globe.
    pub fn new(
        settings: EffectSettings,
        markup: PageMarkup,
        catalog: Option<TechCatalog>,
        store: S,
        seed: u64,
        now: Millis,
    ) -> Self {
        let globe = match (markup.has_globe, catalog) {
            (true, Some(catalog)) => Some(TechGlobe::new(catalog, &settings.rotation)),
            _ => None,
        };

        Self {
            scheduler: Scheduler::starting_at(now),
            rng: SmallRng::seed_from_u64(seed),
            roadmap: Roadmap::bind(markup.steps, &settings.roadmap),
            globe,
            particles: markup
                .has_particles
                .then(|| ParticleField::new(&settings.particles)),
            matrix: markup.has_matrix.then(|| MatrixRain::new(&settings.matrix)),
            theme: ThemePreference::new(store, &settings.theme),
            chrome: ScrollChrome::new(
                &settings.chrome,
                markup.floating_icons,
                markup.has_progress_bar,
            ),
            menu: markup
                .has_mobile_menu
                .then(|| MobileMenu::new(&settings.chrome)),
            spy: ScrollSpy::new(markup.nav_items),
            carousel: Carousel::bind(
                markup.testimonials,
                markup.testimonial_dots,
                &settings.carousel,
            ),
            counters: Counters::bind(&markup.counters, &settings.counter),
            reveal: ScrollReveal::new(markup.reveal, &settings.cards),
            service_cards: markup.service_cards,
            nav_anchors: markup.nav_anchors,
            last_sample: None,
            settings,
        }
    }

    pub fn settings(&self) -> &EffectSettings {
        &self.settings
    }

    pub fn scheduler(&self) -> &Scheduler<Task> {
        &self.scheduler
    }

    pub fn roadmap(&self) -> Option<&Roadmap> {
        self.roadmap.as_ref()
    }

    pub fn globe(&self) -> Option<&TechGlobe> {
        self.globe.as_ref()
    }

    /// Most recent scroll sample handed to `frame`
    pub fn last_sample(&self) -> Option<&ScrollSample> {
        self.last_sample.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn theme_store(&self) -> &S {
        self.theme.store()
    }

    pub fn menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(MobileMenu::is_open)
    }

    pub fn active_testimonial(&self) -> Option<usize> {
        self.carousel.as_ref().map(Carousel::current)
    }

    /// Kick off every enabled effect. All patches are written to `out`
    /// before the theme is loaded, so a storage error only affects the theme.
    pub fn start(&mut self, layout: &StartLayout, out: &mut Patches) -> EffectResult<Theme> {
        if let Some(roadmap) = self.roadmap.as_mut() {
            roadmap.prepare(out);
            roadmap.initial_check(
                &layout.step_rects,
                layout.viewport_height,
                &mut self.scheduler,
                out,
            );
            roadmap.render_line(self.scheduler.now(), out);
        }
        if let Some(globe) = self.globe.as_mut() {
            globe.start(&mut self.scheduler);
        }
        if let Some(particles) = self.particles.as_mut() {
            particles.populate(layout.viewport_width, &mut self.rng, &mut self.scheduler, out);
        }
        if let Some(matrix) = self.matrix.as_mut() {
            matrix.start(layout.matrix_width, &mut self.rng, &mut self.scheduler, out);
        }
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.show(0, out);
            carousel.start(&mut self.scheduler);
        }
        self.theme.load(&mut self.scheduler, out)
    }

    /// One animation frame: scroll state first, then due timers, then the
    /// progress line at `now`.
    pub fn frame(&mut self, now: Millis, sample: Option<ScrollSample>) -> Patches {
        let mut out = Vec::new();

        if now - self.scheduler.now() > MAX_FRAME_GAP_MS {
            self.scheduler.skip_to(now);
        }

        if let Some(sample) = sample {
            self.apply_sample(&sample, now, &mut out);
            self.last_sample = Some(sample);
        }

        while let Some(due) = self.scheduler.pop_due(now) {
            self.dispatch(due.task, &mut out);
        }
        self.scheduler.settle(now);

        if let Some(roadmap) = self.roadmap.as_mut() {
            roadmap.render_line(now, &mut out);
        }
        out
    }

    fn apply_sample(&mut self, sample: &ScrollSample, now: Millis, out: &mut Patches) {
        self.chrome.on_scroll(sample, out);
        self.spy.update(&sample.sections, sample.viewport_height, out);
        if let (Some(roadmap), Some(container)) = (self.roadmap.as_mut(), sample.roadmap) {
            roadmap.on_scroll(container, sample.viewport_height, now, &mut self.scheduler, out);
        }
    }

    fn dispatch(&mut self, task: Task, out: &mut Patches) {
        match task {
            Task::Roadmap(task) => {
                if let Some(roadmap) = self.roadmap.as_mut() {
                    roadmap.handle(task, &mut self.scheduler, out);
                }
            }
            Task::Globe(task) => {
                if let Some(globe) = self.globe.as_mut() {
                    globe.handle(task, out);
                }
            }
            Task::Particles(task) => {
                if let Some(particles) = self.particles.as_mut() {
                    particles.handle(task, &mut self.rng, &mut self.scheduler, out);
                }
            }
            Task::Matrix(task) => {
                if let Some(matrix) = self.matrix.as_mut() {
                    matrix.handle(task, &mut self.rng, &mut self.scheduler, out);
                }
            }
            Task::Theme(task) => self.theme.handle(task, out),
            Task::Carousel(task) => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.handle(task, out);
                }
            }
            Task::Counter(task) => self.counters.handle(task, &mut self.scheduler, out),
            Task::Cards(task) => self.reveal.handle(task, out),
        }
    }

    /// Intersection change for roadmap step `index`
    pub fn step_visibility(&mut self, index: usize, signal: VisibilitySignal) -> Patches {
        let mut out = Vec::new();
        if let Some(roadmap) = self.roadmap.as_mut() {
            roadmap.observe(index, signal, &mut self.scheduler, &mut out);
        }
        out
    }

    /// A stat entered the viewport
    pub fn counter_in_view(&mut self, index: usize) -> bool {
        self.counters.trigger(index, &mut self.scheduler)
    }

    /// Section or card `index` intersects the viewport
    pub fn element_in_view(&mut self, index: usize) -> Patches {
        let mut out = Vec::new();
        self.reveal.in_view(index, &mut self.scheduler, &mut out);
        out
    }

    pub fn service_card_hover(&self, index: usize, entered: bool) -> Patches {
        let mut out = Vec::new();
        if index < self.service_cards {
            cards::service_card_hover(index, entered, &mut out);
        }
        out
    }

    /// Scroll an element with document offset `offset_top` to just under
    /// the header
    pub fn scroll_to_element(&self, offset_top: f64, header_height: Option<f64>) -> Patch {
        self.chrome.element_target(offset_top, header_height)
    }

    /// Mark the nav item linking to `#section_id` active. Returns `None`
    /// when no nav item links there.
    pub fn highlight_nav(&mut self, section_id: &str) -> Option<Patches> {
        let index = self
            .nav_anchors
            .iter()
            .position(|anchor| anchor.as_deref() == Some(section_id))?;
        let mut out = Vec::new();
        self.spy.activate(index, &mut out);
        Some(out)
    }

    /// Centre the step carrying `data-step="number"`. `locate` returns the
    /// step's current viewport box. Unknown steps scroll nowhere.
    pub fn scroll_to_step(
        &self,
        number: u32,
        scroll_y: f64,
        viewport_height: f64,
        locate: impl FnOnce(usize) -> Option<Rect>,
    ) -> Option<Patch> {
        let index = self.roadmap.as_ref()?.step_index(number)?;
        let rect = locate(index)?;
        Some(Patch::ScrollTo {
            top: viewport::centered_scroll_target(scroll_y, rect.top, viewport_height).max(0.0),
        })
    }

    pub fn reset_roadmap(&mut self) -> Patches {
        let mut out = Vec::new();
        if let Some(roadmap) = self.roadmap.as_mut() {
            roadmap.reset(&mut self.scheduler, &mut out);
        }
        out
    }

    pub fn toggle_theme(&mut self, out: &mut Patches) -> EffectResult<Theme> {
        self.theme.toggle(&mut self.scheduler, out)
    }

    pub fn set_theme(&mut self, name: &str, out: &mut Patches) -> EffectResult<Theme> {
        let theme = Theme::parse(name).ok_or_else(|| EffectError::UnknownTheme(name.to_string()))?;
        self.theme.set(theme, &mut self.scheduler, out)?;
        Ok(theme)
    }

    pub fn toggle_menu(&mut self) -> Patches {
        let mut out = Vec::new();
        if let Some(menu) = self.menu.as_mut() {
            menu.toggle(&mut out);
        }
        out
    }

    /// Click anywhere outside the menu and its toggle
    pub fn outside_click(&mut self) -> Patches {
        let mut out = Vec::new();
        if let Some(menu) = self.menu.as_mut() {
            menu.close(&mut out);
        }
        out
    }

    /// Nav link `index` was clicked. `anchor_top` is the document offset of
    /// the section it links to, when it links inside the page.
    pub fn nav_link_clicked(
        &mut self,
        index: usize,
        anchor_top: Option<f64>,
        header_height: f64,
    ) -> Patches {
        let mut out = Vec::new();
        if let Some(menu) = self.menu.as_mut() {
            menu.close(&mut out);
        }
        if let Some(top) = anchor_top {
            out.push(self.chrome.anchor_target(top, header_height));
            self.spy.activate(index, &mut out);
        }
        out
    }

    pub fn back_to_top(&self) -> Patch {
        self.chrome.back_to_top()
    }

    pub fn show_testimonial(&mut self, index: usize) -> Patches {
        let mut out = Vec::new();
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.show(index, &mut out);
        }
        out
    }

    pub fn globe_pointer_down(&mut self, x: f64, y: f64) -> Patches {
        let mut out = Vec::new();
        if let Some(globe) = self.globe.as_mut() {
            globe.pointer_down(x, y, &mut self.scheduler, &mut out);
        }
        out
    }

    pub fn globe_pointer_move(&mut self, x: f64, y: f64) -> Patches {
        let mut out = Vec::new();
        if let Some(globe) = self.globe.as_mut() {
            globe.pointer_move(x, y, &mut out);
        }
        out
    }

    pub fn globe_pointer_up(&mut self) -> Patches {
        let mut out = Vec::new();
        if let Some(globe) = self.globe.as_mut() {
            globe.pointer_up(&mut self.scheduler, &mut out);
        }
        out
    }

    pub fn tech_icon_enter(&mut self, key: &str) -> Patches {
        let mut out = Vec::new();
        if let Some(globe) = self.globe.as_mut() {
            globe.show_info(key, &mut self.scheduler, &mut out);
        }
        out
    }

    pub fn tech_icon_leave(&mut self) -> Patches {
        let mut out = Vec::new();
        if let Some(globe) = self.globe.as_mut() {
            globe.icon_leave(&mut self.scheduler, &mut out);
        }
        out
    }

    pub fn info_panel_enter(&mut self) {
        if let Some(globe) = self.globe.as_mut() {
            globe.panel_enter(&mut self.scheduler);
        }
    }

    pub fn info_panel_leave(&mut self) {
        if let Some(globe) = self.globe.as_mut() {
            globe.panel_leave(&mut self.scheduler);
        }
    }

    /// Window resized: close the menu on wide screens, rebuild the rain,
    /// and rewrite scroll chrome on the next frame.
    pub fn resize(&mut self, viewport_width: f64, matrix_width: f64) -> Patches {
        let mut out = Vec::new();
        if let Some(menu) = self.menu.as_mut() {
            menu.on_resize(viewport_width, &mut out);
        }
        if let Some(matrix) = self.matrix.as_mut() {
            matrix.resize(matrix_width, &mut self.scheduler, &mut out);
        }
        self.chrome.invalidate();
        out
    }

    /// Stop everything and remove generated elements, ahead of a re-bind
    pub fn teardown(&mut self) -> Patches {
        let mut out = Vec::new();
        if let Some(particles) = self.particles.as_mut() {
            particles.clear(&mut self.scheduler, &mut out);
        }
        if let Some(matrix) = self.matrix.as_mut() {
            matrix.destroy(&mut self.scheduler, &mut out);
        }
        if let Some(globe) = self.globe.as_mut() {
            globe.shutdown(&mut self.scheduler);
        }
        self.counters.stop(&mut self.scheduler);
        self.scheduler.clear();
        out
    }
}
