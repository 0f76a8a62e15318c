//! Page chrome that follows the scroll position: sticky header, back-to-top
//! button, parallax layers, reading progress, mobile menu and scroll spy.

use super::patch::{Patch, Patches, Target};
use super::settings::ChromeSettings;
use super::viewport::{self, Rect, ScrollSample};

const ACTIVE: &str = "active";

/// Scroll-position driven decorations
#[derive(Clone, Debug)]
pub struct ScrollChrome {
    settings: ChromeSettings,
    floating_icons: usize,
    has_progress_bar: bool,
    last_scroll: Option<(f64, f64, f64)>,
}

impl ScrollChrome {
    pub fn new(settings: &ChromeSettings, floating_icons: usize, has_progress_bar: bool) -> Self {
        Self {
            settings: settings.clone(),
            floating_icons,
            has_progress_bar,
            last_scroll: None,
        }
    }

    /// Write header, button, parallax and progress state for `sample`.
    /// Nothing is written when the geometry has not changed since last time.
    pub fn on_scroll(&mut self, sample: &ScrollSample, out: &mut Patches) {
        let key = (sample.scroll_y, sample.viewport_height, sample.document_height);
        if self.last_scroll == Some(key) {
            return;
        }
        self.last_scroll = Some(key);

        let y = sample.scroll_y;
        let s = &self.settings;

        let scrolled = y > s.header_threshold;
        out.push(Patch::class(Target::Header, "scrolled", scrolled));
        out.push(Patch::style(
            Target::Header,
            "box-shadow",
            if scrolled { "0 4px 20px rgba(0, 0, 0, 0.1)" } else { "none" },
        ));

        out.push(Patch::class(
            Target::BackToTop,
            "visible",
            y > s.back_to_top_threshold,
        ));

        out.push(Patch::style(
            Target::HeroPattern,
            "transform",
            format!("translateY({}px)", y * s.hero_parallax_speed),
        ));
        for i in 0..self.floating_icons {
            let offset = y * (i as f64 + 1.0) * s.icon_parallax_step;
            out.push(Patch::style(
                Target::FloatingIcon(i),
                "transform",
                format!(
                    "translateY({offset}px) rotate({}deg)",
                    offset * s.icon_rotation_factor
                ),
            ));
        }

        if self.has_progress_bar {
            let percent =
                viewport::page_progress_percent(y, sample.document_height, sample.viewport_height);
            out.push(Patch::style(Target::ScrollProgress, "width", format!("{percent}%")));
        }
    }

    /// Smooth-scroll target for an in-page anchor
    pub fn anchor_target(&self, offset_top: f64, header_height: f64) -> Patch {
        Patch::ScrollTo {
            top: viewport::anchor_scroll_target(offset_top, header_height, self.settings.anchor_gap)
                .max(0.0),
        }
    }

    /// Bring an element's top just under the header. `header_height` is
    /// `None` when the page has no header.
    pub fn element_target(&self, offset_top: f64, header_height: Option<f64>) -> Patch {
        let header = header_height.unwrap_or(self.settings.fallback_header_height);
        Patch::ScrollTo {
            top: (offset_top - header).max(0.0),
        }
    }

    pub fn back_to_top(&self) -> Patch {
        Patch::ScrollTo { top: 0.0 }
    }

    /// Forget the last written geometry so the next sample is written in full
    pub fn invalidate(&mut self) {
        self.last_scroll = None;
    }
}

/// Hamburger menu for narrow screens
#[derive(Clone, Debug)]
pub struct MobileMenu {
    open: bool,
    breakpoint: f64,
}

impl MobileMenu {
    pub fn new(settings: &ChromeSettings) -> Self {
        Self {
            open: false,
            breakpoint: settings.menu_breakpoint,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self, out: &mut Patches) -> bool {
        self.open = !self.open;
        self.write(out);
        self.open
    }

    /// Close after a nav link or an outside click. No-op when already closed.
    pub fn close(&mut self, out: &mut Patches) {
        if self.open {
            self.open = false;
            self.write(out);
        }
    }

    pub fn on_resize(&mut self, viewport_width: f64, out: &mut Patches) {
        if viewport_width > self.breakpoint {
            self.close(out);
        }
    }

    fn write(&self, out: &mut Patches) {
        out.push(Patch::class(Target::MobileToggle, ACTIVE, self.open));
        out.push(Patch::class(Target::MainNav, "mobile-active", self.open));
        out.push(Patch::class(Target::Body, "nav-open", self.open));
    }
}

/// Highlights the nav item whose section sits under the spy line
#[derive(Clone, Debug)]
pub struct ScrollSpy {
    nav_items: usize,
    active: Option<usize>,
}

impl ScrollSpy {
    pub fn new(nav_items: usize) -> Self {
        Self {
            nav_items,
            active: None,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// `sections[i]` is the box of the section nav item `i` links to.
    /// When no section crosses the line the previous highlight stays.
    pub fn update(&mut self, sections: &[Option<Rect>], viewport_height: f64, out: &mut Patches) {
        let crossing = sections.iter().position(|rect| {
            rect.is_some_and(|rect| viewport::crosses_spy_line(rect, viewport_height))
        });
        if let Some(index) = crossing {
            self.activate(index, out);
        }
    }

    pub fn activate(&mut self, index: usize, out: &mut Patches) {
        if index >= self.nav_items || self.active == Some(index) {
            return;
        }
        for i in 0..self.nav_items {
            out.push(Patch::class(Target::NavItem(i), ACTIVE, i == index));
        }
        self.active = Some(index);
    }
}
