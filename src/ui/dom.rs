//! Element handles for one bound document
//!
//! Binding runs every selector once and keeps the matches. After that the
//! effect machines only speak in `Target`s, and `DomHandles::apply` turns
//! each patch into a DOM write. Targets with no bound element are skipped.

use std::collections::HashMap;

use leptos::logging::warn;
use wasm_bindgen::JsCast;
use web_sys::{
    CssStyleDeclaration, Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions,
    SvgElement, Window,
};

use crate::core::cards::RevealKind;
use crate::core::error::EffectError;
use crate::core::matrix::{ColumnSpec, HIGHLIGHT_CLASS};
use crate::core::particles::ParticleSpec;
use crate::core::reveal::StepId;
use crate::core::roadmap::StepMarkup;
use crate::core::viewport::{Rect, ScrollSample};
use crate::core::{PageMarkup, Patch, StartLayout, Target};

/// Matched elements of the page, plus everything generated at runtime
pub struct DomHandles {
    window: Window,
    document: Document,
    fixed: HashMap<Target, Element>,
    particle_layer: Option<Element>,
    particles: HashMap<u64, Element>,
    matrix_layer: Option<Element>,
    matrix_cells: Vec<Vec<Element>>,
    /// Section linked from each nav item, in nav order
    sections: Vec<Option<Element>>,
    pub roadmap_container: Option<Element>,
    pub steps: Vec<Element>,
    pub nav_items: Vec<Element>,
    pub tech_icons: Vec<(Element, String)>,
    pub dots: Vec<Element>,
    pub stats: Vec<Element>,
    /// Sections and cards watched for scroll-in
    pub reveal: Vec<Element>,
    pub service_cards: Vec<Element>,
}

/// Result of binding a document
pub struct Binding {
    pub handles: DomHandles,
    pub markup: PageMarkup,
    /// Partial markup that disabled an effect
    pub missing: Vec<EffectError>,
}

fn query(root: &Document, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

fn query_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn text_of(element: &Element) -> String {
    element.text_content().unwrap_or_default()
}

/// Viewport box of `element`
pub fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.top(), rect.height())
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    element.dyn_ref::<SvgElement>().map(|svg| svg.style())
}

/// `offsetWidth`, or the client width for non-HTML elements
fn width_of(element: &Element) -> f64 {
    match element.dyn_ref::<HtmlElement>() {
        Some(html) => f64::from(html.offset_width()),
        None => f64::from(element.client_width()),
    }
}

pub fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

pub fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Everything that gets `in-view`, and the cards among them that slide in
const REVEAL_SELECTOR: &str =
    "section, .service-card, .solution-card, .portfolio-card, .team-card, .about-card";
const SLIDING_CARDS: [&str; 3] = ["service-card", "solution-card", "portfolio-card"];

fn reveal_kind(element: &Element) -> RevealKind {
    let classes = element.class_list();
    if SLIDING_CARDS.iter().any(|class| classes.contains(class)) {
        RevealKind::Card
    } else {
        RevealKind::Marker
    }
}

/// `offsetTop` of an HTML element
pub fn offset_top(element: &Element) -> Option<f64> {
    let html = element.dyn_ref::<HtmlElement>()?;
    Some(f64::from(html.offset_top()))
}

/// Id of the in-page section a nav item links to
fn anchor_id(nav_item: &Element) -> Option<String> {
    let link = query_in(nav_item, "a[href^=\"#\"]")?;
    let href = link.get_attribute("href")?;
    let id = href.strip_prefix('#')?;
    (!id.is_empty()).then(|| id.to_string())
}

impl DomHandles {
    /// Query every element the effects use
    pub fn bind(window: Window, document: Document) -> Binding {
        let mut fixed = HashMap::new();
        let mut missing = Vec::new();

        if let Some(root) = document.document_element() {
            fixed.insert(Target::Document, root);
        }
        if let Some(body) = document.body() {
            fixed.insert(Target::Body, body.into());
        }

        let singles = [
            (Target::Header, "#site-header"),
            (Target::BackToTop, "#back-to-top"),
            (Target::ScrollProgress, ".scroll-progress"),
            (Target::HeroPattern, ".hero-pattern"),
            (Target::MobileToggle, "#mobile-menu-toggle"),
            (Target::MainNav, "#main-nav"),
            (Target::ThemeLightIcon, ".light-icon"),
            (Target::ThemeDarkIcon, ".dark-icon"),
            (Target::Globe, "#techGlobe"),
            (Target::InfoPanel, "#techInfoPanel"),
            (Target::TechName, "#techName"),
            (Target::TechDescription, "#techDescription"),
        ];
        for (target, selector) in singles {
            if let Some(element) = query(&document, selector) {
                fixed.insert(target, element);
            }
        }

        let floating_icons = query_all(&document, ".floating-icon");
        for (i, icon) in floating_icons.iter().enumerate() {
            fixed.insert(Target::FloatingIcon(i), icon.clone());
        }

        let nav_items = query_all(&document, ".nav-item");
        let nav_anchors: Vec<Option<String>> = nav_items.iter().map(anchor_id).collect();
        let sections: Vec<Option<Element>> = nav_anchors
            .iter()
            .map(|id| id.as_deref().and_then(|id| document.get_element_by_id(id)))
            .collect();
        for (i, item) in nav_items.iter().enumerate() {
            fixed.insert(Target::NavItem(i), item.clone());
        }

        let testimonials = query_all(&document, ".testimonial-card");
        for (i, card) in testimonials.iter().enumerate() {
            fixed.insert(Target::Testimonial(i), card.clone());
        }
        let dots = query_all(&document, ".dot");
        for (i, dot) in dots.iter().enumerate() {
            fixed.insert(Target::TestimonialDot(i), dot.clone());
        }

        let stats = query_all(&document, ".stat-item .stat-number");
        let counters = stats.iter().map(text_of).collect();
        for (i, stat) in stats.iter().enumerate() {
            fixed.insert(Target::Counter(i), stat.clone());
        }

        let reveal = query_all(&document, REVEAL_SELECTOR);
        let reveal_kinds = reveal.iter().map(reveal_kind).collect();
        for (i, element) in reveal.iter().enumerate() {
            fixed.insert(Target::InView(i), element.clone());
        }
        let service_cards = query_all(&document, ".service-card");
        for (i, card) in service_cards.iter().enumerate() {
            if let Some(icon) = query_in(card, ".service-icon") {
                fixed.insert(Target::ServiceIcon(i), icon);
            }
            if let Some(image) = query_in(card, ".service-img") {
                fixed.insert(Target::ServiceImage(i), image);
            }
        }

        // Roadmap: container, line and at least one numbered step, or nothing
        let roadmap_container = query(&document, ".roadmap-container");
        let mut step_markup = Vec::new();
        let mut steps = Vec::new();
        if roadmap_container.is_some() {
            let line = query(&document, ".roadmap-line");
            let candidates = query_all(&document, ".roadmap-step[data-step]");
            match (line, candidates.is_empty()) {
                (Some(line), false) => {
                    fixed.insert(Target::RoadmapLine, line);
                    for step in candidates {
                        let Some(id) = step
                            .get_attribute("data-step")
                            .and_then(|raw| raw.trim().parse::<u32>().ok())
                        else {
                            warn!("[effects] skipping roadmap step with bad data-step");
                            continue;
                        };
                        let index = steps.len();
                        let title = query_in(&step, ".step-title");
                        let description = query_in(&step, ".step-description");
                        let pulse = query_in(&step, ".step-pulse");
                        step_markup.push(StepMarkup {
                            id: StepId(id),
                            title: title.as_ref().map(text_of),
                            description: description.as_ref().map(text_of),
                            has_pulse: pulse.is_some(),
                        });
                        if let Some(title) = title {
                            fixed.insert(Target::StepTitle(index), title);
                        }
                        if let Some(description) = description {
                            fixed.insert(Target::StepDescription(index), description);
                        }
                        if let Some(pulse) = pulse {
                            fixed.insert(Target::StepPulse(index), pulse);
                        }
                        fixed.insert(Target::Step(index), step.clone());
                        steps.push(step);
                    }
                }
                (None, _) => missing.push(EffectError::MissingElement {
                    selector: ".roadmap-line",
                }),
                (Some(_), true) => missing.push(EffectError::MissingElement {
                    selector: ".roadmap-step[data-step]",
                }),
            }
        }

        let has_globe = fixed.contains_key(&Target::Globe);
        if has_globe && !fixed.contains_key(&Target::InfoPanel) {
            missing.push(EffectError::MissingElement {
                selector: "#techInfoPanel",
            });
        }
        let tech_icons = if has_globe {
            query_all(&document, ".tech-icon[data-tech]")
                .into_iter()
                .filter_map(|icon| {
                    let key = icon.get_attribute("data-tech")?;
                    Some((icon, key))
                })
                .collect()
        } else {
            Vec::new()
        };

        let particle_layer = document.get_element_by_id("hero-particles");
        let matrix_layer = document.get_element_by_id("matrixRain");

        let markup = PageMarkup {
            steps: step_markup,
            has_globe,
            has_particles: particle_layer.is_some(),
            has_matrix: matrix_layer.is_some(),
            has_mobile_menu: fixed.contains_key(&Target::MobileToggle)
                && fixed.contains_key(&Target::MainNav),
            has_progress_bar: fixed.contains_key(&Target::ScrollProgress),
            floating_icons: floating_icons.len(),
            nav_items: nav_items.len(),
            nav_anchors,
            testimonials: testimonials.len(),
            testimonial_dots: dots.len(),
            counters,
            reveal: reveal_kinds,
            service_cards: service_cards.len(),
        };

        Binding {
            handles: Self {
                window,
                document,
                fixed,
                particle_layer,
                particles: HashMap::new(),
                matrix_layer,
                matrix_cells: Vec::new(),
                sections,
                roadmap_container,
                steps,
                nav_items,
                tech_icons,
                dots,
                stats,
                reveal,
                service_cards,
            },
            markup,
            missing,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn element(&self, target: Target) -> Option<&Element> {
        match target {
            Target::MatrixCell { column, row } => self.matrix_cells.get(column)?.get(row),
            Target::Particle(id) => self.particles.get(&id),
            other => self.fixed.get(&other),
        }
    }

    pub fn matrix_width(&self) -> f64 {
        self.matrix_layer.as_ref().map(width_of).unwrap_or(0.0)
    }

    /// Document offset of the section nav item `index` links to
    pub fn section_offset(&self, index: usize) -> Option<f64> {
        offset_top(self.sections.get(index)?.as_ref()?)
    }

    pub fn header_height(&self) -> f64 {
        self.rendered_header_height().unwrap_or(0.0)
    }

    /// Header height, `None` when there is no header or it is not laid out
    pub fn rendered_header_height(&self) -> Option<f64> {
        let header = self.fixed.get(&Target::Header)?.dyn_ref::<HtmlElement>()?;
        let height = f64::from(header.offset_height());
        (height > 0.0).then_some(height)
    }

    pub fn start_layout(&self) -> StartLayout {
        StartLayout {
            viewport_width: viewport_width(&self.window),
            viewport_height: viewport_height(&self.window),
            matrix_width: self.matrix_width(),
            step_rects: self.steps.iter().map(rect_of).collect(),
        }
    }

    /// Scroll position and the boxes scroll effects depend on
    pub fn sample(&self) -> ScrollSample {
        ScrollSample {
            scroll_y: scroll_y(&self.window),
            viewport_height: viewport_height(&self.window),
            document_height: self
                .document
                .document_element()
                .map(|root| f64::from(root.scroll_height()))
                .unwrap_or(0.0),
            roadmap: self.roadmap_container.as_ref().map(rect_of),
            sections: self
                .sections
                .iter()
                .map(|section| section.as_ref().map(rect_of))
                .collect(),
        }
    }

    pub fn apply_all(&mut self, patches: &[Patch]) {
        for patch in patches {
            self.apply(patch);
        }
    }

    pub fn apply(&mut self, patch: &Patch) {
        match patch {
            Patch::Class {
                target,
                class,
                enabled,
            } => {
                if let Some(element) = self.element(*target) {
                    let list = element.class_list();
                    let _ = if *enabled {
                        list.add_1(class)
                    } else {
                        list.remove_1(class)
                    };
                }
            }
            Patch::Text { target, text } => {
                if let Some(element) = self.element(*target) {
                    element.set_text_content(Some(text.as_str()));
                }
            }
            Patch::Style {
                target,
                property,
                value,
            } => {
                if let Some(style) = self.element(*target).and_then(style_of) {
                    let _ = style.set_property(property, value);
                }
            }
            Patch::Attribute {
                target,
                name,
                value,
            } => {
                if let Some(element) = self.element(*target) {
                    let _ = element.set_attribute(name, value);
                }
            }
            Patch::RestartAnimation { target, animation } => {
                let Some(element) = self.element(*target) else {
                    return;
                };
                if let Some(style) = style_of(element) {
                    let _ = style.set_property("animation", "none");
                    // Reading layout flushes the reset before the new animation
                    let _ = element.get_bounding_client_rect();
                    let _ = style.set_property("animation", animation);
                }
            }
            Patch::SpawnParticle(spec) => self.spawn_particle(spec),
            Patch::RemoveParticle(id) => {
                if let Some(element) = self.particles.remove(id) {
                    element.remove();
                }
            }
            Patch::SpawnMatrixColumn(spec) => self.spawn_column(spec),
            Patch::ClearMatrix => {
                if let Some(layer) = &self.matrix_layer {
                    layer.set_inner_html("");
                }
                self.matrix_cells.clear();
            }
            Patch::ScrollTo { top } => {
                let options = ScrollToOptions::new();
                options.set_top(*top);
                options.set_behavior(ScrollBehavior::Smooth);
                self.window.scroll_to_with_scroll_to_options(&options);
            }
        }
    }

    fn spawn_particle(&mut self, spec: &ParticleSpec) {
        let Some(layer) = &self.particle_layer else {
            return;
        };
        let Ok(particle) = self.document.create_element("div") else {
            return;
        };
        particle.set_class_name("particle");
        let _ = particle.set_attribute("style", &spec.css());
        if layer.append_child(&particle).is_ok() {
            self.particles.insert(spec.id, particle);
        }
    }

    fn spawn_column(&mut self, spec: &ColumnSpec) {
        let Some(layer) = &self.matrix_layer else {
            return;
        };
        let Ok(column) = self.document.create_element("div") else {
            return;
        };
        column.set_class_name("matrix-column");
        if let Some(style) = style_of(&column) {
            let _ = style.set_property("left", &format!("{}px", spec.left_px));
            let _ = style.set_property("animation-delay", &format!("{:.3}s", spec.delay_s));
            let _ = style.set_property("animation-duration", &format!("{:.3}s", spec.duration_s));
        }

        let mut cells = Vec::with_capacity(spec.cells.len());
        for &(ch, highlight) in &spec.cells {
            let Ok(cell) = self.document.create_element("span") else {
                continue;
            };
            cell.set_class_name("matrix-character");
            if highlight {
                let _ = cell.class_list().add_1(HIGHLIGHT_CLASS);
            }
            cell.set_text_content(Some(ch.to_string().as_str()));
            let _ = column.append_child(&cell);
            cells.push(cell);
        }
        if layer.append_child(&column).is_err() {
            return;
        }

        // Columns arrive in index order; pad in case one was skipped
        if self.matrix_cells.len() <= spec.index {
            self.matrix_cells.resize_with(spec.index + 1, Vec::new);
        }
        self.matrix_cells[spec.index] = cells;
    }
}
