//! DOM event wiring for one binding
//!
//! Every listener and observer registered here is owned by `Listeners`;
//! dropping it detaches them all, which is how a rebind starts clean.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, Node, TouchEvent,
};

use crate::core::Target;
use crate::core::reveal::VisibilitySignal;
use crate::ui::dom::{self, DomHandles};
use crate::ui::runtime::{self, dispatch, inspect, mark_scroll_dirty};

/// Steps count as on screen inside the middle 60% of the viewport
const STEP_ROOT_MARGIN: &str = "-20% 0px -20% 0px";
const STEP_THRESHOLDS: [f64; 6] = [0.0, 0.1, 0.3, 0.5, 0.7, 1.0];
/// Stats, sections and cards trigger just before they are fully on screen
const IN_VIEW_ROOT_MARGIN: &str = "0px 0px -50px 0px";
const IN_VIEW_THRESHOLDS: [f64; 1] = [0.1];

struct Handler {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Handler {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct Observer {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[derive(Default)]
pub struct Listeners {
    handlers: Vec<Handler>,
    observers: Vec<Observer>,
}

impl Listeners {
    fn on(&mut self, target: &EventTarget, event: &'static str, f: impl FnMut(Event) + 'static) {
        self.register(target, event, None, f);
    }

    /// Listen with an explicit `passive` flag. Document-level touch
    /// listeners default to passive and could not cancel scrolling.
    fn on_with(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        f: impl FnMut(Event) + 'static,
    ) {
        self.register(target, event, Some(passive), f);
    }

    fn register(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        passive: Option<bool>,
        f: impl FnMut(Event) + 'static,
    ) {
        let callback = Closure::<dyn FnMut(Event)>::new(f);
        let added = match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    event,
                    callback.as_ref().unchecked_ref(),
                    &options,
                )
            }
            None => target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()),
        };
        if added.is_ok() {
            self.handlers.push(Handler {
                target: target.clone(),
                event,
                callback,
            });
        }
    }

    fn observe(
        &mut self,
        elements: &[Element],
        root_margin: &str,
        thresholds: &[f64],
        mut on_entry: impl FnMut(&IntersectionObserverEntry) + 'static,
    ) {
        if elements.is_empty() {
            return;
        }
        let callback: ObserverCallback = Closure::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                        on_entry(&entry);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_root_margin(root_margin);
        let thresholds: js_sys::Array = thresholds.iter().map(|t| JsValue::from_f64(*t)).collect();
        options.set_threshold(&thresholds.into());

        let Ok(observer) =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
        else {
            return;
        };
        for element in elements {
            observer.observe(element);
        }
        self.observers.push(Observer {
            observer,
            _callback: callback,
        });
    }
}

fn mouse_position(event: &Event) -> Option<(f64, f64)> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some((f64::from(mouse.client_x()), f64::from(mouse.client_y())))
}

fn touch_position(event: &Event) -> Option<(f64, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

fn globe_dragging() -> bool {
    inspect(|page, _| page.globe().is_some_and(|globe| globe.rotation().is_dragging()))
        .unwrap_or(false)
}

/// Whether `event` started inside the bound element for `target`
fn inside(dom: &DomHandles, target: Target, event: &Event) -> bool {
    let Some(node) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
        return false;
    };
    dom.element(target)
        .is_some_and(|element| element.contains(Some(&node)))
}

/// Register every listener and observer the bound page needs
pub fn attach(dom: &DomHandles) -> Listeners {
    let mut listeners = Listeners::default();
    let window: &EventTarget = dom.window().as_ref();
    let document: &EventTarget = dom.document().as_ref();

    // Scroll and resize
    listeners.on_with(window, "scroll", true, |_| mark_scroll_dirty());
    listeners.on(window, "resize", |_| {
        dispatch(|page, dom| page.resize(dom::viewport_width(dom.window()), dom.matrix_width()));
        mark_scroll_dirty();
    });

    // Header controls
    if let Some(toggle) = dom.document().get_element_by_id("theme-toggle") {
        listeners.on(toggle.as_ref(), "click", |_| {
            runtime::feva_toggle_theme();
        });
    }
    if let Some(toggle) = dom.element(Target::MobileToggle) {
        listeners.on(toggle.as_ref(), "click", |_| {
            runtime::feva_toggle_mobile_menu();
        });
    }
    listeners.on(document, "click", |event| {
        dispatch(|page, dom| {
            let outside = !inside(dom, Target::MainNav, &event)
                && !inside(dom, Target::MobileToggle, &event);
            if outside && page.menu_open() {
                page.outside_click()
            } else {
                Vec::new()
            }
        });
    });
    if let Some(button) = dom.element(Target::BackToTop) {
        listeners.on(button.as_ref(), "click", |event| {
            event.prevent_default();
            dispatch(|page, _| vec![page.back_to_top()]);
        });
    }

    // Nav links scroll in-page and always close the mobile menu
    for (index, item) in dom.nav_items.iter().enumerate() {
        let Ok(Some(link)) = item.query_selector("a") else {
            continue;
        };
        let in_page = dom.section_offset(index).is_some();
        listeners.on(link.as_ref(), "click", move |event| {
            if in_page {
                event.prevent_default();
            }
            dispatch(|page, dom| {
                page.nav_link_clicked(index, dom.section_offset(index), dom.header_height())
            });
        });
    }

    // Testimonial dots
    for (index, dot) in dom.dots.iter().enumerate() {
        listeners.on(dot.as_ref(), "click", move |_| {
            dispatch(|page, _| page.show_testimonial(index));
        });
    }

    // Globe drag with mouse and touch
    if let Some(globe) = dom.element(Target::Globe) {
        listeners.on(globe.as_ref(), "mousedown", |event| {
            let Some((x, y)) = mouse_position(&event) else {
                return;
            };
            event.prevent_default();
            dispatch(|page, _| page.globe_pointer_down(x, y));
        });
        listeners.on(document, "mousemove", |event| {
            if let Some((x, y)) = mouse_position(&event) {
                dispatch(|page, _| page.globe_pointer_move(x, y));
            }
        });
        listeners.on(document, "mouseup", |_| {
            dispatch(|page, _| page.globe_pointer_up());
        });
        listeners.on_with(globe.as_ref(), "touchstart", false, |event| {
            let Some((x, y)) = touch_position(&event) else {
                return;
            };
            event.prevent_default();
            dispatch(|page, _| page.globe_pointer_down(x, y));
        });
        listeners.on_with(document, "touchmove", false, |event| {
            if !globe_dragging() {
                return;
            }
            event.prevent_default();
            if let Some((x, y)) = touch_position(&event) {
                dispatch(|page, _| page.globe_pointer_move(x, y));
            }
        });
        listeners.on(document, "touchend", |_| {
            dispatch(|page, _| page.globe_pointer_up());
        });
        listeners.on(globe.as_ref(), "contextmenu", |event| event.prevent_default());
    }

    // Technology info on hover or tap
    for (icon, key) in &dom.tech_icons {
        for event in ["mouseenter", "click"] {
            let key = key.clone();
            listeners.on(icon.as_ref(), event, move |_| {
                dispatch(|page, _| page.tech_icon_enter(&key));
            });
        }
        listeners.on(icon.as_ref(), "mouseleave", |_| {
            dispatch(|page, _| page.tech_icon_leave());
        });
    }
    if let Some(panel) = dom.element(Target::InfoPanel) {
        listeners.on(panel.as_ref(), "mouseenter", |_| {
            dispatch(|page, _| {
                page.info_panel_enter();
                Vec::new()
            });
        });
        listeners.on(panel.as_ref(), "mouseleave", |_| {
            dispatch(|page, _| {
                page.info_panel_leave();
                Vec::new()
            });
        });
    }

    // Roadmap steps report their visibility by data-step
    listeners.observe(&dom.steps, STEP_ROOT_MARGIN, &STEP_THRESHOLDS, |entry| {
        let signal = VisibilitySignal::new(entry.is_intersecting(), entry.intersection_ratio());
        let Some(number) = entry
            .target()
            .get_attribute("data-step")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
        else {
            return;
        };
        dispatch(|page, _| {
            match page.roadmap().and_then(|roadmap| roadmap.step_index(number)) {
                Some(index) => page.step_visibility(index, signal),
                None => Vec::new(),
            }
        });
    });

    // Service card hover
    for (index, card) in dom.service_cards.iter().enumerate() {
        for (event, entered) in [("mouseenter", true), ("mouseleave", false)] {
            listeners.on(card.as_ref(), event, move |_| {
                dispatch(|page, _| page.service_card_hover(index, entered));
            });
        }
    }

    // Sections and cards animate in
    let reveal = dom.reveal.clone();
    listeners.observe(&dom.reveal, IN_VIEW_ROOT_MARGIN, &IN_VIEW_THRESHOLDS, move |entry| {
        if !entry.is_intersecting() {
            return;
        }
        let target = entry.target();
        if let Some(index) = reveal.iter().position(|element| *element == target) {
            dispatch(|page, _| page.element_in_view(index));
        }
    });

    // Stats count up on first sight
    let stats = dom.stats.clone();
    listeners.observe(&dom.stats, IN_VIEW_ROOT_MARGIN, &IN_VIEW_THRESHOLDS, move |entry| {
        if !entry.is_intersecting() {
            return;
        }
        let target = entry.target();
        if let Some(index) = stats.iter().position(|stat| *stat == target) {
            dispatch(|page, _| {
                page.counter_in_view(index);
                Vec::new()
            });
        }
    });

    listeners
}
