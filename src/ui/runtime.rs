//! Browser runtime for the effects page
//!
//! Holds the one bound `EffectsPage` in a thread-local, drives it from a
//! `requestAnimationFrame` loop and exposes the imperative commands that
//! host scripts call (`feva_scroll_to_step`, `feva_scroll_to`,
//! `feva_toggle_theme`, ...).
//! When the host replaces page content it fires the configured rebind event;
//! the runtime then tears the page down and binds the new markup.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::logging::{log, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, Window};

use crate::core::error::EffectError;
use crate::core::globe::TechCatalog;
use crate::core::settings::SETTINGS_ELEMENT_ID;
use crate::core::{EffectSettings, EffectsPage, Patches};
use crate::ui::dom::{self, Binding, DomHandles};
use crate::ui::listeners::{self, Listeners};
use crate::ui::theme::LocalStorageStore;

pub(crate) type Page = EffectsPage<LocalStorageStore>;

pub(crate) struct Runtime {
    page: Page,
    dom: DomHandles,
    scroll_dirty: bool,
    /// Dropping these detaches every listener and observer of this binding
    _listeners: Listeners,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
    static BOOTED: Cell<bool> = const { Cell::new(false) };
}

/// Run `f` against the bound page. `None` before boot, and when called
/// re-entrantly from inside another runtime call.
fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

/// Run a page command and apply the patches it returns
pub(crate) fn dispatch(f: impl FnOnce(&mut Page, &DomHandles) -> Patches) {
    with_runtime(|runtime| {
        let out = f(&mut runtime.page, &runtime.dom);
        runtime.dom.apply_all(&out);
    });
}

/// Read-only query against the bound page
pub(crate) fn inspect<R>(f: impl FnOnce(&Page, &DomHandles) -> R) -> Option<R> {
    with_runtime(|runtime| f(&runtime.page, &runtime.dom))
}

/// Take a fresh scroll sample on the next frame
pub(crate) fn mark_scroll_dirty() {
    with_runtime(|runtime| runtime.scroll_dirty = true);
}

fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn read_settings(document: &Document) -> EffectSettings {
    let Some(raw) = document
        .get_element_by_id(SETTINGS_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return EffectSettings::default();
    };
    match EffectSettings::from_json(&raw) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("[effects] {e}, using defaults");
            EffectSettings::default()
        }
    }
}

/// Bind the document once. Later calls are ignored; content swaps go
/// through the rebind event instead.
pub fn boot() {
    if BOOTED.with(|booted| booted.replace(true)) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let settings = read_settings(&document);
    listen_for_rebind(&document, &settings);
    install(window.clone(), document, settings);
    start_frame_loop(&window);
}

fn install(window: Window, document: Document, settings: EffectSettings) {
    let Binding {
        handles: mut dom,
        markup,
        missing,
    } = DomHandles::bind(window.clone(), document);
    for error in &missing {
        warn!("[effects] {error}, effect disabled");
    }

    let catalog = if markup.has_globe {
        TechCatalog::builtin()
            .map_err(|e| warn!("[effects] {e}"))
            .ok()
    } else {
        None
    };
    let step_count = markup.steps.len();
    let layout = dom.start_layout();
    let mut page = EffectsPage::new(
        settings,
        markup,
        catalog,
        LocalStorageStore::new(),
        js_sys::Date::now() as u64,
        now_ms(&window),
    );

    let mut out = Vec::new();
    if let Err(e) = page.start(&layout, &mut out) {
        warn!("[effects] theme preference not saved: {e}");
    }
    dom.apply_all(&out);

    let listeners = listeners::attach(&dom);
    log!("[effects] bound page with {} roadmap steps", step_count);

    RUNTIME.with(|cell| {
        *cell.borrow_mut() = Some(Runtime {
            page,
            dom,
            scroll_dirty: true,
            _listeners: listeners,
        });
    });
}

/// Stop the current page, remove what it generated and bind again
fn rebind() {
    let Some(mut previous) = RUNTIME.with(|cell| cell.borrow_mut().take()) else {
        return;
    };
    let out = previous.page.teardown();
    previous.dom.apply_all(&out);

    let settings = previous.page.settings().clone();
    let window = previous.dom.window().clone();
    let document = previous.dom.document().clone();
    drop(previous);

    install(window, document, settings);
}

fn listen_for_rebind(document: &Document, settings: &EffectSettings) {
    let delay = settings.rebind_delay_ms;
    // Replacing the timeout cancels the previous one, so bursts rebind once
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let handler = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        *pending.borrow_mut() = Some(Timeout::new(delay, rebind));
    });
    let _ = document
        .add_event_listener_with_callback(&settings.rebind_event, handler.as_ref().unchecked_ref());

    // Lives as long as the document
    handler.forget();
}

fn frame(timestamp: f64) {
    with_runtime(|runtime| {
        let now = timestamp.max(runtime.page.scheduler().now());
        let sample = std::mem::take(&mut runtime.scroll_dirty).then(|| runtime.dom.sample());
        let out = runtime.page.frame(now, sample);
        runtime.dom.apply_all(&out);
    });
}

fn start_frame_loop(window: &Window) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = tick.clone();

    *tick.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        frame(timestamp);

        // Request next frame
        if let Some(window) = web_sys::window() {
            if let Some(closure) = next.borrow().as_ref() {
                let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
            }
        }
    }));

    if let Some(closure) = tick.borrow().as_ref() {
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

/// Smooth-scroll so roadmap step `step` (its `data-step`) sits mid-viewport.
/// Returns false when no such step is bound.
#[wasm_bindgen]
pub fn feva_scroll_to_step(step: u32) -> bool {
    with_runtime(|runtime| {
        let window = runtime.dom.window();
        let patch = runtime.page.scroll_to_step(
            step,
            dom::scroll_y(window),
            dom::viewport_height(window),
            |index| runtime.dom.steps.get(index).map(dom::rect_of),
        );
        match patch {
            Some(patch) => {
                runtime.dom.apply(&patch);
                true
            }
            None => false,
        }
    })
    .unwrap_or(false)
}

/// Hide every step, empty the progress line and allow reveals again
#[wasm_bindgen]
pub fn feva_reset_roadmap() {
    dispatch(|page, _| page.reset_roadmap());
}

/// Flip the theme and return the new one
#[wasm_bindgen]
pub fn feva_toggle_theme() -> Option<String> {
    with_runtime(|runtime| {
        let mut out = Vec::new();
        if let Err(e) = runtime.page.toggle_theme(&mut out) {
            warn!("[effects] theme preference not saved: {e}");
        }
        runtime.dom.apply_all(&out);
        runtime.page.theme().to_string()
    })
}

/// Switch to `"light"` or `"dark"`. Other names are rejected.
#[wasm_bindgen]
pub fn feva_set_theme(name: &str) -> bool {
    with_runtime(|runtime| {
        let mut out = Vec::new();
        let applied = match runtime.page.set_theme(name, &mut out) {
            Ok(_) => true,
            Err(EffectError::UnknownTheme(name)) => {
                warn!("[effects] unknown theme {name:?}");
                false
            }
            Err(e) => {
                warn!("[effects] theme preference not saved: {e}");
                true
            }
        };
        runtime.dom.apply_all(&out);
        applied
    })
    .unwrap_or(false)
}

/// Smooth-scroll the first element matching `selector` to just under the
/// header. Returns false when nothing matches.
#[wasm_bindgen]
pub fn feva_scroll_to(selector: &str) -> bool {
    with_runtime(|runtime| {
        let Some(top) = runtime
            .dom
            .document()
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| dom::offset_top(&element))
        else {
            return false;
        };
        let patch = runtime
            .page
            .scroll_to_element(top, runtime.dom.rendered_header_height());
        runtime.dom.apply(&patch);
        true
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn feva_scroll_to_top() {
    dispatch(|page, _| vec![page.back_to_top()]);
}

/// Mark the nav item linking to `#section_id` active, as when the host
/// navigates on its own. Returns false when no nav item links there.
#[wasm_bindgen]
pub fn feva_highlight_nav(section_id: &str) -> bool {
    with_runtime(|runtime| match runtime.page.highlight_nav(section_id) {
        Some(out) => {
            runtime.dom.apply_all(&out);
            true
        }
        None => false,
    })
    .unwrap_or(false)
}

/// Open or close the mobile menu; returns whether it is now open
#[wasm_bindgen]
pub fn feva_toggle_mobile_menu() -> bool {
    with_runtime(|runtime| {
        let out = runtime.page.toggle_menu();
        runtime.dom.apply_all(&out);
        runtime.page.menu_open()
    })
    .unwrap_or(false)
}
