//! Mount point of the browser effects runtime

use leptos::prelude::*;

/// Binds the effects runtime once the page has hydrated. Renders nothing.
#[component]
pub fn PageEffects() -> impl IntoView {
    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        crate::ui::runtime::boot();
    });
}
