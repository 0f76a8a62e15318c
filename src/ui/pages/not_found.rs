//! Not found page component
//!
//! A 404 error page displayed when a route is not found.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

/// Not found (404) page component
#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <Title text="Page not found - Feva" />

        <div class="not-found">
            // Error code
            <h1>"404"</h1>

            <h2>"Page Not Found"</h2>
            <p>"The page you're looking for doesn't exist or has been moved."</p>

            <A href="/" attr:class="btn-cta">"Back to Feva"</A>
        </div>
    }
}
