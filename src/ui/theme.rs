//! Theme toggle markup and browser preference storage
//!
//! Provides:
//! - `ThemeToggle`, the header button the runtime binds to
//! - `LocalStorageStore`, the `PreferenceStore` backed by `window.localStorage`

use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use crate::core::error::{EffectError, EffectResult};
#[cfg(feature = "hydrate")]
use crate::core::theme::PreferenceStore;

/// Preference storage in `localStorage`. Private browsing modes may refuse
/// access, in which case every call reports `EffectError::Storage`.
#[cfg(feature = "hydrate")]
pub struct LocalStorageStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(feature = "hydrate")]
impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        Self { storage }
    }

    fn storage(&self) -> EffectResult<&web_sys::Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| EffectError::Storage("localStorage is not available".to_string()))
    }
}

#[cfg(feature = "hydrate")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "hydrate")]
impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> EffectResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| EffectError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> EffectResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| EffectError::Storage(format!("{e:?}")))
    }
}

/// Light/dark switch. Icon opacity is owned by the effects runtime.
#[component]
pub fn ThemeToggle() -> impl IntoView {
    view! {
        <button id="theme-toggle" class="theme-toggle" type="button" aria-label="Toggle color theme">
            <span class="light-icon" aria-hidden="true">
                <svg viewBox="0 0 24 24" width="20" height="20" fill="none" stroke="currentColor" stroke-width="2">
                    <circle cx="12" cy="12" r="5"/>
                    <path d="M12 1v2M12 21v2M4.22 4.22l1.42 1.42M18.36 18.36l1.42 1.42M1 12h2M21 12h2M4.22 19.78l1.42-1.42M18.36 5.64l1.42-1.42"/>
                </svg>
            </span>
            <span class="dark-icon" aria-hidden="true">
                <svg viewBox="0 0 24 24" width="20" height="20" fill="none" stroke="currentColor" stroke-width="2">
                    <path d="M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z"/>
                </svg>
            </span>
        </button>
    }
}
