//! Light/dark theme preference
//!
//! The only state that survives a reload. Storage is abstracted behind
//! `PreferenceStore` so the browser uses localStorage and tests use memory.

use std::collections::HashMap;

use derive_more::Display;

use super::error::EffectResult;
use super::patch::{Patch, Patches, Target};
use super::scheduler::{Scheduler, TimerId};
use super::settings::ThemeSettings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
pub enum Theme {
    #[default]
    #[display("light")]
    Light,
    #[display("dark")]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored or user-supplied name. Unknown names are rejected.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Key-value storage for user preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> EffectResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> EffectResult<()>;
}

/// In-memory store, used before the browser store is available and in tests
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> EffectResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> EffectResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeTask {
    /// Drop the temporary body colour transition
    EndTransition,
}

const BODY_TRANSITION: &str = "background-color 0.3s ease, color 0.3s ease";

pub struct ThemePreference<S: PreferenceStore> {
    store: S,
    current: Theme,
    transition: Option<TimerId>,
    settings: ThemeSettings,
}

impl<S: PreferenceStore> ThemePreference<S> {
    pub fn new(store: S, settings: &ThemeSettings) -> Self {
        Self {
            store,
            current: Theme::default(),
            transition: None,
            settings: settings.clone(),
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the saved theme (light when absent or unreadable) and apply it
    pub fn load<T: From<ThemeTask> + Clone>(
        &mut self,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) -> EffectResult<Theme> {
        let saved = self
            .store
            .get(&self.settings.storage_key)
            .ok()
            .flatten()
            .and_then(|value| Theme::parse(&value))
            .unwrap_or_default();
        self.set(saved, scheduler, out)?;
        Ok(saved)
    }

    /// Apply `theme` and persist it. The DOM patches are emitted even when
    /// persisting fails, so the page still switches.
    pub fn set<T: From<ThemeTask> + Clone>(
        &mut self,
        theme: Theme,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) -> EffectResult<()> {
        self.current = theme;
        self.apply(scheduler, out);
        self.store.set(&self.settings.storage_key, theme.as_str())
    }

    pub fn toggle<T: From<ThemeTask> + Clone>(
        &mut self,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) -> EffectResult<Theme> {
        let next = self.current.toggled();
        self.set(next, scheduler, out)?;
        Ok(next)
    }

    fn apply<T: From<ThemeTask> + Clone>(&mut self, scheduler: &mut Scheduler<T>, out: &mut Patches) {
        let dark = self.current == Theme::Dark;
        out.push(Patch::Attribute {
            target: Target::Document,
            name: "data-theme",
            value: self.current.to_string(),
        });
        out.push(Patch::style(Target::ThemeLightIcon, "opacity", if dark { "0" } else { "1" }));
        out.push(Patch::style(Target::ThemeDarkIcon, "opacity", if dark { "1" } else { "0" }));
        out.push(Patch::style(Target::Body, "transition", BODY_TRANSITION));

        if let Some(id) = self.transition.take() {
            scheduler.cancel(id);
        }
        self.transition = Some(scheduler.after(
            f64::from(self.settings.transition_ms),
            ThemeTask::EndTransition.into(),
        ));
    }

    pub fn handle(&mut self, task: ThemeTask, out: &mut Patches) {
        match task {
            ThemeTask::EndTransition => {
                self.transition = None;
                out.push(Patch::style(Target::Body, "transition", ""));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EffectError;

    fn preference() -> ThemePreference<MemoryStore> {
        ThemePreference::new(MemoryStore::default(), &ThemeSettings::default())
    }

    fn stored(pref: &ThemePreference<MemoryStore>) -> Option<String> {
        pref.store().get("feva-theme").unwrap()
    }

    #[test]
    fn test_default_is_light() {
        let mut pref = preference();
        let mut scheduler: Scheduler<ThemeTask> = Scheduler::new();
        let mut out = Vec::new();

        assert_eq!(pref.load(&mut scheduler, &mut out).unwrap(), Theme::Light);
        assert_eq!(stored(&pref).as_deref(), Some("light"));
        assert!(out.contains(&Patch::Attribute {
            target: Target::Document,
            name: "data-theme",
            value: "light".to_string(),
        }));
    }

    #[test]
    fn test_load_restores_saved_theme() {
        let mut store = MemoryStore::default();
        store.set("feva-theme", "dark").unwrap();
        let mut pref = ThemePreference::new(store, &ThemeSettings::default());
        let mut scheduler: Scheduler<ThemeTask> = Scheduler::new();
        let mut out = Vec::new();

        assert_eq!(pref.load(&mut scheduler, &mut out).unwrap(), Theme::Dark);
        assert!(out.contains(&Patch::style(Target::ThemeDarkIcon, "opacity", "1")));
        assert!(out.contains(&Patch::style(Target::ThemeLightIcon, "opacity", "0")));
    }

    #[test]
    fn test_garbage_in_storage_falls_back_to_light() {
        let mut store = MemoryStore::default();
        store.set("feva-theme", "sepia").unwrap();
        let mut pref = ThemePreference::new(store, &ThemeSettings::default());
        let mut scheduler: Scheduler<ThemeTask> = Scheduler::new();

        assert_eq!(pref.load(&mut scheduler, &mut Vec::new()).unwrap(), Theme::Light);
        assert_eq!(stored(&pref).as_deref(), Some("light"));
    }

    #[test]
    fn test_toggle_twice_restores_preference() {
        let mut pref = preference();
        let mut scheduler: Scheduler<ThemeTask> = Scheduler::new();
        let mut out = Vec::new();
        pref.load(&mut scheduler, &mut out).unwrap();

        assert_eq!(pref.toggle(&mut scheduler, &mut out).unwrap(), Theme::Dark);
        assert_eq!(stored(&pref).as_deref(), Some("dark"));
        assert_eq!(pref.toggle(&mut scheduler, &mut out).unwrap(), Theme::Light);
        assert_eq!(stored(&pref).as_deref(), Some("light"));
    }

    #[test]
    fn test_body_transition_cleared_once() {
        let mut pref = preference();
        let mut scheduler: Scheduler<ThemeTask> = Scheduler::new();
        let mut out = Vec::new();
        pref.set(Theme::Dark, &mut scheduler, &mut out).unwrap();
        pref.set(Theme::Light, &mut scheduler, &mut out).unwrap();
        assert_eq!(scheduler.pending(), 1);

        out.clear();
        while let Some(due) = scheduler.pop_due(300.0) {
            pref.handle(due.task, &mut out);
        }
        assert_eq!(out, vec![Patch::style(Target::Body, "transition", "")]);
    }

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, _key: &str) -> EffectResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> EffectResult<()> {
            Err(EffectError::Storage("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_storage_failure_still_switches_page() {
        let mut pref = ThemePreference::new(BrokenStore, &ThemeSettings::default());
        let mut scheduler: Scheduler<ThemeTask> = Scheduler::new();
        let mut out = Vec::new();

        assert!(pref.set(Theme::Dark, &mut scheduler, &mut out).is_err());
        assert_eq!(pref.current(), Theme::Dark);
        assert!(out.contains(&Patch::style(Target::ThemeDarkIcon, "opacity", "1")));
    }

    struct UnreadableStore;

    impl PreferenceStore for UnreadableStore {
        fn get(&self, _key: &str) -> EffectResult<Option<String>> {
            Err(EffectError::Storage("access denied".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> EffectResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unreadable_store_loads_light() {
        let mut pref = ThemePreference::new(UnreadableStore, &ThemeSettings::default());
        let mut scheduler: Scheduler<ThemeTask> = Scheduler::new();

        assert_eq!(pref.load(&mut scheduler, &mut Vec::new()).unwrap(), Theme::Light);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse(" light "), Some(Theme::Light));
        assert_eq!(Theme::parse("Dark"), None);
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
