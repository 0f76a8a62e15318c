//! Core effect state machines, independent of the browser

#[cfg(feature = "ssr")]
pub mod config;
pub mod error;
pub mod patch;
pub mod scheduler;
pub mod settings;
pub mod tween;
pub mod viewport;

pub mod cards;
pub mod carousel;
pub mod chrome;
pub mod counter;
pub mod globe;
pub mod line_progress;
pub mod matrix;
pub mod page;
pub mod particles;
pub mod reveal;
pub mod roadmap;
pub mod rotation;
pub mod theme;
pub mod typewriter;

#[cfg(test)]
mod tests;

pub use error::{EffectError, EffectResult};
pub use page::{EffectsPage, PageMarkup, StartLayout, Task};
pub use patch::{Patch, Patches, Target};
pub use settings::EffectSettings;
