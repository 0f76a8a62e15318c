//! Browser-facing layer: page markup and the effects runtime

#[cfg(feature = "hydrate")]
pub mod dom;
#[cfg(feature = "hydrate")]
mod listeners;
#[cfg(feature = "hydrate")]
pub mod runtime;

pub mod effects;
pub mod pages;
pub mod theme;

pub use effects::PageEffects;
pub use theme::ThemeToggle;
