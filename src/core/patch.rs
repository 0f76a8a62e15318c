//! DOM patches emitted by the effect machines
//!
//! Core code never touches the document. It describes the change it wants as
//! a `Patch` against a logical `Target`, and the browser runtime applies it
//! to whatever element that target is bound to. Every patch is an absolute
//! write (class on/off, full text, full style value), so applying the same
//! patch twice is harmless.

use super::matrix::ColumnSpec;
use super::particles::ParticleSpec;

/// Logical element a patch applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// `<html>`
    Document,
    Body,
    Header,
    BackToTop,
    ScrollProgress,
    HeroPattern,
    FloatingIcon(usize),
    MobileToggle,
    MainNav,
    NavItem(usize),
    ThemeLightIcon,
    ThemeDarkIcon,
    Step(usize),
    StepTitle(usize),
    StepDescription(usize),
    StepPulse(usize),
    RoadmapLine,
    Globe,
    InfoPanel,
    TechName,
    TechDescription,
    MatrixCell { column: usize, row: usize },
    Particle(u64),
    Testimonial(usize),
    TestimonialDot(usize),
    Counter(usize),
    /// Section or card watched for scroll-in
    InView(usize),
    ServiceIcon(usize),
    ServiceImage(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Patch {
    Class {
        target: Target,
        class: &'static str,
        enabled: bool,
    },
    Text {
        target: Target,
        text: String,
    },
    Style {
        target: Target,
        property: &'static str,
        value: String,
    },
    Attribute {
        target: Target,
        name: &'static str,
        value: String,
    },
    /// Reset the CSS animation, force a reflow, then start `animation`
    RestartAnimation {
        target: Target,
        animation: String,
    },
    SpawnParticle(ParticleSpec),
    RemoveParticle(u64),
    SpawnMatrixColumn(ColumnSpec),
    ClearMatrix,
    ScrollTo {
        top: f64,
    },
}

impl Patch {
    pub fn add_class(target: Target, class: &'static str) -> Self {
        Patch::Class {
            target,
            class,
            enabled: true,
        }
    }

    pub fn remove_class(target: Target, class: &'static str) -> Self {
        Patch::Class {
            target,
            class,
            enabled: false,
        }
    }

    pub fn class(target: Target, class: &'static str, enabled: bool) -> Self {
        Patch::Class {
            target,
            class,
            enabled,
        }
    }

    pub fn text(target: Target, text: impl Into<String>) -> Self {
        Patch::Text {
            target,
            text: text.into(),
        }
    }

    pub fn style(target: Target, property: &'static str, value: impl Into<String>) -> Self {
        Patch::Style {
            target,
            property,
            value: value.into(),
        }
    }

    /// The element this patch writes to, if it targets a single element
    pub fn target(&self) -> Option<Target> {
        match self {
            Patch::Class { target, .. }
            | Patch::Text { target, .. }
            | Patch::Style { target, .. }
            | Patch::Attribute { target, .. }
            | Patch::RestartAnimation { target, .. } => Some(*target),
            Patch::RemoveParticle(id) => Some(Target::Particle(*id)),
            Patch::SpawnParticle(_)
            | Patch::SpawnMatrixColumn(_)
            | Patch::ClearMatrix
            | Patch::ScrollTo { .. } => None,
        }
    }
}

/// Collected output of one round of effect work
pub type Patches = Vec<Patch>;

/// Last text written to `target`, if any
pub fn last_text(patches: &[Patch], target: Target) -> Option<&str> {
    patches.iter().rev().find_map(|patch| match patch {
        Patch::Text { target: t, text } if *t == target => Some(text.as_str()),
        _ => None,
    })
}

/// Final state of `class` on `target` after applying `patches`, if touched
pub fn last_class(patches: &[Patch], target: Target, class: &str) -> Option<bool> {
    patches.iter().rev().find_map(|patch| match patch {
        Patch::Class {
            target: t,
            class: c,
            enabled,
        } if *t == target && *c == class => Some(*enabled),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writes_win() {
        let patches = vec![
            Patch::text(Target::TechName, "Rust"),
            Patch::add_class(Target::Globe, "spinning"),
            Patch::text(Target::TechName, "Go"),
            Patch::remove_class(Target::Globe, "spinning"),
        ];

        assert_eq!(last_text(&patches, Target::TechName), Some("Go"));
        assert_eq!(last_class(&patches, Target::Globe, "spinning"), Some(false));
        assert_eq!(last_class(&patches, Target::Globe, "other"), None);
        assert_eq!(last_text(&patches, Target::TechDescription), None);
    }

    #[test]
    fn test_patch_target() {
        assert_eq!(
            Patch::style(Target::RoadmapLine, "stroke-dashoffset", "10").target(),
            Some(Target::RoadmapLine)
        );
        assert_eq!(Patch::RemoveParticle(7).target(), Some(Target::Particle(7)));
        assert_eq!(Patch::ClearMatrix.target(), None);
    }
}
