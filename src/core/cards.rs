//! Sections and cards that animate in as they scroll into view
//!
//! Every observed element gets `in-view` when it intersects. Cards also
//! slide up and fade in, once per binding: they are pushed down and hidden
//! first, then moved back under a transition after a short delay. Service
//! cards additionally tilt their icon and zoom their image on hover.

use super::patch::{Patch, Patches, Target};
use super::scheduler::Scheduler;
use super::settings::CardSettings;

const IN_VIEW: &str = "in-view";
const ICON_HOVER: &str = "scale(1.1) rotate(5deg)";
const ICON_REST: &str = "scale(1) rotate(0deg)";
const IMAGE_HOVER: &str = "scale(1.05)";
const IMAGE_REST: &str = "scale(1)";

/// How an observed element reacts to entering the viewport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealKind {
    /// Only marked `in-view`
    Marker,
    /// Marked, then slides up and fades in
    Card,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardTask {
    Settle(usize),
}

#[derive(Clone, Debug)]
pub struct ScrollReveal {
    kinds: Vec<RevealKind>,
    animated: Vec<bool>,
    settings: CardSettings,
}

impl ScrollReveal {
    pub fn new(kinds: Vec<RevealKind>, settings: &CardSettings) -> Self {
        let animated = vec![false; kinds.len()];
        Self {
            kinds,
            animated,
            settings: settings.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn is_animated(&self, index: usize) -> bool {
        self.animated.get(index).copied().unwrap_or(false)
    }

    /// Element `index` intersects the viewport
    pub fn in_view<T: From<CardTask> + Clone>(
        &mut self,
        index: usize,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) {
        let Some(kind) = self.kinds.get(index).copied() else {
            return;
        };
        let target = Target::InView(index);
        out.push(Patch::add_class(target, IN_VIEW));

        if kind != RevealKind::Card || self.animated[index] {
            return;
        }
        self.animated[index] = true;
        out.push(Patch::style(
            target,
            "transform",
            format!("translateY({}px)", self.settings.offset_px),
        ));
        out.push(Patch::style(target, "opacity", "0"));
        scheduler.after(
            f64::from(self.settings.settle_delay_ms),
            CardTask::Settle(index).into(),
        );
    }

    pub fn handle(&mut self, task: CardTask, out: &mut Patches) {
        let CardTask::Settle(index) = task;
        if index >= self.kinds.len() {
            return;
        }
        let target = Target::InView(index);
        out.push(Patch::style(target, "transition", self.settings.transition.clone()));
        out.push(Patch::style(target, "transform", "translateY(0)"));
        out.push(Patch::style(target, "opacity", "1"));
    }
}

/// Hover feedback of service card `index`
pub fn service_card_hover(index: usize, entered: bool, out: &mut Patches) {
    let (icon, image) = if entered {
        (ICON_HOVER, IMAGE_HOVER)
    } else {
        (ICON_REST, IMAGE_REST)
    };
    out.push(Patch::style(Target::ServiceIcon(index), "transform", icon));
    out.push(Patch::style(Target::ServiceImage(index), "transform", image));
}
