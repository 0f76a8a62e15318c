#[cfg(test)]
mod tests {
    use crate::core::patch::{last_class, last_text};
    use crate::core::reveal::{StepId, StepState, VisibilitySignal};
    use crate::core::roadmap::StepMarkup;
    use crate::core::theme::{MemoryStore, PreferenceStore, Theme};
    use crate::core::viewport::{Rect, ScrollSample};
    use crate::core::{EffectSettings, EffectsPage, PageMarkup, Patch, Patches, StartLayout, Target};

    fn steps(n: u32) -> Vec<StepMarkup> {
        (1..=n)
            .map(|id| StepMarkup {
                id: StepId(id),
                title: Some(format!("Milestone {id}")),
                description: Some(format!("Details for milestone {id}")),
                has_pulse: true,
            })
            .collect()
    }

    fn roadmap_page(n: u32) -> EffectsPage<MemoryStore> {
        EffectsPage::new(
            EffectSettings::default(),
            PageMarkup {
                steps: steps(n),
                ..PageMarkup::default()
            },
            None,
            MemoryStore::default(),
            7,
            0.0,
        )
    }

    /// Run frames every 16ms from `from` to `to`, collecting patches
    fn run_frames(page: &mut EffectsPage<MemoryStore>, from: f64, to: f64) -> Patches {
        let mut out = Vec::new();
        let mut now = from;
        while now <= to {
            out.extend(page.frame(now, None));
            now += 16.0;
        }
        out
    }

    fn visible_adds(patches: &[Patch], index: usize) -> usize {
        patches
            .iter()
            .filter(|patch| **patch == Patch::add_class(Target::Step(index), "visible"))
            .count()
    }

    fn container_sample(progress_top: f64) -> ScrollSample {
        ScrollSample {
            scroll_y: 0.0,
            viewport_height: 800.0,
            document_height: 4000.0,
            roadmap: Some(Rect::new(progress_top, 1000.0)),
            sections: Vec::new(),
        }
    }

    // ========================================================================
    // Reveal lifecycle across tracker, scheduler and typewriter
    // ========================================================================

    #[test]
    fn test_reveal_is_idempotent_without_hide() {
        let mut page = roadmap_page(3);
        let mut out = page.step_visibility(0, VisibilitySignal::new(true, 0.2));
        out.extend(page.step_visibility(0, VisibilitySignal::new(true, 0.6)));
        out.extend(page.step_visibility(0, VisibilitySignal::new(true, 0.9)));
        out.extend(run_frames(&mut page, 0.0, 3_000.0));

        assert_eq!(visible_adds(&out, 0), 1);
        assert_eq!(page.roadmap().unwrap().tracker().state(0), StepState::Revealed);
    }

    #[test]
    fn test_hide_then_reveal_settles_again() {
        let mut page = roadmap_page(3);
        let mut out = page.step_visibility(1, VisibilitySignal::new(true, 0.7));
        out.extend(run_frames(&mut page, 0.0, 3_000.0));
        out.extend(page.step_visibility(1, VisibilitySignal::gone()));
        out.extend(page.step_visibility(1, VisibilitySignal::new(true, 0.7)));
        out.extend(run_frames(&mut page, 3_016.0, 6_000.0));

        assert_eq!(visible_adds(&out, 1), 2);
    }

    #[test]
    fn test_title_types_one_character_per_tick() {
        let mut page = roadmap_page(1);
        page.step_visibility(0, VisibilitySignal::new(true, 1.0));

        // Settle at 0, title starts at 200, first character at 230
        let out = run_frames(&mut page, 0.0, 3_000.0);
        let title: Vec<&str> = out
            .iter()
            .filter_map(|patch| match patch {
                Patch::Text {
                    target: Target::StepTitle(0),
                    text,
                } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        let full = "Milestone 1";
        let expected: Vec<&str> = (1..=full.len()).map(|i| &full[..i]).collect();
        assert_eq!(&title[..full.len()], expected.as_slice());
        assert_eq!(title.last(), Some(&full));
        assert_eq!(last_class(&out, Target::StepTitle(0), "typing-text"), Some(false));
    }

    #[test]
    fn test_reverse_crossing_restores_text_mid_typing() {
        let mut page = roadmap_page(1);
        page.step_visibility(0, VisibilitySignal::new(true, 1.0));
        let partial = run_frames(&mut page, 0.0, 300.0);
        let shown = last_text(&partial, Target::StepTitle(0)).unwrap().to_string();
        assert!(shown.len() < "Milestone 1".len());

        let out = page.step_visibility(0, VisibilitySignal::gone());
        assert_eq!(last_text(&out, Target::StepTitle(0)), Some("Milestone 1"));
        assert_eq!(
            last_text(&out, Target::StepDescription(0)),
            Some("Details for milestone 1")
        );

        // No stray typing ticks after the restore
        let later = run_frames(&mut page, 316.0, 3_000.0);
        assert_eq!(last_text(&later, Target::StepTitle(0)), None);
    }

    // ========================================================================
    // Scroll-driven reveal
    // ========================================================================

    #[test]
    fn test_monotonic_scroll_reveals_prefix() {
        let mut page = roadmap_page(5);
        let mut now = 0.0;

        // Container top moves from the viewport bottom to far above it
        let mut top = 800.0;
        while top > -1000.0 {
            page.frame(now, Some(container_sample(top)));
            let visible: Vec<StepId> = page.roadmap().unwrap().tracker().visible().iter().collect();
            let expected: Vec<StepId> = (1..=visible.len() as u32).map(StepId).collect();
            assert_eq!(visible, expected);

            top -= 50.0;
            now += 16.0;
        }
        assert_eq!(page.roadmap().unwrap().tracker().visible().len(), 5);
    }

    #[test]
    fn test_line_progress_follows_reveals() {
        let mut page = roadmap_page(4);
        page.step_visibility(0, VisibilitySignal::new(true, 0.8));
        page.step_visibility(1, VisibilitySignal::new(true, 0.8));

        let out = run_frames(&mut page, 0.0, 2_000.0);
        let line = page.roadmap().unwrap().line();
        assert!((line.target() - 1000.0).abs() < 1e-9);
        assert_eq!(last_class(&out, Target::RoadmapLine, "animate"), Some(true));
        let last_offset = out.iter().rev().find_map(|patch| match patch {
            Patch::Style {
                target: Target::RoadmapLine,
                property: "stroke-dashoffset",
                value,
            } => Some(value.clone()),
            _ => None,
        });
        assert_eq!(last_offset.as_deref(), Some("1000.00"));
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut page = roadmap_page(3);
        for index in 0..3 {
            page.step_visibility(index, VisibilitySignal::new(true, 1.0));
        }
        run_frames(&mut page, 0.0, 2_000.0);

        let out = page.reset_roadmap();
        let roadmap = page.roadmap().unwrap();
        assert!(roadmap.tracker().visible().is_empty());
        assert_eq!(roadmap.line().offset_at(2_000.0), 2000.0);
        assert_eq!(last_class(&out, Target::Step(2), "visible"), Some(false));
        assert_eq!(last_class(&out, Target::RoadmapLine, "animate"), Some(false));
    }

    // ========================================================================
    // Ambient generators through the page
    // ========================================================================

    #[test]
    fn test_rotation_accumulates_over_frames() {
        let mut page = EffectsPage::new(
            EffectSettings::default(),
            PageMarkup {
                has_globe: true,
                ..PageMarkup::default()
            },
            crate::core::globe::TechCatalog::builtin().ok(),
            MemoryStore::default(),
            1,
            0.0,
        );
        page.start(&StartLayout::default(), &mut Vec::new()).unwrap();

        // 100 ticks of 50ms, 0.5 degrees each
        run_frames(&mut page, 16.0, 5_008.0);
        let rotation = page.globe().unwrap().rotation();
        assert!((rotation.y() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_page() {
        let build = || {
            let mut page = EffectsPage::new(
                EffectSettings::default(),
                PageMarkup {
                    has_particles: true,
                    has_matrix: true,
                    ..PageMarkup::default()
                },
                None,
                MemoryStore::default(),
                99,
                0.0,
            );
            let layout = StartLayout {
                viewport_width: 600.0,
                matrix_width: 300.0,
                ..StartLayout::default()
            };
            let mut out = Vec::new();
            page.start(&layout, &mut out).unwrap();
            out.extend(page.frame(1_000.0, None));
            out
        };

        assert_eq!(build(), build());
    }

    // ========================================================================
    // Theme persistence
    // ========================================================================

    #[test]
    fn test_toggle_twice_through_page_persists_final_value() {
        let mut store = MemoryStore::default();
        store.set("feva-theme", "dark").unwrap();
        let mut page = EffectsPage::new(
            EffectSettings::default(),
            PageMarkup::default(),
            None,
            store,
            0,
            0.0,
        );
        let mut out = Vec::new();
        assert_eq!(page.start(&StartLayout::default(), &mut out).unwrap(), Theme::Dark);

        page.toggle_theme(&mut out).unwrap();
        page.toggle_theme(&mut out).unwrap();
        assert_eq!(page.theme(), Theme::Dark);
        assert_eq!(
            page.theme_store().get("feva-theme").unwrap().as_deref(),
            Some("dark")
        );
        assert_eq!(
            out.iter().rev().find_map(|patch| match patch {
                Patch::Attribute {
                    target: Target::Document,
                    value,
                    ..
                } => Some(value.as_str()),
                _ => None,
            }),
            Some("dark")
        );
    }
}
