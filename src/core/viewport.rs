//! Viewport sampling math
//!
//! Pure functions over bounding boxes and scroll offsets. The runtime reads
//! the raw numbers once per animation frame and everything downstream works
//! from a `ScrollSample`.

/// Viewport-relative bounding box, as returned by `getBoundingClientRect`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Everything one frame needs to know about scrolling
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollSample {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
    /// Roadmap container box, when the page has one
    pub roadmap: Option<Rect>,
    /// Box of the section each nav item links to, in nav order
    pub sections: Vec<Option<Rect>>,
}

/// Fraction of the container the viewer has scrolled through, in [0, 1].
///
/// 0 while the container is still below the viewport, 1 once it has fully
/// left through the top.
pub fn container_progress(rect: Rect, viewport_height: f64) -> f64 {
    let span = viewport_height + rect.height;
    if span <= 0.0 {
        return 0.0;
    }
    ((viewport_height - rect.top) / span).clamp(0.0, 1.0)
}

/// Scroll fraction that drives the progress line.
///
/// Measures how far the container's top has moved above the viewport,
/// relative to the scrollable overhang of the container.
pub fn line_fraction(rect: Rect, viewport_height: f64) -> f64 {
    let scrolled_past = (-rect.top).max(0.0);
    let overhang = rect.height - viewport_height;
    if overhang <= 0.0 {
        return if scrolled_past > 0.0 { 1.0 } else { 0.0 };
    }
    (scrolled_past / overhang).min(1.0)
}

/// Whether a box sits in the middle band of the viewport (30%..70%)
pub fn in_reveal_band(rect: Rect, viewport_height: f64) -> bool {
    rect.top < viewport_height * 0.7 && rect.bottom() > viewport_height * 0.3
}

/// Scroll offset that centres an element vertically
pub fn centered_scroll_target(scroll_y: f64, element_top: f64, viewport_height: f64) -> f64 {
    scroll_y + element_top - viewport_height / 2.0
}

/// Scroll offset for in-page anchors, leaving room for the fixed header
pub fn anchor_scroll_target(offset_top: f64, header_height: f64, gap: f64) -> f64 {
    offset_top - header_height - gap
}

/// Whether a section crosses the scroll-spy line at 20% of the viewport
pub fn crosses_spy_line(rect: Rect, viewport_height: f64) -> bool {
    let line = viewport_height * 0.2;
    rect.top <= line && rect.bottom() > line
}

/// Whole-page scroll progress in percent
pub fn page_progress_percent(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_progress_bounds() {
        // Container entirely below the viewport
        assert_eq!(container_progress(Rect::new(900.0, 1000.0), 800.0), 0.0);
        // Top edge just entering
        assert_eq!(container_progress(Rect::new(800.0, 1000.0), 800.0), 0.0);
        // Fully scrolled past
        assert_eq!(container_progress(Rect::new(-1000.0, 1000.0), 800.0), 1.0);
        // Half way
        let mid = container_progress(Rect::new(-100.0, 1000.0), 800.0);
        assert!((mid - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_line_fraction() {
        assert_eq!(line_fraction(Rect::new(100.0, 2000.0), 800.0), 0.0);
        assert!((line_fraction(Rect::new(-600.0, 2000.0), 800.0) - 0.5).abs() < 1e-12);
        assert_eq!(line_fraction(Rect::new(-5000.0, 2000.0), 800.0), 1.0);
    }

    #[test]
    fn test_line_fraction_short_container() {
        assert_eq!(line_fraction(Rect::new(10.0, 300.0), 800.0), 0.0);
        assert_eq!(line_fraction(Rect::new(-10.0, 300.0), 800.0), 1.0);
    }

    #[test]
    fn test_spy_line() {
        assert!(crosses_spy_line(Rect::new(100.0, 500.0), 1000.0));
        assert!(crosses_spy_line(Rect::new(200.0, 10.0), 1000.0));
        assert!(!crosses_spy_line(Rect::new(201.0, 500.0), 1000.0));
        assert!(!crosses_spy_line(Rect::new(-500.0, 700.0), 1000.0));
    }

    #[test]
    fn test_reveal_band() {
        assert!(in_reveal_band(Rect::new(300.0, 100.0), 1000.0));
        assert!(!in_reveal_band(Rect::new(700.0, 100.0), 1000.0));
        assert!(!in_reveal_band(Rect::new(100.0, 200.0), 1000.0));
        assert!(in_reveal_band(Rect::new(100.0, 201.0), 1000.0));
    }

    #[test]
    fn test_scroll_targets() {
        assert_eq!(centered_scroll_target(1000.0, 600.0, 800.0), 1200.0);
        assert_eq!(anchor_scroll_target(2400.0, 80.0, 20.0), 2300.0);
    }

    #[test]
    fn test_page_progress() {
        assert_eq!(page_progress_percent(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(page_progress_percent(1000.0, 3000.0, 1000.0), 50.0);
        assert_eq!(page_progress_percent(500.0, 900.0, 1000.0), 0.0);
    }
}
