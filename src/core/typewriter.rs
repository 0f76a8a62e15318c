//! Character-by-character text reveal
//!
//! A `Typewriter` produces one growing prefix per call to `advance`. It owns
//! no timer; the caller fires it at the configured speed and stops once it
//! returns `None`.
//!
//! ```
//! # use feva_motion::core::typewriter::Typewriter;
//! let mut writer = Typewriter::new("Hi!", 30);
//! assert_eq!(writer.advance(), Some("H"));
//! assert_eq!(writer.advance(), Some("Hi"));
//! assert_eq!(writer.advance(), Some("Hi!"));
//! assert_eq!(writer.advance(), None);
//! ```

#[derive(Clone, Debug, PartialEq)]
pub struct Typewriter {
    text: String,
    /// Byte offset just past each character
    ends: Vec<usize>,
    shown: usize,
    speed_ms: u32,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, speed_ms: u32) -> Self {
        let text = text.into();
        let ends = text
            .char_indices()
            .map(|(start, ch)| start + ch.len_utf8())
            .collect();
        Self {
            text,
            ends,
            shown: 0,
            speed_ms,
        }
    }

    /// Reveal one more character. Returns `None` once the text is complete.
    pub fn advance(&mut self) -> Option<&str> {
        if self.shown >= self.ends.len() {
            return None;
        }
        self.shown += 1;
        Some(self.visible())
    }

    /// Text currently shown
    pub fn visible(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.text[..self.ends[n - 1]],
        }
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    /// Number of ticks a full reveal takes
    pub fn len_chars(&self) -> usize {
        self.ends.len()
    }

    pub fn is_finished(&self) -> bool {
        self.shown >= self.ends.len()
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    /// Go back to the empty state
    pub fn reset(&mut self) {
        self.shown = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_after_each_tick() {
        let text = "Discovery";
        let mut writer = Typewriter::new(text, 30);
        let length = text.chars().count();

        for tick in 1..=length {
            assert_eq!(writer.advance(), Some(&text[..tick]));
        }
        assert!(writer.is_finished());
        assert_eq!(writer.advance(), None);
        assert_eq!(writer.visible(), text);
    }

    #[test]
    fn test_completes_in_exactly_len_ticks() {
        let mut writer = Typewriter::new("Launch & scale", 25);
        let mut ticks = 0;
        while writer.advance().is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, writer.len_chars());
        assert_eq!(ticks, 14);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut writer = Typewriter::new("Ünï→", 30);
        assert_eq!(writer.len_chars(), 4);
        assert_eq!(writer.advance(), Some("Ü"));
        assert_eq!(writer.advance(), Some("Ün"));
        assert_eq!(writer.advance(), Some("Ünï"));
        assert_eq!(writer.advance(), Some("Ünï→"));
        assert_eq!(writer.advance(), None);
    }

    #[test]
    fn test_empty_text_finishes_immediately() {
        let mut writer = Typewriter::new("", 30);
        assert!(writer.is_finished());
        assert_eq!(writer.advance(), None);
        assert_eq!(writer.visible(), "");
    }

    #[test]
    fn test_reset() {
        let mut writer = Typewriter::new("abc", 30);
        writer.advance();
        writer.advance();
        writer.reset();
        assert_eq!(writer.visible(), "");
        assert_eq!(writer.advance(), Some("a"));
        assert_eq!(writer.speed_ms(), 30);
        assert_eq!(writer.full_text(), "abc");
    }
}
