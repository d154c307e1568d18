use crate::common::config::TextSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextRole {
    Title,
    Message,
}

/// Text metrics supplied by the host toolkit.
pub trait TextMeasure {
    /// Height of `text` laid out on a single line.
    fn line_height(&self, text: &str, role: TextRole) -> f64;

    /// Height of `text` wrapped to `max_width`.
    fn wrapped_height(&self, text: &str, role: TextRole, max_width: f64) -> f64;
}

/// Approximates glyphs with a fixed average advance. Good enough for tooling
/// and tests where no real font stack is around.
#[derive(Clone, Debug, Default)]
pub struct EstimatedTextMetrics {
    settings: TextSettings,
}

impl EstimatedTextMetrics {
    pub fn new(settings: TextSettings) -> Self { Self { settings } }

    fn font_size(&self, role: TextRole) -> f64 {
        match role {
            TextRole::Title => self.settings.title_font_size,
            TextRole::Message => self.settings.message_font_size,
        }
    }

    fn advance(&self, role: TextRole) -> f64 { self.font_size(role) * self.settings.advance_ratio }

    fn single_line(&self, role: TextRole) -> f64 {
        self.font_size(role) * self.settings.line_height_ratio
    }

    /// Greedy word wrap. Words wider than a line are broken across lines.
    pub fn line_count(&self, text: &str, role: TextRole, max_width: f64) -> usize {
        let advance = self.advance(role);
        let per_line = if advance > 0.0 {
            ((max_width / advance).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let mut lines = 0;
        for paragraph in text.split('\n') {
            let mut used = 0usize;
            lines += 1;
            for word in paragraph.split_whitespace() {
                let mut len = word.chars().count();
                let needed = if used == 0 { len } else { used + 1 + len };
                if needed <= per_line {
                    used = needed;
                    continue;
                }
                if used > 0 {
                    lines += 1;
                }
                while len > per_line {
                    lines += 1;
                    len -= per_line;
                }
                used = len;
            }
        }
        lines
    }
}

impl TextMeasure for EstimatedTextMetrics {
    fn line_height(&self, _text: &str, role: TextRole) -> f64 { self.single_line(role) }

    fn wrapped_height(&self, text: &str, role: TextRole, max_width: f64) -> f64 {
        self.line_count(text, role, max_width) as f64 * self.single_line(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> EstimatedTextMetrics { EstimatedTextMetrics::new(TextSettings::default()) }

    #[test]
    fn line_height_scales_with_role() {
        let m = metrics();
        assert_eq!(m.line_height("Title", TextRole::Title), 30.0);
        assert_eq!(m.line_height("Body", TextRole::Message), 18.0);
    }

    #[test]
    fn short_message_fits_one_line() {
        // 15pt * 0.5 = 7.5 per glyph, 100 wide holds 13 glyphs.
        assert_eq!(metrics().line_count("Choose one", TextRole::Message, 100.0), 1);
        assert_eq!(metrics().wrapped_height("Choose one", TextRole::Message, 100.0), 18.0);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(metrics().line_count("aaaa bbbb cccc", TextRole::Message, 75.0), 2);
    }

    #[test]
    fn long_words_are_broken() {
        assert_eq!(metrics().line_count(&"x".repeat(30), TextRole::Message, 75.0), 3);
    }

    #[test]
    fn explicit_newlines_start_new_lines() {
        assert_eq!(metrics().line_count("a\nb\n", TextRole::Message, 300.0), 3);
    }
}
