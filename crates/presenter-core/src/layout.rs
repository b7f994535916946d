//! Text layout: word splitting and greedy line packing.
//!
//! Item text is split into paragraphs on line breaks (real ones, or the
//! literal two-character `\n` sequence shell callers pass through), then
//! into space-separated words. Words are packed greedily into lines no
//! wider than the available width.

// -------------------------------------------------------------------
// TextMeasurer trait
// -------------------------------------------------------------------

/// Measures text in the font used for item bodies.
///
/// Backends supply concrete implementations bound to a font size. The
/// layout engine never touches fonts directly.
pub trait TextMeasurer {
    /// Width in pixels of `text`.
    fn measure_text(&self, text: &str) -> u32;

    /// Height in pixels of one line.
    fn line_height(&self) -> u32;
}

/// Upper bound on wrapped lines per item.
pub const MAX_LINES: usize = 512;

/// Glyph whose width is used as the gap between packed words.
const GAP_GLYPH: &str = "A";

/// A single word with its measured width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub width: u32,
    /// The word begins a paragraph after an explicit line break.
    pub forced_break: bool,
}

/// A packed line of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub width: u32,
    pub forced_break: bool,
}

/// Output of [`wrap`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WrappedText {
    pub lines: Vec<Line>,
    pub line_height: u32,
}

impl WrappedText {
    /// Total height of the block with `spacing` pixels between lines.
    pub fn content_height(&self, spacing: u32) -> u32 {
        content_height(self.lines.len(), self.line_height, spacing)
    }
}

/// Replace literal `\n` escape sequences with real line breaks.
pub fn expand_escaped_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Split text into measured words, marking paragraph starts.
///
/// Empty paragraphs contribute no words, so consecutive breaks collapse.
pub fn split_words(text: &str, measurer: &dyn TextMeasurer) -> Vec<Word> {
    let expanded = expand_escaped_newlines(text);
    let mut words = Vec::new();

    for (para_index, paragraph) in expanded.split('\n').enumerate() {
        let mut first_in_paragraph = true;
        for token in paragraph.split(' ') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            words.push(Word {
                text: token.to_string(),
                width: measurer.measure_text(token),
                forced_break: para_index > 0 && first_in_paragraph,
            });
            first_in_paragraph = false;
        }
    }
    words
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// A word wider than `max_width` gets a line of its own. The line count
/// is capped at [`MAX_LINES`].
pub fn wrap(text: &str, max_width: u32, measurer: &dyn TextMeasurer) -> WrappedText {
    let gap = measurer.measure_text(GAP_GLYPH);
    let mut lines: Vec<Line> = Vec::new();

    for word in split_words(text, measurer) {
        let fits = match lines.last() {
            Some(line) if !word.forced_break => line.width + gap + word.width <= max_width,
            _ => false,
        };

        if fits {
            if let Some(line) = lines.last_mut() {
                line.text.push(' ');
                line.text.push_str(&word.text);
                line.width += gap + word.width;
            }
            continue;
        }

        if lines.len() == MAX_LINES {
            log::warn!("text exceeds {MAX_LINES} lines, truncating");
            break;
        }
        lines.push(Line {
            text: word.text,
            width: word.width,
            forced_break: word.forced_break,
        });
    }

    WrappedText {
        lines,
        line_height: measurer.line_height(),
    }
}

/// Height of `line_count` lines separated by `spacing`.
pub fn content_height(line_count: usize, line_height: u32, spacing: u32) -> u32 {
    match line_count {
        0 => 0,
        n => {
            let n = u32::try_from(n).unwrap_or(u32::MAX);
            n.saturating_mul(line_height)
                .saturating_add((n - 1).saturating_mul(spacing))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-width text measurer: 8 pixels per character.
    pub(super) struct FixedMeasurer;

    impl TextMeasurer for FixedMeasurer {
        fn measure_text(&self, text: &str) -> u32 {
            text.chars().count() as u32 * 8
        }

        fn line_height(&self) -> u32 {
            20
        }
    }

    fn texts(wrapped: &WrappedText) -> Vec<&str> {
        wrapped.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn escaped_newlines_expand() {
        assert_eq!(expand_escaped_newlines(r"a\nb"), "a\nb");
        assert_eq!(expand_escaped_newlines("plain"), "plain");
    }

    #[test]
    fn split_marks_paragraph_starts() {
        let words = split_words("one two\nthree", &FixedMeasurer);
        assert_eq!(words.len(), 3);
        assert!(!words[0].forced_break);
        assert!(!words[1].forced_break);
        assert!(words[2].forced_break);
        assert_eq!(words[2].width, 40);
    }

    #[test]
    fn split_drops_empty_tokens() {
        let words = split_words("  a   b \n\n\n  c  ", &FixedMeasurer);
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
        assert!(words[2].forced_break);
    }

    #[test]
    fn leading_break_is_not_forced() {
        // The first paragraph is empty, so "x" is the first word overall
        // but still starts a later paragraph.
        let words = split_words("\nx", &FixedMeasurer);
        assert_eq!(words.len(), 1);
        assert!(words[0].forced_break);
        let wrapped = wrap("\nx", 100, &FixedMeasurer);
        assert_eq!(texts(&wrapped), ["x"]);
    }

    #[test]
    fn single_line_fits() {
        // "hello world" = 5*8 + 8 + 5*8 = 88
        let wrapped = wrap("hello world", 88, &FixedMeasurer);
        assert_eq!(texts(&wrapped), ["hello world"]);
        assert_eq!(wrapped.lines[0].width, 88);
        assert_eq!(wrapped.line_height, 20);
    }

    #[test]
    fn breaks_when_exceeding_width() {
        let wrapped = wrap("hello world", 87, &FixedMeasurer);
        assert_eq!(texts(&wrapped), ["hello", "world"]);
    }

    #[test]
    fn long_word_gets_own_line() {
        let wrapped = wrap("a supercalifragilistic b", 40, &FixedMeasurer);
        assert_eq!(texts(&wrapped), ["a", "supercalifragilistic", "b"]);
        assert_eq!(wrapped.lines[1].width, 160);
    }

    #[test]
    fn explicit_breaks_force_new_lines() {
        let wrapped = wrap(r"a\nb c", 1000, &FixedMeasurer);
        assert_eq!(texts(&wrapped), ["a", "b c"]);
        assert!(wrapped.lines[1].forced_break);
    }

    #[test]
    fn empty_text_has_no_lines() {
        let wrapped = wrap("   \n  ", 100, &FixedMeasurer);
        assert!(wrapped.lines.is_empty());
        assert_eq!(wrapped.content_height(10), 0);
    }

    #[test]
    fn line_count_is_capped() {
        let text = vec!["w"; MAX_LINES + 50].join("\n");
        let wrapped = wrap(&text, 1000, &FixedMeasurer);
        assert_eq!(wrapped.lines.len(), MAX_LINES);
    }

    #[test]
    fn content_height_formula() {
        assert_eq!(content_height(0, 20, 10), 0);
        assert_eq!(content_height(1, 20, 10), 20);
        assert_eq!(content_height(2, 20, 10), 2 * 20 + 10);
        assert_eq!(content_height(5, 20, 0), 100);
    }

    #[test]
    fn content_height_saturates() {
        assert_eq!(content_height(2, 20, u32::MAX), u32::MAX);
        assert_eq!(content_height(usize::MAX, 20, 10), u32::MAX);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rewrap_is_idempotent(
                words in proptest::collection::vec("[a-z]{1,12}", 1..40),
                breaks in proptest::collection::vec(any::<bool>(), 40),
                max_width in 40u32..400,
            ) {
                let text: String = words
                    .iter()
                    .zip(&breaks)
                    .map(|(w, br)| if *br { format!("{w}\n") } else { format!("{w} ") })
                    .collect();
                let first = wrap(&text, max_width, &FixedMeasurer);
                let joined: Vec<&str> = first.lines.iter().map(|l| l.text.as_str()).collect();
                let second = wrap(&joined.join("\n"), max_width, &FixedMeasurer);
                prop_assert_eq!(texts(&first), texts(&second));
            }

            #[test]
            fn lines_fit_unless_single_word(
                words in proptest::collection::vec("[a-z]{1,20}", 1..30),
                max_width in 8u32..200,
            ) {
                let wrapped = wrap(&words.join(" "), max_width, &FixedMeasurer);
                for line in &wrapped.lines {
                    prop_assert!(line.width <= max_width || !line.text.contains(' '));
                }
            }
        }
    }
}
