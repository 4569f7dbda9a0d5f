//! Text normalization shared by outline building and snippet output.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Typographic ligatures and their ASCII letter sequences.
pub const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),  // ﬀ
    ('\u{FB01}', "fi"),  // ﬁ
    ('\u{FB02}', "fl"),  // ﬂ
    ('\u{FB03}', "ffi"), // ﬃ
    ('\u{FB04}', "ffl"), // ﬄ
];

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\n\r\t]+").unwrap())
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Clean text into single-spaced printable ASCII.
///
/// Steps: line breaks and tabs become spaces, NFKD decomposition, explicit
/// ligature expansion, removal of everything outside printable ASCII, then
/// whitespace collapse and trim. The result is lossy on purpose (accents
/// and non-Latin glyphs vanish) and `clean(clean(x)) == clean(x)`.
pub fn clean(text: &str) -> String {
    let text = line_breaks().replace_all(text, " ");

    let mut ascii = String::with_capacity(text.len());
    for c in text.nfkd() {
        if let Some((_, expansion)) = LIGATURES.iter().find(|(lig, _)| *lig == c) {
            ascii.push_str(expansion);
        } else if c.is_ascii_graphic() || c.is_ascii_whitespace() {
            ascii.push(c);
        }
    }

    whitespace_runs().replace_all(&ascii, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean("  Hello\n\n\tworld\r\n  again "), "Hello world again");
    }

    #[test]
    fn test_clean_expands_ligatures() {
        assert_eq!(clean("\u{FB01}nal e\u{FB00}ort \u{FB03}x \u{FB04}y \u{FB02}ow"), "final effort ffix ffly flow");
    }

    #[test]
    fn test_clean_strips_non_ascii() {
        assert_eq!(clean("Café — résumé"), "Cafe resume");
        assert_eq!(clean("数据 Analysis"), "Analysis");
        assert_eq!(clean("a\u{00A0}b"), "a b");
    }

    #[test]
    fn test_clean_drops_control_characters() {
        assert_eq!(clean("bell\u{0007}ring\u{000C}page"), "bellring page");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = [
            "",
            "   ",
            "Simple",
            "\u{FB01}rst  \u{00E9}t\u{00E9}\n\n2024",
            "tab\tseparated\r\nlines",
            "Ａｂｃ fullwidth",
            "x\u{0301}\u{0302} combining",
            "ends with space ",
        ];
        for s in samples {
            let once = clean(s);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", s);
        }
    }
}
