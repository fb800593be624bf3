// src/normalize/text.rs
// =============================================================================
// Text clean-up for every string column of the dataset.
//
// Two steps:
// 1. Remove zero-width characters (Weibo sprinkles U+200B into nicknames
//    and descriptions, and they break downstream tooling)
// 2. Drop every character the output charset cannot represent. Dropped,
//    not replaced: there is no '?' or U+FFFD marker in the output.
//
// With the default UTF-8 output step 2 keeps everything, since a Rust
// String is always valid UTF-8.
// =============================================================================

use serde::Deserialize;

const ZERO_WIDTH: [char; 5] = [
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // zero width no-break space / BOM
];

/// Character set the dataset is written for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum OutputCharset {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8", alias = "UTF-8")]
    Utf8,
    #[serde(rename = "ascii", alias = "ASCII")]
    Ascii,
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl OutputCharset {
    fn can_encode(self, c: char) -> bool {
        match self {
            OutputCharset::Utf8 => true,
            OutputCharset::Ascii => c.is_ascii(),
            OutputCharset::Latin1 => (c as u32) <= 0xFF,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextSanitizer {
    charset: OutputCharset,
}

impl TextSanitizer {
    pub fn new(charset: OutputCharset) -> Self {
        Self { charset }
    }

    /// Returns `raw` without zero-width characters and without anything the
    /// output charset can't encode. Idempotent.
    pub fn clean(&self, raw: &str) -> String {
        raw.chars()
            .filter(|c| !ZERO_WIDTH.contains(c))
            .filter(|c| self.charset.can_encode(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_zero_width_characters() {
        let sanitizer = TextSanitizer::default();
        assert_eq!(sanitizer.clean("微\u{200B}博\u{200D}用户"), "微博用户");
        assert_eq!(sanitizer.clean("\u{FEFF}hello\u{2060}"), "hello");
    }

    #[test]
    fn test_utf8_keeps_everything_else() {
        let sanitizer = TextSanitizer::new(OutputCharset::Utf8);
        assert_eq!(sanitizer.clean("北京 🐼 café"), "北京 🐼 café");
    }

    #[test]
    fn test_narrow_charsets_drop_instead_of_replacing() {
        let ascii = TextSanitizer::new(OutputCharset::Ascii);
        assert_eq!(ascii.clean("Beijing 北京 café"), "Beijing  caf");

        let latin1 = TextSanitizer::new(OutputCharset::Latin1);
        assert_eq!(latin1.clean("café 北京"), "café ");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = ["", "plain", "a\u{200B}b\u{200B}", "混合 mixed 🐼\u{200C}", "é\u{FEFF}"];
        for charset in [OutputCharset::Utf8, OutputCharset::Ascii, OutputCharset::Latin1] {
            let sanitizer = TextSanitizer::new(charset);
            for sample in samples {
                let once = sanitizer.clean(sample);
                assert_eq!(sanitizer.clean(&once), once);
            }
        }
    }

    #[test]
    fn test_charset_names_from_config() {
        let charset: OutputCharset = serde_json::from_str("\"latin-1\"").unwrap();
        assert_eq!(charset, OutputCharset::Latin1);
        let charset: OutputCharset = serde_json::from_str("\"utf8\"").unwrap();
        assert_eq!(charset, OutputCharset::Utf8);
    }
}
