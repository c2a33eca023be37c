//! Character-level text normalization.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::RenderOptions;

/// Ligature characters and their plain-letter replacements.
const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Normalizes fragment and page text.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    normalize_unicode: bool,
    fix_ligatures: bool,
    normalize_whitespace: bool,
    whitespace: Regex,
}

impl TextCleaner {
    /// Create a cleaner from render options.
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            normalize_unicode: options.normalize_unicode,
            fix_ligatures: options.fix_ligatures,
            normalize_whitespace: options.normalize_whitespace,
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Normalize characters without touching whitespace.
    pub fn normalize_chars(&self, text: &str) -> String {
        let mut result: String = if self.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                if result.contains(*ligature) {
                    result = result.replace(*ligature, replacement);
                }
            }
        }

        // Replacement characters carry no text.
        result.retain(|c| c != '\u{FFFD}');
        result
    }

    /// Collapse every whitespace run, line breaks included, to one space.
    pub fn collapse(&self, text: &str) -> String {
        if self.normalize_whitespace {
            self.whitespace.replace_all(text, " ").trim().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(&RenderOptions::default())
    }
}
