//! Coarse reading direction guess from the script of the page text.

use unicode_bidi::{bidi_class, BidiClass};

use crate::model::{Fragment, ReadingDirection};

/// Share of strong right-to-left letters above which a page reads right to left.
const RTL_SHARE: f32 = 0.3;

/// Guess the horizontal reading direction of a page.
///
/// Counts alphabetic characters with a strong right-to-left bidi class
/// (Hebrew, Arabic and related scripts). CJK text reads left to right.
pub fn detect_reading_direction(fragments: &[Fragment]) -> ReadingDirection {
    let mut letters = 0usize;
    let mut right_to_left = 0usize;

    for c in fragments.iter().flat_map(|f| f.text.chars()) {
        if !c.is_alphabetic() {
            continue;
        }
        letters += 1;
        if matches!(bidi_class(c), BidiClass::R | BidiClass::AL) {
            right_to_left += 1;
        }
    }

    if letters > 0 && right_to_left as f32 / letters as f32 > RTL_SHARE {
        ReadingDirection::RightToLeft
    } else {
        ReadingDirection::LeftToRight
    }
}
