//! Line assembly from word-level fragments.
//!
//! Some extractors emit one fragment per word. Column detection works better
//! on line-sized fragments, so word fragments are grouped into visual lines,
//! each line is split into column pieces, and every piece is merged back into
//! a single fragment.

use std::cmp::Ordering;

use super::line_splitter::LineSplitter;
use crate::model::Fragment;

/// Vertical tolerance as a fraction of font size.
const LINE_TOLERANCE: f32 = 0.3;

/// Font size assumed when a fragment has neither font size nor height.
const FALLBACK_FONT_SIZE: f32 = 10.0;

/// Group fragments into visual lines, top to bottom.
///
/// Fragments whose top edges differ by at most 30 % of the font size share a
/// line. Fragments without a usable bounding box each form their own line,
/// after all positioned lines.
pub fn group_into_lines(fragments: Vec<Fragment>) -> Vec<Vec<Fragment>> {
    let (mut positioned, floating): (Vec<Fragment>, Vec<Fragment>) =
        fragments.into_iter().partition(|f| f.usable_bbox().is_some());

    positioned.sort_by(|a, b| {
        let y_cmp = a.top().partial_cmp(&b.top()).unwrap_or(Ordering::Equal);
        if y_cmp == Ordering::Equal {
            a.left().partial_cmp(&b.left()).unwrap_or(Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<Vec<Fragment>> = Vec::new();
    let mut current: Vec<Fragment> = Vec::new();
    let mut current_y: Option<f32> = None;

    for fragment in positioned {
        let y = fragment.top().unwrap_or(0.0);
        let tolerance = font_size(&fragment) * LINE_TOLERANCE;

        match current_y {
            Some(line_y) if (y - line_y).abs() <= tolerance => current.push(fragment),
            _ => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current_y = Some(y);
                current.push(fragment);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.extend(floating.into_iter().map(|f| vec![f]));
    lines
}

/// Merge the fragments of one line piece into a single fragment.
///
/// Text is joined left to right with a space between fragments, except
/// between two characters of scripts written without spaces. The bounding
/// box is the union of the parts and font attributes come from the part
/// carrying the most characters. Returns `None` for an empty piece.
pub fn merge_piece(mut piece: Vec<Fragment>) -> Option<Fragment> {
    if piece.len() <= 1 {
        return piece.pop();
    }

    piece.sort_by(|a, b| a.left().partial_cmp(&b.left()).unwrap_or(Ordering::Equal));

    let dominant = piece
        .iter()
        .enumerate()
        .max_by_key(|(i, f)| (f.visible_char_count(), std::cmp::Reverse(*i)))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut merged = piece[dominant].clone();
    merged.text = join_texts(&piece);
    merged.bbox = piece
        .iter()
        .filter_map(Fragment::usable_bbox)
        .copied()
        .reduce(|a, b| a.union(&b));
    merged.glyphs = piece.iter().flat_map(|f| f.glyphs.iter().copied()).collect();
    merged.column_id = None;
    Some(merged)
}

/// Group word fragments into lines, split each line into column pieces and
/// merge every piece into one fragment.
///
/// Fragments that are already line pieces pass through unchanged, so
/// assembling a page twice gives the same pieces.
pub fn assemble_lines(
    fragments: Vec<Fragment>,
    page_width: f32,
    splitter: &LineSplitter,
) -> Vec<Fragment> {
    let before = fragments.len();
    let (mut assembled, words): (Vec<Fragment>, Vec<Fragment>) =
        fragments.into_iter().partition(|f| f.line_assembled);
    let kept = assembled.len();

    assembled.extend(
        group_into_lines(words)
            .into_iter()
            .flat_map(|line| splitter.split(line, page_width))
            .filter_map(merge_piece)
            .map(|mut piece| {
                piece.line_assembled = true;
                piece
            }),
    );

    log::debug!(
        "Assembled {} fragments into {} line pieces ({} already assembled)",
        before,
        assembled.len(),
        kept
    );
    assembled
}

fn font_size(fragment: &Fragment) -> f32 {
    fragment
        .font_size
        .filter(|size| *size > 0.0)
        .or_else(|| fragment.usable_bbox().map(|b| b.height()).filter(|h| *h > 0.0))
        .unwrap_or(FALLBACK_FONT_SIZE)
}

fn join_texts(piece: &[Fragment]) -> String {
    let mut result = String::new();
    for fragment in piece {
        let text = fragment.text.as_str();
        if let (Some(prev), Some(next)) = (result.chars().last(), text.chars().next()) {
            let needs_space = !prev.is_whitespace()
                && !next.is_whitespace()
                && !(is_spaceless_script_char(prev) && is_spaceless_script_char(next));
            if needs_space {
                result.push(' ');
            }
        }
        result.push_str(text);
    }
    result
}

/// Characters of scripts written without spaces between words.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Glyph};

    fn word(text: &str, x0: f32, y0: f32, x1: f32) -> Fragment {
        Fragment::new(text, BBox::new(x0, y0, x1, y0 + 10.0)).with_font_size(10.0)
    }

    /// Glyphs laid out evenly across [x0, x1].
    fn spread(text: &str, x0: f32, x1: f32) -> Vec<Glyph> {
        let step = (x1 - x0) / text.chars().count() as f32;
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                let start = x0 + i as f32 * step;
                Glyph::new(ch, start, start + step * 0.8)
            })
            .collect()
    }

    #[test]
    fn test_group_into_lines() {
        let fragments = vec![
            word("world", 60.0, 101.0, 90.0),
            word("next", 10.0, 120.0, 40.0),
            word("hello", 10.0, 100.0, 50.0),
            Fragment::unpositioned("floating"),
        ];
        let lines = group_into_lines(fragments);
        let texts: Vec<Vec<&str>> = lines
            .iter()
            .map(|l| l.iter().map(|f| f.text.as_str()).collect())
            .collect();
        assert_eq!(texts, vec![vec!["hello", "world"], vec!["next"], vec!["floating"]]);
    }

    #[test]
    fn test_merge_piece() {
        let piece = vec![
            word("column", 60.0, 100.0, 110.0).with_font_family("Times-Bold"),
            word("Left", 10.0, 100.0, 50.0),
        ];
        let merged = merge_piece(piece).unwrap();
        assert_eq!(merged.text, "Left column");
        assert_eq!(merged.bbox, Some(BBox::new(10.0, 100.0, 110.0, 110.0)));
        assert!(merged.is_bold);
        assert!(merged.column_id.is_none());
    }

    #[test]
    fn test_merge_cjk_without_spaces() {
        let piece = vec![word("多栏", 10.0, 100.0, 30.0), word("布局", 32.0, 100.0, 52.0)];
        assert_eq!(merge_piece(piece).unwrap().text, "多栏布局");
    }

    #[test]
    fn test_merge_empty_and_single() {
        assert!(merge_piece(Vec::new()).is_none());
        let single = word("alone", 10.0, 100.0, 50.0);
        assert_eq!(merge_piece(vec![single.clone()]), Some(single));
    }

    #[test]
    fn test_assemble_two_column_line() {
        let fragments = vec![
            word("Results", 50.0, 100.0, 110.0),
            word("show", 115.0, 100.0, 150.0),
            word("Method", 450.0, 100.0, 510.0),
            word("details", 515.0, 100.0, 570.0),
        ];
        let assembled = assemble_lines(fragments, 800.0, &LineSplitter::default());
        let texts: Vec<&str> = assembled.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Results show", "Method details"]);
        assert!(assembled.iter().all(|f| f.line_assembled));
    }

    #[test]
    fn test_assembled_pieces_are_not_merged_again() {
        let fragments = vec![
            word("Results", 50.0, 100.0, 110.0),
            word("show", 115.0, 100.0, 150.0),
            word("Method", 450.0, 100.0, 510.0),
            word("details", 515.0, 100.0, 570.0),
        ];
        let splitter = LineSplitter::default();
        let first = assemble_lines(fragments, 800.0, &splitter);
        let second = assemble_lines(first.clone(), 800.0, &splitter);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rescued_halves_stay_separate_pieces() {
        let text = "Alpha beta gammaDelta epsilon";
        let mut glyphs = spread("Alpha beta gamma", 40.0, 330.0);
        glyphs.extend(spread("Delta epsilon", 450.0, 700.0));
        let merged = Fragment::new(text, BBox::new(40.0, 100.0, 700.0, 112.0)).with_glyphs(glyphs);
        let tail = Fragment::new("end", BBox::new(710.0, 100.0, 740.0, 112.0));

        let assembled = assemble_lines(vec![merged, tail], 800.0, &LineSplitter::default());
        let texts: Vec<&str> = assembled.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha beta gamma", "Delta epsilon end"]);
    }
}
