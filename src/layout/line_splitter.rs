//! Splitting a visual text line into column pieces.
//!
//! Page-level detection cannot help when the extractor already merged text
//! from two columns into one line. [`LineSplitter`] works on a single line
//! and runs a chain of [`SplitStrategy`] implementations over it:
//!
//! 1. [`GapSplit`] cuts the line at wide horizontal gaps between fragments,
//!    with guards against splitting ordinary wide sentences.
//! 2. [`ClusterRescue`] looks for single fragments that still span most of
//!    the page and splits their characters into left and right halves.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;

use super::cluster::two_means;
use super::options::SplitThresholds;
use crate::model::{BBox, Fragment, Glyph};

/// One step of the line splitting chain.
///
/// A strategy receives the pieces produced so far and returns a new
/// partition of the same fragments.
pub trait SplitStrategy: Send + Sync + fmt::Debug {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Refine the current pieces of a line.
    fn apply(&self, pieces: Vec<Vec<Fragment>>, page_width: f32) -> Vec<Vec<Fragment>>;
}

/// Splits one visual line into column pieces.
#[derive(Debug)]
pub struct LineSplitter {
    strategies: Vec<Box<dyn SplitStrategy>>,
}

impl LineSplitter {
    /// Create a splitter running gap splitting and then cluster rescue.
    pub fn new(thresholds: SplitThresholds) -> Self {
        Self {
            strategies: vec![
                Box::new(GapSplit::new(thresholds.clone())),
                Box::new(ClusterRescue::new(thresholds)),
            ],
        }
    }

    /// Create a splitter with no strategies.
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy to the chain.
    pub fn with_strategy(mut self, strategy: Box<dyn SplitStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Names of the strategies, in execution order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Split a line into pieces, leftmost first.
    ///
    /// The pieces always partition the input fragments.
    pub fn split(&self, line: Vec<Fragment>, page_width: f32) -> Vec<Vec<Fragment>> {
        if line.is_empty() {
            return Vec::new();
        }

        let mut pieces = vec![line];
        for strategy in &self.strategies {
            let before = pieces.len();
            pieces = strategy.apply(pieces, page_width);
            if pieces.len() != before {
                log::debug!(
                    "{} split line into {} pieces",
                    strategy.name(),
                    pieces.len()
                );
            }
        }
        pieces
    }
}

impl Default for LineSplitter {
    fn default() -> Self {
        Self::new(SplitThresholds::default())
    }
}

/// Splits a line at wide gaps between consecutive fragments.
#[derive(Debug, Clone)]
pub struct GapSplit {
    thresholds: SplitThresholds,
    connectives: Regex,
}

impl GapSplit {
    /// Create a gap splitter.
    pub fn new(thresholds: SplitThresholds) -> Self {
        Self {
            thresholds,
            connectives: Regex::new(concat!(
                r"(?i)\b(and|or|but|because|although|though|which|that|when|while",
                r"|if|so|yet|nor|since|unless|whereas)\b",
                r"|和|但|因为|所以|而且",
            ))
            .expect("connective pattern is valid"),
        }
    }

    fn split_line(&self, line: Vec<Fragment>, page_width: f32) -> Vec<Vec<Fragment>> {
        if line.len() <= self.thresholds.max_unsplit_fragments
            || !(page_width.is_finite() && page_width > 0.0)
        {
            return vec![line];
        }

        let (mut positioned, floating): (Vec<Fragment>, Vec<Fragment>) = line
            .iter()
            .cloned()
            .partition(|f| f.usable_bbox().is_some());
        positioned.sort_by(|a, b| a.left().partial_cmp(&b.left()).unwrap_or(Ordering::Equal));

        let candidates = self.candidate_gaps(&positioned, page_width);
        let cuts: Vec<usize> = match candidates.as_slice() {
            [] => return vec![line],
            [(index, gap)] => {
                if !self.accept_single(&positioned, *index, *gap, page_width) {
                    return vec![line];
                }
                vec![*index]
            }
            many => many.iter().map(|(index, _)| *index).collect(),
        };

        let mut pieces = Vec::with_capacity(cuts.len() + 1);
        let mut rest = positioned;
        for &cut in cuts.iter().rev() {
            let tail = rest.split_off(cut);
            pieces.push(tail);
        }
        pieces.push(rest);
        pieces.reverse();

        if let Some(first) = pieces.first_mut() {
            first.extend(floating);
        }
        pieces
    }

    /// Indices where a new piece would start, with the gap before each.
    fn candidate_gaps(&self, positioned: &[Fragment], page_width: f32) -> Vec<(usize, f32)> {
        let min_gap = page_width * self.thresholds.candidate_gap_ratio;
        let mut candidates = Vec::new();
        let mut right_edge = f32::NEG_INFINITY;

        for (i, fragment) in positioned.iter().enumerate() {
            let Some(bbox) = fragment.usable_bbox() else {
                continue;
            };
            if i > 0 {
                let gap = bbox.x0 - right_edge;
                if gap > min_gap {
                    candidates.push((i, gap));
                }
            }
            right_edge = right_edge.max(bbox.x1);
        }
        candidates
    }

    fn accept_single(
        &self,
        positioned: &[Fragment],
        index: usize,
        gap: f32,
        page_width: f32,
    ) -> bool {
        if gap <= page_width * self.thresholds.single_split_gap_ratio {
            return false;
        }

        let (left, right) = positioned.split_at(index);
        let min_fragments = self.thresholds.min_piece_fragments;
        if left.len() < min_fragments || right.len() < min_fragments {
            return false;
        }

        let min_chars = self.thresholds.min_piece_chars;
        if visible_chars(left) < min_chars || visible_chars(right) < min_chars {
            return false;
        }

        !self.looks_like_broken_sentence(positioned)
    }

    /// Short text containing a connective word is probably one sentence.
    fn looks_like_broken_sentence(&self, fragments: &[Fragment]) -> bool {
        let text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        visible_chars(fragments) < self.thresholds.sentence_max_chars
            && self.connectives.is_match(&text)
    }
}

impl SplitStrategy for GapSplit {
    fn name(&self) -> &'static str {
        "gap_split"
    }

    fn apply(&self, pieces: Vec<Vec<Fragment>>, page_width: f32) -> Vec<Vec<Fragment>> {
        pieces
            .into_iter()
            .flat_map(|piece| self.split_line(piece, page_width))
            .collect()
    }
}

/// Splits oversized fragments whose characters form two horizontal clusters.
#[derive(Debug, Clone)]
pub struct ClusterRescue {
    thresholds: SplitThresholds,
}

impl ClusterRescue {
    /// Create a cluster rescue strategy.
    pub fn new(thresholds: SplitThresholds) -> Self {
        Self { thresholds }
    }

    /// Try to split one fragment into left and right halves.
    ///
    /// Returns `None` when the fragment is not oversized, has no glyph
    /// positions, or a half would keep fewer characters than allowed.
    pub fn rescue(&self, fragment: &Fragment, page_width: f32) -> Option<(Fragment, Fragment)> {
        let bbox = fragment.usable_bbox()?;
        if !(page_width > 0.0 && bbox.width() > page_width * self.thresholds.oversized_width_ratio)
        {
            return None;
        }
        if fragment.char_count() <= self.thresholds.oversized_min_chars
            || fragment.glyphs.is_empty()
        {
            return None;
        }

        let centers: Vec<f32> = fragment.glyphs.iter().map(Glyph::center_x).collect();
        let clusters = two_means(&centers)?;

        let (mut left, mut right): (Vec<Glyph>, Vec<Glyph>) = (Vec::new(), Vec::new());
        for (glyph, &high) in fragment.glyphs.iter().zip(&clusters.labels) {
            if high {
                right.push(*glyph);
            } else {
                left.push(*glyph);
            }
        }

        let min_side = self.thresholds.rescue_min_side_chars;
        let left = half_fragment(fragment, bbox, left, min_side)?;
        let right = half_fragment(fragment, bbox, right, min_side)?;
        Some((left, right))
    }

    /// Cut a piece at every rescued fragment.
    ///
    /// The left half closes the current piece and the right half opens the
    /// next one, so fragments left of a rescued run stay with its left half.
    /// Unpositioned fragments stay in the first piece.
    fn split_piece(&self, piece: Vec<Fragment>, page_width: f32) -> Vec<Vec<Fragment>> {
        let (mut positioned, floating): (Vec<Fragment>, Vec<Fragment>) =
            piece.into_iter().partition(|f| f.usable_bbox().is_some());
        positioned.sort_by(|a, b| a.left().partial_cmp(&b.left()).unwrap_or(Ordering::Equal));

        let mut pieces: Vec<Vec<Fragment>> = Vec::new();
        let mut current: Vec<Fragment> = Vec::new();
        for fragment in positioned {
            match self.rescue(&fragment, page_width) {
                Some((left, right)) => {
                    current.push(left);
                    pieces.push(std::mem::take(&mut current));
                    current.push(right);
                }
                None => current.push(fragment),
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }

        if let Some(first) = pieces.first_mut() {
            first.extend(floating);
        } else if !floating.is_empty() {
            pieces.push(floating);
        }
        pieces
    }
}

impl SplitStrategy for ClusterRescue {
    fn name(&self) -> &'static str {
        "cluster_rescue"
    }

    fn apply(&self, pieces: Vec<Vec<Fragment>>, page_width: f32) -> Vec<Vec<Fragment>> {
        let mut result = Vec::with_capacity(pieces.len());
        for piece in pieces {
            result.extend(self.split_piece(piece, page_width));
        }
        result
    }
}

/// Build one half of a rescued fragment from its glyphs.
fn half_fragment(
    source: &Fragment,
    bbox: &BBox,
    mut glyphs: Vec<Glyph>,
    min_chars: usize,
) -> Option<Fragment> {
    glyphs.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));
    let text: String = glyphs.iter().map(|g| g.ch).collect();
    let text = text.trim().to_string();
    if text.chars().count() < min_chars {
        return None;
    }

    let x0 = glyphs.iter().map(|g| g.x0).fold(f32::INFINITY, f32::min);
    let x1 = glyphs.iter().map(|g| g.x1).fold(f32::NEG_INFINITY, f32::max);

    let mut half = source.clone();
    half.text = text;
    half.bbox = Some(BBox::new(x0, bbox.y0, x1, bbox.y1));
    half.glyphs = glyphs;
    half.column_id = None;
    Some(half)
}

fn visible_chars(fragments: &[Fragment]) -> usize {
    fragments.iter().map(Fragment::visible_char_count).sum()
}
