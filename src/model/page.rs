//! Page-level types.

use super::{Fragment, RegionKind};
use serde::{Deserialize, Serialize};

/// A single page as handed over by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (0 = unknown geometry)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Fragments in raw extraction order
    pub fragments: Vec<Fragment>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            fragments: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Create a new page with standard A4 size (210 x 297 mm).
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0) // 210mm * 2.834, 297mm * 2.834
    }

    /// Create a page with fragments.
    pub fn with_fragments(number: u32, width: f32, height: f32, fragments: Vec<Fragment>) -> Self {
        Self {
            number,
            width,
            height,
            fragments,
        }
    }

    /// Add a fragment to the page.
    pub fn add_fragment(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Check whether the page geometry can drive layout detection.
    pub fn has_geometry(&self) -> bool {
        self.width.is_finite() && self.width > 0.0
    }

    /// Check if the page is empty (no fragments).
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}

/// Whether a page's fragments were reordered by column detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutState {
    /// Extraction order, no column reordering performed
    #[default]
    Raw,
    /// Fragments were partitioned into columns and linearized
    ColumnReordered,
}

/// Horizontal reading direction of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingDirection {
    /// Latin, CJK and most other scripts
    #[default]
    LeftToRight,
    /// Arabic, Hebrew and other right-to-left scripts
    RightToLeft,
}

/// The result of processing one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Fragments in reading order
    pub fragments: Vec<Fragment>,

    /// Number of detected columns (1 when no reordering happened)
    pub column_count: usize,

    /// Layout processing state
    pub layout_state: LayoutState,

    /// Reading direction used for composition
    pub direction: ReadingDirection,

    /// Whether processing failed and this is a placeholder
    #[serde(default)]
    pub failed: bool,
}

impl PageResult {
    /// Create a raw result for a page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            fragments: Vec::new(),
            column_count: 1,
            layout_state: LayoutState::Raw,
            direction: ReadingDirection::LeftToRight,
            failed: false,
        }
    }

    /// Empty result substituted for a page whose processing failed.
    pub fn placeholder(number: u32) -> Self {
        Self {
            failed: true,
            ..Self::new(number, 0.0, 0.0)
        }
    }

    /// Check if the page was reordered by column.
    pub fn is_column_reordered(&self) -> bool {
        self.layout_state == LayoutState::ColumnReordered
    }

    /// Check if the page has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments with the given region kind, in reading order.
    pub fn fragments_of(&self, kind: RegionKind) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(move |f| f.region_kind == kind)
    }

    /// Fragment texts joined with newlines.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
