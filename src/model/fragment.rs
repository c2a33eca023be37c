//! Positioned text fragments.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Check that all edges are finite and the box is not inverted.
    pub fn is_usable(&self) -> bool {
        self.x0.is_finite()
            && self.y0.is_finite()
            && self.x1.is_finite()
            && self.y1.is_finite()
            && self.x0 <= self.x1
            && self.y0 <= self.y1
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Horizontal extent of a single character inside a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// The character
    pub ch: char,
    /// Left edge
    pub x0: f32,
    /// Right edge
    pub x1: f32,
}

impl Glyph {
    /// Create a new glyph.
    pub fn new(ch: char, x0: f32, x1: f32) -> Self {
        Self { ch, x0, x1 }
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Semantic region a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Regular body text
    #[default]
    Body,
    /// Large-font title text
    Title,
    /// Running header in the top band
    Header,
    /// Running footer in the bottom band
    Footer,
}

impl RegionKind {
    /// Check if this is a running header or footer.
    pub fn is_header_or_footer(&self) -> bool {
        matches!(self, RegionKind::Header | RegionKind::Footer)
    }
}

/// A positioned span of text, the atomic unit of layout analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// The text content
    pub text: String,

    /// Bounding box, if the extractor produced one
    pub bbox: Option<BBox>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Font family (e.g., "Helvetica-Bold")
    pub font_family: Option<String>,

    /// Whether the font appears to be bold
    pub is_bold: bool,

    /// Whether the font appears to be italic
    pub is_italic: bool,

    /// Region classification
    pub region_kind: RegionKind,

    /// Column index assigned during layout (0 = leftmost)
    pub column_id: Option<usize>,

    /// Per-character horizontal positions, when the extractor supplies them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub glyphs: Vec<Glyph>,

    /// Whether this fragment is a line piece produced by line assembly
    #[serde(default)]
    pub line_assembled: bool,
}

impl Fragment {
    /// Create a fragment with a bounding box.
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox: Some(bbox),
            font_size: None,
            font_family: None,
            is_bold: false,
            is_italic: false,
            region_kind: RegionKind::Body,
            column_id: None,
            glyphs: Vec::new(),
            line_assembled: false,
        }
    }

    /// Create a fragment without position information.
    pub fn unpositioned(text: impl Into<String>) -> Self {
        Self {
            bbox: None,
            ..Self::new(text, BBox::new(0.0, 0.0, 0.0, 0.0))
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the font family and derive bold/italic flags from its name.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        let family = family.into();
        let lower = family.to_lowercase();
        self.is_bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        self.is_italic = lower.contains("italic") || lower.contains("oblique");
        self.font_family = Some(family);
        self
    }

    /// Attach per-character positions.
    pub fn with_glyphs(mut self, glyphs: Vec<Glyph>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Bounding box, if present and geometrically valid.
    pub fn usable_bbox(&self) -> Option<&BBox> {
        self.bbox.as_ref().filter(|b| b.is_usable())
    }

    /// Horizontal center of the usable bounding box.
    pub fn center_x(&self) -> Option<f32> {
        self.usable_bbox().map(BBox::center_x)
    }

    /// Top edge of the usable bounding box.
    pub fn top(&self) -> Option<f32> {
        self.usable_bbox().map(|b| b.y0)
    }

    /// Left edge of the usable bounding box.
    pub fn left(&self) -> Option<f32> {
        self.usable_bbox().map(|b| b.x0)
    }

    /// Number of characters in the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of non-whitespace characters in the text.
    pub fn visible_char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Check if the text is blank.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
