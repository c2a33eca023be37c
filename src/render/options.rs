//! Text assembly options.

use std::ops::RangeInclusive;

/// Options for joining page results into text.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Drop running headers and footers
    pub remove_headers_footers: bool,

    /// Collapse runs of whitespace
    pub normalize_whitespace: bool,

    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Replace ligature characters (fi, fl, etc.) with plain letters
    pub fix_ligatures: bool,

    /// Separator inserted between pages
    pub page_separator: String,

    /// Page selection
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep or drop headers and footers.
    pub fn with_headers_footers_removed(mut self, remove: bool) -> Self {
        self.remove_headers_footers = remove;
        self
    }

    /// Enable or disable whitespace normalization.
    pub fn with_whitespace_normalization(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Enable or disable ligature replacement.
    pub fn with_ligature_fix(mut self, fix: bool) -> Self {
        self.fix_ligatures = fix;
        self
    }

    /// Set the page separator.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Output text exactly as extracted, headers and footers included.
    pub fn verbatim() -> Self {
        Self {
            remove_headers_footers: false,
            normalize_whitespace: false,
            normalize_unicode: false,
            fix_ligatures: false,
            ..Self::default()
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            remove_headers_footers: true,
            normalize_whitespace: true,
            normalize_unicode: true,
            fix_ligatures: false,
            page_separator: "\n\n".to_string(),
            page_selection: PageSelection::All,
        }
    }
}

/// Page selection for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Render specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page(start)?;
                let end = parse_page(end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(parse_page(start)?..=parse_page(end)?),
                None => pages.push(parse_page(part)?),
            }
        }
        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("Invalid page number: {}", s.trim()))
}
