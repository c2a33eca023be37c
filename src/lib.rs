//! # colflow
//!
//! Column detection and reading-order reconstruction for positioned PDF text.
//!
//! PDF extractors emit text fragments tagged with bounding boxes but no
//! reading order. On multi-column pages naive extraction interleaves lines
//! from different columns. This library takes a page's fragments and its
//! geometry, works out how many columns the page has, and returns the
//! fragments in the order a person would read them.
//!
//! ## Quick Start
//!
//! ```
//! use colflow::{BBox, Fragment, LayoutEngine, Page};
//!
//! let page = Page::with_fragments(
//!     1,
//!     800.0,
//!     1000.0,
//!     vec![
//!         Fragment::new("left top", BBox::new(50.0, 100.0, 350.0, 120.0)),
//!         Fragment::new("right top", BBox::new(450.0, 100.0, 750.0, 120.0)),
//!         Fragment::new("left bottom", BBox::new(50.0, 300.0, 350.0, 320.0)),
//!         Fragment::new("right bottom", BBox::new(450.0, 300.0, 750.0, 320.0)),
//!     ],
//! );
//!
//! let result = LayoutEngine::new().process_page(page);
//! assert_eq!(result.column_count, 2);
//! assert_eq!(result.text(), "left top\nleft bottom\nright top\nright bottom");
//! ```
//!
//! ## Features
//!
//! - **Column count voting**: gap histogram, width clustering and density grid
//! - **Reading-order policies**: stacked columns or row-aligned
//! - **Region classification**: running headers, footers and titles
//! - **Line splitting**: separates lines merged across a gutter
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod batch;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use batch::{process_pages, BatchProcessor};
pub use error::{Error, Result};
pub use layout::{
    ColumnAssigner, ColumnCountEstimator, ColumnThresholds, DirectionPolicy, LayoutOptions,
    LayoutProcessor, LineSplitter, ReadingOrderComposer, ReadingOrderPolicy, RegionClassifier,
    RegionThresholds, SplitThresholds,
};
pub use model::{
    BBox, DocumentLayout, Fragment, Glyph, LayoutState, Page, PageResult, ReadingDirection,
    RegionKind,
};
pub use render::{PageSelection, RenderOptions};

/// Process a single page with default options.
///
/// # Example
///
/// ```
/// use colflow::{process_page, Page};
///
/// let result = process_page(Page::letter(1));
/// assert!(result.is_empty());
/// ```
pub fn process_page(page: Page) -> PageResult {
    LayoutProcessor::default().process(page)
}

/// Process pages and join them into plain text with default options.
///
/// Headers and footers are removed from the output.
pub fn extract_text(pages: Vec<Page>) -> String {
    let layout = process_pages(pages, &LayoutOptions::default());
    render::to_text(&layout, &RenderOptions::default())
}

/// Builder for layout processing and text assembly.
///
/// # Example
///
/// ```
/// use colflow::{LayoutEngine, Page, ReadingOrderPolicy};
///
/// let text = LayoutEngine::new()
///     .with_reading_order(ReadingOrderPolicy::RowAligned)
///     .keep_headers_footers()
///     .sequential()
///     .build()?
///     .process(vec![Page::letter(1)])
///     .to_text();
/// assert!(text.is_empty());
/// # Ok::<(), colflow::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    layout_options: LayoutOptions,
    render_options: RenderOptions,
}

impl LayoutEngine {
    /// Create a new engine builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given layout options.
    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.layout_options = options;
        self
    }

    /// Use the given render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set the reading-order policy.
    pub fn with_reading_order(mut self, policy: ReadingOrderPolicy) -> Self {
        self.layout_options = self.layout_options.with_reading_order(policy);
        self
    }

    /// Set the reading direction policy.
    pub fn with_direction(mut self, direction: DirectionPolicy) -> Self {
        self.layout_options = self.layout_options.with_direction(direction);
        self
    }

    /// Disable column detection.
    pub fn without_columns(mut self) -> Self {
        self.layout_options = self.layout_options.without_columns();
        self
    }

    /// Group word fragments into lines before column detection.
    pub fn with_line_assembly(mut self) -> Self {
        self.layout_options = self.layout_options.with_line_assembly(true);
        self
    }

    /// Keep headers and footers in the text output.
    pub fn keep_headers_footers(mut self) -> Self {
        self.render_options = self.render_options.with_headers_footers_removed(false);
        self
    }

    /// Set the maximum number of page workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.layout_options = self.layout_options.with_workers(workers);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.layout_options = self.layout_options.sequential();
        self
    }

    /// Set page selection for text output.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Process one page without validating options.
    pub fn process_page(&self, page: Page) -> PageResult {
        LayoutProcessor::new(self.layout_options.clone()).process(page)
    }

    /// Validate options and build a reusable processor.
    pub fn build(self) -> Result<ConfiguredEngine> {
        self.layout_options.validate()?;
        Ok(ConfiguredEngine {
            batch: BatchProcessor::new(self.layout_options),
            render_options: self.render_options,
        })
    }
}

/// A validated engine ready to process pages.
#[derive(Debug)]
pub struct ConfiguredEngine {
    batch: BatchProcessor,
    render_options: RenderOptions,
}

impl ConfiguredEngine {
    /// Process pages into a document layout.
    pub fn process(&self, pages: Vec<Page>) -> EngineResult<'_> {
        EngineResult {
            layout: self.batch.process(pages),
            render_options: &self.render_options,
        }
    }
}

/// Result of processing a batch of pages.
#[derive(Debug)]
pub struct EngineResult<'a> {
    /// The processed layout
    pub layout: DocumentLayout,
    render_options: &'a RenderOptions,
}

impl EngineResult<'_> {
    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.layout, self.render_options)
    }

    /// Get the document layout.
    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    /// Take ownership of the document layout.
    pub fn into_layout(self) -> DocumentLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_builder() {
        let engine = LayoutEngine::new()
            .with_reading_order(ReadingOrderPolicy::RowAligned)
            .keep_headers_footers()
            .sequential();

        assert_eq!(
            engine.layout_options.reading_order,
            ReadingOrderPolicy::RowAligned
        );
        assert!(!engine.render_options.remove_headers_footers);
        assert_eq!(engine.layout_options.max_workers, 1);
    }

    #[test]
    fn test_engine_default() {
        let engine = LayoutEngine::default();
        assert!(engine.layout_options.detect_columns);
        assert!(engine.render_options.remove_headers_footers);
    }

    #[test]
    fn test_build_rejects_invalid_options() {
        let options = LayoutOptions::new().with_header_footer_band(0.9);
        let result = LayoutEngine::new().with_options(options).build();
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_process_empty_page() {
        let result = process_page(Page::new(1, 612.0, 792.0));
        assert!(result.is_empty());
        assert_eq!(result.layout_state, LayoutState::Raw);
    }

    #[test]
    fn test_extract_text() {
        let page = Page::with_fragments(
            1,
            600.0,
            600.0,
            vec![
                Fragment::new("Header", BBox::new(0.0, 0.0, 100.0, 30.0)),
                Fragment::new("Body text", BBox::new(50.0, 200.0, 550.0, 220.0)),
                Fragment::new("Footer", BBox::new(0.0, 570.0, 100.0, 600.0)),
            ],
        );
        assert_eq!(extract_text(vec![page]), "Body text");
    }
}
