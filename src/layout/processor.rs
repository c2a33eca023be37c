//! Per-page layout pipeline.

use crate::error::{Error, Result};
use crate::model::{Fragment, LayoutState, Page, PageResult, ReadingDirection};

use super::assigner::ColumnAssigner;
use super::composer::ReadingOrderComposer;
use super::direction::detect_reading_direction;
use super::estimator::ColumnCountEstimator;
use super::line_splitter::LineSplitter;
use super::lines::assemble_lines;
use super::options::{DirectionPolicy, LayoutOptions};
use super::region::RegionClassifier;

/// Turns a page of raw fragments into fragments in reading order.
///
/// Processing never fails. When column reordering runs into an error the
/// page keeps its extraction order and is reported as [`LayoutState::Raw`].
#[derive(Debug)]
pub struct LayoutProcessor {
    options: LayoutOptions,
    classifier: RegionClassifier,
    estimator: ColumnCountEstimator,
    assigner: ColumnAssigner,
    splitter: LineSplitter,
}

impl LayoutProcessor {
    /// Create a processor from options.
    pub fn new(options: LayoutOptions) -> Self {
        let classifier = RegionClassifier::new(options.regions.clone())
            .with_headers_footers(options.detect_headers_footers)
            .with_titles(options.detect_titles);
        let estimator = ColumnCountEstimator::new(options.columns.clone());
        let splitter = LineSplitter::new(options.splitting.clone());

        Self {
            options,
            classifier,
            estimator,
            assigner: ColumnAssigner::new(),
            splitter,
        }
    }

    /// Replace the column count estimator.
    pub fn with_estimator(mut self, estimator: ColumnCountEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Replace the line splitter used by line assembly.
    pub fn with_splitter(mut self, splitter: LineSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Get the options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Process one page.
    pub fn process(&self, page: Page) -> PageResult {
        let has_geometry = page.has_geometry();
        let Page {
            number,
            width,
            height,
            fragments,
        } = page;
        let mut result = PageResult::new(number, width, height);

        let mut fragments: Vec<Fragment> =
            fragments.into_iter().filter(|f| !f.is_blank()).collect();
        if fragments.is_empty() {
            return result;
        }

        if self.options.assemble_lines && has_geometry {
            fragments = assemble_lines(fragments, width, &self.splitter);
        }

        if self.options.detect_headers_footers || self.options.detect_titles {
            self.classifier.classify_all(&mut fragments, width, height);
        }

        result.direction = self.resolve_direction(&fragments);

        if !self.options.detect_columns || fragments.len() < 2 || !has_geometry {
            result.fragments = fragments;
            return result;
        }

        let column_count = self.estimator.estimate(&fragments, width);
        if column_count <= 1 {
            log::debug!("Page {}: single column, keeping extraction order", number);
            result.fragments = fragments;
            return result;
        }

        self.apply_columns(&mut result, fragments, column_count);
        result
    }

    /// Reorder fragments into `column_count` columns, keeping the original
    /// order when reordering fails.
    fn apply_columns(
        &self,
        result: &mut PageResult,
        mut fragments: Vec<Fragment>,
        column_count: usize,
    ) {
        match self.reorder(fragments.clone(), result.width, column_count, result.direction) {
            Ok(ordered) => {
                log::debug!("Page {}: reordered {} columns", result.number, column_count);
                result.fragments = ordered;
                result.column_count = column_count;
                result.layout_state = LayoutState::ColumnReordered;
            }
            Err(e) => {
                log::warn!(
                    "Page {}: column detection failed, using original order: {}",
                    result.number,
                    e
                );
                for fragment in &mut fragments {
                    fragment.column_id = None;
                }
                result.fragments = fragments;
                result.column_count = 1;
                result.layout_state = LayoutState::Raw;
            }
        }
    }

    fn resolve_direction(&self, fragments: &[Fragment]) -> ReadingDirection {
        match self.options.direction {
            DirectionPolicy::Auto => detect_reading_direction(fragments),
            DirectionPolicy::LeftToRight => ReadingDirection::LeftToRight,
            DirectionPolicy::RightToLeft => ReadingDirection::RightToLeft,
        }
    }

    fn reorder(
        &self,
        fragments: Vec<Fragment>,
        width: f32,
        column_count: usize,
        direction: ReadingDirection,
    ) -> Result<Vec<Fragment>> {
        let expected = fragments.len();
        let columns = self.assigner.assign(fragments, width, column_count)?;

        let composer = ReadingOrderComposer::new(self.options.reading_order)
            .with_row_tolerance(self.options.row_tolerance)
            .with_direction(direction);
        let ordered = composer.compose(columns);

        if ordered.len() != expected {
            return Err(Error::LayoutDetection(format!(
                "composition returned {} of {} fragments",
                ordered.len(),
                expected
            )));
        }
        Ok(ordered)
    }
}

impl Default for LayoutProcessor {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}
