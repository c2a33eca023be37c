//! Document-level types.

use std::time::Duration;

use super::{LayoutState, PageResult, RegionKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout results for a whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Page results in page-number order
    pub pages: Vec<PageResult>,

    /// Wall-clock time spent on layout processing
    pub processing_time: Duration,

    /// When processing finished
    pub extracted_at: DateTime<Utc>,
}

impl DocumentLayout {
    /// Create a document layout from page results.
    pub fn new(pages: Vec<PageResult>, processing_time: Duration) -> Self {
        Self {
            pages,
            processing_time,
            extracted_at: Utc::now(),
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, number: u32) -> Option<&PageResult> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of pages that were reordered by column.
    pub fn reordered_page_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.layout_state == LayoutState::ColumnReordered)
            .count()
    }

    /// Numbers of pages whose processing failed.
    pub fn failed_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| p.failed)
            .map(|p| p.number)
            .collect()
    }

    /// Text of all fragments with the given region kind, one per line.
    pub fn text_by_region(&self, kind: RegionKind) -> String {
        self.pages
            .iter()
            .flat_map(|p| p.fragments_of(kind))
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self::new(Vec::new(), Duration::ZERO)
    }
}
