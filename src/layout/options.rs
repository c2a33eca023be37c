//! Layout options and tunable thresholds.
//!
//! Every ratio below is a fraction of the page width or height. The defaults
//! work for typical academic papers, patents and newsletters; they are
//! exposed because different producers lay out gutters very differently.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::composer::ReadingOrderPolicy;

/// Smallest density grid cell accepted by validation, in page units.
const MIN_GRID_CELL: f32 = 1.0;

/// Options for per-page layout processing.
///
/// Options deserialize with defaults for missing fields, so a tuned profile
/// only needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Classify running headers and footers
    pub detect_headers_footers: bool,

    /// Classify large-font fragments as titles
    pub detect_titles: bool,

    /// Detect columns and reorder fragments
    pub detect_columns: bool,

    /// Group word fragments into visual lines before column detection
    pub assemble_lines: bool,

    /// How columns are linearized
    pub reading_order: ReadingOrderPolicy,

    /// How the reading direction is chosen
    pub direction: DirectionPolicy,

    /// Maximum top-edge difference for fragments in one row (row-aligned order)
    pub row_tolerance: f32,

    /// Maximum number of page workers (1 = sequential)
    pub max_workers: usize,

    /// Column count estimation thresholds
    pub columns: ColumnThresholds,

    /// Header/footer/title classification thresholds
    pub regions: RegionThresholds,

    /// Line splitting thresholds
    pub splitting: SplitThresholds,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable header/footer detection.
    pub fn with_headers_footers(mut self, detect: bool) -> Self {
        self.detect_headers_footers = detect;
        self
    }

    /// Enable or disable title detection.
    pub fn with_titles(mut self, detect: bool) -> Self {
        self.detect_titles = detect;
        self
    }

    /// Enable or disable column detection.
    pub fn with_columns(mut self, detect: bool) -> Self {
        self.detect_columns = detect;
        self
    }

    /// Disable column detection.
    pub fn without_columns(mut self) -> Self {
        self.detect_columns = false;
        self
    }

    /// Enable or disable line assembly.
    pub fn with_line_assembly(mut self, assemble: bool) -> Self {
        self.assemble_lines = assemble;
        self
    }

    /// Set the reading-order policy.
    pub fn with_reading_order(mut self, policy: ReadingOrderPolicy) -> Self {
        self.reading_order = policy;
        self
    }

    /// Use row-aligned reading order.
    pub fn row_aligned(mut self) -> Self {
        self.reading_order = ReadingOrderPolicy::RowAligned;
        self
    }

    /// Set the reading direction policy.
    pub fn with_direction(mut self, direction: DirectionPolicy) -> Self {
        self.direction = direction;
        self
    }

    /// Set the row-grouping tolerance.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Set the header/footer band as a fraction of page height.
    pub fn with_header_footer_band(mut self, band: f32) -> Self {
        self.regions.band = band;
        self
    }

    /// Set the maximum number of page workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    /// Process pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.max_workers = 1;
        self
    }

    /// Set column estimation thresholds.
    pub fn with_column_thresholds(mut self, thresholds: ColumnThresholds) -> Self {
        self.columns = thresholds;
        self
    }

    /// Set region classification thresholds.
    pub fn with_region_thresholds(mut self, thresholds: RegionThresholds) -> Self {
        self.regions = thresholds;
        self
    }

    /// Set line splitting thresholds.
    pub fn with_split_thresholds(mut self, thresholds: SplitThresholds) -> Self {
        self.splitting = thresholds;
        self
    }

    /// Check that all values are in range.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::InvalidOptions(
                "max_workers must be greater than 0".to_string(),
            ));
        }
        non_negative("row_tolerance", self.row_tolerance)?;
        self.columns.validate()?;
        self.regions.validate()?;
        self.splitting.validate()
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            detect_headers_footers: true,
            detect_titles: true,
            detect_columns: true,
            assemble_lines: false,
            reading_order: ReadingOrderPolicy::StackedColumns,
            direction: DirectionPolicy::Auto,
            row_tolerance: 10.0,
            max_workers: 4,
            columns: ColumnThresholds::default(),
            regions: RegionThresholds::default(),
            splitting: SplitThresholds::default(),
        }
    }
}

/// How the horizontal reading direction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionPolicy {
    /// Guess from the script of the page text
    #[default]
    Auto,
    /// Always read left to right
    LeftToRight,
    /// Always read right to left
    RightToLeft,
}

/// Thresholds for the column count voters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnThresholds {
    /// Highest column count any voter may report
    pub max_columns: usize,
    /// Left-edge gaps at or below this many units are noise
    pub noise_floor: f32,
    /// A gap is large above this multiple of the mean significant gap
    pub large_gap_mean_factor: f32,
    /// A gap is large above this fraction of page width
    pub large_gap_ratio: f32,
    /// Average large gap above this ratio means two columns
    pub two_column_gap_ratio: f32,
    /// Average large gap above this ratio means three columns
    pub three_column_gap_ratio: f32,
    /// Upper bound on histogram bins
    pub max_histogram_bins: usize,
    /// Bins below this fraction of the mean count are gap bins
    pub gap_bin_ratio: f32,
    /// Central band (start, end) in which a gap bin marks a gutter
    pub gutter_band: (f32, f32),
    /// Two-means clustering runs only with more fragments than this
    pub min_cluster_fragments: usize,
    /// Cluster centers further apart than this ratio mean two columns
    pub cluster_separation_ratio: f32,
    /// Mean fragment width below this ratio suggests several columns
    pub narrow_width_ratio: f32,
    /// Slack applied to the mean width when dividing the page
    pub width_slack: f32,
    /// Density grid cell size in page units
    pub grid_cell: f32,
    /// Grid columns above this fraction of the mean weight are dense
    pub density_ratio: f32,
}

impl ColumnThresholds {
    fn validate(&self) -> Result<()> {
        if self.max_columns == 0 {
            return Err(Error::InvalidOptions(
                "max_columns must be greater than 0".to_string(),
            ));
        }
        if self.max_histogram_bins == 0 {
            return Err(Error::InvalidOptions(
                "max_histogram_bins must be greater than 0".to_string(),
            ));
        }
        if !(self.grid_cell.is_finite() && self.grid_cell >= MIN_GRID_CELL) {
            return Err(Error::InvalidOptions(format!(
                "grid_cell must be at least {}, got {}",
                MIN_GRID_CELL, self.grid_cell
            )));
        }
        non_negative("noise_floor", self.noise_floor)?;
        non_negative("large_gap_mean_factor", self.large_gap_mean_factor)?;
        non_negative("width_slack", self.width_slack)?;
        ratio("large_gap_ratio", self.large_gap_ratio)?;
        ratio("two_column_gap_ratio", self.two_column_gap_ratio)?;
        ratio("three_column_gap_ratio", self.three_column_gap_ratio)?;
        ratio("gap_bin_ratio", self.gap_bin_ratio)?;
        ratio("gutter_band.0", self.gutter_band.0)?;
        ratio("gutter_band.1", self.gutter_band.1)?;
        ratio("cluster_separation_ratio", self.cluster_separation_ratio)?;
        ratio("narrow_width_ratio", self.narrow_width_ratio)?;
        ratio("density_ratio", self.density_ratio)
    }
}

impl Default for ColumnThresholds {
    fn default() -> Self {
        Self {
            max_columns: 4,
            noise_floor: 20.0,
            large_gap_mean_factor: 1.1,
            large_gap_ratio: 0.2,
            two_column_gap_ratio: 0.15,
            three_column_gap_ratio: 0.08,
            max_histogram_bins: 20,
            gap_bin_ratio: 0.4,
            gutter_band: (0.25, 0.75),
            min_cluster_fragments: 10,
            cluster_separation_ratio: 0.3,
            narrow_width_ratio: 0.45,
            width_slack: 1.1,
            grid_cell: 50.0,
            density_ratio: 0.3,
        }
    }
}

/// Thresholds for header, footer and title classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionThresholds {
    /// Header/footer band as a fraction of page height
    pub band: f32,
    /// Fragments taller than this fraction of page height are body text
    pub max_height_ratio: f32,
    /// Fragments wider than this fraction of page width are body text
    pub max_width_ratio: f32,
    /// Shortest text counted as short header/footer text
    pub min_chars: usize,
    /// Longest text counted as short header/footer text
    pub max_chars: usize,
    /// Centering tolerance as a fraction of page width
    pub center_tolerance: f32,
    /// Font sizes below this are typical of running heads
    pub small_font_size: f32,
    /// Font sizes above this are titles
    pub title_font_size: f32,
}

impl RegionThresholds {
    fn validate(&self) -> Result<()> {
        if !(self.band > 0.0 && self.band < 0.5) {
            return Err(Error::InvalidOptions(format!(
                "band must be in (0, 0.5), got {}",
                self.band
            )));
        }
        if self.min_chars > self.max_chars {
            return Err(Error::InvalidOptions(
                "min_chars must not exceed max_chars".to_string(),
            ));
        }
        ratio("max_height_ratio", self.max_height_ratio)?;
        ratio("max_width_ratio", self.max_width_ratio)?;
        ratio("center_tolerance", self.center_tolerance)?;
        non_negative("small_font_size", self.small_font_size)?;
        non_negative("title_font_size", self.title_font_size)
    }
}

impl Default for RegionThresholds {
    fn default() -> Self {
        Self {
            band: 0.05,
            max_height_ratio: 0.3,
            max_width_ratio: 0.8,
            min_chars: 2,
            max_chars: 200,
            center_tolerance: 0.1,
            small_font_size: 12.0,
            title_font_size: 14.0,
        }
    }
}

/// Thresholds for splitting a visual line into column pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitThresholds {
    /// Gaps wider than this fraction of page width are split candidates
    pub candidate_gap_ratio: f32,
    /// A lone candidate must be wider than this fraction of page width
    pub single_split_gap_ratio: f32,
    /// Lines with this many fragments or fewer are never split
    pub max_unsplit_fragments: usize,
    /// A lone split needs at least this many fragments per piece
    pub min_piece_fragments: usize,
    /// A lone split needs at least this many visible characters per piece
    pub min_piece_chars: usize,
    /// Joined text shorter than this may be one sentence across the gap
    pub sentence_max_chars: usize,
    /// Fragments wider than this fraction of page width are oversized
    pub oversized_width_ratio: f32,
    /// Oversized fragments need more characters than this to be rescued
    pub oversized_min_chars: usize,
    /// Each rescued half keeps at least this many characters
    pub rescue_min_side_chars: usize,
}

impl SplitThresholds {
    fn validate(&self) -> Result<()> {
        ratio("candidate_gap_ratio", self.candidate_gap_ratio)?;
        ratio("single_split_gap_ratio", self.single_split_gap_ratio)?;
        ratio("oversized_width_ratio", self.oversized_width_ratio)
    }
}

impl Default for SplitThresholds {
    fn default() -> Self {
        Self {
            candidate_gap_ratio: 0.15,
            single_split_gap_ratio: 0.20,
            max_unsplit_fragments: 3,
            min_piece_fragments: 2,
            min_piece_chars: 3,
            sentence_max_chars: 80,
            oversized_width_ratio: 0.6,
            oversized_min_chars: 10,
            rescue_min_side_chars: 3,
        }
    }
}

fn ratio(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidOptions(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOptions(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )))
    }
}
