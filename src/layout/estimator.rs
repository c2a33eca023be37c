//! Column count estimation.
//!
//! Several independent voters each propose a column count for a page and a
//! plurality reducer picks the final answer. Every voter is a plain function
//! of the fragments, the page width and the thresholds, so new voters can be
//! registered on [`ColumnCountEstimator`] without touching the reducer.
//!
//! Built-in voters:
//! - [`gap_histogram_count`]: gutters in the distribution of left edges
//! - [`width_cluster_count`]: cluster separation and typical fragment width
//! - [`density_grid_count`]: dense bands in a coarse text-weight grid

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::cluster::two_means;
use super::options::ColumnThresholds;
use crate::model::Fragment;

/// Upper bound on density grid columns.
const MAX_GRID_COLUMNS: usize = 1000;

/// A column count voter.
pub type Voter = fn(&[Fragment], f32, &ColumnThresholds) -> usize;

/// Estimates how many text columns a page has.
#[derive(Debug, Clone)]
pub struct ColumnCountEstimator {
    voters: Vec<(&'static str, Voter)>,
    thresholds: ColumnThresholds,
}

impl ColumnCountEstimator {
    /// Create an estimator with the built-in voters.
    pub fn new(thresholds: ColumnThresholds) -> Self {
        Self {
            voters: vec![
                ("gap_histogram", gap_histogram_count as Voter),
                ("width_cluster", width_cluster_count as Voter),
                ("density_grid", density_grid_count as Voter),
            ],
            thresholds,
        }
    }

    /// Create an estimator with no voters.
    pub fn empty(thresholds: ColumnThresholds) -> Self {
        Self {
            voters: Vec::new(),
            thresholds,
        }
    }

    /// Register an additional voter.
    pub fn with_voter(mut self, name: &'static str, voter: Voter) -> Self {
        self.voters.push((name, voter));
        self
    }

    /// Names of the registered voters, in voting order.
    pub fn voter_names(&self) -> Vec<&'static str> {
        self.voters.iter().map(|(name, _)| *name).collect()
    }

    /// Run every voter and return the individual proposals.
    pub fn votes(&self, fragments: &[Fragment], page_width: f32) -> Vec<usize> {
        self.voters
            .iter()
            .map(|(name, voter)| {
                let vote = voter(fragments, page_width, &self.thresholds);
                let vote = clamp_count(vote, &self.thresholds);
                log::debug!("Voter {} proposes {} columns", name, vote);
                vote
            })
            .collect()
    }

    /// Estimate the column count of a page.
    ///
    /// Never fails. Returns 1 for fewer than two fragments, unusable page
    /// width, or when no voter is registered.
    pub fn estimate(&self, fragments: &[Fragment], page_width: f32) -> usize {
        if fragments.len() < 2 || !usable_width(page_width) {
            return 1;
        }

        let votes = self.votes(fragments, page_width);
        let count = clamp_count(plurality_vote(&votes), &self.thresholds);
        log::debug!("Column votes {:?} -> {} columns", votes, count);
        count
    }
}

impl Default for ColumnCountEstimator {
    fn default() -> Self {
        Self::new(ColumnThresholds::default())
    }
}

/// Pick the most frequent vote, preferring the smaller count on ties.
///
/// An empty vote list yields 1.
pub fn plurality_vote(votes: &[usize]) -> usize {
    let mut tally: BTreeMap<usize, usize> = BTreeMap::new();
    for &vote in votes {
        *tally.entry(vote).or_insert(0) += 1;
    }

    // BTreeMap iterates in ascending order, so the first maximum is the smallest count.
    let mut best: Option<(usize, usize)> = None;
    for (count, occurrences) in tally {
        match best {
            Some((_, top)) if occurrences <= top => {}
            _ => best = Some((count, occurrences)),
        }
    }
    best.map(|(count, _)| count).unwrap_or(1)
}

/// Voter based on gaps between fragment left edges.
///
/// A sparse histogram bin in the middle of the page means two columns.
/// Otherwise the average of the large left-edge gaps is mapped to a count.
pub fn gap_histogram_count(
    fragments: &[Fragment],
    page_width: f32,
    thresholds: &ColumnThresholds,
) -> usize {
    if !usable_width(page_width) {
        return 1;
    }

    let mut lefts: Vec<f32> = fragments.iter().filter_map(Fragment::left).collect();
    lefts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    lefts.dedup();
    if lefts.len() < 2 {
        return 1;
    }

    if has_central_gap_bin(&lefts, page_width, thresholds) {
        log::debug!("Sparse histogram bin in the page center, likely 2 columns");
        return 2;
    }

    let gaps: Vec<f32> = lefts
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|&gap| gap > thresholds.noise_floor)
        .collect();
    if gaps.is_empty() {
        return 1;
    }

    let mean_gap = gaps.iter().sum::<f32>() / gaps.len() as f32;
    let large_gaps: Vec<f32> = gaps
        .into_iter()
        .filter(|&gap| {
            gap > mean_gap * thresholds.large_gap_mean_factor
                || gap > page_width * thresholds.large_gap_ratio
        })
        .collect();
    if large_gaps.is_empty() {
        return 1;
    }

    let average = large_gaps.iter().sum::<f32>() / large_gaps.len() as f32;
    let count = if average > page_width * thresholds.two_column_gap_ratio {
        2
    } else if average > page_width * thresholds.three_column_gap_ratio {
        3
    } else {
        4
    };
    clamp_count(count, thresholds)
}

/// Check for a sparse histogram bin strictly inside the central band.
fn has_central_gap_bin(lefts: &[f32], page_width: f32, thresholds: &ColumnThresholds) -> bool {
    let bins = thresholds.max_histogram_bins.min(lefts.len() / 2 + 1).max(1);
    let bin_width = page_width / bins as f32;

    let mut histogram = vec![0usize; bins];
    for &x in lefts {
        if !(0.0..=page_width).contains(&x) {
            continue;
        }
        // Right edge is inclusive for the last bin.
        let index = ((x / bin_width) as usize).min(bins - 1);
        histogram[index] += 1;
    }

    let mean = histogram.iter().sum::<usize>() as f32 / bins as f32;
    let (band_start, band_end) = thresholds.gutter_band;

    histogram.iter().enumerate().any(|(i, &count)| {
        let left = i as f32 * bin_width;
        let right = (i + 1) as f32 * bin_width;
        (count as f32) < mean * thresholds.gap_bin_ratio
            && left > page_width * band_start
            && right < page_width * band_end
    })
}

/// Voter based on fragment centers and widths.
///
/// With enough fragments, two well separated clusters of centers mean two
/// columns. Otherwise narrow fragments suggest the page is divided into as
/// many columns as fit side by side.
pub fn width_cluster_count(
    fragments: &[Fragment],
    page_width: f32,
    thresholds: &ColumnThresholds,
) -> usize {
    if !usable_width(page_width) {
        return 1;
    }

    let boxes: Vec<_> = fragments.iter().filter_map(Fragment::usable_bbox).collect();
    if boxes.is_empty() {
        return 1;
    }

    if boxes.len() > thresholds.min_cluster_fragments {
        let centers: Vec<f32> = boxes.iter().map(|b| b.center_x()).collect();
        if let Some(clusters) = two_means(&centers) {
            log::debug!(
                "Center clusters at {:.1} and {:.1}",
                clusters.low_center,
                clusters.high_center
            );
            if clusters.separation() > page_width * thresholds.cluster_separation_ratio {
                return 2;
            }
        }
    }

    let mean_width = boxes.iter().map(|b| b.width()).sum::<f32>() / boxes.len() as f32;
    if mean_width <= 0.0 {
        return 1;
    }
    if mean_width < page_width * thresholds.narrow_width_ratio {
        let fitted = (page_width / (mean_width * thresholds.width_slack)).floor() as usize;
        return clamp_count(fitted, thresholds);
    }
    1
}

/// Voter based on text weight per grid column.
///
/// Each fragment adds its character count to every grid cell its box
/// overlaps. Runs of adjacent grid columns whose total weight exceeds a
/// fraction of the mean form bands, and the band count is the vote.
pub fn density_grid_count(
    fragments: &[Fragment],
    page_width: f32,
    thresholds: &ColumnThresholds,
) -> usize {
    if !usable_width(page_width) {
        return 1;
    }

    let Some((cell, grid_columns)) = grid_shape(page_width, thresholds.grid_cell) else {
        return 1;
    };
    let mut totals = vec![0.0f32; grid_columns];

    for fragment in fragments {
        let Some(bbox) = fragment.usable_bbox() else {
            continue;
        };
        let start = cell_index(bbox.x0, cell, grid_columns);
        let end = cell_index(bbox.x1, cell, grid_columns);
        // Rows do not affect column totals, but tall boxes cover more cells.
        let rows = ((bbox.y1 / cell).floor() - (bbox.y0 / cell).floor()).max(0.0) + 1.0;
        let weight = fragment.char_count().max(1) as f32 * rows;
        for total in &mut totals[start..=end] {
            *total += weight;
        }
    }

    let mean = totals.iter().sum::<f32>() / grid_columns as f32;
    if mean <= 0.0 {
        return 1;
    }
    let threshold = mean * thresholds.density_ratio;

    let mut bands = 0;
    let mut in_band = false;
    for &total in &totals {
        let dense = total > threshold;
        if dense && !in_band {
            bands += 1;
        }
        in_band = dense;
    }

    clamp_count(bands, thresholds)
}

/// Cell size and grid column count for a page.
///
/// Cells grow when the configured size would need more than
/// [`MAX_GRID_COLUMNS`] grid columns, so the grid stays bounded for any
/// finite page width.
fn grid_shape(page_width: f32, grid_cell: f32) -> Option<(f32, usize)> {
    if !(grid_cell.is_finite() && grid_cell > 0.0) {
        return None;
    }
    let cell = grid_cell.max(page_width / MAX_GRID_COLUMNS as f32);
    let grid_columns = ((page_width / cell) as usize).min(MAX_GRID_COLUMNS) + 1;
    Some((cell, grid_columns))
}

fn clamp_count(count: usize, thresholds: &ColumnThresholds) -> usize {
    count.clamp(1, thresholds.max_columns.max(1))
}

fn cell_index(x: f32, cell: f32, grid_columns: usize) -> usize {
    if x <= 0.0 {
        0
    } else {
        ((x / cell) as usize).min(grid_columns - 1)
    }
}

fn usable_width(page_width: f32) -> bool {
    page_width.is_finite() && page_width > 0.0
}
