//! Column detection and reading-order reconstruction.
//!
//! The per-page pipeline lives in [`LayoutProcessor`]:
//!
//! 1. optional line assembly ([`assemble_lines`] with a [`LineSplitter`])
//! 2. region classification ([`RegionClassifier`])
//! 3. column count estimation ([`ColumnCountEstimator`])
//! 4. column assignment ([`ColumnAssigner`])
//! 5. reading-order composition ([`ReadingOrderComposer`])
//!
//! Each stage is usable on its own.

mod assigner;
mod cluster;
mod composer;
mod direction;
mod estimator;
mod line_splitter;
mod lines;
mod options;
mod processor;
mod region;

pub use assigner::ColumnAssigner;
pub use cluster::{two_means, TwoMeans};
pub use composer::{ReadingOrderComposer, ReadingOrderPolicy};
pub use direction::detect_reading_direction;
pub use estimator::{
    density_grid_count, gap_histogram_count, plurality_vote, width_cluster_count,
    ColumnCountEstimator, Voter,
};
pub use line_splitter::{ClusterRescue, GapSplit, LineSplitter, SplitStrategy};
pub use lines::{assemble_lines, group_into_lines, merge_piece};
pub use options::{
    ColumnThresholds, DirectionPolicy, LayoutOptions, RegionThresholds, SplitThresholds,
};
pub use processor::LayoutProcessor;
pub use region::RegionClassifier;
