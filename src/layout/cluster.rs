//! One-dimensional two-means clustering.

use std::cmp::Ordering;

const MAX_ITERATIONS: usize = 50;

/// Result of splitting values into two clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoMeans {
    /// Mean of the lower cluster
    pub low_center: f32,
    /// Mean of the upper cluster
    pub high_center: f32,
    /// For each input value, whether it belongs to the upper cluster
    pub labels: Vec<bool>,
}

impl TwoMeans {
    /// Distance between the two cluster centers.
    pub fn separation(&self) -> f32 {
        self.high_center - self.low_center
    }

    /// Number of values in the upper cluster.
    pub fn high_count(&self) -> usize {
        self.labels.iter().filter(|&&high| high).count()
    }
}

/// Split values into two clusters.
///
/// Centers start at the minimum and maximum, so the result is deterministic
/// for a given input. Returns `None` with fewer than two finite values or when
/// every value is identical.
pub fn two_means(values: &[f32]) -> Option<TwoMeans> {
    let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.len() < 2 || sorted.len() != values.len() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut low = sorted[0];
    let mut high = sorted[sorted.len() - 1];
    if high - low <= f32::EPSILON {
        return None;
    }

    // On sorted input every assignment is a prefix/suffix split.
    let mut split = sorted.len();
    for _ in 0..MAX_ITERATIONS {
        let midpoint = (low + high) / 2.0;
        let next_split = sorted
            .iter()
            .position(|&v| v > midpoint)
            .unwrap_or(sorted.len());
        if next_split == 0 || next_split == sorted.len() {
            return None;
        }

        low = mean(&sorted[..next_split]);
        high = mean(&sorted[next_split..]);
        if next_split == split {
            break;
        }
        split = next_split;
    }

    let midpoint = (low + high) / 2.0;
    Some(TwoMeans {
        low_center: low,
        high_center: high,
        labels: values.iter().map(|&v| v > midpoint).collect(),
    })
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}
