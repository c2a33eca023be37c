//! Linearizing columns into reading order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Fragment, ReadingDirection};

/// How columns are turned into a single fragment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrderPolicy {
    /// Read each column top to bottom, then move to the next column.
    /// Suits continuous prose: papers, patents, reports.
    #[default]
    StackedColumns,
    /// Read across all columns row by row.
    /// Suits tabular and form-like layouts.
    RowAligned,
}

/// Composes column lists into a reading-order sequence.
#[derive(Debug, Clone)]
pub struct ReadingOrderComposer {
    policy: ReadingOrderPolicy,
    row_tolerance: f32,
    direction: ReadingDirection,
}

impl ReadingOrderComposer {
    /// Create a composer for the given policy.
    pub fn new(policy: ReadingOrderPolicy) -> Self {
        Self {
            policy,
            row_tolerance: 10.0,
            direction: ReadingDirection::LeftToRight,
        }
    }

    /// Set the maximum top-edge difference within one row.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Set the horizontal reading direction.
    pub fn with_direction(mut self, direction: ReadingDirection) -> Self {
        self.direction = direction;
        self
    }

    /// The configured policy.
    pub fn policy(&self) -> ReadingOrderPolicy {
        self.policy
    }

    /// Linearize columns (leftmost first) into reading order.
    pub fn compose(&self, columns: Vec<Vec<Fragment>>) -> Vec<Fragment> {
        match self.policy {
            ReadingOrderPolicy::StackedColumns => self.compose_stacked(columns),
            ReadingOrderPolicy::RowAligned => self.compose_rows(columns),
        }
    }

    fn compose_stacked(&self, columns: Vec<Vec<Fragment>>) -> Vec<Fragment> {
        let mut sorted: Vec<Vec<Fragment>> = columns.into_iter().map(sort_column).collect();
        if self.direction == ReadingDirection::RightToLeft {
            sorted.reverse();
        }
        sorted.into_iter().flatten().collect()
    }

    fn compose_rows(&self, columns: Vec<Vec<Fragment>>) -> Vec<Fragment> {
        let (mut positioned, floating): (Vec<Fragment>, Vec<Fragment>) = columns
            .into_iter()
            .flatten()
            .partition(|f| f.usable_bbox().is_some());

        positioned.sort_by(|a, b| compare_top(a, b));

        let mut rows: Vec<Vec<Fragment>> = Vec::new();
        let mut anchor: Option<f32> = None;
        for fragment in positioned {
            let top = fragment.top().unwrap_or(0.0);
            match (anchor, rows.last_mut()) {
                (Some(y), Some(row)) if (top - y).abs() <= self.row_tolerance => {
                    row.push(fragment);
                }
                _ => {
                    anchor = Some(top);
                    rows.push(vec![fragment]);
                }
            }
        }

        let right_to_left = self.direction == ReadingDirection::RightToLeft;
        for row in &mut rows {
            row.sort_by(|a, b| {
                let ordering = compare_left(a, b);
                if right_to_left {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        if !floating.is_empty() {
            match rows.first_mut() {
                Some(first) => first.extend(floating),
                None => rows.push(floating),
            }
        }

        log::debug!("Grouped fragments into {} rows", rows.len());
        rows.into_iter().flatten().collect()
    }
}

impl Default for ReadingOrderComposer {
    fn default() -> Self {
        Self::new(ReadingOrderPolicy::default())
    }
}

/// Sort one column top to bottom, keeping unpositioned fragments last.
fn sort_column(column: Vec<Fragment>) -> Vec<Fragment> {
    let (mut positioned, floating): (Vec<Fragment>, Vec<Fragment>) =
        column.into_iter().partition(|f| f.usable_bbox().is_some());
    positioned.sort_by(compare_top);
    positioned.extend(floating);
    positioned
}

fn compare_top(a: &Fragment, b: &Fragment) -> Ordering {
    a.top()
        .partial_cmp(&b.top())
        .unwrap_or(Ordering::Equal)
}

fn compare_left(a: &Fragment, b: &Fragment) -> Ordering {
    a.left()
        .partial_cmp(&b.left())
        .unwrap_or(Ordering::Equal)
}
