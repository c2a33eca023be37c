//! Partitioning fragments into columns.

use crate::error::{Error, Result};
use crate::model::Fragment;

/// Assigns fragments to uniform page-width column bands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnAssigner;

impl ColumnAssigner {
    /// Create a new column assigner.
    pub fn new() -> Self {
        Self
    }

    /// Partition fragments into `column_count` columns.
    ///
    /// Each fragment goes to the band containing its horizontal center and has
    /// its `column_id` set. Fragments without a usable bounding box go to
    /// column 0. Centers outside the page go to the nearest edge band.
    pub fn assign(
        &self,
        fragments: Vec<Fragment>,
        page_width: f32,
        column_count: usize,
    ) -> Result<Vec<Vec<Fragment>>> {
        if column_count == 0 {
            return Err(Error::LayoutDetection(
                "cannot assign fragments to zero columns".to_string(),
            ));
        }
        if !(page_width.is_finite() && page_width > 0.0) {
            return Err(Error::LayoutDetection(format!(
                "invalid page width {}",
                page_width
            )));
        }

        let band_width = page_width / column_count as f32;
        let mut columns: Vec<Vec<Fragment>> = vec![Vec::new(); column_count];

        for mut fragment in fragments {
            let index = fragment
                .center_x()
                .map(|center| band_index(center, band_width, column_count))
                .unwrap_or(0);
            fragment.column_id = Some(index);
            columns[index].push(fragment);
        }

        log::debug!(
            "Fragments per column: {:?}",
            columns.iter().map(|c| c.len()).collect::<Vec<_>>()
        );

        Ok(columns)
    }
}

/// Band containing `center`; a center on a boundary belongs to the band on its right.
fn band_index(center: f32, band_width: f32, column_count: usize) -> usize {
    if center <= 0.0 {
        return 0;
    }
    ((center / band_width) as usize).min(column_count - 1)
}
