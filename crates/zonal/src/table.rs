//! In-memory tabular result

use crate::stats::ZonalStatistic;
use serde::Serialize;

/// One row of a [`ZonalTable`]: a zone identifier and one value per
/// requested statistic, in the table's column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZonalRow {
    /// Zone identifier
    pub zone_id: i32,
    values: Vec<f64>,
}

impl ZonalRow {
    /// Statistic values in the table's column order
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Result of zonal aggregation: one row per distinct zone encountered,
/// one column per requested statistic plus the zone identifier.
///
/// Rows are emitted sorted by zone identifier for reproducibility, but
/// the output is grouped, not ordered: callers must not attach meaning to
/// row order. Internal sufficient statistics (sum of squares) never
/// appear as columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZonalTable {
    columns: Vec<ZonalStatistic>,
    rows: Vec<ZonalRow>,
}

impl ZonalTable {
    pub(crate) fn new(columns: Vec<ZonalStatistic>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub(crate) fn push_row(&mut self, zone_id: i32, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(ZonalRow { zone_id, values });
    }

    /// Statistic columns, in emission order
    pub fn columns(&self) -> &[ZonalStatistic] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[ZonalRow] {
        &self.rows
    }

    /// Number of zones in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Zone identifiers, in row order
    pub fn zone_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.iter().map(|row| row.zone_id)
    }

    /// Value for one zone/statistic pair, if both are present
    pub fn value(&self, zone_id: i32, stat: ZonalStatistic) -> Option<f64> {
        let col = self.columns.iter().position(|c| *c == stat)?;
        self.rows
            .iter()
            .find(|row| row.zone_id == zone_id)
            .map(|row| row.values[col])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_lookup() {
        let mut table = ZonalTable::new(vec![ZonalStatistic::Sum, ZonalStatistic::Count]);
        table.push_row(1, vec![10.0, 4.0]);
        table.push_row(2, vec![20.0, 8.0]);

        assert_eq!(table.value(1, ZonalStatistic::Sum), Some(10.0));
        assert_eq!(table.value(2, ZonalStatistic::Count), Some(8.0));
        assert_eq!(table.value(1, ZonalStatistic::Mean), None);
        assert_eq!(table.value(3, ZonalStatistic::Sum), None);
    }

    #[test]
    fn test_empty_table() {
        let table = ZonalTable::new(vec![ZonalStatistic::Sum]);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
