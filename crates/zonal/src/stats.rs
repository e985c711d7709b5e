//! Statistic selection
//!
//! The set of statistics a caller can request, and the validated,
//! duplicate-free selection passed to aggregation. Parsing happens once,
//! before any tile is read, so a typo fails fast instead of after a full
//! raster scan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use terrastat_core::{Error, Result};

/// Available zonal statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZonalStatistic {
    /// Sum of values
    Sum,
    /// Number of contributing pixels
    Count,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
    /// Arithmetic mean
    Mean,
    /// Standard deviation (population)
    Std,
}

impl ZonalStatistic {
    /// Every supported statistic, in canonical column order
    pub const ALL: [ZonalStatistic; 6] = [
        ZonalStatistic::Sum,
        ZonalStatistic::Count,
        ZonalStatistic::Min,
        ZonalStatistic::Max,
        ZonalStatistic::Mean,
        ZonalStatistic::Std,
    ];

    /// Column name in the result table
    pub fn name(self) -> &'static str {
        match self {
            ZonalStatistic::Sum => "sum",
            ZonalStatistic::Count => "count",
            ZonalStatistic::Min => "min",
            ZonalStatistic::Max => "max",
            ZonalStatistic::Mean => "mean",
            ZonalStatistic::Std => "std",
        }
    }
}

impl fmt::Display for ZonalStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ZonalStatistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(ZonalStatistic::Sum),
            "count" => Ok(ZonalStatistic::Count),
            "min" => Ok(ZonalStatistic::Min),
            "max" => Ok(ZonalStatistic::Max),
            "mean" => Ok(ZonalStatistic::Mean),
            "std" | "stddev" | "std_dev" => Ok(ZonalStatistic::Std),
            other => Err(Error::InvalidParameter {
                name: "stats",
                value: other.to_string(),
                reason: "unknown statistic".to_string(),
            }),
        }
    }
}

/// Ordered, duplicate-free selection of statistics to emit.
///
/// Order is preserved and becomes the column order of the result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatSelection {
    stats: Vec<ZonalStatistic>,
}

impl StatSelection {
    /// Build a selection, dropping duplicates while preserving order
    pub fn new(stats: impl IntoIterator<Item = ZonalStatistic>) -> Self {
        let mut unique = Vec::new();
        for stat in stats {
            if !unique.contains(&stat) {
                unique.push(stat);
            }
        }
        Self { stats: unique }
    }

    /// Parse a selection from statistic names, failing on the first
    /// unknown name
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = Vec::new();
        for name in names {
            stats.push(name.as_ref().parse()?);
        }
        Ok(Self::new(stats))
    }

    /// Selected statistics in emission order
    pub fn iter(&self) -> impl Iterator<Item = ZonalStatistic> + '_ {
        self.stats.iter().copied()
    }

    /// Number of selected statistics
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Whether a statistic is selected
    pub fn contains(&self, stat: ZonalStatistic) -> bool {
        self.stats.contains(&stat)
    }

    /// Selected statistics as a vector
    pub fn to_vec(&self) -> Vec<ZonalStatistic> {
        self.stats.clone()
    }
}

impl Default for StatSelection {
    /// Sum only
    fn default() -> Self {
        Self {
            stats: vec![ZonalStatistic::Sum],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        let sel = StatSelection::parse(["sum", "mean", "std"]).unwrap();
        assert_eq!(
            sel.to_vec(),
            vec![ZonalStatistic::Sum, ZonalStatistic::Mean, ZonalStatistic::Std]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_name() {
        let result = StatSelection::parse(["sum", "median"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let sel = StatSelection::parse(["sum", "sum", "count"]).unwrap();
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn test_default_is_sum() {
        let sel = StatSelection::default();
        assert_eq!(sel.to_vec(), vec![ZonalStatistic::Sum]);
    }

    #[test]
    fn test_std_aliases() {
        assert_eq!("stddev".parse::<ZonalStatistic>().unwrap(), ZonalStatistic::Std);
        assert_eq!("std_dev".parse::<ZonalStatistic>().unwrap(), ZonalStatistic::Std);
    }
}
