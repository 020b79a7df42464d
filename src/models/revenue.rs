use serde::{Deserialize, Serialize};

/// Calendar order of the `month` column
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One month of revenue, in whole dollars
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Revenue {
    pub month: String,
    pub revenue: i32,
}

impl Revenue {
    pub fn new(month: &str, revenue: i32) -> Self {
        Self {
            month: month.to_string(),
            revenue,
        }
    }

    /// Sort key for charting; unknown month names sort after December
    pub fn month_index(&self) -> usize {
        MONTHS
            .iter()
            .position(|m| *m == self.month)
            .unwrap_or(MONTHS.len())
    }
}
