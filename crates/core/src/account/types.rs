//! Account metric data types.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot of one trading account's financial state.
///
/// Monetary fields accept JSON numbers or strings and serialize as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMetric {
    /// Record identifier, when the source assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Broker account number.
    pub account_number: String,
    /// Account balance.
    pub balance: Decimal,
    /// Account equity.
    pub equity: Decimal,
    /// Floating profit/loss of open positions.
    pub floating: Decimal,
    /// Used margin.
    pub margin: Decimal,
    /// Free margin.
    pub free_margin: Decimal,
    /// Margin level.
    pub margin_level: Decimal,
    /// Number of open positions.
    pub open_positions: i64,
    /// Snapshot time, ISO-8601 expected.
    pub created_at: String,
}

impl AccountMetric {
    /// Parse `created_at` as an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the stored string is not RFC 3339.
    pub fn created_at_parsed(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.created_at)
    }
}
