use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::serde_formats::timestamp_format;

/// ISSUE transactions sharing one tranche number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrancheSummary {
    pub tranche_number: String,
    pub quantity: i64,
    pub total_amount_paid: Decimal,
    pub total_amount_unpaid: Decimal,
    /// Posted date of the first issue folded into the tranche
    #[serde(with = "timestamp_format")]
    pub issue_date: DateTime<Utc>,
    pub allocation_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityClassSummary {
    pub security_class_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub is_archived: bool,
    pub total_quantity: i64,
    pub total_amount_paid: Decimal,
    pub total_amount_unpaid: Decimal,
    pub member_count: usize,
    pub tranche_count: usize,
    pub tranches: Vec<TrancheSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberHolding {
    pub member_id: String,
    pub member_name: Option<String>,
    pub quantity: i64,
}

/// Holdings of one class at a point in time. `holdings` sums to `total_quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberHoldings {
    pub security_class_id: String,
    pub as_of: Option<NaiveDate>,
    pub total_quantity: i64,
    pub holdings: Vec<MemberHolding>,
}
