//! Summary module - holdings and tranche summaries folded from the ledger.
//!
//! Nothing here writes; every figure is recomputed from the transaction
//! history on each call.

mod summary_calculator;
mod summary_model;
mod summary_service;

#[cfg(test)]
mod summary_service_tests;

pub use summary_calculator::{member_holdings, summarize_class, summarize_classes};
pub use summary_model::{MemberHolding, MemberHoldings, SecurityClassSummary, TrancheSummary};
pub use summary_service::{SummaryService, SummaryServiceTrait};
