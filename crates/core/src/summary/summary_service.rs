use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::summary_calculator::{member_holdings, summarize_class, summarize_classes};
use super::summary_model::{MemberHoldings, SecurityClassSummary};
use crate::errors::Result;
use crate::members::MemberRepositoryTrait;
use crate::securities::SecurityClassRepositoryTrait;
use crate::transactions::{LedgerError, TransactionRepositoryTrait};

pub trait SummaryServiceTrait: Send + Sync {
    fn get_security_summary(
        &self,
        entity_id: &str,
        include_archived: bool,
    ) -> Result<Vec<SecurityClassSummary>>;

    /// Summary restricted to transactions posted on or before `as_of` (UTC day).
    fn get_security_summary_as_of(
        &self,
        entity_id: &str,
        include_archived: bool,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<SecurityClassSummary>>;

    fn get_member_holdings(
        &self,
        entity_id: &str,
        security_class_id: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<MemberHoldings>;
}

/// Read-only aggregator over the ledger.
pub struct SummaryService {
    classes: Arc<dyn SecurityClassRepositoryTrait>,
    members: Arc<dyn MemberRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
}

impl SummaryService {
    pub fn new(
        classes: Arc<dyn SecurityClassRepositoryTrait>,
        members: Arc<dyn MemberRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            classes,
            members,
            transactions,
        }
    }
}

impl SummaryServiceTrait for SummaryService {
    fn get_security_summary(
        &self,
        entity_id: &str,
        include_archived: bool,
    ) -> Result<Vec<SecurityClassSummary>> {
        self.get_security_summary_as_of(entity_id, include_archived, None)
    }

    fn get_security_summary_as_of(
        &self,
        entity_id: &str,
        include_archived: bool,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<SecurityClassSummary>> {
        let classes = self.classes.list_by_entity(entity_id, include_archived)?;
        let history = self.transactions.list_by_entity(entity_id, None)?;
        debug!(
            "Summarising {} class(es) over {} transaction(s) for entity {}",
            classes.len(),
            history.len(),
            entity_id
        );
        summarize_classes(&classes, &history, as_of)
    }

    fn get_member_holdings(
        &self,
        entity_id: &str,
        security_class_id: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<MemberHoldings> {
        let class = self
            .classes
            .get_by_id(security_class_id)?
            .filter(|c| c.entity_id == entity_id)
            .ok_or_else(|| LedgerError::SecurityClassNotFound(security_class_id.to_string()))?;
        let history = self
            .transactions
            .list_by_entity(entity_id, Some(security_class_id))?;

        let names: HashMap<String, String> = self
            .members
            .list_by_entity(entity_id)?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();
        let mut holdings = member_holdings(&class.id, &history, as_of)?;
        for holding in &mut holdings {
            holding.member_name = names.get(&holding.member_id).cloned();
        }

        let total_quantity = summarize_class(&class, &history, as_of)?.total_quantity;
        Ok(MemberHoldings {
            security_class_id: class.id,
            as_of,
            total_quantity,
            holdings,
        })
    }
}
