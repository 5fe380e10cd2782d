#[cfg(test)]
mod tests {
    use crate::config::RegistryConfig;
    use crate::entities::Entity;
    use crate::members::{Member, MemberType};
    use crate::securities::SecurityClass;
    use crate::summary::{SummaryService, SummaryServiceTrait};
    use crate::transactions::{
        LedgerError, NewTransaction, TransactionService, TransactionServiceTrait,
        TransactionType,
    };
    use crate::unit_of_work::in_memory::InMemoryLedger;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn seeded() -> Arc<InMemoryLedger> {
        let ledger = Arc::new(InMemoryLedger::new());
        let now = Utc::now();
        ledger.with_state(|s| {
            s.entities.insert(
                "E1".to_string(),
                Entity {
                    id: "E1".to_string(),
                    name: "Acme".to_string(),
                    country: "AU".to_string(),
                    created_at: now,
                    updated_at: now,
                },
            );
            for (id, name) in [("SC1", "A Ordinary"), ("SC2", "B Preference")] {
                s.classes.insert(
                    id.to_string(),
                    SecurityClass {
                        id: id.to_string(),
                        entity_id: "E1".to_string(),
                        name: name.to_string(),
                        symbol: None,
                        has_voting_rights: true,
                        has_dividend_rights: true,
                        is_active: true,
                        is_archived: false,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
            for (id, name) in [("M1", "Alice"), ("M2", "Bob")] {
                s.members.insert(
                    id.to_string(),
                    Member {
                        id: id.to_string(),
                        entity_id: "E1".to_string(),
                        member_number: None,
                        member_type: MemberType::Individual,
                        name: name.to_string(),
                        email: None,
                        country: "AU".to_string(),
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        });
        ledger
    }

    async fn record(
        ledger: &Arc<InMemoryLedger>,
        transaction_type: TransactionType,
        from: Option<&str>,
        to: Option<&str>,
        quantity: u64,
        posted: (i32, u32, u32),
    ) {
        let writer = TransactionService::new(ledger.clone(), ledger.clone(), RegistryConfig::default());
        let mut new = NewTransaction::new("E1", "SC1", transaction_type, quantity);
        new.from_member_id = from.map(str::to_string);
        new.to_member_id = to.map(str::to_string);
        new.amount_paid_per_security = Some(dec!(0.75));
        new.amount_unpaid_per_security = Some(dec!(0.25));
        new.tranche_number = Some("T1".to_string());
        new.posted_date = Some(Utc.with_ymd_and_hms(posted.0, posted.1, posted.2, 10, 0, 0).unwrap());
        writer
            .create_transaction(Some("user-1".to_string()), new)
            .await
            .unwrap();
    }

    fn summary_service(ledger: &Arc<InMemoryLedger>) -> SummaryService {
        SummaryService::new(ledger.clone(), ledger.clone(), ledger.clone())
    }

    #[tokio::test]
    async fn test_summary_is_repeatable_and_covers_each_class() {
        let ledger = seeded();
        record(&ledger, TransactionType::Issue, None, Some("M1"), 1000, (2024, 1, 10)).await;
        record(&ledger, TransactionType::Cancellation, Some("M1"), None, 400, (2024, 2, 10)).await;

        let service = summary_service(&ledger);
        let first = service.get_security_summary("E1", false).unwrap();
        let second = service.get_security_summary("E1", false).unwrap();
        assert_eq!(first, second);

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].security_class_id, "SC1");
        assert_eq!(first[0].total_quantity, 600);
        assert_eq!(first[0].total_amount_paid, dec!(450));
        assert_eq!(first[0].total_amount_unpaid, dec!(150));
        assert_eq!(first[1].total_quantity, 0);
        assert!(first[1].tranches.is_empty());
    }

    #[tokio::test]
    async fn test_archived_classes_need_the_flag() {
        let ledger = seeded();
        ledger.with_state(|s| {
            if let Some(class) = s.classes.get_mut("SC2") {
                class.is_archived = true;
            }
        });
        let service = summary_service(&ledger);
        assert_eq!(service.get_security_summary("E1", false).unwrap().len(), 1);
        let all = service.get_security_summary("E1", true).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[1].is_archived);
    }

    #[tokio::test]
    async fn test_point_in_time_summary_and_holdings() {
        let ledger = seeded();
        record(&ledger, TransactionType::Issue, None, Some("M1"), 1000, (2024, 1, 10)).await;
        record(&ledger, TransactionType::Transfer, Some("M1"), Some("M2"), 250, (2024, 3, 1)).await;
        record(&ledger, TransactionType::Cancellation, Some("M2"), None, 50, (2024, 4, 1)).await;

        let service = summary_service(&ledger);
        let march = NaiveDate::from_ymd_opt(2024, 3, 1);
        let summary = service
            .get_security_summary_as_of("E1", false, march)
            .unwrap();
        assert_eq!(summary[0].total_quantity, 1000);
        assert_eq!(summary[0].member_count, 2);

        let holdings = service.get_member_holdings("E1", "SC1", None).unwrap();
        assert_eq!(holdings.total_quantity, 950);
        let held: i64 = holdings.holdings.iter().map(|h| h.quantity).sum();
        assert_eq!(held, holdings.total_quantity);
        assert_eq!(holdings.holdings[0].member_name.as_deref(), Some("Alice"));
        assert_eq!(holdings.holdings[1].quantity, 200);

        let january = service
            .get_member_holdings("E1", "SC1", NaiveDate::from_ymd_opt(2024, 1, 31))
            .unwrap();
        assert_eq!(january.holdings.len(), 1);
        assert_eq!(january.holdings[0].quantity, 1000);
    }

    #[tokio::test]
    async fn test_holdings_for_class_of_another_entity() {
        let ledger = seeded();
        let err = summary_service(&ledger)
            .get_member_holdings("E2", "SC1", None)
            .unwrap_err();
        assert_eq!(
            err.as_ledger(),
            Some(&LedgerError::SecurityClassNotFound("SC1".to_string()))
        );
    }
}
