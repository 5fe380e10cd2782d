//! End-to-end ledger behaviour against a real SQLite file.

use chrono::{Days, Utc};
use diesel::RunQueryDsl;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tempfile::TempDir;

use sharebook_core::audit::{
    AuditAction, AuditCursor, AuditLogFilter, AuditRepositoryTrait, AuditService,
    AuditServiceTrait, Pagination,
};
use sharebook_core::entities::{Entity, EntityService, EntityServiceTrait, NewEntity};
use sharebook_core::members::{Member, MemberService, MemberServiceTrait, MemberType, NewMember};
use sharebook_core::securities::{
    NewSecurityClass, SecurityClass, SecurityClassService, SecurityClassServiceTrait,
};
use sharebook_core::summary::{SummaryService, SummaryServiceTrait};
use sharebook_core::transactions::{
    BulkLineItem, LedgerError, NewBulkTransactions, NewTransaction, TransactionService,
    TransactionServiceTrait, TransactionType, TransactionUpdate,
};
use sharebook_core::unit_of_work::{run_in_unit_of_work, LedgerUnitOfWork, UnitOfWorkExecutor};
use sharebook_core::{Error, RegistryConfig};
use sharebook_storage_sqlite::{
    create_pool, get_connection, init, run_migrations, spawn_writer, AuditRepository, DbPool,
    EntityRepository, MemberRepository, SecurityClassRepository, SqliteUnitOfWorkExecutor,
    TransactionRepository,
};

struct Register {
    _dir: TempDir,
    pool: Arc<DbPool>,
    executor: Arc<dyn UnitOfWorkExecutor>,
    entities: EntityService,
    classes: SecurityClassService,
    members: MemberService,
    transactions: TransactionService,
    summary: SummaryService,
    audit: AuditService,
}

fn actor() -> Option<String> {
    Some("registrar-1".to_string())
}

fn open_register() -> Register {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("data").join("register.db");
    let db_path = init(&db_path.to_string_lossy()).expect("init");
    let pool = create_pool(&db_path).expect("pool");
    run_migrations(&pool).expect("migrations");
    let writer = spawn_writer((*pool).clone());
    let executor: Arc<dyn UnitOfWorkExecutor> = Arc::new(SqliteUnitOfWorkExecutor::new(writer));
    let config = RegistryConfig::default();

    let class_repo = Arc::new(SecurityClassRepository::new(pool.clone()));
    let member_repo = Arc::new(MemberRepository::new(pool.clone()));
    let tx_repo = Arc::new(TransactionRepository::new(pool.clone()));

    Register {
        entities: EntityService::new(
            Arc::new(EntityRepository::new(pool.clone())),
            executor.clone(),
            config.clone(),
        ),
        classes: SecurityClassService::new(class_repo.clone(), executor.clone()),
        members: MemberService::new(member_repo.clone(), executor.clone(), config.clone()),
        transactions: TransactionService::new(tx_repo.clone(), executor.clone(), config),
        summary: SummaryService::new(class_repo, member_repo, tx_repo),
        audit: AuditService::new(Arc::new(AuditRepository::new(pool.clone()))),
        pool,
        executor,
        _dir: dir,
    }
}

struct Seeded {
    entity: Entity,
    class: SecurityClass,
    alice: Member,
    bob: Member,
}

async fn seed(reg: &Register) -> Seeded {
    let entity = reg
        .entities
        .create_entity(
            actor(),
            NewEntity {
                name: "Acme Pty Ltd".to_string(),
                country: None,
            },
        )
        .await
        .expect("entity");
    let class = reg
        .classes
        .create_security_class(
            actor(),
            NewSecurityClass {
                entity_id: entity.id.clone(),
                name: "Ordinary".to_string(),
                symbol: Some("ORD".to_string()),
                has_voting_rights: true,
                has_dividend_rights: true,
            },
        )
        .await
        .expect("class");
    let mut members = Vec::new();
    for (name, number) in [("Alice", "M-001"), ("Bob", "M-002")] {
        let member = reg
            .members
            .create_member(
                actor(),
                NewMember {
                    entity_id: entity.id.clone(),
                    member_type: MemberType::Individual,
                    name: name.to_string(),
                    member_number: Some(number.to_string()),
                    email: None,
                    country: None,
                },
            )
            .await
            .expect("member");
        members.push(member);
    }
    let bob = members.pop().expect("bob");
    let alice = members.pop().expect("alice");
    Seeded {
        entity,
        class,
        alice,
        bob,
    }
}

fn issue(s: &Seeded, to: &Member, quantity: u64) -> NewTransaction {
    NewTransaction {
        to_member_id: Some(to.id.clone()),
        amount_paid_per_security: Some(dec!(1.25)),
        amount_unpaid_per_security: Some(dec!(0.00)),
        ..NewTransaction::new(&s.entity.id, &s.class.id, TransactionType::Issue, quantity)
    }
}

fn transactions_filter() -> AuditLogFilter {
    AuditLogFilter {
        table_name: Some("transactions".to_string()),
        ..AuditLogFilter::default()
    }
}

#[tokio::test]
async fn test_issue_and_transfer_roll_up_into_summary_and_holdings() {
    let reg = open_register();
    let s = seed(&reg).await;

    let issued = reg
        .transactions
        .create_transaction(actor(), issue(&s, &s.alice, 1000))
        .await
        .unwrap();
    assert_eq!(issued.total_amount_paid, Some(dec!(1250.00)));
    assert_eq!(issued.currency, "AUD");

    let transfer = NewTransaction {
        from_member_id: Some(s.alice.id.clone()),
        to_member_id: Some(s.bob.id.clone()),
        transfer_price_per_security: Some(dec!(2.10)),
        ..NewTransaction::new(&s.entity.id, &s.class.id, TransactionType::Transfer, 400)
    };
    let transferred = reg
        .transactions
        .create_transaction(actor(), transfer)
        .await
        .unwrap();
    assert_eq!(transferred.total_transfer_amount, Some(dec!(840.00)));

    // Decimals survive the round trip through TEXT columns exactly.
    let reread = reg.transactions.get_transaction(&issued.id).unwrap();
    assert_eq!(reread, issued);

    let summary = reg.summary.get_security_summary(&s.entity.id, false).unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].total_quantity, 1000);
    assert_eq!(summary[0].total_amount_paid, dec!(1250.00));

    let holdings = reg
        .summary
        .get_member_holdings(&s.entity.id, &s.class.id, None)
        .unwrap();
    let by_member: Vec<(String, i64)> = holdings
        .holdings
        .iter()
        .map(|h| (h.member_id.clone(), h.quantity))
        .collect();
    assert!(by_member.contains(&(s.alice.id.clone(), 600)));
    assert!(by_member.contains(&(s.bob.id.clone(), 400)));
    assert_eq!(holdings.total_quantity, 1000);

    let page = reg
        .audit
        .query_audit_log(&s.entity.id, &transactions_filter(), Pagination::default())
        .unwrap();
    assert_eq!(page.total, 2);
    let records: Vec<&str> = page.entries.iter().map(|e| e.record_id.as_str()).collect();
    assert!(records.contains(&issued.id.as_str()));
    assert!(records.contains(&transferred.id.as_str()));
    assert!(page.entries.iter().all(|e| e.action == AuditAction::Create));
}

#[tokio::test]
async fn test_bulk_with_unknown_member_writes_nothing() {
    let reg = open_register();
    let s = seed(&reg).await;

    let request = NewBulkTransactions {
        entity_id: s.entity.id.clone(),
        security_class_id: s.class.id.clone(),
        transaction_type: TransactionType::Issue,
        currency: None,
        tranche_number: Some("T1".to_string()),
        posted_date: None,
        settlement_date: None,
        status: None,
        line_items: vec![
            BulkLineItem {
                quantity: 100,
                member_id: Some(s.alice.id.clone()),
                ..BulkLineItem::default()
            },
            BulkLineItem {
                quantity: 50,
                member_id: Some("ghost".to_string()),
                ..BulkLineItem::default()
            },
        ],
    };
    let err = reg
        .transactions
        .create_transactions_bulk(actor(), request)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_ledger(),
        Some(&LedgerError::MemberNotFound(vec!["ghost".to_string()]))
    );

    assert!(reg
        .transactions
        .list_transactions(&s.entity.id, None)
        .unwrap()
        .is_empty());
    let page = reg
        .audit
        .query_audit_log(&s.entity.id, &transactions_filter(), Pagination::default())
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_bulk_assigns_tranche_sequence_in_line_order() {
    let reg = open_register();
    let s = seed(&reg).await;

    let request = NewBulkTransactions {
        entity_id: s.entity.id.clone(),
        security_class_id: s.class.id.clone(),
        transaction_type: TransactionType::Issue,
        currency: Some("NZD".to_string()),
        tranche_number: Some("T1".to_string()),
        posted_date: None,
        settlement_date: None,
        status: None,
        line_items: vec![
            BulkLineItem {
                quantity: 300,
                member_id: Some(s.alice.id.clone()),
                amount_paid_per_security: Some(dec!(0.50)),
                ..BulkLineItem::default()
            },
            BulkLineItem {
                quantity: 200,
                member_id: Some(s.bob.id.clone()),
                amount_paid_per_security: Some(dec!(0.50)),
                ..BulkLineItem::default()
            },
        ],
    };
    let result = reg
        .transactions
        .create_transactions_bulk(actor(), request)
        .await
        .unwrap();
    assert_eq!(result.count, 2);
    let sequences: Vec<Option<i32>> = result.created.iter().map(|t| t.tranche_sequence).collect();
    assert_eq!(sequences, vec![Some(1), Some(2)]);
    assert!(result.created.iter().all(|t| t.currency == "NZD"));

    let summary = reg.summary.get_security_summary(&s.entity.id, false).unwrap();
    assert_eq!(summary[0].total_quantity, 500);
    assert_eq!(summary[0].total_amount_paid, dec!(250.00));
    assert_eq!(summary[0].tranche_count, 1);
}

#[tokio::test]
async fn test_failed_job_rolls_back_every_write() {
    let reg = open_register();

    let result: sharebook_core::Result<()> =
        run_in_unit_of_work(reg.executor.as_ref(), |uow| {
            let now = Utc::now();
            uow.insert_entity(&Entity {
                id: "E-rollback".to_string(),
                name: "Never Committed".to_string(),
                country: "AU".to_string(),
                created_at: now,
                updated_at: now,
            })?;
            Err(Error::Unexpected("boom".to_string()))
        })
        .await;
    assert!(matches!(result, Err(Error::Unexpected(_))));

    let err = reg.entities.get_entity("E-rollback").unwrap_err();
    assert_eq!(
        err.as_ledger(),
        Some(&LedgerError::EntityNotFound("E-rollback".to_string()))
    );
}

#[tokio::test]
async fn test_update_records_delta_and_delete_snapshot() {
    let reg = open_register();
    let s = seed(&reg).await;
    let issued = reg
        .transactions
        .create_transaction(actor(), issue(&s, &s.alice, 100))
        .await
        .unwrap();

    let patch = TransactionUpdate {
        quantity: Some(80),
        reference: Some(Some("corrected".to_string())),
        ..TransactionUpdate::default()
    };
    let updated = reg
        .transactions
        .update_transaction(actor(), &issued.id, patch)
        .await
        .unwrap();
    assert_eq!(updated.quantity, 80);
    assert_eq!(updated.total_amount_paid, Some(dec!(100.00)));

    let filter = AuditLogFilter {
        record_id: Some(issued.id.clone()),
        action: Some(AuditAction::Update),
        ..AuditLogFilter::default()
    };
    let page = reg
        .audit
        .query_audit_log(&s.entity.id, &filter, Pagination::default())
        .unwrap();
    assert_eq!(page.total, 1);
    let fields: Vec<&str> = page.entries[0].changes.keys().map(String::as_str).collect();
    assert_eq!(fields, vec!["quantity", "reference", "total_amount_paid"]);

    reg.transactions
        .delete_transaction(actor(), &issued.id)
        .await
        .unwrap();
    let err = reg.transactions.get_transaction(&issued.id).unwrap_err();
    assert!(matches!(
        err.as_ledger(),
        Some(LedgerError::TransactionNotFound(_))
    ));

    let filter = AuditLogFilter {
        record_id: Some(issued.id.clone()),
        ..AuditLogFilter::default()
    };
    let page = reg
        .audit
        .query_audit_log(&s.entity.id, &filter, Pagination::default())
        .unwrap();
    assert_eq!(page.total, 3);
    let delete = page
        .entries
        .iter()
        .find(|e| e.action == AuditAction::Delete)
        .expect("delete entry");
    assert!(delete.changes.contains_key("quantity"));
}

#[tokio::test]
async fn test_member_with_history_cannot_be_deleted() {
    let reg = open_register();
    let s = seed(&reg).await;
    reg.transactions
        .create_transaction(actor(), issue(&s, &s.alice, 10))
        .await
        .unwrap();

    let err = reg
        .members
        .delete_member(actor(), &s.alice.id)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_ledger(),
        Some(&LedgerError::MemberInUse(s.alice.id.clone()))
    );

    reg.members.delete_member(actor(), &s.bob.id).await.unwrap();
    let remaining = reg.members.list_members(&s.entity.id).unwrap();
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn test_archived_class_blocks_new_transactions() {
    let reg = open_register();
    let s = seed(&reg).await;
    let archived = reg
        .classes
        .archive_security_class(actor(), &s.class.id)
        .await
        .unwrap();
    assert!(archived.is_archived);

    let err = reg
        .transactions
        .create_transaction(actor(), issue(&s, &s.alice, 10))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_ledger(),
        Some(&LedgerError::SecurityClassArchived(s.class.id.clone()))
    );
    assert!(reg
        .classes
        .list_security_classes(&s.entity.id, false)
        .unwrap()
        .is_empty());
    assert_eq!(
        reg.classes
            .list_security_classes(&s.entity.id, true)
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_idempotency_key_returns_original() {
    let reg = open_register();
    let s = seed(&reg).await;
    let keyed = NewTransaction {
        idempotency_key: Some("req-42".to_string()),
        ..issue(&s, &s.alice, 10)
    };

    let first = reg
        .transactions
        .create_transaction(actor(), keyed.clone())
        .await
        .unwrap();
    let second = reg
        .transactions
        .create_transaction(actor(), keyed)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(
        reg.transactions
            .list_transactions(&s.entity.id, Some(&s.class.id))
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_duplicate_member_number_is_rejected() {
    let reg = open_register();
    let s = seed(&reg).await;
    let err = reg
        .members
        .create_member(
            actor(),
            NewMember {
                entity_id: s.entity.id.clone(),
                name: "Carol".to_string(),
                member_number: Some("M-001".to_string()),
                ..NewMember::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(_)));
}

#[tokio::test]
async fn test_audit_date_filter_and_csv_export() {
    let reg = open_register();
    let s = seed(&reg).await;
    let today = Utc::now().date_naive();

    let through_today = AuditLogFilter {
        to_date: Some(today),
        ..AuditLogFilter::default()
    };
    let page = reg
        .audit
        .query_audit_log(&s.entity.id, &through_today, Pagination::new(Some(2), None))
        .unwrap();
    // entity, class, two members
    assert_eq!(page.total, 4);
    assert_eq!(page.entries.len(), 2);

    let from_tomorrow = AuditLogFilter {
        from_date: today.checked_add_days(Days::new(1)),
        ..AuditLogFilter::default()
    };
    let page = reg
        .audit
        .query_audit_log(&s.entity.id, &from_tomorrow, Pagination::default())
        .unwrap();
    assert_eq!(page.total, 0);

    let mut out = Vec::new();
    let rows = reg
        .audit
        .export_audit_log_csv(&s.entity.id, &AuditLogFilter::default(), &mut out)
        .unwrap();
    assert_eq!(rows, 4);
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("id,entity_id,actor_id,action,table_name,record_id,created_at,changes")
    );
    assert_eq!(lines.count(), 4);
}

#[tokio::test]
async fn test_audit_keyset_pages_skip_entries_written_between_pages() {
    let reg = open_register();
    let s = seed(&reg).await;
    let repo = AuditRepository::new(reg.pool.clone());
    let filter = AuditLogFilter::default();

    let first = repo.query_after(&s.entity.id, &filter, None, 2).unwrap();
    assert_eq!(first.len(), 2);
    let cursor = AuditCursor::after(first.last().unwrap());

    reg.members
        .create_member(
            actor(),
            NewMember {
                entity_id: s.entity.id.clone(),
                member_type: MemberType::Organization,
                name: "Carol Holdings".to_string(),
                member_number: Some("M-003".to_string()),
                email: None,
                country: None,
            },
        )
        .await
        .unwrap();

    let second = repo
        .query_after(&s.entity.id, &filter, Some(&cursor), 2)
        .unwrap();
    assert_eq!(second.len(), 2);
    assert!(second.iter().all(|e| first.iter().all(|f| f.id != e.id)));
    let third = repo
        .query_after(&s.entity.id, &filter, Some(&AuditCursor::after(&second[1])), 2)
        .unwrap();
    assert!(third.is_empty());

    // Offset paging over the same rows would repeat the last entry of the first page.
    let shifted = repo
        .query(&s.entity.id, &filter, Pagination::new(Some(2), Some(2)))
        .unwrap();
    assert_eq!(shifted[0].id, first[1].id);
}

#[tokio::test]
async fn test_audit_rows_cannot_be_modified() {
    let reg = open_register();
    seed(&reg).await;
    let mut conn = get_connection(&reg.pool).unwrap();
    assert!(diesel::sql_query("UPDATE audit_log SET actor_id = 'someone-else'")
        .execute(&mut conn)
        .is_err());
    assert!(diesel::sql_query("DELETE FROM audit_log")
        .execute(&mut conn)
        .is_err());
}
