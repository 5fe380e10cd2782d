use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use sharebook_core::{
    audit::{AuditService, AuditServiceTrait},
    entities::{EntityService, EntityServiceTrait},
    members::{MemberService, MemberServiceTrait},
    securities::{SecurityClassService, SecurityClassServiceTrait},
    summary::{SummaryService, SummaryServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    unit_of_work::UnitOfWorkExecutor,
};
use sharebook_storage_sqlite::{
    db, AuditRepository, EntityRepository, MemberRepository, SecurityClassRepository,
    SqliteUnitOfWorkExecutor, TransactionRepository,
};

pub struct AppState {
    pub entity_service: Arc<dyn EntityServiceTrait>,
    pub security_class_service: Arc<dyn SecurityClassServiceTrait>,
    pub member_service: Arc<dyn MemberServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub summary_service: Arc<dyn SummaryServiceTrait>,
    pub audit_service: Arc<dyn AuditServiceTrait>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("SHAREBOOK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());
    let executor: Arc<dyn UnitOfWorkExecutor> = Arc::new(SqliteUnitOfWorkExecutor::new(writer));

    let entity_repo = Arc::new(EntityRepository::new(pool.clone()));
    let class_repo = Arc::new(SecurityClassRepository::new(pool.clone()));
    let member_repo = Arc::new(MemberRepository::new(pool.clone()));
    let transaction_repo = Arc::new(TransactionRepository::new(pool.clone()));
    let audit_repo = Arc::new(AuditRepository::new(pool.clone()));

    let registry = config.registry.clone();
    tracing::info!(
        "Register defaults: currency {}, country {}",
        registry.default_currency,
        registry.default_country
    );

    Ok(Arc::new(AppState {
        entity_service: Arc::new(EntityService::new(
            entity_repo,
            executor.clone(),
            registry.clone(),
        )),
        security_class_service: Arc::new(SecurityClassService::new(
            class_repo.clone(),
            executor.clone(),
        )),
        member_service: Arc::new(MemberService::new(
            member_repo.clone(),
            executor.clone(),
            registry.clone(),
        )),
        transaction_service: Arc::new(TransactionService::new(
            transaction_repo.clone(),
            executor,
            registry,
        )),
        summary_service: Arc::new(SummaryService::new(class_repo, member_repo, transaction_repo)),
        audit_service: Arc::new(AuditService::new(audit_repo)),
        db_path,
    }))
}
