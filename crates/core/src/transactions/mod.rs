//! Transactions module - the ledger: validation, atomic writes and corrections.

mod transactions_errors;
mod transactions_model;
mod transactions_service;
mod transactions_traits;
mod transactions_validator;


pub use transactions_errors::{LedgerError, ShapeRule};
pub use transactions_model::{
    BulkCreateResult, BulkLineItem, NewBulkTransactions, NewTransaction, Transaction,
    TransactionStatus, TransactionType, TransactionUpdate, TRACKED_UPDATE_FIELDS,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
pub use transactions_validator::{
    check_security_class, member_requirements, missing_member_ids, referenced_member_ids,
    validate_corrected, validate_new_transaction, validate_shape, MemberRequirement,
};
