/// Currency used when neither the transaction nor the configuration names one
pub const DEFAULT_CURRENCY: &str = "AUD";

/// Country used for members and entities created without one
pub const DEFAULT_COUNTRY: &str = "AU";

/// Tranche bucket for issues recorded without a tranche number
pub const UNKNOWN_TRANCHE: &str = "Unknown";

/// Table names recorded on audit entries
pub const TABLE_ENTITIES: &str = "entities";
pub const TABLE_SECURITY_CLASSES: &str = "security_classes";
pub const TABLE_MEMBERS: &str = "members";
pub const TABLE_TRANSACTIONS: &str = "transactions";

/// Default and maximum page sizes for audit log queries
pub const DEFAULT_AUDIT_PAGE_SIZE: i64 = 100;
pub const MAX_AUDIT_PAGE_SIZE: i64 = 1000;
