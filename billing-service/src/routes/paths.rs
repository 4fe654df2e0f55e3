//! Route path constants for the billing API

/// Every billing route is nested under this prefix
pub const API_BILLING: &str = "/api/billing";

pub const HEALTH: &str = "/health";

/// Billing record ledger
pub mod records {
    pub const RECORDS: &str = "/records";
    pub const RECORD_BY_ID: &str = "/records/:record_id";
    pub const DETECT_ANOMALIES: &str = "/anomalies/detect";
}

/// Bill coverage analysis
pub mod bills {
    pub const ANALYZE: &str = "/bills/analyze";
    pub const PARSE: &str = "/bills/parse";
    pub const ALTERNATIVES: &str = "/alternatives";
}

pub mod policy {
    pub const POLICY: &str = "/policy";
}
