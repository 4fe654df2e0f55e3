// Error codes implementation
// Standardized error codes for the ClaimLens Engine

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
    pub const OUT_OF_RANGE: &str = "VALIDATION_1004";
}

pub mod pricing {
    pub const INVALID_REFERENCE_ENTRY: &str = "PRICING_2001";
    pub const REFERENCE_SOURCE_UNREADABLE: &str = "PRICING_2002";
}

pub mod policy {
    pub const INVALID_POLICY: &str = "POLICY_3001";
    pub const DOCUMENT_FORMAT: &str = "POLICY_3002";
}

pub mod billing {
    pub const NO_TREATMENTS: &str = "BILLING_4001";
    pub const NO_COVERABLE_TREATMENTS: &str = "BILLING_4002";
    pub const RECORD_NOT_FOUND: &str = "BILLING_4003";
    pub const DOCUMENT_FORMAT: &str = "BILLING_4004";
    pub const EVALUATION_FAILED: &str = "BILLING_4005";
}

pub mod system {
    pub const CONFIGURATION: &str = "SYSTEM_9001";
    pub const INTERNAL: &str = "SYSTEM_9002";
    pub const IO: &str = "SYSTEM_9003";
}
