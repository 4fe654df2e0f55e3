use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::defaults::default_policy;
use crate::error::InsuranceResult;
use crate::models::Policy;
use crate::parser::{document_lines, PolicyDocumentLayout, SectionedPolicyLayout};

/// Where the active policy came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySource {
    BuiltinDefault,
    Document,
    Direct,
}

/// Immutable snapshot of the policy evaluations run against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePolicy {
    /// Increases by one on every replacement
    pub version: u64,
    pub source: PolicySource,
    pub policy: Policy,
    pub activated_at: DateTime<Utc>,
}

/// Insurance service
///
/// Owns the single active policy slot. Readers get an `Arc` snapshot that
/// stays valid and unchanged even if the slot is replaced while they use it.
pub struct InsuranceService {
    active: RwLock<Arc<ActivePolicy>>,
    layout: Box<dyn PolicyDocumentLayout>,
}

impl InsuranceService {
    /// Create a new insurance service with the built-in default policy
    pub fn new() -> Self {
        Self::with_layout(SectionedPolicyLayout)
    }

    pub fn with_layout(layout: impl PolicyDocumentLayout + 'static) -> Self {
        Self {
            active: RwLock::new(Arc::new(ActivePolicy {
                version: 1,
                source: PolicySource::BuiltinDefault,
                policy: default_policy(),
                activated_at: Utc::now(),
            })),
            layout: Box::new(layout),
        }
    }

    pub async fn active_policy(&self) -> Arc<ActivePolicy> {
        Arc::clone(&*self.active.read().await)
    }

    /// Swap in a new policy; last write wins
    #[instrument(skip(self, policy))]
    pub async fn replace_policy(&self, policy: Policy, source: PolicySource) -> Arc<ActivePolicy> {
        let mut slot = self.active.write().await;
        let next = Arc::new(ActivePolicy {
            version: slot.version.saturating_add(1),
            source,
            policy,
            activated_at: Utc::now(),
        });
        *slot = Arc::clone(&next);

        info!(
            version = next.version,
            coverage_limits = next.policy.definition().coverage_limits.len(),
            exclusions = next.policy.definition().exclusions.len(),
            co_payment = %next.policy.co_payment_percentage(),
            "Active policy replaced"
        );
        next
    }

    /// Parse extracted document text and make it the active policy.
    ///
    /// The active policy is left untouched when parsing fails.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InsuranceError::DocumentFormat`] with the reason the
    /// document was rejected.
    #[instrument(skip(self, text), fields(layout = self.layout.name()))]
    pub async fn load_policy_document(&self, text: &str) -> InsuranceResult<Arc<ActivePolicy>> {
        let policy = self.layout.parse(&document_lines(text)).map_err(|error| {
            warn!(%error, "Rejected policy document");
            error
        })?;
        Ok(self.replace_policy(policy, PolicySource::Document).await)
    }

    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse.
    pub async fn load_policy_file(&self, path: impl AsRef<Path>) -> InsuranceResult<Arc<ActivePolicy>> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        self.load_policy_document(&text).await
    }

    pub async fn reset_to_default(&self) -> Arc<ActivePolicy> {
        self.replace_policy(default_policy(), PolicySource::BuiltinDefault).await
    }
}

impl Default for InsuranceService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsuranceError;
    use crate::models::PolicyDefinition;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_starts_with_default_policy() {
        let service = InsuranceService::new();
        let active = service.active_policy().await;
        assert_eq!(active.version, 1);
        assert_eq!(active.source, PolicySource::BuiltinDefault);
        assert_eq!(active.policy, default_policy());
    }

    #[tokio::test]
    async fn test_document_replaces_policy_and_bumps_version() {
        let service = InsuranceService::new();
        let active = service
            .load_policy_document("Coverage Limits:\nMRI Scan - 10000\nCoPayment: 20%")
            .await
            .unwrap();

        assert_eq!(active.version, 2);
        assert_eq!(active.source, PolicySource::Document);
        assert_eq!(active.policy.co_payment_percentage(), Decimal::new(20, 0));
        // Replacement, not merge
        assert!(!active.policy.is_non_payable("Gloves").unwrap());
        assert_eq!(service.active_policy().await, active);
    }

    #[tokio::test]
    async fn test_failed_parse_keeps_previous_policy() {
        let service = InsuranceService::new();
        let result = service.load_policy_document("Exclusions:\nCosmetic Surgery").await;
        assert!(matches!(result, Err(InsuranceError::DocumentFormat(_))));

        let active = service.active_policy().await;
        assert_eq!(active.version, 1);
        assert_eq!(active.policy, default_policy());
    }

    #[tokio::test]
    async fn test_snapshot_survives_replacement() {
        let service = InsuranceService::new();
        let before = service.active_policy().await;

        let policy = Policy::new(PolicyDefinition {
            coverage_limits: BTreeMap::from([("Dialysis".to_string(), Decimal::new(4_000, 0))]),
            co_payment_percentage: Decimal::ZERO,
            ..Default::default()
        })
        .unwrap();
        service.replace_policy(policy, PolicySource::Direct).await;

        assert!(before.policy.is_covered("MRI Scan").unwrap());
        assert!(!service.active_policy().await.policy.is_covered("MRI Scan").unwrap());

        let reset = service.reset_to_default().await;
        assert_eq!(reset.version, 3);
        assert_eq!(reset.source, PolicySource::BuiltinDefault);
    }

    #[tokio::test]
    async fn test_load_policy_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "Coverage Limits:\nBlood Test: 2,500\nCo-Payment: 5%\n").unwrap();

        let service = InsuranceService::new();
        let active = service.load_policy_file(file.path()).await.unwrap();
        assert_eq!(active.policy.coverage_limit("blood test").unwrap(), Some(Decimal::new(2_500, 0)));
    }

    #[tokio::test]
    async fn test_concurrent_readers_never_see_partial_policy() {
        let service = Arc::new(InsuranceService::new());

        let writer = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                for percent in 0..50 {
                    let text = format!("Coverage Limits:\nMRI Scan - 5000\nCoPayment: {percent}%");
                    service.load_policy_document(&text).await.unwrap();
                }
            })
        };

        let mut last_version = 0;
        for _ in 0..200 {
            let snapshot = service.active_policy().await;
            assert!(snapshot.version >= last_version);
            last_version = snapshot.version;
            // Either the default or a fully parsed replacement
            assert!(snapshot.policy.is_covered("MRI Scan").unwrap());
            tokio::task::yield_now().await;
        }

        writer.await.unwrap();
        assert_eq!(service.active_policy().await.version, 51);
    }
}
