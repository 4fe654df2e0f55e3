use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use billing_service::{routes, BillAnalysis, BillingService, MedicalBill};
use config_engine::AppConfig;
use insurance_service::{parse_policy_document, InsuranceService, Policy};
use pricing_service::{AlternativeKind, CostEfficiencyComparator, ReferencePriceTable, SavingsEstimate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::error::{CliError, CliResult};

/// Services wired from configuration
pub struct Context {
    pub config: AppConfig,
    pub billing: Arc<BillingService>,
}

impl Context {
    /// Load reference prices and the policy document named in `config`
    ///
    /// # Errors
    ///
    /// Fails when a configured data file cannot be read or parsed.
    pub async fn from_config(config: AppConfig) -> CliResult<Self> {
        let reference = match &config.data.reference_prices {
            Some(path) => ReferencePriceTable::from_json_file(path)?,
            None => ReferencePriceTable::builtin(),
        };
        let comparator = Arc::new(CostEfficiencyComparator::new(Arc::new(reference)));

        let insurance = Arc::new(InsuranceService::new());
        if let Some(path) = &config.data.policy_document {
            insurance.load_policy_file(path).await?;
        }

        let billing = BillingService::new(insurance, comparator).with_currency_symbol(config.data.currency_symbol.clone());
        Ok(Self {
            config,
            billing: Arc::new(billing),
        })
    }
}

/// How a bill file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillFileFormat {
    Json,
    Yaml,
    /// Labelled lines, parsed by the bill document layout
    Document,
}

impl BillFileFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Document,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    #[serde(flatten)]
    pub result: BillAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// # Errors
///
/// Fails when a file cannot be read, the bill does not parse, or the bill
/// is rejected by the evaluator.
pub async fn analyze(ctx: &Context, file: &Path, policy: Option<&Path>, summary: bool) -> CliResult<String> {
    if let Some(policy) = policy {
        ctx.billing.insurance().load_policy_file(policy).await?;
    }

    let text = read(file).await?;
    let format = BillFileFormat::from_path(file);
    let bill: MedicalBill = match format {
        BillFileFormat::Json => serde_json::from_str(&text).map_err(|e| bill_format(file, &e))?,
        BillFileFormat::Yaml => serde_yaml::from_str(&text).map_err(|e| bill_format(file, &e))?,
        BillFileFormat::Document => {
            let analysed = ctx.billing.parse_and_analyze(&text).await?;
            return Ok(serde_json::to_string_pretty(&analysed)?);
        }
    };

    let result = ctx.billing.analyze_bill(&bill).await?;
    let summary = summary.then(|| ctx.billing.patient_summary(&result.analysis));
    Ok(serde_json::to_string_pretty(&AnalyzeOutput { result, summary })?)
}

/// # Errors
///
/// Fails when the file cannot be read or is not a valid policy document.
pub async fn parse_policy(file: &Path) -> CliResult<String> {
    let text = read(file).await?;
    let policy: Policy = parse_policy_document(&text).map_err(insurance_service::InsuranceError::from)?;
    Ok(serde_json::to_string_pretty(&policy)?)
}

#[derive(Debug, Serialize)]
pub struct AlternativesOutput {
    pub item_name: String,
    pub estimate: Option<SavingsEstimate>,
}

/// # Errors
///
/// Fails for a blank name or a non-positive price.
pub fn alternatives(ctx: &Context, name: &str, price: Decimal, kind: AlternativeKind) -> CliResult<String> {
    let estimate = ctx.billing.estimate_savings(name, price, kind)?;
    Ok(serde_json::to_string_pretty(&AlternativesOutput {
        item_name: name.trim().to_string(),
        estimate,
    })?)
}

/// Bind address from the flag, else from configuration
///
/// # Errors
///
/// Fails when the address does not parse.
pub fn bind_address(ctx: &Context, bind: Option<&str>) -> CliResult<SocketAddr> {
    let raw = bind.unwrap_or(&ctx.config.server.bind_address);
    raw.parse()
        .map_err(|e| CliError::Server(format!("invalid bind address {raw:?}: {e}")))
}

/// # Errors
///
/// Fails when the address cannot be bound or the server stops with an error.
pub async fn serve(ctx: &Context, addr: SocketAddr) -> CliResult<()> {
    let app = routes::router(Arc::clone(&ctx.billing));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CliError::Server(format!("failed to bind to {addr}: {e}")))?;

    info!(%addr, "Billing API listening on http://{addr}{}", routes::paths::API_BILLING);
    axum::serve(listener, app)
        .await
        .map_err(|e| CliError::Server(format!("HTTP server error: {e}")))
}

async fn read(path: &Path) -> CliResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|source| CliError::Read {
        path: PathBuf::from(path),
        source,
    })
}

fn bill_format(path: &Path, error: &dyn std::fmt::Display) -> CliError {
    CliError::BillFormat {
        path: PathBuf::from(path),
        reason: error.to_string(),
    }
}
