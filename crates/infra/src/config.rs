//! Process configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};

use stockdesk_catalog::{CategoryMatching, CategoryPrefixMap};
pub use stockdesk_observability::LogFormat;

use crate::session::{DEFAULT_ADDED_BY, SessionConfig, SkuVerification};
use crate::store::sheets::ServiceAccountKey;
use crate::store::{InMemoryStore, InventoryStore, SheetsStore};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_SNAPSHOT_TTL_SECS: u64 = 60;
pub const DEFAULT_CURRENCY: &str = "₪";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    /// Spreadsheet share URL or bare id.
    pub spreadsheet: String,
    /// Worksheet title; `None` means the first sheet.
    pub worksheet: Option<String>,
    pub credentials_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sheets(SheetsConfig),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub snapshot_ttl: Duration,
    pub added_by: String,
    pub currency_symbol: String,
    pub prefixes: CategoryPrefixMap,
    pub sku_verification: SkuVerification,
    pub log_format: LogFormat,
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{key}: expected a boolean, got '{other}'"),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = get("STOCKDESK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse()
            .with_context(|| format!("STOCKDESK_BIND: invalid address '{bind}'"))?;

        let store = match get("STOCKDESK_STORE").as_deref().map(str::trim) {
            None | Some("memory") => StoreBackend::Memory,
            Some("sheets") => {
                let spreadsheet = get("STOCKDESK_SHEET_URL")
                    .context("STOCKDESK_SHEET_URL is required when STOCKDESK_STORE=sheets")?;
                let credentials_path = get("STOCKDESK_SERVICE_ACCOUNT")
                    .or_else(|| get("GOOGLE_APPLICATION_CREDENTIALS"))
                    .map(PathBuf::from)
                    .context(
                        "STOCKDESK_SERVICE_ACCOUNT or GOOGLE_APPLICATION_CREDENTIALS is required when STOCKDESK_STORE=sheets",
                    )?;
                StoreBackend::Sheets(SheetsConfig {
                    spreadsheet,
                    worksheet: get("STOCKDESK_WORKSHEET"),
                    credentials_path,
                })
            }
            Some(other) => bail!("STOCKDESK_STORE: unknown backend '{other}' (expected memory or sheets)"),
        };

        let snapshot_ttl = match get("STOCKDESK_SNAPSHOT_TTL_SECS") {
            Some(v) => Duration::from_secs(
                v.trim()
                    .parse()
                    .with_context(|| format!("STOCKDESK_SNAPSHOT_TTL_SECS: invalid number '{v}'"))?,
            ),
            None => Duration::from_secs(DEFAULT_SNAPSHOT_TTL_SECS),
        };

        let matching: CategoryMatching = match get("STOCKDESK_CATEGORY_MATCHING") {
            Some(v) => v
                .parse()
                .map_err(|e| anyhow!("STOCKDESK_CATEGORY_MATCHING: {e}"))?,
            None => CategoryMatching::default(),
        };

        let prefixes = match get("STOCKDESK_CATEGORY_PREFIXES") {
            Some(v) => CategoryPrefixMap::parse(&v, matching)
                .map_err(|e| anyhow!("STOCKDESK_CATEGORY_PREFIXES: {e}"))?,
            None => CategoryPrefixMap::standard()
                .with_matching(matching)
                .map_err(|e| anyhow!("STOCKDESK_CATEGORY_MATCHING: {e}"))?,
        };

        let sku_verification = match get("STOCKDESK_VERIFY_SKU") {
            Some(v) if parse_bool("STOCKDESK_VERIFY_SKU", &v)? => SkuVerification::Recheck,
            _ => SkuVerification::Off,
        };

        let log_format = match get("STOCKDESK_LOG_FORMAT") {
            Some(v) => v
                .parse()
                .map_err(|e| anyhow!("STOCKDESK_LOG_FORMAT: {e}"))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            store,
            snapshot_ttl,
            added_by: get("STOCKDESK_ADDED_BY").unwrap_or_else(|| DEFAULT_ADDED_BY.to_string()),
            currency_symbol: get("STOCKDESK_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            prefixes,
            sku_verification,
            log_format,
        })
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            prefixes: self.prefixes.clone(),
            added_by: self.added_by.clone(),
            sku_verification: self.sku_verification,
        }
    }

    /// Construct the configured store. Called once at startup; the result is shared.
    pub fn build_store(&self) -> anyhow::Result<Arc<dyn InventoryStore>> {
        match &self.store {
            StoreBackend::Memory => {
                tracing::warn!("using the in-memory store; entries are lost on restart");
                Ok(Arc::new(InMemoryStore::new()))
            }
            StoreBackend::Sheets(sheets) => {
                let key = ServiceAccountKey::from_file(&sheets.credentials_path)
                    .context("failed to load service account key")?;
                let store = SheetsStore::new(&sheets.spreadsheet, sheets.worksheet.clone(), key)
                    .context("failed to set up Google Sheets store")?;
                tracing::info!(spreadsheet = store.spreadsheet_id(), "using Google Sheets store");
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND);
        assert_eq!(cfg.store, StoreBackend::Memory);
        assert_eq!(cfg.snapshot_ttl, Duration::from_secs(60));
        assert_eq!(cfg.added_by, "User");
        assert_eq!(cfg.currency_symbol, "₪");
        assert_eq!(cfg.prefixes.prefix_for("מזון"), 20);
        assert_eq!(cfg.sku_verification, SkuVerification::Off);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn sheets_backend_needs_url_and_credentials() {
        let err = config(&[("STOCKDESK_STORE", "sheets")]).unwrap_err();
        assert!(err.to_string().contains("STOCKDESK_SHEET_URL"));

        let err = config(&[("STOCKDESK_STORE", "sheets"), ("STOCKDESK_SHEET_URL", "abc")]).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_APPLICATION_CREDENTIALS"));

        let cfg = config(&[
            ("STOCKDESK_STORE", "sheets"),
            ("STOCKDESK_SHEET_URL", "abc"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/secrets/key.json"),
            ("STOCKDESK_WORKSHEET", "Stock"),
        ])
        .unwrap();
        assert_eq!(
            cfg.store,
            StoreBackend::Sheets(SheetsConfig {
                spreadsheet: "abc".to_string(),
                worksheet: Some("Stock".to_string()),
                credentials_path: PathBuf::from("/secrets/key.json"),
            })
        );
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config(&[
            ("STOCKDESK_BIND", "127.0.0.1:9000"),
            ("STOCKDESK_SNAPSHOT_TTL_SECS", "0"),
            ("STOCKDESK_ADDED_BY", "Dana"),
            ("STOCKDESK_CATEGORY_MATCHING", "normalized"),
            ("STOCKDESK_CATEGORY_PREFIXES", "Tools=70,Paint=71"),
            ("STOCKDESK_VERIFY_SKU", "true"),
            ("STOCKDESK_LOG_FORMAT", "text"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert!(cfg.snapshot_ttl.is_zero());
        assert_eq!(cfg.prefixes.prefix_for(" tools "), 70);
        assert_eq!(cfg.prefixes.prefix_for("מזון"), 99);
        assert_eq!(cfg.log_format, LogFormat::Text);

        let session = cfg.session_config();
        assert_eq!(session.added_by, "Dana");
        assert_eq!(session.sku_verification, SkuVerification::Recheck);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(config(&[("STOCKDESK_BIND", "nowhere")]).is_err());
        assert!(config(&[("STOCKDESK_STORE", "postgres")]).is_err());
        assert!(config(&[("STOCKDESK_SNAPSHOT_TTL_SECS", "soon")]).is_err());
        assert!(config(&[("STOCKDESK_VERIFY_SKU", "maybe")]).is_err());
        assert!(config(&[("STOCKDESK_CATEGORY_PREFIXES", "a=1,a=2")]).is_err());
    }

    #[test]
    fn memory_store_builds() {
        let cfg = config(&[]).unwrap();
        let store = cfg.build_store().unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[test]
    fn missing_key_file_fails_to_build() {
        let cfg = config(&[
            ("STOCKDESK_STORE", "sheets"),
            ("STOCKDESK_SHEET_URL", "abc"),
            ("STOCKDESK_SERVICE_ACCOUNT", "/nonexistent/key.json"),
        ])
        .unwrap();
        assert!(cfg.build_store().is_err());
    }
}
