use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

mod classify;

pub use classify::{
    DEFAULT_GREEN_FLOOR, DEFAULT_YELLOW_FLOOR, ThresholdError, Thresholds, classify,
    status_for_snapshot,
};

pub const DEFAULT_HIGH_TIER_MODEL: &str = "Gemini 3 Pro (High)";

/// Model display names recognized in the store blob. The store is not
/// self-describing, so new models need a catalog change.
pub const DEFAULT_CATALOG: &[&str] = &[
    "Gemini 3 Pro (High)",
    "Gemini 3 Pro (Low)",
    "Gemini 3 Flash",
    "Claude Sonnet 4.5",
    "Claude Sonnet 4.5 (Thinking)",
    "Claude Opus 4.5 (Thinking)",
    "Claude Opus 4.6 (Thinking)",
    "GPT-OSS 120B (Medium)",
];

pub fn default_catalog() -> Vec<String> {
    DEFAULT_CATALOG.iter().map(|name| name.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelQuotaRecord {
    pub identity: String,
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub units: String,
}

impl ModelQuotaRecord {
    /// Units consumed so far, when both sides of the quota are known.
    pub fn used(&self) -> Option<u64> {
        let limit = self.limit?;
        let remaining = self.remaining?;
        Some(limit.saturating_sub(remaining))
    }

    pub fn percent_used(&self) -> Option<f64> {
        let limit = self.limit?;
        if limit == 0 {
            return None;
        }
        let used = self.used()? as f64;
        Some(((used / limit as f64) * 100.0).clamp(0.0, 100.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    pub timestamp: DateTime<Utc>,
    pub records: Vec<ModelQuotaRecord>,
    pub source: String,
}

impl QuotaSnapshot {
    pub fn record(&self, identity: &str) -> Option<&ModelQuotaRecord> {
        self.records.iter().find(|record| record.identity == identity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Green,
    Yellow,
    Red,
    /// Only produced when the store could not be read.
    Unknown,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStatus {
    pub timestamp: DateTime<Utc>,
    pub high_quota: u64,
    pub tier: Tier,
    pub recommendation: String,
    pub reasoning: String,
}

impl ResourceStatus {
    pub fn unknown(reason: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now,
            high_quota: 0,
            tier: Tier::Unknown,
            recommendation: "Unknown".to_string(),
            reasoning: reason.into(),
        }
    }
}

pub const LEDGER_HEADER: &str = "timestamp,model,thinking_tokens,input_tokens,output_tokens,total_tokens,conversation_id,session_id,system";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub timestamp: String,
    pub model: String,
    pub thinking_tokens: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub conversation_id: String,
    pub session_id: String,
    pub system: String,
}

impl UsageLogEntry {
    /// Ledger row for a quota record; consumption is booked as output tokens.
    pub fn from_record(
        record: &ModelQuotaRecord,
        now: DateTime<Utc>,
        session_id: &str,
        system: &str,
    ) -> Option<Self> {
        let used = record.used()?;
        Some(Self {
            timestamp: format_timestamp(now),
            model: record.identity.clone(),
            thinking_tokens: 0,
            input_tokens: 0,
            output_tokens: used,
            total_tokens: used,
            conversation_id: "auto-sync".to_string(),
            session_id: session_id.to_string(),
            system: system.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageBucket {
    pub count: u64,
    pub tokens: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_entries: u64,
    pub total_tokens: u64,
    pub by_model: std::collections::BTreeMap<String, UsageBucket>,
    pub by_system: std::collections::BTreeMap<String, UsageBucket>,
    pub first_entry: Option<String>,
    pub last_entry: Option<String>,
}

impl LedgerSummary {
    pub fn add(&mut self, entry: &UsageLogEntry) {
        self.total_entries += 1;
        self.total_tokens = self.total_tokens.saturating_add(entry.total_tokens);
        for bucket in [
            self.by_model.entry(entry.model.clone()).or_default(),
            self.by_system.entry(entry.system.clone()).or_default(),
        ] {
            bucket.count += 1;
            bucket.tokens = bucket.tokens.saturating_add(entry.total_tokens);
        }
        if self.first_entry.is_none() {
            self.first_entry = Some(entry.timestamp.clone());
        }
        self.last_entry = Some(entry.timestamp.clone());
    }
}

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
