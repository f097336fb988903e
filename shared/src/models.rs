use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Lifecycle status of a quote as exported by the trading platform.
///
/// Unrecognised text is kept verbatim in `Other` so that nothing is lost on
/// import; such rows are never actionable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Status {
    Deal,
    NothDone,
    Rejected,
    ExpQuote,
    Quote,
    Other(String),
}

impl Status {
    /// Reads a status cell. A blank cell means the quote never left `QUOTE`.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "" | "QUOTE" => Status::Quote,
            "DEAL" => Status::Deal,
            "NOTH.DONE" => Status::NothDone,
            "REJECTED" => Status::Rejected,
            "EXP.QUOTE" => Status::ExpQuote,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Deal => "DEAL",
            Status::NothDone => "NOTH.DONE",
            Status::Rejected => "REJECTED",
            Status::ExpQuote => "EXP.QUOTE",
            Status::Quote => "QUOTE",
            Status::Other(text) => text,
        }
    }

    /// A quote reached a decision point: dealt or explicitly declined.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Status::Deal | Status::NothDone)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Status {
    fn from(text: String) -> Self {
        Status::parse(&text)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

/// Days-to-maturity classification.
///
/// The ladder jumps from `90-119D` straight to `150-179D`: tenors 120..=149
/// land in `150-179D`. Downstream charts depend on these exact labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TenorBucket {
    #[serde(rename = "N/A")]
    NotAvailable,
    #[serde(rename = "0-29D")]
    Days0To29,
    #[serde(rename = "30-59D")]
    Days30To59,
    #[serde(rename = "60-89D")]
    Days60To89,
    #[serde(rename = "90-119D")]
    Days90To119,
    #[serde(rename = "150-179D")]
    Days150To179,
    #[serde(rename = "180-209D")]
    Days180To209,
    #[serde(rename = "≥210D")]
    Days210Plus,
}

impl TenorBucket {
    pub const ALL: [TenorBucket; 8] = [
        TenorBucket::NotAvailable,
        TenorBucket::Days0To29,
        TenorBucket::Days30To59,
        TenorBucket::Days60To89,
        TenorBucket::Days90To119,
        TenorBucket::Days150To179,
        TenorBucket::Days180To209,
        TenorBucket::Days210Plus,
    ];

    /// Buckets drawn on the analytics charts.
    pub const CHARTED: [TenorBucket; 6] = [
        TenorBucket::Days0To29,
        TenorBucket::Days30To59,
        TenorBucket::Days60To89,
        TenorBucket::Days90To119,
        TenorBucket::Days150To179,
        TenorBucket::Days180To209,
    ];

    pub fn from_tenor(tenor_dc: Option<i64>) -> Self {
        let Some(days) = tenor_dc else {
            return TenorBucket::NotAvailable;
        };
        if days < 30 {
            TenorBucket::Days0To29
        } else if days < 60 {
            TenorBucket::Days30To59
        } else if days < 90 {
            TenorBucket::Days60To89
        } else if days < 120 {
            TenorBucket::Days90To119
        } else if days < 180 {
            TenorBucket::Days150To179
        } else if days < 210 {
            TenorBucket::Days180To209
        } else {
            TenorBucket::Days210Plus
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TenorBucket::NotAvailable => "N/A",
            TenorBucket::Days0To29 => "0-29D",
            TenorBucket::Days30To59 => "30-59D",
            TenorBucket::Days60To89 => "60-89D",
            TenorBucket::Days90To119 => "90-119D",
            TenorBucket::Days150To179 => "150-179D",
            TenorBucket::Days180To209 => "180-209D",
            TenorBucket::Days210Plus => "≥210D",
        }
    }
}

impl fmt::Display for TenorBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotionalBucket {
    #[serde(rename = "0-100k")]
    UpTo100k,
    #[serde(rename = "100k-500k")]
    From100kTo500k,
    #[serde(rename = "500k-1M")]
    From500kTo1M,
    #[serde(rename = ">1M")]
    Above1M,
}

impl NotionalBucket {
    pub const ALL: [NotionalBucket; 4] = [
        NotionalBucket::UpTo100k,
        NotionalBucket::From100kTo500k,
        NotionalBucket::From500kTo1M,
        NotionalBucket::Above1M,
    ];

    pub fn from_notional(notional: f64) -> Self {
        if notional < 100_000.0 {
            NotionalBucket::UpTo100k
        } else if notional < 500_000.0 {
            NotionalBucket::From100kTo500k
        } else if notional < 1_000_000.0 {
            NotionalBucket::From500kTo1M
        } else {
            NotionalBucket::Above1M
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NotionalBucket::UpTo100k => "0-100k",
            NotionalBucket::From100kTo500k => "100k-500k",
            NotionalBucket::From500kTo1M => "500k-1M",
            NotionalBucket::Above1M => ">1M",
        }
    }
}

impl fmt::Display for NotionalBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One normalized NDF quote/deal row. Built once per CSV row and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdfRecord {
    pub rfq_timestamp: Option<DateTime<Utc>>,
    pub maturity_date: Option<DateTime<Utc>>,
    pub status: Status,
    pub rejected_message: String,
    pub cnpj: String,
    pub counterparty: String,
    pub product: String,
    pub tenor_dc: Option<i64>,
    pub tenor_bucket: TenorBucket,
    pub currency: String,
    pub parity: String,
    pub notional: f64,
    pub notional_bucket: NotionalBucket,
    pub spot_cost: Option<f64>,
    pub spot_fx: Option<f64>,
    pub yield_ccy: Option<f64>,
    pub yield_client: Option<f64>,
    pub yield_brl_cost: Option<f64>,
    pub yield_brl_client: Option<f64>,
    pub fwd: Option<f64>,
    pub rfq_channel: String,
    pub fwd_client: Option<f64>,
    pub side_blotter: String,
    pub side: String,
    pub is_buy: bool,
    pub is_actionable: bool,
    pub markup_bps: Option<f64>,
    pub pl_brl: Option<f64>,
}

impl NdfRecord {
    pub fn is_deal(&self) -> bool {
        self.status == Status::Deal
    }
}

/// Headline numbers of the overview page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetrics {
    pub volume_total: f64,
    pub result_total: f64,
    pub markup_avg_bps: f64,
    pub weighted_tenor_days: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePreset {
    #[serde(rename = "YTD")]
    Ytd,
    #[serde(rename = "MTD")]
    Mtd,
    D1,
    D2,
    #[serde(rename = "CUSTOM")]
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub preset: Option<DatePreset>,
}

/// Filtering criteria of the dashboard side panel. Consumed by the filter
/// component; nothing in the pipeline applies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub date_range: DateRange,
    pub counterparties: BTreeSet<String>,
    pub currencies: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
    pub sides: BTreeSet<String>,
    pub channels: BTreeSet<String>,
    pub notional_range: (f64, f64),
    pub tenor_range: (f64, f64),
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            date_range: DateRange::default(),
            counterparties: BTreeSet::new(),
            currencies: BTreeSet::new(),
            statuses: BTreeSet::new(),
            sides: BTreeSet::new(),
            channels: BTreeSet::new(),
            notional_range: (0.0, f64::MAX),
            tenor_range: (0.0, f64::MAX),
        }
    }
}
