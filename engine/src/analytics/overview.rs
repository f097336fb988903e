// Overview page breakdowns: result per currency, status counts, rejection
// reasons and client notional ranges.
use super::Aggregation;
use ndf_shared::models::{NdfRecord, Status};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyResult {
    pub currency: String,
    pub value_thousands: f64,
}

/// DEAL P&L per currency, in thousands, closed by a `Subtotal` row.
pub struct ResultByCurrency;

impl Aggregation for ResultByCurrency {
    type Output = Vec<CurrencyResult>;

    fn name(&self) -> &str {
        "Result by currency"
    }

    fn compute(&self, records: &[NdfRecord]) -> Vec<CurrencyResult> {
        if records.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<CurrencyResult> = Vec::new();
        for record in records.iter().filter(|r| r.is_deal()) {
            let value = record.pl_brl.unwrap_or(0.0) / 1_000.0;
            match results.iter_mut().find(|r| r.currency == record.currency) {
                Some(entry) => entry.value_thousands += value,
                None => results.push(CurrencyResult {
                    currency: record.currency.clone(),
                    value_thousands: value,
                }),
            }
        }

        let subtotal = results.iter().map(|r| r.value_thousands).sum();
        results.push(CurrencyResult {
            currency: "Subtotal".to_string(),
            value_thousands: subtotal,
        });
        results
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: &'static str,
    pub count: usize,
}

/// Counts of DEAL, NOT DONE and REJECTED, always in that order.
pub struct StatusDistribution;

impl Aggregation for StatusDistribution {
    type Output = Vec<StatusCount>;

    fn name(&self) -> &str {
        "Status distribution"
    }

    fn compute(&self, records: &[NdfRecord]) -> Vec<StatusCount> {
        if records.is_empty() {
            return Vec::new();
        }
        let count = |status: Status| records.iter().filter(|r| r.status == status).count();
        vec![
            StatusCount { status: "DEAL", count: count(Status::Deal) },
            StatusCount { status: "NOT DONE", count: count(Status::NothDone) },
            StatusCount { status: "REJECTED", count: count(Status::Rejected) },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionReason {
    pub reason: String,
    pub count: usize,
    pub pct_of_rejections: f64,
    pub pct_of_total: f64,
}

pub struct RejectionReasons;

impl Aggregation for RejectionReasons {
    type Output = Vec<RejectionReason>;

    fn name(&self) -> &str {
        "Rejection reasons"
    }

    /// Sorted by count, most frequent first; ties keep first-seen order.
    fn compute(&self, records: &[NdfRecord]) -> Vec<RejectionReason> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for record in records.iter().filter(|r| r.status == Status::Rejected) {
            let reason = if record.rejected_message.is_empty() {
                "Unknown"
            } else {
                record.rejected_message.as_str()
            };
            match counts.iter_mut().find(|(name, _)| name == reason) {
                Some((_, count)) => *count += 1,
                None => counts.push((reason.to_string(), 1)),
            }
        }

        let total_rejections: usize = counts.iter().map(|(_, count)| count).sum();
        let total_operations = records.len();
        let pct = |value: usize, total: usize| {
            if total > 0 {
                value as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        };

        let mut reasons: Vec<RejectionReason> = counts
            .into_iter()
            .map(|(reason, count)| RejectionReason {
                reason,
                count,
                pct_of_rejections: pct(count, total_rejections),
                pct_of_total: pct(count, total_operations),
            })
            .collect();
        reasons.sort_by(|a, b| b.count.cmp(&a.count));
        reasons
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotionalRangeCount {
    pub label: &'static str,
    pub count: usize,
}

// No 5k-10k range and nothing at or above 100k: such clients go uncounted
const CLIENT_NOTIONAL_RANGES: [(&str, f64, f64); 4] = [
    ("0-1k", 0.0, 1_000.0),
    ("1k-5k", 1_000.0, 5_000.0),
    ("10k-50k", 10_000.0, 50_000.0),
    ("50k-100k", 50_000.0, 100_000.0),
];

/// Number of clients per range of total notional quoted.
pub struct ClientNotionalDistribution;

impl Aggregation for ClientNotionalDistribution {
    type Output = Vec<NotionalRangeCount>;

    fn name(&self) -> &str {
        "Client notional distribution"
    }

    fn compute(&self, records: &[NdfRecord]) -> Vec<NotionalRangeCount> {
        if records.is_empty() {
            return Vec::new();
        }

        let mut per_client: HashMap<&str, f64> = HashMap::new();
        for record in records.iter().filter(|r| !r.counterparty.is_empty()) {
            *per_client.entry(record.counterparty.as_str()).or_default() += record.notional;
        }

        let mut ranges: Vec<NotionalRangeCount> = CLIENT_NOTIONAL_RANGES
            .iter()
            .map(|&(label, _, _)| NotionalRangeCount { label, count: 0 })
            .collect();
        for total in per_client.values() {
            if let Some(idx) = CLIENT_NOTIONAL_RANGES
                .iter()
                .position(|(_, min, max)| total >= min && total < max)
            {
                ranges[idx].count += 1;
            }
        }
        ranges
    }
}
