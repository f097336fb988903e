// Tenor-keyed breakdowns of the analytics page
use super::Aggregation;
use ndf_shared::models::{NdfRecord, NotionalBucket, TenorBucket};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Side {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl Side {
    pub fn of(record: &NdfRecord) -> Self {
        if record.is_buy {
            Side::Buy
        } else {
            Side::Sell
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DealTally {
    deals: usize,
    total: usize,
}

impl DealTally {
    fn rate(&self) -> f64 {
        if self.total > 0 {
            self.deals as f64 / self.total as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenorConversion {
    pub tenor: TenorBucket,
    pub buy_rate: f64,
    pub sell_rate: f64,
}

/// Deal rate among actionable quotes, per tenor bucket and side. Buckets
/// present in the data only, in ladder order.
pub struct ConversionByTenorSide;

impl Aggregation for ConversionByTenorSide {
    type Output = Vec<TenorConversion>;

    fn name(&self) -> &str {
        "Conversion by tenor and side"
    }

    fn compute(&self, records: &[NdfRecord]) -> Vec<TenorConversion> {
        let mut tallies: BTreeMap<TenorBucket, (DealTally, DealTally)> = BTreeMap::new();
        for record in records {
            let (buy, sell) = tallies.entry(record.tenor_bucket).or_default();
            if !record.is_actionable {
                continue;
            }
            let tally = if record.is_buy { buy } else { sell };
            tally.total += 1;
            if record.is_deal() {
                tally.deals += 1;
            }
        }

        tallies
            .into_iter()
            .map(|(tenor, (buy, sell))| TenorConversion {
                tenor,
                buy_rate: buy.rate(),
                sell_rate: sell.rate(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideVolume {
    pub tenor: TenorBucket,
    pub buy: f64,
    /// Reported negative so the chart can draw it left of the axis.
    pub sell: f64,
}

/// Buy and sell notional per charted tenor bucket.
pub struct SideVolumeByTenor;

impl Aggregation for SideVolumeByTenor {
    type Output = Vec<SideVolume>;

    fn name(&self) -> &str {
        "Side volume by tenor"
    }

    fn compute(&self, records: &[NdfRecord]) -> Vec<SideVolume> {
        TenorBucket::CHARTED
            .into_iter()
            .map(|tenor| {
                let (buy, sell) = records
                    .iter()
                    .filter(|r| r.tenor_bucket == tenor)
                    .fold((0.0, 0.0), |(buy, sell), r| {
                        if r.is_buy {
                            (buy + r.notional, sell)
                        } else {
                            (buy, sell + r.notional)
                        }
                    });
                SideVolume { tenor, buy, sell: -sell }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub tenor: TenorBucket,
    pub notional: NotionalBucket,
    pub buy_pct: f64,
    pub label: String,
}

/// Share of buys in every charted tenor x notional cell. Empty cells read
/// as balanced (0.5).
pub struct SideHeatmap;

impl Aggregation for SideHeatmap {
    type Output = Vec<HeatmapCell>;

    fn name(&self) -> &str {
        "Side heatmap"
    }

    fn compute(&self, records: &[NdfRecord]) -> Vec<HeatmapCell> {
        let mut counts: BTreeMap<(TenorBucket, NotionalBucket), (usize, usize)> = BTreeMap::new();
        for record in records {
            let (buy, sell) = counts
                .entry((record.tenor_bucket, record.notional_bucket))
                .or_default();
            if record.is_buy {
                *buy += 1;
            } else {
                *sell += 1;
            }
        }

        let mut cells = Vec::with_capacity(TenorBucket::CHARTED.len() * NotionalBucket::ALL.len());
        for tenor in TenorBucket::CHARTED {
            for notional in NotionalBucket::ALL {
                let (buy, sell) = counts.get(&(tenor, notional)).copied().unwrap_or_default();
                let total = buy + sell;
                let buy_pct = if total > 0 { buy as f64 / total as f64 } else { 0.5 };
                cells.push(HeatmapCell {
                    tenor,
                    notional,
                    buy_pct,
                    label: format!("{:.1}%", buy_pct * 100.0),
                });
            }
        }
        cells
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenorSideBubble {
    pub tenor: TenorBucket,
    pub side: Side,
    pub deals: usize,
    pub actionable: usize,
    pub notional: f64,
    /// `None` when the group has no actionable quote.
    pub conversion: Option<f64>,
}

/// Conversion against notional per tenor bucket and side.
pub struct TenorSideBubbles;

impl Aggregation for TenorSideBubbles {
    type Output = Vec<TenorSideBubble>;

    fn name(&self) -> &str {
        "Tenor and side bubbles"
    }

    fn compute(&self, records: &[NdfRecord]) -> Vec<TenorSideBubble> {
        let mut groups: BTreeMap<(TenorBucket, Side), (DealTally, f64)> = BTreeMap::new();
        for record in records {
            let (tally, notional) = groups
                .entry((record.tenor_bucket, Side::of(record)))
                .or_default();
            if record.is_deal() {
                tally.deals += 1;
            }
            if record.is_actionable {
                tally.total += 1;
            }
            *notional += record.notional;
        }

        groups
            .into_iter()
            .map(|((tenor, side), (tally, notional))| TenorSideBubble {
                tenor,
                side,
                deals: tally.deals,
                actionable: tally.total,
                notional,
                conversion: (tally.total > 0).then(|| tally.rate()),
            })
            .collect()
    }
}
