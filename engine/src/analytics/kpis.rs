// Headline KPIs of the overview page
use super::Aggregation;
use ndf_shared::models::{KpiMetrics, NdfRecord};

pub struct Kpis;

impl Aggregation for Kpis {
    type Output = KpiMetrics;

    fn name(&self) -> &str {
        "KPIs"
    }

    /// Volume, result, markup and tenor are taken over DEAL rows only. Markup
    /// and tenor are notional-weighted; rows without a value still count in
    /// the notional denominator.
    fn compute(&self, records: &[NdfRecord]) -> KpiMetrics {
        if records.is_empty() {
            return KpiMetrics::default();
        }

        let mut deal_count = 0usize;
        let mut actionable_count = 0usize;
        let mut volume_total = 0.0;
        let mut result_total = 0.0;
        let mut weighted_markup = 0.0;
        let mut weighted_tenor = 0.0;

        for record in records {
            if record.is_actionable {
                actionable_count += 1;
            }
            if !record.is_deal() {
                continue;
            }
            deal_count += 1;
            volume_total += record.notional;
            result_total += record.pl_brl.unwrap_or(0.0);
            if let Some(markup) = record.markup_bps {
                weighted_markup += markup * record.notional;
            }
            if let Some(tenor) = record.tenor_dc {
                weighted_tenor += tenor as f64 * record.notional;
            }
        }

        let weighted_avg = |sum: f64| if volume_total > 0.0 { sum / volume_total } else { 0.0 };
        KpiMetrics {
            volume_total,
            result_total,
            markup_avg_bps: weighted_avg(weighted_markup),
            weighted_tenor_days: weighted_avg(weighted_tenor),
            conversion_rate: if actionable_count > 0 {
                deal_count as f64 / actionable_count as f64
            } else {
                0.0
            },
        }
    }
}
