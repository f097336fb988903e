// Handler computing every dashboard aggregation over the current collection
use ndf_shared::models::{KpiMetrics, NdfRecord};
use serde::Serialize;

use crate::analytics::kpis::Kpis;
use crate::analytics::overview::{
    ClientNotionalDistribution, CurrencyResult, NotionalRangeCount, RejectionReason, RejectionReasons,
    ResultByCurrency, StatusCount, StatusDistribution,
};
use crate::analytics::tenor::{
    ConversionByTenorSide, HeatmapCell, SideHeatmap, SideVolume, SideVolumeByTenor, TenorConversion,
    TenorSideBubble, TenorSideBubbles,
};
use crate::analytics::Aggregation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub record_count: usize,
    pub kpis: KpiMetrics,
    pub result_by_currency: Vec<CurrencyResult>,
    pub status_distribution: Vec<StatusCount>,
    pub rejection_reasons: Vec<RejectionReason>,
    pub client_notional_distribution: Vec<NotionalRangeCount>,
    pub conversion_by_tenor: Vec<TenorConversion>,
    pub side_volume: Vec<SideVolume>,
    pub heatmap: Vec<HeatmapCell>,
    pub bubbles: Vec<TenorSideBubble>,
}

pub fn handle_dashboard_summary(records: &[NdfRecord]) -> DashboardSummary {
    tracing::debug!(records = records.len(), aggregation = Kpis.name(), "Computing dashboard summary");
    DashboardSummary {
        record_count: records.len(),
        kpis: Kpis.compute(records),
        result_by_currency: ResultByCurrency.compute(records),
        status_distribution: StatusDistribution.compute(records),
        rejection_reasons: RejectionReasons.compute(records),
        client_notional_distribution: ClientNotionalDistribution.compute(records),
        conversion_by_tenor: ConversionByTenorSide.compute(records),
        side_volume: SideVolumeByTenor.compute(records),
        heatmap: SideHeatmap.compute(records),
        bubbles: TenorSideBubbles.compute(records),
    }
}
