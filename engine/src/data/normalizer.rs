//! Builds one [`NdfRecord`] from one raw row.
//!
//! Fixed-schema and mapped-schema rows go through the same derivation; they
//! only differ in the [`ColumnMapping`] used to resolve the row's columns.
//! Normalization never fails: unreadable cells become `None`, empty text or
//! the documented default.

use csv::StringRecord;
use ndf_shared::models::{NdfRecord, NotionalBucket, Status, TenorBucket};

use crate::data::column_mapping::{CanonicalField, ColumnMapping, FieldAccessor, RawRow, ResolvedColumns};
use crate::data::csv_parser::brazilian_format::{parse_datetime, parse_locale_number};
use crate::data::derive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowNormalizer {
    home_currency: String,
}

impl RowNormalizer {
    pub fn new(home_currency: impl Into<String>) -> Self {
        Self {
            home_currency: home_currency.into(),
        }
    }

    pub fn home_currency(&self) -> &str {
        &self.home_currency
    }

    /// Row in the platform's standard export layout.
    pub fn normalize_row(&self, headers: &StringRecord, record: &StringRecord) -> NdfRecord {
        self.normalize_row_with_mapping(headers, record, &ColumnMapping::fixed_schema())
    }

    /// Row of an arbitrary CSV, read through a user-confirmed mapping.
    pub fn normalize_row_with_mapping(
        &self,
        headers: &StringRecord,
        record: &StringRecord,
        mapping: &ColumnMapping,
    ) -> NdfRecord {
        let columns = ResolvedColumns::resolve(headers, mapping);
        self.normalize(&RawRow::new(&columns, record))
    }

    pub fn normalize(&self, row: &impl FieldAccessor) -> NdfRecord {
        let text = |field: CanonicalField| row.field(field).unwrap_or_default().to_string();
        let number = |field: CanonicalField| row.field(field).and_then(|cell| parse_locale_number(cell));
        let timestamp = |field: CanonicalField| row.field(field).and_then(parse_datetime);

        let rfq_timestamp = timestamp(CanonicalField::RfqTimestamp);
        let maturity_date = timestamp(CanonicalField::MaturityDate);
        let tenor_dc = derive::tenor_days(rfq_timestamp, maturity_date);

        let notional = number(CanonicalField::Notional).unwrap_or(0.0);
        let spot_fx = number(CanonicalField::SpotFx);
        let yield_ccy = number(CanonicalField::YieldCcy);
        let yield_client = number(CanonicalField::YieldClient);
        let fwd = number(CanonicalField::Fwd);
        let fwd_client = number(CanonicalField::FwdClient);
        let parity = text(CanonicalField::Parity);

        let is_buy = derive::resolve_is_buy(
            row.field(CanonicalField::Side),
            row.field(CanonicalField::SideBlotter),
        );
        let status = Status::parse(row.field(CanonicalField::Status).unwrap_or_default());
        let is_actionable = status.is_actionable();

        let markup_bps = derive::markup_bps(fwd_client, fwd, yield_client, yield_ccy);
        let pl_brl = derive::pl_home_currency(
            is_buy,
            fwd_client,
            fwd,
            notional,
            &parity,
            spot_fx,
            &self.home_currency,
        );

        NdfRecord {
            rfq_timestamp,
            maturity_date,
            status,
            rejected_message: text(CanonicalField::RejectedMessage),
            cnpj: text(CanonicalField::Cnpj),
            counterparty: text(CanonicalField::Counterparty),
            product: text(CanonicalField::Product),
            tenor_dc,
            tenor_bucket: TenorBucket::from_tenor(tenor_dc),
            currency: text(CanonicalField::Currency),
            parity,
            notional,
            notional_bucket: NotionalBucket::from_notional(notional),
            spot_cost: number(CanonicalField::SpotCost),
            spot_fx,
            yield_ccy,
            yield_client,
            yield_brl_cost: number(CanonicalField::YieldBrlCost),
            yield_brl_client: number(CanonicalField::YieldBrlClient),
            fwd,
            rfq_channel: text(CanonicalField::RfqChannel),
            fwd_client,
            side_blotter: text(CanonicalField::SideBlotter),
            side: text(CanonicalField::Side),
            is_buy,
            is_actionable,
            markup_bps,
            pl_brl,
        }
    }
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new("BRL")
    }
}
