//! Column mapping between arbitrary CSV headers and the canonical NDF fields.
//!
//! A [`ColumnMapping`] is built once per import, either from the fixed export
//! schema or from the user's choices in the import wizard. It is then resolved
//! against the file's header row into [`ResolvedColumns`], and every data row
//! is read through the [`FieldAccessor`] seam so the normalizer never deals
//! with header names.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    RfqTimestamp,
    MaturityDate,
    Status,
    Notional,
    Side,
    Counterparty,
    Currency,
    Parity,
    SpotCost,
    SpotFx,
    YieldCcy,
    YieldClient,
    YieldBrlCost,
    YieldBrlClient,
    Fwd,
    FwdClient,
    Cnpj,
    Product,
    RfqChannel,
    SideBlotter,
    RejectedMessage,
}

impl CanonicalField {
    pub const COUNT: usize = 21;

    pub const ALL: [CanonicalField; Self::COUNT] = [
        CanonicalField::RfqTimestamp,
        CanonicalField::MaturityDate,
        CanonicalField::Status,
        CanonicalField::Notional,
        CanonicalField::Side,
        CanonicalField::Counterparty,
        CanonicalField::Currency,
        CanonicalField::Parity,
        CanonicalField::SpotCost,
        CanonicalField::SpotFx,
        CanonicalField::YieldCcy,
        CanonicalField::YieldClient,
        CanonicalField::YieldBrlCost,
        CanonicalField::YieldBrlClient,
        CanonicalField::Fwd,
        CanonicalField::FwdClient,
        CanonicalField::Cnpj,
        CanonicalField::Product,
        CanonicalField::RfqChannel,
        CanonicalField::SideBlotter,
        CanonicalField::RejectedMessage,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            CanonicalField::RfqTimestamp => "rfqTimestamp",
            CanonicalField::MaturityDate => "maturityDate",
            CanonicalField::Status => "status",
            CanonicalField::Notional => "notional",
            CanonicalField::Side => "side",
            CanonicalField::Counterparty => "counterparty",
            CanonicalField::Currency => "currency",
            CanonicalField::Parity => "parity",
            CanonicalField::SpotCost => "spotCost",
            CanonicalField::SpotFx => "spotFx",
            CanonicalField::YieldCcy => "yieldCcy",
            CanonicalField::YieldClient => "yieldClient",
            CanonicalField::YieldBrlCost => "yieldBrlCost",
            CanonicalField::YieldBrlClient => "yieldBrlClient",
            CanonicalField::Fwd => "fwd",
            CanonicalField::FwdClient => "fwdClient",
            CanonicalField::Cnpj => "cnpj",
            CanonicalField::Product => "product",
            CanonicalField::RfqChannel => "rfqChannel",
            CanonicalField::SideBlotter => "sideBlotter",
            CanonicalField::RejectedMessage => "rejectedMessage",
        }
    }

    /// Human label shown in the mapping step and used for auto-suggestion.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalField::RfqTimestamp => "RFQ Timestamp",
            CanonicalField::MaturityDate => "Maturity Date",
            CanonicalField::Status => "Status",
            CanonicalField::Notional => "Notional",
            CanonicalField::Side => "Side",
            CanonicalField::Counterparty => "Counterparty",
            CanonicalField::Currency => "Currency",
            CanonicalField::Parity => "Parity",
            CanonicalField::SpotCost => "Spot Cost",
            CanonicalField::SpotFx => "Spot FX",
            CanonicalField::YieldCcy => "Yield (CCY)",
            CanonicalField::YieldClient => "Yield (Client)",
            CanonicalField::YieldBrlCost => "Yield (BRL) Cost",
            CanonicalField::YieldBrlClient => "Yield (BRL) Client",
            CanonicalField::Fwd => "FWD",
            CanonicalField::FwdClient => "FWD-Client",
            CanonicalField::Cnpj => "CNPJ",
            CanonicalField::Product => "Product",
            CanonicalField::RfqChannel => "RFQ Channel",
            CanonicalField::SideBlotter => "Side (Blotter)",
            CanonicalField::RejectedMessage => "Rejected Message",
        }
    }

    /// Exact header of this field in the platform's standard export.
    pub fn fixed_header(self) -> &'static str {
        match self {
            CanonicalField::RfqTimestamp => "RFQ Timestamp",
            CanonicalField::MaturityDate => "Maturity Date",
            CanonicalField::Status => "Status",
            CanonicalField::Notional => "Notional",
            CanonicalField::Side => "Side",
            CanonicalField::Counterparty => "Counterparty",
            CanonicalField::Currency => "Currency",
            CanonicalField::Parity => "Parity",
            CanonicalField::SpotCost => "Spot Cost (Sett. Rate)",
            CanonicalField::SpotFx => "Spot FX",
            CanonicalField::YieldCcy => "Yield (CCY)",
            CanonicalField::YieldClient => "Yield (Client)",
            CanonicalField::YieldBrlCost => "Yield (BRL) cost rate",
            CanonicalField::YieldBrlClient => "Yield (BRL) client rate",
            CanonicalField::Fwd => "FWD",
            CanonicalField::FwdClient => "FWD-Client",
            CanonicalField::Cnpj => "CNPJ",
            CanonicalField::Product => "Product",
            CanonicalField::RfqChannel => "rfq_channel",
            CanonicalField::SideBlotter => "Side (Blotter)",
            CanonicalField::RejectedMessage => "Rejected message",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CanonicalField::RfqTimestamp => "Data e hora da cotação (YYYY-MM-DD HH:MM:SS)",
            CanonicalField::MaturityDate => "Data de vencimento (YYYY-MM-DD)",
            CanonicalField::Status => "Status da operação (DEAL, NOTH.DONE, REJECTED, etc.)",
            CanonicalField::Notional => "Valor nocional da operação",
            CanonicalField::Side => "Lado da operação (Compra/Venda ou BUY/SELL)",
            CanonicalField::Counterparty => "Nome da contraparte",
            CanonicalField::Currency => "Moeda da operação (USD, EUR, etc.)",
            CanonicalField::Parity => "Paridade (ex: USD/BRL)",
            CanonicalField::SpotCost => "Taxa spot de custo (taxa de liquidação)",
            CanonicalField::SpotFx => "Taxa de câmbio spot",
            CanonicalField::YieldCcy => "Yield em moeda estrangeira",
            CanonicalField::YieldClient => "Yield do cliente",
            CanonicalField::YieldBrlCost => "Yield em BRL (custo)",
            CanonicalField::YieldBrlClient => "Yield em BRL (cliente)",
            CanonicalField::Fwd => "Taxa forward (custo)",
            CanonicalField::FwdClient => "Taxa forward (cliente)",
            CanonicalField::Cnpj => "CNPJ da contraparte",
            CanonicalField::Product => "Produto",
            CanonicalField::RfqChannel => "Canal da cotação",
            CanonicalField::SideBlotter => "Lado da operação no blotter",
            CanonicalField::RejectedMessage => "Motivo da rejeição",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            CanonicalField::RfqTimestamp
                | CanonicalField::MaturityDate
                | CanonicalField::Status
                | CanonicalField::Notional
                | CanonicalField::Side
        )
    }

    pub fn required() -> impl Iterator<Item = CanonicalField> {
        Self::ALL.into_iter().filter(|field| field.is_required())
    }

    fn matches_header(self, header: &str) -> bool {
        let header = header.to_lowercase();
        header == self.label().to_lowercase() || header == self.fixed_header().to_lowercase()
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Canonical field -> CSV header. Serialized as a flat JSON object keyed by
/// the camelCase field key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<CanonicalField, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field bound to its header in the standard export.
    pub fn fixed_schema() -> Self {
        let entries = CanonicalField::ALL
            .into_iter()
            .map(|field| (field, field.fixed_header().to_string()))
            .collect();
        Self { entries }
    }

    /// Proposes a mapping by case-insensitive exact match of each field's
    /// label (or standard header) against the detected columns. The first
    /// matching column wins.
    pub fn suggest<'a, I>(columns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let columns: Vec<&str> = columns.into_iter().collect();
        let entries = CanonicalField::ALL
            .into_iter()
            .filter_map(|field| {
                columns
                    .iter()
                    .find(|column| field.matches_header(column))
                    .map(|column| (field, column.to_string()))
            })
            .collect();
        Self { entries }
    }

    pub fn assign(&mut self, field: CanonicalField, header: impl Into<String>) {
        self.entries.insert(field, header.into());
    }

    pub fn unassign(&mut self, field: CanonicalField) -> Option<String> {
        self.entries.remove(&field)
    }

    /// An entry with a blank header counts as unmapped.
    pub fn header_for(&self, field: CanonicalField) -> Option<&str> {
        self.entries
            .get(&field)
            .map(String::as_str)
            .filter(|header| !header.is_empty())
    }

    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        self.header_for(field).is_some()
    }

    pub fn mapped(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        CanonicalField::ALL
            .into_iter()
            .filter_map(|field| self.header_for(field).map(|header| (field, header)))
    }

    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::required()
            .filter(|field| !self.is_mapped(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn ensure_complete(&self) -> EngineResult<()> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(EngineError::IncompleteMapping { missing })
        }
    }

    /// Headers claimed by more than one field. Allowed, but rarely intended.
    pub fn collisions(&self) -> Vec<(&str, Vec<CanonicalField>)> {
        let mut by_header: BTreeMap<&str, Vec<CanonicalField>> = BTreeMap::new();
        for (field, header) in self.mapped() {
            by_header.entry(header).or_default().push(field);
        }
        by_header
            .into_iter()
            .filter(|(_, fields)| fields.len() > 1)
            .collect()
    }
}

/// Column positions of each canonical field within one file's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    positions: [Option<usize>; CanonicalField::COUNT],
}

impl ResolvedColumns {
    pub fn resolve(headers: &StringRecord, mapping: &ColumnMapping) -> Self {
        let mut positions = [None; CanonicalField::COUNT];
        for (field, header) in mapping.mapped() {
            positions[field.index()] = headers.iter().position(|candidate| candidate == header);
        }
        Self { positions }
    }

    pub fn position(&self, field: CanonicalField) -> Option<usize> {
        self.positions[field.index()]
    }
}

/// Read access to the canonical fields of one raw row. `None` means the field
/// is unmapped or its column is absent from the row.
pub trait FieldAccessor {
    fn field(&self, field: CanonicalField) -> Option<&str>;
}

/// One CSV record viewed through a resolved mapping.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    columns: &'a ResolvedColumns,
    record: &'a StringRecord,
}

impl<'a> RawRow<'a> {
    pub fn new(columns: &'a ResolvedColumns, record: &'a StringRecord) -> Self {
        Self { columns, record }
    }
}

impl FieldAccessor for RawRow<'_> {
    fn field(&self, field: CanonicalField) -> Option<&str> {
        self.columns
            .position(field)
            .and_then(|pos| self.record.get(pos))
    }
}
