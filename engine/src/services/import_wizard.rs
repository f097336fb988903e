// Headless import wizard: pick a file, confirm the column mapping, import.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::import_service::{ImportSummary, NdfImportService};
use crate::data::column_mapping::{CanonicalField, ColumnMapping};
use crate::data::csv_parser::CsvPreview;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WizardStep {
    Upload,
    Mapping,
    Confirm,
}

impl WizardStep {
    pub const COUNT: usize = 3;

    /// 1-based position, for "step n of 3" displays.
    pub fn position(self) -> usize {
        match self {
            WizardStep::Upload => 1,
            WizardStep::Mapping => 2,
            WizardStep::Confirm => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Upload => "Upload do arquivo",
            WizardStep::Mapping => "Mapeamento de colunas",
            WizardStep::Confirm => "Confirmação",
        }
    }
}

pub struct ImportWizard {
    service: Arc<NdfImportService>,
    step: WizardStep,
    file: Option<PathBuf>,
    preview: Option<CsvPreview>,
    mapping: ColumnMapping,
}

impl ImportWizard {
    pub fn new(service: Arc<NdfImportService>) -> Self {
        ImportWizard {
            service,
            step: WizardStep::Upload,
            file: None,
            preview: None,
            mapping: ColumnMapping::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn preview(&self) -> Option<&CsvPreview> {
        self.preview.as_ref()
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Fraction of the wizard completed, in `(0, 1]`.
    pub fn progress(&self) -> f64 {
        self.step.position() as f64 / WizardStep::COUNT as f64
    }

    /// Inspects the file and seeds the mapping with the suggested one. Only
    /// allowed on the upload step; a rejected file leaves the session as is.
    pub async fn select_file(&mut self, path: impl AsRef<Path>) -> EngineResult<&CsvPreview> {
        let path = path.as_ref();
        if self.step != WizardStep::Upload {
            return Err(EngineError::WizardError(format!(
                "Arquivo só pode ser escolhido na etapa de upload (etapa atual: {})",
                self.step.title()
            )));
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(EngineError::WizardError(format!(
                "Por favor, selecione um arquivo CSV válido: {}",
                path.display()
            )));
        }

        let preview = self.service.inspect_csv(path).await?;
        tracing::debug!(
            path = %path.display(),
            missing_required = preview.suggested_mapping.missing_required().len(),
            "Wizard file selected"
        );
        self.mapping = preview.suggested_mapping.clone();
        self.file = Some(path.to_path_buf());
        Ok(&*self.preview.insert(preview))
    }

    pub fn set_mapping(&mut self, mapping: ColumnMapping) {
        self.mapping = mapping;
    }

    pub fn assign(&mut self, field: CanonicalField, header: impl Into<String>) {
        self.mapping.assign(field, header);
    }

    pub fn unassign(&mut self, field: CanonicalField) -> Option<String> {
        self.mapping.unassign(field)
    }

    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Upload => self.file.is_some(),
            WizardStep::Mapping => self.mapping.is_complete(),
            WizardStep::Confirm => false,
        }
    }

    pub fn next(&mut self) -> EngineResult<WizardStep> {
        self.step = match self.step {
            WizardStep::Upload if self.file.is_none() => {
                return Err(EngineError::WizardError("Nenhum arquivo selecionado".to_string()));
            }
            WizardStep::Upload => WizardStep::Mapping,
            WizardStep::Mapping => {
                self.mapping.ensure_complete()?;
                WizardStep::Confirm
            }
            WizardStep::Confirm => {
                return Err(EngineError::WizardError("Já está na última etapa".to_string()));
            }
        };
        Ok(self.step)
    }

    /// Going back keeps the selected file and the edited mapping.
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Upload | WizardStep::Mapping => WizardStep::Upload,
            WizardStep::Confirm => WizardStep::Mapping,
        };
        self.step
    }

    /// Runs the mapped ingestion from the confirm step. On success the
    /// session starts over; on failure it stays where it was.
    pub async fn import(&mut self) -> EngineResult<ImportSummary> {
        let file = match (&self.step, &self.file) {
            (WizardStep::Confirm, Some(file)) => file.clone(),
            _ => {
                return Err(EngineError::WizardError(format!(
                    "Importação só é possível na etapa de confirmação (etapa atual: {})",
                    self.step.title()
                )));
            }
        };
        let summary = self.service.load_csv_data_with_mapping(&file, &self.mapping).await?;
        self.reset();
        Ok(summary)
    }

    pub fn reset(&mut self) {
        self.step = WizardStep::Upload;
        self.file = None;
        self.preview = None;
        self.mapping = ColumnMapping::new();
    }
}
