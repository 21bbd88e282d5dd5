//! The resource-call seam between screen controllers and the transport.

use async_trait::async_trait;
use pronas_core::{
    AiHealth, Anexo, AnexoType, Case, CaseFilter, FormData, NewProject, ProcessReceipt, Project,
    StoredValidation, Suggestion, SuggestionRequest, UploadCategory, UploadFile, UploadReceipt,
    ValidationReport,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::ClientError;

/// Result of replacing an anexo's payload.
///
/// The server may run validation inline on save; when it does the report
/// comes back alongside the stored anexo.
#[derive(Debug, Clone, PartialEq)]
pub struct AnexoUpdate {
    pub anexo: Anexo,
    pub validation: Option<ValidationReport>,
}

/// Accepts both the `{anexo, validation}` envelope and a bare anexo body.
///
/// The inline validation is kept raw so an odd report never fails a save
/// the server has already stored.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum UpdateEnvelope {
    Wrapped {
        anexo: Anexo,
        #[serde(default)]
        validation: Option<Value>,
    },
    Bare(Anexo),
}

impl From<UpdateEnvelope> for AnexoUpdate {
    fn from(envelope: UpdateEnvelope) -> Self {
        match envelope {
            UpdateEnvelope::Wrapped { anexo, validation } => {
                let report = validation.and_then(|raw| {
                    let report = ValidationReport::from_value(raw);
                    if report.is_none() {
                        warn!(anexo_id = anexo.id, "ignoring unreadable inline validation");
                    }
                    report
                });
                Self {
                    anexo,
                    validation: report,
                }
            }
            UpdateEnvelope::Bare(anexo) => Self {
                anexo,
                validation: None,
            },
        }
    }
}

/// One operation per remote resource action.
///
/// Each call issues exactly one request: no retry, no batching, no
/// de-duplication of identical in-flight calls.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;

    async fn create_project(&self, project: &NewProject) -> Result<Project, ClientError>;

    async fn get_project(&self, id: i64) -> Result<Project, ClientError>;

    async fn delete_project(&self, id: i64) -> Result<(), ClientError>;

    async fn get_anexo(&self, id: i64) -> Result<Anexo, ClientError>;

    /// Replace the whole payload of anexo `id` with `dados`.
    async fn update_anexo(&self, id: i64, dados: &FormData) -> Result<AnexoUpdate, ClientError>;

    async fn list_project_anexos(&self, project_id: i64) -> Result<Vec<Anexo>, ClientError>;

    async fn suggest(&self, request: &SuggestionRequest) -> Result<Suggestion, ClientError>;

    /// Validate an unsaved payload.
    async fn validate_anexo(
        &self,
        dados: &FormData,
        tipo: &AnexoType,
    ) -> Result<ValidationReport, ClientError>;

    /// Validate the payload currently stored for anexo `id`.
    async fn validate_stored_anexo(&self, id: i64) -> Result<StoredValidation, ClientError>;

    async fn list_cases(&self, filter: CaseFilter) -> Result<Vec<Case>, ClientError>;

    async fn get_case(&self, id: i64) -> Result<Case, ClientError>;

    async fn upload_documents(
        &self,
        category: UploadCategory,
        files: &[UploadFile],
    ) -> Result<UploadReceipt, ClientError>;

    /// Index every pending document server-side. Not scoped to any batch.
    async fn process_documents(&self) -> Result<ProcessReceipt, ClientError>;

    async fn ai_health(&self) -> Result<AiHealth, ClientError>;
}
