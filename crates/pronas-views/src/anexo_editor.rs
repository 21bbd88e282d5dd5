//! Anexo editor: the editable form of one annex, with AI suggestions and
//! validation.

use std::sync::Arc;

use pronas_client::{AnexoUpdate, ResourceApi};
use pronas_core::{Anexo, FormData, ProjectContext, SuggestionRequest, ValidationReport};
use tracing::{info, warn};

use crate::state::StateCell;
use crate::{Lifecycle, Notice, SuggestionPanel, ViewError, ViewState};

const SCREEN: &str = "anexo_editor";

/// Everything the anexo editor shows and edits.
#[derive(Debug, Clone)]
pub struct AnexoSheet {
    /// Last anexo the server returned.
    pub anexo: Anexo,
    /// Local working copy of `anexo.dados`.
    pub form: FormData,
    pub context: ProjectContext,
    pub validation: Option<ValidationReport>,
    pub panel: SuggestionPanel,
}

impl AnexoSheet {
    fn new(anexo: Anexo, context: ProjectContext) -> Self {
        Self {
            form: anexo.dados.clone(),
            anexo,
            context,
            validation: None,
            panel: SuggestionPanel::new(),
        }
    }

    /// Share of non-blank fields in the local form. Display only; the
    /// server's `completion_score` is authoritative.
    pub fn fill_ratio(&self) -> u8 {
        self.form.fill_percentage()
    }

    /// Whether the form differs from what the server last returned.
    pub fn is_dirty(&self) -> bool {
        self.form != self.anexo.dados
    }
}

pub struct AnexoEditorController {
    api: Arc<dyn ResourceApi>,
    anexo_id: i64,
    lifecycle: Lifecycle,
    state: StateCell<AnexoSheet>,
}

impl AnexoEditorController {
    pub fn new(api: Arc<dyn ResourceApi>, anexo_id: i64) -> Self {
        Self {
            api,
            anexo_id,
            lifecycle: Lifecycle::new(),
            state: StateCell::new(),
        }
    }

    pub fn anexo_id(&self) -> i64 {
        self.anexo_id
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn state(&self) -> ViewState<AnexoSheet> {
        self.state.snapshot()
    }

    /// Read the anexo, then its project for suggestion context.
    ///
    /// Only the anexo is required. When the project cannot be read the
    /// default context is used.
    pub async fn activate(&self) -> Result<(), ViewError> {
        let api = Arc::clone(&self.api);
        let id = self.anexo_id;
        self.state
            .load(SCREEN, &self.lifecycle, async move {
                let anexo = api.get_anexo(id).await?;
                let context = match api.get_project(anexo.project_id).await {
                    Ok(project) => ProjectContext::from(&project),
                    Err(err) => {
                        warn!(project_id = anexo.project_id, error = %err, "project context unavailable, using defaults");
                        ProjectContext::default()
                    }
                };
                Ok(AnexoSheet::new(anexo, context))
            })
            .await
    }

    /// Edit one field of the local form. Allowed while a save is in flight.
    pub fn set_field(&self, field: &str, value: impl Into<String>) -> Result<(), ViewError> {
        let mut state = self.state.lock();
        state.data_mut()?.form.set(field, value);
        Ok(())
    }

    /// PUT the whole form, then re-read the anexo.
    ///
    /// The re-read replaces the form only if it was not edited while the
    /// save was in flight. A failed write leaves the form as it was.
    pub async fn save(&self) -> Result<(), ViewError> {
        let submitted = self.state.lock().data_mut()?.form.clone();
        let api = Arc::clone(&self.api);
        let id = self.anexo_id;
        let payload = submitted.clone();
        let outcome = self
            .state
            .submit(SCREEN, &self.lifecycle, async move {
                let update = api.update_anexo(id, &payload).await?;
                let reloaded = api.get_anexo(id).await;
                Ok((update, reloaded))
            })
            .await;

        let (AnexoUpdate { anexo, validation }, reloaded) = match outcome {
            Ok(done) => done,
            Err(ViewError::Client(err)) => {
                self.state
                    .lock()
                    .set_notice(Notice::failure("❌ Erro ao salvar anexo"));
                return Err(err.into());
            }
            Err(other) => return Err(other),
        };
        info!(anexo_id = id, "anexo saved");

        let mut state = self.state.lock();
        let sheet = state.data_mut()?;
        let (latest, notice) = match reloaded {
            Ok(fresh) => (fresh, Notice::success("✅ Anexo salvo com sucesso!")),
            Err(err) => {
                warn!(anexo_id = id, error = %err, "reload after save failed");
                (
                    anexo,
                    Notice::warning("⚠️ Anexo salvo, mas não foi possível recarregar os dados"),
                )
            }
        };
        if sheet.form == submitted {
            sheet.form = latest.dados.clone();
        }
        sheet.anexo = latest;
        if validation.is_some() {
            sheet.validation = validation;
        }
        state.set_notice(notice);
        Ok(())
    }

    /// Ask the backend to score the current local form.
    pub async fn validate(&self) -> Result<ValidationReport, ViewError> {
        let (form, tipo) = {
            let mut state = self.state.lock();
            let sheet = state.data_mut()?;
            (sheet.form.clone(), sheet.anexo.tipo.clone())
        };
        let api = Arc::clone(&self.api);
        let outcome = self
            .state
            .submit(SCREEN, &self.lifecycle, async move {
                api.validate_anexo(&form, &tipo).await
            })
            .await;

        let mut state = self.state.lock();
        match outcome {
            Ok(report) => {
                state.data_mut()?.validation = Some(report.clone());
                state.set_notice(Notice::success(format!(
                    "✅ Validação concluída: {}/100",
                    report.score
                )));
                Ok(report)
            }
            Err(ViewError::Client(err)) => {
                state.set_notice(Notice::failure("❌ Erro ao validar anexo"));
                Err(err.into())
            }
            Err(other) => Err(other),
        }
    }

    /// Request a suggestion for `field`, discarding any unapplied one.
    pub async fn request_suggestion(&self, field: &str) -> Result<(), ViewError> {
        let (ticket, request) = {
            let mut state = self.state.lock();
            let sheet = state.data_mut()?;
            let current = sheet.form.get(field).unwrap_or_default().to_string();
            let ticket = sheet.panel.begin_request(field);
            (
                ticket,
                SuggestionRequest::new(field, current, sheet.context.clone()),
            )
        };
        let api = Arc::clone(&self.api);
        let result = self
            .lifecycle
            .guard(async move { api.suggest(&request).await })
            .await?;

        if let Err(err) = &result {
            warn!(field, error = %err, "suggestion request failed");
        }
        let failure = result.as_ref().err().cloned();
        let mut state = self.state.lock();
        state.data_mut()?.panel.finish_request(ticket, result);
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Write the offered suggestion into the form. Returns the field written.
    pub fn apply_suggestion(&self) -> Result<String, ViewError> {
        let mut state = self.state.lock();
        let sheet = state.data_mut()?;
        sheet.panel.apply(&mut sheet.form)
    }

    pub fn discard_suggestion(&self) -> Result<(), ViewError> {
        let mut state = self.state.lock();
        state.data_mut()?.panel.discard();
        Ok(())
    }
}
