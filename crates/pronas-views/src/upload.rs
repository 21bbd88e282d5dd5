//! Knowledge-base upload: send a batch of documents, then trigger indexing.

use std::sync::Arc;

use pronas_client::{ClientError, ResourceApi};
use pronas_core::{UploadCategory, UploadFile};
use tracing::{info, warn};

use crate::state::StateCell;
use crate::{Lifecycle, Notice, ViewError, ViewState};

const SCREEN: &str = "upload";

/// Manual fallback when indexing fails after a successful upload.
pub const MANUAL_IMPORT_COMMAND: &str = "./import_documents.sh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStage {
    #[default]
    Idle,
    Uploading,
    Processing,
}

impl UploadStage {
    /// Label for the trigger while the flow runs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Enviar e Processar",
            Self::Uploading => "Enviando...",
            Self::Processing => "Processando...",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub category: UploadCategory,
    pub files: Vec<UploadFile>,
    pub stage: UploadStage,
}

impl UploadForm {
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(UploadFile::size).sum()
    }
}

/// How far a triggered upload got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Completed { uploaded: u32, processed: u32 },
    /// Files were stored but indexing failed.
    Partial { uploaded: u32, error: ClientError },
}

pub struct UploadController {
    api: Arc<dyn ResourceApi>,
    lifecycle: Lifecycle,
    state: StateCell<UploadForm>,
}

impl UploadController {
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        Self {
            api,
            lifecycle: Lifecycle::new(),
            state: StateCell::new(),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn state(&self) -> ViewState<UploadForm> {
        self.state.snapshot()
    }

    pub fn activate(&self) {
        self.state.lock().ready(UploadForm::default());
    }

    pub fn select_category(&self, category: UploadCategory) -> Result<(), ViewError> {
        self.state.lock().data_mut()?.category = category;
        Ok(())
    }

    pub fn add_files(&self, files: impl IntoIterator<Item = UploadFile>) -> Result<(), ViewError> {
        self.state.lock().data_mut()?.files.extend(files);
        Ok(())
    }

    pub fn clear_files(&self) -> Result<(), ViewError> {
        self.state.lock().data_mut()?.files.clear();
        Ok(())
    }

    /// Upload the selected files, then ask the backend to index them.
    ///
    /// An upload failure stops before indexing and keeps the selection. An
    /// indexing failure after a good upload is a partial success.
    pub async fn upload(&self) -> Result<UploadOutcome, ViewError> {
        let (category, files) = {
            let mut state = self.state.lock();
            if state.is_submitting() {
                return Err(ViewError::Busy);
            }
            let form = state.data_mut()?;
            if form.files.is_empty() {
                state.set_notice(Notice::alert("Selecione pelo menos um arquivo"));
                return Err(ViewError::EmptySelection);
            }
            (form.category, form.files.clone())
        };

        let api = Arc::clone(&self.api);
        let outcome = self
            .state
            .submit(SCREEN, &self.lifecycle, async {
                self.set_stage(UploadStage::Uploading);
                let receipt = api.upload_documents(category, &files).await?;
                info!(uploaded = receipt.uploaded, category = %category, "documents uploaded");
                {
                    let mut state = self.state.lock();
                    if let Ok(form) = state.data_mut() {
                        form.files.clear();
                        form.stage = UploadStage::Processing;
                    }
                    state.set_notice(Notice::success(format!(
                        "✅ {} arquivos enviados! Processando...",
                        receipt.uploaded
                    )));
                }
                let processed = api.process_documents().await;
                Ok((receipt, processed))
            })
            .await;

        let (receipt, processed) = match outcome {
            Ok(done) => done,
            Err(ViewError::Client(err)) => {
                let text = match &err {
                    ClientError::Server { detail, .. } => format!("❌ Erro: {detail}"),
                    _ => "❌ Erro ao enviar arquivos".to_string(),
                };
                self.settle(Notice::failure(text));
                return Err(err.into());
            }
            Err(other) => return Err(other),
        };

        match processed {
            Ok(done) => {
                info!(processed = done.processed, "documents indexed");
                self.settle(Notice::success(format!(
                    "✅ Processamento concluído! {} documentos indexados na base de conhecimento.",
                    done.processed
                )));
                Ok(UploadOutcome::Completed {
                    uploaded: receipt.uploaded,
                    processed: done.processed,
                })
            }
            Err(err) => {
                warn!(error = %err, "indexing failed after upload");
                self.settle(Notice::warning(format!(
                    "⚠️ Upload OK, mas erro ao processar. Execute manualmente: {MANUAL_IMPORT_COMMAND}"
                )));
                Ok(UploadOutcome::Partial {
                    uploaded: receipt.uploaded,
                    error: err,
                })
            }
        }
    }

    fn set_stage(&self, stage: UploadStage) {
        if let Ok(form) = self.state.lock().data_mut() {
            form.stage = stage;
        }
    }

    fn settle(&self, notice: Notice) {
        let mut state = self.state.lock();
        if let Ok(form) = state.data_mut() {
            form.stage = UploadStage::Idle;
        }
        state.set_notice(notice);
    }
}
