//! In-memory [`ResourceApi`] used by the controller tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use pronas_client::{AnexoUpdate, ClientError, ResourceApi};
use pronas_core::{
    AiHealth, Anexo, AnexoType, Case, CaseFilter, FormData, NewProject, ProcessReceipt, Project,
    ProjectStatus, StoredValidation, Suggestion, SuggestionRequest, UploadCategory, UploadFile,
    UploadReceipt, ValidationReport, ValidationStatus,
};

#[derive(Default)]
struct Store {
    projects: BTreeMap<i64, Project>,
    anexos: BTreeMap<i64, Anexo>,
    cases: BTreeMap<i64, Case>,
    uploads: Vec<(UploadCategory, Vec<String>)>,
    pending_documents: u32,
    failing: HashSet<&'static str>,
    calls: Vec<&'static str>,
    events: Vec<String>,
    last_suggest: Option<SuggestionRequest>,
    next_id: i64,
}

/// Behaves like the real backend for the calls controllers make, yields once
/// per call so concurrent futures interleave, and can be told to fail any
/// operation by name.
#[derive(Default)]
pub(crate) struct FakeApi {
    store: Mutex<Store>,
}

pub(crate) fn project(id: i64, title: &str, status: ProjectStatus, completion: u8) -> Project {
    Project {
        id,
        title: title.into(),
        description: None,
        field: pronas_core::ProjectField::MedicalAssistance,
        status,
        institution_name: Some("Hospital Regional".into()),
        institution_cnpj: Some("00.000.000/0001-00".into()),
        priority_area: Some("Reabilitação Física".into()),
        completion_percentage: completion,
        total_budget: None,
        owner_id: None,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn anexo(id: i64, project_id: i64, tipo: AnexoType, dados: FormData) -> Anexo {
    Anexo {
        id,
        project_id,
        nome: Some(tipo.display_name().to_string()),
        tipo,
        completion_score: dados.fill_percentage(),
        dados,
        validation_status: None,
        ai_suggestions: Vec::new(),
    }
}

pub(crate) fn case(id: i64, approved: bool) -> Case {
    Case {
        id,
        project_title: Some(format!("Caso {id}")),
        institution_name: None,
        year: Some(2024),
        field: None,
        priority_area: None,
        is_approved: Some(approved),
        score: None,
        budget: None,
        summary: None,
        full_text: None,
        key_points: None,
        rejection_reasons: None,
    }
}

fn simulated_failure() -> ClientError {
    ClientError::Server {
        status: 500,
        detail: "falha simulada".into(),
    }
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        let api = Self::default();
        api.lock().next_id = 100;
        api
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    pub(crate) fn with_project(self, project: Project) -> Self {
        self.lock().projects.insert(project.id, project);
        self
    }

    pub(crate) fn with_anexo(self, anexo: Anexo) -> Self {
        self.lock().anexos.insert(anexo.id, anexo);
        self
    }

    pub(crate) fn with_case(self, case: Case) -> Self {
        self.lock().cases.insert(case.id, case);
        self
    }

    pub(crate) fn with_pending_documents(self, count: u32) -> Self {
        self.lock().pending_documents = count;
        self
    }

    pub(crate) fn fail(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    pub(crate) fn recover(&self, op: &'static str) {
        self.lock().failing.remove(op);
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    /// `start:<op>` and `end:<op>` markers around each call's yield point.
    pub(crate) fn events(&self) -> Vec<String> {
        self.lock().events.clone()
    }

    pub(crate) fn count(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    pub(crate) fn stored_anexo(&self, id: i64) -> Option<Anexo> {
        self.lock().anexos.get(&id).cloned()
    }

    pub(crate) fn last_suggest(&self) -> Option<SuggestionRequest> {
        self.lock().last_suggest.clone()
    }

    pub(crate) fn uploads(&self) -> Vec<(UploadCategory, Vec<String>)> {
        self.lock().uploads.clone()
    }

    /// Record the call, let other futures run, then report whether it fails.
    async fn enter(&self, op: &'static str) -> Result<(), ClientError> {
        {
            let mut store = self.lock();
            store.calls.push(op);
            store.events.push(format!("start:{op}"));
        }
        tokio::task::yield_now().await;
        let mut store = self.lock();
        store.events.push(format!("end:{op}"));
        if store.failing.contains(op) {
            Err(simulated_failure())
        } else {
            Ok(())
        }
    }
}

fn not_found(resource: String) -> ClientError {
    ClientError::NotFound { resource }
}

#[async_trait]
impl ResourceApi for FakeApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.enter("list_projects").await?;
        Ok(self.lock().projects.values().cloned().collect())
    }

    async fn create_project(&self, form: &NewProject) -> Result<Project, ClientError> {
        self.enter("create_project").await?;
        let mut store = self.lock();
        let id = store.next_id;
        store.next_id += 1;
        let mut created = project(id, &form.title, ProjectStatus::Draft, 0);
        created.field = form.field;
        store.projects.insert(id, created.clone());
        Ok(created)
    }

    async fn get_project(&self, id: i64) -> Result<Project, ClientError> {
        self.enter("get_project").await?;
        self.lock()
            .projects
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(format!("project {id}")))
    }

    async fn delete_project(&self, id: i64) -> Result<(), ClientError> {
        self.enter("delete_project").await?;
        self.lock()
            .projects
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("project {id}")))
    }

    async fn get_anexo(&self, id: i64) -> Result<Anexo, ClientError> {
        self.enter("get_anexo").await?;
        self.lock()
            .anexos
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(format!("anexo {id}")))
    }

    async fn update_anexo(&self, id: i64, dados: &FormData) -> Result<AnexoUpdate, ClientError> {
        self.enter("update_anexo").await?;
        let mut store = self.lock();
        let stored = store
            .anexos
            .get_mut(&id)
            .ok_or_else(|| not_found(format!("anexo {id}")))?;
        stored.dados = dados.clone();
        stored.completion_score = dados.fill_percentage();
        let validation = ValidationReport {
            score: stored.completion_score,
            status: ValidationStatus::Good,
            ..Default::default()
        };
        Ok(AnexoUpdate {
            anexo: stored.clone(),
            validation: Some(validation),
        })
    }

    async fn list_project_anexos(&self, project_id: i64) -> Result<Vec<Anexo>, ClientError> {
        self.enter("list_project_anexos").await?;
        Ok(self
            .lock()
            .anexos
            .values()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn suggest(&self, request: &SuggestionRequest) -> Result<Suggestion, ClientError> {
        self.enter("suggest").await?;
        self.lock().last_suggest = Some(request.clone());
        Ok(Suggestion {
            suggestion: format!("Sugestão para {}", request.field_name),
            confidence: 0.42,
            references: Some(vec![serde_json::json!({"title": "Caso 1"})]),
            error: None,
        })
    }

    async fn validate_anexo(
        &self,
        dados: &FormData,
        _tipo: &AnexoType,
    ) -> Result<ValidationReport, ClientError> {
        self.enter("validate_anexo").await?;
        Ok(ValidationReport {
            score: dados.fill_percentage(),
            status: ValidationStatus::NeedsImprovement,
            warnings: vec!["Preencha mais campos".into()],
            ..Default::default()
        })
    }

    async fn validate_stored_anexo(&self, id: i64) -> Result<StoredValidation, ClientError> {
        self.enter("validate_stored_anexo").await?;
        let store = self.lock();
        let anexo = store
            .anexos
            .get(&id)
            .ok_or_else(|| not_found(format!("anexo {id}")))?;
        Ok(StoredValidation {
            anexo_id: id,
            validation: ValidationReport {
                score: anexo.completion_score,
                ..Default::default()
            },
        })
    }

    async fn list_cases(&self, filter: CaseFilter) -> Result<Vec<Case>, ClientError> {
        self.enter("list_cases").await?;
        Ok(self
            .lock()
            .cases
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn get_case(&self, id: i64) -> Result<Case, ClientError> {
        self.enter("get_case").await?;
        self.lock()
            .cases
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(format!("case {id}")))
    }

    async fn upload_documents(
        &self,
        category: UploadCategory,
        files: &[UploadFile],
    ) -> Result<UploadReceipt, ClientError> {
        self.enter("upload_documents").await?;
        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        let mut store = self.lock();
        store.pending_documents += files.len() as u32;
        store.uploads.push((category, names.clone()));
        Ok(UploadReceipt {
            uploaded: files.len() as u32,
            files: names,
            categoria: Some(category.as_str().to_string()),
        })
    }

    async fn process_documents(&self) -> Result<ProcessReceipt, ClientError> {
        self.enter("process_documents").await?;
        let mut store = self.lock();
        let processed = std::mem::take(&mut store.pending_documents);
        Ok(ProcessReceipt { processed })
    }

    async fn ai_health(&self) -> Result<AiHealth, ClientError> {
        self.enter("ai_health").await?;
        Ok(AiHealth {
            status: "online".into(),
            agents: vec!["text".into(), "validation".into()],
        })
    }
}
