//! HTTP resource client for the PRONAS/PCD backend.

use async_trait::async_trait;
use pronas_core::{
    AiHealth, Anexo, AnexoType, Case, CaseFilter, FormData, NewProject, ProcessReceipt, Project,
    StoredValidation, Suggestion, SuggestionRequest, UploadCategory, UploadFile, UploadReceipt,
    ValidationReport, ValidationRequest,
};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::api::{AnexoUpdate, ResourceApi, UpdateEnvelope};
use crate::{ClientConfig, ClientError};

/// `reqwest`-backed implementation of [`ResourceApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AnexoPayload<'a> {
    dados: &'a FormData,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and decode a 2xx JSON body.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let resp = request.send().await?;
        let resp = check_status(resp).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let err = ClientError::from_response(status.as_u16(), &body);
    warn!(status = status.as_u16(), error = %err, "request rejected");
    Err(err)
}

#[async_trait]
impl ResourceApi for ApiClient {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let url = self.url("/api/projects/");
        info!(url = %url, "listing projects");
        let projects: Vec<Project> = self.fetch(self.client.get(&url)).await?;
        info!(count = projects.len(), "listed projects");
        Ok(projects)
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project, ClientError> {
        let url = self.url("/api/projects/");
        info!(url = %url, title = %project.title, "creating project");
        let created: Project = self.fetch(self.client.post(&url).json(project)).await?;
        info!(id = created.id, "project created");
        Ok(created)
    }

    async fn get_project(&self, id: i64) -> Result<Project, ClientError> {
        let url = self.url(&format!("/api/projects/{id}"));
        info!(url = %url, "fetching project");
        self.fetch(self.client.get(&url))
            .await
            .map_err(|e| e.or_not_found(|| format!("project {id}")))
    }

    async fn delete_project(&self, id: i64) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/projects/{id}"));
        info!(url = %url, "deleting project");
        let resp = self.client.delete(&url).send().await?;
        check_status(resp)
            .await
            .map_err(|e| e.or_not_found(|| format!("project {id}")))?;
        Ok(())
    }

    async fn get_anexo(&self, id: i64) -> Result<Anexo, ClientError> {
        let url = self.url(&format!("/api/anexos/{id}"));
        info!(url = %url, "fetching anexo");
        self.fetch(self.client.get(&url))
            .await
            .map_err(|e| e.or_not_found(|| format!("anexo {id}")))
    }

    async fn update_anexo(&self, id: i64, dados: &FormData) -> Result<AnexoUpdate, ClientError> {
        let url = self.url(&format!("/api/anexos/{id}"));
        info!(url = %url, fields = dados.len(), "replacing anexo payload");
        let envelope: UpdateEnvelope = self
            .fetch(self.client.put(&url).json(&AnexoPayload { dados }))
            .await
            .map_err(|e| e.or_not_found(|| format!("anexo {id}")))?;
        let update = AnexoUpdate::from(envelope);
        info!(
            id,
            completion = update.anexo.completion_score,
            "anexo payload replaced"
        );
        Ok(update)
    }

    async fn list_project_anexos(&self, project_id: i64) -> Result<Vec<Anexo>, ClientError> {
        let url = self.url(&format!("/api/anexos/project/{project_id}"));
        info!(url = %url, "listing project anexos");
        let anexos: Vec<Anexo> = self.fetch(self.client.get(&url)).await?;
        info!(count = anexos.len(), "listed project anexos");
        Ok(anexos)
    }

    async fn suggest(&self, request: &SuggestionRequest) -> Result<Suggestion, ClientError> {
        let url = self.url("/api/ai/suggest");
        info!(url = %url, field = %request.field_name, "requesting suggestion");
        let suggestion: Suggestion = self.fetch(self.client.post(&url).json(request)).await?;
        info!(
            confidence = suggestion.confidence,
            references = suggestion.reference_count(),
            "suggestion received"
        );
        Ok(suggestion)
    }

    async fn validate_anexo(
        &self,
        dados: &FormData,
        tipo: &AnexoType,
    ) -> Result<ValidationReport, ClientError> {
        let url = self.url("/api/ai/validate");
        info!(url = %url, tipo = %tipo, "validating anexo payload");
        let body = ValidationRequest {
            anexo_data: dados,
            anexo_type: tipo,
        };
        self.fetch(self.client.post(&url).json(&body)).await
    }

    async fn validate_stored_anexo(&self, id: i64) -> Result<StoredValidation, ClientError> {
        let url = self.url(&format!("/api/anexos/{id}/validate"));
        info!(url = %url, "validating stored anexo");
        self.fetch(self.client.post(&url))
            .await
            .map_err(|e| e.or_not_found(|| format!("anexo {id}")))
    }

    async fn list_cases(&self, filter: CaseFilter) -> Result<Vec<Case>, ClientError> {
        let mut url = self.url("/api/knowledge/cases");
        if let Some(approved) = filter.approved_only() {
            url.push_str(&format!("?approved_only={approved}"));
        }
        info!(url = %url, "listing knowledge cases");
        let cases: Vec<Case> = self.fetch(self.client.get(&url)).await?;
        info!(count = cases.len(), "listed knowledge cases");
        Ok(cases)
    }

    async fn get_case(&self, id: i64) -> Result<Case, ClientError> {
        let url = self.url(&format!("/api/knowledge/cases/{id}"));
        info!(url = %url, "fetching knowledge case");
        // A missing case comes back as a 200 with a `null` body.
        let case: Option<Case> = self
            .fetch(self.client.get(&url))
            .await
            .map_err(|e| e.or_not_found(|| format!("case {id}")))?;
        case.ok_or_else(|| ClientError::NotFound {
            resource: format!("case {id}"),
        })
    }

    async fn upload_documents(
        &self,
        category: UploadCategory,
        files: &[UploadFile],
    ) -> Result<UploadReceipt, ClientError> {
        let url = self.url("/api/knowledge/upload");
        info!(url = %url, category = %category, files = files.len(), "uploading documents");
        let form = files.iter().fold(
            Form::new().text("categoria", category.as_str()),
            |form, file| {
                form.part(
                    "files",
                    Part::bytes(file.bytes.clone()).file_name(file.name.clone()),
                )
            },
        );
        let receipt: UploadReceipt = self.fetch(self.client.post(&url).multipart(form)).await?;
        info!(uploaded = receipt.uploaded, "upload complete");
        Ok(receipt)
    }

    async fn process_documents(&self) -> Result<ProcessReceipt, ClientError> {
        let url = self.url("/api/knowledge/process");
        info!(url = %url, "triggering document processing");
        let receipt: ProcessReceipt = self.fetch(self.client.post(&url)).await?;
        info!(processed = receipt.processed, "processing complete");
        Ok(receipt)
    }

    async fn ai_health(&self) -> Result<AiHealth, ClientError> {
        let url = self.url("/api/ai/health");
        info!(url = %url, "checking AI service health");
        self.fetch(self.client.get(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> ApiClient {
        ApiClient::new(ClientConfig::new(server.url()))
    }

    const ANEXO_JSON: &str = r#"{
        "id": 21,
        "project_id": 3,
        "tipo": "ANEXO_II",
        "nome": "Formulário de Apresentação de Projeto",
        "dados": {"titulo_projeto": "Centro Integrado", "objetivos": "Atender 300 pacientes"},
        "completion_score": 100
    }"#;

    #[test]
    fn client_trims_trailing_slash() {
        let client = ApiClient::new(ClientConfig::new("http://localhost:8000/"));
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn list_projects_decodes_array() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 1, "title": "A", "status": "DRAFT", "field": "realizacao_pesquisas", "completion_percentage": 20},
                    {"id": 2, "title": "B", "status": "aprovado", "field": "formacao_treinamento_recursos_humanos", "completion_percentage": 90}
                ]"#,
            )
            .create_async()
            .await;

        let projects = client_for(&server).list_projects().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].completion_percentage, 90);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_project_posts_form_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/projects/")
            .match_body(Matcher::Json(json!({
                "title": "Centro de Reabilitação",
                "description": "",
                "field": "prestacao_servicos_medico_assistenciais",
                "institution_name": "Hospital Regional",
                "institution_cnpj": "00.000.000/0001-00",
                "priority_area": "Reabilitação Física"
            })))
            .with_status(200)
            .with_body(
                r#"{"id": 12, "title": "Centro de Reabilitação", "status": "DRAFT",
                    "field": "prestacao_servicos_medico_assistenciais", "completion_percentage": 0}"#,
            )
            .create_async()
            .await;

        let form = NewProject {
            title: "Centro de Reabilitação".into(),
            institution_name: "Hospital Regional".into(),
            institution_cnpj: "00.000.000/0001-00".into(),
            priority_area: "Reabilitação Física".into(),
            ..Default::default()
        };
        let created = client_for(&server).create_project(&form).await.unwrap();
        assert_eq!(created.id, 12);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/projects/99")
            .with_status(404)
            .with_body(r#"{"detail": "Projeto não encontrado"}"#)
            .create_async()
            .await;

        let err = client_for(&server).get_project(99).await.unwrap_err();
        assert_eq!(
            err,
            ClientError::NotFound {
                resource: "project 99".into()
            }
        );
    }

    #[tokio::test]
    async fn server_error_carries_detail() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/projects/")
            .with_status(500)
            .with_body(r#"{"detail": "Nenhum usuário encontrado."}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .create_project(&NewProject::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Server {
                status: 500,
                detail: "Nenhum usuário encontrado.".into()
            }
        );
    }

    #[tokio::test]
    async fn update_anexo_sends_whole_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/anexos/21")
            .match_body(Matcher::Json(json!({
                "dados": {"titulo_projeto": "Centro Integrado", "objetivos": "Atender 300 pacientes"}
            })))
            .with_status(200)
            .with_body(format!(
                r#"{{"anexo": {ANEXO_JSON}, "validation": {{"score": 81, "status": "good"}}}}"#
            ))
            .create_async()
            .await;

        let dados: FormData = [
            ("titulo_projeto", "Centro Integrado"),
            ("objetivos", "Atender 300 pacientes"),
        ]
        .into_iter()
        .collect();
        let update = client_for(&server).update_anexo(21, &dados).await.unwrap();
        assert_eq!(update.anexo.dados, dados);
        assert_eq!(update.validation.map(|v| v.score), Some(81));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_project_anexos_uses_project_route() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/anexos/project/3")
            .with_status(200)
            .with_body(format!("[{ANEXO_JSON}]"))
            .create_async()
            .await;

        let anexos = client_for(&server).list_project_anexos(3).await.unwrap();
        assert_eq!(anexos.len(), 1);
        assert_eq!(anexos[0].tipo, AnexoType::II);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn suggest_posts_field_context() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ai/suggest")
            .match_body(Matcher::PartialJson(json!({
                "field_name": "justificativa",
                "field_context": {"current_value": ""}
            })))
            .with_status(200)
            .with_body(r#"{"suggestion": "A instituição atende...", "confidence": 0.82, "references": [{}, {}, {}]}"#)
            .create_async()
            .await;

        let request =
            SuggestionRequest::new("justificativa", "", pronas_core::ProjectContext::default());
        let suggestion = client_for(&server).suggest(&request).await.unwrap();
        assert_eq!(suggestion.reference_count(), 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn approved_only_adds_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/knowledge/cases")
            .match_query(Matcher::UrlEncoded("approved_only".into(), "true".into()))
            .with_status(200)
            .with_body(r#"[{"id": 1, "is_approved": true}]"#)
            .create_async()
            .await;

        let cases = client_for(&server)
            .list_cases(CaseFilter::Approved)
            .await
            .unwrap();
        assert_eq!(cases.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_filter_sends_false() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/knowledge/cases")
            .match_query(Matcher::UrlEncoded("approved_only".into(), "false".into()))
            .with_status(200)
            .with_body(r#"[{"id": 4, "is_approved": false}]"#)
            .create_async()
            .await;

        let cases = client_for(&server)
            .list_cases(CaseFilter::Rejected)
            .await
            .unwrap();
        assert_eq!(cases[0].is_approved, Some(false));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_tolerates_loose_inline_validation() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", "/api/anexos/21")
            .with_status(200)
            .with_body(format!(
                r#"{{"anexo": {ANEXO_JSON}, "validation": {{"score": 80, "status": "good", "suggestions": [{{"campo": "x", "texto": "y"}}]}}}}"#
            ))
            .create_async()
            .await;

        let update = client_for(&server)
            .update_anexo(21, &FormData::new())
            .await
            .unwrap();
        assert_eq!(update.anexo.id, 21);
        assert_eq!(update.validation.map(|v| v.score), Some(80));
    }

    #[tokio::test]
    async fn anexo_listing_tolerates_null_columns() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/anexos/project/3")
            .with_status(200)
            .with_body(
                r#"[{"id": 1, "project_id": 3, "tipo": "ANEXO_I", "dados": {}, "completion_score": null, "ai_suggestions": null}]"#,
            )
            .create_async()
            .await;

        let anexos = client_for(&server).list_project_anexos(3).await.unwrap();
        assert_eq!(anexos[0].completion_score, 0);
    }

    #[tokio::test]
    async fn null_case_is_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/knowledge/cases/8")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let err = client_for(&server).get_case(8).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
    }

    #[tokio::test]
    async fn upload_is_multipart_with_category() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/knowledge/upload")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".into()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("aprovados_pesquisa".into()),
                Matcher::Regex("projeto_a.pdf".into()),
                Matcher::Regex("projeto_b.docx".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"uploaded": 2, "files": ["projeto_a.pdf", "projeto_b.docx"], "categoria": "aprovados_pesquisa"}"#)
            .create_async()
            .await;

        let files = vec![
            UploadFile::new("projeto_a.pdf", b"%PDF-1.4".to_vec()),
            UploadFile::new("projeto_b.docx", b"PK".to_vec()),
        ];
        let receipt = client_for(&server)
            .upload_documents(UploadCategory::AprovadosPesquisa, &files)
            .await
            .unwrap();
        assert_eq!(receipt.uploaded, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn process_returns_count() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/knowledge/process")
            .with_status(200)
            .with_body(r#"{"processed": 14}"#)
            .create_async()
            .await;

        let receipt = client_for(&server).process_documents().await.unwrap();
        assert_eq!(receipt.processed, 14);
    }

    #[tokio::test]
    async fn delete_project_accepts_message_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/projects/4")
            .with_status(200)
            .with_body(r#"{"message": "Projeto deletado"}"#)
            .create_async()
            .await;

        client_for(&server).delete_project(4).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/ai/health")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server).ai_health().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9"));
        let err = client.list_projects().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert_eq!(err.status(), None);
    }
}
