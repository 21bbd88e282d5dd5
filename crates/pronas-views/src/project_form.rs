//! Project creation form.

use std::sync::Arc;

use pronas_client::ResourceApi;
use pronas_core::NewProject;
use tracing::info;

use crate::state::StateCell;
use crate::{Lifecycle, Notice, ViewError, ViewState};

const SCREEN: &str = "project_form";

/// Where the presentation layer should go after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ProjectEditor(i64),
}

fn field_label(field: &str) -> &str {
    match field {
        "title" => "Título do Projeto",
        "institution_name" => "Nome da Instituição",
        "institution_cnpj" => "CNPJ da Instituição",
        other => other,
    }
}

pub struct ProjectCreationController {
    api: Arc<dyn ResourceApi>,
    lifecycle: Lifecycle,
    state: StateCell<NewProject>,
}

impl ProjectCreationController {
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

    pub fn state(&self) -> ViewState<NewProject> {
        self.state.snapshot()
    }

    /// No read is needed: the blank form is editable at once.
    pub fn activate(&self) {
        self.state.lock().ready(NewProject::default());
    }

    pub fn edit(&self, change: impl FnOnce(&mut NewProject)) -> Result<(), ViewError> {
        let mut state = self.state.lock();
        change(state.data_mut()?);
        Ok(())
    }

    /// Create the project and point at its editor.
    ///
    /// A blank required field is rejected before any network call. On
    /// failure the form keeps what the user typed.
    pub async fn submit(&self) -> Result<Navigation, ViewError> {
        let form = {
            let mut state = self.state.lock();
            let form = state.data_mut()?.clone();
            if let Some(field) = form.missing_required() {
                state.set_notice(Notice::alert(format!(
                    "Preencha o campo obrigatório: {}",
                    field_label(field)
                )));
                return Err(ViewError::MissingField(field));
            }
            form
        };

        let api = Arc::clone(&self.api);
        let outcome = self
            .state
            .submit(SCREEN, &self.lifecycle, async move {
                api.create_project(&form).await
            })
            .await;

        match outcome {
            Ok(project) => {
                info!(project_id = project.id, "project created");
                self.state
                    .lock()
                    .set_notice(Notice::success("✅ Projeto criado com sucesso!"));
                Ok(Navigation::ProjectEditor(project.id))
            }
            Err(ViewError::Client(err)) => {
                self.state
                    .lock()
                    .set_notice(Notice::failure("❌ Erro ao criar projeto"));
                Err(err.into())
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use crate::{Status, Tier};
    use pronas_core::ProjectField;

    fn filled(form: &mut NewProject) {
        form.title = "Centro de Reabilitação".into();
        form.field = ProjectField::Training;
        form.institution_name = "Hospital Regional".into();
        form.institution_cnpj = "00.000.000/0001-00".into();
    }

    fn controller(api: &Arc<FakeApi>) -> ProjectCreationController {
        let controller = ProjectCreationController::new(api.clone());
        controller.activate();
        controller
    }

    #[tokio::test]
    async fn form_is_ready_without_a_read() {
        let api = Arc::new(FakeApi::new());
        let controller = controller(&api);
        let state = controller.state();
        assert_eq!(state.status(), Status::Ready);
        assert_eq!(state.data(), Some(&NewProject::default()));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn submit_navigates_to_new_project() {
        let api = Arc::new(FakeApi::new());
        let controller = controller(&api);
        controller.edit(filled).unwrap();

        let target = controller.submit().await.unwrap();
        assert_eq!(target, Navigation::ProjectEditor(100));
        assert_eq!(controller.state().notice().unwrap().tier, Tier::Success);
        assert_eq!(api.count("create_project"), 1);
    }

    #[tokio::test]
    async fn blank_required_field_blocks_without_network() {
        let api = Arc::new(FakeApi::new());
        let controller = controller(&api);
        controller
            .edit(|form| form.title = "Centro".into())
            .unwrap();

        let err = controller.submit().await.unwrap_err();
        assert_eq!(err, ViewError::MissingField("institution_name"));
        let state = controller.state();
        let notice = state.notice().unwrap();
        assert!(notice.blocking);
        assert!(notice.text.contains("Nome da Instituição"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_create_keeps_form() {
        let api = Arc::new(FakeApi::new());
        api.fail("create_project");
        let controller = controller(&api);
        controller.edit(filled).unwrap();
        let typed = controller.state().data().cloned().unwrap();

        assert!(controller.submit().await.is_err());
        let state = controller.state();
        assert_eq!(state.status(), Status::Ready);
        assert_eq!(state.data(), Some(&typed));
        assert_eq!(state.notice().unwrap().text, "❌ Erro ao criar projeto");
        assert!(!state.notice().unwrap().blocking);
    }

    #[tokio::test]
    async fn double_submit_is_busy() {
        let api = Arc::new(FakeApi::new());
        let controller = controller(&api);
        controller.edit(filled).unwrap();

        let (first, second) = tokio::join!(controller.submit(), controller.submit());
        assert!(first.is_ok());
        assert_eq!(second, Err(ViewError::Busy));
        assert_eq!(api.count("create_project"), 1);
    }
}
