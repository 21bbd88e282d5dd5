//! One handler per subcommand. Each drives a controller through a single
//! activation and prints the resulting card and notice.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use pronas_client::ResourceApi;
use pronas_core::{CaseFilter, NewProject, UploadCategory};
use pronas_views::{
    AnexoEditorController, CaseBrowserController, DashboardController, Navigation, Notice,
    ProjectCreationController, ProjectEditorController, UploadController, ViewError,
};

use crate::{files, render};

/// Print the controller's last notice, then surface `result`.
fn settle<T>(notice: Option<&Notice>, result: Result<T, ViewError>) -> Result<T> {
    if let Some(notice) = notice {
        render::print_notice(notice);
    }
    Ok(result?)
}

pub async fn dashboard(api: Arc<dyn ResourceApi>) -> Result<()> {
    let controller = DashboardController::new(api);
    controller.activate().await.context("loading projects")?;
    if let Some(dashboard) = controller.state().data() {
        print!("{}", render::dashboard(dashboard));
    }
    Ok(())
}

pub async fn show_project(api: Arc<dyn ResourceApi>, id: i64) -> Result<()> {
    let controller = ProjectEditorController::new(api, id);
    controller
        .activate()
        .await
        .with_context(|| format!("loading project {id}"))?;
    if let Some(overview) = controller.state().data() {
        print!("{}", render::project_overview(overview));
    }
    Ok(())
}

pub async fn create_project(api: Arc<dyn ResourceApi>, form: NewProject) -> Result<()> {
    let controller = ProjectCreationController::new(api);
    controller.activate();
    controller.edit(|draft| *draft = form)?;
    let result = controller.submit().await;
    let Navigation::ProjectEditor(id) = settle(controller.state().notice(), result)?;
    println!("Continue em: pronas project show {id}");
    Ok(())
}

pub async fn delete_project(api: Arc<dyn ResourceApi>, id: i64) -> Result<()> {
    api.delete_project(id)
        .await
        .with_context(|| format!("deleting project {id}"))?;
    render::print_notice(&Notice::success(format!("✅ Projeto {id} removido")));
    Ok(())
}

pub async fn show_anexo(api: Arc<dyn ResourceApi>, id: i64) -> Result<()> {
    let controller = AnexoEditorController::new(api, id);
    controller
        .activate()
        .await
        .with_context(|| format!("loading anexo {id}"))?;
    if let Some(sheet) = controller.state().data() {
        print!("{}", render::anexo_sheet(sheet));
    }
    Ok(())
}

/// Changes requested on the command line for one anexo.
#[derive(Debug, Default)]
pub struct AnexoEdit {
    pub assignments: Vec<(String, String)>,
    pub suggest: Option<String>,
    pub apply: bool,
}

pub async fn edit_anexo(api: Arc<dyn ResourceApi>, id: i64, edit: AnexoEdit) -> Result<()> {
    let controller = AnexoEditorController::new(api, id);
    controller
        .activate()
        .await
        .with_context(|| format!("loading anexo {id}"))?;

    let mut changed = !edit.assignments.is_empty();
    for (field, value) in edit.assignments {
        controller.set_field(&field, value)?;
    }

    let mut suggestion_failure = None;
    if let Some(field) = edit.suggest.as_deref() {
        let requested = controller.request_suggestion(field).await;
        if let Some(sheet) = controller.state().data() {
            print!("{}", render::panel(&sheet.panel));
        }
        match requested {
            Ok(()) if edit.apply => {
                let written = controller.apply_suggestion()?;
                println!("Sugestão aplicada em {written}");
                changed = true;
            }
            Ok(()) => controller.discard_suggestion()?,
            // Assignments are still saved; the failure is reported afterwards.
            Err(err) => {
                suggestion_failure = Some(
                    anyhow::Error::new(err)
                        .context(format!("requesting a suggestion for {field}")),
                )
            }
        }
    }

    if changed {
        let result = controller.save().await;
        settle(controller.state().notice(), result)?;
    }
    if let Some(sheet) = controller.state().data() {
        print!("{}", render::anexo_sheet(sheet));
    }
    match suggestion_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

pub async fn validate_anexo(api: Arc<dyn ResourceApi>, id: i64, stored: bool) -> Result<()> {
    if stored {
        let stored = api
            .validate_stored_anexo(id)
            .await
            .with_context(|| format!("validating stored anexo {id}"))?;
        print!("{}", render::validation(&stored.validation));
        return Ok(());
    }

    let controller = AnexoEditorController::new(api, id);
    controller
        .activate()
        .await
        .with_context(|| format!("loading anexo {id}"))?;
    let result = controller.validate().await;
    let report = settle(controller.state().notice(), result)?;
    print!("{}", render::validation(&report));
    Ok(())
}

pub async fn list_cases(api: Arc<dyn ResourceApi>, filter: CaseFilter) -> Result<()> {
    let controller = CaseBrowserController::new(api, filter);
    controller.activate().await.context("loading cases")?;
    if let Some(shelf) = controller.state().data() {
        print!("{}", render::cases(shelf));
    }
    Ok(())
}

pub async fn show_case(api: Arc<dyn ResourceApi>, id: i64) -> Result<()> {
    let case = api
        .get_case(id)
        .await
        .with_context(|| format!("loading case {id}"))?;
    print!("{}", render::case_card(&case));
    Ok(())
}

pub async fn upload(
    api: Arc<dyn ResourceApi>,
    category: UploadCategory,
    paths: &[PathBuf],
) -> Result<()> {
    let selected = files::read_upload_files(paths).await?;
    let controller = UploadController::new(api);
    controller.activate();
    controller.select_category(category)?;
    controller.add_files(selected)?;

    let result = controller.upload().await;
    let outcome = settle(controller.state().notice(), result)?;
    print!("{}", render::upload_outcome(&outcome));
    Ok(())
}

pub async fn health(api: Arc<dyn ResourceApi>) -> Result<()> {
    let health = api.ai_health().await.context("checking AI service")?;
    print!("{}", render::health(&health));
    Ok(())
}
