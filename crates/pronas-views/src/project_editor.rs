//! Project editor: one project and its anexos, loaded together.

use std::sync::Arc;

use futures::future::try_join;
use pronas_client::ResourceApi;
use pronas_core::{Anexo, Criticality, Project};

use crate::state::StateCell;
use crate::{Lifecycle, ViewError, ViewState};

/// Display row for one anexo of the project.
#[derive(Debug, Clone, PartialEq)]
pub struct AnexoCard {
    pub anexo_id: i64,
    pub heading: String,
    pub name: String,
    pub description: &'static str,
    pub criticality: Option<Criticality>,
    pub completion: u8,
}

impl AnexoCard {
    fn from_anexo(anexo: &Anexo) -> Self {
        let heading = match anexo.tipo.numeral() {
            Some(numeral) => format!("Anexo {numeral}"),
            None => anexo.tipo.as_str().to_string(),
        };
        Self {
            anexo_id: anexo.id,
            heading,
            name: anexo.tipo.display_name().to_string(),
            description: anexo.tipo.description(),
            criticality: anexo.tipo.criticality(),
            completion: anexo.completion_score,
        }
    }

    pub fn is_started(&self) -> bool {
        self.completion > 0
    }

    pub fn action_label(&self) -> &'static str {
        if self.is_started() {
            "Continuar"
        } else {
            "Iniciar"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOverview {
    pub project: Project,
    pub anexos: Vec<Anexo>,
}

impl ProjectOverview {
    /// Mean `completion_score` across the anexos; zero when there are none.
    pub fn average_completion(&self) -> f64 {
        if self.anexos.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .anexos
            .iter()
            .map(|a| f64::from(a.completion_score))
            .sum();
        sum / self.anexos.len() as f64
    }

    /// Anexos not yet started.
    pub fn untouched(&self) -> impl Iterator<Item = &Anexo> {
        self.anexos.iter().filter(|a| a.completion_score == 0)
    }

    pub fn cards(&self) -> Vec<AnexoCard> {
        self.anexos.iter().map(AnexoCard::from_anexo).collect()
    }
}

pub struct ProjectEditorController {
    api: Arc<dyn ResourceApi>,
    project_id: i64,
    lifecycle: Lifecycle,
    state: StateCell<ProjectOverview>,
}

impl ProjectEditorController {
    pub fn new(api: Arc<dyn ResourceApi>, project_id: i64) -> Self {
        Self {
            api,
            project_id,
            lifecycle: Lifecycle::new(),
            state: StateCell::new(),
        }
    }

    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn state(&self) -> ViewState<ProjectOverview> {
        self.state.snapshot()
    }

    /// Fetch the project and its anexos concurrently. Both must succeed.
    pub async fn activate(&self) -> Result<(), ViewError> {
        let api = Arc::clone(&self.api);
        let id = self.project_id;
        self.state
            .load("project_editor", &self.lifecycle, async move {
                let (project, anexos) =
                    try_join(api.get_project(id), api.list_project_anexos(id)).await?;
                Ok(ProjectOverview { project, anexos })
            })
            .await
    }
}
