//! Dashboard: the project list with status counts and average completion.

use std::sync::Arc;

use pronas_client::ResourceApi;
use pronas_core::{Project, ProjectStats};

use crate::state::StateCell;
use crate::{Lifecycle, ViewError, ViewState};

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub projects: Vec<Project>,
    pub stats: ProjectStats,
}

impl Dashboard {
    pub fn new(projects: Vec<Project>) -> Self {
        let stats = ProjectStats::from_projects(&projects);
        Self { projects, stats }
    }
}

pub struct DashboardController {
    api: Arc<dyn ResourceApi>,
    lifecycle: Lifecycle,
    state: StateCell<Dashboard>,
}

impl DashboardController {
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

    pub fn state(&self) -> ViewState<Dashboard> {
        self.state.snapshot()
    }

    /// Fetch the project list and recompute the stats from it.
    pub async fn activate(&self) -> Result<(), ViewError> {
        let api = Arc::clone(&self.api);
        self.state
            .load("dashboard", &self.lifecycle, async move {
                api.list_projects().await.map(Dashboard::new)
            })
            .await
    }
}
