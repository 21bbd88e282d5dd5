//! Knowledge-case browser.

use std::sync::Arc;

use pronas_client::{ClientError, ResourceApi};
use pronas_core::{Case, CaseFilter};
use tracing::warn;

use crate::state::StateCell;
use crate::{Lifecycle, Notice, ViewError, ViewState};

#[derive(Debug, Clone, PartialEq)]
pub struct CaseShelf {
    pub cases: Vec<Case>,
    pub approved: usize,
    pub rejected: usize,
    /// Case opened in full, if any.
    pub selected: Option<Case>,
}

impl CaseShelf {
    pub fn new(cases: Vec<Case>) -> Self {
        let approved = cases.iter().filter(|c| c.is_approved == Some(true)).count();
        let rejected = cases.iter().filter(|c| c.is_approved == Some(false)).count();
        Self {
            cases,
            approved,
            rejected,
            selected: None,
        }
    }
}

pub struct CaseBrowserController {
    api: Arc<dyn ResourceApi>,
    filter: CaseFilter,
    lifecycle: Lifecycle,
    state: StateCell<CaseShelf>,
}

impl CaseBrowserController {
    pub fn new(api: Arc<dyn ResourceApi>, filter: CaseFilter) -> Self {
        Self {
            api,
            filter,
            lifecycle: Lifecycle::new(),
            state: StateCell::new(),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn state(&self) -> ViewState<CaseShelf> {
        self.state.snapshot()
    }

    pub async fn activate(&self) -> Result<(), ViewError> {
        let api = Arc::clone(&self.api);
        let filter = self.filter;
        self.state
            .load("cases", &self.lifecycle, async move {
                api.list_cases(filter).await.map(CaseShelf::new)
            })
            .await
    }

    /// Fetch one case in full and select it. The list stays as it was.
    pub async fn open_case(&self, id: i64) -> Result<Case, ViewError> {
        self.state.lock().data_mut()?;
        let api = Arc::clone(&self.api);
        let result = self
            .lifecycle
            .guard(async move { api.get_case(id).await })
            .await?;

        let mut state = self.state.lock();
        match result {
            Ok(case) => {
                state.data_mut()?.selected = Some(case.clone());
                Ok(case)
            }
            Err(err) => {
                warn!(case_id = id, error = %err, "case read failed");
                let text = match err {
                    ClientError::NotFound { .. } => "❌ Caso não encontrado",
                    _ => "❌ Erro ao carregar caso",
                };
                state.set_notice(Notice::failure(text));
                Err(err.into())
            }
        }
    }
}
