//! AI suggestion panel: one pending proposal for one form field at a time.

use pronas_client::ClientError;
use pronas_core::{FormData, Suggestion};
use tracing::debug;

use crate::ViewError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelState {
    #[default]
    Empty,
    Requesting {
        field: String,
    },
    Offered {
        field: String,
        suggestion: Suggestion,
    },
    Failed {
        field: String,
        message: String,
    },
}

/// Proof that a request was started; only the latest ticket may settle the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Field-scoped suggestion state, nested inside a form controller.
///
/// Starting a request discards whatever the panel held before. Confidence is
/// display metadata only and never gates [`apply`](Self::apply).
#[derive(Debug, Clone, Default)]
pub struct SuggestionPanel {
    state: PanelState,
    generation: u64,
}

impl SuggestionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self.state, PanelState::Requesting { .. })
    }

    /// Field the panel is currently about, if any.
    pub fn field(&self) -> Option<&str> {
        match &self.state {
            PanelState::Empty => None,
            PanelState::Requesting { field }
            | PanelState::Offered { field, .. }
            | PanelState::Failed { field, .. } => Some(field),
        }
    }

    pub(crate) fn begin_request(&mut self, field: impl Into<String>) -> Ticket {
        self.generation += 1;
        self.state = PanelState::Requesting {
            field: field.into(),
        };
        Ticket(self.generation)
    }

    /// Settle a request. Returns `false`, leaving the panel alone, when a newer
    /// request or a discard has superseded `ticket`.
    pub(crate) fn finish_request(
        &mut self,
        ticket: Ticket,
        result: Result<Suggestion, ClientError>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "stale suggestion dropped");
            return false;
        }
        let PanelState::Requesting { field } = std::mem::take(&mut self.state) else {
            return false;
        };
        self.state = match result {
            Ok(suggestion) => PanelState::Offered { field, suggestion },
            Err(err) => PanelState::Failed {
                field,
                message: err.detail(),
            },
        };
        true
    }

    /// Overwrite the target field in `form` with the offered text.
    ///
    /// Returns the field name that was written. No other field is touched.
    pub fn apply(&mut self, form: &mut FormData) -> Result<String, ViewError> {
        match std::mem::take(&mut self.state) {
            PanelState::Offered { field, suggestion } => {
                form.set(field.clone(), suggestion.suggestion);
                self.generation += 1;
                Ok(field)
            }
            other => {
                self.state = other;
                Err(ViewError::NoSuggestion)
            }
        }
    }

    /// Drop any suggestion, pending or offered. The form is not touched.
    pub fn discard(&mut self) {
        self.generation += 1;
        self.state = PanelState::Empty;
    }
}
