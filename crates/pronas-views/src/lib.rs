//! Screen controllers for the PRONAS/PCD client.
//!
//! Each controller owns one screen's state, talks to the backend through
//! [`pronas_client::ResourceApi`] and is torn down through its [`Lifecycle`].

pub mod anexo_editor;
pub mod cases;
pub mod dashboard;
mod error;
mod lifecycle;
mod notice;
pub mod project_editor;
pub mod project_form;
mod state;
mod suggestion;
pub mod upload;

#[cfg(test)]
mod testing;

pub use anexo_editor::{AnexoEditorController, AnexoSheet};
pub use cases::{CaseBrowserController, CaseShelf};
pub use dashboard::{Dashboard, DashboardController};
pub use error::ViewError;
pub use lifecycle::Lifecycle;
pub use notice::{Notice, Tier};
pub use project_editor::{AnexoCard, ProjectEditorController, ProjectOverview};
pub use project_form::{Navigation, ProjectCreationController};
pub use state::{Status, ViewState};
pub use suggestion::{PanelState, SuggestionPanel, Ticket};
pub use upload::{MANUAL_IMPORT_COMMAND, UploadController, UploadForm, UploadOutcome, UploadStage};
