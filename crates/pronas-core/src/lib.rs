//! Core PRONAS/PCD domain types shared by the client, the screen controllers, and the CLI.

pub mod anexo;
pub mod assist;
mod error;
pub mod knowledge;
mod lenient;
pub mod project;

pub use anexo::{Anexo, AnexoType, Criticality, FormData};
pub use assist::{
    AiHealth, ProjectContext, StoredValidation, Suggestion, SuggestionRequest, ValidationReport,
    ValidationRequest, ValidationStatus,
};
pub use error::ParseError;
pub use knowledge::{Case, CaseFilter, ProcessReceipt, UploadCategory, UploadFile, UploadReceipt};
pub use project::{NewProject, Project, ProjectField, ProjectStats, ProjectStatus};
