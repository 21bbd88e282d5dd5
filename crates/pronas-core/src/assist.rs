//! AI assistant payloads: field suggestions and annex validation reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::anexo::{AnexoType, FormData};
use crate::lenient;
use crate::project::{Project, ProjectField};

/// Confidence above which a suggestion is shown as high-confidence.
pub const HIGH_CONFIDENCE: f32 = 0.7;

const DEFAULT_PRIORITY_AREA: &str = "Reabilitação";
const DEFAULT_INSTITUTION: &str = "Hospital";

/// Project facts sent along with a suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub field: ProjectField,
    pub priority_area: String,
    pub institution: String,
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self {
            field: ProjectField::default(),
            priority_area: DEFAULT_PRIORITY_AREA.to_string(),
            institution: DEFAULT_INSTITUTION.to_string(),
        }
    }
}

impl From<&Project> for ProjectContext {
    fn from(project: &Project) -> Self {
        let or_default = |value: &Option<String>, default: &str| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            field: project.field,
            priority_area: or_default(&project.priority_area, DEFAULT_PRIORITY_AREA),
            institution: or_default(&project.institution_name, DEFAULT_INSTITUTION),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldContext {
    pub current_value: String,
}

/// Body of `POST /api/ai/suggest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub field_name: String,
    pub field_context: FieldContext,
    pub project_context: ProjectContext,
}

impl SuggestionRequest {
    pub fn new(
        field_name: impl Into<String>,
        current_value: impl Into<String>,
        project_context: ProjectContext,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            field_context: FieldContext {
                current_value: current_value.into(),
            },
            project_context,
        }
    }
}

/// An AI-proposed value for one form field. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub references: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Suggestion {
    pub fn reference_count(&self) -> usize {
        self.references.as_ref().map_or(0, Vec::len)
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence > HIGH_CONFIDENCE
    }

    /// Confidence as a whole percentage for display.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Body of `POST /api/ai/validate`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRequest<'a> {
    pub anexo_data: &'a FormData,
    pub anexo_type: &'a AnexoType,
}

/// Overall verdict of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValidationStatus {
    Excellent,
    Good,
    NeedsImprovement,
    Critical,
    #[default]
    Pending,
    Other(String),
}

impl ValidationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::NeedsImprovement => "needs_improvement",
            Self::Critical => "critical",
            Self::Pending => "pending",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ValidationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "excellent" => Self::Excellent,
            "good" => Self::Good,
            "needs_improvement" => Self::NeedsImprovement,
            "critical" => Self::Critical,
            "pending" => Self::Pending,
            _ => Self::Other(raw),
        }
    }
}

impl From<ValidationStatus> for String {
    fn from(status: ValidationStatus) -> Self {
        match status {
            ValidationStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Server-defined validation result; every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default, deserialize_with = "lenient::percent")]
    pub score: u8,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub status: ValidationStatus,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub missing_fields: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub warnings: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub suggestions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub strengths: Vec<String>,
}

impl ValidationReport {
    /// Read a report out of an arbitrary JSON value. `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// Response of `POST /api/anexos/{id}/validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValidation {
    pub anexo_id: i64,
    pub validation: ValidationReport,
}

/// Response of `GET /api/ai/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiHealth {
    pub status: String,
    #[serde(default)]
    pub agents: Vec<String>,
}
