//! Projects: the top-level grant-application record and its derived dashboard stats.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ParseError;
use crate::lenient;

/// One of the three PRONAS/PCD funding fields a project must declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectField {
    #[default]
    #[serde(rename = "prestacao_servicos_medico_assistenciais")]
    MedicalAssistance,
    #[serde(rename = "formacao_treinamento_recursos_humanos")]
    Training,
    #[serde(rename = "realizacao_pesquisas")]
    Research,
}

impl ProjectField {
    pub const ALL: [ProjectField; 3] = [Self::MedicalAssistance, Self::Training, Self::Research];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MedicalAssistance => "prestacao_servicos_medico_assistenciais",
            Self::Training => "formacao_treinamento_recursos_humanos",
            Self::Research => "realizacao_pesquisas",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MedicalAssistance => "Prestação de Serviços Médico-Assistenciais",
            Self::Training => "Formação e Treinamento de Recursos Humanos",
            Self::Research => "Realização de Pesquisas",
        }
    }
}

impl fmt::Display for ProjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ParseError::new("project field", s))
    }
}

/// Review status of a project as reported by the server.
///
/// The server has used two spellings for drafts (`DRAFT` from the creation
/// endpoint, `em_elaboracao` from the listing), so both decode to
/// [`ProjectStatus::Draft`]. Anything unrecognised is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
    InReview,
    Unknown(String),
}

impl ProjectStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "em_elaboracao",
            Self::Submitted => "submetido",
            Self::Approved => "aprovado",
            Self::Rejected => "rejeitado",
            Self::InReview => "em_analise",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Draft => "Em Elaboração",
            Self::Submitted => "Submetido",
            Self::Approved => "Aprovado",
            Self::Rejected => "Rejeitado",
            Self::InReview => "Em Análise",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "DRAFT" | "em_elaboracao" => Self::Draft,
            "submetido" => Self::Submitted,
            "aprovado" => Self::Approved,
            "rejeitado" => Self::Rejected,
            "em_analise" => Self::InReview,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A grant-application project. Owned by the server; the client only holds copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub field: ProjectField,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub institution_cnpj: Option<String>,
    #[serde(default)]
    pub priority_area: Option<String>,
    /// Server-computed 0–100; absent on single-project reads.
    #[serde(default, deserialize_with = "lenient::percent")]
    pub completion_percentage: u8,
    /// Budget in centavos.
    #[serde(default)]
    pub total_budget: Option<i64>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Payload for `POST /api/projects/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub field: ProjectField,
    pub institution_name: String,
    pub institution_cnpj: String,
    pub priority_area: String,
}

impl NewProject {
    /// First required field left blank, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("institution_name", &self.institution_name),
            ("institution_cnpj", &self.institution_cnpj),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Dashboard aggregates, always recomputed from the latest fetched list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectStats {
    pub total: usize,
    pub draft: usize,
    pub submitted: usize,
    pub approved: usize,
    pub avg_completion: f64,
}

impl ProjectStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();
        let sum: f64 = projects
            .iter()
            .map(|p| f64::from(p.completion_percentage))
            .sum();
        let avg_completion = if projects.is_empty() {
            0.0
        } else {
            sum / projects.len() as f64
        };

        Self {
            total: projects.len(),
            draft: count(ProjectStatus::Draft),
            submitted: count(ProjectStatus::Submitted),
            approved: count(ProjectStatus::Approved),
            avg_completion,
        }
    }
}
