//! Knowledge base: historical reference cases and document upload batches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ParseError;

/// A historical PRONAS/PCD project (approved or rejected) used as grounding
/// for suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: i64,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub priority_area: Option<String>,
    #[serde(default)]
    pub is_approved: Option<bool>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub key_points: Option<Value>,
    #[serde(default)]
    pub rejection_reasons: Option<Value>,
}

/// Category tag attached to an upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadCategory {
    #[default]
    AprovadosMedico,
    AprovadosFormacao,
    AprovadosPesquisa,
    ReprovadosMedico,
    ReprovadosFormacao,
    ReprovadosPesquisa,
    DiligenciaOficio,
    DiligenciaResposta,
    Portarias,
    Exemplos,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 10] = [
        Self::AprovadosMedico,
        Self::AprovadosFormacao,
        Self::AprovadosPesquisa,
        Self::ReprovadosMedico,
        Self::ReprovadosFormacao,
        Self::ReprovadosPesquisa,
        Self::DiligenciaOficio,
        Self::DiligenciaResposta,
        Self::Portarias,
        Self::Exemplos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AprovadosMedico => "aprovados_medico",
            Self::AprovadosFormacao => "aprovados_formacao",
            Self::AprovadosPesquisa => "aprovados_pesquisa",
            Self::ReprovadosMedico => "reprovados_medico",
            Self::ReprovadosFormacao => "reprovados_formacao",
            Self::ReprovadosPesquisa => "reprovados_pesquisa",
            Self::DiligenciaOficio => "diligencia_oficio",
            Self::DiligenciaResposta => "diligencia_resposta",
            Self::Portarias => "portarias",
            Self::Exemplos => "exemplos",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AprovadosMedico => "Prestação de Serviços Médico-Assistenciais (Aprovado)",
            Self::AprovadosFormacao => "Formação e Treinamento de Recursos Humanos (Aprovado)",
            Self::AprovadosPesquisa => "Realização de Pesquisas (Aprovado)",
            Self::ReprovadosMedico => "Prestação de Serviços Médico-Assistenciais (Reprovado)",
            Self::ReprovadosFormacao => "Formação e Treinamento de Recursos Humanos (Reprovado)",
            Self::ReprovadosPesquisa => "Realização de Pesquisas (Reprovado)",
            Self::DiligenciaOficio => "Ofício de Diligência (Solicitação)",
            Self::DiligenciaResposta => "Resposta de Diligência",
            Self::Portarias => "Portarias Oficiais",
            Self::Exemplos => "Exemplos de Preenchimento",
        }
    }

    /// One-line hint describing what belongs in this category.
    pub fn help(&self) -> &'static str {
        match self {
            Self::AprovadosMedico | Self::ReprovadosMedico => {
                "Projetos de atendimento clínico, fisioterapia, odontologia, psicologia, etc."
            }
            Self::AprovadosFormacao | Self::ReprovadosFormacao => {
                "Projetos de capacitação profissional, cursos, treinamentos em Libras/Braille, etc."
            }
            Self::AprovadosPesquisa | Self::ReprovadosPesquisa => {
                "Projetos de pesquisa científica sobre deficiência e acessibilidade."
            }
            Self::DiligenciaOficio => {
                "Ofícios do Ministério solicitando esclarecimentos ou documentos."
            }
            Self::DiligenciaResposta => "Respostas da instituição às diligências solicitadas.",
            Self::Portarias => "Documentos normativos oficiais do Ministério da Saúde.",
            Self::Exemplos => "Modelos e templates de projetos bem-sucedidos.",
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseError::new("upload category", s))
    }
}

/// Which verdicts a case listing returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CaseFilter {
    #[default]
    All,
    Approved,
    Rejected,
}

impl CaseFilter {
    /// Value of the `approved_only` query parameter; `None` omits it.
    pub fn approved_only(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Approved => Some(true),
            Self::Rejected => Some(false),
        }
    }

    pub fn matches(&self, case: &Case) -> bool {
        match self.approved_only() {
            None => true,
            Some(wanted) => case.is_approved == Some(wanted),
        }
    }
}

/// A client-selected document, read fully into memory before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Response of `POST /api/knowledge/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub uploaded: u32,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub categoria: Option<String>,
}

/// Response of `POST /api/knowledge/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReceipt {
    pub processed: u32,
}
