//! Anexos: the seven legal-form annexes attached to every project.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient::{self, stringify};

/// How strongly an annex is required in a submission. Presentation metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criticality {
    Mandatory,
    Critical,
    Conditional,
    Informative,
}

impl Criticality {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mandatory => "Obrigatório",
            Self::Critical => "Crítico",
            Self::Conditional => "Condicional",
            Self::Informative => "Informativo",
        }
    }
}

/// Annex kind, `ANEXO_I` through `ANEXO_VII` on the wire.
///
/// Unrecognised tags are kept as [`AnexoType::Other`] and rendered with the
/// raw tag as their name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnexoType {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    Other(String),
}

impl AnexoType {
    pub const ALL: [AnexoType; 7] = [
        Self::I,
        Self::II,
        Self::III,
        Self::IV,
        Self::V,
        Self::VI,
        Self::VII,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::I => "ANEXO_I",
            Self::II => "ANEXO_II",
            Self::III => "ANEXO_III",
            Self::IV => "ANEXO_IV",
            Self::V => "ANEXO_V",
            Self::VI => "ANEXO_VI",
            Self::VII => "ANEXO_VII",
            Self::Other(raw) => raw,
        }
    }

    /// Roman numeral shown in card headings.
    pub fn numeral(&self) -> Option<&'static str> {
        Some(match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
            Self::V => "V",
            Self::VI => "VI",
            Self::VII => "VII",
            Self::Other(_) => return None,
        })
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::I => "Declaração de Ciência e Concordância",
            Self::II => "Formulário de Apresentação de Projeto",
            Self::III => "Declaração de Capacidade Técnico-Operativa",
            Self::IV => "Modelo de Orçamento",
            Self::V => "Formulário de Equipamentos",
            Self::VI => "Requerimento de Habilitação",
            Self::VII => "Minuta do Termo de Compromisso",
            Self::Other(raw) => raw,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::I => "Declaração do responsável legal da instituição",
            Self::II => "Formulário completo com 40+ campos (MAIS IMPORTANTE)",
            Self::III => "Comprovação de capacidade técnica da instituição",
            Self::IV => "Detalhamento completo de custos diretos e indiretos",
            Self::V => "Listagem detalhada de equipamentos (se aplicável)",
            Self::VI => "Para instituições não habilitadas no Ministério",
            Self::VII => "Modelo informativo para referência",
            Self::Other(_) => "",
        }
    }

    pub fn criticality(&self) -> Option<Criticality> {
        match self {
            Self::I | Self::III | Self::IV => Some(Criticality::Mandatory),
            Self::II => Some(Criticality::Critical),
            Self::V | Self::VI => Some(Criticality::Conditional),
            Self::VII => Some(Criticality::Informative),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for AnexoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AnexoType {
    fn from(raw: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .unwrap_or(Self::Other(raw))
    }
}

impl From<AnexoType> for String {
    fn from(kind: AnexoType) -> Self {
        match kind {
            AnexoType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Field name → value payload of an annex form.
///
/// The server stores arbitrary JSON here; the client always works with
/// strings, so non-string values are stringified on decode and `null`
/// becomes the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Overwrite `field`, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(field.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Share of non-blank fields, 0–100. Zero for an empty form.
    pub fn fill_percentage(&self) -> u8 {
        if self.0.is_empty() {
            return 0;
        }
        let filled = self.0.values().filter(|v| !v.trim().is_empty()).count();
        (filled * 100 / self.0.len()) as u8
    }
}

impl From<BTreeMap<String, String>> for FormData {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'de> Deserialize<'de> for FormData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, stringify(v)))
            .collect())
    }
}

/// One annex of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anexo {
    pub id: i64,
    pub project_id: i64,
    pub tipo: AnexoType,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub dados: FormData,
    /// Server-computed 0–100.
    #[serde(default, deserialize_with = "lenient::percent")]
    pub completion_score: u8,
    #[serde(default)]
    pub validation_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub ai_suggestions: Vec<Value>,
}

impl Anexo {
    /// Server-provided name, falling back to the type's fixed display name.
    pub fn title(&self) -> &str {
        self.nome
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.tipo.display_name())
    }
}
