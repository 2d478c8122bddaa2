use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracked candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared gender. Only [`Gender::Male`] changes the checklist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub const MALE_LABEL: &'static str = "Masculino";
    pub const FEMALE_LABEL: &'static str = "Feminino";

    /// Parse user input, returning `None` for blank values.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::from(trimmed.to_string()))
    }

    pub fn label(&self) -> &str {
        match self {
            Gender::Male => Self::MALE_LABEL,
            Gender::Female => Self::FEMALE_LABEL,
            Gender::Other(label) => label,
        }
    }

    pub fn is_male(&self) -> bool {
        matches!(self, Gender::Male)
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::MALE_LABEL => Gender::Male,
            Self::FEMALE_LABEL => Gender::Female,
            _ => Gender::Other(value),
        }
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        match value {
            Gender::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed vocabulary of onboarding documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "Entrevista Online")]
    OnlineInterview,
    #[serde(rename = "Curriculo")]
    Resume,
    #[serde(rename = "RG")]
    IdentityCard,
    #[serde(rename = "CTPS Digital")]
    DigitalWorkCard,
    #[serde(rename = "Comprovante de Situacao Cadastral CPF")]
    CpfRegistrationStatus,
    #[serde(rename = "Certidao de Nascimento ou Casamento")]
    BirthOrMarriageCertificate,
    #[serde(rename = "Historico Escolar")]
    SchoolTranscript,
    #[serde(rename = "Comprovante de Residencia")]
    ProofOfResidence,
    #[serde(rename = "Carteira de Vacina")]
    VaccinationCard,
    #[serde(rename = "Cartao do SUS")]
    HealthSystemCard,
    #[serde(rename = "PIS ou NIS ou NIT")]
    SocialIntegrationNumber,
    #[serde(rename = "Extrato Bancario")]
    BankStatement,
    #[serde(rename = "Quitacao Eleitoral")]
    ElectoralClearance,
    #[serde(rename = "Certificado de Alistamento")]
    MilitaryEnlistment,
    #[serde(rename = "CPF dos Filhos")]
    ChildrenCpf,
    #[serde(rename = "Certidao de Nascimento dos Filhos")]
    ChildrenBirthCertificates,
    #[serde(rename = "Cartao de Vacina dos Filhos")]
    ChildrenVaccinationCards,
}

impl DocumentKind {
    pub const ALL: [Self; 17] = [
        Self::OnlineInterview,
        Self::Resume,
        Self::IdentityCard,
        Self::DigitalWorkCard,
        Self::CpfRegistrationStatus,
        Self::BirthOrMarriageCertificate,
        Self::SchoolTranscript,
        Self::ProofOfResidence,
        Self::VaccinationCard,
        Self::HealthSystemCard,
        Self::SocialIntegrationNumber,
        Self::BankStatement,
        Self::ElectoralClearance,
        Self::MilitaryEnlistment,
        Self::ChildrenCpf,
        Self::ChildrenBirthCertificates,
        Self::ChildrenVaccinationCards,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::OnlineInterview => "Entrevista Online",
            Self::Resume => "Curriculo",
            Self::IdentityCard => "RG",
            Self::DigitalWorkCard => "CTPS Digital",
            Self::CpfRegistrationStatus => "Comprovante de Situacao Cadastral CPF",
            Self::BirthOrMarriageCertificate => "Certidao de Nascimento ou Casamento",
            Self::SchoolTranscript => "Historico Escolar",
            Self::ProofOfResidence => "Comprovante de Residencia",
            Self::VaccinationCard => "Carteira de Vacina",
            Self::HealthSystemCard => "Cartao do SUS",
            Self::SocialIntegrationNumber => "PIS ou NIS ou NIT",
            Self::BankStatement => "Extrato Bancario",
            Self::ElectoralClearance => "Quitacao Eleitoral",
            Self::MilitaryEnlistment => "Certificado de Alistamento",
            Self::ChildrenCpf => "CPF dos Filhos",
            Self::ChildrenBirthCertificates => "Certidao de Nascimento dos Filhos",
            Self::ChildrenVaccinationCards => "Cartao de Vacina dos Filhos",
        }
    }

    /// Command-line friendly key, e.g. `ctps-digital`.
    pub fn slug(self) -> String {
        self.label().to_ascii_lowercase().replace(' ', "-")
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document '{0}'")]
pub struct UnknownDocument(pub String);

impl FromStr for DocumentKind {
    type Err = UnknownDocument;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let lowered = trimmed.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().to_lowercase() == lowered || kind.slug() == lowered)
            .ok_or_else(|| UnknownDocument(trimmed.to_string()))
    }
}

/// A tracked candidate and the documents delivered so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub documents: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn has_delivered(&self, kind: DocumentKind) -> bool {
        self.documents.contains(kind.label())
    }
}

/// Attribute set accepted by `create`/`update`; validated by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateDraft {
    pub name: String,
    pub gender: String,
    pub has_children: bool,
    pub documents: BTreeSet<String>,
}

impl CandidateDraft {
    pub fn new(name: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: gender.into(),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    pub fn with_documents<I>(mut self, documents: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.documents = documents.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&Candidate> for CandidateDraft {
    fn from(candidate: &Candidate) -> Self {
        Self {
            name: candidate.name.clone(),
            gender: candidate.gender.label().to_string(),
            has_children: candidate.has_children,
            documents: candidate.documents.clone(),
        }
    }
}
