use std::collections::BTreeSet;
use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::domain::{Candidate, CandidateId};

/// Structural problems with a backup or stored collection.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("content is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("backup root must be an array of candidates, found {found}")]
    NotAnArray { found: &'static str },
    #[error("candidate #{index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("candidate '{id}' (#{index}) has a blank name or gender")]
    IncompleteRecord { index: usize, id: CandidateId },
    #[error("candidate id '{0}' appears more than once")]
    DuplicateId(CandidateId),
}

/// Failures while rendering exports.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer could not be flushed: {0}")]
    Flush(String),
    #[error("csv output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Pretty-printed JSON array of every candidate.
pub fn to_json_backup(candidates: &[Candidate]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(candidates)
}

/// Decode a backup, rejecting anything that is not an array of well-formed candidates
/// with unique ids and non-blank names and genders.
pub fn parse_backup(raw: &str) -> Result<Vec<Candidate>, FormatError> {
    let root: Value = serde_json::from_str(raw).map_err(FormatError::Syntax)?;

    let items = match root {
        Value::Array(items) => items,
        other => {
            return Err(FormatError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };

    let mut seen = BTreeSet::new();
    let mut candidates = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let candidate: Candidate = serde_json::from_value(item)
            .map_err(|source| FormatError::InvalidRecord { index, source })?;

        if candidate.name.trim().is_empty() || candidate.gender.label().trim().is_empty() {
            return Err(FormatError::IncompleteRecord {
                index,
                id: candidate.id,
            });
        }

        if !seen.insert(candidate.id.clone()) {
            return Err(FormatError::DuplicateId(candidate.id));
        }
        candidates.push(candidate);
    }

    Ok(candidates)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Nome")]
    name: &'a str,
    #[serde(rename = "Gênero")]
    gender: &'a str,
    #[serde(rename = "Tem Filhos")]
    has_children: &'static str,
    #[serde(rename = "Documentos Entregues")]
    delivered: usize,
    #[serde(rename = "Documentos Exigidos")]
    total: usize,
    #[serde(rename = "Status")]
    status: &'static str,
}

impl<'a> CsvRow<'a> {
    fn from_candidate(candidate: &'a Candidate) -> Self {
        let status = candidate.status();
        Self {
            name: &candidate.name,
            gender: candidate.gender.label(),
            has_children: if candidate.has_children { "Sim" } else { "Não" },
            delivered: status.delivered,
            total: status.total,
            status: status.label(),
        }
    }
}

/// Write the status report, one row per candidate in store order.
pub fn write_csv<W: Write>(candidates: &[Candidate], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    if candidates.is_empty() {
        csv_writer.write_record([
            "Nome",
            "Gênero",
            "Tem Filhos",
            "Documentos Entregues",
            "Documentos Exigidos",
            "Status",
        ])?;
    }

    for candidate in candidates {
        csv_writer.serialize(CsvRow::from_candidate(candidate))?;
    }

    csv_writer
        .flush()
        .map_err(|err| ExportError::Flush(err.to_string()))
}

pub fn to_csv(candidates: &[Candidate]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(candidates, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("backup_rh_{}.json", date.format("%Y-%m-%d"))
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("relatorio_rh_{}.csv", date.format("%Y-%m-%d"))
}
