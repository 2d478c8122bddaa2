use chrono::NaiveDate;
use url::{form_urlencoded, ParseError, Url};

use super::domain::Candidate;

pub const ALL_COMPLETE_MESSAGE: &str = "Todos os candidatos estão com a documentação completa!";
pub const DEFAULT_EMAIL_SUBJECT: &str = "Relatório de Pendências - Departamento de RH";

const REPORT_CLOSING: &str = "Por favor, providencie a documentação pendente para regularização dos processos.\n\nAtenciosamente,\nDepartamento de RH";

/// Dated report of incomplete candidates, ready for clipboard, e-mail or chat.
pub fn pending_report(incomplete: &[&Candidate], date: NaiveDate) -> String {
    if incomplete.is_empty() {
        return ALL_COMPLETE_MESSAGE.to_string();
    }

    let mut message = format!(
        "📋 *RELATÓRIO DE PENDÊNCIAS - {}*\n\n",
        date.format("%d/%m/%Y")
    );

    for (index, candidate) in incomplete.iter().enumerate() {
        let missing = join_labels(candidate);
        message.push_str(&format!("{}. *{}*\n", index + 1, candidate.name));
        message.push_str(&format!("   Documentos faltantes: {missing}\n"));
        message.push('\n');
    }

    message.push_str(REPORT_CLOSING);
    message
}

/// One printable line per incomplete candidate.
pub fn pending_lines(incomplete: &[&Candidate]) -> Vec<String> {
    incomplete
        .iter()
        .map(|candidate| format!("{} — Faltam: {}", candidate.name, join_labels(candidate)))
        .collect()
}

/// Checklist of what a single candidate still owes.
pub fn missing_documents_message(candidate: &Candidate) -> String {
    let status = candidate.status();
    let mut message = String::from("Está faltando os seguintes documentos:\n\n");

    if status.missing.is_empty() {
        message.push_str("• Nenhum documento faltando!");
    } else {
        for kind in &status.missing {
            message.push_str(&format!("• {kind}\n"));
        }
    }

    message
}

pub fn whatsapp_link(text: &str) -> Result<Url, ParseError> {
    Url::parse(&format!("https://wa.me/?text={}", encode_component(text)))
}

pub fn email_link(subject: &str, body: &str) -> Result<Url, ParseError> {
    Url::parse(&format!(
        "mailto:?subject={}&body={}",
        encode_component(subject),
        encode_component(body)
    ))
}

fn join_labels(candidate: &Candidate) -> String {
    candidate
        .status()
        .missing
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// Marks that URI components may carry verbatim but form encoding escapes.
const COMPONENT_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%7E", "~"),
];

// form encoding escapes a literal '+' as %2B, so any '+' left is an encoded space.
// Every '%' in the output opens an escape, so the mark replacements cannot misfire.
fn encode_component(raw: &str) -> String {
    let encoded = form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20");

    COMPONENT_MARKS
        .iter()
        .fold(encoded, |text, (escape, mark)| text.replace(escape, mark))
}
