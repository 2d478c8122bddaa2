use crate::cli::{
    AddArgs, ListArgs, ReportArgs, RequirementsArgs, ShareTarget, ShowArgs, UpdateArgs,
};
use chrono::{Local, NaiveDate};
use rh_intake::config::AppConfig;
use rh_intake::error::AppError;
use rh_intake::workflows::intake::{
    backup_file_name, csv_file_name, email_link, missing_documents_message, pending_lines,
    pending_report, required_documents, to_csv, to_json_backup, whatsapp_link, Candidate,
    CandidateDraft, CandidateId, CandidateStore, DocumentKind, Gender, JsonFileStorage,
    SeedPolicy, StatusSummary, StoreError, ALL_COMPLETE_MESSAGE, DEFAULT_EMAIL_SUBJECT,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub(crate) type FileStore = CandidateStore<JsonFileStorage>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CandidateView<'a> {
    #[serde(flatten)]
    candidate: &'a Candidate,
    required: Vec<DocumentKind>,
    status: StatusSummary,
}

impl<'a> CandidateView<'a> {
    fn new(candidate: &'a Candidate) -> Self {
        Self {
            candidate,
            required: candidate.required_documents(),
            status: candidate.status(),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn open_store(config: &AppConfig) -> Result<FileStore, AppError> {
    let storage = Arc::new(JsonFileStorage::new(&config.storage.data_path));
    let store = CandidateStore::open(storage, config.storage.seed_policy())?;

    if store.was_seeded() {
        store.flush()?;
        info!(path = %config.storage.data_path.display(), "sample candidates installed");
    }

    Ok(store)
}

pub(crate) fn add(store: &mut FileStore, args: AddArgs) -> Result<(), AppError> {
    let AddArgs {
        name,
        gender,
        has_children,
        documents,
    } = args;

    let draft = CandidateDraft::new(name, normalize_gender(&gender))
        .with_children(has_children)
        .with_documents(resolve_documents(&documents));

    let candidate = store.create(draft)?;
    println!("Candidato cadastrado com sucesso: {}", candidate.id);
    render_candidate(&candidate);
    Ok(())
}

pub(crate) fn update(store: &mut FileStore, args: UpdateArgs) -> Result<(), AppError> {
    let id = CandidateId(args.id.clone());
    let draft = merge_update(CandidateDraft::from(lookup(store, &id)?), args);

    let candidate = store.update(&id, draft)?;
    println!("Candidato atualizado com sucesso: {}", candidate.id);
    render_candidate(&candidate);
    Ok(())
}

pub(crate) fn delete(store: &mut FileStore, id: &str) -> Result<(), AppError> {
    let removed = store.delete(&CandidateId(id.to_string()))?;
    println!("Candidato excluído com sucesso: {} ({})", removed.name, removed.id);
    Ok(())
}

pub(crate) fn show(store: &FileStore, args: ShowArgs) -> Result<(), AppError> {
    let candidate = lookup(store, &CandidateId(args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&CandidateView::new(candidate))?);
    } else {
        render_candidate(candidate);
    }
    Ok(())
}

pub(crate) fn list(store: &FileStore, args: ListArgs) -> Result<(), AppError> {
    let candidates = store.list(args.search.as_deref());

    if args.json {
        let views: Vec<_> = candidates.into_iter().map(CandidateView::new).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if candidates.is_empty() {
        println!("Nenhum candidato encontrado.");
        return Ok(());
    }

    for candidate in candidates {
        let status = candidate.status();
        println!(
            "- {} | {} | {}/{} ({}%) | {}",
            candidate.id,
            candidate.name,
            status.delivered,
            status.total,
            status.percentage,
            status.label()
        );
    }
    Ok(())
}

pub(crate) fn stats(store: &FileStore) {
    let stats = store.stats();
    println!("Total de candidatos: {}", stats.total);
    println!("Documentação completa: {}", stats.completed);
}

pub(crate) fn pending(store: &FileStore) {
    let incomplete = store.incomplete();
    if incomplete.is_empty() {
        println!("{ALL_COMPLETE_MESSAGE}");
        return;
    }

    for line in pending_lines(&incomplete) {
        println!("- {line}");
    }
}

pub(crate) fn missing(store: &FileStore, id: &str) -> Result<(), AppError> {
    let candidate = lookup(store, &CandidateId(id.to_string()))?;
    println!("{}", missing_documents_message(candidate));
    Ok(())
}

pub(crate) fn report(store: &FileStore, args: ReportArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let message = pending_report(&store.incomplete(), date);

    let output = match args.share {
        None => message,
        Some(ShareTarget::Whatsapp) => whatsapp_link(&message)
            .map_err(|err| AppError::Input(err.to_string()))?
            .to_string(),
        Some(ShareTarget::Email) => email_link(DEFAULT_EMAIL_SUBJECT, &message)
            .map_err(|err| AppError::Input(err.to_string()))?
            .to_string(),
    };

    println!("{output}");
    Ok(())
}

pub(crate) fn print_requirements(args: &RequirementsArgs) {
    let gender = Gender::from(normalize_gender(&args.gender));
    for (index, kind) in required_documents(&gender, args.has_children)
        .into_iter()
        .enumerate()
    {
        println!("{:>2}. {} [{}]", index + 1, kind.label(), kind.slug());
    }
}

pub(crate) fn backup(store: &FileStore, out: Option<PathBuf>) -> Result<(), AppError> {
    let path = out.unwrap_or_else(|| PathBuf::from(backup_file_name(Local::now().date_naive())));
    let body = to_json_backup(store.candidates())?;
    fs::write(&path, body)?;
    println!("Backup realizado com sucesso: {}", path.display());
    Ok(())
}

pub(crate) fn restore(store: &mut FileStore, path: &Path) -> Result<(), AppError> {
    let raw = fs::read_to_string(path)?;
    let count = store.restore(&raw)?;
    println!("Dados restaurados com sucesso: {count} candidato(s)");
    Ok(())
}

pub(crate) fn export_csv(store: &FileStore, out: Option<PathBuf>) -> Result<(), AppError> {
    let path = out.unwrap_or_else(|| PathBuf::from(csv_file_name(Local::now().date_naive())));
    fs::write(&path, to_csv(store.candidates())?)?;
    println!("Relatório CSV exportado com sucesso: {}", path.display());
    Ok(())
}

pub(crate) fn reset(store: &mut FileStore, empty: bool) -> Result<(), AppError> {
    let seed = if empty {
        SeedPolicy::Empty
    } else {
        SeedPolicy::Sample
    };
    store.reset(seed)?;
    println!(
        "Todos os dados foram resetados! ({} candidato(s))",
        store.candidates().len()
    );
    Ok(())
}

fn lookup<'a>(store: &'a FileStore, id: &CandidateId) -> Result<&'a Candidate, AppError> {
    store
        .find_by_id(id)
        .ok_or_else(|| AppError::Store(StoreError::NotFound(id.clone())))
}

fn render_candidate(candidate: &Candidate) {
    let status = candidate.status();
    println!("{} ({})", candidate.name, candidate.id);
    println!("  Gênero: {}", candidate.gender);
    println!(
        "  Tem filhos: {}",
        if candidate.has_children { "Sim" } else { "Não" }
    );
    println!(
        "  Cadastrado em: {}",
        candidate.created_at.format("%d/%m/%Y %H:%M")
    );
    println!(
        "  Status: {} — {}/{} ({}%)",
        status.label(),
        status.delivered,
        status.total,
        status.percentage
    );
    for kind in candidate.required_documents() {
        let mark = if candidate.has_delivered(kind) { "x" } else { " " };
        println!("  [{mark}] {kind}");
    }
}

/// Apply edit flags over the current attributes: `--clear-docs` first, then
/// `--withdraw`, then `--deliver`.
fn merge_update(mut draft: CandidateDraft, args: UpdateArgs) -> CandidateDraft {
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(gender) = args.gender {
        draft.gender = normalize_gender(&gender);
    }
    if let Some(has_children) = args.has_children {
        draft.has_children = has_children;
    }
    if args.clear_docs {
        draft.documents.clear();
    }
    for label in resolve_documents(&args.withdraw) {
        draft.documents.remove(&label);
    }
    draft.documents.extend(resolve_documents(&args.deliver));
    draft
}

/// Accept `masculino`/`feminino` in any case; anything else passes through.
fn normalize_gender(raw: &str) -> String {
    let trimmed = raw.trim();
    [Gender::MALE_LABEL, Gender::FEMALE_LABEL]
        .into_iter()
        .find(|label| label.eq_ignore_ascii_case(trimmed))
        .unwrap_or(trimmed)
        .to_string()
}

/// Map labels or keys onto canonical labels. Unrecognized input is kept verbatim so
/// the store reports it as an unknown document.
fn resolve_documents(raw: &[String]) -> BTreeSet<String> {
    raw.iter()
        .map(|value| match value.parse::<DocumentKind>() {
            Ok(kind) => kind.label().to_string(),
            Err(_) => value.trim().to_string(),
        })
        .collect()
}
