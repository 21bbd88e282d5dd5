//! Plain-text cards for every screen.
//!
//! Each function returns the rendered text so the output can be checked in
//! tests; `main` decides where it goes.

use std::fmt::Write as _;

use pronas_core::{AiHealth, Case, Suggestion, ValidationReport};
use pronas_views::{
    AnexoSheet, CaseShelf, Dashboard, Notice, PanelState, ProjectOverview, SuggestionPanel, Tier,
    UploadOutcome,
};

const MAX_LIST_ITEMS: usize = 10;
const MAX_VALUE_CHARS: usize = 60;
const BAR_WIDTH: usize = 20;

// ── Dashboard ──

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let stats = &dashboard.stats;
    line(&mut out, "=== Projetos PRONAS/PCD ===");
    line(&mut out, "");
    row(&mut out, "Total", stats.total);
    row(&mut out, "Em elaboração", stats.draft);
    row(&mut out, "Submetidos", stats.submitted);
    row(&mut out, "Aprovados", stats.approved);
    row(
        &mut out,
        "Conclusão média",
        format!("{:.0}%", stats.avg_completion),
    );
    line(&mut out, "");

    if dashboard.projects.is_empty() {
        line(&mut out, "  (nenhum projeto)");
        return out;
    }
    for project in &dashboard.projects {
        let _ = writeln!(
            out,
            "  #{:<5} {:<40} {:<15} {}",
            project.id,
            shorten(&project.title, 40),
            project.status.label(),
            progress_bar(project.completion_percentage),
        );
    }
    out
}

// ── Project editor ──

pub fn project_overview(overview: &ProjectOverview) -> String {
    let mut out = String::new();
    let project = &overview.project;
    let _ = writeln!(out, "=== {} ===", project.title);
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        line(&mut out, description);
    }
    line(&mut out, "");

    row(&mut out, "ID", project.id);
    row(&mut out, "Status", project.status.label());
    row(&mut out, "Área de atuação", project.field.label());
    optional_row(&mut out, "Instituição", project.institution_name.as_deref());
    optional_row(&mut out, "CNPJ", project.institution_cnpj.as_deref());
    optional_row(&mut out, "Área prioritária", project.priority_area.as_deref());
    if let Some(budget) = project.total_budget {
        row(&mut out, "Orçamento", format_centavos(budget));
    }
    row(
        &mut out,
        "Conclusão dos anexos",
        format!("{:.0}%", overview.average_completion()),
    );
    line(&mut out, "");

    line(&mut out, "Anexos");
    if overview.anexos.is_empty() {
        line(&mut out, "  (nenhum anexo)");
    }
    for card in overview.cards() {
        let criticality = card.criticality.map(|c| c.label()).unwrap_or_default();
        let _ = writeln!(out, "  {:<12} {:<48} {}", card.heading, card.name, criticality);
        if !card.description.is_empty() {
            let _ = writeln!(out, "    {}", card.description);
        }
        let _ = writeln!(
            out,
            "    {}  {} (pronas anexo edit {})",
            progress_bar(card.completion),
            card.action_label(),
            card.anexo_id
        );
    }
    out
}

// ── Anexo editor ──

pub fn anexo_sheet(sheet: &AnexoSheet) -> String {
    let mut out = String::new();
    let anexo = &sheet.anexo;
    let _ = writeln!(out, "=== {} ===", anexo.title());
    match anexo.tipo.numeral() {
        Some(numeral) => {
            let _ = writeln!(out, "Anexo {numeral}");
        }
        None => line(&mut out, anexo.tipo.as_str()),
    }
    line(&mut out, "");

    row(&mut out, "Projeto", anexo.project_id);
    row(
        &mut out,
        "Conclusão (servidor)",
        progress_bar(anexo.completion_score),
    );
    row(&mut out, "Preenchimento local", progress_bar(sheet.fill_ratio()));
    if sheet.is_dirty() {
        row(&mut out, "Alterações", "não salvas");
    }
    line(&mut out, "");

    line(&mut out, "Campos");
    if sheet.form.is_empty() {
        line(&mut out, "  (sem dados)");
    }
    for (field, value) in sheet.form.iter() {
        let shown = if value.trim().is_empty() {
            "-".to_string()
        } else {
            shorten(value, MAX_VALUE_CHARS)
        };
        let _ = writeln!(out, "  {field:<26} {shown}");
    }
    line(&mut out, "");

    if let Some(report) = &sheet.validation {
        out.push_str(&validation(report));
    }
    out.push_str(&panel(&sheet.panel));
    out
}

pub fn validation(report: &ValidationReport) -> String {
    let mut out = String::new();
    line(&mut out, "Validação");
    row(&mut out, "Pontuação", format!("{}/100", report.score));
    row(&mut out, "Situação", report.status.as_str());
    list(&mut out, "Campos faltando", &report.missing_fields);
    list(&mut out, "Avisos", &report.warnings);
    list(&mut out, "Sugestões", &report.suggestions);
    list(&mut out, "Pontos fortes", &report.strengths);
    line(&mut out, "");
    out
}

pub fn panel(panel: &SuggestionPanel) -> String {
    let mut out = String::new();
    match panel.state() {
        PanelState::Empty => return out,
        PanelState::Requesting { field } => {
            let _ = writeln!(out, "Sugestão da IA para {field}: aguardando...");
        }
        PanelState::Offered { field, suggestion } => {
            let _ = writeln!(out, "Sugestão da IA para {field}");
            out.push_str(&suggestion_body(suggestion));
        }
        PanelState::Failed { field, message } => {
            let _ = writeln!(out, "Sugestão da IA para {field}: falhou ({message})");
        }
    }
    line(&mut out, "");
    out
}

fn suggestion_body(suggestion: &Suggestion) -> String {
    let mut out = String::new();
    let marker = if suggestion.is_high_confidence() {
        "alta"
    } else {
        "baixa"
    };
    row(
        &mut out,
        "Confiança",
        format!("{}% ({marker})", suggestion.confidence_percent()),
    );
    if suggestion.reference_count() > 0 {
        row(
            &mut out,
            "Referências",
            format!("{} casos similares", suggestion.reference_count()),
        );
    }
    for text_line in suggestion.suggestion.lines() {
        let _ = writeln!(out, "    {text_line}");
    }
    out
}

// ── Knowledge base ──

pub fn cases(shelf: &CaseShelf) -> String {
    let mut out = String::new();
    line(&mut out, "=== Casos de referência ===");
    row(&mut out, "Aprovados", shelf.approved);
    row(&mut out, "Reprovados", shelf.rejected);
    line(&mut out, "");
    for case in &shelf.cases {
        let verdict = match case.is_approved {
            Some(true) => "aprovado",
            Some(false) => "reprovado",
            None => "-",
        };
        let year = case.year.map(|y| y.to_string()).unwrap_or_default();
        let _ = writeln!(
            out,
            "  #{:<5} {:<50} {:<6} {}",
            case.id,
            shorten(case.project_title.as_deref().unwrap_or("(sem título)"), 50),
            year,
            verdict
        );
    }
    out
}

pub fn case_card(case: &Case) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== {} ===",
        case.project_title.as_deref().unwrap_or("(sem título)")
    );
    line(&mut out, "");
    row(&mut out, "ID", case.id);
    optional_row(&mut out, "Instituição", case.institution_name.as_deref());
    if let Some(year) = case.year {
        row(&mut out, "Ano", year);
    }
    optional_row(&mut out, "Área", case.field.as_deref());
    optional_row(&mut out, "Área prioritária", case.priority_area.as_deref());
    if let Some(approved) = case.is_approved {
        row(&mut out, "Resultado", if approved { "aprovado" } else { "reprovado" });
    }
    if let Some(score) = case.score {
        row(&mut out, "Pontuação", score);
    }
    if let Some(budget) = case.budget {
        row(&mut out, "Orçamento", format_centavos(budget));
    }
    if let Some(summary) = case.summary.as_deref().filter(|s| !s.is_empty()) {
        line(&mut out, "");
        line(&mut out, "Resumo");
        let _ = writeln!(out, "  {summary}");
    }
    out
}

pub fn upload_outcome(outcome: &UploadOutcome) -> String {
    match outcome {
        UploadOutcome::Completed {
            uploaded,
            processed,
        } => format!("  enviados: {uploaded}  indexados: {processed}\n"),
        UploadOutcome::Partial { uploaded, error } => {
            format!("  enviados: {uploaded}  indexação falhou: {error}\n")
        }
    }
}

pub fn health(health: &AiHealth) -> String {
    let mut out = String::new();
    row(&mut out, "IA", &health.status);
    list(&mut out, "Agentes", &health.agents);
    out
}

pub fn notice(notice: &Notice) -> String {
    if notice.blocking {
        format!("[!] {}", notice.text)
    } else {
        notice.text.clone()
    }
}

/// Print `notice` to stdout, or stderr for failures.
pub fn print_notice(notice: &Notice) {
    match notice.tier {
        Tier::Failure => eprintln!("{}", self::notice(notice)),
        Tier::Success | Tier::Warning => println!("{}", self::notice(notice)),
    }
}

// ── Helpers ──

pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Format centavos as reais, e.g. `R$ 1234.56`.
fn format_centavos(centavos: i64) -> String {
    let sign = if centavos < 0 { "-" } else { "" };
    let abs = centavos.unsigned_abs();
    format!("{sign}R$ {}.{:02}", abs / 100, abs % 100)
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "  {label:<26} {value}");
}

fn optional_row(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        row(out, label, value);
    }
}

fn list(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {} ({}):", label, items.len());
    for item in items.iter().take(MAX_LIST_ITEMS) {
        let _ = writeln!(out, "    - {item}");
    }
    if items.len() > MAX_LIST_ITEMS {
        let _ = writeln!(out, "    ... and {} more", items.len() - MAX_LIST_ITEMS);
    }
}
