mod commands;
mod files;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use pronas_client::{ApiClient, ClientConfig, DEFAULT_BASE_URL, ResourceApi};
use pronas_core::{CaseFilter, NewProject, ProjectField, UploadCategory};
use tracing_subscriber::EnvFilter;

use crate::commands::AnexoEdit;

#[derive(Parser)]
#[command(name = "pronas", version, about = "PRONAS/PCD project authoring client")]
struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, env = "PRONAS_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List projects with status counts and average completion.
    Dashboard,
    #[command(subcommand)]
    Project(ProjectCommand),
    #[command(subcommand)]
    Anexo(AnexoCommand),
    /// List knowledge-base reference cases.
    Cases {
        #[arg(long, conflicts_with = "rejected_only")]
        approved_only: bool,
        #[arg(long)]
        rejected_only: bool,
    },
    /// Show one reference case in full.
    Case { id: i64 },
    /// Upload documents to the knowledge base and index them.
    Upload {
        #[arg(long, default_value_t = UploadCategory::default())]
        category: UploadCategory,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check that the AI service is reachable.
    Health,
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Show a project and its anexos.
    Show { id: i64 },
    /// Create a project.
    New(NewProjectArgs),
    /// Delete a project.
    Delete { id: i64 },
}

#[derive(Args)]
struct NewProjectArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value_t = ProjectField::default())]
    field: ProjectField,
    #[arg(long)]
    institution: String,
    #[arg(long)]
    cnpj: String,
    #[arg(long, default_value = "")]
    priority_area: String,
}

impl From<NewProjectArgs> for NewProject {
    fn from(args: NewProjectArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            field: args.field,
            institution_name: args.institution,
            institution_cnpj: args.cnpj,
            priority_area: args.priority_area,
        }
    }
}

#[derive(Subcommand)]
enum AnexoCommand {
    /// Show an anexo's fields.
    Show { id: i64 },
    /// Set fields and/or take an AI suggestion, then save.
    Edit {
        id: i64,
        /// Field assignment, repeatable.
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
        /// Ask the AI for a suggestion for this field.
        #[arg(long, value_name = "FIELD")]
        suggest: Option<String>,
        /// Write the suggestion into the form before saving.
        #[arg(long, requires = "suggest")]
        apply: bool,
    },
    /// Validate an anexo's current data.
    Validate {
        id: i64,
        /// Validate what is stored on the server instead of the loaded form.
        #[arg(long)]
        stored: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {raw:?}"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("empty field name in {raw:?}"));
    }
    Ok((field.to_string(), value.to_string()))
}

fn case_filter(approved_only: bool, rejected_only: bool) -> CaseFilter {
    match (approved_only, rejected_only) {
        (true, _) => CaseFilter::Approved,
        (_, true) => CaseFilter::Rejected,
        _ => CaseFilter::All,
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!(base_url = %cli.api_url, "using backend");
    let api: Arc<dyn ResourceApi> = Arc::new(ApiClient::new(ClientConfig::new(cli.api_url)));

    match cli.command {
        Command::Dashboard => commands::dashboard(api).await,
        Command::Project(ProjectCommand::Show { id }) => commands::show_project(api, id).await,
        Command::Project(ProjectCommand::New(args)) => {
            commands::create_project(api, args.into()).await
        }
        Command::Project(ProjectCommand::Delete { id }) => commands::delete_project(api, id).await,
        Command::Anexo(AnexoCommand::Show { id }) => commands::show_anexo(api, id).await,
        Command::Anexo(AnexoCommand::Edit {
            id,
            assignments,
            suggest,
            apply,
        }) => {
            let edit = AnexoEdit {
                assignments,
                suggest,
                apply,
            };
            commands::edit_anexo(api, id, edit).await
        }
        Command::Anexo(AnexoCommand::Validate { id, stored }) => {
            commands::validate_anexo(api, id, stored).await
        }
        Command::Cases {
            approved_only,
            rejected_only,
        } => commands::list_cases(api, case_filter(approved_only, rejected_only)).await,
        Command::Case { id } => commands::show_case(api, id).await,
        Command::Upload { category, files } => commands::upload(api, category, &files).await,
        Command::Health => commands::health(api).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    tracing::info!("pronas v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
