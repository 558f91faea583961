//! `roster` command line front end.
//!
//! # Responsibility
//! - Act as the UI layer over `roster_core`: collect raw fields, render the
//!   table, surface field and duplicate-id errors.
//! - Resolve configuration from environment plus flags.
//!
//! # Invariants
//! - Every command opens the database, runs one use-case and exits.
//! - Failures print to stderr and exit non-zero; nothing panics.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use roster_core::view::{COLUMNS, SCROLL_THRESHOLD};
use roster_core::{
    init_logging, FormMode, KvStudentRepository, RepoError, RosterConfig, RosterView,
    SqliteKvStore, StudentInput, StudentService, SubmitError,
};
use serde::Serialize;
use serde_json::json;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this student?";

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Register and manage student records")]
#[command(version)]
struct Cli {
    /// Path to the SQLite database file (overrides ROSTER_DB_PATH)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Absolute directory for rolling log files (overrides ROSTER_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides ROSTER_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// List all students in registration order
    List,

    /// Show one student by ID
    Show {
        /// Student ID
        id: String,
    },

    /// Register a new student
    Add(FieldArgs),

    /// Replace all fields of an existing student
    Update {
        /// ID of the student being edited
        target_id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a student by ID
    Delete {
        /// Student ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check field values without saving anything
    Validate(FieldArgs),
}

#[derive(Args, Debug, Clone)]
struct FieldArgs {
    /// Full name (letters and spaces)
    #[arg(long)]
    name: String,
    /// Student ID (digits)
    #[arg(long)]
    id: String,
    /// Email address
    #[arg(long)]
    email: String,
    /// Contact number (10 digits)
    #[arg(long)]
    contact: String,
}

impl From<FieldArgs> for StudentInput {
    fn from(value: FieldArgs) -> Self {
        StudentInput::new(value.name, value.id, value.email, value.contact)
    }
}

/// Failure reported to the user with its exit code.
#[derive(Debug)]
struct CliError {
    message: String,
    code: u8,
}

impl CliError {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    fn storage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }
}

impl From<SubmitError> for CliError {
    fn from(value: SubmitError) -> Self {
        match value {
            SubmitError::Repo(err) => err.into(),
            other => Self::rejected(other.user_message()),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateId(_) | RepoError::NotFound(_) => {
                SubmitError::from(value).into()
            }
            other => Self::storage(other.to_string()),
        }
    }
}

type Service = StudentService<KvStudentRepository<SqliteKvStore>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli.command, cli.format, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            ExitCode::from(err.code)
        }
    }
}

fn resolve_config(cli: &Cli) -> RosterConfig {
    let mut config = RosterConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config
}

fn run(command: Commands, format: OutputFormat, config: &RosterConfig) -> Result<(), CliError> {
    match command {
        Commands::Validate(fields) => validate(fields.into(), format),
        other => run_with_db(other, format, config),
    }
}

fn run_with_db(
    command: Commands,
    format: OutputFormat,
    config: &RosterConfig,
) -> Result<(), CliError> {
    let store = SqliteKvStore::open(&config.db_path).map_err(|err| {
        CliError::storage(format!(
            "cannot open database `{}`: {err}",
            config.db_path.display()
        ))
    })?;
    let mut service = StudentService::new(KvStudentRepository::new(store));

    match command {
        Commands::List => list(&service, format),
        Commands::Show { id } => show(&service, &id, format),
        Commands::Add(fields) => submit(&mut service, FormMode::Idle, fields.into(), format),
        Commands::Update { target_id, fields } => submit(
            &mut service,
            FormMode::Editing(target_id),
            fields.into(),
            format,
        ),
        Commands::Delete { id, yes } => delete(&mut service, &id, yes, format),
        Commands::Validate(fields) => validate(fields.into(), format),
    }
}

fn list(service: &Service, format: OutputFormat) -> Result<(), CliError> {
    let students = service.list()?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "count": students.len(),
            "students": students,
        })),
        OutputFormat::Text => {
            print_table(&roster_core::render(&students));
            Ok(())
        }
    }
}

fn show(service: &Service, id: &str, format: OutputFormat) -> Result<(), CliError> {
    let student = service
        .get(id)?
        .ok_or_else(|| CliError::rejected(format!("Student {id} not found.")))?;
    match format {
        OutputFormat::Json => print_json(&json!(student)),
        OutputFormat::Text => {
            println!("Name:       {}", student.name);
            println!("Student ID: {}", student.id);
            println!("Email:      {}", student.email);
            println!("Contact:    {}", student.contact);
            Ok(())
        }
    }
}

fn submit(
    service: &mut Service,
    mode: FormMode,
    input: StudentInput,
    format: OutputFormat,
) -> Result<(), CliError> {
    let label = mode.submit_label();
    let action = if mode.is_editing() { "update" } else { "add" };
    service.submit(&mode, &input)?;
    let id = input.normalized().id;
    info!("event=cli_submit module=cli status=ok action={action} id={id}");

    match format {
        OutputFormat::Json => print_json(&json!({
            "status": "ok",
            "action": action,
            "id": id,
        })),
        OutputFormat::Text => {
            println!("{label}: saved student {id}.");
            Ok(())
        }
    }
}

fn delete(
    service: &mut Service,
    id: &str,
    yes: bool,
    format: OutputFormat,
) -> Result<(), CliError> {
    if !yes && !confirm(DELETE_CONFIRM_PROMPT) {
        return match format {
            OutputFormat::Json => print_json(&json!({ "status": "cancelled", "id": id })),
            OutputFormat::Text => {
                println!("Delete cancelled.");
                Ok(())
            }
        };
    }

    let removed = service.delete(id)?;
    if format == OutputFormat::Json {
        return print_json(&json!({
            "status": "ok",
            "id": id,
            "removed": removed,
        }));
    }
    if removed {
        println!("Deleted student {id}.");
    } else {
        println!("No student with ID {id}.");
    }
    Ok(())
}

fn validate(input: StudentInput, format: OutputFormat) -> Result<(), CliError> {
    let errors = match input.validate() {
        Ok(_) => {
            return match format {
                OutputFormat::Json => print_json(&json!({ "valid": true, "errors": [] })),
                OutputFormat::Text => {
                    println!("All fields are valid.");
                    Ok(())
                }
            };
        }
        Err(errors) => errors,
    };

    if format == OutputFormat::Json {
        let items = errors
            .errors()
            .iter()
            .map(|err| json!({ "field": err.field().as_str(), "message": err.message() }))
            .collect::<Vec<_>>();
        print_json(&json!({ "valid": false, "errors": items }))?;
    }
    let lines = errors
        .errors()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    Err(CliError::rejected(lines.join("\n")))
}

fn confirm(prompt: &str) -> bool {
    // Prompt goes to stderr so stdout stays machine-readable.
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::storage(format!("cannot encode output: {err}")))?;
    println!("{text}");
    Ok(())
}

fn print_table(view: &RosterView) {
    if let Some(message) = view.empty_message {
        println!("{message}");
        return;
    }

    let data_columns = &COLUMNS[..4];
    let mut widths = data_columns.iter().map(|c| c.len()).collect::<Vec<_>>();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = data_columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{column:<width$}"))
        .collect::<Vec<_>>();
    println!("{}  {}", header.join("  "), COLUMNS[4]);

    for row in &view.rows {
        let cells = row
            .cells()
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>();
        let actions = row
            .actions
            .iter()
            .map(|action| action.label())
            .collect::<Vec<_>>();
        println!("{}  {}", cells.join("  "), actions.join("/"));
    }

    if view.scrollable {
        println!(
            "({} students; more than {SCROLL_THRESHOLD} rows)",
            view.rows.len()
        );
    }
}
