// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod actions;
mod commands;
mod helpers;
mod logging;

use clap::{error::ErrorKind, ArgAction, Parser};
use commands::{Commands, ProviderCommand, ReportCommand};
use foodshare_core::{ExitCode, MachineError, StoreConfig};
use foodshare_ingest::{IngestError, IngestErrorCode};
use foodshare_model::ClassifyError;
use foodshare_query::{QueryError, QueryErrorCode};
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

#[derive(Parser)]
#[command(name = "foodshare")]
#[command(version, about = "Food donation records and reports")]
#[command(
    after_help = "Environment:\n  FOODSHARE_DB               Store location when --db is absent\n  FOODSHARE_BUSY_TIMEOUT_MS  Lock wait in milliseconds\n  FOODSHARE_FOREIGN_KEYS     Enforce declared foreign keys\n  FOODSHARE_LOG_JSON         Emit logs as JSON\n  RUST_LOG                   Log filter override"
)]
struct Cli {
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long = "log-json", global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub(crate) json: bool,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success.code()),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code.code())
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    logging::init_tracing(cli.verbose, cli.log_json);

    let output_mode = OutputMode { json: cli.json };
    let mut config = StoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    tracing::debug!(db = %config.db_path.display(), "store configured");

    let command = cli.command.ok_or_else(|| CliError {
        exit_code: ExitCode::Usage,
        machine: MachineError::new("usage_error", "missing command; see --help"),
    })?;

    match command {
        Commands::Init => actions::init(&config, output_mode),
        Commands::Inspect => actions::inspect(&config, output_mode),
        Commands::Load {
            table,
            csv,
            replace,
        } => actions::load(&config, table.into(), csv, replace, output_mode),
        Commands::Seed { dir, replace } => actions::seed(&config, &dir, replace, output_mode),
        Commands::Report { command } => match command {
            ReportCommand::List => actions::report_list(output_mode),
            ReportCommand::Run { id, city, explain } => {
                actions::report_run(&config, &id, city.as_deref(), explain, output_mode)
            }
        },
        Commands::Provider { command } => match command {
            ProviderCommand::Create(fields) => actions::provider_create(&config, fields, output_mode),
            ProviderCommand::List => actions::provider_list(&config, output_mode),
            ProviderCommand::Get { id } => actions::provider_get(&config, &id, output_mode),
            ProviderCommand::Update(fields) => actions::provider_update(&config, fields, output_mode),
            ProviderCommand::Delete { id } => actions::provider_delete(&config, &id, output_mode),
        },
        Commands::Classify {
            table,
            provider_type,
            food_name,
            location,
        } => actions::classify(&table, &provider_type, &food_name, &location, output_mode),
    }
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    pub(crate) fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    pub(crate) fn dependency(code: &str, message: String) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new(code, &message),
        }
    }

    pub(crate) fn validation(code: &str, message: String) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new(code, &message),
        }
    }

    #[must_use]
    pub(crate) fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.machine = self.machine.with_detail(key, value);
        self
    }
}

impl From<IngestError> for CliError {
    fn from(err: IngestError) -> Self {
        let code = err.code.as_str();
        match err.code {
            IngestErrorCode::StorageUnavailable | IngestErrorCode::Io => {
                Self::dependency(code, err.message)
            }
            IngestErrorCode::SchemaMismatch | IngestErrorCode::ConstraintViolation => {
                Self::validation(code, err.message)
            }
            _ => Self {
                exit_code: ExitCode::Internal,
                machine: MachineError::new(code, &err.message),
            },
        }
    }
}

impl From<QueryError> for CliError {
    fn from(err: QueryError) -> Self {
        let code = err.code.as_str();
        match err.code {
            QueryErrorCode::StorageUnavailable => Self::dependency(code, err.message),
            QueryErrorCode::ConstraintViolation
            | QueryErrorCode::NotFound
            | QueryErrorCode::Validation => Self::validation(code, err.message),
            _ => Self {
                exit_code: ExitCode::Internal,
                machine: MachineError::new(code, &err.message),
            },
        }
    }
}

impl From<ClassifyError> for CliError {
    fn from(err: ClassifyError) -> Self {
        Self::validation("validation", err.to_string())
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine);
        for (key, value) in &error.machine.details {
            eprintln!("  {key}: {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn error_kinds_map_to_documented_exit_codes() {
        let cases = [
            (QueryErrorCode::StorageUnavailable, ExitCode::DependencyFailure),
            (QueryErrorCode::ConstraintViolation, ExitCode::Validation),
            (QueryErrorCode::NotFound, ExitCode::Validation),
            (QueryErrorCode::Validation, ExitCode::Validation),
            (QueryErrorCode::Sql, ExitCode::Internal),
        ];
        for (code, expected) in cases {
            let err = CliError::from(QueryError::new(code, "x"));
            assert_eq!(err.exit_code, expected, "{code:?}");
            assert_eq!(err.machine.code, code.as_str());
        }
        let cases = [
            (IngestErrorCode::StorageUnavailable, ExitCode::DependencyFailure),
            (IngestErrorCode::Io, ExitCode::DependencyFailure),
            (IngestErrorCode::SchemaMismatch, ExitCode::Validation),
            (IngestErrorCode::ConstraintViolation, ExitCode::Validation),
            (IngestErrorCode::Sql, ExitCode::Internal),
        ];
        for (code, expected) in cases {
            let err = CliError::from(IngestError::new(code, "x"));
            assert_eq!(err.exit_code, expected, "{code:?}");
        }
    }
}
