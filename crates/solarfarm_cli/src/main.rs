//! Command-line front end for the solar farm inventory.
//!
//! # Responsibility
//! - Map subcommands onto `PanelService` operations.
//! - Translate `PanelResult` outcomes into JSON output and exit codes.
//!
//! Exit codes: `0` success, `1` storage/config failure, `2` invalid input,
//! `3` not found.

use clap::{Args, Parser, Subcommand};
use log::error;
use serde::Serialize;
use solarfarm_core::{
    default_log_level, init_logging, Material, PanelId, PanelResult, PanelService, ResultKind,
    SolarPanel, StorageBackend, StorageConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "solarfarm", version, about = "Manage solar panel installations")]
struct Cli {
    /// Storage backend (`file` or `sqlite`); overrides SOLARFARM_STORAGE.
    #[arg(long, global = true, value_parser = parse_backend)]
    storage: Option<StorageBackend>,

    /// Data file path; overrides SOLARFARM_DATA_PATH.
    #[arg(long, global = true)]
    data_path: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List panels, optionally limited to one section.
    List {
        #[arg(long)]
        section: Option<String>,
    },
    /// Show one panel.
    Get { id: PanelId },
    /// Add a panel.
    Create(PanelArgs),
    /// Replace every field of an existing panel.
    Update {
        id: PanelId,
        #[command(flatten)]
        fields: PanelArgs,
    },
    /// Remove a panel.
    Delete { id: PanelId },
}

#[derive(Debug, Args)]
struct PanelArgs {
    #[arg(long)]
    section: Option<String>,
    #[arg(long)]
    row: i32,
    #[arg(long)]
    column: i32,
    #[arg(long = "year")]
    year_installed: i32,
    /// One of POLY_SI, MONO_SI, A_SI, CD_TE, CIGS.
    #[arg(long)]
    material: Option<Material>,
    #[arg(long)]
    tracking: bool,
}

impl PanelArgs {
    fn into_panel(self, id: PanelId) -> SolarPanel {
        SolarPanel {
            id,
            section: self.section,
            row: self.row,
            column: self.column,
            year_installed: self.year_installed,
            material: self.material,
            tracking: self.tracking,
        }
    }
}

#[derive(Debug, Serialize)]
struct NotFound {
    error: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("solarfarm: {err}");
            return ExitCode::from(1);
        }
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("solarfarm: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = StorageConfig::resolve(cli.storage, cli.data_path)?;
    let service = PanelService::new(config.open_repository()?);

    let code = match cli.command {
        Command::List { section } => {
            let panels = match section {
                Some(section) => service.find_by_section(&section)?,
                None => service.find_all()?,
            };
            print_json(&panels)?;
            ExitCode::SUCCESS
        }
        Command::Get { id } => match service.find_by_id(id)? {
            Some(panel) => {
                print_json(&panel)?;
                ExitCode::SUCCESS
            }
            None => {
                print_json(&NotFound {
                    error: format!("SolarPanel id {id} was not found."),
                })?;
                ExitCode::from(3)
            }
        },
        Command::Create(fields) => report(service.create(Some(fields.into_panel(0)))?)?,
        Command::Update { id, fields } => report(service.update(Some(fields.into_panel(id)))?)?,
        Command::Delete { id } => report(service.delete_by_id(id)?)?,
    };
    Ok(code)
}

fn parse_backend(value: &str) -> Result<StorageBackend, String> {
    value.parse::<StorageBackend>().map_err(|err| err.to_string())
}

fn report(result: PanelResult) -> Result<ExitCode, serde_json::Error> {
    print_json(&result)?;
    Ok(match result.kind() {
        None => ExitCode::SUCCESS,
        Some(ResultKind::Invalid) => ExitCode::from(2),
        Some(ResultKind::NotFound) => ExitCode::from(3),
    })
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
