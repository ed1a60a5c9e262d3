use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use topsheet::audit::AuditLogger;
use topsheet::cli::{
    handle_changes_command, handle_commit_command, handle_edit_command, handle_export_command,
    handle_fee_command, handle_history_command, handle_import_command, handle_sheet_command,
    EditCommands, ExportFormat, FeeCommands, SheetCommands,
};
use topsheet::config::{paths::TopsheetPaths, settings::Settings};
use topsheet::storage::Storage;

#[derive(Parser)]
#[command(
    name = "topsheet",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based production budget top sheet calculator",
    long_about = "Topsheet keeps the top sheet of a production budget reconciled \
                  while you work it: edit any category by amount or percentage and \
                  every sibling, fee, and the contingency line recalculate so the \
                  grand total still lands on the target."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sheet management commands
    #[command(subcommand)]
    Sheet(SheetCommands),

    /// Category edit and lock commands
    #[command(subcommand)]
    Edit(EditCommands),

    /// Fee rule commands
    #[command(subcommand)]
    Fee(FeeCommands),

    /// Commit the current amounts as the new change baseline
    Commit {
        /// Sheet name
        sheet: String,
    },

    /// Show changes since the last commit
    Changes {
        /// Sheet name
        sheet: String,
    },

    /// Import a sheet from a CSV file
    Import {
        /// Path to CSV file (Group,Category,Amount,Percentage)
        file: PathBuf,
        /// Name for the imported sheet
        #[arg(short, long)]
        name: String,
        /// Target total; omit to float on the grand subtotal
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Export a sheet to a file
    Export {
        /// Sheet name
        sheet: String,
        /// Output file path
        output: PathBuf,
        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Pretty-print JSON output (also set by config)
        #[arg(long)]
        pretty: bool,
    },

    /// Show recent audit history
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only show entries for one sheet
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TopsheetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage and the audit log
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    let audit = AuditLogger::new(paths.audit_log());

    match cli.command {
        Some(Commands::Sheet(cmd)) => {
            handle_sheet_command(&storage, &audit, cmd)?;
        }
        Some(Commands::Edit(cmd)) => {
            handle_edit_command(&storage, &audit, cmd)?;
        }
        Some(Commands::Fee(cmd)) => {
            handle_fee_command(&storage, &audit, cmd)?;
        }
        Some(Commands::Commit { sheet }) => {
            handle_commit_command(&storage, &audit, &sheet)?;
        }
        Some(Commands::Changes { sheet }) => {
            handle_changes_command(&storage, &sheet)?;
        }
        Some(Commands::Import { file, name, target }) => {
            handle_import_command(&storage, &audit, &file, &name, target.as_deref())?;
        }
        Some(Commands::Export {
            sheet,
            output,
            format,
            pretty,
        }) => {
            handle_export_command(&storage, &settings, &sheet, &output, format, pretty)?;
        }
        Some(Commands::History { limit, sheet }) => {
            handle_history_command(&audit, limit, sheet.as_deref())?;
        }
        Some(Commands::Config) => {
            println!("Topsheet Configuration");
            println!("======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Pretty export: {}", settings.pretty_export);
        }
        None => {
            println!("Topsheet - Production budget top sheet calculator");
            println!();
            println!("Run 'topsheet --help' for usage information.");
            println!("Run 'topsheet import <file> --name <sheet>' to load a budget from CSV.");
        }
    }

    Ok(())
}
