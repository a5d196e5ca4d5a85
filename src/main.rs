//! Marktoggle - toggle inline markdown markup from the command line.
//!
//! # Usage
//!
//! ```bash
//! marktoggle toggle notes.md --line 3 --col 5 --command mark-bold
//! marktoggle toggle notes.md --line 3 --col 1 --to 3:12
//! marktoggle tags add '<<|>>' --category Arrows
//! marktoggle commands
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use marktoggle::commands::{CommandOutcome, CommandTable, Notice, QUICK_MARK_ID};
use marktoggle::config::{
    global_settings_path, is_valid_custom_tag, load_settings, load_settings_or_default,
    save_settings,
};
use marktoggle::editor::{Cursor, EditorBuffer};
use marktoggle::markers::MarkerType;

/// Toggle inline markdown markup around a selection or the cursor line
#[derive(Parser, Debug)]
#[command(name = "marktoggle", version, about, long_about = None)]
struct Cli {
    /// Settings file to use instead of the per-user default
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Toggle markup in a file at the given position or selection
    Toggle {
        /// Markdown file to edit
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Cursor line (1-based)
        #[arg(long, default_value_t = 1)]
        line: usize,

        /// Cursor column (1-based, in bytes)
        #[arg(long, default_value_t = 1)]
        col: usize,

        /// Select from LINE/COL up to this position
        #[arg(long, value_name = "LINE:COL", value_parser = parse_position)]
        to: Option<Cursor>,

        /// Command id to run (see `marktoggle commands`)
        #[arg(long, default_value = QUICK_MARK_ID)]
        command: String,

        /// Print the edited text instead of writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// List available commands
    Commands,

    /// Manage custom tags
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },

    /// Set the marker used by quick mark
    DefaultMarker {
        #[arg(value_enum)]
        marker: MarkerType,
    },
}

#[derive(Subcommand, Debug)]
enum TagsAction {
    /// List custom tags grouped by category
    List,

    /// Add a custom tag in the form prefix|postfix
    Add {
        tag: String,

        /// Category used to group and name the command
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Remove the custom tag with the given index
    Remove { index: usize },
}

/// Parse a 1-based `LINE:COL` pair into a 0-based cursor.
fn parse_position(s: &str) -> Result<Cursor, String> {
    let (line, col) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got {s:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid number {part:?}: {e}"))
    };
    Ok(Cursor::at(
        parse(line)?.saturating_sub(1),
        parse(col)?.saturating_sub(1),
    ))
}

fn report(notice: &Notice) {
    eprintln!("{notice}");
}

fn run_toggle(
    settings_path: &Path,
    file: &Path,
    cursor: Cursor,
    to: Option<Cursor>,
    command: &str,
    dry_run: bool,
) -> Result<ExitCode> {
    let (settings, notice) = load_settings_or_default(settings_path);
    if let Some(notice) = notice {
        report(&notice);
    }
    let table = CommandTable::from_settings(&settings);

    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut buffer = EditorBuffer::from_text(&content);
    match to {
        Some(head) => buffer.select(cursor, head),
        None => buffer.move_to(cursor.line, cursor.col),
    }

    match table.dispatch(command, &mut buffer) {
        CommandOutcome::Applied(_) => {
            let cursor = buffer.cursor();
            let position = format!("{}:{}", cursor.line + 1, cursor.col + 1);
            if dry_run {
                print!("{}", buffer.text());
                eprintln!("{position}");
            } else {
                if buffer.is_dirty() {
                    fs::write(file, buffer.text())
                        .with_context(|| format!("Failed to write {}", file.display()))?;
                }
                println!("{position}");
            }
            Ok(ExitCode::SUCCESS)
        }
        CommandOutcome::Failed(notice) => {
            report(&notice);
            Ok(ExitCode::FAILURE)
        }
        CommandOutcome::Unknown => {
            anyhow::bail!("Unknown command: {command} (see `marktoggle commands`)")
        }
    }
}

fn run_tags(settings_path: &Path, action: TagsAction) -> Result<()> {
    let mut settings = load_settings(settings_path)?;
    match action {
        TagsAction::List => {
            for (category, tags) in settings.custom_tags_by_category() {
                println!("{category}");
                for (index, spec) in tags {
                    let marker = if is_valid_custom_tag(&spec.tag) {
                        ""
                    } else {
                        " (invalid)"
                    };
                    println!("  {index}\t{}{marker}", spec.tag);
                }
            }
        }
        TagsAction::Add { tag, category } => {
            settings.add_custom_tag(&tag, &category)?;
            save_settings(settings_path, &settings)?;
            report(&Notice::info(format!("Added custom tag {}", tag.trim())));
        }
        TagsAction::Remove { index } => {
            let removed = settings.remove_custom_tag(index)?;
            save_settings(settings_path, &settings)?;
            report(&Notice::info(format!("Removed custom tag {}", removed.tag)));
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let settings_path = cli.settings.unwrap_or_else(global_settings_path);

    match cli.command {
        CliCommand::Toggle {
            file,
            line,
            col,
            to,
            command,
            dry_run,
        } => {
            if !file.exists() {
                anyhow::bail!("File not found: {}", file.display());
            }
            let cursor = Cursor::at(line.saturating_sub(1), col.saturating_sub(1));
            run_toggle(&settings_path, &file, cursor, to, &command, dry_run)
        }
        CliCommand::Commands => {
            let (settings, notice) = load_settings_or_default(&settings_path);
            if let Some(notice) = notice {
                report(&notice);
            }
            for command in CommandTable::from_settings(&settings).iter() {
                println!("{}\t{}", command.id, command.name);
            }
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Tags { action } => {
            run_tags(&settings_path, action)?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::DefaultMarker { marker } => {
            let mut settings = load_settings(&settings_path)?;
            settings.default_marker = marker;
            save_settings(&settings_path, &settings)?;
            report(&Notice::info(format!(
                "Quick mark now uses {}",
                marker.display_name()
            )));
            Ok(ExitCode::SUCCESS)
        }
    }
}
