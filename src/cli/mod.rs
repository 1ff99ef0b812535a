//! CLI command handling
//!
//! Dispatches CLI commands against a breakpoint-list file and formats output.

mod file;

pub use file::{load, save};

use colored::Colorize;
use serde::Serialize;

use crate::breakpoint::{BreakpointAction, BreakpointId, FileBreakpoint, Location};
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::document::{BreakpointDocument, LoadOptions};
use crate::xml::WriteOptions;

/// Breakpoint information as printed by `list --json`
#[derive(Debug, Serialize)]
pub struct BreakpointInfo {
    pub id: BreakpointId,
    pub file: String,
    pub line: u64,
    pub enabled: bool,
    pub ignore_count: u32,
    pub continue_after_actions: bool,
    pub creator: Option<String>,
    pub commands: Vec<String>,
    /// Actions of kinds this tool does not model
    pub other_actions: usize,
}

impl From<&FileBreakpoint> for BreakpointInfo {
    fn from(bp: &FileBreakpoint) -> Self {
        let commands: Vec<String> = bp
            .actions
            .iter()
            .filter_map(|action| match action {
                BreakpointAction::DebuggerCommand { command } => Some(command.clone()),
                BreakpointAction::Opaque(_) => None,
            })
            .collect();

        Self {
            id: bp.id(),
            file: bp.file_path().to_string(),
            line: bp.starting_line,
            enabled: bp.enabled,
            ignore_count: bp.ignore_count,
            continue_after_actions: bp.continue_after_actions,
            creator: bp.creator.clone(),
            other_actions: bp.actions.len() - commands.len(),
            commands,
        }
    }
}

/// `list --json` output
#[derive(Debug, Serialize)]
pub struct ListResult {
    pub breakpoints: Vec<BreakpointInfo>,
    /// Entries kept verbatim because they are not file breakpoints
    pub opaque_entries: usize,
}

/// Dispatch a CLI command
pub fn dispatch(command: Commands, config: &Config) -> Result<()> {
    let write_options = WriteOptions {
        indent: config.output.indent,
    };

    match command {
        Commands::List { file, path, json } => {
            let doc = load(&file, &LoadOptions::keep_all())?;

            let breakpoints: Vec<&FileBreakpoint> = match &path {
                Some(path) => doc.breakpoints_for_path(path),
                None => doc.file_breakpoints().collect(),
            };

            if json {
                let result = ListResult {
                    breakpoints: breakpoints.into_iter().map(BreakpointInfo::from).collect(),
                    opaque_entries: doc.opaque_count(),
                };
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            if breakpoints.is_empty() {
                println!("No file breakpoints");
            } else {
                println!("Breakpoints:");
                for bp in breakpoints {
                    print_breakpoint(&BreakpointInfo::from(bp));
                }
            }
            if doc.opaque_count() > 0 {
                println!(
                    "{}",
                    format!("{} other entries kept as-is", doc.opaque_count()).dimmed()
                );
            }

            Ok(())
        }

        Commands::Paths { file } => {
            let doc = load(&file, &LoadOptions::keep_all())?;
            for path in doc.registered_paths() {
                println!("{}", path);
            }
            Ok(())
        }

        Commands::Add {
            file,
            location,
            commands,
            disabled,
            ignore_count,
            continue_after_actions,
        } => {
            let loc = Location::parse(&location)?;
            let mut doc = load(&file, &LoadOptions::keep_all())?;

            let mut bp = FileBreakpoint::new(loc.file, loc.line)
                .with_creator(config.creator.signature.as_str());
            bp.enabled = !disabled;
            bp.ignore_count = ignore_count;
            bp.continue_after_actions = continue_after_actions;
            bp.actions = commands
                .into_iter()
                .map(BreakpointAction::debugger_command)
                .collect();

            let info = BreakpointInfo::from(&bp);
            doc.add_file_breakpoint(bp);
            save(&file, &doc, &write_options)?;

            println!("Breakpoint added at {}:{}", info.file, info.line);
            Ok(())
        }

        Commands::Remove { file, location } => {
            let loc = Location::parse(&location)?;
            let mut doc = load(&file, &LoadOptions::keep_all())?;

            let ids: Vec<BreakpointId> = doc
                .breakpoints_for_path(&loc.file)
                .into_iter()
                .filter(|bp| bp.starting_line == loc.line)
                .map(FileBreakpoint::id)
                .collect();
            if ids.is_empty() {
                return Err(Error::NoBreakpointsAt {
                    file: loc.file,
                    line: loc.line,
                });
            }

            for id in &ids {
                doc.delete_breakpoint(*id);
            }
            save(&file, &doc, &write_options)?;

            println!("Removed {} breakpoint(s) at {}", ids.len(), loc);
            Ok(())
        }

        Commands::Clear { file } => {
            let mut doc = load(&file, &LoadOptions::keep_all())?;
            let removed = doc.len();
            doc.delete_all();
            save(&file, &doc, &write_options)?;

            println!("Removed {} entries", removed);
            Ok(())
        }

        Commands::Regenerate { file, locations } => {
            let locations = locations
                .iter()
                .map(|s| Location::parse(s))
                .collect::<Result<Vec<_>>>()?;

            let signature = config.creator.signature.as_str();
            let mut doc = load(&file, &LoadOptions::ignoring(signature))?;
            for loc in &locations {
                doc.add_file_breakpoint(
                    FileBreakpoint::new(loc.file.as_str(), loc.line).with_creator(signature),
                );
            }
            save(&file, &doc, &write_options)?;

            println!(
                "Regenerated {} breakpoint(s) signed '{}'",
                locations.len(),
                signature
            );
            Ok(())
        }
    }
}

fn print_breakpoint(info: &BreakpointInfo) {
    let status = if info.enabled { "✓".green() } else { "○".dimmed() };
    let location = format!("{}:{}", info.file, info.line);

    let extras = [
        (info.ignore_count > 0).then(|| format!("ignore: {}", info.ignore_count)),
        info.continue_after_actions.then(|| "continue".to_string()),
        (!info.commands.is_empty()).then(|| format!("run: {}", info.commands.join("; "))),
        (info.other_actions > 0).then(|| format!("+{} other actions", info.other_actions)),
        info.creator.as_ref().map(|c| format!("by {}", c)),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");

    if extras.is_empty() {
        println!("  {} {}", status, location);
    } else {
        println!("  {} {} ({})", status, location, extras);
    }
}
