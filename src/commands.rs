//! CLI command definitions
//!
//! Defines the clap commands for the bkptlist CLI. Every command takes the
//! breakpoint-list file first, e.g.
//! `MyApp.xcodeproj/xcuserdata/me.xcuserdatad/xcdebugger/Breakpoints_v2.xcbkptlist`.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// List file breakpoints
    #[command(alias = "ls")]
    List {
        /// Breakpoint-list file
        file: PathBuf,

        /// Only show breakpoints in this source file
        #[arg(long)]
        path: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List source files that have breakpoints
    Paths {
        /// Breakpoint-list file
        file: PathBuf,
    },

    /// Add a breakpoint (creates the file if needed)
    #[command(alias = "b")]
    Add {
        /// Breakpoint-list file
        file: PathBuf,

        /// Location: file:line
        location: String,

        /// Debugger command to run when hit; can be given multiple times
        #[arg(long = "command", short = 'c')]
        commands: Vec<String>,

        /// Add the breakpoint disabled
        #[arg(long)]
        disabled: bool,

        /// Number of hits to ignore before stopping
        #[arg(long, default_value = "0")]
        ignore_count: u32,

        /// Keep running after the actions have run
        #[arg(long)]
        continue_after_actions: bool,
    },

    /// Remove every breakpoint at a location
    #[command(alias = "rm")]
    Remove {
        /// Breakpoint-list file
        file: PathBuf,

        /// Location: file:line
        location: String,
    },

    /// Remove all entries, including ones this tool does not understand
    Clear {
        /// Breakpoint-list file
        file: PathBuf,
    },

    /// Drop the breakpoints this tool created earlier and add a fresh set
    Regenerate {
        /// Breakpoint-list file
        file: PathBuf,

        /// Locations: file:line
        locations: Vec<String>,
    },
}
