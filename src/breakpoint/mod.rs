//! Typed breakpoint model
//!
//! Only file+line breakpoints and debugger-command actions are typed. Every
//! other kind stays an opaque XML node so it survives a rewrite untouched.

pub mod action;
pub mod file;

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::{EntryError, Error, Result};

pub use action::BreakpointAction;
pub use file::FileBreakpoint;

/// Extension identifier of a file+line breakpoint proxy
pub const FILE_BREAKPOINT_EXTENSION: &str = "Xcode.Breakpoint.FileBreakpoint";

/// Extension identifier of the debugger-command action
pub const DEBUGGER_COMMAND_EXTENSION: &str = "Xcode.BreakpointAction.DebuggerCommand";

/// Creator signature this tool uses when none is configured
pub const DEFAULT_CREATOR: &str = "bkptlist";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one breakpoint instance
///
/// Two breakpoints with identical fields still have different ids; deletion
/// and lookup go through this, never through field equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BreakpointId(u64);

impl BreakpointId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Encode a flag the way Xcode expects it
pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub(crate) fn parse_flag(
    attribute: &'static str,
    value: Option<&str>,
    default: bool,
) -> std::result::Result<bool, EntryError> {
    match value {
        None => Ok(default),
        Some("Yes") => Ok(true),
        Some("No") => Ok(false),
        Some(other) => Err(EntryError::InvalidFlag {
            attribute,
            value: other.to_string(),
        }),
    }
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    attribute: &'static str,
    value: &str,
) -> std::result::Result<T, EntryError> {
    value.trim().parse().map_err(|_| EntryError::InvalidNumber {
        attribute,
        value: value.to_string(),
    })
}

/// A `file:line` location given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u64,
}

impl Location {
    /// Parse a location string like "Sources/App/main.swift:42"
    pub fn parse(s: &str) -> Result<Self> {
        // Split on the last ':' so Windows paths like "C:\src\main.swift:10" work
        let (file, line) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidLocation(s.to_string()))?;

        if file.is_empty() || line.is_empty() || !line.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidLocation(s.to_string()));
        }
        let line = line
            .parse()
            .map_err(|_| Error::InvalidLocation(s.to_string()))?;

        Ok(Self {
            file: file.to_string(),
            line,
        })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
