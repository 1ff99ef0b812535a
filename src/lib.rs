//! bkptlist - Xcode breakpoint lists as an editable document
//!
//! Reads a `.xcbkptlist` file into typed file+line breakpoints, keeps every
//! entry it does not understand as an opaque node, and writes the whole list
//! back with those entries untouched and in place.

pub mod breakpoint;
pub mod cli;
pub mod commands;
pub mod common;
pub mod document;
pub mod xml;

// Re-export commonly used types for tests
pub use breakpoint::{BreakpointAction, BreakpointId, FileBreakpoint, Location, DEFAULT_CREATOR};
pub use common::{Error, Result};
pub use document::{BreakpointDocument, Entry, LoadOptions};
pub use xml::WriteOptions;
