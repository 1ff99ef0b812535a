//! XML adapter
//!
//! A small attributed node tree on top of quick-xml: bytes in, tree out, and
//! back. Attribute order is preserved by this adapter, but callers should not
//! rely on it for anything beyond cosmetic stability.

pub mod codec;
pub mod tree;

pub use codec::{parse, serialize};
pub use tree::{Element, Node};

/// Indentation used by Xcode when it writes breakpoint lists
pub const DEFAULT_INDENT: usize = 3;

/// Options for writing a document back to bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}
