//! Breakpoint-list document
//!
//! The children of the `Breakpoints` container are split into typed file
//! breakpoints and opaque nodes. Opaque nodes are written back untouched and
//! in place; typed breakpoints are regenerated from their fields on every
//! serialize, so edits made through the API show up in the output.

use std::collections::{BTreeSet, HashMap};
use std::time::SystemTime;
use tracing::{debug, trace};

use crate::breakpoint::{BreakpointId, FileBreakpoint, DEFAULT_CREATOR};
use crate::common::{EntryError, Result};
use crate::xml::{self, Element, Node, WriteOptions};

const CONTAINER: &str = "Breakpoints";
const PROXY: &str = "BreakpointProxy";

/// How a document is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// File breakpoints carrying this creator signature are dropped on load,
    /// so a tool can regenerate its own output without duplicating it
    pub ignored_creator: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            ignored_creator: Some(DEFAULT_CREATOR.to_string()),
        }
    }
}

impl LoadOptions {
    /// Keep every entry regardless of who created it
    pub fn keep_all() -> Self {
        Self {
            ignored_creator: None,
        }
    }

    pub fn ignoring(creator: impl Into<String>) -> Self {
        Self {
            ignored_creator: Some(creator.into()),
        }
    }
}

/// One child of the container, in document order
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Known(&'a FileBreakpoint),
    Opaque(&'a Node),
}

#[derive(Debug)]
enum Slot {
    Known(BreakpointId),
    Opaque(Node),
}

/// An editable breakpoint list
///
/// Invariant: every `Slot::Known` id is a key of `known` and appears exactly
/// once in the `by_path` bucket of its file path, and nothing else does.
#[derive(Debug)]
pub struct BreakpointDocument {
    /// Parsed tree with the container's children taken out
    root: Element,
    /// Index of the container in `root.children`
    container: Option<usize>,
    slots: Vec<Slot>,
    known: HashMap<BreakpointId, FileBreakpoint>,
    by_path: HashMap<String, Vec<BreakpointId>>,
    last_modified: Option<SystemTime>,
}

impl Default for BreakpointDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakpointDocument {
    /// An empty breakpoint list, as Xcode writes it for a fresh project
    pub fn new() -> Self {
        let root = Element::new("Bucket")
            .with_attribute("type", "1")
            .with_attribute("version", "2.0")
            .with_child(Element::new(CONTAINER));
        Self::from_root(root, Some(0))
    }

    fn from_root(root: Element, container: Option<usize>) -> Self {
        Self {
            root,
            container,
            slots: Vec::new(),
            known: HashMap::new(),
            by_path: HashMap::new(),
            last_modified: None,
        }
    }

    /// Open a document, dropping breakpoints created under [`DEFAULT_CREATOR`]
    pub fn open(bytes: &[u8]) -> Result<Self> {
        Self::open_with(bytes, &LoadOptions::default())
    }

    /// Open a document with an explicit load policy
    ///
    /// Fails only if `bytes` is not well-formed XML. A root without a
    /// `Breakpoints` child opens as an empty document.
    pub fn open_with(bytes: &[u8], options: &LoadOptions) -> Result<Self> {
        let mut root = xml::parse(bytes)?;
        let container = root.child_position(CONTAINER);

        let children = match container.map(|pos| &mut root.children[pos]) {
            Some(Node::Element(list)) => std::mem::take(&mut list.children),
            _ => {
                debug!(root = %root.name, "no {} container, starting empty", CONTAINER);
                Vec::new()
            }
        };

        let mut doc = Self::from_root(root, container);
        let mut dropped = 0usize;

        for node in children {
            let parsed = match node.as_element() {
                Some(el) if el.name == PROXY => FileBreakpoint::from_element(el),
                _ => {
                    doc.slots.push(Slot::Opaque(node));
                    continue;
                }
            };

            match parsed {
                Ok(bp) if bp.creator.is_some() && bp.creator == options.ignored_creator => {
                    trace!(path = bp.file_path(), line = bp.starting_line, "dropping own breakpoint");
                    dropped += 1;
                }
                Ok(bp) => {
                    doc.add_file_breakpoint(bp);
                }
                Err(EntryError::WrongKind(_)) => doc.slots.push(Slot::Opaque(node)),
                Err(reason) => {
                    debug!(%reason, "keeping unreadable file breakpoint as an opaque entry");
                    doc.slots.push(Slot::Opaque(node));
                }
            }
        }

        debug!(
            known = doc.known.len(),
            opaque = doc.opaque_count(),
            dropped,
            "loaded breakpoint list"
        );
        Ok(doc)
    }

    /// Append a breakpoint; structurally identical ones are kept side by side
    pub fn add_file_breakpoint(&mut self, breakpoint: FileBreakpoint) -> BreakpointId {
        let id = breakpoint.id();
        self.by_path
            .entry(breakpoint.file_path().to_string())
            .or_default()
            .push(id);
        self.slots.push(Slot::Known(id));
        self.known.insert(id, breakpoint);
        id
    }

    /// Remove the breakpoint with this identity
    ///
    /// Returns `None` if it is not part of the document.
    pub fn delete_breakpoint(&mut self, id: BreakpointId) -> Option<FileBreakpoint> {
        let breakpoint = self.known.remove(&id)?;
        self.slots
            .retain(|slot| !matches!(slot, Slot::Known(known) if *known == id));

        if let Some(bucket) = self.by_path.get_mut(breakpoint.file_path()) {
            bucket.retain(|known| *known != id);
            if bucket.is_empty() {
                self.by_path.remove(breakpoint.file_path());
            }
        }
        Some(breakpoint)
    }

    /// Remove every entry, opaque ones included
    pub fn delete_all(&mut self) {
        self.slots.clear();
        self.known.clear();
        self.by_path.clear();
    }

    /// Breakpoints registered for `path`, in the order they were added
    pub fn breakpoints_for_path(&self, path: &str) -> Vec<&FileBreakpoint> {
        self.by_path
            .get(path)
            .map(|ids| ids.iter().filter_map(|id| self.known.get(id)).collect())
            .unwrap_or_default()
    }

    /// Every file path with at least one breakpoint
    pub fn registered_paths(&self) -> BTreeSet<&str> {
        self.by_path.keys().map(String::as_str).collect()
    }

    pub fn breakpoint(&self, id: BreakpointId) -> Option<&FileBreakpoint> {
        self.known.get(&id)
    }

    /// Mutable access to a breakpoint; its file path stays fixed
    pub fn breakpoint_mut(&mut self, id: BreakpointId) -> Option<&mut FileBreakpoint> {
        self.known.get_mut(&id)
    }

    /// All entries in serialization order
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Known(id) => self.known.get(id).map(Entry::Known),
            Slot::Opaque(node) => Some(Entry::Opaque(node)),
        })
    }

    /// Typed breakpoints in serialization order
    pub fn file_breakpoints(&self) -> impl Iterator<Item = &FileBreakpoint> + '_ {
        self.entries().filter_map(|entry| match entry {
            Entry::Known(bp) => Some(bp),
            Entry::Opaque(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn opaque_count(&self) -> usize {
        self.slots.len() - self.known.len()
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    pub fn set_last_modified(&mut self, time: Option<SystemTime>) {
        self.last_modified = time;
    }

    /// Rebuild the full tree: known entries regenerated, opaque ones as read
    pub fn to_element(&self) -> Element {
        let children: Vec<Node> = self
            .entries()
            .map(|entry| match entry {
                Entry::Known(bp) => Node::Element(bp.to_element()),
                Entry::Opaque(node) => node.clone(),
            })
            .collect();

        let mut root = self.root.clone();
        match self.container.map(|pos| &mut root.children[pos]) {
            Some(Node::Element(list)) => list.children = children,
            _ => {
                let mut list = Element::new(CONTAINER);
                list.children = children;
                root.push_child(list);
            }
        }
        root
    }

    /// Serialize with the default indentation
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.serialize_with(&WriteOptions::default())
    }

    pub fn serialize_with(&self, options: &WriteOptions) -> Result<Vec<u8>> {
        trace!(entries = self.len(), indent = options.indent, "serializing breakpoint list");
        xml::serialize(&self.to_element(), options.indent)
    }
}
