//! File+line breakpoints

use super::{flag, parse_flag, parse_number, BreakpointAction, BreakpointId};
use super::FILE_BREAKPOINT_EXTENSION;
use crate::common::EntryError;
use crate::xml::Element;

/// A breakpoint bound to a source file and line
///
/// Not `Clone`: a copy would share the identity of the original. Compare
/// breakpoints through [`FileBreakpoint::id`].
#[derive(Debug)]
pub struct FileBreakpoint {
    id: BreakpointId,
    file_path: String,
    /// Also written as the ending line
    pub starting_line: u64,
    pub enabled: bool,
    pub ignore_count: u32,
    pub continue_after_actions: bool,
    /// Which tool or run produced this entry
    pub creator: Option<String>,
    pub actions: Vec<BreakpointAction>,
}

impl FileBreakpoint {
    pub fn new(file_path: impl Into<String>, line: u64) -> Self {
        Self {
            id: BreakpointId::next(),
            file_path: file_path.into(),
            starting_line: line,
            enabled: true,
            ignore_count: 0,
            continue_after_actions: false,
            creator: None,
            actions: Vec::new(),
        }
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_action(mut self, action: BreakpointAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn id(&self) -> BreakpointId {
        self.id
    }

    /// Fixed for the lifetime of the breakpoint, the document indexes by it
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Read a `BreakpointProxy` node
    ///
    /// Fails if the proxy is not a file breakpoint, or if `filePath` or a
    /// numeric `startingLineNumber` is missing. Optional fields that are
    /// present but unreadable fail too, so nothing is silently rewritten.
    pub fn from_element(element: &Element) -> Result<Self, EntryError> {
        let kind = element.attribute("BreakpointExtensionID").unwrap_or_default();
        if kind != FILE_BREAKPOINT_EXTENSION {
            return Err(EntryError::WrongKind(kind.to_string()));
        }

        let content = element
            .child("BreakpointContent")
            .ok_or(EntryError::MissingContent("BreakpointContent"))?;

        let file_path = content
            .attribute("filePath")
            .ok_or(EntryError::MissingAttribute("filePath"))?;
        let starting_line = content
            .attribute("startingLineNumber")
            .ok_or(EntryError::MissingAttribute("startingLineNumber"))
            .and_then(|v| parse_number("startingLineNumber", v))?;

        let enabled = parse_flag("shouldBeEnabled", content.attribute("shouldBeEnabled"), true)?;
        let continue_after_actions = parse_flag(
            "continueAfterRunningActions",
            content.attribute("continueAfterRunningActions"),
            false,
        )?;
        let ignore_count = content
            .attribute("ignoreCount")
            .map(|v| parse_number("ignoreCount", v))
            .transpose()?
            .unwrap_or(0);

        let actions = content
            .child("Actions")
            .map(|list| {
                list.child_elements()
                    .map(BreakpointAction::from_element)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: BreakpointId::next(),
            file_path: file_path.to_string(),
            starting_line,
            enabled,
            ignore_count,
            continue_after_actions,
            creator: content.attribute("creator").map(str::to_string),
            actions,
        })
    }

    /// Regenerate the `BreakpointProxy` node from the typed fields
    pub fn to_element(&self) -> Element {
        let mut content = Element::new("BreakpointContent")
            .with_attribute("shouldBeEnabled", flag(self.enabled))
            .with_attribute("ignoreCount", self.ignore_count)
            .with_attribute("continueAfterRunningActions", flag(self.continue_after_actions))
            .with_attribute("filePath", &self.file_path)
            .with_attribute("startingLineNumber", self.starting_line)
            .with_attribute("endingLineNumber", self.starting_line);
        if let Some(creator) = &self.creator {
            content.set_attribute("creator", creator);
        }

        let mut actions = Element::new("Actions");
        for action in &self.actions {
            actions.push_child(action.to_element());
        }
        content.push_child(actions);

        Element::new("BreakpointProxy")
            .with_attribute("BreakpointExtensionID", FILE_BREAKPOINT_EXTENSION)
            .with_child(content)
    }
}

impl std::fmt::Display for FileBreakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Breakpoint at {}, line {}", self.file_path, self.starting_line)
    }
}
