//! Actions attached to a breakpoint

use super::DEBUGGER_COMMAND_EXTENSION;
use crate::xml::Element;

/// One entry of a breakpoint's `Actions` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakpointAction {
    /// Run a command in the debugger console when the breakpoint is hit
    DebuggerCommand { command: String },
    /// Any other action kind, re-emitted exactly as it was read
    Opaque(Element),
}

impl BreakpointAction {
    pub fn debugger_command(command: impl Into<String>) -> Self {
        Self::DebuggerCommand {
            command: command.into(),
        }
    }

    /// Read a `BreakpointActionProxy` node
    ///
    /// Kinds we do not model come back as [`BreakpointAction::Opaque`].
    pub fn from_element(element: &Element) -> Self {
        if element.name == "BreakpointActionProxy"
            && element.attribute("ActionExtensionID") == Some(DEBUGGER_COMMAND_EXTENSION)
        {
            let command = element
                .child("ActionContent")
                .and_then(|content| content.attribute("consoleCommand"))
                .unwrap_or_default();
            return Self::debugger_command(command);
        }
        Self::Opaque(element.clone())
    }

    pub fn extension_id(&self) -> Option<&str> {
        match self {
            Self::DebuggerCommand { .. } => Some(DEBUGGER_COMMAND_EXTENSION),
            Self::Opaque(element) => element.attribute("ActionExtensionID"),
        }
    }

    pub fn to_element(&self) -> Element {
        match self {
            Self::DebuggerCommand { command } => Element::new("BreakpointActionProxy")
                .with_attribute("ActionExtensionID", DEBUGGER_COMMAND_EXTENSION)
                .with_child(Element::new("ActionContent").with_attribute("consoleCommand", command)),
            Self::Opaque(element) => element.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sound_action() -> Element {
        Element::new("BreakpointActionProxy")
            .with_attribute("ActionExtensionID", "Xcode.BreakpointAction.Sound")
            .with_child(Element::new("ActionContent").with_attribute("soundName", "Basso"))
    }

    #[test]
    fn test_debugger_command_to_element() {
        let el = BreakpointAction::debugger_command("po self").to_element();
        assert_eq!(el.name, "BreakpointActionProxy");
        assert_eq!(
            el.attribute("ActionExtensionID"),
            Some("Xcode.BreakpointAction.DebuggerCommand")
        );
        let content = el.child("ActionContent").unwrap();
        assert_eq!(content.attribute("consoleCommand"), Some("po self"));
    }

    #[test]
    fn test_debugger_command_from_element() {
        let el = BreakpointAction::debugger_command("bt").to_element();
        assert_eq!(
            BreakpointAction::from_element(&el),
            BreakpointAction::debugger_command("bt")
        );
    }

    #[test]
    fn test_missing_content_reads_empty_command() {
        let el = Element::new("BreakpointActionProxy")
            .with_attribute("ActionExtensionID", DEBUGGER_COMMAND_EXTENSION);
        assert_eq!(
            BreakpointAction::from_element(&el),
            BreakpointAction::debugger_command("")
        );
    }

    #[test]
    fn test_unknown_kind_is_kept_verbatim() {
        let el = sound_action();
        let action = BreakpointAction::from_element(&el);

        assert!(matches!(action, BreakpointAction::Opaque(_)));
        assert_eq!(action.extension_id(), Some("Xcode.BreakpointAction.Sound"));
        assert_eq!(action.to_element(), el);
    }
}
