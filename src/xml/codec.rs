//! XML byte codec
//!
//! Parsing turns quick-xml events into an [`Element`] tree. Whitespace-only
//! text is layout, not content, and is dropped; serialization re-indents.
//! Processing instructions inside the root element are kept. The prolog
//! (declaration, doctype and any PI before the root) is not, and a fresh
//! declaration is written on output.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::tree::{Element, Node};
use crate::common::{Error, Result};

/// Parse a byte buffer into its root element
pub fn parse(bytes: &[u8]) -> Result<Element> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::malformed(format!("not valid UTF-8: {}", e)))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(start_element(e)?);
            }
            Ok(Event::End(_)) => {
                let completed = stack
                    .pop()
                    .ok_or_else(|| Error::malformed("unexpected closing tag"))?;
                attach(&mut stack, &mut root, completed)?;
            }
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::malformed(format!("text error: {}", err)))?;
                if text.chars().all(char::is_whitespace) {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.push_child(Node::Text(text.into_owned())),
                    None => return Err(Error::malformed("text outside of the root element")),
                }
            }
            Ok(Event::CData(ref e)) => {
                let text = std::str::from_utf8(&e[..])
                    .map_err(|err| Error::malformed(format!("CDATA error: {}", err)))?;
                if let Some(parent) = stack.last_mut() {
                    parent.push_child(Node::CData(text.to_string()));
                }
            }
            Ok(Event::Comment(ref e)) => {
                let text = std::str::from_utf8(&e[..])
                    .map_err(|err| Error::malformed(format!("comment error: {}", err)))?;
                if let Some(parent) = stack.last_mut() {
                    parent.push_child(Node::Comment(text.to_string()));
                }
            }
            Ok(Event::PI(ref e)) => {
                let content = std::str::from_utf8(&e[..])
                    .map_err(|err| Error::malformed(format!("processing instruction error: {}", err)))?;
                if let Some(parent) = stack.last_mut() {
                    parent.push_child(Node::ProcessingInstruction(content.to_string()));
                }
            }
            Ok(Event::Eof) => {
                if !stack.is_empty() {
                    let unclosed: Vec<&str> = stack.iter().map(|el| el.name.as_str()).collect();
                    return Err(Error::malformed(format!(
                        "unclosed element(s): <{}>",
                        unclosed.join(">, <")
                    )));
                }
                break;
            }
            // Declaration and doctype are rewritten on output
            Ok(_) => {}
            Err(e) => {
                return Err(Error::malformed(format!(
                    "parse error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    root.ok_or_else(|| Error::malformed("no root element found"))
}

fn start_element(e: &BytesStart) -> Result<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| Error::malformed(format!("invalid element name: {}", err)))?
        .to_string();

    let mut element = Element::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::malformed(format!("attribute error: {}", err)))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| Error::malformed(format!("attribute key error: {}", err)))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::malformed(format!("attribute value error: {}", err)))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::malformed(format!(
            "more than one root element (second is <{}>)",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

/// Serialize a root element into a pretty-printed document
pub fn serialize(root: &Element, indent: usize) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::XmlWrite(e.to_string()))?;
    write_element(&mut writer, root)?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        let value = escape_attribute(value);
        start.push_attribute(Attribute::from((key.as_bytes(), value.as_bytes())));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::XmlWrite(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::XmlWrite(e.to_string()))?;

    for child in &element.children {
        let event = match child {
            Node::Element(el) => {
                write_element(writer, el)?;
                continue;
            }
            Node::Text(t) => Event::Text(BytesText::new(t)),
            Node::CData(c) => Event::CData(BytesCData::new(c.as_str())),
            Node::Comment(c) => Event::Comment(BytesText::from_escaped(c.as_str())),
            Node::ProcessingInstruction(pi) => Event::PI(BytesPI::new(pi.as_str())),
        };
        writer
            .write_event(event)
            .map_err(|e| Error::XmlWrite(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| Error::XmlWrite(e.to_string()))
}

/// Escape an attribute value for a double-quoted attribute
///
/// Tabs and line breaks become character references. Written raw, a reader
/// would normalize them to spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(&['&', '<', '>', '"', '\n', '\r', '\t'][..]) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes_with_spaces_around_equals() {
        let root = parse(b"<?xml version=\"1.0\"?>\n<Bucket\n   type = \"1\"\n   version = \"2.0\">\n</Bucket>").unwrap();
        assert_eq!(root.name, "Bucket");
        assert_eq!(root.attribute("type"), Some("1"));
        assert_eq!(root.attribute("version"), Some("2.0"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_parse_keeps_comments_and_cdata() {
        let root = parse(b"<a><!-- note --><b><![CDATA[x < y]]></b>text &amp; more</a>").unwrap();
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0], Node::Comment(" note ".to_string()));
        assert_eq!(
            root.child("b").unwrap().children[0],
            Node::CData("x < y".to_string())
        );
        assert_eq!(root.children[2], Node::Text("text & more".to_string()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let inputs: [&[u8]; 7] = [
            b"this is not xml",
            b"",
            b"<a><b></a>",
            b"<a>",
            b"<a/><b/>",
            b"junk<a/>",
            &[0xff, 0xfe, 0x00],
        ];
        for input in inputs {
            let err = parse(input).unwrap_err();
            assert!(
                matches!(err, Error::MalformedDocument(_)),
                "expected malformed for {:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_parse_strips_bom() {
        let root = parse("\u{feff}<a/>".as_bytes()).unwrap();
        assert_eq!(root.name, "a");
    }

    #[test]
    fn test_serialize_escapes_and_indents() {
        let root = Element::new("Bucket").with_child(
            Element::new("Breakpoints")
                .with_child(Element::new("Entry").with_attribute("cmd", "p \"a\" < b & c")),
        );
        let out = String::from_utf8(serialize(&root, 3).unwrap()).unwrap();

        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("\n   <Breakpoints>"));
        assert!(out.contains("\n      <Entry cmd=\"p &quot;a&quot; &lt; b &amp; c\"/>"));
        assert!(out.ends_with("</Bucket>\n"));

        let reparsed = parse(out.as_bytes()).unwrap();
        assert_eq!(reparsed, root);
    }

    #[test]
    fn test_serialize_escapes_line_breaks_and_tabs_in_attributes() {
        let root = Element::new("BreakpointContent")
            .with_attribute("condition", "a == 1\n&& b\tc")
            .with_attribute("consoleCommand", "line one\r\nline two");
        let out = String::from_utf8(serialize(&root, 3).unwrap()).unwrap();

        assert!(out.contains("condition=\"a == 1&#10;&amp;&amp; b&#9;c\""), "{}", out);
        assert!(out.contains("consoleCommand=\"line one&#13;&#10;line two\""), "{}", out);
        assert!(!out.contains('\t'));
        assert_eq!(out.matches('\n').count(), 2);
    }

    #[test]
    fn test_parse_decodes_character_references_in_attributes() {
        let root = parse(b"<a condition = \"a == 1&#10;&amp;&amp; b&#9;c\"/>").unwrap();
        assert_eq!(root.attribute("condition"), Some("a == 1\n&& b\tc"));

        let out = String::from_utf8(serialize(&root, 3).unwrap()).unwrap();
        assert!(out.contains("condition=\"a == 1&#10;&amp;&amp; b&#9;c\""), "{}", out);
    }

    #[test]
    fn test_processing_instructions_inside_root_are_kept() {
        let input = b"<?xml version=\"1.0\"?>\n<?prolog dropped?>\n<Bucket><Breakpoints><?marker keep=\"yes\"?></Breakpoints></Bucket>";
        let root = parse(input).unwrap();
        let container = root.child("Breakpoints").unwrap();
        assert_eq!(
            container.children,
            vec![Node::ProcessingInstruction("marker keep=\"yes\"".to_string())]
        );

        let out = String::from_utf8(serialize(&root, 3).unwrap()).unwrap();
        assert!(out.contains("<?marker keep=\"yes\"?>"), "{}", out);
        assert!(!out.contains("prolog"));
        assert_eq!(parse(out.as_bytes()).unwrap(), root);
    }

    #[test]
    fn test_serialize_keeps_comment_and_cdata_content() {
        let root = Element::new("a")
            .with_child(Node::Comment(" keep me ".to_string()))
            .with_child(Element::new("b").with_child(Node::CData("1 < 2".to_string())));
        let out = serialize(&root, 2).unwrap();
        assert_eq!(parse(&out).unwrap(), root);
    }
}
