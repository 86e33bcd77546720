//! Parser für HTML-artiges Markup auf Basis von quick-xml.
//!
//! Der Reader läuft im toleranten Modus: End-Tags werden nicht geprüft,
//! Void-Elemente öffnen keinen Scope, Attribute dürfen HTML-Syntax nutzen.
//! Bricht quick-xml ab, bleibt der bis dahin gelesene Teilbaum erhalten.

use crate::core::tags::is_void;
use crate::core::text::escape_bare_ampersands;
use crate::core::{DocumentTree, ElementData, NodeId};
use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parsed Markup in einen neuen Dokument-Baum. Fehler führen nie zum Abbruch.
pub fn parse_markup(markup: &str) -> DocumentTree {
    let mut tree = DocumentTree::new();
    if let Err(e) = read_into(&mut tree, markup) {
        log::warn!("Markup nur teilweise gelesen: {:#}", e);
    }
    tree
}

/// Liest Markup in den Baum unter die Wurzel.
fn read_into(tree: &mut DocumentTree, markup: &str) -> Result<()> {
    let prepared = escape_bare_ampersands(markup);
    let mut reader = Reader::from_str(&prepared);
    {
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.check_comments = false;
        config.expand_empty_elements = false;
    }

    let mut open: Vec<(String, NodeId)> = Vec::new();

    loop {
        let parent = open.last().map_or(tree.root(), |(_, id)| *id);
        let event = reader
            .read_event()
            .with_context(|| format!("Markup-Fehler bei Byte {}", reader.buffer_position()))?;

        match event {
            Event::Start(ref e) => {
                let element = element_from(&reader, e, false)?;
                let tag = element.tag.clone();
                let id = tree.create_element(element);
                tree.append_child(parent, id);
                if !is_void(&tag) {
                    open.push((tag, id));
                }
            }
            Event::Empty(ref e) => {
                let element = element_from(&reader, e, true)?;
                let id = tree.create_element(element);
                tree.append_child(parent, id);
            }
            Event::End(ref e) => {
                let name = reader.decoder().decode(e.name().as_ref())?.to_ascii_lowercase();
                match open.iter().rposition(|(tag, _)| *tag == name) {
                    Some(index) => open.truncate(index),
                    None => log::debug!("Verwaister End-Tag </{}> ignoriert", name),
                }
            }
            Event::Text(ref e) => {
                let raw = reader.decoder().decode(e)?;
                push_text(tree, parent, &raw);
            }
            Event::GeneralRef(ref e) => {
                let name = reader.decoder().decode(e)?;
                push_text(tree, parent, &format!("&{};", name));
            }
            Event::CData(ref e) => {
                let raw = reader.decoder().decode(e)?;
                push_text(tree, parent, &format!("<![CDATA[{}]]>", raw));
            }
            Event::Comment(ref e) => {
                let raw = reader.decoder().decode(e)?;
                let id = tree.create_comment(raw.into_owned());
                tree.append_child(parent, id);
            }
            Event::Eof => break,
            // Deklarationen, Processing Instructions, Doctype
            _ => {}
        }
    }

    if !open.is_empty() {
        log::debug!("{} nicht geschlossene Elemente implizit geschlossen", open.len());
    }
    Ok(())
}

/// Hängt Text an; direkt aufeinanderfolgende Text-Events werden zusammengeführt.
fn push_text(tree: &mut DocumentTree, parent: NodeId, raw: &str) {
    if raw.is_empty() {
        return;
    }
    if let Some(&last) = tree.children(parent).last() {
        if let Some(existing) = tree.raw_text_mut(last) {
            existing.push_str(raw);
            return;
        }
    }
    let id = tree.create_text(raw);
    tree.append_child(parent, id);
}

fn element_from(reader: &Reader<&[u8]>, e: &BytesStart, self_closing: bool) -> Result<ElementData> {
    let tag = reader.decoder().decode(e.name().as_ref())?.to_ascii_lowercase();
    let mut element = ElementData::new(&tag);
    element.self_closing = self_closing;
    for attr in e.html_attributes().with_checks(false) {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = reader.decoder().decode(&attr.value)?.into_owned();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_text() {
        let tree = parse_markup("<section class=\"row\"><p>Hello <b>World</b></p></section>");
        let section = tree.element_children(tree.root())[0];
        assert_eq!(tree.tag(section), Some("section"));
        assert_eq!(tree.attr(section, "class"), Some("row"));
        let p = tree.element_children(section)[0];
        assert_eq!(tree.text_content(p), "Hello World");
    }

    #[test]
    fn void_elements_do_not_open_scope() {
        let tree = parse_markup("<div><img src=\"a.png\"><p>after</p></div>");
        let div = tree.element_children(tree.root())[0];
        let children = tree.element_children(div);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.tag(children[0]), Some("img"));
        assert_eq!(tree.tag(children[1]), Some("p"));
    }

    #[test]
    fn entities_stay_raw_in_text() {
        let tree = parse_markup("<p>Tom &amp; Jerry &copy;</p>");
        let p = tree.element_children(tree.root())[0];
        let text = tree.children(p)[0];
        assert_eq!(tree.raw_text(text), Some("Tom &amp; Jerry &copy;"));
        assert_eq!(tree.children(p).len(), 1);
    }

    #[test]
    fn unmatched_end_tags_are_ignored() {
        let tree = parse_markup("<div><p>a</span></p></div><p>b</p>");
        let top = tree.element_children(tree.root());
        assert_eq!(top.len(), 2);
        assert_eq!(tree.text_content(top[1]), "b");
    }

    #[test]
    fn html_attributes_without_value() {
        let tree = parse_markup("<button disabled class=cta>Go</button>");
        let button = tree.element_children(tree.root())[0];
        assert_eq!(tree.attr(button, "disabled"), Some(""));
        assert_eq!(tree.attr(button, "class"), Some("cta"));
    }
}
