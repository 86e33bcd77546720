//! Writer: serialisiert den lebenden Dokument-Baum zurück in Markup.
//!
//! Einfügemarker und Editor-Markierungen werden nie geschrieben.

use crate::core::tags::is_void;
use crate::core::text::escape_attribute;
use crate::core::{DocumentTree, NodeData, NodeId, ROOT_TAG};

/// Schreibt den Inhalt der Wurzel (ohne die synthetische Wurzel selbst).
pub fn write_markup(tree: &DocumentTree) -> String {
    write_children(tree, tree.root())
}

/// Schreibt alle Kinder eines Nodes.
pub fn write_children(tree: &DocumentTree, id: NodeId) -> String {
    let mut output = String::new();
    for &child in tree.children(id) {
        write_node(tree, child, &mut output);
    }
    output
}

/// Schreibt einen Node samt Teilbaum.
pub fn write_node_markup(tree: &DocumentTree, id: NodeId) -> String {
    let mut output = String::new();
    write_node(tree, id, &mut output);
    output
}

fn write_node(tree: &DocumentTree, id: NodeId, output: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Text(raw) => output.push_str(raw),
        NodeData::Comment(raw) => {
            output.push_str("<!--");
            output.push_str(raw);
            output.push_str("-->");
        }
        NodeData::Element(element) => {
            if element.marks.marker {
                return;
            }
            if element.tag == ROOT_TAG {
                for &child in &node.children {
                    write_node(tree, child, output);
                }
                return;
            }

            output.push('<');
            output.push_str(&element.tag);
            for (name, value) in &element.attributes {
                output.push(' ');
                output.push_str(name);
                output.push_str("=\"");
                output.push_str(&escape_attribute(value));
                output.push('"');
            }

            if element.self_closing && node.children.is_empty() {
                output.push_str("/>");
                return;
            }
            output.push('>');
            if is_void(&element.tag) {
                return;
            }

            for &child in &node.children {
                write_node(tree, child, output);
            }
            output.push_str("</");
            output.push_str(&element.tag);
            output.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;

    #[test]
    fn roundtrip_is_byte_identical_for_normalized_input() {
        let input = "<style>.card{padding:8px}</style><section class=\"row\"><div class=\"card\" id=\"a\">Card &amp; A<br></div><!-- note --><img src=\"x.png\"/></section>";
        let tree = parse_markup(input);
        assert_eq!(write_markup(&tree), input);
    }

    #[test]
    fn marker_nodes_are_skipped() {
        let mut tree = parse_markup("<section><p>a</p></section>");
        let section = tree.element_children(tree.root())[0];
        let marker = tree.create_element(crate::core::ElementData::new("div"));
        if let Some(marks) = tree.marks_mut(marker) {
            marks.marker = true;
        }
        tree.append_child(section, marker);
        assert_eq!(write_markup(&tree), "<section><p>a</p></section>");
    }

    #[test]
    fn quotes_in_attribute_values_are_escaped() {
        let tree = parse_markup("<p title='say \"hi\"'>x</p>");
        assert_eq!(write_markup(&tree), "<p title=\"say &quot;hi&quot;\">x</p>");
    }
}
