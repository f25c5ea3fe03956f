//! HTML-style serialization of arena nodes.
//!
//! Every element gets an explicit closing tag and template content is written
//! inside its `<template>`, which keeps the output a faithful picture of the
//! arena for comparisons.

use crate::dom::document::Document;
use crate::dom::node::{NodeData, NodeId};

pub fn outer_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_children(doc, node, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    let Some(data) = doc.data(node) else {
        return;
    };

    match data {
        NodeData::Document | NodeData::Fragment => write_children(doc, node, out),
        NodeData::Element {
            tag,
            attributes,
            template_content,
        } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');
            if let Some(content) = template_content {
                write_children(doc, *content, out);
            }
            write_children(doc, node, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeData::Text(text) => escape_into(text, false, out),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::CdataSection(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        NodeData::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            if !data.is_empty() {
                out.push(' ');
                out.push_str(data);
            }
            out.push_str("?>");
        }
        NodeData::Doctype { name } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn write_children(doc: &Document, node: NodeId, out: &mut String) {
    for &child in doc.children(node) {
        write_node(doc, child, out);
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let mut doc = Document::new();
        let el = doc.append_element(doc.root(), "p").unwrap();
        doc.set_attribute(el, "title", "a \"b\" <c> & d").unwrap();
        doc.append_text(el, "1 < 2 & \"3\"").unwrap();

        assert_eq!(
            outer_html(&doc, el),
            "<p title=\"a &quot;b&quot; <c> &amp; d\">1 &lt; 2 &amp; \"3\"</p>"
        );
    }

    #[test]
    fn serializes_ignored_kinds() {
        let mut doc = Document::new();
        let doctype = doc.create_doctype("html");
        doc.append_child(doc.root(), doctype).unwrap();
        let html = doc.append_element(doc.root(), "html").unwrap();
        let comment = doc.create_comment(" c ");
        doc.append_child(html, comment).unwrap();
        let cdata = doc.create_cdata_section("x<y");
        doc.append_child(html, cdata).unwrap();
        let pi = doc.create_processing_instruction("xml-stylesheet", "href=\"a.css\"");
        doc.append_child(html, pi).unwrap();

        assert_eq!(
            inner_html(&doc, doc.root()),
            "<!DOCTYPE html><html><!-- c --><![CDATA[x<y]]><?xml-stylesheet href=\"a.css\"?></html>"
        );
    }
}
