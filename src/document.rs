//! Document compositor.
//!
//! Parses the served document, appends the generated `<style>` and the
//! reload `<script>` as the last children of `<head>`, and serializes the
//! root element back to text.

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::{LocalName, QualName, namespace_url, ns, parse_document};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("document has no <{0}> element")]
    MissingElement(&'static str),

    #[error("failed to serialize document")]
    Serialize(#[from] std::io::Error),

    #[error("serialized document is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Inject `style` and `script` into `html`.
///
/// The parser is lenient, so any input yields a tree. Existing injected
/// elements are left alone; composing twice adds a second pair.
pub fn compose(html: &str, style: &str, script: &str) -> Result<String, ComposeError> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    let root = child_element(&dom.document, "html").ok_or(ComposeError::MissingElement("html"))?;
    let head = child_element(&root, "head").ok_or(ComposeError::MissingElement("head"))?;

    append(&head, element("style", style));
    append(&head, element("script", script));

    let mut out = Vec::with_capacity(html.len() + style.len() + script.len() + 64);
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut out, &SerializableHandle::from(root), opts)?;
    Ok(String::from_utf8(out)?)
}

fn child_element(parent: &Handle, name: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, NodeData::Element { name: qual, .. } if &*qual.local == name))
        .cloned()
}

/// `<name>text</name>` in the HTML namespace.
fn element(name: &str, text: &str) -> Handle {
    let node = Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), LocalName::from(name)),
        attrs: RefCell::new(Vec::new()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    });
    append(
        &node,
        Node::new(NodeData::Text {
            contents: RefCell::new(StrTendril::from_slice(text)),
        }),
    );
    node
}

fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keep the dom alive: dropping it empties every descendant.
    fn reparse(html: &str) -> RcDom {
        parse_document(RcDom::default(), Default::default()).one(html)
    }

    fn root(dom: &RcDom) -> Handle {
        child_element(&dom.document, "html").unwrap()
    }

    fn render(root: &Handle) -> String {
        let mut out = Vec::new();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        };
        serialize(&mut out, &SerializableHandle::from(root.clone()), opts).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn head_elements(root: &Handle) -> Vec<String> {
        let head = child_element(root, "head").unwrap();
        let names = head
            .children
            .borrow()
            .iter()
            .filter_map(|child| match &child.data {
                NodeData::Element { name, .. } => Some(name.local.to_string()),
                _ => None,
            })
            .collect();
        names
    }

    const PAGE: &str = "<!DOCTYPE html><html lang=\"en\"><head><title>t</title></head>\
        <body><div class=\"bg-primary p-4\">hi &amp; bye</div></body></html>";

    #[test]
    fn test_appends_style_then_script() {
        let out = compose(PAGE, ".a { color: red; }", "let x = 1 < 2;").unwrap();
        let dom = reparse(&out);
        assert_eq!(head_elements(&root(&dom)), vec!["title", "style", "script"]);
        assert!(out.contains("<style>.a { color: red; }</style><script>let x = 1 < 2;</script></head>"));
        assert!(out.starts_with("<html lang=\"en\">"));
    }

    #[test]
    fn test_rest_of_tree_unchanged() {
        let out = compose(PAGE, "p{}", "void 0").unwrap();
        let dom = reparse(&out);
        let head = child_element(&root(&dom), "head").unwrap();
        let stripped: Vec<Handle> = {
            let mut children = head.children.borrow_mut();
            let len = children.len();
            children.drain(len - 2..).collect()
        };
        assert_eq!(stripped.len(), 2);
        let original = reparse(PAGE);
        assert_eq!(render(&root(&dom)), render(&root(&original)));
    }

    #[test]
    fn test_compose_twice_keeps_both_pairs() {
        let once = compose(PAGE, "a{}", "1").unwrap();
        let twice = compose(&once, "b{}", "2").unwrap();
        let dom = reparse(&twice);
        assert_eq!(
            head_elements(&root(&dom)),
            vec!["title", "style", "script", "style", "script"]
        );
        assert!(twice.find("a{}").unwrap() < twice.find("b{}").unwrap());
    }

    #[test]
    fn test_same_input_same_output() {
        assert_eq!(
            compose(PAGE, "x{}", "y").unwrap(),
            compose(PAGE, "x{}", "y").unwrap()
        );
    }

    #[test]
    fn test_fragment_gets_head() {
        let out = compose("<p>loose</p>", "x{}", "y").unwrap();
        assert_eq!(
            out,
            "<html><head><style>x{}</style><script>y</script></head><body><p>loose</p></body></html>"
        );
    }
}
