use strum::IntoEnumIterator;

use super::Node;
use crate::document::XmlNode;
use crate::verb::Verb;

/// Element name of the discovery document.
pub const META_ELEMENT: &str = "meta";

pub(super) fn describe<S>(root: &Node<S>) -> XmlNode {
    let mut element = XmlNode::new(META_ELEMENT);
    annotate(root, &mut element);
    element
}

fn annotate<S>(node: &Node<S>, element: &mut XmlNode) {
    for verb in Verb::iter() {
        if node.methods.handler(verb).is_some() {
            element.set_attr(verb.as_str(), "");
        }
    }
    for child in &node.children {
        let mut child_element = XmlNode::new(child.name.as_str());
        annotate(child, &mut child_element);
        element.push_child(child_element);
    }
}
