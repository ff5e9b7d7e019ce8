use html5ever::{LocalName, Namespace, QualName};
use kuchiki::{NodeRef, traits::TendrilSink};

use super::MarkupBackend;
use crate::error::FlattenError;

/// [`MarkupBackend`] over the `kuchiki` DOM (html5ever parsing, CSS
/// selectors).
///
/// Input is parsed as a fragment in a `body` context, so the parsed nodes sit
/// under a single `html` element and no `head`/`body` wrappers are added.
#[derive(Debug, Default, Clone, Copy)]
pub struct KuchikiBackend;

impl MarkupBackend for KuchikiBackend {
    type Node = NodeRef;

    fn parse(&self, markup: &str) -> Result<NodeRef, FlattenError> {
        let context = QualName::new(
            None,
            Namespace::from("http://www.w3.org/1999/xhtml"),
            LocalName::from("body"),
        );
        Ok(kuchiki::parse_fragment(context, Vec::new()).one(markup))
    }

    fn select(&self, root: &NodeRef, tags: &[&str]) -> Result<Vec<NodeRef>, FlattenError> {
        let selector = tags.join(", ");
        // Must collect before the caller detaches anything.
        let matches = root
            .select(&selector)
            .map_err(|()| FlattenError::InvalidSelector(selector.clone()))?
            .map(|element| element.as_node().clone())
            .collect();
        Ok(matches)
    }

    fn remove(&self, node: &NodeRef) {
        node.detach();
    }

    fn tag_name(&self, node: &NodeRef) -> Option<String> {
        node.as_element()
            .map(|element| element.name.local.to_ascii_lowercase().to_string())
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        let element = node.as_element()?;
        let attributes = element.attributes.borrow();
        attributes.get(name).map(String::from)
    }

    fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        node.children().collect()
    }

    fn insert_text_before(&self, node: &NodeRef, text: &str) {
        node.insert_before(NodeRef::new_text(text));
    }

    fn insert_text_after(&self, node: &NodeRef, text: &str) {
        node.insert_after(NodeRef::new_text(text));
    }

    fn text_contents(&self, node: &NodeRef) -> String {
        node.text_contents()
    }
}
