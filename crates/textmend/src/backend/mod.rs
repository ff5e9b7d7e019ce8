//! Markup backend seam.
//!
//! The flattener never touches a DOM directly. Everything it needs from a
//! parsed document goes through [`MarkupBackend`]: parse a fragment, find
//! elements by tag name, rewrite around them, and read text back out.

#[cfg(feature = "markup")]
mod kuchiki_dom;

#[cfg(feature = "markup")]
pub use kuchiki_dom::KuchikiBackend;

use crate::error::FlattenError;

/// A mutable document tree the [`Flattener`](crate::Flattener) can rewrite.
///
/// Node handles are cheap clones referring into the same tree, so rewriting
/// through one handle is visible through every other.
pub trait MarkupBackend {
    /// Handle to a node of the parsed tree.
    type Node: Clone;

    /// Parses `markup` and returns the root of the resulting tree.
    ///
    /// # Errors
    ///
    /// Returns [`FlattenError::Backend`] if the backend cannot build a tree.
    fn parse(&self, markup: &str) -> Result<Self::Node, FlattenError>;

    /// Returns every element below `root` whose tag name is one of `tags`, in
    /// document order. The result is a snapshot; mutating the tree does not
    /// change it.
    ///
    /// # Errors
    ///
    /// Returns [`FlattenError::InvalidSelector`] if the backend cannot express
    /// the lookup.
    fn select(&self, root: &Self::Node, tags: &[&str]) -> Result<Vec<Self::Node>, FlattenError>;

    /// Detaches `node` and its subtree from the tree.
    fn remove(&self, node: &Self::Node);

    /// Lower-case tag name, or `None` for anything that is not an element.
    fn tag_name(&self, node: &Self::Node) -> Option<String>;

    /// Value of attribute `name`, if `node` is an element that carries it.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Direct children of `node`, in order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Inserts a text node holding `text` right before `node`.
    fn insert_text_before(&self, node: &Self::Node, text: &str);

    /// Inserts a text node holding `text` right after `node`.
    fn insert_text_after(&self, node: &Self::Node, text: &str);

    /// Concatenated text of every text node below `node`, in document order.
    fn text_contents(&self, node: &Self::Node) -> String;
}
