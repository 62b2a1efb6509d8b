//! The interface between the patch engine and the tree it mutates.
//!
//! The engine never owns host nodes. It only stores [`Host::Node`] handles on realized [`VNode`](`crate::VNode`)s
//! and reads positions back through [`Host::parent_node`] and [`Host::next_sibling`] when it has to move something.

use core::fmt::Debug;

/// Rough classification of a host node, used when loading an existing host subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	Element,
	Text,
	Comment,
	/// Anything else (processing instructions, document fragments, …). Loaded as empty text.
	Other,
}

/// A mutable tree the engine can render into.
///
/// All mutating methods are fallible. Errors are propagated out of [`Patcher::patch`](`crate::Patcher::patch`) unmodified
/// as [`Error::Host`](`crate::Error::Host`), and mutations applied before the failure are **not** rolled back.
pub trait Host {
	/// A non-owning handle to a node in this tree.
	type Node: Clone + PartialEq + Debug;
	type Error: Debug;

	fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> Result<Self::Node, Self::Error>;
	fn create_text_node(&mut self, text: &str) -> Result<Self::Node, Self::Error>;
	fn create_comment(&mut self, text: &str) -> Result<Self::Node, Self::Error>;

	/// Inserts `node` into `parent` before `reference`, or at the end if `reference` is [`None`].
	///
	/// If `node` is already attached somewhere, this is a move.
	fn insert_before(&mut self, parent: &Self::Node, node: &Self::Node, reference: Option<&Self::Node>) -> Result<(), Self::Error>;
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error> {
		self.insert_before(parent, child, None)
	}

	/// For elements, replaces all children with a single text node (or none, if `text` is empty).
	/// For text and comment nodes, replaces their data.
	fn set_text_content(&mut self, node: &Self::Node, text: &str) -> Result<(), Self::Error>;

	fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;
	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
	fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;

	fn node_kind(&self, node: &Self::Node) -> NodeKind;
	/// The lowercase tag name, if `node` is an element.
	fn tag_name(&self, node: &Self::Node) -> Option<String>;
	/// The data of a text or comment node.
	fn text(&self, node: &Self::Node) -> Option<String>;
	/// All attributes of an element as `(name, value)` pairs, in host order.
	fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

	fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;
	fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;
	fn set_class(&mut self, node: &Self::Node, name: &str, enabled: bool) -> Result<(), Self::Error>;
	/// Sets an inline style property, or removes it if `value` is [`None`].
	fn set_style(&mut self, node: &Self::Node, property: &str, value: Option<&str>) -> Result<(), Self::Error>;
}
