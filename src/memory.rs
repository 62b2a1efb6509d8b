//! An in-memory [`Host`] that records every mutation.
//!
//! Useful wherever there's no browser: tests, native tooling, or inspecting what a patch would do.

use crate::host::{Host, NodeKind};
use core::fmt::Write as _;
use std::collections::BTreeMap;
use thiserror::Error;

/// Handle to a node in a [`MemoryHost`]. Handles stay valid for the host's lifetime, even after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One recorded host mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
	Create(NodeId),
	/// `node` was attached to `parent` while detached.
	Insert { parent: NodeId, node: NodeId },
	/// `node` was attached to `parent` while already attached somewhere.
	Move { parent: NodeId, node: NodeId },
	Remove { parent: NodeId, node: NodeId },
	SetText(NodeId),
	SetAttribute { node: NodeId, name: String },
	RemoveAttribute { node: NodeId, name: String },
	SetClass { node: NodeId, name: String, enabled: bool },
	SetStyle { node: NodeId, property: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
	#[error("unknown node {0:?}")]
	UnknownNode(NodeId),
	#[error("{child:?} is not a child of {parent:?}")]
	NotAChild { parent: NodeId, child: NodeId },
	#[error("{0:?} is not an element")]
	NotAnElement(NodeId),
	#[error("inserting {node:?} into {parent:?} would make a node its own ancestor")]
	HierarchyRequest { parent: NodeId, node: NodeId },
	/// Returned by hooks that refuse to continue.
	#[error("rejected: {0}")]
	Rejected(String),
}

#[derive(Debug)]
enum Payload {
	Element { tag: String, ns: Option<String>, attributes: Vec<(String, String)>, style: BTreeMap<String, String> },
	Text(String),
	Comment(String),
}

#[derive(Debug)]
struct Slot {
	payload: Payload,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
	slots: Vec<Slot>,
	log: Vec<Mutation>,
}

impl MemoryHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The number of nodes ever created, attached or not.
	#[must_use]
	pub fn node_count(&self) -> usize {
		self.slots.len()
	}

	#[must_use]
	pub fn log(&self) -> &[Mutation] {
		&self.log
	}

	pub fn take_log(&mut self) -> Vec<Mutation> {
		std::mem::take(&mut self.log)
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		self.slots.get(node.0).map_or(&[], |slot| &slot.children)
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.slots.get(node.0).and_then(|slot| slot.parent)
	}

	#[must_use]
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		match self.slots.get(node.0).map(|slot| &slot.payload) {
			Some(Payload::Element { tag, .. }) => Some(tag),
			_ => None,
		}
	}

	#[must_use]
	pub fn namespace(&self, node: NodeId) -> Option<&str> {
		match self.slots.get(node.0).map(|slot| &slot.payload) {
			Some(Payload::Element { ns, .. }) => ns.as_deref(),
			_ => None,
		}
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		match self.slots.get(node.0).map(|slot| &slot.payload) {
			Some(Payload::Element { attributes, .. }) => attributes.iter().find(|(n, _)| n == name).map(|(_, value)| value.as_str()),
			_ => None,
		}
	}

	#[must_use]
	pub fn has_class(&self, node: NodeId, name: &str) -> bool {
		self.attribute(node, "class").map_or(false, |classes| classes.split_whitespace().any(|class| class == name))
	}

	#[must_use]
	pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
		match self.slots.get(node.0).map(|slot| &slot.payload) {
			Some(Payload::Element { style, .. }) => style.get(property).map(String::as_str),
			_ => None,
		}
	}

	/// The concatenated data of all descendant text nodes, like the DOM's ***textContent***.
	#[must_use]
	pub fn text_content(&self, node: NodeId) -> String {
		let mut text = String::new();
		self.collect_text(node, &mut text);
		text
	}

	fn collect_text(&self, node: NodeId, text: &mut String) {
		if let Some(slot) = self.slots.get(node.0) {
			match &slot.payload {
				Payload::Text(data) => text.push_str(data),
				Payload::Comment(_) => (),
				Payload::Element { .. } => {
					for &child in &slot.children {
						self.collect_text(child, text);
					}
				}
			}
		}
	}

	/// Serializes `node` and its descendants. Style goes last, as a `style` attribute. Nothing is escaped.
	#[must_use]
	pub fn to_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		let slot = match self.slots.get(node.0) {
			Some(slot) => slot,
			None => return,
		};
		match &slot.payload {
			Payload::Text(data) => html.push_str(data),
			Payload::Comment(data) => {
				let _ = write!(html, "<!--{}-->", data);
			}
			Payload::Element { tag, attributes, style, .. } => {
				html.push('<');
				html.push_str(tag);
				for (name, value) in attributes {
					let _ = write!(html, " {}=\"{}\"", name, value);
				}
				if !style.is_empty() {
					html.push_str(" style=\"");
					for (property, value) in style {
						let _ = write!(html, "{}: {};", property, value);
					}
					html.push('"');
				}
				html.push('>');
				for &child in &slot.children {
					self.write_html(child, html);
				}
				let _ = write!(html, "</{}>", tag);
			}
		}
	}

	fn slot(&self, node: NodeId) -> Result<&Slot, MemoryError> {
		self.slots.get(node.0).ok_or(MemoryError::UnknownNode(node))
	}

	fn slot_mut(&mut self, node: NodeId) -> Result<&mut Slot, MemoryError> {
		self.slots.get_mut(node.0).ok_or(MemoryError::UnknownNode(node))
	}

	fn element_mut(&mut self, node: NodeId) -> Result<(&mut Vec<(String, String)>, &mut BTreeMap<String, String>), MemoryError> {
		match &mut self.slot_mut(node)?.payload {
			Payload::Element { attributes, style, .. } => Ok((attributes, style)),
			Payload::Text(_) | Payload::Comment(_) => Err(MemoryError::NotAnElement(node)),
		}
	}

	fn push(&mut self, payload: Payload) -> NodeId {
		let id = NodeId(self.slots.len());
		self.slots.push(Slot { payload, parent: None, children: Vec::new() });
		self.log.push(Mutation::Create(id));
		id
	}

	fn detach(&mut self, node: NodeId) -> Option<NodeId> {
		let parent = self.slots[node.0].parent.take()?;
		self.slots[parent.0].children.retain(|&child| child != node);
		Some(parent)
	}
}

impl Host for MemoryHost {
	type Node = NodeId;
	type Error = MemoryError;

	fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> Result<NodeId, MemoryError> {
		Ok(self.push(Payload::Element {
			tag: tag.to_owned(),
			ns: namespace.map(str::to_owned),
			attributes: Vec::new(),
			style: BTreeMap::new(),
		}))
	}

	fn create_text_node(&mut self, text: &str) -> Result<NodeId, MemoryError> {
		Ok(self.push(Payload::Text(text.to_owned())))
	}

	fn create_comment(&mut self, text: &str) -> Result<NodeId, MemoryError> {
		Ok(self.push(Payload::Comment(text.to_owned())))
	}

	fn insert_before(&mut self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) -> Result<(), MemoryError> {
		let (parent, node) = (*parent, *node);
		self.slot(node)?;
		if !matches!(self.slot(parent)?.payload, Payload::Element { .. }) {
			return Err(MemoryError::NotAnElement(parent));
		}

		let mut ancestor = Some(parent);
		while let Some(current) = ancestor {
			if current == node {
				return Err(MemoryError::HierarchyRequest { parent, node });
			}
			ancestor = self.slots[current.0].parent;
		}

		let mut reference = reference.copied();
		if let Some(child) = reference {
			if self.slot(child)?.parent != Some(parent) {
				return Err(MemoryError::NotAChild { parent, child });
			}
			if child == node {
				reference = self.next_sibling(&node);
			}
		}

		let moved = self.detach(node).is_some();
		let children = &mut self.slots[parent.0].children;
		let index = reference.and_then(|child| children.iter().position(|&c| c == child)).unwrap_or(children.len());
		children.insert(index, node);
		self.slots[node.0].parent = Some(parent);
		self.log.push(if moved { Mutation::Move { parent, node } } else { Mutation::Insert { parent, node } });
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryError> {
		let (parent, child) = (*parent, *child);
		self.slot(parent)?;
		if self.slot(child)?.parent != Some(parent) {
			return Err(MemoryError::NotAChild { parent, child });
		}
		self.detach(child);
		self.log.push(Mutation::Remove { parent, node: child });
		Ok(())
	}

	fn set_text_content(&mut self, node: &NodeId, text: &str) -> Result<(), MemoryError> {
		let node = *node;
		if matches!(self.slot(node)?.payload, Payload::Element { .. }) {
			for child in std::mem::take(&mut self.slots[node.0].children) {
				self.slots[child.0].parent = None;
			}
			if !text.is_empty() {
				let id = NodeId(self.slots.len());
				self.slots.push(Slot { payload: Payload::Text(text.to_owned()), parent: Some(node), children: Vec::new() });
				self.slots[node.0].children.push(id);
			}
		} else if let Payload::Text(data) | Payload::Comment(data) = &mut self.slots[node.0].payload {
			*data = text.to_owned();
		}
		self.log.push(Mutation::SetText(node));
		Ok(())
	}

	fn parent_node(&self, node: &NodeId) -> Option<NodeId> {
		self.parent(*node)
	}

	fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
		let siblings = self.children(self.parent(*node)?);
		let index = siblings.iter().position(|child| child == node)?;
		siblings.get(index + 1).copied()
	}

	fn first_child(&self, node: &NodeId) -> Option<NodeId> {
		self.children(*node).first().copied()
	}

	fn node_kind(&self, node: &NodeId) -> NodeKind {
		match self.slots.get(node.0).map(|slot| &slot.payload) {
			Some(Payload::Element { .. }) => NodeKind::Element,
			Some(Payload::Text(_)) => NodeKind::Text,
			Some(Payload::Comment(_)) => NodeKind::Comment,
			None => NodeKind::Other,
		}
	}

	fn tag_name(&self, node: &NodeId) -> Option<String> {
		self.tag(*node).map(str::to_ascii_lowercase)
	}

	fn text(&self, node: &NodeId) -> Option<String> {
		match self.slots.get(node.0).map(|slot| &slot.payload) {
			Some(Payload::Text(data) | Payload::Comment(data)) => Some(data.clone()),
			_ => None,
		}
	}

	fn attributes(&self, node: &NodeId) -> Vec<(String, String)> {
		match self.slots.get(node.0).map(|slot| &slot.payload) {
			Some(Payload::Element { attributes, .. }) => attributes.clone(),
			_ => Vec::new(),
		}
	}

	fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), MemoryError> {
		let (attributes, _) = self.element_mut(*node)?;
		match attributes.iter_mut().find(|(n, _)| n == name) {
			Some((_, existing)) => *existing = value.to_owned(),
			None => attributes.push((name.to_owned(), value.to_owned())),
		}
		self.log.push(Mutation::SetAttribute { node: *node, name: name.to_owned() });
		Ok(())
	}

	fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), MemoryError> {
		let (attributes, _) = self.element_mut(*node)?;
		attributes.retain(|(n, _)| n != name);
		self.log.push(Mutation::RemoveAttribute { node: *node, name: name.to_owned() });
		Ok(())
	}

	fn set_class(&mut self, node: &NodeId, name: &str, enabled: bool) -> Result<(), MemoryError> {
		let (attributes, _) = self.element_mut(*node)?;
		let index = match attributes.iter().position(|(n, _)| n == "class") {
			Some(index) => index,
			// Like ***classList***, removing from an absent attribute doesn't create it.
			None if !enabled => {
				self.log.push(Mutation::SetClass { node: *node, name: name.to_owned(), enabled });
				return Ok(());
			}
			None => {
				attributes.push(("class".to_owned(), String::new()));
				attributes.len() - 1
			}
		};
		let classes = {
			let mut tokens: Vec<&str> = attributes[index].1.split_whitespace().filter(|&class| class != name).collect();
			if enabled {
				tokens.push(name);
			}
			tokens.join(" ")
		};
		attributes[index].1 = classes;
		self.log.push(Mutation::SetClass { node: *node, name: name.to_owned(), enabled });
		Ok(())
	}

	fn set_style(&mut self, node: &NodeId, property: &str, value: Option<&str>) -> Result<(), MemoryError> {
		let (_, style) = self.element_mut(*node)?;
		match value {
			Some(value) => style.insert(property.to_owned(), value.to_owned()),
			None => style.remove(property),
		};
		self.log.push(Mutation::SetStyle { node: *node, property: property.to_owned() });
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::{MemoryError, MemoryHost, Mutation};
	use crate::host::Host;

	#[test]
	fn insert_move_remove() {
		let mut host = MemoryHost::new();
		let root = host.create_element("div", None).unwrap();
		let a = host.create_text_node("a").unwrap();
		let b = host.create_text_node("b").unwrap();
		host.append_child(&root, &a).unwrap();
		host.append_child(&root, &b).unwrap();
		assert_eq!(host.to_html(root), "<div>ab</div>");

		host.take_log();
		host.insert_before(&root, &b, Some(&a)).unwrap();
		assert_eq!(host.to_html(root), "<div>ba</div>");
		assert_eq!(host.log(), [Mutation::Move { parent: root, node: b }]);

		host.remove_child(&root, &b).unwrap();
		assert_eq!(host.children(root), [a]);
		assert_eq!(host.parent(b), None);
	}

	#[test]
	fn insert_before_itself_is_stable() {
		let mut host = MemoryHost::new();
		let root = host.create_element("div", None).unwrap();
		let a = host.create_text_node("a").unwrap();
		let b = host.create_text_node("b").unwrap();
		host.append_child(&root, &a).unwrap();
		host.append_child(&root, &b).unwrap();
		host.insert_before(&root, &a, Some(&a)).unwrap();
		assert_eq!(host.children(root), [a, b]);
	}

	#[test]
	fn rejects_foreign_reference_and_cycles() {
		let mut host = MemoryHost::new();
		let root = host.create_element("div", None).unwrap();
		let inner = host.create_element("p", None).unwrap();
		let stray = host.create_text_node("x").unwrap();
		host.append_child(&root, &inner).unwrap();

		assert_eq!(host.insert_before(&root, &stray, Some(&stray)), Err(MemoryError::NotAChild { parent: root, child: stray }));
		assert_eq!(host.insert_before(&inner, &root, None), Err(MemoryError::HierarchyRequest { parent: inner, node: root }));
		assert_eq!(host.remove_child(&inner, &stray), Err(MemoryError::NotAChild { parent: inner, child: stray }));
		assert_eq!(host.append_child(&stray, &inner), Err(MemoryError::NotAnElement(stray)));
	}

	#[test]
	fn text_content_replaces_children() {
		let mut host = MemoryHost::new();
		let root = host.create_element("p", None).unwrap();
		let inner = host.create_element("b", None).unwrap();
		host.append_child(&root, &inner).unwrap();
		host.set_text_content(&root, "plain").unwrap();
		assert_eq!(host.to_html(root), "<p>plain</p>");
		assert_eq!(host.parent(inner), None);

		host.set_text_content(&root, "").unwrap();
		assert!(host.children(root).is_empty());
	}

	#[test]
	fn classes_and_styles() {
		let mut host = MemoryHost::new();
		let root = host.create_element("div", None).unwrap();
		host.set_class(&root, "a", true).unwrap();
		host.set_class(&root, "b", true).unwrap();
		host.set_class(&root, "a", false).unwrap();
		assert!(host.has_class(root, "b"));
		assert!(!host.has_class(root, "a"));

		host.set_style(&root, "color", Some("red")).unwrap();
		assert_eq!(host.to_html(root), "<div class=\"b\" style=\"color: red;\"></div>");
		host.set_style(&root, "color", None).unwrap();
		assert_eq!(host.style(root, "color"), None);
	}
}
