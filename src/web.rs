//! A [`Host`] backed by a [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).

use crate::host::{Host, NodeKind};
use tracing::{instrument, trace};
use wasm_bindgen::{JsCast, JsValue};

/// Drives a [`web_sys::Document`]. Node handles are [`web_sys::Node`]s, errors are the thrown [`JsValue`]s.
#[derive(Debug, Clone)]
pub struct WebHost {
	document: web_sys::Document,
}

impl WebHost {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	/// The host for the current window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window()?.document().map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}

fn element(node: &web_sys::Node) -> Result<&web_sys::Element, JsValue> {
	node.dyn_ref::<web_sys::Element>().ok_or_else(|| js_sys::TypeError::new("twig-dom: Expected an element.").into())
}

impl Host for WebHost {
	type Node = web_sys::Node;
	type Error = JsValue;

	#[instrument(skip(self))]
	fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> Result<web_sys::Node, JsValue> {
		match namespace {
			Some(namespace) => self.document.create_element_ns(Some(namespace), tag),
			None => self.document.create_element(tag),
		}
		.map(Into::into)
	}

	fn create_text_node(&mut self, text: &str) -> Result<web_sys::Node, JsValue> {
		Ok(self.document.create_text_node(text).into())
	}

	fn create_comment(&mut self, text: &str) -> Result<web_sys::Node, JsValue> {
		Ok(self.document.create_comment(text).into())
	}

	fn insert_before(&mut self, parent: &web_sys::Node, node: &web_sys::Node, reference: Option<&web_sys::Node>) -> Result<(), JsValue> {
		parent.insert_before(node, reference).map(drop)
	}

	fn remove_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), JsValue> {
		parent.remove_child(child).map(drop)
	}

	fn set_text_content(&mut self, node: &web_sys::Node, text: &str) -> Result<(), JsValue> {
		node.set_text_content(Some(text));
		Ok(())
	}

	fn parent_node(&self, node: &web_sys::Node) -> Option<web_sys::Node> {
		node.parent_node()
	}

	fn next_sibling(&self, node: &web_sys::Node) -> Option<web_sys::Node> {
		node.next_sibling()
	}

	fn first_child(&self, node: &web_sys::Node) -> Option<web_sys::Node> {
		node.first_child()
	}

	fn node_kind(&self, node: &web_sys::Node) -> NodeKind {
		match node.node_type() {
			web_sys::Node::ELEMENT_NODE => NodeKind::Element,
			web_sys::Node::TEXT_NODE => NodeKind::Text,
			web_sys::Node::COMMENT_NODE => NodeKind::Comment,
			other => {
				trace!(node_type = other, "Unrecognised node type.");
				NodeKind::Other
			}
		}
	}

	fn tag_name(&self, node: &web_sys::Node) -> Option<String> {
		node.dyn_ref::<web_sys::Element>().map(|element| element.tag_name().to_lowercase())
	}

	fn text(&self, node: &web_sys::Node) -> Option<String> {
		node.dyn_ref::<web_sys::CharacterData>().map(web_sys::CharacterData::data)
	}

	fn attributes(&self, node: &web_sys::Node) -> Vec<(String, String)> {
		let attributes = match node.dyn_ref::<web_sys::Element>() {
			Some(element) => element.attributes(),
			None => return Vec::new(),
		};
		(0..attributes.length()).filter_map(|i| attributes.item(i)).map(|attribute| (attribute.name(), attribute.value())).collect()
	}

	fn set_attribute(&mut self, node: &web_sys::Node, name: &str, value: &str) -> Result<(), JsValue> {
		element(node)?.set_attribute(name, value)
	}

	fn remove_attribute(&mut self, node: &web_sys::Node, name: &str) -> Result<(), JsValue> {
		element(node)?.remove_attribute(name)
	}

	fn set_class(&mut self, node: &web_sys::Node, name: &str, enabled: bool) -> Result<(), JsValue> {
		element(node)?.class_list().toggle_with_force(name, enabled).map(drop)
	}

	fn set_style(&mut self, node: &web_sys::Node, property: &str, value: Option<&str>) -> Result<(), JsValue> {
		let style = if let Some(html_element) = node.dyn_ref::<web_sys::HtmlElement>() {
			html_element.style()
		} else if let Some(svg_element) = node.dyn_ref::<web_sys::SvgElement>() {
			svg_element.style()
		} else {
			return Err(js_sys::TypeError::new("twig-dom: Expected an HTML or SVG element to style.").into());
		};
		match value {
			Some(value) => style.set_property(property, value),
			None => style.remove_property(property).map(drop),
		}
	}
}
