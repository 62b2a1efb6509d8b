//! Construction of realized [`VNode`] trees from existing host subtrees.

use crate::{
	host::{Host, NodeKind},
	vnode::{Content, Data, VNode},
};
use core::iter;
use tracing::{trace, warn};

/// Loads `node` and its descendants as [`VNode`]s that are already bound to them.
///
/// The `id` and `class` attributes become selector shorthand (`div#id.a.b`), all other attributes go into [`Data::attrs`].
/// Nodes that are neither elements, text nor comments load as empty text.
pub fn to_vnode<H: Host>(host: &H, node: &H::Node) -> VNode<H> {
	match host.node_kind(node) {
		NodeKind::Element => load_element(host, node),
		NodeKind::Text => VNode::realized(None, Data::default(), Content::Text(host.text(node).unwrap_or_default()), node.clone()),
		NodeKind::Comment => VNode::realized(Some("!".to_owned()), Data::default(), Content::Text(host.text(node).unwrap_or_default()), node.clone()),
		NodeKind::Other => {
			warn!(?node, "Loading unrecognised host node as empty text.");
			VNode::realized(None, Data::default(), Content::Text(String::new()), node.clone())
		}
	}
}

fn load_element<H: Host>(host: &H, element: &H::Node) -> VNode<H> {
	let mut sel = host.tag_name(element).unwrap_or_default();
	let mut data = Data::default();
	let mut classes = None;
	for (name, value) in host.attributes(element) {
		match name.as_str() {
			"id" => {
				sel.push('#');
				sel.push_str(&value);
			}
			"class" => classes = Some(value),
			_ => {
				data.attrs.insert(name, value.into());
			}
		}
	}
	for class in classes.iter().flat_map(|classes| classes.split_whitespace()) {
		sel.push('.');
		sel.push_str(class);
	}

	let children: Vec<_> = iter::successors(host.first_child(element), |child| host.next_sibling(child)).map(|child| to_vnode(host, &child)).collect();
	trace!(%sel, children = children.len(), "Loaded element.");
	VNode::realized(Some(sel), data, Content::Children(children), element.clone())
}
