//! Terse node construction.
//!
//! ```
//! use twig_dom::{h, memory::MemoryHost, text, Data, VNode};
//!
//! let list: VNode<MemoryHost> = h("ul#list", [
//! 	h("li", (Data::new().key(1), "one")),
//! 	h("li", (Data::new().key(2).class("done", true), "two")),
//! 	h("li", [text("three")]),
//! ]);
//! assert_eq!(list.children().len(), 3);
//! ```

use crate::{
	host::Host,
	vnode::{Content, Data, VNode},
};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Everything [`h`] accepts after the selector: optional [`Data`], then optional text or children.
pub struct Args<H: Host> {
	data: Data<H>,
	content: Content<H>,
}

impl<H: Host> From<()> for Args<H> {
	fn from((): ()) -> Self {
		Self { data: Data::default(), content: Content::Empty }
	}
}

impl<H: Host> From<Data<H>> for Args<H> {
	fn from(data: Data<H>) -> Self {
		Self { data, content: Content::Empty }
	}
}

macro_rules! content_args {
	($($content:ty => |$value:ident| $convert:expr;)*) => {$(
		impl<H: Host> From<$content> for Args<H> {
			fn from($value: $content) -> Self {
				Self { data: Data::default(), content: $convert }
			}
		}

		impl<H: Host> From<(Data<H>, $content)> for Args<H> {
			fn from((data, $value): (Data<H>, $content)) -> Self {
				Self { data, content: $convert }
			}
		}
	)*};
}

content_args! {
	&str => |text| Content::Text(text.to_owned());
	String => |text| Content::Text(text);
	Vec<VNode<H>> => |children| Content::Children(children);
	VNode<H> => |child| Content::Children(vec![child]);
}

impl<H: Host, const N: usize> From<[VNode<H>; N]> for Args<H> {
	fn from(children: [VNode<H>; N]) -> Self {
		Self { data: Data::default(), content: Content::Children(children.into_iter().collect()) }
	}
}

impl<H: Host, const N: usize> From<(Data<H>, [VNode<H>; N])> for Args<H> {
	fn from((data, children): (Data<H>, [VNode<H>; N])) -> Self {
		Self { data, content: Content::Children(children.into_iter().collect()) }
	}
}

/// Creates an element node.
///
/// `sel` is a tag name with optional `#id` and `.class` shorthand, e.g. `"div#app.dark"`.
/// The key goes into [`Data::key`].
///
/// `svg` selectors (`svg`, `svg#…`, `svg.…`) put the whole subtree into the SVG namespace, except below `foreignObject`.
/// Children that are already in the SVG namespace are kept as they are.
#[must_use]
pub fn h<H: Host>(sel: impl Into<String>, args: impl Into<Args<H>>) -> VNode<H> {
	let sel = sel.into();
	let Args { data, content } = args.into();
	let svg = is_svg(&sel);
	let vnode = VNode::new(Some(sel), data, content);
	if svg {
		vnode.with_namespace(SVG_NAMESPACE)
	} else {
		vnode
	}
}

/// Creates a text node.
#[must_use]
pub fn text<H: Host>(text: impl Into<String>) -> VNode<H> {
	VNode::new(None, Data::default(), Content::Text(text.into()))
}

/// Creates a comment node.
#[must_use]
pub fn comment<H: Host>(text: impl Into<String>) -> VNode<H> {
	VNode::new(Some("!".to_owned()), Data::default(), Content::Text(text.into()))
}

fn is_svg(sel: &str) -> bool {
	sel.strip_prefix("svg").map_or(false, |rest| rest.is_empty() || rest.starts_with('.') || rest.starts_with('#'))
}
