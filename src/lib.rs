//! A keyed virtual DOM patcher.
//!
//! Build a [`VNode`] tree with [`h`], then let a [`Patcher`] (from [`init`]) turn the previous tree into the new one
//! on any [`Host`] tree, with as few creations and moves as it can manage.
//! Attribute-like concerns live in [`Module`]s, see [`modules`].
//!
//! ```
//! use twig_dom::{h, init, memory::MemoryHost, modules, Data, Host, Old, VNode};
//!
//! let mut host = MemoryHost::new();
//! let root = host.create_element("div", None).unwrap();
//! let container = host.create_element("body", None).unwrap();
//! host.append_child(&container, &root).unwrap();
//!
//! let patch = init(vec![modules::class::module()]);
//!
//! let view = |items: &[u32]| -> VNode<MemoryHost> {
//! 	h("ul", items.iter().map(|&i| h("li", (Data::new().key(i).class("odd", i % 2 == 1), i.to_string()))).collect::<Vec<_>>())
//! };
//!
//! let vnode = patch.patch(&mut host, Old::Element(root), view(&[1, 2])).unwrap();
//! let vnode = patch.patch(&mut host, vnode, view(&[2, 1, 3])).unwrap();
//!
//! let ul = *vnode.elm().unwrap();
//! assert_eq!(
//! 	host.to_html(ul),
//! 	r#"<ul><li>2</li><li class="odd">1</li><li class="odd">3</li></ul>"#,
//! );
//! ```

#![doc(html_root_url = "https://docs.rs/twig-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod error;
pub mod h;
pub mod host;
pub mod load;
pub mod memory;
pub mod module;
pub mod modules;
pub mod patch;
pub mod vnode;
pub mod web;

pub use crate::{
	error::Error,
	h::{comment, h, text},
	host::{Host, NodeKind},
	module::{Module, Removal},
	patch::{init, init_with_config, Config, Old, Patcher},
	vnode::{same_vnode, AttrValue, Content, Data, Key, VNode},
};
