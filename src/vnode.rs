//! The node model: one-shot descriptions of host tree nodes.

use crate::{host::Host, module::Removal};
use core::{
	cell::OnceCell,
	convert::TryFrom,
	fmt::{self, Debug, Display, Formatter},
};
use std::{borrow::Cow, collections::BTreeMap, rc::Rc};

/// Stable sibling identity used only for reconciliation.
///
/// `Key::Number(1)` and `Key::Text("1")` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
	Text(Cow<'static, str>),
	Number(i64),
}

impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Key::Text(text) => Debug::fmt(text, f),
			Key::Number(number) => Display::fmt(number, f),
		}
	}
}

impl From<&'static str> for Key {
	fn from(text: &'static str) -> Self {
		Self::Text(Cow::Borrowed(text))
	}
}
impl From<String> for Key {
	fn from(text: String) -> Self {
		Self::Text(Cow::Owned(text))
	}
}
impl From<i64> for Key {
	fn from(number: i64) -> Self {
		Self::Number(number)
	}
}
impl From<i32> for Key {
	fn from(number: i32) -> Self {
		Self::Number(number.into())
	}
}
impl From<u32> for Key {
	fn from(number: u32) -> Self {
		Self::Number(number.into())
	}
}
impl From<usize> for Key {
	fn from(number: usize) -> Self {
		i64::try_from(number).map_or_else(|_| Self::Text(Cow::Owned(number.to_string())), Self::Number)
	}
}

/// Value of an entry in [`Data::attrs`].
///
/// `Bool(true)` renders as an empty attribute, `Bool(false)` as an absent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
	Text(String),
	Bool(bool),
}

impl From<&str> for AttrValue {
	fn from(text: &str) -> Self {
		Self::Text(text.to_owned())
	}
}
impl From<String> for AttrValue {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}
impl From<bool> for AttrValue {
	fn from(flag: bool) -> Self {
		Self::Bool(flag)
	}
}
impl From<i64> for AttrValue {
	fn from(number: i64) -> Self {
		Self::Text(number.to_string())
	}
}
impl From<i32> for AttrValue {
	fn from(number: i32) -> Self {
		Self::Text(number.to_string())
	}
}
impl From<f64> for AttrValue {
	fn from(number: f64) -> Self {
		Self::Text(number.to_string())
	}
}

pub type Hook<H> = Rc<dyn Fn(&mut H, &VNode<H>) -> Result<(), <H as Host>::Error>>;
pub type PairHook<H> = Rc<dyn Fn(&mut H, &VNode<H>, &VNode<H>) -> Result<(), <H as Host>::Error>>;
pub type RemoveHook<H> = Rc<dyn Fn(&mut H, &VNode<H>, Removal<H>) -> Result<(), <H as Host>::Error>>;

/// Lifecycle callbacks attached to a single node.
///
/// `create` and `prepatch`/`update`/`postpatch` receive `(old, new)`, where `old` is the empty placeholder during creation.
/// `insert` runs once the whole patch call has attached the tree.
/// A `remove` hook takes over the final [`Removal::done`] call for its node.
pub struct Hooks<H: Host> {
	pub init: Option<Hook<H>>,
	pub create: Option<PairHook<H>>,
	pub insert: Option<Hook<H>>,
	pub prepatch: Option<PairHook<H>>,
	pub update: Option<PairHook<H>>,
	pub postpatch: Option<PairHook<H>>,
	pub destroy: Option<Hook<H>>,
	pub remove: Option<RemoveHook<H>>,
}

impl<H: Host> Default for Hooks<H> {
	fn default() -> Self {
		Self { init: None, create: None, insert: None, prepatch: None, update: None, postpatch: None, destroy: None, remove: None }
	}
}

impl<H: Host> Clone for Hooks<H> {
	fn clone(&self) -> Self {
		Self {
			init: self.init.clone(),
			create: self.create.clone(),
			insert: self.insert.clone(),
			prepatch: self.prepatch.clone(),
			update: self.update.clone(),
			postpatch: self.postpatch.clone(),
			destroy: self.destroy.clone(),
			remove: self.remove.clone(),
		}
	}
}

impl<H: Host> Debug for Hooks<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let present = [
			("init", self.init.is_some()),
			("create", self.create.is_some()),
			("insert", self.insert.is_some()),
			("prepatch", self.prepatch.is_some()),
			("update", self.update.is_some()),
			("postpatch", self.postpatch.is_some()),
			("destroy", self.destroy.is_some()),
			("remove", self.remove.is_some()),
		];
		f.debug_list().entries(present.iter().filter(|(_, present)| *present).map(|(name, _)| name)).finish()
	}
}

/// The configuration bag of a node.
///
/// The patch engine reads only [`key`](`Data::key`), [`ns`](`Data::ns`) and [`hook`](`Data::hook`).
/// Everything else belongs to the [`modules`](`crate::modules`).
pub struct Data<H: Host> {
	pub key: Option<Key>,
	pub ns: Option<String>,
	pub attrs: BTreeMap<String, AttrValue>,
	pub class: BTreeMap<String, bool>,
	pub style: BTreeMap<String, String>,
	/// camelCase names, rendered as `data-*` attributes.
	pub dataset: BTreeMap<String, String>,
	pub hook: Hooks<H>,
}

impl<H: Host> Default for Data<H> {
	fn default() -> Self {
		Self {
			key: None,
			ns: None,
			attrs: BTreeMap::new(),
			class: BTreeMap::new(),
			style: BTreeMap::new(),
			dataset: BTreeMap::new(),
			hook: Hooks::default(),
		}
	}
}

impl<H: Host> Clone for Data<H> {
	fn clone(&self) -> Self {
		Self {
			key: self.key.clone(),
			ns: self.ns.clone(),
			attrs: self.attrs.clone(),
			class: self.class.clone(),
			style: self.style.clone(),
			dataset: self.dataset.clone(),
			hook: self.hook.clone(),
		}
	}
}

impl<H: Host> Debug for Data<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Data")
			.field("key", &self.key)
			.field("ns", &self.ns)
			.field("attrs", &self.attrs)
			.field("class", &self.class)
			.field("style", &self.style)
			.field("dataset", &self.dataset)
			.field("hook", &self.hook)
			.finish()
	}
}

impl<H: Host> Data<H> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	#[must_use]
	pub fn ns(mut self, ns: impl Into<String>) -> Self {
		self.ns = Some(ns.into());
		self
	}

	#[must_use]
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.attrs.insert(name.into(), value.into());
		self
	}

	#[must_use]
	pub fn class(mut self, name: impl Into<String>, enabled: bool) -> Self {
		self.class.insert(name.into(), enabled);
		self
	}

	#[must_use]
	pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
		self.style.insert(property.into(), value.into());
		self
	}

	#[must_use]
	pub fn dataset(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.dataset.insert(name.into(), value.into());
		self
	}

	#[must_use]
	pub fn on_init(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.hook.init = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_create(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.hook.create = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_insert(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.hook.insert = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_prepatch(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.hook.prepatch = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_update(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.hook.update = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_postpatch(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.hook.postpatch = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_destroy(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.hook.destroy = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn on_remove(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>, Removal<H>) -> Result<(), H::Error>) -> Self {
		self.hook.remove = Some(Rc::new(hook));
		self
	}
}

/// What a node contains. Text and children are mutually exclusive.
pub enum Content<H: Host> {
	Empty,
	Text(String),
	Children(Vec<VNode<H>>),
}

impl<H: Host> Clone for Content<H> {
	fn clone(&self) -> Self {
		match self {
			Content::Empty => Content::Empty,
			Content::Text(text) => Content::Text(text.clone()),
			Content::Children(children) => Content::Children(children.clone()),
		}
	}
}

impl<H: Host> Debug for Content<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Content::Empty => f.write_str("Empty"),
			Content::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Content::Children(children) => f.debug_tuple("Children").field(children).finish(),
		}
	}
}

/// A shared, immutable node description.
///
/// Cloning is cheap and yields the *same* node (see [`VNode::ptr_eq`]), which the patch engine skips entirely
/// when it meets it on both sides of a patch.
///
/// Each node is bound to at most one host node, once. Reusing a node that is already bound in a *different* position
/// of a new tree is a caller error reported as [`Error::AlreadyRealized`](`crate::Error::AlreadyRealized`).
pub struct VNode<H: Host>(Rc<Inner<H>>);

struct Inner<H: Host> {
	sel: Option<String>,
	data: Data<H>,
	content: Content<H>,
	elm: OnceCell<H::Node>,
}

impl<H: Host> Clone for VNode<H> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

impl<H: Host> Debug for VNode<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("VNode")
			.field("sel", &self.0.sel)
			.field("key", &self.0.data.key)
			.field("content", &self.0.content)
			.field("elm", &self.0.elm.get())
			.finish()
	}
}

impl<H: Host> VNode<H> {
	#[must_use]
	pub fn new(sel: Option<String>, data: Data<H>, content: Content<H>) -> Self {
		Self(Rc::new(Inner { sel, data, content, elm: OnceCell::new() }))
	}

	pub(crate) fn realized(sel: Option<String>, data: Data<H>, content: Content<H>, elm: H::Node) -> Self {
		Self(Rc::new(Inner { sel, data, content, elm: OnceCell::from(elm) }))
	}

	/// The placeholder passed as `old` to `create` hooks.
	pub(crate) fn empty() -> Self {
		Self::new(Some(String::new()), Data::default(), Content::Empty)
	}

	#[must_use]
	pub fn sel(&self) -> Option<&str> {
		self.0.sel.as_deref()
	}

	#[must_use]
	pub fn key(&self) -> Option<&Key> {
		self.0.data.key.as_ref()
	}

	#[must_use]
	pub fn data(&self) -> &Data<H> {
		&self.0.data
	}

	#[must_use]
	pub fn content(&self) -> &Content<H> {
		&self.0.content
	}

	/// The children, or an empty slice if this node has none.
	#[must_use]
	pub fn children(&self) -> &[VNode<H>] {
		match &self.0.content {
			Content::Children(children) => children,
			Content::Empty | Content::Text(_) => &[],
		}
	}

	#[must_use]
	pub fn text(&self) -> Option<&str> {
		match &self.0.content {
			Content::Text(text) => Some(text),
			Content::Empty | Content::Children(_) => None,
		}
	}

	/// The host node this node was patched into, if any.
	#[must_use]
	pub fn elm(&self) -> Option<&H::Node> {
		self.0.elm.get()
	}

	#[must_use]
	pub fn is_text(&self) -> bool {
		self.0.sel.is_none()
	}

	#[must_use]
	pub fn is_comment(&self) -> bool {
		self.0.sel.as_deref() == Some("!")
	}

	#[must_use]
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Rc::ptr_eq(&a.0, &b.0)
	}

	/// Fails with the rejected handle if this node is already bound.
	pub(crate) fn bind(&self, elm: H::Node) -> Result<(), H::Node> {
		self.0.elm.set(elm)
	}

	/// Rebuilds this subtree with `ns` on every element, stopping below `foreignObject`.
	///
	/// Nodes already in `ns` are returned as they are, so reused subtrees keep their identity and binding.
	pub(crate) fn with_namespace(self, ns: &str) -> Self {
		if self.is_text() || self.is_comment() || self.0.data.ns.as_deref() == Some(ns) {
			return self;
		}
		let (sel, mut data, content) = match Rc::try_unwrap(self.0) {
			Ok(inner) => (inner.sel, inner.data, inner.content),
			Err(shared) => (shared.sel.clone(), shared.data.clone(), shared.content.clone()),
		};
		data.ns = Some(ns.to_owned());
		let content = match content {
			Content::Children(children) if sel.as_deref() != Some("foreignObject") => {
				Content::Children(children.into_iter().map(|child| child.with_namespace(ns)).collect())
			}
			other => other,
		};
		Self::new(sel, data, content)
	}
}

/// Whether `a` and `b` describe the same logical node: equal keys (including both absent) and equal selectors.
#[must_use]
pub fn same_vnode<H: Host>(a: &VNode<H>, b: &VNode<H>) -> bool {
	a.key() == b.key() && a.sel() == b.sel()
}

/// A parsed `tag#id.class.class` selector.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Selector<'a> {
	pub tag: &'a str,
	pub id: Option<&'a str>,
	/// Space-separated.
	pub classes: Option<String>,
}

impl<'a> Selector<'a> {
	pub(crate) fn parse(sel: &'a str) -> Self {
		let hash = sel.find('#');
		let dot_from = hash.unwrap_or(0);
		let dot = sel[dot_from..].find('.').map(|i| i + dot_from);
		let id_end = dot.unwrap_or(sel.len());
		Self {
			tag: &sel[..hash.unwrap_or(sel.len()).min(id_end)],
			id: hash.filter(|&hash| hash < id_end).map(|hash| &sel[hash + 1..id_end]),
			classes: dot.map(|dot| sel[dot + 1..].replace('.', " ")),
		}
	}
}
