//! Hook bundles that observe every node's lifecycle, and the deferred removal token.

use crate::{host::Host, vnode::VNode};
use core::{
	cell::Cell,
	fmt::{self, Debug, Formatter},
};
use std::{borrow::Cow, rc::Rc};
use tracing::trace;

type PhaseHook<H> = Box<dyn Fn(&mut H) -> Result<(), <H as Host>::Error>>;
type NodeHook<H> = Box<dyn Fn(&mut H, &VNode<H>) -> Result<(), <H as Host>::Error>>;
type PairHook<H> = Box<dyn Fn(&mut H, &VNode<H>, &VNode<H>) -> Result<(), <H as Host>::Error>>;
type RemoveHook<H> = Box<dyn Fn(&mut H, &VNode<H>, Removal<H>) -> Result<(), <H as Host>::Error>>;

/// A named set of optional lifecycle callbacks.
///
/// Modules are registered once through [`init`](`crate::init`). For each phase, every module that has the hook is called,
/// in registration order, for every node. Modules that don't care about a node are expected to return quickly.
///
/// | hook      | arguments                  | when                                              |
/// |-----------|----------------------------|---------------------------------------------------|
/// | `pre`     | none                       | start of each patch call                          |
/// | `create`  | `(empty, new)`             | after a host node was created, before its children |
/// | `update`  | `(old, new)`               | when a node is patched in place                   |
/// | `destroy` | `node`                     | bottom-up, for each node of a removed subtree     |
/// | `remove`  | `(node, removal)`          | for the root of each removed element              |
/// | `post`    | none                       | end of each patch call                            |
pub struct Module<H: Host> {
	name: Cow<'static, str>,
	pub(crate) pre: Option<PhaseHook<H>>,
	pub(crate) create: Option<PairHook<H>>,
	pub(crate) update: Option<PairHook<H>>,
	pub(crate) destroy: Option<NodeHook<H>>,
	pub(crate) remove: Option<RemoveHook<H>>,
	pub(crate) post: Option<PhaseHook<H>>,
}

impl<H: Host> Module<H> {
	#[must_use]
	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self { name: name.into(), pre: None, create: None, update: None, destroy: None, remove: None, post: None }
	}

	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	#[must_use]
	pub fn on_pre(mut self, hook: impl 'static + Fn(&mut H) -> Result<(), H::Error>) -> Self {
		self.pre = Some(Box::new(hook));
		self
	}

	#[must_use]
	pub fn on_create(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.create = Some(Box::new(hook));
		self
	}

	#[must_use]
	pub fn on_update(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.update = Some(Box::new(hook));
		self
	}

	#[must_use]
	pub fn on_destroy(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>) -> Result<(), H::Error>) -> Self {
		self.destroy = Some(Box::new(hook));
		self
	}

	/// The hook receives its own [`Removal`] token and must call [`Removal::done`] on it exactly once,
	/// possibly during a later patch call or from outside the engine entirely.
	#[must_use]
	pub fn on_remove(mut self, hook: impl 'static + Fn(&mut H, &VNode<H>, Removal<H>) -> Result<(), H::Error>) -> Self {
		self.remove = Some(Box::new(hook));
		self
	}

	#[must_use]
	pub fn on_post(mut self, hook: impl 'static + Fn(&mut H) -> Result<(), H::Error>) -> Self {
		self.post = Some(Box::new(hook));
		self
	}
}

impl<H: Host> Debug for Module<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Module")
			.field("name", &self.name)
			.field("pre", &self.pre.is_some())
			.field("create", &self.create.is_some())
			.field("update", &self.update.is_some())
			.field("destroy", &self.destroy.is_some())
			.field("remove", &self.remove.is_some())
			.field("post", &self.post.is_some())
			.finish()
	}
}

/// One share of a pending element removal.
///
/// Every module with a `remove` hook receives a share, and so does the node's own `remove` hook (or the engine, if there is none).
/// The element is detached from its current parent once the last share is [`done`](`Removal::done`).
/// Dropping a share without calling `done` leaves the element attached.
pub struct Removal<H: Host>(Rc<Pending<H>>);

struct Pending<H: Host> {
	elm: H::Node,
	remaining: Cell<usize>,
}

impl<H: Host> Removal<H> {
	pub(crate) fn new(elm: H::Node, shares: usize) -> Self {
		Self(Rc::new(Pending { elm, remaining: Cell::new(shares) }))
	}

	pub(crate) fn share(&self) -> Self {
		Self(Rc::clone(&self.0))
	}

	/// The element awaiting removal.
	#[must_use]
	pub fn elm(&self) -> &H::Node {
		&self.0.elm
	}

	/// How many shares (including this one) have not called [`done`](`Removal::done`) yet.
	#[must_use]
	pub fn remaining(&self) -> usize {
		self.0.remaining.get()
	}

	/// Marks this share complete, detaching the element if it was the last one.
	///
	/// # Errors
	///
	/// Iff detaching the element fails in the host.
	pub fn done(self, host: &mut H) -> Result<(), H::Error> {
		let remaining = self.0.remaining.get().saturating_sub(1);
		self.0.remaining.set(remaining);
		if remaining > 0 {
			trace!(remaining, "Removal share done.");
			return Ok(());
		}
		match host.parent_node(&self.0.elm) {
			Some(parent) => host.remove_child(&parent, &self.0.elm),
			None => {
				trace!("Removed element was already detached.");
				Ok(())
			}
		}
	}
}

impl<H: Host> Debug for Removal<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Removal").field("elm", &self.0.elm).field("remaining", &self.0.remaining.get()).finish()
	}
}
