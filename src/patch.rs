//! The patch engine and its keyed children reconciler.

use crate::{
	error::Error,
	host::Host,
	load::to_vnode,
	module::{Module, Removal},
	vnode::{same_vnode, Content, Key, Selector, VNode},
};
use core::slice;
use hashbrown::HashMap;
use tracing::{debug, error, instrument, trace, trace_span, warn};

/// Engine settings that aren't modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
	/// How deeply nested a tree may be before patching fails with [`Error::DepthLimit`].
	pub depth_limit: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self { depth_limit: 1024 }
	}
}

/// The previous state to patch against.
#[derive(Debug)]
pub enum Old<H: Host> {
	/// A node returned by an earlier patch call.
	VNode(VNode<H>),
	/// A host element that was never patched. Its current subtree is loaded and reconciled against.
	Element(H::Node),
}

impl<H: Host> From<VNode<H>> for Old<H> {
	fn from(vnode: VNode<H>) -> Self {
		Self::VNode(vnode)
	}
}

impl<H: Host> From<&VNode<H>> for Old<H> {
	fn from(vnode: &VNode<H>) -> Self {
		Self::VNode(vnode.clone())
	}
}

/// Creates a [`Patcher`] with the given modules and [`Config::default`].
#[must_use]
pub fn init<H: Host>(modules: Vec<Module<H>>) -> Patcher<H> {
	init_with_config(modules, Config::default())
}

#[must_use]
pub fn init_with_config<H: Host>(modules: Vec<Module<H>>, config: Config) -> Patcher<H> {
	debug!(modules = ?modules.iter().map(Module::name).collect::<Vec<_>>(), ?config, "Initialising patcher.");
	Patcher { modules, config, empty: VNode::empty() }
}

/// A patch function bound to a fixed, ordered list of [`Module`]s.
///
/// # Correct Use
///
/// Each [`VNode`] describes one host node for one render. Pass the value returned by [`Patcher::patch`] as `old` to the next call,
/// and build the `new` tree fresh each time. Reusing an unchanged subtree (by cloning its [`VNode`]) in the same position is fine
/// and skips it entirely.
///
/// Only one patch call may touch a given host subtree at a time.
///
/// # Failure
///
/// Any error from the host or from a hook aborts the call immediately. Mutations applied up to that point remain in the host tree.
#[derive(Debug)]
pub struct Patcher<H: Host> {
	modules: Vec<Module<H>>,
	config: Config,
	empty: VNode<H>,
}

impl<H: Host> Patcher<H> {
	#[must_use]
	pub fn config(&self) -> Config {
		self.config
	}

	pub fn modules(&self) -> impl Iterator<Item = &Module<H>> {
		self.modules.iter()
	}

	/// Makes the host tree match `new`, starting from `old`, and returns `new` bound to its host nodes.
	///
	/// If `old` and `new` aren't the same logical node (same key and selector), `new` is created from scratch,
	/// inserted in front of `old` and `old` is removed.
	///
	/// # Errors
	///
	/// - [`Error::UnrealizedOld`] if an old node was never patched.
	/// - [`Error::AlreadyRealized`] if a new node was already patched elsewhere.
	/// - [`Error::DepthLimit`] if the tree nests deeper than [`Config::depth_limit`].
	/// - [`Error::Host`] for any host or hook failure.
	#[instrument(skip_all)]
	pub fn patch(&self, host: &mut H, old: impl Into<Old<H>>, new: VNode<H>) -> Result<VNode<H>, Error<H::Error>> {
		let mut inserted = Vec::new();

		for module in &self.modules {
			if let Some(pre) = &module.pre {
				pre(host)?;
			}
		}

		let old = match old.into() {
			Old::VNode(vnode) => vnode,
			Old::Element(element) => {
				trace!(?element, "Adopting host element.");
				to_vnode(host, &element)
			}
		};
		realized_old(&old)?;

		if same_vnode(&old, &new) {
			self.patch_vnode(host, &old, &new, &mut inserted, 0)?;
		} else {
			let span = trace_span!("Replacing root", old = ?old.sel(), new = ?new.sel());
			let _enter = span.enter();
			let old_elm = realized_old(&old)?.clone();
			let parent = host.parent_node(&old_elm);
			let new_elm = self.create_elm(host, &new, &mut inserted, 0)?;
			match parent {
				Some(parent) => {
					host.insert_before(&parent, &new_elm, Some(&old_elm))?;
					self.remove_vnodes(host, &parent, slice::from_ref(&old))?;
				}
				None => warn!("The old root is detached, so the new root was created but not inserted."),
			}
		}

		debug!(inserted = inserted.len(), "Running insert hooks.");
		for vnode in &inserted {
			if let Some(insert) = &vnode.data().hook.insert {
				insert(host, vnode)?;
			}
		}

		for module in &self.modules {
			if let Some(post) = &module.post {
				post(host)?;
			}
		}

		Ok(new)
	}

	fn check_depth(&self, depth: usize) -> Result<(), Error<H::Error>> {
		if depth > self.config.depth_limit {
			error!(limit = self.config.depth_limit, "Depth limit reached");
			return Err(Error::DepthLimit { limit: self.config.depth_limit });
		}
		Ok(())
	}

	/// Creates the host subtree for `vnode` (detached), binds every node in it and returns its root.
	fn create_elm(&self, host: &mut H, vnode: &VNode<H>, inserted: &mut Vec<VNode<H>>, depth: usize) -> Result<H::Node, Error<H::Error>> {
		self.check_depth(depth)?;
		let hook = &vnode.data().hook;
		if let Some(init) = &hook.init {
			init(host, vnode)?;
		}

		let elm = match vnode.sel() {
			None => {
				let text = vnode.text().unwrap_or_default();
				trace!(text = %loggable(text), "Creating text node");
				host.create_text_node(text)?
			}
			Some(_) if vnode.is_comment() => {
				let text = vnode.text().unwrap_or_default();
				trace!(comment = %loggable(text), "Creating comment");
				host.create_comment(text)?
			}
			Some(sel) => {
				let span = trace_span!("Creating element", sel);
				let _enter = span.enter();
				let Selector { tag, id, classes } = Selector::parse(sel);
				let elm = host.create_element(tag, vnode.data().ns.as_deref())?;
				if let Some(id) = id {
					host.set_attribute(&elm, "id", id)?;
				}
				if let Some(classes) = classes {
					host.set_attribute(&elm, "class", &classes)?;
				}
				elm
			}
		};
		vnode.bind(elm.clone()).map_err(|_| Error::AlreadyRealized { sel: vnode.sel().map(str::to_owned) })?;

		for module in &self.modules {
			if let Some(create) = &module.create {
				create(host, &self.empty, vnode)?;
			}
		}

		if !vnode.is_text() && !vnode.is_comment() {
			match vnode.content() {
				Content::Children(children) => {
					for child in children {
						let child = self.create_elm(host, child, inserted, depth + 1)?;
						host.append_child(&elm, &child)?;
					}
				}
				Content::Text(text) if !text.is_empty() => {
					let text = host.create_text_node(text)?;
					host.append_child(&elm, &text)?;
				}
				Content::Text(_) | Content::Empty => (),
			}
		}

		if let Some(create) = &hook.create {
			create(host, &self.empty, vnode)?;
		}
		if hook.insert.is_some() {
			inserted.push(vnode.clone());
		}
		Ok(elm)
	}

	fn add_vnodes(
		&self,
		host: &mut H,
		parent: &H::Node,
		before: Option<&H::Node>,
		vnodes: &[VNode<H>],
		inserted: &mut Vec<VNode<H>>,
		depth: usize,
	) -> Result<(), Error<H::Error>> {
		for vnode in vnodes {
			let elm = self.create_elm(host, vnode, inserted, depth)?;
			host.insert_before(parent, &elm, before)?;
		}
		Ok(())
	}

	/// Removes each of `vnodes` from `parent`, after firing destroy hooks for its whole subtree.
	///
	/// Elements and comments detach only once every [`Removal`] share is done.
	fn remove_vnodes<'a>(&self, host: &mut H, parent: &H::Node, vnodes: impl IntoIterator<Item = &'a VNode<H>>) -> Result<(), Error<H::Error>>
	where
		H: 'a,
	{
		for vnode in vnodes {
			let span = trace_span!("Removing", sel = ?vnode.sel(), key = ?vnode.key());
			let _enter = span.enter();
			let elm = realized_old(vnode)?;
			self.invoke_destroy_hook(host, vnode)?;

			if vnode.is_text() {
				host.remove_child(parent, elm)?;
				continue;
			}

			let shares = self.modules.iter().filter(|module| module.remove.is_some()).count() + 1;
			let removal = Removal::new(elm.clone(), shares);
			for module in &self.modules {
				if let Some(remove) = &module.remove {
					remove(host, vnode, removal.share())?;
				}
			}
			match &vnode.data().hook.remove {
				Some(remove) => remove(host, vnode, removal)?,
				None => removal.done(host)?,
			}
		}
		Ok(())
	}

	/// Children first, so each subtree is torn down bottom-up.
	fn invoke_destroy_hook(&self, host: &mut H, vnode: &VNode<H>) -> Result<(), Error<H::Error>> {
		for child in vnode.children() {
			self.invoke_destroy_hook(host, child)?;
		}
		if let Some(destroy) = &vnode.data().hook.destroy {
			destroy(host, vnode)?;
		}
		for module in &self.modules {
			if let Some(destroy) = &module.destroy {
				destroy(host, vnode)?;
			}
		}
		Ok(())
	}

	fn patch_vnode(&self, host: &mut H, old: &VNode<H>, new: &VNode<H>, inserted: &mut Vec<VNode<H>>, depth: usize) -> Result<(), Error<H::Error>> {
		if VNode::ptr_eq(old, new) {
			trace!(sel = ?new.sel(), "Skipping identical node.");
			return Ok(());
		}
		self.check_depth(depth)?;
		let span = trace_span!("Patching", sel = ?new.sel(), key = ?new.key());
		let _enter = span.enter();

		let elm = realized_old(old)?.clone();
		new.bind(elm.clone()).map_err(|_| Error::AlreadyRealized { sel: new.sel().map(str::to_owned) })?;

		let hook = &new.data().hook;
		if let Some(prepatch) = &hook.prepatch {
			prepatch(host, old, new)?;
		}
		for module in &self.modules {
			if let Some(update) = &module.update {
				update(host, old, new)?;
			}
		}
		if let Some(update) = &hook.update {
			update(host, old, new)?;
		}

		match (old.content(), new.content()) {
			(Content::Text(old_text), Content::Text(new_text)) => {
				if old_text != new_text {
					trace!(text = %loggable(new_text), "Setting text");
					host.set_text_content(&elm, new_text)?;
				}
			}
			(Content::Children(old_children), Content::Text(new_text)) => {
				self.remove_vnodes(host, &elm, old_children)?;
				host.set_text_content(&elm, new_text)?;
			}
			(Content::Empty, Content::Text(new_text)) => host.set_text_content(&elm, new_text)?,

			(Content::Children(old_children), Content::Children(new_children)) => {
				self.update_children(host, &elm, old_children, new_children, inserted, depth + 1)?;
			}
			(Content::Text(_), Content::Children(new_children)) => {
				host.set_text_content(&elm, "")?;
				self.add_vnodes(host, &elm, None, new_children, inserted, depth + 1)?;
			}
			(Content::Empty, Content::Children(new_children)) => self.add_vnodes(host, &elm, None, new_children, inserted, depth + 1)?,

			(Content::Children(old_children), Content::Empty) => self.remove_vnodes(host, &elm, old_children)?,
			(Content::Text(_), Content::Empty) => host.set_text_content(&elm, "")?,
			(Content::Empty, Content::Empty) => (),
		}

		if let Some(postpatch) = &hook.postpatch {
			postpatch(host, old, new)?;
		}
		Ok(())
	}

	/// Four-cursor keyed diff of two sibling lists.
	///
	/// Each round tries, in order: start/start, end/end, start/end (moves old start behind old end) and end/start
	/// (moves old end in front of old start). If none match, the new start node is looked up by key among the
	/// remaining old nodes, and moved or created in front of old start. Unkeyed nodes are never looked up.
	#[allow(clippy::too_many_lines)]
	fn update_children(
		&self,
		host: &mut H,
		parent: &H::Node,
		old_children: &[VNode<H>],
		new_children: &[VNode<H>],
		inserted: &mut Vec<VNode<H>>,
		depth: usize,
	) -> Result<(), Error<H::Error>> {
		// Slots are cleared once their node was moved out of order.
		let mut old: Vec<Option<&VNode<H>>> = old_children.iter().map(Some).collect();
		let (mut old_start, mut old_end) = (0, old.len());
		let (mut new_start, mut new_end) = (0, new_children.len());
		let mut keyed: Option<HashMap<&Key, usize>> = None;

		while old_start < old_end && new_start < new_end {
			let (old_first, old_last) = match (old[old_start], old[old_end - 1]) {
				(None, _) => {
					old_start += 1;
					continue;
				}
				(_, None) => {
					old_end -= 1;
					continue;
				}
				(Some(first), Some(last)) => (first, last),
			};
			let new_first = &new_children[new_start];
			let new_last = &new_children[new_end - 1];

			if same_vnode(old_first, new_first) {
				self.patch_vnode(host, old_first, new_first, inserted, depth)?;
				old_start += 1;
				new_start += 1;
			} else if same_vnode(old_last, new_last) {
				self.patch_vnode(host, old_last, new_last, inserted, depth)?;
				old_end -= 1;
				new_end -= 1;
			} else if same_vnode(old_first, new_last) {
				self.patch_vnode(host, old_first, new_last, inserted, depth)?;
				let after = host.next_sibling(realized_old(old_last)?);
				trace!(key = ?old_first.key(), "Moving start to end");
				host.insert_before(parent, realized_old(old_first)?, after.as_ref())?;
				old_start += 1;
				new_end -= 1;
			} else if same_vnode(old_last, new_first) {
				self.patch_vnode(host, old_last, new_first, inserted, depth)?;
				trace!(key = ?old_last.key(), "Moving end to start");
				host.insert_before(parent, realized_old(old_last)?, Some(realized_old(old_first)?))?;
				old_end -= 1;
				new_start += 1;
			} else {
				let keyed = keyed.get_or_insert_with(|| key_map(old_children, old_start, old_end));
				let candidate = new_first
					.key()
					.and_then(|key| keyed.get(key).copied())
					.filter(|&index| (old_start..old_end).contains(&index))
					.and_then(|index| old[index].filter(|candidate| candidate.sel() == new_first.sel()).map(|candidate| (index, candidate)));
				match candidate {
					Some((index, candidate)) => {
						self.patch_vnode(host, candidate, new_first, inserted, depth)?;
						old[index] = None;
						trace!(key = ?candidate.key(), "Moving keyed match");
						host.insert_before(parent, realized_old(candidate)?, Some(realized_old(old_first)?))?;
					}
					None => {
						let elm = self.create_elm(host, new_first, inserted, depth)?;
						host.insert_before(parent, &elm, Some(realized_old(old_first)?))?;
					}
				}
				new_start += 1;
			}
		}

		if new_start < new_end {
			let before = new_children.get(new_end).and_then(VNode::elm).cloned();
			self.add_vnodes(host, parent, before.as_ref(), &new_children[new_start..new_end], inserted, depth)?;
		} else if old_start < old_end {
			self.remove_vnodes(host, parent, old[old_start..old_end].iter().copied().flatten())?;
		}
		Ok(())
	}
}

/// Keys of `children[start..end]` to their index. The last of duplicate keys wins.
fn key_map<H: Host>(children: &[VNode<H>], start: usize, end: usize) -> HashMap<&Key, usize> {
	let mut map = HashMap::with_capacity(end - start);
	for (index, child) in children.iter().enumerate().take(end).skip(start) {
		if let Some(key) = child.key() {
			if let Some(previous) = map.insert(key, index) {
				warn!(%key, previous, index, "Duplicate sibling key. The later node wins.");
			}
		}
	}
	map
}

fn realized_old<H: Host>(vnode: &VNode<H>) -> Result<&H::Node, Error<H::Error>> {
	vnode.elm().ok_or_else(|| Error::UnrealizedOld { sel: vnode.sel().map(str::to_owned) })
}

#[cfg(feature = "dangerous-logging")]
fn loggable(text: &str) -> &str {
	text
}

#[cfg(not(feature = "dangerous-logging"))]
fn loggable(text: &str) -> String {
	format!("<{} bytes>", text.len())
}
