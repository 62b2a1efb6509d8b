//! Syncs [`Data::attrs`](`crate::Data::attrs`).

use crate::{host::Host, module::Module, vnode::AttrValue, VNode};

#[must_use]
pub fn module<H: Host + 'static>() -> Module<H> {
	Module::new("attributes").on_create(update::<H>).on_update(update::<H>)
}

fn update<H: Host>(host: &mut H, old: &VNode<H>, new: &VNode<H>) -> Result<(), H::Error> {
	let (old_attrs, attrs) = (&old.data().attrs, &new.data().attrs);
	if old_attrs.is_empty() && attrs.is_empty() {
		return Ok(());
	}
	let elm = match new.elm() {
		Some(elm) => elm,
		None => return Ok(()),
	};

	for (name, value) in attrs {
		if old_attrs.get(name) == Some(value) {
			continue;
		}
		match value {
			AttrValue::Bool(true) => host.set_attribute(elm, name, "")?,
			AttrValue::Bool(false) => host.remove_attribute(elm, name)?,
			AttrValue::Text(text) => host.set_attribute(elm, name, text)?,
		}
	}
	for name in old_attrs.keys().filter(|name| !attrs.contains_key(*name)) {
		host.remove_attribute(elm, name)?;
	}
	Ok(())
}
