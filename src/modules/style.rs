//! Syncs [`Data::style`](`crate::Data::style`), property by property.

use crate::{host::Host, module::Module, VNode};

#[must_use]
pub fn module<H: Host + 'static>() -> Module<H> {
	Module::new("style").on_create(update::<H>).on_update(update::<H>)
}

fn update<H: Host>(host: &mut H, old: &VNode<H>, new: &VNode<H>) -> Result<(), H::Error> {
	let (old_style, style) = (&old.data().style, &new.data().style);
	if old_style.is_empty() && style.is_empty() {
		return Ok(());
	}
	let elm = match new.elm() {
		Some(elm) => elm,
		None => return Ok(()),
	};

	for property in old_style.keys().filter(|property| !style.contains_key(*property)) {
		host.set_style(elm, property, None)?;
	}
	for (property, value) in style {
		if old_style.get(property) != Some(value) {
			host.set_style(elm, property, Some(value.as_str()))?;
		}
	}
	Ok(())
}
