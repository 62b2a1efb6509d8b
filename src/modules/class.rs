//! Syncs [`Data::class`](`crate::Data::class`) through [`Host::set_class`].

use crate::{host::Host, module::Module, VNode};

#[must_use]
pub fn module<H: Host + 'static>() -> Module<H> {
	Module::new("class").on_create(update::<H>).on_update(update::<H>)
}

fn update<H: Host>(host: &mut H, old: &VNode<H>, new: &VNode<H>) -> Result<(), H::Error> {
	let (old_class, class) = (&old.data().class, &new.data().class);
	if old_class.is_empty() && class.is_empty() {
		return Ok(());
	}
	let elm = match new.elm() {
		Some(elm) => elm,
		None => return Ok(()),
	};

	for (name, _) in old_class.iter().filter(|(name, enabled)| **enabled && !class.contains_key(name.as_str())) {
		host.set_class(elm, name, false)?;
	}
	for (name, &enabled) in class {
		if old_class.get(name) != Some(&enabled) {
			host.set_class(elm, name, enabled)?;
		}
	}
	Ok(())
}
