//! Syncs [`Data::dataset`](`crate::Data::dataset`) as `data-*` attributes.

use crate::{host::Host, module::Module, VNode};

#[must_use]
pub fn module<H: Host + 'static>() -> Module<H> {
	Module::new("dataset").on_create(update::<H>).on_update(update::<H>)
}

fn update<H: Host>(host: &mut H, old: &VNode<H>, new: &VNode<H>) -> Result<(), H::Error> {
	let (old_dataset, dataset) = (&old.data().dataset, &new.data().dataset);
	if old_dataset.is_empty() && dataset.is_empty() {
		return Ok(());
	}
	let elm = match new.elm() {
		Some(elm) => elm,
		None => return Ok(()),
	};

	for name in old_dataset.keys().filter(|name| !dataset.contains_key(*name)) {
		host.remove_attribute(elm, &attribute_name(name))?;
	}
	for (name, value) in dataset {
		if old_dataset.get(name) != Some(value) {
			host.set_attribute(elm, &attribute_name(name), value)?;
		}
	}
	Ok(())
}

/// `fooBar` → `data-foo-bar`
fn attribute_name(name: &str) -> String {
	let mut attribute = String::with_capacity(name.len() + 8);
	attribute.push_str("data-");
	for c in name.chars() {
		if c.is_ascii_uppercase() {
			attribute.push('-');
			attribute.push(c.to_ascii_lowercase());
		} else {
			attribute.push(c);
		}
	}
	attribute
}
