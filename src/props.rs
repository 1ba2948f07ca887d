use crate::{element::event_name, Host, Listener, PropertyBag};
use hashbrown::HashSet;
use tracing::{trace, trace_span, warn};

/// Moves the attributes and listeners of `node` from `prev` to `next`.
///
/// Removals happen first: Listener bindings only present in `prev` are unregistered and attributes missing from `next` are cleared.
/// Then every attribute in `next` is assigned and listener bindings new in `next` are registered.
/// Bindings present in both bags stay registered untouched, so their position in the dispatcher's order is kept.
///
/// Listeners go to the host's document-level dispatcher, not to `node`. See [event delegation](`Host`#event-delegation).
pub fn update_props<H: Host>(host: &mut H, node: &H::Node, prev: &PropertyBag, next: &PropertyBag) {
	let span = trace_span!("update_props", "prev.len()" = prev.len(), "next.len()" = next.len());
	let _enter = span.enter();

	let prev_bindings = listener_bindings(prev);
	let next_bindings = listener_bindings(next);
	let prev_set = prev_bindings.iter().collect::<HashSet<_>>();
	let next_set = next_bindings.iter().collect::<HashSet<_>>();

	for binding in &prev_bindings {
		if !next_set.contains(binding) {
			let (event, listener) = binding;
			trace!(event = event.as_str(), ?listener, "Removing listener.");
			host.remove_listener(event, listener)
		}
	}

	for (key, _) in prev.attributes() {
		if !next.contains_key(key) {
			trace!(key, "Clearing field.");
			host.clear_field(node, key)
		}
	}

	for (key, value) in next.attributes() {
		if cfg!(feature = "dangerous-logging") {
			trace!(key, %value, "Assigning field.");
		} else {
			trace!(key, kind = value.kind(), "Assigning field.");
		}
		host.set_field(node, key, value)
	}

	for binding in &next_bindings {
		if !prev_set.contains(binding) {
			let (event, listener) = binding;
			trace!(event = event.as_str(), ?listener, "Adding listener.");
			host.add_listener(event, listener)
		}
	}
}

/// Collects the distinct (event name, listener) bindings of `props` in key order.
pub(crate) fn listener_bindings(props: &PropertyBag) -> Vec<(String, &Listener)> {
	let mut seen = HashSet::new();
	props
		.listeners()
		.filter_map(|(key, value)| match value.as_listener() {
			Some(listener) => Some((event_name(key), listener)),
			None => {
				warn!("Ignoring {} at listener key {:?}.", value.kind(), key);
				None
			}
		})
		.filter(|binding| seen.insert(binding.clone()))
		.collect()
}
