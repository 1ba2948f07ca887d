use crate::{Listener, Value};

/// The render target the reconciler mutates: A document-like tree of host nodes plus an ambient event dispatcher.
///
/// All operations are synchronous and can't fail from the reconciler's point of view.
/// Implementations log host-level failures (for example a rejected tag name) instead of reporting them.
///
/// # Event delegation
///
/// Listeners aren't attached to nodes. [`Host::add_listener`] registers on a single document-level dispatcher keyed by event name,
/// so a listener hears matching events from anywhere in the document, in registration order.
///
/// The same (event, [`Listener`]) pair may be added more than once, e.g. by several nodes that share a [`Listener`].
/// Implementations must count these registrations and only stop delivering events once every one of them was removed again.
pub trait Host {
	/// A cheap handle to one host node. Clones refer to the same node.
	type Node: Clone;

	fn create_element(&mut self, tag: &str) -> Self::Node;
	fn create_text_node(&mut self) -> Self::Node;

	/// Attaches `child` as the last child of `parent`.
	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
	/// Puts `new` in the place of `old`, which is detached.
	fn replace_child(&mut self, parent: &Self::Node, old: &Self::Node, new: &Self::Node);
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);

	/// Assigns `value` verbatim to the node's field `key`.
	fn set_field(&mut self, node: &Self::Node, key: &str, value: &Value);
	/// Resets the node's field `key` to null.
	fn clear_field(&mut self, node: &Self::Node, key: &str);

	fn add_listener(&mut self, event: &str, listener: &Listener);
	fn remove_listener(&mut self, event: &str, listener: &Listener);
}
