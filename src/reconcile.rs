//! The diff-and-patch pass.
//!
//! Every function here takes a `depth_limit`: The number of element levels it may still descend into, including the current one.
//! Reaching zero is a [`ValidationError::DepthLimitExceeded`].
//!
//! Errors abort the pass where they occur. Host mutations made before that point stay in place.
//! [`Root`](`crate::Root`) runs [`validate`] first to avoid this.

use crate::{
	props::{listener_bindings, update_props},
	Element, Host, Instance, PropertyBag, ValidationError,
};
use core::{cmp::max, mem};
use tracing::{trace, trace_span};

/// Reconciles one tree position: `instance` is what's there now, `element` is what should be there.
///
/// | `instance` | `element`         | Effect                                                                  |
/// |------------|-------------------|-------------------------------------------------------------------------|
/// | none       | none              | Nothing.                                                                |
/// | none       | some              | Mount: [`instantiate`] and append to `parent`.                          |
/// | some       | none              | Unmount: Release listeners and remove from `parent`.                    |
/// | some       | same [`Tag`](`crate::Tag`) | Update in place. The host node is kept.                        |
/// | some       | other tag         | Replace: [`instantiate`], then swap it in at the same position.         |
///
/// Returns the instance now occupying the position.
///
/// # Errors
///
/// If `element` (or a descendant that needs to be visited) has invalid children or the depth limit is reached.
pub fn reconcile<H: Host>(
	host: &mut H,
	parent: &H::Node,
	instance: Option<Instance<H::Node>>,
	element: Option<&Element>,
	depth_limit: usize,
) -> Result<Option<Instance<H::Node>>, ValidationError> {
	match (instance, element) {
		(None, None) => Ok(None),

		(None, Some(element)) => {
			let span = trace_span!("Mounting", tag = %element.tag());
			let _enter = span.enter();
			let instance = instantiate(host, element, depth_limit)?;
			host.append_child(parent, &instance.host_node);
			Ok(Some(instance))
		}

		(Some(instance), None) => {
			unmount(host, parent, instance);
			Ok(None)
		}

		(Some(mut instance), Some(element)) if instance.element.tag() == element.tag() => {
			let span = trace_span!("Updating", tag = %element.tag());
			let _enter = span.enter();
			if depth_limit == 0 {
				return Err(ValidationError::DepthLimitExceeded { tag: element.tag().name().to_owned() });
			}
			let children = element.children()?;

			update_props(host, &instance.host_node, instance.element.props(), element.props());
			instance.element = element.clone();
			let child_instances = mem::take(&mut instance.child_instances);
			instance.child_instances = reconcile_children(host, &instance.host_node, child_instances, children, depth_limit - 1)?;
			Ok(Some(instance))
		}

		(Some(instance), Some(element)) => {
			let span = trace_span!("Replacing", from = %instance.element.tag(), to = %element.tag());
			let _enter = span.enter();
			let replacement = instantiate(host, element, depth_limit)?;
			release(host, &instance);
			host.replace_child(parent, &instance.host_node, &replacement.host_node);
			Ok(Some(replacement))
		}
	}
}

/// Reconciles a child list strictly by position.
///
/// Index `i` of `child_instances` is reconciled against index `i` of `elements`, missing entries on either side count as none.
/// There are no keys: Inserting or removing anywhere but the end shifts all later siblings, which are then updated (or replaced) in place.
///
/// Returns the surviving instances in order, with unmounted positions dropped.
///
/// # Errors
///
/// See [`reconcile`].
pub fn reconcile_children<H: Host>(
	host: &mut H,
	parent: &H::Node,
	child_instances: Vec<Instance<H::Node>>,
	elements: &[Element],
	depth_limit: usize,
) -> Result<Vec<Instance<H::Node>>, ValidationError> {
	let span = trace_span!("Reconciling children", "child_instances.len()" = child_instances.len(), "elements.len()" = elements.len());
	let _enter = span.enter();

	let count = max(child_instances.len(), elements.len());
	let mut previous = child_instances.into_iter();
	let mut next_instances = Vec::with_capacity(elements.len());
	for i in 0..count {
		if let Some(instance) = reconcile(host, parent, previous.next(), elements.get(i), depth_limit)? {
			next_instances.push(instance)
		}
	}
	Ok(next_instances)
}

/// Creates the host node for `element` and its whole subtree, with props applied.
///
/// The returned instance's host node isn't attached to any parent yet.
///
/// # Errors
///
/// If any element in the subtree has invalid children or the depth limit is reached.
pub fn instantiate<H: Host>(host: &mut H, element: &Element, depth_limit: usize) -> Result<Instance<H::Node>, ValidationError> {
	if depth_limit == 0 {
		return Err(ValidationError::DepthLimitExceeded { tag: element.tag().name().to_owned() });
	}
	let children = element.children()?;

	let host_node = if element.tag().is_text() {
		if cfg!(feature = "dangerous-logging") {
			trace!(node_value = ?element.node_value(), "Creating text node.");
		} else {
			trace!("Creating text node.");
		}
		host.create_text_node()
	} else {
		trace!(tag = %element.tag(), "Creating element.");
		host.create_element(element.tag().name())
	};
	update_props(host, &host_node, &PropertyBag::new(), element.props());

	let child_instances = children
		.iter()
		.map(|child| instantiate(host, child, depth_limit - 1))
		.collect::<Result<Vec<_>, _>>()?;
	for child_instance in &child_instances {
		host.append_child(&host_node, &child_instance.host_node)
	}

	Ok(Instance {
		host_node,
		element: element.clone(),
		child_instances,
	})
}

/// Releases the listeners of `instance`'s subtree and removes its host node from `parent`.
pub fn unmount<H: Host>(host: &mut H, parent: &H::Node, instance: Instance<H::Node>) {
	let span = trace_span!("Unmounting", tag = %instance.element.tag());
	let _enter = span.enter();
	release(host, &instance);
	host.remove_child(parent, &instance.host_node);
}

/// Unregisters the listeners of every element in `instance`'s subtree, without touching host nodes.
///
/// Used before a subtree is detached, since delegated listeners would otherwise outlive it.
pub fn release<H: Host>(host: &mut H, instance: &Instance<H::Node>) {
	let span = trace_span!("Releasing listeners", tag = %instance.element.tag());
	let _enter = span.enter();
	for (event, listener) in listener_bindings(instance.element.props()) {
		host.remove_listener(&event, listener)
	}
	for child_instance in &instance.child_instances {
		release(host, child_instance)
	}
}

/// Checks the whole tree under `element` for errors [`instantiate`] or [`reconcile`] could run into, without touching a host.
///
/// # Errors
///
/// The first error found, in depth-first order.
pub fn validate(element: &Element, depth_limit: usize) -> Result<(), ValidationError> {
	if depth_limit == 0 {
		return Err(ValidationError::DepthLimitExceeded { tag: element.tag().name().to_owned() });
	}
	element.children()?.iter().try_for_each(|child| validate(child, depth_limit - 1))
}
