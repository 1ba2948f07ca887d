use crate::Element;

/// A live host node paired with the [`Element`] it was last reconciled against.
///
/// `child_instances` is index-aligned with that element's children.
/// The host node is owned exclusively: It's created with the instance, patched in place by updates
/// and only detached when the instance is unmounted or replaced.
#[derive(Debug)]
pub struct Instance<N> {
	pub(crate) host_node: N,
	pub(crate) element: Element,
	pub(crate) child_instances: Vec<Instance<N>>,
}
impl<N> Instance<N> {
	#[must_use]
	pub fn host_node(&self) -> &N {
		&self.host_node
	}

	#[must_use]
	pub fn element(&self) -> &Element {
		&self.element
	}

	#[must_use]
	pub fn child_instances(&self) -> &[Instance<N>] {
		&self.child_instances
	}

	/// Walks down by child index. An empty `path` returns `self`.
	#[must_use]
	pub fn descendant(&self, path: &[usize]) -> Option<&Instance<N>> {
		path.iter().try_fold(self, |instance, &i| instance.child_instances.get(i))
	}
}
