use crate::{
	reconcile::{reconcile, unmount, validate},
	Element, Host, Instance, ValidationError,
};
use tracing::{info, instrument};

/// Default for [`Root::with_depth_limit`].
pub const DEFAULT_DEPTH_LIMIT: usize = 256;

/// A render root: Owns the instance tree rendered into one container node.
///
/// Each call to [`Root::render`] diffs against the tree the previous call produced.
/// Independent roots can coexist, including ones sharing a [`Host`].
///
/// Rendering takes `&mut self`, so a render can't start while another one on the same root is in flight.
/// Listeners that want to re-render need to do so after dispatch returns control, for example through a [`RefCell`](`core::cell::RefCell`) they own.
#[derive(Debug)]
pub struct Root<N> {
	container: N,
	instance: Option<Instance<N>>,
	depth_limit: usize,
}
impl<N: Clone> Root<N> {
	#[must_use]
	pub fn new(container: N) -> Self {
		Self {
			container,
			instance: None,
			depth_limit: DEFAULT_DEPTH_LIMIT,
		}
	}

	/// Limits how many element levels a single render may descend into.
	#[must_use]
	pub fn with_depth_limit(self, depth_limit: usize) -> Self {
		Self { depth_limit, ..self }
	}

	#[must_use]
	pub fn container(&self) -> &N {
		&self.container
	}

	/// The instance produced by the last successful render, if any.
	#[must_use]
	pub fn instance(&self) -> Option<&Instance<N>> {
		self.instance.as_ref()
	}

	/// Makes the container's content match `element`.
	///
	/// The whole tree is validated before any host mutation.
	///
	/// # Errors
	///
	/// Iff `element` doesn't pass [`validate`]. Neither the host nor this [`Root`] are changed in that case.
	#[instrument(skip(self, host, element), fields(tag = %element.tag()))]
	pub fn render<H: Host<Node = N>>(&mut self, host: &mut H, element: Element) -> Result<(), ValidationError> {
		validate(&element, self.depth_limit)?;
		self.instance = reconcile(host, &self.container, self.instance.take(), Some(&element), self.depth_limit)?;
		info!("Rendered.");
		Ok(())
	}

	/// Removes the rendered tree from the container and releases its listeners.
	#[instrument(skip(self, host))]
	pub fn unmount<H: Host<Node = N>>(&mut self, host: &mut H) {
		match self.instance.take() {
			Some(instance) => {
				unmount(host, &self.container, instance);
				info!("Unmounted.")
			}
			None => info!("Nothing to unmount."),
		}
	}
}
