use thiserror::Error;

/// Raised while instantiating or reconciling an [`Element`](`crate::Element`) tree that can't be turned into host nodes.
///
/// Errors abort the current pass where they occur. Host mutations performed before that point are **not** rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// An element's `children` property holds something other than a sequence of elements.
	#[error("children of <{tag}> must be a sequence of elements, but found {found}")]
	ChildrenNotSequence { tag: String, found: &'static str },

	/// The element tree is nested more deeply than the depth limit of the current pass allows.
	#[error("depth limit reached at <{tag}>")]
	DepthLimitExceeded { tag: String },
}
