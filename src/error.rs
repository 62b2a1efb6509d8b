use core::fmt::Debug;
use thiserror::Error;

/// Why a patch call stopped.
///
/// Mutations applied before the error are **not** rolled back. Replacing the whole tree is the caller's way to recover.
#[derive(Debug, Error)]
pub enum Error<E: Debug> {
	/// A host primitive or a hook failed. The value is passed through as returned.
	#[error("host operation failed: {0:?}")]
	Host(E),

	/// The old side of a patch was never patched into the host tree.
	#[error("old node {sel:?} has no host node")]
	UnrealizedOld { sel: Option<String> },

	/// The new side of a patch is already bound to a host node, i.e. it was patched before.
	#[error("new node {sel:?} is already bound to a host node")]
	AlreadyRealized { sel: Option<String> },

	#[error("nesting depth limit of {limit} exceeded")]
	DepthLimit { limit: usize },
}

impl<E: Debug> From<E> for Error<E> {
	fn from(error: E) -> Self {
		Self::Host(error)
	}
}
