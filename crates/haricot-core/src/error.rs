//! Error taxonomy for context resolution and bean creation.

use thiserror::Error;

use crate::bean::BeanId;
use crate::scope::ScopeKind;

/// Errors surfaced while resolving contexts or producing contextual
/// instances. All of them are returned synchronously to the caller and are
/// never retried.
#[derive(Debug, Error)]
pub enum ContextError {
	/// A context is bound for the scope but its boundary is not active.
	#[error("context for {scope} scope is not active")]
	NotActive { scope: ScopeKind },

	/// No context has been bound for the scope at all.
	#[error("no context bound for {scope} scope")]
	NoContext { scope: ScopeKind },

	/// The dependent pseudo-scope never resolves to a shared context.
	#[error("the dependent pseudo-scope has no shared context; use direct ownership semantics")]
	DependentScopeShared,

	/// The bean's production contract failed.
	#[error("creation of bean {bean} failed")]
	CreationFailed {
		bean: BeanId,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}

pub type ContextResult<T> = Result<T, ContextError>;
